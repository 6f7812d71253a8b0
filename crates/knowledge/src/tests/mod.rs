//! Cross-module scenarios for the answer pipeline.
