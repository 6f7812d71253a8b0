//! Question answering over the session index.
//!
//! One question flows through the classifier, the retriever, the prompt
//! composer, the generation boundary and the resolver, in that order.

pub mod ask;
pub mod intent;
pub mod resolve;
pub mod retrieve;
pub mod types;

pub use ask::{AnswerSettings, Assistant};
pub use intent::{normalize_question, IntentClassifier};
pub use resolve::{citations, resolve, EMPTY_INPUT_MESSAGE, NOT_AVAILABLE_MESSAGE};
pub use retrieve::Retriever;
pub use types::{AnswerKind, AnswerPacket};
