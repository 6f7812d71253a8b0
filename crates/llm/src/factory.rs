//! LLM provider factory.
//!
//! This module creates LLM clients from the provider name and endpoint
//! found in the application configuration.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, DEFAULT_OLLAMA_URL};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `timeout` - Optional HTTP-level deadline; `generate` applies its own as well
///
/// # Errors
/// Returns error if the provider is unknown or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Arc<dyn LlmClient>, String> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            let client = match timeout {
                Some(timeout) => {
                    OllamaClient::with_timeout(base_url, timeout).map_err(|e| e.to_string())?
                }
                None => OllamaClient::with_base_url(base_url),
            };
            Ok(Arc::new(client))
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint_and_timeout() {
        let client = create_client(
            "Ollama",
            Some("http://localhost:8080"),
            Some(Duration::from_secs(300)),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
