//! Client Factory
//!
//! Builds the configured [`LlmClient`] from the environment.

use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::anthropic_client::AnthropicClient;
use crate::backend::AgentBackend;
use crate::llm_client::LlmClient;
use crate::openai_client::OpenAiClient;

/// Create the client selected by `WANDR_LLM_BACKEND`.
///
/// Returns `Ok(None)` when generation is disabled.
pub fn create_llm_client() -> Result<Option<Arc<dyn LlmClient>>> {
    let backend = AgentBackend::from_env()?;
    let Some(var) = backend.api_key_var() else {
        return Ok(None);
    };
    let api_key = std::env::var(var).map_err(|_| anyhow!("{} environment variable not set", var))?;
    Ok(create_llm_client_with_key(backend, api_key))
}

/// Create a client for an explicit backend and key
pub fn create_llm_client_with_key(
    backend: AgentBackend,
    api_key: String,
) -> Option<Arc<dyn LlmClient>> {
    match backend {
        AgentBackend::Anthropic => Some(Arc::new(AnthropicClient::new(api_key))),
        AgentBackend::OpenAi => Some(Arc::new(OpenAiClient::new(api_key))),
        AgentBackend::Disabled => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_backends() {
        let client = create_llm_client_with_key(AgentBackend::OpenAi, "k".into()).unwrap();
        assert_eq!(client.provider_name(), "OpenAI");
        assert!(create_llm_client_with_key(AgentBackend::Disabled, "k".into()).is_none());
    }
}
