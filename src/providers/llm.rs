//! Adapts any `wandr_llm::LlmClient` to the `TextGenerator` capability.

use std::sync::Arc;

use async_trait::async_trait;
use wandr_llm::LlmClient;

use super::TextGenerator;
use crate::error::ProviderError;

pub struct LlmTextGenerator {
    client: Arc<dyn LlmClient>,
    name: String,
}

impl LlmTextGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        let name = format!("{}/{}", client.provider_name(), client.model_name());
        Self { client, name }
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        Ok(self.client.chat(system_prompt, user_prompt).await?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
