use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat-completion providers
///
/// The returned text is untrusted: callers must not assume it is well-formed JSON.
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted provider: answers with the first rule whose needle occurs in the
    /// last user message, otherwise with the default response.
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        rules: Vec<(String, String)>,
        default_response: Option<String>,
        error: Option<String>,
        delay: Option<Duration>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                rules: Vec::new(),
                default_response: None,
                error: None,
                delay: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(mut self, content: impl Into<String>) -> Self {
            self.default_response = Some(content.into());
            self
        }

        pub fn with_rule(mut self, needle: impl Into<String>, content: impl Into<String>) -> Self {
            self.rules.push((needle.into(), content.into()));
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            self.requests.lock().unwrap().push(request.clone());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            let prompt = request.last_user_text().unwrap_or_default();
            let content = self
                .rules
                .iter()
                .find(|(needle, _)| prompt.contains(needle.as_str()))
                .map(|(_, content)| content.clone())
                .or_else(|| self.default_response.clone())
                .ok_or_else(|| DomainError::provider(self.name, "No mock response configured"))?;

            Ok(LlmResponse::new(
                "mock-response".to_string(),
                model.to_string(),
                Message::assistant(content),
            ))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_rule_matching_prefers_rules_over_default() {
            let provider = MockLlmProvider::new("mock")
                .with_rule("extract", "{\"age\": 30}")
                .with_response("fallback");

            let matched = provider
                .chat("m", LlmRequest::builder().user("please extract").build())
                .await
                .unwrap();
            let unmatched = provider
                .chat("m", LlmRequest::builder().user("other").build())
                .await
                .unwrap();

            assert_eq!(matched.content(), "{\"age\": 30}");
            assert_eq!(unmatched.content(), "fallback");
            assert_eq!(provider.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_error_is_returned() {
            let provider = MockLlmProvider::new("mock").with_error("down");
            let result = provider
                .chat("m", LlmRequest::builder().user("x").build())
                .await;

            assert!(result.is_err());
        }
    }
}
