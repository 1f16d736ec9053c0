//! Groq adapter (OpenAI-compatible chat completions)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{language_name, outcome_from_error_response, ProviderOutcome, TranslationProvider};
use crate::core::config::ProviderSettings;
use crate::core::models::ServiceId;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Groq-hosted chat model used as a translator
#[derive(Debug, Clone)]
pub struct GroqProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl GroqProvider {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.endpoint.trim_end_matches('/')
        )
    }

    fn request(&self, text: &str, target_language: &str) -> ChatRequest {
        ChatRequest {
            model: self
                .settings
                .model
                .clone()
                .unwrap_or_else(|| "llama-3.3-70b-versatile".to_string()),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(format!(
                        "You are a translator. Translate to {}. Only return the translation, nothing else.",
                        language_name(target_language)
                    )),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(text.to_string()),
                },
            ],
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

#[async_trait]
impl TranslationProvider for GroqProvider {
    fn service(&self) -> ServiceId {
        ServiceId::Groq
    }

    async fn attempt(&self, text: &str, target_language: &str) -> ProviderOutcome {
        let response = match self
            .client
            .post(self.url())
            .bearer_auth(&self.settings.api_key)
            .json(&self.request(text, target_language))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProviderOutcome::from_transport(e),
        };

        if !response.status().is_success() {
            return outcome_from_error_response(response, |_| None).await;
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => {
                let content = parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content);
                ProviderOutcome::from_text(content.as_deref())
            }
            Err(e) => ProviderOutcome::TransientError(format!("invalid response: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> GroqProvider {
        let settings = ProviderSettings::new(ServiceId::Groq, "groq-key", server.uri());
        GroqProvider::new(reqwest::Client::new(), settings)
    }

    #[tokio::test]
    async fn test_successful_translation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer groq-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": " Guten Morgen "},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = provider(&server).attempt("Good morning", "DE").await;
        assert_eq!(outcome, ProviderOutcome::Success("Guten Morgen".to_string()));
    }

    #[tokio::test]
    async fn test_request_shape() {
        let server = MockServer::start().await;
        let request = provider(&server).request("Hello", "ES");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["messages"][1]["content"], "Hello");
        assert!(value["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("Translate to Spanish."));
    }

    #[tokio::test]
    async fn test_invalid_key_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let outcome = provider(&server).attempt("Hello", "ES").await;
        assert_eq!(outcome, ProviderOutcome::QuotaExhausted);
    }
}
