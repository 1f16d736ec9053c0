//! Google Gemini adapter (generateContent)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{language_name, outcome_from_error_response, ProviderOutcome, TranslationProvider};
use crate::core::config::ProviderSettings;
use crate::core::models::ServiceId;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Gemini generative model used as a translator
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model.as_deref().unwrap_or("gemini-1.5-flash"),
        )
    }
}

fn prompt(text: &str, target_language: &str) -> String {
    format!(
        "You are a translator. Translate the following text to {}: '{}'. Only return the translation, nothing else.",
        language_name(target_language),
        text
    )
}

#[async_trait]
impl TranslationProvider for GeminiProvider {
    fn service(&self) -> ServiceId {
        ServiceId::Gemini
    }

    async fn attempt(&self, text: &str, target_language: &str) -> ProviderOutcome {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt(text, target_language) }]
            }]
        });

        let response = match self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.settings.api_key.as_str())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProviderOutcome::from_transport(e),
        };

        if !response.status().is_success() {
            return outcome_from_error_response(response, |_| None).await;
        }

        match response.json::<GenerateContentResponse>().await {
            Ok(parsed) => {
                let text = parsed
                    .candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.content)
                    .map(|c| {
                        c.parts
                            .into_iter()
                            .map(|p| p.text)
                            .collect::<Vec<_>>()
                            .join("")
                    });
                ProviderOutcome::from_text(text.as_deref())
            }
            Err(e) => ProviderOutcome::TransientError(format!("invalid response: {}", e)),
        }
    }
}
