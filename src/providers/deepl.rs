//! DeepL REST adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{outcome_from_error_response, ProviderOutcome, TranslationProvider};
use crate::core::config::ProviderSettings;
use crate::core::models::ServiceId;

/// HTTP status DeepL uses for an exhausted character quota
const QUOTA_EXCEEDED: u16 = 456;

#[derive(Debug, Serialize)]
struct DeeplRequest<'a> {
    text: [&'a str; 1],
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    #[serde(default)]
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    #[serde(default)]
    detected_source_language: Option<String>,
    text: String,
}

/// DeepL translation API
#[derive(Debug, Clone)]
pub struct DeeplProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl DeeplProvider {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn url(&self) -> String {
        format!("{}/v2/translate", self.settings.endpoint.trim_end_matches('/'))
    }
}

/// DeepL rejects bare `EN`/`PT` targets and wants a regional variant
pub fn deepl_target_lang(code: &str) -> String {
    let code = code.trim().to_ascii_uppercase().replace('_', "-");
    match code.as_str() {
        "EN" => "EN-GB".to_string(),
        "PT" => "PT-PT".to_string(),
        _ => code,
    }
}

#[async_trait]
impl TranslationProvider for DeeplProvider {
    fn service(&self) -> ServiceId {
        ServiceId::Deepl
    }

    async fn attempt(&self, text: &str, target_language: &str) -> ProviderOutcome {
        let body = DeeplRequest {
            text: [text],
            target_lang: deepl_target_lang(target_language),
        };

        let response = match self
            .client
            .post(self.url())
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.settings.api_key),
            )
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProviderOutcome::from_transport(e),
        };

        if !response.status().is_success() {
            return outcome_from_error_response(response, |status| {
                (status == QUOTA_EXCEEDED).then_some(ProviderOutcome::QuotaExhausted)
            })
            .await;
        }

        match response.json::<DeeplResponse>().await {
            Ok(parsed) => {
                let first = parsed.translations.into_iter().next();
                if let Some(detected) = first.as_ref().and_then(|t| t.detected_source_language.as_deref()) {
                    debug!("DeepL detected source language {}", detected);
                }
                ProviderOutcome::from_text(first.as_ref().map(|t| t.text.as_str()))
            }
            Err(e) => ProviderOutcome::TransientError(format!("invalid response: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> DeeplProvider {
        let settings = ProviderSettings::new(ServiceId::Deepl, "deepl-key", server.uri());
        DeeplProvider::new(reqwest::Client::new(), settings)
    }

    #[test]
    fn test_regional_variants() {
        assert_eq!(deepl_target_lang("EN"), "EN-GB");
        assert_eq!(deepl_target_lang("pt"), "PT-PT");
        assert_eq!(deepl_target_lang("es"), "ES");
        assert_eq!(deepl_target_lang("en_us"), "EN-US");
    }

    #[tokio::test]
    async fn test_successful_translation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/translate"))
            .and(header("Authorization", "DeepL-Auth-Key deepl-key"))
            .and(body_json(json!({"text": ["Good morning"], "target_lang": "ES"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "translations": [{"detected_source_language": "EN", "text": "Buenos días"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = provider(&server).attempt("Good morning", "ES").await;
        assert_eq!(outcome, ProviderOutcome::Success("Buenos días".to_string()));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(456).set_body_string("Quota exceeded"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert_eq!(provider.attempt("a", "ES").await, ProviderOutcome::QuotaExhausted);
        assert_eq!(provider.attempt("a", "ES").await, ProviderOutcome::RateLimited);
        assert_eq!(
            provider.attempt("a", "ES").await,
            ProviderOutcome::TransientError("HTTP 503: busy".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_translation_list_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translations": []})))
            .mount(&server)
            .await;

        let outcome = provider(&server).attempt("Hello", "ES").await;
        assert!(matches!(outcome, ProviderOutcome::TransientError(_)));
    }
}
