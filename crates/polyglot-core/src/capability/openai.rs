use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{CapabilityError, TranslationError};
use crate::language::Language;
use crate::model::TranslationResult;
use super::traits::TranslationCapability;

/// Appended to the caller's instructions so the answer can be parsed
const RESPONSE_FORMAT: &str = "Reply with a single JSON object and nothing else, shaped as \
{\"translated_text\": \"...\", \"source_language\": \"<code>\", \"target_language\": \"<code>\"}. \
Language fields are ISO 639-1 codes; use zh-CN or zh-TW for Chinese.";

/// OpenAI-compatible API capability
/// Works with: llama.cpp server, Ollama, DeepSeek, OpenAI, etc.
pub struct OpenAiCapability {
    client: Client,
    /// Base URL for the API (e.g., "http://localhost:8080/v1")
    api_base: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    /// Caller instructions followed by [`RESPONSE_FORMAT`]
    system_prompt: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Structured answer the model is asked to produce.
///
/// Language codes stay raw strings here; models add regions or name languages
/// outside the catalogue, and that must not cost a finished translation.
#[derive(Debug, Deserialize)]
struct TranslationPayload {
    translated_text: String,
    #[serde(default)]
    source_language: Option<String>,
    #[serde(default)]
    target_language: Option<String>,
}

impl OpenAiCapability {
    /// Create a capability talking to the configured endpoint.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created, which should only happen
    /// in extreme circumstances (e.g., TLS backend unavailable on the system).
    #[allow(clippy::expect_used)]
    pub fn new(config: &BackendConfig, instructions: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            system_prompt: format!("{}\n\n{}", instructions.trim(), RESPONSE_FORMAT),
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match self.api_key {
            Some(ref key) => req.header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }

    async fn request(&self, prompt: &str) -> Result<TranslationResult, CapabilityError> {
        let url = format!("{}/chat/completions", self.api_base);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: &self.system_prompt,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        debug!("Translation request to {} with model {}", url, self.model);

        let response = match self.authorized(self.client.post(&url)).json(&request).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                warn!("Backend unreachable: {}", e);
                return Err(CapabilityError::AssetsUnavailable(e.to_string()));
            }
            Err(e) if e.is_timeout() => {
                warn!("Translation request timed out");
                return Err(CapabilityError::custom("translation request timed out"));
            }
            Err(e) => {
                warn!("Request failed: {}", e);
                return Err(CapabilityError::custom(format!(
                    "translation request failed: {e}"
                )));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error: {} - {}", status, body);
            // Unknown model or model still loading
            if status == StatusCode::NOT_FOUND || status == StatusCode::SERVICE_UNAVAILABLE {
                return Err(CapabilityError::AssetsUnavailable(format!(
                    "HTTP {status}: {body}"
                )));
            }
            return Err(CapabilityError::custom(format!("HTTP {status}: {body}")));
        }

        let chat_response = response.json::<ChatResponse>().await.map_err(|e| {
            CapabilityError::custom(format!("invalid translation API response: {e}"))
        })?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                CapabilityError::custom("invalid translation API response: no choices")
            })?;

        parse_payload(&choice.message.content)
    }
}

#[async_trait]
impl TranslationCapability for OpenAiCapability {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn translate(&self, prompt: &str) -> Result<TranslationResult, CapabilityError> {
        if !self.is_available().await {
            return Err(TranslationError::ModelUnavailable.into());
        }

        self.request(prompt).await
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.api_base);
        match self.authorized(self.client.get(&url)).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!("Backend at {} answered {}", url, response.status());
                false
            }
            Err(e) => {
                debug!("Backend at {} unreachable: {}", url, e);
                false
            }
        }
    }
}

/// Parse the model's JSON answer, tolerating a surrounding markdown fence
fn parse_payload(content: &str) -> Result<TranslationResult, CapabilityError> {
    let content = content.trim();
    let json = content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(content, str::trim);

    let payload: TranslationPayload = serde_json::from_str(json).map_err(|e| {
        CapabilityError::custom(format!("invalid translation payload: {e}"))
    })?;

    let source = payload.source_language.as_deref().and_then(|code| {
        let lang = Language::resolve(code);
        if lang.is_none() {
            debug!("Detected source language {} is outside the catalogue", code);
        }
        lang
    });

    // The façade only ever asks for catalogue languages
    let target = payload
        .target_language
        .as_deref()
        .and_then(Language::resolve)
        .ok_or_else(|| {
            CapabilityError::custom(format!(
                "invalid translation payload: unrecognised target language {:?}",
                payload.target_language.as_deref().unwrap_or_default()
            ))
        })?;

    Ok(TranslationResult::new(payload.translated_text, source, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn chat_response(content: &str) -> Value {
        json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    fn capability_for(server: &MockServer, api_key: Option<&str>) -> OpenAiCapability {
        let config = BackendConfig::new(
            format!("{}/v1/", server.uri()),
            api_key.map(str::to_string),
            "test-model",
        );
        OpenAiCapability::new(&config, "Be precise.")
    }

    async fn mount_models(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "data": [] })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_payload() {
        let result = parse_payload(
            r#"{"translated_text": "Hello", "source_language": "es", "target_language": "en"}"#,
        )
        .unwrap();
        assert_eq!(result.translated_text(), "Hello");
        assert_eq!(result.source_language(), Some(Language::Spanish));
        assert_eq!(result.target_language(), Language::English);
    }

    #[test]
    fn test_parse_payload_keeps_text_for_uncatalogued_source() {
        let result = parse_payload(
            r#"{"translated_text": "Good morning", "source_language": "el", "target_language": "en"}"#,
        )
        .unwrap();
        assert_eq!(result.translated_text(), "Good morning");
        assert_eq!(result.source_language(), None);
        assert_eq!(result.target_language(), Language::English);

        let result = parse_payload(r#"{"translated_text": "Good morning", "target_language": "en"}"#)
            .unwrap();
        assert_eq!(result.source_language(), None);
    }

    #[test]
    fn test_parse_payload_requires_text() {
        assert!(matches!(
            parse_payload(r#"{"source_language": "es", "target_language": "en"}"#),
            Err(CapabilityError::Translation(TranslationError::Custom(_)))
        ));
    }

    #[test]
    fn test_parse_payload_strips_fence() {
        let content = "```json\n{\"translated_text\": \"Bonjour\", \"source_language\": \"en\", \"target_language\": \"fr\"}\n```";
        let result = parse_payload(content).unwrap();
        assert_eq!(result.translated_text(), "Bonjour");
    }

    #[test]
    fn test_parse_payload_rejects_garbage() {
        assert!(matches!(
            parse_payload("Hello there"),
            Err(CapabilityError::Translation(TranslationError::Custom(_)))
        ));
        assert!(matches!(
            parse_payload(r#"{"translated_text": "x", "source_language": "es", "target_language": "xx"}"#),
            Err(CapabilityError::Translation(TranslationError::Custom(_)))
        ));
    }

    #[tokio::test]
    async fn test_available_when_models_endpoint_answers() {
        let server = MockServer::start().await;
        mount_models(&server, 200).await;

        assert!(capability_for(&server, None).is_available().await);
    }

    #[tokio::test]
    async fn test_unavailable_on_server_error() {
        let server = MockServer::start().await;
        mount_models(&server, 500).await;

        assert!(!capability_for(&server, None).is_available().await);
    }

    #[tokio::test]
    async fn test_unavailable_when_unreachable() {
        let config = BackendConfig::new("http://127.0.0.1:9/v1", None, "test-model");
        let capability = OpenAiCapability::new(&config, "Be precise.");

        assert!(!capability.is_available().await);
        assert_eq!(
            capability.translate("Translate this").await.unwrap_err(),
            CapabilityError::Translation(TranslationError::ModelUnavailable)
        );
    }

    #[tokio::test]
    async fn test_translate_success() {
        let server = MockServer::start().await;
        mount_models(&server, 200).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
                r#"{"translated_text": "Hello", "source_language": "es", "target_language": "en"}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let capability = capability_for(&server, Some("secret"));
        let result = capability
            .translate("Translate the following text from Spanish to English: Hola")
            .await
            .unwrap();

        assert_eq!(result.translated_text(), "Hello");
        assert_eq!(result.source_language(), Some(Language::Spanish));

        let requests = server.received_requests().await.unwrap();
        let post = requests
            .iter()
            .find(|r| r.method.as_str() == "POST")
            .unwrap();
        let body: Value = serde_json::from_slice(&post.body).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][0]["content"].as_str().unwrap().starts_with("Be precise."));
        assert_eq!(
            body["messages"][1]["content"],
            "Translate the following text from Spanish to English: Hola"
        );
    }

    async fn translate_answer(content: &str) -> TranslationResult {
        let server = MockServer::start().await;
        mount_models(&server, 200).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(content)))
            .mount(&server)
            .await;

        capability_for(&server, None).translate("prompt").await.unwrap()
    }

    #[tokio::test]
    async fn test_translate_accepts_regional_codes() {
        let result = translate_answer(
            r#"{"translated_text": "Hello", "source_language": "es-MX", "target_language": "en-US"}"#,
        )
        .await;
        assert_eq!(result.source_language(), Some(Language::Spanish));
        assert_eq!(result.target_language(), Language::English);
    }

    #[tokio::test]
    async fn test_translate_accepts_bare_chinese() {
        let result = translate_answer(
            r#"{"translated_text": "你好", "source_language": "en", "target_language": "zh"}"#,
        )
        .await;
        assert_eq!(result.translated_text(), "你好");
        assert_eq!(result.target_language(), Language::SimplifiedChinese);
    }

    #[tokio::test]
    async fn test_translate_accepts_uncatalogued_detection() {
        let result = translate_answer(
            r#"{"translated_text": "Good morning", "source_language": "el", "target_language": "en"}"#,
        )
        .await;
        assert_eq!(result.translated_text(), "Good morning");
        assert_eq!(result.source_language(), None);
    }

    #[tokio::test]
    async fn test_translate_skips_request_when_unavailable() {
        let server = MockServer::start().await;
        mount_models(&server, 503).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = capability_for(&server, None).translate("prompt").await.unwrap_err();
        assert_eq!(err, CapabilityError::Translation(TranslationError::ModelUnavailable));
    }

    #[tokio::test]
    async fn test_missing_model_is_assets_failure() {
        let server = MockServer::start().await;
        mount_models(&server, 200).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let err = capability_for(&server, None).translate("prompt").await.unwrap_err();
        assert!(matches!(err, CapabilityError::AssetsUnavailable(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_custom() {
        let server = MockServer::start().await;
        mount_models(&server, 200).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = capability_for(&server, None).translate("prompt").await.unwrap_err();
        match err {
            CapabilityError::Translation(TranslationError::Custom(message)) => {
                assert!(message.contains("500"), "unexpected message: {message}");
            }
            other => panic!("expected Custom error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_custom() {
        let server = MockServer::start().await;
        mount_models(&server, 200).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = capability_for(&server, None).translate("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            CapabilityError::Translation(TranslationError::Custom(_))
        ));
    }
}
