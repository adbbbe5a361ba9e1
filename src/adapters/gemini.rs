//! Gemini `generateContent` client.
//!
//! Each model gets at most two attempts: a retryable status (408, 429, 5xx
//! gateway errors) or a timeout earns one retry after a short backoff. When
//! the primary model still fails, the fallback model is tried the same way;
//! if that fails too, the primary model's error is what the caller sees.

use crate::config::gemini::GeminiConfig;
use crate::domain::ports::Interpreter;
use crate::utils::error::{OracleError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const MAX_ATTEMPTS_PER_MODEL: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPart {
    pub text: String,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// 第一個候選回覆的所有文字段落，以換行串接並去除前後空白
    pub fn text(&self) -> Option<String> {
        let parts = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();

        let text = parts
            .iter()
            .map(|p| p.text.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = text.trim();

        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// 一次 HTTP 往返的原始結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// 單次網路呼叫；重試、逾時與備援都由 [`GeminiClient`] 負責
#[async_trait]
pub trait GenerateTransport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<TransportResponse>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl GenerateTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| OracleError::Transport {
                message: e.without_url().to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| OracleError::Transport {
            message: e.without_url().to_string(),
        })?;

        Ok(TransportResponse { status, body })
    }
}

pub struct GeminiClient<T: GenerateTransport = ReqwestTransport> {
    config: GeminiConfig,
    transport: T,
}

impl GeminiClient<ReqwestTransport> {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: GenerateTransport> GeminiClient<T> {
    pub fn with_transport(config: GeminiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub async fn interpret(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(OracleError::MissingApiKey)?;

        let request = GenerateContentRequest::from_prompt(prompt);
        let primary = self.config.primary_model.as_str();
        let fallback = self.config.fallback_model.as_str();

        let primary_error = match self.request_with_model(&request, api_key, primary).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };

        if !self.config.has_distinct_fallback() {
            tracing::warn!(
                "❌ Gemini model {} failed, no distinct fallback: {}",
                primary,
                primary_error
            );
            return Err(primary_error);
        }

        tracing::warn!(
            "🔁 Gemini model {} failed ({}), falling back to {}",
            primary,
            primary_error,
            fallback
        );

        match self.request_with_model(&request, api_key, fallback).await {
            Ok(text) => {
                tracing::info!("✅ Fallback model {} answered", fallback);
                Ok(text)
            }
            Err(fallback_error) => {
                tracing::warn!(
                    "❌ Fallback model {} failed too: {}",
                    fallback,
                    fallback_error
                );
                Err(primary_error)
            }
        }
    }

    async fn request_with_model(
        &self,
        request: &GenerateContentRequest,
        api_key: &str,
        model: &str,
    ) -> Result<String> {
        let url = self.config.endpoint_for(model);
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!(
                "📡 Gemini request to {} (attempt {}/{})",
                model,
                attempt,
                MAX_ATTEMPTS_PER_MODEL
            );

            match self.attempt(&url, api_key, request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS_PER_MODEL => {
                    let backoff = self.config.retry_backoff * attempt;
                    tracing::warn!(
                        "⏳ Gemini model {} attempt {} failed ({}), retrying in {:?}",
                        model,
                        attempt,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// 一次網路呼叫，與逾時計時器競速；計時器先到時丟棄進行中的請求
    async fn attempt(
        &self,
        url: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<String> {
        let deadline = tokio::time::sleep(self.config.timeout);

        let response = tokio::select! {
            response = self.transport.post(url, api_key, request) => response?,
            _ = deadline => {
                return Err(OracleError::GeminiTimeout {
                    seconds: self.config.timeout.as_secs_f64(),
                });
            }
        };

        if !(200..300).contains(&response.status) {
            return Err(OracleError::GeminiApi {
                status: response.status,
                body: response.body,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&response.body).map_err(|e| OracleError::ResponseParse {
                message: e.to_string(),
            })?;

        parsed.text().ok_or(OracleError::EmptyResponse)
    }
}

#[async_trait]
impl<T: GenerateTransport> Interpreter for GeminiClient<T> {
    async fn interpret(&self, prompt: &str) -> Result<String> {
        GeminiClient::interpret(self, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    enum Step {
        Respond(u16, String),
        Hang,
        Fail(&'static str),
    }

    fn ok_body(text: &str) -> Step {
        Step::Respond(
            200,
            serde_json::json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
                .to_string(),
        )
    }

    fn status(code: u16, body: &str) -> Step {
        Step::Respond(code, body.to_string())
    }

    /// 依序回放預先排好的回應，並記錄每次呼叫的 URL
    struct ScriptedTransport {
        steps: Mutex<VecDeque<Step>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerateTransport for ScriptedTransport {
        async fn post(
            &self,
            url: &str,
            _api_key: &str,
            _request: &GenerateContentRequest,
        ) -> Result<TransportResponse> {
            self.calls.lock().unwrap().push(url.to_string());
            let step = self
                .steps
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more often than scripted");
            match step {
                Step::Respond(status, body) => Ok(TransportResponse { status, body }),
                Step::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                Step::Fail(message) => Err(OracleError::Transport {
                    message: message.to_string(),
                }),
            }
        }
    }

    fn override_config() -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            api_url: Some("https://api.example.com/generate".to_string()),
            ..Default::default()
        }
    }

    fn model_config() -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            base_url: "https://api.example.com/models".to_string(),
            primary_model: "primary".to_string(),
            fallback_model: "fallback".to_string(),
            ..Default::default()
        }
    }

    fn client(config: GeminiConfig, steps: Vec<Step>) -> GeminiClient<ScriptedTransport> {
        GeminiClient::with_transport(config, ScriptedTransport::new(steps))
    }

    fn calls(client: &GeminiClient<ScriptedTransport>) -> Vec<String> {
        client.transport.calls.lock().unwrap().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_candidate_text() {
        let client = client(override_config(), vec![ok_body("X")]);
        assert_eq!(client.interpret("prompt").await.unwrap(), "X");
        assert_eq!(calls(&client).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_status_makes_single_call() {
        let client = client(override_config(), vec![status(403, "Permission denied")]);
        let err = client.interpret("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API error (403): Permission denied");
        assert_eq!(calls(&client).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_once_after_rate_limit() {
        let client = client(
            override_config(),
            vec![status(429, "Rate limit exceeded"), ok_body("重試成功")],
        );
        assert_eq!(client.interpret("prompt").await.unwrap(), "重試成功");
        assert_eq!(calls(&client).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_candidates_are_not_retried() {
        let client = client(
            override_config(),
            vec![Step::Respond(200, r#"{"candidates": []}"#.to_string())],
        );
        let err = client.interpret("prompt").await.unwrap_err();
        assert!(matches!(err, OracleError::EmptyResponse));
        assert_eq!(err.to_string(), "Gemini API returned empty response");
        assert_eq!(calls(&client).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_api_key_fails_before_network() {
        let config = GeminiConfig {
            api_key: None,
            ..override_config()
        };
        let client = client(config, vec![]);
        let err = client.interpret("prompt").await.unwrap_err();
        assert!(matches!(err, OracleError::MissingApiKey));
        assert!(calls(&client).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_after_primary_exhausts_retries() {
        let client = client(
            model_config(),
            vec![status(503, "busy"), status(503, "busy"), ok_body("備援解讀")],
        );
        assert_eq!(client.interpret("prompt").await.unwrap(), "備援解讀");
        assert_eq!(
            calls(&client),
            vec![
                "https://api.example.com/models/primary:generateContent",
                "https://api.example.com/models/primary:generateContent",
                "https://api.example.com/models/fallback:generateContent",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_error_wins_when_fallback_fails() {
        let client = client(
            model_config(),
            vec![
                status(403, "PERMISSION_DENIED"),
                status(500, "fallback down"),
                status(500, "fallback down"),
            ],
        );
        let err = client.interpret("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API error (403): PERMISSION_DENIED");
        assert_eq!(calls(&client).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_at_most_four_attempts() {
        let client = client(
            model_config(),
            vec![
                status(502, "a"),
                status(502, "b"),
                status(504, "c"),
                status(504, "d"),
            ],
        );
        let err = client.interpret("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API error (502): b");
        assert_eq!(calls(&client).len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retried_then_reported() {
        let client = client(override_config(), vec![Step::Hang, Step::Hang]);
        let err = client.interpret("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API timeout: request exceeded 9 seconds");
        assert_eq!(calls(&client).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_then_success() {
        let config = GeminiConfig {
            timeout: Duration::from_millis(200),
            ..override_config()
        };
        let client = client(config, vec![Step::Hang, ok_body("第二次成功")]);
        assert_eq!(client.interpret("prompt").await.unwrap(), "第二次成功");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_is_not_retried() {
        let client = client(override_config(), vec![Step::Fail("connection refused")]);
        let err = client.interpret("prompt").await.unwrap_err();
        assert!(matches!(err, OracleError::Transport { .. }));
        assert_eq!(calls(&client).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_json_is_a_parse_error() {
        let client = client(override_config(), vec![status(200, "<html>oops</html>")]);
        let err = client.interpret("prompt").await.unwrap_err();
        assert!(matches!(err, OracleError::ResponseParse { .. }));
    }

    #[test]
    fn test_text_joins_all_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "  第一段"}, {"text": "第二段\n"}]}},
                {"content": {"parts": [{"text": "另一個候選"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), "第一段\n第二段");

        let blank: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}]
        }))
        .unwrap();
        assert!(blank.text().is_none());
    }

    #[test]
    fn test_request_envelope() {
        let body =
            serde_json::to_value(GenerateContentRequest::from_prompt("test prompt")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contents": [{"parts": [{"text": "test prompt"}]}]})
        );
    }
}
