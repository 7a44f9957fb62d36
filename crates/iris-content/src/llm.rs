//! OpenAI 호환 chat completion 클라이언트.
//!
//! `POST {base_url}/chat/completions` 하나만 사용합니다.

use async_trait::async_trait;
use iris_core::LlmConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// 메시지 타입
// ============================================================================

/// 대화 메시지 역할.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// 역할과 내용을 가진 대화 메시지.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// 사용자 메시지.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// chat completion 요청.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// 모델 이름 (비어 있으면 클라이언트 기본값)
    pub model: String,
    /// 대화 메시지
    pub messages: Vec<ChatMessage>,
    /// 샘플링 온도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// 최대 생성 토큰 수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

impl ChatRequest {
    /// 새 요청을 생성합니다.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_completion_tokens: None,
        }
    }

    /// 온도를 설정합니다.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// 최대 토큰 수를 설정합니다.
    pub fn with_max_completion_tokens(mut self, max_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// 에러
// ============================================================================

/// 언어 모델 호출 에러.
#[derive(Debug, Error)]
pub enum LlmError {
    /// 요청 한도 초과
    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    /// 타임아웃
    #[error("Request timeout ({timeout_ms}ms)")]
    Timeout { timeout_ms: u64 },

    /// 인증 실패
    #[error("Auth error: {0}")]
    AuthError(String),

    /// 응답에 내용이 없음
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 응답 파싱 실패
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 네트워크 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 기타 API 에러
    #[error("API error {status_code}: {message}")]
    ApiError { status_code: u16, message: String },

    /// API 키가 설정되지 않음
    #[error("Completion provider disabled (no API key)")]
    ProviderDisabled,
}

// ============================================================================
// 클라이언트
// ============================================================================

/// chat completion 인터페이스.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 요청을 보내고 첫 번째 응답 텍스트를 반환합니다.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}

/// OpenAI 호환 API 클라이언트.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    timeout: Duration,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .finish()
    }
}

impl OpenAiClient {
    /// 설정에서 클라이언트를 생성합니다.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout,
        })
    }

    /// API 키가 설정되어 있는지 확인합니다.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, mut request: ChatRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::ProviderDisabled)?;
        if request.model.is_empty() {
            request.model = self.model.clone();
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, "POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(|s| s * 1000);
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 => LlmError::AuthError("Invalid API key".to_string()),
                429 => LlmError::RateLimited {
                    retry_after_ms: retry_after,
                },
                code => LlmError::ApiError {
                    status_code: code,
                    message: body,
                },
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("No content in response".to_string()))
    }
}
