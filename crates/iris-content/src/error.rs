//! 본문 추출/요약 에러 타입.

use crate::llm::LlmError;
use iris_core::BotError;
use thiserror::Error;

/// 본문 추출 관련 에러.
#[derive(Debug, Error)]
pub enum ContentError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 에러 상태 코드
    #[error("HTTP status {0}")]
    Status(u16),

    /// HTML이 아닌 응답
    #[error("Not an HTML page: {0}")]
    NotHtml(String),

    /// 잘못된 URL 또는 셀렉터
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 헤드리스 브라우저 에러
    #[error("Render error: {0}")]
    Render(String),

    /// 모든 추출 단계 실패
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// 언어 모델 에러
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// 본문 추출 작업을 위한 Result 타입.
pub type ContentResult<T> = Result<T, ContentError>;

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ContentError::Status(status.as_u16()),
            None => ContentError::Network(err.to_string()),
        }
    }
}

impl From<fantoccini::error::CmdError> for ContentError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        ContentError::Render(err.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for ContentError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        ContentError::Render(err.to_string())
    }
}

impl From<ContentError> for BotError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Llm(e) => BotError::SummarizationFailed(e.to_string()),
            other => BotError::ExtractionFailed(other.to_string()),
        }
    }
}
