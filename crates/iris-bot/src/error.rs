//! 채팅 전송 계층 에러.

use iris_core::BotError;

/// 전송 작업용 Result 타입.
pub type TransportResult<T> = Result<T, TransportError>;

/// 채팅 전송 에러.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("API 응답 실패: {0}")]
    Api(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("직렬화 에러: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<TransportError> for BotError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidConfig(msg) => BotError::Config(msg),
            TransportError::SerializationError(e) => BotError::Parse(e.to_string()),
            other => BotError::Network(other.to_string()),
        }
    }
}
