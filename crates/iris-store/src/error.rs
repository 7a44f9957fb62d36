//! 저장소 에러 타입.

use iris_core::BotError;
use thiserror::Error;

/// 저장소 관련 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 저장소 백엔드(연결, 명령) 에러
    #[error("Backend error: {0}")]
    Backend(String),

    /// 직렬화/역직렬화 에러
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 업비트 원화마켓에 없는 심볼
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// 즐겨찾기에 없는 심볼
    #[error("Not found: {0}")]
    NotFound(String),
}

/// 저장소 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<StoreError> for BotError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownSymbol(s) => BotError::UnknownSymbol(s),
            StoreError::NotFound(s) => BotError::NotFound(s),
            other => BotError::Store(other.to_string()),
        }
    }
}
