//! 시세 조회 에러 타입.

use iris_core::BotError;
use thiserror::Error;

/// 시세 조회 관련 에러.
#[derive(Debug, Error)]
pub enum MarketError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// API가 에러 응답을 반환
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 직접 조회와 한글명 검색 모두 실패
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// 응답에 필요한 시세가 없음
    #[error("Missing quote: {0}")]
    MissingQuote(String),

    /// 잘못된 입력
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// 시세 조회 작업을 위한 Result 타입.
pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    /// 재시도 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        match self {
            MarketError::NetworkError(_) | MarketError::Timeout(_) => true,
            MarketError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MarketError::Timeout(err.to_string())
        } else if err.is_decode() {
            MarketError::ParseError(err.to_string())
        } else {
            MarketError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::ParseError(err.to_string())
    }
}

impl From<MarketError> for BotError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::SymbolNotFound(s) => BotError::SymbolNotFound(s),
            MarketError::ParseError(s) => BotError::Parse(s),
            MarketError::InvalidInput(s) => BotError::InvalidInput(s),
            other => BotError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(MarketError::Timeout("t".into()).is_retryable());
        assert!(MarketError::ApiError { status: 503, message: String::new() }.is_retryable());
        assert!(!MarketError::ApiError { status: 404, message: String::new() }.is_retryable());
        assert!(!MarketError::SymbolNotFound("BTC".into()).is_retryable());
    }

    #[test]
    fn test_into_bot_error() {
        let err: BotError = MarketError::SymbolNotFound("비트".into()).into();
        assert!(matches!(err, BotError::SymbolNotFound(_)));

        let err: BotError = MarketError::Timeout("slow".into()).into();
        assert!(matches!(err, BotError::Network(_)));
    }
}
