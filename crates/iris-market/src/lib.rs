//! 시세 조회 클라이언트.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - QuoteSource trait: 코인 시세 조회 인터페이스
//! - 업비트 원화마켓 시세 (직접 조회 + 한글명 검색)
//! - 바이낸스 거래쌍 시세와 김치 프리미엄
//! - 달러/원 환율
//! - 코스피/코스닥/나스닥 지수

pub mod binance;
pub mod error;
pub mod fx;
pub mod index;
pub mod premium;
pub mod traits;
pub mod upbit;

pub use binance::BinanceClient;
pub use error::*;
pub use fx::FxClient;
pub use index::{IndexClient, KoreanIndex};
pub use premium::PremiumCalculator;
pub use traits::*;
pub use upbit::UpbitClient;

use std::time::Duration;

/// 브라우저와 구분되는 봇 User-Agent.
pub(crate) const USER_AGENT: &str = concat!("iris-bot/", env!("CARGO_PKG_VERSION"));

/// 타임아웃이 설정된 HTTP 클라이언트를 생성합니다.
pub(crate) fn build_http_client(timeout_secs: u64) -> MarketResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| MarketError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e)))
}
