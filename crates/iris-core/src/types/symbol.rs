//! 코인 심볼과 거래쌍 정의.
//!
//! - 업비트 원화마켓 코드 (`KRW-BTC`) 변환
//! - `TradingPair` - 바이낸스 거래쌍 (`BTC/USDT`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// 업비트 원화마켓 접두사.
pub const KRW_MARKET_PREFIX: &str = "KRW-";

/// 사용자가 입력한 심볼을 정규화합니다 (공백 제거, 대문자).
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// 심볼을 업비트 원화마켓 코드로 변환합니다.
///
/// `btc` → `KRW-BTC`
pub fn krw_market(symbol: &str) -> String {
    format!("{}{}", KRW_MARKET_PREFIX, normalize_symbol(symbol))
}

/// 업비트 마켓 코드에서 원화마켓 심볼을 꺼냅니다.
///
/// 원화마켓이 아니면 `None`.
pub fn symbol_from_krw_market(market: &str) -> Option<&str> {
    market.strip_prefix(KRW_MARKET_PREFIX)
}

/// 가치가 달러에 고정된 호가 자산.
pub const STABLE_QUOTES: [&str; 3] = ["USDT", "BUSD", "USDC"];

/// 바이낸스 거래쌍.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    /// 기준 자산 (예: BTC)
    pub base: String,
    /// 호가 자산 (예: USDT, BNB)
    pub quote: String,
}

impl TradingPair {
    /// 새 거래쌍을 생성합니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: normalize_symbol(&base.into()),
            quote: normalize_symbol(&quote.into()),
        }
    }

    /// "BASE/QUOTE" 형식 문자열에서 거래쌍을 파싱합니다.
    pub fn parse(s: &str) -> Option<Self> {
        let (base, quote) = s.trim().split_once('/')?;
        if base.trim().is_empty() || quote.trim().is_empty() || quote.contains('/') {
            return None;
        }
        Some(Self::new(base, quote))
    }

    /// 바이낸스 API 심볼 형식 (`BTCUSDT`).
    pub fn exchange_symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    /// 호가 자산이 스테이블 코인인지 확인합니다.
    pub fn is_stable_quote(&self) -> bool {
        STABLE_QUOTES.contains(&self.quote.as_str())
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
