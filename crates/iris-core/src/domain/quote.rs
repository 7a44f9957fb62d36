//! 실시간 시세.

use crate::types::{Percentage, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 업비트 원화마켓 시세 한 건.
///
/// 요청마다 새로 조회하며 캐시하거나 저장하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 대문자 심볼 (예: BTC)
    pub symbol: String,
    /// 현재가 (원)
    pub price: Price,
    /// 전일 대비 등락률 (%)
    pub change_rate_percent: Percentage,
    /// 조회 시각
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    /// 현재 시각으로 시세를 생성합니다.
    pub fn new(symbol: impl Into<String>, price: Price, change_rate_percent: Percentage) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change_rate_percent,
            fetched_at: Utc::now(),
        }
    }
}
