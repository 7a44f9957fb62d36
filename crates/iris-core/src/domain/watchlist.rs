//! 즐겨찾기(워치리스트) 항목.

use crate::types::{normalize_symbol, Price, Quantity};
use serde::{Deserialize, Serialize};

/// 보유 정보 (수량과 평균 매수 단가).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Holding {
    /// 보유 수량
    pub amount: Option<Quantity>,
    /// 평균 매수 단가
    pub average_price: Option<Price>,
}

impl Holding {
    /// 수량과 평단가로 보유 정보를 생성합니다.
    pub fn new(amount: Quantity, average_price: Price) -> Self {
        Self {
            amount: Some(amount),
            average_price: Some(average_price),
        }
    }

    /// 손익 계산이 가능한 값(0이 아닌 수량과 평단가)을 반환합니다.
    pub fn valued(&self) -> Option<(Quantity, Price)> {
        match (self.amount, self.average_price) {
            (Some(amount), Some(avg)) if !amount.is_zero() && !avg.is_zero() => Some((amount, avg)),
            _ => None,
        }
    }

    /// 기록할 보유 정보가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.average_price.is_none()
    }
}

/// 사용자 한 명의 즐겨찾기 코인 하나.
///
/// `(user_id, symbol)` 조합이 유일합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// 채팅 사용자 ID
    pub user_id: String,
    /// 대문자 심볼 (예: BTC)
    pub symbol: String,
    /// 보유 정보
    #[serde(flatten)]
    pub holding: Holding,
}

impl WatchlistEntry {
    /// 관심 등록만 된 항목을 생성합니다.
    pub fn watch_only(user_id: impl Into<String>, symbol: &str) -> Self {
        Self {
            user_id: user_id.into(),
            symbol: normalize_symbol(symbol),
            holding: Holding::default(),
        }
    }

    /// 보유 정보가 포함된 항목을 생성합니다.
    pub fn with_holding(user_id: impl Into<String>, symbol: &str, holding: Holding) -> Self {
        Self {
            holding,
            ..Self::watch_only(user_id, symbol)
        }
    }
}
