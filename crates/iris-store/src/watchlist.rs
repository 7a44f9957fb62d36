//! 사용자별 즐겨찾기 코인 저장소.
//!
//! 저장 형식: `coin.<user_id>` 키 → `{ "BTC": true, "ETH": { "amount": 2, "average": 100 } }`
//!
//! 값이 `true`이면 관심 등록만 된 코인이고, 객체이면 보유 수량과 평단가를 담습니다.
//! 두 형식을 모두 읽고, 보유 정보 없이 등록하면 `true`로 씁니다.

use crate::kv::KeyValueStore;
use crate::{StoreError, StoreResult};
use iris_core::{normalize_symbol, Holding, WatchlistEntry};
use iris_market::QuoteSource;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// 저장 형식
// ============================================================================

/// 보유 정보 저장 형식.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredHolding {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    average: Option<Decimal>,
}

/// 심볼 하나의 저장 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    /// 관심 등록만 됨
    Watch(bool),
    /// 보유 정보 포함
    Holding(StoredHolding),
}

impl StoredEntry {
    fn from_holding(holding: &Holding) -> Self {
        if holding.is_empty() {
            StoredEntry::Watch(true)
        } else {
            StoredEntry::Holding(StoredHolding {
                amount: holding.amount,
                average: holding.average_price,
            })
        }
    }

    fn to_holding(&self) -> Holding {
        match self {
            StoredEntry::Watch(_) => Holding::default(),
            StoredEntry::Holding(h) => Holding {
                amount: h.amount,
                average_price: h.average,
            },
        }
    }
}

type StoredWatchlist = BTreeMap<String, StoredEntry>;

// ============================================================================
// 저장소
// ============================================================================

/// 즐겨찾기 저장소.
///
/// 등록 시 심볼을 업비트 원화마켓 직접 조회로 검증합니다.
#[derive(Clone)]
pub struct WatchlistStore {
    kv: Arc<dyn KeyValueStore>,
    quotes: Arc<dyn QuoteSource>,
}

impl std::fmt::Debug for WatchlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchlistStore").finish_non_exhaustive()
    }
}

impl WatchlistStore {
    /// 새 저장소를 생성합니다.
    pub fn new(kv: Arc<dyn KeyValueStore>, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { kv, quotes }
    }

    /// 사용자의 저장 키.
    pub fn user_key(user_id: &str) -> String {
        format!("coin.{}", user_id)
    }

    async fn load(&self, user_id: &str) -> StoreResult<StoredWatchlist> {
        let key = Self::user_key(user_id);
        match self.kv.get_json(&key).await? {
            None | Some(serde_json::Value::Null) => Ok(StoredWatchlist::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                warn!(key, error = %e, "즐겨찾기 값 형식 오류");
                StoreError::Serialization(e.to_string())
            }),
        }
    }

    async fn save(&self, user_id: &str, watchlist: &StoredWatchlist) -> StoreResult<()> {
        let value = serde_json::to_value(watchlist)?;
        self.kv.put_json(&Self::user_key(user_id), &value).await
    }

    /// 코인을 등록합니다. 이미 있으면 통째로 교체합니다.
    ///
    /// 업비트 원화마켓 직접 조회가 실패하면 `UnknownSymbol`을 반환하고 저장소를 건드리지 않습니다.
    pub async fn add(
        &self,
        user_id: &str,
        symbol: &str,
        holding: Holding,
    ) -> StoreResult<WatchlistEntry> {
        let symbol = normalize_symbol(symbol);

        if let Err(e) = self.quotes.quote_direct(&symbol).await {
            debug!(%symbol, error = %e, "심볼 검증 실패");
            return Err(StoreError::UnknownSymbol(symbol));
        }

        let mut watchlist = self.load(user_id).await?;
        watchlist.insert(symbol.clone(), StoredEntry::from_holding(&holding));
        self.save(user_id, &watchlist).await?;

        info!(user_id, %symbol, "즐겨찾기 등록");
        Ok(WatchlistEntry::with_holding(user_id, &symbol, holding))
    }

    /// 코인을 삭제합니다. 없으면 `NotFound`.
    ///
    /// 마지막 코인을 지우면 사용자 키 자체를 삭제합니다.
    pub async fn remove(&self, user_id: &str, symbol: &str) -> StoreResult<()> {
        let symbol = normalize_symbol(symbol);
        let mut watchlist = self.load(user_id).await?;

        if watchlist.remove(&symbol).is_none() {
            return Err(StoreError::NotFound(symbol));
        }

        if watchlist.is_empty() {
            self.kv.delete(&Self::user_key(user_id)).await?;
        } else {
            self.save(user_id, &watchlist).await?;
        }
        info!(user_id, %symbol, "즐겨찾기 삭제");
        Ok(())
    }

    /// 사용자의 즐겨찾기 목록 (심볼 알파벳 순).
    pub async fn list(&self, user_id: &str) -> StoreResult<Vec<WatchlistEntry>> {
        Ok(self
            .load(user_id)
            .await?
            .iter()
            .map(|(symbol, stored)| WatchlistEntry::with_holding(user_id, symbol, stored.to_holding()))
            .collect())
    }

    /// 즐겨찾기 항목 하나를 조회합니다.
    pub async fn get(&self, user_id: &str, symbol: &str) -> StoreResult<Option<WatchlistEntry>> {
        let symbol = normalize_symbol(symbol);
        Ok(self
            .load(user_id)
            .await?
            .get(&symbol)
            .map(|stored| WatchlistEntry::with_holding(user_id, &symbol, stored.to_holding())))
    }
}
