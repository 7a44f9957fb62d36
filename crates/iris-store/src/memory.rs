//! 인메모리 키-값 저장소.
//!
//! 테스트와 Redis 없이 실행하는 CLI 모드에서 사용합니다.

use crate::kv::KeyValueStore;
use crate::StoreResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// 프로세스 메모리에 값을 보관하는 저장소.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 수행된 쓰기(저장, 삭제) 횟수.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// 저장된 키 개수.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// 비어 있는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_json(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put_json(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.write().await.remove(key).is_some())
    }
}
