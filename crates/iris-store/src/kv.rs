//! 키-값 저장소 trait 정의.

use crate::StoreResult;
use async_trait::async_trait;
use serde_json::Value;

/// JSON 값을 저장하는 키-값 저장소.
///
/// 만료 시간 없이 저장하며, 같은 키에 대한 쓰기는 마지막 쓰기가 이깁니다.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 키의 값을 읽습니다. 없으면 `None`.
    async fn get_json(&self, key: &str) -> StoreResult<Option<Value>>;

    /// 키에 값을 씁니다.
    async fn put_json(&self, key: &str, value: &Value) -> StoreResult<()>;

    /// 키를 삭제합니다. 삭제된 키가 있었으면 `true`.
    async fn delete(&self, key: &str) -> StoreResult<bool>;
}
