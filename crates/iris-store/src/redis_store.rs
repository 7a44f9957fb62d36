//! Redis 키-값 저장소.

use crate::kv::KeyValueStore;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use iris_core::RedisConfig;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Redis 연결 래퍼.
///
/// 값은 JSON 문자열로 저장하며 TTL을 두지 않습니다.
#[derive(Clone)]
pub struct RedisStore {
    connection: Arc<RwLock<MultiplexedConnection>>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

impl RedisStore {
    /// 새 Redis 연결을 생성합니다.
    pub async fn connect(config: &RedisConfig) -> StoreResult<Self> {
        info!("Connecting to Redis...");

        let client = Client::open(config.url.as_str())?;
        let connection = tokio::time::timeout(
            Duration::from_secs(config.connection_timeout_secs),
            client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| StoreError::Backend("Redis 연결 타임아웃".to_string()))??;

        info!("Redis connection established");

        Ok(Self {
            connection: Arc::new(RwLock::new(connection)),
        })
    }

    /// Redis 상태를 확인합니다.
    pub async fn health_check(&self) -> StoreResult<bool> {
        let mut conn = self.connection.write().await;
        let result: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(result == "PONG")
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get_json(&self, key: &str) -> StoreResult<Option<Value>> {
        let mut conn = self.connection.write().await;
        let value: Option<String> = conn.get(key).await?;
        debug!(key, hit = value.is_some(), "Redis GET");

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put_json(&self, key: &str, value: &Value) -> StoreResult<()> {
        let json = serde_json::to_string(value)?;
        let mut conn = self.connection.write().await;
        let _: () = conn.set(key, json).await?;
        debug!(key, "Redis SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.connection.write().await;
        let deleted: i64 = conn.del(key).await?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    #[ignore] // 실행 중인 Redis 필요
    async fn test_redis_roundtrip() {
        let store = RedisStore::connect(&RedisConfig::default()).await.unwrap();
        assert!(store.health_check().await.unwrap());

        store.put_json("coin.test", &json!({"BTC": true})).await.unwrap();
        assert_eq!(
            store.get_json("coin.test").await.unwrap(),
            Some(json!({"BTC": true}))
        );
        assert!(store.delete("coin.test").await.unwrap());
    }
}
