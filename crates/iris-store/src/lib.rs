//! 키-값 저장소와 사용자별 즐겨찾기 코인 저장소.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - KeyValueStore trait: JSON 값을 저장하는 키-값 인터페이스
//! - Redis 구현과 인메모리 구현
//! - WatchlistStore: `coin.<user_id>` 키에 사용자별 코인 목록 저장

pub mod error;
pub mod kv;
pub mod memory;
pub mod redis_store;
pub mod watchlist;

pub use error::*;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use watchlist::WatchlistStore;
