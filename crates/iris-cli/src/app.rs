//! 설정에서 봇 구성 요소를 조립합니다.

use anyhow::{bail, Context, Result};
use iris_bot::CommandRouter;
use iris_content::UrlSummaryService;
use iris_core::AppConfig;
use iris_market::{BinanceClient, FxClient, IndexClient, PremiumCalculator, QuoteSource, UpbitClient};
use iris_store::{KeyValueStore, MemoryStore, RedisStore, WatchlistStore};
use std::sync::Arc;
use tracing::{info, warn};

/// 즐겨찾기 저장소 백엔드 선택.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// 설정의 Redis 서버 (재시작 후에도 유지)
    Redis,
    /// 프로세스 종료 시 사라지는 인메모리 저장소
    Memory,
}

/// 키-값 저장소를 연결합니다.
pub async fn connect_store(config: &AppConfig, backend: StoreBackend) -> Result<Arc<dyn KeyValueStore>> {
    match backend {
        StoreBackend::Memory => {
            warn!("인메모리 저장소 사용 (재시작 시 즐겨찾기가 사라집니다)");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Redis => {
            let store = RedisStore::connect(&config.redis)
                .await
                .with_context(|| format!("Redis 연결 실패: {}", config.redis.url))?;
            if !store.health_check().await.context("Redis PING 실패")? {
                bail!("Redis PING 응답이 올바르지 않습니다: {}", config.redis.url);
            }
            Ok(Arc::new(store))
        }
    }
}

/// 설정으로 명령어 라우터를 조립합니다.
pub async fn build_router(config: &AppConfig, backend: StoreBackend) -> Result<CommandRouter> {
    let upbit = UpbitClient::new(&config.upbit).context("업비트 클라이언트 생성 실패")?;
    let binance = BinanceClient::new(&config.binance).context("바이낸스 클라이언트 생성 실패")?;
    let fx = FxClient::new(&config.fx).context("환율 클라이언트 생성 실패")?;
    let indices = IndexClient::new(&config.index).context("지수 클라이언트 생성 실패")?;

    let quotes: Arc<dyn QuoteSource> = Arc::new(upbit.clone());
    let kv = connect_store(config, backend).await?;
    let watchlist = WatchlistStore::new(kv, quotes.clone());
    let premium = PremiumCalculator::new(upbit, binance, fx);

    let summaries =
        UrlSummaryService::from_config(config).context("URL 요약 서비스 생성 실패")?;

    info!(?backend, "봇 구성 완료");
    Ok(
        CommandRouter::new(quotes, watchlist, premium, indices, Arc::new(summaries))
            .with_config(&config.bot),
    )
}
