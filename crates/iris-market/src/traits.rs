//! 코인 시세 조회 trait 정의.

use async_trait::async_trait;
use iris_core::Quote;

use crate::MarketResult;

/// 원화마켓 코인 시세 조회 인터페이스.
///
/// 즐겨찾기 저장소의 심볼 검증과 명령어 처리기가 이 trait을 통해 시세를 조회합니다.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 심볼 또는 한글 이름으로 시세를 조회합니다.
    async fn quote(&self, query: &str) -> MarketResult<Quote>;

    /// 심볼 코드로만 시세를 조회합니다 (HTTP 요청 1회).
    async fn quote_direct(&self, symbol: &str) -> MarketResult<Quote>;

    /// 여러 심볼의 시세를 한 번에 조회합니다.
    ///
    /// 응답에 없는 심볼은 결과에서 빠집니다.
    async fn quotes(&self, symbols: &[String]) -> MarketResult<Vec<Quote>>;

    /// 모든 원화마켓 시세 (등락률 내림차순).
    async fn market_quotes(&self) -> MarketResult<Vec<Quote>>;
}
