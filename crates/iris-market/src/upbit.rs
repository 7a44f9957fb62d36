//! 업비트 원화마켓 시세 클라이언트.
//!
//! 심볼 코드로 먼저 조회하고, 실패하면 마켓 목록에서 한글 이름으로 검색합니다.
//!
//! - 직접 조회: `GET /v1/ticker?markets=KRW-<SYMBOL>` 1회
//! - 한글명 검색: 직접 조회 실패 → `GET /v1/market/all` → 찾은 마켓의 ticker 조회

use crate::traits::QuoteSource;
use crate::{build_http_client, MarketError, MarketResult};
use async_trait::async_trait;
use iris_core::{krw_market, normalize_symbol, symbol_from_krw_market, MarketInfo, Quote, UpbitConfig};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

// ============================================================================
// API 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
struct UpbitTicker {
    market: String,
    trade_price: Decimal,
    signed_change_rate: Decimal,
}

impl UpbitTicker {
    fn into_quote(self) -> Quote {
        let symbol = symbol_from_krw_market(&self.market)
            .unwrap_or(&self.market)
            .to_string();
        Quote::new(symbol, self.trade_price, self.signed_change_rate * Decimal::ONE_HUNDRED)
    }
}

// ============================================================================
// 클라이언트
// ============================================================================

/// 업비트 시세 클라이언트.
#[derive(Debug, Clone)]
pub struct UpbitClient {
    client: Client,
    base_url: String,
}

impl UpbitClient {
    /// 설정에서 클라이언트를 생성합니다.
    pub fn new(config: &UpbitConfig) -> MarketResult<Self> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// 준비된 HTTP 클라이언트로 생성합니다.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// ticker API를 호출합니다.
    ///
    /// 에러 상태 코드, 본문의 `error` 필드, 빈 배열은 모두 실패로 취급합니다.
    async fn fetch_tickers(&self, markets: &str) -> MarketResult<Vec<UpbitTicker>> {
        let url = format!("{}/v1/ticker", self.base_url);
        debug!("GET {}?markets={}", url, markets);

        let response = self
            .client
            .get(&url)
            .query(&[("markets", markets)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() || body.contains("\"error\"") {
            return Err(MarketError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let tickers: Vec<UpbitTicker> = serde_json::from_str(&body)?;
        if tickers.is_empty() {
            return Err(MarketError::MissingQuote(markets.to_string()));
        }
        Ok(tickers)
    }

    /// 업비트 전체 마켓 목록을 조회합니다.
    pub async fn market_directory(&self) -> MarketResult<Vec<MarketInfo>> {
        let url = format!("{}/v1/market/all", self.base_url);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// 한글 이름으로 원화마켓을 찾습니다.
    ///
    /// 이름이 정확히 같으면 바로 선택하고, 그렇지 않으면 이름에 검색어가
    /// 포함된 마지막 마켓을 선택합니다.
    pub fn find_by_korean_name<'a>(
        directory: &'a [MarketInfo],
        query: &str,
    ) -> Option<&'a MarketInfo> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let mut found = None;
        for info in directory
            .iter()
            .filter(|m| symbol_from_krw_market(&m.market).is_some())
        {
            if info.korean_name == query {
                return Some(info);
            }
            if info.korean_name.contains(query) {
                found = Some(info);
            }
        }
        found
    }

    /// 한글명 검색 경로: 마켓 목록 조회 후 찾은 마켓의 시세를 조회합니다.
    async fn quote_by_korean_name(&self, query: &str) -> MarketResult<Quote> {
        let directory = self.market_directory().await?;
        let info = Self::find_by_korean_name(&directory, query)
            .ok_or_else(|| MarketError::SymbolNotFound(query.to_string()))?;

        debug!(query, market = %info.market, "한글명으로 마켓 찾음");

        self.fetch_tickers(&info.market)
            .await?
            .into_iter()
            .next()
            .map(UpbitTicker::into_quote)
            .ok_or_else(|| MarketError::SymbolNotFound(query.to_string()))
    }

    /// 모든 원화마켓 시세를 등락률 내림차순으로 조회합니다.
    pub async fn krw_market_quotes(&self) -> MarketResult<Vec<Quote>> {
        let markets: Vec<String> = self
            .market_directory()
            .await?
            .into_iter()
            .filter(|m| symbol_from_krw_market(&m.market).is_some())
            .map(|m| m.market)
            .collect();

        if markets.is_empty() {
            return Ok(Vec::new());
        }

        let mut quotes: Vec<Quote> = self
            .fetch_tickers(&markets.join(","))
            .await?
            .into_iter()
            .map(UpbitTicker::into_quote)
            .collect();

        quotes.sort_by(|a, b| b.change_rate_percent.cmp(&a.change_rate_percent));
        Ok(quotes)
    }
}

#[async_trait]
impl QuoteSource for UpbitClient {
    async fn quote(&self, query: &str) -> MarketResult<Quote> {
        match self.quote_direct(query).await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                warn!(query, error = %e, "직접 조회 실패, 한글명 검색으로 전환");
                self.quote_by_korean_name(query).await.map_err(|e| match e {
                    MarketError::SymbolNotFound(_) | MarketError::ApiError { .. } => {
                        MarketError::SymbolNotFound(query.to_string())
                    }
                    other => other,
                })
            }
        }
    }

    async fn quote_direct(&self, symbol: &str) -> MarketResult<Quote> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(MarketError::InvalidInput("빈 심볼".to_string()));
        }

        self.fetch_tickers(&krw_market(&symbol))
            .await?
            .into_iter()
            .next()
            .map(UpbitTicker::into_quote)
            .ok_or(MarketError::MissingQuote(symbol))
    }

    async fn quotes(&self, symbols: &[String]) -> MarketResult<Vec<Quote>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let markets = symbols
            .iter()
            .map(|s| krw_market(s))
            .collect::<Vec<_>>()
            .join(",");

        Ok(self
            .fetch_tickers(&markets)
            .await?
            .into_iter()
            .map(UpbitTicker::into_quote)
            .collect())
    }

    async fn market_quotes(&self) -> MarketResult<Vec<Quote>> {
        self.krw_market_quotes().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rust_decimal_macros::dec;

    fn directory() -> Vec<MarketInfo> {
        let raw = r#"[
            {"market":"KRW-BTC","korean_name":"비트코인","english_name":"Bitcoin"},
            {"market":"BTC-ETC","korean_name":"이더리움클래식","english_name":"Ethereum Classic"},
            {"market":"KRW-BCH","korean_name":"비트코인캐시","english_name":"Bitcoin Cash"},
            {"market":"KRW-ETC","korean_name":"이더리움클래식","english_name":"Ethereum Classic"},
            {"market":"KRW-ETH","korean_name":"이더리움","english_name":"Ethereum"}
        ]"#;
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_exact_korean_name_wins() {
        let dir = directory();
        let found = UpbitClient::find_by_korean_name(&dir, "비트코인").unwrap();
        assert_eq!(found.market, "KRW-BTC");
    }

    #[test]
    fn test_partial_korean_name_takes_last_match() {
        let dir = directory();
        let found = UpbitClient::find_by_korean_name(&dir, "이더").unwrap();
        assert_eq!(found.market, "KRW-ETH");
    }

    #[test]
    fn test_non_krw_markets_ignored() {
        let dir: Vec<MarketInfo> = serde_json::from_str(
            r#"[{"market":"BTC-ETC","korean_name":"이더리움클래식","english_name":"Ethereum Classic"}]"#,
        )
        .unwrap();
        assert!(UpbitClient::find_by_korean_name(&dir, "이더리움클래식").is_none());
        assert!(UpbitClient::find_by_korean_name(&directory(), "  ").is_none());
    }

    #[tokio::test]
    async fn test_krw_market_quotes_sorted_by_change() {
        let mut server = mockito::Server::new_async().await;
        let _dir = server
            .mock("GET", "/v1/market/all")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                {"market":"KRW-BTC","korean_name":"비트코인","english_name":"Bitcoin"},
                {"market":"BTC-ETH","korean_name":"이더리움","english_name":"Ethereum"},
                {"market":"KRW-XRP","korean_name":"리플","english_name":"Ripple"}
            ]"#,
            )
            .expect(1)
            .create_async()
            .await;
        let tickers = server
            .mock("GET", "/v1/ticker")
            .match_query(Matcher::UrlEncoded("markets".into(), "KRW-BTC,KRW-XRP".into()))
            .with_status(200)
            .with_body(
                r#"[
                {"market":"KRW-BTC","trade_price":95000000.0,"signed_change_rate":0.01},
                {"market":"KRW-XRP","trade_price":850.5,"signed_change_rate":0.05}
            ]"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = UpbitClient::with_client(Client::new(), &server.url());
        let quotes = client.krw_market_quotes().await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].symbol, "XRP");
        assert_eq!(quotes[0].change_rate_percent, dec!(5));
        assert_eq!(quotes[1].price, dec!(95000000));
        tickers.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_array_is_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/ticker")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = UpbitClient::with_client(Client::new(), &server.url());
        let err = client.quote_direct("BTC").await.unwrap_err();
        assert!(matches!(err, MarketError::MissingQuote(_)));
    }
}
