//! 바이낸스 현물 시세 클라이언트.
//!
//! 인증이 필요 없는 공개 ticker API만 사용합니다.

use crate::{build_http_client, MarketError, MarketResult};
use iris_core::{BinanceConfig, TradingPair};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

// ============================================================================
// API 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24hr {
    symbol: String,
    last_price: Decimal,
    price_change_percent: Decimal,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct BinanceErrorBody {
    code: i64,
    msg: String,
}

/// 거래쌍의 달러 환산 시세.
#[derive(Debug, Clone, PartialEq)]
pub struct PairPrice {
    /// 거래쌍
    pub pair: TradingPair,
    /// 달러(USDT) 환산 가격
    pub usd_price: Decimal,
    /// 24시간 등락률 (%)
    pub change_percent: Decimal,
    /// 같은 응답의 BTCUSDT 가격
    pub btc_usdt: Decimal,
}

// ============================================================================
// 클라이언트
// ============================================================================

/// 바이낸스 공개 시세 클라이언트.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    /// 설정에서 클라이언트를 생성합니다.
    pub fn new(config: &BinanceConfig) -> MarketResult<Self> {
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

    /// 공개 API GET 요청.
    async fn public_get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> MarketResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        match serde_json::from_str::<BinanceErrorBody>(&body) {
            Ok(err) => Err(MarketError::ApiError {
                status: status.as_u16(),
                message: format!("{} ({})", err.msg, err.code),
            }),
            Err(_) => Err(MarketError::ApiError {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    /// 단일 심볼의 현재가 (`/api/v3/ticker/price`).
    pub async fn price(&self, symbol: &str) -> MarketResult<Decimal> {
        let ticker: TickerPrice = self
            .public_get("/api/v3/ticker/price", &[("symbol", symbol)])
            .await?;
        Ok(ticker.price)
    }

    /// 거래쌍의 달러 환산 가격을 24시간 ticker 한 번으로 계산합니다.
    ///
    /// 호가 자산이 스테이블 코인이 아니면 `<QUOTE>USDT` 가격으로 환산합니다.
    pub async fn pair_price(&self, pair: &TradingPair) -> MarketResult<PairPrice> {
        let tickers: Vec<Ticker24hr> = self.public_get("/api/v3/ticker/24hr", &[]).await?;
        Self::resolve_pair(pair, &tickers)
    }

    fn resolve_pair(pair: &TradingPair, tickers: &[Ticker24hr]) -> MarketResult<PairPrice> {
        let find = |symbol: &str| tickers.iter().find(|t| t.symbol == symbol);
        let not_found = || MarketError::SymbolNotFound(pair.to_string());

        let btc_usdt = find("BTCUSDT").ok_or_else(not_found)?.last_price;
        let ticker = find(&pair.exchange_symbol()).ok_or_else(not_found)?;

        let usd_price = if pair.is_stable_quote() {
            ticker.last_price
        } else {
            let to_usdt = find(&format!("{}USDT", pair.quote)).ok_or_else(not_found)?;
            ticker.last_price * to_usdt.last_price
        };

        Ok(PairPrice {
            pair: pair.clone(),
            usd_price,
            change_percent: ticker.price_change_percent,
            btc_usdt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tickers() -> Vec<Ticker24hr> {
        serde_json::from_str(
            r#"[
            {"symbol":"BTCUSDT","lastPrice":"60000.00","priceChangePercent":"1.500"},
            {"symbol":"BNBUSDT","lastPrice":"500.00","priceChangePercent":"-0.500"},
            {"symbol":"IQBNB","lastPrice":"0.00001000","priceChangePercent":"3.000"}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_stable_quote_taken_as_is() {
        let pair = TradingPair::parse("btc/usdt").unwrap();
        let price = BinanceClient::resolve_pair(&pair, &tickers()).unwrap();
        assert_eq!(price.usd_price, dec!(60000));
        assert_eq!(price.change_percent, dec!(1.5));
        assert_eq!(price.btc_usdt, dec!(60000));
    }

    #[test]
    fn test_non_stable_quote_converted_through_usdt() {
        let pair = TradingPair::parse("IQ/BNB").unwrap();
        let price = BinanceClient::resolve_pair(&pair, &tickers()).unwrap();
        assert_eq!(price.usd_price, dec!(0.005));
    }

    #[test]
    fn test_unknown_pair() {
        let pair = TradingPair::parse("NOPE/USDT").unwrap();
        let err = BinanceClient::resolve_pair(&pair, &tickers()).unwrap_err();
        assert!(matches!(err, MarketError::SymbolNotFound(_)));
    }

    #[tokio::test]
    async fn test_error_body_mapped() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v3/ticker/price")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
            .create_async()
            .await;

        let client = BinanceClient::with_client(Client::new(), &server.url());
        let err = client.price("NOPE").await.unwrap_err();
        match err {
            MarketError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("Invalid symbol"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
