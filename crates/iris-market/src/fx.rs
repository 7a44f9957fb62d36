//! 달러/원 환율 클라이언트 (네이버 증권 시장지표 API).

use crate::{build_http_client, MarketError, MarketResult};
use iris_core::{FxConfig, FxRate};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeResponse {
    #[serde(default)]
    normal_list: Vec<ExchangeItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeItem {
    exchange_code: String,
    close_price: String,
    #[serde(default)]
    fluctuations: String,
    #[serde(default)]
    fluctuations_ratio: String,
}

/// 표시용 숫자 문자열을 Decimal로 변환합니다.
///
/// `"1,380.50"`, `"+0.70%"`, `"$17,754.09"` 같은 형식을 처리합니다.
pub fn parse_display_number(text: &str) -> MarketResult<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | '$' | '+' | ' '))
        .collect();
    if cleaned.is_empty() || cleaned == "--" {
        return Err(MarketError::ParseError(format!("숫자가 아님: '{}'", text)));
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|e| MarketError::ParseError(format!("'{}': {}", text, e)))
}

/// 환율 클라이언트.
#[derive(Debug, Clone)]
pub struct FxClient {
    client: Client,
    base_url: String,
}

impl FxClient {
    /// 설정에서 클라이언트를 생성합니다.
    pub fn new(config: &FxConfig) -> MarketResult<Self> {
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

    /// 현재 달러/원 환율을 조회합니다.
    pub async fn usd_krw(&self) -> MarketResult<FxRate> {
        let url = format!("{}/marketindex/exchange", self.base_url);
        debug!("GET {}?code=FX_USDKRW", url);

        let response = self
            .client
            .get(&url)
            .query(&[("code", "FX_USDKRW")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: ExchangeResponse = response.json().await?;
        let item = payload
            .normal_list
            .into_iter()
            .find(|i| i.exchange_code == "USD")
            .ok_or_else(|| MarketError::MissingQuote("USD/KRW".to_string()))?;

        Ok(FxRate {
            price: parse_display_number(&item.close_price)?,
            change: parse_display_number(&item.fluctuations).unwrap_or_default(),
            change_percent: parse_display_number(&item.fluctuations_ratio).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_display_number() {
        assert_eq!(parse_display_number("1,380.50").unwrap(), dec!(1380.50));
        assert_eq!(parse_display_number("+0.70%").unwrap(), dec!(0.70));
        assert_eq!(parse_display_number("$17,754.09").unwrap(), dec!(17754.09));
        assert_eq!(parse_display_number("-2.5").unwrap(), dec!(-2.5));
        assert!(parse_display_number("--").is_err());
        assert!(parse_display_number("").is_err());
    }

    #[tokio::test]
    async fn test_usd_krw_picks_usd_entry() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/marketindex/exchange")
            .match_query(mockito::Matcher::UrlEncoded("code".into(), "FX_USDKRW".into()))
            .with_status(200)
            .with_body(
                r#"{"normalList":[
                    {"exchangeCode":"JPY","closePrice":"920.00","fluctuations":"1.00","fluctuationsRatio":"0.10"},
                    {"exchangeCode":"USD","closePrice":"1,380.50","fluctuations":"-2.50","fluctuationsRatio":"-0.18"}
                ]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = FxClient::with_client(Client::new(), &server.url());
        let rate = client.usd_krw().await.unwrap();

        assert_eq!(rate.price, dec!(1380.50));
        assert_eq!(rate.change, dec!(-2.50));
        assert_eq!(rate.change_percent, dec!(-0.18));
        m.assert_async().await;
    }
}
