//! 주가 지수 시세 클라이언트.
//!
//! - 코스피/코스닥: 네이버 실시간 폴링 API (`SERVICE_INDEX:<code>`)
//! - 나스닥 종합: Nasdaq quote API (`info` + `summary`)

use crate::fx::parse_display_number;
use crate::{build_http_client, MarketError, MarketResult};
use iris_core::{Direction, IndexConfig, IndexQuote};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Nasdaq API는 브라우저 User-Agent가 아니면 응답하지 않음
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 국내 지수.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KoreanIndex {
    /// 코스피
    Kospi,
    /// 코스닥
    Kosdaq,
}

impl KoreanIndex {
    /// 네이버 API 지수 코드.
    pub fn code(&self) -> &'static str {
        match self {
            KoreanIndex::Kospi => "KOSPI",
            KoreanIndex::Kosdaq => "KOSDAQ",
        }
    }

    /// 한글 표시 이름.
    pub fn label(&self) -> &'static str {
        match self {
            KoreanIndex::Kospi => "코스피",
            KoreanIndex::Kosdaq => "코스닥",
        }
    }
}

impl fmt::Display for KoreanIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// 네이버 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
struct RealtimeResponse {
    result: RealtimeResult,
}

#[derive(Debug, Deserialize)]
struct RealtimeResult {
    #[serde(default)]
    areas: Vec<RealtimeArea>,
}

#[derive(Debug, Deserialize)]
struct RealtimeArea {
    #[serde(default)]
    datas: Vec<RealtimeData>,
}

/// 가격 필드는 100배 된 정수로 옴
#[derive(Debug, Deserialize)]
struct RealtimeData {
    nv: i64,
    #[serde(default)]
    cv: i64,
    #[serde(default)]
    cr: Decimal,
    #[serde(default)]
    rf: serde_json::Value,
    #[serde(default)]
    ov: i64,
    #[serde(default)]
    hv: i64,
    #[serde(default)]
    lv: i64,
}

impl RealtimeData {
    fn direction(&self) -> Direction {
        let flag = match &self.rf {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match flag.as_str() {
            "1" | "2" => Direction::Up,
            "4" | "5" => Direction::Down,
            _ => Direction::Flat,
        }
    }

    fn into_quote(self, index: KoreanIndex) -> IndexQuote {
        let scaled = |v: i64| Decimal::new(v, 2);
        let direction = self.direction();
        IndexQuote {
            code: index.code().to_string(),
            name: index.label().to_string(),
            price: scaled(self.nv),
            change: scaled(self.cv),
            change_percent: self.cr,
            open: scaled(self.ov),
            high: scaled(self.hv),
            low: scaled(self.lv),
            direction,
        }
    }
}

// ============================================================================
// Nasdaq 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
struct NasdaqEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    status: NasdaqStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NasdaqStatus {
    r_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NasdaqInfo {
    primary_data: NasdaqPrimary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NasdaqPrimary {
    last_sale_price: String,
    #[serde(default)]
    net_change: String,
    #[serde(default)]
    percentage_change: String,
    #[serde(default)]
    delta_indicator: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NasdaqSummary {
    summary_data: HashMap<String, NasdaqField>,
}

#[derive(Debug, Deserialize)]
struct NasdaqField {
    value: String,
}

// ============================================================================
// 클라이언트
// ============================================================================

/// 지수 시세 클라이언트.
#[derive(Debug, Clone)]
pub struct IndexClient {
    client: Client,
    naver_base_url: String,
    nasdaq_base_url: String,
}

impl IndexClient {
    /// 설정에서 클라이언트를 생성합니다.
    pub fn new(config: &IndexConfig) -> MarketResult<Self> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self::with_client(
            client,
            &config.naver_base_url,
            &config.nasdaq_base_url,
        ))
    }

    /// 준비된 HTTP 클라이언트로 생성합니다.
    pub fn with_client(client: Client, naver_base_url: &str, nasdaq_base_url: &str) -> Self {
        Self {
            client,
            naver_base_url: naver_base_url.trim_end_matches('/').to_string(),
            nasdaq_base_url: nasdaq_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        browser: bool,
    ) -> MarketResult<T> {
        debug!("GET {}", url);

        let mut request = self.client.get(url).query(params);
        if browser {
            request = request.header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT);
        }
        let response = request.send().await?;

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

    /// 국내 지수 시세를 조회합니다.
    pub async fn korean_index(&self, index: KoreanIndex) -> MarketResult<IndexQuote> {
        let url = format!("{}/api/realtime", self.naver_base_url);
        let query = format!("SERVICE_INDEX:{}", index.code());
        let payload: RealtimeResponse = self.get_json(&url, &[("query", &query)], false).await?;

        payload
            .result
            .areas
            .into_iter()
            .next()
            .and_then(|area| area.datas.into_iter().next())
            .map(|data| data.into_quote(index))
            .ok_or_else(|| MarketError::MissingQuote(index.code().to_string()))
    }

    /// 코스피와 코스닥 시세를 차례로 조회합니다.
    pub async fn korean_indices(&self) -> MarketResult<Vec<IndexQuote>> {
        let mut quotes = Vec::with_capacity(2);
        for index in [KoreanIndex::Kospi, KoreanIndex::Kosdaq] {
            quotes.push(self.korean_index(index).await?);
        }
        Ok(quotes)
    }

    async fn nasdaq_data<T: DeserializeOwned>(&self, kind: &str) -> MarketResult<T> {
        let url = format!("{}/api/quote/COMP/{}", self.nasdaq_base_url, kind);
        let envelope: NasdaqEnvelope<T> = self
            .get_json(&url, &[("assetclass", "index")], true)
            .await?;

        if let Some(code) = envelope.status.r_code {
            if code != 200 {
                return Err(MarketError::ApiError {
                    status: code.clamp(0, u16::MAX as i64) as u16,
                    message: format!("Nasdaq {} rCode {}", kind, code),
                });
            }
        }
        envelope
            .data
            .ok_or_else(|| MarketError::MissingQuote(format!("COMP {}", kind)))
    }

    /// 나스닥 종합지수 시세를 조회합니다.
    ///
    /// 시가 자리에는 전일 종가를 씁니다.
    pub async fn nasdaq_composite(&self) -> MarketResult<IndexQuote> {
        let info: NasdaqInfo = self.nasdaq_data("info").await?;
        let summary: NasdaqSummary = self.nasdaq_data("summary").await?;

        let field = |key: &str| -> MarketResult<Decimal> {
            summary
                .summary_data
                .get(key)
                .ok_or_else(|| MarketError::MissingQuote(key.to_string()))
                .and_then(|f| parse_display_number(&f.value))
        };

        let primary = info.primary_data;
        let direction = match primary.delta_indicator.to_lowercase().as_str() {
            "up" => Direction::Up,
            "down" => Direction::Down,
            _ => Direction::Flat,
        };

        Ok(IndexQuote {
            code: "COMP".to_string(),
            name: "나스닥".to_string(),
            price: parse_display_number(&primary.last_sale_price)?,
            change: parse_display_number(&primary.net_change).unwrap_or_default(),
            change_percent: parse_display_number(&primary.percentage_change).unwrap_or_default(),
            open: field("PreviousClose")?,
            high: field("TodaysHigh")?,
            low: field("TodaysLow")?,
            direction,
        })
    }
}
