//! 코인 외 시장 지표 (바이낸스, 김치 프리미엄, 환율, 지수).

use crate::types::{Percentage, Price, TradingPair};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 업비트 마켓 목록의 한 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInfo {
    /// 마켓 코드 (예: KRW-BTC)
    pub market: String,
    /// 한글 이름 (예: 비트코인)
    pub korean_name: String,
    /// 영문 이름 (예: Bitcoin)
    pub english_name: String,
}

/// 바이낸스 거래쌍 시세를 원화로 환산한 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinanceQuote {
    /// 거래쌍
    pub pair: TradingPair,
    /// 달러 가격
    pub usd_price: Price,
    /// 환율로 환산한 원화 가격
    pub krw_price: Price,
    /// 김치 프리미엄을 반영한 원화 가격
    pub krw_price_premium: Price,
    /// 24시간 등락률 (%)
    pub change_percent: Percentage,
    /// 달러/원 환율
    pub usd_krw: Price,
}

/// 김치 프리미엄.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KimchiPremium {
    /// 업비트 BTC 원화 가격
    pub upbit_krw: Price,
    /// 바이낸스 BTC 달러(USDT) 가격
    pub binance_usdt: Price,
    /// 달러/원 환율
    pub usd_krw: Price,
    /// 프리미엄 (%)
    pub premium_percent: Percentage,
    /// 미국 동부 현지 시각
    pub eastern_time: NaiveDateTime,
}

/// 달러/원 환율.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRate {
    /// 매매기준율
    pub price: Price,
    /// 전일 대비
    pub change: Price,
    /// 전일 대비 (%)
    pub change_percent: Percentage,
}

/// 지수 등락 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// 상승
    Up,
    /// 하락
    Down,
    /// 보합
    Flat,
}

impl Direction {
    /// 방향 기호.
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Flat => "-",
        }
    }
}

/// 주가 지수 시세.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    /// 지수 코드 (KOSPI, KOSDAQ, COMP)
    pub code: String,
    /// 표시 이름
    pub name: String,
    /// 현재가
    pub price: Price,
    /// 전일 대비
    pub change: Price,
    /// 등락률 (%)
    pub change_percent: Percentage,
    /// 시가 또는 전일 종가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 등락 방향
    pub direction: Direction,
}
