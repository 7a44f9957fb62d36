//! 김치 프리미엄과 원화 환산.
//!
//! 업비트, 바이낸스, 환율 클라이언트를 조합합니다.

use crate::traits::QuoteSource;
use crate::{BinanceClient, FxClient, MarketError, MarketResult, UpbitClient};
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::US::Eastern;
use iris_core::{BinanceQuote, FxRate, KimchiPremium, TradingPair};
use rust_decimal::Decimal;
use tracing::debug;

/// 원화 대비 달러 가격의 프리미엄(%)을 계산합니다.
///
/// `(krw_price − usd_price × usd_krw) / (usd_price × usd_krw) × 100`
pub fn premium_percent(krw_price: Decimal, usd_price: Decimal, usd_krw: Decimal) -> Option<Decimal> {
    let converted = usd_price.checked_mul(usd_krw)?;
    if converted.is_zero() {
        return None;
    }
    let diff = krw_price - converted;
    Some(diff.checked_div(converted)? * Decimal::ONE_HUNDRED)
}

/// UTC 시각을 미국 동부 현지 시각으로 변환합니다.
pub fn eastern_time(now: DateTime<Utc>) -> NaiveDateTime {
    now.with_timezone(&Eastern).naive_local()
}

/// 여러 시세 소스를 조합하는 계산기.
#[derive(Debug, Clone)]
pub struct PremiumCalculator {
    upbit: UpbitClient,
    binance: BinanceClient,
    fx: FxClient,
}

impl PremiumCalculator {
    /// 새 계산기를 생성합니다.
    pub fn new(upbit: UpbitClient, binance: BinanceClient, fx: FxClient) -> Self {
        Self { upbit, binance, fx }
    }

    /// 현재 달러/원 환율.
    pub async fn usd_krw(&self) -> MarketResult<FxRate> {
        self.fx.usd_krw().await
    }

    /// BTC 김치 프리미엄을 계산합니다.
    pub async fn kimchi_premium(&self) -> MarketResult<KimchiPremium> {
        let binance_usdt = self.binance.price("BTCUSDT").await?;
        let upbit_krw = self.upbit.quote_direct("BTC").await?.price;
        let usd_krw = self.fx.usd_krw().await?.price;

        let premium = premium_percent(upbit_krw, binance_usdt, usd_krw)
            .ok_or_else(|| MarketError::MissingQuote("BTCUSDT × USDKRW".to_string()))?;
        debug!(%upbit_krw, %binance_usdt, %usd_krw, %premium, "김치 프리미엄 계산");

        Ok(KimchiPremium {
            upbit_krw,
            binance_usdt,
            usd_krw,
            premium_percent: premium,
            eastern_time: eastern_time(Utc::now()),
        })
    }

    /// 바이낸스 거래쌍 시세를 원화로 환산합니다.
    ///
    /// 김프 반영 가격은 업비트 BTC 원화 가격과 바이낸스 BTC 원화 환산 가격의 비율을 곱합니다.
    pub async fn binance_quote(&self, pair: &TradingPair) -> MarketResult<BinanceQuote> {
        let usd_krw = self.fx.usd_krw().await?.price;
        let price = self.binance.pair_price(pair).await?;
        let upbit_btc = self.upbit.quote_direct("BTC").await?.price;

        let krw_price = price.usd_price * usd_krw;
        let btc_converted = price.btc_usdt * usd_krw;
        if btc_converted.is_zero() {
            return Err(MarketError::MissingQuote("BTCUSDT".to_string()));
        }
        let krw_price_premium = upbit_btc / btc_converted * krw_price;

        Ok(BinanceQuote {
            pair: price.pair,
            usd_price: price.usd_price,
            krw_price,
            krw_price_premium,
            change_percent: price.change_percent,
            usd_krw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use rust_decimal_macros::dec;

    #[test]
    fn test_premium_percent() {
        // 60,000 USD × 1,300 = 78,000,000 원, 업비트 81,900,000 원 → 5%
        let p = premium_percent(dec!(81900000), dec!(60000), dec!(1300)).unwrap();
        assert_eq!(p, dec!(5));
    }

    #[test]
    fn test_premium_percent_zero_denominator() {
        assert!(premium_percent(dec!(1), dec!(0), dec!(1300)).is_none());
    }

    #[test]
    fn test_eastern_time_conversion() {
        // 1월은 EST (UTC-5)
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 17, 30, 0).unwrap();
        let est = eastern_time(utc);
        assert_eq!(est.hour(), 12);
        assert_eq!(est.minute(), 30);

        // 7월은 EDT (UTC-4)
        let utc = Utc.with_ymd_and_hms(2024, 7, 15, 17, 30, 0).unwrap();
        assert_eq!(eastern_time(utc).hour(), 13);
    }
}
