//! 보유 포지션 평가.
//!
//! 즐겨찾기 항목의 보유 정보와 실시간 시세를 합쳐 평가금액과 손익률을 계산합니다:
//! - `Valuation` - 평가금액, 매수금액, 손익률
//! - `Position` - 항목 + 시세 + 평가 결과
//! - `PortfolioLine` - 일괄 조회의 한 줄 (성공 또는 심볼별 실패)

use crate::domain::{Quote, WatchlistEntry};
use crate::types::{DecimalExt, Percentage, Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 보유 포지션 평가 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// 총평가금액 (원 단위로 반올림)
    pub total_value: Price,
    /// 총매수금액
    pub total_cost: Price,
    /// 손익률 (%), 소수 첫째 자리까지
    pub pnl_percent: Percentage,
    /// 보유 수량
    pub amount: Quantity,
    /// 평균 매수 단가
    pub average_price: Price,
}

/// 시세가 반영된 즐겨찾기 포지션.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// 즐겨찾기 항목
    pub entry: WatchlistEntry,
    /// 실시간 시세
    pub quote: Quote,
    /// 평가 결과 (보유 정보가 없으면 `None`)
    pub valuation: Option<Valuation>,
}

impl Position {
    /// 항목과 시세로 포지션을 만듭니다.
    pub fn new(entry: WatchlistEntry, quote: Quote) -> Self {
        let valuation = Self::evaluate(&entry, &quote);
        Self {
            entry,
            quote,
            valuation,
        }
    }

    /// 평가금액과 손익률을 계산합니다.
    ///
    /// 수량이나 평단가가 없거나 0이면 `None`을 반환하며 실패하지 않습니다.
    /// 손익률은 반올림된 평가금액으로 계산합니다.
    pub fn evaluate(entry: &WatchlistEntry, quote: &Quote) -> Option<Valuation> {
        let (amount, average_price) = entry.holding.valued()?;

        let total_value = quote.price.checked_mul(amount)?.round_half_away(0);
        let total_cost = average_price.checked_mul(amount)?;
        let ratio = total_value.checked_div(total_cost)?;
        let pnl_percent = ((ratio - Decimal::ONE) * Decimal::ONE_HUNDRED).round_half_away(1);

        Some(Valuation {
            total_value,
            total_cost,
            pnl_percent,
            amount,
            average_price,
        })
    }
}

/// 일괄 조회 결과의 한 줄.
///
/// 한 심볼의 시세 조회 실패가 다른 심볼의 평가를 막지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioLine {
    /// 시세 조회 성공
    Valued(Position),
    /// 시세 조회 실패
    Failed {
        /// 실패한 심볼
        symbol: String,
        /// 실패 사유
        reason: String,
    },
}

impl PortfolioLine {
    /// 이 줄의 심볼.
    pub fn symbol(&self) -> &str {
        match self {
            PortfolioLine::Valued(position) => &position.entry.symbol,
            PortfolioLine::Failed { symbol, .. } => symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Holding;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn entry(amount: Option<Decimal>, average: Option<Decimal>) -> WatchlistEntry {
        WatchlistEntry::with_holding(
            "7",
            "BTC",
            Holding {
                amount,
                average_price: average,
            },
        )
    }

    #[test]
    fn test_evaluate_profit() {
        let quote = Quote::new("BTC", dec!(150), dec!(1.5));
        let v = Position::evaluate(&entry(Some(dec!(2)), Some(dec!(100))), &quote).unwrap();

        assert_eq!(v.total_value, dec!(300));
        assert_eq!(v.total_cost, dec!(200));
        assert_eq!(v.pnl_percent, dec!(50.0));
    }

    #[test]
    fn test_evaluate_rounds_total_value_first() {
        // 0.5 × 101 = 50.5 → 51, 손익률은 51 / 50 기준
        let quote = Quote::new("XRP", dec!(101), dec!(0));
        let v = Position::evaluate(&entry(Some(dec!(0.5)), Some(dec!(100))), &quote).unwrap();

        assert_eq!(v.total_value, dec!(51));
        assert_eq!(v.total_cost, dec!(50.0));
        assert_eq!(v.pnl_percent, dec!(2.0));
    }

    #[test]
    fn test_evaluate_loss() {
        let quote = Quote::new("ETH", dec!(90), dec!(-3));
        let v = Position::evaluate(&entry(Some(dec!(3)), Some(dec!(120))), &quote).unwrap();

        assert_eq!(v.total_value, dec!(270));
        assert_eq!(v.total_cost, dec!(360));
        assert_eq!(v.pnl_percent, dec!(-25.0));
    }

    #[test]
    fn test_missing_or_zero_holding_suppresses_valuation() {
        let quote = Quote::new("BTC", dec!(150), dec!(0));
        assert!(Position::evaluate(&entry(None, None), &quote).is_none());
        assert!(Position::evaluate(&entry(Some(dec!(2)), None), &quote).is_none());
        assert!(Position::evaluate(&entry(Some(dec!(0)), Some(dec!(100))), &quote).is_none());
        assert!(Position::evaluate(&entry(Some(dec!(2)), Some(dec!(0))), &quote).is_none());
    }

    #[test]
    fn test_portfolio_line_symbol() {
        let quote = Quote::new("BTC", dec!(150), dec!(0));
        let valued = PortfolioLine::Valued(Position::new(entry(None, None), quote));
        let failed = PortfolioLine::Failed {
            symbol: "DOGE".to_string(),
            reason: "timeout".to_string(),
        };
        assert_eq!(valued.symbol(), "BTC");
        assert_eq!(failed.symbol(), "DOGE");
    }

    proptest! {
        #[test]
        fn prop_cost_is_average_times_amount(
            amount_units in 1u64..1_000_000,
            avg in 1u64..1_000_000_000,
            price in 1u64..1_000_000_000,
        ) {
            let amount = Decimal::new(amount_units as i64, 4);
            let quote = Quote::new("BTC", Decimal::from(price), Decimal::ZERO);
            let e = entry(Some(amount), Some(Decimal::from(avg)));
            let v = Position::evaluate(&e, &quote).unwrap();

            prop_assert_eq!(v.total_cost, Decimal::from(avg) * amount);
            prop_assert_eq!(v.total_value, v.total_value.round_half_away(0));
            prop_assert_eq!(v.pnl_percent, v.pnl_percent.round_half_away(1));
        }

        #[test]
        fn prop_pnl_sign_follows_price(
            amount in 1u64..10_000,
            avg in 1u64..1_000_000,
            price in 1u64..1_000_000,
        ) {
            let quote = Quote::new("BTC", Decimal::from(price), Decimal::ZERO);
            let e = entry(Some(Decimal::from(amount)), Some(Decimal::from(avg)));
            let v = Position::evaluate(&e, &quote).unwrap();

            if price == avg {
                prop_assert_eq!(v.pnl_percent, Decimal::ZERO);
            } else if price > avg {
                prop_assert!(v.pnl_percent >= Decimal::ZERO);
            } else {
                prop_assert!(v.pnl_percent <= Decimal::ZERO);
            }
        }
    }
}
