//! 정밀한 금액 계산과 표시를 위한 Decimal 유틸리티.

use rust_decimal::{Decimal, RoundingStrategy};

/// 가격 타입 (원화 또는 달러).
pub type Price = Decimal;

/// 보유 수량 타입.
pub type Quantity = Decimal;

/// 퍼센트 타입 (5.25 = 5.25%).
pub type Percentage = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 양수인지 확인합니다.
    fn is_positive(&self) -> bool;

    /// 지정된 소수점 자릿수로 반올림합니다 (0.5는 0에서 먼 쪽으로).
    fn round_half_away(&self, dp: u32) -> Decimal;

    /// 부호 기호를 반환합니다. 양수면 "+", 그 외에는 빈 문자열.
    fn sign_prefix(&self) -> &'static str;
}

impl DecimalExt for Decimal {
    fn is_positive(&self) -> bool {
        *self > Decimal::ZERO
    }

    fn round_half_away(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }

    fn sign_prefix(&self) -> &'static str {
        if DecimalExt::is_positive(self) {
            "+"
        } else {
            ""
        }
    }
}

/// 정수부에 천 단위 구분 기호를 넣습니다.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 부호, 정수부, 소수부로 나뉜 문자열을 구분 기호와 함께 조립합니다.
fn assemble(text: &str) -> String {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// 고정 소수점 자릿수와 천 단위 구분 기호로 표시합니다.
///
/// `format_thousands(dec!(1234567.891), 2)` → `"1,234,567.89"`
pub fn format_thousands(value: Decimal, dp: u32) -> String {
    let rounded = value.round_half_away(dp);
    let text = format!("{:.*}", dp as usize, rounded);
    // 반올림 결과가 -0 이면 부호를 떼어냄
    if rounded.is_zero() {
        return assemble(text.trim_start_matches('-'));
    }
    assemble(&text)
}

/// 시세 가격을 표시합니다.
///
/// 소수부가 없으면 정수로, 있으면 의미 있는 자릿수까지만 표시합니다.
/// `95000000` → `"95,000,000"`, `0.0123` → `"0.0123"`
pub fn format_price(value: Decimal) -> String {
    let normalized = value.normalize();
    assemble(&normalized.to_string())
}
