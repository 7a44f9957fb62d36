//! 응답 문구 포맷.
//!
//! 모든 함수는 순수 함수이며 채팅방에 그대로 보낼 평문을 만듭니다.

use iris_core::{
    format_price, format_thousands, BinanceQuote, DecimalExt, FxRate, IndexQuote, KimchiPremium,
    PortfolioLine, Quote, Valuation,
};
use rust_decimal::Decimal;

/// 전체 시세 목록 머리말 뒤에 붙이는 폭 없는 공백 개수 (채팅 앱의 "전체 보기" 접힘용).
const FOLD_PADDING: usize = 500;

/// 즐겨찾기가 비었을 때의 안내.
pub const EMPTY_WATCHLIST: &str = "등록된 코인이 없습니다. !즐찾등록 기능으로 코인을 등록하세요.";

/// 부호를 항상 붙입니다 (0 이상이면 `+`).
fn signed(value: Decimal, dp: u32) -> String {
    let sign = if value >= Decimal::ZERO { "+" } else { "" };
    format!("{}{}", sign, format_thousands(value, dp))
}

/// 코인 시세 한 건.
///
/// ```text
/// BTC
/// 현재가 : 95,000,000원
/// 등락률 : 1.23%
/// ```
pub fn quote_reply(quote: &Quote) -> String {
    format!(
        "{}\n현재가 : {}원\n등락률 : {}%",
        quote.symbol,
        format_price(quote.price),
        format_thousands(quote.change_rate_percent, 2)
    )
}

/// 보유 포지션 평가 블록.
pub fn valuation_block(valuation: &Valuation) -> String {
    format!(
        "총평가금액 : {}원({}{}%)\n총매수금액 : {}원\n보유수량 : {}개\n평균단가 : {}원",
        format_thousands(valuation.total_value, 0),
        valuation.pnl_percent.sign_prefix(),
        format_thousands(valuation.pnl_percent, 1),
        format_thousands(valuation.total_cost, 0),
        format_price(valuation.amount),
        format_price(valuation.average_price),
    )
}

/// 시세와 (있으면) 평가 블록.
pub fn position_reply(quote: &Quote, valuation: Option<&Valuation>) -> String {
    match valuation {
        Some(v) => format!("{}\n{}", quote_reply(quote), valuation_block(v)),
        None => quote_reply(quote),
    }
}

/// 즐겨찾기 목록 응답.
///
/// 시세 조회에 실패한 심볼은 그 줄에만 실패를 표시합니다.
pub fn portfolio_reply(lines: &[PortfolioLine]) -> String {
    if lines.is_empty() {
        return EMPTY_WATCHLIST.to_string();
    }

    lines
        .iter()
        .map(|line| match line {
            PortfolioLine::Valued(position) => {
                let mut text = format!(
                    "{} {} 원 {} %",
                    position.quote.symbol,
                    format_price(position.quote.price),
                    format_thousands(position.quote.change_rate_percent, 2)
                );
                if let Some(v) = &position.valuation {
                    text.push_str(&format!(
                        "\n평가 {}원 ({}{}%)",
                        format_thousands(v.total_value, 0),
                        v.pnl_percent.sign_prefix(),
                        format_thousands(v.pnl_percent, 1)
                    ));
                }
                text
            }
            PortfolioLine::Failed { .. } => format!("{} 시세 조회 실패", line.symbol()),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 업비트 원화마켓 전체 시세.
pub fn market_board_reply(quotes: &[Quote]) -> String {
    let mut sections = Vec::with_capacity(quotes.len() + 1);
    sections.push(format!("업비트 원화시세\n{}", "\u{200b}".repeat(FOLD_PADDING)));
    sections.extend(quotes.iter().map(|q| {
        format!(
            "{}\n현재가 : {} 원\n등락률 : {} %",
            q.symbol,
            format_price(q.price),
            format_thousands(q.change_rate_percent, 2)
        )
    }));
    sections.join("\n\n")
}

/// 바이낸스 거래쌍 시세.
pub fn binance_reply(quote: &BinanceQuote) -> String {
    format!(
        "{}\nUSD : ${}\nKRW : ￦{}\nKRW(김프) : ￦{}\n등락률 : {}%\n환율 : ￦{}",
        quote.pair.exchange_symbol(),
        format_thousands(quote.usd_price, 6),
        format_thousands(quote.krw_price, 2),
        format_thousands(quote.krw_price_premium, 2),
        signed(quote.change_percent, 2),
        format_thousands(quote.usd_krw, 0),
    )
}

/// 김치 프리미엄.
pub fn kimchi_reply(premium: &KimchiPremium) -> String {
    let upbit_usd = premium
        .upbit_krw
        .checked_div(premium.usd_krw)
        .unwrap_or_default();
    let binance_krw = premium.binance_usdt * premium.usd_krw;

    format!(
        "김치 프리미엄\n업빗 : ￦{}(${})\n바낸 : ￦{}(${})\n김프 : {}%\n환율 : ￦{}\n버거시간(동부) : {}",
        format_thousands(premium.upbit_krw, 0),
        format_thousands(upbit_usd, 0),
        format_thousands(binance_krw, 0),
        format_thousands(premium.binance_usdt, 0),
        format_thousands(premium.premium_percent, 2),
        format_thousands(premium.usd_krw, 0),
        premium.eastern_time.format("%d일 %H시%M분"),
    )
}

/// 달러 → 원화 환산.
pub fn dollar_reply(amount: Decimal, rate: &FxRate) -> String {
    format!(
        "${} = {}원\n환율 : {}원",
        format_thousands(amount, 2),
        format_thousands(amount * rate.price, 2),
        format_thousands(rate.price, 2),
    )
}

/// 지수 시세 한 건.
pub fn index_reply(quote: &IndexQuote) -> String {
    let open_label = if quote.code == "COMP" { "전일" } else { "시가" };
    format!(
        "{}\n{}\n{} {} ({}%)\n{} {} / 고가 {} / 저가 {}",
        quote.name,
        format_thousands(quote.price, 2),
        quote.direction.arrow(),
        signed(quote.change, 2),
        signed(quote.change_percent, 2),
        open_label,
        format_thousands(quote.open, 2),
        format_thousands(quote.high, 2),
        format_thousands(quote.low, 2),
    )
}

/// 달러/원 환율 요약 (지수 응답 하단).
pub fn fx_panel(rate: &FxRate) -> String {
    format!(
        "달러/원\n{} KRW\n{} ({}%)",
        format_thousands(rate.price, 2),
        signed(rate.change, 2),
        signed(rate.change_percent, 2),
    )
}

/// 등록 완료.
pub fn added_reply(symbol: &str) -> String {
    format!("{} 코인을 등록했습니다.", symbol)
}

/// 삭제 완료.
pub fn removed_reply(symbol: &str) -> String {
    format!("{}코인을 삭제하였습니다.", symbol)
}

/// 도움말.
pub fn help_reply() -> String {
    [
        "사용 가능한 명령어",
        "",
        "!코인 [코인명] - 업비트 시세 (생략 시 전체)",
        "!즐 (!내코인) - 내 즐겨찾기 시세",
        "!즐찾등록 심볼 [수량 평단가] - 즐겨찾기 등록",
        "!즐찾삭제 심볼 - 즐겨찾기 삭제",
        "!바낸 BTC/USDT - 바이낸스 시세",
        "!김프 - 김치 프리미엄",
        "!달러 [금액] - 달러 환산",
        "!증시 - 코스피/코스닥",
        "!미 - 나스닥",
        "!요약 URL - 기사 요약",
        "!도움말 (!help) - 도움말",
    ]
    .join("\n")
}
