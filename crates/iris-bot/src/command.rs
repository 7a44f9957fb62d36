//! 봇 명령어 파싱.

use crate::message::{IncomingMessage, Sender};
use iris_core::{normalize_symbol, Holding, TradingPair};
use rust_decimal::Decimal;
use std::str::FromStr;

/// 기본 명령어 접두사.
pub const DEFAULT_PREFIX: &str = "!";

/// 즐겨찾기 등록 사용법.
pub const ADD_USAGE: &str = "\"!즐찾등록 코인명(영문심볼)\" 형태로 입력하세요.\n보유 정보 함께 등록: \"!즐찾등록 BTC 수량 평단가\"";

/// 즐겨찾기 삭제 사용법.
pub const REMOVE_USAGE: &str = "\"!즐찾삭제 코인명(영문심볼)\"으로 입력하세요.";

/// 바이낸스 조회 사용법 (거래쌍 형식 오류 포함).
pub const BINANCE_USAGE: &str = "코인이 정확하지 않거나 오류가 발생하였습니다. 코인심볼과 화폐단위를 함께 적어주세요. 예시 : BTC/USDT, ETC/USDT, IQ/BNB";

/// 달러 환산 사용법.
pub const DOLLAR_USAGE: &str = "\"!달러 금액\" 형태로 입력하세요. 예시 : !달러 100";

/// 요약 사용법.
pub const SUMMARY_USAGE: &str = "\"!요약 URL\" 형태로 입력하세요.";

/// 즐겨찾기 등록 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteRequest {
    /// 대문자 심볼
    pub symbol: String,
    /// 보유 정보 (없으면 관심 등록만)
    pub holding: Holding,
}

/// 봇 명령어 타입.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// 코인 시세 (검색어 없으면 전체 원화마켓)
    Coin { query: Option<String> },
    /// 내 즐겨찾기 코인 시세
    MyCoins,
    /// 즐겨찾기 등록
    AddFavorite(FavoriteRequest),
    /// 즐겨찾기 삭제
    RemoveFavorite { symbol: String },
    /// 바이낸스 거래쌍 시세
    Binance { pair: TradingPair },
    /// 김치 프리미엄
    KimchiPremium,
    /// 달러 → 원화 환산
    Dollar { amount: Decimal },
    /// 코스피/코스닥
    KoreanIndices,
    /// 나스닥
    Nasdaq,
    /// URL 요약
    Summarize { text: String },
    /// 도움말
    Help,
    /// 인자가 잘못된 명령 (사용법 문구)
    Usage(&'static str),
    /// 명령어가 아닌 메시지 또는 알 수 없는 명령어
    Unknown(String),
}

/// 쉼표를 허용하는 양수 파싱. 0과 음수는 `None`.
fn parse_positive(raw: &str) -> Option<Decimal> {
    let value = Decimal::from_str(&raw.replace(',', "")).ok()?;
    (value > Decimal::ZERO).then_some(value)
}

fn parse_favorite(params: &[&str]) -> Option<FavoriteRequest> {
    match params {
        [symbol] => Some(FavoriteRequest {
            symbol: normalize_symbol(symbol),
            holding: Holding::default(),
        }),
        [symbol, amount, average] => Some(FavoriteRequest {
            symbol: normalize_symbol(symbol),
            holding: Holding::new(parse_positive(amount)?, parse_positive(average)?),
        }),
        _ => None,
    }
}

impl BotCommand {
    /// 기본 접두사(`!`)로 파싱합니다.
    pub fn parse(text: &str) -> Self {
        Self::parse_with_prefix(text, DEFAULT_PREFIX)
    }

    /// 텍스트에서 명령어 파싱.
    pub fn parse_with_prefix(text: &str, prefix: &str) -> Self {
        let message = IncomingMessage::new("", Sender::new("", ""), text);
        Self::from_message(&message, prefix)
    }

    /// 수신 메시지의 첫 단어를 명령어로, 나머지를 인자로 파싱합니다.
    pub fn from_message(message: &IncomingMessage, prefix: &str) -> Self {
        let text = message.text.trim();

        let command = match message.command().strip_prefix(prefix) {
            Some(command) if !command.is_empty() => command,
            _ => return BotCommand::Unknown(text.to_string()),
        };
        let params = message.params();
        let params = params.as_slice();
        let param_text = message.param().to_string();

        match command.to_lowercase().as_str() {
            "코인" => BotCommand::Coin {
                query: message.has_param().then_some(param_text),
            },
            "즐" | "내코인" => BotCommand::MyCoins,
            "즐찾등록" | "코인등록" => match parse_favorite(params) {
                Some(request) => BotCommand::AddFavorite(request),
                None => BotCommand::Usage(ADD_USAGE),
            },
            "즐찾삭제" | "코인삭제" => match params {
                [symbol] => BotCommand::RemoveFavorite {
                    symbol: normalize_symbol(symbol),
                },
                _ => BotCommand::Usage(REMOVE_USAGE),
            },
            "바낸" => match TradingPair::parse(&param_text) {
                Some(pair) => BotCommand::Binance { pair },
                None => BotCommand::Usage(BINANCE_USAGE),
            },
            "김프" => BotCommand::KimchiPremium,
            "달러" => {
                if !message.has_param() {
                    return BotCommand::Dollar {
                        amount: Decimal::ONE,
                    };
                }
                match parse_positive(&param_text) {
                    Some(amount) => BotCommand::Dollar { amount },
                    None => BotCommand::Usage(DOLLAR_USAGE),
                }
            }
            "증시" => BotCommand::KoreanIndices,
            "미" => BotCommand::Nasdaq,
            "요약" => {
                if !message.has_param() {
                    BotCommand::Usage(SUMMARY_USAGE)
                } else {
                    BotCommand::Summarize { text: param_text }
                }
            }
            "도움말" | "help" => BotCommand::Help,
            _ => BotCommand::Unknown(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_coin_command() {
        assert_eq!(BotCommand::parse("!코인"), BotCommand::Coin { query: None });
        assert_eq!(
            BotCommand::parse("  !코인  btc "),
            BotCommand::Coin {
                query: Some("btc".to_string())
            }
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(BotCommand::parse("!즐"), BotCommand::MyCoins);
        assert_eq!(BotCommand::parse("!내코인"), BotCommand::MyCoins);
        assert_eq!(BotCommand::parse("!도움말"), BotCommand::Help);
        assert_eq!(BotCommand::parse("!HELP"), BotCommand::Help);
        assert_eq!(
            BotCommand::parse("!코인삭제 eth"),
            BotCommand::RemoveFavorite {
                symbol: "ETH".to_string()
            }
        );
    }

    #[test]
    fn test_parse_add_favorite() {
        assert_eq!(
            BotCommand::parse("!즐찾등록 btc"),
            BotCommand::AddFavorite(FavoriteRequest {
                symbol: "BTC".to_string(),
                holding: Holding::default(),
            })
        );
        assert_eq!(
            BotCommand::parse("!코인등록 btc 0.5 80,000,000"),
            BotCommand::AddFavorite(FavoriteRequest {
                symbol: "BTC".to_string(),
                holding: Holding::new(dec!(0.5), dec!(80000000)),
            })
        );
    }

    #[test]
    fn test_parse_add_favorite_usage() {
        assert_eq!(BotCommand::parse("!즐찾등록"), BotCommand::Usage(ADD_USAGE));
        assert_eq!(BotCommand::parse("!즐찾등록 btc 2"), BotCommand::Usage(ADD_USAGE));
        assert_eq!(
            BotCommand::parse("!즐찾등록 btc 두개 100"),
            BotCommand::Usage(ADD_USAGE)
        );
        assert_eq!(
            BotCommand::parse("!즐찾등록 btc -1 100"),
            BotCommand::Usage(ADD_USAGE)
        );
        assert_eq!(
            BotCommand::parse("!즐찾등록 btc 0 100"),
            BotCommand::Usage(ADD_USAGE)
        );
        assert_eq!(
            BotCommand::parse("!즐찾등록 btc 1 0"),
            BotCommand::Usage(ADD_USAGE)
        );
    }

    #[test]
    fn test_parse_binance() {
        assert_eq!(
            BotCommand::parse("!바낸 iq/bnb"),
            BotCommand::Binance {
                pair: TradingPair::new("IQ", "BNB")
            }
        );
        assert_eq!(BotCommand::parse("!바낸 btc"), BotCommand::Usage(BINANCE_USAGE));
    }

    #[test]
    fn test_parse_dollar() {
        assert_eq!(
            BotCommand::parse("!달러"),
            BotCommand::Dollar { amount: dec!(1) }
        );
        assert_eq!(
            BotCommand::parse("!달러 1,500"),
            BotCommand::Dollar { amount: dec!(1500) }
        );
        assert_eq!(BotCommand::parse("!달러 백"), BotCommand::Usage(DOLLAR_USAGE));
        assert_eq!(BotCommand::parse("!달러 0"), BotCommand::Usage(DOLLAR_USAGE));
    }

    #[test]
    fn test_parse_summarize() {
        assert_eq!(BotCommand::parse("!요약"), BotCommand::Usage(SUMMARY_USAGE));
        assert_eq!(
            BotCommand::parse("!요약 https://example.com/a"),
            BotCommand::Summarize {
                text: "https://example.com/a".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(BotCommand::parse("!없는명령"), BotCommand::Unknown(_)));
        assert!(matches!(BotCommand::parse("그냥 대화"), BotCommand::Unknown(_)));
        assert!(matches!(BotCommand::parse("!"), BotCommand::Unknown(_)));
    }

    #[test]
    fn test_from_message_keeps_param_spacing() {
        let message = IncomingMessage::new(
            "room",
            Sender::new("u1", "홍길동"),
            "  !요약   https://example.com/a  이거 봐 ",
        );
        assert_eq!(
            BotCommand::from_message(&message, DEFAULT_PREFIX),
            BotCommand::Summarize {
                text: "https://example.com/a  이거 봐".to_string()
            }
        );

        let spaced = IncomingMessage::new("room", Sender::new("u1", "홍길동"), "! 코인 btc");
        assert!(matches!(
            BotCommand::from_message(&spaced, DEFAULT_PREFIX),
            BotCommand::Unknown(_)
        ));
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(
            BotCommand::parse_with_prefix("/김프", "/"),
            BotCommand::KimchiPremium
        );
        assert!(matches!(
            BotCommand::parse_with_prefix("!김프", "/"),
            BotCommand::Unknown(_)
        ));
    }
}
