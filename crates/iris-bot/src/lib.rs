//! 채팅 명령어 처리.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 수신 메시지와 명령어 파싱
//! - 명령어 라우터 (시세, 즐겨찾기, 시장 지표, URL 요약)
//! - 응답 문구 포맷
//! - 텔레그램 long polling 전송 계층
//!
//! # 명령어
//!
//! - `!코인 [코인명]` - 업비트 시세
//! - `!즐`, `!내코인` - 즐겨찾기 시세와 평가 손익
//! - `!즐찾등록 심볼 [수량 평단가]`, `!즐찾삭제 심볼`
//! - `!바낸 BTC/USDT`, `!김프`, `!달러 [금액]`
//! - `!증시`, `!미`
//! - `!요약 URL`, `!도움말`

pub mod command;
pub mod error;
pub mod format;
pub mod message;
pub mod router;
pub mod telegram;

pub use command::{BotCommand, FavoriteRequest};
pub use error::*;
pub use message::{IncomingMessage, Sender};
pub use router::CommandRouter;
pub use telegram::{MessageHandler, TelegramTransport};
