//! Iris 채팅 봇 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 텔레그램 봇 실행
//! iris run
//!
//! # Redis 없이 실행 (인메모리 즐겨찾기)
//! iris --memory run
//!
//! # 한 번만 실행하는 명령
//! iris quote 비트코인
//! iris watchlist --user 42 add BTC 0.5 80000000
//! iris watchlist --user 42 list
//! iris summarize https://example.com/news/1
//! iris market kimchi
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use iris_bot::{CommandRouter, IncomingMessage, Sender, TelegramTransport};
use iris_core::{init_logging, AppConfig, LogConfig};
use std::sync::Arc;
use tracing::info;

mod app;

use app::{build_router, StoreBackend};

#[derive(Parser)]
#[command(name = "iris")]
#[command(about = "Iris chat bot - 코인 시세, 즐겨찾기, URL 요약", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    /// Redis 대신 인메모리 저장소 사용
    #[arg(long, global = true, default_value = "false")]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 텔레그램 봇 시작
    Run,

    /// 코인 시세 조회 (심볼 또는 한글 이름, 생략 시 전체)
    Quote {
        query: Option<String>,

        /// 보유 평가에 사용할 사용자 ID
        #[arg(short, long, default_value = "cli")]
        user: String,
    },

    /// 즐겨찾기 관리
    Watchlist {
        /// 사용자 ID
        #[arg(short, long, default_value = "cli")]
        user: String,

        #[command(subcommand)]
        action: WatchlistAction,
    },

    /// URL 요약
    Summarize { url: String },

    /// 시장 지표 조회
    Market {
        #[arg(value_enum)]
        kind: MarketKind,

        /// 바이낸스 거래쌍(BTC/USDT) 또는 달러 금액
        arg: Option<String>,
    },
}

#[derive(Subcommand)]
enum WatchlistAction {
    /// 즐겨찾기 시세 목록
    List,
    /// 코인 등록 (수량과 평단가는 함께 지정)
    Add {
        symbol: String,
        amount: Option<String>,
        average: Option<String>,
    },
    /// 코인 삭제
    Remove { symbol: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum MarketKind {
    Kimchi,
    Binance,
    Dollar,
    Indices,
    Nasdaq,
}

impl Commands {
    /// 한 번 실행 명령을 채팅 명령어 텍스트로 바꿉니다.
    fn chat_text(&self) -> Option<String> {
        let text = match self {
            Commands::Run => return None,
            Commands::Quote { query, .. } => match query {
                Some(q) => format!("!코인 {}", q),
                None => "!코인".to_string(),
            },
            Commands::Watchlist { action, .. } => match action {
                WatchlistAction::List => "!즐".to_string(),
                WatchlistAction::Add {
                    symbol,
                    amount,
                    average,
                } => [Some(symbol), amount.as_ref(), average.as_ref()]
                    .into_iter()
                    .flatten()
                    .fold("!즐찾등록".to_string(), |acc, s| format!("{} {}", acc, s)),
                WatchlistAction::Remove { symbol } => format!("!즐찾삭제 {}", symbol),
            },
            Commands::Summarize { url } => format!("!요약 {}", url),
            Commands::Market { kind, arg } => {
                let command = match kind {
                    MarketKind::Kimchi => "!김프",
                    MarketKind::Binance => "!바낸",
                    MarketKind::Dollar => "!달러",
                    MarketKind::Indices => "!증시",
                    MarketKind::Nasdaq => "!미",
                };
                match arg {
                    Some(arg) => format!("{} {}", command, arg),
                    None => command.to_string(),
                }
            }
        };
        Some(text)
    }

    fn user(&self) -> &str {
        match self {
            Commands::Quote { user, .. } | Commands::Watchlist { user, .. } => user,
            _ => "cli",
        }
    }
}

async fn run_bot(config: &AppConfig, router: CommandRouter) -> Result<()> {
    let transport = TelegramTransport::new(&config.telegram, Arc::new(router))
        .context("텔레그램 설정 오류")?;

    tokio::select! {
        _ = transport.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("종료 신호 대기 실패")?;
            info!("종료 신호 수신, 봇을 중지합니다");
        }
    }
    Ok(())
}

async fn run_once(router: &CommandRouter, command: &Commands, text: String) {
    let message = IncomingMessage::new("cli", Sender::new(command.user(), "cli"), text);
    match router.handle(&message).await {
        Some(reply) => println!("{}", reply),
        None => println!("응답 없음"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config).context("설정 로드 실패")?;
    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let backend = if cli.memory {
        StoreBackend::Memory
    } else {
        StoreBackend::Redis
    };
    let router = build_router(&config, backend).await?;

    match cli.command.chat_text() {
        None => run_bot(&config, router).await,
        Some(text) => {
            run_once(&router, &cli.command, text).await;
            Ok(())
        }
    }
}
