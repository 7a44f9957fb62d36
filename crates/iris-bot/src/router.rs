//! 명령어 라우터.
//!
//! 메시지 하나를 받아 명령어를 실행하고 응답 문구를 만듭니다.
//! 모든 에러는 여기서 사용자 문구로 바뀌며 전송 계층까지 올라가지 않습니다.

use crate::command::{BotCommand, FavoriteRequest, DEFAULT_PREFIX};
use crate::format;
use crate::message::IncomingMessage;
use iris_content::UrlSummaryService;
use iris_core::{
    command_span, BotConfig, BotError, BotResult, PortfolioLine, Position, Quote, TradingPair,
    WatchlistEntry,
};
use iris_market::{IndexClient, KoreanIndex, PremiumCalculator, QuoteSource};
use iris_store::WatchlistStore;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// 명령어 라우터.
pub struct CommandRouter {
    quotes: Arc<dyn QuoteSource>,
    watchlist: WatchlistStore,
    premium: PremiumCalculator,
    indices: IndexClient,
    summaries: Arc<UrlSummaryService>,
    prefix: String,
    auto_summarize: bool,
}

impl std::fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRouter")
            .field("prefix", &self.prefix)
            .field("auto_summarize", &self.auto_summarize)
            .finish_non_exhaustive()
    }
}

impl CommandRouter {
    /// 새 라우터를 생성합니다.
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        watchlist: WatchlistStore,
        premium: PremiumCalculator,
        indices: IndexClient,
        summaries: Arc<UrlSummaryService>,
    ) -> Self {
        Self {
            quotes,
            watchlist,
            premium,
            indices,
            summaries,
            prefix: DEFAULT_PREFIX.to_string(),
            auto_summarize: false,
        }
    }

    /// 봇 설정(접두사, 자동 요약)을 적용합니다.
    pub fn with_config(mut self, config: &BotConfig) -> Self {
        if !config.command_prefix.is_empty() {
            self.prefix = config.command_prefix.clone();
        }
        self.auto_summarize = config.auto_summarize_urls;
        self
    }

    /// 메시지를 처리합니다. 응답할 필요가 없으면 `None`.
    pub async fn handle(&self, message: &IncomingMessage) -> Option<String> {
        let command = BotCommand::from_message(message, &self.prefix);
        if matches!(command, BotCommand::Unknown(_)) && !self.auto_summarize {
            return None;
        }

        let span = command_span!(message.command(), message.room_id, message.sender.id);
        self.dispatch(message, command).instrument(span).await
    }

    async fn dispatch(&self, message: &IncomingMessage, command: BotCommand) -> Option<String> {
        let user_id = message.sender.id.as_str();

        let result = match command {
            BotCommand::Coin { query: Some(query) } => self.coin(user_id, &query).await,
            BotCommand::Coin { query: None } => self.market_board().await,
            BotCommand::MyCoins => self.my_coins(user_id).await,
            BotCommand::AddFavorite(request) => self.add_favorite(user_id, request).await,
            BotCommand::RemoveFavorite { symbol } => self.remove_favorite(user_id, &symbol).await,
            BotCommand::Binance { pair } => self.binance(&pair).await,
            BotCommand::KimchiPremium => self.kimchi().await,
            BotCommand::Dollar { amount } => self.dollar(amount).await,
            BotCommand::KoreanIndices => self.korean_indices().await,
            BotCommand::Nasdaq => self.nasdaq().await,
            BotCommand::Summarize { text } => match self.summarize_message_text(&text).await {
                Some(result) => result,
                None => Err(BotError::InvalidInput(crate::command::SUMMARY_USAGE.to_string())),
            },
            BotCommand::Help => Ok(format::help_reply()),
            BotCommand::Usage(usage) => Ok(usage.to_string()),
            BotCommand::Unknown(_) => return self.summarize_message(message).await,
        };

        Some(match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "명령 처리 실패");
                e.user_message()
            }
        })
    }

    /// 채팅 메시지에서 URL을 찾아 요약합니다. URL이 없으면 `None`.
    pub async fn summarize_message(&self, message: &IncomingMessage) -> Option<String> {
        let result = self.summarize_message_text(&message.text).await?;
        Some(result.unwrap_or_else(|e| {
            warn!(error = %e, "URL 요약 실패");
            e.user_message()
        }))
    }

    async fn summarize_message_text(&self, text: &str) -> Option<BotResult<String>> {
        let result = self.summaries.summarize_text(text).await?;
        Some(
            result
                .map(|summary| summary.into_string())
                .map_err(BotError::from),
        )
    }

    // ========================================================================
    // 코인 시세 / 즐겨찾기
    // ========================================================================

    /// 단일 코인 시세. 즐겨찾기에 보유 정보가 있으면 평가 블록을 붙입니다.
    async fn coin(&self, user_id: &str, query: &str) -> BotResult<String> {
        let quote = self.quotes.quote(query).await?;

        let entry = match self.watchlist.get(user_id, &quote.symbol).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "즐겨찾기 조회 실패, 시세만 응답");
                None
            }
        };
        let valuation = entry.and_then(|entry| Position::evaluate(&entry, &quote));

        info!(symbol = %quote.symbol, price = %quote.price, "코인 시세");
        Ok(format::position_reply(&quote, valuation.as_ref()))
    }

    async fn market_board(&self) -> BotResult<String> {
        let quotes = self.quotes.market_quotes().await?;
        info!(count = quotes.len(), "원화마켓 전체 시세");
        Ok(format::market_board_reply(&quotes))
    }

    /// 즐겨찾기 전체 시세.
    ///
    /// 한 번의 일괄 조회로 가져오고, 빠진 심볼만 개별 조회합니다.
    /// 한 심볼의 실패는 그 줄에만 표시됩니다.
    /// 일괄 조회가 네트워크 장애처럼 재시도성 에러로 실패하면 개별 조회 없이 모두 실패로 표시합니다.
    async fn my_coins(&self, user_id: &str) -> BotResult<String> {
        let entries = self.watchlist.list(user_id).await?;
        if entries.is_empty() {
            return Ok(format::EMPTY_WATCHLIST.to_string());
        }

        let lines = self.portfolio(entries).await;
        Ok(format::portfolio_reply(&lines))
    }

    async fn portfolio(&self, entries: Vec<WatchlistEntry>) -> Vec<PortfolioLine> {
        let symbols: Vec<String> = entries.iter().map(|e| e.symbol.clone()).collect();

        let mut batch: HashMap<String, Quote> = match self.quotes.quotes(&symbols).await {
            Ok(quotes) => quotes.into_iter().map(|q| (q.symbol.clone(), q)).collect(),
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "일괄 시세 조회 실패, 개별 조회 생략");
                return entries
                    .into_iter()
                    .map(|entry| PortfolioLine::Failed {
                        symbol: entry.symbol,
                        reason: e.to_string(),
                    })
                    .collect();
            }
            Err(e) => {
                warn!(error = %e, "일괄 시세 조회 실패, 심볼별 조회로 전환");
                HashMap::new()
            }
        };

        let mut lines = Vec::with_capacity(entries.len());
        for entry in entries {
            let quote = match batch.remove(&entry.symbol) {
                Some(quote) => Ok(quote),
                None => self.quotes.quote_direct(&entry.symbol).await,
            };
            lines.push(match quote {
                Ok(quote) => PortfolioLine::Valued(Position::new(entry, quote)),
                Err(e) => {
                    debug!(symbol = %entry.symbol, error = %e, "심볼 시세 조회 실패");
                    PortfolioLine::Failed {
                        symbol: entry.symbol,
                        reason: e.to_string(),
                    }
                }
            });
        }
        lines
    }

    async fn add_favorite(&self, user_id: &str, request: FavoriteRequest) -> BotResult<String> {
        let entry = self
            .watchlist
            .add(user_id, &request.symbol, request.holding)
            .await?;
        Ok(format::added_reply(&entry.symbol))
    }

    async fn remove_favorite(&self, user_id: &str, symbol: &str) -> BotResult<String> {
        self.watchlist.remove(user_id, symbol).await?;
        Ok(format::removed_reply(symbol))
    }

    // ========================================================================
    // 시장 지표
    // ========================================================================

    async fn binance(&self, pair: &TradingPair) -> BotResult<String> {
        match self.premium.binance_quote(pair).await {
            Ok(quote) => Ok(format::binance_reply(&quote)),
            Err(e) => {
                warn!(%pair, error = %e, "바이낸스 시세 조회 실패");
                Err(BotError::InvalidInput(crate::command::BINANCE_USAGE.to_string()))
            }
        }
    }

    async fn kimchi(&self) -> BotResult<String> {
        let premium = self.premium.kimchi_premium().await?;
        Ok(format::kimchi_reply(&premium))
    }

    async fn dollar(&self, amount: Decimal) -> BotResult<String> {
        let rate = self.premium.usd_krw().await?;
        Ok(format::dollar_reply(amount, &rate))
    }

    async fn korean_indices(&self) -> BotResult<String> {
        let mut sections = Vec::with_capacity(2);
        for index in [KoreanIndex::Kospi, KoreanIndex::Kosdaq] {
            let quote = self.indices.korean_index(index).await?;
            sections.push(format::index_reply(&quote));
        }
        Ok(sections.join("\n\n"))
    }

    async fn nasdaq(&self) -> BotResult<String> {
        let quote = self.indices.nasdaq_composite().await?;
        let mut reply = format::index_reply(&quote);

        match self.premium.usd_krw().await {
            Ok(rate) => {
                reply.push_str("\n\n");
                reply.push_str(&format::fx_panel(&rate));
            }
            Err(e) => warn!(error = %e, "환율 조회 실패, 지수만 응답"),
        }
        Ok(reply)
    }
}
