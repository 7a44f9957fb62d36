//! 텔레그램 long polling 전송 계층.
//!
//! `getUpdates`로 메시지를 받아 하나씩 순서대로 처리하고 `sendMessage`로 응답합니다.
//! 명령어 하나의 처리가 끝나야 다음 업데이트를 처리합니다.

use crate::error::{TransportError, TransportResult};
use crate::message::{IncomingMessage, Sender};
use crate::router::CommandRouter;
use async_trait::async_trait;
use iris_core::TelegramConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// 텔레그램 메시지 최대 길이 (문자 수).
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// 폴링 실패 후 대기 시간.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// 텔레그램 봇 업데이트 응답.
#[derive(Debug, Deserialize)]
struct TelegramUpdates {
    ok: bool,
    #[serde(default)]
    result: Vec<TelegramUpdate>,
    #[serde(default)]
    description: Option<String>,
}

/// 개별 업데이트.
#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessage>,
}

/// 메시지 정보.
#[derive(Debug, Deserialize)]
struct TelegramMessage {
    from: Option<TelegramUser>,
    chat: TelegramChat,
    text: Option<String>,
}

/// 사용자 정보.
#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: i64,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
}

/// 채팅 정보.
#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

/// 수신 메시지 처리기.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// 메시지를 처리하고 응답 문구를 반환합니다. 응답이 없으면 `None`.
    async fn handle(&self, message: &IncomingMessage) -> Option<String>;
}

#[async_trait]
impl MessageHandler for CommandRouter {
    async fn handle(&self, message: &IncomingMessage) -> Option<String> {
        CommandRouter::handle(self, message).await
    }
}

/// 긴 응답을 텔레그램 길이 제한에 맞게 나눕니다.
///
/// 가능하면 줄바꿈 위치에서 자릅니다.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for line in text.split_inclusive('\n') {
        let line_chars = line.chars().count();

        if current_chars + line_chars > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if line_chars > max_chars {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        current.push_str(line);
        current_chars += line_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// 텔레그램 봇 전송 계층.
pub struct TelegramTransport<H: MessageHandler> {
    client: reqwest::Client,
    api_base_url: String,
    bot_token: SecretString,
    handler: Arc<H>,
    last_update_id: RwLock<i64>,
    /// 허용된 채팅 ID 목록 (비어 있으면 모두 허용)
    allowed_chat_ids: Vec<i64>,
    poll_timeout_secs: u64,
}

impl<H: MessageHandler> TelegramTransport<H> {
    /// 설정에서 생성합니다. 봇 토큰이 없으면 에러.
    pub fn new(config: &TelegramConfig, handler: Arc<H>) -> TransportResult<Self> {
        let bot_token = config
            .bot_token
            .clone()
            .ok_or_else(|| TransportError::InvalidConfig("telegram.bot_token 필요".to_string()))?;

        Ok(Self::with_client(
            reqwest::Client::new(),
            &config.api_base_url,
            bot_token,
            handler,
        )
        .with_allowed_chat_ids(config.allowed_chat_ids.clone())
        .with_poll_timeout(config.poll_timeout_secs))
    }

    /// 준비된 HTTP 클라이언트로 생성합니다.
    pub fn with_client(
        client: reqwest::Client,
        api_base_url: &str,
        bot_token: SecretString,
        handler: Arc<H>,
    ) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            bot_token,
            handler,
            last_update_id: RwLock::new(0),
            allowed_chat_ids: Vec::new(),
            poll_timeout_secs: 30,
        }
    }

    /// 허용 채팅 ID 설정.
    pub fn with_allowed_chat_ids(mut self, chat_ids: Vec<i64>) -> Self {
        self.allowed_chat_ids = chat_ids;
        self
    }

    /// long polling 타임아웃 설정.
    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    /// 마지막으로 처리한 업데이트 ID.
    pub async fn last_update_id(&self) -> i64 {
        *self.last_update_id.read().await
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url,
            self.bot_token.expose_secret(),
            method
        )
    }

    /// 봇 폴링 시작.
    ///
    /// 무한 루프로 업데이트를 수신합니다.
    pub async fn run(&self) {
        info!("텔레그램 봇 폴링 시작");

        loop {
            if let Err(e) = self.poll_once().await {
                error!("업데이트 폴링 실패: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }

    /// 업데이트를 한 번 가져와 순서대로 처리합니다. 처리한 업데이트 수를 반환합니다.
    pub async fn poll_once(&self) -> TransportResult<usize> {
        let updates = self.poll_updates().await?;
        let count = updates.len();

        for update in updates {
            if let Err(e) = self.process_update(update).await {
                error!("업데이트 처리 실패: {}", e);
            }
        }
        Ok(count)
    }

    async fn poll_updates(&self) -> TransportResult<Vec<TelegramUpdate>> {
        let last_id = self.last_update_id().await;

        let params = serde_json::json!({
            "offset": last_id + 1,
            "timeout": self.poll_timeout_secs,
            "allowed_updates": ["message"],
        });

        let updates: TelegramUpdates = self
            .client
            .post(self.method_url("getUpdates"))
            .json(&params)
            .timeout(Duration::from_secs(self.poll_timeout_secs + 5))
            .send()
            .await?
            .json()
            .await?;

        if !updates.ok {
            return Err(TransportError::Api(
                updates
                    .description
                    .unwrap_or_else(|| "텔레그램 API 응답 실패".to_string()),
            ));
        }

        if let Some(last) = updates.result.iter().map(|u| u.update_id).max() {
            *self.last_update_id.write().await = last;
        }

        Ok(updates.result)
    }

    async fn process_update(&self, update: TelegramUpdate) -> TransportResult<()> {
        let Some(message) = update.message else {
            return Ok(());
        };

        let chat_id = message.chat.id;
        if !self.allowed_chat_ids.is_empty() && !self.allowed_chat_ids.contains(&chat_id) {
            warn!(chat_id, "허용되지 않은 채팅 ID에서 메시지 수신");
            return Ok(());
        }

        let Some(text) = message.text else {
            return Ok(());
        };

        let sender = match message.from {
            Some(user) => Sender::new(
                user.id.to_string(),
                user.username.or(user.first_name).unwrap_or_default(),
            ),
            None => Sender::new(chat_id.to_string(), ""),
        };
        let incoming = IncomingMessage::new(chat_id.to_string(), sender, text);
        debug!(chat_id, text = %incoming.text, "메시지 수신");

        let Some(reply) = self.handler.handle(&incoming).await else {
            return Ok(());
        };

        for chunk in split_message(&reply, MAX_MESSAGE_CHARS) {
            self.send_message(chat_id, &chunk).await?;
        }
        Ok(())
    }

    /// 평문 메시지 전송.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> TransportResult<()> {
        let params = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&params)
            .send()
            .await?;

        if response.status().is_success() {
            debug!(chat_id, "응답 전송 완료");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(TransportError::Api(format!("HTTP {}: {}", status, body)))
        }
    }
}
