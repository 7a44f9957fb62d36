//! 기사 6줄 요약.

use crate::llm::{ChatMessage, ChatRequest, CompletionClient, LlmError};
use iris_core::{truncate_chars, Article, LlmConfig, Summary};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 이보다 짧은 본문은 모델을 호출하지 않습니다 (문자 수).
pub const MIN_SUMMARY_BODY_CHARS: usize = 50;

/// 프롬프트에 넣는 본문 최대 길이 (문자 수).
pub const PROMPT_BODY_CHARS: usize = 3000;

/// 실패 요약에 넣는 제목 길이 (문자 수).
const FALLBACK_TITLE_CHARS: usize = 30;

/// 본문이 없을 때의 요약.
pub fn empty_body_summary() -> Summary {
    Summary::from_bullets([
        "본문이 너무 짧거나 없음",
        "내용을 추출할 수 없음",
        "다른 방법으로 접근 필요",
    ])
}

/// 모델 호출이 실패했을 때의 요약.
pub fn failed_summary(article: &Article) -> Summary {
    Summary::from_bullets([
        "요약 생성 중 오류 발생".to_string(),
        format!("제목: {}", truncate_chars(&article.title, FALLBACK_TITLE_CHARS)),
        format!("내용 길이: {}자", article.body_chars()),
        "수동 확인 필요".to_string(),
    ])
}

/// 요약 프롬프트를 만듭니다.
pub fn build_prompt(article: &Article) -> String {
    let body = if article.body_chars() > PROMPT_BODY_CHARS {
        format!("{}...", truncate_chars(&article.body, PROMPT_BODY_CHARS))
    } else {
        article.body.clone()
    };

    format!(
        "다음 기사를 육하원칙(누가, 무엇을, 언제, 어디서, 왜, 어떻게)에 맞춰 요약하세요.\n\
         \n\
         규칙:\n\
         - 각 항목은 30자 이내\n\
         - 음슴체로 작성 (예: ~함, ~임, ~됨)\n\
         - 기사에 있는 사실만 작성하고 추측하지 말 것\n\
         - 해당 내용이 없으면 빈 항목으로 둘 것\n\
         \n\
         출력 형식 (정확히 이 형식만 출력):\n\
         ✅ 요약\n\
         - \n- \n- \n- \n- \n- \n\
         \n\
         제목: {}\n\
         \n\
         본문:\n{}",
        article.title, body
    )
}

/// 언어 모델 기반 요약기.
pub struct Summarizer {
    llm: Arc<dyn CompletionClient>,
    model: String,
    max_completion_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("model", &self.model)
            .field("max_completion_tokens", &self.max_completion_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl Summarizer {
    /// 새 요약기를 생성합니다.
    pub fn new(llm: Arc<dyn CompletionClient>, config: &LlmConfig) -> Self {
        Self {
            llm,
            model: config.model.clone(),
            max_completion_tokens: config.max_completion_tokens,
            temperature: config.temperature,
        }
    }

    /// 기사를 요약합니다. 실패해도 정해진 형식의 요약을 반환합니다.
    pub async fn summarize(&self, article: &Article) -> Summary {
        if article.body.trim().chars().count() < MIN_SUMMARY_BODY_CHARS {
            debug!(chars = article.body_chars(), "본문이 짧아 요약 생략");
            return empty_body_summary();
        }

        match self.complete(article).await {
            Ok(summary) => {
                info!(title = %article.title, "요약 생성");
                summary
            }
            Err(e) => {
                warn!(error = %e, "요약 생성 실패");
                failed_summary(article)
            }
        }
    }

    /// 모델을 호출해 요약합니다. 본문 길이는 검사하지 않습니다.
    pub async fn complete(&self, article: &Article) -> Result<Summary, LlmError> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![ChatMessage::user(build_prompt(article))],
        )
        .with_temperature(self.temperature)
        .with_max_completion_tokens(self.max_completion_tokens);

        let text = self.llm.complete(request).await?;
        Ok(Summary::from_completion(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 호출 횟수와 마지막 요청을 기록하는 가짜 모델.
    struct FakeLlm {
        calls: AtomicUsize,
        reply: Result<String, ()>,
        last: Mutex<Option<ChatRequest>>,
    }

    impl FakeLlm {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Ok(text.to_string()),
                last: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Err(()),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for FakeLlm {
        async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request);
            self.reply
                .clone()
                .map_err(|_| LlmError::Timeout { timeout_ms: 30_000 })
        }
    }

    fn summarizer(llm: Arc<FakeLlm>) -> Summarizer {
        Summarizer::new(llm, &LlmConfig::default())
    }

    #[tokio::test]
    async fn test_short_body_skips_model() {
        let llm = FakeLlm::replying("unused");
        let summary = summarizer(llm.clone())
            .summarize(&Article::new("제목", "열 글자 본문입니다"))
            .await;

        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            summary.as_str(),
            "✅ 요약\n- 본문이 너무 짧거나 없음\n- 내용을 추출할 수 없음\n- 다른 방법으로 접근 필요\n- \n- \n- "
        );
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let llm = FakeLlm::replying("- 하나\n- 둘");
        let summary = summarizer(llm.clone())
            .summarize(&Article::new("제목", "가".repeat(5000)))
            .await;

        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert!(summary.as_str().starts_with("✅ 요약\n- 하나"));

        let request = llm.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_completion_tokens, Some(400));
        assert_eq!(request.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn test_model_failure_uses_template() {
        let llm = FakeLlm::failing();
        let article = Article::new("아주 긴 제목이 들어가는 기사입니다 정말로 아주 길게 이어집니다", "나".repeat(120));
        let summary = summarizer(llm).summarize(&article).await;

        let lines: Vec<&str> = summary.as_str().lines().collect();
        assert_eq!(lines[0], "✅ 요약");
        assert_eq!(lines[1], "- 요약 생성 중 오류 발생");
        assert_eq!(lines[2], format!("- 제목: {}", truncate_chars(&article.title, 30)));
        assert_eq!(lines[3], "- 내용 길이: 120자");
        assert_eq!(lines[4], "- 수동 확인 필요");
        assert_eq!(summary.as_str().split('\n').count(), 7);
    }

    #[test]
    fn test_prompt_truncates_body() {
        let article = Article::new("제목", "가".repeat(3500));
        let prompt = build_prompt(&article);

        assert!(prompt.contains(&format!("{}...", "가".repeat(3000))));
        assert!(!prompt.contains(&"가".repeat(3001)));
        assert!(prompt.contains("제목: 제목"));
        assert!(prompt.contains("✅ 요약"));
    }
}
