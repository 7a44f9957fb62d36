//! URL 본문 추출과 요약.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 메시지에서 URL 찾기
//! - 단축 URL/리다이렉트 해석 (ContentResolver)
//! - 본문 추출 단계: 트위터 API → 가벼운 HTML 요청 → 헤드리스 브라우저
//! - OpenAI 호환 completion 클라이언트
//! - 6줄 요약 생성 (Summarizer)
//! - 위 단계를 묶은 UrlSummaryService

pub mod error;
pub mod extractor;
pub mod html;
pub mod llm;
pub mod renderer;
pub mod resolver;
pub mod service;
pub mod social;
pub mod summarizer;
pub mod url_detect;

pub use error::*;
pub use extractor::ArticleExtractor;
pub use llm::{ChatMessage, ChatRequest, CompletionClient, LlmError, MessageRole, OpenAiClient};
pub use renderer::{PageRenderer, WebDriverRenderer};
pub use resolver::ContentResolver;
pub use service::UrlSummaryService;
pub use social::TwitterClient;
pub use summarizer::Summarizer;
pub use url_detect::find_url;

/// 브라우저처럼 보이는 User-Agent.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 브라우저 요청 헤더를 붙입니다.
pub(crate) fn with_browser_headers(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    request
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .header(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        )
        .header(
            reqwest::header::ACCEPT_LANGUAGE,
            "ko-KR,ko;q=0.8,en-US;q=0.5,en;q=0.3",
        )
}
