//! URL 요약 파이프라인.
//!
//! URL 해석 → 본문 추출 → 요약을 차례로 실행합니다.

use crate::extractor::ArticleExtractor;
use crate::llm::{CompletionClient, OpenAiClient};
use crate::renderer::{PageRenderer, WebDriverRenderer};
use crate::resolver::ContentResolver;
use crate::summarizer::Summarizer;
use crate::url_detect::find_url;
use crate::ContentResult;
use iris_core::{AppConfig, Summary};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// URL 요약 서비스.
#[derive(Debug)]
pub struct UrlSummaryService {
    resolver: ContentResolver,
    extractor: ArticleExtractor,
    summarizer: Summarizer,
}

impl UrlSummaryService {
    /// 구성 요소로 생성합니다.
    pub fn new(resolver: ContentResolver, extractor: ArticleExtractor, summarizer: Summarizer) -> Self {
        Self {
            resolver,
            extractor,
            summarizer,
        }
    }

    /// 설정에서 실제 HTTP/브라우저/모델 클라이언트로 구성합니다.
    pub fn from_config(config: &AppConfig) -> ContentResult<Self> {
        let resolver = ContentResolver::new(&config.content)?;
        let renderer: Arc<dyn PageRenderer> = Arc::new(WebDriverRenderer::new(&config.content));
        let extractor = ArticleExtractor::new(&config.content, renderer)?;
        let openai = OpenAiClient::new(&config.llm)?;
        if !openai.is_enabled() {
            warn!("LLM API 키가 없어 요약은 실패 형식으로 응답합니다");
        }
        let llm: Arc<dyn CompletionClient> = Arc::new(openai);
        let summarizer = Summarizer::new(llm, &config.llm);
        Ok(Self::new(resolver, extractor, summarizer))
    }

    /// URL을 요약합니다.
    ///
    /// 본문을 얻지 못하면 `ExtractionFailed`. 모델 실패는 정해진 형식의 요약으로 대체됩니다.
    pub async fn summarize_url(&self, url: &str) -> ContentResult<Summary> {
        let resolved = self.resolver.resolve(url).await;
        if resolved != url {
            debug!(url, resolved = %resolved, "URL 해석됨");
        }

        let article = self.extractor.extract(&resolved).await?;
        let summary = self.summarizer.summarize(&article).await;
        info!(url = %resolved, chars = article.body_chars(), "URL 요약 완료");
        Ok(summary)
    }

    /// 텍스트에서 URL을 찾아 요약합니다. URL이 없으면 `None`.
    pub async fn summarize_text(&self, text: &str) -> Option<ContentResult<Summary>> {
        let url = find_url(text)?;
        Some(self.summarize_url(&url).await)
    }
}
