//! 본문 추출 단계.
//!
//! 순서대로 시도하고 처음 성공한 결과를 씁니다:
//! 1. 트위터 API (트윗 URL, 토큰이 있을 때만)
//! 2. 가벼운 HTML 요청
//! 3. 헤드리스 브라우저 렌더링 (2단계 실패 또는 본문이 짧을 때만)

use crate::html::extract_article;
use crate::renderer::PageRenderer;
use crate::social::TwitterClient;
use crate::{with_browser_headers, ContentError, ContentResult};
use iris_core::{Article, ContentConfig};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 네이버 블로그 URL인지 확인합니다.
pub fn is_naver_blog(url: &str) -> bool {
    url.contains("blog.naver.com")
}

/// 네이버 블로그 URL을 모바일 호스트로 바꿉니다.
pub fn mobile_blog_url(url: &str) -> Option<String> {
    if url.contains("://blog.naver.com") {
        Some(url.replacen("://blog.naver.com", "://m.blog.naver.com", 1))
    } else {
        None
    }
}

/// 기사 추출기.
pub struct ArticleExtractor {
    client: Client,
    renderer: Arc<dyn PageRenderer>,
    social: Option<TwitterClient>,
    min_chars: usize,
    max_chars: usize,
}

impl std::fmt::Debug for ArticleExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleExtractor")
            .field("social", &self.social)
            .field("min_chars", &self.min_chars)
            .field("max_chars", &self.max_chars)
            .finish_non_exhaustive()
    }
}

impl ArticleExtractor {
    /// 설정에서 생성합니다. 트위터 토큰이 있으면 트윗 조회를 켭니다.
    pub fn new(config: &ContentConfig, renderer: Arc<dyn PageRenderer>) -> ContentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;

        let mut extractor = Self::with_client(
            client,
            renderer,
            config.min_body_chars,
            config.max_body_chars,
        );
        extractor.social = TwitterClient::from_config(config);
        Ok(extractor)
    }

    /// 준비된 HTTP 클라이언트로 생성합니다.
    pub fn with_client(
        client: Client,
        renderer: Arc<dyn PageRenderer>,
        min_chars: usize,
        max_chars: usize,
    ) -> Self {
        Self {
            client,
            renderer,
            social: None,
            min_chars,
            max_chars,
        }
    }

    /// 트위터 클라이언트를 설정합니다.
    pub fn with_social(mut self, social: TwitterClient) -> Self {
        self.social = Some(social);
        self
    }

    /// URL에서 기사를 추출합니다.
    pub async fn extract(&self, url: &str) -> ContentResult<Article> {
        if let Some(social) = &self.social {
            if let Some(article) = social.fetch(url).await {
                info!(url, "트윗 본문 추출");
                return Ok(article);
            }
        }

        let light = match self.fetch_light(url).await {
            Ok(article) if article.body_chars() > self.min_chars => {
                info!(url, chars = article.body_chars(), "HTML 본문 추출");
                return Ok(article);
            }
            Ok(article) => {
                debug!(url, chars = article.body_chars(), "HTML 본문이 짧음");
                Some(article)
            }
            Err(e) => {
                debug!(url, error = %e, "HTML 추출 실패");
                None
            }
        };

        warn!(url, "브라우저 렌더링으로 재시도");
        let rendered = self.renderer.render(url).await;

        match (rendered, light) {
            (Ok(article), _) if !article.body.trim().is_empty() => {
                info!(url, chars = article.body_chars(), "렌더링 본문 추출");
                Ok(Article::with_limit(article.title, article.body, self.max_chars))
            }
            (_, Some(article)) if !article.body.trim().is_empty() => Ok(article),
            (Err(e), _) => Err(ContentError::ExtractionFailed(format!("{}: {}", url, e))),
            (Ok(_), _) => Err(ContentError::ExtractionFailed(format!("{}: 본문 없음", url))),
        }
    }

    /// 가벼운 HTML 요청. 네이버 블로그는 모바일 호스트를 먼저 시도합니다.
    async fn fetch_light(&self, url: &str) -> ContentResult<Article> {
        let mut candidates = Vec::with_capacity(2);
        if let Some(mobile) = mobile_blog_url(url) {
            candidates.push(mobile);
        }
        candidates.push(url.to_string());

        let mut last = Err(ContentError::ExtractionFailed(url.to_string()));
        for candidate in candidates {
            last = self.fetch_html(&candidate).await;
            match &last {
                Ok(article) if article.body_chars() > self.min_chars => break,
                Ok(_) => debug!(url = %candidate, "본문이 짧음"),
                Err(e) => debug!(url = %candidate, error = %e, "요청 실패"),
            }
        }
        last
    }

    async fn fetch_html(&self, url: &str) -> ContentResult<Article> {
        debug!("GET {}", url);
        let response = with_browser_headers(self.client.get(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        if !content_type.contains("text/html") {
            return Err(ContentError::NotHtml(content_type));
        }

        let html = response.text().await?;
        let (title, body) = extract_article(&html, self.min_chars);
        Ok(Article::with_limit(title, body, self.max_chars))
    }
}
