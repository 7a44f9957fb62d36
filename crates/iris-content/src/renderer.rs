//! 헤드리스 브라우저 렌더링.
//!
//! 스크립트로 본문을 그리는 페이지를 위한 마지막 추출 단계입니다.
//! 호출마다 WebDriver 세션과 임시 프로필 디렉터리를 새로 만들고, 끝나면 정리합니다.

use crate::extractor::is_naver_blog;
use crate::html::extract_page_text;
use crate::{ContentError, ContentResult};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use iris_core::{Article, ContentConfig};
use scraper::Html;
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// 렌더링 후 본문을 찾을 셀렉터 (순서대로 시도).
const RENDER_SELECTORS: &[&str] = &[
    "#article-view-content-div",
    ".article_txt",
    ".news_txt",
    "article",
    ".article-content",
    ".article-body",
    ".news-content",
    ".post-content",
    ".content",
    ".view-content",
    ".article_view",
    ".news_view",
];

/// 네이버 블로그 본문 프레임 안의 셀렉터.
const NAVER_BLOG_SELECTORS: &[&str] = &[".se-main-container", "#postViewArea", ".post-view", ".post_ct"];

/// 페이지 소스에서 남길 최소 줄 길이 (문자 수).
const SOURCE_MIN_LINE_CHARS: usize = 10;

/// 브라우저 실행 인자.
const CHROME_ARGS: &[&str] = &[
    "--headless=new",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-extensions",
    "--disable-notifications",
    "--window-size=1280,1024",
];

/// 페이지를 렌더링해 기사를 추출하는 인터페이스.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// 페이지를 렌더링하고 제목과 본문을 반환합니다.
    async fn render(&self, url: &str) -> ContentResult<Article>;
}

/// WebDriver(chromedriver) 기반 렌더러.
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    webdriver_url: String,
    wait: Duration,
    min_chars: usize,
    max_chars: usize,
}

impl WebDriverRenderer {
    /// 설정에서 생성합니다.
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            wait: Duration::from_secs(config.render_wait_secs),
            min_chars: config.min_body_chars,
            max_chars: config.max_body_chars,
        }
    }

    async fn connect(&self, profile_dir: &std::path::Path) -> ContentResult<Client> {
        let mut args: Vec<String> = CHROME_ARGS.iter().map(|a| a.to_string()).collect();
        args.push(format!("--user-data-dir={}", profile_dir.display()));
        args.push(format!("--user-agent={}", crate::BROWSER_USER_AGENT));

        let capabilities = match json!({ "goog:chromeOptions": { "args": args } }) {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        Ok(ClientBuilder::native()
            .capabilities(capabilities)
            .connect(&self.webdriver_url)
            .await?)
    }

    async fn render_page(&self, client: &Client, url: &str) -> ContentResult<Article> {
        client.goto(url).await?;
        client
            .wait()
            .at_most(self.wait)
            .for_element(Locator::Css("body"))
            .await?;

        let title = client.title().await.unwrap_or_default();
        let body = if is_naver_blog(url) {
            self.naver_blog_body(client).await?
        } else {
            self.page_body(client).await?
        };

        if body.trim().is_empty() {
            return Err(ContentError::Render(format!("빈 본문: {}", url)));
        }
        Ok(Article::with_limit(title, body, self.max_chars))
    }

    /// 네이버 블로그는 본문이 `#mainFrame` 안에 있습니다.
    ///
    /// 세션을 프레임 안으로 전환한 뒤 같은 클라이언트로 찾습니다.
    async fn naver_blog_body(&self, client: &Client) -> ContentResult<String> {
        let frame = client
            .wait()
            .at_most(self.wait)
            .for_element(Locator::Css("#mainFrame"))
            .await?;
        frame.enter_frame().await?;

        if let Some((selector, text)) =
            first_text(NAVER_BLOG_SELECTORS, 0, |s| element_text(client, s)).await?
        {
            debug!(selector, "네이버 블로그 본문 발견");
            return Ok(text);
        }

        let body = client.find(Locator::Css("body")).await?;
        Ok(body.text().await?.trim().to_string())
    }

    async fn page_body(&self, client: &Client) -> ContentResult<String> {
        if let Some((selector, text)) =
            first_text(RENDER_SELECTORS, self.min_chars, |s| element_text(client, s)).await?
        {
            debug!(selector, "렌더링 본문 발견");
            return Ok(text);
        }

        let source = client.source().await?;
        Ok(extract_page_text(
            &Html::parse_document(&source),
            SOURCE_MIN_LINE_CHARS,
        ))
    }
}

/// 셀렉터에 해당하는 요소의 텍스트. 요소가 없으면 `None`.
async fn element_text(client: &Client, selector: &'static str) -> ContentResult<Option<String>> {
    match client.find(Locator::Css(selector)).await {
        Ok(element) => Ok(Some(element.text().await?)),
        Err(_) => Ok(None),
    }
}

/// 셀렉터를 순서대로 시도해 공백을 뺀 텍스트가 `min_chars`보다 긴 첫 결과를 반환합니다.
async fn first_text<F, Fut>(
    selectors: &[&'static str],
    min_chars: usize,
    mut lookup: F,
) -> ContentResult<Option<(&'static str, String)>>
where
    F: FnMut(&'static str) -> Fut,
    Fut: Future<Output = ContentResult<Option<String>>>,
{
    for &selector in selectors {
        if let Some(text) = lookup(selector).await? {
            let text = text.trim();
            if text.chars().count() > min_chars {
                return Ok(Some((selector, text.to_string())));
            }
        }
    }
    Ok(None)
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&self, url: &str) -> ContentResult<Article> {
        let profile = tempfile::Builder::new()
            .prefix("iris-profile-")
            .tempdir()
            .map_err(|e| ContentError::Render(format!("임시 프로필 생성 실패: {}", e)))?;

        debug!(url, profile = %profile.path().display(), "브라우저 렌더링 시작");
        let client = self.connect(profile.path()).await?;
        let result = self.render_page(&client, url).await;

        if let Err(e) = client.close().await {
            warn!(error = %e, "브라우저 세션 종료 실패");
        }
        if let Err(e) = profile.close() {
            warn!(error = %e, "임시 프로필 삭제 실패");
        }

        result
    }
}
