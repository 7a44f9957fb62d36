//! 본문 추출 단계 순서 검증.

use async_trait::async_trait;
use iris_content::{ArticleExtractor, ContentError, ContentResult, PageRenderer, TwitterClient};
use iris_core::Article;
use mockito::{Matcher, Server};
use reqwest::Client;
use secrecy::SecretString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 호출 횟수를 세는 가짜 렌더러.
struct CountingRenderer {
    calls: AtomicUsize,
    body: Option<String>,
}

impl CountingRenderer {
    fn rendering(body: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            body: Some(body.to_string()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            body: None,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for CountingRenderer {
    async fn render(&self, _url: &str) -> ContentResult<Article> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => Ok(Article::new("렌더링 제목", body.clone())),
            None => Err(ContentError::Render("webdriver unavailable".into())),
        }
    }
}

fn page(body: &str) -> String {
    format!(
        "<html><head><title>기사 제목</title></head><body><article><p>{}</p></article></body></html>",
        body
    )
}

fn extractor(renderer: Arc<CountingRenderer>) -> ArticleExtractor {
    ArticleExtractor::with_client(Client::new(), renderer, 100, 4000)
}

async fn serve_html(server: &mut Server, path: &str, html: String) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

#[tokio::test]
async fn long_body_skips_rendering() {
    let mut server = Server::new_async().await;
    let _page = serve_html(&mut server, "/news/1", page(&"가".repeat(150))).await;
    let renderer = CountingRenderer::rendering("unused");

    let article = extractor(renderer.clone())
        .extract(&format!("{}/news/1", server.url()))
        .await
        .unwrap();

    assert_eq!(renderer.calls(), 0);
    assert_eq!(article.title, "기사 제목");
    assert_eq!(article.body_chars(), 150);
}

#[tokio::test]
async fn short_body_invokes_rendering() {
    let mut server = Server::new_async().await;
    let _page = serve_html(&mut server, "/news/2", page(&"가".repeat(50))).await;
    let renderer = CountingRenderer::rendering(&"렌".repeat(300));

    let article = extractor(renderer.clone())
        .extract(&format!("{}/news/2", server.url()))
        .await
        .unwrap();

    assert_eq!(renderer.calls(), 1);
    assert_eq!(article.title, "렌더링 제목");
    assert_eq!(article.body_chars(), 300);
}

#[tokio::test]
async fn non_html_response_invokes_rendering() {
    let mut server = Server::new_async().await;
    let _json = server
        .mock("GET", "/api")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;
    let renderer = CountingRenderer::rendering(&"렌".repeat(200));

    extractor(renderer.clone())
        .extract(&format!("{}/api", server.url()))
        .await
        .unwrap();

    assert_eq!(renderer.calls(), 1);
}

#[tokio::test]
async fn rendering_failure_keeps_short_body() {
    let mut server = Server::new_async().await;
    let _page = serve_html(&mut server, "/news/3", page(&"가".repeat(50))).await;
    let renderer = CountingRenderer::failing();

    let article = extractor(renderer.clone())
        .extract(&format!("{}/news/3", server.url()))
        .await
        .unwrap();

    assert_eq!(renderer.calls(), 1);
    assert_eq!(article.body_chars(), 50);
}

#[tokio::test]
async fn every_stage_failing_is_extraction_failure() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/gone")
        .with_status(404)
        .create_async()
        .await;
    let renderer = CountingRenderer::failing();

    let err = extractor(renderer)
        .extract(&format!("{}/gone", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ContentError::ExtractionFailed(_)));
}

#[tokio::test]
async fn tweet_urls_use_the_social_api() {
    let mut server = Server::new_async().await;
    let tweet = server
        .mock("GET", "/2/tweets/99")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"data":{"id":"99","text":"트윗 본문","author_id":"1","created_at":"2024-01-01T00:00:00.000Z"},
                "includes":{"users":[{"id":"1","name":"작성자","username":"writer"}]}}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let renderer = CountingRenderer::rendering("unused");
    let social = TwitterClient::new(
        Client::new(),
        &server.url(),
        SecretString::from("token".to_string()),
    );

    let article = extractor(renderer.clone())
        .with_social(social)
        .extract("https://x.com/writer/status/99")
        .await
        .unwrap();

    assert_eq!(article.body, "트윗 본문");
    assert!(article.title.starts_with("트위터 글 by 작성자 (@writer)"));
    assert_eq!(renderer.calls(), 0);
    tweet.assert_async().await;
}
