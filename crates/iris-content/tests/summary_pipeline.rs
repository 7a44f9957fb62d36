//! URL 요약 파이프라인 전체 흐름 (HTTP는 mockito, 렌더러는 가짜).

use async_trait::async_trait;
use iris_content::{
    ArticleExtractor, CompletionClient, ContentError, ContentResolver, ContentResult,
    OpenAiClient, PageRenderer, Summarizer, UrlSummaryService,
};
use iris_core::{Article, LlmConfig};
use mockito::Server;
use reqwest::Client;
use secrecy::SecretString;
use std::sync::Arc;

struct NoRenderer;

#[async_trait]
impl PageRenderer for NoRenderer {
    async fn render(&self, _url: &str) -> ContentResult<Article> {
        Err(ContentError::Render("disabled".into()))
    }
}

fn service(llm_base: &str) -> UrlSummaryService {
    let llm_config = LlmConfig {
        base_url: llm_base.to_string(),
        api_key: Some(SecretString::from("sk-test".to_string())),
        ..LlmConfig::default()
    };
    let llm: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(&llm_config).unwrap());

    UrlSummaryService::new(
        ContentResolver::with_client(Client::new()),
        ArticleExtractor::with_client(Client::new(), Arc::new(NoRenderer), 100, 4000),
        Summarizer::new(llm, &llm_config),
    )
}

#[tokio::test]
async fn message_with_url_is_summarized() {
    let mut server = Server::new_async().await;
    let _head = server
        .mock("HEAD", "/news/1")
        .with_status(200)
        .create_async()
        .await;
    let page = server
        .mock("GET", "/news/1")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(format!(
            "<html><head><title>속보</title></head><body><article>{}</article></body></html>",
            "중요한 내용이 담긴 문장입니다. ".repeat(20)
        ))
        .expect_at_least(1)
        .create_async()
        .await;
    let completion = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"- 누가: 정부\n- 무엇을: 발표\n- 언제: 오늘\n- 어디서: 서울\n- 왜: 경기\n- 어떻게: 브리핑"}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let svc = service(&server.url());
    let text = format!("이거 봐 {}/news/1 !", server.url());
    let summary = svc.summarize_text(&text).await.unwrap().unwrap();

    assert!(summary.as_str().starts_with("✅ 요약\n- 누가: 정부"));
    assert_eq!(summary.as_str().lines().count(), 7);
    page.assert_async().await;
    completion.assert_async().await;
}

#[tokio::test]
async fn text_without_url_is_none() {
    let svc = service("http://127.0.0.1:1");
    assert!(svc.summarize_text("오늘 점심 뭐 먹지").await.is_none());
}

#[tokio::test]
async fn unreachable_page_is_extraction_failure() {
    let svc = service("http://127.0.0.1:1");
    let err = svc
        .summarize_url("http://127.0.0.1:1/nothing")
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::ExtractionFailed(_)));
}
