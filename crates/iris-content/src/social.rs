//! 트위터(X) 게시글 조회.
//!
//! 트윗 URL은 HTML 추출이 거의 항상 실패하므로 v2 API로 직접 가져옵니다.

use iris_core::{Article, ContentConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

static TWEET_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[/.])(?:twitter|x)\.com/[^/]+/status/(\d+)").expect("트윗 URL 정규식")
});

/// URL에서 트윗 ID를 찾습니다.
pub fn tweet_id(url: &str) -> Option<String> {
    TWEET_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: Option<TweetData>,
    #[serde(default)]
    includes: Option<TweetIncludes>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    text: String,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TweetIncludes {
    #[serde(default)]
    users: Vec<TweetUser>,
}

#[derive(Debug, Deserialize)]
struct TweetUser {
    id: String,
    name: String,
    username: String,
}

/// 트위터 v2 API 클라이언트.
pub struct TwitterClient {
    client: Client,
    base_url: String,
    bearer_token: SecretString,
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TwitterClient {
    /// 준비된 HTTP 클라이언트로 생성합니다.
    pub fn new(client: Client, base_url: &str, bearer_token: SecretString) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    /// 설정에서 생성합니다. 토큰이 없으면 `None`.
    pub fn from_config(config: &ContentConfig) -> Option<Self> {
        let token = config.twitter_bearer_token.clone()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| warn!(error = %e, "트위터 HTTP 클라이언트 생성 실패"))
            .ok()?;
        Some(Self::new(client, &config.twitter_base_url, token))
    }

    /// 트윗 URL이면 게시글을 기사로 가져옵니다.
    ///
    /// 트윗 URL이 아니거나 API 호출이 실패하면 `None`.
    pub async fn fetch(&self, url: &str) -> Option<Article> {
        let id = tweet_id(url)?;
        match self.lookup(&id).await {
            Ok(article) => article,
            Err(e) => {
                warn!(tweet_id = %id, error = %e, "트윗 조회 실패");
                None
            }
        }
    }

    async fn lookup(&self, id: &str) -> Result<Option<Article>, reqwest::Error> {
        let url = format!("{}/2/tweets/{}", self.base_url, id);
        debug!("GET {}", url);

        let response: TweetResponse = self
            .client
            .get(&url)
            .query(&[
                ("expansions", "author_id"),
                ("tweet.fields", "created_at,lang"),
                ("user.fields", "username,name"),
            ])
            .bearer_auth(self.bearer_token.expose_secret())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(tweet) = response.data else {
            return Ok(None);
        };

        let users = response.includes.unwrap_or_default().users;
        let author = users
            .iter()
            .find(|u| Some(&u.id) == tweet.author_id.as_ref())
            .or_else(|| users.first());

        let title = match author {
            Some(user) => format!(
                "트위터 글 by {} (@{}) ({})",
                user.name,
                user.username,
                tweet.created_at.as_deref().unwrap_or_default()
            ),
            None => "트위터 글".to_string(),
        };

        Ok(Some(Article::new(title, tweet.text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_tweet_id_matches_both_domains() {
        assert_eq!(
            tweet_id("https://twitter.com/someone/status/1234567890").as_deref(),
            Some("1234567890")
        );
        assert_eq!(
            tweet_id("https://x.com/someone/status/42?s=20").as_deref(),
            Some("42")
        );
        assert_eq!(
            tweet_id("https://mobile.twitter.com/someone/status/7").as_deref(),
            Some("7")
        );
    }

    #[test]
    fn test_tweet_id_requires_boundary() {
        assert_eq!(tweet_id("https://box.com/someone/status/1"), None);
        assert_eq!(tweet_id("https://example.com/news/1"), None);
    }

    #[tokio::test]
    async fn test_fetch_builds_article() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/2/tweets/42")
            .match_query(Matcher::UrlEncoded("expansions".into(), "author_id".into()))
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(
                r#"{"data":{"id":"42","text":"본문 트윗","author_id":"9","created_at":"2024-05-01T00:00:00.000Z"},
                    "includes":{"users":[{"id":"9","name":"홍길동","username":"hong"}]}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = TwitterClient::new(Client::new(), &server.url(), SecretString::from("tok".to_string()));
        let article = client.fetch("https://x.com/hong/status/42").await.unwrap();

        assert_eq!(
            article.title,
            "트위터 글 by 홍길동 (@hong) (2024-05-01T00:00:00.000Z)"
        );
        assert_eq!(article.body, "본문 트윗");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_failure_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/2/tweets/42")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = TwitterClient::new(Client::new(), &server.url(), SecretString::from("bad".to_string()));
        assert!(client.fetch("https://x.com/hong/status/42").await.is_none());
        assert!(client.fetch("https://example.com/a").await.is_none());
    }
}
