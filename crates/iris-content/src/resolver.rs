//! 단축 URL과 리다이렉트 해석.

use crate::{with_browser_headers, ContentResult};
use iris_core::ContentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// 최대 리다이렉트 횟수.
const MAX_REDIRECTS: usize = 10;

/// 최종 URL이 차단/에러 페이지임을 나타내는 문자열.
const ERROR_INDICATORS: &[&str] = &[
    "error.html",
    "blocked",
    "forbidden",
    "access-denied",
    "se-cu.com/ndsoft",
    "404",
    "403",
    "500",
];

/// 다른 호스트로 이동해도 되는 단축 URL 서비스.
const SHORTENER_HOSTS: &[&str] = &["bit.ly", "tinyurl", "naver.me", "t.co"];

/// 네이버 브리지 URL 표시.
const NAVER_BRIDGE: &str = "link.naver.com/bridge";

/// 리다이렉트를 따라가 최종 URL을 찾습니다.
///
/// 어떤 경우에도 실패하지 않습니다. 의심스러운 결과나 네트워크 에러는 원래 URL로 되돌립니다.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    client: Client,
}

impl ContentResolver {
    /// 설정에서 생성합니다.
    pub fn new(config: &ContentConfig) -> ContentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.resolve_timeout_secs))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }

    /// 준비된 HTTP 클라이언트로 생성합니다.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// URL을 해석합니다.
    pub async fn resolve(&self, url: &str) -> String {
        let original = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                debug!(url, error = %e, "URL 파싱 실패");
                return url.to_string();
            }
        };

        match self.follow(&original).await {
            Ok(final_url) => {
                let resolved = decide(&original, &final_url);
                debug!(url, resolved = %resolved, "URL 해석");
                resolved
            }
            Err(e) => {
                warn!(url, error = %e, "URL 해석 실패, 원래 URL 사용");
                url.to_string()
            }
        }
    }

    /// HEAD로 먼저 따라가 보고, 실패하거나 움직이지 않았으면 GET으로 다시 따라갑니다.
    async fn follow(&self, original: &Url) -> ContentResult<Url> {
        let head = with_browser_headers(self.client.head(original.clone()))
            .send()
            .await;

        match head {
            Ok(resp) if resp.status().as_u16() < 400 && resp.url() != original => {
                return Ok(resp.url().clone());
            }
            Ok(resp) => debug!(status = resp.status().as_u16(), "HEAD 결과 부족, GET 시도"),
            Err(e) => debug!(error = %e, "HEAD 실패, GET 시도"),
        }

        let resp = with_browser_headers(self.client.get(original.clone()))
            .send()
            .await?;
        Ok(resp.url().clone())
    }
}

/// 에러 표시는 포트 번호를 제외한 호스트/경로/쿼리에서만 찾습니다.
fn has_error_indicator(url: &Url) -> bool {
    let haystack = format!(
        "{}{}?{}",
        url.host_str().unwrap_or_default(),
        url.path(),
        url.query().unwrap_or_default()
    )
    .to_lowercase();
    ERROR_INDICATORS.iter().any(|i| haystack.contains(i))
}

fn is_shortener(url: &Url) -> bool {
    url.host_str()
        .map(|h| SHORTENER_HOSTS.iter().any(|s| h.contains(s)))
        .unwrap_or(false)
}

fn bridge_target(url: &Url) -> Option<String> {
    if !url.as_str().contains(NAVER_BRIDGE) {
        return None;
    }
    url.query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// 리다이렉트 결과에서 사용할 URL을 고릅니다.
fn decide(original: &Url, final_url: &Url) -> String {
    if has_error_indicator(final_url) {
        warn!(final_url = %final_url, "에러 페이지로 리다이렉트됨, 원래 URL 사용");
        return original.to_string();
    }

    if let Some(target) = bridge_target(final_url) {
        return target;
    }

    if final_url.host_str() != original.host_str() && !is_shortener(original) {
        warn!(
            from = original.host_str().unwrap_or_default(),
            to = final_url.host_str().unwrap_or_default(),
            "다른 도메인으로 리다이렉트됨, 원래 URL 사용"
        );
        return original.to_string();
    }

    final_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_error_page_reverts() {
        let original = url("https://bit.ly/abc");
        assert_eq!(
            decide(&original, &url("https://news.example.com/error/404")),
            "https://bit.ly/abc"
        );
        assert_eq!(
            decide(&original, &url("https://news.example.com/access-denied?x=1")),
            "https://bit.ly/abc"
        );
    }

    #[test]
    fn test_port_is_not_an_indicator() {
        let original = url("http://127.0.0.1:45003/a");
        let final_url = url("http://127.0.0.1:45003/articles/1");
        assert_eq!(decide(&original, &final_url), final_url.to_string());
    }

    #[test]
    fn test_bridge_param_decoded() {
        let original = url("https://naver.me/xyz");
        let final_url =
            url("https://link.naver.com/bridge?url=https%3A%2F%2Fnews.example.com%2Fa%3Fid%3D7");
        assert_eq!(
            decide(&original, &final_url),
            "https://news.example.com/a?id=7"
        );
    }

    #[test]
    fn test_host_change_only_from_shorteners() {
        assert_eq!(
            decide(&url("https://example.com/a"), &url("https://other.com/b")),
            "https://example.com/a"
        );
        assert_eq!(
            decide(&url("https://t.co/abc"), &url("https://other.com/b")),
            "https://other.com/b"
        );
        assert_eq!(
            decide(&url("https://tinyurl.com/abc"), &url("https://other.com/b")),
            "https://other.com/b"
        );
    }
}
