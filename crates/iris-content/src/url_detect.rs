//! 채팅 메시지에서 URL 찾기.

use once_cell::sync::Lazy;
use regex::Regex;

/// `http(s)://` URL 또는 알려진 최상위 도메인으로 끝나는 도메인.
///
/// 도메인 끝 경계는 ASCII 기준이라 `naver.com에서`처럼 한글 조사가 바로 붙어도 찾습니다.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"https?://[^\s)>\]}'"“”]+|(?:[a-zA-Z0-9-]+\.)+(?:com|net|org|io|co|kr|jp|us|uk|info|biz|tv|me|xyz)(?-u:\b)(?:/[^\s)>\]}'"“”]*)?"#,
    )
    .expect("URL 정규식")
});

/// URL 끝에서 떼어낼 문장 부호.
const TRAILING_PUNCTUATION: &[char] = &[')', '.', ',', '!', '?', ']', '}', '>', '\'', '"', '“', '”'];

/// 메시지에서 첫 번째 URL을 찾습니다.
///
/// 끝의 문장 부호를 떼고, 스킴이 없으면 `https://`를 붙입니다.
pub fn find_url(text: &str) -> Option<String> {
    let found = URL_PATTERN.find(text)?;
    let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
    if url.is_empty() {
        return None;
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        Some(format!("https://{}", url))
    }
}
