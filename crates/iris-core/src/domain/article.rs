//! 추출된 기사와 요약.

use serde::{Deserialize, Serialize};

/// 기사 본문 최대 길이 (문자 수).
pub const MAX_ARTICLE_CHARS: usize = 4000;

/// 요약 머리말.
pub const SUMMARY_HEADER: &str = "✅ 요약";

/// 요약 글머리표 개수.
pub const SUMMARY_BULLETS: usize = 6;

/// 문자열을 문자 수 기준으로 자릅니다.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// 웹 페이지에서 추출한 기사.
///
/// 본문은 항상 [`MAX_ARTICLE_CHARS`] 이하로 잘립니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// 제목 (없으면 빈 문자열)
    pub title: String,
    /// 본문
    pub body: String,
}

impl Article {
    /// 기사를 생성합니다. 본문이 길면 자릅니다.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_limit(title, body, MAX_ARTICLE_CHARS)
    }

    /// 지정한 길이 제한으로 기사를 생성합니다.
    ///
    /// 제한은 [`MAX_ARTICLE_CHARS`]를 넘을 수 없습니다.
    pub fn with_limit(title: impl Into<String>, body: impl Into<String>, max_chars: usize) -> Self {
        let body = body.into();
        let limit = max_chars.min(MAX_ARTICLE_CHARS);
        let body = truncate_chars(&body, limit).to_string();
        Self {
            title: title.into().trim().to_string(),
            body,
        }
    }

    /// 본문 길이 (문자 수).
    pub fn body_chars(&self) -> usize {
        self.body.chars().count()
    }
}

/// 요약 결과.
///
/// `✅ 요약` 머리말과 여섯 줄의 글머리표로 구성된 텍스트입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary(String);

impl Summary {
    /// 모델 응답을 요약으로 만듭니다. 머리말이 없으면 앞에 붙입니다.
    pub fn from_completion(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.contains(SUMMARY_HEADER) {
            Self(trimmed.to_string())
        } else {
            Self(format!("{}\n{}", SUMMARY_HEADER, trimmed))
        }
    }

    /// 글머리표 목록으로 요약을 만듭니다.
    ///
    /// 여섯 개보다 적으면 빈 글머리표로 채우고, 많으면 잘라냅니다.
    pub fn from_bullets<I, S>(bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines: Vec<String> = bullets
            .into_iter()
            .take(SUMMARY_BULLETS)
            .map(|b| format!("- {}", b.as_ref()))
            .collect();
        while lines.len() < SUMMARY_BULLETS {
            lines.push("- ".to_string());
        }
        Self(format!("{}\n{}", SUMMARY_HEADER, lines.join("\n")))
    }

    /// 요약 텍스트.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 요약 텍스트를 꺼냅니다.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
