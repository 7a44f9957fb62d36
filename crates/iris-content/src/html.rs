//! HTML에서 제목과 본문 텍스트 추출.
//!
//! 네트워크 없이 문서 문자열만 다루므로 가벼운 요청과 브라우저 렌더링 결과에 모두 씁니다.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

/// 제목 후보 셀렉터 (순서대로 시도).
const TITLE_SELECTORS: &[&str] = &["h1", ".article-title", ".news-title", ".post-title", "title"];

/// 본문 컨테이너 후보 셀렉터 (순서대로 시도).
pub const ARTICLE_SELECTORS: &[&str] = &[
    "article",
    ".article-content",
    ".article-body",
    ".news-content",
    ".post-content",
    ".content",
    "#article-view-content-div",
    ".view-content",
    ".article_txt",
    ".news_txt",
];

/// 본문 컨테이너 안에서 제외할 태그.
const CONTAINER_SKIP_TAGS: &[&str] = &["script", "style", "iframe", "ins", "noscript"];

/// 본문 컨테이너 안에서 제외할 클래스.
const CONTAINER_SKIP_CLASSES: &[&str] = &["ad", "advertisement", "related", "recommend"];

/// 페이지 전체 텍스트에서 제외할 태그.
const PAGE_SKIP_TAGS: &[&str] = &[
    "head", "script", "style", "nav", "header", "footer", "aside", "iframe", "noscript",
];

static OG_TITLE: Lazy<Selector> = Lazy::new(|| parse_selector(r#"meta[property="og:title"]"#));
static TITLE_LIST: Lazy<Vec<Selector>> =
    Lazy::new(|| TITLE_SELECTORS.iter().map(|s| parse_selector(s)).collect());
static ARTICLE_LIST: Lazy<Vec<Selector>> =
    Lazy::new(|| ARTICLE_SELECTORS.iter().map(|s| parse_selector(s)).collect());

fn parse_selector(css: &str) -> Selector {
    // 상수 셀렉터만 전달됨
    Selector::parse(css).unwrap_or_else(|e| panic!("잘못된 셀렉터 {css}: {e:?}"))
}

/// 제외 규칙.
struct Exclusions<'a> {
    tags: &'a [&'a str],
    classes: &'a [&'a str],
}

/// 요소 아래 텍스트 노드를 순서대로 모읍니다. 제외 대상 하위 트리는 건너뜁니다.
fn collect_text(element: ElementRef<'_>, skip: &Exclusions<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let s: &str = text;
                out.push(s.to_string());
            }
            Node::Element(el) => {
                if skip.tags.contains(&el.name())
                    || el.classes().any(|c| skip.classes.contains(&c))
                {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, skip, out);
                }
            }
            _ => {}
        }
    }
}

/// 텍스트 조각을 줄 단위로 다듬습니다. 앞뒤 공백을 지우고 빈 줄을 버립니다.
pub fn normalize_lines<I, S>(parts: I, min_line_chars: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = parts
        .into_iter()
        .map(|p| p.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    joined
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && l.chars().count() > min_line_chars)
        .collect::<Vec<_>>()
        .join("\n")
}

fn element_text(element: ElementRef<'_>, skip: &Exclusions<'_>, min_line_chars: usize) -> String {
    let mut parts = Vec::new();
    collect_text(element, skip, &mut parts);
    normalize_lines(parts, min_line_chars)
}

/// 문서 제목을 찾습니다.
///
/// `og:title` 메타 태그를 먼저 보고, 이후 제목 셀렉터를 순서대로 시도합니다.
pub fn extract_title(document: &Html) -> String {
    let og = document
        .select(&OG_TITLE)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(title) = og {
        return title.to_string();
    }

    TITLE_LIST
        .iter()
        .filter_map(|sel| document.select(sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// 본문 컨테이너 셀렉터에서 본문을 찾습니다.
///
/// `min_chars`를 넘는 첫 컨테이너를 반환하고, 없으면 마지막으로 찾은 컨테이너 텍스트를 반환합니다.
pub fn extract_container_body(document: &Html, min_chars: usize) -> Option<String> {
    let skip = Exclusions {
        tags: CONTAINER_SKIP_TAGS,
        classes: CONTAINER_SKIP_CLASSES,
    };

    let mut last = None;
    for sel in ARTICLE_LIST.iter() {
        if let Some(el) = document.select(sel).next() {
            let text = element_text(el, &skip, 0);
            if text.chars().count() > min_chars {
                return Some(text);
            }
            last = Some(text);
        }
    }
    last.filter(|t| !t.is_empty())
}

/// 상용구 태그를 뺀 페이지 전체 텍스트.
///
/// `min_line_chars`보다 짧은 줄은 버립니다 (0이면 빈 줄만 버림).
pub fn extract_page_text(document: &Html, min_line_chars: usize) -> String {
    let skip = Exclusions {
        tags: PAGE_SKIP_TAGS,
        classes: &[],
    };
    element_text(document.root_element(), &skip, min_line_chars)
}

/// HTML 문서에서 제목과 본문을 추출합니다.
///
/// 본문 컨테이너가 `min_chars`를 넘지 못하면 페이지 전체 텍스트를 씁니다.
pub fn extract_article(html: &str, min_chars: usize) -> (String, String) {
    let document = Html::parse_document(html);
    let title = extract_title(&document);

    let body = match extract_container_body(&document, min_chars) {
        Some(body) if body.chars().count() > min_chars => body,
        _ => extract_page_text(&document, 0),
    };
    (title, body)
}
