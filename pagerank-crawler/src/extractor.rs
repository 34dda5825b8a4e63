//! Link extraction from raw page content.
//!
//! Extraction follows a deliberately simple model: relative links are always
//! resolved against the site root of the page, never against the page's own
//! directory, and the output order puts absolute links (newest first) ahead
//! of relative links (in document order).

use crate::fetcher::Fetch;
use scraper::{Html, Selector};
use tracing::info;

/// Suffixes of hrefs that point at resources rather than pages.
pub const NON_PAGE_EXTENSIONS: &[&str] = &[
    "css", "js", "png", "jpg", "gif", "tiff", "ico", "wma", "ogg", "mpg", "mp3", "mp4",
];

/// Strips a single trailing `/`.
pub fn trim_url(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Joins `path` onto `url`, inserting a `/` only when neither side has one.
pub fn concat_url(url: &str, path: &str) -> String {
    let mut result = url.to_string();
    if !url.ends_with('/') && !path.starts_with('/') {
        result.push('/');
    }
    result.push_str(path);
    result
}

/// Scheme and authority of `url`, e.g. `http://example.com:8080`.
///
/// No normalization happens: host case and ports are kept as written.
pub fn root_url(url: &str) -> &str {
    let authority_start = url.find("//").map(|i| i + 2).unwrap_or(0);
    match url[authority_start..].find('/') {
        Some(offset) => &url[..authority_start + offset],
        None => url,
    }
}

/// Whether an href should be treated as a candidate page link.
pub fn is_web_page(href: &str) -> bool {
    if href.starts_with('#') || href == "javascript:void(0)" {
        return false;
    }

    let lowered = href.to_ascii_lowercase();
    !NON_PAGE_EXTENSIONS
        .iter()
        .any(|ext| lowered.ends_with(&format!(".{}", ext)))
}

fn is_absolute(href: &str) -> bool {
    href.starts_with("http")
}

/// Target of a meta-refresh redirect, if the page declares one.
///
/// Returns `None` both when there is no refresh marker and when the marker
/// carries no usable `url=` target.
pub fn meta_refresh_target(content: &str) -> Option<String> {
    let document = Html::parse_document(content);
    let selector = Selector::parse("meta[http-equiv]").ok()?;

    document
        .select(&selector)
        .filter(|meta| {
            meta.value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(parse_refresh_content)
}

/// Parses a refresh `content` value of the form `<delay>;url=<target>`.
fn parse_refresh_content(content: &str) -> Option<String> {
    let (_delay, rest) = content.split_once(';')?;
    let rest = rest.trim_start();
    let (key, target) = rest.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case("url") {
        return None;
    }

    let target = target.trim().trim_matches(|c| c == '\'' || c == '"');
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

/// Every non-empty `href` attribute value, in document order.
pub fn harvest_hrefs(content: &str) -> Vec<String> {
    let document = Html::parse_document(content);
    let Ok(selector) = Selector::parse("[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

/// Filters, resolves and orders `hrefs` found on the page at `url`.
///
/// Absolute links are pushed to the front and relative links to the back,
/// so the result is the absolute links in reverse discovery order followed
/// by the relative links in discovery order. The first occurrence of a link
/// wins and the page's own URL is never included.
pub fn collect_links<S: AsRef<str>>(url: &str, hrefs: &[S]) -> Vec<String> {
    let root = root_url(url);
    let mut absolute: Vec<String> = Vec::new();
    let mut relative: Vec<String> = Vec::new();

    for href in hrefs.iter().map(AsRef::as_ref) {
        if !is_web_page(href) {
            continue;
        }

        let (link, is_abs) = if is_absolute(href) {
            (trim_url(href).to_string(), true)
        } else {
            (trim_url(&concat_url(root, href)).to_string(), false)
        };

        if link == url || absolute.contains(&link) || relative.contains(&link) {
            continue;
        }

        if is_abs {
            absolute.push(link);
        } else {
            relative.push(link);
        }
    }

    absolute.reverse();
    absolute.extend(relative);
    absolute
}

/// Extracts the outbound links of a page whose content has already been
/// fetched, following at most one meta-refresh redirect first.
pub async fn extract_links<F: Fetch + ?Sized>(
    fetcher: &F,
    url: &str,
    content: String,
) -> Vec<String> {
    let mut current_url = url.to_string();
    let mut content = content;

    if let Some(target) = meta_refresh_target(&content) {
        current_url = concat_url(root_url(url), &target);
        info!("Redirecting to {}", current_url);
        content = fetcher.fetch(&current_url).await;
    }

    let hrefs = harvest_hrefs(&content);
    collect_links(&current_url, &hrefs)
}
