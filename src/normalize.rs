//! Cross-board merge
//!
//! The same opening is often posted to more than one board. Boards tack
//! tracking junk onto their URLs and re-case titles, so the merge key is a
//! (normalized title, normalized URL) pair rather than raw equality.

use std::collections::HashSet;

use crate::types::JobPosting;

/// Query parameters stripped before URL comparison.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "msclkid",
    "ref",
    "referrer",
    "source",
    "src",
    "sessionid",
    "session_id",
];

/// Normalize a URL for merge comparison: force https, lowercase the host,
/// drop the fragment, remove tracking parameters and sort the rest, and trim
/// the trailing slash on non-root paths.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let scheme = if scheme.eq_ignore_ascii_case("http") {
        "https"
    } else {
        scheme
    };

    let (host, path_query) = match rest.find('/') {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, "/"),
    };
    let host = host.to_lowercase();

    let path_query = path_query.split('#').next().unwrap_or("/");
    let (path, query) = match path_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_query, None),
    };

    let path = if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    };

    let mut params: Vec<(String, String)> = query
        .map(|q| {
            q.split('&')
                .filter_map(|pair| {
                    let (key, value) = match pair.split_once('=') {
                        Some((k, v)) => (k, v),
                        None => (pair, ""),
                    };
                    if key.is_empty() {
                        return None;
                    }
                    let key = key.to_lowercase();
                    if TRACKING_PARAMS.contains(&key.as_str()) {
                        return None;
                    }
                    Some((key, value.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    if params.is_empty() {
        return format!("{}://{}{}", scheme, host, path);
    }
    params.sort();
    let query = params
        .iter()
        .map(|(k, v)| {
            if v.is_empty() {
                k.clone()
            } else {
                format!("{}={}", k, v)
            }
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}://{}{}?{}", scheme, host, path, query)
}

fn normalize_title(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merge key for one posting.
pub fn merge_key(posting: &JobPosting) -> (String, String) {
    (
        normalize_title(&posting.ads_title),
        normalize_url(&posting.details_url),
    )
}

#[derive(Debug, Default)]
pub struct MergeStats {
    pub total_input: usize,
    pub unique_output: usize,
    pub duplicates_removed: usize,
}

/// Collapse the per-board lists into one. The first board to report an
/// opening wins; later copies are counted and dropped.
pub fn merge_boards(boards: Vec<Vec<JobPosting>>) -> (Vec<JobPosting>, MergeStats) {
    let mut merged: Vec<JobPosting> = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut stats = MergeStats::default();

    for board in boards {
        for posting in board {
            stats.total_input += 1;
            let key = merge_key(&posting);
            if !seen.insert(key) {
                stats.duplicates_removed += 1;
                continue;
            }
            merged.push(posting);
        }
    }

    stats.unique_output = merged.len();
    (merged, stats)
}
