pub mod blogfeed;
pub mod cen;
pub mod chronicle;
pub mod higheredjobs;

use std::time::Duration;

use anyhow::Result;
use scraper::Html;

use crate::extract;
use crate::types::{ScrapeOutcome, Source, SourceStatus};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/88.0.4324.96 Safari/537.36";

/// Shared blocking client. Boards occasionally bounce requests through a
/// redirect chain, so allow a handful of hops.
pub(crate) fn http_client() -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// Text of the first element matching `css`, whitespace-squashed. The
/// detail pages of the lister-style boards label every field block the same
/// way, with the value in the last child.
pub(crate) fn detail_field(document: &Html, css: &str) -> Result<Option<String>> {
    let sel = extract::selector(css)?;
    Ok(document
        .select(&sel)
        .next()
        .map(|el| extract::squash_text(&el.text().collect::<String>())))
}

/// Classify a transport-level failure the way the run log reports it.
pub(crate) fn classify_request_error(error: &reqwest::Error) -> SourceStatus {
    let text = error.to_string();
    if text.contains("SSL") || text.contains("certificate") {
        SourceStatus::SslError
    } else if error.is_timeout() || text.contains("timeout") {
        SourceStatus::Timeout
    } else if error.is_redirect() || text.contains("redirect") {
        SourceStatus::TooManyRedirects
    } else {
        SourceStatus::NetworkError
    }
}

pub async fn scrape_source(source: &Source) -> Result<ScrapeOutcome> {
    match source.scraper.as_str() {
        "cen" => {
            let url = source.url.clone();
            tokio::task::spawn_blocking(move || cen::scrape(&url))
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("Task join error: {}", e)))
        }
        "chronicle" => {
            let url = source.url.clone();
            tokio::task::spawn_blocking(move || chronicle::scrape(&url))
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("Task join error: {}", e)))
        }
        "higheredjobs" => {
            let url = source.url.clone();
            tokio::task::spawn_blocking(move || higheredjobs::scrape(&url))
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("Task join error: {}", e)))
        }
        "blogfeed" => {
            let url = source.url.clone();
            tokio::task::spawn_blocking(move || blogfeed::scrape(&url))
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("Task join error: {}", e)))
        }
        _ => {
            eprintln!("Unknown scraper type: {}", source.scraper);
            Ok(ScrapeOutcome::ok(vec![]))
        }
    }
}
