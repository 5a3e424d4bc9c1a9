//! Blog-feed board (chempostingscanada.blogspot.com)
//!
//! An Atom feed rather than an HTML board. Each entry titles itself
//! `School: Position`, links to the blog post, and carries an RFC 3339
//! publish date. Blog posts trickle in slower than board listings, so the
//! recency window is wider here.

use anyhow::Result;
use chrono::{DateTime, Utc};
use feed_rs::model::Feed;

use crate::dates::SHEET_DATE_FORMAT;
use crate::extract;
use crate::types::{JobPosting, ScrapeOutcome, SourceStatus};

use super::{classify_request_error, http_client};

pub const BOARD_LABEL: &str = "ChemPostingCanada";

const RECENT_DAYS: i64 = 10;

pub fn scrape(feed_url: &str) -> Result<ScrapeOutcome> {
    let client = http_client()?;

    let response = match client.get(feed_url).send() {
        Ok(resp) => resp,
        Err(e) => {
            return Ok(ScrapeOutcome::failed(
                classify_request_error(&e),
                None,
                e.to_string(),
            ))
        }
    };
    let code = response.status().as_u16();
    if !response.status().is_success() {
        return Ok(ScrapeOutcome::failed(
            SourceStatus::from_http_code(code),
            Some(code),
            format!("HTTP {}", code),
        ));
    }

    let body = response.bytes()?;
    let feed = match feed_rs::parser::parse(&body[..]) {
        Ok(feed) => feed,
        Err(e) => {
            return Ok(ScrapeOutcome::failed(
                SourceStatus::ParseError,
                Some(code),
                e.to_string(),
            ))
        }
    };

    Ok(ScrapeOutcome::ok(postings_from_feed(&feed, Utc::now())))
}

/// Build postings from feed entries published within the recency window.
pub fn postings_from_feed(feed: &Feed, now: DateTime<Utc>) -> Vec<JobPosting> {
    let mut postings = Vec::new();

    for entry in &feed.entries {
        let Some(published) = entry.published else {
            continue;
        };
        if (now - published).num_days() > RECENT_DAYS {
            continue;
        }

        let raw_title = entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default();
        // Entries title themselves "School: Position".
        let (school, title) = match raw_title.split_once(':') {
            Some((school, title)) => (school.trim().to_string(), title.trim().to_string()),
            None => (String::new(), raw_title.trim().to_string()),
        };

        let details_url = entry
            .links
            .iter()
            .find(|link| link.rel.as_deref() == Some("alternate"))
            .or_else(|| entry.links.first())
            .map(|link| link.href.clone())
            .unwrap_or_default();
        if details_url.is_empty() {
            eprintln!("  Dropping feed entry {:?}: no link", raw_title);
            continue;
        }

        postings.push(JobPosting {
            ads_title: title,
            posted_date: published.format(SHEET_DATE_FORMAT).to_string(),
            school: extract::hyperlink(&details_url, &school),
            canada: true,
            ads_source: extract::hyperlink(&details_url, BOARD_LABEL),
            details_url,
            ..Default::default()
        });
    }

    postings
}
