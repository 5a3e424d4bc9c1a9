use std::fmt;

use serde::{Deserialize, Serialize};

/// One normalized job posting, shaped like a row of the shared sheet.
///
/// `category`, `current_status` and `comments2` are never filled by a
/// scraper; they exist so the exported columns line up with the sheet's
/// manually-maintained ones.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobPosting {
    pub ads_title: String,
    /// MM/DD/YYYY
    pub posted_date: String,
    /// MM/DD/YYYY, application close date where the board exposes one
    #[serde(default)]
    pub priority_date: String,
    #[serde(default)]
    pub category: String,
    /// Hiring institution; rendered as a =hyperlink() formula pointing at
    /// the resolved application URL once the scraper has one.
    pub school: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub canada: bool,
    #[serde(default)]
    pub current_status: String,
    #[serde(default)]
    pub comments1: String,
    #[serde(default)]
    pub comments2: String,
    /// =hyperlink() formula pointing at the details page, labelled with the
    /// board name.
    pub ads_source: String,
    /// Per-board unique id parsed out of the details URL. Empty for boards
    /// without one.
    #[serde(default)]
    pub ads_job_code: String,
    /// Raw details-page URL. Cross-board merge key, never exported.
    #[serde(skip)]
    pub details_url: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Sources {
    pub sources: Vec<Source>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Source {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub url: String,
    pub enabled: bool,
    pub scraper: String,
}

/// What happened to one board during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Ok,
    NotFound,
    Forbidden,
    RateLimited,
    ServerError,
    Timeout,
    SslError,
    TooManyRedirects,
    NetworkError,
    ParseError,
    Unknown,
}

impl SourceStatus {
    pub fn from_http_code(code: u16) -> Self {
        match code {
            200..=299 => SourceStatus::Ok,
            404 => SourceStatus::NotFound,
            403 => SourceStatus::Forbidden,
            429 => SourceStatus::RateLimited,
            500..=599 => SourceStatus::ServerError,
            _ => SourceStatus::Unknown,
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceStatus::Ok => "ok",
            SourceStatus::NotFound => "not_found",
            SourceStatus::Forbidden => "forbidden",
            SourceStatus::RateLimited => "rate_limited",
            SourceStatus::ServerError => "server_error",
            SourceStatus::Timeout => "timeout",
            SourceStatus::SslError => "ssl_error",
            SourceStatus::TooManyRedirects => "too_many_redirects",
            SourceStatus::NetworkError => "network_error",
            SourceStatus::ParseError => "parse_error",
            SourceStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Scrape result for one board, detailed enough for the run log.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub postings: Vec<JobPosting>,
    pub status: SourceStatus,
    pub http_code: Option<u16>,
    pub error_message: Option<String>,
}

impl ScrapeOutcome {
    pub fn ok(postings: Vec<JobPosting>) -> Self {
        ScrapeOutcome {
            postings,
            status: SourceStatus::Ok,
            http_code: None,
            error_message: None,
        }
    }

    pub fn failed(status: SourceStatus, http_code: Option<u16>, message: String) -> Self {
        ScrapeOutcome {
            postings: vec![],
            status,
            http_code,
            error_message: Some(message),
        }
    }
}
