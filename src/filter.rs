//! Posting filters applied after each board is scraped
//!
//! Two stages, in order: drop titles the list does not track (postdoc and
//! staff-scientist ads), then drop repeats of a job code already seen on the
//! same board.

use std::collections::HashSet;

use regex::Regex;

use crate::types::JobPosting;

/// Title keywords that disqualify a posting. The shared list tracks faculty
/// openings only.
pub const TITLE_IGNORE_KEYWORDS: &[&str] = &["post-doc", "postdoc", "post doc", "scientist"];

/// Case-insensitive keyword search over a posting title.
pub fn is_ignored_title(title: &str) -> bool {
    for keyword in TITLE_IGNORE_KEYWORDS {
        if let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(keyword))) {
            if re.is_match(title) {
                return true;
            }
        }
    }
    false
}

pub fn drop_ignored_titles(postings: Vec<JobPosting>) -> Vec<JobPosting> {
    postings
        .into_iter()
        .filter(|p| !is_ignored_title(&p.ads_title))
        .collect()
}

/// Drop postings whose job code was already seen. Postings without a code
/// (the blog feed has none) always pass.
pub fn dedup_by_job_code(postings: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen: HashSet<String> = HashSet::new();
    postings
        .into_iter()
        .filter(|p| {
            if p.ads_job_code.is_empty() {
                return true;
            }
            seen.insert(p.ads_job_code.clone())
        })
        .collect()
}
