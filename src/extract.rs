//! Shared field extraction helpers
//!
//! The boards disagree on almost everything, but the fields they disagree on
//! are extracted the same way: regex tokens out of the title, a `City, ST`
//! split, a job code buried in the details URL, and the =hyperlink()
//! formulas the sheet expects.

use anyhow::{anyhow, Result};
use regex::Regex;
use scraper::Selector;

/// Parse a CSS selector, turning the parser's lifetime-bound error into an
/// anyhow one so callers can use `?`.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {:?}: {:?}", css, e))
}

/// Spreadsheet hyperlink formula, the format the shared sheet uses for
/// clickable cells.
pub fn hyperlink(url: &str, label: &str) -> String {
    format!("=hyperlink(\"{}\",\"{}\")", url, label)
}

/// Rank tokens from a posting title: "Assistant/Associate Professor of
/// Chemistry" becomes "asst/assoc".
pub fn rank_from_title(title: &str) -> String {
    rank_tokens(title, r"(?i)assist|assoc")
}

/// Like [`rank_from_title`] but also recognizing "open rank" titles.
pub fn rank_with_open_from_title(title: &str) -> String {
    rank_tokens(title, r"(?i)assist|assoc|open\W+rank")
}

fn rank_tokens(title: &str, pattern: &str) -> String {
    if let Ok(re) = Regex::new(pattern) {
        return re
            .find_iter(title)
            .map(|m| m.as_str().to_lowercase().replace("assist", "asst"))
            .collect::<Vec<_>>()
            .join("/");
    }
    String::new()
}

/// Specialization keyword stems matched in a posting title, joined with ", ".
pub fn specialization_from_title(title: &str) -> String {
    if let Ok(re) = Regex::new(r"(?i)org\w*|anal\w*|inorg\w*|bio\w*|physic\w*|polymer\w*") {
        return re
            .find_iter(title)
            .map(|m| m.as_str().to_string())
            .collect::<Vec<_>>()
            .join(", ");
    }
    String::new()
}

/// Split "Houston, TX" on the first comma. The second part is empty when
/// there is no comma.
pub fn split_location(location: &str) -> (String, String) {
    match location.split_once(',') {
        Some((a, b)) => (a.trim().to_string(), b.trim().to_string()),
        None => (location.trim().to_string(), String::new()),
    }
}

/// Job code from a `/job/<code>/...` details path.
pub fn job_code_from_path(url: &str) -> Option<String> {
    if let Ok(re) = Regex::new(r"/job/([^/]+)/") {
        if let Some(caps) = re.captures(url) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Job code from a `JobCode=<code>` query parameter.
pub fn job_code_from_query(url: &str) -> Option<String> {
    if let Ok(re) = Regex::new(r"JobCode=([^&]+)") {
        if let Some(caps) = re.captures(url) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Collapse whitespace to single spaces and trim. Used on text assembled
/// from multiple HTML text nodes.
pub fn squash_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove runs of two or more whitespace characters entirely. The
/// specialization block on the detail pages indents every line, and the
/// indentation must vanish rather than become a space.
pub fn strip_whitespace_runs(text: &str) -> String {
    if let Ok(re) = Regex::new(r"\s{2,}") {
        return re.replace_all(text, "").into_owned();
    }
    text.to_string()
}

/// Resolve `href` against the page it appeared on. Handles absolute URLs,
/// host-relative paths and directory-relative paths.
pub fn absolutize(base: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    if let Some(scheme_end) = base.find("://") {
        let after_scheme = &base[scheme_end + 3..];
        if href.starts_with('/') {
            let host_end = after_scheme.find('/').map(|p| scheme_end + 3 + p);
            let origin = match host_end {
                Some(end) => &base[..end],
                None => base,
            };
            return format!("{}{}", origin, href);
        }
        if let Some(pos) = base.rfind('/') {
            if pos > scheme_end + 2 {
                return format!("{}{}", &base[..pos + 1], href);
            }
        }
        return format!("{}/{}", base, href);
    }

    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyperlink() {
        assert_eq!(
            hyperlink("https://example.edu/apply", "Example University"),
            "=hyperlink(\"https://example.edu/apply\",\"Example University\")"
        );
    }

    #[test]
    fn test_rank_from_title() {
        assert_eq!(
            rank_from_title("Assistant Professor of Chemistry"),
            "asst"
        );
        assert_eq!(
            rank_from_title("Assistant/Associate Professor"),
            "asst/assoc"
        );
        assert_eq!(rank_from_title("Professor of Chemistry"), "");
        // not recognized without the open-rank variant
        assert_eq!(rank_from_title("Open Rank Faculty Position"), "");
    }

    #[test]
    fn test_rank_with_open_from_title() {
        assert_eq!(
            rank_with_open_from_title("Open Rank Professor of Chemistry"),
            "open rank"
        );
        assert_eq!(
            rank_with_open_from_title("Assistant or Associate or Open-Rank"),
            "asst/assoc/open-rank"
        );
    }

    #[test]
    fn test_specialization_from_title() {
        assert_eq!(
            specialization_from_title("Assistant Professor - Organic Chemistry"),
            "Organic"
        );
        assert_eq!(
            specialization_from_title("Analytical and Inorganic Chemistry Faculty"),
            "Analytical, Inorganic"
        );
        assert_eq!(specialization_from_title("Chemistry Lecturer"), "");
    }

    #[test]
    fn test_split_location() {
        assert_eq!(
            split_location("Houston, TX"),
            ("Houston".to_string(), "TX".to_string())
        );
        assert_eq!(
            split_location(" College Station ,  Texas "),
            ("College Station".to_string(), "Texas".to_string())
        );
        assert_eq!(
            split_location("Ontario"),
            ("Ontario".to_string(), String::new())
        );
    }

    #[test]
    fn test_job_code_from_path() {
        assert_eq!(
            job_code_from_path("https://chemistryjobs.acs.org/job/7201432/assistant-professor/"),
            Some("7201432".to_string())
        );
        assert_eq!(job_code_from_path("https://chemistryjobs.acs.org/jobs/"), None);
    }

    #[test]
    fn test_job_code_from_query() {
        assert_eq!(
            job_code_from_query("https://www.higheredjobs.com/faculty/details.cfm?JobCode=178612345&Title=Assistant"),
            Some("178612345".to_string())
        );
        assert_eq!(
            job_code_from_query("https://www.higheredjobs.com/faculty/details.cfm?JobCode=178612345"),
            Some("178612345".to_string())
        );
        assert_eq!(job_code_from_query("https://example.com/?id=1"), None);
    }

    #[test]
    fn test_squash_text() {
        assert_eq!(squash_text("  Assistant\n   Professor "), "Assistant Professor");
    }

    #[test]
    fn test_strip_whitespace_runs() {
        assert_eq!(
            strip_whitespace_runs("Organic\n        Chemistry"),
            "OrganicChemistry"
        );
        assert_eq!(strip_whitespace_runs("Organic Chemistry"), "Organic Chemistry");
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://jobs.example.com/jobs/", "/job/123/title/"),
            "https://jobs.example.com/job/123/title/"
        );
        assert_eq!(
            absolutize("https://www.example.com/faculty/search.cfm?x=1", "details.cfm?JobCode=5&T=x"),
            "https://www.example.com/faculty/details.cfm?JobCode=5&T=x"
        );
        assert_eq!(
            absolutize("https://a.example.com/page", "https://b.example.com/other"),
            "https://b.example.com/other"
        );
    }
}
