//! University-jobs aggregator (higheredjobs.com)
//!
//! The search results are plain table-ish rows: the link text is the title
//! and the remaining text chunks are, in order, the school, a `City, State`
//! location, the department and a chunk containing the MM/DD/YY posted
//! date. The listing is newest-first, so pagination stops at the first page
//! with a stale row.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use crate::dates;
use crate::extract;
use crate::types::{JobPosting, ScrapeOutcome, SourceStatus};

use super::{classify_request_error, http_client};

pub const BOARD_LABEL: &str = "HigherEdJobs";

const RECENT_DAYS: i64 = 5;

#[derive(Debug)]
pub struct ListingRow {
    pub title: String,
    pub school: String,
    pub department: String,
    pub city: String,
    pub state: String,
    pub posted_date: Option<NaiveDate>,
    pub details_url: String,
    pub job_code: String,
    pub rank: String,
    pub specialization: String,
}

#[derive(Debug)]
pub struct ListingPage {
    pub rows: Vec<ListingRow>,
    pub next_page: Option<String>,
}

pub fn scrape(start_url: &str) -> Result<ScrapeOutcome> {
    let client = http_client()?;
    let today = dates::today();
    let mut postings = Vec::new();
    let mut page_url = start_url.to_string();

    loop {
        let response = match client.get(&page_url).send() {
            Ok(resp) => resp,
            Err(e) => {
                // A broken later page keeps what earlier pages produced.
                if postings.is_empty() {
                    return Ok(ScrapeOutcome::failed(
                        classify_request_error(&e),
                        None,
                        e.to_string(),
                    ));
                }
                eprintln!("  Stopping pagination at {}: {}", page_url, e);
                break;
            }
        };
        let code = response.status().as_u16();
        if !response.status().is_success() {
            if postings.is_empty() {
                return Ok(ScrapeOutcome::failed(
                    SourceStatus::from_http_code(code),
                    Some(code),
                    format!("HTTP {}", code),
                ));
            }
            eprintln!("  Stopping pagination at {}: HTTP {}", page_url, code);
            break;
        }

        let html = response.text()?;
        let page = parse_listing(&html, &page_url)?;

        let mut stale_row_seen = false;
        for row in page.rows {
            let Some(posted) = row.posted_date else {
                eprintln!("  Dropping {}: no parseable posted date", row.details_url);
                continue;
            };
            if !dates::posted_within(posted, RECENT_DAYS, today) {
                stale_row_seen = true;
                continue;
            }
            match fetch_posting(&client, row, posted) {
                Ok(posting) => postings.push(posting),
                Err(e) => eprintln!("  Dropping posting: {}", e),
            }
        }

        // Newest-first listing: once a page contains a stale row, every
        // following page is stale too.
        match page.next_page {
            Some(next) if !stale_row_seen => page_url = next,
            _ => break,
        }
    }

    Ok(ScrapeOutcome::ok(postings))
}

fn fetch_posting(
    client: &reqwest::blocking::Client,
    row: ListingRow,
    posted: NaiveDate,
) -> Result<JobPosting> {
    let html = client
        .get(&row.details_url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("detail fetch failed for {}", row.details_url))?
        .text()?;

    // The detail page may carry a direct link to the employer's own
    // application form; fall back to the details page itself.
    let application_url = parse_apply_link(&html)?.unwrap_or_else(|| row.details_url.clone());

    Ok(JobPosting {
        ads_title: row.title,
        posted_date: dates::to_sheet_date(posted),
        school: extract::hyperlink(&application_url, &row.school),
        department: row.department,
        specialization: row.specialization,
        rank: row.rank,
        city: row.city,
        state: row.state,
        ads_source: extract::hyperlink(&row.details_url, BOARD_LABEL),
        ads_job_code: row.job_code,
        details_url: row.details_url,
        ..Default::default()
    })
}

pub fn parse_listing(html: &str, page_url: &str) -> Result<ListingPage> {
    let document = Html::parse_document(html);
    let row_sel = extract::selector(".row.record")?;
    let link_sel = extract::selector("a")?;

    let mut rows = Vec::new();
    for record in document.select(&row_sel) {
        let Some(link) = record.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let details_url = extract::absolutize(page_url, href);

        // Non-blank text chunks: title, school, location, department, then
        // whatever chunk holds the posted date.
        let texts: Vec<String> = record
            .text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if texts.len() < 5 {
            continue;
        }
        let title = extract::squash_text(&texts[0]);
        let school = texts[1].clone();
        let (city, state) = extract::split_location(&texts[2]);
        let department = texts[3].clone();
        let posted_date = dates::find_short_date(&texts[4..].join(" "));

        rows.push(ListingRow {
            rank: extract::rank_from_title(&title),
            specialization: extract::specialization_from_title(&title),
            job_code: extract::job_code_from_query(&details_url).unwrap_or_default(),
            title,
            school,
            department,
            city,
            state,
            posted_date,
            details_url,
        });
    }

    Ok(ListingPage {
        rows,
        next_page: find_next_page(&document, page_url)?,
    })
}

/// The pager's "next" control is an image link: an `<a>` wrapping a
/// right-arrow gif that gains a `disabled` class on the last page.
fn find_next_page(document: &Html, page_url: &str) -> Result<Option<String>> {
    let link_sel = extract::selector("a")?;
    let img_sel = extract::selector("img")?;

    for link in document.select(&link_sel) {
        let is_next = link.select(&img_sel).any(|img| {
            let src = img.value().attr("src").unwrap_or("");
            let class = img.value().attr("class").unwrap_or("");
            src.contains("right.gif") && !class.contains("disabled")
        });
        if is_next {
            if let Some(href) = link.value().attr("href") {
                return Ok(Some(extract::absolutize(page_url, href)));
            }
        }
    }
    Ok(None)
}

/// Find the "Online App. Form" link inside the apply-info block and return
/// its original (un-proxied) destination.
pub fn parse_apply_link(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let info_sel = extract::selector("#jobApplyInfo")?;
    let label_sel = extract::selector(".field-label")?;
    let link_sel = extract::selector("a")?;

    for info in document.select(&info_sel) {
        for label in info.select(&label_sel) {
            let text = extract::squash_text(&label.text().collect::<String>());
            if !text.contains("Online App. Form") {
                continue;
            }
            // The link lives in the sibling block right after the label.
            for sibling in label.next_siblings() {
                let Some(element) = ElementRef::wrap(sibling) else {
                    continue;
                };
                if let Some(link) = element.select(&link_sel).next() {
                    if let Some(href) = link.value().attr("data-orig-href") {
                        return Ok(Some(href.to_string()));
                    }
                }
                break;
            }
        }
    }
    Ok(None)
}
