//! Trade-magazine job board (chemistryjobs.acs.org)
//!
//! Listing pages use the `lister` markup family: each item carries the
//! title, recruiter and a `City, State` location, and links to a detail page
//! that holds the posted/close dates, the field of specialization and the
//! apply button. The apply button points at a redirector; the final URL
//! after the redirect chain is what gets embedded in the sheet.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use scraper::Html;

use crate::dates;
use crate::extract;
use crate::types::{JobPosting, ScrapeOutcome, SourceStatus};

use super::{classify_request_error, detail_field, http_client};

pub const BOARD_LABEL: &str = "C&ENJobs";

/// The board flags postings "new" for a couple of days; anything older than
/// this has already been picked up by a previous run.
const RECENT_DAYS: i64 = 5;

#[derive(Debug)]
pub struct ListingRow {
    pub title: String,
    pub school: String,
    pub city: String,
    pub state: String,
    pub details_url: String,
    pub job_code: String,
    pub rank: String,
}

#[derive(Debug)]
pub struct ListingPage {
    pub rows: Vec<ListingRow>,
    pub next_page: Option<String>,
}

#[derive(Debug)]
pub struct DetailPage {
    pub posted_date: Option<NaiveDate>,
    pub priority_date: Option<NaiveDate>,
    pub specialization: String,
    pub apply_url: Option<String>,
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

        for row in page.rows {
            let details_url = row.details_url.clone();
            match fetch_posting(&client, row, today) {
                Ok(Some(posting)) => postings.push(posting),
                Ok(None) => {}
                Err(e) => eprintln!("  Dropping {}: {}", details_url, e),
            }
        }

        match page.next_page {
            Some(next) => page_url = next,
            None => break,
        }
    }

    Ok(ScrapeOutcome::ok(postings))
}

/// Fetch one detail page and build the posting. Returns `Ok(None)` for
/// postings the board behavior excludes: stale ones and ones without an
/// apply button.
fn fetch_posting(
    client: &reqwest::blocking::Client,
    row: ListingRow,
    today: NaiveDate,
) -> Result<Option<JobPosting>> {
    let html = client
        .get(&row.details_url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| "detail fetch failed")?
        .text()?;
    let detail = parse_detail(&html, &row.details_url)?;

    let posted = detail
        .posted_date
        .context("detail page has no parseable posted date")?;
    if !dates::posted_within(posted, RECENT_DAYS, today) {
        return Ok(None);
    }
    let Some(apply_url) = detail.apply_url else {
        return Ok(None);
    };

    // The apply button points at a tracking redirector; Action=Cancel makes
    // it land on the employer's form without registering a click-through.
    let apply_final = resolve_apply_redirect(client, &format!("{}&Action=Cancel", apply_url))?;

    Ok(Some(JobPosting {
        ads_title: row.title,
        posted_date: dates::to_sheet_date(posted),
        priority_date: detail
            .priority_date
            .map(dates::to_sheet_date)
            .unwrap_or_default(),
        school: extract::hyperlink(&apply_final, &row.school),
        specialization: detail.specialization,
        rank: row.rank,
        city: row.city,
        state: row.state,
        ads_source: extract::hyperlink(&row.details_url, BOARD_LABEL),
        ads_job_code: row.job_code,
        details_url: row.details_url,
        ..Default::default()
    }))
}

/// Follow the apply redirect chain and report where it lands.
fn resolve_apply_redirect(client: &reqwest::blocking::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .with_context(|| "apply redirect fetch failed")?;
    Ok(response.url().to_string())
}

pub fn parse_listing(html: &str, page_url: &str) -> Result<ListingPage> {
    let document = Html::parse_document(html);
    let item_sel = extract::selector(".lister__item")?;
    let title_sel = extract::selector(".lister__header a")?;
    let location_sel = extract::selector(".lister__meta-item--location")?;
    let recruiter_sel = extract::selector(".lister__meta-item--recruiter")?;
    let details_sel = extract::selector(".lister__footer .lister__view-details a")?;
    let next_sel = extract::selector(".paginator__item a[rel=\"next\"]")?;

    let mut rows = Vec::new();
    for item in document.select(&item_sel) {
        let Some(title_el) = item.select(&title_sel).next() else {
            continue;
        };
        let title = extract::squash_text(&title_el.text().collect::<String>());

        let location = item
            .select(&location_sel)
            .next()
            .map(|el| extract::squash_text(&el.text().collect::<String>()))
            .unwrap_or_default();
        let (city, state) = extract::split_location(&location);

        let school = item
            .select(&recruiter_sel)
            .next()
            .map(|el| extract::squash_text(&el.text().collect::<String>()))
            .unwrap_or_default();

        let href = item
            .select(&details_sel)
            .next()
            .and_then(|el| el.value().attr("href"))
            .or_else(|| title_el.value().attr("href"));
        let Some(href) = href else {
            continue;
        };
        let details_url = extract::absolutize(page_url, href);

        rows.push(ListingRow {
            rank: extract::rank_from_title(&title),
            job_code: extract::job_code_from_path(&details_url).unwrap_or_default(),
            title,
            school,
            city,
            state,
            details_url,
        });
    }

    let next_page = document
        .select(&next_sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| extract::absolutize(page_url, href));

    Ok(ListingPage { rows, next_page })
}

pub fn parse_detail(html: &str, page_url: &str) -> Result<DetailPage> {
    let document = Html::parse_document(html);

    let posted_date = detail_field(&document, ".job-detail-description__posted-date > *:last-child")?
        .as_deref()
        .and_then(dates::parse_month_day_year);
    let priority_date = detail_field(&document, ".job-detail-description__end-date > *:last-child")?
        .as_deref()
        .and_then(dates::parse_month_day_year);

    let spec_sel =
        extract::selector(".job-detail-description__category-Fieldofspecialization > *:last-child")?;
    let specialization = document
        .select(&spec_sel)
        .next()
        .map(|el| extract::strip_whitespace_runs(&el.text().collect::<String>()))
        .unwrap_or_default();

    let apply_sel = extract::selector("a.button--apply")?;
    let apply_url = document
        .select(&apply_sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| extract::absolutize(page_url, href));

    Ok(DetailPage {
        posted_date,
        priority_date,
        specialization,
        apply_url,
    })
}
