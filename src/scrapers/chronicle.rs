//! Higher-education job board (jobs.chronicle.com)
//!
//! Same `lister` markup family as the trade-magazine board, with two
//! differences that matter: the location reads `State, Country` instead of
//! `City, State`, and the detail page exposes an employment level that
//! becomes a tenure note. Titles here also use "open rank".

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use scraper::Html;

use crate::dates;
use crate::extract;
use crate::types::{JobPosting, ScrapeOutcome, SourceStatus};

use super::{classify_request_error, detail_field, http_client};

pub const BOARD_LABEL: &str = "Chronicle of Higher Education Jobs";

const RECENT_DAYS: i64 = 5;

#[derive(Debug)]
pub struct ListingRow {
    pub title: String,
    pub school: String,
    pub state: String,
    pub canada: bool,
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
    /// Employment level text, kept only when it mentions tenure.
    pub tenure_note: String,
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

    let apply_final = client
        .get(format!("{}&Action=Cancel", apply_url))
        .send()
        .map(|r| r.url().to_string())
        .with_context(|| "apply redirect fetch failed")?;

    Ok(Some(JobPosting {
        ads_title: row.title,
        posted_date: dates::to_sheet_date(posted),
        school: extract::hyperlink(&apply_final, &row.school),
        rank: row.rank,
        state: row.state,
        canada: row.canada,
        comments1: detail.tenure_note,
        ads_source: extract::hyperlink(&row.details_url, BOARD_LABEL),
        ads_job_code: row.job_code,
        details_url: row.details_url,
        ..Default::default()
    }))
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

        // Location reads "Illinois, United States" or "Ontario, Canada".
        let location = item
            .select(&location_sel)
            .next()
            .map(|el| extract::squash_text(&el.text().collect::<String>()))
            .unwrap_or_default();
        let (state, country) = extract::split_location(&location);
        let canada = is_in_canada(&country);

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
            rank: extract::rank_with_open_from_title(&title),
            job_code: extract::job_code_from_path(&details_url).unwrap_or_default(),
            title,
            school,
            state,
            canada,
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

    let employment_level = detail_field(
        &document,
        ".job-detail-description__category-EmploymentLevel > *:last-child",
    )?
    .unwrap_or_default();
    let tenure_note = if mentions_tenure(&employment_level) {
        employment_level
    } else {
        String::new()
    };

    let apply_sel = extract::selector("a.button--apply")?;
    let apply_url = document
        .select(&apply_sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| extract::absolutize(page_url, href));

    Ok(DetailPage {
        posted_date,
        tenure_note,
        apply_url,
    })
}

fn is_in_canada(country: &str) -> bool {
    if let Ok(re) = Regex::new(r"(?i)canada") {
        return re.is_match(country);
    }
    false
}

fn mentions_tenure(employment_level: &str) -> bool {
    if let Ok(re) = Regex::new(r"(?i)tenured") {
        return re.is_match(employment_level);
    }
    false
}
