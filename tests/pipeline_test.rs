//! Pipeline tests over fixture pages
//!
//! Exercises each board's extraction against saved HTML/XML fixtures, then
//! runs the post-scrape stages (title filter, merge, sort, export) over the
//! extracted records.

use std::fs;

use chrono::{TimeZone, Utc};

use chemjobs::scrapers::{blogfeed, cen, chronicle, higheredjobs};
use chemjobs::types::JobPosting;
use chemjobs::{dates, export, extract, filter, normalize, sorter};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{}", name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

#[test]
fn test_cen_listing_rows() {
    let html = fixture("cen_listing.html");
    let page = cen::parse_listing(&html, "https://chemistryjobs.acs.org/jobs/full-time/north-america/")
        .unwrap();

    assert_eq!(page.rows.len(), 2);

    let row = &page.rows[0];
    assert_eq!(row.title, "Assistant Professor of Organic Chemistry");
    assert_eq!(row.school, "Example State University");
    assert_eq!(row.city, "Houston");
    assert_eq!(row.state, "Texas");
    assert_eq!(row.job_code, "7201432");
    assert_eq!(row.rank, "asst");
    assert_eq!(
        row.details_url,
        "https://chemistryjobs.acs.org/job/7201432/assistant-professor-of-organic-chemistry/"
    );

    assert_eq!(
        page.next_page.as_deref(),
        Some("https://chemistryjobs.acs.org/jobs/full-time/north-america/2/")
    );
}

#[test]
fn test_cen_detail_fields() {
    let html = fixture("cen_detail.html");
    let detail = cen::parse_detail(
        &html,
        "https://chemistryjobs.acs.org/job/7201432/assistant-professor-of-organic-chemistry/",
    )
    .unwrap();

    assert_eq!(
        detail.posted_date,
        chrono::NaiveDate::from_ymd_opt(2026, 7, 31)
    );
    assert_eq!(
        detail.priority_date,
        chrono::NaiveDate::from_ymd_opt(2026, 9, 15)
    );
    assert_eq!(detail.specialization, "Organic Chemistry");
    assert_eq!(
        detail.apply_url.as_deref(),
        Some("https://chemistryjobs.acs.org/apply/7201432/?src=detail")
    );
}

#[test]
fn test_chronicle_listing_rows() {
    let html = fixture("chronicle_listing.html");
    let page = chronicle::parse_listing(
        &html,
        "https://jobs.chronicle.com/jobs/chemistry-and-biochemistry/full-time/",
    )
    .unwrap();

    assert_eq!(page.rows.len(), 2);

    let canadian = &page.rows[0];
    assert_eq!(canadian.title, "Open Rank Professor of Chemistry");
    assert_eq!(canadian.state, "Ontario");
    assert!(canadian.canada);
    assert_eq!(canadian.rank, "open rank");
    assert_eq!(canadian.job_code, "38201177");

    let us = &page.rows[1];
    assert_eq!(us.state, "Illinois");
    assert!(!us.canada);
    assert_eq!(us.rank, "asst");

    assert!(page.next_page.is_none());
}

#[test]
fn test_chronicle_detail_fields() {
    let html = fixture("chronicle_detail.html");
    let detail = chronicle::parse_detail(
        &html,
        "https://jobs.chronicle.com/job/38201177/open-rank-professor-of-chemistry/",
    )
    .unwrap();

    assert_eq!(
        detail.posted_date,
        chrono::NaiveDate::from_ymd_opt(2026, 8, 2)
    );
    assert_eq!(detail.tenure_note, "Tenured/Tenure-track");
    assert_eq!(
        detail.apply_url.as_deref(),
        Some("https://jobs.chronicle.com/apply/38201177/?src=detail")
    );
}

#[test]
fn test_higheredjobs_listing_rows() {
    let html = fixture("higheredjobs_listing.html");
    let page = higheredjobs::parse_listing(
        &html,
        "https://www.higheredjobs.com/faculty/search.cfm?JobCat=101",
    )
    .unwrap();

    assert_eq!(page.rows.len(), 2);

    let row = &page.rows[0];
    assert_eq!(row.title, "Assistant Professor of Analytical Chemistry");
    assert_eq!(row.school, "Example College");
    assert_eq!(row.city, "Springfield");
    assert_eq!(row.state, "IL");
    assert_eq!(row.department, "Chemistry Department");
    assert_eq!(row.job_code, "178999001");
    assert_eq!(row.rank, "asst");
    assert_eq!(row.specialization, "Analytical");
    assert_eq!(
        row.posted_date,
        chrono::NaiveDate::from_ymd_opt(2026, 8, 3)
    );
    assert_eq!(
        row.details_url,
        "https://www.higheredjobs.com/faculty/details.cfm?JobCode=178999001&Title=Assistant%20Professor"
    );

    // the disabled left arrow is not the pager's next control
    assert_eq!(
        page.next_page.as_deref(),
        Some("https://www.higheredjobs.com/faculty/search.cfm?JobCat=101&StartRow=26")
    );
}

#[test]
fn test_higheredjobs_apply_link() {
    let html = fixture("higheredjobs_detail.html");
    let link = higheredjobs::parse_apply_link(&html).unwrap();
    assert_eq!(
        link.as_deref(),
        Some("https://jobs.examplecollege.edu/postings/4321")
    );
}

#[test]
fn test_blogfeed_window_and_title_split() {
    let xml = fixture("blog_feed.xml");
    let feed = feed_rs::parser::parse(xml.as_bytes()).unwrap();

    let now = Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap();
    let postings = blogfeed::postings_from_feed(&feed, now);

    // the July entry is outside the recency window
    assert_eq!(postings.len(), 1);

    let posting = &postings[0];
    assert_eq!(posting.ads_title, "Assistant Professor, Inorganic Chemistry");
    assert_eq!(posting.posted_date, "08/01/2026");
    assert!(posting.canada);
    assert!(posting.ads_job_code.is_empty());
    assert_eq!(
        posting.school,
        "=hyperlink(\"https://chempostingscanada.blogspot.com/2026/08/northern-example-university.html\",\"Northern Example University\")"
    );
    assert!(posting.ads_source.contains("ChemPostingCanada"));
}

#[test]
fn test_filter_merge_sort_export_over_fixtures() {
    let cen_page = cen::parse_listing(
        &fixture("cen_listing.html"),
        "https://chemistryjobs.acs.org/jobs/full-time/north-america/",
    )
    .unwrap();
    let chronicle_page = chronicle::parse_listing(
        &fixture("chronicle_listing.html"),
        "https://jobs.chronicle.com/jobs/chemistry-and-biochemistry/full-time/",
    )
    .unwrap();

    let cen_postings: Vec<JobPosting> = cen_page
        .rows
        .into_iter()
        .map(|row| JobPosting {
            ads_title: row.title,
            posted_date: "08/01/2026".to_string(),
            school: extract::hyperlink(&row.details_url, &row.school),
            rank: row.rank,
            city: row.city,
            state: row.state,
            ads_source: extract::hyperlink(&row.details_url, cen::BOARD_LABEL),
            ads_job_code: row.job_code,
            details_url: row.details_url,
            ..Default::default()
        })
        .collect();

    let mut chronicle_postings: Vec<JobPosting> = chronicle_page
        .rows
        .into_iter()
        .map(|row| JobPosting {
            ads_title: row.title,
            posted_date: "08/03/2026".to_string(),
            school: extract::hyperlink(&row.details_url, &row.school),
            rank: row.rank,
            state: row.state,
            canada: row.canada,
            ads_source: extract::hyperlink(&row.details_url, chronicle::BOARD_LABEL),
            ads_job_code: row.job_code,
            details_url: row.details_url,
            ..Default::default()
        })
        .collect();

    // the same Canadian opening, re-listed with tracking junk on the URL
    let mut relisted = chronicle_postings[0].clone();
    relisted.details_url = format!("{}?utm_source=alert", relisted.details_url);
    chronicle_postings.push(relisted);

    // title filter drops the postdoc ad from the trade-magazine board
    let cen_postings = filter::drop_ignored_titles(cen_postings);
    assert_eq!(cen_postings.len(), 1);

    let (mut merged, stats) = normalize::merge_boards(vec![cen_postings, chronicle_postings]);
    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(merged.len(), 3);

    sorter::sort_latest_first(&mut merged);
    assert_eq!(
        dates::parse_sheet_date(&merged[0].posted_date),
        chrono::NaiveDate::from_ymd_opt(2026, 8, 3)
    );

    let path = std::env::temp_dir().join("chemjobs_pipeline_test.csv");
    export::write_csv(&path, &merged).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("ads_title,posted_date,"));
    assert!(content.contains("Open Rank Professor of Chemistry"));
    assert!(!content.contains("Postdoctoral"));
    fs::remove_file(&path).ok();
}
