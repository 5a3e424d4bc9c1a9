//! CSV export
//!
//! One file per board plus the combined `jobs.csv`. Column order matches the
//! shared sheet; fields a scraper never fills render as empty strings so the
//! manual columns stay aligned.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;

use crate::types::JobPosting;

pub const CSV_COLUMNS: &[&str] = &[
    "ads_title",
    "posted_date",
    "priority_date",
    "category",
    "school",
    "department",
    "specialization",
    "rank",
    "city",
    "state",
    "canada",
    "current_status",
    "comments1",
    "comments2",
    "ads_source",
    "ads_job_code",
];

/// Render one posting in CSV column order.
pub fn csv_row(posting: &JobPosting) -> Vec<String> {
    vec![
        posting.ads_title.clone(),
        posting.posted_date.clone(),
        posting.priority_date.clone(),
        posting.category.clone(),
        posting.school.clone(),
        posting.department.clone(),
        posting.specialization.clone(),
        posting.rank.clone(),
        posting.city.clone(),
        posting.state.clone(),
        if posting.canada {
            "True".to_string()
        } else {
            String::new()
        },
        posting.current_status.clone(),
        posting.comments1.clone(),
        posting.comments2.clone(),
        posting.ads_source.clone(),
        posting.ads_job_code.clone(),
    ]
}

pub fn write_csv(path: &Path, postings: &[JobPosting]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("Failed to create CSV at {:?}", path))?;

    writer
        .write_record(CSV_COLUMNS)
        .context("Failed to write CSV header")?;
    for posting in postings {
        writer
            .write_record(csv_row(posting))
            .with_context(|| format!("Failed to write posting {:?}", posting.ads_title))?;
    }
    writer.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// `<root>/data`, created on first use.
pub fn data_dir(root: &str) -> Result<PathBuf> {
    let dir = PathBuf::from(root).join("data");
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create data dir {:?}", dir))?;
    Ok(dir)
}
