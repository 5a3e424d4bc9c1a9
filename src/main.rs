use anyhow::Result;

use chemjobs::{export, filter, normalize, scrapers, sheets, sorter, storage, SourceStatus};

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());

    let sources = storage::load_sources(&root)?;
    let enabled_sources: Vec<_> = sources.sources.iter().filter(|s| s.enabled).collect();

    let data_dir = export::data_dir(&root)?;
    let combined_path = data_dir.join("jobs.csv");
    storage::remove_stale_export(&combined_path)?;

    let mut boards = Vec::new();
    for source in &enabled_sources {
        println!("Scraping: {} ({})", source.name, source.url);
        let outcome = match scrapers::scrape_source(source).await {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("  Scrape failed: {}", e);
                continue;
            }
        };
        if outcome.status != SourceStatus::Ok {
            eprintln!(
                "  {} - {} ({})",
                outcome
                    .http_code
                    .map(|c| format!("HTTP {}", c))
                    .unwrap_or_else(|| "request failed".to_string()),
                outcome.status,
                outcome.error_message.unwrap_or_default(),
            );
            continue;
        }

        let scraped = outcome.postings.len();
        let mut kept = filter::drop_ignored_titles(outcome.postings);
        kept = filter::dedup_by_job_code(kept);
        println!("  {} postings ({} filtered out)", kept.len(), scraped - kept.len());

        sorter::sort_latest_first(&mut kept);
        let board_path = data_dir.join(format!("{}_jobs.csv", source.scraper));
        export::write_csv(&board_path, &kept)?;

        boards.push(kept);
    }

    let (mut merged, stats) = normalize::merge_boards(boards);
    sorter::sort_latest_first(&mut merged);
    export::write_csv(&combined_path, &merged)?;
    println!(
        "Wrote {} postings to {:?} ({} cross-board duplicates removed)",
        merged.len(),
        combined_path,
        stats.duplicates_removed
    );

    sheets::push_csv_to_sheet(&combined_path)?;

    Ok(())
}
