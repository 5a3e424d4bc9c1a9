//! Push the combined CSV to the shared spreadsheet
//!
//! Thin client for the Sheets batchUpdate endpoint: clear the first sheet,
//! paste the CSV, auto-fit the columns. Credentials come from the
//! environment; with none configured the push is skipped so local runs still
//! produce the CSV.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

pub fn push_csv_to_sheet(csv_path: &Path) -> Result<()> {
    let token = env::var("SHEETS_API_TOKEN").ok();
    let spreadsheet_id = env::var("SHEETS_SPREADSHEET_ID").ok();

    let (token, spreadsheet_id) = match (token, spreadsheet_id) {
        (Some(token), Some(id)) => (token, id),
        _ => {
            println!(
                "No spreadsheet configured (SHEETS_API_TOKEN / SHEETS_SPREADSHEET_ID); skipping upload."
            );
            return Ok(());
        }
    };

    let content = fs::read_to_string(csv_path)
        .with_context(|| format!("Failed to read CSV from {:?}", csv_path))?;

    let url = format!(
        "https://sheets.googleapis.com/v4/spreadsheets/{}:batchUpdate",
        spreadsheet_id
    );
    let body = serde_json::json!({
        "requests": [
            {
                "updateCells": {
                    "range": { "sheetId": 0 },
                    "fields": "userEnteredValue"
                }
            },
            {
                "pasteData": {
                    "coordinate": { "sheetId": 0, "rowIndex": 0, "columnIndex": 0 },
                    "data": content,
                    "type": "PASTE_NORMAL",
                    "delimiter": ","
                }
            },
            {
                "autoResizeDimensions": {
                    "dimensions": { "sheetId": 0, "dimension": "COLUMNS" }
                }
            }
        ]
    });

    let client = reqwest::blocking::Client::new();
    let response = client
        .post(&url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .context("Spreadsheet update request failed")?;

    if !response.status().is_success() {
        let status = response.status();
        let detail = response.text().unwrap_or_default();
        bail!("Spreadsheet update rejected: HTTP {} {}", status, detail);
    }

    println!("Uploaded {:?} to spreadsheet {}", csv_path, spreadsheet_id);
    Ok(())
}
