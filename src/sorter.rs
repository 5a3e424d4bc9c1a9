//! Output ordering
//!
//! The sheet wants the newest postings at the top. Dates are compared as
//! dates, not as MM/DD/YYYY strings, so postings from December do not end up
//! ahead of a newer January batch. Postings with an unparseable date sink to
//! the bottom.

use chrono::NaiveDate;

use crate::dates;
use crate::types::JobPosting;

/// Sort latest-to-oldest by posted date. Stable, so same-day postings keep
/// their board order.
pub fn sort_latest_first(postings: &mut [JobPosting]) {
    postings.sort_by(|a, b| posted_key(b).cmp(&posted_key(a)));
}

fn posted_key(posting: &JobPosting) -> Option<NaiveDate> {
    dates::parse_sheet_date(&posting.posted_date)
}
