// src/post.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Reverse;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    // Google Forms timestamps
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

/// Best-effort parse of whatever people type into a date cell.
/// Only used to order records; the stored string is never replaced.
pub fn parse_loose_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Newest first. Unparseable or missing dates go last; ties keep input order.
pub fn sort_by_date_desc<T>(items: &mut [T], date_of: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| {
        let date = parse_loose_date(date_of(item));
        (date.is_none(), Reverse(date))
    });
}

/// Treats input order as oldest-to-newest and flips it.
/// An approximation for sheets without a usable date column.
pub fn newest_first_by_order<T>(mut items: Vec<T>) -> Vec<T> {
    items.reverse();
    items
}

/// First `n` items that satisfy `keep`, in input order.
pub fn filter_and_cap<T>(
    items: impl IntoIterator<Item = T>,
    keep: impl FnMut(&T) -> bool,
    n: usize,
) -> Vec<T> {
    items.into_iter().filter(keep).take(n).collect()
}
