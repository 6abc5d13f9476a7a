// src/datasets/notices.rs

use serde::Serialize;

use super::{fetch_records, View};
use crate::{
    error::SheetError,
    fetch::{SheetRange, SheetSource},
    post::{filter_and_cap, parse_loose_date, sort_by_date_desc},
    records::{HeaderStyle, MapOptions, Record},
    thumbnail::UrlNormalizer,
};

pub const COLUMNS: &str = "A:I";
pub const HOME_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub date: String,
    pub content: String,
    pub image_url: String,
    pub pdf_url: String,
    pub external_url: String,
    pub important: bool,
}

pub fn map_options() -> MapOptions {
    MapOptions::new(HeaderStyle::Trimmed)
}

/// First non-empty value among `keys`. Older sheets used `ImageURL`/`PDFURL`.
fn first_of<'a>(r: &'a Record, keys: &[&str]) -> &'a str {
    keys.iter()
        .map(|k| r.field(k))
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// Rows without a title are dropped.
pub fn from_records(records: &[Record]) -> Vec<Notice> {
    let normalizer = UrlNormalizer::strict();
    records
        .iter()
        .filter(|r| !r.field("Title").trim().is_empty())
        .map(|r| Notice {
            title: r.field("Title").to_string(),
            date: r.field("Date").to_string(),
            content: r.field("Content").to_string(),
            image_url: normalizer.normalize(first_of(r, &["Image", "ImageURL"])),
            pdf_url: first_of(r, &["PDF", "PDFURL"]).to_string(),
            external_url: r.field("URL").to_string(),
            important: r.field("Important").trim() == "Yes",
        })
        .collect()
}

/// Important notices first, then newest first; invalid dates trail each group.
pub fn sort_important_first(notices: &mut [Notice]) {
    notices.sort_by_cached_key(|n| {
        let date = parse_loose_date(&n.date);
        (!n.important, date.is_none(), std::cmp::Reverse(date))
    });
}

pub fn arrange(mut notices: Vec<Notice>, view: View) -> Vec<Notice> {
    match view {
        View::Page => {
            sort_important_first(&mut notices);
            notices
        }
        View::Home => {
            sort_by_date_desc(&mut notices, |n| n.date.as_str());
            filter_and_cap(notices, |_| true, HOME_LIMIT)
        }
    }
}

pub async fn load<S: SheetSource>(
    source: &S,
    sheet: &str,
    view: View,
) -> Result<Vec<Notice>, SheetError> {
    let range = SheetRange::new(sheet, COLUMNS);
    let records = fetch_records(source, &range, &map_options()).await?;
    Ok(arrange(from_records(&records), view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{datasets::testutil::table, records::map_records};

    fn sample() -> Vec<Notice> {
        let resp = table(&[
            &[" Title ", "Date", "Content", "Image", "PDF", "URL", "Important"],
            &["Exam schedule", "2024-03-10", "Check the board", "", "", "", "No"],
            &["", "2024-05-01", "orphan content"],
            &["Fee deadline", "2024-01-05", "", "", "", "", "Yes"],
            &["Holiday", "2024-06-01"],
            &["Results", "later", "", "", "", "", "Yes"],
            &["Workshop", "2024-04-20"],
        ]);
        from_records(&map_records(&resp, &map_options()))
    }

    #[test]
    fn untitled_rows_are_dropped() {
        let notices = sample();
        assert_eq!(notices.len(), 5);
        assert!(notices.iter().all(|n| !n.title.is_empty()));
    }

    #[test]
    fn page_view_puts_important_first() {
        let titles: Vec<_> = arrange(sample(), View::Page)
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(
            titles,
            vec!["Fee deadline", "Results", "Holiday", "Workshop", "Exam schedule"]
        );
    }

    #[test]
    fn home_view_is_three_newest() {
        let titles: Vec<_> = arrange(sample(), View::Home)
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Holiday", "Workshop", "Exam schedule"]);
    }

    #[test]
    fn legacy_columns_and_drive_images() {
        let id = "ABCDEFGHIJKLMNOPQRSTUVWXYZ01";
        let share = format!("https://drive.google.com/file/d/{}/view", id);
        let resp = table(&[
            &["Title", "Date", "ImageURL", "PDFURL", "Important"],
            &["Notice", "2024-01-01", share.as_str(), "https://x.test/a.pdf", " Yes "],
        ]);
        let notice = &from_records(&map_records(&resp, &map_options()))[0];
        assert_eq!(
            notice.image_url,
            format!("https://drive.google.com/thumbnail?id={}", id)
        );
        assert_eq!(notice.pdf_url, "https://x.test/a.pdf");
        assert!(notice.important);
    }
}
