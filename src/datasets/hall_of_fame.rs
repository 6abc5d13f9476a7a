// src/datasets/hall_of_fame.rs

use serde::Serialize;

use super::{fetch_records, View};
use crate::{
    error::SheetError,
    fetch::{SheetRange, SheetSource},
    post::{filter_and_cap, newest_first_by_order},
    records::{MapOptions, Record},
    thumbnail::UrlNormalizer,
};

pub const COLUMNS: &str = "A:G";
pub const HOME_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achiever {
    pub id: String,
    pub name: String,
    pub image: String,
    pub designation: String,
    pub institute: String,
    pub year: String,
}

pub fn map_options() -> MapOptions {
    MapOptions::default()
}

pub fn from_records(records: &[Record]) -> Vec<Achiever> {
    let normalizer = UrlNormalizer::lenient();
    records
        .iter()
        .map(|r| Achiever {
            id: r.field("Id").to_string(),
            name: r.field("Name").to_string(),
            image: normalizer.normalize(r.field("Image")),
            designation: r.field("Achievement").to_string(),
            institute: r.field("Organization").to_string(),
            year: r.field("Batch").to_string(),
        })
        .collect()
}

/// The sheet has no reliable date column, so the landing page trusts
/// data-entry order and shows the last four rows, newest first.
pub fn arrange(achievers: Vec<Achiever>, view: View) -> Vec<Achiever> {
    match view {
        View::Page => achievers,
        View::Home => filter_and_cap(newest_first_by_order(achievers), |_| true, HOME_LIMIT),
    }
}

pub async fn load<S: SheetSource>(
    source: &S,
    sheet: &str,
    view: View,
) -> Result<Vec<Achiever>, SheetError> {
    let range = SheetRange::new(sheet, COLUMNS);
    let records = fetch_records(source, &range, &map_options()).await?;
    Ok(arrange(from_records(&records), view))
}
