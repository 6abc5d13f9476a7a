// src/datasets/faculties.rs

use serde::Serialize;

use super::fetch_records;
use crate::{
    error::SheetError,
    fetch::{SheetRange, SheetSource},
    records::{MapOptions, Record},
    thumbnail::UrlNormalizer,
};

pub const COLUMNS: &str = "A:G";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub qualification: String,
    pub institute: String,
    pub specialization: String,
    pub image: String,
}

pub fn map_options() -> MapOptions {
    MapOptions::default()
}

pub fn from_records(records: &[Record]) -> Vec<Faculty> {
    let normalizer = UrlNormalizer::strict();
    records
        .iter()
        .map(|r| Faculty {
            id: r.field("Id").to_string(),
            name: r.field("Name").to_string(),
            qualification: r.field("Qualification").to_string(),
            institute: r.field("Institute").to_string(),
            specialization: r.field("Specialization").to_string(),
            image: normalizer.normalize(r.field("Image")),
        })
        .collect()
}

pub async fn load<S: SheetSource>(source: &S, sheet: &str) -> Result<Vec<Faculty>, SheetError> {
    let range = SheetRange::new(sheet, COLUMNS);
    let records = fetch_records(source, &range, &map_options()).await?;
    Ok(from_records(&records))
}
