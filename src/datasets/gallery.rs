// src/datasets/gallery.rs

use serde::Serialize;

use super::{fetch_records, View};
use crate::{
    error::SheetError,
    fetch::{RetryPolicy, Retrying, SheetRange, SheetSource},
    post::{filter_and_cap, sort_by_date_desc},
    records::{HeaderStyle, MapOptions, Record},
    thumbnail::UrlNormalizer,
};

pub const COLUMNS: &str = "A:F";
pub const HOME_LIMIT: usize = 4;
pub const CATEGORIES: [&str; 4] = ["Classroom", "Events", "Facilities", "Others"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub id: String,
    pub date: String,
    pub image: String,
    pub caption: String,
    pub category: String,
}

/// Gallery page filter; `All` shows everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | "All" | "all" => CategoryFilter::All,
            other => CategoryFilter::Only(other.to_string()),
        }
    }

    pub fn matches(&self, image: &GalleryImage) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => !image.category.is_empty() && image.category == *c,
        }
    }
}

pub fn map_options() -> MapOptions {
    MapOptions::new(HeaderStyle::Normalized).with_synthetic_id()
}

pub fn from_records(records: &[Record]) -> Vec<GalleryImage> {
    let normalizer = UrlNormalizer::lenient();
    records
        .iter()
        .map(|r| GalleryImage {
            id: r.field("id").to_string(),
            date: r.field("date").to_string(),
            image: normalizer.normalize(r.field("image")),
            caption: r.field("caption").to_string(),
            category: r.field("category").to_string(),
        })
        .collect()
}

/// Landing page: the four newest images.
pub fn latest(mut images: Vec<GalleryImage>) -> Vec<GalleryImage> {
    sort_by_date_desc(&mut images, |i| i.date.as_str());
    filter_and_cap(images, |_| true, HOME_LIMIT)
}

pub fn filter_by_category(images: Vec<GalleryImage>, filter: &CategoryFilter) -> Vec<GalleryImage> {
    images.into_iter().filter(|i| filter.matches(i)).collect()
}

/// The landing page fetch goes through the retry wrapper; the gallery page
/// fetches once.
pub async fn load<S: SheetSource>(
    source: &S,
    sheet: &str,
    view: View,
    filter: &CategoryFilter,
    retry: RetryPolicy,
) -> Result<Vec<GalleryImage>, SheetError> {
    let range = SheetRange::new(sheet, COLUMNS);
    match view {
        View::Home => {
            let retrying = Retrying::new(source, retry);
            let records = fetch_records(&retrying, &range, &map_options()).await?;
            Ok(latest(from_records(&records)))
        }
        View::Page => {
            let records = fetch_records(source, &range, &map_options()).await?;
            Ok(filter_by_category(from_records(&records), filter))
        }
    }
}
