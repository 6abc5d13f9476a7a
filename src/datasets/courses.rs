// src/datasets/courses.rs

use serde::Serialize;

use super::fetch_records;
use crate::{
    error::SheetError,
    fetch::{SheetRange, SheetSource},
    records::{HeaderStyle, MapOptions, Record},
};

pub const COLUMNS: &str = "A:F";

/// Categories shown on the courses page, in display order.
pub const CATEGORIES: [&str; 5] = [
    "Programming Language",
    "Foundation & Office Tools",
    "Creative Designing",
    "Mental Arithmetic",
    "Academic Support",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub name: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseCategory {
    pub title: String,
    pub slug: String,
    pub courses: Vec<Course>,
}

pub fn map_options() -> MapOptions {
    MapOptions::new(HeaderStyle::Normalized)
}

/// `"Foundation & Office Tools"` → `"foundation-office-tools"`
pub fn category_slug(title: &str) -> String {
    title.to_lowercase().replace(" & ", "-").replace(' ', "-")
}

pub fn from_records(records: &[Record]) -> Vec<Course> {
    records
        .iter()
        .map(|r| Course {
            name: r.field("coursename").to_string(),
            description: r.field("shortdescription").to_string(),
            category: r.field("category").trim().to_string(),
        })
        .collect()
}

/// Every known category appears, empty or not. Courses naming any other
/// category are left out.
pub fn group_by_category(courses: Vec<Course>) -> Vec<CourseCategory> {
    let mut groups: Vec<CourseCategory> = CATEGORIES
        .iter()
        .map(|title| CourseCategory {
            title: title.to_string(),
            slug: category_slug(title),
            courses: Vec::new(),
        })
        .collect();

    for course in courses {
        if let Some(group) = groups.iter_mut().find(|g| g.title == course.category) {
            group.courses.push(course);
        }
    }
    groups
}

pub async fn load<S: SheetSource>(source: &S, sheet: &str) -> Result<Vec<CourseCategory>, SheetError> {
    let range = SheetRange::new(sheet, COLUMNS);
    let records = fetch_records(source, &range, &map_options()).await?;
    Ok(group_by_category(from_records(&records)))
}
