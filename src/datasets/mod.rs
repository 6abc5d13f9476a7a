// src/datasets/mod.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::{
    config::SheetsConfig,
    error::SheetError,
    fetch::{SheetRange, SheetSource},
    records::{map_records, MapOptions, Record},
};

use courses::CourseCategory;
use faculties::Faculty;
use gallery::{CategoryFilter, GalleryImage};
use hall_of_fame::Achiever;
use notices::Notice;
use testimonials::Testimonial;

pub mod courses;
pub mod faculties;
pub mod gallery;
pub mod hall_of_fame;
pub mod notices;
pub mod testimonials;

/// Every sheet the site reads.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    Courses,
    Notices,
    Gallery,
    HallOfFame,
    Testimonials,
    Faculties,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 6] = [
        DatasetKind::Courses,
        DatasetKind::Notices,
        DatasetKind::Gallery,
        DatasetKind::HallOfFame,
        DatasetKind::Testimonials,
        DatasetKind::Faculties,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            DatasetKind::Courses => "courses",
            DatasetKind::Notices => "notices",
            DatasetKind::Gallery => "gallery",
            DatasetKind::HallOfFame => "hall-of-fame",
            DatasetKind::Testimonials => "testimonials",
            DatasetKind::Faculties => "faculties",
        }
    }

    /// Column span requested from the sheet.
    pub fn columns(self) -> &'static str {
        match self {
            DatasetKind::Courses => courses::COLUMNS,
            DatasetKind::Notices => notices::COLUMNS,
            DatasetKind::Gallery => gallery::COLUMNS,
            DatasetKind::HallOfFame => hall_of_fame::COLUMNS,
            DatasetKind::Testimonials => testimonials::COLUMNS,
            DatasetKind::Faculties => faculties::COLUMNS,
        }
    }

    /// Environment variables naming the sheet, first one set wins.
    pub fn sheet_env_vars(self) -> &'static [&'static str] {
        match self {
            DatasetKind::Courses => &["GOOGLE_SHEET_NAME_COURSE"],
            DatasetKind::Notices => &["GOOGLE_SHEET_NAME_NOTICE", "GOOGLE_SHEET_NAME_NOTICES"],
            DatasetKind::Gallery => &["GOOGLE_SHEET_NAME_GALLERY"],
            DatasetKind::HallOfFame => &["GOOGLE_SHEET_NAME_HALLOFFAME"],
            DatasetKind::Testimonials => &["GOOGLE_SHEET_NAME_TESTIMONIAL"],
            DatasetKind::Faculties => &["GOOGLE_SHEET_NAME_FACULTY"],
        }
    }

    /// Sheet name used when nothing is configured.
    pub fn fallback_sheet(self) -> Option<&'static str> {
        match self {
            DatasetKind::Notices => Some("Notices"),
            DatasetKind::Gallery => Some("Gallery"),
            DatasetKind::Faculties => Some("FacultyData"),
            _ => None,
        }
    }

    /// Shown in place of the data when loading fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            DatasetKind::Courses => {
                "Failed to load courses. Please check the Sheet setup and sharing permissions."
            }
            DatasetKind::Notices => "Failed to load notices. Please check back later.",
            DatasetKind::Gallery => "Failed to load gallery images. Please try again later.",
            DatasetKind::HallOfFame => "Failed to load success stories. Please try again later.",
            DatasetKind::Testimonials => "Could not load testimonials.",
            DatasetKind::Faculties => "Failed to load mentor data.",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Which page is asking: the landing page shows a short preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Home,
    #[default]
    Page,
}

/// Reader → mapper, the first two stages every dataset shares.
pub async fn fetch_records<S: SheetSource>(
    source: &S,
    range: &SheetRange,
    opts: &MapOptions,
) -> Result<Vec<Record>, SheetError> {
    let resp = source.fetch(range).await?;
    let records = map_records(&resp, opts);
    debug!(%range, records = records.len(), "mapped sheet rows");
    Ok(records)
}

/// What a consumer asks for beyond the dataset itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub view: View,
    /// Only meaningful for the gallery page.
    pub category: CategoryFilter,
}

/// One dataset's typed output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Courses(Vec<CourseCategory>),
    Notices(Vec<Notice>),
    Gallery(Vec<GalleryImage>),
    HallOfFame(Vec<Achiever>),
    Testimonials(Vec<Testimonial>),
    Faculties(Vec<Faculty>),
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Payload::Courses(v) => v.iter().map(|c| c.courses.len()).sum(),
            Payload::Notices(v) => v.len(),
            Payload::Gallery(v) => v.len(),
            Payload::HallOfFame(v) => v.len(),
            Payload::Testimonials(v) => v.len(),
            Payload::Faculties(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs the whole pipeline for one dataset.
pub async fn load<S: SheetSource>(
    source: &S,
    cfg: &SheetsConfig,
    kind: DatasetKind,
    req: &Request,
) -> Result<Payload, SheetError> {
    let range = cfg.range(kind)?;
    let sheet = range.sheet.as_str();
    Ok(match kind {
        DatasetKind::Courses => Payload::Courses(courses::load(source, sheet).await?),
        DatasetKind::Notices => Payload::Notices(notices::load(source, sheet, req.view).await?),
        DatasetKind::Gallery => Payload::Gallery(
            gallery::load(source, sheet, req.view, &req.category, cfg.retry_policy()).await?,
        ),
        DatasetKind::HallOfFame => {
            Payload::HallOfFame(hall_of_fame::load(source, sheet, req.view).await?)
        }
        DatasetKind::Testimonials => Payload::Testimonials(testimonials::load(source, sheet).await?),
        DatasetKind::Faculties => Payload::Faculties(faculties::load(source, sheet).await?),
    })
}
