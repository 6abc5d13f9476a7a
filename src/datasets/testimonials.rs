// src/datasets/testimonials.rs

use serde::Serialize;

use crate::{
    error::SheetError,
    fetch::{SheetRange, SheetSource, TabularResponse},
};

pub const COLUMNS: &str = "A:F";

// Form responses: Timestamp, Id, Name, Course, Batch, Message
const ID: usize = 1;
const NAME: usize = 2;
const COURSE: usize = 3;
const BATCH: usize = 4;
const MESSAGE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub designation: String,
    pub batch: String,
    pub message: String,
}

/// Read by position: the form's header wording changes, its column order does not.
/// Rows missing a name or a message are skipped.
pub fn from_response(resp: &TabularResponse) -> Vec<Testimonial> {
    resp.data_rows()
        .iter()
        .map(|row| {
            let cell = |i| TabularResponse::cell(row, i).to_string();
            Testimonial {
                id: cell(ID),
                name: cell(NAME),
                designation: cell(COURSE),
                batch: cell(BATCH),
                message: cell(MESSAGE),
            }
        })
        .filter(|t| !t.name.trim().is_empty() && !t.message.trim().is_empty())
        .collect()
}

pub async fn load<S: SheetSource>(source: &S, sheet: &str) -> Result<Vec<Testimonial>, SheetError> {
    let range = SheetRange::new(sheet, COLUMNS);
    let resp = source.fetch(&range).await?;
    Ok(from_response(&resp))
}
