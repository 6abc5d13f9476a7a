// src/fetch/mod.rs

use serde::Deserialize;
use std::{fmt, future::Future};

use crate::error::SheetError;

pub mod reader;
pub mod retry;

pub use reader::HttpSheetReader;
pub use retry::{RetryPolicy, Retrying, Sleeper, TokioSleeper};

/// A named sheet plus a column span, e.g. `Notices!A:I`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRange {
    pub sheet: String,
    pub columns: String,
}

impl SheetRange {
    pub fn new(sheet: impl Into<String>, columns: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            columns: columns.into(),
        }
    }

    /// The A1 expression the values endpoint expects.
    pub fn a1(&self) -> String {
        format!("{}!{}", self.sheet, self.columns)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1())
    }
}

/// The raw cell matrix returned by the values endpoint.
/// Row 0 is the header row; any row may be shorter than it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TabularResponse {
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

impl TabularResponse {
    pub fn new(values: Vec<Vec<String>>) -> Self {
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn header(&self) -> Option<&[String]> {
        self.values.first().map(Vec::as_slice)
    }

    /// Every row after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.values.get(1..).unwrap_or(&[])
    }

    /// Cell at `col` of `row`, empty when the row is short.
    pub fn cell(row: &[String], col: usize) -> &str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

/// Anything that can hand back the cells of a sheet range.
pub trait SheetSource: Send + Sync {
    fn fetch(
        &self,
        range: &SheetRange,
    ) -> impl Future<Output = Result<TabularResponse, SheetError>> + Send;
}

impl<S: SheetSource> SheetSource for &S {
    fn fetch(
        &self,
        range: &SheetRange,
    ) -> impl Future<Output = Result<TabularResponse, SheetError>> + Send {
        (**self).fetch(range)
    }
}
