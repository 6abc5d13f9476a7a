pub mod config;
pub mod consumer;
pub mod datasets;
pub mod error;
pub mod fetch;
pub mod post;
pub mod records;
pub mod state;
pub mod thumbnail;

pub use config::SheetsConfig;
pub use consumer::{Consumer, Rendered};
pub use datasets::{DatasetKind, Payload, Request, View};
pub use error::SheetError;
pub use fetch::{HttpSheetReader, SheetRange, SheetSource, TabularResponse};
