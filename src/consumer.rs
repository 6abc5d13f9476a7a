// src/consumer.rs

use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    config::SheetsConfig,
    datasets::{self, DatasetKind, Payload, Request},
    fetch::SheetSource,
    state::{Feed, LoadState},
};

/// What a page region shows for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Rendered {
    Idle { dataset: DatasetKind },
    Loading { dataset: DatasetKind },
    #[serde(rename = "ok")]
    Loaded { dataset: DatasetKind, data: Payload },
    Error { dataset: DatasetKind, message: String },
}

/// One page region bound to one dataset. Owns its own [`Feed`], so two
/// consumers never share results.
#[derive(Debug)]
pub struct Consumer {
    kind: DatasetKind,
    request: Request,
    feed: Feed<Payload>,
}

impl Consumer {
    pub fn new(kind: DatasetKind, request: Request) -> Self {
        Self {
            kind,
            request,
            feed: Feed::new(),
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Fetches, transforms and stores the result if this is still the
    /// latest request. Errors end up in the state, never returned.
    pub async fn refresh<S: SheetSource>(&self, source: &S, cfg: &SheetsConfig) -> Rendered {
        let ticket = self.feed.begin();
        let result = datasets::load(source, cfg, self.kind, &self.request).await;
        match &result {
            Ok(payload) => info!(dataset = %self.kind, items = payload.len(), "loaded"),
            Err(e) => error!(dataset = %self.kind, error = %e, "load failed"),
        }
        if !self.feed.complete(ticket, result) {
            debug!(dataset = %self.kind, "dropped superseded result");
        }
        self.render()
    }

    /// Stops accepting results for anything in flight.
    pub fn teardown(&self) {
        self.feed.teardown();
    }

    pub fn state(&self) -> LoadState<Payload> {
        self.feed.snapshot()
    }

    pub fn render(&self) -> Rendered {
        let dataset = self.kind;
        match self.feed.snapshot() {
            LoadState::Idle => Rendered::Idle { dataset },
            LoadState::Loading => Rendered::Loading { dataset },
            LoadState::Success(data) => Rendered::Loaded { dataset, data },
            LoadState::Failure(_) => Rendered::Error {
                dataset,
                message: dataset.failure_message().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        datasets::{testutil::table, View},
        error::SheetError,
        fetch::retry::tests::Scripted,
    };

    fn cfg() -> SheetsConfig {
        let mut cfg = SheetsConfig::default();
        cfg.sheets.insert(DatasetKind::HallOfFame, "HallOfFame".into());
        cfg
    }

    #[tokio::test]
    async fn success_renders_data() {
        let source = Scripted::new(vec![Ok(table(&[
            &["Id", "Name"],
            &["1", "Asha"],
            &["2", "Ravi"],
        ]))]);
        let consumer = Consumer::new(
            DatasetKind::HallOfFame,
            Request {
                view: View::Home,
                ..Default::default()
            },
        );
        assert_eq!(consumer.render(), Rendered::Idle { dataset: DatasetKind::HallOfFame });

        match consumer.refresh(&source, &cfg()).await {
            Rendered::Loaded { data: Payload::HallOfFame(people), .. } => {
                assert_eq!(people[0].name, "Ravi");
                assert_eq!(people[1].name, "Asha");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn failure_renders_the_dataset_message() {
        let source = Scripted::new(vec![Err(SheetError::status(403, "forbidden"))]);
        let consumer = Consumer::new(DatasetKind::HallOfFame, Request::default());
        let rendered = consumer.refresh(&source, &cfg()).await;

        assert_eq!(
            rendered,
            Rendered::Error {
                dataset: DatasetKind::HallOfFame,
                message: "Failed to load success stories. Please try again later.".into(),
            }
        );
        assert_eq!(
            consumer.state().error(),
            Some(&SheetError::status(403, "forbidden"))
        );
    }

    #[test]
    fn rendered_json_shape() {
        let json = serde_json::to_value(Rendered::Error {
            dataset: DatasetKind::Notices,
            message: "x".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "dataset": "notices", "message": "x"})
        );
    }
}
