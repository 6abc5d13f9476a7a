// src/config.rs

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path, time::Duration};
use tracing::debug;
use url::Url;

use crate::{
    datasets::DatasetKind,
    error::SheetError,
    fetch::{reader::DEFAULT_ENDPOINT, HttpSheetReader, RetryPolicy, SheetRange},
};

pub const ENV_API_KEY: &str = "GOOGLE_SHEETS_API_KEY";
pub const ENV_SHEET_ID: &str = "GOOGLE_SHEET_ID";
pub const ENV_ENDPOINT: &str = "GOOGLE_SHEETS_ENDPOINT";
pub const ENV_CONFIG_PATH: &str = "SHEETFEED_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
        }
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(s: RetrySettings) -> Self {
        RetryPolicy {
            max_attempts: s.max_attempts,
            initial_backoff: Duration::from_millis(s.initial_backoff_ms),
        }
    }
}

/// Where the sheets live and how to reach them.
///
/// Layered as defaults, then an optional YAML file, then environment
/// variables. Every field may be left unset; missing credentials only
/// surface as [`SheetError::Configuration`] when a sheet is actually read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetsConfig {
    pub api_key: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub sheets: BTreeMap<DatasetKind, String>,
    pub retry: RetrySettings,
}

impl SheetsConfig {
    /// Reads `path` (or `$SHEETFEED_CONFIG`) if given, then applies the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(ENV_CONFIG_PATH).ok();
        let path = path.or_else(|| env_path.as_deref().map(Path::new));
        let mut cfg = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let cfg: SheetsConfig =
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(cfg)
    }

    /// Overrides fields from `lookup`; blank values count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = get(ENV_SHEET_ID) {
            self.spreadsheet_id = Some(v);
        }
        if let Some(v) = get(ENV_ENDPOINT) {
            self.endpoint = Some(v);
        }
        for kind in DatasetKind::ALL {
            if let Some(v) = kind.sheet_env_vars().iter().find_map(|&k| get(k)) {
                self.sheets.insert(kind, v);
            }
        }
    }

    /// Configured sheet name, else the dataset's built-in fallback.
    pub fn sheet_name(&self, kind: DatasetKind) -> Option<String> {
        self.sheets
            .get(&kind)
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .or_else(|| kind.fallback_sheet().map(str::to_string))
    }

    pub fn range(&self, kind: DatasetKind) -> Result<SheetRange, SheetError> {
        let sheet = self.sheet_name(kind).ok_or_else(|| {
            SheetError::config(format!(
                "no sheet name for {}; set {}",
                kind,
                kind.sheet_env_vars()[0]
            ))
        })?;
        Ok(SheetRange::new(sheet, kind.columns()))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.into()
    }

    /// Builds the HTTP reader. Missing credentials are left for the reader
    /// to reject so no request is ever sent without them.
    pub fn reader(&self, client: Client) -> Result<HttpSheetReader> {
        let endpoint = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("parsing endpoint {}", endpoint))?;
        Ok(HttpSheetReader::new(
            client,
            endpoint,
            self.spreadsheet_id.clone().unwrap_or_default(),
            self.api_key.clone().unwrap_or_default(),
        )
        .with_timeout(self.request_timeout_secs.map(Duration::from_secs)))
    }
}
