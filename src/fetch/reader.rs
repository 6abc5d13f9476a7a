// src/fetch/reader.rs

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{SheetRange, SheetSource, TabularResponse};
use crate::error::SheetError;

pub const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

/// Error envelope the values endpoint sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Reads sheet ranges through the Sheets `values` REST endpoint.
#[derive(Debug, Clone)]
pub struct HttpSheetReader {
    client: Client,
    endpoint: Url,
    spreadsheet_id: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl HttpSheetReader {
    pub fn new(
        client: Client,
        endpoint: Url,
        spreadsheet_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint,
            spreadsheet_id: spreadsheet_id.into(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{endpoint}/{id}/values/{sheet}!{cols}?key={key}`
    pub fn values_url(&self, range: &SheetRange) -> Result<Url, SheetError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| SheetError::config(format!("endpoint {} cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .push(self.spreadsheet_id.trim())
            .push("values")
            .push(&range.a1());
        url.query_pairs_mut().append_pair("key", self.api_key.trim());
        Ok(url)
    }

    fn check_config(&self, range: &SheetRange) -> Result<(), SheetError> {
        if self.api_key.trim().is_empty() {
            return Err(SheetError::config("Google Sheets API key is missing"));
        }
        if self.spreadsheet_id.trim().is_empty() {
            return Err(SheetError::config("spreadsheet id is missing"));
        }
        if range.sheet.trim().is_empty() {
            return Err(SheetError::config("sheet name is missing"));
        }
        Ok(())
    }
}

impl SheetSource for HttpSheetReader {
    #[instrument(level = "debug", skip(self, range), fields(range = %range))]
    async fn fetch(&self, range: &SheetRange) -> Result<TabularResponse, SheetError> {
        self.check_config(range)?;
        let url = self.values_url(range)?;

        debug!(sheet = %range.sheet, columns = %range.columns, "fetching sheet range");
        let mut req = self.client.get(url);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| SheetError::transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SheetError::transport(format!("reading body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .map(|b| b.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            warn!(status = status.as_u16(), %message, "sheet request rejected");
            return Err(SheetError::status(status.as_u16(), message));
        }

        let parsed: TabularResponse = serde_json::from_str(&body).map_err(|e| {
            SheetError::status(status.as_u16(), format!("invalid response body: {}", e))
        })?;
        debug!(rows = parsed.values.len(), "sheet range fetched");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(id: &str, key: &str) -> HttpSheetReader {
        HttpSheetReader::new(
            Client::new(),
            Url::parse(DEFAULT_ENDPOINT).unwrap(),
            id,
            key,
        )
    }

    #[test]
    fn values_url_encodes_sheet_name() {
        let url = reader("1AbC", "k3y")
            .values_url(&SheetRange::new("Hall Of Fame", "A:G"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/1AbC/values/Hall%20Of%20Fame!A:G?key=k3y"
        );
    }

    #[tokio::test]
    async fn blank_spreadsheet_id_is_configuration_error() {
        let err = reader("  ", "k3y")
            .fetch(&SheetRange::new("Courses", "A:F"))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::Configuration(_)));
    }

    #[tokio::test]
    async fn blank_sheet_name_is_configuration_error() {
        let err = reader("1AbC", "k3y")
            .fetch(&SheetRange::new("", "A:F"))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::Configuration(_)));
    }
}
