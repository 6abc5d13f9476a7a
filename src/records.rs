// src/records.rs

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::fetch::TabularResponse;

/// How header cells become field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStyle {
    /// Use the header cell exactly as written.
    #[default]
    Verbatim,
    /// Trim surrounding whitespace only.
    Trimmed,
    /// Lower-case and drop all whitespace: `"Course Name "` → `"coursename"`.
    Normalized,
}

impl HeaderStyle {
    pub fn apply(self, raw: &str) -> String {
        match self {
            HeaderStyle::Verbatim => raw.to_string(),
            HeaderStyle::Trimmed => raw.trim().to_string(),
            HeaderStyle::Normalized => raw
                .chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_lowercase)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapOptions {
    pub headers: HeaderStyle,
    /// Fill `id` with `row-<n>` when the row has no id of its own.
    pub synthetic_id: bool,
}

impl MapOptions {
    pub fn new(headers: HeaderStyle) -> Self {
        Self {
            headers,
            synthetic_id: false,
        }
    }

    pub fn with_synthetic_id(mut self) -> Self {
        self.synthetic_id = true;
        self
    }
}

pub const SYNTHETIC_ID_FIELD: &str = "id";

/// One sheet row keyed by header, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key`, empty when the column is absent.
    pub fn field(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Overwrites in place if the key exists, else appends.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Rewrites the value under `key` if present.
    pub fn update(&mut self, key: &str, f: impl FnOnce(&str) -> String) {
        if let Some((_, v)) = self.fields.iter_mut().find(|(k, _)| k == key) {
            *v = f(v);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Zips every data row against the header row.
///
/// Fewer than two rows yields nothing. Short rows read as empty strings and
/// cells past the last header are ignored, so no row is ever dropped here.
pub fn map_records(resp: &TabularResponse, opts: &MapOptions) -> Vec<Record> {
    if resp.values.len() < 2 {
        return Vec::new();
    }
    let headers: Vec<String> = resp.values[0]
        .iter()
        .map(|h| opts.headers.apply(h))
        .collect();

    resp.data_rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut record = Record {
                fields: Vec::with_capacity(headers.len() + usize::from(opts.synthetic_id)),
            };
            for (col, header) in headers.iter().enumerate() {
                record.set(header.as_str(), TabularResponse::cell(row, col));
            }
            if opts.synthetic_id && record.field(SYNTHETIC_ID_FIELD).is_empty() {
                record.set(SYNTHETIC_ID_FIELD, format!("row-{}", i + 1));
            }
            record
        })
        .collect()
}
