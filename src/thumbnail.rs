// src/thumbnail.rs

//! Rewrites file-sharing links into direct thumbnail links.
//!
//! Patterns are tried in order and the first match wins:
//!
//! 1. path form `.../d/<ID>` (`drive.google.com/file/d/<ID>/view`,
//!    `docs.google.com/document/d/<ID>/edit`, ...)
//! 2. query form `...?id=<ID>` (`drive.google.com/open?id=<ID>`,
//!    `drive.google.com/uc?id=<ID>`, and already-rewritten thumbnail links)
//!
//! [`Strictness::Strict`] only accepts known hosts and ids of at least 28
//! characters from `[A-Za-z0-9_-]`; [`Strictness::Lenient`] accepts any
//! non-empty id on any host. Anything unmatched passes through untouched.

use once_cell::sync::Lazy;
use regex::Regex;

pub const THUMBNAIL_HOST: &str = "drive.google.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    Strict,
    #[default]
    Lenient,
}

pub struct SharePattern {
    pub name: &'static str,
    regex: Regex,
}

impl SharePattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("share pattern should compile"),
        }
    }

    pub fn capture<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.regex
            .captures(input)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|id| !id.is_empty())
    }
}

static STRICT: Lazy<Vec<SharePattern>> = Lazy::new(|| {
    vec![
        SharePattern::new(
            "drive-file-path",
            r"(?:https?://)?(?:www\.)?drive\.google\.com/file/d/([A-Za-z0-9_-]{28,})",
        ),
        SharePattern::new(
            "docs-path",
            r"(?:https?://)?(?:www\.)?docs\.google\.com/(?:document|presentation|spreadsheets)/d/([A-Za-z0-9_-]{28,})",
        ),
        SharePattern::new(
            "drive-open-query",
            r"(?:https?://)?(?:www\.)?drive\.google\.com/open\?id=([A-Za-z0-9_-]{28,})",
        ),
        SharePattern::new(
            "drive-uc-query",
            r"(?:https?://)?(?:www\.)?drive\.google\.com/uc\?id=([A-Za-z0-9_-]{28,})",
        ),
    ]
});

static LENIENT: Lazy<Vec<SharePattern>> = Lazy::new(|| {
    vec![
        SharePattern::new("path", r"/d/([^/?#&]+)"),
        SharePattern::new("query", r"[?&]id=([^&#]+)"),
    ]
});

/// Pure and total: every input maps to some string, never an error.
#[derive(Clone, Copy)]
pub struct UrlNormalizer {
    patterns: &'static [SharePattern],
}

impl UrlNormalizer {
    pub fn new(strictness: Strictness) -> Self {
        let patterns = match strictness {
            Strictness::Strict => STRICT.as_slice(),
            Strictness::Lenient => LENIENT.as_slice(),
        };
        Self { patterns }
    }

    pub fn strict() -> Self {
        Self::new(Strictness::Strict)
    }

    pub fn lenient() -> Self {
        Self::new(Strictness::Lenient)
    }

    pub fn patterns(&self) -> &[SharePattern] {
        self.patterns
    }

    /// The file id, if any pattern recognises the link.
    pub fn file_id<'a>(&self, input: &'a str) -> Option<&'a str> {
        let input = input.trim();
        self.patterns.iter().find_map(|p| p.capture(input))
    }

    pub fn normalize(&self, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }
        match self.file_id(input) {
            Some(id) => thumbnail_url(id),
            None => input.to_string(),
        }
    }

    /// Absent cells normalise to the empty string.
    pub fn normalize_opt(&self, input: Option<&str>) -> String {
        input.map(|s| self.normalize(s)).unwrap_or_default()
    }
}

impl std::fmt::Debug for UrlNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.patterns.iter().map(|p| p.name))
            .finish()
    }
}

pub fn thumbnail_url(id: &str) -> String {
    format!("https://{}/thumbnail?id={}", THUMBNAIL_HOST, id)
}
