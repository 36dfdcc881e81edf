//! # Content-Type Resolution
//!
//! Parses a raw `Content-Type` header into a normalized value and a media
//! type, and answers which header values count as "the same" content type
//! when matching a request against the media types an operation declares.
//!
//! Multipart boundaries are request-unique, so the `boundary=` clause is
//! stripped before any comparison. Every other parameter stays part of the
//! type, except for JSON where `charset=utf-8` is tolerated.

use std::sync::OnceLock;

use http::header::CONTENT_TYPE;
use http::HeaderMap;
use regex::Regex;

/// Media type that receives the charset-tolerant equivalence class.
pub const APPLICATION_JSON: &str = "application/json";

/// Header values treated as equivalent to `application/json`.
pub const JSON_EQUIVALENTS: [&str; 2] = ["application/json", "application/json; charset=utf-8"];

fn boundary_clause() -> &'static Regex {
    static BOUNDARY_RE: OnceLock<Regex> = OnceLock::new();
    BOUNDARY_RE.get_or_init(|| Regex::new(r";\s*boundary.*").expect("Invalid regex"))
}

/// A parsed `Content-Type` header.
///
/// Immutable once built. An absent header (missing, empty, or not valid
/// UTF-8) produces a value whose derived fields are all `None` and whose
/// equivalence set is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentType {
    raw: Option<String>,
    normalized: Option<String>,
    media_type: Option<String>,
}

impl ContentType {
    /// Parse a raw header value.
    ///
    /// Removes the first `;\s*boundary...` clause (case-sensitive) and
    /// takes the trimmed text before the first `;` as the media type.
    pub fn new(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Self::default();
        };

        let normalized = boundary_clause().replace(raw, "").into_owned();
        let media_type = normalized
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        Self {
            raw: Some(raw.to_string()),
            normalized: Some(normalized),
            media_type: Some(media_type),
        }
    }

    /// Read the `Content-Type` header of an inbound request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let raw = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        Self::new(raw)
    }

    /// The header exactly as received.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// The header with its boundary clause removed.
    pub fn normalized(&self) -> Option<&str> {
        self.normalized.as_deref()
    }

    /// The bare media type, e.g. `multipart/form-data`.
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Whether the media type is `application/json`, ignoring ASCII case.
    pub fn is_json(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case(APPLICATION_JSON))
    }

    /// Header values that should match this content type.
    ///
    /// - absent (or boundary-only) header: empty;
    /// - `application/json`: both [`JSON_EQUIVALENTS`];
    /// - anything else: the boundary-stripped header, parameters intact.
    pub fn equivalents(&self) -> Vec<String> {
        let Some(normalized) = self.normalized.as_deref().filter(|n| !n.is_empty()) else {
            return Vec::new();
        };
        if self.is_json() {
            return JSON_EQUIVALENTS.iter().map(|s| s.to_string()).collect();
        }
        vec![normalized.to_string()]
    }

    /// Find the declared content type this header satisfies.
    ///
    /// Walks [`equivalents`](Self::equivalents) in order and returns the
    /// first declared entry equal to one of them, ignoring ASCII case.
    pub fn matches_any<'a, S: AsRef<str>>(&self, declared: &'a [S]) -> Option<&'a str> {
        self.equivalents().iter().find_map(|candidate| {
            declared
                .iter()
                .map(<S as AsRef<str>>::as_ref)
                .find(|d| d.eq_ignore_ascii_case(candidate))
        })
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.normalized.as_deref() {
            Some(n) => f.write_str(n),
            None => f.write_str("(none)"),
        }
    }
}
