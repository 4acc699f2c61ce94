//! Positional value location inside structured descriptor documents.
//!
//! Both locators stream the document token-by-token while tracking the
//! current element/key path, and record the exact byte span of each
//! requested path's scalar value. No parse tree is built and nothing is
//! re-serialized, so a later [`crate::edit::Edit`] at a recorded span
//! leaves every other byte of the file untouched.

pub mod errors;
pub mod json;
pub mod path;
pub mod xml;

pub use errors::LocateError;
pub use path::DocumentPath;

use std::collections::HashMap;

/// UTF-8 byte-order mark. Descriptor files written on Windows often start
/// with one.
const BOM: &str = "\u{feff}";

/// Split a leading BOM off the document. Returns the remaining body and the
/// number of bytes removed; both locators add that length back into every
/// recorded offset so spans stay exact against the original bytes.
pub(crate) fn strip_bom(document: &str) -> (&str, usize) {
    match document.strip_prefix(BOM) {
        Some(body) => (body, BOM.len()),
        None => (document, 0),
    }
}

/// The raw text of one located value plus the byte offset of its end.
///
/// `text` is exactly the bytes found at `[begin, end)` in the document; no
/// trimming and no entity/escape decoding is applied, which is what makes
/// `begin = end - text.len()` exact. A located value goes stale the moment
/// the underlying file is modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedValue {
    pub path: DocumentPath,
    pub text: String,
    /// Byte offset one past the last byte of `text`.
    pub end: usize,
}

impl LocatedValue {
    /// Byte offset of the first byte of `text`.
    pub fn begin(&self) -> usize {
        self.end - self.text.len()
    }
}

/// Result of one locate pass. Requested paths absent from the document are
/// simply absent from the map; callers check completeness for the paths
/// they consider mandatory.
pub type Located = HashMap<DocumentPath, LocatedValue>;
