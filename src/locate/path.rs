use crate::locate::errors::LocateError;
use std::fmt;

/// A slash-delimited path naming one scalar value inside a descriptor
/// document, e.g. `/project/version` or `/name`.
///
/// Kept as an explicit segment list rather than an accumulated string so
/// matching is segment-wise and never suffers prefix confusion
/// (`/project/version` vs `/project/parent/version`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    pub fn new(segments: Vec<String>) -> Result<Self, LocateError> {
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(LocateError::InvalidPath {
                input: format!("/{}", segments.join("/")),
                message: "empty path segment".to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Parse a `/a/b/c` path. A leading slash is required; empty segments
    /// are rejected.
    pub fn parse(input: &str) -> Result<Self, LocateError> {
        let Some(rest) = input.strip_prefix('/') else {
            return Err(LocateError::InvalidPath {
                input: input.to_string(),
                message: "path must start with '/'".to_string(),
            });
        };
        if rest.is_empty() {
            return Err(LocateError::InvalidPath {
                input: input.to_string(),
                message: "empty path".to_string(),
            });
        }
        Self::new(rest.split('/').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment-wise equality against a locator's current path stack.
    pub fn matches(&self, stack: &[String]) -> bool {
        self.segments.len() == stack.len()
            && self.segments.iter().zip(stack.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}
