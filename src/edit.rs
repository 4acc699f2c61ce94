use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// The fundamental write primitive: byte-span replacement with verification.
///
/// Every descriptor rewrite compiles down to this single operation. The
/// locator is responsible for producing an exact span; the edit only splices
/// it, leaving every byte outside `[byte_start, byte_end)` untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until apply() is called"]
pub struct Edit {
    /// Path to the descriptor file to rewrite
    pub file: PathBuf,
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to insert at [byte_start, byte_end)
    pub new_text: String,
    /// Verification of what we expect to find before applying
    pub expected_before: EditVerification,
}

/// Verification strategy for edit safety.
///
/// The located value's text doubles as the expected before-text, so a stale
/// span (file modified since the locate pass) is caught before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (for large spans)
    Hash(u64),
}

impl EditVerification {
    /// Check if the provided text matches the verification criteria.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => xxh3_64(text.as_bytes()) == *expected_hash,
        }
    }

    /// Create verification from text, using hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("before-text verification failed at {file}:{byte_start}: expected {expected:?}, found {found:?}")]
    BeforeTextMismatch {
        file: PathBuf,
        byte_start: usize,
        expected: String,
        found: String,
    },

    #[error("invalid byte range [{byte_start}, {byte_end}) in file of length {file_len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        file_len: usize,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("span is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "EditResult should be checked for applied/already-applied"]
pub enum EditResult {
    /// The file was rewritten
    Applied { file: PathBuf },
    /// The span already holds the new text; nothing was written
    AlreadyApplied { file: PathBuf },
}

impl Edit {
    /// Create a new edit. `expected_before` is the text the caller believes
    /// currently occupies the span, typically a located value's raw text.
    pub fn new(
        file: impl Into<PathBuf>,
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: &str,
    ) -> Self {
        Self {
            file: file.into(),
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(expected_before),
        }
    }

    /// Validate the edit against current file contents, returning the bytes
    /// currently at the span.
    fn validate<'a>(&self, content: &'a [u8]) -> Result<&'a [u8], EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                file_len: content.len(),
            });
        }

        let current_bytes = &content[self.byte_start..self.byte_end];
        let current_text = std::str::from_utf8(current_bytes)?;

        // Idempotency: an already-applied edit needs no verification.
        if current_text == self.new_text {
            return Ok(current_bytes);
        }

        if !self.expected_before.matches(current_text) {
            return Err(EditError::BeforeTextMismatch {
                file: self.file.clone(),
                byte_start: self.byte_start,
                expected: match &self.expected_before {
                    EditVerification::ExactMatch(t) => t.clone(),
                    EditVerification::Hash(h) => format!("xxh3:{h:016x}"),
                },
                found: current_text.to_string(),
            });
        }

        Ok(current_bytes)
    }

    /// Preview the post-edit content without writing anything.
    ///
    /// Validates the span and verification, then returns the spliced result.
    pub fn preview(&self) -> Result<String, EditError> {
        let original = fs::read(&self.file)?;
        self.validate(&original)?;
        let spliced = self.splice(&original);
        String::from_utf8(spliced).map_err(|e| EditError::Utf8(e.utf8_error()))
    }

    fn splice(&self, original: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            original.len() + self.new_text.len() - (self.byte_end - self.byte_start),
        );
        out.extend_from_slice(&original[..self.byte_start]);
        out.extend_from_slice(self.new_text.as_bytes());
        out.extend_from_slice(&original[self.byte_end..]);
        out
    }

    /// Apply this edit to the file system atomically.
    ///
    /// Uses tempfile + fsync + rename: either the whole new content lands or
    /// the original file is left intact.
    pub fn apply(&self) -> Result<EditResult, EditError> {
        let original = fs::read(&self.file)?;
        let current_bytes = self.validate(&original)?;

        if std::str::from_utf8(current_bytes)? == self.new_text {
            return Ok(EditResult::AlreadyApplied {
                file: self.file.clone(),
            });
        }

        let new_content = self.splice(&original);
        // The spliced whole must still be UTF-8; the span check alone does
        // not cover bytes outside the span.
        std::str::from_utf8(&new_content)?;
        atomic_write(&self.file, &new_content)?;

        Ok(EditResult::Applied {
            file: self.file.clone(),
        })
    }
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    let parent = path.parent().ok_or_else(|| {
        EditError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
