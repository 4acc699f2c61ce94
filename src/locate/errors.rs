use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("malformed {format} document at byte {offset}: {message}")]
    Malformed {
        format: &'static str,
        offset: usize,
        message: String,
    },

    #[error("path {path} occurs more than once in the document")]
    AmbiguousPath { path: String },

    #[error("invalid document path '{input}': {message}")]
    InvalidPath { input: String, message: String },
}
