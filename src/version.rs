//! Semver 2.0 version model.
//!
//! The representation is [`semver::Version`]; this module adds the
//! derivation operations the workflows need. Every operation returns a new
//! value, and increments reset lower components and clear prerelease and
//! build metadata per semver convention.

use semver::{BuildMetadata, Prerelease, Version};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("invalid version '{value}': {source}")]
    InvalidVersion {
        value: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid prerelease '{value}': {source}")]
    InvalidPrerelease {
        value: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid build metadata '{value}': {source}")]
    InvalidMetadata {
        value: String,
        #[source]
        source: semver::Error,
    },
}

/// Parse a semver-2.0 version string, naming the offending text on failure.
///
/// A descriptor or tag whose version cannot be parsed fails the whole
/// command; there is no lenient fallback.
pub fn parse_version(value: &str) -> Result<Version, VersionError> {
    Version::parse(value.trim()).map_err(|source| VersionError::InvalidVersion {
        value: value.to_string(),
        source,
    })
}

/// Derivation operations over [`semver::Version`].
pub trait VersionOps {
    fn inc_major(&self) -> Version;
    fn inc_minor(&self) -> Version;
    fn inc_patch(&self) -> Version;
    /// Same version with prerelease and build metadata cleared.
    fn stripped(&self) -> Version;
    fn with_prerelease(&self, prerelease: &str) -> Result<Version, VersionError>;
    fn with_metadata(&self, metadata: &str) -> Result<Version, VersionError>;
}

impl VersionOps for Version {
    fn inc_major(&self) -> Version {
        Version::new(self.major + 1, 0, 0)
    }

    fn inc_minor(&self) -> Version {
        Version::new(self.major, self.minor + 1, 0)
    }

    fn inc_patch(&self) -> Version {
        Version::new(self.major, self.minor, self.patch + 1)
    }

    fn stripped(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }

    fn with_prerelease(&self, prerelease: &str) -> Result<Version, VersionError> {
        let pre = Prerelease::new(prerelease).map_err(|source| VersionError::InvalidPrerelease {
            value: prerelease.to_string(),
            source,
        })?;
        let mut version = self.clone();
        version.pre = pre;
        Ok(version)
    }

    fn with_metadata(&self, metadata: &str) -> Result<Version, VersionError> {
        let build = BuildMetadata::new(metadata).map_err(|source| VersionError::InvalidMetadata {
            value: metadata.to_string(),
            source,
        })?;
        let mut version = self.clone();
        version.build = build;
        Ok(version)
    }
}
