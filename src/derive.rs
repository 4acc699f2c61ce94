//! Version derivation engine.
//!
//! Combines the descriptor's current version, repository state, and the
//! caller's policy into the build / release / patch / dev version strings
//! the workflows persist or print. All failures are fatal to the invoking
//! command and name the version or tag that violated which rule.

use crate::git::RepoState;
use crate::version::{parse_version, VersionError, VersionOps};
use semver::Version;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("cannot cut a patch branch from '{tag}': the tag's patch component must be zero")]
    PatchFromDirtyTag { tag: String },

    #[error("cannot cut a patch branch from '{tag}': the tag must not carry a prerelease")]
    PatchFromPrerelease { tag: String },
}

/// Caller-supplied policy for version derivation.
///
/// Deserializable so a `.relver.toml` can carry project defaults; CLI flags
/// override individual fields afterwards.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VersionPolicy {
    /// Abbreviated commit hash display width.
    pub hash_length: usize,
    /// Zero-pad width for the build number in build versions.
    pub build_number_length: usize,
    /// Literal prefix in front of the build number, e.g. "rc".
    pub build_number_prefix: String,
    /// Force a major bump when picking the next development version.
    #[serde(skip)]
    pub release_major: bool,
    /// Force a patch bump when picking the next development version.
    #[serde(skip)]
    pub release_patch: bool,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            hash_length: 7,
            build_number_length: 3,
            build_number_prefix: "rc".to_string(),
            release_major: false,
            release_patch: false,
        }
    }
}

/// Clean `major.minor.patch` form with prerelease and metadata stripped.
/// Idempotent.
pub fn release_version(current: &Version) -> Version {
    current.stripped()
}

/// The next development version after tagging `current` as a release.
///
/// A branch that has ever taken a patch increment stays on patch
/// increments: a nonzero patch component dominates every policy flag. From
/// a clean `x.y.0` state the policy picks major or (by default) minor.
pub fn next_release_version(current: &Version, policy: &VersionPolicy) -> Version {
    if policy.release_patch || current.patch != 0 {
        current.inc_patch()
    } else if policy.release_major {
        current.inc_major()
    } else {
        current.inc_minor()
    }
}

/// Prerelease-tagged version embedding commit count and hash, for snapshot
/// artifacts: `<prefix><zero-padded count>[.<hash>]`.
///
/// The count segment is omitted when the repository reports no commit
/// count; the `.` separator appears only when both segments are present. A
/// count already wider than the pad width is left unchanged.
pub fn build_version(
    current: &Version,
    repo: &RepoState,
    policy: &VersionPolicy,
) -> Result<Version, DeriveError> {
    let mut prerelease = String::new();
    if !repo.commit_count.is_empty() {
        prerelease.push_str(&policy.build_number_prefix);
        prerelease.push_str(&pad_build_number(
            &repo.commit_count,
            policy.build_number_length,
        ));
    }
    if !repo.commit_hash.is_empty() {
        if !prerelease.is_empty() {
            prerelease.push('.');
        }
        prerelease.push_str(&repo.commit_hash);
    }

    let release = release_version(current);
    if prerelease.is_empty() {
        return Ok(release);
    }
    Ok(release.with_prerelease(&prerelease)?)
}

/// Release version with the bare commit hash as prerelease.
pub fn hash_version(current: &Version, repo: &RepoState) -> Result<Version, DeriveError> {
    let release = release_version(current);
    if repo.commit_hash.is_empty() {
        return Ok(release);
    }
    Ok(release.with_prerelease(&repo.commit_hash)?)
}

/// Starting descriptor version for a patch branch cut from `tag`.
///
/// Patch branches may only be cut from clean `x.y.0` release tags. The
/// current descriptor's prerelease is re-attached to the result, so a
/// Maven-style `-SNAPSHOT` suffix survives the branch cut even though the
/// branch point tag itself had none.
pub fn patch_version(tag: &str, current: &Version) -> Result<Version, DeriveError> {
    let tag_version = parse_version(tag)?;
    if tag_version.patch != 0 {
        return Err(DeriveError::PatchFromDirtyTag {
            tag: tag.to_string(),
        });
    }
    if !tag_version.pre.is_empty() {
        return Err(DeriveError::PatchFromPrerelease {
            tag: tag.to_string(),
        });
    }

    let next = tag_version.inc_patch();
    if current.pre.is_empty() {
        return Ok(next);
    }
    Ok(next.with_prerelease(current.pre.as_str())?)
}

/// Left-pad `count` with zeros to `width`; longer counts are left unchanged.
fn pad_build_number(count: &str, width: usize) -> String {
    if count.len() >= width {
        return count.to_string();
    }
    let mut padded = "0".repeat(width - count.len());
    padded.push_str(count);
    padded
}
