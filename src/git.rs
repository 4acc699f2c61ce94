//! Git repository state for version derivation.
//!
//! `git` is an external collaborator invoked as a child process. A
//! repository without a reachable annotated tag is a valid, handled state
//! (the zero state below); a git binary that cannot be spawned is fatal.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("failed to run `git {args}`: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected `git describe --long` output: {output:?}")]
    DescribeFormat { output: String },
}

/// Repository state relevant to version derivation.
///
/// `last_tag` is `"0.0.0"` and `commit_count` is `"0"` when no annotated
/// tag is reachable. `commit_hash` carries the `g` prefix that `git
/// describe` uses, or is all zeros for an un-describable repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoState {
    pub last_tag: String,
    pub commit_count: String,
    pub commit_hash: String,
}

impl RepoState {
    /// State reported for a repository with no commits (or no repository at
    /// all): zero tag, zero count, hash of `hash_length` zeros.
    pub fn zero(hash_length: usize) -> Self {
        Self {
            last_tag: "0.0.0".to_string(),
            commit_count: "0".to_string(),
            commit_hash: "0".repeat(hash_length),
        }
    }
}

/// Query the repository at `dir` for tag, commit count, and abbreviated
/// commit hash.
///
/// Combines `git describe --abbrev=0` (latest annotated tag) with
/// `git describe --long --abbrev=<n>` (count and hash since that tag).
/// When no tag exists, falls back to `git rev-list HEAD --count` plus
/// `git rev-parse --short=<n> HEAD`, prefixing the hash with `g` to mirror
/// native describe formatting.
pub fn describe(dir: &Path, hash_length: usize) -> Result<RepoState, GitError> {
    let Some(_tag) = run_git(dir, &["describe", "--abbrev=0"])? else {
        return describe_untagged(dir, hash_length);
    };

    let abbrev = format!("--abbrev={hash_length}");
    let long = run_git(dir, &["describe", "--long", &abbrev])?.ok_or_else(|| {
        GitError::DescribeFormat {
            output: String::new(),
        }
    })?;

    // `<tag>-<count>-g<hash>`; the tag itself may contain dashes, so split
    // from the right.
    let mut parts = long.rsplitn(3, '-');
    let hash = parts.next();
    let count = parts.next();
    let tag = parts.next();
    match (tag, count, hash) {
        (Some(tag), Some(count), Some(hash)) if !tag.is_empty() => Ok(RepoState {
            last_tag: tag.to_string(),
            commit_count: count.to_string(),
            commit_hash: hash.to_string(),
        }),
        _ => Err(GitError::DescribeFormat { output: long }),
    }
}

/// Tagless fallback: total commit count plus bare abbreviated hash.
fn describe_untagged(dir: &Path, hash_length: usize) -> Result<RepoState, GitError> {
    let short = format!("--short={hash_length}");
    let hash = run_git(dir, &["rev-parse", &short, "HEAD"])?;
    let count = run_git(dir, &["rev-list", "HEAD", "--count"])?;

    match (hash, count) {
        (Some(hash), Some(count)) => Ok(RepoState {
            last_tag: "0.0.0".to_string(),
            commit_count: count,
            commit_hash: format!("g{hash}"),
        }),
        // No commits, or not a repository at all.
        _ => Ok(RepoState::zero(hash_length)),
    }
}

/// Run git in `dir`, returning trimmed stdout on success and `None` on a
/// non-zero exit (for these queries that means "state not present", not an
/// error). Only a spawn failure is fatal.
fn run_git(dir: &Path, args: &[&str]) -> Result<Option<String>, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| GitError::Spawn {
            args: args.join(" "),
            source,
        })?;

    if !output.status.success() {
        return Ok(None);
    }

    Ok(Some(
        String::from_utf8_lossy(&output.stdout).trim().to_string(),
    ))
}
