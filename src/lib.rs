//! Relver: semantic version derivation and descriptor surgery
//!
//! Derives a project's build, release, patch, and next-development versions
//! from its descriptor file and git repository state, and persists versions
//! through surgical byte-span edits that leave the rest of the descriptor
//! byte-for-byte intact.
//!
//! # Architecture
//!
//! All writes compile down to a single primitive: [`Edit`], a verified
//! byte-span replacement. Intelligence lives in span acquisition (the
//! [`locate`] module's token-streaming XML/JSON locators) and in version
//! derivation (the [`derive`] module), not in the application logic.
//! Descriptor files are developer-owned source files, so they are never
//! parsed into a tree and re-serialized; comments, indentation, and
//! attribute order survive every rewrite.
//!
//! # Example
//!
//! ```no_run
//! use relver::derive::{next_release_version, VersionPolicy};
//! use relver::project;
//! use std::path::Path;
//!
//! fn bump(dir: &Path) -> anyhow::Result<()> {
//!     let descriptor = project::probe(dir)?;
//!     let current = descriptor.version()?;
//!     let next = next_release_version(&current, &VersionPolicy::default());
//!     descriptor.set_version(&next)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod derive;
pub mod edit;
pub mod git;
pub mod locate;
pub mod project;
pub mod version;

// Re-exports
pub use config::{load_policy, ConfigError};
pub use derive::{
    build_version, hash_version, next_release_version, patch_version, release_version,
    DeriveError, VersionPolicy,
};
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use git::{GitError, RepoState};
pub use locate::{DocumentPath, LocateError, LocatedValue};
pub use project::{DescriptorKind, ProjectDescriptor, ProjectError};
pub use version::{parse_version, VersionError, VersionOps};
