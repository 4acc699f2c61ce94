//! Project descriptors: a located name and version bound to one file.
//!
//! A descriptor is loaded in a single locate pass; its spans stay valid
//! until the file changes. [`ProjectDescriptor::set_version`] therefore
//! consumes the descriptor: after the write the recorded offsets are stale
//! and a second edit requires a reload.

pub mod json;
pub mod xml;

use crate::edit::{Edit, EditError, EditResult};
use crate::locate::{LocateError, LocatedValue};
use crate::version::{parse_version, VersionError};
use semver::Version;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectError {
    /// Mandatory descriptor paths are absent. Recoverable: callers probe
    /// descriptor kinds in sequence and pick whichever one matches.
    #[error("{file} is not a {kind} project descriptor: missing {missing}")]
    NotAProject {
        file: PathBuf,
        kind: DescriptorKind,
        missing: &'static str,
    },

    #[error("no project descriptor (pom.xml, package.json) found in {dir}")]
    NoDescriptorFound { dir: PathBuf },

    #[error("failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: {source}")]
    Locate {
        file: PathBuf,
        #[source]
        source: LocateError,
    },

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Descriptor kinds, in probing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Maven-style `pom.xml`
    Xml,
    /// npm-style `package.json`
    Json,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Xml => write!(f, "XML"),
            DescriptorKind::Json => write!(f, "JSON"),
        }
    }
}

/// Well-known descriptor filenames, one per kind, in probing order.
pub const DESCRIPTOR_FILENAMES: [&str; 2] = ["pom.xml", "package.json"];

/// Parent project reference (XML descriptors only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |o: &Option<String>| o.clone().unwrap_or_default();
        write!(
            f,
            "{}:{}:{}",
            part(&self.group_id),
            part(&self.artifact_id),
            part(&self.version)
        )
    }
}

/// One loaded project descriptor.
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    file: PathBuf,
    kind: DescriptorKind,
    name: LocatedValue,
    version: LocatedValue,
    group_id: Option<String>,
    parent: Option<ParentRef>,
}

impl ProjectDescriptor {
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    /// Project name: `artifactId` for XML descriptors, `name` for JSON.
    pub fn name(&self) -> &str {
        &self.name.text
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn parent(&self) -> Option<&ParentRef> {
        self.parent.as_ref()
    }

    /// The version exactly as written in the descriptor.
    pub fn version_text(&self) -> &str {
        &self.version.text
    }

    /// The descriptor version parsed as semver 2.0. Fatal if the text does
    /// not parse; no version-derived command may proceed on such a project.
    pub fn version(&self) -> Result<Version, VersionError> {
        parse_version(&self.version.text)
    }

    /// The pending edit that would persist `new_version`, without applying
    /// it. Used for dry runs and diff display.
    pub fn version_edit(&self, new_version: &Version) -> Edit {
        Edit::new(
            &self.file,
            self.version.begin(),
            self.version.end,
            new_version.to_string(),
            &self.version.text,
        )
    }

    /// Rewrite the version span in the descriptor file, leaving every other
    /// byte untouched.
    ///
    /// Consumes the descriptor: the recorded spans are stale once the file
    /// has been rewritten, so further edits require a fresh load.
    pub fn set_version(self, new_version: &Version) -> Result<EditResult, ProjectError> {
        Ok(self.version_edit(new_version).apply()?)
    }
}

/// Load a descriptor, inferring the kind from the filename and falling back
/// to probing each kind in sequence.
pub fn load(path: &Path) -> Result<ProjectDescriptor, ProjectError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("xml") => xml::load(path),
        Some("json") => json::load(path),
        _ => {
            match xml::load(path) {
                Ok(descriptor) => Ok(descriptor),
                // Not XML-shaped at all, or XML without the project paths:
                // try the next kind.
                Err(ProjectError::NotAProject { .. }) | Err(ProjectError::Locate { .. }) => {
                    json::load(path)
                }
                Err(other) => Err(other),
            }
        }
    }
}

/// Probe `dir` for a descriptor file, trying each well-known filename in
/// order and skipping those that exist but are not project descriptors.
pub fn probe(dir: &Path) -> Result<ProjectDescriptor, ProjectError> {
    for name in DESCRIPTOR_FILENAMES {
        let candidate = dir.join(name);
        if !candidate.exists() {
            continue;
        }
        match load(&candidate) {
            Ok(descriptor) => return Ok(descriptor),
            Err(ProjectError::NotAProject { .. }) => continue,
            Err(other) => return Err(other),
        }
    }
    Err(ProjectError::NoDescriptorFound {
        dir: dir.to_path_buf(),
    })
}

pub(crate) fn read_descriptor(path: &Path) -> Result<String, ProjectError> {
    std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
        file: path.to_path_buf(),
        source,
    })
}
