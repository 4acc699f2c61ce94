//! npm-style JSON descriptor (`package.json`).

use crate::locate::{json, DocumentPath, LocateError};
use crate::project::{read_descriptor, DescriptorKind, ProjectDescriptor, ProjectError};
use std::path::Path;

const VERSION: &str = "/version";
const NAME: &str = "/name";

/// Load a `package.json`-shaped descriptor.
///
/// Both top-level `version` and `name` are mandatory; absence of either is
/// a recoverable [`ProjectError::NotAProject`].
pub fn load(path: &Path) -> Result<ProjectDescriptor, ProjectError> {
    let document = read_descriptor(path)?;

    let wanted: Vec<DocumentPath> = [VERSION, NAME]
        .iter()
        .map(|p| DocumentPath::parse(p))
        .collect::<Result<_, LocateError>>()
        .map_err(|source| ProjectError::Locate {
            file: path.to_path_buf(),
            source,
        })?;

    let mut found = json::locate(&document, &wanted).map_err(|source| ProjectError::Locate {
        file: path.to_path_buf(),
        source,
    })?;

    let not_a_project = |missing| ProjectError::NotAProject {
        file: path.to_path_buf(),
        kind: DescriptorKind::Json,
        missing,
    };
    let version = found
        .remove(&wanted[0])
        .ok_or_else(|| not_a_project("top-level \"version\""))?;
    let name = found
        .remove(&wanted[1])
        .ok_or_else(|| not_a_project("top-level \"name\""))?;

    Ok(ProjectDescriptor {
        file: path.to_path_buf(),
        kind: DescriptorKind::Json,
        name,
        version,
        group_id: None,
        parent: None,
    })
}
