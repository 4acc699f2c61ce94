//! Maven-style XML descriptor (`pom.xml`).

use crate::locate::{xml, DocumentPath, LocateError};
use crate::project::{
    read_descriptor, DescriptorKind, ParentRef, ProjectDescriptor, ProjectError,
};
use std::path::Path;

const VERSION: &str = "/project/version";
const GROUP_ID: &str = "/project/groupId";
const ARTIFACT_ID: &str = "/project/artifactId";
const PARENT_VERSION: &str = "/project/parent/version";
const PARENT_GROUP_ID: &str = "/project/parent/groupId";
const PARENT_ARTIFACT_ID: &str = "/project/parent/artifactId";

/// Load a `pom.xml`-shaped descriptor.
///
/// `/project/version` and `/project/artifactId` are mandatory; their absence
/// is a recoverable [`ProjectError::NotAProject`]. The groupId and the three
/// `/project/parent/...` values are captured when present.
pub fn load(path: &Path) -> Result<ProjectDescriptor, ProjectError> {
    let document = read_descriptor(path)?;

    let wanted: Vec<DocumentPath> = [
        VERSION,
        GROUP_ID,
        ARTIFACT_ID,
        PARENT_VERSION,
        PARENT_GROUP_ID,
        PARENT_ARTIFACT_ID,
    ]
    .iter()
    .map(|p| DocumentPath::parse(p))
    .collect::<Result<_, LocateError>>()
    .map_err(|source| ProjectError::Locate {
        file: path.to_path_buf(),
        source,
    })?;

    let mut found = xml::locate(&document, &wanted).map_err(|source| ProjectError::Locate {
        file: path.to_path_buf(),
        source,
    })?;

    let not_a_project = |missing| ProjectError::NotAProject {
        file: path.to_path_buf(),
        kind: DescriptorKind::Xml,
        missing,
    };
    let version = found
        .remove(&wanted[0])
        .ok_or_else(|| not_a_project("/project/version"))?;
    let name = found
        .remove(&wanted[2])
        .ok_or_else(|| not_a_project("/project/artifactId"))?;

    let group_id = found.remove(&wanted[1]).map(|v| v.text);
    let parent_version = found.remove(&wanted[3]).map(|v| v.text);
    let parent_group_id = found.remove(&wanted[4]).map(|v| v.text);
    let parent_artifact_id = found.remove(&wanted[5]).map(|v| v.text);

    let parent = if parent_version.is_some()
        || parent_group_id.is_some()
        || parent_artifact_id.is_some()
    {
        Some(ParentRef {
            group_id: parent_group_id,
            artifact_id: parent_artifact_id,
            version: parent_version,
        })
    } else {
        None
    };

    Ok(ProjectDescriptor {
        file: path.to_path_buf(),
        kind: DescriptorKind::Xml,
        name,
        version,
        group_id,
        parent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::EditResult;
    use crate::version::parse_version;
    use std::fs;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <!-- release engineering owns the version line -->
    <parent>
        <groupId>org.example</groupId>
        <artifactId>example-parent</artifactId>
        <version>9.9.9</version>
    </parent>
    <groupId>org.example.app</groupId>
    <artifactId>example-app</artifactId>
    <version>1.4.0-SNAPSHOT</version>
    <properties>
        <maven.compiler.release>17</maven.compiler.release>
    </properties>
</project>
"#;

    fn write_pom(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pom.xml");
        fs::write(&file, contents).unwrap();
        (dir, file)
    }

    #[test]
    fn loads_project_fields() {
        let (_dir, file) = write_pom(POM);
        let descriptor = load(&file).unwrap();

        assert_eq!(descriptor.kind(), DescriptorKind::Xml);
        assert_eq!(descriptor.name(), "example-app");
        assert_eq!(descriptor.group_id(), Some("org.example.app"));
        assert_eq!(descriptor.version_text(), "1.4.0-SNAPSHOT");
        assert_eq!(
            descriptor.parent().unwrap().to_string(),
            "org.example:example-parent:9.9.9"
        );
    }

    #[test]
    fn project_version_is_not_confused_with_parent_version() {
        let (_dir, file) = write_pom(POM);
        let descriptor = load(&file).unwrap();
        assert_eq!(descriptor.version().unwrap().to_string(), "1.4.0-SNAPSHOT");
    }

    #[test]
    fn set_version_preserves_every_other_byte() {
        let (_dir, file) = write_pom(POM);
        let descriptor = load(&file).unwrap();
        let new_version = parse_version("1.4.1-SNAPSHOT").unwrap();
        let edit = descriptor.version_edit(&new_version);
        let span = (edit.byte_start, edit.byte_end);
        let result = descriptor.set_version(&new_version).unwrap();
        assert!(matches!(result, EditResult::Applied { .. }));

        let after = fs::read_to_string(&file).unwrap();
        assert_eq!(&after[..span.0], &POM[..span.0]);
        assert_eq!(&after[span.0..span.0 + "1.4.1-SNAPSHOT".len()], "1.4.1-SNAPSHOT");
        assert_eq!(&after[span.0 + "1.4.1-SNAPSHOT".len()..], &POM[span.1..]);
        // Parent version untouched
        assert!(after.contains("<version>9.9.9</version>"));
    }

    #[test]
    fn missing_version_is_not_a_project() {
        let (_dir, file) =
            write_pom("<project><artifactId>example-app</artifactId></project>");
        let result = load(&file);
        assert!(matches!(result, Err(ProjectError::NotAProject { .. })));
    }

    #[test]
    fn missing_artifact_id_is_not_a_project() {
        let (_dir, file) = write_pom("<project><version>1.0.0</version></project>");
        let result = load(&file);
        assert!(matches!(result, Err(ProjectError::NotAProject { .. })));
    }

    #[test]
    fn parentless_pom_loads_without_parent() {
        let (_dir, file) = write_pom(
            "<project><artifactId>a</artifactId><version>1.0.0</version></project>",
        );
        let descriptor = load(&file).unwrap();
        assert!(descriptor.parent().is_none());
    }
}
