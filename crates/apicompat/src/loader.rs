//! Loads assembly sets from JSON surface descriptions.

use std::path::{Path, PathBuf};

use apicompat_core::AssemblySet;
use tracing::debug;

/// Errors loading a surface file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not a valid surface description.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Reads one side of a comparison.
///
/// The document is an [`AssemblySet`]:
///
/// ```json
/// {
///   "name": "contracts",
///   "assemblies": [
///     { "name": "Lib", "namespaces": [
///       { "name": "Lib", "types": [ { "name": "Widget", "kind": "class" } ] }
///     ] }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_assembly_set(path: &Path) -> Result<AssemblySet, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut set: AssemblySet = serde_json::from_str(&content).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Types list their namespace implicitly through the enclosing entry.
    for assembly in &mut set.assemblies {
        for namespace in &mut assembly.namespaces {
            for ty in &mut namespace.types {
                if ty.namespace.is_empty() {
                    ty.namespace.clone_from(&namespace.name);
                }
            }
            namespace.resolve_declaring_types();
        }
    }

    debug!(
        path = %path.display(),
        assemblies = set.assemblies.len(),
        "Loaded assembly set"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apicompat_core::{MemberKind, TypeKind};
    use std::io::Write;

    #[test]
    fn test_load_surface() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
  "name": "contracts",
  "assemblies": [{{
    "name": "Lib",
    "namespaces": [{{
      "name": "Lib.Drawing",
      "types": [{{
        "name": "Shape",
        "kind": "class",
        "base_types": ["System.Object"],
        "members": [{{ "name": "Draw", "kind": "method", "is_virtual": true }}]
      }}]
    }}]
  }}]
}}"#
        )
        .unwrap();

        let set = load_assembly_set(file.path()).unwrap();
        assert_eq!(set.name, "contracts");
        let ty = &set.assemblies[0].namespaces[0].types[0];
        assert_eq!(ty.full_name(), "Lib.Drawing.Shape");
        assert_eq!(ty.kind, TypeKind::Class);
        assert_eq!(ty.members[0].kind, MemberKind::Method);
        assert!(ty.members[0].is_virtual);
    }

    #[test]
    fn test_nested_type_takes_enclosing_visibility() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
  "name": "contracts",
  "assemblies": [{{
    "name": "Lib",
    "namespaces": [{{
      "name": "N",
      "types": [
        {{ "name": "Hidden", "kind": "class", "visibility": "assembly" }},
        {{ "name": "Helper", "kind": "class", "declaring_types": ["Hidden"] }}
      ]
    }}]
  }}]
}}"#
        )
        .unwrap();

        let set = load_assembly_set(file.path()).unwrap();
        let helper = &set.assemblies[0].namespaces[0].types[1];
        assert_eq!(helper.doc_id(), "T:N.Hidden.Helper");
        assert!(!helper.is_visible_outside_assembly());
    }

    #[test]
    fn test_missing_file() {
        let err = load_assembly_set(Path::new("/nonexistent/contracts.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"assemblies\": 3 }}").unwrap();

        let err = load_assembly_set(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
