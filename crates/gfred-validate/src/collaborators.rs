//! Collaborators injected into the validation engine.
//!
//! The engine never looks up asset registries or expression parsers through
//! global state. Callers pass implementations of these traits in at
//! construction, which also lets tests substitute mocks.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, ValidateError};

/// Answers whether an asset (ship class, model file) exists.
pub trait AssetChecker {
    fn exists(&self, path: &str) -> bool;
}

impl<F> AssetChecker for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// Syntax checker for scripted expressions.
pub trait ExpressionValidator {
    fn validate_syntax(&self, expr: &str) -> bool;

    /// Error messages for `expr`; empty when the syntax is valid.
    fn get_errors(&self, expr: &str) -> Vec<String>;

    /// Quoted names the expression refers to, such as ship or wing names.
    fn referenced_names(&self, _expr: &str) -> Vec<String> {
        Vec::new()
    }
}

/// In-memory set of known asset names, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    names: BTreeSet<String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for name in names {
            catalog.insert(name.as_ref());
        }
        catalog
    }

    /// Load a catalog from a JSON array of asset names.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ValidateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let names: Vec<String> = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), count = names.len(), "loaded asset catalog");
        Ok(Self::from_names(names))
    }

    pub fn insert(&mut self, name: &str) {
        self.names.insert(normalize(name));
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl AssetChecker for AssetCatalog {
    fn exists(&self, path: &str) -> bool {
        self.names.contains(&normalize(path))
    }
}

/// Resolves assets as files below a root directory.
///
/// A reference matches `root/<path>` or `root/<path>.<ext>` for any of the
/// configured extensions. References that escape the root never match.
#[derive(Debug, Clone)]
pub struct DirectoryAssetChecker {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryAssetChecker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extensions
            .push(extension.trim_start_matches('.').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetChecker for DirectoryAssetChecker {
    fn exists(&self, path: &str) -> bool {
        let relative = Path::new(path.trim());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return false;
        }

        let direct = self.root.join(relative);
        if direct.is_file() {
            return true;
        }
        self.extensions.iter().any(|ext| {
            let mut candidate = direct.clone().into_os_string();
            candidate.push(".");
            candidate.push(ext);
            PathBuf::from(candidate).is_file()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_catalog_is_case_insensitive() {
        let catalog = AssetCatalog::from_names(["GTF Ulysses", "GTB Medusa"]);
        assert!(catalog.exists("gtf ulysses"));
        assert!(catalog.exists(" GTB Medusa "));
        assert!(!catalog.exists("GTF Hercules"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_catalog_load_from_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"["GTF Ulysses", "SF Dragon"]"#).unwrap();
        file.flush().unwrap();

        let catalog = AssetCatalog::load(file.path()).unwrap();
        assert!(catalog.exists("SF Dragon"));
    }

    #[test]
    fn test_catalog_load_rejects_objects() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"ships": []}"#).unwrap();
        file.flush().unwrap();

        let err = AssetCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, ValidateError::Json(_)));
    }

    #[test]
    fn test_closure_checker() {
        let checker = |path: &str| path.starts_with("GTF");
        assert!(checker.exists("GTF Ulysses"));
        assert!(!checker.exists("SF Dragon"));
    }

    #[test]
    fn test_directory_checker_with_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/fighter01.pof"), b"POF").unwrap();

        let checker = DirectoryAssetChecker::new(dir.path()).with_extension(".pof");
        assert!(checker.exists("models/fighter01.pof"));
        assert!(checker.exists("models/fighter01"));
        assert!(!checker.exists("models/fighter02"));
    }

    #[test]
    fn test_directory_checker_rejects_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let checker = DirectoryAssetChecker::new(dir.path());
        assert!(!checker.exists("../etc/passwd"));
        assert!(!checker.exists("/etc/passwd"));
        assert!(!checker.exists(""));
    }
}
