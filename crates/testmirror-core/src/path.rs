//! Import-path value type and filesystem mapping.
//!
//! An [`ImportPath`] is a dot-separated Python import path
//! (e.g. `pkg.sub.module`). Every segment must be a valid Python
//! identifier; construction validates this so downstream code never has to
//! re-check.
//!
//! The filesystem mapping is exact in both directions for any path whose
//! segments contain no literal dots:
//! - module `pkg.mod` ↔ `pkg/mod.py`
//! - package `pkg.sub` ↔ `pkg/sub/__init__.py`

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CodecResult, NamingError};

/// Filename that marks a directory as a Python package.
pub const PACKAGE_INIT: &str = "__init__.py";

/// Extension for Python module files.
pub const PY_EXTENSION: &str = "py";

// ============================================================================
// Identifier Validation
// ============================================================================

/// Check whether `name` is a valid Python identifier (ASCII form).
///
/// Leading character must be a letter or underscore; the rest letters,
/// digits, or underscores. Unicode identifiers are out of scope: the
/// naming convention codec keys off ASCII case anyway.
pub fn is_python_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ============================================================================
// ImportPath
// ============================================================================

/// A validated, dot-separated Python import path.
///
/// Serializes as a plain string (e.g. `"pkg.module"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImportPath(String);

impl ImportPath {
    /// Parse an import path, validating every segment.
    pub fn parse(path: impl Into<String>) -> CodecResult<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(NamingError::new(path, "import path is empty"));
        }
        for segment in path.split('.') {
            if !is_python_identifier(segment) {
                return Err(NamingError::new(
                    path.clone(),
                    format!("segment '{}' is not a valid Python identifier", segment),
                ));
            }
        }
        Ok(ImportPath(path))
    }

    /// Build an import path from individual segments.
    pub fn from_segments<I, S>(segments: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(".");
        ImportPath::parse(joined)
    }

    /// The full dotted path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.split('.').count()
    }

    /// The last segment (the "isolated name").
    pub fn leaf(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// The path with the last segment removed, if any segments remain.
    pub fn parent(&self) -> Option<ImportPath> {
        self.0
            .rsplit_once('.')
            .map(|(head, _)| ImportPath(head.to_string()))
    }

    /// Append a segment, producing a child path.
    pub fn join(&self, segment: &str) -> CodecResult<ImportPath> {
        if !is_python_identifier(segment) {
            return Err(NamingError::new(
                segment,
                "not a valid Python identifier",
            ));
        }
        Ok(ImportPath(format!("{}.{}", self.0, segment)))
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Module Kind
// ============================================================================

/// Whether an import path names a plain module or a package.
///
/// The distinction matters only at the filesystem boundary: a package's
/// module file is its directory's `__init__.py`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// A plain module backed by `<leaf>.py`.
    Module,
    /// A package backed by `<leaf>/__init__.py`.
    Package,
}

// ============================================================================
// Filesystem Mapping
// ============================================================================

/// Map an import path to the file that defines the module.
///
/// - `Module`: `pkg.mod` → `pkg/mod.py`
/// - `Package`: `pkg.sub` → `pkg/sub/__init__.py`
pub fn module_file_path(path: &ImportPath, kind: ModuleKind) -> PathBuf {
    let mut fs_path: PathBuf = path.segments().collect();
    match kind {
        ModuleKind::Module => {
            fs_path.set_extension(PY_EXTENSION);
        }
        ModuleKind::Package => {
            fs_path.push(PACKAGE_INIT);
        }
    }
    fs_path
}

/// Map an import path to its package directory.
///
/// Only meaningful for `ModuleKind::Package` paths: `pkg.sub` → `pkg/sub`.
pub fn package_dir_path(path: &ImportPath) -> PathBuf {
    path.segments().collect()
}

/// Map a workspace-relative `.py` file path back to `(import_path, kind)`.
///
/// Exact inverse of [`module_file_path`] for any path whose components are
/// valid identifiers. Rejects non-`.py` paths and paths with invalid
/// identifier components.
pub fn module_path_from_file(fs_path: &Path) -> CodecResult<(ImportPath, ModuleKind)> {
    let display = fs_path.display().to_string();
    if fs_path.extension().is_none_or(|ext| ext != PY_EXTENSION) {
        return Err(NamingError::new(display, "not a .py file"));
    }

    let mut segments: Vec<String> = Vec::new();
    for component in fs_path.components() {
        let part = component.as_os_str().to_string_lossy().to_string();
        segments.push(part);
    }

    let last = segments
        .pop()
        .ok_or_else(|| NamingError::new(display.clone(), "empty path"))?;

    let kind = if last == PACKAGE_INIT {
        ModuleKind::Package
    } else {
        let stem = last
            .strip_suffix(".py")
            .ok_or_else(|| NamingError::new(display.clone(), "not a .py file"))?;
        segments.push(stem.to_string());
        ModuleKind::Module
    };

    let path = ImportPath::from_segments(segments)?;
    Ok((path, kind))
}

// ============================================================================
// Tests
// ============================================================================
