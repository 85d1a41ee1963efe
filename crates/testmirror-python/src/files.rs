//! Workspace source-module collection.
//!
//! Walks a workspace root for Python modules, mapping each `.py` file to
//! its import path and module-vs-package kind. The mirror target tree
//! (`tests/`) and the usual noise directories are excluded.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use testmirror_core::convention::TESTS_ROOT;
use testmirror_core::path::{module_file_path, module_path_from_file, ImportPath, ModuleKind};

use crate::model::SourceModule;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// Module not found at the expected path.
    #[error("module not found: {path}")]
    NotFound { path: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

// ============================================================================
// Collection
// ============================================================================

/// Collect every source module under `workspace_root`, sorted by import
/// path for deterministic batch order.
///
/// Exclusions:
/// - the `tests` tree (the mirror target, never a mirror source)
/// - hidden directories, `__pycache__`, `venv`, `node_modules`, `target`
/// - `.py` files whose path components are not valid identifiers (they
///   have no import path; skipped with a debug log, not an error)
pub fn collect_source_modules(workspace_root: &Path) -> FileResult<Vec<SourceModule>> {
    let mut modules = Vec::new();

    for entry in WalkDir::new(workspace_root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        // Filter on workspace-relative paths only; the absolute prefix
        // may contain arbitrary names (temp dirs and the like).
        let rel_path = match path.strip_prefix(workspace_root) {
            Ok(p) => p,
            Err(_) => continue,
        };

        if path.extension().is_none_or(|ext| ext != "py") {
            continue;
        }
        if is_excluded(rel_path) {
            continue;
        }

        let (import_path, kind) = match module_path_from_file(rel_path) {
            Ok(mapped) => mapped,
            Err(err) => {
                debug!(path = %rel_path.display(), %err, "skipping unimportable file");
                continue;
            }
        };

        let source = fs::read_to_string(path)?;
        modules.push(SourceModule::new(import_path, kind, source));
    }

    modules.sort_by(|a, b| a.import_path.cmp(&b.import_path));
    Ok(modules)
}

/// Load one source module by import path and kind.
pub fn load_source_module(
    workspace_root: &Path,
    import_path: &ImportPath,
    kind: ModuleKind,
) -> FileResult<SourceModule> {
    let rel = module_file_path(import_path, kind);
    let abs = workspace_root.join(&rel);
    if !abs.is_file() {
        return Err(FileError::NotFound {
            path: rel.display().to_string(),
        });
    }
    let source = fs::read_to_string(&abs)?;
    Ok(SourceModule::new(import_path.clone(), kind, source))
}

/// Standard exclusions: the mirror target tree, hidden directories, and
/// tool/cache directories.
fn is_excluded(rel_path: &Path) -> bool {
    let mut components = rel_path.components();
    if let Some(first) = components.next() {
        if first.as_os_str() == TESTS_ROOT {
            return true;
        }
    }
    rel_path.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        name.starts_with('.')
            || name == "__pycache__"
            || name == "venv"
            || name == "node_modules"
            || name == "target"
    })
}

// ============================================================================
// Tests
// ============================================================================
