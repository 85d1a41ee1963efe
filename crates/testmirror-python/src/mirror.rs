//! Mirror-test orchestrator: drive introspection, diffing, and merging,
//! and persist the result into the `tests` tree.
//!
//! One [`MirrorEngine`] owns a workspace root and a cache of parsed
//! module views. Content is the source of truth: each view is keyed by
//! the hash of the text it was derived from and is re-derived — never
//! trusted — after a write. The engine is the sole writer of a test file
//! for the duration of a pass; concurrent orchestrators mutating the same
//! file are not supported.
//!
//! All I/O is synchronous blocking filesystem access. A `synchronize`
//! call runs to completion or returns an error; there is no cancellation
//! or retry.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use testmirror_core::convention;
use testmirror_core::error::{CodecResult, MirrorResult};
use testmirror_core::hash::ContentHash;
use testmirror_core::path::{module_file_path, ImportPath, ModuleKind, PACKAGE_INIT};

use crate::diff::{untested_report, UntestedReport};
use crate::introspect::scan_module;
use crate::merge::{ContentMerger, TextualMerger};
use crate::model::{ModuleInventory, SourceModule};

// ============================================================================
// Sync Outcome
// ============================================================================

/// What one `synchronize` call did, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// The source module that was mirrored.
    pub source: ImportPath,
    /// Workspace-relative path of the mirrored test file.
    pub test_file: String,
    /// True when the test file did not exist before this call.
    pub created: bool,
    /// True when the file was (re)written; false when it was already
    /// fully covered and left untouched.
    pub written: bool,
    /// Skeletons injected by this call.
    pub added_functions: usize,
    pub added_classes: usize,
    pub added_methods: usize,
}

impl SyncOutcome {
    fn from_report(
        source: ImportPath,
        test_file: String,
        created: bool,
        written: bool,
        report: &UntestedReport,
    ) -> Self {
        SyncOutcome {
            source,
            test_file,
            created,
            written,
            added_functions: report.missing_functions.len(),
            added_classes: report.missing_classes.len(),
            added_methods: report
                .missing_classes
                .iter()
                .map(|gap| gap.missing_methods.len())
                .sum(),
        }
    }
}

// ============================================================================
// Module View Cache
// ============================================================================

/// Cache of parsed module inventories, keyed by content hash.
///
/// Text is the source of truth; a view is valid only for the exact
/// content it was scanned from. Feeding different content for the same
/// import path replaces the entry, which is how views are invalidated
/// across a write boundary.
#[derive(Debug, Default)]
pub struct ModuleViewCache {
    entries: HashMap<ImportPath, (ContentHash, ModuleInventory)>,
}

impl ModuleViewCache {
    pub fn new() -> Self {
        ModuleViewCache::default()
    }

    /// The inventory for `content`, scanning only when the cached view
    /// was derived from different content.
    pub fn view(&mut self, path: &ImportPath, content: &str) -> ModuleInventory {
        let hash = ContentHash::compute(content);
        if let Some((cached_hash, inventory)) = self.entries.get(path) {
            if *cached_hash == hash {
                return inventory.clone();
            }
        }
        let inventory = scan_module(content);
        self.entries
            .insert(path.clone(), (hash, inventory.clone()));
        inventory
    }

    /// Number of cached views (test instrumentation).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Mirror Engine
// ============================================================================

/// The mirror-test orchestrator for one workspace.
pub struct MirrorEngine {
    workspace_root: PathBuf,
    merger: Box<dyn ContentMerger>,
    views: ModuleViewCache,
}

impl MirrorEngine {
    /// Create an engine rooted at `workspace_root`, using the textual
    /// merger.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        MirrorEngine::with_merger(workspace_root, Box::new(TextualMerger))
    }

    /// Create an engine with a custom merger implementation.
    pub fn with_merger(workspace_root: impl Into<PathBuf>, merger: Box<dyn ContentMerger>) -> Self {
        MirrorEngine {
            workspace_root: workspace_root.into(),
            merger,
            views: ModuleViewCache::new(),
        }
    }

    /// True iff the source module's mirrored test module is complete: no
    /// missing test functions and no missing test classes or methods.
    pub fn is_covered(&mut self, src: &SourceModule) -> MirrorResult<bool> {
        let report = self.gap_report(src)?.1;
        Ok(report.is_empty())
    }

    /// Bring the mirrored test module up to date with the source module.
    ///
    /// Creates parent test packages as needed (each with an empty
    /// `__init__.py` marker), injects skeletons for every gap, writes the
    /// merged text, and re-derives the cached view from the new content.
    /// An already-covered, existing test file is left untouched.
    pub fn synchronize(&mut self, src: &SourceModule) -> MirrorResult<SyncOutcome> {
        let (test_rel, report) = self.gap_report(src)?;
        let test_abs = self.workspace_root.join(&test_rel);
        let existed = test_abs.is_file();

        if existed && report.is_empty() {
            debug!(source = %src.import_path, test = %test_rel.display(), "already covered");
            return Ok(SyncOutcome::from_report(
                src.import_path.clone(),
                rel_display(&test_rel),
                false,
                false,
                &report,
            ));
        }

        self.ensure_test_packages(&test_rel)?;

        let existing = if existed {
            fs::read_to_string(&test_abs)?
        } else {
            String::new()
        };
        let merged = self.merger.merge(&existing, &report)?;
        fs::write(&test_abs, &merged)?;
        debug!(
            source = %src.import_path,
            test = %test_rel.display(),
            gaps = report.gap_count(),
            "synchronized"
        );

        // Content changed on disk; the cached view must be re-derived,
        // not trusted across the write boundary.
        let test_path = self.test_import_path(src)?;
        self.views.view(&test_path, &merged);

        Ok(SyncOutcome::from_report(
            src.import_path.clone(),
            rel_display(&test_rel),
            !existed,
            true,
            &report,
        ))
    }

    /// Synchronize a batch of source modules.
    ///
    /// Package `__init__` modules are processed before the modules they
    /// contain (depth first, packages before plain modules at equal
    /// depth), so test packages exist before anything inside them is
    /// mirrored. A failure aborts only that module's synchronize; modules
    /// already processed are unaffected.
    pub fn synchronize_many(
        &mut self,
        sources: &[SourceModule],
    ) -> Vec<(ImportPath, MirrorResult<SyncOutcome>)> {
        let mut order: Vec<&SourceModule> = sources.iter().collect();
        order.sort_by_key(|m| batch_priority(m));

        order
            .into_iter()
            .map(|src| (src.import_path.clone(), self.synchronize(src)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// The mirrored test module's import path for a source module.
    fn test_import_path(&self, src: &SourceModule) -> CodecResult<ImportPath> {
        convention::test_import_path_for(&src.import_path, convention::ObjectKind::Module)
    }

    /// Compute the test file's workspace-relative path and the gap report
    /// for one source module.
    fn gap_report(&mut self, src: &SourceModule) -> MirrorResult<(PathBuf, UntestedReport)> {
        let test_path = self.test_import_path(src)?;
        let test_rel = module_file_path(&test_path, src.kind);
        let test_abs = self.workspace_root.join(&test_rel);

        let src_inventory = self.views.view(&src.import_path, &src.source);
        let test_inventory = if test_abs.is_file() {
            let content = fs::read_to_string(&test_abs)?;
            self.views.view(&test_path, &content)
        } else {
            ModuleInventory::empty()
        };

        let report = untested_report(&src.import_path, &src_inventory, &test_inventory)?;
        Ok((test_rel, report))
    }

    /// Create every directory on the test file's relative path, dropping
    /// an empty `__init__.py` marker into each one that lacks it.
    fn ensure_test_packages(&self, test_rel: &Path) -> io::Result<()> {
        let Some(parent) = test_rel.parent() else {
            return Ok(());
        };

        let mut dir = self.workspace_root.clone();
        for component in parent.components() {
            dir.push(component);
            fs::create_dir_all(&dir)?;
            let marker = dir.join(PACKAGE_INIT);
            if !marker.exists() {
                fs::write(&marker, "")?;
            }
        }
        Ok(())
    }
}

/// Batch ordering key: shallower modules first; at equal depth, packages
/// before plain modules; ties broken by path for determinism.
fn batch_priority(module: &SourceModule) -> (usize, u8, String) {
    let kind_rank = match module.kind {
        ModuleKind::Package => 0,
        ModuleKind::Module => 1,
    };
    (
        module.import_path.depth(),
        kind_rank,
        module.import_path.as_str().to_string(),
    )
}

fn rel_display(path: &Path) -> String {
    path.display().to_string()
}

// ============================================================================
// Tests
// ============================================================================
