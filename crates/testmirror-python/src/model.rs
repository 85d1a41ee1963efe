//! Data model: source modules, their members, and source objects.
//!
//! Definition order is carried as the 1-indexed source line of each
//! member. Line 0 is the "ordering unavailable" sentinel; an inventory
//! built without line information sets `ordering_available = false` and
//! downstream consumers treat that as a degraded-but-non-fatal mode.

use serde::{Deserialize, Serialize};

use testmirror_core::convention::{self, ObjectKind};
use testmirror_core::error::CodecResult;
use testmirror_core::path::{ImportPath, ModuleKind};

/// Sentinel definition line meaning "ordering unavailable".
pub const LINE_UNAVAILABLE: u32 = 0;

// ============================================================================
// Module Members
// ============================================================================

/// A function (or method) defined directly in a module or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyFunction {
    /// Isolated name (no qualifier).
    pub name: String,
    /// 1-indexed definition line; [`LINE_UNAVAILABLE`] when unknown.
    pub line: u32,
}

impl PyFunction {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        PyFunction {
            name: name.into(),
            line,
        }
    }
}

/// A class defined directly in a module, with its directly defined
/// methods in definition order. Inherited-and-visible methods never
/// appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyClass {
    /// Isolated name (no qualifier).
    pub name: String,
    /// 1-indexed definition line; [`LINE_UNAVAILABLE`] when unknown.
    pub line: u32,
    /// Directly defined methods, ascending definition line.
    pub methods: Vec<PyFunction>,
}

impl PyClass {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        PyClass {
            name: name.into(),
            line,
            methods: Vec::new(),
        }
    }

    /// Methods defined directly on this class, in definition order.
    pub fn methods(&self) -> &[PyFunction] {
        &self.methods
    }
}

// ============================================================================
// Module Inventory
// ============================================================================

/// The members defined directly in one module, in definition order.
///
/// This is the introspector's output and the differ's input. It is a
/// derived view of module text — callers cache it keyed by content hash
/// and re-derive it after every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInventory {
    /// Top-level functions, ascending definition line.
    pub functions: Vec<PyFunction>,
    /// Top-level classes, ascending definition line.
    pub classes: Vec<PyClass>,
    /// False when definition lines are unavailable (all set to the
    /// sentinel) and ordering degrades to declaration order as given.
    pub ordering_available: bool,
}

impl ModuleInventory {
    /// An inventory with full line ordering.
    pub fn new(functions: Vec<PyFunction>, classes: Vec<PyClass>) -> Self {
        ModuleInventory {
            functions,
            classes,
            ordering_available: true,
        }
    }

    /// An inventory without line information: every line becomes the
    /// sentinel and the ordering flag is cleared. The given declaration
    /// order is preserved as-is.
    pub fn without_ordering(functions: Vec<PyFunction>, classes: Vec<PyClass>) -> Self {
        let functions = functions
            .into_iter()
            .map(|f| PyFunction::new(f.name, LINE_UNAVAILABLE))
            .collect();
        let classes = classes
            .into_iter()
            .map(|c| PyClass {
                name: c.name,
                line: LINE_UNAVAILABLE,
                methods: c
                    .methods
                    .into_iter()
                    .map(|m| PyFunction::new(m.name, LINE_UNAVAILABLE))
                    .collect(),
            })
            .collect();
        ModuleInventory {
            functions,
            classes,
            ordering_available: false,
        }
    }

    /// An empty inventory, as for a not-yet-existing test module.
    pub fn empty() -> Self {
        ModuleInventory::new(Vec::new(), Vec::new())
    }
}

// ============================================================================
// Source Module
// ============================================================================

/// A source module: its import path, module-vs-package kind, and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    pub import_path: ImportPath,
    pub kind: ModuleKind,
    pub source: String,
}

impl SourceModule {
    pub fn new(import_path: ImportPath, kind: ModuleKind, source: impl Into<String>) -> Self {
        SourceModule {
            import_path,
            kind,
            source: source.into(),
        }
    }
}

// ============================================================================
// Source Object
// ============================================================================

/// A source object whose test identity can be derived: a module, a class,
/// or a function, carrying its fully-qualified import path and, for
/// class/function, its definition-order rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceObject {
    Module {
        path: ImportPath,
    },
    Class {
        path: ImportPath,
        rank: u32,
    },
    Function {
        path: ImportPath,
        rank: u32,
    },
}

impl SourceObject {
    /// The fully-qualified import path.
    pub fn import_path(&self) -> &ImportPath {
        match self {
            SourceObject::Module { path }
            | SourceObject::Class { path, .. }
            | SourceObject::Function { path, .. } => path,
        }
    }

    /// The last path segment.
    pub fn isolated_name(&self) -> &str {
        self.import_path().leaf()
    }

    /// Definition-order rank within the defining module, when known.
    pub fn rank(&self) -> Option<u32> {
        match self {
            SourceObject::Module { .. } => None,
            SourceObject::Class { rank, .. } | SourceObject::Function { rank, .. } => Some(*rank),
        }
    }

    /// The object kind for convention-codec purposes.
    pub fn kind(&self) -> ObjectKind {
        match self {
            SourceObject::Module { .. } => ObjectKind::Module,
            SourceObject::Class { .. } => ObjectKind::Class,
            SourceObject::Function { .. } => ObjectKind::Function,
        }
    }

    /// Derived test name (isolated, prefixed).
    pub fn test_name(&self) -> CodecResult<String> {
        convention::test_name_for(self.isolated_name(), self.kind())
    }

    /// Derived test import path under the `tests` root.
    pub fn test_import_path(&self) -> CodecResult<ImportPath> {
        convention::test_import_path_for(self.import_path(), self.kind())
    }
}

// ============================================================================
// Tests
// ============================================================================
