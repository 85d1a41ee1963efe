//! Untested-entity differ: expected test objects vs implemented ones.
//!
//! Given a source module's inventory and the inventory of its mirrored
//! test module (possibly empty, for a not-yet-existing file), computes
//! what is missing: test functions and, per test class, test methods.
//!
//! Order is the source's definition order throughout — never deduplicated
//! or sorted — so the merger's insertion order is stable across runs and
//! diffs against version control do not churn.

use serde::Serialize;
use tracing::warn;

use testmirror_core::error::CodecResult;
use testmirror_core::path::ImportPath;

use crate::model::{ModuleInventory, SourceObject};

// ============================================================================
// Report Types
// ============================================================================

/// Missing test methods for one expected test class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassGap {
    /// Expected test class name (`Test` prefix applied).
    pub class_name: String,
    /// Expected-but-missing test method names, in source definition
    /// order. Empty when the class itself is entirely missing and its
    /// source counterpart declares no methods.
    pub missing_methods: Vec<String>,
}

/// Everything missing from one (source module, test module) pair.
///
/// A class appears in `missing_classes` when it is entirely absent from
/// the test module or when some of its methods are; a fully covered class
/// is omitted, even if it exists in skeleton-only form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UntestedReport {
    /// Expected-but-missing test function names, in source definition
    /// order.
    pub missing_functions: Vec<String>,
    /// Expected test classes with gaps, in source definition order.
    pub missing_classes: Vec<ClassGap>,
}

impl UntestedReport {
    /// True when nothing is missing: the test module fully mirrors the
    /// source module.
    pub fn is_empty(&self) -> bool {
        self.missing_functions.is_empty() && self.missing_classes.is_empty()
    }

    /// Total count of skeletons this report calls for.
    pub fn gap_count(&self) -> usize {
        self.missing_functions.len()
            + self
                .missing_classes
                .iter()
                .map(|gap| 1 + gap.missing_methods.len())
                .sum::<usize>()
    }
}

// ============================================================================
// Differ
// ============================================================================

/// Diff a source module's inventory against its test module's inventory.
///
/// `src_path` is the source module's import path; it qualifies the
/// [`SourceObject`]s whose test names drive the comparison.
pub fn untested_report(
    src_path: &ImportPath,
    src: &ModuleInventory,
    test: &ModuleInventory,
) -> CodecResult<UntestedReport> {
    if !src.ordering_available {
        warn!(
            module = %src_path,
            "definition-line ordering unavailable; skeleton order degrades to declaration order"
        );
    }

    let actual_functions: Vec<&str> = test.functions.iter().map(|f| f.name.as_str()).collect();
    let mut missing_functions = Vec::new();
    for function in &src.functions {
        let expected = SourceObject::Function {
            path: src_path.join(&function.name)?,
            rank: function.line,
        }
        .test_name()?;
        if !actual_functions.contains(&expected.as_str()) {
            missing_functions.push(expected);
        }
    }

    let mut missing_classes = Vec::new();
    for class in &src.classes {
        let expected_class = SourceObject::Class {
            path: src_path.join(&class.name)?,
            rank: class.line,
        }
        .test_name()?;

        let actual_methods: Option<Vec<&str>> = test
            .classes
            .iter()
            .find(|c| c.name == expected_class)
            .map(|c| c.methods().iter().map(|m| m.name.as_str()).collect());

        let mut missing_methods = Vec::new();
        for method in class.methods() {
            let expected = SourceObject::Function {
                path: src_path.join(&class.name)?.join(&method.name)?,
                rank: method.line,
            }
            .test_name()?;
            let covered = actual_methods
                .as_ref()
                .is_some_and(|methods| methods.contains(&expected.as_str()));
            if !covered {
                missing_methods.push(expected);
            }
        }

        if !missing_methods.is_empty() || actual_methods.is_none() {
            missing_classes.push(ClassGap {
                class_name: expected_class,
                missing_methods,
            });
        }
    }

    Ok(UntestedReport {
        missing_functions,
        missing_classes,
    })
}

// ============================================================================
// Tests
// ============================================================================
