//! Name/path convention codec: source identity ↔ test identity.
//!
//! Pure functions, no state. The mapping is driven entirely by the Python
//! casing convention: package/module segments are lowercase-led, class
//! segments are uppercase-led. That convention is load-bearing — it is how
//! the codec decides, per path segment, whether to apply the module prefix
//! (`test_`) or the class prefix (`Test`) when building a mirrored path.
//!
//! Forward then inverse reproduces the original import path exactly,
//! because the inverse strips one prefix per segment. Known limitation: a
//! source name that genuinely starts with `test_` or `Test` is
//! indistinguishable from a mirrored name and is mis-stripped on the
//! reverse mapping. The priority order (`test_` before `Test`) is fixed;
//! no heuristic is applied.

use serde::{Deserialize, Serialize};

use crate::error::{CodecResult, NamingError};
use crate::path::{is_python_identifier, ImportPath};

/// Root segment under which all mirrored test modules live.
pub const TESTS_ROOT: &str = "tests";

/// Prefix applied to mirrored module and function names.
pub const MODULE_PREFIX: &str = "test_";

/// Prefix applied to mirrored class names.
pub const CLASS_PREFIX: &str = "Test";

// ============================================================================
// Object Kind
// ============================================================================

/// The kind of source object a name belongs to.
///
/// Determines which prefix [`test_name_for`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Module,
    Class,
    Function,
}

// ============================================================================
// Forward Mapping
// ============================================================================

/// Derive the test name for a source object's isolated name.
///
/// Functions and modules get the `test_` prefix; classes get `Test`.
/// Fails with [`NamingError`] when the name is not a valid Python
/// identifier — the codec never falls back to a placeholder.
pub fn test_name_for(name: &str, kind: ObjectKind) -> CodecResult<String> {
    if !is_python_identifier(name) {
        return Err(NamingError::new(name, "not a valid Python identifier"));
    }
    let prefixed = match kind {
        ObjectKind::Module | ObjectKind::Function => format!("{}{}", MODULE_PREFIX, name),
        ObjectKind::Class => format!("{}{}", CLASS_PREFIX, name),
    };
    Ok(prefixed)
}

/// Derive the full test import path for a source object.
///
/// Every segment except the last is prefixed according to its leading
/// character (lowercase → `test_`, uppercase → `Test`); the last segment
/// is replaced by [`test_name_for`]; the literal `tests` root is
/// prepended.
pub fn test_import_path_for(path: &ImportPath, kind: ObjectKind) -> CodecResult<ImportPath> {
    let segments: Vec<&str> = path.segments().collect();
    let mut mirrored = Vec::with_capacity(segments.len() + 1);
    mirrored.push(TESTS_ROOT.to_string());

    for segment in &segments[..segments.len() - 1] {
        mirrored.push(mirror_segment(segment));
    }
    mirrored.push(test_name_for(path.leaf(), kind)?);

    ImportPath::from_segments(mirrored)
}

/// Prefix one interior path segment based on its casing.
fn mirror_segment(segment: &str) -> String {
    if segment.starts_with(|c: char| c.is_ascii_uppercase()) {
        format!("{}{}", CLASS_PREFIX, segment)
    } else {
        format!("{}{}", MODULE_PREFIX, segment)
    }
}

// ============================================================================
// Inverse Mapping
// ============================================================================

/// Recover the source import path from a mirrored test path.
///
/// Strips the leading `tests` segment, then strips the first matching
/// prefix (`test_`, then `Test`) from every remaining segment. A segment
/// matching neither prefix passes through unchanged.
pub fn source_import_path_for(test_path: &ImportPath) -> CodecResult<ImportPath> {
    let mut segments = test_path.segments();
    match segments.next() {
        Some(root) if root == TESTS_ROOT => {}
        _ => {
            return Err(NamingError::new(
                test_path.as_str(),
                format!("test path does not start with the '{}' root", TESTS_ROOT),
            ));
        }
    }

    let stripped: Vec<&str> = segments.map(strip_test_prefix).collect();
    if stripped.is_empty() {
        return Err(NamingError::new(
            test_path.as_str(),
            "test path has no segments beyond the root",
        ));
    }
    ImportPath::from_segments(stripped)
}

/// Strip the first matching test prefix from one segment.
///
/// Priority: `test_` before `Test`. Unmatched segments are returned
/// unchanged.
fn strip_test_prefix(segment: &str) -> &str {
    if let Some(rest) = segment.strip_prefix(MODULE_PREFIX) {
        rest
    } else if let Some(rest) = segment.strip_prefix(CLASS_PREFIX) {
        rest
    } else {
        segment
    }
}

// ============================================================================
// Tests
// ============================================================================
