//! Content merger: non-destructive skeleton injection into test module
//! text.
//!
//! The merge is purely textual. The bare class skeleton produced by the
//! synthesizer is used as an exact-substring search key; missing methods
//! are spliced in immediately after it, which leaves everything else in
//! the file — earlier blocks before the key, hand-written methods after
//! it — byte-for-byte untouched. Hand-written implementations diverge
//! textually from the bare skeleton, so they are never matched by the
//! search.
//!
//! Correctness conditions, inherited from that design: the bare class
//! skeleton must not appear as a substring of unrelated code, and
//! hand-written method bodies must be added after the skeleton marker
//! rather than replacing it. The literal class header substring persists
//! in the file even after all methods are implemented — a trade-off for
//! mergeability. If the key ever occurs more than once, the merger fails
//! loudly rather than guessing which occurrence to use.
//!
//! The textual strategy lives behind [`ContentMerger`] so a syntax-tree
//! inserter could replace it without changing the differ or orchestrator
//! contracts.

use testmirror_core::error::{MirrorError, MirrorResult};
use testmirror_core::skeleton::{class_skeleton, function_skeleton, method_skeleton, MODULE_DOCSTRING};

use crate::diff::UntestedReport;

// ============================================================================
// Merger Interface
// ============================================================================

/// Folds an [`UntestedReport`]'s skeletons into existing test module
/// text.
pub trait ContentMerger {
    /// Produce the merged module text. Must be idempotent on its own
    /// output and must not alter existing content outside of insertion
    /// points.
    fn merge(&self, text: &str, report: &UntestedReport) -> MirrorResult<String>;
}

// ============================================================================
// Textual Merger
// ============================================================================

/// The substring-search implementation of [`ContentMerger`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TextualMerger;

impl ContentMerger for TextualMerger {
    fn merge(&self, text: &str, report: &UntestedReport) -> MirrorResult<String> {
        let mut merged = ensure_module_docstring(text);

        for name in &report.missing_functions {
            merged.push_str(&function_skeleton(name));
        }

        for gap in &report.missing_classes {
            let key = class_skeleton(&gap.class_name);
            let hits: Vec<usize> = merged.match_indices(&key).map(|(at, _)| at).collect();
            match hits.as_slice() {
                [] => {
                    // Class not present textually: append header and
                    // methods as one new block.
                    merged.push_str("\n\n");
                    merged.push_str(&key);
                    for method in &gap.missing_methods {
                        merged.push_str(&method_skeleton(method));
                    }
                }
                [at] => {
                    // Class present in skeleton form: splice missing
                    // methods in right after the header, preserving both
                    // halves of the split.
                    let mut spliced = String::with_capacity(merged.len() + key.len());
                    spliced.push_str(&merged[..*at]);
                    spliced.push_str(&key);
                    for method in &gap.missing_methods {
                        spliced.push_str(&method_skeleton(method));
                    }
                    spliced.push_str(&merged[at + key.len()..]);
                    merged = spliced;
                }
                _ => {
                    return Err(MirrorError::ambiguous_skeleton(
                        &gap.class_name,
                        hits.len(),
                    ));
                }
            }
        }

        Ok(merged)
    }
}

/// Prepend the default module docstring when the text has none.
fn ensure_module_docstring(text: &str) -> String {
    let lead = text.trim_start();
    if lead.starts_with("\"\"\"") || lead.starts_with("'''") {
        text.to_string()
    } else if text.trim().is_empty() {
        MODULE_DOCSTRING.to_string()
    } else {
        format!("{}\n{}", MODULE_DOCSTRING, text)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ClassGap;

    fn merge(text: &str, report: &UntestedReport) -> String {
        TextualMerger.merge(text, report).unwrap()
    }

    fn function_report(names: &[&str]) -> UntestedReport {
        UntestedReport {
            missing_functions: names.iter().map(|n| n.to_string()).collect(),
            missing_classes: Vec::new(),
        }
    }

    fn class_report(class_name: &str, methods: &[&str]) -> UntestedReport {
        UntestedReport {
            missing_functions: Vec::new(),
            missing_classes: vec![ClassGap {
                class_name: class_name.to_string(),
                missing_methods: methods.iter().map(|m| m.to_string()).collect(),
            }],
        }
    }

    mod docstring {
        use super::*;

        #[test]
        fn empty_text_becomes_docstring_only_module() {
            let merged = merge("", &UntestedReport::default());
            assert_eq!(merged, "\"\"\"Test module.\"\"\"\n");
        }

        #[test]
        fn existing_docstring_is_kept() {
            let text = "\"\"\"Hand-written module docs.\"\"\"\n";
            let merged = merge(text, &UntestedReport::default());
            assert_eq!(merged, text);
        }

        #[test]
        fn missing_docstring_is_prepended_before_content() {
            let merged = merge("import os\n", &UntestedReport::default());
            assert_eq!(merged, "\"\"\"Test module.\"\"\"\n\nimport os\n");
        }
    }

    mod functions {
        use super::*;

        #[test]
        fn appends_functions_in_report_order() {
            let merged = merge("", &function_report(&["test_f_a", "test_f_b"]));
            let a = merged.find("def test_f_a").unwrap();
            let b = merged.find("def test_f_b").unwrap();
            assert!(a < b);
        }

        #[test]
        fn appends_after_existing_content() {
            let text = "\"\"\"Docs.\"\"\"\n\n\ndef test_done():\n    assert True\n";
            let merged = merge(text, &function_report(&["test_new"]));
            assert!(merged.starts_with(text));
            assert!(merged.ends_with(
                "\n\ndef test_new() -> None:\n    \"\"\"Test function.\"\"\"\n    raise NotImplementedError\n"
            ));
        }
    }

    mod classes {
        use super::*;

        #[test]
        fn absent_class_appended_with_methods() {
            let merged = merge("", &class_report("TestCalc", &["test_add", "test_multiply"]));
            assert_eq!(
                merged,
                "\"\"\"Test module.\"\"\"\n\n\nclass TestCalc:\n    \"\"\"Test class.\"\"\"\n\n    def test_add(self) -> None:\n        \"\"\"Test method.\"\"\"\n        raise NotImplementedError\n\n    def test_multiply(self) -> None:\n        \"\"\"Test method.\"\"\"\n        raise NotImplementedError\n"
            );
        }

        #[test]
        fn existing_skeleton_class_gets_methods_spliced_in() {
            let text = "\"\"\"Docs.\"\"\"\n\n\nclass TestCalc:\n    \"\"\"Test class.\"\"\"\n\n    def test_add(self):\n        assert 1 + 1 == 2\n";
            let merged = merge(text, &class_report("TestCalc", &["test_multiply"]));
            // Exactly one class header, hand-written method untouched,
            // new method present inside the class.
            assert_eq!(merged.matches("class TestCalc:").count(), 1);
            assert!(merged.contains("def test_add(self):\n        assert 1 + 1 == 2"));
            assert!(merged.contains("def test_multiply(self) -> None:"));
            let multiply = merged.find("def test_multiply").unwrap();
            let add = merged.find("def test_add").unwrap();
            assert!(multiply < add, "splice inserts right after the header");
        }

        #[test]
        fn content_before_the_class_is_preserved() {
            let text = "\"\"\"Docs.\"\"\"\n\n\ndef test_early():\n    pass\n\n\nclass TestCalc:\n    \"\"\"Test class.\"\"\"\n";
            let merged = merge(text, &class_report("TestCalc", &["test_add"]));
            assert!(merged.starts_with("\"\"\"Docs.\"\"\"\n\n\ndef test_early():\n    pass\n"));
            assert!(merged.contains("def test_add(self) -> None:"));
        }

        #[test]
        fn duplicated_skeleton_is_a_structural_ambiguity() {
            let skeleton = "class TestFoo:\n    \"\"\"Test class.\"\"\"\n";
            let text = format!("\"\"\"Docs.\"\"\"\n\n\n{}\n\n{}", skeleton, skeleton);
            let err = TextualMerger
                .merge(&text, &class_report("TestFoo", &["test_bar"]))
                .unwrap_err();
            match err {
                MirrorError::StructuralAmbiguity {
                    class_name,
                    occurrences,
                } => {
                    assert_eq!(class_name, "TestFoo");
                    assert_eq!(occurrences, 2);
                }
                other => panic!("expected StructuralAmbiguity, got {:?}", other),
            }
        }

        #[test]
        fn hand_written_class_without_skeleton_form_is_not_matched() {
            // A hand-written class header diverges from the bare skeleton
            // (different docstring), so the search finds nothing and a
            // fresh skeleton block is appended. Known sharp edge of the
            // textual approach.
            let text = "\"\"\"Docs.\"\"\"\n\n\nclass TestCalc:\n    \"\"\"Hand docs.\"\"\"\n";
            let merged = merge(text, &class_report("TestCalc", &["test_add"]));
            assert_eq!(merged.matches("class TestCalc:").count(), 2);
        }
    }

    mod idempotence {
        use super::*;

        #[test]
        fn merging_an_empty_report_is_identity() {
            let text = "\"\"\"Docs.\"\"\"\n\n\nclass TestCalc:\n    \"\"\"Test class.\"\"\"\n";
            assert_eq!(merge(text, &UntestedReport::default()), text);
        }

        #[test]
        fn remerging_own_output_with_same_report_does_not_duplicate_functions() {
            // The differ would no longer report these names after the
            // first merge; this guards the merger's own contract that an
            // empty report leaves the output untouched.
            let once = merge("", &function_report(&["test_f"]));
            let twice = merge(&once, &UntestedReport::default());
            assert_eq!(once, twice);
        }
    }
}
