//! Skeleton text synthesizer: placeholder source for missing tests.
//!
//! Three deterministic templates, parameterized only by name. Each
//! placeholder raises `NotImplementedError`, marking a gap for a developer
//! to fill in.
//!
//! The bare class skeleton doubles as the content merger's search key:
//! its exact textual form must never vary with anything but the class
//! name, which is why it carries no members. Method skeletons are inserted
//! separately, immediately after the class header.

/// Default docstring prepended to a test module that has none.
pub const MODULE_DOCSTRING: &str = "\"\"\"Test module.\"\"\"\n";

/// Render a top-level test function skeleton.
///
/// Carries its own blank-line separation so it can be appended directly
/// to module text.
pub fn function_skeleton(name: &str) -> String {
    format!(
        "\n\ndef {name}() -> None:\n    \"\"\"Test function.\"\"\"\n    raise NotImplementedError\n"
    )
}

/// Render a bare test class skeleton: header plus docstring, no members.
///
/// This exact string is the merger's search key; callers must not alter
/// its form.
pub fn class_skeleton(name: &str) -> String {
    format!("class {name}:\n    \"\"\"Test class.\"\"\"\n")
}

/// Render a test method skeleton, indented for insertion into a class
/// body.
///
/// Carries a leading newline so consecutive methods are blank-line
/// separated when concatenated after the class skeleton.
pub fn method_skeleton(name: &str) -> String {
    format!(
        "\n    def {name}(self) -> None:\n        \"\"\"Test method.\"\"\"\n        raise NotImplementedError\n"
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_skeleton_exact_form() {
        assert_eq!(
            function_skeleton("test_process"),
            "\n\ndef test_process() -> None:\n    \"\"\"Test function.\"\"\"\n    raise NotImplementedError\n"
        );
    }

    #[test]
    fn class_skeleton_exact_form() {
        assert_eq!(
            class_skeleton("TestCalc"),
            "class TestCalc:\n    \"\"\"Test class.\"\"\"\n"
        );
    }

    #[test]
    fn method_skeleton_exact_form() {
        assert_eq!(
            method_skeleton("test_add"),
            "\n    def test_add(self) -> None:\n        \"\"\"Test method.\"\"\"\n        raise NotImplementedError\n"
        );
    }

    #[test]
    fn class_skeleton_varies_only_with_name() {
        assert_eq!(class_skeleton("TestA"), class_skeleton("TestA"));
        assert_ne!(class_skeleton("TestA"), class_skeleton("TestB"));
    }

    #[test]
    fn class_plus_methods_compose_into_valid_block() {
        let block = format!(
            "{}{}{}",
            class_skeleton("TestCalc"),
            method_skeleton("test_add"),
            method_skeleton("test_multiply"),
        );
        let expected = "class TestCalc:\n    \"\"\"Test class.\"\"\"\n\n    def test_add(self) -> None:\n        \"\"\"Test method.\"\"\"\n        raise NotImplementedError\n\n    def test_multiply(self) -> None:\n        \"\"\"Test method.\"\"\"\n        raise NotImplementedError\n";
        assert_eq!(block, expected);
    }
}
