//! Source-text introspection: functions, classes, and methods in
//! definition order.
//!
//! The scanner works on module text, line by line. Because only literal
//! `def`/`class` statements are recognized, imported re-exports never
//! appear (an import is not a definition), and a class's inventory
//! contains exactly the methods defined directly in its body — never
//! inherited-and-visible ones. Both properties fall out of scanning text
//! instead of a runtime namespace.
//!
//! Triple-quoted strings are tracked so that code samples inside
//! docstrings are not mistaken for definitions. The scanner is not a
//! grammar parser and does not try to be: the merge layer downstream is
//! deliberately textual, and the differ needs only names and lines.

use crate::model::{ModuleInventory, PyClass, PyFunction};

// ============================================================================
// Public API
// ============================================================================

/// Scan module text into a [`ModuleInventory`].
///
/// Members appear in ascending definition-line order. The resulting
/// inventory always has `ordering_available = true`; line numbers are
/// inherent to text scanning.
pub fn scan_module(source: &str) -> ModuleInventory {
    let mut scanner = Scanner::default();
    for (idx, line) in source.lines().enumerate() {
        scanner.feed(idx as u32 + 1, line);
    }
    scanner.finish()
}

/// Top-level functions defined directly in the module text, ascending
/// definition line.
pub fn functions_in(source: &str) -> Vec<PyFunction> {
    scan_module(source).functions
}

/// Top-level classes defined directly in the module text, ascending
/// definition line, each carrying its directly defined methods.
pub fn classes_in(source: &str) -> Vec<PyClass> {
    scan_module(source).classes
}

// ============================================================================
// Scanner
// ============================================================================

#[derive(Default)]
struct Scanner {
    functions: Vec<PyFunction>,
    classes: Vec<PyClass>,
    /// Open triple-quote delimiter, when inside a multi-line string.
    open_string: Option<&'static str>,
    /// True while scanning the body of a top-level class.
    in_class_body: bool,
    /// Indentation of the first statement in the current class body.
    /// Methods are defs at exactly this indent; anything deeper is a
    /// nested definition and excluded.
    body_indent: Option<usize>,
}

impl Scanner {
    fn feed(&mut self, line_no: u32, line: &str) {
        if let Some(delim) = self.open_string {
            if line.matches(delim).count() % 2 == 1 {
                self.open_string = None;
            }
            return;
        }

        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }
        let indent = line.len() - trimmed.len();

        if indent == 0 {
            if let Some(name) = def_name(trimmed) {
                self.functions.push(PyFunction::new(name, line_no));
                self.in_class_body = false;
            } else if let Some(name) = class_name(trimmed) {
                self.classes.push(PyClass::new(name, line_no));
                self.in_class_body = true;
                self.body_indent = None;
            } else {
                self.in_class_body = false;
            }
        } else if self.in_class_body {
            let body_indent = *self.body_indent.get_or_insert(indent);
            if indent == body_indent {
                if let Some(name) = def_name(trimmed) {
                    if let Some(class) = self.classes.last_mut() {
                        class.methods.push(PyFunction::new(name, line_no));
                    }
                }
            }
        }

        self.open_string = opening_delimiter(trimmed);
    }

    fn finish(self) -> ModuleInventory {
        let mut functions = self.functions;
        let mut classes = self.classes;
        functions.sort_by_key(|f| f.line);
        classes.sort_by_key(|c| c.line);
        for class in &mut classes {
            class.methods.sort_by_key(|m| m.line);
        }
        ModuleInventory::new(functions, classes)
    }
}

/// Extract the name from a `def`/`async def` statement line.
fn def_name(trimmed: &str) -> Option<String> {
    let rest = trimmed
        .strip_prefix("async ")
        .map(str::trim_start)
        .unwrap_or(trimmed);
    let rest = rest.strip_prefix("def")?;
    // Require whitespace after the keyword so `define()` is not a def.
    let rest = rest.strip_prefix(char::is_whitespace)?.trim_start();
    identifier_prefix(rest)
}

/// Extract the name from a `class` statement line.
fn class_name(trimmed: &str) -> Option<String> {
    let rest = trimmed.strip_prefix("class")?;
    let rest = rest.strip_prefix(char::is_whitespace)?.trim_start();
    identifier_prefix(rest)
}

/// The leading identifier of `text`, if any.
fn identifier_prefix(text: &str) -> Option<String> {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    let name = &text[..end];
    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if starts_ok {
        Some(name.to_string())
    } else {
        None
    }
}

/// The delimiter of a multi-line string this line opens, if any.
///
/// A line with an even count of its first triple-quote delimiter opens
/// and closes on the same line (e.g. a one-line docstring).
fn opening_delimiter(line: &str) -> Option<&'static str> {
    const DOUBLE: &str = "\"\"\"";
    const SINGLE: &str = "'''";
    let delim = match (line.find(DOUBLE), line.find(SINGLE)) {
        (Some(d), Some(s)) => {
            if d < s {
                DOUBLE
            } else {
                SINGLE
            }
        }
        (Some(_), None) => DOUBLE,
        (None, Some(_)) => SINGLE,
        (None, None) => return None,
    };
    if line.matches(delim).count() % 2 == 1 {
        Some(delim)
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod top_level_functions {
        use super::*;

        #[test]
        fn functions_in_definition_order() {
            let source = "\
import os


def f_a():
    return 1


def f_b():
    return 2
";
            let functions = functions_in(source);
            let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["f_a", "f_b"]);
            assert_eq!(functions[0].line, 4);
            assert_eq!(functions[1].line, 8);
        }

        #[test]
        fn async_def_is_a_function() {
            let source = "async def fetch():\n    pass\n";
            let functions = functions_in(source);
            assert_eq!(functions[0].name, "fetch");
        }

        #[test]
        fn imports_are_not_definitions() {
            let source = "from helpers import process, Helper\nimport os\n";
            assert!(functions_in(source).is_empty());
            assert!(classes_in(source).is_empty());
        }

        #[test]
        fn nested_defs_are_excluded() {
            let source = "\
def outer():
    def inner():
        pass
    return inner
";
            let functions = functions_in(source);
            let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["outer"]);
        }

        #[test]
        fn define_is_not_a_def_keyword() {
            let source = "define = 1\ndefault()\n";
            assert!(functions_in(source).is_empty());
        }
    }

    mod classes_and_methods {
        use super::*;

        #[test]
        fn class_with_methods_in_order() {
            let source = "\
class Calc:
    \"\"\"A calculator.\"\"\"

    def add(self, a, b):
        return a + b

    def multiply(self, a, b):
        return a * b
";
            let classes = classes_in(source);
            assert_eq!(classes.len(), 1);
            assert_eq!(classes[0].name, "Calc");
            assert_eq!(classes[0].line, 1);
            let methods: Vec<&str> = classes[0].methods().iter().map(|m| m.name.as_str()).collect();
            assert_eq!(methods, vec!["add", "multiply"]);
        }

        #[test]
        fn decorated_methods_are_counted() {
            let source = "\
class Config:
    @staticmethod
    def load(path):
        pass

    @property
    def name(self):
        return self._name

    @classmethod
    def default(cls):
        pass
";
            let classes = classes_in(source);
            let methods: Vec<&str> = classes[0].methods().iter().map(|m| m.name.as_str()).collect();
            assert_eq!(methods, vec!["load", "name", "default"]);
        }

        #[test]
        fn defs_nested_in_methods_are_excluded() {
            let source = "\
class Worker:
    def run(self):
        def step():
            pass
        step()
";
            let classes = classes_in(source);
            let methods: Vec<&str> = classes[0].methods().iter().map(|m| m.name.as_str()).collect();
            assert_eq!(methods, vec!["run"]);
        }

        #[test]
        fn nested_class_methods_belong_to_nobody() {
            let source = "\
class Outer:
    class Inner:
        def inner_method(self):
            pass

    def outer_method(self):
        pass
";
            let classes = classes_in(source);
            assert_eq!(classes.len(), 1);
            let methods: Vec<&str> = classes[0].methods().iter().map(|m| m.name.as_str()).collect();
            assert_eq!(methods, vec!["outer_method"]);
        }

        #[test]
        fn class_body_ends_at_next_top_level_statement() {
            let source = "\
class First:
    def method(self):
        pass

VALUE = 1

def standalone():
    pass
";
            let inventory = scan_module(source);
            assert_eq!(inventory.classes[0].methods().len(), 1);
            assert_eq!(inventory.functions[0].name, "standalone");
        }

        #[test]
        fn bases_do_not_affect_the_name() {
            let source = "class Derived(Base, metaclass=Meta):\n    pass\n";
            assert_eq!(classes_in(source)[0].name, "Derived");
        }
    }

    mod string_tracking {
        use super::*;

        #[test]
        fn code_samples_in_docstrings_are_ignored() {
            let source = "\
\"\"\"Module docstring with a sample:

def not_real():
    pass

class NotReal:
    pass
\"\"\"


def real():
    pass
";
            let inventory = scan_module(source);
            let names: Vec<&str> = inventory.functions.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["real"]);
            assert!(inventory.classes.is_empty());
        }

        #[test]
        fn one_line_docstrings_do_not_open_a_string() {
            let source = "\
def documented():
    \"\"\"One line.\"\"\"
    return 1


def after():
    pass
";
            let names: Vec<String> = functions_in(source).into_iter().map(|f| f.name).collect();
            assert_eq!(names, vec!["documented", "after"]);
        }

        #[test]
        fn single_quoted_triple_strings_tracked_too() {
            let source = "'''\ndef hidden():\n    pass\n'''\n\ndef visible():\n    pass\n";
            let names: Vec<String> = functions_in(source).into_iter().map(|f| f.name).collect();
            assert_eq!(names, vec!["visible"]);
        }
    }
}
