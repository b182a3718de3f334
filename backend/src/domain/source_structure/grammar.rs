//! Grammar registry keyed by file extension.

/// A parsing grammar together with the top-level node kinds it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    JavaScript,
    Python,
}

const JAVASCRIPT_FUNCTION_KINDS: &[&str] =
    &["function_declaration", "generator_function_declaration"];
const JAVASCRIPT_CLASS_KINDS: &[&str] = &["class_declaration"];
const PYTHON_FUNCTION_KINDS: &[&str] = &["function_definition"];
const PYTHON_CLASS_KINDS: &[&str] = &["class_definition"];

impl Grammar {
    /// Stable name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
        }
    }

    /// The tree-sitter language backing this grammar.
    pub fn language(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Root-level node kinds counted as functions.
    pub fn function_kinds(self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => JAVASCRIPT_FUNCTION_KINDS,
            Self::Python => PYTHON_FUNCTION_KINDS,
        }
    }

    /// Root-level node kinds counted as classes.
    pub fn class_kinds(self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => JAVASCRIPT_CLASS_KINDS,
            Self::Python => PYTHON_CLASS_KINDS,
        }
    }
}

/// Resolve the grammar for a file extension.
///
/// The token is matched case-insensitively, with or without a leading dot.
/// Unknown extensions resolve to `None`.
///
/// # Examples
/// ```
/// use backend::domain::source_structure::{Grammar, resolve_grammar};
///
/// assert_eq!(resolve_grammar(".PY"), Some(Grammar::Python));
/// assert_eq!(resolve_grammar("jsx"), Some(Grammar::JavaScript));
/// assert_eq!(resolve_grammar(".rb"), None);
/// ```
pub fn resolve_grammar(extension: &str) -> Option<Grammar> {
    let token = extension.trim();
    let token = token.strip_prefix('.').unwrap_or(token);
    match token.to_ascii_lowercase().as_str() {
        "js" | "jsx" | "mjs" | "cjs" => Some(Grammar::JavaScript),
        "py" => Some(Grammar::Python),
        _ => None,
    }
}

/// Extract the extension token from a client-supplied file name.
///
/// Returns the text after the last `.` of the final path segment, or an empty
/// string when there is none.
pub fn extension_of(file_name: &str) -> &str {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext,
        _ => "",
    }
}
