//! Coarse structural facts about an uploaded source file.
//!
//! Only the direct named children of the syntax tree root are inspected, so
//! nested functions, methods and inner classes are never reported. Node kinds
//! are matched against an enumerated set per grammar.

mod extractor;
mod grammar;

pub use extractor::{ANONYMOUS_NAME, count_lines, extract};
pub use grammar::{Grammar, extension_of, resolve_grammar};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of summarising one uploaded file.
///
/// Serialised untagged: either `{functions, classes, lines}` or `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ExtractionSummary {
    /// The file was parsed, or no grammar applied.
    Parsed {
        functions: Vec<String>,
        classes: Vec<String>,
        lines: usize,
    },
    /// The parser could not produce a tree.
    Failed { error: String },
}

impl ExtractionSummary {
    /// Summary for a file without a known grammar.
    pub fn empty(lines: usize) -> Self {
        Self::Parsed {
            functions: Vec::new(),
            classes: Vec::new(),
            lines,
        }
    }
}

/// Summarise a file, choosing the grammar from its name.
pub fn summarise_file(file_name: &str, source: &str) -> ExtractionSummary {
    extract(source, resolve_grammar(extension_of(file_name)))
}
