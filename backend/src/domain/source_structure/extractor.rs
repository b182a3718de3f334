//! Shallow structure extraction over a tree-sitter syntax tree.

use tree_sitter::Parser;

use super::{ExtractionSummary, Grammar};

/// Placeholder reported for declarations without a `name` field.
pub const ANONYMOUS_NAME: &str = "<anonymous>";

/// A direct child of the syntax tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TopLevelNode {
    pub kind: String,
    pub name: Option<String>,
}

/// Count `'\n'`-delimited segments; the empty string is one line.
pub fn count_lines(source: &str) -> usize {
    source.split('\n').count()
}

/// Summarise the top-level declarations of `source`.
///
/// Without a grammar only the line count is reported. Parser failures degrade
/// into [`ExtractionSummary::Failed`] rather than an error.
///
/// # Examples
/// ```
/// use backend::domain::source_structure::{ExtractionSummary, Grammar, extract};
///
/// let summary = extract("function foo(){} class Bar{}", Some(Grammar::JavaScript));
/// assert_eq!(
///     summary,
///     ExtractionSummary::Parsed {
///         functions: vec!["foo".into()],
///         classes: vec!["Bar".into()],
///         lines: 1,
///     }
/// );
/// ```
pub fn extract(source: &str, grammar: Option<Grammar>) -> ExtractionSummary {
    let lines = count_lines(source);
    let Some(grammar) = grammar else {
        return ExtractionSummary::empty(lines);
    };

    match top_level_nodes(source, grammar) {
        Ok(nodes) => classify(grammar, &nodes, lines),
        Err(error) => {
            tracing::warn!(grammar = grammar.name(), %error, "source parsing failed");
            ExtractionSummary::Failed { error }
        }
    }
}

fn top_level_nodes(source: &str, grammar: Grammar) -> Result<Vec<TopLevelNode>, String> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar.language())
        .map_err(|err| format!("failed to configure {} parser: {err}", grammar.name()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| format!("{} parser produced no syntax tree", grammar.name()))?;

    let root = tree.root_node();
    let bytes = source.as_bytes();
    let mut cursor = root.walk();
    let nodes = root
        .named_children(&mut cursor)
        .map(|child| TopLevelNode {
            kind: child.kind().to_owned(),
            name: child
                .child_by_field_name("name")
                .and_then(|name| name.utf8_text(bytes).ok())
                .map(str::to_owned),
        })
        .collect();
    Ok(nodes)
}

/// Sort root-level nodes into functions and classes, preserving document
/// order. Kinds outside both sets are ignored.
pub(crate) fn classify(grammar: Grammar, nodes: &[TopLevelNode], lines: usize) -> ExtractionSummary {
    let mut functions = Vec::new();
    let mut classes = Vec::new();
    for node in nodes {
        let target = if grammar.function_kinds().contains(&node.kind.as_str()) {
            &mut functions
        } else if grammar.class_kinds().contains(&node.kind.as_str()) {
            &mut classes
        } else {
            continue;
        };
        target.push(
            node.name
                .clone()
                .unwrap_or_else(|| ANONYMOUS_NAME.to_owned()),
        );
    }
    ExtractionSummary::Parsed {
        functions,
        classes,
        lines,
    }
}
