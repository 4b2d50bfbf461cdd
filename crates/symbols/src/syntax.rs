//! Parsing and tree helpers shared by the extractors
//!
//! Every source is parsed with the TSX grammar, which accepts plain
//! JavaScript, TypeScript and JSX alike.

use anyhow::{anyhow, bail, Result};
use tree_sitter::{Node, Parser, Tree};

/// What to do after visiting a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visit {
    Descend,
    SkipChildren,
    Stop,
}

/// Parse `source`, rejecting input the parser could not make sense of.
///
/// Local syntax errors are tolerated: the tree is kept as long as one
/// top-level statement survived recovery with some real content in it.
pub(crate) fn parse(source: &str, file_path: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
        .map_err(|e| anyhow!("Failed to load the TSX grammar: {}", e))?;

    let Some(tree) = parser.parse(source, None) else {
        bail!("{}: parser produced no syntax tree", file_path);
    };

    let root = tree.root_node();
    if root.is_error() || (root.has_error() && !has_recovered_statement(root)) {
        bail!("{}: {}", file_path, describe_first_error(root));
    }
    Ok(tree)
}

fn has_recovered_statement(root: Node) -> bool {
    named_children(root)
        .into_iter()
        .any(|child| !child.is_error() && has_real_content(child))
}

/// A named leaf outside every ERROR and MISSING node
fn has_real_content(node: Node) -> bool {
    if !node.has_error() {
        return true;
    }
    let mut found = false;
    walk(node, |n| {
        if n.is_error() || n.is_missing() {
            return Visit::SkipChildren;
        }
        if n.is_named() && n.child_count() == 0 {
            found = true;
            return Visit::Stop;
        }
        Visit::Descend
    });
    found
}

fn describe_first_error(root: Node) -> String {
    let mut found: Option<Node> = None;
    walk(root, |node| {
        if node.is_error() || node.is_missing() {
            found = Some(node);
            return Visit::Stop;
        }
        if node.has_error() {
            Visit::Descend
        } else {
            Visit::SkipChildren
        }
    });

    let node = found.unwrap_or(root);
    let at = node.start_position();
    if node.is_missing() {
        format!(
            "missing `{}` at line {}, column {}",
            node.kind(),
            at.row + 1,
            at.column + 1
        )
    } else {
        format!("syntax error at line {}, column {}", at.row + 1, at.column + 1)
    }
}

/// Iterative pre-order walk below (and including) `root`
pub(crate) fn walk<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> Visit) {
    let mut cursor = root.walk();
    let mut depth = 0usize;

    loop {
        match visit(cursor.node()) {
            Visit::Stop => return,
            Visit::Descend if cursor.goto_first_child() => {
                depth += 1;
                continue;
            }
            _ => {}
        }

        loop {
            if depth == 0 {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            cursor.goto_parent();
            depth -= 1;
        }
    }
}

/// Source text covered by `node`
pub(crate) fn text<'s>(node: Node, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Named children, skipping comments
pub(crate) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

/// Strip any number of wrapping parentheses
pub(crate) fn unparenthesize(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match named_children(node).first() {
            Some(inner) => node = *inner,
            None => break,
        }
    }
    node
}

pub(crate) fn is_jsx(node: Node) -> bool {
    matches!(
        node.kind(),
        "jsx_element" | "jsx_self_closing_element" | "jsx_fragment"
    )
}

pub(crate) fn is_function(node: Node) -> bool {
    matches!(
        node.kind(),
        "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
    )
}

/// Collapse runs of whitespace to single spaces
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
