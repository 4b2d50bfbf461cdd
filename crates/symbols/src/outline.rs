//! Declaration outlines: signatures only, or a skeleton with bodies elided

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use tree_sitter::Node;

use crate::syntax::{
    self, collapse_whitespace, is_function, named_children, text, truncate, unparenthesize,
};

const MAX_LINE_LEN: usize = 180;
const MAX_VALUE_LEN: usize = 100;
const ELIDED_BLOCK: &str = "{ … }";
const ELIDED_EXPRESSION: &str = "…";

/// Top-level declarations of a file, one per line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outline {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return write!(f, "error: {}", error);
        }
        write!(f, "{}", self.lines.join("\n"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detail {
    Signatures,
    Skeleton,
}

/// Function, class and type headers without bodies or values
pub fn extract_signatures(source: &str, file_path: &str) -> Outline {
    outline(source, file_path, Detail::Signatures)
}

/// Imports, headers, fields and short constants, with bodies replaced by `…`
pub fn extract_skeleton(source: &str, file_path: &str) -> Outline {
    outline(source, file_path, Detail::Skeleton)
}

fn outline(source: &str, file_path: &str, detail: Detail) -> Outline {
    let tree = match syntax::parse(source, file_path) {
        Ok(tree) => tree,
        Err(e) => {
            debug!("Outline extraction failed: {:#}", e);
            return Outline::failed(e.to_string());
        }
    };

    let mut writer = Writer {
        source,
        detail,
        lines: Vec::new(),
    };
    for statement in named_children(tree.root_node()) {
        writer.statement(statement, "");
    }

    Outline {
        lines: writer.lines,
        error: None,
    }
}

struct Writer<'s> {
    source: &'s str,
    detail: Detail,
    lines: Vec<String>,
}

impl Writer<'_> {
    fn skeleton(&self) -> bool {
        self.detail == Detail::Skeleton
    }

    fn push(&mut self, indent: usize, line: String) {
        let line = format!("{}{}", "  ".repeat(indent), line);
        self.lines.push(truncate(&line, MAX_LINE_LEN));
    }

    fn collapsed(&self, node: Node) -> String {
        collapse_whitespace(text(node, self.source))
    }

    fn statement(&mut self, node: Node, prefix: &str) {
        match node.kind() {
            "import_statement" | "ambient_declaration" if self.skeleton() => {
                let line = self.collapsed(node);
                self.push(0, line);
            }
            "export_statement" => self.export(node),
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                let line = format!("{}{}", prefix, self.head(node));
                let line = self.with_elided_body(line, node);
                self.push(0, line);
            }
            "class_declaration" | "abstract_class_declaration" => self.class(node, prefix),
            "interface_declaration" | "type_alias_declaration" | "enum_declaration" => {
                let line = format!("{}{}", prefix, self.collapsed(node));
                self.push(0, line);
            }
            "lexical_declaration" | "variable_declaration" => self.variables(node, prefix),
            _ => {}
        }
    }

    fn export(&mut self, node: Node) {
        let mut cursor = node.walk();
        let is_default = node.children(&mut cursor).any(|c| c.kind() == "default");
        let prefix = if is_default { "export default " } else { "export " };

        if let Some(declaration) = node.child_by_field_name("declaration") {
            self.statement(declaration, prefix);
            return;
        }

        if let Some(value) = node.child_by_field_name("value").map(unparenthesize) {
            if value.kind() == "class" {
                self.class(value, prefix);
            } else if is_function(value) {
                let line = format!("{}{}", prefix, self.head(value));
                let line = self.with_elided_body(line, value);
                self.push(0, line);
            } else if self.skeleton() {
                let line = self.collapsed(node);
                self.push(0, line);
            }
            return;
        }

        // Re-exports and export lists
        if self.skeleton() {
            let line = self.collapsed(node);
            self.push(0, line);
        }
    }

    fn class(&mut self, node: Node, prefix: &str) {
        let header = format!("{}{}", prefix, self.head(node));
        let members = node
            .child_by_field_name("body")
            .map(named_children)
            .unwrap_or_default();

        if self.skeleton() {
            self.push(0, format!("{} {{", header));
        } else {
            self.push(0, header);
        }

        for member in members {
            if let Some(line) = self.member(member) {
                self.push(1, line);
            }
        }

        if self.skeleton() {
            self.push(0, "}".to_string());
        }
    }

    fn member(&self, member: Node) -> Option<String> {
        match member.kind() {
            "method_definition" => Some(self.with_elided_body(self.head(member), member)),
            "method_signature" | "abstract_method_signature" => Some(self.head(member)),
            "public_field_definition" | "field_definition" | "index_signature"
                if self.skeleton() =>
            {
                Some(truncate(&self.collapsed(member), MAX_VALUE_LEN))
            }
            _ => None,
        }
    }

    fn variables(&mut self, node: Node, prefix: &str) {
        let keyword = node
            .child(0)
            .map(|c| text(c, self.source))
            .filter(|k| matches!(*k, "const" | "let" | "var"))
            .unwrap_or("const");

        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let raw_value = declarator.child_by_field_name("value");
            let function = raw_value.map(unparenthesize).filter(|v| is_function(*v));

            if let (Some(raw_value), Some(function)) = (raw_value, function) {
                // `name: Type =` up to the value
                let binding = self
                    .source
                    .get(declarator.start_byte()..raw_value.start_byte())
                    .map(collapse_whitespace)
                    .unwrap_or_default();
                let line = format!("{}{} {} {}", prefix, keyword, binding, self.head(function));
                let line = self.with_elided_body(line, function);
                self.push(0, line);
            } else if self.skeleton() {
                let summary = truncate(&self.collapsed(declarator), MAX_VALUE_LEN);
                self.push(0, format!("{}{} {}", prefix, keyword, summary));
            }
        }
    }

    /// Declaration text up to its body, whitespace collapsed
    fn head(&self, node: Node) -> String {
        let end = node
            .child_by_field_name("body")
            .map_or(node.end_byte(), |body| body.start_byte());
        let head = self.source.get(node.start_byte()..end).unwrap_or("");
        collapse_whitespace(head)
            .trim_end_matches(';')
            .trim_end()
            .to_string()
    }

    fn with_elided_body(&self, line: String, node: Node) -> String {
        if !self.skeleton() {
            return line;
        }
        match node.child_by_field_name("body") {
            Some(body) if body.kind() == "statement_block" || body.kind() == "class_body" => {
                format!("{} {}", line, ELIDED_BLOCK)
            }
            Some(_) => format!("{} {}", line, ELIDED_EXPRESSION),
            None => line,
        }
    }
}
