//! Hook, component and function discovery

use log::debug;
use tree_sitter::Node;

use crate::digest::{SymbolDigest, SymbolSets};
use crate::syntax::{self, is_function, is_jsx, named_children, text, unparenthesize, Visit};

/// Base classes that make a class declaration a component
const COMPONENT_BASES: &[&str] = &["Component", "PureComponent"];

/// Parse `source` and collect the hooks, components and functions it uses and
/// defines.
///
/// Never fails: unparseable input yields a digest whose `error` names
/// `file_path` and the location of the first syntax error.
pub fn extract_symbols(source: &str, file_path: &str) -> SymbolDigest {
    let tree = match syntax::parse(source, file_path) {
        Ok(tree) => tree,
        Err(e) => {
            debug!("Symbol extraction failed: {:#}", e);
            return SymbolDigest::failed(e.to_string());
        }
    };

    let mut collector = Collector {
        source,
        sets: SymbolSets::default(),
    };
    syntax::walk(tree.root_node(), |node| {
        collector.visit(node);
        Visit::Descend
    });
    collector.sets.into_digest()
}

struct Collector<'s> {
    source: &'s str,
    sets: SymbolSets,
}

impl<'s> Collector<'s> {
    fn visit(&mut self, node: Node) {
        match node.kind() {
            "call_expression" => {
                if let Some(name) = self.callee_name(node) {
                    if name.starts_with("use") {
                        self.sets.hooks.insert(name.to_string());
                    }
                }
            }
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.define(text(name, self.source), node);
                }
            }
            "variable_declarator" => {
                let name = node.child_by_field_name("name");
                let value = node.child_by_field_name("value").map(unparenthesize);
                if let (Some(name), Some(value)) = (name, value) {
                    if name.kind() == "identifier" && is_function(value) {
                        self.define(text(name, self.source), value);
                    }
                }
            }
            "class_declaration" | "abstract_class_declaration" => {
                let name = node.child_by_field_name("name");
                if let Some(name) = name.filter(|_| self.extends_component(node)) {
                    self.sets
                        .defined_components
                        .insert(text(name, self.source).to_string());
                }
            }
            "jsx_opening_element" | "jsx_self_closing_element" => {
                if let Some(name) = node
                    .child_by_field_name("name")
                    .and_then(|n| self.jsx_terminal_name(n))
                {
                    self.sets.used_components.insert(name.to_string());
                }
            }
            _ => {}
        }
    }

    /// Record a named function as a component when it renders JSX
    fn define(&mut self, name: &str, function: Node) {
        if name.is_empty() {
            return;
        }
        let set = if returns_jsx(function) {
            &mut self.sets.defined_components
        } else {
            &mut self.sets.functions
        };
        set.insert(name.to_string());
    }

    /// `useFoo()` gives `useFoo`, `React.useFoo()` gives `useFoo`
    fn callee_name(&self, call: Node) -> Option<&'s str> {
        let callee = call.child_by_field_name("function")?;
        match callee.kind() {
            "identifier" => Some(text(callee, self.source)),
            "member_expression" => callee
                .child_by_field_name("property")
                .map(|p| text(p, self.source)),
            _ => None,
        }
    }

    fn extends_component(&self, class: Node) -> bool {
        let Some(base) = superclass(class) else {
            return false;
        };
        let base = unparenthesize(base);
        let name = match base.kind() {
            "identifier" => text(base, self.source),
            "member_expression" => match base.child_by_field_name("property") {
                Some(property) => text(property, self.source),
                None => return false,
            },
            _ => return false,
        };
        COMPONENT_BASES.contains(&name)
    }

    /// Last segment of a JSX tag name: `Foo.Bar` gives `Bar`, `svg:path`
    /// gives `path`
    fn jsx_terminal_name(&self, name: Node) -> Option<&'s str> {
        match name.kind() {
            "identifier" | "jsx_identifier" | "property_identifier" | "type_identifier" => {
                Some(text(name, self.source))
            }
            "member_expression" => name
                .child_by_field_name("property")
                .map(|p| text(p, self.source)),
            _ => named_children(name)
                .last()
                .and_then(|last| self.jsx_terminal_name(*last)),
        }
    }
}

/// The expression after `extends`, if any
fn superclass(class: Node) -> Option<Node> {
    let heritage = named_children(class)
        .into_iter()
        .find(|child| child.kind() == "class_heritage")?;

    for child in named_children(heritage) {
        match child.kind() {
            "extends_clause" => {
                return child
                    .child_by_field_name("value")
                    .or_else(|| named_children(child).first().copied());
            }
            "implements_clause" => continue,
            _ => return Some(child),
        }
    }
    None
}

/// Whether a function returns JSX, either from a `return` statement in its
/// body or as the expression body of an arrow function.
///
/// Nested functions are searched too; the first JSX return found decides.
fn returns_jsx(function: Node) -> bool {
    let Some(body) = function.child_by_field_name("body") else {
        return false;
    };
    if body.kind() != "statement_block" {
        return is_jsx(unparenthesize(body));
    }

    let mut found = false;
    syntax::walk(body, |node| {
        if node.kind() != "return_statement" {
            return Visit::Descend;
        }
        let argument = named_children(node).first().copied().map(unparenthesize);
        if argument.is_some_and(is_jsx) {
            found = true;
            Visit::Stop
        } else {
            Visit::Descend
        }
    });
    found
}
