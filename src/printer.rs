use std::fmt::Write;

use crate::ast::{AtRule, Declaration, Node, Root, Rule};

/// Serialize a stylesheet with two-space indentation.
pub fn print(root: &Root) -> String {
    print_nodes(&root.nodes)
}

/// Serialize a node list at the top level.
pub fn print_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, 0);
    out
}

impl Root {
    pub fn to_css(&self) -> String {
        print(self)
    }
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    for node in nodes {
        write_node(out, node, depth);
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Rule(rule) => write_rule(out, rule, depth),
        Node::AtRule(at) => write_at_rule(out, at, depth),
        Node::Decl(decl) => {
            out.push_str(&indent);
            write_declaration(out, decl);
            out.push('\n');
        }
        Node::Comment(text) => {
            let _ = writeln!(out, "{indent}/*{text}*/");
        }
    }
}

fn write_rule(out: &mut String, rule: &Rule, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{} {{", rule.selector);
    write_nodes(out, &rule.nodes, depth + 1);
    let _ = writeln!(out, "{indent}}}");
}

fn write_at_rule(out: &mut String, at: &AtRule, depth: usize) {
    let indent = "  ".repeat(depth);
    let head = if at.params.is_empty() {
        format!("@{}", at.name)
    } else {
        format!("@{} {}", at.name, at.params)
    };

    match &at.nodes {
        None => {
            let _ = writeln!(out, "{indent}{head};");
        }
        Some(children) => {
            let _ = writeln!(out, "{indent}{head} {{");
            write_nodes(out, children, depth + 1);
            let _ = writeln!(out, "{indent}}}");
        }
    }
}

fn write_declaration(out: &mut String, decl: &Declaration) {
    let _ = write!(out, "{}: {}", decl.prop, decl.value);
    if decl.important {
        out.push_str(" !important");
    }
    out.push(';');
}
