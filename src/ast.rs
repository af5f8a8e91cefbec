//! Syntax tree for stylesheets.
//!
//! The tree is the contract between the parser, the engine and the
//! orchestrator. It only models what a stylesheet needs to round-trip:
//! rules, at-rules, declarations and comments. Selectors and values are
//! kept as raw text.

/// Root node: a whole stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Root {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Decl(Declaration),
    Comment(String),
}

/// A qualified rule: `.card:hover { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
}

/// An at-rule, either a statement (`@import "x";`) or a block
/// (`@media (width >= 48rem) { ... }`).
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    /// `None` for statements terminated by `;`.
    pub nodes: Option<Vec<Node>>,
}

/// A property/value pair: `color: red !important`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
}

impl Root {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Drop every child node.
    pub fn remove_all(&mut self) {
        self.nodes.clear();
    }

    /// Append nodes after the existing children, preserving their order.
    pub fn append(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.nodes.extend(nodes);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Rule {
    pub fn new(selector: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            selector: selector.into(),
            nodes,
        }
    }
}

impl AtRule {
    pub fn statement(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: None,
        }
    }

    pub fn block(name: impl Into<String>, params: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: Some(nodes),
        }
    }

    /// The first quoted string in the params, unquoted.
    /// `"./a.css" layer(x)` → `./a.css`, `url('b.css')` → `b.css`.
    pub fn quoted_param(&self) -> Option<&str> {
        let params = self.params.trim();
        let start = params.find(['"', '\''])?;
        let quote = params[start..].chars().next()?;
        let rest = &params[start + 1..];
        let end = rest.find(quote)?;
        Some(&rest[..end])
    }
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            important: false,
        }
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl From<AtRule> for Node {
    fn from(at: AtRule) -> Self {
        Node::AtRule(at)
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Self {
        Node::Decl(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_all_then_append() {
        let mut root = Root::new(vec![Node::Comment("old".into())]);
        root.remove_all();
        assert!(root.is_empty());
        root.append(vec![
            Node::Comment("a".into()),
            Rule::new(".b", vec![]).into(),
        ]);
        assert_eq!(root.nodes.len(), 2);
        assert_eq!(root.nodes[0], Node::Comment("a".into()));
    }

    #[test]
    fn quoted_param_forms() {
        assert_eq!(
            AtRule::statement("import", "\"./a.css\" layer(base)").quoted_param(),
            Some("./a.css")
        );
        assert_eq!(AtRule::statement("import", "url('b.css')").quoted_param(), Some("b.css"));
        assert_eq!(AtRule::statement("tailwind", "utilities").quoted_param(), None);
    }
}
