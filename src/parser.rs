use crate::ast::*;
use crate::error::{CssError, Result};
use crate::lexer;
use crate::token::{Spanned, Token};

/// Parse stylesheet text into a [`Root`].
pub fn parse(source: &str) -> Result<Root> {
    let tokens = lexer::lex(source)?;
    Parser::new(source, tokens).parse()
}

/// Recursive descent parser over the structural tokens of a stylesheet.
///
/// Each statement is a run of tokens ending in `{`, `;` or `}`. A run ending
/// in `{` opens a rule or at-rule block; any other run is a declaration or an
/// at-rule statement. Raw text between structural tokens is sliced back out
/// of the source so selectors and values keep their spelling.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Spanned>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_spanned(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Spanned> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(Token::LBrace) | Some(Token::Semicolon) | Some(Token::RBrace)
        )
    }

    // ── Top-level ──────────────────────────────────────────────────────

    /// Parse a complete stylesheet.
    pub fn parse(&mut self) -> Result<Root> {
        let nodes = self.parse_block(false)?;
        Ok(Root::new(nodes))
    }

    fn parse_block(&mut self, nested: bool) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();

        loop {
            match self.peek() {
                None if nested => return Err(CssError::unexpected_eof("'}'")),
                None => return Ok(nodes),
                Some(Token::RBrace) if nested => {
                    self.advance();
                    return Ok(nodes);
                }
                Some(Token::RBrace) => {
                    let s = self.peek_spanned().expect("peeked");
                    return Err(CssError::unexpected_token(
                        "rule or declaration",
                        s.token.describe(),
                        s.span.clone(),
                    ));
                }
                Some(Token::Semicolon) => {
                    self.advance();
                }
                Some(Token::Comment(text)) => {
                    nodes.push(Node::Comment(text.clone()));
                    self.advance();
                }
                Some(_) => nodes.push(self.parse_statement()?),
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Node> {
        let at_name = match self.peek() {
            Some(Token::AtKeyword(name)) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };

        let mut prelude_span: Option<std::ops::Range<usize>> = None;
        while !self.at_statement_end() {
            let span = self.advance().expect("not at end").span.clone();
            prelude_span = Some(match prelude_span {
                Some(p) => p.start..span.end,
                None => span,
            });
        }
        let prelude = prelude_span
            .clone()
            .map(|s| self.source[s].trim().to_string())
            .unwrap_or_default();

        if let Some(Token::LBrace) = self.peek() {
            let brace_span = self.advance().expect("peeked").span.clone();
            let children = self.parse_block(true)?;
            return match at_name {
                Some(name) => Ok(AtRule::block(name, prelude, children).into()),
                None if prelude.is_empty() => {
                    Err(CssError::unexpected_token("selector", "'{'", brace_span))
                }
                None => Ok(Rule::new(prelude, children).into()),
            };
        }

        if let Some(Token::Semicolon) = self.peek() {
            self.advance();
        }

        match at_name {
            Some(name) => Ok(AtRule::statement(name, prelude).into()),
            None => parse_declaration(&prelude, prelude_span.unwrap_or(0..0)),
        }
    }
}

fn parse_declaration(text: &str, span: std::ops::Range<usize>) -> Result<Node> {
    let Some((prop, value)) = text.split_once(':') else {
        return Err(CssError::unknown_word(text, span));
    };
    let prop = prop.trim();
    if prop.is_empty() || prop.contains(char::is_whitespace) {
        return Err(CssError::unknown_word(text, span));
    }

    let mut value = value.trim();
    let mut important = false;
    if let Some(idx) = value.to_ascii_lowercase().rfind("!important") {
        if value[idx + "!important".len()..].trim().is_empty() {
            value = value[..idx].trim_end();
            important = true;
        }
    }

    Ok(Node::Decl(Declaration {
        prop: prop.to_string(),
        value: value.to_string(),
        important,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::printer;

    #[test]
    fn parse_rule_with_declarations() {
        let root = parse(".card { color: red; padding: 1rem !important }").unwrap();
        assert_eq!(root.nodes.len(), 1);
        let Node::Rule(rule) = &root.nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.selector, ".card");
        assert_eq!(rule.nodes[0], Node::Decl(Declaration::new("color", "red")));
        assert_eq!(
            rule.nodes[1],
            Node::Decl(Declaration {
                prop: "padding".into(),
                value: "1rem".into(),
                important: true,
            })
        );
    }

    #[test]
    fn parse_at_rule_statement_and_block() {
        let root = parse(
            r#"@import "tailwindcss";
               @media (width >= 48rem) { .a { color: blue } }"#,
        )
        .unwrap();

        let Node::AtRule(import) = &root.nodes[0] else {
            panic!("expected at-rule");
        };
        assert_eq!(import.name, "import");
        assert_eq!(import.params, "\"tailwindcss\"");
        assert!(import.nodes.is_none());

        let Node::AtRule(media) = &root.nodes[1] else {
            panic!("expected at-rule");
        };
        assert_eq!(media.name, "media");
        assert_eq!(media.params, "(width >= 48rem)");
        assert_eq!(media.nodes.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn parse_nested_apply() {
        let root = parse(".btn { @apply px-4 py-2 hover:bg-blue-500; color: red; }").unwrap();
        let Node::Rule(rule) = &root.nodes[0] else {
            panic!("expected rule");
        };
        let Node::AtRule(apply) = &rule.nodes[0] else {
            panic!("expected @apply");
        };
        assert_eq!(apply.name, "apply");
        assert_eq!(apply.params, "px-4 py-2 hover:bg-blue-500");
    }

    #[test]
    fn parse_keeps_values_with_strings_and_urls() {
        let root = parse(r#"a { content: "a;b"; background: url("data:image/png;base64,xyz") }"#)
            .unwrap();
        let Node::Rule(rule) = &root.nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.nodes[0], Node::Decl(Declaration::new("content", "\"a;b\"")));
        assert_eq!(
            rule.nodes[1],
            Node::Decl(Declaration::new("background", "url(\"data:image/png;base64,xyz\")"))
        );
    }

    #[test]
    fn parse_comments() {
        let root = parse("/* top */ a { /* inner */ color: red }").unwrap();
        assert_eq!(root.nodes[0], Node::Comment(" top ".into()));
        let Node::Rule(rule) = &root.nodes[1] else {
            panic!("expected rule");
        };
        assert_eq!(rule.nodes[0], Node::Comment(" inner ".into()));
    }

    #[test]
    fn missing_colon_is_unknown_word() {
        let err = parse("a { color red }").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownWord(ref w) if w == "color red"));
        assert!(err.span.is_some());
    }

    #[test]
    fn unclosed_block_is_error() {
        let err = parse("a { color: red;").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn stray_close_brace_is_error() {
        let err = parse("a { color: red } }").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedToken { .. }));
        assert_eq!(err.span, Some(17..18));
    }

    #[test]
    fn printed_output_reparses_identically() {
        let source = r#"
            @import "./base.css";
            :root { --brand: #215ffd; }
            @layer base {
              * { border-color: var(--border); }
              body { font-family: "Inter", sans-serif; }
            }
            .hover\:bg-red-500:hover { background-color: var(--color-red-500) !important; }
            @media (width >= 48rem) { .md\:px-4 { padding-inline: calc(var(--spacing) * 4); } }
        "#;
        let root = parse(source).unwrap();
        let printed = printer::print(&root);
        let reparsed = parse(&printed).unwrap();
        assert_eq!(root, reparsed);
    }
}
