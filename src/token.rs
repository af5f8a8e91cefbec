use logos::Logos;

/// Tokens produced by lexing a stylesheet.
///
/// Only structure is tokenized: braces, semicolons, at-keywords, comments and
/// strings. Selectors, property names and values stay raw text and the parser
/// reads them back out of the source by span.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // ── Trivia with content ────────────────────────────────────────────
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", |lex| {
        let s = lex.slice();
        s[2..s.len() - 2].to_string()
    })]
    Comment(String),

    /// `/*` with no closing `*/`.
    #[token("/*")]
    UnterminatedComment,

    #[regex(r#""([^"\\\n]|\\(.|\n))*""#, |lex| lex.slice().to_string())]
    #[regex(r#"'([^'\\\n]|\\(.|\n))*'"#, |lex| lex.slice().to_string())]
    Str(String),

    // ── Structure ──────────────────────────────────────────────────────
    #[regex(r"@-?[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice()[1..].to_string())]
    AtKeyword(String),

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,

    // ── Raw text (selectors, properties, values) ───────────────────────
    #[regex(r#"[^{};"'@/ \t\r\n\f]+"#)]
    Text,
    #[token("/")]
    Slash,
    #[token("@")]
    At,
}

impl Token {
    /// Human-readable name for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Comment(_) => "comment",
            Token::UnterminatedComment => "unterminated comment",
            Token::Str(_) => "string",
            Token::AtKeyword(_) => "at-rule",
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::Semicolon => "';'",
            Token::Text => "text",
            Token::Slash => "'/'",
            Token::At => "'@'",
        }
    }
}

/// A token with its source location (byte offset span).
#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}
