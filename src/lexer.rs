use logos::Logos;

use crate::error::{CssError, ErrorKind, Result};
use crate::token::{Spanned, Token};

/// Tokenize stylesheet text into a vector of spanned tokens.
pub fn lex(source: &str) -> Result<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::UnterminatedComment) => {
                return Err(CssError {
                    span: Some(span.start..source.len()),
                    ..CssError::from(ErrorKind::UnrecognizedToken("unclosed comment".into()))
                });
            }
            Ok(token) => {
                tokens.push(Spanned { token, span });
            }
            Err(()) => {
                let fragment = &source[span.clone()];
                let fragment = if fragment.starts_with(['"', '\'']) {
                    format!("unclosed string {}", &fragment[..1])
                } else {
                    fragment.to_string()
                };
                return Err(CssError {
                    span: Some(span),
                    ..CssError::from(ErrorKind::UnrecognizedToken(fragment))
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        lex(source)
            .expect("lexing should succeed")
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn lex_simple_rule() {
        let source = ".card { color: red; }";
        let tokens = lex(source).unwrap();
        let k: Vec<_> = tokens.iter().map(|t| &t.token).collect();

        assert_eq!(k[0], &Token::Text);
        assert_eq!(&source[tokens[0].span.clone()], ".card");
        assert_eq!(k[1], &Token::LBrace);
        assert_eq!(k[2], &Token::Text);
        assert_eq!(&source[tokens[2].span.clone()], "color:");
        assert_eq!(k[3], &Token::Text);
        assert_eq!(k[4], &Token::Semicolon);
        assert_eq!(k[5], &Token::RBrace);
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn lex_at_keyword_and_string() {
        let k = kinds(r#"@import "tailwindcss";"#);
        assert_eq!(k[0], Token::AtKeyword("import".into()));
        assert_eq!(k[1], Token::Str("\"tailwindcss\"".into()));
        assert_eq!(k[2], Token::Semicolon);
    }

    #[test]
    fn lex_comment_content() {
        let k = kinds("/* hello */ a {}");
        assert_eq!(k[0], Token::Comment(" hello ".into()));
    }

    #[test]
    fn lex_slash_outside_comment() {
        let k = kinds(".w-1\\/2 { aspect-ratio: 16/9; }");
        assert!(k.contains(&Token::Slash));
    }

    #[test]
    fn lex_lone_at_sign() {
        let k = kinds("a { background: url(img@2x.png); }");
        assert!(k.contains(&Token::At));
    }

    #[test]
    fn unclosed_comment_is_error() {
        let err = lex("a {} /* never closed").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnrecognizedToken(_)));
        assert_eq!(err.span.map(|s| s.start), Some(5));
    }

    #[test]
    fn unclosed_string_is_error() {
        let err = lex("a { content: \"oops; }").unwrap_err();
        assert!(err.to_string().contains("unclosed string"));
    }
}
