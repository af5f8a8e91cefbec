//! Candidate extraction from source text and stylesheets.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::sanitize::{sanitize, TokenFilter};

/// Quoted spans with any of the three JS quote characters. Escapes may
/// include the delimiter or a newline; each alternative is shortest-match by
/// construction since the body excludes its own delimiter.
static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"((?:\\.|[^"\\])*)"|'((?:\\.|[^'\\])*)'|`((?:\\.|[^`\\])*)`"#)
        .expect("string literal pattern is valid")
});

static INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]+\}").expect("interpolation pattern is valid"));

static APPLY_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@apply\s+([^;]+);").expect("@apply pattern is valid"));

/// Tokenizes text into candidates using a [`TokenFilter`].
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    filter: TokenFilter,
}

impl Extractor {
    pub fn new(filter: TokenFilter) -> Self {
        Self { filter }
    }

    /// Add every candidate in a whitespace-separated class list.
    /// `${...}` splices are blanked first so runtime values cannot glue
    /// onto neighbouring static tokens.
    pub fn add_tokens(&self, input: &str, sink: &mut HashSet<String>) {
        if input.is_empty() {
            return;
        }
        let normalized = INTERPOLATION.replace_all(input, " ");
        for raw in normalized.split_whitespace() {
            let token = sanitize(raw);
            if self.filter.is_candidate(&token) {
                sink.insert(token);
            }
        }
    }

    /// Scan source text for string literals and add their class-like tokens.
    pub fn string_literals(&self, text: &str, sink: &mut HashSet<String>) {
        for caps in STRING_LITERAL.captures_iter(text) {
            let body = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            self.add_tokens(body, sink);
        }
    }

    /// Scan stylesheet text for `@apply ...;` and add the applied classes.
    pub fn apply_directives(&self, css: &str, sink: &mut HashSet<String>) {
        for caps in APPLY_DIRECTIVE.captures_iter(css) {
            self.add_tokens(&caps[1], sink);
        }
    }
}

/// [`Extractor::string_literals`] with the default filter.
pub fn collect_string_literals(text: &str, sink: &mut HashSet<String>) {
    Extractor::default().string_literals(text, sink);
}

/// [`Extractor::apply_directives`] with the default filter.
pub fn collect_apply_directives(css: &str, sink: &mut HashSet<String>) {
    Extractor::default().apply_directives(css, sink);
}
