use std::collections::HashSet;
use std::sync::LazyLock;

/// Bare words accepted as candidates even though they carry no marker.
pub const CLASS_SAFELIST: &[&str] = &["flex", "grid", "block", "inline", "contents", "table", "hidden"];

/// Longest token accepted. Longer runs are usually embedded data (base64
/// images, hashes) rather than class names.
pub const MAX_CANDIDATE_LEN: usize = 120;

const BOUNDARY_PUNCTUATION: &[char] = &['.', ',', ';', ':'];

static DEFAULT_FILTER: LazyLock<TokenFilter> = LazyLock::new(TokenFilter::default);

/// Normalize a raw substring: line breaks and whitespace runs become single
/// spaces, the ends are trimmed, and boundary punctuation is stripped.
/// Colons and periods inside the token are kept.
pub fn sanitize(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_start_matches(BOUNDARY_PUNCTUATION)
        .trim_end_matches(BOUNDARY_PUNCTUATION)
        .to_string()
}

/// [`TokenFilter::is_candidate`] with the default safelist and length cap.
pub fn is_candidate(token: &str) -> bool {
    DEFAULT_FILTER.is_candidate(token)
}

/// Accept/reject heuristic for utility-class candidates.
#[derive(Debug, Clone)]
pub struct TokenFilter {
    safelist: HashSet<String>,
    max_len: usize,
}

impl Default for TokenFilter {
    fn default() -> Self {
        Self {
            safelist: CLASS_SAFELIST.iter().map(|s| s.to_string()).collect(),
            max_len: MAX_CANDIDATE_LEN,
        }
    }
}

impl TokenFilter {
    /// Default filter with extra safelisted words.
    pub fn with_safelist<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filter = Self::default();
        filter.safelist.extend(extra.into_iter().map(Into::into));
        filter
    }

    pub fn is_candidate(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        if !token.chars().all(is_candidate_char) {
            return false;
        }
        if token.contains("://") {
            return false;
        }
        if token.len() > self.max_len {
            return false;
        }
        token.chars().any(is_marker_char) || self.safelist.contains(token)
    }
}

fn is_candidate_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '&' | '(' | ')' | ',' | ':' | '.' | '_' | '%' | '/' | '-' | '[' | ']'
        )
}

/// Characters that almost never appear in prose identifiers but show up in
/// nearly every utility class.
fn is_marker_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | ':' | '[' | ']' | '!' | '/' | '_')
}
