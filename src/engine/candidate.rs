//! Candidate parsing: `md:hover:-mt-2!` → variants, sign, utility, flags.

/// A class name split into its parts. Borrowed from the raw candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub raw: &'a str,
    /// Outermost first.
    pub variants: Vec<&'a str>,
    /// Utility name without sign or important marker, e.g. `mt-2`.
    pub utility: &'a str,
    pub negative: bool,
    pub important: bool,
}

/// Split a raw class. Returns `None` for shapes that can never name a
/// utility (empty segments, unbalanced brackets).
pub fn parse(raw: &str) -> Option<Candidate<'_>> {
    let mut segments = split_variants(raw)?;
    let base = segments.pop()?;
    if segments.iter().any(|v| v.is_empty()) {
        return None;
    }

    let (base, important) = if let Some(rest) = base.strip_prefix('!') {
        (rest, true)
    } else if let Some(rest) = base.strip_suffix('!') {
        (rest, true)
    } else {
        (base, false)
    };

    let (utility, negative) = match base.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (base, false),
    };
    if utility.is_empty() || utility.starts_with('-') {
        return None;
    }

    Some(Candidate {
        raw,
        variants: segments,
        utility,
        negative,
        important,
    })
}

/// Split on `:` outside of `[...]` and `(...)`.
fn split_variants(raw: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            ':' if depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&raw[start..]);
    Some(parts)
}

/// `[2px]` → `2px`, with `_` read as a space unless escaped.
pub fn arbitrary(value: &str) -> Option<String> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'_') => {
                out.push('_');
                chars.next();
            }
            '_' => out.push(' '),
            other => out.push(other),
        }
    }
    Some(out)
}

/// Escape a class name for use in a selector.
pub fn escape_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 8);
    for (i, c) in class.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            out.push_str(&format!("\\3{c} "));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}
