use std::fmt;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// All errors produced while scanning, resolving, or compiling.
#[derive(Debug)]
pub struct CssError {
    pub kind: ErrorKind,
    pub span: Option<Range<usize>>,
    /// File the error was raised in, when it came from a file on disk.
    pub path: Option<PathBuf>,
    /// Text the span indexes into, for rendering an excerpt.
    pub source_text: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// No candidate location satisfied a module lookup.
    #[error("unable to resolve module \"{id}\" from \"{}\"", from.display())]
    UnresolvedModule { id: String, from: PathBuf },
    /// An imported stylesheet could not be read.
    #[error("stylesheet \"{id}\" not found at '{}': {source}", path.display())]
    StylesheetNotFound {
        id: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A stylesheet imports itself, directly or through other imports.
    #[error("circular stylesheet import: '{0}'")]
    CircularImport(String),
    /// A file exists but could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Lexer encountered an unrecognized character/sequence.
    #[error("unrecognized token: {0}")]
    UnrecognizedToken(String),
    /// Parser expected one thing, got another.
    #[error("expected {expected}, got {got}")]
    UnexpectedToken { expected: String, got: String },
    /// Parser reached end of input unexpectedly.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
    /// Text in a block that is neither a declaration nor a rule.
    #[error("unknown word: {0}")]
    UnknownWord(String),
    /// A module file was found but its contents are not usable.
    #[error("invalid module '{}': {message}", path.display())]
    InvalidModule { path: PathBuf, message: String },
    /// The project configuration file is malformed.
    #[error("invalid configuration '{}': {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },
    /// `@apply` names a class the engine cannot generate.
    #[error("cannot apply unknown utility class `{0}`")]
    UnknownUtility(String),
    /// General message.
    #[error("{0}")]
    Message(String),
}

/// Coarse classification of an error, used by callers that only care
/// about which stage of the pass failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Resolution,
    Read,
    Parse,
    Engine,
}

impl fmt::Display for CssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(span) = &self.span {
            write!(f, " (at byte {}..{})", span.start, span.end)?;
        }

        if let Some(path) = &self.path {
            write!(f, " in {}", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for CssError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<ErrorKind> for CssError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            span: None,
            path: None,
            source_text: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CssError>;

/// Shorthand constructors.
impl CssError {
    pub fn unexpected_token(expected: &str, got: &str, span: Range<usize>) -> Self {
        Self {
            span: Some(span),
            ..CssError::from(ErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                got: got.to_string(),
            })
        }
    }

    pub fn unexpected_eof(expected: &str) -> Self {
        ErrorKind::UnexpectedEof {
            expected: expected.to_string(),
        }
        .into()
    }

    pub fn unknown_word(word: &str, span: Range<usize>) -> Self {
        Self {
            span: Some(span),
            ..CssError::from(ErrorKind::UnknownWord(word.to_string()))
        }
    }

    pub fn read(path: &Path, source: io::Error) -> Self {
        ErrorKind::Read {
            path: path.to_path_buf(),
            source,
        }
        .into()
    }

    pub fn unresolved_module(id: &str, from: &Path) -> Self {
        ErrorKind::UnresolvedModule {
            id: id.to_string(),
            from: from.to_path_buf(),
        }
        .into()
    }

    /// General error with a message.
    pub fn message(msg: &str) -> Self {
        ErrorKind::Message(msg.to_string()).into()
    }

    /// Attach the file and text a span points into. Existing values win so
    /// the innermost file of a nested import is reported.
    pub fn in_file(mut self, path: &Path, text: &str) -> Self {
        if self.path.is_none() {
            self.path = Some(path.to_path_buf());
            if self.span.is_some() {
                self.source_text = Some(text.to_string());
            }
        }
        self
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.kind {
            ErrorKind::UnresolvedModule { .. }
            | ErrorKind::StylesheetNotFound { .. }
            | ErrorKind::CircularImport(_) => ErrorCategory::Resolution,
            ErrorKind::Read { .. } => ErrorCategory::Read,
            ErrorKind::UnrecognizedToken(_)
            | ErrorKind::UnexpectedToken { .. }
            | ErrorKind::UnexpectedEof { .. }
            | ErrorKind::UnknownWord(_)
            | ErrorKind::InvalidModule { .. } => ErrorCategory::Parse,
            ErrorKind::InvalidConfig { .. }
            | ErrorKind::UnknownUtility(_)
            | ErrorKind::Message(_) => ErrorCategory::Engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_module_names_id_and_origin() {
        let err = CssError::unresolved_module("./plugin", Path::new("/proj/app/globals.css"));
        let msg = err.to_string();
        assert!(msg.contains("\"./plugin\""));
        assert!(msg.contains("/proj/app/globals.css"));
        assert_eq!(err.category(), ErrorCategory::Resolution);
    }

    #[test]
    fn span_and_path_are_rendered() {
        let err = CssError::unknown_word("oops", 4..8).in_file(Path::new("a.css"), "a { oops }");
        let msg = err.to_string();
        assert!(msg.contains("unknown word: oops"));
        assert!(msg.contains("(at byte 4..8)"));
        assert!(msg.ends_with("in a.css"));
        assert_eq!(err.source_text.as_deref(), Some("a { oops }"));
    }

    #[test]
    fn innermost_file_wins() {
        let err = CssError::unknown_word("x", 0..1)
            .in_file(Path::new("inner.css"), "x")
            .in_file(Path::new("outer.css"), "@import 'inner.css';");
        assert_eq!(err.path.as_deref(), Some(Path::new("inner.css")));
    }

    #[test]
    fn read_error_exposes_io_source() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = CssError::read(Path::new("/x.tsx"), io);
        assert_eq!(err.category(), ErrorCategory::Read);
        assert!(std::error::Error::source(&err).is_some());
    }
}
