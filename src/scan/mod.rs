//! Source scanning: turns a project tree into the set of class names the
//! compiled stylesheet has to keep.

pub mod collector;
pub mod extract;
pub mod sanitize;
pub mod walker;

pub use collector::CandidateCollector;
pub use extract::{collect_apply_directives, collect_string_literals, Extractor};
pub use sanitize::{is_candidate, sanitize, TokenFilter};
pub use walker::TreeWalker;
