//! Project configuration.
//!
//! Every knob has a default matching a conventional Next.js + Tailwind
//! layout, so most projects need no config file at all. When
//! `offline-css.json` exists in the project root it is merged over the
//! defaults field by field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CssError, ErrorKind, Result};

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "offline-css.json";

/// Directories scanned for candidates, relative to the project root.
pub const SOURCE_DIRECTORIES: &[&str] = &["app", "components", "lib"];

/// Extensions that mark a file as scannable source.
pub const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];

/// Default cap on file reads in flight during a scan.
pub const DEFAULT_MAX_OPEN_FILES: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Source roots walked for string literals.
    pub source_dirs: Vec<String>,
    /// Recognized source extensions, with the leading dot.
    pub extensions: Vec<String>,
    /// Stylesheet handed to the engine.
    pub input: PathBuf,
    /// Stylesheet scanned for `@apply` directives. Optional on disk.
    pub globals: PathBuf,
    /// Last-resort module for unresolved `@config`/`@plugin` lookups.
    pub root_config: PathBuf,
    /// Extra bare words accepted as candidates even without a marker character.
    pub safelist: Vec<String>,
    /// Upper bound on concurrent file reads while scanning.
    pub max_open_files: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_dirs: SOURCE_DIRECTORIES.iter().map(|s| s.to_string()).collect(),
            extensions: SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            input: PathBuf::from("app").join("globals.css"),
            globals: PathBuf::from("app").join("globals.css"),
            root_config: PathBuf::from("tailwind.config.js"),
            safelist: Vec::new(),
            max_open_files: DEFAULT_MAX_OPEN_FILES,
        }
    }
}

impl ProjectConfig {
    /// Load `offline-css.json` from `project_root`, falling back to defaults
    /// when the file does not exist.
    ///
    /// Blocking: callers run it once, before any scan or compile work is
    /// spawned.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no project config, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(CssError::read(&path, e)),
        };

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CssError::from(ErrorKind::InvalidConfig {
                path: path.clone(),
                message: e.to_string(),
            })
        })?;
        tracing::debug!(path = %path.display(), "loaded project config");
        Ok(config)
    }

    /// Concurrency cap for file reads, never below one.
    pub fn read_permits(&self) -> usize {
        self.max_open_files.max(1)
    }
}
