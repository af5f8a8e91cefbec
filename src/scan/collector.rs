use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::future::try_join_all;
use tokio::sync::Semaphore;

use super::extract::Extractor;
use super::sanitize::TokenFilter;
use super::walker::TreeWalker;
use crate::config::ProjectConfig;
use crate::error::{CssError, Result};
use crate::resolver::absolute_path;

/// Scans a project for utility-class candidates.
///
/// Source roots are walked concurrently and every visited file is run
/// through the string-literal extractor; the global stylesheet, when it
/// exists, is run through the `@apply` extractor at the same time. All
/// results land in one shared set.
#[derive(Debug, Clone)]
pub struct CandidateCollector {
    source_dirs: Vec<String>,
    globals: PathBuf,
    walker: TreeWalker,
    extractor: Extractor,
    read_permits: Arc<Semaphore>,
}

impl Default for CandidateCollector {
    fn default() -> Self {
        Self::from_config(&ProjectConfig::default())
    }
}

impl CandidateCollector {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            source_dirs: config.source_dirs.clone(),
            globals: config.globals.clone(),
            walker: TreeWalker::new(&config.extensions),
            extractor: Extractor::new(TokenFilter::with_safelist(config.safelist.iter().cloned())),
            read_permits: Arc::new(Semaphore::new(config.read_permits())),
        }
    }

    /// Collect the deduplicated candidate set for `project_root`, sorted so
    /// repeated runs print identically.
    pub async fn collect(&self, project_root: &Path) -> Result<Vec<String>> {
        let project_root = &absolute_path(project_root);
        let bucket = Arc::new(Mutex::new(HashSet::new()));

        let walks = try_join_all(self.source_dirs.iter().map(|dir_name| {
            let dir = project_root.join(dir_name);
            let bucket = Arc::clone(&bucket);
            async move {
                self.walker
                    .walk(&dir, |path| {
                        let bucket = Arc::clone(&bucket);
                        async move {
                            let contents = self.read_bounded(&path).await?;
                            let mut found = HashSet::new();
                            self.extractor.string_literals(&contents, &mut found);
                            extend_shared(&bucket, found);
                            Ok(())
                        }
                    })
                    .await
            }
        }));

        let globals = async {
            let path = project_root.join(&self.globals);
            let exists = tokio::fs::try_exists(&path)
                .await
                .map_err(|e| CssError::read(&path, e))?;
            if !exists {
                tracing::debug!(path = %path.display(), "no global stylesheet to scan");
                return Ok(());
            }
            let css = self.read_bounded(&path).await?;
            let mut found = HashSet::new();
            self.extractor.apply_directives(&css, &mut found);
            extend_shared(&bucket, found);
            Ok::<_, CssError>(())
        };

        tokio::try_join!(walks, globals)?;

        let set = std::mem::take(&mut *lock(&bucket));
        let mut candidates: Vec<String> = set.into_iter().collect();
        candidates.sort();
        tracing::debug!(count = candidates.len(), root = %project_root.display(), "collected candidates");
        Ok(candidates)
    }

    /// Invalid UTF-8 is replaced, not rejected.
    async fn read_bounded(&self, path: &Path) -> Result<String> {
        let _permit = self
            .read_permits
            .acquire()
            .await
            .map_err(|_| CssError::message("file read limiter closed"))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CssError::read(path, e))?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

fn lock(bucket: &Mutex<HashSet<String>>) -> std::sync::MutexGuard<'_, HashSet<String>> {
    // A poisoned set only means another extractor panicked mid-insert;
    // inserts are idempotent so the contents are still usable.
    bucket.lock().unwrap_or_else(|e| e.into_inner())
}

fn extend_shared(bucket: &Mutex<HashSet<String>>, found: HashSet<String>) {
    lock(bucket).extend(found);
}
