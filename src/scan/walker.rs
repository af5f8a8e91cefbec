use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::{try_join_all, BoxFuture, FutureExt};

use crate::config::SOURCE_EXTENSIONS;
use crate::error::{CssError, Result};

/// Recursive source-tree walker.
///
/// Subdirectories and file visits at one level run concurrently; the first
/// error from a listing or a visit aborts the whole walk.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    extensions: Arc<HashSet<String>>,
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new(SOURCE_EXTENSIONS.iter().copied())
    }
}

impl TreeWalker {
    /// Build a walker for the given extensions. A missing leading dot is
    /// added, so `"tsx"` and `".tsx"` are equivalent.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref();
                if ext.starts_with('.') {
                    ext.to_string()
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        Self {
            extensions: Arc::new(extensions),
        }
    }

    /// Whether `path` has one of the recognized extensions.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&format!(".{ext}")))
            .unwrap_or(false)
    }

    /// Visit every recognized file under `root`. A missing root is an empty
    /// tree, not an error.
    pub async fn walk<F, Fut>(&self, root: &Path, visit: F) -> Result<()>
    where
        F: Fn(PathBuf) -> Fut + Sync,
        Fut: Future<Output = Result<()>> + Send,
    {
        self.walk_dir(root.to_path_buf(), &visit).await
    }

    fn walk_dir<'a, F, Fut>(&'a self, dir: PathBuf, visit: &'a F) -> BoxFuture<'a, Result<()>>
    where
        F: Fn(PathBuf) -> Fut + Sync,
        Fut: Future<Output = Result<()>> + Send + 'a,
    {
        async move {
            let exists = tokio::fs::try_exists(&dir)
                .await
                .map_err(|e| CssError::read(&dir, e))?;
            if !exists {
                tracing::debug!(dir = %dir.display(), "source root missing, skipping");
                return Ok(());
            }

            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| CssError::read(&dir, e))?;

            let mut pending: Vec<BoxFuture<'a, Result<()>>> = Vec::new();
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| CssError::read(&dir, e))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| CssError::read(&path, e))?;

                if file_type.is_dir() {
                    pending.push(self.walk_dir(path, visit));
                } else if self.is_source_file(&path) {
                    pending.push(visit(path).boxed());
                }
            }
            // Release the directory handle before descending.
            drop(entries);

            try_join_all(pending).await?;
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    async fn visited(walker: &TreeWalker, root: &Path) -> Vec<PathBuf> {
        let seen = Mutex::new(Vec::new());
        walker
            .walk(root, |path| {
                seen.lock().unwrap().push(path);
                async { Ok(()) }
            })
            .await
            .expect("walk should succeed");
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        seen
    }

    #[tokio::test]
    async fn visits_only_recognized_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("a/b.tsx"), "export {}").unwrap();
        fs::write(dir.path().join("a/b.txt"), "notes").unwrap();

        let seen = visited(&TreeWalker::default(), dir.path()).await;
        assert_eq!(seen, vec![dir.path().join("a/b.tsx")]);
    }

    #[tokio::test]
    async fn missing_root_visits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let seen = visited(&TreeWalker::default(), &dir.path().join("nope")).await;
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn recurses_deeply() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x/y/z")).unwrap();
        fs::write(dir.path().join("top.js"), "").unwrap();
        fs::write(dir.path().join("x/y/z/deep.jsx"), "").unwrap();
        fs::write(dir.path().join("x/y/mid.ts"), "").unwrap();
        fs::write(dir.path().join("x/style.css"), "").unwrap();

        let seen = visited(&TreeWalker::default(), dir.path()).await;
        assert_eq!(
            seen,
            vec![
                dir.path().join("top.js"),
                dir.path().join("x/y/mid.ts"),
                dir.path().join("x/y/z/deep.jsx"),
            ]
        );
    }

    #[tokio::test]
    async fn wide_and_deep_tree_completes() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..300 {
            let sub = dir.path().join(format!("wide/d{i}"));
            fs::create_dir_all(&sub).unwrap();
            fs::write(sub.join("a.ts"), "").unwrap();
        }
        let mut deep = dir.path().join("deep");
        for i in 0..100 {
            deep.push(format!("{i}"));
        }
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("leaf.tsx"), "").unwrap();

        let seen = visited(&TreeWalker::default(), dir.path()).await;
        assert_eq!(seen.len(), 301);
        assert!(seen.contains(&deep.join("leaf.tsx")));
    }

    #[tokio::test]
    async fn visitor_error_aborts_walk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.ts"), "").unwrap();

        let result = TreeWalker::default()
            .walk(dir.path(), |path| async move {
                Err(CssError::message(&format!("cannot scan {}", path.display())))
            })
            .await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("bad.ts"));
    }

    #[test]
    fn custom_extensions() {
        let walker = TreeWalker::new(["vue", ".svelte"]);
        assert!(walker.is_source_file(Path::new("a/App.vue")));
        assert!(walker.is_source_file(Path::new("a/App.svelte")));
        assert!(!walker.is_source_file(Path::new("a/App.tsx")));
        assert!(!walker.is_source_file(Path::new("Makefile")));
    }
}
