//! Module and stylesheet resolution for the compilation engine.
//!
//! Supports:
//! - `@config` / `@plugin` module lookups tried against a fixed chain of
//!   locations: the requesting directory, the project root, and finally the
//!   project's root config file
//! - extension and directory-index conventions (`x` → `x.js`, `x/index.json`,
//!   `package.json` `main`)
//! - JSON modules parsed into values, with `default` export unwrapping
//! - plain relative/absolute stylesheet imports
//!
//! Nothing is cached: each call hits the filesystem again.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::error::{CssError, ErrorKind, Result};

/// Extensions tried, in order, when a module path has none.
pub const MODULE_EXTENSIONS: &[&str] = &["js", "cjs", "mjs", "json"];

/// A loaded module. JSON is parsed; anything else is kept as source text
/// since scripts are never executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Module {
    Json(Value),
    Script { source: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModule {
    pub path: PathBuf,
    pub base: PathBuf,
    pub module: Module,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStylesheet {
    pub path: PathBuf,
    pub base: PathBuf,
    pub content: String,
}

/// What a resolution strategy can see.
pub struct ResolveContext<'a> {
    /// Directory of the requesting file.
    pub base: &'a Path,
    pub project_root: &'a Path,
    pub root_config: &'a Path,
}

/// One step of the lookup chain: maps an identifier to a path worth
/// probing, or declines.
pub type Strategy = fn(&str, &ResolveContext<'_>) -> Option<PathBuf>;

fn absolute_id(id: &str, _cx: &ResolveContext<'_>) -> Option<PathBuf> {
    let path = Path::new(id);
    path.is_absolute().then(|| path.to_path_buf())
}

fn relative_to_base(id: &str, cx: &ResolveContext<'_>) -> Option<PathBuf> {
    relative(id).then(|| normalize_path(&cx.base.join(id)))
}

fn relative_to_root(id: &str, cx: &ResolveContext<'_>) -> Option<PathBuf> {
    relative(id).then(|| normalize_path(&cx.project_root.join(id)))
}

fn stripped_relative_to_root(id: &str, cx: &ResolveContext<'_>) -> Option<PathBuf> {
    relative(id).then(|| normalize_path(&cx.project_root.join(id.strip_prefix("./").unwrap_or(id))))
}

fn root_config_fallback(id: &str, cx: &ResolveContext<'_>) -> Option<PathBuf> {
    relative(id).then(|| cx.project_root.join(cx.root_config))
}

fn relative(id: &str) -> bool {
    !Path::new(id).is_absolute()
}

/// The lookup order. An absolute id only ever produces itself.
pub const DEFAULT_STRATEGIES: &[Strategy] = &[
    absolute_id,
    relative_to_base,
    relative_to_root,
    stripped_relative_to_root,
    root_config_fallback,
];

/// Resolves `@config` / `@plugin` identifiers to loaded modules.
#[derive(Clone)]
pub struct ModuleResolver {
    project_root: PathBuf,
    root_config: PathBuf,
    strategies: Vec<Strategy>,
}

impl ModuleResolver {
    pub fn new(project_root: impl Into<PathBuf>, root_config: impl Into<PathBuf>) -> Self {
        Self {
            project_root: absolute_path(&project_root.into()),
            root_config: root_config.into(),
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }

    /// Candidate paths for `id` from `base`, in lookup order.
    pub fn candidates(&self, id: &str, base: &Path) -> Vec<PathBuf> {
        let cx = ResolveContext {
            base,
            project_root: &self.project_root,
            root_config: &self.root_config,
        };
        self.strategies.iter().filter_map(|strategy| strategy(id, &cx)).collect()
    }

    /// Resolve and load `id` as requested from `from` (a file or directory).
    pub async fn resolve(&self, id: &str, from: &Path) -> Result<ResolvedModule> {
        let base = context_base(&absolute_path(from)).await;

        let mut resolved = None;
        for candidate in self.candidates(id, &base) {
            if let Some(path) = resolve_module_path(&candidate).await {
                resolved = Some(path);
                break;
            }
        }

        let Some(path) = resolved else {
            return Err(CssError::unresolved_module(id, from));
        };
        tracing::debug!(id, path = %path.display(), "resolved module");

        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CssError::read(&path, e))?;
        let module = load_module(&path, source)?;
        let base = path.parent().unwrap_or(&path).to_path_buf();

        Ok(ResolvedModule { path, base, module })
    }
}

impl std::fmt::Debug for ModuleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleResolver")
            .field("project_root", &self.project_root)
            .field("root_config", &self.root_config)
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

/// Resolves `@import` stylesheet paths. No fallback search: imports are
/// expected to be explicit.
#[derive(Debug, Clone, Copy, Default)]
pub struct StylesheetResolver;

impl StylesheetResolver {
    pub async fn resolve(&self, id: &str, from_dir: &Path) -> Result<ResolvedStylesheet> {
        let path = if Path::new(id).is_absolute() {
            PathBuf::from(id)
        } else {
            absolute_path(&from_dir.join(id))
        };

        let content = tokio::fs::read_to_string(&path).await.map_err(|source| {
            CssError::from(ErrorKind::StylesheetNotFound {
                id: id.to_string(),
                path: path.clone(),
                source,
            })
        })?;
        let base = path.parent().unwrap_or(&path).to_path_buf();

        Ok(ResolvedStylesheet {
            path,
            base,
            content,
        })
    }
}

/// Directory a lookup is relative to: `from` itself when it is a directory,
/// otherwise its parent. A path that cannot be probed is treated as a file.
async fn context_base(from: &Path) -> PathBuf {
    match tokio::fs::metadata(from).await {
        Ok(meta) if meta.is_dir() => from.to_path_buf(),
        _ => from.parent().unwrap_or(from).to_path_buf(),
    }
}

/// Apply file, extension and directory-index conventions to one candidate.
async fn resolve_module_path(candidate: &Path) -> Option<PathBuf> {
    if let Some(file) = resolve_as_file(candidate).await {
        return Some(file);
    }
    if !is_dir(candidate).await {
        return None;
    }

    if let Some(main) = package_main(candidate).await {
        let target = normalize_path(&candidate.join(main));
        if let Some(file) = resolve_as_file(&target).await {
            return Some(file);
        }
        if let Some(index) = resolve_index(&target).await {
            return Some(index);
        }
    }
    resolve_index(candidate).await
}

async fn resolve_as_file(path: &Path) -> Option<PathBuf> {
    if is_file(path).await {
        return Some(path.to_path_buf());
    }
    for ext in MODULE_EXTENSIONS {
        let mut with_ext = path.as_os_str().to_owned();
        with_ext.push(".");
        with_ext.push(ext);
        let with_ext = PathBuf::from(with_ext);
        if is_file(&with_ext).await {
            return Some(with_ext);
        }
    }
    None
}

async fn resolve_index(dir: &Path) -> Option<PathBuf> {
    for ext in MODULE_EXTENSIONS {
        let index = dir.join(format!("index.{ext}"));
        if is_file(&index).await {
            return Some(index);
        }
    }
    None
}

async fn package_main(dir: &Path) -> Option<String> {
    let manifest = tokio::fs::read_to_string(dir.join("package.json")).await.ok()?;
    let value: Value = serde_json::from_str(&manifest).ok()?;
    value.get("main")?.as_str().map(str::to_string)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

fn load_module(path: &Path, source: String) -> Result<Module> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        return Ok(Module::Script { source });
    }

    let value: Value = serde_json::from_str(&source).map_err(|e| {
        CssError::from(ErrorKind::InvalidModule {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    })?;
    Ok(Module::Json(unwrap_default(value)))
}

/// `{ "default": x }` → `x`, mirroring ES module interop.
fn unwrap_default(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("default").is_some_and(|d| !d.is_null()) => {
            map.remove("default").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Lexically resolve `.` and `..` components without touching the
/// filesystem.
/// `path` against the current directory when relative, then normalized.
pub fn absolute_path(path: &Path) -> PathBuf {
    match std::path::absolute(path) {
        Ok(abs) => normalize_path(&abs),
        Err(_) => normalize_path(path),
    }
}

pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn resolver(root: &Path) -> ModuleResolver {
        ModuleResolver::new(root, "tailwind.config.js")
    }

    #[test]
    fn candidate_order_for_relative_id() {
        let r = ModuleResolver::new("/proj", "tailwind.config.js");
        let candidates = r.candidates("./plugins/a", Path::new("/proj/app/styles"));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/proj/app/styles/plugins/a"),
                PathBuf::from("/proj/plugins/a"),
                PathBuf::from("/proj/plugins/a"),
                PathBuf::from("/proj/tailwind.config.js"),
            ]
        );
    }

    #[test]
    fn absolute_id_is_the_only_candidate() {
        let r = ModuleResolver::new("/proj", "tailwind.config.js");
        assert_eq!(
            r.candidates("/elsewhere/x.json", Path::new("/proj/app")),
            vec![PathBuf::from("/elsewhere/x.json")]
        );
    }

    #[tokio::test]
    async fn absolute_existing_path_resolves_directly() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("vendor/theme.json");
        write(&target, r#"{ "theme": {} }"#);
        // A root config exists too; it must not be consulted.
        write(&dir.path().join("tailwind.config.js"), "module.exports = {}");

        let resolved = resolver(dir.path())
            .resolve(target.to_str().unwrap(), &dir.path().join("app/globals.css"))
            .await
            .unwrap();
        assert_eq!(resolved.path, target);
        assert_eq!(resolved.base, dir.path().join("vendor"));
        assert!(matches!(resolved.module, Module::Json(_)));
    }

    #[tokio::test]
    async fn falls_back_to_project_root() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("app/globals.css"), "");
        write(&dir.path().join("plugins/brand.json"), r#"{ "utilities": {} }"#);

        let resolved = resolver(dir.path())
            .resolve("./plugins/brand", &dir.path().join("app/globals.css"))
            .await
            .unwrap();
        assert_eq!(resolved.path, dir.path().join("plugins/brand.json"));
    }

    #[tokio::test]
    async fn base_directory_wins_over_root() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("app/theme.json"), r#"{ "near": true }"#);
        write(&dir.path().join("theme.json"), r#"{ "near": false }"#);

        let resolved = resolver(dir.path())
            .resolve("./theme.json", &dir.path().join("app"))
            .await
            .unwrap();
        assert_eq!(resolved.path, dir.path().join("app/theme.json"));
    }

    #[tokio::test]
    async fn missing_from_path_uses_its_parent() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("styles/cfg.json"), "{}");

        let resolved = resolver(dir.path())
            .resolve("./cfg.json", &dir.path().join("styles/not-yet-written.css"))
            .await
            .unwrap();
        assert_eq!(resolved.path, dir.path().join("styles/cfg.json"));
    }

    #[tokio::test]
    async fn last_resort_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("tailwind.config.js"), "module.exports = { content: [] };");

        let resolved = resolver(dir.path())
            .resolve("tailwindcss-animate", &dir.path().join("app/globals.css"))
            .await
            .unwrap();
        assert_eq!(resolved.path, dir.path().join("tailwind.config.js"));
        assert!(matches!(resolved.module, Module::Script { ref source } if source.contains("content")));
    }

    #[tokio::test]
    async fn directory_index_and_package_main() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("plugins/a/index.json"), r#"{ "a": 1 }"#);
        write(&dir.path().join("plugins/b/package.json"), r#"{ "main": "dist/plugin.json" }"#);
        write(&dir.path().join("plugins/b/dist/plugin.json"), r#"{ "b": 2 }"#);

        let r = resolver(dir.path());
        let a = r.resolve("./plugins/a", dir.path()).await.unwrap();
        assert_eq!(a.path, dir.path().join("plugins/a/index.json"));
        let b = r.resolve("./plugins/b", dir.path()).await.unwrap();
        assert_eq!(b.path, dir.path().join("plugins/b/dist/plugin.json"));
    }

    #[tokio::test]
    async fn default_export_is_unwrapped() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("cfg.json"), r#"{ "default": { "darkMode": "class" } }"#);

        let resolved = resolver(dir.path()).resolve("./cfg.json", dir.path()).await.unwrap();
        assert_eq!(
            resolved.module,
            Module::Json(serde_json::json!({ "darkMode": "class" }))
        );
    }

    #[tokio::test]
    async fn unresolvable_id_names_id_and_origin() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("app/globals.css");
        let err = resolver(dir.path()).resolve("./nope", &from).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnresolvedModule { .. }));
        let msg = err.to_string();
        assert!(msg.contains("./nope"));
        assert!(msg.contains(&from.display().to_string()));
    }

    #[tokio::test]
    async fn invalid_json_module() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("broken.json"), "{ nope");
        let err = resolver(dir.path()).resolve("./broken.json", dir.path()).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidModule { .. }));
    }

    #[tokio::test]
    async fn stylesheet_relative_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("styles/base.css"), "body { margin: 0 }");

        let sheet = StylesheetResolver
            .resolve("../styles/base.css", &dir.path().join("app"))
            .await
            .unwrap();
        assert_eq!(sheet.path, dir.path().join("styles/base.css"));
        assert_eq!(sheet.base, dir.path().join("styles"));
        assert_eq!(sheet.content, "body { margin: 0 }");

        let err = StylesheetResolver
            .resolve("./missing.css", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::StylesheetNotFound { .. }));
    }

    #[tokio::test]
    async fn relative_project_root_yields_absolute_paths() {
        // Test binaries run from the package directory.
        let r = ModuleResolver::new("fixtures/trace-ui", "tailwind.config.json");
        let m = r
            .resolve("./tailwind.config.json", Path::new("fixtures/trace-ui/app/globals.css"))
            .await
            .unwrap();
        assert!(m.path.is_absolute(), "{}", m.path.display());
        assert!(m.path.ends_with("fixtures/trace-ui/tailwind.config.json"));
        assert!(m.base.is_absolute());
        assert!(m.base.ends_with("fixtures/trace-ui"));

        let fallback = r.resolve("missing-plugin.json", Path::new(".")).await;
        assert!(fallback.unwrap().path.is_absolute());

        let sheet = StylesheetResolver
            .resolve("./globals.css", Path::new("fixtures/trace-ui/app"))
            .await
            .unwrap();
        assert!(sheet.path.is_absolute());
        assert!(sheet.base.ends_with("fixtures/trace-ui/app"));
    }

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(normalize_path(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
    }
}
