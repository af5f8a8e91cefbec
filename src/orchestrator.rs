//! One compilation pass over a project.
//!
//! The root stylesheet is compiled while the project's sources are scanned
//! for candidates; the compiled artifact is then built for those
//! candidates and the resulting nodes replace the contents of the target
//! tree. The tree is only touched after every step has succeeded.

use std::path::{Path, PathBuf};

use futures_util::future::{BoxFuture, FutureExt};

use crate::ast::Root;
use crate::config::ProjectConfig;
use crate::engine::{CompileOptions, Engine, Loader};
use crate::error::{CssError, Result};
use crate::parser;
use crate::resolver::{
    absolute_path, ModuleResolver, ResolvedModule, ResolvedStylesheet, StylesheetResolver,
};
use crate::scan::CandidateCollector;

/// Routes engine lookups to the project's resolvers.
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    modules: ModuleResolver,
    stylesheets: StylesheetResolver,
}

impl ProjectLoader {
    pub fn new(project_root: &Path, config: &ProjectConfig) -> Self {
        Self {
            modules: ModuleResolver::new(project_root, &config.root_config),
            stylesheets: StylesheetResolver,
        }
    }
}

impl Loader for ProjectLoader {
    fn load_module<'a>(&'a self, id: &'a str, from: &'a Path) -> BoxFuture<'a, Result<ResolvedModule>> {
        self.modules.resolve(id, from).boxed()
    }

    fn load_stylesheet<'a>(
        &'a self,
        id: &'a str,
        from_dir: &'a Path,
    ) -> BoxFuture<'a, Result<ResolvedStylesheet>> {
        self.stylesheets.resolve(id, from_dir).boxed()
    }
}

/// What a successful pass produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub candidates: usize,
    pub nodes: usize,
    pub bytes: usize,
}

pub struct Orchestrator<E> {
    project_root: PathBuf,
    config: ProjectConfig,
    engine: E,
    collector: CandidateCollector,
    loader: ProjectLoader,
}

impl<E: Engine> Orchestrator<E> {
    pub fn new(project_root: impl Into<PathBuf>, config: ProjectConfig, engine: E) -> Self {
        let project_root = absolute_path(&project_root.into());
        Self {
            collector: CandidateCollector::from_config(&config),
            loader: ProjectLoader::new(&project_root, &config),
            project_root,
            config,
            engine,
        }
    }

    /// Load `offline-css.json` from `project_root` (defaults when absent).
    pub fn load(project_root: impl Into<PathBuf>, engine: E) -> Result<Self> {
        let project_root = project_root.into();
        let config = ProjectConfig::load(&project_root)?;
        Ok(Self::new(project_root, config, engine))
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Absolute path of the root stylesheet.
    pub fn input_path(&self) -> PathBuf {
        self.project_root.join(&self.config.input)
    }

    /// Compile the project and replace the contents of `root` with the
    /// result. On error `root` is left exactly as it was.
    pub async fn run(&self, root: &mut Root) -> Result<BuildSummary> {
        let input = self.input_path();
        let source = tokio::fs::read_to_string(&input)
            .await
            .map_err(|e| CssError::read(&input, e))?;

        let options = CompileOptions {
            base: &self.project_root,
            from: &input,
            loader: &self.loader,
        };
        let (compiled, candidates) = tokio::try_join!(
            self.engine.compile(&source, options),
            self.collector.collect(&self.project_root),
        )?;

        let css = compiled
            .build(&candidates)
            .map_err(|e| e.in_file(&input, &source))?;
        let generated = parser::parse(&css)?;

        let summary = BuildSummary {
            candidates: candidates.len(),
            nodes: generated.nodes.len(),
            bytes: css.len(),
        };
        root.remove_all();
        root.append(generated.nodes);

        tracing::debug!(
            candidates = summary.candidates,
            nodes = summary.nodes,
            bytes = summary.bytes,
            input = %input.display(),
            "replaced stylesheet contents"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::engine::{Compiled, UtilityEngine};
    use crate::error::{ErrorCategory, ErrorKind};
    use crate::resolver::Module;
    use std::fs;
    use std::sync::Mutex;

    /// Prints the source back followed by one comment per candidate, and
    /// records the options it was compiled with.
    #[derive(Default)]
    struct EchoEngine {
        seen: Mutex<Option<(PathBuf, PathBuf)>>,
    }

    struct Echo(String);

    impl Compiled for Echo {
        fn build(&self, candidates: &[String]) -> Result<String> {
            let mut out = self.0.clone();
            for c in candidates {
                out.push_str(&format!("\n/*{c}*/"));
            }
            Ok(out)
        }
    }

    impl Engine for EchoEngine {
        fn compile<'a>(
            &'a self,
            source: &'a str,
            options: CompileOptions<'a>,
        ) -> BoxFuture<'a, Result<Box<dyn Compiled>>> {
            async move {
                *self.seen.lock().unwrap() =
                    Some((options.base.to_path_buf(), options.from.to_path_buf()));
                let compiled: Box<dyn Compiled> = Box::new(Echo(source.to_string()));
                Ok(compiled)
            }
            .boxed()
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/globals.css"), ".body { color: red; }\n").unwrap();
        fs::write(dir.path().join("app/page.tsx"), r#"<p className="flex p-2" />"#).unwrap();
        dir
    }

    fn stale_root() -> Root {
        Root::new(vec![Node::Comment(" stale ".into())])
    }

    #[tokio::test]
    async fn replaces_root_contents() {
        let dir = project();
        let orchestrator = Orchestrator::new(dir.path(), ProjectConfig::default(), EchoEngine::default());

        let mut root = stale_root();
        let summary = orchestrator.run(&mut root).await.unwrap();

        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.nodes, 3);
        assert_eq!(
            root.nodes[1..],
            [Node::Comment("flex".into()), Node::Comment("p-2".into())]
        );
        assert!(matches!(&root.nodes[0], Node::Rule(r) if r.selector == ".body"));

        let seen = orchestrator.engine.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.0, dir.path());
        assert_eq!(seen.1, dir.path().join("app/globals.css"));
    }

    #[tokio::test]
    async fn relative_project_root_is_made_absolute() {
        let orchestrator = Orchestrator::new(
            "fixtures/./trace-ui",
            ProjectConfig::default(),
            EchoEngine::default(),
        );
        assert!(orchestrator.project_root().is_absolute());
        assert!(orchestrator.project_root().ends_with("fixtures/trace-ui"));

        orchestrator.run(&mut Root::default()).await.unwrap();
        let (base, from) = orchestrator.engine.seen.lock().unwrap().clone().unwrap();
        assert!(base.is_absolute());
        assert!(from.is_absolute());
        assert!(from.ends_with("trace-ui/app/globals.css"));
    }

    #[tokio::test]
    async fn missing_input_leaves_root_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(dir.path(), ProjectConfig::default(), EchoEngine::default());

        let mut root = stale_root();
        let err = orchestrator.run(&mut root).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Read);
        assert_eq!(root, stale_root());
    }

    #[tokio::test]
    async fn unresolvable_config_leaves_root_untouched() {
        let dir = project();
        fs::write(
            dir.path().join("app/globals.css"),
            "@import \"tailwindcss\";\n@config \"./nope.json\";\n",
        )
        .unwrap();
        let orchestrator = Orchestrator::new(dir.path(), ProjectConfig::default(), UtilityEngine::default());

        let mut root = stale_root();
        let err = orchestrator.run(&mut root).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnresolvedModule { ref id, .. } if id == "./nope.json"));
        assert_eq!(root, stale_root());
    }

    #[tokio::test]
    async fn unknown_apply_names_the_input() {
        let dir = project();
        fs::write(dir.path().join("app/globals.css"), "body { @apply bg-nothing; }").unwrap();
        let orchestrator = Orchestrator::new(dir.path(), ProjectConfig::default(), UtilityEngine::default());

        let mut root = stale_root();
        let err = orchestrator.run(&mut root).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownUtility(_)));
        assert_eq!(err.path, Some(dir.path().join("app/globals.css")));
        assert_eq!(root, stale_root());
    }

    #[tokio::test]
    async fn config_input_override() {
        let dir = project();
        fs::create_dir_all(dir.path().join("styles")).unwrap();
        fs::write(dir.path().join("styles/main.css"), ".main { margin: 0; }").unwrap();
        let config = ProjectConfig {
            input: PathBuf::from("styles/main.css"),
            ..ProjectConfig::default()
        };
        let orchestrator = Orchestrator::new(dir.path(), config, EchoEngine::default());

        let mut root = Root::default();
        orchestrator.run(&mut root).await.unwrap();
        assert!(matches!(&root.nodes[0], Node::Rule(r) if r.selector == ".main"));
    }

    #[tokio::test]
    async fn project_loader_uses_resolvers() {
        let dir = project();
        fs::write(dir.path().join("tailwind.config.json"), r#"{"theme":{}}"#).unwrap();
        fs::write(dir.path().join("app/extra.css"), ".x {}").unwrap();
        let config = ProjectConfig {
            root_config: PathBuf::from("tailwind.config.json"),
            ..ProjectConfig::default()
        };
        let loader = ProjectLoader::new(dir.path(), &config);

        let module = loader
            .load_module("./anything", &dir.path().join("app/globals.css"))
            .await
            .unwrap();
        assert_eq!(module.path, dir.path().join("tailwind.config.json"));
        assert!(matches!(module.module, Module::Json(_)));

        let sheet = loader
            .load_stylesheet("./extra.css", &dir.path().join("app"))
            .await
            .unwrap();
        assert_eq!(sheet.content, ".x {}");
        assert_eq!(sheet.base, dir.path().join("app"));
    }
}
