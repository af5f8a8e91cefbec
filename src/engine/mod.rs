//! Compilation engine.
//!
//! An [`Engine`] turns the root stylesheet into a [`Compiled`] artifact in
//! one async pass, asking a [`Loader`] for every `@import`, `@config` and
//! `@plugin` it meets. The artifact then renders CSS for any candidate
//! list without touching the filesystem again.
//!
//! [`UtilityEngine`] is the built-in implementation.

pub mod candidate;
pub mod theme;
pub mod utilities;
pub mod variants;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;

pub use theme::{DarkMode, Theme};
pub use utilities::{Generator, Utility};

use crate::ast::{AtRule, Declaration, Node, Rule};
use crate::error::{CssError, ErrorKind, Result};
use crate::parser;
use crate::printer;
use crate::resolver::{normalize_path, Module, ResolvedModule, ResolvedStylesheet};

/// Import id that stands for the engine itself.
pub const DEFAULT_ENGINE_IMPORT: &str = "tailwindcss";

/// Host hooks the engine resolves external references through.
pub trait Loader: Send + Sync {
    /// `@config` / `@plugin`: `from` is the requesting file or directory.
    fn load_module<'a>(&'a self, id: &'a str, from: &'a Path)
        -> BoxFuture<'a, Result<ResolvedModule>>;

    /// `@import`: `from_dir` is the importing sheet's directory.
    fn load_stylesheet<'a>(
        &'a self,
        id: &'a str,
        from_dir: &'a Path,
    ) -> BoxFuture<'a, Result<ResolvedStylesheet>>;
}

#[derive(Clone, Copy)]
pub struct CompileOptions<'a> {
    /// Directory top-level references resolve against.
    pub base: &'a Path,
    /// Path of the stylesheet being compiled.
    pub from: &'a Path,
    pub loader: &'a dyn Loader,
}

pub trait Engine: Send + Sync {
    fn compile<'a>(
        &'a self,
        source: &'a str,
        options: CompileOptions<'a>,
    ) -> BoxFuture<'a, Result<Box<dyn Compiled>>>;
}

/// A compiled stylesheet, ready to render for a candidate set.
pub trait Compiled: Send + Sync {
    fn build(&self, candidates: &[String]) -> Result<String>;
}

/// The built-in utility engine.
#[derive(Debug, Clone)]
pub struct UtilityEngine {
    import_name: String,
    theme: Theme,
}

impl Default for UtilityEngine {
    fn default() -> Self {
        Self {
            import_name: DEFAULT_ENGINE_IMPORT.to_string(),
            theme: Theme::builtin(),
        }
    }
}

impl UtilityEngine {
    /// Use `import_name` instead of `tailwindcss` as the marker import.
    pub fn with_import_name(mut self, import_name: impl Into<String>) -> Self {
        self.import_name = import_name.into();
        self
    }

    /// Start from `theme` instead of the built-in tokens.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn expand<'s, 'l: 's>(
        &'s self,
        nodes: Vec<Node>,
        base: PathBuf,
        state: &'s mut CompileState<'l>,
    ) -> BoxFuture<'s, Result<Vec<Node>>> {
        async move {
            let mut out = Vec::with_capacity(nodes.len());
            for node in nodes {
                let at = match node {
                    Node::AtRule(at) => at,
                    other => {
                        out.push(other);
                        continue;
                    }
                };

                match at.name.as_str() {
                    "import" => {
                        let Some(id) = at.quoted_param().map(str::to_string) else {
                            out.push(at.into());
                            continue;
                        };
                        if let Some(marker) = self.engine_import(&id) {
                            out.extend(marker);
                            continue;
                        }
                        if is_url(&id) {
                            out.push(at.into());
                            continue;
                        }

                        let sheet = state.loader.load_stylesheet(&id, &base).await?;
                        if !state.importing.insert(sheet.path.clone()) {
                            return Err(ErrorKind::CircularImport(id).into());
                        }
                        let parsed = parser::parse(&sheet.content)
                            .map_err(|e| e.in_file(&sheet.path, &sheet.content))?;
                        tracing::debug!(id = %id, path = %sheet.path.display(), "inlining import");
                        let inner = self
                            .expand(parsed.nodes, sheet.base.clone(), &mut *state)
                            .await?;
                        state.importing.remove(&sheet.path);
                        out.extend(wrap_import(&at.params, inner));
                    }
                    "tailwind" => {
                        if at.params.trim() == "utilities" {
                            out.push(marker());
                        } else {
                            tracing::debug!(layer = %at.params, "dropping @tailwind layer");
                        }
                    }
                    "config" | "plugin" => {
                        let Some(id) = at.quoted_param() else {
                            return Err(CssError::message(&format!(
                                "@{} expects a quoted module path",
                                at.name
                            )));
                        };
                        let loaded = state.loader.load_module(id, &base).await?;
                        match &loaded.module {
                            Module::Json(value) if at.name == "config" => {
                                state.theme.apply_config(value)
                            }
                            Module::Json(value) => state.register_plugin(value),
                            Module::Script { .. } => tracing::warn!(
                                path = %loaded.path.display(),
                                directive = %at.name,
                                "script modules are not executed, ignoring"
                            ),
                        }
                    }
                    "theme" if at.nodes.is_some() => {
                        state.define_theme(at.nodes.unwrap_or_default());
                    }
                    "custom-variant" if at.params.trim_start().starts_with("dark") => {
                        if at.params.contains(".dark") {
                            state.theme.dark_mode = DarkMode::Class;
                        }
                    }
                    _ => out.push(at.into()),
                }
            }
            Ok(out)
        }
        .boxed()
    }

    /// `Some` when `id` names the engine: the utilities marker for the
    /// whole package or its `utilities` entry, nothing for other entries.
    fn engine_import(&self, id: &str) -> Option<Option<Node>> {
        if id == self.import_name {
            return Some(Some(marker()));
        }
        let entry = id
            .strip_prefix(self.import_name.as_str())
            .and_then(|rest| rest.strip_prefix('/'))?;
        Some((entry.trim_end_matches(".css") == "utilities").then(marker))
    }
}

impl Engine for UtilityEngine {
    fn compile<'a>(
        &'a self,
        source: &'a str,
        options: CompileOptions<'a>,
    ) -> BoxFuture<'a, Result<Box<dyn Compiled>>> {
        async move {
            let root = parser::parse(source).map_err(|e| e.in_file(options.from, source))?;

            let mut state = CompileState {
                loader: options.loader,
                theme: self.theme.clone(),
                plugins: BTreeMap::new(),
                importing: HashSet::from([normalize_path(options.from)]),
            };
            let nodes = self
                .expand(root.nodes, options.base.to_path_buf(), &mut state)
                .await?;

            tracing::debug!(
                nodes = nodes.len(),
                plugins = state.plugins.len(),
                from = %options.from.display(),
                "compiled stylesheet"
            );
            let compiled: Box<dyn Compiled> = Box::new(CompiledSheet {
                nodes,
                theme: state.theme,
                plugins: state.plugins,
            });
            Ok(compiled)
        }
        .boxed()
    }
}

struct CompileState<'l> {
    loader: &'l dyn Loader,
    theme: Theme,
    plugins: BTreeMap<String, Vec<Declaration>>,
    /// Sheets on the current import chain.
    importing: HashSet<PathBuf>,
}

impl CompileState<'_> {
    /// `{ "utilities": { ".name": { "prop": "value" } }, "theme": ... }`
    fn register_plugin(&mut self, value: &Value) {
        if let Some(utilities) = value.get("utilities").and_then(Value::as_object) {
            for (name, body) in utilities {
                let name = name.trim_start_matches('.').to_string();
                self.plugins.insert(name, theme::declarations_from_json(body));
            }
        }
        self.theme.apply_config(value);
        if let Some(config) = value.get("config") {
            self.theme.apply_config(config);
        }
    }

    fn define_theme(&mut self, nodes: Vec<Node>) {
        for node in nodes {
            match node {
                Node::Decl(decl) if decl.prop.starts_with("--") => {
                    let reset = decl
                        .prop
                        .strip_suffix("-*")
                        .and_then(|p| p.strip_prefix("--"))
                        .filter(|_| decl.value.trim() == "initial");
                    match reset {
                        Some(namespace) => self.theme.clear_namespace(namespace),
                        None => self.theme.set(&decl.prop, &decl.value),
                    }
                }
                Node::AtRule(at) if at.name == "keyframes" => self.theme.add_keyframes(at),
                other => tracing::debug!(node = ?other, "ignoring non-variable in @theme"),
            }
        }
    }
}

/// Where generated utilities go.
fn marker() -> Node {
    AtRule::statement("tailwind", "utilities").into()
}

fn is_marker(node: &Node) -> bool {
    matches!(node, Node::AtRule(at) if at.name == "tailwind" && at.params == "utilities" && at.nodes.is_none())
}

fn is_url(id: &str) -> bool {
    id.contains("://") || id.starts_with("//")
}

/// Apply an import's `layer(...)` and media conditions to the inlined nodes.
fn wrap_import(params: &str, nodes: Vec<Node>) -> Vec<Node> {
    let rest = params
        .trim()
        .strip_prefix("url(")
        .map(|r| r.split_once(')').map_or("", |(_, after)| after))
        .unwrap_or_else(|| {
            let trimmed = params.trim();
            trimmed
                .chars()
                .next()
                .filter(|c| *c == '"' || *c == '\'')
                .and_then(|quote| trimmed[1..].split_once(quote))
                .map_or("", |(_, after)| after)
        })
        .trim();

    let (layer, media) = match rest.strip_prefix("layer(") {
        Some(after) => match after.split_once(')') {
            Some((name, media)) => (Some(name.trim()), media.trim()),
            None => (None, rest),
        },
        None => (None, rest),
    };

    let mut nodes = nodes;
    if let Some(name) = layer {
        nodes = vec![AtRule::block("layer", name, nodes).into()];
    }
    if !media.is_empty() {
        nodes = vec![AtRule::block("media", media, nodes).into()];
    }
    nodes
}

struct CompiledSheet {
    nodes: Vec<Node>,
    theme: Theme,
    plugins: BTreeMap<String, Vec<Declaration>>,
}

impl Compiled for CompiledSheet {
    fn build(&self, candidates: &[String]) -> Result<String> {
        let generator = Generator::new(&self.theme, &self.plugins);

        let mut utilities: Vec<Utility> = candidates
            .iter()
            .filter_map(|c| generator.generate(c))
            .collect();
        utilities.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        utilities.dedup_by(|a, b| a.class == b.class);
        tracing::debug!(
            candidates = candidates.len(),
            generated = utilities.len(),
            "generated utilities"
        );

        let mut rules = Some(utilities.iter().map(Utility::to_rule).collect::<Vec<_>>());
        let mut nodes = Vec::with_capacity(self.nodes.len() + utilities.len());
        for node in expand_apply(&self.nodes, &generator, false)? {
            if is_marker(&node) {
                if let Some(rules) = rules.take() {
                    nodes.extend(rules);
                }
                continue;
            }
            nodes.push(node);
        }
        if let Some(rules) = rules {
            nodes.extend(rules);
        }

        let vars = self.theme.referenced(&nodes);
        let keyframes = self.theme.keyframes_for(&vars);
        if !vars.is_empty() {
            let decls = vars
                .iter()
                .map(|(name, value)| Declaration::new(name.as_str(), value.as_str()).into())
                .collect();
            let at = leading_statements(&nodes);
            nodes.insert(at, Rule::new(":root, :host", decls).into());
        }
        nodes.extend(keyframes.into_iter().map(Node::from));

        Ok(printer::print_nodes(&nodes))
    }
}

/// `@charset` and `@import` statements must stay first.
fn leading_statements(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .take_while(|node| match node {
            Node::AtRule(at) => at.nodes.is_none() && (at.name == "charset" || at.name == "import"),
            Node::Comment(_) => true,
            _ => false,
        })
        .count()
}

/// Replace every `@apply` with the declarations of the named utilities.
fn expand_apply(nodes: &[Node], generator: &Generator<'_>, in_rule: bool) -> Result<Vec<Node>> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::AtRule(at) if at.name == "apply" => {
                if !in_rule {
                    return Err(CssError::message("@apply is only allowed inside a rule"));
                }
                out.extend(apply(&at.params, generator)?);
            }
            Node::AtRule(at) => match &at.nodes {
                Some(children) => out.push(
                    AtRule::block(
                        at.name.clone(),
                        at.params.clone(),
                        expand_apply(children, generator, in_rule)?,
                    )
                    .into(),
                ),
                None => out.push(node.clone()),
            },
            Node::Rule(rule) => out.push(
                Rule::new(rule.selector.clone(), expand_apply(&rule.nodes, generator, true)?).into(),
            ),
            other => out.push(other.clone()),
        }
    }
    Ok(out)
}

fn apply(params: &str, generator: &Generator<'_>) -> Result<Vec<Node>> {
    let important = params.split_whitespace().any(|t| t == "!important");
    let mut out = Vec::new();
    for class in params.split_whitespace().filter(|t| *t != "!important") {
        let mut utility = generator
            .generate(class)
            .ok_or_else(|| CssError::from(ErrorKind::UnknownUtility(class.to_string())))?;
        if important {
            for decl in &mut utility.declarations {
                decl.important = true;
            }
        }
        out.extend(utility.to_applied());
    }
    Ok(out)
}
