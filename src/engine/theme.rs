//! Theme variables: the design tokens utilities resolve against.
//!
//! Every token is a CSS custom property (`--color-red-500`, `--spacing`,
//! `--text-lg`). Utilities reference them through `var(...)`, and only the
//! variables a build actually references are emitted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::ast::{AtRule, Declaration, Node, Rule};

static VAR_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\(\s*(--[A-Za-z0-9_-]+)").expect("var() pattern is valid"));

/// How the `dark:` variant is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DarkMode {
    /// `@media (prefers-color-scheme: dark)`
    #[default]
    Media,
    /// A `.dark` class on an ancestor.
    Class,
}

/// Config keys and the theme namespace they populate.
const CONFIG_NAMESPACES: &[(&str, &str)] = &[
    ("colors", "color"),
    ("spacing", "spacing"),
    ("borderRadius", "radius"),
    ("fontSize", "text"),
    ("fontWeight", "font-weight"),
    ("fontFamily", "font"),
    ("boxShadow", "shadow"),
    ("screens", "breakpoint"),
    ("maxWidth", "container"),
    ("animation", "animate"),
];

/// Namespaces that share a prefix with a shorter one.
const NESTED_NAMESPACES: &[&str] = &["font-weight"];

const PALETTE: &[(&str, [&str; 10])] = &[
    (
        "slate",
        ["#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155", "#1e293b", "#0f172a"],
    ),
    (
        "gray",
        ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827"],
    ),
    (
        "red",
        ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d"],
    ),
    (
        "amber",
        ["#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309", "#92400e", "#78350f"],
    ),
    (
        "green",
        ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d"],
    ),
    (
        "blue",
        ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a"],
    ),
];

const SHADES: [&str; 10] = ["50", "100", "200", "300", "400", "500", "600", "700", "800", "900"];

const DEFAULTS: &[(&str, &str)] = &[
    ("--color-black", "#000"),
    ("--color-white", "#fff"),
    ("--spacing", "0.25rem"),
    ("--breakpoint-sm", "40rem"),
    ("--breakpoint-md", "48rem"),
    ("--breakpoint-lg", "64rem"),
    ("--breakpoint-xl", "80rem"),
    ("--breakpoint-2xl", "96rem"),
    ("--container-xs", "20rem"),
    ("--container-sm", "24rem"),
    ("--container-md", "28rem"),
    ("--container-lg", "32rem"),
    ("--container-xl", "36rem"),
    ("--container-2xl", "42rem"),
    ("--container-3xl", "48rem"),
    ("--container-4xl", "56rem"),
    ("--container-5xl", "64rem"),
    ("--container-6xl", "72rem"),
    ("--container-7xl", "80rem"),
    ("--text-xs", "0.75rem"),
    ("--text-xs--line-height", "calc(1 / 0.75)"),
    ("--text-sm", "0.875rem"),
    ("--text-sm--line-height", "calc(1.25 / 0.875)"),
    ("--text-base", "1rem"),
    ("--text-base--line-height", "calc(1.5 / 1)"),
    ("--text-lg", "1.125rem"),
    ("--text-lg--line-height", "calc(1.75 / 1.125)"),
    ("--text-xl", "1.25rem"),
    ("--text-xl--line-height", "calc(1.75 / 1.25)"),
    ("--text-2xl", "1.5rem"),
    ("--text-2xl--line-height", "calc(2 / 1.5)"),
    ("--text-3xl", "1.875rem"),
    ("--text-3xl--line-height", "calc(2.25 / 1.875)"),
    ("--text-4xl", "2.25rem"),
    ("--text-4xl--line-height", "calc(2.5 / 2.25)"),
    ("--font-sans", "ui-sans-serif, system-ui, sans-serif"),
    ("--font-serif", "ui-serif, Georgia, serif"),
    ("--font-mono", "ui-monospace, SFMono-Regular, Menlo, monospace"),
    ("--font-weight-thin", "100"),
    ("--font-weight-light", "300"),
    ("--font-weight-normal", "400"),
    ("--font-weight-medium", "500"),
    ("--font-weight-semibold", "600"),
    ("--font-weight-bold", "700"),
    ("--font-weight-extrabold", "800"),
    ("--font-weight-black", "900"),
    ("--radius-xs", "0.125rem"),
    ("--radius-sm", "0.25rem"),
    ("--radius-md", "0.375rem"),
    ("--radius-lg", "0.5rem"),
    ("--radius-xl", "0.75rem"),
    ("--radius-2xl", "1rem"),
    ("--shadow-sm", "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)"),
    ("--shadow-md", "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)"),
    ("--shadow-lg", "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)"),
    ("--shadow-xl", "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)"),
    ("--animate-spin", "spin 1s linear infinite"),
    ("--animate-ping", "ping 1s cubic-bezier(0, 0, 0.2, 1) infinite"),
    ("--animate-pulse", "pulse 2s cubic-bezier(0.4, 0, 0.6, 1) infinite"),
];

#[derive(Debug, Clone, Default)]
pub struct Theme {
    vars: BTreeMap<String, String>,
    keyframes: BTreeMap<String, AtRule>,
    pub dark_mode: DarkMode,
}

impl Theme {
    /// The built-in design tokens.
    pub fn builtin() -> Self {
        let mut theme = Self::default();
        for (name, value) in DEFAULTS {
            theme.set(name, value);
        }
        for (color, shades) in PALETTE {
            for (shade, value) in SHADES.iter().zip(shades) {
                theme.set(&format!("--color-{color}-{shade}"), value);
            }
        }
        theme.add_keyframes(keyframes(
            "spin",
            &[("to", &[("transform", "rotate(360deg)")])],
        ));
        theme.add_keyframes(keyframes(
            "ping",
            &[("75%, 100%", &[("transform", "scale(2)"), ("opacity", "0")])],
        ));
        theme.add_keyframes(keyframes("pulse", &[("50%", &[("opacity", "0.5")])]));
        theme
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// `var(--{namespace}-{key})` when the token exists.
    pub fn lookup(&self, namespace: &str, key: &str) -> Option<String> {
        let name = format!("--{namespace}-{key}");
        self.vars.contains_key(&name).then(|| format!("var({name})"))
    }

    pub fn add_keyframes(&mut self, rule: AtRule) {
        self.keyframes.insert(rule.params.clone(), rule);
    }

    /// Drop every `--{namespace}-*` token, leaving tokens of longer
    /// namespaces that share the prefix (`--font-weight-*` under `font`).
    pub fn clear_namespace(&mut self, namespace: &str) {
        let prefix = format!("--{namespace}-");
        let keep: Vec<String> = NESTED_NAMESPACES
            .iter()
            .filter(|nested| nested.starts_with(&format!("{namespace}-")))
            .map(|nested| format!("--{nested}-"))
            .collect();
        self.vars.retain(|name, _| {
            !name.starts_with(&prefix) || keep.iter().any(|k| name.starts_with(k))
        });
    }

    /// Breakpoints ordered from narrowest to widest.
    pub fn breakpoints(&self) -> Vec<(String, String)> {
        let mut points: Vec<(String, String)> = self
            .vars
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix("--breakpoint-")
                    .map(|bp| (bp.to_string(), value.clone()))
            })
            .collect();
        points.sort_by(|a, b| {
            length_in_px(&a.1)
                .partial_cmp(&length_in_px(&b.1))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        points
    }

    /// Merge a JSON config module (`{ theme: { ..., extend: { ... } }, darkMode }`).
    /// Top-level theme keys replace their namespace; `extend` keys add to it.
    pub fn apply_config(&mut self, config: &Value) {
        if let Some(mode) = config.get("darkMode") {
            self.dark_mode = dark_mode_from(mode);
        }

        let Some(theme) = config.get("theme").and_then(Value::as_object) else {
            return;
        };

        for (key, value) in theme {
            if key == "extend" {
                continue;
            }
            if key == "keyframes" {
                self.keyframes.clear();
                self.insert_keyframes(value);
            } else if let Some(namespace) = namespace_for(key) {
                self.clear_namespace(namespace);
                self.insert_tree(namespace, value);
            }
        }

        if let Some(extend) = theme.get("extend").and_then(Value::as_object) {
            for (key, value) in extend {
                if key == "keyframes" {
                    self.insert_keyframes(value);
                } else if let Some(namespace) = namespace_for(key) {
                    self.insert_tree(namespace, value);
                }
            }
        }
    }

    fn insert_tree(&mut self, prefix: &str, value: &Value) {
        match value {
            Value::String(s) => self.set(&format!("--{prefix}"), s),
            Value::Number(n) => self.set(&format!("--{prefix}"), &n.to_string()),
            // fontSize: ["1.125rem", { "lineHeight": "1.75rem" }]
            Value::Array(items) if prefix.starts_with("text-") => {
                if let Some(size) = items.first().and_then(Value::as_str) {
                    self.set(&format!("--{prefix}"), size);
                }
                let line_height = items
                    .get(1)
                    .and_then(|opts| opts.get("lineHeight").or(Some(opts)))
                    .and_then(Value::as_str);
                if let Some(lh) = line_height {
                    self.set(&format!("--{prefix}--line-height"), lh);
                }
            }
            // fontFamily: ["Inter", "sans-serif"]
            Value::Array(items) => {
                let joined: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                if !joined.is_empty() {
                    self.set(&format!("--{prefix}"), &joined.join(", "));
                }
            }
            Value::Object(map) => {
                for (key, child) in map {
                    if key == "DEFAULT" {
                        self.insert_tree(prefix, child);
                    } else {
                        self.insert_tree(&format!("{prefix}-{key}"), child);
                    }
                }
            }
            _ => {}
        }
    }

    fn insert_keyframes(&mut self, value: &Value) {
        let Some(map) = value.as_object() else {
            return;
        };
        for (name, steps) in map {
            let Some(steps) = steps.as_object() else {
                continue;
            };
            let rules = steps
                .iter()
                .map(|(selector, decls)| {
                    let decls = declarations_from_json(decls).into_iter().map(Node::from).collect();
                    Rule::new(selector.clone(), decls).into()
                })
                .collect();
            self.add_keyframes(AtRule::block("keyframes", name.clone(), rules));
        }
    }

    /// Theme variables referenced from `nodes`, followed transitively
    /// through the values of the variables themselves.
    pub fn referenced(&self, nodes: &[Node]) -> Vec<(String, String)> {
        let mut pending: Vec<String> = Vec::new();
        collect_var_refs(nodes, &mut pending);

        let mut seen = BTreeSet::new();
        while let Some(name) = pending.pop() {
            let Some(value) = self.vars.get(&name) else {
                continue;
            };
            if !seen.insert(name) {
                continue;
            }
            pending.extend(var_refs(value));
        }

        seen.into_iter()
            .filter_map(|name| self.vars.get(&name).map(|v| (name, v.clone())))
            .collect()
    }

    /// Keyframes named by the first word of referenced `--animate-*` values.
    pub fn keyframes_for(&self, vars: &[(String, String)]) -> Vec<AtRule> {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        for (name, value) in vars {
            if name.starts_with("--animate-") {
                if let Some(first) = value.split_whitespace().next() {
                    names.insert(first);
                }
            }
        }
        names
            .into_iter()
            .filter_map(|name| self.keyframes.get(name).cloned())
            .collect()
    }
}

fn namespace_for(config_key: &str) -> Option<&'static str> {
    CONFIG_NAMESPACES
        .iter()
        .find(|(key, _)| *key == config_key)
        .map(|(_, ns)| *ns)
}

fn dark_mode_from(value: &Value) -> DarkMode {
    let mode = match value {
        Value::Array(items) => items.first().and_then(Value::as_str),
        other => other.as_str(),
    };
    match mode {
        Some("class") | Some("selector") => DarkMode::Class,
        _ => DarkMode::Media,
    }
}

/// `{ "backdropFilter": "blur(8px)" }` → `backdrop-filter: blur(8px)`.
pub fn declarations_from_json(value: &Value) -> Vec<Declaration> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(prop, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some(Declaration::new(kebab_case(prop), value))
        })
        .collect()
}

fn kebab_case(prop: &str) -> String {
    if prop.starts_with("--") {
        return prop.to_string();
    }
    let mut out = String::with_capacity(prop.len() + 4);
    for c in prop.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn keyframes(name: &str, steps: &[(&str, &[(&str, &str)])]) -> AtRule {
    let rules = steps
        .iter()
        .map(|(selector, decls)| {
            let decls = decls
                .iter()
                .map(|(prop, value)| Declaration::new(*prop, *value).into())
                .collect();
            Rule::new(*selector, decls).into()
        })
        .collect();
    AtRule::block("keyframes", name, rules)
}

fn var_refs(value: &str) -> impl Iterator<Item = String> + '_ {
    VAR_REFERENCE
        .captures_iter(value)
        .map(|caps| caps[1].to_string())
}

fn collect_var_refs(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Decl(decl) => out.extend(var_refs(&decl.value)),
            Node::Rule(rule) => collect_var_refs(&rule.nodes, out),
            Node::AtRule(at) => {
                out.extend(var_refs(&at.params));
                if let Some(children) = &at.nodes {
                    collect_var_refs(children, out);
                }
            }
            Node::Comment(_) => {}
        }
    }
}

fn length_in_px(value: &str) -> f64 {
    let value = value.trim();
    let (number, scale) = if let Some(n) = value.strip_suffix("rem") {
        (n, 16.0)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, 16.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else {
        (value, 1.0)
    };
    number.trim().parse::<f64>().map(|n| n * scale).unwrap_or(f64::MAX)
}
