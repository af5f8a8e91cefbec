//! Utility generation: candidate → declarations.
//!
//! Two kinds of utility exist. Static utilities map one exact name to a
//! fixed list of declarations. Functional utilities are a root (`p`,
//! `text`, `bg`) plus a value resolved against the theme, a small set of
//! keywords, or an arbitrary `[...]` value.

use std::collections::BTreeMap;

use super::candidate::{self, arbitrary, escape_class};
use super::theme::Theme;
use super::variants::{self, Variant};
use crate::ast::{AtRule, Declaration, Node, Rule};

type Decls = &'static [(&'static str, &'static str)];

const STATIC: &[(&str, Decls)] = &[
    ("sr-only", &[
        ("position", "absolute"),
        ("width", "1px"),
        ("height", "1px"),
        ("padding", "0"),
        ("margin", "-1px"),
        ("overflow", "hidden"),
        ("clip", "rect(0, 0, 0, 0)"),
        ("white-space", "nowrap"),
        ("border-width", "0"),
    ]),
    ("static", &[("position", "static")]),
    ("fixed", &[("position", "fixed")]),
    ("absolute", &[("position", "absolute")]),
    ("relative", &[("position", "relative")]),
    ("sticky", &[("position", "sticky")]),
    ("visible", &[("visibility", "visible")]),
    ("invisible", &[("visibility", "hidden")]),
    ("block", &[("display", "block")]),
    ("inline-block", &[("display", "inline-block")]),
    ("inline", &[("display", "inline")]),
    ("flex", &[("display", "flex")]),
    ("inline-flex", &[("display", "inline-flex")]),
    ("grid", &[("display", "grid")]),
    ("inline-grid", &[("display", "inline-grid")]),
    ("contents", &[("display", "contents")]),
    ("table", &[("display", "table")]),
    ("hidden", &[("display", "none")]),
    ("flex-row", &[("flex-direction", "row")]),
    ("flex-row-reverse", &[("flex-direction", "row-reverse")]),
    ("flex-col", &[("flex-direction", "column")]),
    ("flex-col-reverse", &[("flex-direction", "column-reverse")]),
    ("flex-wrap", &[("flex-wrap", "wrap")]),
    ("flex-nowrap", &[("flex-wrap", "nowrap")]),
    ("flex-1", &[("flex", "1")]),
    ("flex-auto", &[("flex", "auto")]),
    ("flex-none", &[("flex", "none")]),
    ("grow", &[("flex-grow", "1")]),
    ("shrink-0", &[("flex-shrink", "0")]),
    ("items-start", &[("align-items", "flex-start")]),
    ("items-end", &[("align-items", "flex-end")]),
    ("items-center", &[("align-items", "center")]),
    ("items-baseline", &[("align-items", "baseline")]),
    ("items-stretch", &[("align-items", "stretch")]),
    ("justify-start", &[("justify-content", "flex-start")]),
    ("justify-end", &[("justify-content", "flex-end")]),
    ("justify-center", &[("justify-content", "center")]),
    ("justify-between", &[("justify-content", "space-between")]),
    ("justify-around", &[("justify-content", "space-around")]),
    ("self-start", &[("align-self", "flex-start")]),
    ("self-center", &[("align-self", "center")]),
    ("self-end", &[("align-self", "flex-end")]),
    ("overflow-auto", &[("overflow", "auto")]),
    ("overflow-hidden", &[("overflow", "hidden")]),
    ("overflow-scroll", &[("overflow", "scroll")]),
    ("overflow-x-auto", &[("overflow-x", "auto")]),
    ("overflow-y-auto", &[("overflow-y", "auto")]),
    ("truncate", &[
        ("overflow", "hidden"),
        ("text-overflow", "ellipsis"),
        ("white-space", "nowrap"),
    ]),
    ("whitespace-nowrap", &[("white-space", "nowrap")]),
    ("whitespace-pre-wrap", &[("white-space", "pre-wrap")]),
    ("break-all", &[("word-break", "break-all")]),
    ("text-left", &[("text-align", "left")]),
    ("text-center", &[("text-align", "center")]),
    ("text-right", &[("text-align", "right")]),
    ("uppercase", &[("text-transform", "uppercase")]),
    ("lowercase", &[("text-transform", "lowercase")]),
    ("capitalize", &[("text-transform", "capitalize")]),
    ("italic", &[("font-style", "italic")]),
    ("underline", &[("text-decoration-line", "underline")]),
    ("line-through", &[("text-decoration-line", "line-through")]),
    ("no-underline", &[("text-decoration-line", "none")]),
    ("tabular-nums", &[("font-variant-numeric", "tabular-nums")]),
    ("antialiased", &[
        ("-webkit-font-smoothing", "antialiased"),
        ("-moz-osx-font-smoothing", "grayscale"),
    ]),
    ("border-solid", &[("border-style", "solid")]),
    ("border-dashed", &[("border-style", "dashed")]),
    ("border-none", &[("border-style", "none")]),
    ("outline-none", &[
        ("outline", "2px solid transparent"),
        ("outline-offset", "2px"),
    ]),
    ("cursor-pointer", &[("cursor", "pointer")]),
    ("cursor-default", &[("cursor", "default")]),
    ("cursor-not-allowed", &[("cursor", "not-allowed")]),
    ("pointer-events-none", &[("pointer-events", "none")]),
    ("select-none", &[("user-select", "none")]),
    ("resize-none", &[("resize", "none")]),
    ("object-cover", &[("object-fit", "cover")]),
    ("object-contain", &[("object-fit", "contain")]),
    ("transition", &[
        ("transition-property", "color, background-color, border-color, text-decoration-color, fill, stroke, opacity, box-shadow, transform"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
    ("transition-colors", &[
        ("transition-property", "color, background-color, border-color, text-decoration-color, fill, stroke"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
];

/// Extra spacing keywords a root accepts on top of the numeric scale.
type Keywords = &'static [(&'static str, &'static str)];

const NO_KEYWORDS: Keywords = &[];
const MARGIN_KEYWORDS: Keywords = &[("auto", "auto")];
const INSET_KEYWORDS: Keywords = &[("auto", "auto"), ("full", "100%")];
const WIDTH_KEYWORDS: Keywords = &[
    ("auto", "auto"),
    ("full", "100%"),
    ("screen", "100vw"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];
const HEIGHT_KEYWORDS: Keywords = &[
    ("auto", "auto"),
    ("full", "100%"),
    ("screen", "100vh"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];
const MAX_KEYWORDS: Keywords = &[("none", "none"), ("full", "100%"), ("screen", "100vw")];

const LEADING: Keywords = &[
    ("none", "1"),
    ("tight", "1.25"),
    ("snug", "1.375"),
    ("normal", "1.5"),
    ("relaxed", "1.625"),
    ("loose", "2"),
];

/// What a functional root does with its value.
#[derive(Debug, Clone, Copy)]
enum Kind {
    /// Spacing-scale value for each listed property.
    Spacing {
        props: &'static [&'static str],
        keywords: Keywords,
        negative: bool,
        fractions: bool,
    },
    /// Like `Spacing` but also accepts container sizes (`max-w-md`).
    Container {
        props: &'static [&'static str],
        keywords: Keywords,
    },
    Text,
    Background,
    Border(&'static [&'static str]),
    Rounded,
    Shadow,
    Font,
    Opacity,
    ZIndex,
    Leading,
    GridCols,
    ColSpan,
    Animate,
    Duration,
}

const fn spacing(props: &'static [&'static str], keywords: Keywords, negative: bool) -> Kind {
    Kind::Spacing {
        props,
        keywords,
        negative,
        fractions: false,
    }
}

const fn sizing(props: &'static [&'static str], keywords: Keywords, negative: bool) -> Kind {
    Kind::Spacing {
        props,
        keywords,
        negative,
        fractions: true,
    }
}

/// Roots in output order. Where one root prefixes another (`gap-x`,
/// `gap`), the longer one is listed first.
const FUNCTIONAL: &[(&str, Kind)] = &[
    ("inset-x", sizing(&["left", "right"], INSET_KEYWORDS, true)),
    ("inset-y", sizing(&["top", "bottom"], INSET_KEYWORDS, true)),
    ("inset", sizing(&["inset"], INSET_KEYWORDS, true)),
    ("top", sizing(&["top"], INSET_KEYWORDS, true)),
    ("right", sizing(&["right"], INSET_KEYWORDS, true)),
    ("bottom", sizing(&["bottom"], INSET_KEYWORDS, true)),
    ("left", sizing(&["left"], INSET_KEYWORDS, true)),
    ("z", Kind::ZIndex),
    ("col-span", Kind::ColSpan),
    ("mx", spacing(&["margin-left", "margin-right"], MARGIN_KEYWORDS, true)),
    ("my", spacing(&["margin-top", "margin-bottom"], MARGIN_KEYWORDS, true)),
    ("mt", spacing(&["margin-top"], MARGIN_KEYWORDS, true)),
    ("mr", spacing(&["margin-right"], MARGIN_KEYWORDS, true)),
    ("mb", spacing(&["margin-bottom"], MARGIN_KEYWORDS, true)),
    ("ml", spacing(&["margin-left"], MARGIN_KEYWORDS, true)),
    ("m", spacing(&["margin"], MARGIN_KEYWORDS, true)),
    ("size", sizing(&["width", "height"], WIDTH_KEYWORDS, false)),
    ("min-w", Kind::Container { props: &["min-width"], keywords: WIDTH_KEYWORDS }),
    ("max-w", Kind::Container { props: &["max-width"], keywords: MAX_KEYWORDS }),
    ("w", Kind::Container { props: &["width"], keywords: WIDTH_KEYWORDS }),
    ("min-h", sizing(&["min-height"], HEIGHT_KEYWORDS, false)),
    ("max-h", sizing(&["max-height"], HEIGHT_KEYWORDS, false)),
    ("h", sizing(&["height"], HEIGHT_KEYWORDS, false)),
    ("basis", sizing(&["flex-basis"], WIDTH_KEYWORDS, false)),
    ("grid-cols", Kind::GridCols),
    ("gap-x", spacing(&["column-gap"], NO_KEYWORDS, false)),
    ("gap-y", spacing(&["row-gap"], NO_KEYWORDS, false)),
    ("gap", spacing(&["gap"], NO_KEYWORDS, false)),
    ("rounded", Kind::Rounded),
    ("border-t", Kind::Border(&["border-top"])),
    ("border-r", Kind::Border(&["border-right"])),
    ("border-b", Kind::Border(&["border-bottom"])),
    ("border-l", Kind::Border(&["border-left"])),
    ("border", Kind::Border(&["border"])),
    ("bg", Kind::Background),
    ("px", spacing(&["padding-left", "padding-right"], NO_KEYWORDS, false)),
    ("py", spacing(&["padding-top", "padding-bottom"], NO_KEYWORDS, false)),
    ("pt", spacing(&["padding-top"], NO_KEYWORDS, false)),
    ("pr", spacing(&["padding-right"], NO_KEYWORDS, false)),
    ("pb", spacing(&["padding-bottom"], NO_KEYWORDS, false)),
    ("pl", spacing(&["padding-left"], NO_KEYWORDS, false)),
    ("p", spacing(&["padding"], NO_KEYWORDS, false)),
    ("font", Kind::Font),
    ("text", Kind::Text),
    ("leading", Kind::Leading),
    ("opacity", Kind::Opacity),
    ("shadow", Kind::Shadow),
    ("animate", Kind::Animate),
    ("duration", Kind::Duration),
];

/// Plugin order sorts after every built-in utility.
const PLUGIN_ORDER: usize = STATIC.len() + FUNCTIONAL.len();

/// A candidate the engine knows how to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct Utility {
    pub class: String,
    pub variants: Vec<Variant>,
    pub declarations: Vec<Declaration>,
    pub order: usize,
}

impl Utility {
    /// Sort key: media variants, then selector variants, then utility
    /// order, then name.
    pub fn sort_key(&self) -> (u32, u32, usize, &str) {
        let (media, selector) = self.variants.iter().fold((0, 0), |(m, s), v| {
            if v.is_media() {
                (m + v.rank(), s)
            } else {
                (m, s + v.rank())
            }
        });
        (media, selector, self.order, &self.class)
    }

    /// A top-level rule for this class, wrapped in any media variants.
    pub fn to_rule(&self) -> Node {
        let mut selector = format!(".{}", escape_class(&self.class));
        let mut queries = Vec::new();
        for variant in &self.variants {
            match variant {
                Variant::Selector { suffix, .. } => selector.push_str(suffix),
                Variant::Ancestor { prefix, .. } => selector = format!("{prefix} {selector}"),
                Variant::Media { query, .. } => queries.push(query.clone()),
            }
        }
        wrap_media(Rule::new(selector, self.decl_nodes()).into(), &queries)
    }

    /// The body this class contributes to `@apply`: bare declarations when
    /// there are no variants, otherwise nested `&` rules and `@media`.
    pub fn to_applied(&self) -> Vec<Node> {
        if self.variants.is_empty() {
            return self.decl_nodes();
        }
        let mut selector = String::from("&");
        let mut queries = Vec::new();
        for variant in &self.variants {
            match variant {
                Variant::Selector { suffix, .. } => selector.push_str(suffix),
                Variant::Ancestor { prefix, .. } => selector = format!("{prefix} {selector}"),
                Variant::Media { query, .. } => queries.push(query.clone()),
            }
        }
        let inner: Vec<Node> = if selector == "&" {
            self.decl_nodes()
        } else {
            vec![Rule::new(selector, self.decl_nodes()).into()]
        };
        match queries.split_first() {
            None => inner,
            Some((first, rest)) => {
                let innermost = rest.iter().rev().fold(inner, |nodes, query| {
                    vec![AtRule::block("media", query.clone(), nodes).into()]
                });
                vec![AtRule::block("media", first.clone(), innermost).into()]
            }
        }
    }

    fn decl_nodes(&self) -> Vec<Node> {
        self.declarations.iter().cloned().map(Node::from).collect()
    }
}

fn wrap_media(node: Node, queries: &[String]) -> Node {
    queries
        .iter()
        .rev()
        .fold(node, |inner, query| AtRule::block("media", query.clone(), vec![inner]).into())
}

/// Generates utilities against one theme and plugin set.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    pub theme: &'a Theme,
    pub plugins: &'a BTreeMap<String, Vec<Declaration>>,
}

impl<'a> Generator<'a> {
    pub fn new(theme: &'a Theme, plugins: &'a BTreeMap<String, Vec<Declaration>>) -> Self {
        Self { theme, plugins }
    }

    /// Generate a candidate, or `None` when any part of it is unknown.
    pub fn generate(&self, raw: &str) -> Option<Utility> {
        let parsed = candidate::parse(raw)?;
        let variants = parsed
            .variants
            .iter()
            .map(|name| variants::resolve(name, self.theme))
            .collect::<Option<Vec<_>>>()?;
        let (order, mut declarations) = self.declarations(parsed.utility, parsed.negative)?;
        if parsed.important {
            for decl in &mut declarations {
                decl.important = true;
            }
        }
        Some(Utility {
            class: raw.to_string(),
            variants,
            declarations,
            order,
        })
    }

    fn declarations(&self, utility: &str, negative: bool) -> Option<(usize, Vec<Declaration>)> {
        if !negative {
            if let Some((index, decls)) = STATIC
                .iter()
                .enumerate()
                .find_map(|(i, (name, decls))| (*name == utility).then_some((i, decls)))
            {
                let decls = decls.iter().map(|(p, v)| Declaration::new(*p, *v)).collect();
                return Some((index, decls));
            }
            if let Some(decls) = self.plugins.get(utility) {
                return Some((PLUGIN_ORDER, decls.clone()));
            }
        }

        for (index, (root, kind)) in FUNCTIONAL.iter().enumerate() {
            let value = if utility == *root {
                None
            } else if let Some(rest) = utility.strip_prefix(root).and_then(|r| r.strip_prefix('-')) {
                Some(rest)
            } else {
                continue;
            };
            if let Some(decls) = self.functional(*kind, value, negative) {
                return Some((STATIC.len() + index, decls));
            }
        }
        None
    }

    fn functional(&self, kind: Kind, value: Option<&str>, negative: bool) -> Option<Vec<Declaration>> {
        match kind {
            Kind::Spacing {
                props,
                keywords,
                negative: allows_negative,
                fractions,
            } => {
                if negative && !allows_negative {
                    return None;
                }
                let v = self.spacing(value?, keywords, fractions, negative)?;
                Some(each(props, &v))
            }
            Kind::Container { props, keywords } => {
                if negative {
                    return None;
                }
                let value = value?;
                let v = self
                    .theme
                    .lookup("container", value)
                    .or_else(|| self.spacing(value, keywords, true, false))?;
                Some(each(props, &v))
            }
            _ if negative && !matches!(kind, Kind::ZIndex) => None,
            Kind::Text => self.text(value?),
            Kind::Background => {
                let color = self.color(value?)?;
                Some(vec![Declaration::new("background-color", color)])
            }
            Kind::Border(sides) => self.border(sides, value),
            Kind::Rounded => {
                let radius = match value {
                    None => "0.25rem".to_string(),
                    Some("none") => "0".to_string(),
                    Some("full") => "calc(infinity * 1px)".to_string(),
                    Some(v) => self.theme.lookup("radius", v).or_else(|| arbitrary(v))?,
                };
                Some(vec![Declaration::new("border-radius", radius)])
            }
            Kind::Shadow => {
                let shadow = match value {
                    None => self.theme.lookup("shadow", "sm")?,
                    Some("none") => "0 0 #0000".to_string(),
                    Some(v) => self.theme.lookup("shadow", v).or_else(|| arbitrary(v))?,
                };
                Some(vec![Declaration::new("box-shadow", shadow)])
            }
            Kind::Font => {
                let value = value?;
                if let Some(weight) = self.theme.lookup("font-weight", value) {
                    return Some(vec![Declaration::new("font-weight", weight)]);
                }
                if let Some(family) = self.theme.lookup("font", value) {
                    return Some(vec![Declaration::new("font-family", family)]);
                }
                let raw = arbitrary(value)?;
                let prop = if raw.parse::<u32>().is_ok() {
                    "font-weight"
                } else {
                    "font-family"
                };
                Some(vec![Declaration::new(prop, raw)])
            }
            Kind::Opacity => {
                let value = value?;
                let v = match value.parse::<u32>() {
                    Ok(n) if n <= 100 => format!("{n}%"),
                    _ => arbitrary(value)?,
                };
                Some(vec![Declaration::new("opacity", v)])
            }
            Kind::ZIndex => {
                let value = value?;
                let v = match (value, value.parse::<u32>()) {
                    ("auto", _) if !negative => "auto".to_string(),
                    (_, Ok(n)) if negative => format!("-{n}"),
                    (_, Ok(n)) => n.to_string(),
                    _ => negate(arbitrary(value)?, negative),
                };
                Some(vec![Declaration::new("z-index", v)])
            }
            Kind::Leading => {
                let value = value?;
                let v = keyword(LEADING, value)
                    .or_else(|| arbitrary(value))
                    .or_else(|| scale(value).map(|n| format!("calc(var(--spacing) * {n})")))?;
                Some(vec![Declaration::new("line-height", v)])
            }
            Kind::GridCols => {
                let value = value?;
                let v = match (value, value.parse::<u32>()) {
                    ("none", _) => "none".to_string(),
                    (_, Ok(n)) if n > 0 => format!("repeat({n}, minmax(0, 1fr))"),
                    _ => arbitrary(value)?,
                };
                Some(vec![Declaration::new("grid-template-columns", v)])
            }
            Kind::ColSpan => {
                let value = value?;
                let v = match (value, value.parse::<u32>()) {
                    ("full", _) => "1 / -1".to_string(),
                    (_, Ok(n)) if n > 0 => format!("span {n} / span {n}"),
                    _ => arbitrary(value)?,
                };
                Some(vec![Declaration::new("grid-column", v)])
            }
            Kind::Animate => {
                let value = value?;
                let v = match value {
                    "none" => "none".to_string(),
                    v => self.theme.lookup("animate", v).or_else(|| arbitrary(v))?,
                };
                Some(vec![Declaration::new("animation", v)])
            }
            Kind::Duration => {
                let value = value?;
                let v = match value.parse::<u32>() {
                    Ok(n) => format!("{n}ms"),
                    Err(_) => arbitrary(value)?,
                };
                Some(vec![Declaration::new("transition-duration", v)])
            }
        }
    }

    /// Spacing scale: theme `--spacing-{v}`, keyword, `px`, fraction,
    /// multiple of `--spacing`, or arbitrary.
    fn spacing(&self, value: &str, keywords: Keywords, fractions: bool, negative: bool) -> Option<String> {
        if let Some(raw) = arbitrary(value) {
            return Some(negate(raw, negative));
        }
        if let Some(kw) = keyword(keywords, value) {
            return (!negative).then_some(kw);
        }
        if value == "px" {
            return Some(if negative { "-1px" } else { "1px" }.to_string());
        }
        if let Some(themed) = self.theme.lookup("spacing", value) {
            return Some(negate(themed, negative));
        }
        if let Some((num, den)) = value.split_once('/') {
            if !fractions {
                return None;
            }
            let (num, den) = (num.parse::<u32>().ok()?, den.parse::<u32>().ok()?);
            if den == 0 {
                return None;
            }
            return Some(negate(format!("calc({num} / {den} * 100%)"), negative));
        }
        let n = scale(value)?;
        let sign = if negative { "-" } else { "" };
        Some(format!("calc(var(--spacing) * {sign}{n})"))
    }

    fn text(&self, value: &str) -> Option<Vec<Declaration>> {
        if let Some(size) = self.theme.lookup("text", value) {
            let mut decls = vec![Declaration::new("font-size", size)];
            if let Some(lh) = self.theme.lookup("text", &format!("{value}--line-height")) {
                decls.push(Declaration::new("line-height", lh));
            }
            return Some(decls);
        }
        if let Some(color) = self.color(value) {
            return Some(vec![Declaration::new("color", color)]);
        }
        let raw = arbitrary(value)?;
        Some(vec![Declaration::new("font-size", raw)])
    }

    fn border(&self, sides: &[&str], value: Option<&str>) -> Option<Vec<Declaration>> {
        let width = match value {
            None => Some("1px".to_string()),
            Some(v) => match v.parse::<u32>() {
                Ok(n) => Some(format!("{n}px")),
                Err(_) => arbitrary(v).filter(|raw| !looks_like_color(raw)),
            },
        };
        if let Some(width) = width {
            let mut decls = vec![Declaration::new("border-style", "solid")];
            decls.extend(sides.iter().map(|side| Declaration::new(format!("{side}-width"), width.clone())));
            return Some(decls);
        }
        let color = self.color(value?)?;
        Some(
            sides
                .iter()
                .map(|side| Declaration::new(format!("{side}-color"), color.clone()))
                .collect(),
        )
    }

    /// Theme color, keyword, or arbitrary color, with an optional
    /// `/opacity` modifier.
    fn color(&self, value: &str) -> Option<String> {
        let (name, alpha) = match value.rsplit_once('/') {
            Some((name, alpha)) if !value.starts_with('[') || name.ends_with(']') => (name, Some(alpha)),
            _ => (value, None),
        };

        let base = match name {
            "inherit" => "inherit".to_string(),
            "current" => "currentColor".to_string(),
            "transparent" => "transparent".to_string(),
            _ => match self.theme.lookup("color", name) {
                Some(themed) => themed,
                None => arbitrary(name).filter(|raw| looks_like_color(raw))?,
            },
        };

        match alpha {
            None => Some(base),
            Some(alpha) => {
                let percent = match alpha.parse::<u32>() {
                    Ok(n) if n <= 100 => format!("{n}%"),
                    _ => arbitrary(alpha)?,
                };
                Some(format!("color-mix(in oklab, {base} {percent}, transparent)"))
            }
        }
    }
}

fn each(props: &[&str], value: &str) -> Vec<Declaration> {
    props.iter().map(|p| Declaration::new(*p, value)).collect()
}

fn keyword(keywords: Keywords, value: &str) -> Option<String> {
    keywords
        .iter()
        .find(|(k, _)| *k == value)
        .map(|(_, v)| v.to_string())
}

/// A non-negative multiple of 0.25, as written.
fn scale(value: &str) -> Option<&str> {
    let n: f64 = value.parse().ok()?;
    (n.is_finite() && n >= 0.0 && (n * 4.0).fract() == 0.0 && !value.starts_with('+')).then_some(value)
}

fn negate(value: String, negative: bool) -> String {
    if negative {
        format!("calc({value} * -1)")
    } else {
        value
    }
}

fn looks_like_color(raw: &str) -> bool {
    raw.starts_with('#')
        || raw.starts_with("var(--color")
        || ["rgb(", "rgba(", "hsl(", "hsla(", "oklch(", "oklab(", "color-mix("]
            .iter()
            .any(|f| raw.starts_with(f))
}
