use super::theme::{DarkMode, Theme};

/// Pseudo-class variants in output order.
const PSEUDO_CLASSES: &[(&str, &str)] = &[
    ("first", ":first-child"),
    ("last", ":last-child"),
    ("odd", ":nth-child(odd)"),
    ("even", ":nth-child(even)"),
    ("visited", ":visited"),
    ("focus-within", ":focus-within"),
    ("hover", ":hover"),
    ("focus", ":focus"),
    ("focus-visible", ":focus-visible"),
    ("active", ":active"),
    ("disabled", ":disabled"),
];

const PLACEHOLDER_RANK: u32 = 50;
const GROUP_RANK: u32 = 60;
const DARK_RANK: u32 = 200;
const MAX_WIDTH_RANK: u32 = 100;
const MIN_WIDTH_RANK: u32 = 150;

/// How a variant changes the generated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    /// Appended to the class selector: `:hover`, `::placeholder`.
    Selector { suffix: String, rank: u32 },
    /// Placed before the class selector as an ancestor: `.group:hover`.
    Ancestor { prefix: String, rank: u32 },
    /// Wraps the rule in `@media`.
    Media { query: String, rank: u32 },
}

impl Variant {
    pub fn rank(&self) -> u32 {
        match self {
            Variant::Selector { rank, .. }
            | Variant::Ancestor { rank, .. }
            | Variant::Media { rank, .. } => *rank,
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, Variant::Media { .. })
    }
}

/// Resolve a variant name against the theme. Unknown names yield `None`,
/// which drops the whole candidate.
pub fn resolve(name: &str, theme: &Theme) -> Option<Variant> {
    if let Some((suffix, rank)) = pseudo_class(name) {
        return Some(Variant::Selector {
            suffix: suffix.to_string(),
            rank,
        });
    }

    if name == "placeholder" {
        return Some(Variant::Selector {
            suffix: "::placeholder".to_string(),
            rank: PLACEHOLDER_RANK,
        });
    }

    if let Some(pseudo) = name.strip_prefix("group-") {
        let (suffix, rank) = pseudo_class(pseudo)?;
        return Some(Variant::Ancestor {
            prefix: format!(".group{suffix}"),
            rank: GROUP_RANK + rank,
        });
    }

    if name == "dark" {
        return Some(match theme.dark_mode {
            DarkMode::Class => Variant::Selector {
                suffix: ":where(.dark, .dark *)".to_string(),
                rank: DARK_RANK,
            },
            DarkMode::Media => Variant::Media {
                query: "(prefers-color-scheme: dark)".to_string(),
                rank: DARK_RANK,
            },
        });
    }

    let breakpoints = theme.breakpoints();
    if let Some(bp) = name.strip_prefix("max-") {
        let (index, (_, width)) = breakpoints.iter().enumerate().find(|(_, (n, _))| n == bp)?;
        return Some(Variant::Media {
            query: format!("(width < {width})"),
            rank: MAX_WIDTH_RANK + (breakpoints.len() - index) as u32,
        });
    }
    let (index, (_, width)) = breakpoints.iter().enumerate().find(|(_, (n, _))| n == name)?;
    Some(Variant::Media {
        query: format!("(width >= {width})"),
        rank: MIN_WIDTH_RANK + index as u32,
    })
}

fn pseudo_class(name: &str) -> Option<(&'static str, u32)> {
    PSEUDO_CLASSES
        .iter()
        .position(|(n, _)| *n == name)
        .map(|i| (PSEUDO_CLASSES[i].1, i as u32 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_classes() {
        let theme = Theme::builtin();
        assert_eq!(
            resolve("hover", &theme),
            Some(Variant::Selector {
                suffix: ":hover".into(),
                rank: 7
            })
        );
        assert!(resolve("focus-visible", &theme).is_some());
        assert!(resolve("group-hover", &theme).is_some_and(|v| matches!(v, Variant::Ancestor { .. })));
        assert_eq!(resolve("wiggle", &theme), None);
    }

    #[test]
    fn breakpoints_from_theme() {
        let mut theme = Theme::builtin();
        let md = resolve("md", &theme).unwrap();
        assert_eq!(
            md,
            Variant::Media {
                query: "(width >= 48rem)".into(),
                rank: MIN_WIDTH_RANK + 1
            }
        );
        assert!(resolve("sm", &theme).unwrap().rank() < md.rank());
        assert!(matches!(resolve("max-md", &theme), Some(Variant::Media { query, .. }) if query == "(width < 48rem)"));

        theme.set("--breakpoint-3xl", "120rem");
        assert!(resolve("3xl", &theme).is_some());
    }

    #[test]
    fn dark_follows_mode() {
        let mut theme = Theme::builtin();
        assert!(resolve("dark", &theme).unwrap().is_media());
        theme.dark_mode = DarkMode::Class;
        assert_eq!(
            resolve("dark", &theme),
            Some(Variant::Selector {
                suffix: ":where(.dark, .dark *)".into(),
                rank: DARK_RANK
            })
        );
    }
}
