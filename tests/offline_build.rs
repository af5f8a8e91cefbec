use std::fs;
use std::path::{Path, PathBuf};

use offline_css::ast::{Node, Root};
use offline_css::config::ProjectConfig;
use offline_css::{build_project, Orchestrator, UtilityEngine};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn selectors(nodes: &[Node]) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Rule(rule) => out.push(rule.selector.clone()),
            Node::AtRule(at) => {
                if let Some(children) = &at.nodes {
                    out.extend(selectors(children));
                }
            }
            _ => {}
        }
    }
    out
}

#[tokio::test]
async fn scanned_classes_become_rules() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app/globals.css", "@import \"tailwindcss\";\n");
    write(
        dir.path(),
        "app/page.tsx",
        r#"export default () => <h1 className="text-lg font-bold">Hi</h1>;"#,
    );

    let orchestrator = Orchestrator::new(dir.path(), ProjectConfig::default(), UtilityEngine::default());
    let mut root = Root::new(vec![Node::Comment(" previous build ".into())]);
    let summary = orchestrator.run(&mut root).await.unwrap();

    let selectors = selectors(&root.nodes);
    assert!(selectors.contains(&".text-lg".to_string()), "{selectors:?}");
    assert!(selectors.contains(&".font-bold".to_string()), "{selectors:?}");
    assert!(!selectors.contains(&".italic".to_string()));
    assert!(!selectors.contains(&".flex".to_string()));
    assert!(!root.nodes.contains(&Node::Comment(" previous build ".into())));
    assert_eq!(summary.nodes, root.nodes.len());
}

#[tokio::test]
async fn fixture_project_builds() {
    let css = build_project(&fixture("trace-ui"))
        .await
        .unwrap_or_else(|e| panic!("trace-ui failed to build: {e}"));

    for expected in [
        ".flex {\n  display: flex;\n}",
        ".rounded-lg {\n  border-radius: var(--radius-lg);\n}",
        "--radius-lg: 0.75rem;",
        "--color-brand-500: #215ffd;",
        "--shadow-brand: 0 15px 40px -20px rgba(33, 95, 253, 0.65);",
        ".dark\\:bg-brand-900:where(.dark, .dark *) {",
        ".hover\\:bg-brand-600:hover {",
        ".disabled\\:cursor-not-allowed:disabled {",
        "@media (width >= 48rem) {\n  .md\\:p-10 {",
        "@keyframes fade-in {",
        "  body {\n    background-color: var(--color-background);\n    color: var(--color-foreground);\n",
    ] {
        assert!(css.contains(expected), "missing {expected:?} in:\n{css}");
    }

    assert!(!css.contains("@config"));
    assert!(!css.contains("@apply"));
    assert!(!css.contains("tracking-tight"), "unknown utilities are dropped");
    assert!(!css.contains("--color-red-500"), "unreferenced theme variables are dropped");
    assert!(!css.contains("traces.internal"));
}

#[tokio::test]
async fn rebuilds_are_identical() {
    let first = build_project(&fixture("trace-ui")).await.unwrap();
    let second = build_project(&fixture("trace-ui")).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn output_reparses_to_the_same_tree() {
    let css = build_project(&fixture("trace-ui")).await.unwrap();
    let reparsed = offline_css::parser::parse(&css).unwrap();
    assert_eq!(reparsed.to_css(), css);
}

#[tokio::test]
async fn failed_build_keeps_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app/globals.css", "@import \"./missing.css\";\n");
    write(dir.path(), "app/page.tsx", r#"const c = "flex";"#);

    let orchestrator = Orchestrator::load(dir.path(), UtilityEngine::default()).unwrap();
    let before = Root::new(vec![Node::Comment(" keep ".into())]);
    let mut root = before.clone();

    let err = orchestrator.run(&mut root).await.unwrap_err();
    assert!(err.to_string().contains("./missing.css"), "{err}");
    assert_eq!(root, before);
}
