pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod orchestrator;
pub mod parser;
pub mod printer;
pub mod resolver;
pub mod scan;
pub mod token;

use std::path::Path;

use ast::Root;
use config::ProjectConfig;
use error::Result;
use scan::CandidateCollector;

pub use engine::UtilityEngine;
pub use orchestrator::{BuildSummary, Orchestrator};

/// Compile the project at `project_root` with the built-in engine and
/// return the stylesheet text.
pub async fn build_project(project_root: &Path) -> Result<String> {
    let orchestrator = Orchestrator::load(project_root, UtilityEngine::default())?;
    let mut root = Root::default();
    orchestrator.run(&mut root).await?;
    Ok(root.to_css())
}

/// Scan the project at `project_root` for candidates without compiling.
pub async fn scan_project(project_root: &Path) -> Result<Vec<String>> {
    let config = ProjectConfig::load(project_root)?;
    CandidateCollector::from_config(&config)
        .collect(project_root)
        .await
}
