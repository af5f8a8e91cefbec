use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use offline_css::ast::Root;
use offline_css::config::ProjectConfig;
use offline_css::error::CssError;
use offline_css::resolver::{Module, ModuleResolver, StylesheetResolver};
use offline_css::scan::CandidateCollector;
use offline_css::{Orchestrator, UtilityEngine};

#[derive(Parser)]
#[command(name = "offcss", version)]
#[command(about = "Offline utility-CSS compiler: scan sources, compile the root stylesheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the project's root stylesheet
    Build {
        /// Project root
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Root stylesheet, relative to the project root (overrides config)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write output to file instead of stdout
        #[arg(short)]
        o: Option<PathBuf>,
    },

    /// List the candidate classes found in the project
    Scan {
        /// Project root
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Print a JSON array instead of one class per line
        #[arg(long)]
        json: bool,
    },

    /// Show where a @config/@plugin (or, with --stylesheet, @import) id resolves
    Resolve {
        /// Module or stylesheet identifier
        id: String,

        /// Requesting file or directory (default: the root stylesheet)
        #[arg(long)]
        from: Option<PathBuf>,

        /// Resolve as a stylesheet import instead of a module
        #[arg(long)]
        stylesheet: bool,

        /// Project root
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Build { root, input, o } => {
            let mut config = load_config(&root);
            if let Some(input) = input {
                config.input = input;
            }
            let orchestrator = Orchestrator::new(&root, config, UtilityEngine::default());

            let mut sheet = Root::default();
            let summary = match rt.block_on(orchestrator.run(&mut sheet)) {
                Ok(s) => s,
                Err(e) => {
                    print_error(&e);
                    process::exit(1);
                }
            };

            let css = sheet.to_css();
            if let Err(e) = write_output(o.as_deref(), &css) {
                eprintln!("error: {e:#}");
                process::exit(1);
            }
            if let Some(out_path) = &o {
                eprintln!(
                    "wrote {} to {} ({} candidates, {} bytes)",
                    orchestrator.input_path().display(),
                    out_path.display(),
                    summary.candidates,
                    css.len()
                );
            }
        }

        Commands::Scan { root, json } => {
            let config = load_config(&root);
            let collector = CandidateCollector::from_config(&config);
            let candidates = match rt.block_on(collector.collect(&root)) {
                Ok(c) => c,
                Err(e) => {
                    print_error(&e);
                    process::exit(1);
                }
            };

            if json {
                match serde_json::to_string_pretty(&candidates) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        eprintln!("error: cannot serialize candidates: {e}");
                        process::exit(1);
                    }
                }
            } else {
                for candidate in &candidates {
                    println!("{candidate}");
                }
            }
            eprintln!("{}: {} candidates", root.display(), candidates.len());
        }

        Commands::Resolve {
            id,
            from,
            stylesheet,
            root,
        } => {
            let config = load_config(&root);
            let from = from.unwrap_or_else(|| root.join(&config.input));

            let result = if stylesheet {
                let from_dir = if from.is_dir() {
                    from.clone()
                } else {
                    from.parent().map(Path::to_path_buf).unwrap_or_default()
                };
                rt.block_on(StylesheetResolver.resolve(&id, &from_dir))
                    .map(|sheet| (sheet.path, "stylesheet"))
            } else {
                let resolver = ModuleResolver::new(&root, &config.root_config);
                rt.block_on(resolver.resolve(&id, &from)).map(|m| {
                    let kind = match m.module {
                        Module::Json(_) => "json",
                        Module::Script { .. } => "script (not executed)",
                    };
                    (m.path, kind)
                })
            };

            match result {
                Ok((path, kind)) => println!("{} [{kind}]", path.display()),
                Err(e) => {
                    print_error(&e);
                    process::exit(1);
                }
            }
        }
    }
}

fn load_config(root: &Path) -> ProjectConfig {
    match ProjectConfig::load(root) {
        Ok(c) => c,
        Err(e) => {
            print_error(&e);
            process::exit(1);
        }
    }
}

fn write_output(path: Option<&Path>, css: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create '{}'", parent.display()))?;
            }
            fs::write(path, css).with_context(|| format!("cannot write '{}'", path.display()))
        }
        None => {
            print!("{css}");
            Ok(())
        }
    }
}

fn print_error(e: &CssError) {
    eprintln!("error: {e}");

    let (Some(span), Some(source)) = (&e.span, &e.source_text) else {
        return;
    };
    if span.start > source.len() || !source.is_char_boundary(span.start) {
        return;
    }

    let line_num = source[..span.start].chars().filter(|c| *c == '\n').count() + 1;
    let line_start = source[..span.start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = source[span.start..]
        .find('\n')
        .map(|i| span.start + i)
        .unwrap_or(source.len());
    let line = &source[line_start..line_end];
    let col = source[line_start..span.start].chars().count();

    eprintln!();
    if let Some(path) = &e.path {
        eprintln!("  --> {}:{line_num}:{}", path.display(), col + 1);
    }
    eprintln!("  {line_num} | {line}");
    eprintln!(
        "  {} | {}^",
        " ".repeat(line_num.to_string().len()),
        " ".repeat(col)
    );
}
