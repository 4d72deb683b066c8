//! Script Linter: reports diagnostics for dialogue script files.
//!
//! Usage: script_lint <script_file_or_dir> [--strict]

use dialogue_engine::core::parser::parse;
use dialogue_engine::core::validator::validate;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: script_lint <script_file_or_dir> [--strict]");
        process::exit(0);
    }

    let target = Path::new(&args[1]);
    let strict = args[2..].iter().any(|a| a == "--strict");

    let mut files = Vec::new();
    if target.is_file() {
        files.push(target.to_path_buf());
    } else if target.is_dir() {
        collect_scripts(target, &mut files);
        files.sort();
    } else {
        eprintln!("ERROR: Path '{}' does not exist", target.display());
        process::exit(1);
    }

    println!("\n=== Script Lint Report ===\n");

    let mut total_diagnostics = 0;
    let mut total_nodes = 0;
    for path in &files {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("ERROR: Failed to read {}: {}", path.display(), e);
                process::exit(1);
            }
        };

        let diagnostics = validate(&contents);
        let nodes = parse(&contents);
        total_nodes += nodes.len();
        total_diagnostics += diagnostics.len();

        println!("{} ({} dialogue nodes)", path.display(), nodes.len());
        for diagnostic in &diagnostics {
            println!("  WARNING: {}", diagnostic);
        }
    }

    println!(
        "\nSummary: {} files, {} dialogue nodes, {} diagnostics",
        files.len(),
        total_nodes,
        total_diagnostics
    );

    if strict && total_diagnostics > 0 {
        process::exit(1);
    }
}

fn collect_scripts(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_scripts(&path, files);
            } else if path.extension().and_then(|s| s.to_str()) == Some("txt") {
                files.push(path);
            }
        }
    }
}
