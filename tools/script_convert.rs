//! Script Convert: turns script text into export JSON and a layout document.
//!
//! Usage: script_convert --scene <n> --sequence <id> [--title <t>]
//!                       [--layout-config <path>] [--out <dir>] <script_file>...
//!
//! Writes `<out>/SCENE_NN_SEQUENCE_ID.json` per script and one merged
//! `<out>/layout.json` for the design-tool importer. Each script may also
//! be given as `<scene>:<sequence>=<file>` to place it individually.

use dialogue_engine::core::pipeline::DialogueEngine;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

struct Input {
    scene: String,
    sequence: String,
    path: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut scene = "1".to_string();
    let mut sequence = "01".to_string();
    let mut title = String::new();
    let mut layout_config = None;
    let mut out_dir = PathBuf::from(".");
    let mut inputs = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scene" if i + 1 < args.len() => {
                i += 1;
                scene = args[i].clone();
            }
            "--sequence" if i + 1 < args.len() => {
                i += 1;
                sequence = args[i].clone();
            }
            "--title" if i + 1 < args.len() => {
                i += 1;
                title = args[i].clone();
            }
            "--layout-config" if i + 1 < args.len() => {
                i += 1;
                layout_config = Some(args[i].clone());
            }
            "--out" if i + 1 < args.len() => {
                i += 1;
                out_dir = PathBuf::from(&args[i]);
            }
            arg if arg.starts_with("--") => {
                eprintln!("Unknown argument: {}", arg);
                print_usage();
                process::exit(1);
            }
            arg => inputs.push(parse_input(arg, &scene, &sequence)),
        }
        i += 1;
    }

    if inputs.is_empty() {
        eprintln!("ERROR: no script files given");
        process::exit(1);
    }

    let mut builder = DialogueEngine::builder();
    if let Some(ref path) = layout_config {
        builder = builder.layout_config_path(path);
    }
    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let mut documents = Vec::new();
    for input in &inputs {
        let text = match std::fs::read_to_string(&input.path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("ERROR: Failed to read {}: {}", input.path.display(), e);
                process::exit(1);
            }
        };
        let conversion = engine.convert(&text, &input.scene, &input.sequence, &title);
        for diagnostic in &conversion.diagnostics {
            println!("WARNING: {}: {}", input.path.display(), diagnostic);
        }

        let meta = &conversion.document.metadata;
        let export_path = out_dir.join(format!("{}_{}.json", meta.scene, meta.sequence));
        let export = match serde_json::to_string_pretty(&conversion.document.to_export_json()) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                process::exit(1);
            }
        };
        write_or_exit(&export_path, &export);
        println!(
            "  Wrote: {} ({} dialogues)",
            export_path.display(),
            conversion.document.dialogues.len()
        );
        documents.push(conversion.document);
    }

    match engine.design_document_json(&documents) {
        Ok(json) => {
            let layout_path = out_dir.join("layout.json");
            write_or_exit(&layout_path, &json);
            println!("  Wrote: {}", layout_path.display());
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }
}

/// `2:05A=path.txt` places a file explicitly; a bare path uses the current flags.
fn parse_input(arg: &str, scene: &str, sequence: &str) -> Input {
    if let Some((placement, path)) = arg.split_once('=') {
        if let Some((s, q)) = placement.split_once(':') {
            return Input {
                scene: s.to_string(),
                sequence: q.to_string(),
                path: PathBuf::from(path),
            };
        }
    }
    Input {
        scene: scene.to_string(),
        sequence: sequence.to_string(),
        path: PathBuf::from(arg),
    }
}

fn write_or_exit(path: &Path, contents: &str) {
    if let Err(e) = std::fs::write(path, contents) {
        eprintln!("ERROR: Failed to write {}: {}", path.display(), e);
        process::exit(1);
    }
}

fn print_usage() {
    println!("Usage: script_convert --scene <n> --sequence <id> [--title <t>]");
    println!("                      [--layout-config <path>] [--out <dir>] <script_file>...");
    println!();
    println!("Scripts may be given as <scene>:<sequence>=<file> to place them individually.");
}
