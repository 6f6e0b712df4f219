//! argbex CLI — compile a preset and print or export its schedule.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use argbex::config::{self, ShowConfig};
use argbex::dsl::Compiler;

#[derive(Parser)]
#[command(name = "argbex", version, about = "Compile ARGBEX lighting presets")]
struct Args {
    /// Path to the .argbex preset to compile.
    preset: PathBuf,

    /// Dump the full schedule as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Override the maximum actions per second.
    #[arg(long)]
    max_aps: Option<u32>,

    /// Explicit config file (defaults to ~/.argbex/config.yaml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match config::load_from_file(path) {
            Some(config) => config,
            None => {
                eprintln!("failed to read config file {}", path.display());
                process::exit(1);
            }
        },
        None => config::load_default(),
    };
    let ShowConfig { max_aps } = config;
    let max_aps = args.max_aps.unwrap_or(max_aps);

    let source = match std::fs::read_to_string(&args.preset) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("failed to read {}: {e}", args.preset.display());
            process::exit(1);
        }
    };

    let show = match Compiler::compile_with(&source, max_aps) {
        Ok(show) => show,
        Err(e) => {
            eprintln!("{}: {e}", args.preset.display());
            process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&show.timeline) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to serialize schedule: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!(
        "{}: {} sequences, {} playback entries",
        args.preset.display(),
        show.sequence_count,
        show.entry_count
    );
    println!(
        "schedule: {} instants at {} ms step",
        show.timeline.len(),
        show.timeline.step_ms()
    );
    if let Some((first, last)) = show.timeline.span() {
        println!("span: {first} ms .. {last} ms");
    }
}
