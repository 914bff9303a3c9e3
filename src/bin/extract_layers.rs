//! Extract page layers from a primitive snapshot
//!
//! Reads a document snapshot (JSON), reconstructs the layers of one page and
//! prints them as JSON, or as a short human-readable summary.
//!
//! Usage:
//!   cargo run --release --bin extract_layers -- snapshot.json
//!   cargo run --release --bin extract_layers -- snapshot.json --page 2 --pretty
//!   cargo run --release --bin extract_layers -- snapshot.json --config layers.json --summary
//!
//! Set `RUST_LOG=debug` to trace skipped primitives and merge statistics.

use page_layers::primitives::DocumentSnapshot;
use page_layers::{LayerPipeline, LayerPipelineConfig, PageExtraction};
use std::path::PathBuf;
use std::process::ExitCode;

/// Number of text layers listed by `--summary`.
const SUMMARY_TEXT_LAYERS: usize = 5;

struct CliConfig {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    page: usize,
    pretty: bool,
    summary: bool,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = Self {
            input: None,
            config: None,
            page: 0,
            pretty: false,
            summary: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--page" | "-p" => {
                    i += 1;
                    let value = args.get(i).ok_or("--page needs a value")?;
                    cli.page = value
                        .parse()
                        .map_err(|_| format!("invalid page number: {}", value))?;
                },
                "--config" | "-c" => {
                    i += 1;
                    let value = args.get(i).ok_or("--config needs a value")?;
                    cli.config = Some(PathBuf::from(value));
                },
                "--pretty" => cli.pretty = true,
                "--summary" | "-s" => cli.summary = true,
                other if other.starts_with('-') => {
                    return Err(format!("unknown option: {}", other));
                },
                other => cli.input = Some(PathBuf::from(other)),
            }
            i += 1;
        }

        Ok(cli)
    }
}

fn print_summary(extraction: &PageExtraction) {
    let layers = &extraction.layers;
    let report = &extraction.report;

    println!("Canvas: {} x {}", layers.width, layers.height);
    println!(
        "Layers: {} ({} image, {} path, {} text)",
        layers.layers.len(),
        layers.layers_of_type("image").count(),
        layers.layers_of_type("path").count(),
        layers.layers_of_type("text").count()
    );
    println!(
        "Text blocks merged: {} -> {}",
        report.text_blocks, report.merged_text
    );
    if !report.skipped.is_empty() || report.mask_fallbacks > 0 {
        println!(
            "Skipped primitives: {}, images without mask: {}",
            report.skipped.len(),
            report.mask_fallbacks
        );
    }

    for (layer, text) in layers.text_layers().take(SUMMARY_TEXT_LAYERS) {
        let preview: String = text.text.chars().take(60).collect();
        println!();
        println!("{}: {:?}", layer.id, preview);
        println!("  fontSize: {}", text.font_size);
        println!("  lines: {}", text.line_count());
        println!("  position: ({:.1}, {:.1})", layer.bbox.x, layer.bbox.y);
        println!("  size: {:.1} x {:.1}", layer.bbox.width, layer.bbox.height);
    }
}

fn run(cli: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let input = cli.input.as_ref().ok_or(
        "usage: extract_layers <snapshot.json> [--page N] [--config FILE] [--pretty] [--summary]",
    )?;

    let config = match &cli.config {
        Some(path) => LayerPipelineConfig::from_json_file(path)?,
        None => LayerPipelineConfig::default(),
    };

    let document = DocumentSnapshot::from_json_file(input)?;
    log::info!("Loaded {} ({} pages)", input.display(), document.page_count());

    let extraction = LayerPipeline::with_config(config).process_page(&document, cli.page)?;

    if cli.summary {
        print_summary(&extraction);
    } else if cli.pretty {
        println!("{}", extraction.layers.to_json_pretty()?);
    } else {
        println!("{}", extraction.layers.to_json()?);
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match CliConfig::from_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        },
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
