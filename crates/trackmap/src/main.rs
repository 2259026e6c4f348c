//! trackmap: extract feature coordinates from a hand-painted map image.
//!
//! Scans the image for each feature color (red track, green trees, blue
//! power-ups, magenta lake by default), orders the matching pixels into
//! paths, and prints one coordinate listing per feature.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin trackmap -- [OPTIONS] [IMAGE_PATH]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use trackmap_pipeline::diagnostics::{Clock, process_with_diagnostics};
use trackmap_pipeline::{Coordinate, ExtractConfig};

/// Extract track, tree, power-up, and lake coordinates from a painted map.
///
/// Prints one listing block per feature to stdout, separated by a line
/// of `=`. Progress and warnings go to stderr.
#[derive(Parser)]
#[command(name = "trackmap", version)]
struct Cli {
    /// Path to the painted map image (PNG, JPEG, BMP, WebP).
    #[arg(default_value = "track.png")]
    image_path: PathBuf,

    /// Maximum RGBA distance for a pixel to match a feature color.
    #[arg(long, default_value_t = ExtractConfig::DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Start coordinate of the closed track loop, as `X,Z`.
    #[arg(long, value_parser = parse_coordinate)]
    track_start: Option<Coordinate>,

    /// Full extraction config as a JSON string.
    ///
    /// When provided, `--threshold` and `--track-start` are ignored.
    #[arg(long, conflicts_with = "config")]
    config_json: Option<String>,

    /// Read the full extraction config from a JSON file.
    ///
    /// When provided, `--threshold` and `--track-start` are ignored.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the features as a JSON scene document to this file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print per-feature timing and counts to stderr.
    #[arg(long)]
    diagnostics: bool,

    /// Suppress progress messages (warnings and errors still print).
    #[arg(long, short)]
    quiet: bool,
}

/// Parse an `X,Z` pair into a [`Coordinate`].
fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Z but got {s:?}"))?;
    let x = x
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid X in {s:?}: {e}"))?;
    let z = z
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid Z in {s:?}: {e}"))?;
    Ok(Coordinate::new(x, z))
}

/// Build an [`ExtractConfig`] from CLI arguments.
///
/// A JSON config (inline or from a file) replaces the defaults
/// entirely and the individual flags are ignored. Otherwise the flags
/// are layered on top of [`ExtractConfig::default`].
fn config_from_cli(cli: &Cli) -> Result<ExtractConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }
    if let Some(ref path) = cli.config {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        return serde_json::from_str(&text)
            .map_err(|e| format!("Error parsing {}: {e}", path.display()));
    }

    let config = ExtractConfig {
        threshold: cli.threshold,
        ..ExtractConfig::default()
    };
    Ok(match cli.track_start {
        Some(start) => config.with_loop_start(start),
        None => config,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    if !cli.quiet {
        eprintln!(
            "Image: {} ({} bytes)",
            cli.image_path.display(),
            image_bytes.len(),
        );
        eprintln!(
            "Features: {} (threshold {})",
            config
                .features
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            config.threshold,
        );
    }

    let (result, diagnostics) = match process_with_diagnostics(&image_bytes, &config, &StdClock) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for (name, warning) in result.warnings() {
        eprintln!("Warning: {name}: {warning}");
    }

    print!("{}", trackmap_export::to_listing(&result));

    if cli.diagnostics {
        eprintln!();
        eprintln!("{}", diagnostics.report());
    }

    if let Some(ref json_path) = cli.json {
        let json = match trackmap_export::to_json(&result) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error serializing JSON: {e}");
                return ExitCode::FAILURE;
            }
        };
        match std::fs::write(json_path, &json) {
            Ok(()) => {
                if !cli.quiet {
                    eprintln!(
                        "JSON written to {} ({} bytes)",
                        json_path.display(),
                        json.len(),
                    );
                }
            }
            Err(e) => {
                eprintln!("Error writing JSON to {}: {e}", json_path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
