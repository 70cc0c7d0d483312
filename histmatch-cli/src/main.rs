use clap::Parser;
use histmatch::io::load_rgb_image;
use histmatch::{bmp, Binning, Image, MatchResult, Rgb, ScanConfig, Scanner};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Histogram template locator (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ScanConfigJson {
    horizontal_stride: usize,
    vertical_stride: usize,
    thresholds: Vec<u8>,
    incremental: bool,
    parallel: bool,
}

impl Default for ScanConfigJson {
    fn default() -> Self {
        let cfg = ScanConfig::default();
        Self {
            horizontal_stride: cfg.horizontal_stride,
            vertical_stride: cfg.vertical_stride,
            thresholds: cfg.binning.thresholds().to_vec(),
            incremental: cfg.incremental,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    source_path: String,
    target_path: String,
    output_path: Option<String>,
    annotated_path: Option<String>,
    scan: ScanConfigJson,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    distance: u64,
    corners: String,
}

impl From<MatchResult> for MatchRecord {
    fn from(value: MatchResult) -> Self {
        Self {
            x: value.rect.x(),
            y: value.rect.y(),
            width: value.rect.width(),
            height: value.rect.height(),
            distance: value.distance,
            corners: value.rect.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    best: Option<MatchRecord>,
}

/// BMP files go through the built-in codec; anything else (a PNG capture,
/// say) through the `image` crate.
fn load_image(path: &str) -> Result<Image, Box<dyn std::error::Error>> {
    let is_bmp = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
    let image = if is_bmp {
        bmp::decode_file(path)?
    } else {
        load_rgb_image(path)?
    };
    tracing::info!(path, width = image.width(), height = image.height(), "loaded image");
    Ok(image)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("histmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.source_path.is_empty() || config.target_path.is_empty() {
        return Err("source_path and target_path must be set in the config".into());
    }

    let source = load_image(&config.source_path)?;
    let target = load_image(&config.target_path)?;

    let scanner = Scanner::new(&target).with_config(ScanConfig {
        horizontal_stride: config.scan.horizontal_stride,
        vertical_stride: config.scan.vertical_stride,
        binning: Binning::new(config.scan.thresholds)?,
        incremental: config.scan.incremental,
        parallel: config.scan.parallel,
    });
    tracing::info!(query = %scanner.query(), "target histogram");

    let best = scanner.locate(&source)?;
    match best {
        Some(found) => tracing::info!(rect = %found.rect, distance = found.distance, "match"),
        None => tracing::info!("target does not fit inside the source"),
    }

    if let (Some(path), Some(found)) = (&config.annotated_path, best) {
        let marked = source.with_region_marked(&found.rect, Rgb::RED);
        bmp::encode_file(&marked, path)?;
    }

    let output = Output {
        best: best.map(MatchRecord::from),
    };
    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
