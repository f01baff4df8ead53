//! Command-line front end: load an image, equalize it, write a JPEG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use histeq_rust::filters::histogram::{histogram_bounds, Histogram};
use histeq_rust::{list_sample_images, load_image, process, save_jpeg, EqualizerConfig, Method};

#[derive(Debug, Parser)]
#[command(name = "histeq", about = "Histogram equalization for color images")]
struct Args {
    /// Input image (JPEG or PNG)
    #[arg(required_unless_present = "list_samples")]
    input: Option<PathBuf>,

    /// Equalization method: rgb, hsv or clahe
    #[arg(short, long)]
    method: Option<String>,

    /// Directory for the processed JPEG
    #[arg(short, long, default_value = "processed")]
    output_dir: PathBuf,

    /// Output file name (defaults to equalized_<method>.jpg)
    #[arg(long)]
    file_name: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JPEG quality, 1-100
    #[arg(short, long)]
    quality: Option<u8>,

    /// CLAHE clip limit
    #[arg(long)]
    clip_limit: Option<f32>,

    /// CLAHE tile grid size (N x N)
    #[arg(long)]
    tiles: Option<usize>,

    /// List sample images in a directory and exit
    #[arg(long, value_name = "DIR")]
    list_samples: Option<PathBuf>,
}

fn summarize(name: &str, hist: &Histogram) -> String {
    match histogram_bounds(hist) {
        Some((low, high)) => {
            let peak = hist
                .iter()
                .enumerate()
                .max_by_key(|&(_, &count)| count)
                .map(|(i, _)| i)
                .unwrap_or(0);
            format!("{name}: range {low}-{high}, peak at {peak}")
        }
        None => format!("{name}: empty"),
    }
}

fn build_config(args: &Args) -> Result<EqualizerConfig> {
    let mut config = match &args.config {
        Some(path) => EqualizerConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EqualizerConfig::default(),
    };
    if let Some(method) = &args.method {
        config.method = method.parse::<Method>()?;
    }
    if let Some(quality) = args.quality {
        config.jpeg_quality = quality;
    }
    if let Some(clip_limit) = args.clip_limit {
        config.clahe.clip_limit = clip_limit;
    }
    if let Some(tiles) = args.tiles {
        config.clahe.tile_grid = (tiles, tiles);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if let Some(dir) = &args.list_samples {
        let samples = list_sample_images(dir)
            .with_context(|| format!("failed to list samples in {}", dir.display()))?;
        for path in samples {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let config = build_config(&args)?;
    let input = args
        .input
        .as_ref()
        .context("no input image given")?;

    let image = load_image(input).with_context(|| format!("failed to load {}", input.display()))?;
    let result = process(image.view(), config.method, &config)?;

    let file_name = args
        .file_name
        .clone()
        .unwrap_or_else(|| result.download_file_name());
    let path = save_jpeg(result.image.view(), &args.output_dir, &file_name, config.jpeg_quality)
        .with_context(|| format!("failed to write into {}", args.output_dir.display()))?;

    info!(method = %result.method, path = %path.display(), "done");
    println!("{}", summarize("Original Histogram", &result.original_histogram));
    println!(
        "{}",
        summarize(&format!("{} Histogram", result.caption()), &result.processed_histogram)
    );
    println!("{}", path.display());
    Ok(())
}
