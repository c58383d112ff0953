use clap::{Args, Parser, Subcommand};
use opencv::core::{Mat, Vector};
use opencv::prelude::*;
use std::path::{Path, PathBuf};
use symdetect::config::{load_config_or_default, Config};
use symdetect::visualization::print_results;
use symdetect::{DetectionRecord, SymbolDetector};

#[derive(Parser)]
#[command(name = "symdetect")]
#[command(about = "Square-framed symbol detector: locates square outlines enclosing circular marks")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args)]
struct DetectorArgs {
    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Lower Canny edge threshold
    #[arg(long)]
    edge_low: Option<f64>,

    /// Upper Canny edge threshold
    #[arg(long)]
    edge_high: Option<f64>,

    /// Polygon simplification accuracy (fraction of contour perimeter)
    #[arg(long)]
    poly_accuracy: Option<f64>,

    /// Hough accumulator threshold for circle detection
    #[arg(long)]
    circle_accuracy: Option<f64>,

    /// Extract edges from grayscale only instead of per color channel
    #[arg(long)]
    grayscale_only: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect symbols in an image and print the ranked results
    Detect {
        /// Path to the input image
        image: PathBuf,

        #[command(flatten)]
        params: DetectorArgs,

        /// Write the annotated image to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write detection records as JSON to this path
        #[arg(short, long)]
        json: Option<PathBuf>,
    },

    /// Render every pipeline stage side by side for parameter tuning
    Stages {
        /// Path to the input image
        image: PathBuf,

        #[command(flatten)]
        params: DetectorArgs,

        /// Where to write the stage composite image
        #[arg(short, long, default_value = "stages.png")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Commands::Detect { image, params, output, json } => {
            handle_detect(image, params, output, json)?;
        }
        Commands::Stages { image, params, output } => {
            handle_stages(image, params, output)?;
        }
    }

    Ok(())
}

/// Merge CLI overrides on top of the (file or default) configuration.
fn build_detector(params: &DetectorArgs) -> SymbolDetector {
    let mut config: Config = load_config_or_default(params.config.as_deref());

    if let Some(edge_low) = params.edge_low {
        config.detector.edge_low = edge_low;
    }
    if let Some(edge_high) = params.edge_high {
        config.detector.edge_high = edge_high;
    }
    if let Some(poly_accuracy) = params.poly_accuracy {
        config.detector.poly_accuracy = poly_accuracy;
    }
    if let Some(circle_accuracy) = params.circle_accuracy {
        config.detector.circle_accuracy = circle_accuracy;
    }
    if params.grayscale_only {
        config.detector.grayscale_only = true;
    }

    SymbolDetector::from_config(&config)
}

fn handle_detect(
    image_path: PathBuf,
    params: DetectorArgs,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
) -> anyhow::Result<()> {
    let source = symdetect::load_image(&image_path)?;
    println!(
        "Loaded {}x{} image from {}",
        source.cols(),
        source.rows(),
        image_path.display()
    );

    let detector = build_detector(&params);

    let (results, annotated) = detector.detect_annotated(&source)?;
    print_results(&results);

    if let Some(output_path) = output {
        save_image(&output_path, &annotated)?;
        println!("Annotated image saved to {}", output_path.display());
    }

    if let Some(json_path) = json {
        let records: Vec<DetectionRecord> = results.iter().map(DetectionRecord::from).collect();
        let content = serde_json::to_string_pretty(&records)?;
        std::fs::write(&json_path, content)?;
        println!("Detection records saved to {}", json_path.display());
    }

    Ok(())
}

fn handle_stages(image_path: PathBuf, params: DetectorArgs, output: PathBuf) -> anyhow::Result<()> {
    let source = symdetect::load_image(&image_path)?;
    let detector = build_detector(&params);

    let (results, composite) = detector.detect_stages(&source)?;
    print_results(&results);

    save_image(&output, &composite)?;
    println!("Stage composite saved to {}", output.display());

    Ok(())
}

fn save_image(path: &Path, image: &Mat) -> anyhow::Result<()> {
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Non-UTF-8 output path: {}", path.display()))?;
    let ok = opencv::imgcodecs::imwrite(path_str, image, &Vector::<i32>::new())?;
    if !ok {
        return Err(anyhow::anyhow!("Failed to write image: {}", path.display()));
    }
    Ok(())
}
