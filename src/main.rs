use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use shr_dither::{DitherAlgorithm, QuantizeMethod, Shr3200, ShrConverter, BLOB_SIZE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iigs_shr::input::{self, ResizeFilter};
use iigs_shr::{preview, server};

#[derive(Parser)]
#[command(name = "iigs-shr")]
#[command(about = "Convert modern images to Apple IIgs Super Hi-Res (.3200) pictures")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Conversion flags shared by `convert` and `batch`.
#[derive(clap::Args, Clone)]
struct ConvertArgs {
    /// Dithering algorithm: atkinson, floyd-steinberg, jjn, stucki,
    /// burkes, ordered, none
    #[arg(short, long, default_value = "atkinson")]
    dither: DitherAlgorithm,

    /// Palette strategy: median-cut, global, optimized
    #[arg(short, long, default_value = "median-cut")]
    quantize: QuantizeMethod,

    /// Palette reuse threshold for the optimized strategy
    #[arg(long, default_value_t = 2000.0)]
    error_threshold: f64,

    /// Bayer matrix side for ordered dithering (2, 4 or 8)
    #[arg(long, default_value_t = 8)]
    bayer_size: u32,

    /// Horizontal aspect correction for non-square IIgs pixels
    #[arg(short, long, default_value_t = 1.2)]
    aspect: f32,

    /// Resampling filter: lanczos, bilinear, nearest
    #[arg(short, long, default_value = "lanczos")]
    resize_filter: ResizeFilter,

    /// Process in gamma-encoded sRGB instead of linear light
    #[arg(long)]
    no_linear: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one image to a .3200 file
    Convert {
        /// Input image (PNG, JPEG, GIF, BMP, ...)
        input: PathBuf,

        /// Output .3200 file
        output: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,

        /// Also write a PNG preview of the converted image
        #[arg(short, long)]
        preview: Option<PathBuf>,
    },
    /// Convert many images into a directory
    Batch {
        /// Input images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for the .3200 files
        #[arg(short, long)]
        output_dir: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,
    },
    /// Inspect a .3200 file
    Info {
        /// The .3200 file to inspect
        input: PathBuf,
    },
    /// Start the HTTP conversion service
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:3000")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            input,
            output,
            args,
            preview,
        }) => {
            init_cli_tracing();
            run_convert(&input, &output, &args, preview.as_deref())
        }
        Some(Commands::Batch {
            inputs,
            output_dir,
            args,
        }) => {
            init_cli_tracing();
            run_batch(&inputs, &output_dir, &args)
        }
        Some(Commands::Info { input }) => {
            init_cli_tracing();
            run_info(&input)
        }
        Some(Commands::Serve { bind }) => {
            init_server_tracing();
            server::run(&bind).await
        }
        None => {
            run_status();
            Ok(())
        }
    }
}

/// Minimal logging for the CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iigs_shr=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Full logging for the HTTP service
fn init_server_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iigs_shr=debug,shr_dither=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_converter(args: &ConvertArgs) -> ShrConverter {
    ShrConverter::new()
        .quantize(args.quantize)
        .dither(args.dither)
        .bayer_size(args.bayer_size)
        .error_threshold(args.error_threshold)
        .linear_rgb(!args.no_linear)
}

/// Convert a single file and optionally write a preview PNG
fn run_convert(
    input: &Path,
    output: &Path,
    args: &ConvertArgs,
    preview_path: Option<&Path>,
) -> anyhow::Result<()> {
    let canvas = input::load_canvas(input, args.aspect, args.resize_filter)?;
    let image = build_converter(args).convert(&canvas)?;

    std::fs::write(output, image.to_bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Wrote {} ({BLOB_SIZE} bytes, {} palettes)",
        output.display(),
        image.palettes().len()
    );

    if let Some(path) = preview_path {
        preview::write_png(path, &image)?;
        println!("Preview saved to {}", path.display());
    }
    Ok(())
}

/// Convert many files, skipping individual failures
fn run_batch(inputs: &[PathBuf], output_dir: &Path, args: &ConvertArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let converter = build_converter(args);
    let total = inputs.len();
    let mut converted = 0;

    for (i, input_file) in inputs.iter().enumerate() {
        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("image-{i}"));
        let output = output_dir.join(format!("{stem}.3200"));
        println!(
            "[{}/{total}] {} -> {}",
            i + 1,
            input_file.display(),
            output.display()
        );

        let result = input::load_canvas(input_file, args.aspect, args.resize_filter)
            .and_then(|canvas| Ok(converter.convert(&canvas)?))
            .and_then(|image| Ok(std::fs::write(&output, image.to_bytes())?));
        match result {
            Ok(()) => converted += 1,
            Err(e) => eprintln!("  error: {e:#}"),
        }
    }

    println!("Converted {converted}/{total} files.");
    Ok(())
}

/// Print palette usage for an existing .3200 file
fn run_info(input: &Path) -> anyhow::Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let image = Shr3200::from_bytes(&data)?;

    println!("File: {}", input.display());
    println!("Size: {BLOB_SIZE} bytes");
    println!("Resolution: 320x200, 16 colors per scanline");

    let mut usage = [0usize; 16];
    for &scb in image.scbs() {
        usage[scb as usize] += 1;
    }
    let used = usage.iter().filter(|&&n| n > 0).count();
    println!("\nPalettes in use: {used}/16");
    for (i, &count) in usage.iter().enumerate() {
        if count > 0 {
            println!("  palette {i:2}: {count:3} scanlines");
        }
    }
    Ok(())
}

/// Status screen shown when no subcommand is given
fn run_status() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("iigs-shr v{VERSION} - Apple IIgs Super Hi-Res converter\n");
    println!("Commands:");
    println!("  iigs-shr convert   Convert an image to a .3200 file");
    println!("  iigs-shr batch     Convert many images into a directory");
    println!("  iigs-shr info      Inspect a .3200 file");
    println!("  iigs-shr serve     Start the HTTP conversion service");
    println!("\nRun 'iigs-shr --help' for details.");
}
