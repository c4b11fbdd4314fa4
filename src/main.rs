use clap::Parser;
use image::ImageReader;
use std::path::{Path, PathBuf};

use scorescan::rectify::build_standard_pipeline;
use scorescan::{Rectifier, RectifyConfig};

#[derive(Parser)]
#[command(name = "scorescan")]
#[command(about = "Rectify photographed sheet-music pages for optical music recognition")]
struct Cli {
    /// Paths to input page images
    #[arg(value_name = "IMAGE", required = true)]
    image_paths: Vec<PathBuf>,

    /// Directory for rectified output images
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save per-stage debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if args.verbose { "debug" } else { "info" })
            }),
        )
        .init();

    std::fs::create_dir_all(&args.out_dir)?;
    let config = RectifyConfig::default();

    let mut pages = Vec::with_capacity(args.image_paths.len());
    for path in &args.image_paths {
        let img = ImageReader::open(path)?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode {}: {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), width = img.width(), height = img.height(), "page loaded");
        pages.push(img);
    }

    if let Some(debug_dir) = &args.debug_out {
        // Debug mode runs each page through the step pipeline so every
        // intermediate image lands on disk.
        for (path, page) in args.image_paths.iter().zip(pages) {
            let page_dir = if args.image_paths.len() == 1 {
                debug_dir.clone()
            } else {
                debug_dir.join(stem(path))
            };
            let result = build_standard_pipeline(&config)
                .with_debug(page_dir)?
                .run(page)?;
            save_output(&result.image.to_luma8(), path, &args.out_dir)?;
        }
        return Ok(());
    }

    let rectifier = Rectifier::new(config);
    let results = rectifier.rectify_all(&pages);

    let mut failures = 0usize;
    for (path, result) in args.image_paths.iter().zip(results) {
        match result {
            Ok(rectified) => save_output(&rectified, path, &args.out_dir)?,
            Err(err) => {
                tracing::error!(path = %path.display(), %err, "page failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} pages failed", failures, args.image_paths.len());
    }
    Ok(())
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string())
}

fn save_output(rectified: &image::GrayImage, input: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let out_path = out_dir.join(format!("{}-rectified.png", stem(input)));
    rectified.save(&out_path)?;
    println!("{} -> {}", input.display(), out_path.display());
    Ok(())
}
