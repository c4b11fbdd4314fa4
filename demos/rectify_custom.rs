use image::ImageReader;
use scorescan::rectify::build_standard_pipeline;
use scorescan::{Rectifier, RectifyConfig};
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path>", args[0]);
        std::process::exit(1);
    }

    let image_path = &args[1];
    let img = ImageReader::open(image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    println!("Loaded image: {}x{}", img.width(), img.height());

    // Example 1: default configuration through the one-call entry point.
    println!("\n=== Default Rectification ===");
    let rectifier = Rectifier::default();
    let output = rectifier.rectify(&img)?;
    println!("Rectified to {}x{}", output.width(), output.height());
    output.save("rectified_default.png")?;

    // Example 2: heavier smoothing and a stricter area floor for noisy
    // phone photos.
    println!("\n=== Custom Configuration (noisy input) ===");
    let config = RectifyConfig {
        blur_sigma: 3.0,
        denoise_radius: 2,
        min_area_fraction: 0.2,
        ..RectifyConfig::default()
    };
    let output = Rectifier::new(config).rectify(&img)?;
    println!("Rectified to {}x{}", output.width(), output.height());
    output.save("rectified_denoised.png")?;

    // Example 3: step-by-step execution, stopping after the threshold stage
    // to inspect the binarized page.
    println!("\n=== Partial Pipeline (Stop After Threshold) ===");
    let pipeline = build_standard_pipeline(&RectifyConfig::default());
    let partial = pipeline.run_partial(img, 3)?;
    println!(
        "Partial result: {}x{} binary image",
        partial.image.width(),
        partial.image.height()
    );
    partial.image.save("rectify_binary_stage.png")?;

    Ok(())
}
