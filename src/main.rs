use anyhow::{Context, anyhow};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use detectlens::config::parse_size;
use detectlens::overlay::draw_markers;
use detectlens::{
    Detector, DisplayedImage, LazyDetector, Marker, PipelineController, RegionDetector, Settings,
    Size,
};

#[derive(Parser)]
#[command(name = "detectlens")]
#[command(about = "Detect objects in an image and overlay labeled boxes")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE", required_unless_present = "gui")]
    image_path: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of detections to keep
    #[arg(short = 'n', long, value_name = "N")]
    max_results: Option<usize>,

    /// Viewport the image is fitted into, e.g. 1024x768
    #[arg(long, value_name = "WxH", value_parser = parse_viewport)]
    viewport: Option<Size>,

    /// Write an annotated PNG at the displayed size
    #[arg(long, value_name = "FILE")]
    annotate: Option<PathBuf>,

    /// Print markers as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Open the desktop viewer
    #[arg(long)]
    gui: bool,
}

fn parse_viewport(value: &str) -> Result<Size, String> {
    parse_size(value).map_err(|e| e.to_string())
}

#[derive(Serialize)]
struct Report<'a> {
    natural: Size,
    rendered: Size,
    markers: &'a [Marker],
}

fn build_detector(settings: &Settings) -> Arc<dyn Detector> {
    let config = settings.detector.clone();
    Arc::new(LazyDetector::new("region", move || {
        RegionDetector::new(config.clone())
    }))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(max_results) = args.max_results {
        settings.max_results = max_results;
    }
    if let Some(viewport) = args.viewport {
        settings.viewport = Some(viewport);
    }
    settings.validate()?;

    let detector = build_detector(&settings);

    if args.gui {
        return run_gui(settings, detector, args.image_path);
    }

    let image_path = args
        .image_path
        .ok_or_else(|| anyhow!("an IMAGE path is required unless --gui is given"))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_once(
        &settings,
        detector,
        &image_path,
        args.annotate.as_deref(),
        args.json,
    ))
}

async fn run_once(
    settings: &Settings,
    detector: Arc<dyn Detector>,
    image_path: &Path,
    annotate: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let mut controller =
        PipelineController::new(settings.max_results).with_viewport(settings.viewport);

    controller.run(image_path, detector).await?;

    let shown = controller
        .displayed_image()
        .ok_or_else(|| anyhow!("no image displayed after run"))?;

    if json {
        let report = Report {
            natural: shown.natural,
            rendered: shown.rendered,
            markers: controller.markers(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_markers(&shown, controller.markers());
    }

    if let (Some(out), Some(loaded)) = (annotate, controller.loaded_image()) {
        let mut canvas = loaded
            .image
            .resize_exact(
                shown.rendered.width,
                shown.rendered.height,
                image::imageops::FilterType::Triangle,
            )
            .to_rgba8();
        draw_markers(&mut canvas, controller.markers());
        canvas
            .save(out)
            .with_context(|| format!("Failed to save annotated image {}", out.display()))?;
        log::info!("annotated image written to {}", out.display());
    }

    Ok(())
}

fn print_markers(shown: &DisplayedImage, markers: &[Marker]) {
    println!("\n=== Object Detection Results ===");
    println!("Image: {} (shown at {})", shown.natural, shown.rendered);
    println!("Total detections: {}", markers.len());

    if markers.is_empty() {
        println!("No objects detected.");
        return;
    }

    println!("\nDetected objects:");
    for marker in markers {
        println!(
            "  {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            marker.label, marker.x, marker.y, marker.width, marker.height
        );
    }
}

#[cfg(feature = "gui")]
fn run_gui(
    settings: Settings,
    detector: Arc<dyn Detector>,
    initial: Option<PathBuf>,
) -> anyhow::Result<()> {
    detectlens::gui::run(settings, detector, initial)
}

#[cfg(not(feature = "gui"))]
fn run_gui(
    _settings: Settings,
    _detector: Arc<dyn Detector>,
    _initial: Option<PathBuf>,
) -> anyhow::Result<()> {
    Err(anyhow!(
        "this build has no desktop viewer; rebuild with `--features gui`"
    ))
}
