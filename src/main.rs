use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use image::DynamicImage;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use frame_tryon::config::{check_positive, Settings};
use frame_tryon::overlay::{asset_aspect_ratio, render_try_on, RenderOptions};
use frame_tryon::{estimate_face_position, FramePositioner, PlacementSmoother, Viewport};

fn parse_viewport(input: &str) -> Result<Viewport, String> {
    let (w, h) = input
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Invalid viewport (expected WIDTHxHEIGHT): {}", input))?;
    let width: f64 = w.trim().parse().map_err(|_| format!("Invalid width: {}", w))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("Invalid height: {}", h))?;
    Ok(Viewport::new(width, height))
}

#[derive(Parser, Debug)]
#[command(version, about = "Eyewear virtual try-on frame positioning", long_about = None)]
struct Args {
    #[arg(short, long, help = "Path to a config file (toml, json or yaml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the estimated face landmarks for a viewport
    Landmarks {
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },
    /// Print the frame placement for a viewport
    Place {
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(short, long, help = "Frame width / height")]
        aspect_ratio: Option<f64>,
        #[arg(short, long)]
        scale: Option<f64>,
    },
    /// Print placements for several viewports, e.g. 1280x720,640x480
    Batch {
        #[arg(long, value_delimiter = ',', value_parser = parse_viewport, required = true)]
        viewports: Vec<Viewport>,
        #[arg(short, long, help = "Frame width / height")]
        aspect_ratio: Option<f64>,
        #[arg(short, long)]
        scale: Option<f64>,
        #[arg(long, help = "Treat viewports as consecutive video frames and smooth the placements")]
        smooth: bool,
    },
    /// Draw a frame asset onto a photo
    Render {
        #[arg(long)]
        photo: PathBuf,
        #[arg(long)]
        frame: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, help = "Frame width / height. Default: the asset's own ratio")]
        aspect_ratio: Option<f64>,
        #[arg(short, long)]
        scale: Option<f64>,
        #[arg(long, help = "Also draw the placement rectangle and landmarks")]
        debug: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> frame_tryon::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn positioner(
    settings: &Settings,
    aspect_ratio: Option<f64>,
    scale: Option<f64>,
) -> frame_tryon::Result<FramePositioner> {
    let aspect_ratio = aspect_ratio.unwrap_or(settings.aspect_ratio);
    let scale = scale.unwrap_or(settings.scale);
    check_positive("aspect_ratio", aspect_ratio)?;
    check_positive("scale", scale)?;

    Ok(FramePositioner::new(aspect_ratio).with_scale(scale))
}

fn viewport(
    settings: &Settings,
    width: Option<f64>,
    height: Option<f64>,
) -> frame_tryon::Result<Viewport> {
    let width = width.unwrap_or(settings.viewport_width as f64);
    let height = height.unwrap_or(settings.viewport_height as f64);
    check_positive("width", width)?;
    check_positive("height", height)?;
    Ok(Viewport::new(width, height))
}

fn save_image(image: DynamicImage, path: &Path) -> frame_tryon::Result<()> {
    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false);

    // jpeg has no alpha channel
    if is_jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)?;
    } else {
        image.save(path)?;
    }
    Ok(())
}

fn run(args: Args, settings: Settings) -> frame_tryon::Result<()> {
    match args.command {
        Command::Landmarks { width, height } => {
            let v = viewport(&settings, width, height)?;
            print_json(&estimate_face_position(v.width, v.height))
        }
        Command::Place {
            width,
            height,
            aspect_ratio,
            scale,
        } => {
            let v = viewport(&settings, width, height)?;
            let placement = positioner(&settings, aspect_ratio, scale)?.place(v.width, v.height);
            print_json(&placement)
        }
        Command::Batch {
            viewports,
            aspect_ratio,
            scale,
            smooth,
        } => {
            for v in viewports.iter() {
                check_positive("width", v.width)?;
                check_positive("height", v.height)?;
            }

            let mut placements =
                positioner(&settings, aspect_ratio, scale)?.place_batch(&viewports);
            if smooth {
                let mut smoother = PlacementSmoother::new(settings.smoothing_window);
                placements = placements.into_iter().map(|p| smoother.push(p)).collect();
            }

            tracing::info!(count = placements.len(), smooth, "placed batch");
            print_json(&placements)
        }
        Command::Render {
            photo,
            frame,
            output,
            aspect_ratio,
            scale,
            debug,
        } => {
            let photo = image::open(&photo)?;
            let frame_asset = image::open(&frame)?;

            let aspect_ratio = aspect_ratio.unwrap_or_else(|| asset_aspect_ratio(&frame_asset));
            let positioner = positioner(&settings, Some(aspect_ratio), scale)?;

            let options = RenderOptions {
                debug,
                ..RenderOptions::default()
            };
            let (canvas, placement) = render_try_on(&photo, &frame_asset, &positioner, &options);

            save_image(DynamicImage::ImageRgba8(canvas), &output)?;
            tracing::info!(output = %output.display(), "saved try-on image");
            print_json(&placement)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    // RUST_LOG takes precedence over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // the subscriber depends on the settings, so this is logged late
    tracing::debug!(?settings, "loaded settings");

    match run(args, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
