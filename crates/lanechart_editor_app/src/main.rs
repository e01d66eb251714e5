// SPDX-License-Identifier: MIT OR Apache-2.0
//! Lanechart Editor preview.
//!
//! Plays a chart without a window: the song clock advances one frame at a
//! time, the stage spawns and retires tracks, and every frame is written to
//! stdout as one JSON line for an external renderer or for inspection.
//! Logs go to stderr.

mod playback;
mod settings;
mod stage;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lanechart_editor_timeline::{BeatClock, Chart};
use playback::PlaybackController;
use settings::EditorSettings;
use stage::{ScreenLayout, Stage};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Headless chart preview for Lanechart Editor
#[derive(Parser, Debug)]
#[command(name = "lanechart_editor")]
#[command(about = "Play a chart headlessly and print every frame as JSON")]
#[command(version)]
struct Args {
    /// Chart file (.ron or .json)
    chart: PathBuf,

    /// Settings file (defaults to lanechart.ron next to the chart)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Song time to start at, in seconds
    #[arg(long, default_value_t = 0.0)]
    from: f32,

    /// Song time to stop at (defaults to the chart duration)
    #[arg(long)]
    to: Option<f32>,

    /// Frame rate override
    #[arg(long)]
    fps: Option<f32>,
}

fn main() {
    let args = Args::parse();

    let settings_path = args.settings.clone().unwrap_or_else(|| {
        let dir = args.chart.parent().unwrap_or_else(|| std::path::Path::new("."));
        EditorSettings::settings_file_path(dir)
    });
    let settings = EditorSettings::load(&settings_path);

    let log_filter = settings
        .as_ref()
        .map(|s| s.log_filter.clone())
        .unwrap_or_else(|_| EditorSettings::default().log_filter);
    init_tracing(&log_filter);

    tracing::info!("Starting Lanechart Editor preview v{}", env!("CARGO_PKG_VERSION"));

    let result = settings
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))
        .and_then(|settings| run(&args, &settings));

    if let Err(e) = result {
        tracing::error!("Preview failed: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(directive: &str) {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let rejected = match directive.parse::<tracing_subscriber::filter::Directive>() {
        Ok(parsed) => {
            env_filter = env_filter.add_directive(parsed);
            None
        }
        Err(e) => Some(e),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(e) = rejected {
        tracing::warn!("Ignoring log filter '{directive}': {e}");
    }
}

fn run(args: &Args, settings: &EditorSettings) -> Result<()> {
    let chart = Chart::load(&args.chart)
        .with_context(|| format!("Failed to load chart {}", args.chart.display()))?;
    let palette = settings.palette().context("Invalid palette in settings")?;

    let fps = args.fps.unwrap_or(settings.frames_per_second);
    if fps.is_nan() || fps <= 0.0 {
        bail!("Frame rate must be positive, got {fps}");
    }
    let end = args.to.unwrap_or_else(|| chart.duration());
    if args.from > end {
        bail!("Start time {} is after end time {}", args.from, end);
    }

    let mut stage = Stage::new(
        ScreenLayout::from_settings(settings),
        palette,
        BeatClock::new(chart.bpm),
        fps,
    );
    let mut clock = PlaybackController::new();
    clock.seek(args.from);
    clock.play();

    tracing::info!(
        "Previewing '{}' from {:.3}s to {:.3}s at {} fps",
        chart.name,
        clock.time,
        end,
        fps
    );

    let mut out = BufWriter::new(std::io::stdout().lock());
    let mut frames = 0u32;
    loop {
        let frame = stage.step(&chart, clock.current_frame(fps), clock.time);
        serde_json::to_writer(&mut out, &frame)?;
        writeln!(out)?;
        frames += 1;

        if !clock.is_playing() {
            break;
        }
        clock.update(1.0 / fps, end);
    }
    out.flush()?;

    tracing::info!("Rendered {frames} frames, {} tracks still live", stage.live_count());
    Ok(())
}
