//! Headless droplet spray over a flat floor, driven by the Bevy plugin.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use droplets::{
    init_logging, DropletOperator, DropletPlugin, DropletTeardown, Droplets, EmissionOverrides,
    EmitDroplet, LogEffects, OperatorSettings, StaticScene,
};
use glam::Vec3;
use log::info;

const FRAME_RATE: u32 = 60;
const SPOUT: Vec3 = Vec3::new(0.0, 4.0, 0.0);
/// Spreads successive emissions evenly around the spout.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Headless droplet spray over a flat floor
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of pooled droplets
    #[arg(long)]
    capacity: Option<usize>,
    /// Droplets to emit, one per frame
    #[arg(long, default_value_t = 48)]
    emits: usize,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 20.0)]
    seconds: f32,
    /// JSON file with operator settings
    #[arg(long)]
    settings: Option<PathBuf>,
    /// JSON file with emission overrides applied to every droplet
    #[arg(long)]
    preset: Option<PathBuf>,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn load_settings(args: &Args) -> Result<OperatorSettings> {
    let mut settings = match &args.settings {
        Some(path) => OperatorSettings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => OperatorSettings::default(),
    };
    if let Some(capacity) = args.capacity {
        settings.capacity = capacity;
    }
    Ok(settings)
}

fn load_preset(path: Option<&Path>) -> Result<Option<EmissionOverrides>> {
    path.map(|file| {
        let text = fs::read_to_string(file)
            .with_context(|| format!("reading preset {}", file.display()))?;
        EmissionOverrides::from_json_str(&text)
            .with_context(|| format!("parsing preset {}", file.display()))
    })
    .transpose()
}

fn spray_direction(angle: f32) -> Vec3 {
    Vec3::new(angle.cos() * 0.6, 1.0, angle.sin() * 0.6)
}

fn log_stats(app: &App) {
    let Some(droplets) = app.world().get_resource::<Droplets>() else {
        return;
    };
    let stats = droplets.stats();
    info!(
        "t={:.0}s flying={} landed={} expanding={} decaying={} free={}/{}",
        droplets.elapsed(),
        stats.flying,
        stats.landed,
        stats.expanding,
        stats.decaying,
        stats.available,
        stats.capacity
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = load_settings(&args)?;
    let preset = load_preset(args.preset.as_deref())?;
    let mut operator = DropletOperator::new(settings, StaticScene::with_floor(0.0), LogEffects)
        .context("invalid operator settings")?;
    if let Some(seed) = args.seed {
        operator = operator.with_seed(seed);
    }

    let frame = Duration::from_secs(1) / FRAME_RATE;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(frame))
        .add_plugins(DropletPlugin::with_operator(operator));

    let total = Duration::from_secs_f32(args.seconds.max(0.0));
    let mut elapsed = Duration::ZERO;
    let mut frames: u32 = 0;
    let mut emitted = 0;
    let mut angle = 0.0_f32;
    while elapsed < total {
        if emitted < args.emits {
            app.world_mut().trigger(EmitDroplet {
                origin: SPOUT,
                direction: spray_direction(angle),
                overrides: preset.clone(),
            });
            emitted += 1;
            angle += GOLDEN_ANGLE;
        }
        app.update();
        elapsed += frame;
        frames += 1;
        if frames % FRAME_RATE == 0 {
            log_stats(&app);
        }
    }

    app.world_mut().trigger(DropletTeardown);
    app.update();
    info!("simulated {frames} frames with {emitted} emissions");
    Ok(())
}
