//! planet_hands — interactive entry point.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use planet_hands::app::{run, AppConfig};

#[derive(Parser)]
#[command(name = "planet_hands")]
#[command(about = "Orbit a particle planet with your hand", long_about = None)]
struct Cli {
    /// Seed for the particle clouds
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Planet particle count
    #[arg(long, default_value_t = 15_000)]
    planet_count: usize,

    /// Ring particle count
    #[arg(long, default_value_t = 8_000)]
    ring_count: usize,

    /// Window width in pixels
    #[arg(long, default_value_t = 1024)]
    width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 640)]
    height: usize,

    /// Milliseconds between hand-tracking results
    #[arg(long, default_value_t = 33)]
    cadence_ms: u64,

    /// Make camera capture fail with this message (exercises the error path)
    #[arg(long, value_name = "MSG")]
    capture_error: Option<String>,

    /// Starting camera distance
    #[arg(long, default_value_t = 30.0)]
    initial_radius: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Planet Hands — gesture-orbited particle planet        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse + keyboard simulation  (use --features leap for hardware)");
    println!();

    let mut cfg = AppConfig::default();
    cfg.scene.seed                 = cli.seed;
    cfg.scene.planet.count         = cli.planet_count;
    cfg.scene.rings.count          = cli.ring_count;
    cfg.width                      = cli.width;
    cfg.height                     = cli.height;
    cfg.tracker.cadence            = Duration::from_millis(cli.cadence_ms);
    cfg.orbit.initial_radius       = cli.initial_radius;
    cfg.capture_error              = cli.capture_error;

    println!("  Opening visualizer window…");
    println!();

    run(cfg)?;
    Ok(())
}
