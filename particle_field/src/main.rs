//! particle_stats — generate the planet and ring clouds and print a summary.

use anyhow::{ensure, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use particle_field::{generate_planet, generate_rings, ParticleBuffer, PlanetConfig, RingConfig};

#[derive(Parser)]
#[command(name = "particle_stats")]
#[command(about = "Summarise the particle planet and ring clouds", long_about = None)]
struct Cli {
    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Number of planet particles
    #[arg(long, default_value_t = 15_000)]
    planet_count: usize,

    /// Number of ring particles
    #[arg(long, default_value_t = 8_000)]
    ring_count: usize,

    /// Histogram buckets for radial distributions
    #[arg(long, default_value_t = 10)]
    buckets: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ensure!(cli.buckets > 0, "--buckets must be at least 1");

    let planet_cfg = PlanetConfig { count: cli.planet_count, ..PlanetConfig::default() };
    let ring_cfg   = RingConfig   { count: cli.ring_count,   ..RingConfig::default()   };

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let planet = generate_planet(&mut rng, &planet_cfg);
    let rings  = generate_rings(&mut rng, &ring_cfg);

    println!();
    println!("  Seed {}", cli.seed);
    println!();

    println!("  PLANET  ({} particles)", planet.len());
    let radii: Vec<f32> = planet.iter().map(|p| length(p.position)).collect();
    print_range("radius", &radii);
    print_range("size", &planet.sizes);
    let shell = radii.iter().filter(|&&r| r >= planet_cfg.radius * (1.0 - planet_cfg.shell_depth)).count();
    println!("    in shell : {} ({:.1}%)", shell, percent(shell, planet.len()));
    print_histogram(&radii, 0.0, planet_cfg.radius, cli.buckets);

    println!();
    println!("  RINGS   ({} particles)", rings.len());
    let ring_radii: Vec<f32> = rings.iter()
        .map(|p| (p.position[0] * p.position[0] + p.position[2] * p.position[2]).sqrt())
        .collect();
    print_range("radius", &ring_radii);
    print_range("height", &column(&rings, 1));
    print_range("size", &rings.sizes);
    let inner = ring_radii.iter().filter(|&&r| r < ring_cfg.inner_band.1).count();
    println!("    inner band : {} ({:.1}%)", inner, percent(inner, rings.len()));
    println!("    outer band : {} ({:.1}%)", rings.len() - inner, percent(rings.len() - inner, rings.len()));
    print_histogram(&ring_radii, ring_cfg.inner_band.0, ring_cfg.outer_band.1, cli.buckets);
    println!();

    Ok(())
}

fn length(p: [f32; 3]) -> f32 {
    (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
}

fn column(buf: &ParticleBuffer, axis: usize) -> Vec<f32> {
    buf.positions.iter().skip(axis).step_by(3).copied().collect()
}

fn percent(n: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { 100.0 * n as f64 / total as f64 }
}

fn print_range(label: &str, values: &[f32]) {
    if values.is_empty() {
        println!("    {:<8} : (empty)", label);
        return;
    }
    let min  = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max  = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    println!("    {:<8} : min {:>7.3}  mean {:>7.3}  max {:>7.3}", label, min, mean, max);
}

fn print_histogram(values: &[f32], lo: f32, hi: f32, buckets: usize) {
    let mut counts = vec![0usize; buckets];
    let width = (hi - lo) / buckets as f32;
    for &v in values {
        let i = (((v - lo) / width) as usize).min(buckets - 1);
        counts[i] += 1;
    }
    let peak = counts.iter().copied().max().unwrap_or(0).max(1);
    for (i, &c) in counts.iter().enumerate() {
        let bar = "#".repeat(c * 40 / peak);
        println!("    {:>6.2}–{:<6.2} {:>6}  {}", lo + i as f32 * width, lo + (i + 1) as f32 * width, c, bar);
    }
}
