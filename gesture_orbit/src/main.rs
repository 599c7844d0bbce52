//! orbit_trace — replay a scripted hand motion through the interpreter and
//! smoother and print the camera trajectory.

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::f32::consts::TAU;

use gesture_orbit::{
    CameraState, Classification, GestureInterpreter, HandPose, Landmark, OrbitConfig, SynthHand,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Script {
    /// Open hand throughout
    Open,
    /// Half-bent hand throughout (radius never moves)
    Relaxed,
    /// Fist throughout
    Fist,
    /// Open → relaxed → fist, one second each, repeating
    Cycle,
}

#[derive(Parser)]
#[command(name = "orbit_trace")]
#[command(about = "Print the camera path produced by a scripted hand sweep", long_about = None)]
struct Cli {
    /// Simulated duration in seconds
    #[arg(short, long, default_value_t = 4.0)]
    seconds: f32,

    /// Render frames per second
    #[arg(short, long, default_value_t = 60)]
    fps: u32,

    /// Tracker results per second (hand updates arrive less often than frames)
    #[arg(short, long, default_value_t = 20)]
    tracker_hz: u32,

    /// Hand script
    #[arg(short, long, value_enum, default_value_t = Script::Cycle)]
    pose: Script,

    /// Print every Nth frame
    #[arg(long, default_value_t = 6)]
    every: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    ensure!(cli.fps > 0 && cli.tracker_hz > 0, "--fps and --tracker-hz must be positive");
    ensure!(cli.seconds > 0.0, "--seconds must be positive");

    let cfg    = OrbitConfig::default();
    let interp = GestureInterpreter::new(cfg);
    let mut cam = CameraState::new(cfg);

    let dt      = 1.0 / cli.fps as f32;
    let frames  = (cli.seconds * cli.fps as f32).ceil() as u32;
    let stride  = (cli.fps / cli.tracker_hz).max(1);

    info!("{} frames at {} fps, tracker every {} frame(s), script {:?}", frames, cli.fps, stride, cli.pose);

    println!();
    println!("  {:>6}  {:>7}  {:>6}  {:<9}  {:>8}  {:>8}  {:>8}  {:>8}",
             "t", "roll", "size", "pose", "tgt r", "tgt θ", "cur r", "cur θ");

    let mut last_class: Option<Classification> = None;

    for f in 0..frames {
        let t = f as f32 * dt;

        if f % stride == 0 {
            let hand = scripted_hand(cli.pose, t);
            if let Some(g) = interp.on_results(&[hand.landmarks()]) {
                if last_class != Some(g.classification) {
                    info!("t={:.2}s pose now {}", t, g.classification.as_str());
                    last_class = Some(g.classification);
                }
                cam.apply_gesture(&g);
            }
        }

        cam.advance(dt);

        if f % cli.every.max(1) == 0 {
            let hand = scripted_hand(cli.pose, t);
            println!("  {:>6.2}  {:>7.3}  {:>6.3}  {:<9}  {:>8.2}  {:>8.3}  {:>8.2}  {:>8.3}",
                     t, hand.roll, hand.size, hand.pose.as_str(),
                     cam.target_radius(), cam.target_theta(),
                     cam.current_radius(), cam.current_theta());
        }
    }

    let [x, y, z] = cam.eye();
    println!();
    println!("  Final eye: ({:.2}, {:.2}, {:.2})", x, y, z);
    println!();
    Ok(())
}

/// Hand rolls back and forth ±0.8 rad every 3 s while drifting nearer and
/// farther (size 0.06–0.30) every 2 s.
fn scripted_hand(script: Script, t: f32) -> SynthHand {
    let pose = match script {
        Script::Open    => HandPose::Open,
        Script::Relaxed => HandPose::Relaxed,
        Script::Fist    => HandPose::Fist,
        Script::Cycle   => match (t as u32) % 3 {
            0 => HandPose::Open,
            1 => HandPose::Relaxed,
            _ => HandPose::Fist,
        },
    };
    SynthHand {
        wrist: Landmark::new(0.5, 0.7),
        roll:  0.8 * (TAU * t / 3.0).sin(),
        size:  0.18 + 0.12 * (TAU * t / 2.0).sin(),
        pose,
    }
}
