use std::collections::BTreeMap;

use clap::Parser;
use simulation::{Difficulty, EpisodeRunner, GameState, Session, SessionOptions};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Difficulty preset (easy, normal, hard); sweeps all three when omitted
    #[arg(long)]
    difficulty: Option<String>,

    /// Episodes per difficulty
    #[arg(long, short, default_value = "100")]
    episodes: u64,

    /// Base RNG seed; episode i runs with seed + i
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Simulation timestep in seconds
    #[arg(long, default_value = "0.0166667")]
    dt: f64,

    /// Tick budget per episode
    #[arg(long, default_value = "18000")]
    max_ticks: usize,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let cli = Cli::parse();

    let difficulties = match &cli.difficulty {
        Some(name) => {
            vec![Difficulty::from_str(name).ok_or(format!("Unknown difficulty: {name}"))?]
        }
        None => Difficulty::all().to_vec(),
    };

    for difficulty in difficulties {
        let mut landed = 0u64;
        let mut fuel_left = 0.;
        let mut total_ticks = 0usize;
        let mut crash_reasons: BTreeMap<String, u64> = BTreeMap::new();

        for i in 0..cli.episodes {
            let options = SessionOptions::default()
                .with_seed(cli.seed + i)
                .with_autopilot(true);
            let mut runner = EpisodeRunner::new(Session::new(difficulty, options));
            let report = runner.run_to_rest(cli.dt, cli.max_ticks);
            total_ticks += report.ticks;
            if report.state == GameState::Landed {
                landed += 1;
                fuel_left += report.fuel_remaining;
            } else {
                for reason in &report.crash_reasons {
                    *crash_reasons.entry(reason.to_string()).or_default() += 1;
                }
            }
        }

        println!(
            "{}: {landed}/{} landed, mean episode {:.1}s",
            difficulty.as_str(),
            cli.episodes,
            total_ticks as f64 * cli.dt / cli.episodes as f64
        );
        if landed > 0 {
            println!("  mean fuel left on touchdown: {:.1}", fuel_left / landed as f64);
        }
        for (reason, count) in &crash_reasons {
            println!("  {reason}: {count}");
        }
    }
    Ok(())
}
