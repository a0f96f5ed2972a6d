use simulation::{describe_reasons, init, Difficulty, EpisodeRunner, GameState, Session, SessionOptions};
use std::env;

const DT: f64 = 1. / 60.;
const MAX_TICKS: usize = 60 * 300;

fn main() -> Result<(), String> {
    env_logger::init();

    let (difficulty, options) = match env::args().nth(1) {
        Some(path) => init::json::session_from_file(path)?,
        None => (
            Difficulty::Normal,
            SessionOptions::default().with_autopilot(true),
        ),
    };

    let mut runner = EpisodeRunner::new(Session::new(difficulty, options));
    let now = std::time::Instant::now();
    let report = runner.run_to_rest(DT, MAX_TICKS);
    let elapsed = now.elapsed();

    println!("{}", runner.history().pretty_to_string());
    match report.state {
        GameState::Landed => println!(
            "Landed ({}) after {} ticks with {:.1} fuel left, run time: {elapsed:?}",
            difficulty.as_str(),
            report.ticks,
            report.fuel_remaining
        ),
        GameState::Crashed => println!(
            "Crashed ({}) after {} ticks: {}, run time: {elapsed:?}",
            difficulty.as_str(),
            report.ticks,
            describe_reasons(&report.crash_reasons)
        ),
        _ => println!(
            "Episode still {} after {} ticks",
            report.state.as_str(),
            report.ticks
        ),
    }
    Ok(())
}
