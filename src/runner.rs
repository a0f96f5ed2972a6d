use crate::collision::CrashReason;
use crate::physics::LanderState;
use crate::session::{GameState, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    InProgress,
    Finished,
}

/// Per-tick telemetry log, one column per channel.
#[derive(Clone)]
pub struct FlightHistory {
    x: Vec<f64>,
    y: Vec<f64>,
    vx: Vec<f64>,
    vy: Vec<f64>,
    angle: Vec<f64>,
    omega: Vec<f64>,
    fuel: Vec<f64>,
    radius: f64,
}

impl FlightHistory {
    pub fn with_initial_state(state: &LanderState) -> Self {
        Self {
            x: vec![state.x],
            y: vec![state.y],
            vx: vec![state.vx],
            vy: vec![state.vy],
            angle: vec![state.angle],
            omega: vec![state.omega],
            fuel: vec![state.fuel],
            radius: state.radius,
        }
    }

    pub fn append_lander_state(&mut self, state: &LanderState) {
        self.x.push(state.x);
        self.y.push(state.y);
        self.vx.push(state.vx);
        self.vy.push(state.vy);
        self.angle.push(state.angle);
        self.omega.push(state.omega);
        self.fuel.push(state.fuel);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn iter_history(&self) -> impl Iterator<Item = LanderState> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.vx)
            .zip(&self.vy)
            .zip(&self.angle)
            .zip(&self.omega)
            .zip(&self.fuel)
            .map(|((((((x, y), vx), vy), angle), omega), fuel)| LanderState {
                x: *x,
                y: *y,
                vx: *vx,
                vy: *vy,
                angle: *angle,
                omega: *omega,
                fuel: *fuel,
                radius: self.radius,
            })
    }

    pub fn pretty_to_string(&self) -> String {
        self.iter_history().fold(
            format!(
                "{:>9}{:>9}{:>9}{:>9}{:>9}{:>9}{:>9}",
                "X", "Y", "VX", "VY", "ANGLE", "OMEGA", "FUEL"
            ),
            |out,
             LanderState {
                 x,
                 y,
                 vx,
                 vy,
                 angle,
                 omega,
                 fuel,
                 ..
             }| {
                out + &format!(
                    "\n{x:9.2}{y:9.2}{vx:9.2}{vy:9.2}{angle:9.3}{omega:9.3}{fuel:9.1}"
                )
            },
        )
    }
}

/// Outcome summary of one driven episode.
#[derive(Debug, Clone)]
pub struct EpisodeReport {
    pub state: GameState,
    pub ticks: usize,
    pub fuel_remaining: f64,
    pub crash_reasons: Vec<CrashReason>,
}

/// Steps a session to rest while recording telemetry.
pub struct EpisodeRunner {
    session: Session,
    history: FlightHistory,
    ticks: usize,
}

impl EpisodeRunner {
    pub fn new(session: Session) -> Self {
        let history = FlightHistory::with_initial_state(session.lander());
        Self {
            session,
            history,
            ticks: 0,
        }
    }

    pub fn step(&mut self, dt: f64) -> ExecutionStatus {
        if self.session.game_state().is_terminal() {
            return ExecutionStatus::Finished;
        }
        self.session.advance(dt);
        self.ticks += 1;
        self.history.append_lander_state(self.session.lander());
        if self.session.game_state().is_terminal() {
            ExecutionStatus::Finished
        } else {
            ExecutionStatus::InProgress
        }
    }

    /// Runs until touchdown or the tick budget runs out.
    pub fn run_to_rest(&mut self, dt: f64, max_ticks: usize) -> EpisodeReport {
        while self.ticks < max_ticks {
            if let ExecutionStatus::Finished = self.step(dt) {
                break;
            }
        }
        self.report()
    }

    pub fn report(&self) -> EpisodeReport {
        EpisodeReport {
            state: self.session.game_state(),
            ticks: self.ticks,
            fuel_remaining: self.session.lander().fuel,
            crash_reasons: self.session.crash_reasons().to_vec(),
        }
    }

    pub fn history(&self) -> &FlightHistory {
        &self.history
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
