use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::autopilot::{Autopilot, AutopilotState};
use crate::collision::{describe_reasons, CollisionChecker, CrashReason, Outcome};
use crate::difficulty::Difficulty;
use crate::physics::{self, ControlInput, LanderState, Physics};
use crate::terrain::{Terrain, TerrainOptions};

pub(crate) mod defaults {
    pub const SPAWN_Y: f64 = 80.;
    pub const SPAWN_VX: f64 = 18.;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    Landed,
    Crashed,
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Playing => "playing",
            GameState::Paused => "paused",
            GameState::Landed => "landed",
            GameState::Crashed => "crashed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::Landed | GameState::Crashed)
    }
}

/// Which producer writes the control input each tick.
enum ControlSource {
    Autopilot(Autopilot),
    Manual,
}

#[derive(Clone, Copy, Debug)]
pub struct SessionOptions {
    pub width: f64,
    pub height: f64,
    pub terrain: TerrainOptions,
    pub autopilot: bool,
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            width: physics::defaults::WORLD_WIDTH,
            height: physics::defaults::WORLD_HEIGHT,
            terrain: TerrainOptions::default(),
            autopilot: false,
            seed: None,
        }
    }
}

impl SessionOptions {
    pub fn with_world(self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn with_terrain(self, terrain: TerrainOptions) -> Self {
        Self { terrain, ..self }
    }

    pub fn with_autopilot(self, autopilot: bool) -> Self {
        Self { autopilot, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }
}

/// One simulated episode: terrain, craft, controller and episode state,
/// owned together so many sessions can run side by side.
pub struct Session {
    difficulty: Difficulty,
    options: SessionOptions,
    physics: Physics,
    checker: CollisionChecker,
    terrain: Terrain,
    lander: LanderState,
    control: ControlSource,
    autopilot_state: AutopilotState,
    manual_input: ControlInput,
    crash_reasons: Vec<CrashReason>,
    state: GameState,
    rng: StdRng,
}

impl Session {
    pub fn new(difficulty: Difficulty, options: SessionOptions) -> Self {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let terrain = Terrain::generate(options.width, options.height, options.terrain, &mut rng);
        let physics = difficulty.physics().with_world_width(options.width);
        let control = if options.autopilot {
            ControlSource::Autopilot(Autopilot::new(difficulty.autopilot_tuning()))
        } else {
            ControlSource::Manual
        };
        let lander = Self::spawn(&mut rng, options.width, difficulty.initial_fuel());

        Self {
            difficulty,
            options,
            physics,
            checker: CollisionChecker::new(difficulty.safety_limits()),
            terrain,
            lander,
            control,
            autopilot_state: AutopilotState::default(),
            manual_input: ControlInput::idle(),
            crash_reasons: Vec::new(),
            state: GameState::Playing,
            rng,
        }
    }

    fn spawn(rng: &mut StdRng, width: f64, fuel: f64) -> LanderState {
        // small random horizontal drift at spawn
        let vx = rng.gen_range(-defaults::SPAWN_VX..defaults::SPAWN_VX);
        LanderState::default()
            .with_x(width / 2.)
            .with_y(defaults::SPAWN_Y)
            .with_vx(vx)
            .with_fuel(fuel)
    }

    /// One simulation tick: controller, then integration, then landing
    /// judgment, in that order. dt is clamped here, upstream of the
    /// integrator, to bound the error from frame hitches.
    pub fn advance(&mut self, dt: f64) {
        if self.state != GameState::Playing {
            return;
        }
        let dt = dt.min(physics::defaults::MAX_DT);

        let input = match &self.control {
            ControlSource::Autopilot(autopilot) => autopilot.compute(
                &self.lander,
                &self.terrain,
                &self.physics,
                &mut self.autopilot_state,
            ),
            ControlSource::Manual => self.manual_input,
        };
        self.lander = self.physics.integrate(self.lander.clone(), input, dt);
        self.manual_input = ControlInput::idle();

        if let Some(touchdown) = self.checker.evaluate(&self.lander, &self.terrain) {
            self.lander.y = touchdown.ground_y - self.lander.radius;
            match touchdown.outcome {
                Outcome::Landed => {
                    self.lander.vx = 0.;
                    self.lander.vy = 0.;
                    self.lander.omega = 0.;
                    self.state = GameState::Landed;
                    log::info!("touchdown on pad at x={:.1}", self.lander.x);
                }
                Outcome::Crashed(reasons) => {
                    log::info!("crashed: {}", describe_reasons(&reasons));
                    self.crash_reasons = reasons;
                    self.state = GameState::Crashed;
                }
            }
        }
    }

    /// Manual control intent for the next tick; ignored while the
    /// autopilot owns the craft.
    pub fn set_manual_input(&mut self, input: ControlInput) {
        self.manual_input = input;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.control = if enabled {
            ControlSource::Autopilot(Autopilot::new(self.difficulty.autopilot_tuning()))
        } else {
            ControlSource::Manual
        };
    }

    pub fn autopilot_enabled(&self) -> bool {
        matches!(self.control, ControlSource::Autopilot(_))
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
        }
    }

    /// Fresh craft, optionally fresh terrain; the only way out of a
    /// terminal state.
    pub fn restart(&mut self, regenerate_terrain: bool) {
        if regenerate_terrain {
            self.terrain = Terrain::generate(
                self.options.width,
                self.options.height,
                self.options.terrain,
                &mut self.rng,
            );
        }
        self.lander = Self::spawn(
            &mut self.rng,
            self.options.width,
            self.difficulty.initial_fuel(),
        );
        self.autopilot_state = AutopilotState::default();
        self.manual_input = ControlInput::idle();
        self.crash_reasons.clear();
        self.state = GameState::Playing;
        log::debug!("session restarted (new terrain: {regenerate_terrain})");
    }

    pub fn lander(&self) -> &LanderState {
        &self.lander
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn crash_reasons(&self) -> &[CrashReason] {
        &self.crash_reasons
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    fn session() -> Session {
        Session::new(Difficulty::Normal, SessionOptions::default().with_seed(17))
    }

    const DT: f64 = 1. / 60.;

    #[test]
    fn spawns_playing_with_difficulty_fuel() {
        let session = session();
        assert_eq!(session.game_state(), GameState::Playing);
        assert_eq!(session.lander().fuel, Difficulty::Normal.initial_fuel());
        assert!(session.lander().vx.abs() < defaults::SPAWN_VX);
    }

    #[test]
    fn pause_freezes_physics() {
        let mut session = session();
        session.pause();
        assert_eq!(session.game_state(), GameState::Paused);
        let before = session.lander().clone();
        for _ in 0..10 {
            session.advance(DT);
        }
        assert_eq!(session.lander().y, before.y);
        assert_eq!(session.lander().vy, before.vy);
        session.resume();
        session.advance(DT);
        assert!(session.lander().vy > before.vy);
    }

    #[test]
    fn manual_input_is_consumed_each_tick() {
        let mut session = session();
        let fuel_start = session.lander().fuel;
        session.set_manual_input(ControlInput {
            thrust: true,
            ..Default::default()
        });
        session.advance(DT);
        let fuel_after_burn = session.lander().fuel;
        assert!(fuel_after_burn < fuel_start);
        // intent was reset, the next tick is unpowered
        session.advance(DT);
        assert_eq!(session.lander().fuel, fuel_after_burn);
    }

    #[test]
    fn free_fall_ends_in_a_crash() {
        let mut session = session();
        for _ in 0..60 * 60 {
            session.advance(DT);
            if session.game_state().is_terminal() {
                break;
            }
        }
        assert_eq!(session.game_state(), GameState::Crashed);
        assert!(!session.crash_reasons().is_empty());
        // craft pinned onto the surface, not through it
        let lander = session.lander();
        let ground = session.terrain().height_at(lander.x);
        assert!((lander.y + lander.radius - ground).abs() < 1e-9);

        // terminal state freezes the simulation until restart
        let y = session.lander().y;
        session.advance(DT);
        assert_eq!(session.lander().y, y);
    }

    #[test]
    fn restart_leaves_terminal_state() {
        let mut session = session();
        for _ in 0..60 * 60 {
            session.advance(DT);
            if session.game_state().is_terminal() {
                break;
            }
        }
        assert!(session.game_state().is_terminal());
        session.restart(true);
        assert_eq!(session.game_state(), GameState::Playing);
        assert!(session.crash_reasons().is_empty());
        assert_eq!(session.lander().fuel, Difficulty::Normal.initial_fuel());
        assert_eq!(session.lander().y, defaults::SPAWN_Y);
    }

    #[test]
    fn seeded_sessions_are_identical() {
        let mut a = Session::new(
            Difficulty::Hard,
            SessionOptions::default().with_seed(5).with_autopilot(true),
        );
        let mut b = Session::new(
            Difficulty::Hard,
            SessionOptions::default().with_seed(5).with_autopilot(true),
        );
        for _ in 0..2000 {
            a.advance(DT);
            b.advance(DT);
        }
        assert_eq!(a.lander().x, b.lander().x);
        assert_eq!(a.lander().y, b.lander().y);
        assert_eq!(a.lander().fuel, b.lander().fuel);
        assert_eq!(a.game_state(), b.game_state());
    }
}
