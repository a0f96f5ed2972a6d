use crate::physics::{normalize_angle, ControlInput, LanderState, Physics};
use crate::terrain::Terrain;

pub(crate) mod defaults {
    // lateral PD gains
    pub const KP: f64 = 0.0012;
    pub const KD: f64 = 0.0045;
    pub const MAX_TILT: f64 = 0.6;
    pub const TILT_DEAD_BAND: f64 = 0.02;
    // near-target and near-ground tilt limits
    pub const NEAR_PAD_FRACTION: f64 = 0.7;
    pub const NEAR_PAD_DAMP: f64 = 0.6;
    pub const LOW_TILT_ALTITUDE: f64 = 60.;
    pub const LOW_TILT_LIMIT: f64 = 0.22;
    pub const FLARE_ALTITUDE: f64 = 22.;
    // vertical control thresholds
    pub const FINAL_VY_ALTITUDE: f64 = 18.;
    pub const LEVEL_FIRST_ANGLE: f64 = 0.35;
    pub const LEVEL_FIRST_ALTITUDE: f64 = 30.;
    pub const WEAK_BRAKE_ACCEL: f64 = -2.;
    pub const LATCH_RELEASE_MARGIN: f64 = 1.;
    pub const LATCH_RELEASE_ALTITUDE: f64 = 8.;
    pub const EMERGENCY_ALTITUDE: f64 = 28.;
    // tuning baseline, scaled per difficulty
    pub const GLIDE_ALTITUDE: f64 = 140.;
    pub const BASE_MARGIN: f64 = 26.;
    pub const MARGIN_VELOCITY_GAIN: f64 = 0.22;
    pub const FINAL_APPROACH_VY: f64 = 16.;
    pub const CRUISE_VY: f64 = 55.;
}

/// Tunable controller parameters, fixed for the length of an episode.
#[derive(Clone, Copy, Debug)]
pub struct AutopilotTuning {
    pub glide_altitude: f64,
    pub base_margin: f64,
    pub margin_velocity_gain: f64,
    pub final_approach_vy: f64,
    pub cruise_vy: f64,
}

impl Default for AutopilotTuning {
    fn default() -> Self {
        Self {
            glide_altitude: defaults::GLIDE_ALTITUDE,
            base_margin: defaults::BASE_MARGIN,
            margin_velocity_gain: defaults::MARGIN_VELOCITY_GAIN,
            final_approach_vy: defaults::FINAL_APPROACH_VY,
            cruise_vy: defaults::CRUISE_VY,
        }
    }
}

impl AutopilotTuning {
    pub fn with_glide_altitude(self, glide_altitude: f64) -> Self {
        Self {
            glide_altitude,
            ..self
        }
    }

    pub fn with_base_margin(self, base_margin: f64) -> Self {
        Self {
            base_margin,
            ..self
        }
    }

    pub fn with_margin_velocity_gain(self, margin_velocity_gain: f64) -> Self {
        Self {
            margin_velocity_gain,
            ..self
        }
    }

    pub fn with_final_approach_vy(self, final_approach_vy: f64) -> Self {
        Self {
            final_approach_vy,
            ..self
        }
    }

    pub fn with_cruise_vy(self, cruise_vy: f64) -> Self {
        Self { cruise_vy, ..self }
    }
}

/// Controller memory carried across ticks. One per craft, so batch runs
/// of many simultaneous landers stay independent.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutopilotState {
    /// Burn hysteresis latch: set and released at different thresholds
    /// so thrust does not chatter near the decision boundary.
    pub burning: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Autopilot {
    tuning: AutopilotTuning,
}

impl Autopilot {
    pub fn new(tuning: AutopilotTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &AutopilotTuning {
        &self.tuning
    }

    /// One control decision. Deterministic: identical lander, terrain,
    /// tuning and latch always produce the same output.
    pub fn compute(
        &self,
        lander: &LanderState,
        terrain: &Terrain,
        physics: &Physics,
        state: &mut AutopilotState,
    ) -> ControlInput {
        let mut input = ControlInput::idle();
        if lander.fuel <= 0. {
            return input;
        }

        let pad = terrain.pad();
        let altitude = terrain.height_at(lander.x) - (lander.y + lander.radius);

        let tilt = self.desired_tilt(lander, pad.center_x(), pad.half_width(), altitude);
        let error = normalize_angle(tilt - lander.angle);
        if error > defaults::TILT_DEAD_BAND {
            input.right = true;
        } else if error < -defaults::TILT_DEAD_BAND {
            input.left = true;
        }

        self.update_burn_latch(lander, physics, altitude, state);
        input.thrust = state.burning;
        input
    }

    /// PD on horizontal error, with authority faded out near the ground
    /// so the engine keeps its vertical braking capacity.
    fn desired_tilt(
        &self,
        lander: &LanderState,
        pad_center_x: f64,
        pad_half_width: f64,
        altitude: f64,
    ) -> f64 {
        let ex = pad_center_x - lander.x;
        let mut tilt =
            (defaults::KP * ex + defaults::KD * -lander.vx).clamp(-defaults::MAX_TILT, defaults::MAX_TILT);

        let authority = (altitude / self.tuning.glide_altitude).clamp(0., 1.);
        tilt *= authority;

        if ex.abs() < defaults::NEAR_PAD_FRACTION * pad_half_width {
            tilt *= defaults::NEAR_PAD_DAMP;
        }
        if altitude < defaults::LOW_TILT_ALTITUDE {
            tilt = tilt.clamp(-defaults::LOW_TILT_LIMIT, defaults::LOW_TILT_LIMIT);
        }
        if altitude < defaults::FLARE_ALTITUDE {
            // final flare: all thrust goes into arresting the descent
            tilt = 0.;
        }
        tilt
    }

    /// Stopping-distance burn decision with an asymmetric on/off latch.
    fn update_burn_latch(
        &self,
        lander: &LanderState,
        physics: &Physics,
        altitude: f64,
        state: &mut AutopilotState,
    ) {
        let v_final = if altitude < defaults::FINAL_VY_ALTITUDE {
            self.tuning.final_approach_vy
        } else {
            self.tuning.cruise_vy
        };

        if state.burning {
            if lander.vy <= v_final + defaults::LATCH_RELEASE_MARGIN
                || altitude < defaults::LATCH_RELEASE_ALTITUDE
            {
                state.burning = false;
            }
            return;
        }

        let a_on = physics.braking_accel(lander.angle);
        let mut fire = false;
        // the division is only meaningful while the burn can decelerate
        if a_on < 0. && lander.vy > v_final {
            let s_stop = (v_final * v_final - lander.vy * lander.vy) / (2. * a_on);
            let margin = self.tuning.base_margin + self.tuning.margin_velocity_gain * lander.vy;
            fire = s_stop + margin >= altitude;
        }
        // badly tilted with weak braking authority: level out before burning
        if fire
            && lander.angle.abs() > defaults::LEVEL_FIRST_ANGLE
            && altitude > defaults::LEVEL_FIRST_ALTITUDE
            && a_on >= defaults::WEAK_BRAKE_ACCEL
        {
            fire = false;
        }
        if altitude < defaults::EMERGENCY_ALTITUDE && lander.vy > v_final {
            fire = true;
        }
        state.burning = fire;
    }
}
