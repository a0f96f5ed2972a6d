use std::fmt::Display;

use crate::physics::LanderState;
use crate::terrain::Terrain;

pub(crate) mod defaults {
    pub const MAX_HORIZONTAL_SPEED: f64 = 30.;
    pub const MAX_VERTICAL_SPEED: f64 = 42.;
    pub const MAX_ANGLE: f64 = 0.3;
}

/// Touchdown limits for a landing to count as successful.
#[derive(Clone, Copy, Debug)]
pub struct SafetyLimits {
    pub max_vx: f64,
    pub max_vy: f64,
    pub max_angle: f64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_vx: defaults::MAX_HORIZONTAL_SPEED,
            max_vy: defaults::MAX_VERTICAL_SPEED,
            max_angle: defaults::MAX_ANGLE,
        }
    }
}

impl SafetyLimits {
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            max_vx: self.max_vx * factor,
            max_vy: self.max_vy * factor,
            max_angle: self.max_angle * factor,
        }
    }
}

/// One violated touchdown limit. A crash reports every violated limit,
/// in this declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrashReason {
    MissedPad,
    Tilted,
    TooFastHorizontal,
    TooFastVertical,
}

impl Display for CrashReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            CrashReason::MissedPad => "missed pad",
            CrashReason::Tilted => "tilted",
            CrashReason::TooFastHorizontal => "too fast (h)",
            CrashReason::TooFastVertical => "too fast (v)",
        };
        write!(f, "{text}")
    }
}

pub fn describe_reasons(reasons: &[CrashReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Landed,
    Crashed(Vec<CrashReason>),
}

/// Result of a ground contact; `ground_y` lets the caller pin the craft
/// onto the surface.
#[derive(Clone, Debug)]
pub struct Touchdown {
    pub ground_y: f64,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, Default)]
pub struct CollisionChecker {
    limits: SafetyLimits,
}

impl CollisionChecker {
    pub fn new(limits: SafetyLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    /// `None` while the craft is airborne. Classification is a pure
    /// function of the contact state and the configured limits.
    pub fn evaluate(&self, lander: &LanderState, terrain: &Terrain) -> Option<Touchdown> {
        let ground_y = terrain.height_at(lander.x);
        if lander.y + lander.radius < ground_y {
            return None;
        }

        let mut reasons = Vec::new();
        if !terrain.pad().contains_x(lander.x) {
            reasons.push(CrashReason::MissedPad);
        }
        if lander.angle.abs() > self.limits.max_angle {
            reasons.push(CrashReason::Tilted);
        }
        if lander.vx.abs() > self.limits.max_vx {
            reasons.push(CrashReason::TooFastHorizontal);
        }
        if lander.vy.abs() > self.limits.max_vy {
            reasons.push(CrashReason::TooFastVertical);
        }

        let outcome = if reasons.is_empty() {
            Outcome::Landed
        } else {
            Outcome::Crashed(reasons)
        };
        Some(Touchdown { ground_y, outcome })
    }
}
