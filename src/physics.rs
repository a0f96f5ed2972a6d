use std::f64::consts::{PI, TAU};

pub(crate) mod defaults {
    pub const GRAVITY: f64 = 62.;
    pub const MAIN_THRUST_ACCEL: f64 = 150.;
    pub const ROTATION_ACCEL: f64 = 3.4;
    pub const FUEL_BURN_MAIN: f64 = 14.;
    pub const FUEL_BURN_ROTATION: f64 = 4.;
    // per-frame decay factor at the 60 Hz reference rate
    pub const ANGULAR_DAMPING: f64 = 0.97;
    // per-tick velocity factor, not dt-scaled
    pub const AIR_DAMPING: f64 = 0.0008;
    pub const WORLD_WIDTH: f64 = 800.;
    pub const WORLD_HEIGHT: f64 = 600.;
    pub const LANDER_RADIUS: f64 = 14.;
    pub const WALL_BOUNCE: f64 = 0.2;
    pub const WALL_PADDING: f64 = 2.;
    /// Largest timestep the integrator is meant to see; the session loop
    /// clamps to this before integrating.
    pub const MAX_DT: f64 = 1. / 30.;
}

/// Wrap an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let angle = angle.rem_euclid(TAU);
    if angle > PI {
        angle - TAU
    } else {
        angle
    }
}

/// Per-tick control intent, written by exactly one producer (autopilot or
/// manual keys) and consumed by the integrator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
}

impl ControlInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        !(self.left || self.right || self.thrust)
    }
}

#[derive(Clone, Debug)]
pub struct LanderState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Radians, 0 = nose up, kept in `(-PI, PI]`.
    pub angle: f64,
    pub omega: f64,
    pub fuel: f64,
    pub radius: f64,
}

impl Default for LanderState {
    fn default() -> Self {
        Self {
            x: 0.,
            y: 0.,
            vx: 0.,
            vy: 0.,
            angle: 0.,
            omega: 0.,
            fuel: 0.,
            radius: defaults::LANDER_RADIUS,
        }
    }
}

impl LanderState {
    pub fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    pub fn with_vx(self, vx: f64) -> Self {
        Self { vx, ..self }
    }

    pub fn with_vy(self, vy: f64) -> Self {
        Self { vy, ..self }
    }

    pub fn with_angle(self, angle: f64) -> Self {
        Self { angle, ..self }
    }

    pub fn with_omega(self, omega: f64) -> Self {
        Self { omega, ..self }
    }

    pub fn with_fuel(self, fuel: f64) -> Self {
        Self { fuel, ..self }
    }

    pub fn with_radius(self, radius: f64) -> Self {
        Self { radius, ..self }
    }
}

/// Physics parameter bundle, fixed for the length of an episode.
#[derive(Clone, Debug)]
pub struct Physics {
    gravity: f64,
    main_thrust_accel: f64,
    rotation_accel: f64,
    fuel_burn_main: f64,
    fuel_burn_rotation: f64,
    angular_damping: f64,
    air_damping: f64,
    world_width: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: defaults::GRAVITY,
            main_thrust_accel: defaults::MAIN_THRUST_ACCEL,
            rotation_accel: defaults::ROTATION_ACCEL,
            fuel_burn_main: defaults::FUEL_BURN_MAIN,
            fuel_burn_rotation: defaults::FUEL_BURN_ROTATION,
            angular_damping: defaults::ANGULAR_DAMPING,
            air_damping: defaults::AIR_DAMPING,
            world_width: defaults::WORLD_WIDTH,
        }
    }
}

impl Physics {
    pub fn with_gravity(self, gravity: f64) -> Self {
        Self { gravity, ..self }
    }

    pub fn with_main_thrust_accel(self, main_thrust_accel: f64) -> Self {
        Self {
            main_thrust_accel,
            ..self
        }
    }

    pub fn with_rotation_accel(self, rotation_accel: f64) -> Self {
        Self {
            rotation_accel,
            ..self
        }
    }

    pub fn with_world_width(self, world_width: f64) -> Self {
        Self {
            world_width,
            ..self
        }
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn main_thrust_accel(&self) -> f64 {
        self.main_thrust_accel
    }

    /// Net vertical acceleration while thrusting at the given tilt;
    /// negative means the burn can arrest a descent.
    pub fn braking_accel(&self, angle: f64) -> f64 {
        self.gravity - self.main_thrust_accel * angle.cos().max(0.)
    }

    /// One explicit-Euler step. `dt <= 0` is a no-op; the caller clamps
    /// dt to [`defaults::MAX_DT`] before calling.
    pub fn integrate(&self, mut lander: LanderState, input: ControlInput, dt: f64) -> LanderState {
        if dt <= 0. {
            return lander;
        }

        let mut ax = 0.;
        let mut ay = self.gravity;

        if input.thrust && lander.fuel > 0. {
            let (sin, cos) = lander.angle.sin_cos();
            ax += self.main_thrust_accel * sin;
            ay -= self.main_thrust_accel * cos;
            lander.fuel = (lander.fuel - self.fuel_burn_main * dt).max(0.);
        }

        if (input.left || input.right) && lander.fuel > 0. {
            lander.fuel = (lander.fuel - self.fuel_burn_rotation * dt).max(0.);
            if input.left {
                lander.omega -= self.rotation_accel * dt;
            }
            if input.right {
                lander.omega += self.rotation_accel * dt;
            }
        }

        lander.vx += ax * dt;
        lander.vy += ay * dt;
        // applied once per tick regardless of dt
        let drag = 1. - self.air_damping;
        lander.vx *= drag;
        lander.vy *= drag;

        lander.x += lander.vx * dt;
        lander.y += lander.vy * dt;

        lander.angle += lander.omega * dt;
        lander.omega *= self.angular_damping.powf(dt * 60.);
        lander.angle = normalize_angle(lander.angle);

        // soft bounce off the world edges, vertical motion untouched
        let wall = lander.radius + defaults::WALL_PADDING;
        if lander.x < wall {
            lander.x = wall;
            lander.vx = lander.vx.abs() * defaults::WALL_BOUNCE;
        } else if lander.x > self.world_width - wall {
            lander.x = self.world_width - wall;
            lander.vx = -lander.vx.abs() * defaults::WALL_BOUNCE;
        }

        lander
    }
}

#[cfg(test)]
mod physics_tests {
    use super::*;

    fn assert_feq(left: f64, right: f64) {
        if (left - right).abs() > 1e-9 {
            panic!("Float equal assertion failed, {left} != {right}");
        }
    }

    fn assert_close(left: f64, right: f64, range: f64) {
        if (left - right).abs() > range {
            panic!("Assertion failed {left} not close to {right} within a range {range}");
        }
    }

    fn falling_lander() -> LanderState {
        LanderState::default()
            .with_x(400.)
            .with_y(200.)
            .with_fuel(100.)
    }

    #[test]
    fn zero_dt_is_identity() {
        let lander = falling_lander().with_vx(12.).with_vy(-3.).with_omega(0.5);
        let input = ControlInput {
            thrust: true,
            left: true,
            right: false,
        };
        let after = Physics::default().integrate(lander.clone(), input, 0.);
        assert_feq(after.x, lander.x);
        assert_feq(after.y, lander.y);
        assert_feq(after.vy, lander.vy);
        assert_feq(after.fuel, lander.fuel);
        assert_feq(after.omega, lander.omega);
    }

    #[test]
    fn vanishing_dt_approaches_identity() {
        let lander = falling_lander().with_vx(20.).with_vy(30.);
        let after = Physics::default().integrate(lander.clone(), ControlInput::idle(), 1e-9);
        assert_close(after.x, lander.x, 1e-6);
        assert_close(after.y, lander.y, 1e-6);
        // velocity keeps the one per-tick air damping factor, nothing more
        assert_close(after.vy, lander.vy * (1. - defaults::AIR_DAMPING), 1e-6);
        assert_close(after.vx, lander.vx * (1. - defaults::AIR_DAMPING), 1e-6);
    }

    #[test]
    fn free_fall_accelerates_downward() {
        let lander = falling_lander();
        let dt = 1. / 60.;
        let after = Physics::default().integrate(lander, ControlInput::idle(), dt);
        assert!(after.vy > 0.);
        assert_close(after.vy, defaults::GRAVITY * dt, 0.01);
        assert!(after.y > 200.);
    }

    #[test]
    fn upright_thrust_is_purely_vertical() {
        let dt = 1. / 60.;
        let after = Physics::default().integrate(
            falling_lander(),
            ControlInput {
                thrust: true,
                ..Default::default()
            },
            dt,
        );
        assert_feq(after.vx, 0.);
        assert!(after.vy < 0., "level burn must out-pull gravity");
    }

    #[test]
    fn thrust_follows_nose_vector() {
        let dt = 1. / 60.;
        let after = Physics::default().integrate(
            falling_lander().with_angle(0.5),
            ControlInput {
                thrust: true,
                ..Default::default()
            },
            dt,
        );
        assert!(after.vx > 0., "tilt right pushes right");
    }

    #[test]
    fn fuel_floors_at_zero_and_thrust_cuts_out() {
        let physics = Physics::default();
        let dt = 1. / 60.;
        let mut lander = falling_lander().with_fuel(0.1);
        let input = ControlInput {
            thrust: true,
            right: true,
            ..Default::default()
        };
        let mut previous_fuel = lander.fuel;
        for _ in 0..200 {
            lander = physics.integrate(lander, input, dt);
            assert!(lander.fuel <= previous_fuel);
            assert!(lander.fuel >= 0.);
            previous_fuel = lander.fuel;
        }
        assert_feq(lander.fuel, 0.);

        // with a dry tank the same input must act like free fall
        let vy_before = lander.vy;
        let omega_before = lander.omega;
        lander = physics.integrate(lander, input, dt);
        assert_close(lander.vy, (vy_before + defaults::GRAVITY * dt) * (1. - defaults::AIR_DAMPING), 1e-9);
        assert_close(lander.omega, omega_before * defaults::ANGULAR_DAMPING.powf(dt * 60.), 1e-9);
    }

    #[test]
    fn both_fuel_draws_apply_in_one_tick() {
        let dt = 1. / 60.;
        let after = Physics::default().integrate(
            falling_lander().with_fuel(100.),
            ControlInput {
                thrust: true,
                left: true,
                ..Default::default()
            },
            dt,
        );
        let expected = 100. - (defaults::FUEL_BURN_MAIN + defaults::FUEL_BURN_ROTATION) * dt;
        assert_close(after.fuel, expected, 1e-9);
    }

    #[test]
    fn rotation_directions() {
        let dt = 1. / 60.;
        let physics = Physics::default();
        let left = physics.integrate(
            falling_lander(),
            ControlInput {
                left: true,
                ..Default::default()
            },
            dt,
        );
        assert!(left.omega < 0.);
        let right = physics.integrate(
            falling_lander(),
            ControlInput {
                right: true,
                ..Default::default()
            },
            dt,
        );
        assert!(right.omega > 0.);
    }

    #[test]
    fn angle_stays_normalized() {
        let physics = Physics::default();
        let dt = 1. / 60.;
        let mut lander = falling_lander().with_fuel(1e9);
        let input = ControlInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..10_000 {
            lander = physics.integrate(lander, input, dt);
            assert!(lander.angle > -PI && lander.angle <= PI, "angle {} out of range", lander.angle);
        }
    }

    #[test]
    fn normalize_angle_range() {
        assert_feq(normalize_angle(0.), 0.);
        assert_feq(normalize_angle(PI), PI);
        assert_feq(normalize_angle(-PI), PI);
        assert_feq(normalize_angle(3. * PI), PI);
        assert_feq(normalize_angle(TAU + 0.25), 0.25);
        assert_feq(normalize_angle(-0.25), -0.25);
    }

    #[test]
    fn wall_bounce_left() {
        let physics = Physics::default();
        let lander = falling_lander().with_x(10.).with_vx(-120.);
        let after = physics.integrate(lander, ControlInput::idle(), 1. / 60.);
        assert_feq(after.x, defaults::LANDER_RADIUS + defaults::WALL_PADDING);
        assert!(after.vx > 0., "bounce must point back into the map");
        assert!(after.vx < 120. * defaults::WALL_BOUNCE + 1.);
    }

    #[test]
    fn wall_bounce_right() {
        let physics = Physics::default();
        let lander = falling_lander().with_x(795.).with_vx(150.);
        let after = physics.integrate(lander, ControlInput::idle(), 1. / 60.);
        assert_feq(
            after.x,
            defaults::WORLD_WIDTH - defaults::LANDER_RADIUS - defaults::WALL_PADDING,
        );
        assert!(after.vx < 0.);
    }

    #[test]
    fn braking_accel_strongest_level() {
        let physics = Physics::default();
        let level = physics.braking_accel(0.);
        assert!(level < physics.braking_accel(0.5));
        assert!(level < 0.);
        // past ninety degrees the engine cannot brake at all
        assert_feq(physics.braking_accel(2.), defaults::GRAVITY);
    }
}
