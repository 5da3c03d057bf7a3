use glam::Vec3;
use motorway_common::{Aabb, PlayerConfig, VehicleStyle};
use motorway_input::InputSnapshot;
use serde::Serialize;
use std::time::Duration;

/// Displayed speed units per world unit per tick.
pub const KMH_PER_UNIT: f32 = 100.0;

/// The player-controlled vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerState {
    pub position: Vec3,
    /// Yaw in radians; zero faces +z.
    pub heading: f32,
    /// Signed speed in world units per tick.
    pub speed: f32,
    pub style: VehicleStyle,
    /// Simulation time until which input is ignored.
    pub cooldown_until: Duration,
}

impl PlayerState {
    pub fn new(style: VehicleStyle) -> Self {
        Self {
            position: Vec3::ZERO,
            heading: 0.0,
            speed: 0.0,
            style,
            cooldown_until: Duration::ZERO,
        }
    }

    /// Unit travel direction for the current heading.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    pub fn bounds(&self) -> Aabb {
        self.style.bounds(self.position)
    }

    pub fn in_cooldown(&self, clock: Duration) -> bool {
        self.cooldown_until > clock
    }

    pub fn speed_kmh(&self) -> f32 {
        self.speed.abs() * KMH_PER_UNIT
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.heading.is_finite() && self.speed.is_finite()
    }

    /// Apply one tick of throttle and steering.
    pub fn apply_input(&mut self, input: &InputSnapshot, config: &PlayerConfig) {
        match input.throttle() {
            1 => self.speed = (self.speed + config.acceleration).min(config.max_speed),
            -1 => self.speed = (self.speed - config.braking).max(-config.max_speed / 2.0),
            _ => self.speed *= config.coast_factor,
        }
        self.heading += f32::from(input.steering()) * config.turn_rate;
    }

    /// Move along the heading by the current speed.
    pub fn integrate(&mut self) {
        self.position += self.forward() * self.speed;
    }
}
