use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::types::VehicleStyle;

/// Errors raised while loading or validating a [`DriveConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Road geometry and the streaming window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Length of one road segment along the travel axis.
    pub segment_length: f32,
    /// Width of the paved surface.
    pub road_width: f32,
    /// Maximum number of live road segments.
    pub window_size: usize,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            segment_length: 100.0,
            road_width: 10.0,
            window_size: 10,
        }
    }
}

/// Player handling constants. Speeds are in world units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_speed: f32,
    /// Speed gained per tick while accelerating.
    pub acceleration: f32,
    /// Speed lost per tick while braking or reversing.
    pub braking: f32,
    /// Multiplicative decay applied per tick with no throttle input.
    pub coast_factor: f32,
    /// Heading change per tick of steering, in radians.
    pub turn_rate: f32,
    pub style: VehicleStyle,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_speed: 1.0,
            acceleration: 0.01,
            braking: 0.01,
            coast_factor: 0.95,
            turn_rate: 0.03,
            style: VehicleStyle::Sedan,
        }
    }
}

/// Traffic spawn and lifetime rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Chance that a new segment brings one traffic agent.
    pub spawn_probability: f64,
    /// Fraction of player speed that carries every agent forward each tick.
    pub speed_factor: f32,
    /// Minimum spawn distance past the new segment, in segment lengths.
    pub spawn_offset_min: f32,
    /// Random extra spawn distance, in segment lengths.
    pub spawn_offset_jitter: f32,
    /// Agents further than this behind the player are removed.
    pub despawn_behind: f32,
    /// When set, agents further than this ahead of the player are removed too.
    pub despawn_ahead: Option<f32>,
    /// Height at which agents ride.
    pub ride_height: f32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 1.0,
            speed_factor: 0.8,
            spawn_offset_min: 1.5,
            spawn_offset_jitter: 1.0,
            despawn_behind: 100.0,
            despawn_ahead: None,
            ride_height: 0.25,
        }
    }
}

/// Scenery batch spawned alongside every new segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    pub trees_min: u32,
    pub trees_max: u32,
    pub tree_distance_min: f32,
    pub tree_distance_jitter: f32,
    pub mountain_probability: f64,
    pub mountain_distance_min: f32,
    pub mountain_distance_jitter: f32,
    pub cloud_probability: f64,
    /// Forward jitter of each prop, in segment lengths.
    pub forward_jitter: f32,
    /// Props further than this many segment lengths behind are culled.
    pub cull_segments_behind: f32,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            trees_min: 5,
            trees_max: 12,
            tree_distance_min: 20.0,
            tree_distance_jitter: 20.0,
            mountain_probability: 0.4,
            mountain_distance_min: 50.0,
            mountain_distance_jitter: 30.0,
            cloud_probability: 0.3,
            forward_jitter: 1.5,
            cull_segments_behind: 2.0,
        }
    }
}

/// Collision response constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Speed multiplier applied per overlapping agent.
    pub damping: f32,
    /// Distance each party is pushed apart.
    pub pushback: f32,
    /// Input lockout after a collision, in milliseconds.
    pub cooldown_ms: u64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            damping: 0.7,
            pushback: 0.2,
            cooldown_ms: 500,
        }
    }
}

impl CollisionConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Engine tone mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub min_frequency: f32,
    pub max_frequency: f32,
    /// Gain once the session is running. Gain is zero while idle.
    pub running_gain: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            min_frequency: 40.0,
            max_frequency: 150.0,
            running_gain: 0.1,
        }
    }
}

/// Complete configuration of one driving session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// RNG seed; a fixed default is used when absent.
    pub seed: Option<u64>,
    pub road: RoadConfig,
    pub player: PlayerConfig,
    pub traffic: TrafficConfig,
    pub scenery: SceneryConfig,
    pub collision: CollisionConfig,
    pub audio: AudioConfig,
}

pub const DEFAULT_SEED: u64 = 0x5eed_0f_d21e;

impl DriveConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(src: &str) -> Result<Self, ConfigError> {
        let config: DriveConfig = serde_yaml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&src)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn seed_or_default(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Distance behind the player past which scenery is culled.
    pub fn prop_cull_distance(&self) -> f32 {
        self.scenery.cull_segments_behind * self.road.segment_length
    }

    /// Every float in the config, for the finiteness check.
    fn floats(&self) -> [f64; 24] {
        let (r, p, t, s, c, a) = (
            &self.road,
            &self.player,
            &self.traffic,
            &self.scenery,
            &self.collision,
            &self.audio,
        );
        [
            r.segment_length as f64,
            r.road_width as f64,
            p.max_speed as f64,
            p.acceleration as f64,
            p.braking as f64,
            p.coast_factor as f64,
            p.turn_rate as f64,
            t.spawn_probability,
            t.speed_factor as f64,
            t.spawn_offset_min as f64,
            t.spawn_offset_jitter as f64,
            t.despawn_behind as f64,
            t.despawn_ahead.unwrap_or(1.0) as f64,
            t.ride_height as f64,
            s.tree_distance_min as f64,
            s.tree_distance_jitter as f64,
            s.mountain_probability,
            s.mountain_distance_min as f64,
            s.mountain_distance_jitter as f64,
            s.cloud_probability,
            s.forward_jitter as f64,
            s.cull_segments_behind as f64,
            c.damping as f64 + c.pushback as f64,
            a.min_frequency as f64 + a.max_frequency as f64 + a.running_gain as f64,
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.floats().iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid("every numeric setting must be finite"));
        }

        let road = &self.road;
        if !(road.segment_length > 0.0) || !(road.road_width > 0.0) {
            return Err(ConfigError::Invalid(
                "segment_length and road_width must be positive",
            ));
        }
        if road.window_size < 2 {
            return Err(ConfigError::Invalid("window_size must be at least 2"));
        }

        let player = &self.player;
        if !(player.max_speed > 0.0) {
            return Err(ConfigError::Invalid("max_speed must be positive"));
        }
        if player.acceleration < 0.0 || player.braking < 0.0 || player.turn_rate < 0.0 {
            return Err(ConfigError::Invalid(
                "acceleration, braking and turn_rate must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&player.coast_factor) {
            return Err(ConfigError::Invalid("coast_factor must be in [0, 1]"));
        }

        let traffic = &self.traffic;
        if !(0.0..=1.0).contains(&traffic.spawn_probability) {
            return Err(ConfigError::Invalid(
                "traffic spawn_probability must be in [0, 1]",
            ));
        }
        if !(0.0..1.0).contains(&traffic.speed_factor) {
            return Err(ConfigError::Invalid("traffic speed_factor must be in [0, 1)"));
        }
        if traffic.spawn_offset_min < 0.0 || traffic.spawn_offset_jitter < 0.0 {
            return Err(ConfigError::Invalid("traffic spawn offsets must be non-negative"));
        }
        if !(traffic.despawn_behind > 0.0) {
            return Err(ConfigError::Invalid("despawn_behind must be positive"));
        }
        if let Some(ahead) = traffic.despawn_ahead {
            if !(ahead > 0.0) {
                return Err(ConfigError::Invalid("despawn_ahead must be positive"));
            }
        }

        let length = road.segment_length;
        let farthest_spawn = (traffic.spawn_offset_min + traffic.spawn_offset_jitter) * length;
        if !farthest_spawn.is_finite() {
            return Err(ConfigError::Invalid("traffic spawn distance overflows"));
        }

        let scenery = &self.scenery;
        if scenery.trees_min > scenery.trees_max {
            return Err(ConfigError::Invalid("trees_min cannot exceed trees_max"));
        }
        if !(0.0..=1.0).contains(&scenery.mountain_probability)
            || !(0.0..=1.0).contains(&scenery.cloud_probability)
        {
            return Err(ConfigError::Invalid(
                "scenery probabilities must be in [0, 1]",
            ));
        }
        if scenery.tree_distance_min < 0.0
            || scenery.tree_distance_jitter < 0.0
            || scenery.mountain_distance_min < 0.0
            || scenery.mountain_distance_jitter < 0.0
            || scenery.forward_jitter < 0.0
        {
            return Err(ConfigError::Invalid("scenery distances must be non-negative"));
        }
        let widest_scenery = scenery.forward_jitter * length
            + (scenery.tree_distance_min + scenery.tree_distance_jitter)
            + (scenery.mountain_distance_min + scenery.mountain_distance_jitter);
        if !widest_scenery.is_finite() || !(scenery.cull_segments_behind * length).is_finite() {
            return Err(ConfigError::Invalid("scenery distances overflow"));
        }
        if !(scenery.cull_segments_behind > 0.0) {
            return Err(ConfigError::Invalid("cull_segments_behind must be positive"));
        }

        let collision = &self.collision;
        if !(0.0..1.0).contains(&collision.damping) {
            return Err(ConfigError::Invalid("collision damping must be in [0, 1)"));
        }
        if collision.pushback < 0.0 {
            return Err(ConfigError::Invalid("collision pushback must be non-negative"));
        }

        let audio = &self.audio;
        if !(audio.min_frequency > 0.0) || audio.max_frequency < audio.min_frequency {
            return Err(ConfigError::Invalid(
                "audio frequency band must be positive and ordered",
            ));
        }
        if audio.running_gain < 0.0 {
            return Err(ConfigError::Invalid("running_gain must be non-negative"));
        }

        Ok(())
    }
}
