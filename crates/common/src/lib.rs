//! Shared types and configuration for the motorway workspace.
//!
//! # Invariants
//! - Ids are handed out in creation order; ordering ids orders by age.
//! - Every `DriveConfig` reaching the simulation has passed `validate`.

pub mod config;
pub mod types;

pub use config::{
    AudioConfig, CollisionConfig, ConfigError, DEFAULT_SEED, DriveConfig, PlayerConfig,
    RoadConfig, SceneryConfig, TrafficConfig,
};
pub use types::{
    Aabb, AgentId, Color, GROUND_COLOR, MARKING_COLOR, PLAYER_COLOR, PropId, PropKind,
    ROAD_COLOR, SegmentId, TRAFFIC_COLORS, VehicleStyle,
};
