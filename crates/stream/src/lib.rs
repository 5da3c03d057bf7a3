//! Endless road streaming: object pools, procedural spawning and culling.
//!
//! # Invariants
//! - At most `window_size` road segments are live after any update.
//! - The road grows by at most one segment per update and the oldest segment
//!   is the one evicted.
//! - All randomness flows through the seeded [`Spawner`], so a seed fully
//!   determines the streamed world for a given input sequence.

mod controller;
mod cull;
mod pool;
mod spawner;
mod timing;

pub use controller::{StreamController, StreamUpdate};
pub use cull::{CullReport, CullRules, cull};
pub use pool::{RoadSegment, SceneryProp, TrafficAgent, WorldPools};
pub use spawner::Spawner;
pub use timing::TickTimer;
