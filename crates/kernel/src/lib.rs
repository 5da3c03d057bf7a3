//! World kernel: the authoritative driving world and its ordered tick.
//!
//! # Invariants
//! - One tick runs input, player integration, streaming, culling, traffic and
//!   collisions, in that order, synchronously.
//! - Nothing mutates while the session is idle except the transition to
//!   running.
//! - The same config and input sequence produce the same `state_hash`.

pub mod collision;
pub mod player;
pub mod traffic;
pub mod world;

pub use collision::{CollisionOutcome, CollisionRecord};
pub use player::{KMH_PER_UNIT, PlayerState};
pub use world::{Ground, Lifecycle, TickReport, World, WorldError, WorldEvent};
