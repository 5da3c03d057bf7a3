//! wgpu render backend for the driving scene.
//!
//! Draws a [`motorway_render::Frame`] as lit, distance-fogged instanced boxes
//! on a sky-colored clear.
//!
//! # Invariants
//! - The renderer only reads frames; it never sees the world.
//! - Frame rate is independent of the fixed simulation tick.

mod gpu;
mod shaders;
mod viewport;

pub use gpu::{InstanceData, WgpuRenderer, build_instances};
pub use viewport::Viewport;
