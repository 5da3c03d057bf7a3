//! Rendering adapter: frame description, chase camera and renderer contract.
//!
//! # Invariants
//! - Renderers receive a [`Frame`] and never touch the world.
//! - A frame is derived entirely from world state and a camera.

mod frame;
mod renderer;
mod view;

pub use frame::{Frame, ObjectKind, VisibleObject, build_frame};
pub use renderer::{DebugTextRenderer, Renderer};
pub use view::{ChaseCamera, FOG_COLOR, Fog, RenderView, SKY_COLOR};
