//! Driving input: key bindings, live key state and per-tick snapshots.
//!
//! # Invariants
//! - The simulation consumes [`InputSnapshot`]s, never raw key events.
//! - Start is latched until consumed; directional controls are held state.

pub mod action;
pub mod bindings;
pub mod state;

pub use action::{Action, Control};
pub use bindings::KeyBindings;
pub use state::{InputSnapshot, InputState};
