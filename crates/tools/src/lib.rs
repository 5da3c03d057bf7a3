//! Developer tools: world inspector and HUD text.

mod inspector;

pub use inspector::{AgentInfo, DriveSummary, WorldInspector, hud_speed};
