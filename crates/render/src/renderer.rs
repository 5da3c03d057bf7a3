use std::fmt::Write;

use crate::frame::{Frame, ObjectKind};

/// Renderer-agnostic interface.
///
/// A renderer only ever sees a [`Frame`] built from the world, never the
/// world itself, so it cannot mutate simulation state.
pub trait Renderer {
    type Output;

    fn render(&mut self, frame: &Frame) -> Self::Output;
}

/// Renders a frame as a short text summary. Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &Frame) -> String {
        self.frames += 1;
        let v = &frame.view;
        let mut out = String::new();
        let _ = writeln!(out, "=== Frame {} ({} objects) ===", self.frames, frame.objects.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            v.eye.x, v.eye.y, v.eye.z, v.target.x, v.target.y, v.target.z, v.fov_degrees
        );
        let _ = writeln!(
            out,
            "Road: {}  Markings: {}  Trees: {}  Mountains: {}  Clouds: {}",
            frame.count(ObjectKind::Road),
            frame.count(ObjectKind::Marking),
            frame.count(ObjectKind::Tree),
            frame.count(ObjectKind::Mountain),
            frame.count(ObjectKind::Cloud),
        );
        for object in &frame.objects {
            let label = match object.kind {
                ObjectKind::Player => "player",
                ObjectKind::Traffic => "traffic",
                _ => continue,
            };
            let c = object.center;
            let _ = writeln!(out, "  {label:<7} pos=({:.2}, {:.2}, {:.2})", c.x, c.y, c.z);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ChaseCamera;
    use crate::frame::build_frame;
    use glam::Vec3;
    use motorway_common::{DriveConfig, TRAFFIC_COLORS, VehicleStyle};
    use motorway_kernel::World;

    #[test]
    fn debug_renderer_summarizes_frame() {
        let mut world = World::new(DriveConfig::default()).unwrap();
        world.pools_mut().insert_agent(
            Vec3::new(2.5, 0.25, 30.0),
            VehicleStyle::Van,
            TRAFFIC_COLORS[0],
        );
        let frame = build_frame(&world, &ChaseCamera::default());

        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&frame);
        assert!(output.contains("=== Frame 1"));
        assert!(output.contains("Road: 10"));
        assert!(output.contains("player"));
        assert!(output.contains("traffic pos=(2.50"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn frame_counter_advances() {
        let world = World::new(DriveConfig::default()).unwrap();
        let frame = build_frame(&world, &ChaseCamera::default());
        let mut renderer = DebugTextRenderer::new();
        renderer.render(&frame);
        renderer.render(&frame);
        assert_eq!(renderer.frames_rendered(), 2);
    }
}
