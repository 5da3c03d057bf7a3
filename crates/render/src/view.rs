use glam::{Mat4, Vec3};
use motorway_common::Color;

pub const SKY_COLOR: Color = Color::from_hex(0x87ceeb);
pub const FOG_COLOR: Color = Color::from_hex(0xa3c1ad);

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    /// Distance at which fog starts.
    pub near: f32,
    /// Distance at which geometry is fully fogged.
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: FOG_COLOR,
            near: 100.0,
            far: 700.0,
        }
    }
}

impl Fog {
    /// Fog blend factor in `[0, 1]` for a fragment `distance` from the eye.
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Camera and atmosphere for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub fog: Fog,
    pub sky: Color,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, -10.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            fog: Fog::default(),
            sky: SKY_COLOR,
        }
    }
}

impl RenderView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Camera that trails the player along its heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    /// Horizontal distance behind the player.
    pub distance: f32,
    /// Absolute eye height.
    pub height: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            distance: 10.0,
            height: 5.0,
        }
    }
}

impl ChaseCamera {
    pub fn view(&self, position: Vec3, heading: f32) -> RenderView {
        let back = Vec3::new(heading.sin(), 0.0, heading.cos()) * self.distance;
        let mut eye = position - back;
        eye.y = self.height;
        RenderView {
            eye,
            target: position,
            ..RenderView::default()
        }
    }
}
