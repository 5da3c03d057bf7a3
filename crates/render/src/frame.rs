use glam::Vec3;
use motorway_common::{Color, MARKING_COLOR, PLAYER_COLOR, PropKind, ROAD_COLOR};
use motorway_kernel::World;

use crate::view::{ChaseCamera, RenderView};

const TRUNK_COLOR: Color = Color::from_hex(0x8b4513);
const SNOW_COLOR: Color = Color::from_hex(0xffffff);
/// Thickness given to flat surfaces so they can be drawn as boxes.
const SURFACE: f32 = 0.02;
const MARKING_WIDTH: f32 = 0.3;
const DASH_LENGTH: f32 = 3.0;
const DASH_SPACING: f32 = 6.0;

/// What a drawn box represents; renderers pick shading by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Ground,
    Road,
    Marking,
    Tree,
    Mountain,
    Cloud,
    Traffic,
    Player,
}

/// One box to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleObject {
    pub kind: ObjectKind,
    /// Box center in world space.
    pub center: Vec3,
    /// Full extents before rotation.
    pub size: Vec3,
    /// Rotation about +y.
    pub yaw: f32,
    pub color: Color,
}

impl VisibleObject {
    fn resting(kind: ObjectKind, base: Vec3, size: Vec3, yaw: f32, color: Color) -> Self {
        Self {
            kind,
            center: base + Vec3::new(0.0, size.y * 0.5, 0.0),
            size,
            yaw,
            color,
        }
    }
}

/// Everything a renderer needs for one frame. Built fresh from the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub view: RenderView,
    pub objects: Vec<VisibleObject>,
}

impl Frame {
    /// Number of objects of one kind in the frame.
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }
}

/// Collect the visible scene around the player.
///
/// Objects further than the far plane along the travel axis are skipped.
pub fn build_frame(world: &World, camera: &ChaseCamera) -> Frame {
    let player = world.player();
    let view = camera.view(player.position, player.heading);
    let reach = view.far;
    let near_z = |z: f32| (z - player.position.z).abs() <= reach;

    let mut objects = Vec::new();

    let ground = world.ground();
    objects.push(VisibleObject {
        kind: ObjectKind::Ground,
        center: Vec3::new(0.0, ground.y - SURFACE * 0.5, player.position.z),
        size: Vec3::new(ground.size.x, SURFACE, ground.size.y),
        yaw: 0.0,
        color: ground.color,
    });

    let road = &world.config().road;
    let half_length = road.segment_length * 0.5;
    for segment in world.pools().segments().filter(|s| near_z(s.z)) {
        objects.push(VisibleObject {
            kind: ObjectKind::Road,
            center: Vec3::new(0.0, -SURFACE * 0.5, segment.z),
            size: Vec3::new(road.road_width, SURFACE, road.segment_length),
            yaw: 0.0,
            color: ROAD_COLOR,
        });

        let dashes = (road.segment_length / DASH_SPACING).ceil() as usize;
        for i in 0..dashes {
            let z = segment.z - half_length + i as f32 * DASH_SPACING;
            objects.push(VisibleObject::resting(
                ObjectKind::Marking,
                Vec3::new(0.0, 0.0, z),
                Vec3::new(MARKING_WIDTH, SURFACE, DASH_LENGTH),
                0.0,
                MARKING_COLOR,
            ));
        }
        let edge = road.road_width * 0.5 - MARKING_WIDTH;
        for x in [-edge, edge] {
            objects.push(VisibleObject::resting(
                ObjectKind::Marking,
                Vec3::new(x, 0.0, segment.z),
                Vec3::new(MARKING_WIDTH, SURFACE, road.segment_length),
                0.0,
                MARKING_COLOR,
            ));
        }
    }

    for prop in world.pools().props().filter(|p| near_z(p.position.z)) {
        match prop.kind {
            PropKind::Tree => {
                let trunk = Vec3::new(prop.size.x * 0.25, prop.size.y * 0.57, prop.size.z * 0.25);
                objects.push(VisibleObject::resting(
                    ObjectKind::Tree,
                    prop.position,
                    trunk,
                    prop.yaw,
                    TRUNK_COLOR,
                ));
                let crown = Vec3::new(prop.size.x, prop.size.y - trunk.y * 0.5, prop.size.z);
                objects.push(VisibleObject::resting(
                    ObjectKind::Tree,
                    prop.position + Vec3::new(0.0, trunk.y * 0.5, 0.0),
                    crown,
                    prop.yaw,
                    prop.kind.color(),
                ));
            }
            PropKind::Mountain => {
                let body = Vec3::new(prop.size.x, prop.size.y * 0.7, prop.size.z);
                objects.push(VisibleObject::resting(
                    ObjectKind::Mountain,
                    prop.position,
                    body,
                    prop.yaw,
                    prop.kind.color(),
                ));
                objects.push(VisibleObject::resting(
                    ObjectKind::Mountain,
                    prop.position + Vec3::new(0.0, body.y, 0.0),
                    Vec3::new(prop.size.x * 0.3, prop.size.y * 0.3, prop.size.z * 0.3),
                    prop.yaw,
                    SNOW_COLOR,
                ));
            }
            PropKind::Cloud => objects.push(VisibleObject {
                kind: ObjectKind::Cloud,
                center: prop.position,
                size: prop.size,
                yaw: 0.0,
                color: prop.kind.color(),
            }),
        }
    }

    for agent in world.pools().traffic().filter(|a| near_z(a.position.z)) {
        objects.push(VisibleObject::resting(
            ObjectKind::Traffic,
            agent.position,
            agent.style.size(),
            0.0,
            agent.color,
        ));
    }

    objects.push(VisibleObject::resting(
        ObjectKind::Player,
        player.position,
        player.style.size(),
        player.heading,
        PLAYER_COLOR,
    ));

    tracing::trace!(objects = objects.len(), "frame built");
    Frame { view, objects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motorway_common::DriveConfig;

    fn world() -> World {
        World::new(DriveConfig::default()).unwrap()
    }

    #[test]
    fn frame_contains_every_layer() {
        let w = world();
        let frame = build_frame(&w, &ChaseCamera::default());
        assert_eq!(frame.count(ObjectKind::Ground), 1);
        assert_eq!(frame.count(ObjectKind::Player), 1);
        assert_eq!(frame.count(ObjectKind::Road), 10);
        // 17 dashes and two edge lines per segment.
        assert_eq!(frame.count(ObjectKind::Marking), 10 * 19);
        // Trees of the last segment may sit past the far plane.
        assert!(frame.count(ObjectKind::Tree) >= 2 * 5 * 9);
        assert_eq!(frame.count(ObjectKind::Traffic), 0);
    }

    #[test]
    fn player_box_rests_on_position() {
        let w = world();
        let frame = build_frame(&w, &ChaseCamera::default());
        let player = frame
            .objects
            .iter()
            .find(|o| o.kind == ObjectKind::Player)
            .unwrap();
        let size = w.player().style.size();
        assert_eq!(player.size, size);
        assert!((player.center.y - size.y * 0.5).abs() < 1e-6);
        assert_eq!(player.color, PLAYER_COLOR);
    }

    #[test]
    fn view_tracks_player() {
        let mut w = world();
        w.player_mut().position = Vec3::new(1.0, 0.0, 42.0);
        let frame = build_frame(&w, &ChaseCamera::default());
        assert_eq!(frame.view.target, Vec3::new(1.0, 0.0, 42.0));
        assert_eq!(frame.view.eye, Vec3::new(1.0, 5.0, 32.0));
    }

    #[test]
    fn distant_objects_are_skipped() {
        let mut w = world();
        w.player_mut().position = Vec3::new(0.0, 0.0, -1_500.0);
        let frame = build_frame(&w, &ChaseCamera::default());
        // Segments at 0..=900 are between 1500 and 2400 away.
        assert_eq!(frame.count(ObjectKind::Road), 0);
        assert_eq!(frame.count(ObjectKind::Ground), 1);
    }
}
