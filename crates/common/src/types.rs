use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Creation-order identifier of a road segment. Smaller ids are older.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub u64);

/// Identifier of a scenery prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropId(pub u64);

/// Identifier of a traffic agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

/// Linear RGB color in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self([
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        ])
    }

    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.0[0], self.0[1], self.0[2], alpha]
    }
}

pub const ROAD_COLOR: Color = Color::from_hex(0x555555);
pub const MARKING_COLOR: Color = Color::from_hex(0xffffff);
pub const GROUND_COLOR: Color = Color::from_hex(0x6b8e23);
pub const PLAYER_COLOR: Color = Color::from_hex(0xff0000);

/// Body colors handed out to traffic at spawn time.
pub const TRAFFIC_COLORS: [Color; 7] = [
    Color::from_hex(0x0000ff),
    Color::from_hex(0x00ff00),
    Color::from_hex(0xffff00),
    Color::from_hex(0xffa500),
    Color::from_hex(0x800080),
    Color::from_hex(0xffffff),
    Color::from_hex(0x000000),
];

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box of the given full `size` whose bottom face is centered on `base`.
    pub fn from_base(base: Vec3, size: Vec3) -> Self {
        let half = Vec3::new(size.x * 0.5, 0.0, size.z * 0.5);
        Self {
            min: base - half,
            max: base + half + Vec3::new(0.0, size.y, 0.0),
        }
    }

    /// Touching faces count as an overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Vehicle body style. Determines the collision box and the drawn silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStyle {
    #[default]
    Sedan,
    Truck,
    Van,
    Sport,
}

impl VehicleStyle {
    pub const ALL: [VehicleStyle; 4] = [
        VehicleStyle::Sedan,
        VehicleStyle::Truck,
        VehicleStyle::Van,
        VehicleStyle::Sport,
    ];

    /// Overall body extents as (width, height, length).
    pub fn size(self) -> Vec3 {
        match self {
            VehicleStyle::Sedan => Vec3::new(2.1, 1.45, 4.3),
            VehicleStyle::Truck => Vec3::new(2.3, 2.1, 5.2),
            VehicleStyle::Van => Vec3::new(2.5, 1.5, 4.5),
            VehicleStyle::Sport => Vec3::new(2.1, 0.95, 4.05),
        }
    }

    /// Collision box for a vehicle of this style standing at `position`.
    pub fn bounds(self, position: Vec3) -> Aabb {
        Aabb::from_base(position, self.size())
    }

    pub fn name(self) -> &'static str {
        match self {
            VehicleStyle::Sedan => "sedan",
            VehicleStyle::Truck => "truck",
            VehicleStyle::Van => "van",
            VehicleStyle::Sport => "sport",
        }
    }
}

/// Classification of pooled scenery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    Tree,
    Mountain,
    Cloud,
}

impl PropKind {
    pub fn color(self) -> Color {
        match self {
            PropKind::Tree => Color::from_hex(0x228b22),
            PropKind::Mountain => Color::from_hex(0x808080),
            PropKind::Cloud => Color::from_hex(0xffffff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_decode() {
        assert_eq!(Color::from_hex(0xff0000).0, [1.0, 0.0, 0.0]);
        assert_eq!(Color::from_hex(0x000000).0, [0.0, 0.0, 0.0]);
        let grey = Color::from_hex(0x808080).0;
        assert!((grey[1] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn aabb_from_base_rests_on_base() {
        let b = Aabb::from_base(Vec3::new(1.0, 0.5, 2.0), Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(b.min, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(b.max, Vec3::new(2.0, 1.5, 4.0));
        assert_eq!(b.size(), Vec3::new(2.0, 1.0, 4.0));
    }

    #[test]
    fn aabb_overlap_and_separation() {
        let a = Aabb::from_base(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_base(Vec3::new(0.5, 0.0, 0.5), Vec3::ONE);
        let c = Aabb::from_base(Vec3::new(3.0, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::from_base(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_base(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
    }

    #[test]
    fn trucks_five_apart_overlap() {
        let a = VehicleStyle::Truck.bounds(Vec3::ZERO);
        let b = VehicleStyle::Truck.bounds(Vec3::new(0.0, 0.25, 5.0));
        assert!(a.intersects(&b));

        let sedan = VehicleStyle::Sedan.bounds(Vec3::ZERO);
        let far = VehicleStyle::Sedan.bounds(Vec3::new(0.0, 0.0, 5.0));
        assert!(!sedan.intersects(&far));
    }

    #[test]
    fn segment_ids_order_by_creation() {
        assert!(SegmentId(1) < SegmentId(2));
    }
}
