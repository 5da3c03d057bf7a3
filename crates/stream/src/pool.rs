use glam::Vec3;
use motorway_common::{Aabb, AgentId, Color, PropId, PropKind, SegmentId, VehicleStyle};
use std::collections::BTreeMap;

/// One stretch of straight road centered on `z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadSegment {
    pub id: SegmentId,
    pub z: f32,
}

/// A pooled piece of roadside scenery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneryProp {
    pub id: PropId,
    pub kind: PropKind,
    /// Ground contact point for trees and mountains, center for clouds.
    pub position: Vec3,
    /// Full extents (width, height, depth).
    pub size: Vec3,
    /// Cosmetic rotation about the vertical axis.
    pub yaw: f32,
}

impl SceneryProp {
    /// World-space box used for culling.
    pub fn bounds(&self) -> Aabb {
        match self.kind {
            PropKind::Cloud => {
                let base = self.position - Vec3::new(0.0, self.size.y * 0.5, 0.0);
                Aabb::from_base(base, self.size)
            }
            PropKind::Tree | PropKind::Mountain => Aabb::from_base(self.position, self.size),
        }
    }

    /// False once a NaN or infinity has crept into the position.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
    }
}

/// A non-player vehicle. Heading is fixed along +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficAgent {
    pub id: AgentId,
    pub position: Vec3,
    pub style: VehicleStyle,
    pub color: Color,
}

impl TrafficAgent {
    /// Collision box for the agent's vehicle style.
    pub fn bounds(&self) -> Aabb {
        self.style.bounds(self.position)
    }

    /// Non-finite agents are dropped by the traffic step.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
    }
}

/// Live road segments, scenery and traffic.
///
/// Each pool is keyed by a monotonically increasing id, so iteration is in
/// creation order and the oldest entry is always the first key.
#[derive(Debug, Clone, Default)]
pub struct WorldPools {
    segments: BTreeMap<SegmentId, RoadSegment>,
    props: BTreeMap<PropId, SceneryProp>,
    traffic: BTreeMap<AgentId, TrafficAgent>,
    next_segment: u64,
    next_prop: u64,
    next_agent: u64,
    frontier: Option<f32>,
}

impl WorldPools {
    /// Empty pools with ids starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the forward-most segment ever created.
    pub fn frontier(&self) -> Option<f32> {
        self.frontier
    }

    /// Number of live road segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of live scenery props.
    pub fn prop_count(&self) -> usize {
        self.props.len()
    }

    /// Number of live traffic agents.
    pub fn traffic_count(&self) -> usize {
        self.traffic.len()
    }

    /// Live segments, oldest first.
    pub fn segments(&self) -> impl Iterator<Item = &RoadSegment> {
        self.segments.values()
    }

    /// Next segment in line for eviction.
    pub fn oldest_segment(&self) -> Option<&RoadSegment> {
        self.segments.values().next()
    }

    /// Live props, oldest first.
    pub fn props(&self) -> impl Iterator<Item = &SceneryProp> {
        self.props.values()
    }

    /// Live agents, oldest first.
    pub fn traffic(&self) -> impl Iterator<Item = &TrafficAgent> {
        self.traffic.values()
    }

    /// Mutable access for the per-tick advance.
    pub fn traffic_mut(&mut self) -> impl Iterator<Item = &mut TrafficAgent> {
        self.traffic.values_mut()
    }

    /// Look up a live agent.
    pub fn agent(&self, id: AgentId) -> Option<&TrafficAgent> {
        self.traffic.get(&id)
    }

    /// Look up a live agent for mutation.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut TrafficAgent> {
        self.traffic.get_mut(&id)
    }

    /// Look up a live prop.
    pub fn prop(&self, id: PropId) -> Option<&SceneryProp> {
        self.props.get(&id)
    }

    /// Append a segment at `z` and make it the frontier.
    pub fn push_segment(&mut self, z: f32) -> SegmentId {
        let id = SegmentId(self.next_segment);
        self.next_segment += 1;
        self.segments.insert(id, RoadSegment { id, z });
        self.frontier = Some(z);
        id
    }

    /// Remove the segment with the smallest creation id.
    pub fn evict_oldest(&mut self) -> Option<RoadSegment> {
        self.segments.pop_first().map(|(_, segment)| segment)
    }

    /// Add a prop under the next prop id.
    pub fn insert_prop(&mut self, kind: PropKind, position: Vec3, size: Vec3, yaw: f32) -> PropId {
        let id = PropId(self.next_prop);
        self.next_prop += 1;
        self.props.insert(
            id,
            SceneryProp {
                id,
                kind,
                position,
                size,
                yaw,
            },
        );
        id
    }

    /// Add an agent under the next agent id.
    pub fn insert_agent(&mut self, position: Vec3, style: VehicleStyle, color: Color) -> AgentId {
        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        self.traffic.insert(
            id,
            TrafficAgent {
                id,
                position,
                style,
                color,
            },
        );
        id
    }

    /// Remove an agent, returning it if it was live.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<TrafficAgent> {
        self.traffic.remove(&id)
    }

    /// Keep the props for which `keep` returns true; returns the removed ones.
    pub fn retain_props(&mut self, mut keep: impl FnMut(&SceneryProp) -> bool) -> Vec<SceneryProp> {
        let mut removed = Vec::new();
        self.props.retain(|_, prop| {
            let kept = keep(prop);
            if !kept {
                removed.push(*prop);
            }
            kept
        });
        removed
    }

    /// Keep the agents for which `keep` returns true; returns the removed ones.
    pub fn retain_traffic(
        &mut self,
        mut keep: impl FnMut(&TrafficAgent) -> bool,
    ) -> Vec<TrafficAgent> {
        let mut removed = Vec::new();
        self.traffic.retain(|_, agent| {
            let kept = keep(agent);
            if !kept {
                removed.push(*agent);
            }
            kept
        });
        removed
    }
}
