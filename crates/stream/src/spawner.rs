use glam::Vec3;
use motorway_common::{
    AgentId, DriveConfig, PropId, PropKind, RoadConfig, SceneryConfig, TRAFFIC_COLORS,
    TrafficConfig, VehicleStyle,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::pool::WorldPools;

const TREE_SIZE: Vec3 = Vec3::new(2.0, 3.5, 2.0);

/// Procedural placement of scenery and traffic around newly created segments.
///
/// All randomness of the streamed world flows through the one seeded RNG held
/// here, so the same seed yields the same world.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SmallRng,
    road: RoadConfig,
    scenery: SceneryConfig,
    traffic: TrafficConfig,
}

impl Spawner {
    pub fn new(config: &DriveConfig) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed_or_default()),
            road: config.road.clone(),
            scenery: config.scenery.clone(),
            traffic: config.traffic.clone(),
        }
    }

    /// Uniform sample from `[0, span)`, or zero for an empty or unbounded span.
    fn jitter(&mut self, span: f32) -> f32 {
        if span > 0.0 && span.is_finite() {
            self.rng.gen_range(0.0..span)
        } else {
            0.0
        }
    }

    fn side(&mut self) -> f32 {
        if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 }
    }

    fn forward_offset(&mut self) -> f32 {
        self.jitter(self.scenery.forward_jitter * self.road.segment_length)
    }

    /// Trees, maybe a mountain and maybe a cloud near the segment at `z0`.
    pub fn scenery_batch(&mut self, z0: f32, pools: &mut WorldPools) -> Vec<PropId> {
        let mut spawned = Vec::new();

        let trees = self
            .rng
            .gen_range(self.scenery.trees_min..=self.scenery.trees_max);
        for _ in 0..trees {
            let side = self.side();
            let distance =
                self.scenery.tree_distance_min + self.jitter(self.scenery.tree_distance_jitter);
            let z = z0 + self.forward_offset();
            let yaw = self.jitter(TAU);
            spawned.push(pools.insert_prop(
                PropKind::Tree,
                Vec3::new(side * distance, 0.0, z),
                TREE_SIZE,
                yaw,
            ));
        }

        if self.rng.gen_bool(self.scenery.mountain_probability) {
            let radius = 10.0 + self.jitter(10.0);
            let height = 15.0 + self.jitter(15.0);
            let side = self.side();
            let distance = self.scenery.mountain_distance_min
                + self.jitter(self.scenery.mountain_distance_jitter);
            let z = z0 + self.forward_offset();
            let yaw = self.jitter(TAU);
            spawned.push(pools.insert_prop(
                PropKind::Mountain,
                Vec3::new(side * distance, 0.0, z),
                Vec3::new(radius * 2.0, height, radius * 2.0),
                yaw,
            ));
        }

        if self.rng.gen_bool(self.scenery.cloud_probability) {
            let radius = 2.0 + self.jitter(5.0);
            let x = self.rng.gen_range(-200.0..200.0);
            let y = 25.0 + self.jitter(15.0);
            let z = z0 + self.forward_offset();
            spawned.push(pools.insert_prop(
                PropKind::Cloud,
                Vec3::new(x, y, z),
                Vec3::splat(radius * 2.0),
                0.0,
            ));
        }

        tracing::trace!(z0, count = spawned.len(), "scenery batch spawned");
        spawned
    }

    /// Roll the spawn chance and, on success, place one agent ahead of `z0`.
    pub fn traffic_agent(&mut self, z0: f32, pools: &mut WorldPools) -> Option<AgentId> {
        if !self.rng.gen_bool(self.traffic.spawn_probability) {
            return None;
        }

        let color = TRAFFIC_COLORS[self.rng.gen_range(0..TRAFFIC_COLORS.len())];
        let style = VehicleStyle::ALL[self.rng.gen_range(0..VehicleStyle::ALL.len())];
        let lane = self.rng.gen_range(-1i32..=1) as f32;
        let length = self.road.segment_length;
        let offset = self.traffic.spawn_offset_min * length
            + self.jitter(self.traffic.spawn_offset_jitter * length);

        let position = Vec3::new(
            lane * (self.road.road_width / 4.0),
            self.traffic.ride_height,
            z0 + offset,
        );
        let id = pools.insert_agent(position, style, color);
        tracing::debug!(agent = id.0, style = style.name(), z = position.z, "traffic spawned");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner_with(config: DriveConfig) -> Spawner {
        config.validate().unwrap();
        Spawner::new(&config)
    }

    #[test]
    fn scenery_batch_respects_placement_bands() {
        let config = DriveConfig::default();
        let mut spawner = spawner_with(config.clone());
        let mut pools = WorldPools::new();

        for segment in 0..50 {
            let z0 = segment as f32 * 100.0;
            let ids = spawner.scenery_batch(z0, &mut pools);
            let trees = ids
                .iter()
                .filter(|id| pools.prop(**id).unwrap().kind == PropKind::Tree)
                .count();
            assert!((5..=12).contains(&trees), "tree count {trees}");

            for id in ids {
                let prop = pools.prop(id).unwrap();
                assert!(prop.position.z >= z0 && prop.position.z <= z0 + 150.0);
                let x = prop.position.x.abs();
                match prop.kind {
                    PropKind::Tree => assert!((20.0..40.0).contains(&x)),
                    PropKind::Mountain => assert!((50.0..80.0).contains(&x)),
                    PropKind::Cloud => {
                        assert!(x <= 200.0);
                        assert!((25.0..40.0).contains(&prop.position.y));
                    }
                }
            }
        }
    }

    #[test]
    fn traffic_spawns_in_lanes_ahead_of_segment() {
        let mut spawner = spawner_with(DriveConfig::default());
        let mut pools = WorldPools::new();
        for segment in 0..40 {
            let z0 = segment as f32 * 100.0;
            let id = spawner
                .traffic_agent(z0, &mut pools)
                .expect("spawn probability is 1.0");
            let agent = pools.agent(id).unwrap();
            assert!([-2.5, 0.0, 2.5].contains(&agent.position.x));
            assert_eq!(agent.position.y, 0.25);
            assert!(agent.position.z >= z0 + 150.0 && agent.position.z <= z0 + 250.0);
        }
    }

    #[test]
    fn zero_probability_never_spawns() {
        let mut config = DriveConfig::default();
        config.traffic.spawn_probability = 0.0;
        config.scenery.mountain_probability = 0.0;
        config.scenery.cloud_probability = 0.0;
        let mut spawner = spawner_with(config);
        let mut pools = WorldPools::new();
        for segment in 0..20 {
            assert!(spawner.traffic_agent(segment as f32 * 100.0, &mut pools).is_none());
            spawner.scenery_batch(segment as f32 * 100.0, &mut pools);
        }
        assert_eq!(pools.traffic_count(), 0);
        assert!(pools.props().all(|p| p.kind == PropKind::Tree));
    }

    #[test]
    fn zero_jitter_is_accepted() {
        let mut config = DriveConfig::default();
        config.scenery.forward_jitter = 0.0;
        config.scenery.tree_distance_jitter = 0.0;
        config.traffic.spawn_offset_jitter = 0.0;
        let mut spawner = spawner_with(config);
        let mut pools = WorldPools::new();
        spawner.scenery_batch(300.0, &mut pools);
        let id = spawner.traffic_agent(300.0, &mut pools).unwrap();
        assert_eq!(pools.agent(id).unwrap().position.z, 450.0);
        assert!(
            pools
                .props()
                .filter(|p| p.kind == PropKind::Tree)
                .all(|p| p.position.z == 300.0 && p.position.x.abs() == 20.0)
        );
    }

    #[test]
    fn unbounded_span_yields_no_jitter() {
        let mut spawner = spawner_with(DriveConfig::default());
        assert_eq!(spawner.jitter(f32::INFINITY), 0.0);
        assert_eq!(spawner.jitter(f32::NAN), 0.0);
        assert!(spawner.jitter(10.0) < 10.0);
    }

    #[test]
    fn same_seed_same_placements() {
        let mut config = DriveConfig::default();
        config.seed = Some(1234);
        let mut a = spawner_with(config.clone());
        let mut b = spawner_with(config);
        let mut pa = WorldPools::new();
        let mut pb = WorldPools::new();
        for segment in 0..10 {
            a.scenery_batch(segment as f32 * 100.0, &mut pa);
            b.scenery_batch(segment as f32 * 100.0, &mut pb);
        }
        let xs: Vec<Vec3> = pa.props().map(|p| p.position).collect();
        let ys: Vec<Vec3> = pb.props().map(|p| p.position).collect();
        assert_eq!(xs, ys);
    }
}
