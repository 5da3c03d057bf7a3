use motorway_common::{AgentId, CollisionConfig};
use motorway_stream::WorldPools;
use serde::Serialize;
use std::time::Duration;

use crate::player::PlayerState;

/// One resolved player/agent overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionRecord {
    pub agent: AgentId,
    /// `atan2(dx, dz)` from the player to the agent.
    pub angle: f32,
    pub speed_before: f32,
    pub speed_after: f32,
}

/// Result of one collision pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    pub collisions: Vec<CollisionRecord>,
    /// Agents dropped for non-finite positions.
    pub dropped: Vec<AgentId>,
}

/// Test the player against every live agent and push overlapping pairs apart.
///
/// The player box is taken once before the pass. Agents are visited in id
/// order and each overlap damps speed, pushes both vehicles and re-arms the
/// cooldown independently, so several overlaps in one tick compound.
pub fn resolve(
    player: &mut PlayerState,
    pools: &mut WorldPools,
    clock: Duration,
    config: &CollisionConfig,
) -> CollisionOutcome {
    let dropped: Vec<AgentId> = pools
        .retain_traffic(|agent| agent.is_finite())
        .into_iter()
        .map(|agent| {
            tracing::warn!(agent = agent.id.0, "dropping agent with invalid position");
            agent.id
        })
        .collect();

    let player_box = player.bounds();
    let mut collisions = Vec::new();

    for agent in pools.traffic_mut() {
        if !player_box.intersects(&agent.bounds()) {
            continue;
        }
        let dx = agent.position.x - player.position.x;
        let dz = agent.position.z - player.position.z;
        let angle = dx.atan2(dz);
        let push = glam::Vec3::new(angle.sin(), 0.0, angle.cos()) * config.pushback;

        let speed_before = player.speed;
        player.speed *= config.damping;
        player.position -= push;
        agent.position += push;
        player.cooldown_until = clock + config.cooldown();

        tracing::debug!(
            agent = agent.id.0,
            angle,
            speed_before,
            speed_after = player.speed,
            "collision"
        );
        collisions.push(CollisionRecord {
            agent: agent.id,
            angle,
            speed_before,
            speed_after: player.speed,
        });
    }

    CollisionOutcome {
        collisions,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use motorway_common::{TRAFFIC_COLORS, VehicleStyle};

    fn truck_player(speed: f32) -> PlayerState {
        let mut p = PlayerState::new(VehicleStyle::Truck);
        p.speed = speed;
        p
    }

    #[test]
    fn overlap_damps_pushes_and_arms_cooldown() {
        let mut player = truck_player(0.8);
        let mut pools = WorldPools::new();
        let id = pools.insert_agent(Vec3::new(0.0, 0.25, 5.0), VehicleStyle::Truck, TRAFFIC_COLORS[0]);
        let config = CollisionConfig::default();
        let clock = Duration::from_secs(3);

        let out = resolve(&mut player, &mut pools, clock, &config);
        assert_eq!(out.collisions.len(), 1);
        assert_eq!(out.collisions[0].angle, 0.0);
        assert!((player.speed - 0.56).abs() < 1e-6);
        assert!((player.position.z + 0.2).abs() < 1e-6);
        assert!((pools.agent(id).unwrap().position.z - 5.2).abs() < 1e-5);
        assert_eq!(player.cooldown_until, clock + Duration::from_millis(500));
        assert!(player.in_cooldown(clock));
    }

    #[test]
    fn repeat_collision_restarts_cooldown() {
        let mut player = truck_player(0.8);
        let mut pools = WorldPools::new();
        pools.insert_agent(Vec3::new(0.0, 0.25, 3.0), VehicleStyle::Truck, TRAFFIC_COLORS[0]);
        let config = CollisionConfig::default();

        let first = Duration::from_millis(1_000);
        resolve(&mut player, &mut pools, first, &config);
        assert_eq!(player.cooldown_until, first + config.cooldown());

        let second = first + Duration::from_millis(200);
        assert!(player.in_cooldown(second));
        let out = resolve(&mut player, &mut pools, second, &config);
        assert_eq!(out.collisions.len(), 1);
        assert_eq!(player.cooldown_until, second + config.cooldown());
    }

    #[test]
    fn separated_vehicles_are_untouched() {
        let mut player = truck_player(0.8);
        let mut pools = WorldPools::new();
        pools.insert_agent(Vec3::new(0.0, 0.25, 20.0), VehicleStyle::Truck, TRAFFIC_COLORS[0]);
        pools.insert_agent(Vec3::new(5.0, 0.25, 0.0), VehicleStyle::Sedan, TRAFFIC_COLORS[1]);
        let out = resolve(&mut player, &mut pools, Duration::ZERO, &CollisionConfig::default());
        assert!(out.collisions.is_empty());
        assert_eq!(player.speed, 0.8);
        assert!(!player.in_cooldown(Duration::ZERO));
    }

    #[test]
    fn side_hit_pushes_laterally() {
        let mut player = PlayerState::new(VehicleStyle::Sedan);
        let mut pools = WorldPools::new();
        let id = pools.insert_agent(Vec3::new(2.0, 0.25, 0.0), VehicleStyle::Sedan, TRAFFIC_COLORS[2]);
        let out = resolve(&mut player, &mut pools, Duration::ZERO, &CollisionConfig::default());
        assert_eq!(out.collisions.len(), 1);
        assert!((out.collisions[0].angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((player.position.x + 0.2).abs() < 1e-6);
        assert!((pools.agent(id).unwrap().position.x - 2.2).abs() < 1e-6);
    }

    #[test]
    fn multiple_overlaps_compound() {
        let mut player = truck_player(1.0);
        let mut pools = WorldPools::new();
        pools.insert_agent(Vec3::new(0.0, 0.25, 4.0), VehicleStyle::Truck, TRAFFIC_COLORS[0]);
        pools.insert_agent(Vec3::new(0.0, 0.25, -4.0), VehicleStyle::Truck, TRAFFIC_COLORS[1]);
        let out = resolve(&mut player, &mut pools, Duration::ZERO, &CollisionConfig::default());
        assert_eq!(out.collisions.len(), 2);
        assert!((player.speed - 0.49).abs() < 1e-6);
        // Opposite pushes cancel on the player.
        assert!(player.position.z.abs() < 1e-5);
    }

    #[test]
    fn damping_never_increases_speed_magnitude() {
        for speed in [-0.5f32, -0.1, 0.0, 0.3, 1.0] {
            let mut player = truck_player(speed);
            let mut pools = WorldPools::new();
            pools.insert_agent(Vec3::new(0.5, 0.25, 1.0), VehicleStyle::Van, TRAFFIC_COLORS[4]);
            resolve(&mut player, &mut pools, Duration::ZERO, &CollisionConfig::default());
            assert!(player.speed.abs() <= speed.abs());
        }
    }

    #[test]
    fn non_finite_agents_are_dropped_before_testing() {
        let mut player = truck_player(0.5);
        let mut pools = WorldPools::new();
        let bad = pools.insert_agent(Vec3::new(f32::NAN, 0.25, 0.0), VehicleStyle::Truck, TRAFFIC_COLORS[0]);
        let out = resolve(&mut player, &mut pools, Duration::ZERO, &CollisionConfig::default());
        assert_eq!(out.dropped, vec![bad]);
        assert!(out.collisions.is_empty());
        assert_eq!(pools.traffic_count(), 0);
    }
}
