use motorway_common::{AgentId, VehicleStyle};
use motorway_kernel::{Lifecycle, World};
use serde::Serialize;

/// Read-only queries against the world for HUDs, the CLI and logs.
pub struct WorldInspector;

impl WorldInspector {
    /// Snapshot of the lifecycle, player and pool sizes.
    pub fn summary(world: &World) -> DriveSummary {
        let player = world.player();
        let pools = world.pools();
        DriveSummary {
            tick: world.tick(),
            lifecycle: world.lifecycle(),
            clock_secs: world.clock().as_secs_f64(),
            position: player.position.to_array(),
            heading: player.heading,
            speed: player.speed,
            speed_kmh: player.speed_kmh(),
            segments: pools.segment_count(),
            props: pools.prop_count(),
            traffic: pools.traffic_count(),
            frontier: pools.frontier(),
            collisions: world.collisions_total(),
            in_cooldown: world.in_cooldown(),
            pending_events: world.events().len(),
            state_hash: world.state_hash(),
        }
    }

    /// Details for one agent, or `None` once it has been culled.
    pub fn inspect_agent(world: &World, id: AgentId) -> Option<AgentInfo> {
        let player_z = world.player().position.z;
        world.pools().agent(id).map(|agent| AgentInfo {
            id,
            style: agent.style,
            position: agent.position.to_array(),
            gap: agent.position.z - player_z,
        })
    }

    /// Agents ordered by creation.
    pub fn list_agents(world: &World) -> Vec<AgentId> {
        world.pools().traffic().map(|a| a.id).collect()
    }

    /// The nearest agent ahead of the player in its lane, if any.
    pub fn next_in_lane(world: &World, lane_half_width: f32) -> Option<AgentInfo> {
        let player = world.player().position;
        world
            .pools()
            .traffic()
            .filter(|a| {
                a.position.z >= player.z && (a.position.x - player.x).abs() <= lane_half_width
            })
            .min_by(|a, b| a.position.z.total_cmp(&b.position.z))
            .and_then(|a| Self::inspect_agent(world, a.id))
    }
}

/// Speed readout as shown on the HUD.
pub fn hud_speed(world: &World) -> String {
    format!("{:.1} km/h", world.player().speed_kmh())
}

/// Point-in-time view of a drive, printed by the CLI and the debug panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveSummary {
    pub tick: u64,
    pub lifecycle: Lifecycle,
    pub clock_secs: f64,
    pub position: [f32; 3],
    pub heading: f32,
    pub speed: f32,
    pub speed_kmh: f32,
    pub segments: usize,
    pub props: usize,
    pub traffic: usize,
    pub frontier: Option<f32>,
    pub collisions: u64,
    pub in_cooldown: bool,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for DriveSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Drive: tick={} {:?} z={:.1} speed={:.1} km/h segments={} props={} traffic={} collisions={}",
            self.tick,
            self.lifecycle,
            self.position[2],
            self.speed_kmh,
            self.segments,
            self.props,
            self.traffic,
            self.collisions,
        )?;
        if self.in_cooldown {
            write!(f, " [cooldown]")?;
        }
        Ok(())
    }
}

/// One traffic agent as seen from the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentInfo {
    pub id: AgentId,
    pub style: VehicleStyle,
    pub position: [f32; 3],
    /// Signed distance ahead of the player along z.
    pub gap: f32,
}

impl std::fmt::Display for AgentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Agent #{} {} pos=({:.2}, {:.2}, {:.2}) gap={:.1}",
            self.id.0,
            self.style.name(),
            self.position[0],
            self.position[1],
            self.position[2],
            self.gap,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use motorway_common::{DriveConfig, TRAFFIC_COLORS};
    use motorway_input::InputSnapshot;
    use std::time::Duration;

    fn world() -> World {
        World::new(DriveConfig::default()).unwrap()
    }

    #[test]
    fn summary_of_fresh_world() {
        let w = world();
        let s = WorldInspector::summary(&w);
        assert_eq!(s.tick, 0);
        assert_eq!(s.lifecycle, Lifecycle::Idle);
        assert_eq!(s.segments, 10);
        assert_eq!(s.traffic, 0);
        assert_eq!(s.frontier, Some(900.0));
        assert!(!s.in_cooldown);
        assert_eq!(s.state_hash, w.state_hash());
    }

    #[test]
    fn summary_after_driving() {
        let mut w = world();
        w.start();
        for _ in 0..30 {
            w.step(&InputSnapshot::forward(), Duration::from_millis(16));
        }
        let s = WorldInspector::summary(&w);
        assert_eq!(s.tick, 30);
        assert!((s.speed_kmh - 30.0).abs() < 1e-3);
        assert!(s.position[2] > 0.0);
        assert!(format!("{s}").contains("tick=30"));
    }

    #[test]
    fn hud_speed_has_one_decimal() {
        let mut w = world();
        w.player_mut().speed = -0.4567;
        assert_eq!(hud_speed(&w), "45.7 km/h");
    }

    #[test]
    fn agents_can_be_inspected() {
        let mut w = world();
        let pools = w.pools_mut();
        let far = pools.insert_agent(Vec3::new(0.0, 0.25, 60.0), VehicleStyle::Truck, TRAFFIC_COLORS[0]);
        let near = pools.insert_agent(Vec3::new(0.0, 0.25, 20.0), VehicleStyle::Van, TRAFFIC_COLORS[1]);
        pools.insert_agent(Vec3::new(2.5, 0.25, 10.0), VehicleStyle::Sport, TRAFFIC_COLORS[2]);

        assert_eq!(WorldInspector::list_agents(&w).len(), 3);
        let info = WorldInspector::inspect_agent(&w, far).unwrap();
        assert_eq!(info.gap, 60.0);
        assert!(format!("{info}").contains("truck"));

        let next = WorldInspector::next_in_lane(&w, 1.25).unwrap();
        assert_eq!(next.id, near);
        assert!(WorldInspector::inspect_agent(&w, AgentId(999)).is_none());
    }
}
