use motorway_stream::WorldPools;

/// Carry every agent forward by a fraction of the player's speed.
///
/// Agents never steer or change lane after spawning.
pub fn advance(pools: &mut WorldPools, player_speed: f32, speed_factor: f32) {
    let dz = player_speed * speed_factor;
    for agent in pools.traffic_mut() {
        agent.position.z += dz;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use motorway_common::{TRAFFIC_COLORS, VehicleStyle};

    #[test]
    fn agents_move_relative_to_player_speed() {
        let mut pools = WorldPools::new();
        let a = pools.insert_agent(Vec3::new(2.5, 0.25, 100.0), VehicleStyle::Van, TRAFFIC_COLORS[0]);
        let b = pools.insert_agent(Vec3::new(-2.5, 0.25, 40.0), VehicleStyle::Sport, TRAFFIC_COLORS[3]);

        advance(&mut pools, 1.0, 0.8);
        assert!((pools.agent(a).unwrap().position.z - 100.8).abs() < 1e-4);
        assert!((pools.agent(b).unwrap().position.z - 40.8).abs() < 1e-4);
        assert_eq!(pools.agent(a).unwrap().position.x, 2.5);
    }

    #[test]
    fn reversing_player_drags_traffic_back() {
        let mut pools = WorldPools::new();
        let a = pools.insert_agent(Vec3::new(0.0, 0.25, 10.0), VehicleStyle::Sedan, TRAFFIC_COLORS[1]);
        advance(&mut pools, -0.5, 0.8);
        assert!((pools.agent(a).unwrap().position.z - 9.6).abs() < 1e-5);
    }
}
