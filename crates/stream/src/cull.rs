use motorway_common::DriveConfig;

use crate::pool::{SceneryProp, TrafficAgent, WorldPools};

/// Distances past which pooled objects are released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullRules {
    pub prop_behind: f32,
    pub traffic_behind: f32,
    pub traffic_ahead: Option<f32>,
}

impl CullRules {
    pub fn from_config(config: &DriveConfig) -> Self {
        Self {
            prop_behind: config.prop_cull_distance(),
            traffic_behind: config.traffic.despawn_behind,
            traffic_ahead: config.traffic.despawn_ahead,
        }
    }

    fn keep_prop(&self, prop: &SceneryProp, player_z: f32) -> bool {
        prop.position.z >= player_z - self.prop_behind
    }

    fn keep_agent(&self, agent: &TrafficAgent, player_z: f32) -> bool {
        let z = agent.position.z;
        if z < player_z - self.traffic_behind {
            return false;
        }
        match self.traffic_ahead {
            Some(ahead) => z <= player_z + ahead,
            None => true,
        }
    }
}

/// Objects released by one [`cull`] pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullReport {
    pub props: Vec<SceneryProp>,
    pub traffic: Vec<TrafficAgent>,
    /// How many of the released objects had non-finite positions.
    pub invalid: usize,
}

impl CullReport {
    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.traffic.is_empty()
    }
}

/// Release scenery and traffic that fell outside the rules around `player_z`.
///
/// Entries with a non-finite position are released as well. Every entry is
/// examined exactly once per pass.
pub fn cull(pools: &mut WorldPools, player_z: f32, rules: &CullRules) -> CullReport {
    let _span = tracing::trace_span!("cull", player_z).entered();
    let mut invalid = 0usize;

    let props = pools.retain_props(|prop| {
        if !prop.is_finite() {
            invalid += 1;
            tracing::warn!(prop = prop.id.0, "dropping prop with invalid position");
            return false;
        }
        rules.keep_prop(prop, player_z)
    });

    let traffic = pools.retain_traffic(|agent| {
        if !agent.is_finite() {
            invalid += 1;
            tracing::warn!(agent = agent.id.0, "dropping agent with invalid position");
            return false;
        }
        rules.keep_agent(agent, player_z)
    });

    if !props.is_empty() || !traffic.is_empty() {
        tracing::trace!(props = props.len(), traffic = traffic.len(), "culled");
    }

    CullReport {
        props,
        traffic,
        invalid,
    }
}
