use motorway_common::{AgentId, DriveConfig, PropId, RoadConfig, SegmentId};

use crate::pool::{RoadSegment, WorldPools};
use crate::spawner::Spawner;

/// What one streaming update changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamUpdate {
    /// The segment created at the new frontier, if the world was extended.
    pub extended: Option<SegmentId>,
    /// The oldest segment, if the window overflowed and it was evicted.
    pub evicted: Option<RoadSegment>,
    pub spawned_props: Vec<PropId>,
    pub spawned_agent: Option<AgentId>,
}

impl StreamUpdate {
    pub fn is_empty(&self) -> bool {
        self.extended.is_none() && self.evicted.is_none()
    }
}

/// Keeps a window of road segments ahead of the player.
///
/// The controller extends the road by exactly one segment per update whenever
/// the player is within one segment length of the frontier, then trims the
/// window back to `window_size` by evicting the oldest segment.
#[derive(Debug, Clone)]
pub struct StreamController {
    road: RoadConfig,
    spawner: Spawner,
}

impl StreamController {
    pub fn new(config: &DriveConfig) -> Self {
        Self {
            road: config.road.clone(),
            spawner: Spawner::new(config),
        }
    }

    pub fn road(&self) -> &RoadConfig {
        &self.road
    }

    /// Lay out the initial window: `window_size` segments from `z = 0`, each
    /// with its scenery batch. No traffic is placed on the initial road.
    pub fn populate(&mut self, pools: &mut WorldPools) -> StreamUpdate {
        let mut update = StreamUpdate::default();
        for i in 0..self.road.window_size {
            let z = i as f32 * self.road.segment_length;
            let id = pools.push_segment(z);
            update.extended = Some(id);
            update
                .spawned_props
                .extend(self.spawner.scenery_batch(z, pools));
        }
        tracing::debug!(
            segments = pools.segment_count(),
            props = pools.prop_count(),
            frontier = pools.frontier(),
            "initial road laid out"
        );
        update
    }

    /// Whether a player at `player_z` requires a new segment.
    pub fn should_extend(&self, player_z: f32, pools: &WorldPools) -> bool {
        pools
            .frontier()
            .is_some_and(|frontier| player_z > frontier - self.road.segment_length)
    }

    /// Extend the road by at most one segment, then enforce the window size.
    pub fn update(&mut self, player_z: f32, pools: &mut WorldPools) -> StreamUpdate {
        let mut update = StreamUpdate::default();
        if !self.should_extend(player_z, pools) {
            return update;
        }
        let Some(frontier) = pools.frontier() else {
            return update;
        };

        let z = frontier + self.road.segment_length;
        let id = pools.push_segment(z);
        update.extended = Some(id);
        update.spawned_props = self.spawner.scenery_batch(z, pools);
        update.spawned_agent = self.spawner.traffic_agent(z, pools);

        if pools.segment_count() > self.road.window_size {
            update.evicted = pools.evict_oldest();
        }

        tracing::debug!(
            segment = id.0,
            z,
            evicted = update.evicted.map(|s| s.id.0),
            "road extended"
        );
        update
    }
}
