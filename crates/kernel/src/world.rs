use glam::{Vec2, Vec3};
use motorway_common::{
    AgentId, Color, ConfigError, DriveConfig, GROUND_COLOR, PropId, PropKind, SegmentId,
};
use motorway_input::InputSnapshot;
use motorway_stream::{CullRules, StreamController, WorldPools, cull};
use serde::Serialize;
use std::time::Duration;

use crate::collision::{self, CollisionRecord};
use crate::player::PlayerState;
use crate::traffic;

/// Errors raised while building a [`World`].
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Session lifecycle. There is no way back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lifecycle {
    Idle,
    Running,
}

/// The permanent ground plane under the road.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ground {
    /// Extent along x and z.
    pub size: Vec2,
    pub y: f32,
    pub color: Color,
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            size: Vec2::new(2_000.0, 20_000.0),
            y: -0.1,
            color: GROUND_COLOR,
        }
    }
}

/// A record of one change to the world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorldEvent {
    Started,
    SegmentSpawned { id: SegmentId, z: f32 },
    SegmentEvicted { id: SegmentId, z: f32 },
    PropSpawned { id: PropId },
    PropCulled { id: PropId, kind: PropKind },
    TrafficSpawned { id: AgentId, position: Vec3 },
    TrafficDespawned { id: AgentId, position: Vec3 },
    Collision(CollisionRecord),
    Stepped { tick: u64, clock: Duration },
}

/// Summary of one call to [`World::step`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Zero while idle.
    pub tick: u64,
    pub started: bool,
    pub extended: Option<SegmentId>,
    pub evicted: Option<SegmentId>,
    pub props_spawned: usize,
    pub props_culled: usize,
    pub traffic_spawned: usize,
    pub traffic_culled: usize,
    /// Entries released because their coordinates were not finite.
    pub invalid_dropped: usize,
    pub collisions: Vec<CollisionRecord>,
}

/// The authoritative driving world.
///
/// Owns the player, the object pools and the streaming state. All mutation
/// happens in [`World::step`] in a fixed order, and every random choice comes
/// from the seeded spawner, so the same config and input sequence always
/// produce the same [`World::state_hash`].
#[derive(Debug, Clone)]
pub struct World {
    config: DriveConfig,
    lifecycle: Lifecycle,
    tick: u64,
    clock: Duration,
    player: PlayerState,
    ground: Ground,
    pools: WorldPools,
    stream: StreamController,
    cull_rules: CullRules,
    collisions_total: u64,
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Validate `config` and lay out the initial road. The world starts idle.
    pub fn new(config: DriveConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let mut stream = StreamController::new(&config);
        let mut pools = WorldPools::new();
        let initial = stream.populate(&mut pools);

        let mut event_log =
            Vec::with_capacity(pools.segment_count() + initial.spawned_props.len());
        event_log.extend(
            pools
                .segments()
                .map(|s| WorldEvent::SegmentSpawned { id: s.id, z: s.z }),
        );
        event_log.extend(
            initial
                .spawned_props
                .iter()
                .map(|&id| WorldEvent::PropSpawned { id }),
        );

        tracing::info!(
            seed = config.seed_or_default(),
            segments = pools.segment_count(),
            props = pools.prop_count(),
            "world created"
        );

        Ok(Self {
            player: PlayerState::new(config.player.style),
            cull_rules: CullRules::from_config(&config),
            config,
            lifecycle: Lifecycle::Idle,
            tick: 0,
            clock: Duration::ZERO,
            ground: Ground::default(),
            pools,
            stream,
            collisions_total: 0,
            event_log,
        })
    }

    /// Re-run a recorded input sequence from a fresh world.
    pub fn replay(
        config: DriveConfig,
        inputs: &[InputSnapshot],
        dt: Duration,
    ) -> Result<Self, WorldError> {
        let mut world = Self::new(config)?;
        for input in inputs {
            world.step(input, dt);
        }
        Ok(world)
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Running ticks so far. Idle steps do not count.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulation time accumulated by running ticks.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    pub fn pools(&self) -> &WorldPools {
        &self.pools
    }

    pub fn pools_mut(&mut self) -> &mut WorldPools {
        &mut self.pools
    }

    pub fn in_cooldown(&self) -> bool {
        self.player.in_cooldown(self.clock)
    }

    pub fn collisions_total(&self) -> u64 {
        self.collisions_total
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Leave the start screen. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        self.event_log.push(WorldEvent::Started);
        tracing::info!("drive started");
        true
    }

    /// Advance the world by one tick of `dt` under `input`.
    ///
    /// While idle only a start request is honored and nothing else changes.
    /// A running tick integrates the player, streams and culls, carries
    /// traffic forward and finally resolves collisions.
    pub fn step(&mut self, input: &InputSnapshot, dt: Duration) -> TickReport {
        if !self.is_running() {
            let started = input.start && self.start();
            return TickReport {
                started,
                ..TickReport::default()
            };
        }

        self.tick += 1;
        let _span = tracing::info_span!("tick", tick = self.tick).entered();
        self.clock += dt;

        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        if !self.player.in_cooldown(self.clock) {
            self.player.apply_input(input, &self.config.player);
        }
        self.player.integrate();

        let player_z = self.player.position.z;
        let streamed = self.stream.update(player_z, &mut self.pools);
        if let Some(id) = streamed.extended {
            if let Some(frontier) = self.pools.frontier() {
                self.event_log.push(WorldEvent::SegmentSpawned { id, z: frontier });
            }
        }
        if let Some(segment) = streamed.evicted {
            self.event_log.push(WorldEvent::SegmentEvicted {
                id: segment.id,
                z: segment.z,
            });
        }
        self.event_log.extend(
            streamed
                .spawned_props
                .iter()
                .map(|&id| WorldEvent::PropSpawned { id }),
        );
        if let Some(id) = streamed.spawned_agent {
            if let Some(agent) = self.pools.agent(id) {
                self.event_log.push(WorldEvent::TrafficSpawned {
                    id,
                    position: agent.position,
                });
            }
        }
        report.extended = streamed.extended;
        report.evicted = streamed.evicted.map(|s| s.id);
        report.props_spawned = streamed.spawned_props.len();
        report.traffic_spawned = usize::from(streamed.spawned_agent.is_some());

        let culled = cull(&mut self.pools, player_z, &self.cull_rules);
        self.event_log.extend(culled.props.iter().map(|p| WorldEvent::PropCulled {
            id: p.id,
            kind: p.kind,
        }));
        self.event_log
            .extend(culled.traffic.iter().map(|a| WorldEvent::TrafficDespawned {
                id: a.id,
                position: a.position,
            }));
        report.props_culled = culled.props.len();
        report.traffic_culled = culled.traffic.len();
        report.invalid_dropped = culled.invalid;

        traffic::advance(
            &mut self.pools,
            self.player.speed,
            self.config.traffic.speed_factor,
        );

        let outcome = collision::resolve(
            &mut self.player,
            &mut self.pools,
            self.clock,
            &self.config.collision,
        );
        report.invalid_dropped += outcome.dropped.len();
        self.collisions_total += outcome.collisions.len() as u64;
        self.event_log
            .extend(outcome.collisions.iter().copied().map(WorldEvent::Collision));
        report.collisions = outcome.collisions;

        self.event_log.push(WorldEvent::Stepped {
            tick: self.tick,
            clock: self.clock,
        });
        report
    }

    /// Deterministic FNV-1a hash over lifecycle, clock, player and pools.
    pub fn state_hash(&self) -> u64 {
        let mut h = Fnv::new();
        h.write(&[self.is_running() as u8]);
        h.write(&self.tick.to_le_bytes());
        h.write(&self.clock.as_nanos().to_le_bytes());

        let p = &self.player;
        h.write_vec3(p.position);
        h.write(&p.heading.to_le_bytes());
        h.write(&p.speed.to_le_bytes());
        h.write(&p.cooldown_until.as_nanos().to_le_bytes());

        if let Some(frontier) = self.pools.frontier() {
            h.write(&frontier.to_le_bytes());
        }
        for segment in self.pools.segments() {
            h.write(&segment.id.0.to_le_bytes());
            h.write(&segment.z.to_le_bytes());
        }
        for prop in self.pools.props() {
            h.write(&prop.id.0.to_le_bytes());
            h.write_vec3(prop.position);
        }
        for agent in self.pools.traffic() {
            h.write(&agent.id.0.to_le_bytes());
            h.write(agent.style.name().as_bytes());
            h.write_vec3(agent.position);
        }
        h.finish()
    }
}

struct Fnv(u64);

impl Fnv {
    fn new() -> Self {
        Self(0xcbf2_9ce4_8422_2325)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x0100_0000_01b3);
        }
    }

    fn write_vec3(&mut self, v: Vec3) {
        self.write(&v.x.to_le_bytes());
        self.write(&v.y.to_le_bytes());
        self.write(&v.z.to_le_bytes());
    }

    fn finish(&self) -> u64 {
        self.0
    }
}
