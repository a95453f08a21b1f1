//! Round engine, stepped once per frame.
//!
//! `RoundEngine` owns the portrait set, the doors and the hecs world of
//! traps and treasure. It consumes one `InputState` per frame plus any
//! network messages, runs all systems, and produces `RoundSnapshot`s.
//! Completely headless: rendering and transport are reached only through
//! queued scene operations and an outbox of network messages.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use sunkcost_core::components::Treasure;
use sunkcost_core::constants::*;
use sunkcost_core::enums::*;
use sunkcost_core::error::LevelError;
use sunkcost_core::events::{Alert, GameEvent};
use sunkcost_core::input::InputState;
use sunkcost_core::level::LevelData;
use sunkcost_core::state::RoundSnapshot;
use sunkcost_core::types::{Position, SimTime, ViewHandle};

use crate::decay::Decaying;
use crate::door::DoorLock;
use crate::net::NetMessage;
use crate::portraits::PortraitSet;
use crate::scene::{BodyView, SceneOp};
use crate::systems;
use crate::systems::snapshot::RoundHeader;
use crate::world_setup;

/// Configuration for one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// RNG seed. Both peers must use the same seed.
    pub seed: u64,
    /// Which side this engine plays.
    pub role: Role,
    /// Concurrent traps the Spirit may have placed.
    pub max_traps: usize,
    pub trap_min_age: u32,
    pub trap_max_age: u32,
    /// Half-size of the proximity box, before level tile scaling.
    pub trigger_radius: f32,
    /// Ticks a sprung trap or treasure stays triggered.
    pub trigger_timeout: u32,
    pub door_pick_radius: f32,
    pub door_reach_radius: f32,
    /// Portrait viewport `(width, height)` in world pixels.
    pub viewport_size: (f32, f32),
    pub round_duration_ticks: u64,
    pub treasure_max_age: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            role: Role::default(),
            max_traps: MAX_TRAPS,
            trap_min_age: TRAP_MIN_AGE,
            trap_max_age: TRAP_MAX_AGE,
            trigger_radius: TRIGGER_RADIUS,
            trigger_timeout: TRIGGER_TIMEOUT_TICKS,
            door_pick_radius: DOOR_PICK_RADIUS,
            door_reach_radius: DOOR_REACH_RADIUS,
            viewport_size: (VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            round_duration_ticks: ROUND_DURATION_TICKS,
            treasure_max_age: TREASURE_MAX_AGE,
        }
    }
}

impl RoundConfig {
    /// Default config for the given side.
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }
}

/// The round engine. Owns every piece of round state.
pub struct RoundEngine {
    config: RoundConfig,
    world: World,
    portraits: PortraitSet,
    doors: Vec<DoorLock>,
    time: SimTime,
    phase: RoundPhase,
    outcome: Option<RoundOutcome>,
    rng: ChaCha8Rng,
    /// Trigger radius after level scaling.
    trigger_radius: f32,
    hunter: Option<Position>,
    /// Door currently being dragged by the Spirit.
    dragging: Option<usize>,
    next_view: u32,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,
    alerts: Vec<Alert>,
    outbox: Vec<NetMessage>,
    scene_ops: Vec<SceneOp>,
}

impl RoundEngine {
    /// Create an engine with no level loaded.
    pub fn new(config: RoundConfig) -> Self {
        let portraits = PortraitSet::new(DEFAULT_BATTERY, config.viewport_size);
        Self {
            world: World::new(),
            portraits,
            doors: Vec::new(),
            time: SimTime::default(),
            phase: RoundPhase::default(),
            outcome: None,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            trigger_radius: config.trigger_radius,
            hunter: None,
            dragging: None,
            next_view: FIRST_DYNAMIC_VIEW,
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            alerts: Vec::new(),
            outbox: Vec::new(),
            scene_ops: Vec::new(),
            config,
        }
    }

    /// Build round state from a level and start the round. Any previous
    /// round state is discarded.
    pub fn load_level(&mut self, level: &LevelData) -> Result<(), LevelError> {
        level.validate()?;
        let portraits = world_setup::build_portraits(level, &self.config)?;

        self.world.clear();
        self.portraits = portraits;
        self.doors = world_setup::build_doors(level);
        self.trigger_radius = self.config.trigger_radius * level.tile_scale();
        self.hunter = level.player_start();
        self.dragging = None;
        self.time = SimTime::default();
        self.outcome = None;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.events.clear();
        self.alerts.clear();
        self.outbox.clear();
        self.scene_ops.clear();

        if let Some(pos) = level.treasure() {
            world_setup::spawn_treasure(&mut self.world, pos, &self.config);
        }

        self.phase = RoundPhase::Active;
        tracing::info!(
            "[round] Level loaded as {:?}: {} portraits, {} doors",
            self.config.role,
            self.portraits.len(),
            self.doors.len()
        );
        Ok(())
    }

    /// Advance the round by one frame and return the resulting snapshot.
    pub fn tick(&mut self, input: &InputState, hunter_body: Option<&dyn BodyView>) -> RoundSnapshot {
        if self.phase == RoundPhase::Active {
            if let Some(body) = hunter_body {
                self.read_hunter_body(body);
            }
            match self.config.role {
                Role::Spirit => self.handle_spirit_input(input),
                Role::Hunter => self.handle_hunter_input(input),
            }
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        let alerts = std::mem::take(&mut self.alerts);
        systems::snapshot::build_snapshot(
            RoundHeader {
                time: self.time,
                phase: self.phase,
                role: self.config.role,
                outcome: self.outcome,
                hunter: self.hunter,
            },
            &self.world,
            &self.portraits,
            &self.doors,
            events,
            alerts,
        )
    }

    /// Handle one raw network payload from the other peer.
    pub fn receive(&mut self, bytes: &[u8]) {
        match NetMessage::decode(bytes) {
            Ok(Some(message)) => self.handle_message(message),
            Ok(None) => tracing::debug!("[net] Ignoring message with unknown code"),
            Err(err) => tracing::warn!("[net] Dropping malformed message: {err}"),
        }
    }

    /// Messages to broadcast, in the order they were produced.
    pub fn drain_outbox(&mut self) -> Vec<NetMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Scene changes for the renderer, in order.
    pub fn drain_scene_ops(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.scene_ops)
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn role(&self) -> Role {
        self.config.role
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn portraits(&self) -> &PortraitSet {
        &self.portraits
    }

    pub fn portraits_mut(&mut self) -> &mut PortraitSet {
        &mut self.portraits
    }

    pub fn doors(&self) -> &[DoorLock] {
        &self.doors
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hunter_position(&self) -> Option<Position> {
        self.hunter
    }

    /// Trigger radius in effect for the loaded level.
    pub fn trigger_radius(&self) -> f32 {
        self.trigger_radius
    }

    /// Whether the Spirit is in the middle of a door drag.
    pub fn is_interacting(&self) -> bool {
        self.dragging.is_some()
    }

    /// Ask to look through portrait `index`. Honoured only when no drag is
    /// in progress and the portrait has charge.
    pub fn request_camera(&mut self, index: usize) -> bool {
        if self.is_interacting() {
            tracing::debug!("[portrait] Switch to {index} refused: door drag in progress");
            return false;
        }
        if !self.portraits.can_switch_to(index) {
            tracing::debug!("[portrait] Switch to {index} refused: unavailable");
            return false;
        }
        if self.portraits.active_index() == Some(index) {
            return true;
        }
        if !self.portraits.set_index(index) {
            return false;
        }
        tracing::info!("[portrait] Switched to portrait {index}");
        self.events.push(GameEvent::CameraSwitched { index });
        self.outbox.push(NetMessage::CameraSwitched { index });
        true
    }

    fn read_hunter_body(&mut self, body: &dyn BodyView) {
        let pos = body.position();
        self.hunter = Some(pos);
        if self.config.role == Role::Hunter {
            self.outbox.push(NetMessage::HunterPosition { x: pos.x, y: pos.y });
        }
    }

    fn handle_spirit_input(&mut self, input: &InputState) {
        if let Some(tap) = input.minimap_tap {
            if let Some(index) = self.portraits.get_nearest(tap) {
                self.request_camera(index);
            }
        }

        if let Some(target) = input.look_at {
            self.aim_active(target);
        }

        if let Some(at) = input.place_trap {
            self.place_trap(at);
        }

        self.handle_door_drag(input);
    }

    /// Turn the selected portrait toward `target`, within its limits.
    fn aim_active(&mut self, target: Position) {
        let Some(index) = self.portraits.active_index() else {
            return;
        };
        match self.portraits.camera_mut(index) {
            Ok(camera) => camera.look_at(target.to_vec3()),
            Err(err) => tracing::debug!("[portrait] Cannot aim: {err}"),
        }
    }

    fn place_trap(&mut self, at: Position) {
        if self.is_interacting() {
            tracing::debug!("[trap] Placement refused: door drag in progress");
            return;
        }
        let live = world_setup::trap_count(&self.world);
        if live >= self.config.max_traps {
            tracing::debug!("[trap] Placement refused: {live} traps already placed");
            return;
        }
        self.spawn_trap(at);
        self.outbox.push(NetMessage::TrapPlaced { x: at.x, y: at.y });
    }

    fn spawn_trap(&mut self, at: Position) {
        let view = ViewHandle(self.next_view);
        self.next_view += 1;
        world_setup::spawn_trap(&mut self.world, &mut self.rng, at, view, &self.config);
        self.scene_ops.push(SceneOp::Add(view));
        tracing::info!("[trap] Placed at ({:.0}, {:.0})", at.x, at.y);
        self.events.push(GameEvent::TrapPlaced { x: at.x, y: at.y });
    }

    fn handle_door_drag(&mut self, input: &InputState) {
        if let Some(index) = self.dragging {
            let Some(door) = self.doors.get_mut(index) else {
                self.dragging = None;
                return;
            };
            let outcome = match input.touch_position {
                Some(touch) => door.update(false, input.touch_released, touch),
                None => door.release(),
            };
            if let Some(outcome) = outcome {
                self.dragging = None;
                self.finish_drag(index, outcome);
            }
            return;
        }

        if !input.touch_down {
            return;
        }
        let Some(touch) = input.touch_position else {
            return;
        };
        let Some(index) = self.pick_door(touch, LockState::Unlocked, self.config.door_pick_radius)
        else {
            return;
        };

        let door = &mut self.doors[index];
        door.update(true, false, touch);
        if input.touch_released {
            // Tap without a drag.
            if let Some(outcome) = door.release() {
                self.finish_drag(index, outcome);
            }
        } else {
            tracing::debug!("[door] Drag started on door {index}");
            self.dragging = Some(index);
        }
    }

    fn finish_drag(&mut self, index: usize, outcome: DoorOutcome) {
        match outcome {
            DoorOutcome::Locked => {
                tracing::info!("[door] Door {index} locked");
                self.events.push(GameEvent::DoorLocked { index });
                self.outbox.push(NetMessage::DoorLocked { index });
            }
            DoorOutcome::Reverted => {
                tracing::debug!("[door] Drag on door {index} released early");
                self.events.push(GameEvent::DoorDragReverted { index });
            }
        }
    }

    /// Nearest door in `state` within `radius` of `at`.
    fn pick_door(&self, at: Position, state: LockState, radius: f32) -> Option<usize> {
        let radius_sq = radius * radius;
        self.doors
            .iter()
            .enumerate()
            .filter(|(_, d)| d.state() == state)
            .map(|(i, d)| (i, d.position().range_sq_to(&at)))
            .filter(|(_, d)| *d <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn handle_hunter_input(&mut self, input: &InputState) {
        if !input.interact {
            return;
        }
        let Some(hunter) = self.hunter else {
            return;
        };
        if let Some(index) = self.pick_door(hunter, LockState::Locked, self.config.door_reach_radius)
        {
            self.doors[index].reset_to_unlock();
            tracing::info!("[door] Hunter opened door {index}");
            self.events.push(GameEvent::DoorUnlocked { index });
            self.outbox.push(NetMessage::DoorUnlockRequest { index });
        }
    }

    fn handle_message(&mut self, message: NetMessage) {
        match message {
            NetMessage::HunterPosition { x, y } => {
                if self.config.role == Role::Spirit {
                    self.hunter = Some(Position::new(x, y));
                }
            }
            NetMessage::TrapPlaced { x, y } => {
                self.spawn_trap(Position::new(x, y));
            }
            NetMessage::CameraSwitched { index } => {
                if self.portraits.set_index(index) {
                    self.events.push(GameEvent::CameraSwitched { index });
                } else {
                    tracing::debug!("[net] Camera switch to unknown portrait {index}");
                }
            }
            NetMessage::TreasureStolen => self.mark_treasure_stolen(),
            NetMessage::DoorLocked { index } => match self.doors.get_mut(index) {
                Some(door) => {
                    door.force_lock();
                    self.events.push(GameEvent::DoorLocked { index });
                }
                None => tracing::debug!("[net] Lock for unknown door {index}"),
            },
            NetMessage::DoorUnlockRequest { index } => match self.doors.get_mut(index) {
                Some(door) => {
                    door.reset_to_unlock();
                    if self.dragging == Some(index) {
                        self.dragging = None;
                    }
                    tracing::info!("[door] Door {index} opened by the Hunter");
                    self.events.push(GameEvent::DoorUnlocked { index });
                }
                None => tracing::debug!("[net] Unlock for unknown door {index}"),
            },
        }
    }

    fn mark_treasure_stolen(&mut self) {
        let mut newly = false;
        for (_entity, (decay, treasure)) in self.world.query_mut::<(&mut Decaying, &mut Treasure)>()
        {
            if !treasure.stolen {
                systems::triggers::mark_stolen(decay, treasure);
                newly = true;
            }
        }
        if newly {
            self.on_treasure_stolen();
            self.events.push(GameEvent::TreasureStolen);
        }
    }

    /// Side effects of the treasure being reached, beyond the event.
    fn on_treasure_stolen(&mut self) {
        match self.config.role {
            Role::Hunter => self.outbox.push(NetMessage::TreasureStolen),
            Role::Spirit => self.alerts.push(Alert {
                level: AlertLevel::Critical,
                message: "The treasure is being stolen!".into(),
                tick: self.time.tick,
            }),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Battery economy
        for (index, edge) in self.portraits.tick_batteries() {
            match edge {
                BatteryTransition::Died => {
                    tracing::info!("[portrait] Portrait {index} ran out of charge");
                    self.events.push(GameEvent::CameraDied { index });
                }
                BatteryTransition::Revived => {
                    tracing::info!("[portrait] Portrait {index} recharged");
                    self.events.push(GameEvent::CameraRevived { index });
                }
                BatteryTransition::None => {}
            }
        }

        // 2. Blackout overlay edges
        if self.config.role == Role::Spirit {
            self.update_blackout();
        }

        // 3. Proximity triggers
        if let Some(hunter) = self.hunter {
            let reached =
                systems::triggers::run(&mut self.world, hunter, self.trigger_radius, &mut self.events);
            if reached {
                self.on_treasure_stolen();
            }
        }

        // 4. Aging and expiry
        let outcome = systems::decay::run(
            &mut self.world,
            &mut self.despawn_buffer,
            &mut self.events,
            &mut self.scene_ops,
        );

        // 5. Round end
        let outcome = outcome.or_else(|| {
            (self.time.tick + 1 >= self.config.round_duration_ticks)
                .then_some(RoundOutcome::SpiritWins)
        });
        if let Some(outcome) = outcome {
            self.finish_round(outcome);
        }
    }

    fn update_blackout(&mut self) {
        let live = self.portraits.active_is_live();
        let was_live = self.portraits.previous_active_state();
        if was_live && !live {
            self.scene_ops.push(SceneOp::Add(BLACKOUT_VIEW));
            self.events.push(GameEvent::BlackoutStarted);
        } else if !was_live && live {
            self.scene_ops.push(SceneOp::Remove(BLACKOUT_VIEW));
            self.events.push(GameEvent::BlackoutEnded);
        }
        self.portraits.set_previous_active_state(live);
    }

    fn finish_round(&mut self, outcome: RoundOutcome) {
        self.phase = RoundPhase::Over;
        self.outcome = Some(outcome);
        tracing::info!("[round] Round over at tick {}: {:?}", self.time.tick, outcome);
        self.events.push(GameEvent::RoundOver { outcome });
    }
}
