//! Tests for the camera, battery, door and decay state machines, the wire
//! codec, and the round engine.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use sunkcost_core::constants::*;
use sunkcost_core::enums::*;
use sunkcost_core::error::{NetError, PortraitError};
use sunkcost_core::events::GameEvent;
use sunkcost_core::input::InputState;
use sunkcost_core::level::LevelData;
use sunkcost_core::state::RoundSnapshot;
use sunkcost_core::types::{Position, Rect, ViewHandle};

use crate::battery::BatteryState;
use crate::camera::CameraState;
use crate::decay::{within_trigger_radius, Decaying};
use crate::door::DoorLock;
use crate::engine::{RoundConfig, RoundEngine};
use crate::net::{LoopbackChannel, NetMessage, NetworkChannel, PeerId};
use crate::portraits::{PortraitDesc, PortraitSet};
use crate::scene::{KinematicBody, SceneOp};

const LEVEL_JSON: &str = r#"{
    "width": 100, "height": 100, "battery": 600,
    "objects": [
        { "class": "portrait", "pos": [0.0, 0.0] },
        { "class": "portrait", "pos": [1000.0, 0.0] },
        { "class": "portrait", "pos": [0.0, 1000.0] },
        { "class": "door", "pos": [500.0, 500.0] },
        { "class": "door", "pos": [2000.0, 2000.0], "orientation": "side" },
        { "class": "player", "pos": [-500.0, -500.0] },
        { "class": "treasure", "pos": [3000.0, 3000.0] }
    ]
}"#;

fn level() -> LevelData {
    LevelData::from_json(LEVEL_JSON).unwrap()
}

fn engine(role: Role) -> RoundEngine {
    let mut engine = RoundEngine::new(RoundConfig::for_role(role));
    engine.load_level(&level()).unwrap();
    engine
}

fn portrait_at(id: u32, x: f32, y: f32) -> PortraitDesc {
    PortraitDesc {
        id,
        position: Vec3::new(x, y, 0.0),
        look_direction: Vec3::Y,
        limits: (DEFAULT_LIMIT_MIN, DEFAULT_LIMIT_MAX),
        battery: None,
        kind: CameraKind::Portrait,
    }
}

fn tap(x: f32, y: f32) -> InputState {
    InputState {
        minimap_tap: Some(Position::new(x, y)),
        ..InputState::default()
    }
}

fn trap_at(x: f32, y: f32) -> InputState {
    InputState {
        place_trap: Some(Position::new(x, y)),
        ..InputState::default()
    }
}

/// Tick `n` idle frames, collecting every event.
fn run_idle(engine: &mut RoundEngine, n: usize) -> (RoundSnapshot, Vec<GameEvent>) {
    let mut events = Vec::new();
    let mut last = RoundSnapshot::default();
    for _ in 0..n {
        last = engine.tick(&InputState::idle(), None);
        events.extend(last.events.iter().cloned());
    }
    (last, events)
}

// ---- Battery ----

#[test]
fn test_battery_charge_stays_in_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut battery = BatteryState::new(50);
    for _ in 0..5_000 {
        battery.tick(rng.gen_bool(0.6));
        assert!(battery.charge() <= battery.max());
        assert!(battery.is_active() || battery.charge() < battery.reactivation_threshold());
    }
}

#[test]
fn test_battery_dies_after_full_drain() {
    let mut battery = BatteryState::new(600);
    for tick in 1..600 {
        assert_eq!(battery.tick(true), BatteryTransition::None, "tick {tick}");
    }
    assert_eq!(battery.charge(), 1);
    assert_eq!(battery.tick(true), BatteryTransition::Died);
    assert_eq!(battery.charge(), 0);
    assert!(!battery.is_active());
}

#[test]
fn test_battery_hysteresis_needs_eighty_percent() {
    let mut battery = BatteryState::new(600);
    for _ in 0..600 {
        battery.tick(true);
    }
    assert!(!battery.is_active());

    // A dead camera recharges even while still selected.
    for _ in 0..479 {
        assert_eq!(battery.tick(true), BatteryTransition::None);
        assert!(!battery.is_active());
    }
    assert_eq!(battery.charge(), 479);
    assert_eq!(battery.tick(true), BatteryTransition::Revived);
    assert_eq!(battery.charge(), 480);
    assert!(battery.is_active());

    // Live and selected again, so it drains.
    battery.tick(true);
    assert_eq!(battery.charge(), 479);
    assert!(battery.is_active());
}

#[test]
fn test_battery_reactivation_threshold_rounds_up() {
    assert_eq!(BatteryState::new(600).reactivation_threshold(), 480);
    assert_eq!(BatteryState::new(7).reactivation_threshold(), 6);
}

#[test]
fn test_battery_idle_stays_full() {
    let mut battery = BatteryState::new(10);
    for _ in 0..20 {
        battery.tick(false);
    }
    assert_eq!(battery.charge(), 10);
    assert!((battery.charge_fraction() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_battery_with_charge() {
    let empty = BatteryState::with_charge(600, 0);
    assert!(!empty.is_active());
    let over = BatteryState::with_charge(600, 9_999);
    assert_eq!(over.charge(), 600);
    let half = BatteryState::with_charge(600, 300);
    assert!((half.charge_fraction() - 0.5).abs() < 1e-6);
}

#[test]
fn test_battery_huge_capacity_does_not_overflow() {
    let mut battery = BatteryState::with_charge(u32::MAX, 0);
    assert_eq!(battery.reactivation_threshold(), 3_435_973_836);
    assert_eq!(battery.tick(false), BatteryTransition::None);
    assert_eq!(battery.charge(), 1);
    assert!(!battery.is_active());
}

// ---- Camera ----

#[test]
fn test_camera_rejects_inverted_limits() {
    let err = CameraState::new(0, CameraKind::Portrait, Vec3::ZERO, Vec3::Y, (1.0, -1.0))
        .unwrap_err();
    assert_eq!(err, PortraitError::InvalidLimits { min: 1.0, max: -1.0 });
}

#[test]
fn test_camera_look_at_clamps_heading() {
    let mut camera =
        CameraState::new(0, CameraKind::Portrait, Vec3::ZERO, Vec3::Y, (-0.5, 0.5)).unwrap();
    camera.look_at(Vec3::new(10.0, 0.0, 0.0));
    assert!((camera.heading() - 0.5).abs() < 1e-5, "got {}", camera.heading());

    camera.look_at(Vec3::new(0.0, 10.0, 0.0));
    assert!(camera.heading().abs() < 1e-5);
    assert!((camera.view_direction().length() - 10.0).abs() < 1e-4);
}

#[test]
fn test_camera_look_straight_down_keeps_heading() {
    let mut camera =
        CameraState::new(0, CameraKind::Portrait, Vec3::ZERO, Vec3::X, (-3.0, 3.0)).unwrap();
    let before = camera.view_direction();
    camera.look_at(Vec3::new(0.0, 0.0, -5.0));
    assert_eq!(camera.view_direction(), before);
}

#[test]
fn test_camera_viewport_centered() {
    let camera = CameraState::new(
        3,
        CameraKind::Portrait,
        Vec3::new(100.0, 200.0, 0.0),
        Vec3::Y,
        (-1.0, 1.0),
    )
    .unwrap();
    assert_eq!(camera.viewport(40.0, 20.0), Rect::new(80.0, 190.0, 40.0, 20.0));
    assert_eq!(camera.ground_position(), Position::new(100.0, 200.0));
}

// ---- Portrait set ----

fn three_portraits() -> PortraitSet {
    let mut set = PortraitSet::new(600, (100.0, 50.0));
    set.add_portrait(portrait_at(0, 0.0, 0.0)).unwrap();
    set.add_portrait(portrait_at(1, 10.0, 0.0)).unwrap();
    set.add_portrait(portrait_at(2, 0.0, 10.0)).unwrap();
    set
}

#[test]
fn test_nearest_portrait() {
    let set = three_portraits();
    assert_eq!(set.get_nearest(Position::new(1.0, 1.0)), Some(0));
    assert_eq!(set.get_nearest(Position::new(9.0, 1.0)), Some(1));
    assert_eq!(set.get_nearest(Position::new(-3.0, 12.0)), Some(2));
}

#[test]
fn test_nearest_tie_goes_to_first() {
    let set = three_portraits();
    // Equidistant from portraits 1 and 2.
    assert_eq!(set.get_nearest(Position::new(10.0, 10.0)), Some(1));
}

#[test]
fn test_nearest_on_empty_set() {
    let set = PortraitSet::new(600, (100.0, 50.0));
    assert_eq!(set.get_nearest(Position::new(0.0, 0.0)), None);
}

#[test]
fn test_duplicate_portrait_id_rejected() {
    let mut set = three_portraits();
    let err = set.add_portrait(portrait_at(1, 50.0, 50.0)).unwrap_err();
    assert_eq!(err, PortraitError::DuplicateId(1));
    assert_eq!(set.len(), 3);
}

#[test]
fn test_set_index_out_of_range_is_refused() {
    let mut set = three_portraits();
    assert!(set.set_index(2));
    assert!(!set.set_index(3));
    assert_eq!(set.active_index(), Some(2));
}

#[test]
fn test_indexed_accessors_report_out_of_range() {
    let mut set = three_portraits();
    assert_eq!(
        set.camera(5).unwrap_err(),
        PortraitError::IndexOutOfRange { index: 5, len: 3 }
    );
    assert!(set.battery(5).is_err());
    assert_eq!(set.current_viewport().unwrap_err(), PortraitError::NoActiveCamera);

    set.set_index(1);
    assert_eq!(set.current_viewport().unwrap(), Rect::new(-40.0, -25.0, 100.0, 50.0));
}

#[test]
fn test_only_selected_portrait_drains() {
    let mut set = three_portraits();
    set.set_index(1);
    for _ in 0..10 {
        set.tick_batteries();
    }
    assert_eq!(set.battery(0).unwrap().unwrap().charge(), 600);
    assert_eq!(set.battery(1).unwrap().unwrap().charge(), 590);
    assert_eq!(set.battery(2).unwrap().unwrap().charge(), 600);
}

#[test]
fn test_player_camera_has_no_battery() {
    let mut set = PortraitSet::new(600, (100.0, 50.0));
    set.add_portrait(PortraitDesc {
        kind: CameraKind::Player,
        ..portrait_at(9, 0.0, 0.0)
    })
    .unwrap();
    assert!(set.battery(0).unwrap().is_none());
    set.set_index(0);
    for _ in 0..1_000 {
        assert!(set.tick_batteries().is_empty());
    }
    assert!(set.can_switch_to(0));
    assert!(set.active_is_live());
}

#[test]
fn test_clear_resets_selection() {
    let mut set = three_portraits();
    set.set_index(0);
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.active_index(), None);
    assert!(!set.can_switch_to(0));
}

// ---- Door lock ----

#[test]
fn test_front_door_full_drag_locks() {
    let mut door = DoorLock::new(Position::new(0.0, 0.0), DoorOrientation::Front);
    assert!(door.begin_drag(Position::new(200.0, 0.0)));
    assert_eq!(door.drag_start_distance(), 200.0);
    door.drag_to(Position::new(200.0, 0.0));
    assert_eq!(door.frame(), 20);
    assert_eq!(door.release(), Some(DoorOutcome::Locked));
    assert_eq!(door.state(), LockState::Locked);
}

#[test]
fn test_front_door_short_drag_reverts() {
    let mut door = DoorLock::new(Position::new(0.0, 0.0), DoorOrientation::Front);
    door.begin_drag(Position::new(200.0, 0.0));
    door.drag_to(Position::new(190.0, 0.0));
    assert_eq!(door.frame(), 19);
    assert_eq!(door.release(), Some(DoorOutcome::Reverted));
    assert_eq!(door.state(), LockState::Unlocked);
    assert_eq!(door.frame(), 0);
}

#[test]
fn test_side_door_uses_eighteen_frames() {
    let mut door = DoorLock::new(Position::new(0.0, 0.0), DoorOrientation::Side);
    assert_eq!(door.frame_count(), 18);
    door.begin_drag(Position::new(0.0, 170.0));
    door.drag_to(Position::new(0.0, 500.0));
    assert_eq!(door.frame(), 17);
    assert_eq!(door.release(), Some(DoorOutcome::Locked));
}

#[test]
fn test_drag_starting_on_door_is_finite() {
    let mut door = DoorLock::new(Position::new(5.0, 5.0), DoorOrientation::Front);
    door.begin_drag(Position::new(5.0, 5.0));
    door.drag_to(Position::new(5.0, 5.0));
    assert_eq!(door.frame(), 0);
    door.drag_to(Position::new(5.5, 5.0));
    assert_eq!(door.frame(), 20);
}

#[test]
fn test_door_update_sequence() {
    let door_pos = Position::new(0.0, 0.0);
    let touch = Position::new(100.0, 0.0);
    let mut door = DoorLock::new(door_pos, DoorOrientation::Front);

    assert_eq!(door.update(false, false, touch), None);
    assert_eq!(door.state(), LockState::Unlocked);

    assert_eq!(door.update(true, false, touch), None);
    assert!(door.is_dragging());

    assert_eq!(door.update(false, false, Position::new(50.0, 0.0)), None);
    assert_eq!(door.frame(), 10);

    assert_eq!(
        door.update(false, true, touch),
        Some(DoorOutcome::Locked)
    );

    // Locked ignores new touches until reset.
    assert_eq!(door.update(true, false, touch), None);
    assert_eq!(door.state(), LockState::Locked);
    assert!(!door.begin_drag(touch));

    door.reset_to_unlock();
    assert_eq!(door.state(), LockState::Unlocked);
    assert_eq!(door.frame(), 0);
}

#[test]
fn test_release_without_drag_is_noop() {
    let mut door = DoorLock::new(Position::new(0.0, 0.0), DoorOrientation::Front);
    assert_eq!(door.release(), None);
    door.force_lock();
    assert_eq!(door.state(), LockState::Locked);
    assert_eq!(door.frame(), 20);
}

// ---- Decay ----

#[test]
fn test_untriggered_trap_expires_after_max_age() {
    let mut trap = Decaying::new(1000);
    for call in 1..=1000 {
        assert!(!trap.update(), "call {call} should not expire");
    }
    assert!(trap.update());
    assert!(trap.is_expired());
}

#[test]
fn test_trigger_timeout_forces_expiry() {
    let mut trap = Decaying::new(1000);
    trap.set_trigger(true);
    for _ in 0..150 {
        assert!(!trap.update());
    }
    assert!(trap.is_triggered());
    assert_eq!(trap.age(), 150);

    assert!(trap.update());
    assert!(!trap.is_triggered());
    assert!(trap.age() > trap.max_age());
}

#[test]
fn test_trigger_elapsed_only_counts_while_triggered() {
    let mut trap = Decaying::new(1000);
    for _ in 0..20 {
        trap.update();
    }
    assert_eq!(trap.trigger_elapsed(), 0);
    trap.set_trigger(true);
    trap.update();
    trap.update();
    assert_eq!(trap.trigger_elapsed(), 2);
}

#[test]
fn test_reset_age_rearms() {
    let mut treasure = Decaying::new(2);
    treasure.update();
    treasure.update();
    assert!(treasure.update());
    treasure.reset_age();
    assert!(!treasure.is_expired());
    assert_eq!(treasure.age(), 0);
}

#[test]
fn test_trigger_radius_box() {
    let trap = Position::new(0.0, 0.0);
    assert!(within_trigger_radius(trap, Position::new(80.0, -80.0), 80.0));
    assert!(!within_trigger_radius(trap, Position::new(80.1, 0.0), 80.0));
}

// ---- Wire codec ----

#[test]
fn test_messages_survive_encoding() {
    let messages = [
        NetMessage::HunterPosition { x: 12.5, y: -3.0 },
        NetMessage::TrapPlaced { x: 400.0, y: 80.0 },
        NetMessage::CameraSwitched { index: 2 },
        NetMessage::TreasureStolen,
        NetMessage::DoorLocked { index: 7 },
        NetMessage::DoorUnlockRequest { index: 0 },
    ];
    for message in messages {
        let bytes = message.encode();
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(NetMessage::decode(&bytes), Ok(Some(message)));
    }
}

#[test]
fn test_float_layout_matches_codes() {
    assert_eq!(
        NetMessage::DoorLocked { index: 3 }.to_floats(),
        vec![5.0, 3.0]
    );
    assert_eq!(
        NetMessage::TrapPlaced { x: 1.0, y: 2.0 }.to_floats(),
        vec![1.0, 1.0, 2.0]
    );
    assert_eq!(NetMessage::TreasureStolen.to_floats(), vec![4.0]);
}

#[test]
fn test_unknown_codes_are_ignored() {
    assert_eq!(NetMessage::from_floats(&[2.0, 1.0]), Ok(None));
    assert_eq!(NetMessage::from_floats(&[99.0]), Ok(None));
    assert_eq!(NetMessage::from_floats(&[3.5, 1.0]), Ok(None));
    assert_eq!(NetMessage::from_floats(&[-1.0]), Ok(None));
}

#[test]
fn test_malformed_messages_error() {
    assert_eq!(NetMessage::decode(&[]), Err(NetError::Empty));
    assert_eq!(NetMessage::decode(&[0, 0, 0]), Err(NetError::Misaligned(3)));
    assert_eq!(
        NetMessage::from_floats(&[5.0]),
        Err(NetError::Truncated {
            code: 5,
            expected: 2,
            got: 1
        })
    );
    assert_eq!(
        NetMessage::from_floats(&[3.0, -1.0]),
        Err(NetError::InvalidIndex(-1.0))
    );
}

#[test]
fn test_loopback_delivers_to_other_end() {
    let (mut a, mut b) = LoopbackChannel::pair();
    a.broadcast(&[1, 2, 3, 4]);
    a.broadcast(&[5, 6, 7, 8]);
    assert_eq!(a.pending(), 0);
    assert_eq!(b.pending(), 2);

    let mut got = Vec::new();
    b.receive(&mut |source: PeerId, bytes: &[u8]| got.push((source, bytes.to_vec())));
    assert_eq!(
        got,
        vec![(PeerId(0), vec![1, 2, 3, 4]), (PeerId(0), vec![5, 6, 7, 8])]
    );
    assert_eq!(b.pending(), 0);
}

// ---- Round engine: Spirit ----

#[test]
fn test_engine_starts_in_loading() {
    let mut engine = RoundEngine::new(RoundConfig::default());
    let snap = engine.tick(&InputState::idle(), None);
    assert_eq!(snap.phase, RoundPhase::Loading);
    assert_eq!(snap.time.tick, 0);
}

#[test]
fn test_load_level_builds_round() {
    let engine = engine(Role::Spirit);
    assert_eq!(engine.phase(), RoundPhase::Active);
    assert_eq!(engine.portraits().len(), 3);
    assert_eq!(engine.doors().len(), 2);
    assert_eq!(engine.doors()[1].orientation(), DoorOrientation::Side);
    assert_eq!(engine.hunter_position(), Some(Position::new(-500.0, -500.0)));
    assert_eq!(engine.portraits().active_index(), None);
}

#[test]
fn test_load_level_scales_trigger_radius() {
    let mut level = level();
    level.tile = Some(80.0);
    let mut engine = RoundEngine::new(RoundConfig::for_role(Role::Spirit));
    engine.load_level(&level).unwrap();
    assert!((engine.trigger_radius() - 160.0).abs() < 1e-4);
}

#[test]
fn test_load_level_without_portraits_fails() {
    let mut level = level();
    level.objects.retain(|o| !matches!(o, sunkcost_core::level::LevelObject::Portrait { .. }));
    let mut engine = RoundEngine::new(RoundConfig::default());
    assert!(engine.load_level(&level).is_err());
    assert_eq!(engine.phase(), RoundPhase::Loading);
}

#[test]
fn test_minimap_tap_switches_camera() {
    let mut engine = engine(Role::Spirit);
    let snap = engine.tick(&tap(900.0, 50.0), None);
    assert_eq!(snap.active_index, Some(1));
    assert!(snap.events.contains(&GameEvent::CameraSwitched { index: 1 }));
    assert_eq!(
        engine.drain_outbox(),
        vec![NetMessage::CameraSwitched { index: 1 }]
    );
    assert_eq!(
        snap.viewport,
        Some(Rect::centered(Position::new(1000.0, 0.0), VIEWPORT_WIDTH, VIEWPORT_HEIGHT))
    );
    assert!(snap.cameras[1].selected);
    assert!(snap.cameras[1].charge_fraction < 1.0);
}

#[test]
fn test_dead_camera_blacks_out_and_refuses_switch() {
    let mut engine = engine(Role::Spirit);
    let first = engine.tick(&tap(0.0, 0.0), None);
    let (snap, events) = run_idle(&mut engine, 599);
    let mut all = first.events.clone();
    all.extend(events);

    assert!(all.contains(&GameEvent::CameraDied { index: 0 }));
    assert!(all.contains(&GameEvent::BlackoutStarted));
    assert!(snap.blackout);
    assert!(!snap.cameras[0].is_active);
    assert!(engine.drain_scene_ops().contains(&SceneOp::Add(BLACKOUT_VIEW)));

    // Switching away lifts the blackout.
    let snap = engine.tick(&tap(1000.0, 0.0), None);
    assert_eq!(snap.active_index, Some(1));
    assert!(snap.events.contains(&GameEvent::BlackoutEnded));
    assert_eq!(engine.drain_scene_ops(), vec![SceneOp::Remove(BLACKOUT_VIEW)]);

    // Portrait 0 is still recharging.
    let snap = engine.tick(&tap(10.0, 10.0), None);
    assert_eq!(snap.active_index, Some(1));
}

#[test]
fn test_door_drag_locks_and_broadcasts() {
    let mut engine = engine(Role::Spirit);
    engine.drain_outbox();

    engine.tick(&InputState::press(Position::new(600.0, 500.0)), None);
    assert!(engine.is_interacting());
    let snap = engine.tick(&InputState::hold(Position::new(600.0, 500.0)), None);
    assert_eq!(snap.doors[0].state, LockState::Dragging);
    assert_eq!(snap.doors[0].frame, 20);

    let snap = engine.tick(&InputState::release(Position::new(600.0, 500.0)), None);
    assert_eq!(snap.doors[0].state, LockState::Locked);
    assert!(snap.events.contains(&GameEvent::DoorLocked { index: 0 }));
    assert!(!engine.is_interacting());
    assert_eq!(engine.drain_outbox(), vec![NetMessage::DoorLocked { index: 0 }]);
}

#[test]
fn test_short_door_drag_reverts() {
    let mut engine = engine(Role::Spirit);
    engine.tick(&InputState::press(Position::new(600.0, 500.0)), None);
    engine.tick(&InputState::hold(Position::new(595.0, 500.0)), None);
    let snap = engine.tick(&InputState::release(Position::new(595.0, 500.0)), None);
    assert_eq!(snap.doors[0].state, LockState::Unlocked);
    assert_eq!(snap.doors[0].frame, 0);
    assert!(snap.events.contains(&GameEvent::DoorDragReverted { index: 0 }));
    assert!(engine.drain_outbox().is_empty());
}

#[test]
fn test_touch_far_from_doors_grabs_nothing() {
    let mut engine = engine(Role::Spirit);
    engine.tick(&InputState::press(Position::new(900.0, 900.0)), None);
    assert!(!engine.is_interacting());
}

#[test]
fn test_camera_switch_refused_mid_drag() {
    let mut engine = engine(Role::Spirit);
    engine.tick(&tap(0.0, 0.0), None);
    engine.tick(&InputState::press(Position::new(600.0, 500.0)), None);
    let input = InputState {
        minimap_tap: Some(Position::new(1000.0, 0.0)),
        touch_position: Some(Position::new(600.0, 500.0)),
        ..InputState::default()
    };
    let snap = engine.tick(&input, None);
    assert_eq!(snap.active_index, Some(0));
    assert!(!engine.request_camera(2));
}

#[test]
fn test_trap_cap_enforced() {
    let mut engine = engine(Role::Spirit);
    for i in 0..5 {
        engine.tick(&trap_at(4000.0 + i as f32 * 10.0, 4000.0), None);
    }
    let snap = engine.tick(&InputState::idle(), None);
    assert_eq!(snap.traps.len(), MAX_TRAPS);
    for trap in &snap.traps {
        assert!((TRAP_MIN_AGE..=TRAP_MAX_AGE).contains(&trap.max_age));
    }
    let placed = engine
        .drain_outbox()
        .into_iter()
        .filter(|m| matches!(m, NetMessage::TrapPlaced { .. }))
        .count();
    assert_eq!(placed, MAX_TRAPS);
}

#[test]
fn test_trap_expiry_removes_view() {
    let mut engine = engine(Role::Spirit);
    engine.tick(&trap_at(4000.0, 4000.0), None);
    assert_eq!(
        engine.drain_scene_ops(),
        vec![SceneOp::Add(ViewHandle(FIRST_DYNAMIC_VIEW))]
    );
    let (snap, events) = run_idle(&mut engine, TRAP_MAX_AGE as usize + 1);
    assert!(snap.traps.is_empty());
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::TrapExpired { .. })));
    assert_eq!(
        engine.drain_scene_ops(),
        vec![SceneOp::Remove(ViewHandle(FIRST_DYNAMIC_VIEW))]
    );
}

#[test]
fn test_hunter_springs_trap_then_trap_times_out() {
    let mut engine = engine(Role::Spirit);
    engine.tick(&trap_at(100.0, 100.0), None);

    engine.receive(&NetMessage::HunterPosition { x: 150.0, y: 150.0 }.encode());
    let snap = engine.tick(&InputState::idle(), None);
    assert!(snap
        .events
        .contains(&GameEvent::TrapSprung { x: 100.0, y: 100.0 }));
    assert!(snap.hunter_trapped);
    assert!(snap.traps[0].triggered);

    let (snap, _) = run_idle(&mut engine, 149);
    assert_eq!(snap.traps.len(), 1);
    let (snap, events) = run_idle(&mut engine, 1);
    assert!(snap.traps.is_empty());
    assert!(!snap.hunter_trapped);
    assert!(events.contains(&GameEvent::TrapExpired { x: 100.0, y: 100.0 }));
}

#[test]
fn test_spirit_alerted_when_treasure_stolen() {
    let mut engine = engine(Role::Spirit);
    engine.receive(&NetMessage::TreasureStolen.encode());
    let snap = engine.tick(&InputState::idle(), None);
    assert!(snap.events.contains(&GameEvent::TreasureStolen));
    assert_eq!(snap.alerts.len(), 1);
    assert_eq!(snap.alerts[0].level, AlertLevel::Critical);
    assert!(snap.treasure.unwrap().stolen);

    // A repeat is not a second theft.
    engine.receive(&NetMessage::TreasureStolen.encode());
    let snap = engine.tick(&InputState::idle(), None);
    assert!(snap.alerts.is_empty());
}

#[test]
fn test_unlock_request_reopens_door() {
    let mut engine = engine(Role::Spirit);
    engine.tick(&InputState::press(Position::new(600.0, 500.0)), None);
    engine.tick(&InputState::hold(Position::new(600.0, 500.0)), None);
    engine.tick(&InputState::release(Position::new(600.0, 500.0)), None);
    assert_eq!(engine.doors()[0].state(), LockState::Locked);

    engine.receive(&NetMessage::DoorUnlockRequest { index: 0 }.encode());
    assert_eq!(engine.doors()[0].state(), LockState::Unlocked);
    let snap = engine.tick(&InputState::idle(), None);
    assert!(snap.events.contains(&GameEvent::DoorUnlocked { index: 0 }));
}

#[test]
fn test_bad_messages_change_nothing() {
    let mut engine = engine(Role::Spirit);
    engine.receive(&[0, 0, 0x40, 0x40]); // code 3.0, no index
    engine.receive(&2.0f32.to_le_bytes());
    engine.receive(&[1, 2, 3]);
    engine.receive(&NetMessage::DoorLocked { index: 42 }.encode());
    let snap = engine.tick(&InputState::idle(), None);
    assert!(snap.events.is_empty());
    assert_eq!(snap.active_index, None);
}

#[test]
fn test_round_timer_gives_spirit_the_win() {
    let mut engine = RoundEngine::new(RoundConfig {
        round_duration_ticks: 10,
        ..RoundConfig::for_role(Role::Spirit)
    });
    engine.load_level(&level()).unwrap();
    let (snap, events) = run_idle(&mut engine, 10);
    assert_eq!(snap.phase, RoundPhase::Over);
    assert_eq!(snap.outcome, Some(RoundOutcome::SpiritWins));
    assert!(events.contains(&GameEvent::RoundOver {
        outcome: RoundOutcome::SpiritWins
    }));

    let snap = engine.tick(&InputState::idle(), None);
    assert_eq!(snap.time.tick, 10);
}

#[test]
fn test_untouched_treasure_rearms() {
    let mut engine = RoundEngine::new(RoundConfig {
        treasure_max_age: 5,
        ..RoundConfig::for_role(Role::Spirit)
    });
    engine.load_level(&level()).unwrap();
    let (snap, events) = run_idle(&mut engine, 6);
    assert!(events.contains(&GameEvent::TreasureRearmed));
    assert_eq!(snap.phase, RoundPhase::Active);
    assert!(snap.treasure.is_some());
}

// ---- Round engine: Hunter ----

#[test]
fn test_hunter_broadcasts_position() {
    let mut engine = engine(Role::Hunter);
    let body = KinematicBody::at(Position::new(10.0, 20.0));
    engine.tick(&InputState::idle(), Some(&body));
    assert_eq!(
        engine.drain_outbox(),
        vec![NetMessage::HunterPosition { x: 10.0, y: 20.0 }]
    );
}

#[test]
fn test_hunter_opens_locked_door() {
    let mut engine = engine(Role::Hunter);
    engine.receive(&NetMessage::DoorLocked { index: 0 }.encode());
    assert_eq!(engine.doors()[0].state(), LockState::Locked);

    let body = KinematicBody::at(Position::new(520.0, 500.0));
    let input = InputState {
        interact: true,
        ..InputState::default()
    };
    let snap = engine.tick(&input, Some(&body));
    assert_eq!(snap.doors[0].state, LockState::Unlocked);
    assert!(snap.events.contains(&GameEvent::DoorUnlocked { index: 0 }));
    assert!(engine
        .drain_outbox()
        .contains(&NetMessage::DoorUnlockRequest { index: 0 }));
}

#[test]
fn test_hunter_out_of_reach_cannot_open_door() {
    let mut engine = engine(Role::Hunter);
    engine.receive(&NetMessage::DoorLocked { index: 0 }.encode());
    let body = KinematicBody::at(Position::new(800.0, 500.0));
    let input = InputState {
        interact: true,
        ..InputState::default()
    };
    let snap = engine.tick(&input, Some(&body));
    assert_eq!(snap.doors[0].state, LockState::Locked);
}

#[test]
fn test_hunter_steals_treasure_and_wins() {
    let mut engine = engine(Role::Hunter);
    let body = KinematicBody::at(Position::new(3050.0, 2990.0));
    let snap = engine.tick(&InputState::idle(), Some(&body));
    assert!(snap.events.contains(&GameEvent::TreasureStolen));
    assert!(engine.drain_outbox().contains(&NetMessage::TreasureStolen));

    let mut last = snap;
    for _ in 0..149 {
        last = engine.tick(&InputState::idle(), Some(&body));
    }
    assert_eq!(last.phase, RoundPhase::Active);
    let snap = engine.tick(&InputState::idle(), Some(&body));
    assert_eq!(snap.phase, RoundPhase::Over);
    assert_eq!(snap.outcome, Some(RoundOutcome::HunterWins));
}

#[test]
fn test_mirrored_traps_share_lifetimes() {
    let mut spirit = engine(Role::Spirit);
    let mut hunter = engine(Role::Hunter);
    spirit.tick(&trap_at(4000.0, 4000.0), None);
    spirit.tick(&trap_at(4100.0, 4000.0), None);
    for message in spirit.drain_outbox() {
        hunter.receive(&message.encode());
    }
    let a = spirit.tick(&InputState::idle(), None);
    let b = hunter.tick(&InputState::idle(), None);
    let mut ages_a: Vec<u32> = a.traps.iter().map(|t| t.max_age).collect();
    let mut ages_b: Vec<u32> = b.traps.iter().map(|t| t.max_age).collect();
    ages_a.sort_unstable();
    ages_b.sort_unstable();
    assert_eq!(ages_a, ages_b);
    assert_eq!(ages_a.len(), 2);
}

// ---- Config ----

#[test]
fn test_partial_config_fills_defaults() {
    let config: RoundConfig =
        serde_json::from_str(r#"{ "seed": 7, "role": "Spirit", "max_traps": 5 }"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.role, Role::Spirit);
    assert_eq!(config.max_traps, 5);
    assert_eq!(config.trigger_timeout, TRIGGER_TIMEOUT_TICKS);
    assert_eq!(config.round_duration_ticks, ROUND_DURATION_TICKS);
}

#[test]
fn test_level_with_huge_battery_ticks() {
    let level = LevelData::from_json(
        r#"{ "width": 4, "height": 4, "battery": 2000000000,
             "objects": [ { "class": "portrait", "pos": [0.0, 0.0], "battery": 0 } ] }"#,
    )
    .unwrap();
    let mut engine = RoundEngine::new(RoundConfig::for_role(Role::Spirit));
    engine.load_level(&level).unwrap();
    let snap = engine.tick(&InputState::idle(), None);
    assert!(!snap.cameras[0].is_active);
    assert!(snap.cameras[0].charge_fraction > 0.0);
}

// ---- Aiming ----

const AIM_LEVEL_JSON: &str = r#"{
    "width": 10, "height": 10,
    "objects": [
        { "class": "portrait", "pos": [0.0, 0.0] },
        { "class": "portrait", "pos": [500.0, 0.0], "limits": [-0.5, 0.5] }
    ]
}"#;

fn aim_engine() -> RoundEngine {
    let mut engine = RoundEngine::new(RoundConfig::for_role(Role::Spirit));
    engine
        .load_level(&LevelData::from_json(AIM_LEVEL_JSON).unwrap())
        .unwrap();
    engine
}

fn look(x: f32, y: f32) -> InputState {
    InputState {
        look_at: Some(Position::new(x, y)),
        ..InputState::default()
    }
}

#[test]
fn test_look_at_turns_selected_portrait() {
    let mut engine = aim_engine();
    engine.tick(&tap(0.0, 0.0), None);
    let snap = engine.tick(&look(10.0, 0.0), None);
    assert!((snap.cameras[0].heading - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    assert!(snap.cameras[1].heading.abs() < 1e-5);
}

#[test]
fn test_look_at_respects_portrait_limits() {
    let mut engine = aim_engine();
    engine.tick(&tap(500.0, 0.0), None);
    let snap = engine.tick(&look(900.0, 0.0), None);
    assert!((snap.cameras[1].heading - 0.5).abs() < 1e-5);
}

#[test]
fn test_look_at_without_selection_is_ignored() {
    let mut engine = aim_engine();
    let snap = engine.tick(&look(10.0, 0.0), None);
    assert!(snap.cameras.iter().all(|c| c.heading.abs() < 1e-5));
}
