//! The ordered set of Spirit viewpoints and the current selection.
//!
//! Insertion order is level order and is the index used on the wire, so
//! portraits are kept in a `Vec` rather than in the ECS world.

use glam::Vec3;

use sunkcost_core::enums::{BatteryTransition, CameraKind};
use sunkcost_core::error::PortraitError;
use sunkcost_core::types::{Position, Rect};

use crate::battery::BatteryState;
use crate::camera::CameraState;

/// One camera plus its battery. Non-portrait cameras have no battery.
#[derive(Debug, Clone)]
struct Portrait {
    camera: CameraState,
    battery: Option<BatteryState>,
}

/// Arguments for [`PortraitSet::add_portrait`].
#[derive(Debug, Clone, Copy)]
pub struct PortraitDesc {
    pub id: u32,
    pub position: Vec3,
    pub look_direction: Vec3,
    pub limits: (f32, f32),
    /// Starting charge. `None` starts full.
    pub battery: Option<u32>,
    pub kind: CameraKind,
}

/// Ordered portraits with the selected index.
#[derive(Debug, Clone)]
pub struct PortraitSet {
    portraits: Vec<Portrait>,
    active: Option<usize>,
    previous_active_state: bool,
    max_battery: u32,
    viewport_size: (f32, f32),
}

impl PortraitSet {
    pub fn new(max_battery: u32, viewport_size: (f32, f32)) -> Self {
        Self {
            portraits: Vec::new(),
            active: None,
            previous_active_state: true,
            max_battery: max_battery.max(1),
            viewport_size,
        }
    }

    /// Append a camera. Returns its index.
    pub fn add_portrait(&mut self, desc: PortraitDesc) -> Result<usize, PortraitError> {
        if self.portraits.iter().any(|p| p.camera.id() == desc.id) {
            return Err(PortraitError::DuplicateId(desc.id));
        }
        let camera = CameraState::new(
            desc.id,
            desc.kind,
            desc.position,
            desc.look_direction,
            desc.limits,
        )?;
        let battery = desc.kind.has_battery().then(|| match desc.battery {
            Some(charge) => BatteryState::with_charge(self.max_battery, charge),
            None => BatteryState::new(self.max_battery),
        });
        self.portraits.push(Portrait { camera, battery });
        Ok(self.portraits.len() - 1)
    }

    /// Drop every portrait and the selection.
    pub fn clear(&mut self) {
        self.portraits.clear();
        self.active = None;
        self.previous_active_state = true;
    }

    pub fn len(&self) -> usize {
        self.portraits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portraits.is_empty()
    }

    pub fn max_battery(&self) -> u32 {
        self.max_battery
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Select portrait `index`. Returns false and leaves the selection
    /// alone when the index is out of range.
    pub fn set_index(&mut self, index: usize) -> bool {
        if index >= self.portraits.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Index of the portrait closest to `point` on the map. Ties go to the
    /// earliest portrait.
    pub fn get_nearest(&self, point: Position) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in self.portraits.iter().enumerate() {
            let d = p.camera.ground_position().range_sq_to(&point);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn camera(&self, index: usize) -> Result<&CameraState, PortraitError> {
        self.portraits
            .get(index)
            .map(|p| &p.camera)
            .ok_or(PortraitError::IndexOutOfRange {
                index,
                len: self.portraits.len(),
            })
    }

    pub fn camera_mut(&mut self, index: usize) -> Result<&mut CameraState, PortraitError> {
        let len = self.portraits.len();
        self.portraits
            .get_mut(index)
            .map(|p| &mut p.camera)
            .ok_or(PortraitError::IndexOutOfRange { index, len })
    }

    /// Battery of portrait `index`; `Ok(None)` for cameras without one.
    pub fn battery(&self, index: usize) -> Result<Option<&BatteryState>, PortraitError> {
        self.portraits
            .get(index)
            .map(|p| p.battery.as_ref())
            .ok_or(PortraitError::IndexOutOfRange {
                index,
                len: self.portraits.len(),
            })
    }

    /// Iterate cameras with their batteries in level order.
    pub fn iter(&self) -> impl Iterator<Item = (&CameraState, Option<&BatteryState>)> {
        self.portraits.iter().map(|p| (&p.camera, p.battery.as_ref()))
    }

    /// Viewport of the selected portrait.
    pub fn current_viewport(&self) -> Result<Rect, PortraitError> {
        let index = self.active.ok_or(PortraitError::NoActiveCamera)?;
        let camera = self.camera(index)?;
        Ok(camera.viewport(self.viewport_size.0, self.viewport_size.1))
    }

    /// Whether portrait `index` exists and has charge to be looked through.
    pub fn can_switch_to(&self, index: usize) -> bool {
        match self.portraits.get(index) {
            Some(p) => p.battery.map_or(true, |b| b.is_active()),
            None => false,
        }
    }

    /// Whether the selected portrait is live. True when nothing is selected.
    pub fn active_is_live(&self) -> bool {
        match self.active {
            Some(index) => self.can_switch_to(index),
            None => true,
        }
    }

    /// Last frame's liveness of the selected portrait, kept for the
    /// caller's blackout edge detection.
    pub fn previous_active_state(&self) -> bool {
        self.previous_active_state
    }

    pub fn set_previous_active_state(&mut self, live: bool) {
        self.previous_active_state = live;
    }

    /// Advance every battery by one frame. Returns the liveness edges that
    /// happened, by portrait index.
    pub fn tick_batteries(&mut self) -> Vec<(usize, BatteryTransition)> {
        let active = self.active;
        let mut transitions = Vec::new();
        for (i, portrait) in self.portraits.iter_mut().enumerate() {
            if let Some(battery) = portrait.battery.as_mut() {
                let edge = battery.tick(active == Some(i));
                if edge != BatteryTransition::None {
                    transitions.push((i, edge));
                }
            }
        }
        transitions
    }
}
