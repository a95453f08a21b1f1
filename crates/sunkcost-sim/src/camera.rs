//! A single fixed viewpoint.
//!
//! Headings follow the world convention: 0 = +y, increasing clockwise,
//! range (-PI, PI]. Direction limits are expressed in the same units.

use glam::{Vec2, Vec3};

use sunkcost_core::enums::CameraKind;
use sunkcost_core::error::PortraitError;
use sunkcost_core::types::{Position, Rect};

/// One camera in a portrait set, or the Hunter's own camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    id: u32,
    kind: CameraKind,
    position: Vec3,
    view_direction: Vec3,
    limits: (f32, f32),
}

impl CameraState {
    pub fn new(
        id: u32,
        kind: CameraKind,
        position: Vec3,
        view_direction: Vec3,
        limits: (f32, f32),
    ) -> Result<Self, PortraitError> {
        let (min, max) = limits;
        if min > max {
            return Err(PortraitError::InvalidLimits { min, max });
        }
        Ok(Self {
            id,
            kind,
            position,
            view_direction,
            limits,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> CameraKind {
        self.kind
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Position projected onto the map.
    pub fn ground_position(&self) -> Position {
        Position::from(self.position)
    }

    pub fn view_direction(&self) -> Vec3 {
        self.view_direction
    }

    /// Allowed heading range `(min, max)` in radians.
    pub fn limits(&self) -> (f32, f32) {
        self.limits
    }

    /// Current heading of the view direction.
    pub fn heading(&self) -> f32 {
        heading_of(self.view_direction.truncate())
    }

    /// Aim at `target`, clamping the heading into the direction limits.
    /// Aiming at a point directly above or below the camera keeps the
    /// current heading.
    pub fn look_at(&mut self, target: Vec3) {
        let delta = target - self.position;
        let flat = delta.truncate();
        let reach = flat.length();
        if reach <= f32::EPSILON {
            return;
        }
        let heading = heading_of(flat).clamp(self.limits.0, self.limits.1);
        self.view_direction = Vec3::new(reach * heading.sin(), reach * heading.cos(), delta.z);
    }

    /// Rectangle of the world this camera shows, centred on the camera.
    pub fn viewport(&self, width: f32, height: f32) -> Rect {
        Rect::centered(self.ground_position(), width, height)
    }
}

fn heading_of(v: Vec2) -> f32 {
    v.x.atan2(v.y)
}
