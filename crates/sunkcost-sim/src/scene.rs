//! Collaborator seams for rendering and physics.
//!
//! The round never draws and never owns a physics body. It queues scene
//! operations for the renderer and reads the Hunter's body through
//! [`BodyView`] once per frame.

use sunkcost_core::types::{Position, Velocity, ViewHandle};

/// Scene graph sink. Implemented by the renderer.
pub trait SceneSink {
    fn add_child(&mut self, node: ViewHandle);
    fn remove_child(&mut self, node: ViewHandle);
}

/// A queued scene graph change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOp {
    Add(ViewHandle),
    Remove(ViewHandle),
}

impl SceneOp {
    /// Forward this operation to `sink`.
    pub fn apply(self, sink: &mut dyn SceneSink) {
        match self {
            SceneOp::Add(node) => sink.add_child(node),
            SceneOp::Remove(node) => sink.remove_child(node),
        }
    }
}

/// Scene that just remembers which nodes are attached.
#[derive(Debug, Default)]
pub struct RecordingScene {
    children: Vec<ViewHandle>,
}

impl RecordingScene {
    pub fn children(&self) -> &[ViewHandle] {
        &self.children
    }

    pub fn contains(&self, node: ViewHandle) -> bool {
        self.children.contains(&node)
    }
}

impl SceneSink for RecordingScene {
    fn add_child(&mut self, node: ViewHandle) {
        if !self.children.contains(&node) {
            self.children.push(node);
        }
    }

    fn remove_child(&mut self, node: ViewHandle) {
        self.children.retain(|c| *c != node);
    }
}

/// Read-only view of a body owned by the physics collaborator.
pub trait BodyView {
    fn position(&self) -> Position;
    fn velocity(&self) -> Velocity;
}

/// A body that is wherever it was last put. Stands in for the physics
/// world in headless play and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct KinematicBody {
    pub position: Position,
    pub velocity: Velocity,
}

impl KinematicBody {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            velocity: Velocity::default(),
        }
    }

    /// Move by the current velocity.
    pub fn step(&mut self) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
    }
}

impl BodyView for KinematicBody {
    fn position(&self) -> Position {
        self.position
    }

    fn velocity(&self) -> Velocity {
        self.velocity
    }
}
