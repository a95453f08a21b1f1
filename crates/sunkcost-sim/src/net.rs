//! Application messages exchanged between the Hunter and Spirit peers.
//!
//! Every message is a flat vector of `f32`s whose first element is the
//! message code. On the wire each float is 4 little-endian bytes.
//! Transport is a collaborator behind [`NetworkChannel`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use sunkcost_core::error::NetError;

/// Message codes (first float of every message).
pub mod code {
    pub const HUNTER_POSITION: u32 = 0;
    pub const TRAP_PLACED: u32 = 1;
    pub const CAMERA_SWITCHED: u32 = 3;
    pub const TREASURE_STOLEN: u32 = 4;
    pub const DOOR_LOCKED: u32 = 5;
    pub const DOOR_UNLOCK_REQUEST: u32 = 6;
}

/// Decoded application message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NetMessage {
    HunterPosition { x: f32, y: f32 },
    TrapPlaced { x: f32, y: f32 },
    CameraSwitched { index: usize },
    TreasureStolen,
    DoorLocked { index: usize },
    DoorUnlockRequest { index: usize },
}

impl NetMessage {
    pub fn code(&self) -> u32 {
        match self {
            NetMessage::HunterPosition { .. } => code::HUNTER_POSITION,
            NetMessage::TrapPlaced { .. } => code::TRAP_PLACED,
            NetMessage::CameraSwitched { .. } => code::CAMERA_SWITCHED,
            NetMessage::TreasureStolen => code::TREASURE_STOLEN,
            NetMessage::DoorLocked { .. } => code::DOOR_LOCKED,
            NetMessage::DoorUnlockRequest { .. } => code::DOOR_UNLOCK_REQUEST,
        }
    }

    /// Flatten into the float vector form.
    pub fn to_floats(&self) -> Vec<f32> {
        let head = self.code() as f32;
        match *self {
            NetMessage::HunterPosition { x, y } | NetMessage::TrapPlaced { x, y } => {
                vec![head, x, y]
            }
            NetMessage::CameraSwitched { index }
            | NetMessage::DoorLocked { index }
            | NetMessage::DoorUnlockRequest { index } => vec![head, index as f32],
            NetMessage::TreasureStolen => vec![head],
        }
    }

    /// Parse a float vector. Unknown codes yield `Ok(None)` so newer peers
    /// can add messages without breaking older ones.
    pub fn from_floats(values: &[f32]) -> Result<Option<Self>, NetError> {
        let Some(&head) = values.first() else {
            return Err(NetError::Empty);
        };
        if !(head.is_finite() && head >= 0.0 && head.fract() == 0.0) {
            return Ok(None);
        }
        let code = head as u32;
        let message = match code {
            code::HUNTER_POSITION => {
                let [x, y] = take::<2>(code, values)?;
                NetMessage::HunterPosition { x, y }
            }
            code::TRAP_PLACED => {
                let [x, y] = take::<2>(code, values)?;
                NetMessage::TrapPlaced { x, y }
            }
            code::CAMERA_SWITCHED => NetMessage::CameraSwitched {
                index: take_index(code, values)?,
            },
            code::TREASURE_STOLEN => NetMessage::TreasureStolen,
            code::DOOR_LOCKED => NetMessage::DoorLocked {
                index: take_index(code, values)?,
            },
            code::DOOR_UNLOCK_REQUEST => NetMessage::DoorUnlockRequest {
                index: take_index(code, values)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(message))
    }

    /// Serialize to bytes.
    pub fn encode(&self) -> Vec<u8> {
        self.to_floats()
            .iter()
            .flat_map(|f| f.to_le_bytes())
            .collect()
    }

    /// Deserialize from bytes.
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, NetError> {
        if bytes.is_empty() {
            return Err(NetError::Empty);
        }
        if bytes.len() % 4 != 0 {
            return Err(NetError::Misaligned(bytes.len()));
        }
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::from_floats(&floats)
    }
}

/// The `N` payload floats after the code.
fn take<const N: usize>(code: u32, values: &[f32]) -> Result<[f32; N], NetError> {
    values
        .get(1..=N)
        .and_then(|s| <[f32; N]>::try_from(s).ok())
        .ok_or(NetError::Truncated {
            code,
            expected: N + 1,
            got: values.len(),
        })
}

fn take_index(code: u32, values: &[f32]) -> Result<usize, NetError> {
    let [raw] = take::<1>(code, values)?;
    if !(raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0) {
        return Err(NetError::InvalidIndex(raw));
    }
    Ok(raw as usize)
}

/// Identifies the peer a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub u32);

/// Reliable broadcast channel to the other peer(s).
pub trait NetworkChannel {
    /// Send `bytes` to every other peer.
    fn broadcast(&mut self, bytes: &[u8]);

    /// Deliver every message received since the last call.
    fn receive(&mut self, handler: &mut dyn FnMut(PeerId, &[u8]));
}

type Mailbox = Rc<RefCell<VecDeque<(PeerId, Vec<u8>)>>>;

/// In-memory channel connecting two peers on the same thread.
pub struct LoopbackChannel {
    id: PeerId,
    inbox: Mailbox,
    outbox: Mailbox,
}

impl LoopbackChannel {
    /// Two connected endpoints, peers 0 and 1.
    pub fn pair() -> (Self, Self) {
        let a: Mailbox = Rc::default();
        let b: Mailbox = Rc::default();
        (
            Self {
                id: PeerId(0),
                inbox: Rc::clone(&a),
                outbox: Rc::clone(&b),
            },
            Self {
                id: PeerId(1),
                inbox: b,
                outbox: a,
            },
        )
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Messages waiting to be received.
    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }
}

impl NetworkChannel for LoopbackChannel {
    fn broadcast(&mut self, bytes: &[u8]) {
        self.outbox.borrow_mut().push_back((self.id, bytes.to_vec()));
    }

    fn receive(&mut self, handler: &mut dyn FnMut(PeerId, &[u8])) {
        let drained: Vec<_> = self.inbox.borrow_mut().drain(..).collect();
        for (source, bytes) in drained {
            handler(source, &bytes);
        }
    }
}
