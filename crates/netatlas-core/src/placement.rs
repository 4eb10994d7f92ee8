// ── Manual placement mode ──
//
// Interaction state machine for placing a device node by hand:
// Idle → Armed(pending) → Idle on commit or cancel. Arming can happen
// before any data is staged; a commit click only fires once data is
// staged.

use serde::{Deserialize, Serialize};

use crate::model::DeviceStatus;

/// Device data staged for manual placement (or for a backend add).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDevice {
    pub ip: String,
    pub name: String,
    pub location: String,
    pub status: DeviceStatus,
}

/// The placement interaction state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlacementMode {
    #[default]
    Idle,
    Armed {
        pending: Option<PendingDevice>,
    },
}

impl PlacementMode {
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed { .. })
    }

    /// Flip between Idle and Armed. Leaving armed state drops any staged
    /// data; entering it starts with none.
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Idle => Self::Armed { pending: None },
            Self::Armed { .. } => Self::Idle,
        };
    }

    /// Stage device data for the next commit click. Returns `false` (and
    /// stages nothing) when not armed.
    pub fn stage(&mut self, data: PendingDevice) -> bool {
        match self {
            Self::Armed { pending } => {
                *pending = Some(data);
                true
            }
            Self::Idle => false,
        }
    }

    /// Consume the staged data for a commit click, returning to Idle.
    ///
    /// Returns `None` (leaving the state untouched) when not armed or
    /// when nothing is staged yet -- a click without staged data is a
    /// no-op, not a cancel.
    pub fn take_commit(&mut self) -> Option<PendingDevice> {
        match self {
            Self::Armed { pending } if pending.is_some() => {
                let data = pending.take();
                *self = Self::Idle;
                data
            }
            _ => None,
        }
    }

    /// Unconditionally return to Idle, dropping staged data.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}
