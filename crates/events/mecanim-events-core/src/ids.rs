//! Identifiers for controllers, states and animated entities.

use serde::{Deserialize, Serialize};

/// Identity of an animation controller (the asset events are authored against).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ControllerId(pub i32);

/// Full-path hash of an animation state.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct StateHash(pub i32);

/// Tag hash of an animation state.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct TagHash(pub i32);

/// Identity of one animated entity (one animator instance driving a controller).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Composite key of the event table: one state on one layer of one controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub controller: ControllerId,
    pub layer: u32,
    pub state: StateHash,
}

impl StateKey {
    #[inline]
    pub fn new(controller: ControllerId, layer: u32, state: StateHash) -> Self {
        Self {
            controller,
            layer,
            state,
        }
    }
}

/// Monotonic allocator for hosts without a stable entity identity of their own.
#[derive(Default, Debug)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
