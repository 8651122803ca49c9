//! Deferred actions on the simulation clock
//!
//! Replaces host timers: every delayed effect (catch window, reveal-then-remove,
//! resurfacing, respawns) is queued here and fired from `tick` once its due
//! time has passed. Timers can be cancelled by id or by the entity they act on.

use serde::{Deserialize, Serialize};

use super::state::{EntityId, SwimmerKind};

/// Handle to a queued timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// The bobber's catch window on `entity` ran out
    CatchWindowExpired { entity: EntityId },
    /// The bobber comes back up after a catch attempt
    Resurface,
    /// Remove a revealed swimmer
    Despawn { entity: EntityId },
    /// Spawn `count` new swimmers of `kind`
    Spawn { kind: SwimmerKind, count: u32 },
}

impl TimerAction {
    /// Entity this action refers to, if any
    pub fn entity(&self) -> Option<EntityId> {
        match *self {
            TimerAction::CatchWindowExpired { entity } | TimerAction::Despawn { entity } => {
                Some(entity)
            }
            TimerAction::Resurface | TimerAction::Spawn { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    id: TimerId,
    due_ms: f64,
    action: TimerAction,
}

/// Timer queue, kept sorted by (due time, id)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, action: TimerAction) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let due_ms = now_ms + delay_ms.max(0.0);
        // Insert after every timer due at or before us: equal due times fire
        // in scheduling order
        let at = self.timers.partition_point(|t| t.due_ms <= due_ms);
        self.timers.insert(at, Timer { id, due_ms, action });
        id
    }

    /// Cancel a timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.iter().position(|t| t.id == id) {
            Some(idx) => {
                self.timers.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Cancel every timer acting on `entity`; returns how many were removed
    pub fn cancel_entity(&mut self, entity: EntityId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.action.entity() != Some(entity));
        before - self.timers.len()
    }

    /// Remove and return every timer due at `now_ms`, in firing order
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(TimerId, TimerAction)> {
        let split = self.timers.partition_point(|t| t.due_ms <= now_ms);
        self.timers
            .drain(..split)
            .map(|t| (t.id, t.action))
            .collect()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Drop everything (restart)
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Pending actions in firing order
    pub fn pending(&self) -> impl Iterator<Item = &TimerAction> {
        self.timers.iter().map(|t| &t.action)
    }
}
