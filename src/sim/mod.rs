//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies; collaborators drain events

pub mod bobber;
pub mod collision;
pub mod controller;
pub mod motion;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use controller::{CatchOutcome, attempt_catch, game_over, restart};
pub use motion::{Drift, drift};
pub use schedule::{Scheduler, TimerAction, TimerId};
pub use state::{
    Bobber, BobberState, CatchKind, EntityId, Feedback, GameEvent, GamePhase, GameState, Look,
    Species, Sprite, Swimmer, SwimmerKind, Target,
};
pub use tick::{TickInput, tick};
