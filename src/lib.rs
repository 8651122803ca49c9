//! Shadow Fishing - an arcade fishing game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, overlap, bobber, spawning, scoring)
//! - `tuning`: Data-driven game balance and rule sets
//! - `settings`: Player preferences (rule preset, audio levels)
//! - `persistence`: High score / settings storage adapters
//! - `highscores`: Best-score tracking on top of a score store
//! - `audio`: Sound cue dispatch
//! - `platform`: Logging and clock abstraction

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::{RulePreset, Settings};
pub use tuning::{LossRule, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default playfield dimensions
    pub const FIELD_WIDTH: f32 = 1280.0;
    pub const FIELD_HEIGHT: f32 = 720.0;

    /// Distance from each field edge the bobber and spawns keep clear of
    pub const EDGE_MARGIN: f32 = 30.0;
    /// Off-screen distance at which swimmers wrap around
    pub const WRAP_BUFFER: f32 = 100.0;
    /// Off-screen distance at which swimmers are spawned
    pub const SPAWN_BUFFER: f32 = 50.0;

    /// Swimmer hitbox
    pub const ENTITY_WIDTH: f32 = 30.0;
    pub const ENTITY_HEIGHT: f32 = 20.0;

    /// Bobber start position (top-left)
    pub const BOBBER_START_X: f32 = 200.0;
    pub const BOBBER_START_Y: f32 = 200.0;
}
