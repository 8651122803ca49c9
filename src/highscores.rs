//! Best-score tracking
//!
//! A single integer persisted under a fixed key. The stored value is updated
//! the moment the live score passes it, not only at game over.

use crate::persistence::Store;

/// Tracks the best score seen across sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct HighScore {
    best: i64,
}

impl HighScore {
    /// Storage key for the best score
    pub const STORAGE_KEY: &'static str = "highScore";

    /// Load the best score from `store`; unreadable values count as zero
    pub fn load(store: &impl Store) -> Self {
        let best = match store.get_int(Self::STORAGE_KEY) {
            Ok(Some(best)) => {
                log::info!("Loaded high score {}", best);
                best
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score: {}", e);
                0
            }
        };
        Self { best }
    }

    pub fn best(&self) -> i64 {
        self.best
    }

    /// Feed the current score; persists and returns true on a new best
    pub fn observe(&mut self, score: i64, store: &mut impl Store) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(e) = store.set_int(Self::STORAGE_KEY, score) {
            log::warn!("Failed to save high score: {}", e);
        }
        true
    }
}
