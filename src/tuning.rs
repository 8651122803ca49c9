//! Data-driven game balance
//!
//! Every number that changed between revisions of the game lives here, so a
//! rule set is picked explicitly instead of being baked into the simulation.

use serde::{Deserialize, Serialize};

use crate::persistence::Error;

/// How a match is lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossRule {
    /// Each trash capture costs a life; game over at zero
    Lives(u8),
    /// Legacy rule: game over once this many trash have been caught
    TrashLimit(u32),
}

impl Default for LossRule {
    fn default() -> Self {
        LossRule::Lives(3)
    }
}

/// One bound of a speed range, scaling linearly with score:
/// `(base + score / score_divisor) * scale`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedCurve {
    pub base: f32,
    pub score_divisor: f32,
}

impl SpeedCurve {
    pub const fn new(base: f32, score_divisor: f32) -> Self {
        Self {
            base,
            score_divisor,
        }
    }

    /// Evaluate at a score. Negative scores scale like zero.
    pub fn at(&self, score: i64, scale: f32) -> f32 {
        let score = score.max(0) as f32;
        let ramp = if self.score_divisor > 0.0 {
            score / self.score_divisor
        } else {
            0.0
        };
        (self.base + ramp) * scale
    }
}

/// Score-scaled `[min, max]` speed range in distance units per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: SpeedCurve,
    pub max: SpeedCurve,
}

impl SpeedRange {
    pub const fn new(min: SpeedCurve, max: SpeedCurve) -> Self {
        Self { min, max }
    }

    /// Resolve to concrete `(min, max)` at a score; `max` never drops below `min`
    pub fn bounds(&self, score: i64, scale: f32) -> (f32, f32) {
        let lo = self.min.at(score, scale);
        let hi = self.max.at(score, scale);
        (lo, hi.max(lo))
    }
}

/// Balance for one fish species
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FishProfile {
    pub points: i64,
    pub speed: SpeedRange,
}

/// Balance for trash
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrashProfile {
    pub penalty: i64,
    pub speed: SpeedRange,
}

/// Species table: two common fish and one rare
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FishTable {
    pub striped: FishProfile,
    pub spotted: FishProfile,
    pub golden: FishProfile,
}

impl Default for FishTable {
    fn default() -> Self {
        Self {
            striped: FishProfile {
                points: 10,
                speed: SpeedRange::new(SpeedCurve::new(4.0, 30.0), SpeedCurve::new(6.0, 15.0)),
            },
            spotted: FishProfile {
                points: 20,
                speed: SpeedRange::new(SpeedCurve::new(5.0, 25.0), SpeedCurve::new(8.0, 12.0)),
            },
            golden: FishProfile {
                points: 50,
                speed: SpeedRange::new(SpeedCurve::new(6.0, 20.0), SpeedCurve::new(10.0, 10.0)),
            },
        }
    }
}

/// Complete rule set for a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub loss_rule: LossRule,
    /// Time the player has to press catch once the bobber dips
    pub catch_window_ms: f64,
    /// Revealed catch stays visible this long before it is removed
    pub reveal_delay_ms: f64,
    /// Pause after a catch attempt before the bobber resurfaces
    pub settle_delay_ms: f64,
    /// Delay before an escaped/sunk swimmer is replaced
    pub respawn_delay_ms: f64,
    pub initial_fish: u32,
    pub initial_trash: u32,
    /// Probability that a spawned fish is the rare species
    pub rare_chance: f32,
    pub fish: FishTable,
    pub trash: TrashProfile,
    /// Multiplier applied to every speed curve
    pub speed_scale: f32,
    /// One extra trash per this many points when trash is caught
    pub extra_trash_score_step: i64,
    /// Bobber movement speed (distance units per second)
    pub bobber_speed: f32,
    pub bobber_size: f32,
    /// Replace swimmers that finish a pass instead of wrapping them forever
    pub recycle_on_exit: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            loss_rule: LossRule::Lives(3),
            catch_window_ms: 1000.0,
            reveal_delay_ms: 700.0,
            settle_delay_ms: 700.0,
            respawn_delay_ms: 700.0,
            initial_fish: 5,
            initial_trash: 2,
            rare_chance: 0.05,
            fish: FishTable::default(),
            trash: TrashProfile {
                penalty: 10,
                speed: SpeedRange::new(SpeedCurve::new(4.0, 20.0), SpeedCurve::new(8.0, 10.0)),
            },
            speed_scale: 2.0,
            extra_trash_score_step: 30,
            bobber_speed: 300.0,
            bobber_size: 15.0,
            recycle_on_exit: true,
        }
    }
}

impl Tuning {
    /// Legacy rules: three trash end the match, no lives
    pub fn classic() -> Self {
        Self {
            loss_rule: LossRule::TrashLimit(3),
            ..Self::default()
        }
    }

    /// Lives at match start (0 under the trash-limit rule)
    pub fn starting_lives(&self) -> u8 {
        match self.loss_rule {
            LossRule::Lives(n) => n,
            LossRule::TrashLimit(_) => 0,
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_curve_scales_with_score() {
        let curve = SpeedCurve::new(4.0, 30.0);
        assert_eq!(curve.at(0, 2.0), 8.0);
        assert_eq!(curve.at(30, 2.0), 10.0);
        // Penalties never slow swimmers below the base speed
        assert_eq!(curve.at(-50, 2.0), 8.0);
    }

    #[test]
    fn test_speed_range_bounds_ordered() {
        let tuning = Tuning::default();
        for score in [0, 10, 100, 1000] {
            let (lo, hi) = tuning.fish.golden.speed.bounds(score, tuning.speed_scale);
            assert!(lo <= hi);
        }
    }

    #[test]
    fn test_classic_preset() {
        let tuning = Tuning::classic();
        assert_eq!(tuning.loss_rule, LossRule::TrashLimit(3));
        assert_eq!(tuning.starting_lives(), 0);
        assert_eq!(Tuning::default().starting_lives(), 3);
    }

    #[test]
    fn test_from_json_partial() {
        let tuning = Tuning::from_json(r#"{ "catch_window_ms": 800.0 }"#).unwrap();
        assert_eq!(tuning.catch_window_ms, 800.0);
        assert_eq!(tuning.initial_fish, 5);

        let tuning = Tuning::from_json(r#"{ "loss_rule": { "TrashLimit": 3 } }"#).unwrap();
        assert_eq!(tuning.loss_rule, LossRule::TrashLimit(3));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
