//! Spawn director: creates swimmers and keeps the pond populated
//!
//! Swimmers enter from off-screen on the side opposite their heading. Speed
//! ranges grow with the score, so the pond gets livelier as the player improves.
//! Once the match is over every spawn request is ignored.

use glam::Vec2;
use rand::Rng;

use super::state::{CatchKind, EntityId, GameState, Species, SwimmerKind};
use crate::consts::*;
use crate::tuning::{SpeedRange, Tuning};

/// Pick a species: rare first, otherwise a coin flip between the common two
pub fn roll_species(rng: &mut impl Rng, rare_chance: f32) -> Species {
    if rng.random::<f32>() < rare_chance {
        Species::Golden
    } else if rng.random::<f32>() < 0.5 {
        Species::Striped
    } else {
        Species::Spotted
    }
}

/// Uniform speed within a score-scaled range
pub fn roll_speed(rng: &mut impl Rng, range: &SpeedRange, score: i64, scale: f32) -> f32 {
    let (min, max) = range.bounds(score, scale);
    rng.random::<f32>() * (max - min) + min
}

/// Heading and entry point for a new swimmer
pub fn roll_entry(rng: &mut impl Rng, field: Vec2) -> (f32, Vec2) {
    let direction = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
    let x = if direction > 0.0 {
        -SPAWN_BUFFER
    } else {
        field.x + SPAWN_BUFFER
    };
    let band = (field.y - 2.0 * EDGE_MARGIN).max(0.0);
    let y = rng.random::<f32>() * band + EDGE_MARGIN;
    (direction, Vec2::new(x, y))
}

/// How many trash replace one caught trash
pub fn replacement_trash_count(score: i64, step: i64) -> u32 {
    if step <= 0 {
        return 1;
    }
    1 + (score.max(0) / step) as u32
}

fn fish_kind(tuning: &Tuning, species: Species) -> (CatchKind, SpeedRange) {
    let profile = match species {
        Species::Striped => tuning.fish.striped,
        Species::Spotted => tuning.fish.spotted,
        Species::Golden => tuning.fish.golden,
    };
    (
        CatchKind::Fish {
            species,
            points: profile.points,
        },
        profile.speed,
    )
}

/// Spawn one fish. No-op once the match is over.
pub fn spawn_fish(state: &mut GameState) -> Option<EntityId> {
    if state.is_over() {
        return None;
    }
    let species = roll_species(&mut state.rng, state.tuning.rare_chance);
    let (kind, range) = fish_kind(&state.tuning, species);
    let speed = roll_speed(&mut state.rng, &range, state.score, state.tuning.speed_scale);
    let (direction, pos) = roll_entry(&mut state.rng, state.field);
    let id = state.insert_swimmer(kind, pos, speed, direction);
    log::debug!("Spawned {:?} {:?} at {:?} speed {:.1}", species, id, pos, speed);
    Some(id)
}

/// Spawn one piece of trash. No-op once the match is over.
pub fn spawn_trash(state: &mut GameState) -> Option<EntityId> {
    if state.is_over() {
        return None;
    }
    let profile = state.tuning.trash;
    let speed = roll_speed(&mut state.rng, &profile.speed, state.score, state.tuning.speed_scale);
    let (direction, pos) = roll_entry(&mut state.rng, state.field);
    let id = state.insert_swimmer(
        CatchKind::Trash {
            penalty: profile.penalty,
        },
        pos,
        speed,
        direction,
    );
    log::debug!("Spawned trash {:?} at {:?} speed {:.1}", id, pos, speed);
    Some(id)
}

/// Spawn one swimmer of the given kind
pub fn spawn(state: &mut GameState, kind: SwimmerKind) -> Option<EntityId> {
    match kind {
        SwimmerKind::Fish => spawn_fish(state),
        SwimmerKind::Trash => spawn_trash(state),
    }
}

/// Fill an empty pond with the starting fish and trash
pub fn spawn_initial_population(state: &mut GameState) {
    for _ in 0..state.tuning.initial_fish {
        spawn_fish(state);
    }
    for _ in 0..state.tuning.initial_trash {
        spawn_trash(state);
    }
}

/// Retire a swimmer that finished its pass across the pond. Shadows are
/// replaced like-for-like; revealed swimmers are already being replaced.
pub fn recycle(state: &mut GameState, id: EntityId) {
    let Some(swimmer) = state.remove_swimmer(id) else {
        return;
    };
    if swimmer.is_shadow {
        spawn(state, swimmer.kind.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_species_distribution() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut golden = 0;
        let mut striped = 0;
        let n = 20_000;
        for _ in 0..n {
            match roll_species(&mut rng, 0.05) {
                Species::Golden => golden += 1,
                Species::Striped => striped += 1,
                Species::Spotted => {}
            }
        }
        let golden_rate = golden as f32 / n as f32;
        assert!((0.03..0.07).contains(&golden_rate), "golden rate {}", golden_rate);
        let striped_share = striped as f32 / (n - golden) as f32;
        assert!((0.45..0.55).contains(&striped_share));
    }

    #[test]
    fn test_rare_chance_extremes() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!((0..100).all(|_| roll_species(&mut rng, 1.0) == Species::Golden));
        assert!((0..100).all(|_| roll_species(&mut rng, 0.0) != Species::Golden));
    }

    #[test]
    fn test_speed_within_range() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for score in [0, 50, 500] {
            let (lo, hi) = tuning.trash.speed.bounds(score, tuning.speed_scale);
            for _ in 0..200 {
                let s = roll_speed(&mut rng, &tuning.trash.speed, score, tuning.speed_scale);
                assert!(s >= lo && s <= hi);
            }
        }
    }

    #[test]
    fn test_entry_opposite_heading() {
        let mut rng = Pcg32::seed_from_u64(9);
        let field = Vec2::new(1280.0, 720.0);
        for _ in 0..200 {
            let (dir, pos) = roll_entry(&mut rng, field);
            if dir > 0.0 {
                assert_eq!(pos.x, -50.0);
            } else {
                assert_eq!(pos.x, 1330.0);
            }
            assert!(pos.y >= 30.0 && pos.y <= 690.0);
        }
    }

    #[test]
    fn test_replacement_trash_scales() {
        assert_eq!(replacement_trash_count(0, 30), 1);
        assert_eq!(replacement_trash_count(29, 30), 1);
        assert_eq!(replacement_trash_count(30, 30), 2);
        assert_eq!(replacement_trash_count(95, 30), 4);
        assert_eq!(replacement_trash_count(-40, 30), 1);
    }

    #[test]
    fn test_no_spawns_after_game_over() {
        let mut state = GameState::without_population(5, Tuning::default());
        state.phase = GamePhase::GameOver;
        assert!(spawn_fish(&mut state).is_none());
        assert!(spawn_trash(&mut state).is_none());
        assert!(state.swimmers.is_empty());
    }

    #[test]
    fn test_recycle_replaces_shadow_only() {
        let mut state = GameState::without_population(5, Tuning::default());
        let shadow = spawn_trash(&mut state).unwrap();
        recycle(&mut state, shadow);
        assert_eq!(state.count(SwimmerKind::Trash), 1);
        assert!(!state.is_alive(shadow));

        let revealed = state.swimmers[0].id;
        state.reveal(revealed);
        recycle(&mut state, revealed);
        assert!(state.swimmers.is_empty());
    }
}
