//! Match controller: catch resolution, loss rules, game over and restart
//!
//! The only place score, lives and the trash counter change.

use super::bobber;
use super::collision::overlaps;
use super::schedule::TimerAction;
use super::spawn;
use super::state::{
    Bobber, CatchKind, EntityId, Feedback, GameEvent, GamePhase, GameState, SwimmerKind,
};
use crate::tuning::LossRule;

/// Result of a catch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchOutcome {
    Fish { entity: EntityId, points: i64 },
    Trash { entity: EntityId, penalty: i64 },
    Miss,
    /// Match already over
    Ignored,
}

/// First shadow of `kind` under the bobber
fn hooked(state: &GameState, kind: SwimmerKind) -> Option<EntityId> {
    let hook = state.bobber.rect();
    state
        .swimmers
        .iter()
        .filter(|s| s.is_shadow && s.kind.kind() == kind)
        .find(|s| overlaps(&hook, &s.rect()))
        .map(|s| s.id)
}

/// Resolve a catch press. Fish take priority over trash.
pub fn attempt_catch(state: &mut GameState) -> CatchOutcome {
    if state.is_over() {
        return CatchOutcome::Ignored;
    }

    let Some(entity) =
        hooked(state, SwimmerKind::Fish).or_else(|| hooked(state, SwimmerKind::Trash))
    else {
        state.emit(GameEvent::Feedback(Feedback::Miss));
        log::debug!("Catch attempt missed");
        return CatchOutcome::Miss;
    };
    let Some(kind) = state.swimmer(entity).map(|s| s.kind) else {
        return CatchOutcome::Miss;
    };

    state.reveal(entity);
    let effect = kind.on_caught();
    state.score += effect.score_delta;
    if effect.is_trash {
        state.trash_caught += 1;
        if let LossRule::Lives(_) = state.tuning.loss_rule {
            state.lives = state.lives.saturating_sub(1);
        }
    }
    state.emit(GameEvent::Feedback(effect.feedback));
    state.emit(GameEvent::Sound(effect.sound));

    let count = if effect.is_trash {
        spawn::replacement_trash_count(state.score, state.tuning.extra_trash_score_step)
    } else {
        1
    };
    let delay = state.tuning.reveal_delay_ms;
    state.schedule(
        delay,
        TimerAction::Spawn {
            kind: kind.kind(),
            count,
        },
    );
    log::debug!(
        "Landed {:?} ({:+}): score {}, lives {}, trash {}",
        kind,
        effect.score_delta,
        state.score,
        state.lives,
        state.trash_caught
    );

    state.score_changed();
    if effect.is_trash && is_lost(state) {
        game_over(state);
    }
    match kind {
        CatchKind::Fish { points, .. } => CatchOutcome::Fish { entity, points },
        CatchKind::Trash { penalty } => CatchOutcome::Trash { entity, penalty },
    }
}

/// Has the configured loss condition been met
pub fn is_lost(state: &GameState) -> bool {
    match state.tuning.loss_rule {
        LossRule::Lives(_) => state.lives == 0,
        LossRule::TrashLimit(limit) => state.trash_caught >= limit,
    }
}

/// End the match: no more dipping, no more spawns, restart on offer
pub fn game_over(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    state.phase = GamePhase::GameOver;
    bobber::disable(state);
    state.emit(GameEvent::Feedback(Feedback::GameOver));
    state.emit(GameEvent::GameOver { score: state.score });
    log::info!(
        "Game over: score {} after {} trash",
        state.score,
        state.trash_caught
    );
}

/// Fresh match in the same pond: clears swimmers and timers, resets the
/// score and loss counters, then restocks the initial population
pub fn restart(state: &mut GameState) {
    let ids: Vec<_> = state.swimmers.iter().map(|s| s.id).collect();
    for id in ids {
        state.remove_swimmer(id);
    }
    state.scheduler.clear();
    // Restarted tells the host to drop everything it was showing
    state.events.clear();

    state.score = 0;
    state.lives = state.tuning.starting_lives();
    state.trash_caught = 0;
    state.bobber = Bobber::new(state.tuning.bobber_size);
    bobber::clamp_to_field(&mut state.bobber, state.field);
    state.phase = GamePhase::Playing;

    state.emit(GameEvent::Restarted);
    spawn::spawn_initial_population(state);
    state.score_changed();
    log::info!("Match restarted");
}
