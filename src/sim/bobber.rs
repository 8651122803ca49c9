//! Bobber state machine
//!
//! Surface: steerable, dips onto the first shadow it overlaps.
//! Submerged: one catch press allowed while the window is open. The window
//! either ends in a catch attempt (then a short settle before resurfacing) or
//! runs out, in which case the held swimmer gets away.
//!
//! The bobber owns at most one pending timer; starting a new one always
//! cancels the old, so a stale countdown can never reopen a finished dip.

use glam::Vec2;

use super::controller;
use super::schedule::{TimerAction, TimerId};
use super::state::{
    Bobber, BobberState, CatchKind, EntityId, Feedback, GameEvent, GameState, Look, Target,
};
use super::tick::TickInput;
use crate::consts::EDGE_MARGIN;

/// Keep the bobber inside the field margins
pub fn clamp_to_field(bobber: &mut Bobber, field: Vec2) {
    let max = (field - Vec2::splat(EDGE_MARGIN)).max(Vec2::splat(EDGE_MARGIN));
    bobber.pos = bobber.pos.clamp(Vec2::splat(EDGE_MARGIN), max);
}

/// Held directions as a unit-per-axis step (screen coords, +y is down)
pub fn steer_direction(input: &TickInput) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    dir
}

/// Move a surfaced bobber. Each axis moves independently, like holding keys.
pub fn steer(bobber: &mut Bobber, input: &TickInput, dt: f32, speed: f32, field: Vec2) {
    if bobber.state != BobberState::Surface || bobber.disabled {
        return;
    }
    let dir = steer_direction(input);
    if dir == Vec2::ZERO {
        return;
    }
    bobber.pos += dir * speed * dt;
    clamp_to_field(bobber, field);
}

/// First shadow under the bobber, in creation order
pub fn find_bite(state: &GameState) -> Option<EntityId> {
    let hook = state.bobber.rect();
    state
        .swimmers
        .iter()
        .find(|s| s.is_shadow && super::collision::overlaps(&hook, &s.rect()))
        .map(|s| s.id)
}

/// Dip onto `entity`: freeze it and open the catch window
pub fn engage(state: &mut GameState, entity: EntityId) {
    let Some(swimmer) = state.swimmer_mut(entity) else {
        return;
    };
    swimmer.stopped = true;

    state.bobber.state = BobberState::Submerged;
    state.bobber.can_catch = true;
    state.bobber.engaged = Some(entity);
    let window = state.tuning.catch_window_ms;
    state.start_bobber_timer(window, TimerAction::CatchWindowExpired { entity });
    state.emit(GameEvent::Appearance {
        target: Target::Bobber,
        look: Look::Submerged,
    });
    log::debug!("Bobber dipped onto {:?}", entity);
}

/// Catch press while submerged. Returns true if the press was accepted.
pub fn press_catch(state: &mut GameState) -> bool {
    let bobber = &state.bobber;
    if bobber.state != BobberState::Submerged || !bobber.can_catch || bobber.disabled {
        return false;
    }
    state.cancel_bobber_timer();
    state.bobber.can_catch = false;

    controller::attempt_catch(state);

    if !state.is_over() {
        let settle = state.tuning.settle_delay_ms;
        state.start_bobber_timer(settle, TimerAction::Resurface);
    }
    true
}

/// The catch window closed without a press: the swimmer gets away
pub fn on_window_expired(state: &mut GameState, timer: TimerId, entity: EntityId) {
    let bobber = &state.bobber;
    if bobber.pending != Some(timer)
        || bobber.state != BobberState::Submerged
        || bobber.engaged != Some(entity)
    {
        log::trace!("Ignoring stale catch window {:?}", timer);
        return;
    }
    state.bobber.pending = None;
    surface(state);
    state.bobber.engaged = None;
    state.emit(GameEvent::Feedback(Feedback::TooLate));

    let Some(swimmer) = state.remove_swimmer(entity) else {
        return;
    };
    let feedback = match swimmer.kind {
        CatchKind::Fish { .. } => Feedback::FishEscaped,
        CatchKind::Trash { .. } => Feedback::TrashSank,
    };
    state.emit(GameEvent::Feedback(feedback));
    log::debug!("{:?} got away", entity);

    let delay = state.tuning.respawn_delay_ms;
    state.schedule(
        delay,
        TimerAction::Spawn {
            kind: swimmer.kind.kind(),
            count: 1,
        },
    );
}

/// Settle delay after a catch attempt is over
pub fn on_resurface(state: &mut GameState, timer: TimerId) {
    if state.bobber.pending != Some(timer) {
        log::trace!("Ignoring stale resurface {:?}", timer);
        return;
    }
    state.bobber.pending = None;
    surface(state);

    // Let a swimmer we dipped on but didn't land swim on
    if let Some(entity) = state.bobber.engaged.take() {
        if let Some(swimmer) = state.swimmer_mut(entity) {
            if swimmer.is_shadow {
                swimmer.stopped = false;
            }
        }
    }
}

/// The held swimmer is gone before the dip resolved (it wrapped off a shrunk
/// field, or the pond was cleared). An open catch window closes with it; a
/// settling bobber just finishes its settle.
pub fn release(state: &mut GameState, entity: EntityId) {
    if state.bobber.engaged != Some(entity) {
        return;
    }
    state.bobber.engaged = None;
    if state.bobber.can_catch {
        state.cancel_bobber_timer();
        surface(state);
        log::debug!("Bobber released, {:?} left the pond", entity);
    }
}

/// Back to the surface without touching timers or the held swimmer
pub fn surface(state: &mut GameState) {
    state.bobber.state = BobberState::Surface;
    state.bobber.can_catch = false;
    state.emit(GameEvent::Appearance {
        target: Target::Bobber,
        look: Look::Default,
    });
}

/// Game over: the bobber floats and stays put
pub fn disable(state: &mut GameState) {
    state.cancel_bobber_timer();
    surface(state);
    state.bobber.disabled = true;
}
