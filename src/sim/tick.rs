//! Fixed timestep simulation tick
//!
//! Order within a tick: motion, due timers, overlap scan, then the
//! input-driven bobber transition.

use glam::Vec2;

use super::bobber;
use super::controller;
use super::motion::{Drift, drift};
use super::schedule::{TimerAction, TimerId};
use super::spawn;
use super::state::{BobberState, CatchKind, GamePhase, GameState, SwimmerKind};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held directions
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Catch action, edge-triggered
    pub catch_pressed: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a new match once the current one is over
    pub restart: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
    /// New playfield size, if the host resized
    pub field_size: Option<Vec2>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }
    if state.phase == GamePhase::Paused {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autoplay(state, &mut input);
    }

    if let Some(field) = input.field_size {
        state.resize(field);
    }

    if input.restart && state.is_over() {
        controller::restart(state);
    }

    state.time_ticks += 1;
    state.clock_ms += dt as f64 * 1000.0;

    move_swimmers(state, dt);
    fire_timers(state);
    update_bobber(state, &input, dt);
}

/// Drift every swimmer, retiring the ones that finished a pass
fn move_swimmers(state: &mut GameState, dt: f32) {
    let width = state.field.x;
    let mut exited = Vec::new();
    for swimmer in &mut state.swimmers {
        let moved = drift(
            &mut swimmer.pos.x,
            swimmer.speed,
            swimmer.direction,
            swimmer.stopped,
            dt,
            width,
        );
        if moved == Drift::Wrapped {
            exited.push(swimmer.id);
        }
    }

    // After game over the pond keeps swimming without replacements, so
    // swimmers simply wrap
    if !state.tuning.recycle_on_exit || state.is_over() {
        return;
    }
    for id in exited {
        spawn::recycle(state, id);
    }
}

fn fire_timers(state: &mut GameState) {
    for (timer, action) in state.scheduler.take_due(state.clock_ms) {
        dispatch(state, timer, action);
    }
}

/// Run one fired timer. Every handler tolerates its target being gone.
fn dispatch(state: &mut GameState, timer: TimerId, action: TimerAction) {
    match action {
        TimerAction::CatchWindowExpired { entity } => {
            bobber::on_window_expired(state, timer, entity);
        }
        TimerAction::Resurface => bobber::on_resurface(state, timer),
        TimerAction::Despawn { entity } => {
            state.remove_swimmer(entity);
        }
        TimerAction::Spawn { kind, count } => {
            for _ in 0..count {
                spawn::spawn(state, kind);
            }
        }
    }
}

fn update_bobber(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.bobber.disabled {
        return;
    }

    if state.bobber.state == BobberState::Surface {
        match bobber::find_bite(state) {
            Some(entity) => bobber::engage(state, entity),
            None => {
                let speed = state.tuning.bobber_speed;
                let field = state.field;
                bobber::steer(&mut state.bobber, input, dt, speed, field);
            }
        }
    }

    // A press in the same tick as the dip counts
    if state.bobber.state == BobberState::Submerged && input.catch_pressed {
        bobber::press_catch(state);
    }
}

/// Demo AI: chase the nearest shadow fish, strike on fish, let trash sink
fn autoplay(state: &GameState, input: &mut TickInput) {
    if state.is_over() {
        input.restart = true;
        return;
    }

    if state.bobber.is_underwater() {
        let on_fish = state
            .bobber
            .engaged
            .and_then(|id| state.swimmer(id))
            .is_some_and(|s| s.is_shadow && s.kind.kind() == SwimmerKind::Fish);
        // Wait a few frames so the dip is visible before striking
        input.catch_pressed = on_fish && state.time_ticks % 12 == 0;
        return;
    }

    let hook = state.bobber.rect().center();
    let target = state
        .swimmers
        .iter()
        .filter(|s| s.is_shadow && matches!(s.kind, CatchKind::Fish { .. }))
        .filter(|s| s.pos.x >= 0.0 && s.pos.x <= state.field.x)
        .min_by(|a, b| {
            let da = a.rect().center().distance_squared(hook);
            let db = b.rect().center().distance_squared(hook);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(fish) = target else {
        return;
    };
    let delta = fish.rect().center() - hook;
    // Dead zone keeps the bobber from jittering around the target
    const DEAD_ZONE: f32 = 3.0;
    input.left = delta.x < -DEAD_ZONE;
    input.right = delta.x > DEAD_ZONE;
    input.up = delta.y < -DEAD_ZONE;
    input.down = delta.y > DEAD_ZONE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{Feedback, GameEvent, Species};
    use crate::tuning::Tuning;

    fn striped() -> CatchKind {
        CatchKind::Fish {
            species: Species::Striped,
            points: 10,
        }
    }

    fn run(state: &mut GameState, input: &TickInput, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
            events.extend(state.drain_events());
        }
        events
    }

    #[test]
    fn test_tick_advances_clock_and_moves() {
        let mut state = GameState::without_population(1, Tuning::default());
        let id = state.insert_swimmer(striped(), Vec2::new(100.0, 400.0), 60.0, 1.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 1);
        assert!((state.clock_ms - 1000.0 / 60.0).abs() < 1e-3);
        assert!((state.swimmer(id).unwrap().pos.x - 101.0).abs() < 1e-3);
    }

    #[test]
    fn test_stopped_swimmer_stays_put() {
        let mut state = GameState::without_population(1, Tuning::default());
        let id = state.insert_swimmer(striped(), Vec2::new(700.0, 400.0), 80.0, -1.0);
        state.swimmer_mut(id).unwrap().stopped = true;
        run(&mut state, &TickInput::default(), 30);
        assert_eq!(state.swimmer(id).unwrap().pos.x, 700.0);
    }

    #[test]
    fn test_catch_in_dip_tick() {
        let mut state = GameState::without_population(1, Tuning::default());
        let id = state.insert_swimmer(striped(), Vec2::new(100.0, 100.0), 0.0, 1.0);
        state.bobber.pos = Vec2::new(110.0, 105.0);

        let press = TickInput {
            catch_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &press, SIM_DT);
        assert_eq!(state.score, 10);
        assert!(!state.swimmer(id).unwrap().is_shadow);
        assert!(state.bobber.is_underwater());
        state.drain_events();

        // Revealed catch is removed and the bobber resurfaces
        let events = run(&mut state, &TickInput::default(), 50);
        assert!(!state.is_alive(id));
        assert_eq!(state.bobber.state, BobberState::Surface);
        assert_eq!(state.score, 10);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { kind: SwimmerKind::Fish, .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_window_timeout_replaces_once() {
        let mut state = GameState::without_population(1, Tuning::default());
        let id = state.insert_swimmer(striped(), Vec2::new(100.0, 100.0), 0.0, 1.0);
        state.bobber.pos = Vec2::new(110.0, 105.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.bobber.is_underwater());

        let events = run(&mut state, &TickInput::default(), 70);
        assert!(!state.is_alive(id));
        assert_eq!(state.bobber.state, BobberState::Surface);
        assert!(events.contains(&GameEvent::Feedback(Feedback::TooLate)));
        assert_eq!(state.score, 0);

        let events = run(&mut state, &TickInput::default(), 50);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 1);
        assert_eq!(state.count(SwimmerKind::Fish), 1);
    }

    #[test]
    fn test_late_press_is_ignored() {
        let mut state = GameState::without_population(1, Tuning::default());
        state.insert_swimmer(striped(), Vec2::new(100.0, 100.0), 0.0, 1.0);
        state.bobber.pos = Vec2::new(110.0, 105.0);
        run(&mut state, &TickInput::default(), 70);

        let press = TickInput {
            catch_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &press, SIM_DT);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let xs: Vec<_> = state.swimmers.iter().map(|s| s.pos.x).collect();

        run(&mut state, &TickInput::default(), 10);
        assert_eq!(state.time_ticks, 0);
        let still: Vec<_> = state.swimmers.iter().map(|s| s.pos.x).collect();
        assert_eq!(xs, still);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_game_over_stops_spawning() {
        let mut state = GameState::without_population(3, Tuning::default());
        state.lives = 1;
        state.insert_swimmer(CatchKind::Trash { penalty: 10 }, Vec2::new(100.0, 100.0), 0.0, 1.0);
        state.insert_swimmer(striped(), Vec2::new(600.0, 400.0), 120.0, 1.0);
        state.bobber.pos = Vec2::new(110.0, 105.0);

        let press = TickInput {
            catch_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &press, SIM_DT);
        assert!(state.is_over());
        assert_eq!(state.lives, 0);
        state.drain_events();

        let events = run(&mut state, &TickInput::default(), 600);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
        // Motion carries on behind the game over screen
        assert_eq!(state.count(SwimmerKind::Fish), 1);
        assert_eq!(state.count(SwimmerKind::Trash), 0);
    }

    #[test]
    fn test_wrapped_shadow_is_replaced() {
        let mut state = GameState::without_population(8, Tuning::default());
        let junk = state.insert_swimmer(CatchKind::Trash { penalty: 10 }, Vec2::new(1375.0, 400.0), 600.0, 1.0);
        let fish = state.insert_swimmer(striped(), Vec2::new(600.0, 600.0), 0.0, 1.0);
        state.drain_events();

        tick(&mut state, &TickInput::default(), SIM_DT);
        let events = state.drain_events();
        assert!(!state.is_alive(junk));
        assert!(state.is_alive(fish));
        let despawned: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Despawned { .. }))
            .collect();
        assert_eq!(despawned, vec![&GameEvent::Despawned { entity: junk }]);
        let spawned: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Spawned { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(spawned, vec![SwimmerKind::Trash]);
        assert_eq!(state.count(SwimmerKind::Trash), 1);
        assert_eq!(state.count(SwimmerKind::Fish), 1);
    }

    #[test]
    fn test_wrapped_revealed_is_not_replaced() {
        let mut state = GameState::without_population(8, Tuning::default());
        let junk = state.insert_swimmer(CatchKind::Trash { penalty: 10 }, Vec2::new(1375.0, 400.0), 600.0, 1.0);
        state.reveal(junk);
        state.drain_events();

        tick(&mut state, &TickInput::default(), SIM_DT);
        let events = state.drain_events();
        assert!(!state.is_alive(junk));
        assert!(events.contains(&GameEvent::Despawned { entity: junk }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
        // Its pending removal went with it
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_wrap_without_recycling() {
        let tuning = Tuning {
            recycle_on_exit: false,
            ..Tuning::default()
        };
        let mut state = GameState::without_population(8, tuning);
        let junk = state.insert_swimmer(CatchKind::Trash { penalty: 10 }, Vec2::new(1375.0, 400.0), 600.0, 1.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.swimmer(junk).unwrap().pos.x, -100.0);
    }

    #[test]
    fn test_shrinking_field_frees_bobber() {
        let mut state = GameState::without_population(4, Tuning::default());
        let fish = state.insert_swimmer(striped(), Vec2::new(1195.0, 300.0), 0.0, 1.0);
        state.bobber.pos = Vec2::new(1200.0, 305.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.bobber.engaged, Some(fish));

        // The held fish is now past the wrap bound and gets recycled
        let shrink = TickInput {
            field_size: Some(Vec2::new(800.0, 600.0)),
            ..Default::default()
        };
        tick(&mut state, &shrink, SIM_DT);
        assert!(!state.is_alive(fish));
        assert_eq!(state.bobber.state, BobberState::Surface);
        assert!(!state.bobber.can_catch);
        assert_eq!(state.bobber.engaged, None);
        assert!(state.bobber.pending.is_none());
        assert_eq!(state.count(SwimmerKind::Fish), 1);

        // And it can still dip later on
        let replacement = state.swimmers[0].id;
        let pos = state.bobber.pos;
        let swimmer = state.swimmer_mut(replacement).unwrap();
        swimmer.pos = pos;
        swimmer.speed = 0.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.bobber.engaged, Some(replacement));
        assert!(state.bobber.can_catch);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = GameState::new(5);
        controller::game_over(&mut state);
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 3);
        assert_eq!(state.count(SwimmerKind::Fish), 5);
        assert_eq!(state.count(SwimmerKind::Trash), 2);
    }

    #[test]
    fn test_restart_ignored_mid_match() {
        let mut state = GameState::new(5);
        state.score = 40;
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_resize_clamps_bobber() {
        let mut state = GameState::without_population(1, Tuning::default());
        state.bobber.pos = Vec2::new(1200.0, 650.0);
        let input = TickInput {
            field_size: Some(Vec2::new(800.0, 600.0)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.field, Vec2::new(800.0, 600.0));
        assert_eq!(state.bobber.pos, Vec2::new(770.0, 570.0));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..600 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.swimmers.len(), state2.swimmers.len());
        assert_eq!(state1.bobber.pos, state2.bobber.pos);
        for (a, b) in state1.swimmers.iter().zip(&state2.swimmers) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_idle_mode_lands_fish() {
        let mut state = GameState::new(2024);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let events = run(&mut state, &input, 60 * 90);
        assert!(events.contains(&GameEvent::Feedback(Feedback::Caught)));
    }
}
