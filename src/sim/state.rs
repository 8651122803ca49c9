//! Game state and core simulation types
//!
//! Everything the simulation touches lives in `GameState`; there is no
//! ambient global. Collaborators read the state and drain `events`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::schedule::{Scheduler, TimerAction, TimerId};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Match lost, waiting for restart
    GameOver,
}

/// Stable id of a swimmer, allocated in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Fish species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Striped,
    Spotted,
    /// Rare, fast, valuable
    Golden,
}

/// Coarse swimmer kind, used for like-for-like replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwimmerKind {
    Fish,
    Trash,
}

/// What a swimmer turns out to be, with its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchKind {
    Fish { species: Species, points: i64 },
    Trash { penalty: i64 },
}

/// Effect of landing a swimmer on the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchEffect {
    pub score_delta: i64,
    /// Counts toward the loss rule
    pub is_trash: bool,
    pub feedback: Feedback,
    pub sound: SoundEffect,
}

impl CatchKind {
    pub fn kind(&self) -> SwimmerKind {
        match self {
            CatchKind::Fish { .. } => SwimmerKind::Fish,
            CatchKind::Trash { .. } => SwimmerKind::Trash,
        }
    }

    /// Sprite family the renderer should use
    pub fn sprite(&self) -> Sprite {
        match *self {
            CatchKind::Fish { species, .. } => Sprite::Fish(species),
            CatchKind::Trash { .. } => Sprite::Trash,
        }
    }

    /// Score, loss bookkeeping and cues for landing this swimmer
    pub fn on_caught(&self) -> CatchEffect {
        match *self {
            CatchKind::Fish { points, .. } => CatchEffect {
                score_delta: points,
                is_trash: false,
                feedback: Feedback::Caught,
                sound: SoundEffect::Catch,
            },
            CatchKind::Trash { penalty } => CatchEffect {
                score_delta: -penalty,
                is_trash: true,
                feedback: Feedback::TrashCaught,
                sound: SoundEffect::Trash,
            },
        }
    }
}

/// Sprite family, without visual details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Fish(Species),
    Trash,
}

/// Representation the renderer should use for an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Look {
    /// Dark silhouette, identity hidden
    Shadow(Sprite),
    /// The real thing
    Revealed(Sprite),
    /// Bobber dipped under the surface
    Submerged,
    /// Plain representation
    Default,
}

/// Object a look applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Swimmer(EntityId),
    Bobber,
}

/// A fish or piece of trash drifting under the surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swimmer {
    pub id: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Distance units per second
    pub speed: f32,
    /// +1 right, -1 left
    pub direction: f32,
    /// Not yet revealed; only shadows can be caught
    pub is_shadow: bool,
    /// Frozen while the bobber is engaged with it
    pub stopped: bool,
    pub kind: CatchKind,
}

impl Swimmer {
    pub fn new(id: EntityId, kind: CatchKind, pos: Vec2, speed: f32, direction: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(ENTITY_WIDTH, ENTITY_HEIGHT),
            speed,
            direction: direction.signum(),
            is_shadow: true,
            stopped: false,
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Velocity along x; zero while stopped
    pub fn velocity(&self) -> f32 {
        if self.stopped {
            0.0
        } else {
            self.speed * self.direction
        }
    }

    /// Current representation
    pub fn look(&self) -> Look {
        if self.is_shadow {
            Look::Shadow(self.kind.sprite())
        } else {
            Look::Revealed(self.kind.sprite())
        }
    }

    /// One-way shadow → revealed flip. False if already revealed.
    pub fn reveal(&mut self) -> bool {
        if !self.is_shadow {
            return false;
        }
        self.is_shadow = false;
        true
    }
}

/// Bobber states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BobberState {
    /// Floating, steerable
    Surface,
    /// Dipped onto a swimmer, catch window open or settling
    Submerged,
}

/// The player's bobber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bobber {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub state: BobberState,
    /// A catch press will be accepted
    pub can_catch: bool,
    /// Swimmer currently held (non-owning)
    pub engaged: Option<EntityId>,
    /// The single countdown this bobber owns
    pub pending: Option<TimerId>,
    /// Set at game over: no steering, no dipping
    pub disabled: bool,
}

impl Bobber {
    pub fn new(size: f32) -> Self {
        Self {
            pos: Vec2::new(BOBBER_START_X, BOBBER_START_Y),
            size: Vec2::splat(size),
            state: BobberState::Surface,
            can_catch: false,
            engaged: None,
            pending: None,
            disabled: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_underwater(&self) -> bool {
        self.state == BobberState::Submerged
    }
}

/// Short player-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Caught,
    TrashCaught,
    Miss,
    TooLate,
    FishEscaped,
    TrashSank,
    GameOver,
}

impl Feedback {
    pub fn text(&self) -> &'static str {
        match self {
            Feedback::Caught => "Caught!",
            Feedback::TrashCaught => "Trash caught!",
            Feedback::Miss => "Miss!",
            Feedback::TooLate => "Too late!",
            Feedback::FishEscaped => "Fish escaped!",
            Feedback::TrashSank => "Trash sank!",
            Feedback::GameOver => "GAME OVER!",
        }
    }
}

/// Everything the collaborators need to hear about, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { entity: EntityId, kind: SwimmerKind },
    Despawned { entity: EntityId },
    Appearance { target: Target, look: Look },
    Feedback(Feedback),
    Sound(SoundEffect),
    ScoreChanged { score: i64, lives: u8, trash_caught: u32 },
    /// Match lost; restart is now available
    GameOver { score: i64 },
    Restarted,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Playable width/height
    pub field: Vec2,
    /// Simulation clock in milliseconds
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Score (penalties may push it below zero)
    pub score: i64,
    pub lives: u8,
    /// Trash landed this match
    pub trash_caught: u32,
    pub bobber: Bobber,
    /// Active swimmers in creation order
    pub swimmers: Vec<Swimmer>,
    pub scheduler: Scheduler,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new match with default tuning and the initial population
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new match with the initial population
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self::without_population(seed, tuning);
        super::spawn::spawn_initial_population(&mut state);
        log::info!(
            "Match started (seed {}, {:?})",
            seed,
            state.tuning.loss_rule
        );
        state
    }

    /// Empty pond: no swimmers yet
    pub fn without_population(seed: u64, tuning: Tuning) -> Self {
        let bobber = Bobber::new(tuning.bobber_size);
        let lives = tuning.starting_lives();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            clock_ms: 0.0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            lives,
            trash_caught: 0,
            bobber,
            swimmers: Vec::new(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn swimmer(&self, id: EntityId) -> Option<&Swimmer> {
        self.swimmers.iter().find(|s| s.id == id)
    }

    pub fn swimmer_mut(&mut self, id: EntityId) -> Option<&mut Swimmer> {
        self.swimmers.iter_mut().find(|s| s.id == id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.swimmer(id).is_some()
    }

    pub fn count(&self, kind: SwimmerKind) -> usize {
        self.swimmers.iter().filter(|s| s.kind.kind() == kind).count()
    }

    /// Add a swimmer, preserving creation order
    pub fn insert_swimmer(&mut self, kind: CatchKind, pos: Vec2, speed: f32, direction: f32) -> EntityId {
        let id = self.next_entity_id();
        let swimmer = Swimmer::new(id, kind, pos, speed, direction);
        let look = swimmer.look();
        self.swimmers.push(swimmer);
        self.emit(GameEvent::Spawned {
            entity: id,
            kind: kind.kind(),
        });
        self.emit(GameEvent::Appearance {
            target: Target::Swimmer(id),
            look,
        });
        id
    }

    /// Remove a swimmer and any timers acting on it. A bobber holding the
    /// swimmer is let go.
    pub fn remove_swimmer(&mut self, id: EntityId) -> Option<Swimmer> {
        let idx = self.swimmers.iter().position(|s| s.id == id)?;
        let swimmer = self.swimmers.remove(idx);
        self.scheduler.cancel_entity(id);
        self.emit(GameEvent::Despawned { entity: id });
        super::bobber::release(self, id);
        Some(swimmer)
    }

    /// Reveal a swimmer and queue its removal after the reveal delay
    pub fn reveal(&mut self, id: EntityId) -> bool {
        let Some(swimmer) = self.swimmer_mut(id) else {
            return false;
        };
        if !swimmer.reveal() {
            return false;
        }
        let look = swimmer.look();
        self.emit(GameEvent::Appearance {
            target: Target::Swimmer(id),
            look,
        });
        let delay = self.tuning.reveal_delay_ms;
        self.schedule(delay, TimerAction::Despawn { entity: id });
        true
    }

    /// Queue an action relative to the current clock
    pub fn schedule(&mut self, delay_ms: f64, action: TimerAction) -> TimerId {
        self.scheduler.schedule(self.clock_ms, delay_ms, action)
    }

    /// Start the bobber's countdown, cancelling whatever it had pending
    pub fn start_bobber_timer(&mut self, delay_ms: f64, action: TimerAction) -> TimerId {
        self.cancel_bobber_timer();
        let id = self.schedule(delay_ms, action);
        self.bobber.pending = Some(id);
        id
    }

    pub fn cancel_bobber_timer(&mut self) {
        if let Some(id) = self.bobber.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    pub fn score_changed(&mut self) {
        self.emit(GameEvent::ScoreChanged {
            score: self.score,
            lives: self.lives,
            trash_caught: self.trash_caught,
        });
    }

    /// Runtime resize of the playfield; keeps the bobber inside the margins
    pub fn resize(&mut self, field: Vec2) {
        if field == self.field {
            return;
        }
        log::debug!("Field resized to {}x{}", field.x, field.y);
        self.field = field;
        super::bobber::clamp_to_field(&mut self.bobber, field);
    }
}
