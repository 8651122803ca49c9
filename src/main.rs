//! Shadow Fishing entry point
//!
//! Headless demo host: wires the simulation to its collaborators (audio,
//! high score, settings) and lets the idle autoplayer fish for a while.
//!
//! Usage: `shadow-fishing [--seconds N] [--seed N] [--tuning FILE] [--save FILE]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use shadow_fishing::audio::AudioManager;
    use shadow_fishing::consts::*;
    use shadow_fishing::persistence::{JsonFileStore, MemoryStore, Store};
    use shadow_fishing::sim::{GameEvent, GameState, TickInput, tick};
    use shadow_fishing::{HighScore, Settings, Tuning, platform};

    /// Host frame interval; the simulation substeps at SIM_DT underneath
    const FRAME_DT: f32 = 1.0 / 30.0;

    struct Options {
        seconds: f32,
        seed: Option<u64>,
        tuning: Option<PathBuf>,
        save: PathBuf,
    }

    impl Options {
        fn from_args() -> Self {
            let mut options = Self {
                seconds: 120.0,
                seed: None,
                tuning: None,
                save: PathBuf::from("shadow_fishing_save.json"),
            };
            let mut args = std::env::args().skip(1);
            while let Some(arg) = args.next() {
                let value = args.next();
                match (arg.as_str(), value) {
                    ("--seconds", Some(v)) => match v.parse() {
                        Ok(s) => options.seconds = s,
                        Err(_) => log::warn!("Ignoring bad --seconds value {:?}", v),
                    },
                    ("--seed", Some(v)) => match v.parse() {
                        Ok(s) => options.seed = Some(s),
                        Err(_) => log::warn!("Ignoring bad --seed value {:?}", v),
                    },
                    ("--tuning", Some(v)) => options.tuning = Some(PathBuf::from(v)),
                    ("--save", Some(v)) => options.save = PathBuf::from(v),
                    (other, _) => log::warn!("Ignoring unknown argument {:?}", other),
                }
            }
            options
        }
    }

    /// Tallies for the end-of-run summary
    #[derive(Debug, Default)]
    struct Stats {
        catches: u32,
        trash: u32,
        misses: u32,
        escapes: u32,
        games_over: u32,
        final_scores: Vec<i64>,
    }

    /// Host loop state
    struct Game {
        state: GameState,
        input: TickInput,
        accumulator: f32,
        settings: Settings,
        audio: AudioManager,
        store: Box<dyn Store>,
        high_score: HighScore,
        stats: Stats,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings, store: Box<dyn Store>) -> Self {
            let mut audio = AudioManager::default();
            audio.apply_settings(&settings);
            Self {
                state: GameState::with_tuning(seed, tuning),
                input: TickInput {
                    idle_mode: true,
                    ..Default::default()
                },
                accumulator: 0.0,
                settings,
                audio,
                high_score: HighScore::load(&store),
                store,
                stats: Stats::default(),
            }
        }

        /// Advance by one host frame
        fn frame(&mut self, dt: f32) {
            self.accumulator += dt;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.dispatch_events();
            }
            // Drop backlog instead of spiralling
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }
        }

        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Sound(effect) => self.audio.play(effect),
                    GameEvent::ScoreChanged { score, lives, trash_caught } => {
                        log::debug!("Score {} lives {} trash {}", score, lives, trash_caught);
                        if self.high_score.observe(score, &mut self.store) {
                            log::info!("New high score: {}", score);
                        }
                    }
                    GameEvent::Feedback(feedback) => {
                        use shadow_fishing::sim::Feedback;
                        match feedback {
                            Feedback::Caught => self.stats.catches += 1,
                            Feedback::TrashCaught => self.stats.trash += 1,
                            Feedback::Miss => self.stats.misses += 1,
                            Feedback::FishEscaped | Feedback::TrashSank => {
                                self.stats.escapes += 1
                            }
                            Feedback::TooLate | Feedback::GameOver => {}
                        }
                        if self.settings.show_feedback {
                            log::info!("{}", feedback.text());
                        }
                    }
                    GameEvent::GameOver { score } => {
                        self.stats.games_over += 1;
                        self.stats.final_scores.push(score);
                    }
                    GameEvent::Restarted => log::info!("New match"),
                    GameEvent::Spawned { .. }
                    | GameEvent::Despawned { .. }
                    | GameEvent::Appearance { .. } => {}
                }
            }
        }

        fn summary(&self) -> serde_json::Value {
            serde_json::json!({
                "seed": self.state.seed,
                "ticks": self.state.time_ticks,
                "seconds": self.state.clock_ms / 1000.0,
                "rules": self.settings.rules.as_str(),
                "score": self.state.score,
                "lives": self.state.lives,
                "trash_caught": self.state.trash_caught,
                "best": self.high_score.best(),
                "catches": self.stats.catches,
                "trash": self.stats.trash,
                "misses": self.stats.misses,
                "escapes": self.stats.escapes,
                "games_over": self.stats.games_over,
                "final_scores": self.stats.final_scores,
            })
        }
    }

    fn open_store(path: PathBuf) -> Box<dyn Store> {
        match JsonFileStore::open(&path) {
            Ok(store) => {
                log::info!("Saving to {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!(
                    "Save file {} unusable ({}), nothing will persist",
                    path.display(),
                    e
                );
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() {
        platform::init_logging();
        log::info!("Shadow Fishing (headless) starting...");

        let options = Options::from_args();
        let store = open_store(options.save);
        let settings = Settings::load(&store);
        let tuning = match options.tuning {
            Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
                log::warn!("Tuning {} unusable ({}), using preset", path.display(), e);
                settings.rules.tuning()
            }),
            None => settings.rules.tuning(),
        };
        let seed = options.seed.unwrap_or_else(platform::clock_seed);

        let mut game = Game::new(seed, tuning, settings, store);
        let frames = (options.seconds / FRAME_DT).ceil() as u64;
        for _ in 0..frames {
            game.frame(FRAME_DT);
        }

        let summary = game.summary();
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to render summary: {}", e),
        }
        log::info!("Done after {} ticks", game.state.time_ticks);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `sim::tick` from their own frame callback
}
