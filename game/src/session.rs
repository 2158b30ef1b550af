//! State machine for a single play-through.
//!
//! The session never touches the terminal, the network or a clock directly.
//! The front end feeds it [`Event`]s (carrying the current time where needed)
//! and carries out the [`Effect`]s it returns: starting and cancelling the
//! clock timer, scheduling the mismatch unflip, submitting the final time.

use crate::board::Board;
use chrono::{DateTime, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// How long two mismatched cards stay face-up before flipping back
pub const MISMATCH_DELAY: Duration = Duration::from_secs(1);
/// Interval between clock display updates
pub const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

pub const EMPTY_NAME_ALERT: &str = "Por favor, digite um nome!";

/// Identifies one game within a session. Timers and deferred unflips are
/// tagged with it so that ones left over from an earlier game are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Waiting for a player name
    Setup,
    /// Accepting flips
    Playing,
    /// Two different cards are face-up; input is locked until the unflip fires
    Checking { first: usize, second: usize },
    /// Every pair was found
    Won { seconds: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Start (or restart) a game for the named player
    Start { name: String, now: DateTime<Utc> },
    /// The player picked a card
    Flip { index: usize, now: DateTime<Utc> },
    /// The deferred unflip scheduled after a mismatch fired
    Unflip { game: GameId },
    /// The clock timer ticked
    Tick { timer: GameId, now: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show a blocking message to the player
    Alert(&'static str),
    /// Stop a running clock timer
    CancelTimer(GameId),
    /// Start a clock timer ticking every [`CLOCK_INTERVAL`]
    StartTimer(GameId),
    /// Display the elapsed whole seconds
    ShowClock(u64),
    /// The board changed and should be redrawn
    ShowBoard,
    /// Deliver [`Event::Unflip`] for `game` after `delay`
    ScheduleUnflip { game: GameId, delay: Duration },
    /// Display the final result
    ShowResult { name: String, seconds: f64 },
    /// Send the final time to the ranking server
    SubmitTime { name: String, seconds: f64 },
}

pub struct Session {
    rng: StdRng,
    game: GameId,
    player: String,
    phase: Phase,
    board: Board,
    /// Single face-up card waiting for its partner
    pending: Option<usize>,
    pairs_found: usize,
    started_at: Option<DateTime<Utc>>,
    timer: Option<GameId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Session with a deterministic deal order
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Session {
            rng,
            game: GameId(0),
            player: String::new(),
            phase: Phase::Setup,
            board: Board::from_symbols(&[]),
            pending: None,
            pairs_found: 0,
            started_at: None,
            timer: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn game(&self) -> GameId {
        self.game
    }

    pub fn pairs_found(&self) -> usize {
        self.pairs_found
    }

    /// Timer that is currently expected to be ticking, if any
    pub fn running_timer(&self) -> Option<GameId> {
        self.timer
    }

    /// Whether flips are currently being rejected
    pub fn is_locked(&self) -> bool {
        matches!(self.phase, Phase::Checking { .. })
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Start { name, now } => self.start(name, now),
            Event::Flip { index, now } => self.flip(index, now),
            Event::Unflip { game } => self.unflip(game),
            Event::Tick { timer, now } => self.tick(timer, now),
        }
    }

    fn start(&mut self, name: String, now: DateTime<Utc>) -> Vec<Effect> {
        let name = name.trim();
        if name.is_empty() {
            return vec![Effect::Alert(EMPTY_NAME_ALERT)];
        }

        let mut effects = Vec::new();
        // The old timer must go before a new one is started or it keeps ticking
        if let Some(old) = self.timer.take() {
            effects.push(Effect::CancelTimer(old));
        }

        self.game = GameId(self.game.0 + 1);
        self.player = name.to_string();
        self.board = Board::deal(&mut self.rng);
        self.phase = Phase::Playing;
        self.pending = None;
        self.pairs_found = 0;
        self.started_at = Some(now);
        self.timer = Some(self.game);
        debug!("Game {:?} started for {}", self.game, self.player);

        effects.push(Effect::ShowBoard);
        effects.push(Effect::ShowClock(0));
        effects.push(Effect::StartTimer(self.game));
        effects
    }

    fn flip(&mut self, index: usize, now: DateTime<Utc>) -> Vec<Effect> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        // Covers re-picking the face-up card as well as matched cards
        if !self.board.card(index).is_some_and(|card| card.is_flippable()) {
            return Vec::new();
        }

        self.board.reveal(index);
        let first = match self.pending.take() {
            Some(first) => first,
            None => {
                self.pending = Some(index);
                return vec![Effect::ShowBoard];
            }
        };

        if !self.board.symbols_match(first, index) {
            self.phase = Phase::Checking {
                first,
                second: index,
            };
            return vec![
                Effect::ShowBoard,
                Effect::ScheduleUnflip {
                    game: self.game,
                    delay: MISMATCH_DELAY,
                },
            ];
        }

        self.board.mark_matched(first);
        self.board.mark_matched(index);
        self.pairs_found += 1;

        let mut effects = vec![Effect::ShowBoard];
        if self.pairs_found == self.board.pair_count() {
            effects.extend(self.finish(now));
        }
        effects
    }

    fn finish(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let seconds = self
            .started_at
            .map(|started| elapsed_seconds(started, now))
            .unwrap_or_default();
        self.phase = Phase::Won { seconds };
        debug!("Game {:?} won in {:.2}s", self.game, seconds);

        let mut effects = Vec::new();
        if let Some(timer) = self.timer.take() {
            effects.push(Effect::CancelTimer(timer));
        }
        effects.push(Effect::ShowResult {
            name: self.player.clone(),
            seconds,
        });
        effects.push(Effect::SubmitTime {
            name: self.player.clone(),
            seconds,
        });
        effects
    }

    fn unflip(&mut self, game: GameId) -> Vec<Effect> {
        if game != self.game {
            return Vec::new();
        }
        let Phase::Checking { first, second } = self.phase else {
            return Vec::new();
        };

        self.board.hide(first);
        self.board.hide(second);
        self.phase = Phase::Playing;
        vec![Effect::ShowBoard]
    }

    fn tick(&mut self, timer: GameId, now: DateTime<Utc>) -> Vec<Effect> {
        if self.timer != Some(timer) {
            return Vec::new();
        }
        match self.started_at {
            Some(started) => {
                let seconds = elapsed_seconds(started, now).floor() as u64;
                vec![Effect::ShowClock(seconds)]
            }
            None => Vec::new(),
        }
    }
}

/// Fractional seconds between two instants, never negative
fn elapsed_seconds(start: DateTime<Utc>, stop: DateTime<Utc>) -> f64 {
    let millis = (stop - start).num_milliseconds().max(0);
    millis as f64 / 1000.0
}
