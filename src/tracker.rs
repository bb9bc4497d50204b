//! Session tracker
//!
//! Owns the one live `Session` together with its elapsed-time clock, the
//! shuffle RNG and the storage/feedback collaborators. Every operation the
//! presentation layer calls goes through here, runs to completion, and
//! leaves the session ready to re-render.
//!
//! The clock runs exactly while the session is `Playing`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{FeedbackSink, SoundEffect};
use crate::difficulty::Difficulty;
use crate::persistence::{self, LoadError, SaveError, SlotStorage};
use crate::sim::{self, ElapsedClock, GamePhase, LevelSummary, MoveOutcome, Session};

/// What happened to the save slot after a mutation
#[derive(Debug)]
pub enum SaveStatus {
    /// Nothing changed, nothing written
    NotNeeded,
    Saved,
    /// Write failed; play continues in memory
    Failed(SaveError),
}

impl SaveStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, SaveStatus::Failed(_))
    }
}

/// Result of a tracker operation plus its persistence outcome
#[derive(Debug)]
#[must_use]
pub struct Applied<T> {
    pub outcome: T,
    pub save: SaveStatus,
}

impl<T> Applied<T> {
    fn unsaved(outcome: T) -> Self {
        Self {
            outcome,
            save: SaveStatus::NotNeeded,
        }
    }
}

pub struct SessionTracker<S: SlotStorage, F: FeedbackSink> {
    session: Session,
    clock: ElapsedClock,
    rng: Pcg32,
    storage: S,
    feedback: F,
}

impl<S: SlotStorage, F: FeedbackSink> SessionTracker<S, F> {
    /// Start on the idle demo board
    pub fn new(storage: S, feedback: F, seed: u64) -> Self {
        Self {
            session: Session::demo(),
            clock: ElapsedClock::new(),
            rng: Pcg32::seed_from_u64(seed),
            storage,
            feedback,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn clock(&self) -> &ElapsedClock {
        &self.clock
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Overlay stats, only while the level-complete overlay is up
    pub fn level_summary(&self) -> Option<LevelSummary> {
        (self.session.phase == GamePhase::LevelComplete).then(|| self.session.summary())
    }

    /// Startup: restore the save and report whether to offer Continue
    ///
    /// A save with no real progress is kept in storage but the demo board
    /// is shown instead.
    pub fn boot(&mut self) -> bool {
        match self.load() {
            Ok(()) if self.session.has_real_progress() => {
                log::info!(
                    "Found saved game: {}x{} level {}",
                    self.session.grid_size(),
                    self.session.grid_size(),
                    self.session.level
                );
                true
            }
            Ok(()) => {
                log::info!("Saved game has no progress, showing demo board");
                self.session = Session {
                    sounds_enabled: self.session.sounds_enabled,
                    has_save: true,
                    ..Session::demo()
                };
                false
            }
            Err(LoadError::NoSave) => {
                log::info!("No saved game, showing demo board");
                false
            }
            Err(e) => {
                log::warn!("Ignoring saved game: {}", e);
                false
            }
        }
    }

    /// Replace the session with the saved one. On error nothing changes.
    pub fn load(&mut self) -> Result<(), LoadError> {
        let restored = persistence::load_from(&self.storage)?;
        self.session = restored;
        self.clock.stop();
        Ok(())
    }

    /// Write the session to the save slot
    pub fn save(&mut self) -> Result<(), SaveError> {
        persistence::save_to(&mut self.storage, &self.session)
    }

    /// The live session is a restored save worth continuing
    pub fn can_continue(&self) -> bool {
        self.session.has_save && self.session.has_real_progress()
    }

    pub fn has_real_progress(&self) -> bool {
        self.session.has_real_progress()
    }

    /// Discard the current session and start level 1 at `difficulty`
    pub fn new_game(&mut self, difficulty: Difficulty) -> Applied<()> {
        self.session = sim::start_session(difficulty, self.session.sounds_enabled, &mut self.rng);
        self.clock.start();
        log::info!(
            "New {} game ({}x{})",
            difficulty.as_str(),
            difficulty.grid_size(),
            difficulty.grid_size()
        );

        self.cue(SoundEffect::GameStarted);
        Applied {
            outcome: (),
            save: self.persist(),
        }
    }

    /// Resume a restored save. False if there is nothing to resume.
    pub fn continue_from_save(&mut self) -> bool {
        if !self.can_continue() || !sim::resume(&mut self.session) {
            return false;
        }

        match self.session.phase {
            GamePhase::Playing => self.clock.start(),
            _ => self.clock.stop(),
        }
        log::info!("Continuing level {}", self.session.level);

        self.cue(SoundEffect::GameStarted);
        true
    }

    /// Handle a tap on the tile at `index`
    pub fn attempt_move(&mut self, index: usize) -> Applied<MoveOutcome> {
        let outcome = sim::play_move(&mut self.session, index);

        match outcome {
            MoveOutcome::Moved => {
                log::debug!("Moved tile at {} ({} moves)", index, self.session.moves);
                self.cue(SoundEffect::MoveOk);
                Applied {
                    outcome,
                    save: self.persist(),
                }
            }
            MoveOutcome::Solved => {
                self.cue(SoundEffect::MoveOk);
                let save = self.persist();
                self.clock.stop();
                log::info!(
                    "Level {} complete in {} moves, {}s",
                    self.session.level,
                    self.session.moves,
                    self.session.seconds
                );
                self.cue(SoundEffect::LevelWon);
                Applied { outcome, save }
            }
            MoveOutcome::Rejected => {
                self.cue(SoundEffect::MoveRejected);
                Applied::unsaved(outcome)
            }
            MoveOutcome::Inactive => Applied::unsaved(outcome),
        }
    }

    /// New board for the current level; moves and time reset
    pub fn shuffle_current(&mut self) -> Applied<bool> {
        if !sim::reshuffle(&mut self.session, &mut self.rng) {
            return Applied::unsaved(false);
        }
        self.clock.start();
        log::info!("Reshuffled level {}", self.session.level);

        Applied {
            outcome: true,
            save: self.persist(),
        }
    }

    /// Leave the level-complete overlay for the next level
    pub fn advance_level(&mut self) -> Applied<bool> {
        if !sim::advance_level(&mut self.session, &mut self.rng) {
            return Applied::unsaved(false);
        }
        self.clock.start();
        log::info!(
            "Level {} ({} shuffle steps)",
            self.session.level,
            sim::shuffle_steps(self.session.level)
        );

        Applied {
            outcome: true,
            save: self.persist(),
        }
    }

    /// Flip sound on/off, returning the new setting
    pub fn toggle_sound(&mut self) -> bool {
        self.session.sounds_enabled = !self.session.sounds_enabled;
        self.session.sounds_enabled
    }

    /// Feed real time from the host's frame loop; returns seconds added
    pub fn update(&mut self, dt: f64) -> u32 {
        let ticks = self.clock.advance(dt);
        self.session.seconds = self.session.seconds.saturating_add(ticks as u64);
        ticks
    }

    /// One-second timer callback for interval-driven hosts
    pub fn tick_second(&mut self) -> bool {
        if !self.clock.is_running() {
            return false;
        }
        self.session.seconds = self.session.seconds.saturating_add(1);
        true
    }

    fn cue(&mut self, effect: SoundEffect) {
        if self.session.sounds_enabled {
            self.feedback.play(effect);
        }
    }

    /// Best-effort write after a mutation
    fn persist(&mut self) -> SaveStatus {
        match self.save() {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                log::warn!("Failed to save progress: {}", e);
                SaveStatus::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, decode};
    use crate::sim::Board;

    type Tracker = SessionTracker<MemoryStorage, Vec<SoundEffect>>;

    fn tracker_with(storage: MemoryStorage) -> Tracker {
        SessionTracker::new(storage, Vec::new(), 1234)
    }

    /// A legal move that doesn't happen to solve the board
    fn safe_move(tracker: &Tracker) -> usize {
        let board = &tracker.session().board;
        board
            .movable_indices()
            .into_iter()
            .find(|&index| {
                let mut next = board.clone();
                sim::attempt_move(&mut next, index) && !next.is_solved()
            })
            .unwrap()
    }

    /// A playing 3x3 session one move (index 8) from solved
    fn near_solved(tracker: &mut Tracker) {
        let _ = tracker.new_game(Difficulty::Easy);
        tracker.session.board = Board::from_tiles(3, vec![1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
    }

    #[test]
    fn test_starts_idle_on_demo_board() {
        let tracker = tracker_with(MemoryStorage::new());
        assert_eq!(tracker.phase(), GamePhase::Idle);
        assert!(tracker.session().board.is_solved());
        assert!(!tracker.clock().is_running());
        assert!(!tracker.can_continue());
    }

    #[test]
    fn test_new_game_plays_and_saves() {
        let storage = MemoryStorage::new();
        let mut tracker = tracker_with(storage.clone());

        let applied = tracker.new_game(Difficulty::Hard);
        assert!(matches!(applied.save, SaveStatus::Saved));
        assert_eq!(tracker.phase(), GamePhase::Playing);
        assert_eq!(tracker.session().grid_size(), 5);
        assert!(tracker.clock().is_running());
        assert_eq!(tracker.feedback(), &vec![SoundEffect::GameStarted]);

        let saved = decode(&storage.contents().unwrap()).unwrap();
        assert_eq!(saved.board, tracker.session().board);
        assert_eq!(saved.level, 1);
    }

    #[test]
    fn test_valid_move_counts_and_saves() {
        let storage = MemoryStorage::new();
        let mut tracker = tracker_with(storage.clone());
        let _ = tracker.new_game(Difficulty::Medium);

        let index = safe_move(&tracker);
        let applied = tracker.attempt_move(index);
        assert!(applied.outcome.is_move());
        assert!(matches!(applied.save, SaveStatus::Saved));
        assert_eq!(tracker.session().moves, 1);

        let saved = decode(&storage.contents().unwrap()).unwrap();
        assert_eq!(saved.moves, 1);
        assert_eq!(saved.board, tracker.session().board);
    }

    #[test]
    fn test_rejected_move_signals_without_mutation() {
        let storage = MemoryStorage::new();
        let mut tracker = tracker_with(storage.clone());
        let _ = tracker.new_game(Difficulty::Easy);
        let before = tracker.session().clone();
        let saved_before = storage.contents();

        let blank = tracker.session().board.blank_index();
        let applied = tracker.attempt_move(blank);
        assert_eq!(applied.outcome, MoveOutcome::Rejected);
        assert!(matches!(applied.save, SaveStatus::NotNeeded));
        assert_eq!(tracker.session(), &before);
        assert_eq!(storage.contents(), saved_before);
        assert_eq!(tracker.feedback().last(), Some(&SoundEffect::MoveRejected));
    }

    #[test]
    fn test_taps_on_demo_board_are_ignored() {
        let mut tracker = tracker_with(MemoryStorage::new());
        let applied = tracker.attempt_move(14);
        assert_eq!(applied.outcome, MoveOutcome::Inactive);
        assert!(tracker.feedback().is_empty());
        assert_eq!(tracker.session().moves, 0);
    }

    #[test]
    fn test_solving_stops_clock_and_advance_restarts_it() {
        let storage = MemoryStorage::new();
        let mut tracker = tracker_with(storage.clone());
        near_solved(&mut tracker);
        assert_eq!(tracker.update(1.0), 1);

        let applied = tracker.attempt_move(8);
        assert_eq!(applied.outcome, MoveOutcome::Solved);
        assert_eq!(tracker.phase(), GamePhase::LevelComplete);
        assert!(!tracker.clock().is_running());
        assert_eq!(
            tracker.level_summary(),
            Some(LevelSummary {
                level: 1,
                moves: 1,
                seconds: 1
            })
        );
        assert_eq!(
            &tracker.feedback()[1..],
            &[SoundEffect::MoveOk, SoundEffect::LevelWon]
        );

        // No time passes on the overlay
        assert_eq!(tracker.update(5.0), 0);
        assert!(!tracker.tick_second());
        assert_eq!(tracker.session().seconds, 1);

        let applied = tracker.advance_level();
        assert!(applied.outcome);
        assert_eq!(tracker.phase(), GamePhase::Playing);
        assert!(tracker.clock().is_running());
        assert_eq!(tracker.session().level, 2);
        assert_eq!(tracker.session().moves, 0);
        assert_eq!(tracker.session().seconds, 0);
        assert_eq!(tracker.session().grid_size(), 3);

        let saved = decode(&storage.contents().unwrap()).unwrap();
        assert_eq!(saved.level, 2);
    }

    #[test]
    fn test_advance_level_requires_level_complete() {
        let mut tracker = tracker_with(MemoryStorage::new());
        let _ = tracker.new_game(Difficulty::Easy);
        let applied = tracker.advance_level();
        assert!(!applied.outcome);
        assert_eq!(tracker.session().level, 1);
    }

    #[test]
    fn test_shuffle_resets_counters() {
        let mut tracker = tracker_with(MemoryStorage::new());
        assert!(!tracker.shuffle_current().outcome, "no shuffling the demo board");

        let _ = tracker.new_game(Difficulty::Medium);
        let index = safe_move(&tracker);
        let _ = tracker.attempt_move(index);
        tracker.update(1.0);
        tracker.update(1.0);

        let applied = tracker.shuffle_current();
        assert!(applied.outcome);
        assert!(matches!(applied.save, SaveStatus::Saved));
        assert_eq!(tracker.session().moves, 0);
        assert_eq!(tracker.session().seconds, 0);
        assert_eq!(tracker.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_write_failure_keeps_playing() {
        let storage = MemoryStorage::new();
        let mut tracker = tracker_with(storage.clone());
        let _ = tracker.new_game(Difficulty::Easy);
        storage.set_fail_writes(true);

        let index = safe_move(&tracker);
        let applied = tracker.attempt_move(index);
        assert!(applied.outcome.is_move());
        assert!(applied.save.is_failed());
        assert_eq!(tracker.session().moves, 1);
        assert_eq!(tracker.phase(), GamePhase::Playing);
        assert!(tracker.save().is_err());
    }

    #[test]
    fn test_timer_counts_only_while_playing() {
        let mut tracker = tracker_with(MemoryStorage::new());
        assert_eq!(tracker.update(3.0), 0);
        assert!(!tracker.tick_second());

        let _ = tracker.new_game(Difficulty::Easy);
        assert_eq!(tracker.update(0.5), 0);
        assert_eq!(tracker.update(0.5), 1);
        assert!(tracker.tick_second());
        assert_eq!(tracker.session().seconds, 2);
    }

    #[test]
    fn test_long_gap_between_updates_counts_in_full() {
        let mut tracker = tracker_with(MemoryStorage::new());
        let _ = tracker.new_game(Difficulty::Easy);
        assert_eq!(tracker.update(30.0), 30);
        assert_eq!(tracker.session().seconds, 30);
    }

    #[test]
    fn test_sound_toggle_silences_cues() {
        let mut tracker = tracker_with(MemoryStorage::new());
        assert!(!tracker.toggle_sound());
        let _ = tracker.new_game(Difficulty::Easy);
        let blank = tracker.session().board.blank_index();
        let _ = tracker.attempt_move(blank);
        assert!(tracker.feedback().is_empty());
        assert!(!tracker.session().sounds_enabled);
    }

    #[test]
    fn test_boot_and_continue_round_trip() {
        let storage = MemoryStorage::new();
        let (board, level) = {
            let mut first = tracker_with(storage.clone());
            let _ = first.new_game(Difficulty::Medium);
            let index = safe_move(&first);
            let _ = first.attempt_move(index);
            (first.session().board.clone(), first.session().level)
        };

        let mut second = tracker_with(storage);
        assert!(second.boot());
        assert!(second.can_continue());
        assert_eq!(second.phase(), GamePhase::Idle);
        assert_eq!(second.session().board, board);
        assert_eq!(second.session().level, level);
        assert_eq!(second.session().moves, 1);

        assert!(second.continue_from_save());
        assert_eq!(second.phase(), GamePhase::Playing);
        assert!(second.clock().is_running());
        assert!(!second.continue_from_save());
    }

    #[test]
    fn test_boot_without_progress_shows_demo() {
        let raw = r#"{"gridSize":3,"level":1,"moves":0,"seconds":0,"board":[1,2,3,4,5,6,7,0,8],"soundsEnabled":false}"#;
        let storage = MemoryStorage::with_contents(raw);
        let mut tracker = tracker_with(storage.clone());

        assert!(!tracker.boot());
        assert!(!tracker.can_continue());
        assert!(!tracker.continue_from_save());
        assert_eq!(tracker.session().grid_size(), 4);
        assert!(tracker.session().board.is_solved());
        assert!(!tracker.session().sounds_enabled);
        // The save itself is left alone
        assert_eq!(storage.contents().as_deref(), Some(raw));
    }

    #[test]
    fn test_corrupt_save_leaves_session_untouched() {
        let storage = MemoryStorage::new();
        let mut tracker = tracker_with(storage.clone());
        let _ = tracker.new_game(Difficulty::Easy);
        let index = safe_move(&tracker);
        let _ = tracker.attempt_move(index);
        let before = tracker.session().clone();

        for raw in [
            r#"{"gridSize":4,"level":1,"moves":0,"seconds":0,"board":[1,2,3,4,5,6,7,8,0]}"#,
            r#"{"gridSize":7,"level":1,"moves":0,"seconds":0,"board":[]}"#,
            r#"{"gridSize":3,"level":1,"moves":"x","seconds":0,"board":[1,2,3,4,5,6,7,8,0]}"#,
        ] {
            let mut other = storage.clone();
            other.write(raw).unwrap();
            assert!(tracker.load().is_err());
            assert_eq!(tracker.session(), &before);
            assert!(tracker.clock().is_running());
        }
    }

    #[test]
    fn test_boot_with_corrupt_save_falls_back_to_demo() {
        let mut tracker = tracker_with(MemoryStorage::with_contents("{ not json"));
        assert!(!tracker.boot());
        assert!(!tracker.session().has_save);
        assert_eq!(tracker.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_continue_solved_save_lands_on_overlay() {
        let raw = r#"{"gridSize":3,"level":3,"moves":14,"seconds":30,"board":[1,2,3,4,5,6,7,8,0]}"#;
        let mut tracker = tracker_with(MemoryStorage::with_contents(raw));
        assert!(tracker.boot());
        assert!(tracker.continue_from_save());
        assert_eq!(tracker.phase(), GamePhase::LevelComplete);
        assert!(!tracker.clock().is_running());

        let applied = tracker.advance_level();
        assert!(applied.outcome);
        assert_eq!(tracker.session().level, 4);
    }
}
