//! In-memory game registry.
//!
//! The registry is the caller the rules expect: it owns each game's move
//! history, validates candidate moves against a snapshot, and appends them
//! with a conditional update so two racing submissions can never both land
//! on the same history.

use super::config::RegistryConfig;
use super::error::SessionError;
use super::record::{GameId, GameRecord, GameSummary, RecordedMove, ReplayFrame};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_ntoe::{
    Board, ConfigError, GameConfig, GameOutcome, InvalidMove, MIN_SIZE, Move, MoveError,
    MoveRequest, PickIndex, Player, check_history, evaluate, next_move, select_move_with_tier,
    validate,
};
use tracing::{debug, info, instrument, warn};

/// Shared handle to every game in play.
///
/// Cloning the handle shares the underlying games.
#[derive(Debug, Clone)]
pub struct GameRegistry {
    config: RegistryConfig,
    games: Arc<Mutex<HashMap<GameId, GameRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl GameRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new(config: RegistryConfig) -> Self {
        info!("Creating game registry");
        Self {
            config,
            games: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn games(&self) -> MutexGuard<'_, HashMap<GameId, GameRecord>> {
        // Every mutation is a single push or field write, so a poisoned map
        // still holds consistent records.
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a game with an empty history.
    ///
    /// The size is clamped into `[3, max_size]`; missing values take the
    /// configured defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if the clamped config is rejected.
    #[instrument(skip(self))]
    pub fn create_game(
        &self,
        size: Option<usize>,
        first_player: Option<Player>,
    ) -> Result<GameId, SessionError> {
        let size = self.config.clamp_size(size);
        let first = first_player.unwrap_or(*self.config.default_first_player());
        let config = GameConfig::new(size, first)?;

        let id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.games().insert(id, GameRecord::new(id, config));
        info!(game_id = %id, size, first_player = %first, "Created game");
        Ok(id)
    }

    /// Inserts a record loaded from elsewhere after checking it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if the board size is outside
    /// `[3, max_size]`, [`SessionError::Corrupted`] if the history breaks an
    /// invariant or disagrees with the stored result, and
    /// [`SessionError::AlreadyExists`] if the id is taken.
    #[instrument(skip(self, record), fields(game_id = %record.id()))]
    pub fn restore(&self, record: GameRecord) -> Result<GameId, SessionError> {
        let size = record.config().size();
        let max_size = *self.config.max_size();
        if !(MIN_SIZE..=max_size).contains(&size) {
            warn!(size, max_size, "Restored game has unsupported size");
            return Err(ConfigError::new(format!(
                "Board size {} is outside [{}, {}]",
                size, MIN_SIZE, max_size
            ))
            .into());
        }
        check_history(record.config(), &record.history())?;

        let computed = record.outcome()?.result();
        let consistent = match record.result() {
            Some(stored) => computed == Some(*stored) && *record.winner() == stored.winner(),
            None => record.winner().is_none(),
        };
        if !consistent {
            warn!(stored = ?record.result(), ?computed, "Stored result disagrees with history");
            return Err(InvalidMove::new(format!(
                "Stored result {:?} does not match history outcome {:?}",
                record.result(),
                computed
            ))
            .into());
        }

        let id = *record.id();
        match self.games().entry(id) {
            Entry::Occupied(_) => {
                warn!("Restore refused, id in use");
                Err(SessionError::AlreadyExists(id))
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                self.next_id.fetch_max(id.0 + 1, Ordering::Relaxed);
                info!("Restored game");
                Ok(id)
            }
        }
    }

    /// Returns a snapshot of a game.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown ids.
    #[instrument(skip(self))]
    pub fn game(&self, id: GameId) -> Result<GameRecord, SessionError> {
        self.games().get(&id).cloned().ok_or_else(|| {
            debug!(game_id = %id, "Game not found");
            SessionError::NotFound(id)
        })
    }

    /// Validates and records a submitted move.
    ///
    /// Validation runs against a snapshot without holding the lock; the
    /// append is then conditioned on the history being unchanged. A move
    /// that ends the game records the result in the same update.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Rejected`] for illegal moves and
    /// [`SessionError::StaleHistory`] if another move landed first.
    #[instrument(skip(self))]
    pub fn submit_move(
        &self,
        id: GameId,
        request: MoveRequest,
    ) -> Result<RecordedMove, SessionError> {
        let snapshot = self.game(id)?;
        if snapshot.result().is_some() {
            warn!(game_id = %id, "Move submitted to finished game");
            return Err(MoveError::GameAlreadyFinished.into());
        }
        let history = snapshot.history();
        let mv = next_move(&history, snapshot.config(), &request)?;
        self.append_if(id, history.len(), mv)
    }

    /// Appends `mv` only if the game still has `expected_len` moves and no result.
    ///
    /// The move is validated again against the stored history while the lock
    /// is held, and the outcome is computed before anything is written, so
    /// a refused append leaves the game unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StaleHistory`] or
    /// [`SessionError::AlreadyFinished`] when the condition fails,
    /// [`SessionError::Corrupted`] if the move's turn does not follow
    /// `expected_len`, and [`SessionError::Rejected`] for illegal moves.
    #[instrument(skip(self))]
    pub fn append_if(
        &self,
        id: GameId,
        expected_len: usize,
        mv: Move,
    ) -> Result<RecordedMove, SessionError> {
        let mut games = self.games();
        let record = games.get_mut(&id).ok_or(SessionError::NotFound(id))?;

        if record.result().is_some() {
            warn!(game_id = %id, "Append to finished game refused");
            return Err(SessionError::AlreadyFinished(id));
        }
        let actual = record.moves().len();
        if actual != expected_len {
            warn!(game_id = %id, expected_len, actual, "Stale append refused");
            return Err(SessionError::StaleHistory {
                expected: expected_len,
                actual,
            });
        }
        if usize::try_from(mv.turn()).ok() != Some(expected_len + 1) {
            return Err(InvalidMove::new(format!(
                "Move turn {} does not follow {} recorded moves",
                mv.turn(),
                expected_len
            ))
            .into());
        }

        let history = record.history();
        validate(
            &history,
            record.config(),
            &MoveRequest::new(mv.player(), mv.board_index()),
        )?;
        let board = Board::project(record.config().size(), &history)?
            .with_mark(mv.board_index(), mv.player());
        let outcome = evaluate(&board);

        let recorded = RecordedMove::now(mv);
        record.push(recorded);
        info!(game_id = %id, %mv, "Move appended");

        if let Some(result) = outcome.result() {
            record.finish(result);
            info!(game_id = %id, ?result, "Game finished");
        }
        Ok(recorded)
    }

    /// Records the result of a finished game, recomputed from its history.
    ///
    /// Finishing an already finished game returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFinished`] while the game is in progress.
    #[instrument(skip(self))]
    pub fn finish_game(&self, id: GameId) -> Result<GameOutcome, SessionError> {
        let mut games = self.games();
        let record = games.get_mut(&id).ok_or(SessionError::NotFound(id))?;

        if let Some(result) = record.result() {
            debug!(game_id = %id, "Game already finished");
            return Ok(GameOutcome::from(*result));
        }
        let outcome = record.outcome()?;
        match outcome.result() {
            Some(result) => {
                record.finish(result);
                info!(game_id = %id, %outcome, "Game finished");
                Ok(outcome)
            }
            None => {
                warn!(game_id = %id, "Finish requested for game in progress");
                Err(SessionError::NotFinished(id))
            }
        }
    }

    /// Plays the bot's move when it is the bot's turn.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Rejected`] on a finished game,
    /// [`SessionError::NotBotsTurn`] out of turn, and the errors of
    /// [`GameRegistry::append_if`].
    #[instrument(skip(self, picker))]
    pub fn play_bot_turn(
        &self,
        id: GameId,
        bot: Player,
        picker: &mut impl PickIndex,
    ) -> Result<RecordedMove, SessionError> {
        let snapshot = self.game(id)?;
        let history = snapshot.history();
        let board = Board::project(snapshot.config().size(), &history)?;
        if snapshot.result().is_some() || evaluate(&board).is_terminal() {
            return Err(MoveError::GameAlreadyFinished.into());
        }

        let expected = snapshot.config().expected_player(history.len());
        if bot != expected {
            return Err(SessionError::NotBotsTurn { bot, expected });
        }

        let choice = select_move_with_tier(&board, bot, bot.opponent(), picker)
            .ok_or(SessionError::NoMoveAvailable(id))?;
        debug!(game_id = %id, index = choice.index, tier = %choice.tier, "Bot move selected");

        let mv = next_move(
            &history,
            snapshot.config(),
            &MoveRequest::new(bot, choice.index),
        )?;
        self.append_if(id, history.len(), mv)
    }

    /// Games with at least one move, newest first, up to `recent_limit`.
    #[instrument(skip(self))]
    pub fn recent_games(&self) -> Vec<GameSummary> {
        let mut summaries: Vec<_> = self
            .games()
            .values()
            .filter(|r| !r.moves().is_empty())
            .map(GameRecord::summary)
            .collect();
        summaries.sort_by(|a, b| {
            b.created_at()
                .cmp(a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        summaries.truncate(*self.config.recent_limit());
        debug!(count = summaries.len(), "Listed recent games");
        summaries
    }

    /// Board after the first `step` moves, for scrubbing through a game.
    ///
    /// Steps past the end show the final board.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] or [`SessionError::Corrupted`].
    #[instrument(skip(self))]
    pub fn replay(&self, id: GameId, step: usize) -> Result<ReplayFrame, SessionError> {
        let record = self.game(id)?;
        let history = record.history();
        let step = step.min(history.len());
        let board = Board::project_prefix(record.config().size(), &history, step)?;
        Ok(ReplayFrame::new(step, board, Board::last_index(&history, step)))
    }
}
