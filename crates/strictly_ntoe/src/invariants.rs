//! History invariants.
//!
//! A move history is the only source of truth for a game, so a loaded
//! history must satisfy these before anything is built on it. Histories
//! produced through [`next_move`](super::next_move) always do.

use super::action::Move;
use super::config::GameConfig;
use super::error::InvalidMove;
use std::collections::HashSet;
use tracing::{instrument, warn};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// A history paired with the config it was played under.
#[derive(Debug, Clone, Copy)]
pub struct HistoryView<'a> {
    /// Game configuration.
    pub config: &'a GameConfig,
    /// Recorded moves, oldest first.
    pub history: &'a [Move],
}

/// No cell is marked twice and every index lies on the board.
pub struct DistinctCells;

impl Invariant<HistoryView<'_>> for DistinctCells {
    fn holds(view: &HistoryView<'_>) -> bool {
        let cells = view.config.cell_count();
        let mut seen = HashSet::with_capacity(view.history.len());
        view.history
            .iter()
            .all(|m| m.board_index() < cells && seen.insert(m.board_index()))
    }

    fn description() -> &'static str {
        "Every move targets a distinct cell on the board"
    }
}

/// Turn numbers run 1, 2, 3, ... in history order.
pub struct ContiguousTurns;

impl Invariant<HistoryView<'_>> for ContiguousTurns {
    fn holds(view: &HistoryView<'_>) -> bool {
        view.history
            .iter()
            .enumerate()
            .all(|(k, m)| usize::try_from(m.turn()).is_ok_and(|t| t == k + 1))
    }

    fn description() -> &'static str {
        "Turn numbers are contiguous from 1"
    }
}

/// Players alternate starting from the configured first player.
pub struct AlternatingTurns;

impl Invariant<HistoryView<'_>> for AlternatingTurns {
    fn holds(view: &HistoryView<'_>) -> bool {
        view.history
            .iter()
            .enumerate()
            .all(|(k, m)| m.player() == view.config.expected_player(k))
    }

    fn description() -> &'static str {
        "Players alternate from the first player"
    }
}

/// All history invariants as a composable set.
pub type HistoryInvariants = (DistinctCells, ContiguousTurns, AlternatingTurns);

/// Checks a loaded history against every invariant.
///
/// # Errors
///
/// Returns [`InvalidMove`] naming each violated invariant.
#[instrument(skip(history), fields(moves = history.len()))]
pub fn check_history(config: &GameConfig, history: &[Move]) -> Result<(), InvalidMove> {
    HistoryInvariants::check_all(&HistoryView { config, history }).map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(%descriptions, "History invariants violated");
        InvalidMove::new(format!("History invariants violated: {}", descriptions))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn cfg() -> GameConfig {
        GameConfig::new(3, Player::X).unwrap()
    }

    #[test]
    fn test_empty_history_holds() {
        assert!(check_history(&cfg(), &[]).is_ok());
    }

    #[test]
    fn test_valid_history_holds() {
        let history = [
            Move::new(1, Player::X, 0),
            Move::new(2, Player::O, 4),
            Move::new(3, Player::X, 8),
        ];
        assert!(check_history(&cfg(), &history).is_ok());
    }

    #[test]
    fn test_duplicate_cell_detected() {
        let config = cfg();
        let history = [Move::new(1, Player::X, 4), Move::new(2, Player::O, 4)];
        let view = HistoryView {
            config: &config,
            history: &history,
        };
        assert!(!DistinctCells::holds(&view));
        assert!(ContiguousTurns::holds(&view));
        assert!(AlternatingTurns::holds(&view));
    }

    #[test]
    fn test_collects_every_violation() {
        // Turn gap and the same player twice.
        let history = [Move::new(1, Player::X, 0), Move::new(3, Player::X, 1)];
        let config = cfg();
        let violations = HistoryInvariants::check_all(&HistoryView {
            config: &config,
            history: &history,
        })
        .unwrap_err();
        assert_eq!(violations.len(), 2);

        let err = check_history(&config, &history).unwrap_err();
        assert!(err.message.contains("contiguous"));
        assert!(err.message.contains("alternate"));
    }

    #[test]
    fn test_o_first_alternation() {
        let config = GameConfig::new(3, Player::O).unwrap();
        let history = [Move::new(1, Player::O, 0), Move::new(2, Player::X, 1)];
        assert!(check_history(&config, &history).is_ok());
        assert!(check_history(&cfg(), &history).is_err());
    }
}
