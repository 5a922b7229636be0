//! Tests for the game registry: creation, moves, results, bot turns, listing and replay.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::thread;
use strictly_ntoe::{
    Cell, GameConfig, GameOutcome, GameResult, MoveError, MoveRequest, Player, RandomPicker,
    check_history, next_move,
};
use strictly_ntoe_session::{GameRecord, GameRegistry, RegistryConfig, SessionError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn play(registry: &GameRegistry, id: strictly_ntoe_session::GameId, moves: &[(Player, usize)]) {
    for &(player, index) in moves {
        registry
            .submit_move(id, MoveRequest::new(player, index))
            .expect("legal move");
    }
}

#[test]
fn test_create_game_clamps_and_defaults() -> anyhow::Result<()> {
    init_tracing();
    let registry = GameRegistry::default();

    let small = registry.game(registry.create_game(Some(1), None)?)?;
    assert_eq!(small.config().size(), 3);
    assert_eq!(small.config().first_player(), Player::X);

    let big = registry.game(registry.create_game(Some(99), Some(Player::O))?)?;
    assert_eq!(big.config().size(), 50);
    assert_eq!(big.config().first_player(), Player::O);
    assert!(big.moves().is_empty());
    Ok(())
}

#[test]
fn test_submit_move_records_turns() -> anyhow::Result<()> {
    init_tracing();
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;

    let first = registry.submit_move(id, MoveRequest::new(Player::X, 4))?;
    let second = registry.submit_move(id, MoveRequest::new(Player::O, 0))?;
    assert_eq!(first.mv().turn(), 1);
    assert_eq!(second.mv().turn(), 2);
    assert_eq!(second.mv().player(), Player::O);
    assert!(second.created_at() >= first.created_at());
    Ok(())
}

#[test]
fn test_rejected_move_leaves_game_unchanged() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    play(&registry, id, &[(Player::X, 4)]);
    let before = registry.game(id)?;

    let occupied = registry.submit_move(id, MoveRequest::new(Player::O, 4));
    assert_eq!(
        occupied,
        Err(SessionError::Rejected(MoveError::CellOccupied(4)))
    );
    let wrong_turn = registry.submit_move(id, MoveRequest::new(Player::X, 0));
    assert!(matches!(
        wrong_turn,
        Err(SessionError::Rejected(MoveError::WrongTurn { .. }))
    ));
    let out_of_range = registry.submit_move(id, MoveRequest::new(Player::O, 9));
    assert!(matches!(
        out_of_range,
        Err(SessionError::Rejected(MoveError::OutOfRange { .. }))
    ));

    assert_eq!(registry.game(id)?, before);
    Ok(())
}

#[test]
fn test_winning_move_records_result() -> anyhow::Result<()> {
    init_tracing();
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    play(
        &registry,
        id,
        &[(Player::X, 0), (Player::O, 3), (Player::X, 1), (Player::O, 4), (Player::X, 2)],
    );

    let record = registry.game(id)?;
    assert_eq!(*record.result(), Some(GameResult::Winner(Player::X)));
    assert_eq!(*record.winner(), Some(Player::X));
    assert!(record.finished_at().is_some());

    let late = registry.submit_move(id, MoveRequest::new(Player::O, 5));
    assert_eq!(late, Err(SessionError::Rejected(MoveError::GameAlreadyFinished)));
    assert_eq!(registry.finish_game(id)?, GameOutcome::Win(Player::X));
    Ok(())
}

#[test]
fn test_finish_game_requires_terminal_board() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    play(&registry, id, &[(Player::X, 0)]);
    assert_eq!(registry.finish_game(id), Err(SessionError::NotFinished(id)));
    assert!(registry.game(id)?.result().is_none());
    Ok(())
}

#[test]
fn test_draw_is_recorded() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    // X O X / X O O / O X X
    play(
        &registry,
        id,
        &[
            (Player::X, 0),
            (Player::O, 1),
            (Player::X, 2),
            (Player::O, 4),
            (Player::X, 3),
            (Player::O, 5),
            (Player::X, 7),
            (Player::O, 6),
            (Player::X, 8),
        ],
    );
    let record = registry.game(id)?;
    assert_eq!(*record.result(), Some(GameResult::Draw));
    assert_eq!(*record.winner(), None);
    assert_eq!(registry.finish_game(id)?, GameOutcome::Draw);
    Ok(())
}

#[test]
fn test_stale_append_is_refused() -> anyhow::Result<()> {
    init_tracing();
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;

    // Two submitters validate against the same empty snapshot.
    let snapshot = registry.game(id)?;
    let history = snapshot.history();
    let a = next_move(&history, snapshot.config(), &MoveRequest::new(Player::X, 0))?;
    let b = next_move(&history, snapshot.config(), &MoveRequest::new(Player::X, 8))?;

    registry.append_if(id, history.len(), a)?;
    assert_eq!(
        registry.append_if(id, history.len(), b),
        Err(SessionError::StaleHistory {
            expected: 0,
            actual: 1
        })
    );
    assert_eq!(registry.game(id)?.moves().len(), 1);
    Ok(())
}

#[test]
fn test_append_with_mismatched_turn_is_corruption() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    let mv = strictly_ntoe::Move::new(5, Player::X, 0);
    let err = registry.append_if(id, 0, mv).unwrap_err();
    assert!(matches!(err, SessionError::Corrupted(_)));
    assert!(!err.is_recoverable());
    Ok(())
}

#[test]
fn test_illegal_append_leaves_game_unchanged() -> anyhow::Result<()> {
    init_tracing();
    let registry = GameRegistry::default();
    let id = registry.create_game(None, Some(Player::X))?;

    // O cannot open a game X starts.
    let out_of_turn = registry.append_if(id, 0, strictly_ntoe::Move::new(1, Player::O, 0));
    assert!(matches!(
        out_of_turn,
        Err(SessionError::Rejected(MoveError::WrongTurn { .. }))
    ));
    assert!(registry.game(id)?.moves().is_empty());

    play(&registry, id, &[(Player::X, 0)]);
    let before = registry.game(id)?;
    let occupied = registry.append_if(id, 1, strictly_ntoe::Move::new(2, Player::O, 0));
    assert_eq!(
        occupied,
        Err(SessionError::Rejected(MoveError::CellOccupied(0)))
    );
    assert_eq!(registry.game(id)?, before);

    // The game is still playable.
    play(&registry, id, &[(Player::O, 5)]);
    let record = registry.game(id)?;
    assert_eq!(record.moves().len(), 2);
    assert!(check_history(record.config(), &record.history()).is_ok());
    Ok(())
}

#[test]
fn test_concurrent_submissions_append_once() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(Some(5), None)?;

    let handles: Vec<_> = (0..8)
        .map(|index| {
            let registry = registry.clone();
            thread::spawn(move || registry.submit_move(id, MoveRequest::new(Player::X, index)))
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread finished"))
        .collect();

    // Exactly one X lands; every loser is stale or sees O to move.
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(
            err,
            SessionError::StaleHistory { .. }
                | SessionError::Rejected(MoveError::WrongTurn { .. })
        ));
    }
    let record = registry.game(id)?;
    assert_eq!(record.moves().len(), 1);
    assert_eq!(record.moves()[0].mv().turn(), 1);
    Ok(())
}

#[test]
fn test_bot_turn_blocks_and_respects_turn_order() -> anyhow::Result<()> {
    init_tracing();
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    play(&registry, id, &[(Player::X, 0), (Player::O, 4), (Player::X, 1)]);

    let mut picker = RandomPicker::new(ChaCha8Rng::seed_from_u64(1));
    let reply = registry.play_bot_turn(id, Player::O, &mut picker)?;
    assert_eq!(reply.mv().board_index(), 2);
    assert_eq!(reply.mv().player(), Player::O);

    let again = registry.play_bot_turn(id, Player::O, &mut picker);
    assert_eq!(
        again,
        Err(SessionError::NotBotsTurn {
            bot: Player::O,
            expected: Player::X
        })
    );
    Ok(())
}

#[test]
fn test_bot_refuses_finished_game() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    play(
        &registry,
        id,
        &[(Player::X, 0), (Player::O, 3), (Player::X, 1), (Player::O, 4), (Player::X, 2)],
    );
    let result = registry.play_bot_turn(id, Player::O, &mut |_: usize| 0);
    assert_eq!(result, Err(SessionError::Rejected(MoveError::GameAlreadyFinished)));
    Ok(())
}

#[test]
fn test_recent_games_lists_played_games_newest_first() -> anyhow::Result<()> {
    let config = RegistryConfig::from_toml_str("recent_limit = 2")?;
    let registry = GameRegistry::new(config);

    let unplayed = registry.create_game(None, None)?;
    let ids: Vec<_> = (0..3)
        .map(|_| registry.create_game(None, None))
        .collect::<Result<_, _>>()?;
    for &id in &ids {
        play(&registry, id, &[(Player::X, 4)]);
    }

    let recent = registry.recent_games();
    assert_eq!(recent.len(), 2);
    assert_eq!(*recent[0].id(), ids[2]);
    assert_eq!(*recent[1].id(), ids[1]);
    assert!(recent.iter().all(|s| *s.id() != unplayed));
    assert!(recent.iter().all(|s| *s.move_count() == 1));
    Ok(())
}

#[test]
fn test_replay_scrubs_through_history() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    play(&registry, id, &[(Player::X, 4), (Player::O, 0), (Player::X, 8)]);

    let start = registry.replay(id, 0)?;
    assert!(start.board().cells().iter().all(|c| *c == Cell::Empty));
    assert_eq!(*start.last_index(), None);

    let middle = registry.replay(id, 2)?;
    assert_eq!(middle.board().get(0), Some(Cell::Occupied(Player::O)));
    assert!(middle.board().is_empty(8));
    assert_eq!(*middle.last_index(), Some(0));

    let past_end = registry.replay(id, 10)?;
    assert_eq!(*past_end.step(), 3);
    assert_eq!(*past_end.last_index(), Some(8));
    Ok(())
}

#[test]
fn test_restore_checks_history() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, Some(Player::O))?;
    play(&registry, id, &[(Player::O, 4), (Player::X, 0)]);
    let record = registry.game(id)?;

    // Round-trip through the stored document shape into a fresh registry.
    let json = serde_json::to_string(&record)?;
    let fresh = GameRegistry::default();
    let restored = fresh.restore(serde_json::from_str(&json)?)?;
    assert_eq!(fresh.game(restored)?, record);

    // New ids never collide with restored ones.
    let next = fresh.create_game(None, None)?;
    assert!(next > restored);

    // A document with a doubled cell is refused.
    let corrupt = json.replacen("\"index\":0", "\"index\":4", 1);
    let err = fresh
        .restore(serde_json::from_str(&corrupt)?)
        .unwrap_err();
    assert!(matches!(err, SessionError::Corrupted(_)));
    Ok(())
}

#[test]
fn test_restore_enforces_size_bounds() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    let doc = serde_json::to_value(registry.game(id)?)?;
    let fresh = GameRegistry::default();

    let mut oversized = doc.clone();
    oversized["size"] = serde_json::json!(60);
    let record: GameRecord = serde_json::from_value(oversized)?;
    assert!(matches!(
        fresh.restore(record),
        Err(SessionError::InvalidConfig(_))
    ));

    // Sizes the rules reject never make it into a record.
    let mut tiny = doc.clone();
    tiny["size"] = serde_json::json!(1);
    assert!(serde_json::from_value::<GameRecord>(tiny).is_err());

    let mut overflowing = doc;
    overflowing["size"] = serde_json::json!(8_589_934_592u64);
    assert!(serde_json::from_value::<GameRecord>(overflowing).is_err());
    Ok(())
}

#[test]
fn test_restore_checks_stored_result() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, Some(Player::X))?;
    play(
        &registry,
        id,
        &[(Player::X, 0), (Player::O, 3), (Player::X, 1), (Player::O, 4), (Player::X, 2)],
    );
    let doc = serde_json::to_value(registry.game(id)?)?;
    assert_eq!(doc["result"], "X");

    let mut wrong_result = doc.clone();
    wrong_result["result"] = serde_json::json!("O");
    wrong_result["winner"] = serde_json::json!("O");
    let fresh = GameRegistry::default();
    let err = fresh
        .restore(serde_json::from_value(wrong_result)?)
        .unwrap_err();
    assert!(matches!(err, SessionError::Corrupted(_)));

    let mut unfinished = doc.clone();
    unfinished["result"] = serde_json::json!("draw");
    if let Some(fields) = unfinished.as_object_mut() {
        fields.remove("winner");
    }
    assert!(matches!(
        fresh.restore(serde_json::from_value(unfinished)?),
        Err(SessionError::Corrupted(_))
    ));

    let restored = fresh.restore(serde_json::from_value(doc)?)?;
    assert_eq!(fresh.game(restored)?.result(), &Some(GameResult::Winner(Player::X)));
    Ok(())
}

#[test]
fn test_restore_refuses_taken_id() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(None, None)?;
    play(&registry, id, &[(Player::X, 4)]);
    let in_play = registry.game(id)?;

    let other = GameRegistry::default();
    let stale_id = other.create_game(None, None)?;
    assert_eq!(stale_id, id);
    let stale = other.game(stale_id)?;

    assert_eq!(
        registry.restore(stale),
        Err(SessionError::AlreadyExists(id))
    );
    assert_eq!(registry.game(id)?, in_play);
    Ok(())
}

#[test]
fn test_unknown_game() {
    let registry = GameRegistry::default();
    let missing = strictly_ntoe_session::GameId(404);
    assert_eq!(registry.game(missing), Err(SessionError::NotFound(missing)));
    assert_eq!(
        registry.submit_move(missing, MoveRequest::new(Player::X, 0)),
        Err(SessionError::NotFound(missing))
    );
}

#[test]
fn test_game_config_matches_record() -> anyhow::Result<()> {
    let registry = GameRegistry::default();
    let id = registry.create_game(Some(4), Some(Player::O))?;
    assert_eq!(*registry.game(id)?.config(), GameConfig::new(4, Player::O)?);
    Ok(())
}
