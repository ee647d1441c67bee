//! Whole-game properties of the engine and its strategies.

use std::collections::HashSet;
use std::sync::Arc;

use noughts_core::{
    Board, Engine, ExclusiveWinner, GameOutcome, HistoryShape, Invariant, Mark, MinimaxStrategy,
    Move, MoveError, RandomStrategy, Strategy, TurnBalance, evaluate,
};

/// Every board reachable from the empty board through legal moves.
fn reachable_boards() -> HashSet<Board> {
    let mut seen = HashSet::new();
    let mut stack = vec![Board::empty()];
    while let Some(board) = stack.pop() {
        if !seen.insert(board) {
            continue;
        }
        for mv in board.legal_moves() {
            stack.push(board.apply(mv).expect("legal move"));
        }
    }
    seen
}

#[test]
fn test_reachable_state_count() {
    // Well-known count of distinct legal positions, empty board included.
    assert_eq!(reachable_boards().len(), 5478);
}

#[test]
fn test_reachable_boards_satisfy_invariants() {
    for board in reachable_boards() {
        assert!(TurnBalance::holds(&board), "{}", board.notation());
        assert!(ExclusiveWinner::holds(&board), "{}", board.notation());
    }
}

#[test]
fn test_evaluation_depends_only_on_grid() {
    for board in reachable_boards() {
        let outcome = evaluate(&board);
        assert_eq!(outcome, evaluate(&board), "evaluation must be idempotent");

        let rebuilt: Board = board.notation().parse().expect("round trip");
        assert_eq!(outcome, evaluate(&rebuilt));
    }
}

/// Plays every possible player line against `engine`, returning the outcomes
/// of all finished games.
fn all_outcomes_against(engine: &Engine) -> Vec<GameOutcome> {
    let mut outcomes = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![Board::empty()];

    while let Some(board) = stack.pop() {
        if !visited.insert(board) {
            continue;
        }
        for mv in board.legal_moves() {
            let turn = engine.play_turn(&board, mv).expect("legal move");
            let last = *turn.last_board().expect("turn has boards");
            if turn.outcome.is_terminal() {
                outcomes.push(turn.outcome);
            } else {
                stack.push(last);
            }
        }
    }
    outcomes
}

#[test]
fn test_optimal_opponent_never_loses() {
    let engine = Engine::new(Arc::new(MinimaxStrategy::new()), HistoryShape::PerPly);
    let outcomes = all_outcomes_against(&engine);

    assert!(!outcomes.is_empty());
    assert!(
        outcomes.iter().all(|o| *o != GameOutcome::PlayerWin),
        "player forced a win against minimax"
    );
    assert!(outcomes.contains(&GameOutcome::OpponentWin));
    assert!(outcomes.contains(&GameOutcome::Draw));
}

/// Outcomes of every line where both sides only ever pick a best-valued move.
fn optimal_lines_from(board: Board, search: &MinimaxStrategy, outcomes: &mut Vec<GameOutcome>) {
    if board.outcome().is_terminal() {
        outcomes.push(board.outcome());
        return;
    }
    let ranked = search.rank_moves(&board);
    let best = ranked.iter().map(|(_, s)| *s).max().expect("moves available");
    for (mv, _) in ranked.into_iter().filter(|(_, s)| *s == best) {
        optimal_lines_from(board.apply(mv).expect("legal move"), search, outcomes);
    }
}

#[test]
fn test_center_opening_with_optimal_play_always_draws() {
    let search = MinimaxStrategy::sequential();
    let start = Board::empty().apply(Move::new(1, 1)).unwrap();

    let mut outcomes = Vec::new();
    optimal_lines_from(start, &search, &mut outcomes);

    assert!(!outcomes.is_empty());
    assert!(outcomes.iter().all(|o| *o == GameOutcome::Draw));
}

#[test]
fn test_corner_opening_reply_keeps_draw() {
    let engine = Engine::new(Arc::new(MinimaxStrategy::new()), HistoryShape::PerPly);
    let turn = engine.play_turn(&Board::empty(), Move::new(0, 0)).unwrap();
    let reply = turn.boards[1];

    // The only non-losing answer to a corner opening is the center.
    assert_eq!(reply.get(Move::new(1, 1)), Some(noughts_core::Cell::Marked(Mark::Opponent)));
    assert_eq!(noughts_core::value(&reply), 0);
}

#[test]
fn test_top_row_completion_is_player_win() {
    // X X . / O O . / . . .
    let board: Board = "XX.OO....".parse().unwrap();
    let board = board.apply(Move::new(0, 2)).unwrap();
    assert_eq!(evaluate(&board), GameOutcome::PlayerWin);
}

#[test]
fn test_full_board_without_line_is_draw() {
    // X O X / X O O / O X X
    let board: Board = "XOXXOOOXX".parse().unwrap();
    assert_eq!(evaluate(&board), GameOutcome::Draw);
}

#[test]
fn test_occupied_cell_rejected_and_board_unchanged() {
    let board = Board::empty().apply(Move::new(1, 1)).unwrap();
    let before = board;
    assert_eq!(
        board.apply(Move::new(1, 1)),
        Err(MoveError::CellOccupied { row: 1, col: 1 })
    );
    assert_eq!(board, before);
}

#[test]
fn test_random_games_terminate_with_balanced_marks() {
    let player = RandomStrategy::seeded(11);
    let engine = Engine::new(Arc::new(RandomStrategy::seeded(12)), HistoryShape::PerPly);

    for _ in 0..200 {
        let mut board = Board::empty();
        let mut plies = 0;
        loop {
            let mv = player.choose_move(&board).unwrap();
            let turn = engine.play_turn(&board, mv).unwrap();
            plies += turn.boards.len();
            board = *turn.last_board().unwrap();
            assert!(TurnBalance::holds(&board));
            if turn.outcome.is_terminal() {
                break;
            }
        }
        assert!(plies <= 9);
        assert_eq!(board.outcome(), evaluate(&board));
    }
}
