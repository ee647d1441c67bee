//! Line-based terminal game.
//!
//! The user types `row col` (zero-based), `n` for a new game or `q` to quit.

use noughts_core::{Board, Engine, GameOutcome, Move};
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument};

const HELP: &str = "Enter a move as `row col` (0-2), `n` for a new game, `q` to quit.";

enum Input {
    Quit,
    NewGame,
    Play(Move),
    Invalid,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "q" | "Q" => return Input::Quit,
        "n" | "N" => return Input::NewGame,
        _ => {}
    }
    let coords: Vec<usize> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map_while(|s| s.parse().ok())
        .collect();
    match coords.as_slice() {
        [row, col] => Input::Play(Move::new(*row, *col)),
        _ => Input::Invalid,
    }
}

fn announce(outcome: GameOutcome) -> &'static str {
    match outcome {
        GameOutcome::PlayerWin => "You win!",
        GameOutcome::OpponentWin => "The computer wins.",
        GameOutcome::Draw => "It's a draw.",
        GameOutcome::InProgress => "",
    }
}

/// Runs games between the user on `input` and `engine`, writing boards and
/// messages to `output`. Stops on `q` or end of input.
///
/// Returns the outcome of every finished game.
///
/// # Errors
///
/// Returns an I/O error if reading or writing fails.
#[instrument(skip_all, fields(strategy = engine.strategy().name()))]
pub fn run_terminal<R, W>(
    engine: &Engine,
    input: R,
    mut output: W,
) -> std::io::Result<Vec<GameOutcome>>
where
    R: BufRead,
    W: Write,
{
    let mut finished = Vec::new();
    let mut board = Board::empty();
    writeln!(output, "{HELP}")?;
    writeln!(output, "{board}")?;

    for line in input.lines() {
        match parse_input(&line?) {
            Input::Quit => break,
            Input::NewGame => {
                info!("New terminal game");
                board = Board::empty();
                writeln!(output, "{board}")?;
            }
            Input::Invalid => writeln!(output, "{HELP}")?,
            Input::Play(mv) => match engine.play_turn(&board, mv) {
                Ok(turn) => {
                    if let Some(last) = turn.last_board() {
                        board = *last;
                    }
                    debug!(board = %board.notation(), "Turn played");
                    writeln!(output, "{board}")?;
                    if turn.outcome.is_terminal() {
                        finished.push(turn.outcome);
                        writeln!(output, "{} Press n for a new game or q to quit.", announce(turn.outcome))?;
                    }
                }
                Err(e) => writeln!(output, "Illegal move: {e}")?,
            },
        }
        output.flush()?;
    }

    info!(games = finished.len(), "Terminal session ended");
    Ok(finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_core::{HistoryShape, StrategyMode};
    use std::io::Cursor;

    fn engine() -> Engine {
        Engine::new(StrategyMode::Optimal.build(None), HistoryShape::PerPly)
    }

    fn run(script: &str) -> (Vec<GameOutcome>, String) {
        let mut out = Vec::new();
        let finished = run_terminal(&engine(), Cursor::new(script), &mut out).unwrap();
        (finished, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_input() {
        assert!(matches!(parse_input(" q "), Input::Quit));
        assert!(matches!(parse_input("n"), Input::NewGame));
        assert!(matches!(parse_input("1 2"), Input::Play(Move { row: 1, col: 2 })));
        assert!(matches!(parse_input("2,0"), Input::Play(Move { row: 2, col: 0 })));
        assert!(matches!(parse_input("1"), Input::Invalid));
        assert!(matches!(parse_input("a b"), Input::Invalid));
        assert!(matches!(parse_input("1 2 3"), Input::Invalid));
    }

    #[test]
    fn test_occupied_cell_reported() {
        let (finished, out) = run("1 1\n1 1\nq\n");
        assert!(finished.is_empty());
        assert!(out.contains("Illegal move"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let (_, out) = run("q\n1 1\n");
        assert!(!out.contains('X'));
    }

    #[test]
    fn test_optimal_opponent_wins_careless_game() {
        // O takes the center, then (0,1), then (1,2) forking row 1 and column 1.
        // X blocks (2,1) and O completes the middle row.
        let (finished, out) = run("0 0\n2 2\n0 2\n2 1\nn\n");
        assert_eq!(finished, vec![GameOutcome::OpponentWin]);
        assert!(out.contains("The computer wins."));
    }
}
