//! Play command - interactive game on stdin
//!
//! Human colors type `x y piece` (for example `0 -1 ant`), `pass`, `undo`
//! or `quit`. Automated colors answer on their own.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hive_core::{Color, GameResult, GameState, Hex, PieceType, PlayerSetup, RuleSet, Session};

/// Automated actions taken between two prompts at most
const MAX_AUTOMATED_ACTIONS: usize = 1000;

#[derive(Args)]
pub struct PlayArgs {
    /// Ruleset JSON file (standard game if omitted)
    #[arg(long, value_name = "FILE")]
    pub ruleset: Option<PathBuf>,

    /// Let the engine play Black at this search depth
    #[arg(long)]
    pub black_depth: Option<u32>,

    /// Let the engine play White at this search depth
    #[arg(long)]
    pub white_depth: Option<u32>,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Place(Hex, PieceType),
    Pass,
    Undo,
    Quit,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let ruleset = build_ruleset(&args)?;
    tracing::info!("Starting game with ruleset {}", ruleset.name);

    let session = Session::from_ruleset(&ruleset);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = play_loop(session, stdin.lock(), stdout.lock())?;

    println!("Result: {:?}", result);
    Ok(())
}

fn build_ruleset(args: &PlayArgs) -> Result<RuleSet> {
    let mut ruleset = match &args.ruleset {
        Some(path) => RuleSet::load(path)
            .with_context(|| format!("Failed to load ruleset: {}", path.display()))?,
        None => RuleSet::default(),
    };
    if let Some(depth) = args.black_depth {
        ruleset.black = PlayerSetup::automated(Some(depth));
    }
    if let Some(depth) = args.white_depth {
        ruleset.white = PlayerSetup::automated(Some(depth));
    }
    Ok(ruleset)
}

/// Alternate between automated play and reading human commands until the
/// game ends or input runs out
fn play_loop<R: BufRead, W: Write>(mut session: Session, input: R, mut out: W) -> Result<GameResult> {
    let mut lines = input.lines();

    loop {
        session.play_automated(MAX_AUTOMATED_ACTIONS);
        let state = session.current();
        writeln!(out, "{}", render_board(state))?;
        if state.is_over() {
            return Ok(state.result());
        }

        write!(out, "{} (turn {})> ", state.current_player(), state.turn())?;
        out.flush()?;

        let Some(line) = lines.next() else {
            return Ok(session.current().result());
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => return Ok(session.current().result()),
            Ok(Command::Undo) => {
                if !session.undo() {
                    writeln!(out, "nothing to undo")?;
                }
            }
            Ok(Command::Pass) => {
                if let Err(e) = session.pass() {
                    writeln!(out, "rejected: {}", e)?;
                }
            }
            Ok(Command::Place(hex, piece_type)) => {
                if let Err(e) = session.attempt_move(hex, piece_type) {
                    writeln!(out, "rejected: {}", e)?;
                }
            }
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
}

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["pass"] => Ok(Command::Pass),
        ["undo"] => Ok(Command::Undo),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        [x, y, piece] => {
            let x = x.parse::<i32>().with_context(|| format!("bad x coordinate: {}", x))?;
            let y = y.parse::<i32>().with_context(|| format!("bad y coordinate: {}", y))?;
            let piece_type = piece.parse::<PieceType>()?;
            Ok(Command::Place(Hex::new(x, y), piece_type))
        }
        _ => anyhow::bail!("expected `x y piece`, `pass`, `undo` or `quit`"),
    }
}

/// Text view of the known cells. Rows are shifted half a cell per row so
/// axial neighbors line up. Black pieces are upper case, White lower case,
/// empty known cells are `.`.
fn render_board(state: &GameState) -> String {
    let board = state.board();
    let Some((lo, hi)) = board.bounds() else {
        return String::new();
    };

    let mut text = String::new();
    for y in lo.y..=hi.y {
        text.push_str(&format!("{:>4} ", y));
        text.push_str(&" ".repeat((y - lo.y) as usize));
        for x in lo.x..=hi.x {
            let glyph = match board.top_piece(Hex::new(x, y)) {
                None => ' ',
                Some(piece) => match piece.owner {
                    Some(Color::Black) => piece.piece_type.letter(),
                    Some(Color::White) => piece.piece_type.letter().to_ascii_lowercase(),
                    None => '.',
                },
            };
            text.push(glyph);
            text.push(' ');
        }
        text.push('\n');
    }

    let score = state.score();
    text.push_str(&format!("score: black {} white {}", score.black, score.white));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str) -> (GameResult, Session, String) {
        let mut out = Vec::new();
        let session = Session::new(GameState::standard());
        // Loop consumes the session; replay the script to inspect final state
        let result = play_loop(session, Cursor::new(script.to_string()), &mut out).unwrap();
        let mut replay = Session::new(GameState::standard());
        for line in script.lines() {
            match parse_command(line) {
                Ok(Command::Place(hex, pt)) => {
                    let _ = replay.attempt_move(hex, pt);
                }
                Ok(Command::Undo) => {
                    replay.undo();
                }
                Ok(Command::Pass) => {
                    let _ = replay.pass();
                }
                Ok(Command::Quit) => break,
                Err(_) => {}
            }
        }
        (result, replay, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("0 -1 ant").unwrap(),
            Command::Place(Hex::new(0, -1), PieceType::Ant)
        );
        assert_eq!(
            parse_command("  2 3 Q ").unwrap(),
            Command::Place(Hex::new(2, 3), PieceType::Queen)
        );
        assert_eq!(parse_command("pass").unwrap(), Command::Pass);
        assert_eq!(parse_command("undo").unwrap(), Command::Undo);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert!(parse_command("a b ant").is_err());
        assert!(parse_command("0 0 king").is_err());
        assert!(parse_command("0 0").is_err());
    }

    #[test]
    fn test_render_fresh_board() {
        let text = render_board(&GameState::standard());
        assert!(text.starts_with("   0 ."));
        assert!(text.ends_with("score: black 0 white 0"));
    }

    #[test]
    fn test_render_shows_owner_case() {
        let state = GameState::standard()
            .attempt_move(Hex::ORIGIN, PieceType::Queen)
            .unwrap()
            .attempt_move(Hex::new(1, 0), PieceType::Ant)
            .unwrap();
        let text = render_board(&state);
        assert!(text.contains("Q a"));
        assert!(text.contains("score: black 1 white 0"));
    }

    #[test]
    fn test_loop_reports_rejections() {
        let (result, replay, output) = run_script("0 0 queen\n0 0 ant\nfoo\n");
        assert_eq!(result, GameResult::Ongoing);
        assert!(output.contains("rejected: target cell is already occupied"));
        assert!(output.contains("expected `x y piece`"));
        assert_eq!(replay.current().occupied_coordinates(), vec![Hex::ORIGIN]);
    }

    #[test]
    fn test_loop_undo_and_quit() {
        let (result, replay, output) = run_script("undo\n0 0 queen\nundo\nquit\n0 0 ant\n");
        assert_eq!(result, GameResult::Ongoing);
        assert!(output.contains("nothing to undo"));
        assert!(replay.current().occupied_coordinates().is_empty());
    }

    #[test]
    fn test_build_ruleset_applies_depths() {
        let args = PlayArgs {
            ruleset: None,
            black_depth: None,
            white_depth: Some(2),
        };
        let ruleset = build_ruleset(&args).unwrap();
        assert!(!ruleset.black.automated);
        assert_eq!(ruleset.white, PlayerSetup::automated(Some(2)));
    }
}
