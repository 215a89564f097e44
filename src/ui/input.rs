//! Parsing of lines typed at the terminal.

use checkers_engine::Square;
use shared::MoveData;

use crate::core::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// `col,row->col,row`, optionally prefixed with `move`
    Move { from: Square, to: Square },
    Board,
    Moves,
    Help,
    Surrender,
    /// Online only: look for an opponent
    Find,
    /// Online only: stop looking
    Cancel,
    /// Online: leave the current game but stay connected
    Quit,
    /// Leave the program
    Exit,
}

pub const HELP: &str = "\
commands:
  <col>,<row>-><col>,<row>   move a piece, e.g. 0,5->1,4
  board                      show the board
  moves                      list legal moves
  surrender                  give up the local game
  find / cancel              online: search for an opponent / stop searching
  quit                       online: leave the current game
  exit                       leave the program
  help                       show this text";

pub fn parse_command(line: &str) -> ClientResult<UserCommand> {
    let line = line.trim();
    let invalid = || ClientError::InvalidInput {
        input: line.to_string(),
    };

    let command = match line.to_ascii_lowercase().as_str() {
        "board" | "b" => UserCommand::Board,
        "moves" | "m" => UserCommand::Moves,
        "help" | "h" | "?" => UserCommand::Help,
        "surrender" | "resign" => UserCommand::Surrender,
        "find" => UserCommand::Find,
        "cancel" => UserCommand::Cancel,
        "quit" => UserCommand::Quit,
        "exit" | "end" => UserCommand::Exit,
        _ => {
            let text = line.strip_prefix("move").map(str::trim).unwrap_or(line);
            let data = MoveData::parse(&text.replace(' ', "")).map_err(|_| invalid())?;
            UserCommand::Move {
                from: data.from,
                to: data.to,
            }
        }
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_column_first() {
        assert_eq!(
            parse_command("0,5->1,4").unwrap(),
            UserCommand::Move {
                from: Square::new(5, 0),
                to: Square::new(4, 1)
            }
        );
        assert_eq!(
            parse_command("  move 0, 5 -> 1, 4 ").unwrap(),
            parse_command("0,5->1,4").unwrap()
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_command("BOARD").unwrap(), UserCommand::Board);
        assert_eq!(parse_command("resign").unwrap(), UserCommand::Surrender);
        assert_eq!(parse_command("end").unwrap(), UserCommand::Exit);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_command("e2e4"),
            Err(ClientError::InvalidInput { .. })
        ));
    }
}
