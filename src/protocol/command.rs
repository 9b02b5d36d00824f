//! Client command parsing.

use std::str::FromStr;

use thiserror::Error;

use crate::session::SessionId;

/// Summary shown by `help` and after unknown input.
pub const USAGE: &str = "\
commands:
  nickname <name>     set your display name
  ls rooms            list rooms
  enter room <id>     join a room
  start               ready up; the game starts when both players are ready
  put <col> <row>     place a stone, e.g. `put H 8` or `put H8`
  again               ask for a rematch after a game
  leave               leave the room
  ai start | ai stop  play against the computer
  help                show this text
  exit                disconnect";

/// One line of client input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Nickname(String),
    Help,
    ListRooms,
    EnterRoom(SessionId),
    Start,
    /// Raw coordinate tokens; interpretation depends on the connection's
    /// notation.
    Put(Vec<String>),
    Again,
    Leave,
    AiStart,
    AiStop,
    Exit,
}

/// Why a line is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = tokens.split_first() else {
            return Err(CommandError::Empty);
        };

        match (head.to_ascii_lowercase().as_str(), args) {
            ("nickname", [_, ..]) => Ok(Command::Nickname(args.join(" "))),
            ("nickname", []) => Err(CommandError::Usage("nickname <name>")),
            ("help", _) => Ok(Command::Help),
            ("ls", [what]) if what.eq_ignore_ascii_case("rooms") => Ok(Command::ListRooms),
            ("ls", _) => Err(CommandError::Usage("ls rooms")),
            ("enter", [what, id]) if what.eq_ignore_ascii_case("room") => id
                .parse()
                .map(Command::EnterRoom)
                .map_err(|_| CommandError::Usage("enter room <id>")),
            ("enter", _) => Err(CommandError::Usage("enter room <id>")),
            ("start", []) => Ok(Command::Start),
            ("put", [_, ..]) => Ok(Command::Put(args.iter().map(|s| s.to_string()).collect())),
            ("put", []) => Err(CommandError::Usage("put <col> <row>")),
            ("again", []) => Ok(Command::Again),
            ("leave", []) => Ok(Command::Leave),
            ("ai", [what]) if what.eq_ignore_ascii_case("start") => Ok(Command::AiStart),
            ("ai", [what]) if what.eq_ignore_ascii_case("stop") => Ok(Command::AiStop),
            ("ai", _) => Err(CommandError::Usage("ai start | ai stop")),
            ("exit" | "quit", _) => Ok(Command::Exit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}
