//! Per-connection command handling.
//!
//! A [`ClientHandler`] turns command lines into registry calls and the
//! results into reply text. It is transport-agnostic: the server feeds it
//! lines read from a socket, the tests feed it strings.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::command::{Command, CommandError, USAGE};
use crate::core::{Board, Stone};
use crate::notation::CoordScheme;
use crate::render::{board_text, Style};
use crate::search::{SearchConfig, SearchEngine};
use crate::session::{
    MoveOutcome, Participant, ParticipantId, ReadyStatus, RematchStatus, SessionError, SessionId, SessionRegistry,
};

/// Text to send back, and whether the connection should close afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub close: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            close: false,
        }
    }

    fn close(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            close: true,
        }
    }
}

/// A local game against the engine.
#[derive(Debug)]
struct AiGame {
    board: Board,
    human: Stone,
    /// Room locked for the duration of the game.
    locked_room: Option<SessionId>,
}

/// Command interpreter for one connection.
#[derive(Debug)]
pub struct ClientHandler {
    registry: Arc<SessionRegistry>,
    participant: Participant,
    scheme: CoordScheme,
    style: Style,
    engine: SearchEngine,
    ai: Option<AiGame>,
}

impl ClientHandler {
    /// A handler acting for `participant`.
    pub fn new(registry: Arc<SessionRegistry>, participant: Participant) -> Self {
        Self {
            registry,
            participant,
            scheme: CoordScheme::default(),
            style: Style::default(),
            engine: SearchEngine::default(),
            ai: None,
        }
    }

    /// Set the coordinate notation.
    pub fn with_scheme(mut self, scheme: CoordScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the board rendering style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the engine used in `ai` mode.
    pub fn with_search(mut self, config: SearchConfig) -> Self {
        self.engine = SearchEngine::new(config);
        self
    }

    #[must_use]
    pub fn participant_id(&self) -> ParticipantId {
        self.participant.id
    }

    #[must_use]
    pub fn scheme(&self) -> CoordScheme {
        self.scheme
    }

    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Interpret one input line.
    #[instrument(skip(self), fields(participant = %self.participant.id))]
    pub fn handle_line(&mut self, line: &str) -> Reply {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(CommandError::Empty) => Reply::text(""),
            Err(err @ CommandError::Unknown(_)) => Reply::text(format!("{err}; type `help` for commands")),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    /// Leave everything behind; used on `exit`, EOF and I/O errors.
    pub fn disconnect(&mut self) {
        self.stop_ai();
        if let Some(id) = self.registry.leave_current(self.participant.id) {
            info!(participant = %self.participant.id, session_id = id, "left on disconnect");
        }
    }

    fn execute(&mut self, command: Command) -> Reply {
        match command {
            Command::Nickname(name) => {
                if let Err(err) = self.registry.rename(self.participant.id, &name) {
                    return Reply::text(err.to_string());
                }
                self.participant.name = name;
                Reply::text(format!("hello, {}", self.participant.name))
            }
            Command::Help => Reply::text(USAGE),
            Command::ListRooms => Reply::text(self.rooms_text()),
            Command::EnterRoom(id) => self.enter(id),
            Command::Start => self.start(),
            Command::Put(tokens) => {
                let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
                if self.ai.is_some() {
                    self.ai_put(&tokens)
                } else {
                    self.put(&tokens)
                }
            }
            Command::Again => self.again(),
            Command::Leave => {
                self.stop_ai();
                match self.registry.leave_current(self.participant.id) {
                    Some(id) => Reply::text(format!("left room {id}")),
                    None => Reply::text("you are not in a room"),
                }
            }
            Command::AiStart => self.play_computer(Stone::Black),
            Command::AiStop => {
                if self.stop_ai() {
                    Reply::text("stopped playing the computer")
                } else {
                    Reply::text("you are not playing the computer")
                }
            }
            Command::Exit => {
                self.disconnect();
                Reply::close("bye")
            }
        }
    }

    fn rooms_text(&self) -> String {
        self.registry
            .list()
            .iter()
            .map(|room| {
                let lock = if room.locked { " locked" } else { "" };
                format!("room {}: {}/2 {}{lock}", room.id, room.occupants, room.state)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn current_room(&self) -> Option<SessionId> {
        self.registry.session_of(self.participant.id)
    }

    fn enter(&mut self, id: SessionId) -> Reply {
        if self.ai.is_some() {
            return Reply::text("stop playing the computer first (`ai stop`)");
        }
        match self.registry.join(id, self.participant.clone()) {
            Ok(stone) => Reply::text(format!("entered room {id} as {stone}; type `start` when ready")),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn start(&mut self) -> Reply {
        if self.ai.is_some() {
            return Reply::text("stop playing the computer first (`ai stop`)");
        }
        let Some(id) = self.current_room() else {
            return Reply::text("enter a room first");
        };
        match self.registry.set_ready(id, self.participant.id) {
            Ok(ReadyStatus::WaitingForOpponent) => Reply::text("ready; waiting for your opponent"),
            Ok(ReadyStatus::AlreadyPlaying) => Reply::text("the game is already running"),
            Ok(ReadyStatus::Started { stone }) => Reply::text(self.started_text("game started", stone)),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn again(&mut self) -> Reply {
        let Some(id) = self.current_room() else {
            return Reply::text("enter a room first");
        };
        match self.registry.request_rematch(id, self.participant.id) {
            Ok(RematchStatus::WaitingForOpponent) => Reply::text("rematch requested; waiting for your opponent"),
            Ok(RematchStatus::Started { stone }) => Reply::text(self.started_text("rematch started", stone)),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn started_text(&self, head: &str, stone: Stone) -> String {
        let board = board_text(&Board::new(), self.style);
        let prompt = if stone == Stone::Black {
            "your move"
        } else {
            "black moves first"
        };
        format!("{head}, you play {stone}\n{board}\n{prompt}")
    }

    fn put(&mut self, tokens: &[&str]) -> Reply {
        let Some(id) = self.current_room() else {
            return Reply::text("enter a room first");
        };
        match self.submit(id, tokens) {
            Ok(outcome) => Reply::text(self.outcome_text(&outcome)),
            Err(err) => Reply::text(err.to_string()),
        }
    }

    fn submit(&self, id: SessionId, tokens: &[&str]) -> Result<MoveOutcome, SessionError> {
        let stone = self
            .registry
            .get(id)?
            .stone_of(self.participant.id)
            .ok_or(SessionError::NotSeated(id))?;
        // Sessions read canonical labels; legacy input is converted here.
        let text = match self.scheme {
            CoordScheme::Canonical => tokens.join(" "),
            CoordScheme::LegacyHex => self
                .scheme
                .parse(tokens)
                .map_err(|e| SessionError::InvalidCoordinate(e.to_string()))?
                .label(),
        };
        self.registry.submit_move(id, self.participant.id, stone, &text)
    }

    fn outcome_text(&self, outcome: &MoveOutcome) -> String {
        let board = board_text(&outcome.board, self.style);
        let tail = match outcome.winner {
            Some(_) => "you win! type `again` for a rematch",
            None => "waiting for your opponent",
        };
        format!("{}\n{board}\n{tail}", outcome.message)
    }

    /// Start a game against the engine with the human on `human`. Same as
    /// `ai start` when `human` is black.
    pub fn play_computer(&mut self, human: Stone) -> Reply {
        if self.ai.is_some() {
            return Reply::text("you are already playing the computer");
        }

        let mut locked_room = None;
        if let Some(id) = self.current_room() {
            let Ok(session) = self.registry.get(id) else {
                return Reply::text("your room is gone");
            };
            if session.occupants() > 1 {
                return Reply::text("leave the room or wait until you are alone to play the computer");
            }
            session.lock();
            locked_room = Some(id);
        }

        let mut board = Board::new();
        let mut opening = String::new();
        if human == Stone::White {
            if let Some(first) = self.engine.select_move(&board, Stone::Black) {
                board.apply_move(first, Stone::Black);
                opening = format!("; computer plays {}", self.scheme.format(first));
            }
        }
        let shown = board_text(&board, self.style);
        self.ai = Some(AiGame {
            board,
            human,
            locked_room,
        });
        info!(participant = %self.participant.id, ?locked_room, %human, "computer game started");
        Reply::text(format!("playing the computer; you are {human}{opening}\n{shown}\nyour move"))
    }

    /// End the computer game, unlocking the room. Returns whether one was
    /// running.
    fn stop_ai(&mut self) -> bool {
        let Some(game) = self.ai.take() else {
            return false;
        };
        if let Some(id) = game.locked_room {
            if let Ok(session) = self.registry.get(id) {
                session.unlock();
            }
        }
        true
    }

    fn ai_put(&mut self, tokens: &[&str]) -> Reply {
        let coord = match self.scheme.parse(tokens) {
            Ok(coord) => coord,
            Err(err) => return Reply::text(format!("invalid coordinate: {err}")),
        };
        let style = self.style;
        let Some(game) = self.ai.as_mut() else {
            return Reply::text("you are not playing the computer");
        };

        if !game.board.apply_move(coord, game.human) {
            return Reply::text(format!("cell {} is already occupied", coord.label()));
        }
        if game.board.check_win(coord) {
            let text = format!("you win!\n{}", board_text(&game.board, style));
            self.stop_ai();
            return Reply::text(text);
        }

        let machine = game.human.other();
        let Some(reply) = self.engine.select_move(&game.board, machine) else {
            let text = format!("the board is full; draw\n{}", board_text(&game.board, style));
            self.stop_ai();
            return Reply::text(text);
        };
        if !game.board.apply_move(reply, machine) {
            warn!(coord = %reply, "engine chose an unplayable cell");
            self.stop_ai();
            return Reply::text("the computer gave up");
        }

        let board = board_text(&game.board, style);
        let shown = self.scheme.format(reply);
        if game.board.check_win(reply) {
            self.stop_ai();
            Reply::text(format!("computer plays {shown} and wins\n{board}"))
        } else {
            Reply::text(format!("computer plays {shown}\n{board}\nyour move"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> ClientHandler {
        let registry = Arc::new(SessionRegistry::with_pool(2, Some(3)));
        ClientHandler::new(registry, Participant::new("anonymous"))
            .with_search(SearchConfig::default().with_max_depth(1))
    }

    #[test]
    fn test_help_and_unknown() {
        let mut h = handler();
        assert_eq!(h.handle_line("help").text, USAGE);
        assert!(h.handle_line("dance").text.contains("type `help`"));
        assert_eq!(h.handle_line("   ").text, "");
    }

    #[test]
    fn test_nickname() {
        let mut h = handler();
        assert_eq!(h.handle_line("nickname ada").text, "hello, ada");
    }

    #[test]
    fn test_start_outside_room() {
        let mut h = handler();
        assert_eq!(h.handle_line("start").text, "enter a room first");
        assert_eq!(h.handle_line("put H 8").text, "enter a room first");
        assert_eq!(h.handle_line("leave").text, "you are not in a room");
    }

    #[test]
    fn test_ai_game_replies() {
        let mut h = handler();
        assert!(h.handle_line("ai start").text.starts_with("playing the computer"));
        let reply = h.handle_line("put H 8").text;
        assert!(reply.starts_with("computer plays "), "{reply}");
        assert!(h.handle_line("put H 8").text.contains("already occupied"));
        assert_eq!(h.handle_line("ai stop").text, "stopped playing the computer");
        assert_eq!(h.handle_line("ai stop").text, "you are not playing the computer");
    }

    #[test]
    fn test_computer_opens_when_human_is_white() {
        let mut h = handler();
        let reply = h.play_computer(Stone::White).text;
        assert!(reply.starts_with("playing the computer; you are white; computer plays H8"), "{reply}");
        assert!(h.handle_line("put H 8").text.contains("already occupied"));
    }

    #[test]
    fn test_exit_closes() {
        let mut h = handler();
        h.handle_line("enter room 1");
        let reply = h.handle_line("exit");
        assert!(reply.close);
        assert_eq!(h.registry.session_of(h.participant_id()), None);
    }
}
