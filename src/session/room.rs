//! One game session: two seats, a board and the handshakes around them.
//!
//! All mutable state sits behind a single mutex and every operation holds it
//! for its whole duration, so two connections acting on the same session are
//! serialized. Rejected operations return an error and change nothing.

use std::sync::{Mutex, MutexGuard, PoisonError};

use im::Vector;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::SessionError;
use super::participant::{Notice, Participant, ParticipantId};
use super::state::SessionState;
use super::SessionId;
use crate::core::{Board, Coord, GameRng, Stone};
use crate::notation::CoordScheme;

/// One accepted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub stone: Stone,
    pub coord: Coord,
}

/// Result of an accepted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub coord: Coord,
    pub stone: Stone,
    pub game_over: bool,
    pub winner: Option<Stone>,
    /// Colour to move next, `None` once the game is over.
    pub next_turn: Option<Stone>,
    pub message: String,
    pub board: Board,
}

/// Result of `set_ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyStatus {
    /// Flag set; the other seat is empty or not ready yet.
    WaitingForOpponent,
    /// Both ready; the game began with the caller on `stone`.
    Started { stone: Stone },
    /// A game is already in progress.
    AlreadyPlaying,
}

/// Result of `request_rematch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RematchStatus {
    /// Flag set; waiting for the other occupant.
    WaitingForOpponent,
    /// New game started with the caller on `stone`.
    Started { stone: Stone },
}

/// Occupant of a seat as seen from outside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub participant: ParticipantId,
    pub name: String,
    pub stone: Stone,
    pub ready: bool,
    pub rematch: bool,
}

/// Consistent copy of a session's state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub state: SessionState,
    pub locked: bool,
    pub turn: Stone,
    pub winner: Option<Stone>,
    pub seats: Vec<SeatView>,
    pub board: Board,
    pub history: Vector<MoveRecord>,
}

/// Directory line for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub occupants: usize,
    pub state: SessionState,
    pub locked: bool,
}

#[derive(Debug)]
struct Seat {
    participant: Participant,
    stone: Stone,
    ready: bool,
    rematch: bool,
}

#[derive(Debug)]
struct SessionInner {
    seats: [Option<Seat>; 2],
    state: SessionState,
    turn: Stone,
    winner: Option<Stone>,
    board: Board,
    locked: bool,
    history: Vector<MoveRecord>,
    rng: GameRng,
}

impl SessionInner {
    fn occupants(&self) -> usize {
        self.seats.iter().flatten().count()
    }

    fn find(&self, id: ParticipantId) -> Option<(usize, &Seat)> {
        self.seats
            .iter()
            .enumerate()
            .find_map(|(idx, seat)| seat.as_ref().filter(|s| s.participant.id == id).map(|s| (idx, s)))
    }

    fn find_mut(&mut self, id: ParticipantId) -> Option<(usize, &mut Seat)> {
        self.seats
            .iter_mut()
            .enumerate()
            .find_map(|(idx, seat)| seat.as_mut().filter(|s| s.participant.id == id).map(|s| (idx, s)))
    }

    fn opponent(&self, idx: usize) -> Option<&Seat> {
        self.seats[1 - idx].as_ref()
    }

    fn notify_opponent(&self, idx: usize, notice: Notice) {
        if let Some(seat) = self.opponent(idx) {
            seat.participant.notify(notice);
        }
    }

    fn start_game(&mut self) {
        self.board.reset();
        self.history = Vector::new();
        self.turn = Stone::Black;
        self.winner = None;
        self.state = SessionState::Playing;
        for seat in self.seats.iter_mut().flatten() {
            seat.ready = true;
            seat.rematch = false;
        }
    }

    fn reset(&mut self) {
        self.board.reset();
        self.history = Vector::new();
        self.turn = Stone::Black;
        self.winner = None;
        self.locked = false;
        self.state = SessionState::Empty;
    }

    /// Checks shared by both `submit_move` forms, in rejection order.
    fn check_mover(&self, who: ParticipantId, stone: Stone, id: SessionId) -> Result<usize, SessionError> {
        match self.state {
            SessionState::Over => return Err(SessionError::GameAlreadyOver),
            SessionState::Playing => {}
            _ => return Err(SessionError::GameNotStarted),
        }
        let (idx, seat) = self.find(who).ok_or(SessionError::NotSeated(id))?;
        if stone != self.turn {
            return Err(SessionError::OutOfTurn { expected: self.turn });
        }
        let seat = seat.stone;
        if stone != seat {
            return Err(SessionError::WrongColor { seat, requested: stone });
        }
        Ok(idx)
    }

    fn place(&mut self, idx: usize, coord: Coord) -> Result<MoveOutcome, SessionError> {
        if !coord.in_bounds() {
            return Err(SessionError::InvalidCoordinate(format!("({}, {})", coord.x, coord.y)));
        }
        let stone = self.turn;
        if !self.board.apply_move(coord, stone) {
            return Err(SessionError::CellOccupied(coord.label()));
        }
        self.history.push_back(MoveRecord { stone, coord });

        let (winner, next_turn, message) = if self.board.check_win(coord) {
            self.state = SessionState::Over;
            self.winner = Some(stone);
            for seat in self.seats.iter_mut().flatten() {
                seat.ready = false;
            }
            (Some(stone), None, format!("{stone} plays {coord} and wins"))
        } else {
            self.turn = stone.other();
            (None, Some(self.turn), format!("{stone} plays {coord}"))
        };

        self.notify_opponent(
            idx,
            Notice::MovePlayed {
                coord,
                stone,
                winner,
                board: self.board.clone(),
            },
        );

        Ok(MoveOutcome {
            coord,
            stone,
            game_over: winner.is_some(),
            winner,
            next_turn,
            message,
            board: self.board.clone(),
        })
    }
}

/// A game session.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    inner: Mutex<SessionInner>,
}

impl Session {
    /// An empty session whose rematch colours come from `rng`.
    pub fn new(id: SessionId, rng: GameRng) -> Self {
        Self {
            id,
            inner: Mutex::new(SessionInner {
                seats: [None, None],
                state: SessionState::Empty,
                turn: Stone::Black,
                winner: None,
                board: Board::new(),
                locked: false,
                history: Vector::new(),
                rng,
            }),
        }
    }

    /// Session id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    fn lock_inner(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a seat. Returns the colour assigned.
    #[instrument(skip_all, fields(session_id = self.id, participant = %participant.id))]
    pub fn join(&self, participant: Participant) -> Result<Stone, SessionError> {
        let mut inner = self.lock_inner();
        if inner.locked {
            warn!("join rejected: locked");
            return Err(SessionError::SessionLocked(self.id));
        }
        if inner.occupants() >= 2 {
            warn!("join rejected: full");
            return Err(SessionError::SessionFull(self.id));
        }
        if inner.find(participant.id).is_some() {
            return Err(SessionError::AlreadySeated(self.id));
        }

        let taken = inner.seats.iter().flatten().map(|s| s.stone).next();
        let stone = taken.map_or(Stone::Black, Stone::other);
        let idx = inner.seats.iter().position(Option::is_none).unwrap_or(0);

        let name = participant.name.clone();
        inner.seats[idx] = Some(Seat {
            participant,
            stone,
            ready: false,
            rematch: false,
        });
        if matches!(
            inner.state,
            SessionState::Empty | SessionState::Waiting | SessionState::Full
        ) {
            inner.state = SessionState::for_occupants(inner.occupants());
        }
        inner.notify_opponent(idx, Notice::OpponentJoined { name: name.clone() });
        info!(%name, %stone, state = %inner.state, "joined");
        Ok(stone)
    }

    /// Mark the caller ready; starts the game once both seats are ready.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn set_ready(&self, who: ParticipantId) -> Result<ReadyStatus, SessionError> {
        let mut inner = self.lock_inner();
        let state = inner.state;
        let (idx, seat) = inner.find_mut(who).ok_or(SessionError::NotSeated(self.id))?;
        match state {
            SessionState::Over => return Err(SessionError::GameAlreadyOver),
            SessionState::Playing => return Ok(ReadyStatus::AlreadyPlaying),
            _ => {}
        }

        let stone = seat.stone;
        if !seat.ready {
            seat.ready = true;
            let name = seat.participant.name.clone();
            inner.notify_opponent(idx, Notice::OpponentReady { name });
        }

        let all_ready = inner.occupants() == 2 && inner.seats.iter().flatten().all(|s| s.ready);
        if !all_ready {
            return Ok(ReadyStatus::WaitingForOpponent);
        }

        inner.start_game();
        if let Some(opponent) = inner.opponent(idx) {
            opponent.participant.notify(Notice::GameStarted {
                your_stone: opponent.stone,
            });
        }
        info!("game started");
        Ok(ReadyStatus::Started { stone })
    }

    /// Play `stone` at `coord` for `who`.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn submit_move(&self, who: ParticipantId, stone: Stone, coord: Coord) -> Result<MoveOutcome, SessionError> {
        let mut inner = self.lock_inner();
        let result = inner
            .check_mover(who, stone, self.id)
            .and_then(|idx| inner.place(idx, coord));
        log_move(&result);
        result
    }

    /// Like [`Session::submit_move`], parsing `text` with the canonical
    /// notation after the state checks.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn submit_move_text(&self, who: ParticipantId, stone: Stone, text: &str) -> Result<MoveOutcome, SessionError> {
        let mut inner = self.lock_inner();
        let result = inner.check_mover(who, stone, self.id).and_then(|idx| {
            let tokens: Vec<&str> = text.split_whitespace().collect();
            let coord = CoordScheme::Canonical
                .parse(&tokens)
                .map_err(|e| SessionError::InvalidCoordinate(e.to_string()))?;
            inner.place(idx, coord)
        });
        log_move(&result);
        result
    }

    /// Give up the caller's seat.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn leave(&self, who: ParticipantId) -> Result<(), SessionError> {
        let mut inner = self.lock_inner();
        let (idx, seat) = inner.find(who).ok_or(SessionError::NotSeated(self.id))?;
        let name = seat.participant.name.clone();
        inner.seats[idx] = None;

        if inner.occupants() == 0 {
            inner.reset();
            info!(%name, "left; session reset");
            return Ok(());
        }

        let state = inner.state;
        match state {
            SessionState::Playing => {
                for seat in inner.seats.iter_mut().flatten() {
                    seat.ready = false;
                    seat.rematch = false;
                }
                inner.state = SessionState::Waiting;
                warn!(%name, "left during a game; game aborted");
            }
            SessionState::Over => info!(%name, "left after the game"),
            _ => {
                inner.state = SessionState::Waiting;
                info!(%name, "left");
            }
        }
        inner.notify_opponent(
            idx,
            Notice::OpponentLeft {
                name,
                game_aborted: state.is_playing(),
            },
        );
        Ok(())
    }

    /// Change the name the caller is known by in this session.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn rename(&self, who: ParticipantId, name: &str) -> Result<(), SessionError> {
        let mut inner = self.lock_inner();
        let (_, seat) = inner.find_mut(who).ok_or(SessionError::NotSeated(self.id))?;
        seat.participant.name = name.to_string();
        info!(%name, "renamed");
        Ok(())
    }

    /// Ask for another game once the current one is over.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn request_rematch(&self, who: ParticipantId) -> Result<RematchStatus, SessionError> {
        let mut inner = self.lock_inner();
        let over = inner.state == SessionState::Over;
        let (idx, seat) = inner.find_mut(who).ok_or(SessionError::NotSeated(self.id))?;
        if !over {
            return Err(SessionError::GameNotOver);
        }

        if !seat.rematch {
            seat.rematch = true;
            let name = seat.participant.name.clone();
            inner.notify_opponent(idx, Notice::RematchRequested { name });
        }
        if !inner.seats.iter().flatten().all(|s| s.rematch) {
            return Ok(RematchStatus::WaitingForOpponent);
        }

        let first_black = inner.rng.coin_flip();
        let stones = if first_black {
            [Stone::Black, Stone::White]
        } else {
            [Stone::White, Stone::Black]
        };
        for (seat, stone) in inner.seats.iter_mut().zip(stones) {
            if let Some(seat) = seat {
                seat.stone = stone;
            }
        }
        inner.start_game();

        if let Some(opponent) = inner.opponent(idx) {
            opponent.participant.notify(Notice::RematchStarted {
                your_stone: opponent.stone,
            });
        }
        let stone = stones[idx];
        info!(%stone, "rematch started");
        Ok(RematchStatus::Started { stone })
    }

    /// Refuse new joiners.
    pub fn lock(&self) {
        self.lock_inner().locked = true;
    }

    /// Accept joiners again.
    pub fn unlock(&self) {
        self.lock_inner().locked = false;
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_inner().locked
    }

    /// Whether a join would currently be admitted.
    #[must_use]
    pub fn can_enter(&self) -> bool {
        let inner = self.lock_inner();
        !inner.locked && inner.occupants() < 2
    }

    #[must_use]
    pub fn occupants(&self) -> usize {
        self.lock_inner().occupants()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock_inner().state
    }

    /// Colour held by `who`, if seated.
    #[must_use]
    pub fn stone_of(&self, who: ParticipantId) -> Option<Stone> {
        self.lock_inner().find(who).map(|(_, seat)| seat.stone)
    }

    /// Copy of the full state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock_inner();
        SessionSnapshot {
            id: self.id,
            state: inner.state,
            locked: inner.locked,
            turn: inner.turn,
            winner: inner.winner,
            seats: inner
                .seats
                .iter()
                .flatten()
                .map(|s| SeatView {
                    participant: s.participant.id,
                    name: s.participant.name.clone(),
                    stone: s.stone,
                    ready: s.ready,
                    rematch: s.rematch,
                })
                .collect(),
            board: inner.board.clone(),
            history: inner.history.clone(),
        }
    }

    /// Directory line.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let inner = self.lock_inner();
        SessionSummary {
            id: self.id,
            occupants: inner.occupants(),
            state: inner.state,
            locked: inner.locked,
        }
    }
}

fn log_move(result: &Result<MoveOutcome, SessionError>) {
    match result {
        Ok(outcome) if outcome.game_over => info!(coord = %outcome.coord, stone = %outcome.stone, "game won"),
        Ok(_) => {}
        Err(err) => warn!(%err, "move rejected"),
    }
}
