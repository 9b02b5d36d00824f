//! The set of sessions and who sits where.
//!
//! The session map and the participant directory have their own locks and
//! neither is held while a session's mutex is taken.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use tracing::{info, instrument};

use super::error::SessionError;
use super::participant::{Participant, ParticipantId};
use super::room::{MoveOutcome, ReadyStatus, RematchStatus, Session, SessionSummary};
use super::SessionId;
use crate::core::{GameRng, Stone};

/// All sessions of a server.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<FxHashMap<SessionId, Arc<Session>>>,
    directory: Mutex<FxHashMap<ParticipantId, SessionId>>,
    rng: Mutex<GameRng>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionRegistry {
    /// An empty registry. `seed` fixes every session's rematch colours.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self {
            sessions: RwLock::new(FxHashMap::default()),
            directory: Mutex::new(FxHashMap::default()),
            rng: Mutex::new(rng),
        }
    }

    /// A registry with sessions `1..=rooms` already created.
    pub fn with_pool(rooms: u32, seed: Option<u64>) -> Self {
        let registry = Self::new(seed);
        let master_seed = {
            let mut sessions = registry.sessions.write().unwrap_or_else(PoisonError::into_inner);
            let mut rng = registry.rng.lock().unwrap_or_else(PoisonError::into_inner);
            for id in 1..=rooms {
                sessions.insert(id, Arc::new(Session::new(id, rng.fork())));
            }
            rng.seed()
        };
        info!(rooms, master_seed, "session pool created");
        registry
    }

    /// Add a session on demand.
    #[instrument(skip(self))]
    pub fn create_session(&self, id: SessionId) -> Result<Arc<Session>, SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.contains_key(&id) {
            return Err(SessionError::SessionExists(id));
        }
        let rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner).fork();
        let session = Arc::new(Session::new(id, rng));
        sessions.insert(id, Arc::clone(&session));
        info!("session created");
        Ok(session)
    }

    /// Look up a session.
    pub fn get(&self, id: SessionId) -> Result<Arc<Session>, SessionError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownSession(id))
    }

    /// Number of sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Session the participant currently sits in.
    #[must_use]
    pub fn session_of(&self, who: ParticipantId) -> Option<SessionId> {
        self.directory().get(&who).copied()
    }

    fn directory(&self) -> std::sync::MutexGuard<'_, FxHashMap<ParticipantId, SessionId>> {
        self.directory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seat `participant` in session `id`, leaving their previous session
    /// once the new seat is secured.
    #[instrument(skip_all, fields(session_id = id, participant = %participant.id))]
    pub fn join(&self, id: SessionId, participant: Participant) -> Result<Stone, SessionError> {
        let who = participant.id;
        let session = self.get(id)?;
        let previous = self.session_of(who);
        if previous == Some(id) {
            return Err(SessionError::AlreadySeated(id));
        }

        let stone = session.join(participant)?;
        if let Some(old) = previous {
            // The old seat may already be gone if the session was reset.
            let _ = self.get(old).and_then(|s| s.leave(who));
        }
        self.directory().insert(who, id);
        Ok(stone)
    }

    pub fn set_ready(&self, id: SessionId, who: ParticipantId) -> Result<ReadyStatus, SessionError> {
        self.get(id)?.set_ready(who)
    }

    /// Submit a move written in canonical notation.
    pub fn submit_move(
        &self,
        id: SessionId,
        who: ParticipantId,
        stone: Stone,
        text: &str,
    ) -> Result<MoveOutcome, SessionError> {
        self.get(id)?.submit_move_text(who, stone, text)
    }

    pub fn request_rematch(&self, id: SessionId, who: ParticipantId) -> Result<RematchStatus, SessionError> {
        self.get(id)?.request_rematch(who)
    }

    /// Leave session `id`.
    #[instrument(skip(self))]
    pub fn leave(&self, id: SessionId, who: ParticipantId) -> Result<(), SessionError> {
        let result = self.get(id)?.leave(who);
        let mut directory = self.directory();
        if directory.get(&who) == Some(&id) {
            directory.remove(&who);
        }
        result
    }

    /// Leave whatever session the participant is in.
    pub fn leave_current(&self, who: ParticipantId) -> Option<SessionId> {
        let id = self.session_of(who)?;
        self.leave(id, who).ok().map(|()| id)
    }

    /// Rename the participant in the session they sit in, if any.
    pub fn rename(&self, who: ParticipantId, name: &str) -> Result<(), SessionError> {
        match self.session_of(who) {
            Some(id) => self.get(id)?.rename(who, name),
            None => Ok(()),
        }
    }

    /// Directory of every session, ordered by id.
    #[must_use]
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions: Vec<Arc<Session>> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let mut summaries: Vec<_> = sessions.iter().map(|s| s.summary()).collect();
        summaries.sort_by_key(|s| s.id);
        summaries
    }
}
