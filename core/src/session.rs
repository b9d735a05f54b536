//! Game session registry.
//!
//! RULE: Exactly one live, unresolved session may exist per
//! (owner, game kind). The registry is the single owner of a user's
//! session slot; nothing else holds session state. Sessions are plain
//! in-memory records — a process restart forfeits wagers already
//! debited (accepted loss model, no recovery guarantee).

use crate::error::{EconError, EconResult};
use crate::games::roulette::RouletteChoice;
use crate::types::{Money, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Blackjack,
    Coinflip,
    HigherLower,
    Roulette,
    Slots,
}

impl GameKind {
    pub fn label(&self) -> &'static str {
        match self {
            GameKind::Blackjack => "blackjack",
            GameKind::Coinflip => "coinflip",
            GameKind::HigherLower => "higher-or-lower",
            GameKind::Roulette => "roulette",
            GameKind::Slots => "slots",
        }
    }
}

/// Kind-specific mutable state.
#[derive(Debug, Clone, Copy)]
pub enum SessionState {
    Blackjack { player: i64, dealer: i64 },
    Coinflip,
    HigherLower { reference: i64, drawn: i64 },
    Roulette { choice: RouletteChoice },
}

#[derive(Debug, Clone)]
pub struct GameSession {
    pub id: Uuid,
    pub owner: UserId,
    pub kind: GameKind,
    pub wager: Money,
    pub state: SessionState,
    pub resolved: bool,
}

#[derive(Default)]
pub struct SessionRegistry {
    live: HashMap<(UserId, GameKind), GameSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject if an unresolved session already exists for (owner, kind).
    /// Checked before the wager is debited, so a rejected start never
    /// touches the ledger.
    pub fn ensure_vacant(&self, owner: &str, kind: GameKind) -> EconResult<()> {
        match self.live.get(&(owner.to_string(), kind)) {
            Some(s) if !s.resolved => Err(EconError::AlreadyActive("game session")),
            _ => Ok(()),
        }
    }

    pub fn begin(
        &mut self,
        owner: &str,
        kind: GameKind,
        wager: Money,
        state: SessionState,
    ) -> EconResult<&mut GameSession> {
        self.ensure_vacant(owner, kind)?;
        let key = (owner.to_string(), kind);
        let session = GameSession {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            kind,
            wager,
            state,
            resolved: false,
        };
        log::debug!("session started: {} {}", owner, kind.label());
        self.live.insert(key.clone(), session);
        Ok(self.live.get_mut(&key).expect("session just inserted"))
    }

    pub fn get(&self, owner: &str, kind: GameKind) -> Option<&GameSession> {
        self.live.get(&(owner.to_string(), kind))
    }

    pub fn get_mut(&mut self, owner: &str, kind: GameKind) -> Option<&mut GameSession> {
        self.live.get_mut(&(owner.to_string(), kind))
    }

    /// Remove and return the session. Settlement has been applied by the
    /// caller; the slot is free for a new game.
    pub fn resolve(&mut self, owner: &str, kind: GameKind) -> Option<GameSession> {
        let removed = self.live.remove(&(owner.to_string(), kind));
        if removed.is_some() {
            log::debug!("session resolved: {} {}", owner, kind.label());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
