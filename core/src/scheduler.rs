//! Deferred settlement scheduling.
//!
//! Roulette resolves after a fixed spin delay. Instead of a bare timer
//! callback closing over mutable state, each pending settlement is an
//! explicit record keyed by session id, drained by the engine's poll
//! loop and cancellable at shutdown. A settlement scheduled but never
//! fired (process exit) is a forfeited wager, same as any other
//! in-flight session.

use crate::session::GameKind;
use crate::types::{EpochMs, UserId};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Deferred {
    pub session_id: Uuid,
    pub owner: UserId,
    pub kind: GameKind,
    pub due_ms: EpochMs,
}

#[derive(Default)]
pub struct SettlementScheduler {
    pending: Vec<Deferred>,
}

impl SettlementScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, session_id: Uuid, owner: &str, kind: GameKind, due_ms: EpochMs) {
        self.pending.push(Deferred {
            session_id,
            owner: owner.to_string(),
            kind,
            due_ms,
        });
    }

    /// Drain every settlement due at or before `now`, oldest first.
    pub fn due(&mut self, now: EpochMs) -> Vec<Deferred> {
        let mut due: Vec<Deferred> = Vec::new();
        self.pending.retain(|d| {
            if d.due_ms <= now {
                due.push(d.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|d| d.due_ms);
        due
    }

    /// Put a drained settlement back (e.g. the owner's lock was busy).
    pub fn requeue(&mut self, entry: Deferred) {
        self.pending.push(entry);
    }

    /// Cancel everything; returns the abandoned entries so the caller
    /// can log the forfeits.
    pub fn cancel_all(&mut self) -> Vec<Deferred> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_only_due_entries() {
        let mut sched = SettlementScheduler::new();
        sched.schedule(Uuid::new_v4(), "a", GameKind::Roulette, 100);
        sched.schedule(Uuid::new_v4(), "b", GameKind::Roulette, 300);

        let due = sched.due(150);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].owner, "a");
        assert_eq!(sched.len(), 1);

        assert!(sched.due(299).is_empty());
        assert_eq!(sched.due(300).len(), 1);
        assert!(sched.is_empty());
    }

    #[test]
    fn cancel_all_abandons_everything() {
        let mut sched = SettlementScheduler::new();
        sched.schedule(Uuid::new_v4(), "a", GameKind::Roulette, 100);
        sched.schedule(Uuid::new_v4(), "b", GameKind::Roulette, 200);
        assert_eq!(sched.cancel_all().len(), 2);
        assert!(sched.is_empty());
    }
}
