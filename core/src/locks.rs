//! Per-user mutual exclusion.
//!
//! Every multi-step economic operation runs under the owning user's
//! lock so two concurrent commands from the same user cannot interleave
//! a stale read-modify-write. The guard releases on drop, which covers
//! every exit path including errors.

use crate::error::{EconError, EconResult};
use crate::types::UserId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Default, Clone)]
pub struct UserLocks {
    held: Arc<Mutex<HashSet<UserId>>>,
}

pub struct UserGuard {
    held: Arc<Mutex<HashSet<UserId>>>,
    user: UserId,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the user's slot. A second acquisition while one guard is
    /// live is rejected rather than queued; the caller retries.
    pub fn acquire(&self, user: &str) -> EconResult<UserGuard> {
        let mut held = self.held.lock().expect("user lock set poisoned");
        if !held.insert(user.to_string()) {
            return Err(EconError::Busy);
        }
        Ok(UserGuard {
            held: Arc::clone(&self.held),
            user: user.to_string(),
        })
    }

    #[cfg(test)]
    fn is_held(&self, user: &str) -> bool {
        self.held.lock().unwrap().contains(user)
    }
}

impl Drop for UserGuard {
    fn drop(&mut self) {
        let mut held = self.held.lock().expect("user lock set poisoned");
        held.remove(&self.user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquisition_rejected_until_release() {
        let locks = UserLocks::new();
        let guard = locks.acquire("alice").unwrap();
        assert!(matches!(locks.acquire("alice"), Err(EconError::Busy)));
        // Other users are unaffected.
        let _bob = locks.acquire("bob").unwrap();
        drop(guard);
        assert!(!locks.is_held("alice"));
        assert!(locks.acquire("alice").is_ok());
    }

    #[test]
    fn guard_releases_on_error_paths() {
        let locks = UserLocks::new();
        let result: Result<(), ()> = (|| {
            let _g = locks.acquire("alice").map_err(|_| ())?;
            Err(())
        })();
        assert!(result.is_err());
        assert!(!locks.is_held("alice"));
    }
}
