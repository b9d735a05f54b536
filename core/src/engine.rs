//! The economy engine — command dispatch and lifecycle.
//!
//! RULES:
//!   - Commands arrive as typed values; the engine never parses text.
//!   - Every command runs under the caller's per-user lock.
//!   - All money movement goes through the store's atomic operations.
//!   - All randomness flows through the engine's EconomyRng.

use crate::catalog::{AssetClass, Catalog};
use crate::clock::Clock;
use crate::command::{Bet, Caller, Command, Reply};
use crate::effects::Modifiers;
use crate::error::{EconError, EconResult};
use crate::loans::OfferBook;
use crate::locks::UserLocks;
use crate::rng::EconomyRng;
use crate::scheduler::SettlementScheduler;
use crate::session::{GameKind, SessionRegistry};
use crate::store::EconStore;
use crate::types::{Money, UserId};
use std::sync::Arc;

/// The designated system counterparty for house-edge games. An ordinary
/// account under ordinary debit rules; it is not exempt from the
/// balance floor, so a broke house fails its settlement leg.
pub const HOUSE_ACCOUNT: &str = "house";

pub struct EconomyEngine {
    pub(crate) store: EconStore,
    pub(crate) catalog: Catalog,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) rng: EconomyRng,
    pub(crate) sessions: SessionRegistry,
    pub(crate) offers: OfferBook,
    pub(crate) scheduler: SettlementScheduler,
    pub(crate) locks: UserLocks,
    pub(crate) house: UserId,
}

impl EconomyEngine {
    /// Build a fully wired engine over a migrated store. Pass a seed for
    /// reproducible draws (tests); None seeds from OS entropy.
    pub fn new(
        store: EconStore,
        catalog: Catalog,
        clock: Arc<dyn Clock>,
        seed: Option<u64>,
    ) -> EconResult<Self> {
        let now = clock.now_ms();
        store.ensure_account(HOUSE_ACCOUNT, "The House", now)?;
        Ok(Self {
            store,
            catalog,
            clock,
            rng: seed.map(EconomyRng::new).unwrap_or_else(EconomyRng::from_entropy),
            sessions: SessionRegistry::new(),
            offers: OfferBook::new(),
            scheduler: SettlementScheduler::new(),
            locks: UserLocks::new(),
            house: HOUSE_ACCOUNT.to_string(),
        })
    }

    /// Handle one command. Validation failures make no state change;
    /// a storage error aborts the command's effect wholesale.
    pub fn handle(&mut self, caller: &Caller, command: Command) -> EconResult<Reply> {
        let _guard = self.locks.acquire(&caller.id)?;
        let now = self.clock.now_ms();
        self.store.ensure_account(&caller.id, &caller.name, now)?;
        log::debug!("command from {}: {:?}", caller.id, command);

        match command {
            Command::Work => self.work(caller),
            Command::Jobs => self.job_board(),
            Command::GetJob { name } => self.get_job(caller, &name),
            Command::QuitJob => self.quit_job(caller),
            Command::Promote => self.promote(caller),

            Command::View { target } => self.view(caller, target.as_deref()),
            Command::Leaderboard { count } => self.leaderboard(count),
            Command::Give { to, amount } => self.give(caller, &to, amount),
            Command::Passive => self.collect_passive(caller),

            Command::HouseShop => self.shop(caller, AssetClass::House),
            Command::BusinessShop => self.shop(caller, AssetClass::Business),
            Command::IllegalBusinessShop => {
                self.shop(caller, AssetClass::IllegalBusiness)
            }
            Command::BuyAsset { class, index } => self.buy_asset(caller, class, index),

            Command::Blackjack { bet } => self.start_blackjack(caller, bet),
            Command::Hit => self.blackjack_hit(caller),
            Command::Stand => self.blackjack_stand(caller),
            Command::Coinflip { bet } => self.start_coinflip(caller, bet),
            Command::CallCoin { face } => self.call_coin(caller, face),
            Command::HigherOrLower { bet } => self.start_higher_lower(caller, bet),
            Command::Guess { guess } => self.resolve_higher_lower(caller, guess),
            Command::Roulette { bet, choice } => self.start_roulette(caller, bet, choice),
            Command::Slots { bet } => self.play_slots(caller, bet),

            Command::Use { item } => self.use_item(caller, &item),

            Command::OfferLoan {
                borrower,
                amount,
                interest,
                days,
            } => self.offer_loan(caller, &borrower, amount, interest, days),
            Command::AcceptLoan => self.accept_loan(caller),
            Command::DeclineLoan => self.decline_loan(caller),
            Command::Repay { loan_id } => self.repay_loan(caller, loan_id),
            Command::MyLoans => self.my_loans(caller),
            Command::MyDebts => self.my_debts(caller),

            Command::AdminGive { to, amount } => self.admin_give(caller, &to, amount),
            Command::AdminRemove { from, amount } => self.admin_remove(caller, &from, amount),
            Command::AdminRemoveAsset { from, class, index } => {
                self.admin_remove_asset(caller, &from, class, index)
            }
            Command::Shutdown => self.handle_shutdown(caller),
        }
    }

    /// Housekeeping pass: sweep expired effects and fire due deferred
    /// settlements. The runner calls this between commands; results are
    /// delivered out-of-band, keyed by the owning user.
    pub fn poll(&mut self) -> EconResult<Vec<(UserId, Reply)>> {
        let now = self.clock.now_ms();
        let swept = self.store.sweep_expired_effects(now)?;
        if swept > 0 {
            log::debug!("swept {swept} expired effects");
        }

        let mut delivered = Vec::new();
        for entry in self.scheduler.due(now) {
            // A command for the same user may be mid-flight; try again
            // on the next poll rather than interleaving with it.
            let guard = match self.locks.acquire(&entry.owner) {
                Ok(g) => g,
                Err(_) => {
                    self.scheduler.requeue(entry);
                    continue;
                }
            };
            let owner = entry.owner.clone();
            let kind = entry.kind;
            match self.fire_deferred(entry) {
                Ok(Some(reply)) => delivered.push((owner, reply)),
                Ok(None) => {}
                Err(e) => {
                    // The wager was debited up front; dropping the
                    // settlement is the same loss class as a restart.
                    // The session is forfeited, not left stuck.
                    log::error!("deferred {} settlement for {owner} dropped: {e}", kind.label());
                    self.sessions.resolve(&owner, kind);
                }
            }
            drop(guard);
        }
        Ok(delivered)
    }

    fn handle_shutdown(&mut self, caller: &Caller) -> EconResult<Reply> {
        self.require_admin(caller)?;
        let cancelled = self.shutdown();
        Ok(Reply::ShutdownComplete {
            cancelled_settlements: cancelled,
        })
    }

    /// Orderly shutdown: cancel pending deferred settlements (their
    /// wagers are forfeited) and leave the store ready to drop/close.
    pub fn shutdown(&mut self) -> usize {
        let abandoned = self.scheduler.cancel_all();
        for entry in &abandoned {
            log::warn!(
                "shutdown forfeits pending {} settlement for {}",
                entry.kind.label(),
                entry.owner
            );
        }
        if !self.sessions.is_empty() {
            log::warn!("shutdown wipes {} live game sessions", self.sessions.len());
        }
        abandoned.len()
    }

    // ── Shared helpers ─────────────────────────────────────────

    pub(crate) fn require_admin(&self, caller: &Caller) -> EconResult<()> {
        if caller.admin {
            Ok(())
        } else {
            Err(EconError::PermissionDenied)
        }
    }

    /// Aggregate the caller's live effects into operation modifiers.
    pub(crate) fn modifiers_for(&self, user: &str) -> EconResult<Modifiers> {
        let items = self
            .store
            .active_effect_items(user, self.clock.now_ms())?;
        Ok(Modifiers::from_items(&self.catalog, &items))
    }

    /// Resolve a bet against the current balance. "all" is the entire
    /// balance; a wager must be positive and coverable.
    pub(crate) fn stake(&self, user: &str, bet: Bet) -> EconResult<Money> {
        let balance = self.store.balance(user)?;
        let amount = match bet {
            Bet::All => balance,
            Bet::Amount(a) => a,
        };
        if amount <= 0 {
            return Err(EconError::invalid("bet must be a positive amount"));
        }
        if amount > balance {
            return Err(EconError::InsufficientFunds);
        }
        Ok(amount)
    }

    // ── Accessors (runner and tests) ───────────────────────────

    pub fn store(&self) -> &EconStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn has_session(&self, user: &str, kind: GameKind) -> bool {
        self.sessions.get(user, kind).is_some()
    }

    pub fn pending_settlements(&self) -> usize {
        self.scheduler.len()
    }

    pub fn has_pending_offer(&self, borrower: &str) -> bool {
        self.offers.get(borrower).is_some()
    }
}
