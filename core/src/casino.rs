//! Casino orchestration.
//!
//! Wagers are debited atomically before a session is created; payouts
//! are credited atomically at settlement, together with the house leg.
//! The pure rules live in `games`; this module moves the money and owns
//! the session lifecycle.

use crate::command::{Bet, Caller, GameView, Reply};
use crate::engine::EconomyEngine;
use crate::error::{EconError, EconResult};
use crate::games::{blackjack, coinflip, higher_lower, roulette, slots};
use crate::games::{CoinFace, HiLoGuess, RouletteChoice, Settlement};
use crate::scheduler::Deferred;
use crate::session::{GameKind, SessionState};
use crate::types::Money;

impl EconomyEngine {
    // ── Blackjack ──────────────────────────────────────────────

    pub(crate) fn start_blackjack(&mut self, caller: &Caller, bet: Bet) -> EconResult<Reply> {
        self.sessions.ensure_vacant(&caller.id, GameKind::Blackjack)?;
        let wager = self.stake(&caller.id, bet)?;
        self.store.debit(&caller.id, wager)?;

        let player = blackjack::draw(&mut self.rng);
        let dealer = blackjack::draw(&mut self.rng);
        self.sessions.begin(
            &caller.id,
            GameKind::Blackjack,
            wager,
            SessionState::Blackjack { player, dealer },
        )?;
        Ok(Reply::GameStarted {
            kind: GameKind::Blackjack,
            wager,
            view: GameView::Blackjack { player, dealer },
        })
    }

    pub(crate) fn blackjack_hit(&mut self, caller: &Caller) -> EconResult<Reply> {
        let card = blackjack::draw(&mut self.rng);
        let session = self
            .sessions
            .get_mut(&caller.id, GameKind::Blackjack)
            .ok_or_else(|| EconError::NotFound("blackjack session".into()))?;
        let wager = session.wager;
        let SessionState::Blackjack { player, dealer } = &mut session.state else {
            return Err(EconError::NotFound("blackjack session".into()));
        };
        *player += card;
        let (player, dealer) = (*player, *dealer);

        if player > blackjack::BUST_LIMIT {
            let settlement = blackjack::settle_bust(player, dealer);
            return self.apply_settlement(&caller.id, GameKind::Blackjack, wager, settlement);
        }
        Ok(Reply::GameProgress {
            view: GameView::Blackjack { player, dealer },
        })
    }

    pub(crate) fn blackjack_stand(&mut self, caller: &Caller) -> EconResult<Reply> {
        let session = self
            .sessions
            .get(&caller.id, GameKind::Blackjack)
            .ok_or_else(|| EconError::NotFound("blackjack session".into()))?;
        let wager = session.wager;
        let SessionState::Blackjack { player, dealer } = session.state else {
            return Err(EconError::NotFound("blackjack session".into()));
        };
        let dealer = blackjack::dealer_play(dealer, &mut self.rng);
        let settlement = blackjack::settle_stand(player, dealer, wager);
        self.apply_settlement(&caller.id, GameKind::Blackjack, wager, settlement)
    }

    // ── Coinflip ───────────────────────────────────────────────

    pub(crate) fn start_coinflip(&mut self, caller: &Caller, bet: Bet) -> EconResult<Reply> {
        self.sessions.ensure_vacant(&caller.id, GameKind::Coinflip)?;
        let wager = self.stake(&caller.id, bet)?;
        self.store.debit(&caller.id, wager)?;
        self.sessions
            .begin(&caller.id, GameKind::Coinflip, wager, SessionState::Coinflip)?;
        Ok(Reply::GameStarted {
            kind: GameKind::Coinflip,
            wager,
            view: GameView::Coinflip { wager },
        })
    }

    pub(crate) fn call_coin(&mut self, caller: &Caller, face: CoinFace) -> EconResult<Reply> {
        let session = self
            .sessions
            .get(&caller.id, GameKind::Coinflip)
            .ok_or_else(|| EconError::NotFound("coinflip session".into()))?;
        let wager = session.wager;
        let bonus = self.modifiers_for(&caller.id)?.win_bonus(GameKind::Coinflip);
        let settlement = coinflip::flip(face, bonus, wager, &mut self.rng);
        self.apply_settlement(&caller.id, GameKind::Coinflip, wager, settlement)
    }

    // ── Higher or lower ────────────────────────────────────────

    pub(crate) fn start_higher_lower(&mut self, caller: &Caller, bet: Bet) -> EconResult<Reply> {
        self.sessions
            .ensure_vacant(&caller.id, GameKind::HigherLower)?;
        let wager = self.stake(&caller.id, bet)?;
        self.store.debit(&caller.id, wager)?;

        let drawn = higher_lower::draw(&mut self.rng);
        self.sessions.begin(
            &caller.id,
            GameKind::HigherLower,
            wager,
            SessionState::HigherLower {
                reference: higher_lower::REFERENCE,
                drawn,
            },
        )?;
        Ok(Reply::GameStarted {
            kind: GameKind::HigherLower,
            wager,
            view: GameView::HigherLower {
                reference: higher_lower::REFERENCE,
                wager,
            },
        })
    }

    pub(crate) fn resolve_higher_lower(
        &mut self,
        caller: &Caller,
        guess: HiLoGuess,
    ) -> EconResult<Reply> {
        let session = self
            .sessions
            .get(&caller.id, GameKind::HigherLower)
            .ok_or_else(|| EconError::NotFound("higher-or-lower session".into()))?;
        let wager = session.wager;
        let SessionState::HigherLower { reference, drawn } = session.state else {
            return Err(EconError::NotFound("higher-or-lower session".into()));
        };
        let settlement = higher_lower::settle(reference, drawn, guess, wager);
        self.apply_settlement(&caller.id, GameKind::HigherLower, wager, settlement)
    }

    // ── Roulette (deferred settlement) ─────────────────────────

    pub(crate) fn start_roulette(
        &mut self,
        caller: &Caller,
        bet: Bet,
        choice: RouletteChoice,
    ) -> EconResult<Reply> {
        self.sessions.ensure_vacant(&caller.id, GameKind::Roulette)?;
        let wager = self.stake(&caller.id, bet)?;
        self.store.debit(&caller.id, wager)?;

        let session = self.sessions.begin(
            &caller.id,
            GameKind::Roulette,
            wager,
            SessionState::Roulette { choice },
        )?;
        let session_id = session.id;
        let due_ms = self.clock.now_ms() + self.catalog.rules.roulette_spin_delay_ms;
        self.scheduler
            .schedule(session_id, &caller.id, GameKind::Roulette, due_ms);
        Ok(Reply::Spinning {
            kind: GameKind::Roulette,
            wager,
            choice: choice.label(),
        })
    }

    /// Fire one due deferred settlement. A stale entry whose session is
    /// gone (or replaced) is a no-op.
    pub(crate) fn fire_deferred(&mut self, entry: Deferred) -> EconResult<Option<Reply>> {
        let Some(session) = self.sessions.get(&entry.owner, entry.kind) else {
            return Ok(None);
        };
        if session.id != entry.session_id {
            return Ok(None);
        }
        match entry.kind {
            GameKind::Roulette => self.settle_roulette(&entry.owner).map(Some),
            _ => Ok(None),
        }
    }

    fn settle_roulette(&mut self, owner: &str) -> EconResult<Reply> {
        let session = self
            .sessions
            .get(owner, GameKind::Roulette)
            .ok_or_else(|| EconError::NotFound("roulette session".into()))?;
        let wager = session.wager;
        let SessionState::Roulette { choice } = session.state else {
            return Err(EconError::NotFound("roulette session".into()));
        };
        let number = roulette::spin(&mut self.rng);
        let settlement = roulette::settle(choice, number, wager);
        self.apply_settlement(owner, GameKind::Roulette, wager, settlement)
    }

    // ── Slots (synchronous, no session) ────────────────────────

    pub(crate) fn play_slots(&mut self, caller: &Caller, bet: Money) -> EconResult<Reply> {
        let wager = self.stake(&caller.id, Bet::Amount(bet))?;
        let reels = slots::spin(&mut self.rng);
        let settlement = slots::settle(reels, wager);
        self.store
            .settle_round(&caller.id, wager, settlement.payout)?;
        let balance = self.store.balance(&caller.id)?;
        log::info!(
            "{} slots wager ${wager} -> {:?} ${}",
            caller.id,
            settlement.outcome,
            settlement.payout
        );
        Ok(Reply::Settled {
            kind: GameKind::Slots,
            wager,
            settlement,
            balance,
        })
    }

    // ── Settlement application ─────────────────────────────────

    /// Credit the payout and the house leg atomically, then destroy the
    /// session. On a storage failure the session survives unresolved so
    /// the terminal action can be retried.
    fn apply_settlement(
        &mut self,
        user: &str,
        kind: GameKind,
        wager: Money,
        settlement: Settlement,
    ) -> EconResult<Reply> {
        self.store
            .settle_game(user, settlement.payout, &self.house, settlement.house_delta)?;
        self.sessions.resolve(user, kind);
        let balance = self.store.balance(user)?;
        log::info!(
            "{user} {} wager ${wager} -> {:?} ${}",
            kind.label(),
            settlement.outcome,
            settlement.payout
        );
        Ok(Reply::Settled {
            kind,
            wager,
            settlement,
            balance,
        })
    }
}
