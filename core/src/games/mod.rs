//! Game engines.
//!
//! Each engine is a pure function family over (session state, random
//! draws, active effects) producing a Settlement. Engines never touch
//! the ledger; the casino orchestration applies settlements atomically.

pub mod blackjack;
pub mod coinflip;
pub mod higher_lower;
pub mod roulette;
pub mod slots;

use crate::types::Money;
use serde::{Deserialize, Serialize};

pub use coinflip::CoinFace;
pub use higher_lower::HiLoGuess;
pub use roulette::RouletteChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Push,
}

/// Terminal outcome of a game round.
///
/// `payout` is the gross credit to the player: 2x the wager on an even
/// win, the wager itself on a push, zero on a loss. The wager was
/// already debited when the round started. `house_delta` is the house
/// account's leg; house participation differs per game (a blackjack
/// bust, for instance, has no house leg).
#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    pub outcome: Outcome,
    pub payout: Money,
    pub house_delta: Money,
    pub detail: SettlementDetail,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum SettlementDetail {
    Blackjack { player: i64, dealer: i64 },
    Coinflip { landed: CoinFace },
    HigherLower { reference: i64, drawn: i64 },
    Roulette { number: u8 },
    Slots { reels: [String; 3] },
}
