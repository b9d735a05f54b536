//! Slots: three independent reels, resolved synchronously.
//!
//! Never spans multiple interactions, so no session object exists for
//! it. The house takes no leg.

use super::{Outcome, Settlement, SettlementDetail};
use crate::rng::EconomyRng;
use crate::types::Money;

pub const SYMBOLS: [&str; 6] = ["🍒", "🍋", "🍊", "🍉", "7️⃣", "⭐"];

pub const TRIPLE_MULTIPLIER: Money = 5;
pub const PAIR_MULTIPLIER: Money = 2;

pub fn spin(rng: &mut EconomyRng) -> [&'static str; 3] {
    [
        *rng.pick(&SYMBOLS),
        *rng.pick(&SYMBOLS),
        *rng.pick(&SYMBOLS),
    ]
}

pub fn settle(reels: [&str; 3], wager: Money) -> Settlement {
    let detail = SettlementDetail::Slots {
        reels: [reels[0].to_string(), reels[1].to_string(), reels[2].to_string()],
    };
    let triple = reels[0] == reels[1] && reels[1] == reels[2];
    let pair = reels[0] == reels[1] || reels[1] == reels[2] || reels[0] == reels[2];
    let payout = if triple {
        wager * TRIPLE_MULTIPLIER
    } else if pair {
        wager * PAIR_MULTIPLIER
    } else {
        0
    };
    Settlement {
        outcome: if payout > 0 { Outcome::Win } else { Outcome::Loss },
        payout,
        house_delta: 0,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payout_tiers() {
        assert_eq!(settle(["⭐", "⭐", "⭐"], 10).payout, 50);
        assert_eq!(settle(["⭐", "⭐", "🍒"], 10).payout, 20);
        assert_eq!(settle(["🍒", "⭐", "🍒"], 10).payout, 20);
        let s = settle(["🍒", "⭐", "🍋"], 10);
        assert_eq!(s.payout, 0);
        assert_eq!(s.outcome, Outcome::Loss);
    }
}
