//! Blackjack, simplified to additive integer totals.
//!
//! No deck or suit model: every draw is uniform in [1, 11] and re-draws
//! are unbounded. The dealer stands at 17.

use super::{Outcome, Settlement, SettlementDetail};
use crate::rng::EconomyRng;
use crate::types::Money;

pub const BUST_LIMIT: i64 = 21;
pub const DEALER_STAND: i64 = 17;

/// One card draw, uniform in [1, 11].
pub fn draw(rng: &mut EconomyRng) -> i64 {
    rng.range_i64(1, 11)
}

/// Dealer draws until reaching DEALER_STAND or busting.
pub fn dealer_play(mut dealer: i64, rng: &mut EconomyRng) -> i64 {
    while dealer < DEALER_STAND {
        dealer += draw(rng);
    }
    dealer
}

/// Player hit that went over the limit. The bet is forfeited; the house
/// takes no leg on a bust.
pub fn settle_bust(player: i64, dealer: i64) -> Settlement {
    debug_assert!(player > BUST_LIMIT);
    Settlement {
        outcome: Outcome::Loss,
        payout: 0,
        house_delta: 0,
        detail: SettlementDetail::Blackjack { player, dealer },
    }
}

/// Stand: compare against the dealer's finished hand.
pub fn settle_stand(player: i64, dealer: i64, wager: Money) -> Settlement {
    let detail = SettlementDetail::Blackjack { player, dealer };
    if dealer > BUST_LIMIT || player > dealer {
        Settlement {
            outcome: Outcome::Win,
            payout: wager * 2,
            house_delta: -wager,
            detail,
        }
    } else if player < dealer {
        Settlement {
            outcome: Outcome::Loss,
            payout: 0,
            house_delta: wager,
            detail,
        }
    } else {
        Settlement {
            outcome: Outcome::Push,
            payout: wager,
            house_delta: 0,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dealer_always_reaches_stand_threshold() {
        let mut rng = EconomyRng::new(7);
        for _ in 0..100 {
            let finished = dealer_play(2, &mut rng);
            assert!(finished >= DEALER_STAND);
        }
    }

    #[test]
    fn stand_settlement_table() {
        // Dealer bust pays double.
        let s = settle_stand(18, 24, 100);
        assert_eq!(s.outcome, Outcome::Win);
        assert_eq!(s.payout, 200);
        assert_eq!(s.house_delta, -100);

        // Higher dealer hand loses the wager to the house.
        let s = settle_stand(17, 20, 100);
        assert_eq!(s.outcome, Outcome::Loss);
        assert_eq!(s.payout, 0);
        assert_eq!(s.house_delta, 100);

        // Equal totals push the wager back.
        let s = settle_stand(19, 19, 100);
        assert_eq!(s.outcome, Outcome::Push);
        assert_eq!(s.payout, 100);
        assert_eq!(s.house_delta, 0);
    }

    #[test]
    fn bust_forfeits_without_house_leg() {
        let s = settle_bust(25, 9);
        assert_eq!(s.outcome, Outcome::Loss);
        assert_eq!(s.payout, 0);
        assert_eq!(s.house_delta, 0);
    }
}
