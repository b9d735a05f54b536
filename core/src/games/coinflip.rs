//! Coinflip: call heads or tails, win pays double.

use super::{Outcome, Settlement, SettlementDetail};
use crate::rng::EconomyRng;
use crate::types::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    pub fn other(&self) -> CoinFace {
        match self {
            CoinFace::Heads => CoinFace::Tails,
            CoinFace::Tails => CoinFace::Heads,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoinFace::Heads => "Heads",
            CoinFace::Tails => "Tails",
        }
    }
}

impl std::str::FromStr for CoinFace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heads" | "h" => Ok(CoinFace::Heads),
            "tails" | "t" => Ok(CoinFace::Tails),
            other => Err(format!("'{other}' is not a coin face")),
        }
    }
}

/// Flip for a player who called `call`. `win_bonus` is the active
/// win-chance modifier (0.0 for an unboosted flip); the coin is biased
/// so the call lands with probability 0.5 + win_bonus, capped at 1.
pub fn flip(call: CoinFace, win_bonus: f64, wager: Money, rng: &mut EconomyRng) -> Settlement {
    let p = (0.5 + win_bonus).min(1.0);
    let won = rng.chance(p);
    let landed = if won { call } else { call.other() };
    if won {
        Settlement {
            outcome: Outcome::Win,
            payout: wager * 2,
            house_delta: -wager,
            detail: SettlementDetail::Coinflip { landed },
        }
    } else {
        Settlement {
            outcome: Outcome::Loss,
            payout: 0,
            house_delta: wager,
            detail: SettlementDetail::Coinflip { landed },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guaranteed_win_at_full_bias() {
        let mut rng = EconomyRng::new(3);
        for _ in 0..50 {
            let s = flip(CoinFace::Heads, 0.5, 10, &mut rng);
            assert_eq!(s.outcome, Outcome::Win);
            assert_eq!(s.payout, 20);
        }
    }

    #[test]
    fn loss_pays_nothing_and_feeds_the_house() {
        let mut rng = EconomyRng::new(3);
        let mut saw_loss = false;
        for _ in 0..100 {
            let s = flip(CoinFace::Heads, 0.0, 10, &mut rng);
            if s.outcome == Outcome::Loss {
                saw_loss = true;
                assert_eq!(s.payout, 0);
                assert_eq!(s.house_delta, 10);
                if let SettlementDetail::Coinflip { landed } = s.detail {
                    assert_eq!(landed, CoinFace::Tails);
                }
            }
        }
        assert!(saw_loss, "100 fair flips should lose at least once");
    }
}
