//! Higher-or-lower: predict whether a hidden [1, 100] draw beats the
//! fixed reference of 50. Equality is a push.

use super::{Outcome, Settlement, SettlementDetail};
use crate::rng::EconomyRng;
use crate::types::Money;
use serde::{Deserialize, Serialize};

pub const REFERENCE: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiLoGuess {
    Higher,
    Lower,
}

impl std::str::FromStr for HiLoGuess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "higher" | "hi" => Ok(HiLoGuess::Higher),
            "lower" | "lo" => Ok(HiLoGuess::Lower),
            other => Err(format!("'{other}' is not higher or lower")),
        }
    }
}

/// The hidden number, drawn when the session starts.
pub fn draw(rng: &mut EconomyRng) -> i64 {
    rng.range_i64(1, 100)
}

pub fn settle(reference: i64, drawn: i64, guess: HiLoGuess, wager: Money) -> Settlement {
    let detail = SettlementDetail::HigherLower { reference, drawn };
    if drawn == reference {
        return Settlement {
            outcome: Outcome::Push,
            payout: wager,
            house_delta: 0,
            detail,
        };
    }
    let correct = match guess {
        HiLoGuess::Higher => drawn > reference,
        HiLoGuess::Lower => drawn < reference,
    };
    if correct {
        Settlement {
            outcome: Outcome::Win,
            payout: wager * 2,
            house_delta: -wager,
            detail,
        }
    } else {
        Settlement {
            outcome: Outcome::Loss,
            payout: 0,
            house_delta: wager,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_pushes_the_wager_back() {
        let s = settle(50, 50, HiLoGuess::Higher, 40);
        assert_eq!(s.outcome, Outcome::Push);
        assert_eq!(s.payout, 40);
        assert_eq!(s.house_delta, 0);
    }

    #[test]
    fn correct_guess_pays_double() {
        let s = settle(50, 82, HiLoGuess::Higher, 40);
        assert_eq!(s.outcome, Outcome::Win);
        assert_eq!(s.payout, 80);

        let s = settle(50, 12, HiLoGuess::Higher, 40);
        assert_eq!(s.outcome, Outcome::Loss);
        assert_eq!(s.payout, 0);
        assert_eq!(s.house_delta, 40);
    }
}
