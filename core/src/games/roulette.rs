//! Roulette over a single-zero wheel.
//!
//! A straight number bet pays 35x; red/black/odd/even pay 2x with zero
//! excluded. Settlement is deferred by the scheduler to simulate the
//! spin; this module only classifies and pays.

use super::{Outcome, Settlement, SettlementDetail};
use crate::rng::EconomyRng;
use crate::types::Money;
use serde::{Deserialize, Serialize};

/// Red pockets of the standard 18/18 partition. Zero is neither color.
const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

pub const STRAIGHT_MULTIPLIER: Money = 35;
pub const EVEN_MONEY_MULTIPLIER: Money = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouletteChoice {
    Number(u8),
    Red,
    Black,
    Odd,
    Even,
}

impl RouletteChoice {
    pub fn label(&self) -> String {
        match self {
            RouletteChoice::Number(n) => n.to_string(),
            RouletteChoice::Red => "red".into(),
            RouletteChoice::Black => "black".into(),
            RouletteChoice::Odd => "odd".into(),
            RouletteChoice::Even => "even".into(),
        }
    }
}

impl std::str::FromStr for RouletteChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(RouletteChoice::Red),
            "black" => Ok(RouletteChoice::Black),
            "odd" => Ok(RouletteChoice::Odd),
            "even" => Ok(RouletteChoice::Even),
            other => match other.parse::<u8>() {
                Ok(n) if n <= 36 => Ok(RouletteChoice::Number(n)),
                _ => Err(format!(
                    "'{other}' is not a number (0-36), red, black, odd, or even"
                )),
            },
        }
    }
}

pub fn is_red(number: u8) -> bool {
    RED_NUMBERS.contains(&number)
}

pub fn is_black(number: u8) -> bool {
    number != 0 && !is_red(number)
}

/// Spin the wheel: uniform over [0, 36].
pub fn spin(rng: &mut EconomyRng) -> u8 {
    rng.next_u64_below(37) as u8
}

fn wins(choice: RouletteChoice, number: u8) -> bool {
    match choice {
        RouletteChoice::Number(n) => n == number,
        RouletteChoice::Red => is_red(number),
        RouletteChoice::Black => is_black(number),
        RouletteChoice::Odd => number != 0 && number % 2 == 1,
        RouletteChoice::Even => number != 0 && number % 2 == 0,
    }
}

/// The house covers the full gross payout on a win and keeps the wager
/// on a loss.
pub fn settle(choice: RouletteChoice, number: u8, wager: Money) -> Settlement {
    let detail = SettlementDetail::Roulette { number };
    if wins(choice, number) {
        let payout = match choice {
            RouletteChoice::Number(_) => wager * STRAIGHT_MULTIPLIER,
            _ => wager * EVEN_MONEY_MULTIPLIER,
        };
        Settlement {
            outcome: Outcome::Win,
            payout,
            house_delta: -payout,
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
    fn color_partition_is_eighteen_apiece() {
        let reds = (1..=36).filter(|&n| is_red(n)).count();
        let blacks = (1..=36).filter(|&n| is_black(n)).count();
        assert_eq!(reds, 18);
        assert_eq!(blacks, 18);
        assert!(!is_red(0));
        assert!(!is_black(0));
    }

    #[test]
    fn straight_match_pays_thirty_five_to_one() {
        let s = settle(RouletteChoice::Number(17), 17, 100);
        assert_eq!(s.outcome, Outcome::Win);
        assert_eq!(s.payout, 3500);
        assert_eq!(s.house_delta, -3500);
    }

    #[test]
    fn even_money_bets_pay_double_and_zero_loses_them() {
        let s = settle(RouletteChoice::Red, 32, 100);
        assert_eq!(s.payout, 200);

        for choice in [
            RouletteChoice::Red,
            RouletteChoice::Black,
            RouletteChoice::Odd,
            RouletteChoice::Even,
        ] {
            let s = settle(choice, 0, 100);
            assert_eq!(s.outcome, Outcome::Loss);
            assert_eq!(s.payout, 0);
            assert_eq!(s.house_delta, 100);
        }
    }
}
