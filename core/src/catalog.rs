//! Static catalog data: job ladder, asset shops, consumables.
//!
//! The engine consumes these tables as read-only configuration. Content
//! balancing is out of scope; `builtin()` carries the live tables,
//! `load()` reads the same shape from a JSON file.

use crate::clock::HOUR_MS;
use crate::session::GameKind;
use crate::types::{EpochMs, Money};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRank {
    pub title: String,
    pub hourly_pay: Money,
    /// Times worked at this rank before a promotion is granted.
    pub promotion_threshold: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTier {
    pub ranks: Vec<JobRank>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSpec {
    pub name: String,
    pub price: Money,
    pub hourly_income: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IllegalBusinessSpec {
    pub name: String,
    pub price: Money,
    /// Consumable produced per passive-income claim.
    pub drug: String,
}

/// The one numeric modifier an active effect applies, and where.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Boost {
    IncomeMultiplier { percent: i64 },
    WorkPayoutMultiplier { percent: i64 },
    WinChance { game: GameKind, percent: i64 },
    CooldownReduction { minutes: i64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugSpec {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub duration_ms: EpochMs,
    pub boost: Boost,
}

/// Engine tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub work_cooldown_ms: EpochMs,
    pub work_hours_min: i64,
    pub work_hours_max: i64,
    pub passive_interval_ms: EpochMs,
    /// Balance required to see (or buy from) the illegal shop.
    pub illegal_shop_gate: Money,
    pub roulette_spin_delay_ms: EpochMs,
    pub leaderboard_size: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            work_cooldown_ms: 30 * 60 * 1000,
            work_hours_min: 3,
            work_hours_max: 8,
            passive_interval_ms: HOUR_MS,
            illegal_shop_gate: 1_000_000,
            roulette_spin_delay_ms: 500,
            leaderboard_size: 10,
        }
    }
}

/// Asset classes with per-class ownership tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    House,
    Business,
    IllegalBusiness,
}

impl AssetClass {
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::House => "house",
            AssetClass::Business => "business",
            AssetClass::IllegalBusiness => "illegal business",
        }
    }
}

impl std::str::FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "house" => Ok(AssetClass::House),
            "business" => Ok(AssetClass::Business),
            "illegal" | "illegal_business" => Ok(AssetClass::IllegalBusiness),
            other => Err(format!("unknown asset class '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Tier 0 is the sentinel "None" job: unreachable by promotion,
    /// reachable only by quitting.
    pub jobs: Vec<JobTier>,
    pub houses: Vec<AssetSpec>,
    pub businesses: Vec<AssetSpec>,
    pub illegal_businesses: Vec<IllegalBusinessSpec>,
    pub drugs: Vec<DrugSpec>,
    #[serde(default)]
    pub rules: Rules,
}

impl Catalog {
    /// Load from a JSON file. In tests, use `Catalog::builtin()`.
    pub fn load(path: &str) -> crate::error::EconResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn job(&self, tier: usize, rank: usize) -> Option<&JobRank> {
        self.jobs.get(tier).and_then(|t| t.ranks.get(rank))
    }

    /// Find the tier whose entry rank matches `name` (case-insensitive).
    /// Only entry ranks are reachable by job acquisition.
    pub fn entry_tier(&self, name: &str) -> Option<usize> {
        let wanted = name.to_ascii_lowercase();
        (1..self.jobs.len()).find(|&tier| {
            self.jobs[tier]
                .ranks
                .first()
                .is_some_and(|r| r.title.to_ascii_lowercase() == wanted)
        })
    }

    pub fn top_rank(&self, tier: usize) -> usize {
        self.jobs.get(tier).map_or(0, |t| t.ranks.len() - 1)
    }

    /// Name and price of an asset, any class.
    pub fn asset(&self, class: AssetClass, index: usize) -> Option<(&str, Money)> {
        match class {
            AssetClass::House => self.houses.get(index).map(|a| (a.name.as_str(), a.price)),
            AssetClass::Business => self
                .businesses
                .get(index)
                .map(|a| (a.name.as_str(), a.price)),
            AssetClass::IllegalBusiness => self
                .illegal_businesses
                .get(index)
                .map(|a| (a.name.as_str(), a.price)),
        }
    }

    /// Hourly passive income of an owned asset. Illegal businesses pay in
    /// drugs, not currency.
    pub fn hourly_income(&self, class: AssetClass, index: usize) -> Money {
        match class {
            AssetClass::House => self.houses.get(index).map_or(0, |a| a.hourly_income),
            AssetClass::Business => self.businesses.get(index).map_or(0, |a| a.hourly_income),
            AssetClass::IllegalBusiness => 0,
        }
    }

    pub fn drug(&self, name: &str) -> Option<&DrugSpec> {
        let wanted = name.to_ascii_lowercase();
        self.drugs
            .iter()
            .find(|d| d.name.to_ascii_lowercase() == wanted)
    }

    /// The consumable produced by an illegal business slot.
    pub fn drug_for_illegal(&self, index: usize) -> Option<&str> {
        self.illegal_businesses
            .get(index)
            .map(|b| b.drug.as_str())
    }

    pub fn builtin() -> Self {
        fn tier(entries: &[(&str, Money, i64)]) -> JobTier {
            JobTier {
                ranks: entries
                    .iter()
                    .map(|&(title, hourly_pay, promotion_threshold)| JobRank {
                        title: title.into(),
                        hourly_pay,
                        promotion_threshold,
                    })
                    .collect(),
            }
        }
        fn asset(name: &str, price: Money, hourly_income: Money) -> AssetSpec {
            AssetSpec {
                name: name.into(),
                price,
                hourly_income,
            }
        }

        Self {
            jobs: vec![
                tier(&[("None", 0, 1000)]),
                tier(&[("Cashier", 10, 5), ("Stocker", 15, 8), ("Manager", 20, 1000)]),
                tier(&[
                    ("Burger Flipper", 6, 6),
                    ("Assistant Manager", 14, 4),
                    ("Manager", 24, 1000),
                ]),
                tier(&[
                    ("Intern", 5, 5),
                    ("Junior Developer", 30, 20),
                    ("Senior Developer", 60, 50),
                    ("Tech Lead", 125, 1000),
                ]),
                tier(&[
                    ("Nurse", 10, 10),
                    ("Doctor", 25, 20),
                    ("Surgeon", 50, 50),
                    ("Chief Surgeon", 130, 1000),
                ]),
                tier(&[
                    ("Street Performer", 5, 20),
                    ("Actor", 30, 15),
                    ("Director", 50, 50),
                    ("Producer", 135, 1000),
                ]),
            ],
            houses: vec![
                asset("Studio Apartment", 1_000, 10),
                asset("Suite", 2_000, 20),
                asset("Bungalow", 5_000, 50),
                asset("Duplex", 10_000, 100),
                asset("Townhouse", 20_000, 200),
                asset("Mansion", 100_000, 1_000),
            ],
            businesses: vec![
                asset("Food Truck", 100_000, 1_100),
                asset("Laundromat", 150_000, 1_700),
                asset("Gas Station", 225_000, 2_400),
                asset("Clothing Store", 300_000, 3_500),
                asset("Car Dealership", 500_000, 5_600),
                asset("Chain Supermarket", 1_000_000, 11_000),
            ],
            illegal_businesses: vec![
                IllegalBusinessSpec {
                    name: "Weed Farm".into(),
                    price: 1_250_000,
                    drug: "Weed".into(),
                },
                IllegalBusinessSpec {
                    name: "Cocaine Lockup".into(),
                    price: 1_500_000,
                    drug: "Cocaine".into(),
                },
                IllegalBusinessSpec {
                    name: "Acid Lab".into(),
                    price: 2_000_000,
                    drug: "LSD".into(),
                },
                IllegalBusinessSpec {
                    name: "Meth Lab".into(),
                    price: 2_500_000,
                    drug: "Meth".into(),
                },
            ],
            drugs: vec![
                DrugSpec {
                    name: "Weed".into(),
                    description: "+10% passive income for one hour".into(),
                    price: 5_000,
                    duration_ms: HOUR_MS,
                    boost: Boost::IncomeMultiplier { percent: 10 },
                },
                DrugSpec {
                    name: "Cocaine".into(),
                    description: "+25% money from work for one hour".into(),
                    price: 15_000,
                    duration_ms: HOUR_MS,
                    boost: Boost::WorkPayoutMultiplier { percent: 25 },
                },
                DrugSpec {
                    name: "LSD".into(),
                    description: "+20% win chance in coinflip for one hour".into(),
                    price: 25_000,
                    duration_ms: HOUR_MS,
                    boost: Boost::WinChance {
                        game: GameKind::Coinflip,
                        percent: 20,
                    },
                },
                DrugSpec {
                    name: "Meth".into(),
                    description: "-10 minutes from work cooldown for one hour".into(),
                    price: 50_000,
                    duration_ms: HOUR_MS,
                    boost: Boost::CooldownReduction { minutes: 10 },
                },
            ],
            rules: Rules::default(),
        }
    }
}
