//! The typed command-and-argument model.
//!
//! The chat transport parses whatever it receives (text, buttons, select
//! menus) into a Command and renders the Reply; the engine never sees
//! free-form strings and never formats user-facing text.

use crate::catalog::AssetClass;
use crate::games::{CoinFace, HiLoGuess, RouletteChoice, Settlement};
use crate::session::GameKind;
use crate::types::{EpochMs, LoanId, Money, UserId};
use serde::{Deserialize, Serialize};

/// Who issued the command. The transport authenticates; the engine only
/// checks the admin flag for privileged commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caller {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub admin: bool,
}

impl Caller {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            admin: false,
        }
    }

    pub fn admin(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            admin: true,
            ..Self::new(id, name)
        }
    }
}

/// A wager: a literal amount or the caller's entire balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bet {
    All,
    Amount(Money),
}

impl std::str::FromStr for Bet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Bet::All);
        }
        s.parse::<Money>()
            .map(Bet::Amount)
            .map_err(|_| format!("'{s}' is not a bet amount"))
    }
}

/// All player-issued commands and interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    // ── Jobs ──────────────────────────────────────
    Work,
    Jobs,
    GetJob { name: String },
    QuitJob,
    Promote,

    // ── Economy ───────────────────────────────────
    View { target: Option<UserId> },
    Leaderboard { count: Option<usize> },
    Give { to: UserId, amount: Money },
    Passive,

    // ── Shops ─────────────────────────────────────
    HouseShop,
    BusinessShop,
    IllegalBusinessShop,
    BuyAsset { class: AssetClass, index: usize },

    // ── Casino ────────────────────────────────────
    Blackjack { bet: Bet },
    Hit,
    Stand,
    Coinflip { bet: Bet },
    CallCoin { face: CoinFace },
    HigherOrLower { bet: Bet },
    Guess { guess: HiLoGuess },
    Roulette { bet: Bet, choice: RouletteChoice },
    Slots { bet: Money },

    // ── Consumables ───────────────────────────────
    Use { item: String },

    // ── Loans ─────────────────────────────────────
    OfferLoan {
        borrower: UserId,
        amount: Money,
        interest: f64,
        days: i64,
    },
    AcceptLoan,
    DeclineLoan,
    Repay { loan_id: LoanId },
    MyLoans,
    MyDebts,

    // ── Privileged ────────────────────────────────
    AdminGive { to: UserId, amount: Money },
    AdminRemove { from: UserId, amount: Money },
    AdminRemoveAsset {
        from: UserId,
        class: AssetClass,
        index: usize,
    },
    Shutdown,
}

// ── Reply views ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: UserId,
    pub name: String,
    pub balance: Money,
    pub job_title: String,
    /// Hourly currency accrual from owned houses and legal businesses.
    pub passive_rate: Money,
    pub houses: Vec<String>,
    pub businesses: Vec<String>,
    pub illegal_businesses: Vec<String>,
    pub inventory: Vec<ItemCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemCount {
    pub item: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobTierView {
    pub titles: Vec<String>,
    pub hourly_pay: Vec<Money>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopEntry {
    pub index: usize,
    pub name: String,
    pub price: Money,
    pub hourly_income: Option<Money>,
    /// Consumable produced per passive claim (illegal businesses).
    pub produces: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanView {
    pub id: LoanId,
    pub lender: UserId,
    pub lender_name: String,
    pub borrower: UserId,
    pub borrower_name: String,
    pub principal: Money,
    pub interest: f64,
    pub due_ms: EpochMs,
    pub paid: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanRole {
    Lender,
    Borrower,
}

/// Mid-game position shown to the player.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum GameView {
    Blackjack { player: i64, dealer: i64 },
    Coinflip { wager: Money },
    HigherLower { reference: i64, wager: Money },
}

/// Typed command results; the transport renders these.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    Worked {
        title: String,
        hours: i64,
        payout: Money,
    },
    JobBoard {
        tiers: Vec<JobTierView>,
    },
    JobTaken {
        title: String,
    },
    JobQuit,
    Promoted {
        title: String,
    },
    PromotionProgress {
        remaining: i64,
    },
    TopRank,
    Profile(ProfileView),
    Leaderboard {
        entries: Vec<LeaderboardEntry>,
    },
    Transferred {
        to_name: String,
        amount: Money,
    },
    BalanceAdjusted {
        user: UserId,
        new_balance: Money,
    },
    Shop {
        class: AssetClass,
        entries: Vec<ShopEntry>,
    },
    Bought {
        class: AssetClass,
        name: String,
        price: Money,
    },
    AssetRemoved {
        user: UserId,
        class: AssetClass,
        name: String,
    },
    PassiveCollected {
        hours: i64,
        income: Money,
        drugs: Vec<String>,
    },
    ItemUsed {
        item: String,
        expires_at_ms: EpochMs,
    },
    GameStarted {
        kind: GameKind,
        wager: Money,
        view: GameView,
    },
    GameProgress {
        view: GameView,
    },
    Spinning {
        kind: GameKind,
        wager: Money,
        choice: String,
    },
    Settled {
        kind: GameKind,
        wager: Money,
        settlement: Settlement,
        balance: Money,
    },
    LoanOffered {
        borrower_name: String,
        amount: Money,
        interest: f64,
        days: i64,
    },
    LoanAccepted {
        loan_id: LoanId,
        lender_name: String,
        amount: Money,
    },
    LoanDeclined {
        lender_name: String,
    },
    LoanRepaid {
        loan_id: LoanId,
        total: Money,
        lender_name: String,
    },
    Loans {
        role: LoanRole,
        loans: Vec<LoanView>,
    },
    ShutdownComplete {
        cancelled_settlements: usize,
    },
}
