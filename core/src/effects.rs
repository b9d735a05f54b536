//! Active-effect aggregation.
//!
//! Effects are consulted, never consumed, by reads: the live
//! `active_effects` rows are mapped through the catalog's effect table
//! into one Modifiers value per operation. Expired rows are removed by
//! the poll sweep; a row whose expiry has passed is already ignored by
//! the store query, so the sweep is housekeeping, not correctness.

use crate::catalog::{Boost, Catalog};
use crate::clock::MINUTE_MS;
use crate::command::{Caller, Reply};
use crate::engine::EconomyEngine;
use crate::error::{EconError, EconResult};
use crate::session::GameKind;
use crate::types::EpochMs;

/// Aggregate modifiers from a user's live effects.
#[derive(Debug, Clone)]
pub struct Modifiers {
    /// Scales passive-income claims. 1.0 = unmodified.
    pub income_multiplier: f64,
    /// Scales work payouts. 1.0 = unmodified.
    pub work_multiplier: f64,
    /// Subtracted from the work cooldown window.
    pub cooldown_reduction_ms: EpochMs,
    win_bonus: Vec<(GameKind, f64)>,
}

impl Modifiers {
    pub fn none() -> Self {
        Self {
            income_multiplier: 1.0,
            work_multiplier: 1.0,
            cooldown_reduction_ms: 0,
            win_bonus: Vec::new(),
        }
    }

    /// Fold the named live items through the catalog's effect table.
    /// Unknown items are skipped (a removed catalog entry must not brick
    /// the account).
    pub fn from_items<S: AsRef<str>>(catalog: &Catalog, items: &[S]) -> Self {
        let mut mods = Modifiers::none();
        for item in items {
            let Some(spec) = catalog.drug(item.as_ref()) else {
                log::warn!("active effect for unknown item '{}'", item.as_ref());
                continue;
            };
            match spec.boost {
                Boost::IncomeMultiplier { percent } => {
                    mods.income_multiplier += percent as f64 / 100.0;
                }
                Boost::WorkPayoutMultiplier { percent } => {
                    mods.work_multiplier += percent as f64 / 100.0;
                }
                Boost::WinChance { game, percent } => {
                    mods.win_bonus.push((game, percent as f64 / 100.0));
                }
                Boost::CooldownReduction { minutes } => {
                    mods.cooldown_reduction_ms += minutes * MINUTE_MS;
                }
            }
        }
        mods
    }

    /// Win-probability bonus for one game kind.
    pub fn win_bonus(&self, kind: GameKind) -> f64 {
        self.win_bonus
            .iter()
            .filter(|(g, _)| *g == kind)
            .map(|(_, b)| b)
            .sum()
    }
}

impl EconomyEngine {
    /// Consume one unit of a named item and activate its effect with a
    /// fresh expiry. Re-using an item refreshes the single effect row
    /// rather than stacking a second one.
    pub(crate) fn use_item(&mut self, caller: &Caller, item: &str) -> EconResult<Reply> {
        let (name, duration_ms) = self
            .catalog
            .drug(item)
            .map(|spec| (spec.name.clone(), spec.duration_ms))
            .ok_or_else(|| EconError::NotFound(format!("item '{item}'")))?;
        let expires_at_ms = self.clock.now_ms() + duration_ms;
        if !self.store.apply_consumable(&caller.id, &name, expires_at_ms)? {
            return Err(EconError::invalid(format!("you don't have any {name}")));
        }
        log::info!("{} used {name}", caller.id);
        Ok(Reply::ItemUsed {
            item: name,
            expires_at_ms,
        })
    }
}
