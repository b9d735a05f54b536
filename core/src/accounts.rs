//! Account-level operations: profiles, leaderboard, transfers, and the
//! privileged balance adjustments.

use crate::catalog::AssetClass;
use crate::command::{Caller, ItemCount, LeaderboardEntry, ProfileView, Reply};
use crate::engine::EconomyEngine;
use crate::error::{EconError, EconResult};
use crate::types::Money;

impl EconomyEngine {
    pub(crate) fn view(&mut self, caller: &Caller, target: Option<&str>) -> EconResult<Reply> {
        let subject = target.unwrap_or(&caller.id);
        if subject != caller.id {
            self.store.ensure_peer(subject, self.clock.now_ms())?;
        }
        let account = self.store.require_account(subject)?;

        let named = |class: AssetClass, indices: Vec<usize>| -> Vec<String> {
            indices
                .into_iter()
                .map(|i| {
                    self.catalog
                        .asset(class, i)
                        .map(|(name, _)| name.to_string())
                        .unwrap_or_else(|| format!("Unknown #{i}"))
                })
                .collect()
        };

        let house_indices = self.store.owned_assets(subject, AssetClass::House)?;
        let business_indices = self.store.owned_assets(subject, AssetClass::Business)?;
        let illegal_indices = self
            .store
            .owned_assets(subject, AssetClass::IllegalBusiness)?;

        let passive_rate: Money = house_indices
            .iter()
            .map(|&i| self.catalog.hourly_income(AssetClass::House, i))
            .chain(
                business_indices
                    .iter()
                    .map(|&i| self.catalog.hourly_income(AssetClass::Business, i)),
            )
            .sum();

        let inventory = self
            .store
            .inventory_of(subject)?
            .into_iter()
            .map(|(item, quantity)| ItemCount { item, quantity })
            .collect();

        Ok(Reply::Profile(ProfileView {
            id: account.id.clone(),
            name: account.name.clone(),
            balance: account.balance,
            job_title: account.job.clone(),
            passive_rate,
            houses: named(AssetClass::House, house_indices),
            businesses: named(AssetClass::Business, business_indices),
            illegal_businesses: named(AssetClass::IllegalBusiness, illegal_indices),
            inventory,
        }))
    }

    pub(crate) fn leaderboard(&self, count: Option<usize>) -> EconResult<Reply> {
        let count = count.unwrap_or(self.catalog.rules.leaderboard_size);
        let entries = self
            .store
            .top_accounts(count)?
            .into_iter()
            .map(|(name, balance)| LeaderboardEntry { name, balance })
            .collect();
        Ok(Reply::Leaderboard { entries })
    }

    pub(crate) fn give(&mut self, caller: &Caller, to: &str, amount: Money) -> EconResult<Reply> {
        if amount <= 0 {
            return Err(EconError::invalid("amount must be positive"));
        }
        if to == caller.id {
            return Err(EconError::invalid("you cannot give money to yourself"));
        }
        self.store.ensure_peer(to, self.clock.now_ms())?;
        self.store.transfer(&caller.id, to, amount)?;
        let to_name = self.store.display_name(to)?;
        log::info!("{} gave ${amount} to {to}", caller.id);
        Ok(Reply::Transferred { to_name, amount })
    }

    pub(crate) fn admin_give(
        &mut self,
        caller: &Caller,
        to: &str,
        amount: Money,
    ) -> EconResult<Reply> {
        self.require_admin(caller)?;
        if amount <= 0 {
            return Err(EconError::invalid("amount must be positive"));
        }
        self.store.ensure_peer(to, self.clock.now_ms())?;
        self.store.credit(to, amount)?;
        log::info!("admin {} granted ${amount} to {to}", caller.id);
        Ok(Reply::BalanceAdjusted {
            user: to.to_string(),
            new_balance: self.store.balance(to)?,
        })
    }

    pub(crate) fn admin_remove(
        &mut self,
        caller: &Caller,
        from: &str,
        amount: Money,
    ) -> EconResult<Reply> {
        self.require_admin(caller)?;
        if amount <= 0 {
            return Err(EconError::invalid("amount must be positive"));
        }
        self.store.ensure_peer(from, self.clock.now_ms())?;
        self.store.debit(from, amount)?;
        log::info!("admin {} removed ${amount} from {from}", caller.id);
        Ok(Reply::BalanceAdjusted {
            user: from.to_string(),
            new_balance: self.store.balance(from)?,
        })
    }
}
