//! Asset shops, purchases, and passive-income accrual.

use crate::catalog::AssetClass;
use crate::command::{Caller, Reply, ShopEntry};
use crate::engine::EconomyEngine;
use crate::error::{EconError, EconResult};
use crate::types::Money;

impl EconomyEngine {
    /// The illegal market is gated behind a minimum balance, both for
    /// browsing and buying.
    fn check_illegal_gate(&self, user: &str) -> EconResult<()> {
        let gate = self.catalog.rules.illegal_shop_gate;
        if self.store.balance(user)? < gate {
            return Err(EconError::invalid(format!(
                "you need ${gate} to enter the illegal market"
            )));
        }
        Ok(())
    }

    pub(crate) fn shop(&mut self, caller: &Caller, class: AssetClass) -> EconResult<Reply> {
        if class == AssetClass::IllegalBusiness {
            self.check_illegal_gate(&caller.id)?;
        }
        let entries = match class {
            AssetClass::House => self
                .catalog
                .houses
                .iter()
                .enumerate()
                .map(|(index, a)| ShopEntry {
                    index,
                    name: a.name.clone(),
                    price: a.price,
                    hourly_income: Some(a.hourly_income),
                    produces: None,
                })
                .collect(),
            AssetClass::Business => self
                .catalog
                .businesses
                .iter()
                .enumerate()
                .map(|(index, a)| ShopEntry {
                    index,
                    name: a.name.clone(),
                    price: a.price,
                    hourly_income: Some(a.hourly_income),
                    produces: None,
                })
                .collect(),
            AssetClass::IllegalBusiness => self
                .catalog
                .illegal_businesses
                .iter()
                .enumerate()
                .map(|(index, b)| ShopEntry {
                    index,
                    name: b.name.clone(),
                    price: b.price,
                    hourly_income: None,
                    produces: Some(b.drug.clone()),
                })
                .collect(),
        };
        Ok(Reply::Shop { class, entries })
    }

    pub(crate) fn buy_asset(
        &mut self,
        caller: &Caller,
        class: AssetClass,
        index: usize,
    ) -> EconResult<Reply> {
        let (name, price) = self
            .catalog
            .asset(class, index)
            .map(|(name, price)| (name.to_string(), price))
            .ok_or_else(|| EconError::NotFound(format!("{} #{index}", class.label())))?;
        if class == AssetClass::IllegalBusiness {
            self.check_illegal_gate(&caller.id)?;
        }
        if self.store.owns_asset(&caller.id, class, index)? {
            return Err(EconError::AlreadyOwned);
        }
        self.store.purchase_asset(&caller.id, class, index, price)?;
        log::info!("{} bought {} '{name}' for ${price}", caller.id, class.label());
        Ok(Reply::Bought { class, name, price })
    }

    /// Claim accrued passive income: whole elapsed hours times the sum
    /// of owned incomes, plus one consumable per owned illegal business.
    pub(crate) fn collect_passive(&mut self, caller: &Caller) -> EconResult<Reply> {
        let account = self.store.require_account(&caller.id)?;
        let houses = self.store.owned_assets(&caller.id, AssetClass::House)?;
        let businesses = self.store.owned_assets(&caller.id, AssetClass::Business)?;
        let illegal = self
            .store
            .owned_assets(&caller.id, AssetClass::IllegalBusiness)?;
        if houses.is_empty() && businesses.is_empty() && illegal.is_empty() {
            return Err(EconError::invalid("you have no passive income"));
        }

        let now = self.clock.now_ms();
        let interval = self.catalog.rules.passive_interval_ms;
        let elapsed = now - account.last_passive_ms;
        let hours = elapsed / interval;
        if hours < 1 {
            return Err(EconError::CooldownActive {
                remaining_ms: interval - elapsed,
            });
        }

        let base: Money = houses
            .iter()
            .map(|&i| self.catalog.hourly_income(AssetClass::House, i))
            .chain(
                businesses
                    .iter()
                    .map(|&i| self.catalog.hourly_income(AssetClass::Business, i)),
            )
            .sum();
        let mods = self.modifiers_for(&caller.id)?;
        let income = ((base * hours) as f64 * mods.income_multiplier).floor() as Money;

        let grants: Vec<&str> = illegal
            .iter()
            .filter_map(|&i| self.catalog.drug_for_illegal(i))
            .collect();

        self.store.claim_passive(&caller.id, income, now, &grants)?;
        log::info!(
            "{} collected ${income} passive income over {hours}h",
            caller.id
        );
        Ok(Reply::PassiveCollected {
            hours,
            income,
            drugs: grants.into_iter().map(String::from).collect(),
        })
    }

    pub(crate) fn admin_remove_asset(
        &mut self,
        caller: &Caller,
        from: &str,
        class: AssetClass,
        index: usize,
    ) -> EconResult<Reply> {
        self.require_admin(caller)?;
        let name = self
            .catalog
            .asset(class, index)
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| EconError::NotFound(format!("{} #{index}", class.label())))?;
        if !self.store.remove_asset(from, class, index)? {
            return Err(EconError::NotFound(format!(
                "{} '{name}' owned by {from}",
                class.label()
            )));
        }
        log::info!("admin {} removed {} '{name}' from {from}", caller.id, class.label());
        Ok(Reply::AssetRemoved {
            user: from.to_string(),
            class,
            name,
        })
    }
}
