//! Job ladder operations: work, promotion, acquisition, quitting.

use crate::command::{Caller, JobTierView, Reply};
use crate::engine::EconomyEngine;
use crate::error::{EconError, EconResult};
use crate::types::Money;

impl EconomyEngine {
    pub(crate) fn work(&mut self, caller: &Caller) -> EconResult<Reply> {
        let account = self.store.require_account(&caller.id)?;
        if !account.has_job() {
            return Err(EconError::invalid("you have no job"));
        }
        let (title, hourly_pay) = {
            let job = self
                .catalog
                .job(account.job_tier, account.job_rank)
                .ok_or_else(|| EconError::NotFound("job catalog entry".into()))?;
            (job.title.clone(), job.hourly_pay)
        };

        let mods = self.modifiers_for(&caller.id)?;
        let now = self.clock.now_ms();
        let cooldown =
            (self.catalog.rules.work_cooldown_ms - mods.cooldown_reduction_ms).max(0);
        let elapsed = now - account.last_work_ms;
        if elapsed < cooldown {
            return Err(EconError::CooldownActive {
                remaining_ms: cooldown - elapsed,
            });
        }

        let hours = self.rng.range_i64(
            self.catalog.rules.work_hours_min,
            self.catalog.rules.work_hours_max,
        );
        let payout = ((hourly_pay * hours) as f64 * mods.work_multiplier).floor() as Money;
        self.store.record_work(&caller.id, payout, now)?;
        log::info!("{} worked {hours}h as {title} for ${payout}", caller.id);
        Ok(Reply::Worked {
            title,
            hours,
            payout,
        })
    }

    pub(crate) fn promote(&mut self, caller: &Caller) -> EconResult<Reply> {
        let account = self.store.require_account(&caller.id)?;
        if !account.has_job() {
            return Err(EconError::invalid("you have no job"));
        }
        if account.job_rank >= self.catalog.top_rank(account.job_tier) {
            return Ok(Reply::TopRank);
        }
        let threshold = self
            .catalog
            .job(account.job_tier, account.job_rank)
            .map(|j| j.promotion_threshold)
            .ok_or_else(|| EconError::NotFound("job catalog entry".into()))?;

        if account.times_worked < threshold {
            return Ok(Reply::PromotionProgress {
                remaining: threshold - account.times_worked,
            });
        }

        let next_rank = account.job_rank + 1;
        let title = self
            .catalog
            .job(account.job_tier, next_rank)
            .map(|j| j.title.clone())
            .ok_or_else(|| EconError::NotFound("job catalog entry".into()))?;
        self.store
            .set_job(&caller.id, &title, account.job_tier, next_rank)?;
        log::info!("{} promoted to {title}", caller.id);
        Ok(Reply::Promoted { title })
    }

    pub(crate) fn get_job(&mut self, caller: &Caller, name: &str) -> EconResult<Reply> {
        let account = self.store.require_account(&caller.id)?;
        if account.has_job() {
            return Err(EconError::invalid("you already have a job"));
        }
        let tier = self
            .catalog
            .entry_tier(name)
            .ok_or_else(|| EconError::invalid("you can only take an entry-level job"))?;
        let title = self.catalog.jobs[tier].ranks[0].title.clone();
        self.store.set_job(&caller.id, &title, tier, 0)?;
        Ok(Reply::JobTaken { title })
    }

    pub(crate) fn quit_job(&mut self, caller: &Caller) -> EconResult<Reply> {
        let account = self.store.require_account(&caller.id)?;
        if !account.has_job() {
            return Err(EconError::invalid("you have no job to quit"));
        }
        self.store.set_job(&caller.id, "None", 0, 0)?;
        Ok(Reply::JobQuit)
    }

    /// The ladder as shown to players; the sentinel tier is omitted.
    pub(crate) fn job_board(&self) -> EconResult<Reply> {
        let tiers = self
            .catalog
            .jobs
            .iter()
            .skip(1)
            .map(|tier| JobTierView {
                titles: tier.ranks.iter().map(|r| r.title.clone()).collect(),
                hourly_pay: tier.ranks.iter().map(|r| r.hourly_pay).collect(),
            })
            .collect();
        Ok(Reply::JobBoard { tiers })
    }
}
