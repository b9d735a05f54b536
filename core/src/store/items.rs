//! Consumable inventory and time-bound active effects.

use super::EconStore;
use crate::error::EconResult;
use crate::types::EpochMs;
use rusqlite::{params, OptionalExtension};

impl EconStore {
    pub fn grant_item(&self, user: &str, item: &str, quantity: i64) -> EconResult<()> {
        self.conn.execute(
            "INSERT INTO inventory (user_id, item, quantity) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, item) DO UPDATE SET quantity = quantity + excluded.quantity",
            params![user, item, quantity],
        )?;
        Ok(())
    }

    pub fn item_quantity(&self, user: &str, item: &str) -> EconResult<i64> {
        Ok(self
            .conn
            .query_row(
                "SELECT quantity FROM inventory WHERE user_id = ?1 AND item = ?2",
                params![user, item],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0))
    }

    pub fn inventory_of(&self, user: &str) -> EconResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT item, quantity FROM inventory
             WHERE user_id = ?1 AND quantity > 0
             ORDER BY item ASC",
        )?;
        let rows = stmt
            .query_map(params![user], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Consume one unit and activate (or refresh) the item's effect as
    /// one transaction. Returns false without mutation when nothing was
    /// held.
    pub fn apply_consumable(
        &self,
        user: &str,
        item: &str,
        expires_at_ms: EpochMs,
    ) -> EconResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "UPDATE inventory SET quantity = quantity - 1
             WHERE user_id = ?1 AND item = ?2 AND quantity > 0",
            params![user, item],
        )?;
        if rows == 0 {
            return Ok(false);
        }
        tx.execute(
            "INSERT OR REPLACE INTO active_effects (user_id, item, expires_at_ms)
             VALUES (?1, ?2, ?3)",
            params![user, item, expires_at_ms],
        )?;
        tx.commit()?;
        Ok(true)
    }

    // ── Active effects ─────────────────────────────────────────

    /// Items with a live effect for this user.
    pub fn active_effect_items(&self, user: &str, now: EpochMs) -> EconResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT item FROM active_effects WHERE user_id = ?1 AND expires_at_ms > ?2",
        )?;
        let rows = stmt
            .query_map(params![user, now], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn effect_expiry(&self, user: &str, item: &str) -> EconResult<Option<EpochMs>> {
        self.conn
            .query_row(
                "SELECT expires_at_ms FROM active_effects WHERE user_id = ?1 AND item = ?2",
                params![user, item],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Background sweep: delete rows whose expiry has passed.
    pub fn sweep_expired_effects(&self, now: EpochMs) -> EconResult<usize> {
        let rows = self.conn.execute(
            "DELETE FROM active_effects WHERE expires_at_ms <= ?1",
            params![now],
        )?;
        Ok(rows)
    }
}
