//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Operations call store methods — they never execute SQL directly.

use crate::error::{EconError, EconResult};
use crate::types::{EpochMs, Money, UserId};
use rusqlite::{params, Connection, OptionalExtension};

mod assets;
mod items;
mod ledger;
mod loans;

pub use loans::LoanRow;

pub struct EconStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

/// One persisted account. Created lazily on first interaction with a
/// floor balance of 0; never deleted.
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: UserId,
    pub name: String,
    pub job: String,
    pub job_tier: usize,
    pub job_rank: usize,
    pub balance: Money,
    pub times_worked: i64,
    pub last_work_ms: EpochMs,
    pub last_passive_ms: EpochMs,
}

impl AccountRow {
    /// Tier 0 is the sentinel "unemployed" state.
    pub fn has_job(&self) -> bool {
        self.job_tier != 0
    }
}

impl EconStore {
    pub fn open(path: &str) -> EconResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EconResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a new isolated database.
    pub fn reopen(&self) -> EconResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EconResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Accounts ───────────────────────────────────────────────

    /// Create the caller's account if unseen and keep the display name
    /// fresh (the transport sends the current name on every command).
    pub fn ensure_account(&self, id: &str, name: &str, now: EpochMs) -> EconResult<()> {
        self.conn.execute(
            "INSERT INTO accounts (id, name, last_passive_ms) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![id, name, now],
        )?;
        Ok(())
    }

    /// Create a counterparty account if unseen, without a known name.
    pub fn ensure_peer(&self, id: &str, now: EpochMs) -> EconResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO accounts (id, name, last_passive_ms)
             VALUES (?1, 'Unknown', ?2)",
            params![id, now],
        )?;
        Ok(())
    }

    pub fn account(&self, id: &str) -> EconResult<Option<AccountRow>> {
        self.conn
            .query_row(
                "SELECT id, name, job, job_tier, job_rank, balance,
                        times_worked, last_work_ms, last_passive_ms
                 FROM accounts WHERE id = ?1",
                params![id],
                |row| {
                    Ok(AccountRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        job: row.get(2)?,
                        job_tier: row.get::<_, i64>(3)? as usize,
                        job_rank: row.get::<_, i64>(4)? as usize,
                        balance: row.get(5)?,
                        times_worked: row.get(6)?,
                        last_work_ms: row.get(7)?,
                        last_passive_ms: row.get(8)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn require_account(&self, id: &str) -> EconResult<AccountRow> {
        self.account(id)?
            .ok_or_else(|| EconError::NotFound(format!("account {id}")))
    }

    pub fn display_name(&self, id: &str) -> EconResult<String> {
        Ok(self
            .conn
            .query_row(
                "SELECT name FROM accounts WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or_else(|| "Unknown".to_string()))
    }

    /// Assign a job (or the sentinel). The work counter always resets on
    /// a job change.
    pub fn set_job(&self, id: &str, title: &str, tier: usize, rank: usize) -> EconResult<()> {
        self.conn.execute(
            "UPDATE accounts SET job = ?1, job_tier = ?2, job_rank = ?3, times_worked = 0
             WHERE id = ?4",
            params![title, tier as i64, rank as i64, id],
        )?;
        Ok(())
    }

    /// Credit a work payout, bump the counter, stamp the cooldown.
    pub fn record_work(&self, id: &str, payout: Money, now: EpochMs) -> EconResult<()> {
        self.conn.execute(
            "UPDATE accounts
             SET balance = balance + ?1, times_worked = times_worked + 1, last_work_ms = ?2
             WHERE id = ?3",
            params![payout, now, id],
        )?;
        Ok(())
    }
}
