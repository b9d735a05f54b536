//! Shared primitive types used across the entire engine.

/// Opaque user identity, assigned by the chat transport.
pub type UserId = String;

/// Integer currency units. Balances never go below zero; the floor is
/// enforced at debit time, not as a stored invariant.
pub type Money = i64;

/// Epoch milliseconds.
pub type EpochMs = i64;

/// Row id of a persisted loan.
pub type LoanId = i64;
