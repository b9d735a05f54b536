//! hustle-core: a persistent multi-player virtual-economy engine.
//!
//! Users accumulate currency via jobs, passive-income assets, and
//! chance-based games; money and ownership persist in SQLite while game
//! sessions and pending loan offers live in memory. The chat transport
//! is an external collaborator: it parses whatever it receives into a
//! typed [`command::Command`], calls [`engine::EconomyEngine::handle`],
//! and renders the typed [`command::Reply`].

pub mod accounts;
pub mod assets;
pub mod casino;
pub mod catalog;
pub mod clock;
pub mod command;
pub mod effects;
pub mod engine;
pub mod error;
pub mod games;
pub mod jobs;
pub mod loans;
pub mod locks;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod types;
