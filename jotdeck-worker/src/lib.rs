//! # Jotdeck Search Worker Library
//!
//! Drives the asynchronous search workflow: items created in the searching
//! state are claimed from the database, sent to the external search
//! provider, and written back with either the result markdown or the
//! user-visible failure note.
//!
//! ## Modules
//!
//! - `queue`: claims items with pending searches (stale-claim redelivery)
//! - `provider`: the `SearchProvider` trait, Perplexity client, and mock
//! - `orchestrator`: the poll-claim-dispatch loop and terminal write-back
//! - `config`: environment-driven configuration

pub mod config;
pub mod orchestrator;
pub mod provider;
pub mod queue;
