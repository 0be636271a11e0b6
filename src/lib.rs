//! # avalanche-sim
//!
//! A from-scratch, educational implementation of the per-node consensus engine at the
//! heart of an Avalanche-family metastable consensus protocol: a DAG of transactions,
//! per-UTXO conflict sets, recursive confidence over descendants, strong preference by
//! transitive closure over ancestors, and a two-threshold (early-commit / count-based
//! commit) acceptance criterion reached by repeated randomized sampling of peer
//! opinions.
//!
//! ## Scope
//!
//! This crate is the consensus core only. It has no opinion on how transactions are
//! produced, how a network topology is drawn, or how results are displayed — those are
//! the concerns of a terminal renderer, a synthetic client and a simulation driver
//! built on top of it. There is no wire format, no cryptographic validation and no
//! persistence: a "transaction" here is an in-memory value with a UTXO tag and a set of
//! parents, and two transactions sharing a UTXO tag simply conflict.
//!
//! ## Layout
//!
//! - [`transaction`] — the immutable DAG vertex ([`transaction::Transaction`]).
//! - [`conflict_set`] — per-UTXO bookkeeping ([`conflict_set::ConflictSet`]).
//! - [`node`] — the consensus engine itself ([`node::Node`]), plus the in-process peer
//!   handle ([`node::PeerHandle`]) nodes use to call `query` on each other.
//! - [`round`] — the trivial round driver ([`round::run_nodes`]).
//! - [`config`] — protocol-parameter bundle, with an optional file-based loader.
//! - [`error`] — the crate-wide error type.

pub mod conflict_set;
pub mod config;
pub mod error;
pub mod id;
pub mod node;
pub mod round;
pub mod transaction;

pub use config::Config;
pub use error::{Error, Result};
pub use node::{Node, PeerHandle};
pub use round::run_nodes;
pub use transaction::Transaction;

#[cfg(test)]
mod scenario_tests;
