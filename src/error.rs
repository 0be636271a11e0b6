//! Crate-wide error type: a plain enum, `Display` forwarding to `Debug`, and a type
//! alias for `Result`, in place of `thiserror`/`anyhow` for the handful of module-local
//! error kinds this crate needs.

use crate::id::TxId;

#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// `run()` was asked to sample `k` peers but fewer than `k` are registered. Treated
    /// as a precondition failure rather than falling back to sampling whatever smaller
    /// population is available.
    InsufficientPeers { have: usize, need: usize },
    /// `is_accepted` or `confidence` was queried for a transaction this node never
    /// received.
    UnknownTransaction(TxId),
    /// A [`Config`](crate::config::Config) file failed to load or deserialize.
    InvalidConfig,
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
