//! Lightweight, non-cryptographic identities.
//!
//! UTXO tags stay plain integers: there is no cryptographic UTXO commitment in this
//! simulator, just a bare equatable/hashable key. Transaction identity gets its own
//! newtype instead of a bare integer, the way most identifiers in this codebase are
//! wrapped (`zfx_id::Id`, `TxHash`, `CellHash`) rather than passed around raw.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A UTXO tag. Any equatable, hashable value would key a conflict set; small integers
/// suffice for simulation.
pub type Utxo = u64;

static NEXT_TX_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of a [`Transaction`](crate::transaction::Transaction).
///
/// Equality and hashing are by identity: two transactions with identical `utxo` and
/// `parents` are still distinct. `Transaction::new` hands out a fresh `TxId` from a
/// process-wide counter; nothing about the counter's value is otherwise observable, so
/// it carries none of the process-wide-state concerns that motivate threading genesis
/// and peer sets per-simulation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(u64);

impl TxId {
    pub(crate) fn fresh() -> Self {
        TxId(NEXT_TX_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tx_{}", self.0)
    }
}
