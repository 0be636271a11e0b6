//! [Transaction] is the immutable DAG vertex that consensus runs over.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::id::{TxId, Utxo};

static NEXT_NAME: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("tx_{}", NEXT_NAME.fetch_add(1, Ordering::Relaxed))
}

/// An immutable transaction: an identity, the UTXO it spends, and its parents in the
/// DAG.
///
/// Construction always mints a fresh [`TxId`]; two `Transaction`s built from identical
/// `utxo`/`parents` are still distinct values. `name` is cosmetic, used only by
/// `Display` and log output.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TxId,
    name: String,
    utxo: Utxo,
    parents: HashSet<TxId>,
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Transaction {}

impl std::hash::Hash for Transaction {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Transaction {
    /// Construct a new transaction with a freshly minted identity.
    ///
    /// A transaction with an empty `parents` set is a genesis candidate.
    pub fn new(utxo: Utxo, parents: HashSet<TxId>, name: Option<String>) -> Self {
        Transaction { id: TxId::fresh(), name: name.unwrap_or_else(default_name), utxo, parents }
    }

    /// Convenience constructor for a genesis (parentless) transaction.
    pub fn genesis(utxo: Utxo) -> Self {
        Transaction::new(utxo, HashSet::new(), None)
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn utxo(&self) -> Utxo {
        self.utxo
    }

    pub fn parents(&self) -> &HashSet<TxId> {
        &self.parents
    }

    pub fn is_genesis_candidate(&self) -> bool {
        self.parents.is_empty()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(utxo={}, parents={})", self.name, self.utxo, self.parents.len())
    }
}
