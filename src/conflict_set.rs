//! [ConflictSet] tracks the transactions competing for a single UTXO.
use std::collections::HashSet;

/// The set of transactions sharing a UTXO, along with the consensus bookkeeping used
/// to decide which of them wins.
///
/// A conflict set of size one never had a competitor show up; such a transaction is
/// eligible for early commit once its confidence clears `beta1`. Once a second
/// transaction spends the same UTXO, only sustained agreement on one preferred member
/// for `beta2` consecutive rounds decides it.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ConflictSet<T: Eq + std::hash::Hash> {
    /// Every transaction known to spend this UTXO.
    pub members: HashSet<T>,
    /// The currently preferred member.
    pub preferred: T,
    /// The member that most recently won a positive-vote round.
    pub last: T,
    /// Consecutive positive-vote rounds in which `last` has been the winner.
    pub count: u64,
}

impl<T> ConflictSet<T>
where
    T: Eq + std::hash::Hash + Clone,
{
    /// Create a new singleton conflict set from the first transaction seen for a UTXO.
    pub fn new(t: T) -> Self {
        let mut members = HashSet::new();
        members.insert(t.clone());
        ConflictSet { members, preferred: t.clone(), last: t, count: 0 }
    }

    /// Add a transaction to the conflict set. Leaves `preferred`/`last`/`count`
    /// untouched: membership and preference update independently.
    pub fn insert(&mut self, t: T) {
        self.members.insert(t);
    }

    /// Whether `t` is the currently preferred member.
    pub fn is_preferred(&self, t: &T) -> bool {
        &self.preferred == t
    }

    /// Whether this conflict set has never had more than one competing transaction.
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}
