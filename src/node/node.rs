//! `Node` is the per-node consensus engine: the DAG view, chit map, conflict sets and
//! the repeated-subsampling voting loop that drives transactions toward acceptance.
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use colored::Colorize;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::conflict_set::ConflictSet;
use crate::error::{Error, Result};
use crate::id::{TxId, Utxo};
use crate::node::peer::PeerHandle;
use crate::transaction::Transaction;

static NEXT_NODE_NAME: AtomicU64 = AtomicU64::new(0);

fn default_node_name() -> String {
    format!("node_{}", NEXT_NODE_NAME.fetch_add(1, Ordering::Relaxed))
}

/// A single participant's view of consensus.
///
/// `Node` owns the transactions it has observed, their chits, the per-UTXO conflict
/// sets, the set of already-queried transactions, its peer roster and its protocol
/// parameters. Nothing here is shared with any other `Node` — two nodes that both know
/// about the "same" transaction each hold an independently owned [`Transaction`] value
/// keyed by the same [`TxId`].
#[derive(Debug)]
pub struct Node {
    name: String,
    transactions: HashMap<TxId, Transaction>,
    /// Insertion order of `transactions`, so that `run`'s traversal of the unqueried
    /// set is reproducible instead of depending on hash-map iteration order.
    order: Vec<TxId>,
    chits: HashMap<TxId, u8>,
    conflicts: HashMap<Utxo, ConflictSet<TxId>>,
    queried: HashSet<TxId>,
    /// Forward adjacency (parent -> children), maintained on `receive` to make
    /// `confidence` a bounded walk instead of a full scan of `transactions`.
    children: HashMap<TxId, Vec<TxId>>,
    peers: HashSet<PeerHandle>,
    /// The first parentless transaction this node received. Scoped per node rather
    /// than shared process-wide state, since genesis designation can differ across
    /// nodes in an asynchronous network.
    genesis: Option<TxId>,
    k: usize,
    alpha: f64,
    beta1: u64,
    beta2: u64,
    rng: StdRng,
}

impl Node {
    /// Construct an empty node with the given protocol parameters.
    ///
    /// `name` defaults to a process-wide counter-derived label
    /// (`node_0`, `node_1`, ...) used only for display and logging.
    pub fn new(name: Option<String>, alpha: f64, k: usize, beta1: u64, beta2: u64) -> Self {
        Node::with_seed(name, alpha, k, beta1, beta2, None)
    }

    /// Like [`Node::new`], but with an explicit sampling seed for reproducible runs.
    pub fn with_seed(
        name: Option<String>,
        alpha: f64,
        k: usize,
        beta1: u64,
        beta2: u64,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Node {
            name: name.unwrap_or_else(default_node_name),
            transactions: HashMap::new(),
            order: Vec::new(),
            chits: HashMap::new(),
            conflicts: HashMap::new(),
            queried: HashSet::new(),
            children: HashMap::new(),
            peers: HashSet::new(),
            genesis: None,
            k,
            alpha,
            beta1,
            beta2,
            rng,
        }
    }

    /// Construct a node from a [`Config`] bundle.
    pub fn from_config(name: Option<String>, config: &Config) -> Self {
        Node::with_seed(name, config.alpha, config.k, config.beta1, config.beta2, config.seed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> colored::ColoredString {
        format!("[{}]", self.name).cyan()
    }

    pub fn transactions(&self) -> &HashMap<TxId, Transaction> {
        &self.transactions
    }

    pub fn chits(&self) -> &HashMap<TxId, u8> {
        &self.chits
    }

    pub fn conflicts(&self) -> &HashMap<Utxo, ConflictSet<TxId>> {
        &self.conflicts
    }

    pub fn queried(&self) -> &HashSet<TxId> {
        &self.queried
    }

    pub fn genesis(&self) -> Option<TxId> {
        self.genesis
    }

    pub fn peers(&self) -> &HashSet<PeerHandle> {
        &self.peers
    }

    /// Set the peer roster. Intended to be called once, before the first `run`. A
    /// node should not include a [`PeerHandle`] pointing at itself: `query` would then
    /// try to re-borrow its own `RefCell` and panic.
    pub fn set_peers(&mut self, peers: HashSet<PeerHandle>) {
        self.peers = peers;
    }

    /// Idempotent ingest of a transaction.
    pub fn receive(&mut self, tx: Transaction) {
        if self.transactions.contains_key(&tx.id()) {
            trace!(tx = %tx.id(), "receive: already known");
            return;
        }

        if tx.is_genesis_candidate() && self.genesis.is_none() {
            self.genesis = Some(tx.id());
            info!(node = %self.name, tx = %tx.id(), "designated genesis");
        }

        match self.conflicts.entry(tx.utxo()) {
            Entry::Occupied(mut o) => {
                o.get_mut().insert(tx.id());
            }
            Entry::Vacant(v) => {
                v.insert(ConflictSet::new(tx.id()));
            }
        }

        for parent in tx.parents().iter() {
            self.children.entry(*parent).or_default().push(tx.id());
        }

        debug!(node = %self.name, tx = %tx.id(), utxo = tx.utxo(), "received transaction");
        self.order.push(tx.id());
        self.chits.insert(tx.id(), 0);
        self.transactions.insert(tx.id(), tx);
    }

    /// Whether `tx` is strongly preferred: every ancestor, reached by the transitive
    /// closure of `parents`, is its UTXO's preferred member.
    pub fn is_strongly_preferred(&self, tx: &Transaction) -> bool {
        if tx.is_genesis_candidate() {
            return self.genesis == Some(tx.id());
        }

        let mut seen = HashSet::new();
        let mut frontier: VecDeque<TxId> = tx.parents().iter().cloned().collect();
        while let Some(ancestor_id) = frontier.pop_front() {
            if !seen.insert(ancestor_id) {
                continue;
            }
            let ancestor = match self.transactions.get(&ancestor_id) {
                Some(t) => t,
                None => {
                    warn!(
                        node = %self.name, tx = %tx.id(), ancestor = %ancestor_id,
                        "ancestor never received; treating as not strongly preferred"
                    );
                    return false;
                }
            };
            let cs = match self.conflicts.get(&ancestor.utxo()) {
                Some(cs) => cs,
                None => {
                    warn!(
                        node = %self.name, tx = %tx.id(), ancestor = %ancestor_id,
                        "ancestor's UTXO has no conflict set; treating as not strongly preferred"
                    );
                    return false;
                }
            };
            if !cs.is_preferred(&ancestor_id) {
                return false;
            }
            frontier.extend(ancestor.parents().iter().cloned());
        }
        true
    }

    /// Sum of chits over `tx` and its chit-bearing descendants.
    ///
    /// Memoized for the duration of one call: chits only move within a `run` cycle,
    /// never while `confidence` itself is executing, so reusing a cache across the
    /// single recursive walk is sound.
    pub fn confidence(&self, tx: TxId) -> Result<u64> {
        let mut memo = HashMap::new();
        self.confidence_memo(tx, &mut memo)
    }

    fn confidence_memo(&self, tx: TxId, memo: &mut HashMap<TxId, u64>) -> Result<u64> {
        if let Some(cached) = memo.get(&tx) {
            return Ok(*cached);
        }
        let chit = *self.chits.get(&tx).ok_or(Error::UnknownTransaction(tx))? as u64;
        let mut total = chit;
        if let Some(children) = self.children.get(&tx) {
            for &child in children {
                if self.chits.get(&child).copied().unwrap_or(0) == 1 {
                    total += self.confidence_memo(child, memo)?;
                }
            }
        }
        memo.insert(tx, total);
        Ok(total)
    }

    /// Peer-callable: ingest `tx`, then report strong preference.
    pub fn query(&mut self, tx: Transaction) -> bool {
        let check = tx.clone();
        self.receive(tx);
        self.is_strongly_preferred(&check)
    }

    /// One voting round over every not-yet-queried transaction.
    pub fn run(&mut self) -> Result<()> {
        let unqueried: Vec<TxId> =
            self.order.iter().cloned().filter(|id| !self.queried.contains(id)).collect();

        for tx_id in unqueried {
            if self.peers.len() < self.k {
                return Err(Error::InsufficientPeers { have: self.peers.len(), need: self.k });
            }

            let tx = self.transactions.get(&tx_id).cloned().expect("tracked in `order`");

            let candidates: Vec<PeerHandle> = self.peers.iter().cloned().collect();
            let sample: Vec<PeerHandle> =
                candidates.choose_multiple(&mut self.rng, self.k).cloned().collect();

            let positives = sample.iter().filter(|peer| peer.query(tx.clone())).count();
            let threshold = (self.alpha * self.k as f64).floor() as usize;

            trace!(
                node = %self.name, tx = %tx_id, positives, threshold, sampled = sample.len(),
                "query round complete"
            );

            if positives >= threshold {
                self.chits.insert(tx_id, 1);
                info!(node = %self.name, tx = %tx_id, "{} chit set", self.tag());
                for parent_id in tx.parents().iter().cloned() {
                    self.update_conflict_set_on_positive(parent_id)?;
                }
            }

            self.queried.insert(tx_id);
        }
        Ok(())
    }

    /// Apply a positive-vote conflict-set update to `parent_id`.
    ///
    /// Preference is decided first, from a snapshot of confidences taken before any
    /// mutation; `last`/`count` are updated afterward. Only `tx`'s parents are
    /// updated here, never `tx` itself — the protocol rewards the ancestor chain, not
    /// the vote target directly.
    fn update_conflict_set_on_positive(&mut self, parent_id: TxId) -> Result<()> {
        let parent = match self.transactions.get(&parent_id) {
            Some(p) => p.clone(),
            None => {
                warn!(
                    node = %self.name, parent = %parent_id,
                    "parent of a chit-bearing transaction was never received; skipping its conflict-set update"
                );
                return Ok(());
            }
        };
        let utxo = parent.utxo();

        let preferred_id = self
            .conflicts
            .get(&utxo)
            .map(|cs| cs.preferred)
            .expect("receive() always creates a conflict set for a known transaction's UTXO");

        let parent_confidence = self.confidence(parent_id)?;
        let preferred_confidence = self.confidence(preferred_id)?;

        let cs = self.conflicts.get_mut(&utxo).expect("checked above");
        if parent_confidence > preferred_confidence {
            cs.preferred = parent_id;
            debug!(node = %self.name, utxo, preferred = %parent_id, "preference updated");
        }
        if parent_id != cs.last {
            cs.last = parent_id;
            cs.count = 0;
        } else {
            cs.count += 1;
        }
        Ok(())
    }

    /// Read-only acceptance query. Never mutates state.
    pub fn is_accepted(&self, tx_id: TxId) -> Result<bool> {
        let tx = self.transactions.get(&tx_id).ok_or(Error::UnknownTransaction(tx_id))?;

        let mut early_commit = true;
        for parent_id in tx.parents().iter().cloned() {
            if !self.is_accepted(parent_id)? {
                early_commit = false;
                break;
            }
        }
        if early_commit {
            early_commit = self
                .conflicts
                .get(&tx.utxo())
                .map(|cs| cs.is_singleton())
                .unwrap_or(false);
        }
        if early_commit {
            early_commit = self.confidence(tx_id)? > self.beta1;
        }
        if early_commit {
            return Ok(true);
        }

        if let Some(cs) = self.conflicts.get(&tx.utxo()) {
            if cs.is_preferred(&tx_id) && cs.count > self.beta2 {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
