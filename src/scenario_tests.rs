//! End-to-end consensus scenarios and headline laws, run against a network of 51 nodes
//! all peering to each other (excluding themselves), with the recommended defaults
//! `k = 10, alpha = 0.75, beta1 = beta2 = 10`. Most scenarios hand every node a
//! transaction directly (`inject`), exercising the voting/acceptance logic in
//! isolation from dissemination; [`law_genesis_eventually_accepted_on_every_node`]
//! instead hands a transaction to a single node (`submit_to_one`) and relies on
//! `query`/`receive` gossip to carry it everywhere else, the way a live network would.

use std::collections::HashSet;

use crate::node::{Node, PeerHandle};
use crate::round::run_nodes;
use crate::transaction::Transaction;

const K: usize = 10;
const ALPHA: f64 = 0.75;
const BETA1: u64 = 10;
const BETA2: u64 = 10;
const NETWORK_SIZE: usize = 51;

/// Build `n` nodes, each seeded distinctly, peered to every other node but not itself.
fn build_network(n: usize) -> Vec<PeerHandle> {
    let handles: Vec<PeerHandle> = (0..n)
        .map(|i| PeerHandle::new(Node::with_seed(None, ALPHA, K, BETA1, BETA2, Some(i as u64))))
        .collect();

    for (i, handle) in handles.iter().enumerate() {
        let peers: HashSet<PeerHandle> = handles
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| p.clone())
            .collect();
        handle.with_mut(|node| node.set_peers(peers));
    }
    handles
}

fn inject(handles: &[PeerHandle], tx: &Transaction) {
    for h in handles {
        h.with_mut(|n| n.receive(tx.clone()));
    }
}

/// Submit `tx` to a single node only, the way a client hands a transaction to one node
/// and relies on gossip (`query`'s `receive` side effect) to carry it to the rest of
/// the network.
fn submit_to_one(handle: &PeerHandle, tx: &Transaction) {
    handle.with_mut(|n| n.receive(tx.clone()));
}

#[test]
fn scenario_1_single_chain_both_accepted() {
    let net = build_network(NETWORK_SIZE);

    let tx0 = Transaction::genesis(0);
    inject(&net, &tx0);
    let tx1 = Transaction::new(1, [tx0.id()].into_iter().collect(), None);
    inject(&net, &tx1);

    // A bare two-transaction chain clears neither threshold on its own:
    // confidence(tx1) tops out at 1 (no descendants of its own), confidence(tx0) at 2,
    // and a transaction with exactly one child only ever earns its parent's conflict
    // set a single count increment, ever. Pile enough further descendants onto tx1 to
    // push confidence(tx1), and in turn confidence(tx0), past beta1, the same way
    // scenario 3 piles descendants onto tx1 to cross beta2.
    for i in 0..=BETA1 {
        let leaf = Transaction::new(100 + i, [tx1.id()].into_iter().collect(), None);
        inject(&net, &leaf);
    }

    run_nodes(&net, 20).unwrap();

    for h in &net {
        h.with(|n| {
            assert!(n.is_accepted(tx0.id()).unwrap());
            assert!(n.is_accepted(tx1.id()).unwrap());
        });
    }
}

#[test]
fn scenario_2_double_spend_symmetric() {
    let net = build_network(NETWORK_SIZE);

    let tx0 = Transaction::genesis(0);
    inject(&net, &tx0);
    // tx1 and tx2 both spend utxo 1; tx1 is injected first everywhere, so it is always
    // the one initially preferred in each node's conflict set.
    let tx1 = Transaction::new(1, [tx0.id()].into_iter().collect(), None);
    inject(&net, &tx1);
    let tx2 = Transaction::new(1, [tx0.id()].into_iter().collect(), None);
    inject(&net, &tx2);

    run_nodes(&net, 10).unwrap();

    for h in &net {
        h.with(|n| {
            assert!(n.is_accepted(tx0.id()).unwrap());
            let tx1_accepted = n.is_accepted(tx1.id()).unwrap();
            let tx2_accepted = n.is_accepted(tx2.id()).unwrap();
            assert!(!(tx1_accepted && tx2_accepted), "at most one of the conflicting pair accepts");
            if tx1_accepted || tx2_accepted {
                assert!(tx1_accepted, "the first-inserted member is the only one that can accept");
            }
        });
    }
}

#[test]
fn scenario_3_piling_on_tx1() {
    let net = build_network(NETWORK_SIZE);

    let tx0 = Transaction::genesis(0);
    inject(&net, &tx0);
    let tx1 = Transaction::new(1, [tx0.id()].into_iter().collect(), None);
    inject(&net, &tx1);
    let tx2 = Transaction::new(1, [tx0.id()].into_iter().collect(), None);
    inject(&net, &tx2);
    run_nodes(&net, 10).unwrap();

    let mut last_child = tx1.clone();
    for i in (2..24).step_by(2) {
        let utxo = i as u64;
        let txi = Transaction::new(utxo, [tx1.id()].into_iter().collect(), None);
        inject(&net, &txi);
        run_nodes(&net, 10).unwrap();

        let tx_next = Transaction::new(utxo + 1, [txi.id()].into_iter().collect(), None);
        inject(&net, &tx_next);
        run_nodes(&net, 10).unwrap();
        last_child = tx_next;
    }
    drop(last_child);

    let observer = &net[0];
    observer.with(|n| {
        assert!(n.is_accepted(tx1.id()).unwrap());
        assert!(!n.is_accepted(tx2.id()).unwrap());
        let cs = &n.conflicts()[&1];
        assert_eq!(cs.preferred, tx1.id());
        assert!(cs.count > BETA2);
    });
}

#[test]
fn scenario_4_idempotent_receive_one_hundred_times() {
    let mut n = Node::new(None, ALPHA, K, BETA1, BETA2);
    let tx = Transaction::genesis(0);

    n.receive(tx.clone());
    let after_one = (n.transactions().len(), n.conflicts()[&0].members.len(), n.chits()[&tx.id()]);

    for _ in 0..99 {
        n.receive(tx.clone());
    }
    let after_many = (n.transactions().len(), n.conflicts()[&0].members.len(), n.chits()[&tx.id()]);

    assert_eq!(after_one, after_many);
}

#[test]
fn scenario_5_query_once_invariant_over_a_thousand_rounds() {
    let net = build_network(NETWORK_SIZE);

    let tx0 = Transaction::genesis(0);
    inject(&net, &tx0);
    let tx1 = Transaction::new(1, [tx0.id()].into_iter().collect(), None);
    inject(&net, &tx1);

    run_nodes(&net, 1000).unwrap();

    for h in &net {
        h.with(|n| {
            for id in n.queried() {
                assert!(n.transactions().contains_key(id));
            }
            assert_eq!(n.queried().len(), n.transactions().len());
        });
    }

    // Every transaction has been queried exactly once by now; further rounds touch no
    // conflict-set counters.
    let before: Vec<(u64, u64)> = net
        .iter()
        .map(|h| h.with(|n| (n.conflicts()[&0].count, n.conflicts()[&1].count)))
        .collect();
    run_nodes(&net, 5).unwrap();
    let after: Vec<(u64, u64)> = net
        .iter()
        .map(|h| h.with(|n| (n.conflicts()[&0].count, n.conflicts()[&1].count)))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn scenario_6_no_peers_safety() {
    let mut n = Node::new(None, ALPHA, K, BETA1, BETA2);
    assert!(n.peers().is_empty());
    assert!(n.transactions().is_empty());
    assert!(n.run().is_ok());
    assert!(n.transactions().is_empty());
    assert!(n.queried().is_empty());
}

#[test]
fn law_genesis_eventually_accepted_on_every_node() {
    let net = build_network(NETWORK_SIZE);

    // A client hands genesis, and enough descendants to push confidence(genesis) past
    // beta1, to a single node only. Every other node must learn of all of it purely
    // through query/receive gossip, exactly as a live network would disseminate a
    // client's submission: `run`'s peer sampling calls `query` on a handful of peers
    // per round, and `query` teaches the callee about a transaction it didn't already
    // know as a side effect of answering the strong-preference question.
    let genesis = Transaction::genesis(0);
    submit_to_one(&net[0], &genesis);
    // Wide margin over the 11 descendants a bare-minimum crossing needs: gossip
    // delivers transactions to a given node in whatever order they reach it, so a node
    // that votes on a handful of these before genesis itself reaches every one of its
    // sampled peers can lose a few of its single-shot votes to a "missing ancestor"
    // answer. 40 descendants tolerates that noise comfortably.
    for i in 0..40u64 {
        let child = Transaction::new(500 + i, [genesis.id()].into_iter().collect(), None);
        submit_to_one(&net[0], &child);
    }

    // Gossip takes a handful of rounds to spread from one node to all 51 via k=10
    // random sampling per round; this is a generous multiple of that.
    run_nodes(&net, 150).unwrap();

    for h in &net {
        h.with(|n| assert!(n.is_accepted(genesis.id()).unwrap()));
    }
}

#[test]
fn law_confidence_is_monotone_over_the_nodes_lifetime() {
    let net = build_network(NETWORK_SIZE);
    let tx0 = Transaction::genesis(0);
    inject(&net, &tx0);
    let tx1 = Transaction::new(1, [tx0.id()].into_iter().collect(), None);
    inject(&net, &tx1);

    let observer = &net[0];
    let mut previous = observer.with(|n| n.confidence(tx0.id()).unwrap());
    for _ in 0..20 {
        run_nodes(&net, 1).unwrap();
        let current = observer.with(|n| n.confidence(tx0.id()).unwrap());
        assert!(current >= previous);
        previous = current;
    }
}
