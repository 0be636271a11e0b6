//! The round driver: repeatedly invokes `run` across a set of nodes.

use crate::error::Result;
use crate::node::PeerHandle;

/// Run `m` rounds over `nodes`. Per-iteration intra-set order is unspecified;
/// determinism for tests comes from each node's seeded PRNG, not from the iteration
/// order here.
pub fn run_nodes(nodes: &[PeerHandle], m: usize) -> Result<()> {
    for _ in 0..m {
        for node in nodes {
            node.run()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::Node;
    use crate::transaction::Transaction;

    #[test]
    fn run_nodes_drives_every_node_for_m_rounds() {
        // A single, self-peerless node with no transactions: m rounds of `run` are
        // all no-ops, but `run_nodes` must still call `run` on it without error.
        let handle = PeerHandle::new(Node::new(None, 0.75, 1, 10, 10));
        run_nodes(std::slice::from_ref(&handle), 5).unwrap();
        handle.with(|n| assert!(n.transactions().is_empty()));
    }

    #[test]
    fn run_nodes_propagates_a_single_node_error() {
        let handle = PeerHandle::new(Node::new(None, 0.75, 2, 10, 10));
        handle.with_mut(|n| n.receive(Transaction::genesis(0)));
        let err = run_nodes(std::slice::from_ref(&handle), 3);
        assert!(err.is_err());
    }
}
