//! A cheaply-cloneable handle to another node's consensus state.
//!
//! This simulator is single-threaded and cooperative, with no network transport
//! between nodes, so a peer is addressed through an in-process, reference-counted,
//! interior-mutable pointer: `Rc<RefCell<Node>>`. A `PeerHandle` is cloned freely,
//! identity is by pointer (two handles to the same node compare equal), and calling
//! `query` mutates only the node it points at.

use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::Result;
use crate::node::Node;
use crate::transaction::Transaction;

#[derive(Debug, Clone)]
pub struct PeerHandle(Rc<RefCell<Node>>);

impl PeerHandle {
    pub fn new(node: Node) -> Self {
        PeerHandle(Rc::new(RefCell::new(node)))
    }

    /// Peer-callable: ingest `tx` then report strong preference.
    pub fn query(&self, tx: Transaction) -> bool {
        self.0.borrow_mut().query(tx)
    }

    /// Read-only access to the peer's state, for observers (renderer, tests).
    pub fn with<R>(&self, f: impl FnOnce(&Node) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Mutable access to the peer's own state. Used by the round driver and by tests
    /// that need to call `receive`/`run` directly rather than through another node's
    /// `query`.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Node) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn receive(&self, tx: Transaction) {
        self.0.borrow_mut().receive(tx)
    }

    pub fn run(&self) -> Result<()> {
        self.0.borrow_mut().run()
    }
}

impl PartialEq for PeerHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for PeerHandle {}

impl Hash for PeerHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state)
    }
}
