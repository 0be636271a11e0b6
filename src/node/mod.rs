//! The per-node consensus engine.
//!
//! [`Node`] is the core of this crate: it owns a local view of the transaction DAG,
//! drives the repeated-subsampling voting loop and answers acceptance queries.
//! [`PeerHandle`] lets nodes call `query` on each other without an actor runtime or
//! network transport.

mod node;
pub mod peer;


pub use node::Node;
pub use peer::PeerHandle;
