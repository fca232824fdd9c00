//! Index-based graph algorithms used by the rdfwriter serializer.
//!
//! Everything here works on a dense `0..node_count` index space and knows
//! nothing about RDF. The serializer maps its node arena onto a [`GraphView`]
//! and asks three questions: which nodes are roots, in which order should
//! nodes be visited, and does a node sit on a cycle.

pub mod common;
pub mod roots;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use roots::{find_roots, RootSet};
pub use topology::{linearize, on_cycle};
