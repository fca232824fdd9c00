//! rdfwriter
//!
//! Writes an in-memory set of RDF triples as a tree-shaped RDF/XML document.
//!
//! The triple set is a flat, possibly cyclic, labeled graph. The writer
//! rebuilds a forest from it: nodes that are never the object of another
//! subject become top-level elements, and every other node is nested under
//! the property that points at it.
//!
//! # Pipeline
//!
//! 1. Graph builder: adjacency view and reverse index ([`rdf::graph`])
//! 2. Linearizer: deterministic deepest-first node order
//! 3. Root detection: disjoint set over subject → object edges
//! 4. Namespace resolver: `http://ex.org#Thing` → `ex:Thing`
//! 5. Tree renderer: nested elements, one per non-structural triple
//!
//! Steps 2 and 3 live in the `rdfwriter-graph-algorithms` crate.

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod rdf;

pub use config::{ConfigError, ConfigResult, WriterConfig};

pub use rdf::{
    NamespaceMap, Node, NodeId, NodeKind, Triple, TripleSet,
    RdfXmlSerializer, RdfLoader, RdfFormat,
    SerializeError, SerializeResult, ParseError, ParseResult,
    root_nodes, triples_to_string, write_to_file,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
