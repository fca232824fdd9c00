//! RDF serialization
//!
//! Output is always the tree-form RDF/XML document written by
//! [`RdfXmlSerializer`]. Input formats (Turtle, N-Triples, RDF/XML) are read
//! by [`RdfLoader`] into a [`TripleSet`](crate::rdf::TripleSet).

mod rdfxml;
mod loader;

pub use rdfxml::{root_nodes, triples_to_string, write_to_file, RdfXmlSerializer};
pub use loader::{LoadedGraph, RdfLoader};

use super::types::RdfError;
use std::path::Path;
use thiserror::Error;

/// RDF input format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// RDF/XML format (.rdf)
    RdfXml,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            "rdf" | "xml" | "owl" => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Turtle or N-Triples syntax error
    #[error("Turtle parse error: {0}")]
    Turtle(#[from] rio_turtle::TurtleError),

    /// RDF/XML syntax error
    #[error("RDF/XML parse error: {0}")]
    RdfXml(#[from] rio_xml::RdfXmlError),

    /// Base IRI could not be parsed
    #[error("Invalid base IRI: {0}")]
    InvalidBaseIri(String),

    /// Construct the data model cannot hold
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Arena misuse
    #[error(transparent)]
    Rdf(#[from] RdfError),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
///
/// All of them abort the whole document; no partial output is returned.
#[derive(Error, Debug)]
pub enum SerializeError {
    /// Identifier has neither `#` nor `/` to split on
    #[error("Malformed identifier, cannot split into namespace and local name: {0}")]
    MalformedIdentifier(String),

    /// Namespace has no declared prefix
    #[error("No prefix declared for namespace: {0}")]
    UnresolvedNamespace(String),

    /// A node must have exactly one rdf:type
    #[error("Node {node} must have exactly one rdf:type triple, found {found}")]
    MissingOrAmbiguousType { node: String, found: usize },

    /// A node may have at most one rdf:nodeID
    #[error("Node {node} has {found} rdf:nodeID triples, at most one is allowed")]
    DuplicateNodeId { node: String, found: usize },

    /// Local name is empty after trimming
    #[error("Empty local name in identifier: {0}")]
    EmptyFragment(String),

    /// Nodes on a cycle that no root reaches
    #[error("Node {0} lies on a reference cycle that no root node reaches")]
    CyclicReference(String),

    /// Subject with triples that no written element leads to
    #[error("Node {0} has triples but is only referenced through structural edges, so it cannot be nested anywhere")]
    UnreachableNode(String),

    /// Triple refers to a node outside its arena
    #[error(transparent)]
    Rdf(#[from] RdfError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SerializeResult<T> = Result<T, SerializeError>;
