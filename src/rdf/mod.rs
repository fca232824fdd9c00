//! RDF data model and the tree-form RDF/XML writer
//!
//! This module implements:
//! - a node arena with reference-style identity (`TripleSet`)
//! - namespace prefix management and IRI shortening
//! - the graph builder (adjacency view, reverse index)
//! - the RDF/XML tree renderer and document writer
//! - loaders for Turtle, N-Triples and RDF/XML input
//!
//! # Example
//!
//! ```rust
//! use rdfwriter::rdf::{NamespaceMap, TripleSet, triples_to_string, RDF_TYPE};
//!
//! let mut triples = TripleSet::new();
//! let a = triples.iri("http://ex.org#a");
//! let ty = triples.iri(RDF_TYPE);
//! let thing = triples.resource("http://ex.org#Thing");
//! let title = triples.iri("http://purl.org/dc/elements/1.1/title");
//! let hello = triples.literal("Hello");
//! triples.insert(a, ty, thing).unwrap();
//! triples.insert(a, title, hello).unwrap();
//!
//! let mut namespaces = NamespaceMap::with_defaults();
//! namespaces.add_prefix("ex", "http://ex.org#");
//!
//! let xml = triples_to_string(&triples, &namespaces, "  ").unwrap();
//! assert!(xml.contains("<ex:Thing rdf:about=\"http://ex.org#a\">"));
//! assert!(xml.contains("<dc:title>Hello</dc:title>"));
//! ```

mod types;
mod namespace;
pub mod graph;
mod serialization;

pub use types::{
    Node, NodeId, NodeKind, RdfError, RdfResult, Triple, TripleSet,
    RDF_NODE_ID, RDF_NS, RDF_RESOURCE, RDF_TYPE, XSD_STRING,
};

pub use namespace::{
    shorten, InverseNamespaces, NamespaceMap,
    PrefixError, PrefixResult,
};

pub use graph::{build_graph, ReverseIndex, TripleGraph};

pub use serialization::{
    root_nodes, triples_to_string, write_to_file, RdfXmlSerializer,
    LoadedGraph, RdfLoader, RdfFormat,
    ParseError, ParseResult,
    SerializeError, SerializeResult,
};
