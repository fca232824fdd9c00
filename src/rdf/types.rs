//! RDF type definitions
//!
//! Nodes live in an arena owned by [`TripleSet`]. A [`NodeId`] is an index
//! into that arena, so node identity is "same arena slot", never "same
//! string": two literals reading `"42"` at different places in a graph are
//! two different nodes.

use std::fmt;
use thiserror::Error;

/// The RDF namespace
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:nodeID`
pub const RDF_NODE_ID: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nodeID";
/// `rdf:resource`
pub const RDF_RESOURCE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#resource";
/// `xsd:string`, the implicit datatype of plain literals
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// RDF errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RdfError {
    /// A triple refers to a node that is not in the arena
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Predicates must be IRIs
    #[error("Predicate is not an IRI: {0}")]
    PredicateNotIri(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Arena index of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// What a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Absolute IRI
    Iri,
    /// Anonymous node with a locally scoped label
    BlankNode,
    /// Literal value
    Literal,
    /// IRI that is only ever referred to, written as `rdf:resource`
    ResourceLiteral,
}

/// A graph vertex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// IRI, blank node label or lexical value
    pub value: String,
    /// Kind tag
    pub kind: NodeKind,
    /// Language tag (literals only)
    pub language: Option<String>,
    /// Datatype IRI (literals only)
    pub datatype: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind,
            language: None,
            datatype: None,
        }
    }

    pub fn is_iri(&self) -> bool {
        self.kind == NodeKind::Iri
    }

    pub fn is_blank_node(&self) -> bool {
        self.kind == NodeKind::BlankNode
    }

    pub fn is_literal(&self) -> bool {
        self.kind == NodeKind::Literal
    }

    pub fn is_resource(&self) -> bool {
        self.kind == NodeKind::ResourceLiteral
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Iri | NodeKind::ResourceLiteral => write!(f, "<{}>", self.value),
            NodeKind::BlankNode => write!(f, "_:{}", self.value),
            NodeKind::Literal => {
                write!(f, "\"{}\"", self.value)?;
                if let Some(lang) = &self.language {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = &self.datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// RDF triple (subject-predicate-object), by arena id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject
    pub subject: NodeId,
    /// Predicate
    pub predicate: NodeId,
    /// Object
    pub object: NodeId,
}

impl Triple {
    pub fn new(subject: NodeId, predicate: NodeId, object: NodeId) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// Node arena plus the ordered triples built over it
#[derive(Debug, Clone, Default)]
pub struct TripleSet {
    nodes: Vec<Node>,
    triples: Vec<Triple>,
}

impl TripleSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the arena and return its id
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(node);
        id
    }

    /// New IRI node
    pub fn iri(&mut self, iri: impl Into<String>) -> NodeId {
        self.add_node(Node::new(NodeKind::Iri, iri))
    }

    /// New blank node with the given label
    pub fn blank(&mut self, label: impl Into<String>) -> NodeId {
        self.add_node(Node::new(NodeKind::BlankNode, label))
    }

    /// New plain literal
    pub fn literal(&mut self, value: impl Into<String>) -> NodeId {
        self.add_node(Node::new(NodeKind::Literal, value))
    }

    /// New language-tagged literal
    pub fn literal_with_language(
        &mut self,
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> NodeId {
        let mut node = Node::new(NodeKind::Literal, value);
        node.language = Some(language.into());
        self.add_node(node)
    }

    /// New typed literal
    pub fn literal_with_datatype(
        &mut self,
        value: impl Into<String>,
        datatype: impl Into<String>,
    ) -> NodeId {
        let mut node = Node::new(NodeKind::Literal, value);
        node.datatype = Some(datatype.into());
        self.add_node(node)
    }

    /// New resource reference (`rdf:resource` target)
    pub fn resource(&mut self, iri: impl Into<String>) -> NodeId {
        self.add_node(Node::new(NodeKind::ResourceLiteral, iri))
    }

    /// Append a triple over existing nodes
    pub fn insert(&mut self, subject: NodeId, predicate: NodeId, object: NodeId) -> RdfResult<()> {
        for id in [subject, predicate, object] {
            if id.index() >= self.nodes.len() {
                return Err(RdfError::UnknownNode(id));
            }
        }
        let p = &self.nodes[predicate.index()];
        if !p.is_iri() {
            return Err(RdfError::PredicateNotIri(p.value.clone()));
        }

        self.triples.push(Triple::new(subject, predicate, object));
        Ok(())
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Look up a node without panicking
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// All triples in insertion order
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// All nodes in arena order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Render a triple in N-Triples-like notation, for logs and errors
    pub fn display_triple(&self, triple: &Triple) -> String {
        format!(
            "{} {} {} .",
            self.node(triple.subject),
            self.node(triple.predicate),
            self.node(triple.object)
        )
    }
}
