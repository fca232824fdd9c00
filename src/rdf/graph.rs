//! Graph builder
//!
//! Turns a flat triple sequence into the index structures the writer needs:
//!
//! - an adjacency view over every triple (subject → objects),
//! - a content view holding only the edges the writer nests through,
//! - a reverse index (subject → its triples).
//!
//! Dense indices are assigned in first-seen order over the triple sequence,
//! subject before object, so every derived order is reproducible from the
//! input order alone. Predicates are edge labels, not vertices.

use super::types::{NodeId, Triple, TripleSet, RDF_NODE_ID, RDF_RESOURCE, RDF_TYPE};
use rdfwriter_graph_algorithms::GraphView;

/// Whether a predicate IRI carries structure rather than content
pub fn is_structural(predicate: &str) -> bool {
    predicate == RDF_TYPE || predicate == RDF_NODE_ID || predicate == RDF_RESOURCE
}

/// Dense graph views over a [`TripleSet`]
#[derive(Debug, Clone)]
pub struct TripleGraph {
    /// Every triple as an edge, parallel edges kept
    pub adjacency: GraphView,
    /// Only edges the writer would nest through
    pub content: GraphView,
    /// Arena index → dense index
    dense_of: Vec<Option<usize>>,
}

impl TripleGraph {
    /// Dense index of an arena node, if it occurs in any triple
    pub fn dense_index(&self, id: NodeId) -> Option<usize> {
        self.dense_of.get(id.index()).copied().flatten()
    }

    /// Arena id of a dense index
    pub fn node_id(&self, idx: usize) -> NodeId {
        NodeId(self.adjacency.index_to_node[idx])
    }

    /// Number of distinct subject/object nodes
    pub fn node_count(&self) -> usize {
        self.adjacency.node_count
    }
}

struct DenseBuilder {
    dense_of: Vec<Option<usize>>,
    index_to_node: Vec<u64>,
    outgoing: Vec<Vec<usize>>,
    content_out: Vec<Vec<usize>>,
}

impl DenseBuilder {
    fn intern(&mut self, id: NodeId) -> usize {
        if let Some(idx) = self.dense_of[id.index()] {
            return idx;
        }
        let idx = self.index_to_node.len();
        self.dense_of[id.index()] = Some(idx);
        self.index_to_node.push(id.as_u64());
        self.outgoing.push(Vec::new());
        self.content_out.push(Vec::new());
        idx
    }
}

/// Build the adjacency and content views.
///
/// Every node that appears as subject or object gets an entry, possibly
/// empty. Parallel edges are not deduplicated.
pub fn build_graph(set: &TripleSet) -> TripleGraph {
    let mut builder = DenseBuilder {
        dense_of: vec![None; set.nodes().len()],
        index_to_node: Vec::new(),
        outgoing: Vec::new(),
        content_out: Vec::new(),
    };

    for triple in set.triples() {
        let s = builder.intern(triple.subject);
        let o = builder.intern(triple.object);
        builder.outgoing[s].push(o);

        let predicate = &set.node(triple.predicate).value;
        if !is_structural(predicate) && !set.node(triple.object).is_resource() {
            builder.content_out[s].push(o);
        }
    }

    TripleGraph {
        adjacency: GraphView::from_adjacency_list(builder.index_to_node.clone(), builder.outgoing),
        content: GraphView::from_adjacency_list(builder.index_to_node, builder.content_out),
        dense_of: builder.dense_of,
    }
}

/// Subject → triples, by dense index
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    by_subject: Vec<Vec<Triple>>,
}

impl ReverseIndex {
    /// Group `triples` by subject, keeping their relative order.
    ///
    /// Triples whose subject is unknown to `graph` are ignored.
    pub fn build(graph: &TripleGraph, triples: &[Triple]) -> Self {
        let mut by_subject = vec![Vec::new(); graph.node_count()];
        for triple in triples {
            if let Some(s) = graph.dense_index(triple.subject) {
                by_subject[s].push(*triple);
            }
        }
        Self { by_subject }
    }

    /// Triples with `idx` as subject
    pub fn properties(&self, idx: usize) -> &[Triple] {
        self.by_subject.get(idx).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Whether `idx` is the subject of any triple
    pub fn has_properties(&self, idx: usize) -> bool {
        !self.properties(idx).is_empty()
    }
}
