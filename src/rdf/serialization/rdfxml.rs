//! Tree-form RDF/XML writer
//!
//! The writer rebuilds a forest from the flat triple set: every node that is
//! never the object of another subject becomes a top-level element, and
//! everything reachable from it is nested underneath, one property element
//! per non-structural triple.
//!
//! ```text
//! <rdf:RDF
//!     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
//!     xmlns:ex="http://ex.org#">
//!     <ex:Thing rdf:about="http://ex.org#a">
//!         <ex:title>Hello</ex:title>
//!         <ex:seeAlso rdf:resource="http://ex.org#b"/>
//!     </ex:Thing>
//! </rdf:RDF>
//! ```

use super::{SerializeError, SerializeResult};
use crate::config::WriterConfig;
use crate::rdf::graph::{build_graph, is_structural, ReverseIndex, TripleGraph};
use crate::rdf::namespace::{InverseNamespaces, NamespaceMap};
use crate::rdf::types::{
    NodeId, NodeKind, RdfError, Triple, TripleSet, RDF_NODE_ID, RDF_NS, RDF_TYPE, XSD_STRING,
};
use quick_xml::escape::escape;
use rdfwriter_graph_algorithms::{find_roots, linearize, on_cycle};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// RDF/XML serializer
#[derive(Debug, Clone, Default)]
pub struct RdfXmlSerializer {
    config: WriterConfig,
}

impl RdfXmlSerializer {
    /// Create a serializer with the given configuration
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Default configuration with a custom indent
    pub fn with_indent(indent: impl Into<String>) -> Self {
        Self::new(WriterConfig::default().with_indent(indent))
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Serialize triples to a document string
    pub fn serialize(&self, triples: &TripleSet, namespaces: &NamespaceMap) -> SerializeResult<String> {
        let mut namespaces = namespaces.clone();
        namespaces.extend(&self.config.prefixes);
        let indent = self.config.indent.as_str();

        let graph = build_graph(triples);
        debug!(
            "Serializing {} triples over {} nodes",
            triples.len(),
            graph.node_count()
        );

        // Deepest-first order; fixes the order of roots and of the triple sequence.
        let order = linearize(&graph.adjacency);
        let position = positions(&order);
        let mut sorted: Vec<Triple> = triples.triples().to_vec();
        sorted.sort_by_key(|t| graph.dense_index(t.subject).map(|idx| position[idx]));

        let inverse = namespaces.invert();
        let index = ReverseIndex::build(&graph, &sorted);

        let roots = ordered_roots(&graph, &position);

        let rdf = rdf_prefix(&namespaces, &inverse);
        let mut renderer = TreeRenderer {
            set: triples,
            graph: &graph,
            index: &index,
            inverse: &inverse,
            rdf: &rdf,
            indent,
            rendered: vec![false; graph.node_count()],
        };

        let mut body = String::new();
        for &root in &roots {
            renderer.render(root, 1, &mut body)?;
        }
        renderer.check_unrendered(&order)?;

        let mut document = prolog(&namespaces, &inverse, &rdf, indent);
        document.push('\n');
        document.push_str(&body);
        document.push_str(&format!("</{}:RDF>", rdf));
        Ok(document)
    }

    /// Serialize triples and write the document to `path`.
    ///
    /// Nothing is written when serialization fails.
    pub fn write_to_file(
        &self,
        triples: &TripleSet,
        namespaces: &NamespaceMap,
        path: impl AsRef<Path>,
    ) -> SerializeResult<()> {
        let path = path.as_ref();
        let document = self.serialize(triples, namespaces)?;
        fs::write(path, &document)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(self.config.file_mode))?;
        }

        info!("Wrote RDF/XML document to {:?} ({} bytes)", path, document.len());
        Ok(())
    }
}

/// Root nodes of a triple set, in the order they are written
pub fn root_nodes(triples: &TripleSet) -> Vec<NodeId> {
    let graph = build_graph(triples);
    let position = positions(&linearize(&graph.adjacency));
    ordered_roots(&graph, &position)
        .into_iter()
        .map(|idx| graph.node_id(idx))
        .collect()
}

/// Inverse of a linearization: dense index → position
fn positions(order: &[usize]) -> Vec<usize> {
    let mut position = vec![0usize; order.len()];
    for (pos, &idx) in order.iter().enumerate() {
        position[idx] = pos;
    }
    position
}

fn ordered_roots(graph: &TripleGraph, position: &[usize]) -> Vec<usize> {
    let root_set = find_roots(&graph.adjacency);
    let mut roots = root_set.roots.clone();
    roots.sort_by_key(|&idx| position[idx]);
    debug!(
        "Found {} root nodes in {} components",
        roots.len(),
        root_set.component_count()
    );
    roots
}

/// Serialize triples with the given indent string
pub fn triples_to_string(
    triples: &TripleSet,
    namespaces: &NamespaceMap,
    tab: &str,
) -> SerializeResult<String> {
    RdfXmlSerializer::with_indent(tab).serialize(triples, namespaces)
}

/// Serialize triples with the given indent string and write them to `path`
pub fn write_to_file(
    triples: &TripleSet,
    namespaces: &NamespaceMap,
    tab: &str,
    path: impl AsRef<Path>,
) -> SerializeResult<()> {
    RdfXmlSerializer::with_indent(tab).write_to_file(triples, namespaces, path)
}

/// Prefix of the RDF namespace: the declared one, else `rdf`, else the
/// first free `rdfN`
fn rdf_prefix(namespaces: &NamespaceMap, inverse: &InverseNamespaces) -> String {
    if let Some(prefix) = inverse.prefix_for(RDF_NS) {
        return prefix.to_string();
    }
    let mut prefix = "rdf".to_string();
    let mut n = 0usize;
    while namespaces.get_iri(&prefix).is_ok() {
        prefix = format!("rdf{}", n);
        n += 1;
    }
    prefix
}

/// Opening root element with one `xmlns` declaration per line
fn prolog(namespaces: &NamespaceMap, inverse: &InverseNamespaces, rdf: &str, indent: &str) -> String {
    let mut lines = vec![format!("<{}:RDF", rdf)];
    if inverse.prefix_for(RDF_NS).is_none() {
        lines.push(format!("{}xmlns:{}=\"{}\"", indent, rdf, RDF_NS));
    }
    for (prefix, iri) in namespaces.iter() {
        lines.push(format!("{}xmlns:{}=\"{}\"", indent, prefix, escape(iri)));
    }
    let mut tag = lines.join("\n");
    tag.push('>');
    tag
}

/// Pending output, processed last-in first-out
enum Step {
    /// Write a node element and schedule its properties
    Node { idx: usize, depth: usize },
    /// Write one property element of a node
    Property { triple: Triple, depth: usize },
    /// Write a closing tag
    Text(String),
}

struct TreeRenderer<'a> {
    set: &'a TripleSet,
    graph: &'a TripleGraph,
    index: &'a ReverseIndex,
    inverse: &'a InverseNamespaces,
    rdf: &'a str,
    indent: &'a str,
    /// Nodes already written in full
    rendered: Vec<bool>,
}

impl<'a> TreeRenderer<'a> {
    /// Render the tree under `root`, one line per element
    fn render(&mut self, root: usize, depth: usize, out: &mut String) -> SerializeResult<()> {
        let mut stack = vec![Step::Node { idx: root, depth }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Node { idx, depth } => self.node(idx, depth, out, &mut stack)?,
                Step::Property { triple, depth } => self.property(triple, depth, out, &mut stack)?,
                Step::Text(text) => out.push_str(&text),
            }
        }
        Ok(())
    }

    fn pad(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }

    fn dense(&self, id: NodeId) -> SerializeResult<usize> {
        self.graph
            .dense_index(id)
            .ok_or(SerializeError::Rdf(RdfError::UnknownNode(id)))
    }

    fn node(&mut self, idx: usize, depth: usize, out: &mut String, stack: &mut Vec<Step>) -> SerializeResult<()> {
        let (set, index) = (self.set, self.index);
        let node = set.node(self.graph.node_id(idx));
        let props = index.properties(idx);

        let types: Vec<&Triple> = props
            .iter()
            .filter(|t| set.node(t.predicate).value == RDF_TYPE)
            .collect();
        if types.len() != 1 {
            return Err(SerializeError::MissingOrAmbiguousType {
                node: node.to_string(),
                found: types.len(),
            });
        }
        let node_ids: Vec<&Triple> = props
            .iter()
            .filter(|t| set.node(t.predicate).value == RDF_NODE_ID)
            .collect();
        if node_ids.len() > 1 {
            return Err(SerializeError::DuplicateNodeId {
                node: node.to_string(),
                found: node_ids.len(),
            });
        }

        let tag = self.inverse.shorten(&set.node(types[0].object).value)?;

        let mut attributes = String::new();
        if let Some(triple) = node_ids.first() {
            let label = &set.node(triple.object).value;
            attributes.push_str(&format!(" {}:nodeID=\"{}\"", self.rdf, escape(label.as_str())));
        } else if node.is_blank_node() && self.graph.content.in_degree(idx) > 1 {
            // Later occurrences point back here by label.
            attributes.push_str(&format!(" {}:nodeID=\"{}\"", self.rdf, escape(node.value.as_str())));
        }
        if node.is_iri() || node.is_resource() {
            attributes.push_str(&format!(" {}:about=\"{}\"", self.rdf, escape(node.value.as_str())));
        }

        self.rendered[idx] = true;
        let pad = self.pad(depth);
        out.push_str(&format!("{}<{}{}>\n", pad, tag, attributes));
        stack.push(Step::Text(format!("{}</{}>\n", pad, tag)));

        for triple in props.iter().rev() {
            if !is_structural(&set.node(triple.predicate).value) {
                stack.push(Step::Property {
                    triple: *triple,
                    depth: depth + 1,
                });
            }
        }
        Ok(())
    }

    fn property(&mut self, triple: Triple, depth: usize, out: &mut String, stack: &mut Vec<Step>) -> SerializeResult<()> {
        let name = self.inverse.shorten(&self.set.node(triple.predicate).value)?;
        let object = self.set.node(triple.object);
        let obj_idx = self.dense(triple.object)?;
        let pad = self.pad(depth);
        let value = escape(object.value.as_str());

        if object.is_resource() {
            out.push_str(&format!("{}<{} {}:resource=\"{}\"/>\n", pad, name, self.rdf, value));
            return Ok(());
        }

        if !self.index.has_properties(obj_idx) {
            match object.kind {
                NodeKind::BlankNode => {
                    out.push_str(&format!("{}<{} {}:nodeID=\"{}\"/>\n", pad, name, self.rdf, value));
                }
                _ => {
                    let attributes = self.literal_attributes(triple.object);
                    out.push_str(&format!("{}<{}{}>{}</{}>\n", pad, name, attributes, value, name));
                }
            }
            return Ok(());
        }

        if self.rendered[obj_idx] {
            // Shared node or back edge: point at the copy written earlier.
            if object.is_blank_node() {
                let label = escape(self.blank_label(obj_idx));
                out.push_str(&format!("{}<{} {}:nodeID=\"{}\"/>\n", pad, name, self.rdf, label));
            } else {
                out.push_str(&format!("{}<{} {}:resource=\"{}\"/>\n", pad, name, self.rdf, value));
            }
            return Ok(());
        }

        out.push_str(&format!("{}<{}>\n", pad, name));
        stack.push(Step::Text(format!("{}</{}>\n", pad, name)));
        stack.push(Step::Node {
            idx: obj_idx,
            depth: depth + 1,
        });
        Ok(())
    }

    /// Label a blank node was written under: its `rdf:nodeID` if it has one
    fn blank_label(&self, idx: usize) -> &'a str {
        let (set, index) = (self.set, self.index);
        index
            .properties(idx)
            .iter()
            .find(|t| set.node(t.predicate).value == RDF_NODE_ID)
            .map(|t| set.node(t.object).value.as_str())
            .unwrap_or_else(|| set.node(self.graph.node_id(idx)).value.as_str())
    }

    fn literal_attributes(&self, id: NodeId) -> String {
        let node = self.set.node(id);
        if let Some(lang) = &node.language {
            format!(" xml:lang=\"{}\"", escape(lang.as_str()))
        } else {
            match &node.datatype {
                Some(dt) if dt != XSD_STRING => {
                    format!(" {}:datatype=\"{}\"", self.rdf, escape(dt.as_str()))
                }
                _ => String::new(),
            }
        }
    }

    /// Fail if some subject's triples were not written.
    ///
    /// Cycle members are reported first, so a node hanging off a rootless
    /// cycle is blamed on the cycle.
    fn check_unrendered(&self, order: &[usize]) -> SerializeResult<()> {
        let unrendered: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&idx| !self.rendered[idx] && self.index.has_properties(idx))
            .collect();

        for &idx in &unrendered {
            if self.graph.content.in_degree(idx) > 0 && on_cycle(&self.graph.content, idx) {
                let node = self.set.node(self.graph.node_id(idx));
                return Err(SerializeError::CyclicReference(node.to_string()));
            }
        }
        // Only reached through rdf:type, rdf:resource or other structural edges.
        if let Some(&idx) = unrendered.first() {
            let node = self.set.node(self.graph.node_id(idx));
            return Err(SerializeError::UnreachableNode(node.to_string()));
        }
        Ok(())
    }
}
