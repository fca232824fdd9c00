//! RDF namespace and prefix management
//!
//! This module handles namespace prefixes for compact IRI notation, and the
//! inverse lookup the RDF/XML writer uses to turn predicate and type IRIs
//! into `prefix:local` element names.

use super::serialization::{SerializeError, SerializeResult};
use super::types::RDF_NS;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Prefix → namespace URI mapping, kept in declaration order.
///
/// The order is the order of the `xmlns:` declarations in a written document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceMap {
    prefixes: IndexMap<String, String>,
}

impl NamespaceMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapping with common prefixes
    pub fn with_defaults() -> Self {
        let mut map = Self::new();

        // Add common RDF/RDFS/OWL prefixes
        map.add_prefix("rdf", RDF_NS);
        map.add_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        map.add_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
        map.add_prefix("owl", "http://www.w3.org/2002/07/owl#");
        map.add_prefix("foaf", "http://xmlns.com/foaf/0.1/");
        map.add_prefix("dc", "http://purl.org/dc/elements/1.1/");
        map.add_prefix("dcterms", "http://purl.org/dc/terms/");

        map
    }

    /// Add or replace a prefix. A replaced prefix keeps its position.
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        if let Some((prefix, local)) = compact_iri.split_once(':') {
            let iri = self.get_iri(prefix)?;
            Ok(format!("{}{}", iri, local))
        } else {
            Err(PrefixError::InvalidIri(compact_iri.to_string()))
        }
    }

    /// Compact an IRI using the longest matching namespace
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| format!("{}:{}", prefix, &iri[ns.len()..]))
    }

    /// Merge another mapping over this one
    pub fn extend(&mut self, other: &NamespaceMap) {
        for (prefix, iri) in &other.prefixes {
            self.add_prefix(prefix.clone(), iri.clone());
        }
    }

    /// Iterate `(prefix, iri)` in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Build the namespace → prefix lookup.
    ///
    /// When two prefixes share a namespace the first declared one wins.
    pub fn invert(&self) -> InverseNamespaces {
        let mut by_namespace = FxHashMap::default();
        for (prefix, iri) in &self.prefixes {
            by_namespace
                .entry(namespace_key(iri).to_string())
                .or_insert_with(|| prefix.clone());
        }
        InverseNamespaces { by_namespace }
    }
}

impl<P: Into<String>, I: Into<String>> FromIterator<(P, I)> for NamespaceMap {
    fn from_iter<T: IntoIterator<Item = (P, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (prefix, iri) in iter {
            map.add_prefix(prefix, iri);
        }
        map
    }
}

/// Namespace URI → prefix
#[derive(Debug, Clone, Default)]
pub struct InverseNamespaces {
    by_namespace: FxHashMap<String, String>,
}

impl InverseNamespaces {
    /// Prefix declared for a namespace URI, if any
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.by_namespace
            .get(namespace_key(namespace))
            .map(|s| s.as_str())
    }

    /// Turn an absolute identifier into `prefix:local`
    pub fn shorten(&self, identifier: &str) -> SerializeResult<String> {
        shorten(identifier, self)
    }
}

/// `#`-terminated namespaces are keyed without the `#`, so `http://ex.org#`
/// and `http://ex.org` are the same namespace.
fn namespace_key(namespace: &str) -> &str {
    namespace.trim_end_matches('#')
}

/// Split an identifier into (namespace, local name).
///
/// The split point is the last `#`; identifiers without one split after the
/// last `/`.
fn split_identifier(identifier: &str) -> SerializeResult<(&str, &str)> {
    let (namespace, local) = if let Some(idx) = identifier.rfind('#') {
        (&identifier[..idx], &identifier[idx + 1..])
    } else if let Some(idx) = identifier.rfind('/') {
        (&identifier[..=idx], &identifier[idx + 1..])
    } else {
        return Err(SerializeError::MalformedIdentifier(identifier.to_string()));
    };

    let local = local.trim();
    if local.is_empty() {
        return Err(SerializeError::EmptyFragment(identifier.to_string()));
    }
    if !is_nc_name(local) {
        return Err(SerializeError::MalformedIdentifier(identifier.to_string()));
    }
    Ok((namespace, local))
}

/// XML 1.0 `NameStartChar` without `:`
fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Whether `local` can be the local part of an element name
fn is_nc_name(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Namespace part of an identifier, separator included, if it has one
pub(crate) fn namespace_of(identifier: &str) -> Option<&str> {
    identifier
        .rfind('#')
        .or_else(|| identifier.rfind('/'))
        .map(|idx| &identifier[..=idx])
}

/// Turn an absolute identifier into `prefix:local` using an inverted mapping.
pub fn shorten(identifier: &str, inverse: &InverseNamespaces) -> SerializeResult<String> {
    let (namespace, local) = split_identifier(identifier)?;
    match inverse.prefix_for(namespace) {
        Some(prefix) => Ok(format!("{}:{}", prefix, local)),
        None => Err(SerializeError::UnresolvedNamespace(
            namespace_key(namespace).to_string(),
        )),
    }
}
