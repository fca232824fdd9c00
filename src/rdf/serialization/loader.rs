//! Triple loading from Turtle, N-Triples and RDF/XML
//!
//! Loaded data follows the writer's node model:
//! - IRI and blank-node subjects are interned by label, so every mention
//!   refers to the same node;
//! - literals are fresh nodes per occurrence;
//! - IRI objects that are never a subject become `ResourceLiteral` nodes and
//!   are written as `rdf:resource` references.

use super::{ParseError, ParseResult, RdfFormat};
use crate::rdf::namespace::{namespace_of, NamespaceMap};
use crate::rdf::types::{NodeId, TripleSet, RDF_TYPE};
use rio_api::model::{Literal as RioLiteral, Subject, Term as RioTerm, Triple as RioTriple};
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesParser, TurtleParser};
use rio_xml::RdfXmlParser;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use tracing::debug;

/// Triples plus the namespaces needed to write them
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub triples: TripleSet,
    pub namespaces: NamespaceMap,
}

/// Owned copy of a parsed term
#[derive(Debug, Clone)]
enum Term {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        language: Option<String>,
        datatype: Option<String>,
    },
}

#[derive(Debug, Clone)]
struct OwnedTriple {
    subject: Term,
    predicate: String,
    object: Term,
}

fn convert_subject(s: Subject<'_>) -> ParseResult<Term> {
    match s {
        Subject::NamedNode(n) => Ok(Term::Iri(n.iri.to_string())),
        Subject::BlankNode(b) => Ok(Term::Blank(b.id.to_string())),
        #[allow(unreachable_patterns)]
        _ => Err(ParseError::Unsupported("RDF-star subject".to_string())),
    }
}

fn convert_object(o: RioTerm<'_>) -> ParseResult<Term> {
    match o {
        RioTerm::NamedNode(n) => Ok(Term::Iri(n.iri.to_string())),
        RioTerm::BlankNode(b) => Ok(Term::Blank(b.id.to_string())),
        RioTerm::Literal(l) => Ok(match l {
            RioLiteral::Simple { value } => Term::Literal {
                value: value.to_string(),
                language: None,
                datatype: None,
            },
            RioLiteral::LanguageTaggedString { value, language } => Term::Literal {
                value: value.to_string(),
                language: Some(language.to_string()),
                datatype: None,
            },
            RioLiteral::Typed { value, datatype } => Term::Literal {
                value: value.to_string(),
                language: None,
                datatype: Some(datatype.iri.to_string()),
            },
        }),
        #[allow(unreachable_patterns)]
        _ => Err(ParseError::Unsupported("RDF-star object".to_string())),
    }
}

fn convert_triple(t: RioTriple<'_>) -> ParseResult<OwnedTriple> {
    Ok(OwnedTriple {
        subject: convert_subject(t.subject)?,
        predicate: t.predicate.iri.to_string(),
        object: convert_object(t.object)?,
    })
}

/// RDF loader
pub struct RdfLoader;

impl RdfLoader {
    /// Parse RDF data from a string
    pub fn parse(input: &str, format: RdfFormat, base_iri: Option<&str>) -> ParseResult<LoadedGraph> {
        Self::parse_reader(Cursor::new(input.as_bytes()), format, base_iri)
    }

    /// Parse RDF data from a file
    pub fn parse_file(path: &Path, format: RdfFormat, base_iri: Option<&str>) -> ParseResult<LoadedGraph> {
        let reader = BufReader::new(File::open(path)?);
        debug!("Loading {:?} as {:?}", path, format);
        Self::parse_reader(reader, format, base_iri)
    }

    fn parse_reader(reader: impl BufRead, format: RdfFormat, base_iri: Option<&str>) -> ParseResult<LoadedGraph> {
        let base = base_iri
            .map(|iri| {
                oxiri::Iri::parse(iri.to_string()).map_err(|e| ParseError::InvalidBaseIri(e.to_string()))
            })
            .transpose()?;

        let mut collected = Vec::new();
        let mut on_triple = |t: RioTriple<'_>| -> ParseResult<()> {
            collected.push(convert_triple(t)?);
            Ok(())
        };

        match format {
            RdfFormat::Turtle => TurtleParser::new(reader, base).parse_all(&mut on_triple)?,
            RdfFormat::NTriples => NTriplesParser::new(reader).parse_all(&mut on_triple)?,
            RdfFormat::RdfXml => RdfXmlParser::new(reader, base).parse_all(&mut on_triple)?,
        }

        let loaded = build(&collected)?;
        debug!(
            "Loaded {} triples, {} namespaces",
            loaded.triples.len(),
            loaded.namespaces.len()
        );
        Ok(loaded)
    }
}

#[derive(Default)]
struct Interner {
    iris: FxHashMap<String, NodeId>,
    blanks: FxHashMap<String, NodeId>,
    predicates: FxHashMap<String, NodeId>,
}

impl Interner {
    fn iri(&mut self, set: &mut TripleSet, iri: &str) -> NodeId {
        *self
            .iris
            .entry(iri.to_string())
            .or_insert_with(|| set.iri(iri))
    }

    fn blank(&mut self, set: &mut TripleSet, label: &str) -> NodeId {
        *self
            .blanks
            .entry(label.to_string())
            .or_insert_with(|| set.blank(label))
    }

    fn predicate(&mut self, set: &mut TripleSet, iri: &str) -> NodeId {
        *self
            .predicates
            .entry(iri.to_string())
            .or_insert_with(|| set.iri(iri))
    }
}

fn build(collected: &[OwnedTriple]) -> ParseResult<LoadedGraph> {
    let subject_iris: FxHashSet<&str> = collected
        .iter()
        .filter_map(|t| match &t.subject {
            Term::Iri(iri) => Some(iri.as_str()),
            _ => None,
        })
        .collect();

    let mut set = TripleSet::new();
    let mut interner = Interner::default();

    for triple in collected {
        let subject = match &triple.subject {
            Term::Iri(iri) => interner.iri(&mut set, iri),
            Term::Blank(label) => interner.blank(&mut set, label),
            Term::Literal { value, .. } => {
                return Err(ParseError::Unsupported(format!("literal subject \"{}\"", value)))
            }
        };
        let predicate = interner.predicate(&mut set, &triple.predicate);
        let object = match &triple.object {
            Term::Iri(iri) if subject_iris.contains(iri.as_str()) => interner.iri(&mut set, iri),
            Term::Iri(iri) => set.resource(iri.as_str()),
            Term::Blank(label) => interner.blank(&mut set, label),
            Term::Literal {
                value,
                language: Some(lang),
                ..
            } => set.literal_with_language(value.as_str(), lang.as_str()),
            Term::Literal {
                value,
                datatype: Some(dt),
                ..
            } => set.literal_with_datatype(value.as_str(), dt.as_str()),
            Term::Literal { value, .. } => set.literal(value.as_str()),
        };
        set.insert(subject, predicate, object)?;
    }

    let mut namespaces = NamespaceMap::with_defaults();
    let used = collected.iter().flat_map(|t| {
        let type_iri = match &t.object {
            Term::Iri(iri) if t.predicate == RDF_TYPE => Some(iri.as_str()),
            _ => None,
        };
        std::iter::once(t.predicate.as_str()).chain(type_iri)
    });
    declare_missing(&mut namespaces, used);

    Ok(LoadedGraph {
        triples: set,
        namespaces,
    })
}

/// Give every undeclared namespace among `iris` a generated `nsN` prefix
fn declare_missing<'a>(namespaces: &mut NamespaceMap, iris: impl Iterator<Item = &'a str>) {
    let mut inverse = namespaces.invert();
    let mut next = 0usize;
    for iri in iris {
        let Some(namespace) = namespace_of(iri) else {
            continue;
        };
        if inverse.prefix_for(namespace).is_some() {
            continue;
        }
        let mut prefix = format!("ns{}", next);
        while namespaces.get_iri(&prefix).is_ok() {
            next += 1;
            prefix = format!("ns{}", next);
        }
        namespaces.add_prefix(prefix, namespace);
        next += 1;
        inverse = namespaces.invert();
    }
}
