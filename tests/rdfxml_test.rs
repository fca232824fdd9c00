use rdfwriter::rdf::{
    root_nodes, triples_to_string, write_to_file, NamespaceMap, NodeId, RdfFormat, RdfLoader,
    RdfXmlSerializer, SerializeError, TripleSet, RDF_NODE_ID, RDF_NS, RDF_TYPE,
};

const EX: &str = "http://ex.org#";

fn namespaces() -> NamespaceMap {
    [
        ("rdf", RDF_NS),
        ("ex", "http://ex.org#"),
        ("dc", "http://purl.org/dc/elements/1.1/"),
    ]
    .into_iter()
    .collect()
}

/// Small builder over a TripleSet with `ex:` shorthands
struct Graph {
    set: TripleSet,
    ty: NodeId,
}

impl Graph {
    fn new() -> Self {
        let mut set = TripleSet::new();
        let ty = set.iri(RDF_TYPE);
        Self { set, ty }
    }

    fn iri(&mut self, local: &str) -> NodeId {
        self.set.iri(format!("{}{}", EX, local))
    }

    fn typed(&mut self, node: NodeId, class: &str) {
        let class = self.set.resource(format!("{}{}", EX, class));
        self.set.insert(node, self.ty, class).unwrap();
    }

    fn prop(&mut self, subject: NodeId, predicate: &str, object: NodeId) {
        let p = self.set.iri(format!("{}{}", EX, predicate));
        self.set.insert(subject, p, object).unwrap();
    }

    fn literal(&mut self, subject: NodeId, predicate: &str, value: &str) {
        let o = self.set.literal(value);
        self.prop(subject, predicate, o);
    }
}

/// Top-level element lines of a document written with a tab indent
fn top_level_elements(doc: &str) -> usize {
    doc.lines()
        .filter(|l| l.starts_with("\t<") && !l.starts_with("\t</"))
        .count()
}

#[test]
fn test_scenario_a_literal_property() {
    let mut set = TripleSet::new();
    let a = set.iri("http://ex.org#a");
    let ty = set.iri(RDF_TYPE);
    let thing = set.resource("http://ex.org#Thing");
    let title = set.iri("http://purl.org/dc/elements/1.1/title");
    let hello = set.literal("Hello");
    set.insert(a, ty, thing).unwrap();
    set.insert(a, title, hello).unwrap();

    let doc = triples_to_string(&set, &namespaces(), "    ").unwrap();
    assert!(doc.contains("<ex:Thing rdf:about=\"http://ex.org#a\">"));
    assert!(doc.contains("<dc:title>Hello</dc:title>"));
    assert!(doc.contains("</ex:Thing>"));
    assert!(doc.starts_with("<rdf:RDF\n    xmlns:rdf="));
    assert!(doc.ends_with("</rdf:RDF>"));
}

#[test]
fn test_scenario_b_resource_reference() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let b = g.set.resource("http://ex.org#b");
    g.prop(a, "seeAlso", b);

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    assert!(doc.contains("    <ex:seeAlso rdf:resource=\"http://ex.org#b\"/>\n"));
    assert!(!doc.contains("</ex:seeAlso>"));
}

#[test]
fn test_scenario_c_missing_type() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.literal(a, "name", "untyped");

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(
        result,
        Err(SerializeError::MissingOrAmbiguousType { found: 0, .. })
    ));
}

#[test]
fn test_scenario_c_error_in_later_root_is_not_swallowed() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let b = g.iri("b");
    g.literal(b, "name", "no type here");

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(result, Err(SerializeError::MissingOrAmbiguousType { .. })));
}

#[test]
fn test_nested_missing_type_propagates() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let child = g.set.blank("c");
    g.prop(a, "part", child);
    g.literal(child, "name", "untyped child");

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(
        result,
        Err(SerializeError::MissingOrAmbiguousType { node, found: 0 }) if node == "_:c"
    ));
}

#[test]
fn test_ambiguous_type() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    g.typed(a, "Other");

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(
        result,
        Err(SerializeError::MissingOrAmbiguousType { found: 2, .. })
    ));
}

#[test]
fn test_scenario_d_unresolved_namespace() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let p = g.set.iri("http://unknown.org/vocab#p");
    let v = g.set.literal("v");
    g.set.insert(a, p, v).unwrap();

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(
        result,
        Err(SerializeError::UnresolvedNamespace(ns)) if ns == "http://unknown.org/vocab"
    ));
}

#[test]
fn test_malformed_type_identifier() {
    let mut set = TripleSet::new();
    let a = set.iri("http://ex.org#a");
    let ty = set.iri(RDF_TYPE);
    let class = set.resource("urn:thing");
    set.insert(a, ty, class).unwrap();

    let result = triples_to_string(&set, &namespaces(), "  ");
    assert!(matches!(result, Err(SerializeError::MalformedIdentifier(_))));
}

#[test]
fn test_duplicate_node_id() {
    let mut g = Graph::new();
    let b = g.set.blank("b");
    g.typed(b, "Thing");
    let node_id = g.set.iri(RDF_NODE_ID);
    let first = g.set.literal("n1");
    let second = g.set.literal("n2");
    g.set.insert(b, node_id, first).unwrap();
    g.set.insert(b, node_id, second).unwrap();

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(
        result,
        Err(SerializeError::DuplicateNodeId { found: 2, .. })
    ));
}

#[test]
fn test_properties_keep_input_order() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    g.literal(a, "zeta", "1");
    g.literal(a, "alpha", "2");
    g.literal(a, "mid", "3");

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    let zeta = doc.find("<ex:zeta>").unwrap();
    let alpha = doc.find("<ex:alpha>").unwrap();
    let mid = doc.find("<ex:mid>").unwrap();
    assert!(zeta < alpha && alpha < mid);
}

#[test]
fn test_iri_leaf_is_written_as_text() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let leaf = g.iri("leaf");
    g.prop(a, "ref", leaf);

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    assert!(doc.contains("<ex:ref>http://ex.org#leaf</ex:ref>"));
}

#[test]
fn test_blank_leaf_is_written_as_node_id() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let b = g.set.blank("b7");
    g.prop(a, "ref", b);

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    assert!(doc.contains("<ex:ref rdf:nodeID=\"b7\"/>"));
}

#[test]
fn test_shared_iri_node_rendered_once() {
    let mut g = Graph::new();
    let r1 = g.iri("r1");
    g.typed(r1, "Doc");
    let r2 = g.iri("r2");
    g.typed(r2, "Doc");
    let p = g.iri("p");
    g.typed(p, "Person");
    g.literal(p, "name", "Pat");
    g.prop(r1, "author", p);
    g.prop(r2, "author", p);

    let doc = triples_to_string(&g.set, &namespaces(), "\t").unwrap();
    assert_eq!(doc.matches("rdf:about=\"http://ex.org#p\"").count(), 1);
    assert_eq!(doc.matches("<ex:name>Pat</ex:name>").count(), 1);
    assert!(doc.contains("\t\t<ex:author rdf:resource=\"http://ex.org#p\"/>\n"));
    assert_eq!(top_level_elements(&doc), 2);

    // the full copy goes under the first root
    let r1_pos = doc.find("rdf:about=\"http://ex.org#r1\"").unwrap();
    let r2_pos = doc.find("rdf:about=\"http://ex.org#r2\"").unwrap();
    let p_pos = doc.find("rdf:about=\"http://ex.org#p\"").unwrap();
    assert!(r1_pos < p_pos && p_pos < r2_pos);
}

#[test]
fn test_shared_blank_node_gets_node_id() {
    let mut g = Graph::new();
    let r1 = g.iri("r1");
    g.typed(r1, "Doc");
    let r2 = g.iri("r2");
    g.typed(r2, "Doc");
    let b = g.set.blank("b0");
    g.typed(b, "Person");
    g.literal(b, "name", "Anon");
    g.prop(r1, "author", b);
    g.prop(r2, "author", b);

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    assert!(doc.contains("<ex:Person rdf:nodeID=\"b0\">"));
    assert!(doc.contains("<ex:author rdf:nodeID=\"b0\"/>"));
    assert_eq!(doc.matches("<ex:name>Anon</ex:name>").count(), 1);
}

#[test]
fn test_same_literal_value_at_two_places() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let b = g.iri("b");
    g.typed(b, "Thing");
    g.literal(a, "code", "42");
    g.literal(b, "code", "42");

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    assert_eq!(doc.matches("<ex:code>42</ex:code>").count(), 2);
}

#[test]
fn test_reachable_cycle_is_broken_by_reference() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let b = g.iri("b");
    g.typed(b, "Thing");
    let c = g.iri("c");
    g.typed(c, "Thing");
    g.prop(a, "knows", b);
    g.prop(b, "knows", c);
    g.prop(c, "knows", b);

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    assert_eq!(doc.matches("rdf:about=\"http://ex.org#b\"").count(), 1);
    assert_eq!(doc.matches("rdf:about=\"http://ex.org#c\"").count(), 1);
    assert!(doc.contains("<ex:knows rdf:resource=\"http://ex.org#b\"/>"));
}

#[test]
fn test_rootless_cycle_fails() {
    let mut g = Graph::new();
    let x = g.iri("x");
    g.typed(x, "Thing");
    let y = g.iri("y");
    g.typed(y, "Thing");
    g.prop(x, "knows", y);
    g.prop(y, "knows", x);

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(result, Err(SerializeError::CyclicReference(_))));
}

#[test]
fn test_class_node_with_own_triples_fails() {
    let input = r#"
        @prefix ex: <http://ex.org#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        ex:a a ex:Thing ; ex:name "A" .
        ex:Thing a owl:Class ; ex:label "the thing class" .
    "#;
    let loaded = RdfLoader::parse(input, RdfFormat::Turtle, None).unwrap();

    let result = triples_to_string(&loaded.triples, &loaded.namespaces, "  ");
    assert!(matches!(
        result,
        Err(SerializeError::UnreachableNode(node)) if node == "<http://ex.org#Thing>"
    ));
}

#[test]
fn test_resource_reference_with_own_triples_fails() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let b = g.set.resource("http://ex.org#b");
    g.prop(a, "see", b);
    g.typed(b, "Thing");
    g.literal(b, "name", "lost");

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(
        result,
        Err(SerializeError::UnreachableNode(node)) if node == "<http://ex.org#b>"
    ));
}

#[test]
fn test_resource_subject_without_parent_is_a_root() {
    let mut g = Graph::new();
    let b = g.set.resource("http://ex.org#b");
    g.typed(b, "Thing");
    g.literal(b, "name", "kept");

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    assert!(doc.contains("  <ex:Thing rdf:about=\"http://ex.org#b\">\n    <ex:name>kept</ex:name>\n"));
}

#[test]
fn test_node_below_rootless_cycle_reports_the_cycle() {
    let mut g = Graph::new();
    let x = g.iri("x");
    g.typed(x, "Thing");
    let y = g.iri("y");
    g.typed(y, "Thing");
    let z = g.set.blank("z");
    g.typed(z, "Part");
    g.prop(x, "knows", y);
    g.prop(y, "knows", x);
    g.prop(y, "part", z);

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(result, Err(SerializeError::CyclicReference(_))));
}

#[test]
fn test_numeric_local_name_is_rejected() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    g.literal(a, "42", "v");

    let result = triples_to_string(&g.set, &namespaces(), "  ");
    assert!(matches!(
        result,
        Err(SerializeError::MalformedIdentifier(id)) if id == "http://ex.org#42"
    ));
}

#[test]
fn test_root_count_matches_nodes_without_parent() {
    let mut g = Graph::new();
    let mut expected_roots = Vec::new();
    for i in 0..5 {
        let root = g.iri(&format!("root{}", i));
        g.typed(root, "Thing");
        expected_roots.push(root);
        for j in 0..i {
            let child = g.set.blank(format!("c{}_{}", i, j));
            g.typed(child, "Part");
            g.literal(child, "index", &j.to_string());
            g.prop(root, "part", child);
        }
    }

    let doc = triples_to_string(&g.set, &namespaces(), "\t").unwrap();
    assert_eq!(top_level_elements(&doc), 5);
    assert_eq!(root_nodes(&g.set), expected_roots);
}

#[test]
fn test_idempotent() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    let b = g.set.blank("b");
    g.typed(b, "Part");
    g.prop(a, "part", b);
    g.literal(b, "label", "x");
    let c = g.iri("c");
    g.typed(c, "Thing");

    let first = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    let second = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_deep_chain_does_not_overflow() {
    let mut g = Graph::new();
    let depth = 20_000;
    let mut current = g.iri("n0");
    g.typed(current, "Thing");
    for i in 1..depth {
        let next = g.set.blank(format!("n{}", i));
        g.typed(next, "Thing");
        g.prop(current, "next", next);
        current = next;
    }
    g.literal(current, "end", "done");

    let doc = triples_to_string(&g.set, &namespaces(), "").unwrap();
    assert_eq!(doc.matches("<ex:Thing").count(), depth);
    assert!(doc.contains("<ex:end>done</ex:end>"));
}

#[test]
fn test_round_trip_through_loader() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Doc");
    g.literal(a, "title", "Trees & graphs");
    let en = g.set.literal_with_language("colour", "en");
    g.prop(a, "label", en);
    let year = g
        .set
        .literal_with_datatype("2020", "http://www.w3.org/2001/XMLSchema#integer");
    g.prop(a, "year", year);
    let author = g.set.blank("au");
    g.typed(author, "Person");
    g.literal(author, "name", "Ada");
    g.prop(a, "author", author);
    let other = g.set.resource("http://ex.org#other");
    g.prop(a, "seeAlso", other);

    let doc = triples_to_string(&g.set, &namespaces(), "  ").unwrap();
    let loaded = RdfLoader::parse(&doc, RdfFormat::RdfXml, None).unwrap();
    assert_eq!(loaded.triples.len(), g.set.len());

    let values: Vec<&str> = loaded
        .triples
        .triples()
        .iter()
        .map(|t| loaded.triples.node(t.object).value.as_str())
        .collect();
    assert!(values.contains(&"Trees & graphs"));
    assert!(values.contains(&"colour"));
    assert!(values.contains(&"http://ex.org#other"));

    // reading the output back and writing it again is stable
    let rewritten = triples_to_string(&loaded.triples, &namespaces(), "  ").unwrap();
    assert_eq!(rewritten.matches("<ex:Person>").count(), 1);
    assert!(rewritten.contains("<ex:year rdf:datatype=\"http://www.w3.org/2001/XMLSchema#integer\">2020</ex:year>"));
}

#[test]
fn test_turtle_to_rdfxml() {
    let input = r#"
        @prefix ex: <http://ex.org#> .
        @prefix dc: <http://purl.org/dc/elements/1.1/> .
        ex:book a ex:Book ;
            dc:title "Dune" ;
            ex:author [ a ex:Person ; ex:name "Frank" ] .
    "#;
    let loaded = RdfLoader::parse(input, RdfFormat::Turtle, None).unwrap();
    // declared ahead of the generated prefix for the same namespace
    let mut ns: NamespaceMap = [("ex", "http://ex.org#")].into_iter().collect();
    ns.extend(&loaded.namespaces);

    let doc = RdfXmlSerializer::with_indent("  ")
        .serialize(&loaded.triples, &ns)
        .unwrap();
    assert!(doc.contains(
        "  <ex:Book rdf:about=\"http://ex.org#book\">\n    <dc:title>Dune</dc:title>\n    <ex:author>\n      <ex:Person>\n        <ex:name>Frank</ex:name>\n      </ex:Person>\n    </ex:author>\n  </ex:Book>\n"
    ));
}

#[test]
fn test_write_to_file() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");
    g.literal(a, "name", "file");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.rdf");
    write_to_file(&g.set, &namespaces(), "  ", &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, triples_to_string(&g.set, &namespaces(), "  ").unwrap());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}

#[test]
fn test_write_to_file_nothing_written_on_error() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.literal(a, "name", "untyped");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.rdf");
    let result = write_to_file(&g.set, &namespaces(), "  ", &path);
    assert!(matches!(result, Err(SerializeError::MissingOrAmbiguousType { .. })));
    assert!(!path.exists());
}

#[test]
fn test_write_to_missing_directory_is_io_error() {
    let mut g = Graph::new();
    let a = g.iri("a");
    g.typed(a, "Thing");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.rdf");
    let result = write_to_file(&g.set, &namespaces(), "  ", &path);
    assert!(matches!(result, Err(SerializeError::Io(_))));
}
