//! Round trips through documents under both naming modes.

use ontic_tests::prelude::*;
use pretty_assertions::assert_eq;

/// Group with two members, one of them named, plus an outside reference.
fn sample(graph: &mut Graph) -> EntityId {
    let group = graph
        .entity("Group")
        .ident("group/1")
        .label("Night Watch Company")
        .create()
        .unwrap();
    let captain = graph.entity("Person").ident("person/1").label("Frans").create().unwrap();
    let lieutenant = graph.entity("Person").ident("person/2").create().unwrap();
    let name = graph.entity("Name").content("Frans Banninck Cocq").create().unwrap();
    let wikidata = graph
        .entity("BaseResource")
        .ident("http://www.wikidata.org/entity/Q219831")
        .create()
        .unwrap();
    graph.set(captain, "is_identified_by", name).unwrap();
    graph.set(group, "member", vec![captain, lieutenant]).unwrap();
    graph.set(group, "equivalent", wikidata).unwrap();
    group
}

fn round_trip(museum: &Museum, config: DocumentConfig, model: ModelConfig) {
    // GIVEN a graph serialized with a configuration
    let mut source = museum.graph_with(model.clone());
    let root = sample(&mut source);
    let mut factory = museum.factory_with(config);
    let document = factory.to_json(&source, root).unwrap();

    // WHEN reading it back and serializing again
    let mut target = museum.graph_with(model);
    let copy = factory.read_value(&mut target, &document).unwrap();
    let again = factory.to_json(&target, copy).unwrap();

    // THEN nothing is lost or added
    assert_eq!(again, document);
    assert_eq!(target.len(), source.len());
}

#[test]
fn test_round_trip_short_names() {
    let museum = Museum::load().unwrap();
    round_trip(&museum, museum.document_config(), ModelConfig::default());
}

#[test]
fn test_round_trip_full_names() {
    let museum = Museum::load().unwrap();
    round_trip(
        &museum,
        museum.document_config().with_naming(Naming::Full),
        ModelConfig::default(),
    );
}

#[test]
fn test_round_trip_with_inverses() {
    let museum = Museum::load().unwrap();
    round_trip(
        &museum,
        museum.document_config(),
        ModelConfig::default().with_inverses(true),
    );
}

#[test]
fn test_full_names_use_context_ids() {
    // GIVEN a context that maps value to a different ontology id than the schema
    let museum = Museum::load().unwrap();
    let mut graph = museum.graph();
    let name = graph.entity("Name").label("Name").content("Jane").create().unwrap();

    // WHEN rendering full names
    let document = museum
        .factory_with(museum.document_config().with_naming(Naming::Full))
        .to_json(&graph, name)
        .unwrap();

    // THEN the context id wins
    assert_eq!(
        document,
        json!({
            "@context": CONTEXT_URI,
            "@id": "_:b1",
            "@type": "crm:E41_Appellation",
            "rdfs:label": "Name",
            "crm:P190_has_symbolic_content": "Jane"
        })
    );
}

#[test]
fn test_self_reference_terminates() {
    // GIVEN a group that is a member of itself
    let museum = Museum::load().unwrap();
    let mut graph = museum.graph_with(ModelConfig::default().with_inverses(true));
    let group = graph.entity("Group").label("Ouroboros").create().unwrap();
    graph.set(group, "member", group).unwrap();

    // WHEN serializing
    let document = museum.factory().to_json(&graph, group).unwrap();

    // THEN both directions of the loop are stubs
    let stub = json!({"id": "_:b1", "type": "Group", "label": "Ouroboros"});
    assert_eq!(document["member"], json!([stub.clone()]));
    assert_eq!(document["member_of"], json!([stub]));
}

#[test]
fn test_transitive_cycle_terminates() {
    let museum = Museum::load().unwrap();
    let mut graph = museum.graph();
    let outer = graph.create("HumanMadeObject").unwrap();
    let inner = graph.create("HumanMadeObject").unwrap();
    graph.set(outer, "part", inner).unwrap();
    graph.set(inner, "part", outer).unwrap();

    let text = museum.factory().to_string(&graph, outer).unwrap();

    assert_eq!(
        text,
        r#"{"@context":"https://linked.art/ns/v1/linked-art.json","id":"_:b1","type":"HumanMadeObject","part":[{"id":"_:b2","type":"HumanMadeObject","part":[{"id":"_:b1","type":"HumanMadeObject"}]}]}"#
    );
}
