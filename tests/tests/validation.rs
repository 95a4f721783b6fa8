//! Validated assignment against the museum fixture.

use ontic_registry::VocabularyClass;
use ontic_tests::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_range_accepts_descendants_only() {
    // GIVEN current_owner with range Actor
    let museum = Museum::load().unwrap();
    let mut graph = museum.graph();
    let painting = graph.create("HumanMadeObject").unwrap();
    let person = graph.create("Person").unwrap();
    let name = graph.create("Name").unwrap();

    // THEN a Person (descendant of Actor) is accepted
    graph.set(painting, "current_owner", person).unwrap();

    // AND a Name is a TypeMismatch
    let err = graph.set(painting, "current_owner", name).unwrap_err();
    assert!(matches!(
        err,
        ModelError::TypeMismatch { ref property, ref expected, ref actual }
            if property == "current_owner" && expected == "Actor" && actual == "Name"
    ));
}

#[test]
fn test_generic_entity_is_accepted_for_any_range() {
    let museum = Museum::load().unwrap();
    let mut graph = museum.graph();
    let painting = graph.create("HumanMadeObject").unwrap();
    let outside = graph
        .entity("BaseResource")
        .ident("http://www.wikidata.org/entity/Q42")
        .create()
        .unwrap();

    graph.set(painting, "current_owner", outside).unwrap();
    assert_eq!(graph.attr(painting, "current_owner"), Some(&Value::Entity(outside)));
}

mod multiplicity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_promote_makes_a_two_element_list() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let person = graph.create("Person").unwrap();
        let first = graph.create("Name").unwrap();
        let second = graph.create("Name").unwrap();

        graph.set(person, "is_identified_by", first).unwrap();
        assert_eq!(graph.attr(person, "is_identified_by"), Some(&Value::Entity(first)));

        graph.set(person, "is_identified_by", second).unwrap();
        assert_eq!(
            graph.attr(person, "is_identified_by"),
            Some(&Value::List(vec![Value::Entity(first), Value::Entity(second)]))
        );
    }

    #[test]
    fn test_strict_rejects_a_second_value() {
        let museum = Museum::load().unwrap();
        let mut graph =
            museum.graph_with(ModelConfig::default().with_multiplicity(Multiplicity::Strict));
        let person = graph.create("Person").unwrap();
        let first = graph.create("Name").unwrap();
        let second = graph.create("Name").unwrap();

        graph.set(person, "is_identified_by", first).unwrap();
        let err = graph.set(person, "is_identified_by", second).unwrap_err();

        assert!(matches!(
            err,
            ModelError::TooManyValues { ref type_name, ref property }
                if type_name == "Person" && property == "is_identified_by"
        ));
        assert_eq!(graph.attr(person, "is_identified_by"), Some(&Value::Entity(first)));
    }

    #[test]
    fn test_multiple_property_is_always_a_list() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let group = graph.create("Group").unwrap();
        let person = graph.create("Person").unwrap();

        graph.set(group, "member", person).unwrap();
        assert_eq!(
            graph.attr(group, "member"),
            Some(&Value::List(vec![Value::Entity(person)]))
        );
    }
}

mod profile {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_disallowed_property_and_class() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let person = graph.create("Person").unwrap();

        assert!(matches!(
            graph.set(person, "nickname", "Janie"),
            Err(ModelError::ProfileViolation { .. })
        ));
        assert!(matches!(
            graph.create("Deprecated"),
            Err(ModelError::ProfileViolation { .. })
        ));
    }

    #[test]
    fn test_warn_property_emits_diagnostic() {
        // GIVEN height flagged as warn-level
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let painting = graph.create("HumanMadeObject").unwrap();

        // WHEN it is used
        graph.set(painting, "height", 363.0).unwrap();

        // THEN the value is stored and a diagnostic recorded
        assert_eq!(graph.attr(painting, "height"), Some(&Value::Float(363.0)));
        let entries = graph.diagnostics_mut().drain();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject, "HumanMadeObject.height");
    }

    #[test]
    fn test_warn_promoted_to_error() {
        let museum = Museum::load().unwrap();
        let mut graph =
            museum.graph_with(ModelConfig::default().with_diagnostics(DiagnosticLevel::Error));
        let painting = graph.create("HumanMadeObject").unwrap();

        assert!(matches!(
            graph.set(painting, "height", 363.0),
            Err(ModelError::Warning(_))
        ));
    }
}

#[test]
fn test_unknown_property_and_reserved_names() {
    let museum = Museum::load().unwrap();
    let mut graph = museum.graph();
    let person = graph.create("Person").unwrap();

    assert!(matches!(
        graph.set(person, "wingspan", 2),
        Err(ModelError::UnknownProperty { .. })
    ));
    assert!(matches!(
        graph.set(person, "@context", CONTEXT_URI),
        Err(ModelError::ReservedName(_))
    ));

    // Internal names bypass validation
    graph.set(person, "_source_row", 17).unwrap();
    assert_eq!(graph.attr(person, "_source_row"), Some(&Value::Int(17)));
}

#[test]
fn test_validation_off_stores_anything() {
    let museum = Museum::load().unwrap();
    let mut graph = museum.graph_with(ModelConfig::default().with_validation(false));
    let person = graph.create("Person").unwrap();

    graph.set(person, "wingspan", 2).unwrap();
    graph.set(person, "wingspan", 3).unwrap();

    assert_eq!(
        graph.attr(person, "wingspan"),
        Some(&Value::List(vec![Value::Int(2), Value::Int(3)]))
    );
}

#[test]
fn test_inverse_is_materialized() {
    let museum = Museum::load().unwrap();
    let mut graph = museum.graph_with(ModelConfig::default().with_inverses(true));
    let group = graph.create("Group").unwrap();
    let person = graph.create("Person").unwrap();

    graph.set(person, "member_of", group).unwrap();

    assert_eq!(
        graph.attr(group, "member"),
        Some(&Value::List(vec![Value::Entity(person)]))
    );
    assert_eq!(
        graph.attr(person, "member_of"),
        Some(&Value::List(vec![Value::Entity(group)]))
    );
}

mod failed_assignment {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generic_target_takes_no_inverse() {
        // GIVEN inverses on and an out-of-model entity
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph_with(ModelConfig::default().with_inverses(true));
        let altarpiece = graph.create("HumanMadeObject").unwrap();
        let outside = graph
            .entity("BaseResource")
            .ident("http://www.wikidata.org/entity/Q42")
            .create()
            .unwrap();

        // WHEN linking to it through a property that has an inverse
        graph.set(altarpiece, "part", outside).unwrap();

        // THEN only the forward edge exists
        assert_eq!(
            graph.attr(altarpiece, "part"),
            Some(&Value::List(vec![Value::Entity(outside)]))
        );
        assert_eq!(graph.attr(outside, "part_of"), None);
    }

    #[test]
    fn test_rejected_list_stores_nothing() {
        // GIVEN a group with one member already
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph_with(ModelConfig::default().with_inverses(true));
        let group = graph.create("Group").unwrap();
        let first = graph.create("Person").unwrap();
        let second = graph.create("Person").unwrap();
        let name = graph.create("Name").unwrap();
        graph.set(group, "member", first).unwrap();

        // WHEN adding a list whose last item is out of range
        let err = graph
            .set(
                group,
                "member",
                Value::List(vec![Value::Entity(second), Value::Entity(name)]),
            )
            .unwrap_err();

        // THEN neither side shows the valid item
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
        assert_eq!(graph.attr(group, "member").unwrap().entities(), vec![first]);
        assert_eq!(graph.attr(second, "member_of"), None);
        assert_eq!(graph.attr(name, "member_of"), None);
    }
}

#[test]
fn test_vocabulary_class_renders_as_its_parent() {
    // GIVEN a Painting vocabulary class over HumanMadeObject
    let museum = Museum::load_with(|registry| {
        registry
            .register_vocabulary(
                VocabularyClass::new("Painting", "HumanMadeObject", "classified_as", "Type")
                    .with_term("http://vocab.getty.edu/aat/300033618", "paintings"),
            )
            .map(|_| ())
    })
    .unwrap();
    let mut graph = museum.graph();

    // WHEN creating and serializing a painting
    let painting = graph.create("Painting").unwrap();
    let document = museum.factory().to_json(&graph, painting).unwrap();

    // THEN it shows as a HumanMadeObject classified by the term
    assert_eq!(
        document,
        json!({
            "@context": CONTEXT_URI,
            "id": "_:b1",
            "type": "HumanMadeObject",
            "classified_as": [{
                "id": "http://vocab.getty.edu/aat/300033618",
                "type": "Type",
                "label": "paintings"
            }]
        })
    );
}

#[test]
fn test_named_instance_classifies_many_objects() {
    // GIVEN an "artwork" term registered by name
    let museum = Museum::load_with(|registry| {
        registry.register_instance(
            "artwork",
            "Type",
            "http://vocab.getty.edu/aat/300133025",
            "works of art",
        )
    })
    .unwrap();
    let mut graph = museum.graph();

    // WHEN two objects are classified with it
    let first = graph.create("HumanMadeObject").unwrap();
    let second = graph.create("HumanMadeObject").unwrap();
    let artwork = graph.instance("artwork").unwrap();
    graph.set(first, "classified_as", artwork).unwrap();
    let again = graph.instance("artwork").unwrap();
    graph.set(second, "classified_as", again).unwrap();

    // THEN both point at one shared entity
    assert_eq!(artwork, again);
    assert_eq!(graph.len(), 3);
    assert_eq!(
        graph.lookup(&Identity::Uri("http://vocab.getty.edu/aat/300133025".into())),
        Some(artwork)
    );
    let document = museum.factory().to_json(&graph, second).unwrap();
    assert_eq!(
        document["classified_as"],
        json!([{
            "id": "http://vocab.getty.edu/aat/300133025",
            "type": "Type",
            "label": "works of art"
        }])
    );

    assert!(matches!(
        graph.instance("sculpture"),
        Err(ModelError::UnknownInstance(_))
    ));
}
