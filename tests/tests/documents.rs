//! Document input and output through the factory.

use ontic_tests::prelude::*;
use pretty_assertions::assert_eq;

mod output {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_file_under_base_dir() {
        // GIVEN counter identifiers under the base URL and an output directory
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph_with(ModelConfig::default().with_id_scheme(IdScheme::Counter));
        let person = graph.entity("Person").label("Jane").create().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut factory = museum.factory_with(
            museum
                .document_config()
                .with_base_dir(dir.path())
                .with_text(TextMode::Indented),
        );

        // WHEN writing the person
        let path = factory.to_file(&graph, person).unwrap();

        // THEN the file mirrors the identifier's path and parses back
        assert_eq!(path, dir.path().join("Person").join("1.json"));
        let text = std::fs::read_to_string(&path).unwrap();
        let mut copy_graph = museum.graph();
        let copy = factory.read(&mut copy_graph, &text).unwrap();
        assert_eq!(
            copy_graph.identity(copy),
            Some(&Identity::Uri("http://lod.example.org/museum/Person/1".into()))
        );
    }

    #[test]
    fn test_boundary_policy_splits_documents() {
        // GIVEN an object with a part, an owner and membership upward
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph_with(ModelConfig::default().with_inverses(true));
        let altarpiece = graph.entity("HumanMadeObject").label("Altarpiece").create().unwrap();
        let panel = graph.entity("HumanMadeObject").label("Panel").create().unwrap();
        let church = graph.entity("Group").label("Parish").create().unwrap();
        graph.set(altarpiece, "part", panel).unwrap();
        graph.set(altarpiece, "current_owner", church).unwrap();
        let policy = ClassBoundaryPolicy::builder()
            .reference_types(&["Actor"])
            .build(graph.registry())
            .unwrap();
        let mut factory = museum.factory().with_policy(policy);

        // WHEN serializing the altarpiece and the panel
        let whole = factory.to_json(&graph, altarpiece).unwrap();
        let piece = factory.to_json(&graph, panel).unwrap();

        // THEN parts embed downward, actors are references, part_of points upward
        assert_eq!(
            whole,
            json!({
                "@context": CONTEXT_URI,
                "id": "_:b1",
                "type": "HumanMadeObject",
                "label": "Altarpiece",
                "part": [{
                    "id": "_:b2",
                    "type": "HumanMadeObject",
                    "label": "Panel",
                    "part_of": [{"id": "_:b1", "type": "HumanMadeObject", "label": "Altarpiece"}]
                }],
                "current_owner": {"id": "_:b3", "type": "Group", "label": "Parish"}
            })
        );
        assert_eq!(
            piece["part_of"],
            json!([{"id": "_:b1", "type": "HumanMadeObject", "label": "Altarpiece"}])
        );
    }

    #[test]
    fn test_missing_context_uri_is_configuration_error() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let person = graph.create("Person").unwrap();

        let result = museum.factory_with(DocumentConfig::new()).to_string(&graph, person);
        assert!(matches!(result, Err(ModelError::Configuration(_))));
    }

    #[test]
    fn test_recommended_property_diagnostic() {
        let museum = Museum::load_with(|registry| registry.set_recommended("Person", &["label"]))
            .unwrap();
        let mut graph = museum.graph();
        let person = graph.create("Person").unwrap();
        let mut factory = museum.factory();

        factory.to_json(&graph, person).unwrap();

        let entries = factory.diagnostics_mut().drain();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject, "_:b1");
        assert!(entries[0].message.contains("label"));
    }
}

mod input {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forward_reference_resolved_after_the_document() {
        // GIVEN an owner referenced by id before the member list describes it
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let text = r#"{
            "id": "http://ex.org/object/1",
            "type": "HumanMadeObject",
            "current_owner": "http://ex.org/group/1",
            "part": [{
                "id": "http://ex.org/object/2",
                "type": "HumanMadeObject",
                "current_owner": {"id": "http://ex.org/group/1", "type": "Group", "label": "Guild"}
            }]
        }"#;

        // WHEN reading it
        let object = museum.factory().read(&mut graph, text).unwrap();

        // THEN both objects share one owner entity
        let owner = graph
            .lookup(&Identity::Uri("http://ex.org/group/1".into()))
            .unwrap();
        assert_eq!(graph.attr(object, "current_owner"), Some(&Value::Entity(owner)));
        assert_eq!(graph.type_names(owner), vec!["Group"]);
    }

    #[test]
    fn test_unresolved_reference() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let text = r#"{"id": "http://ex.org/object/1", "type": "HumanMadeObject", "current_owner": "http://ex.org/nobody"}"#;

        let err = museum.factory().read(&mut graph, text).unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnresolvedReference { ref target, .. } if target == "http://ex.org/nobody"
        ));
    }

    #[test]
    fn test_failed_read_leaves_graph_unchanged() {
        // GIVEN a graph holding one group
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph_with(ModelConfig::default().with_inverses(true));
        let mut factory = museum.factory();
        let group = factory
            .read(&mut graph, r#"{"id": "http://ex.org/g/1", "type": "Group", "label": "Guild"}"#)
            .unwrap();

        // WHEN a document redescribing it ends in an unresolved reference
        let text = r#"{
            "id": "http://ex.org/g/1",
            "type": "Group",
            "member": [{"id": "http://ex.org/p/1", "type": "Person"}],
            "classified_as": ["http://ex.org/type/404"]
        }"#;
        let err = factory.read(&mut graph, text).unwrap_err();

        // THEN the error is reported and the graph is as before
        assert!(matches!(
            err,
            ModelError::UnresolvedReference { ref target, .. } if target == "http://ex.org/type/404"
        ));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.lookup(&Identity::Uri("http://ex.org/p/1".into())), None);
        assert_eq!(graph.lookup(&Identity::Uri("http://ex.org/g/1".into())), Some(group));
        assert_eq!(graph.attr(group, "label"), Some(&Value::from("Guild")));

        // AND the same URI can still be read into a fresh entity
        let person = factory
            .read(&mut graph, r#"{"id": "http://ex.org/p/1", "type": "Person"}"#)
            .unwrap();
        assert_eq!(graph.type_names(person), vec!["Person"]);
    }

    #[test]
    fn test_type_lists() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let mut factory = museum.factory();

        let event = factory
            .read(&mut graph, r#"{"id": "_:e1", "type": ["Activity", "Destruction"]}"#)
            .unwrap();
        assert_eq!(graph.type_names(event), vec!["Destruction", "Activity"]);

        let err = factory
            .read(&mut graph, r#"{"id": "_:e2", "type": ["Person", "Name"]}"#)
            .unwrap_err();
        assert!(matches!(err, ModelError::AmbiguousType { .. }));
    }

    #[test]
    fn test_malformed_input() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let mut factory = museum.factory();

        for text in ["", "not json", "[1, 2]", "{}", r#"{"type": 7}"#] {
            assert!(
                matches!(factory.read(&mut graph, text), Err(ModelError::MalformedDocument(_))),
                "expected a malformed document for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_unknown_field() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();

        let err = museum
            .factory()
            .read(&mut graph, r#"{"id": "_:p", "type": "Person", "wingspan": 2}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnknownProperty { ref property, .. } if property == "wingspan"
        ));
    }

    #[test]
    fn test_context_reference_hint_without_validation() {
        // GIVEN validation off and a key the schema lacks but the context types as @id
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph_with(ModelConfig::default().with_validation(false));
        let text = r#"{
            "@id": "http://ex.org/person/1",
            "@type": "crm:E21_Person",
            "crm:P14_carried_out_by": ["http://www.wikidata.org/entity/Q5582"]
        }"#;

        // WHEN reading it
        let person = museum.factory().read(&mut graph, text).unwrap();

        // THEN the full id maps back to its term and the string is a reference
        let stub = graph
            .lookup(&Identity::Uri("http://www.wikidata.org/entity/Q5582".into()))
            .unwrap();
        assert_eq!(
            graph.attr(person, "carried_out_by"),
            Some(&Value::List(vec![Value::Entity(stub)]))
        );
    }
}
