//! Scenario tests against the museum fixture.

use ontic_tests::prelude::*;
use pretty_assertions::assert_eq;

mod jane_doe {
    use super::*;
    use pretty_assertions::assert_eq;

    fn person_with_name(graph: &mut Graph) -> (EntityId, EntityId) {
        let person = graph.create("Person").unwrap();
        let name = graph.entity("Name").content("Jane Doe").create().unwrap();
        graph.set(person, "is_identified_by", name).unwrap();
        (person, name)
    }

    #[test]
    fn test_serialize_person_with_name() {
        // GIVEN a person identified by a single name
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let (person, _) = person_with_name(&mut graph);

        // WHEN serializing the person
        let document = museum.factory().to_json(&graph, person).unwrap();

        // THEN the single-valued name is embedded as an object
        assert_eq!(
            document,
            json!({
                "@context": CONTEXT_URI,
                "id": "_:b1",
                "type": "Person",
                "is_identified_by": {"id": "_:b2", "type": "Name", "value": "Jane Doe"}
            })
        );
    }

    #[test]
    fn test_deserialize_reconstructs_person() {
        // GIVEN the serialized person
        let museum = Museum::load().unwrap();
        let mut source = museum.graph();
        let (person, _) = person_with_name(&mut source);
        let mut factory = museum.factory();
        let document = factory.to_json(&source, person).unwrap();

        // WHEN reading it into a fresh graph
        let mut target = museum.graph();
        let copy = factory.read_value(&mut target, &document).unwrap();

        // THEN the copy has the same identity, type and name
        assert_eq!(target.identity(copy), Some(&Identity::Blank("b1".into())));
        assert_eq!(target.type_names(copy), vec!["Person"]);
        let name = target
            .attr(copy, "is_identified_by")
            .and_then(Value::as_entity)
            .unwrap();
        assert_eq!(target.type_names(name), vec!["Name"]);
        assert_eq!(target.attr(name, "value"), Some(&Value::from("Jane Doe")));
        assert_eq!(target.len(), 2);
    }
}

mod shared_entity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_second_parent_gets_a_stub() {
        // GIVEN two objects owned by the same named person
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let collection = graph.create("HumanMadeObject").unwrap();
        let first = graph.create("HumanMadeObject").unwrap();
        let second = graph.create("HumanMadeObject").unwrap();
        let owner = graph.entity("Person").label("Jane").create().unwrap();
        let name = graph.entity("Name").content("Jane Doe").create().unwrap();
        graph.set(owner, "is_identified_by", name).unwrap();
        graph.set(collection, "part", vec![first, second]).unwrap();
        graph.set(first, "current_owner", owner).unwrap();
        graph.set(second, "current_owner", owner).unwrap();

        // WHEN serializing the collection
        let document = museum.factory().to_json(&graph, collection).unwrap();

        // THEN the first visit expands the owner and the second refers to it
        assert_eq!(
            document["part"][0]["current_owner"],
            json!({
                "id": "_:b4",
                "type": "Person",
                "label": "Jane",
                "is_identified_by": {"id": "_:b5", "type": "Name", "value": "Jane Doe"}
            })
        );
        assert_eq!(
            document["part"][1]["current_owner"],
            json!({"id": "_:b4", "type": "Person", "label": "Jane"})
        );
    }

    #[test]
    fn test_stub_without_label_is_id_and_type() {
        let museum = Museum::load().unwrap();
        let mut graph = museum.graph();
        let group = graph.create("Group").unwrap();
        let first = graph.create("Person").unwrap();
        let second = graph.create("Person").unwrap();
        let name = graph.entity("Name").content("Smith").create().unwrap();
        graph.set(group, "member", vec![first, second]).unwrap();
        graph.set(first, "is_identified_by", name).unwrap();
        graph.set(second, "is_identified_by", name).unwrap();

        let document = museum.factory().to_json(&graph, group).unwrap();

        assert_eq!(
            document["member"][0]["is_identified_by"],
            json!({"id": "_:b4", "type": "Name", "value": "Smith"})
        );
        assert_eq!(
            document["member"][1]["is_identified_by"],
            json!({"id": "_:b4", "type": "Name"})
        );
    }
}

mod schema {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_type_node_per_class() {
        let museum = Museum::load().unwrap();
        let registry = museum.registry();

        // Eleven declared classes plus the synthetic root
        assert_eq!(registry.type_count(), 12);
        let mut class_ids: Vec<&str> = registry.all_types().map(|t| t.class_id.as_str()).collect();
        class_ids.sort();
        class_ids.dedup();
        assert_eq!(class_ids.len(), 12);
    }

    #[test]
    fn test_undeclared_domain_lands_on_root() {
        // GIVEN shelf_mark declared for a class the schema never defines
        let museum = Museum::load().unwrap();
        let registry = museum.registry();

        // THEN it is a property of the root type and so of every type
        assert!(registry.find_property(registry.root(), "shelf_mark").is_some());
        let mut graph = museum.graph();
        let person = graph.create("Person").unwrap();
        graph.set(person, "shelf_mark", "B-12").unwrap();
        assert_eq!(graph.attr(person, "shelf_mark"), Some(&Value::from("B-12")));
    }

    #[test]
    fn test_ancestor_chain() {
        let museum = Museum::load().unwrap();
        let registry = museum.registry();
        let person = registry.get_type_id("Person").unwrap();

        let names: Vec<&str> = registry
            .ancestors(person)
            .iter()
            .filter_map(|t| registry.get_type(*t))
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Person", "Actor", "CRMEntity", "BaseResource"]);
    }
}
