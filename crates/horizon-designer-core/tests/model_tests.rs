//! Integration tests for the document model: families, schema resolution,
//! the node arena and identifiers working together.

use std::any::Any;

use horizon_designer_core::{
    lookup_by_key, AttributeSchema, AttributeStore, CapabilityRegistry, FamilyTraits,
    IdentifierRegistry, NodeTree, NodeTreeDebug, SetterError, Size, TreeFormatOptions, Widget,
};

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug)]
struct Block {
    type_name: &'static str,
    label: String,
    min: Size,
}

impl Widget for Block {
    fn type_name(&self) -> &str {
        self.type_name
    }
    fn set_minimum_size(&mut self, size: Size) {
        self.min = size;
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn families() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    registry.register_family("demo.Item", None, FamilyTraits::default());
    registry.register_family("demo.Group", Some("demo.Item"), FamilyTraits::container());
    registry.register_family("demo.Label", Some("demo.Item"), FamilyTraits::default());
    for type_name in ["demo.Group", "demo.Label"] {
        registry.register_constructor(type_name, move || {
            Box::new(Block {
                type_name,
                label: String::new(),
                min: Size::default(),
            })
        });
    }
    registry.register_setter("demo.Label", "setLabel", |widget, value| {
        let label = widget
            .as_any_mut()
            .downcast_mut::<Block>()
            .ok_or_else(|| SetterError::unsupported("demo.Label"))?;
        label.label = value.to_owned();
        Ok(())
    });
    registry
}

const OWN: &str = r#"{
    "demo.Item": [
        {"attributeName": "android:id", "className": "demo.Item", "methodName": "setId", "argumentType": "id"}
    ],
    "demo.Label": [
        {"attributeName": "demo:label", "className": "demo.Label", "methodName": "setLabel", "argumentType": "string"}
    ]
}"#;

const CONTRIBUTED: &str = r#"{
    "demo.Group": [
        {"attributeName": "demo:slot", "className": "demo.Group", "methodName": "setSlot", "argumentType": "int"}
    ]
}"#;

#[test]
fn test_build_and_edit_a_small_tree() {
    setup();
    let registry = families();
    let schema = AttributeSchema::from_json_str(OWN, CONTRIBUTED).unwrap();
    let mut tree = NodeTree::new();
    let mut identifiers = IdentifierRegistry::new();

    let group = tree.insert(registry.construct("demo.Group").unwrap(), AttributeStore::new());
    tree.attach(group, tree.root(), None).unwrap();
    let label = tree.insert(
        registry.construct("demo.Label").unwrap(),
        [("android:id", "@+id/title"), ("demo:label", "Hello")]
            .into_iter()
            .collect(),
    );
    tree.attach(label, group, None).unwrap();
    identifiers.assign(label, "@+id/title").unwrap();

    let resolved = schema.resolve(&registry, "demo.Label", Some("demo.Group"));
    let keys: Vec<&str> = resolved.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(keys, ["demo:slot", "android:id", "demo:label"]);

    let definition = lookup_by_key("demo:label", &resolved).unwrap();
    registry
        .invoke(definition, tree.instance_mut(label).unwrap(), "Hello")
        .unwrap();
    let widget = tree.instance(label).unwrap().as_any().downcast_ref::<Block>().unwrap();
    assert_eq!(widget.label, "Hello");

    let dump = NodeTreeDebug::with_options(TreeFormatOptions::default())
        .format_tree(&tree, Some(&identifiers))
        .unwrap();
    assert!(dump.contains("Group"));
    assert!(dump.contains("Label #title"));

    let released = identifiers.release_subtree(&tree, group).unwrap();
    assert_eq!(released, ["title"]);
    tree.destroy(group).unwrap();
    assert!(tree.is_empty());
    assert!(identifiers.is_empty());
}

#[test]
fn test_resolution_without_container() {
    setup();
    let registry = families();
    let schema = AttributeSchema::from_json_str(OWN, CONTRIBUTED).unwrap();
    let resolved = schema.resolve(&registry, "demo.Group", None);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name, "android:id");
}
