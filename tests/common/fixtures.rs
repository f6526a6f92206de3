//! Model and data fixtures built from the embedded interface model.

use std::sync::Arc;
use yang_path::providers::Repository;
use yang_path::schema::Capability;
use yang_path::{DataNodeId, DataTree, RootSchemaNode};

/// Capabilities of a device supporting every sample module.
pub fn full_capabilities() -> Vec<Capability> {
    vec![
        Capability::new("interfaces", "2024-01-01")
            .with_feature("vlan")
            .with_deviation("interfaces-deviations"),
        Capability::new("interfaces-ext", "2024-02-01"),
    ]
}

/// Schema with every sample module, the vlan feature and the deviations.
pub fn full_schema() -> Arc<RootSchemaNode> {
    Repository::with_embedded_modules()
        .and_then(|mut r| r.create_root_schema(&full_capabilities()))
        .expect("Failed to build the full interface schema")
}

/// Schema of the base interfaces module alone, without features.
pub fn base_schema() -> Arc<RootSchemaNode> {
    Repository::with_embedded_modules()
        .and_then(|mut r| r.create_root_schema(&[Capability::new("interfaces", "")]))
        .expect("Failed to build the base interface schema")
}

/// `/interfaces:interfaces/interface[name='<name>']/<rest>`, or the list
/// instance itself for an empty `rest`.
pub fn interface_path(name: &str, rest: &str) -> String {
    let instance = format!(
        "/interfaces:interfaces/interface[name={}]",
        yang_path::path::quote(name)
    );
    if rest.is_empty() {
        instance
    } else {
        format!("{instance}/{rest}")
    }
}

/// A data tree holding one valid ethernet interface per name.
pub fn data_with_interfaces(schema: &Arc<RootSchemaNode>, names: &[&str]) -> DataTree {
    let mut data = DataTree::new(Arc::clone(schema));
    let root = data.root();
    for name in names {
        data.create(root, &interface_path(name, "type"), "ethernet")
            .expect("Failed to create interface");
        data.create(root, &interface_path(name, "enabled"), "true")
            .expect("Failed to create interface");
    }
    data
}

/// The single list instance for an interface name.
pub fn interface(data: &DataTree, name: &str) -> DataNodeId {
    let found = data
        .find(data.root(), &interface_path(name, ""))
        .expect("Failed to look up interface");
    assert_eq!(found.len(), 1, "expected exactly one interface '{name}'");
    found[0]
}
