//! Property tests for the path engine.
//!
//! Every node's path must find the node again, and repeating a creation
//! must neither add nodes nor change the returned node.

use crate::common::fixtures::{full_schema, interface_path};
use proptest::prelude::*;
use yang_path::DataTree;

proptest! {
    #[test]
    fn test_node_path_finds_node(
        names in prop::collection::vec("[a-zA-Z0-9 ._'\"-]{1,16}", 1..5),
        addresses in prop::collection::vec("[a-z0-9 ./'\"-]{1,12}", 0..4),
        mtu in 68u16..1500,
    ) {
        let mut data = DataTree::new(full_schema());
        let root = data.root();
        for name in &names {
            data.create(root, &interface_path(name, "mtu"), &mtu.to_string()).unwrap();
            for address in &addresses {
                let entry = format!("address[.={}]", yang_path::path::quote(address));
                data.create(root, &interface_path(name, &entry), "").unwrap();
            }
        }

        for node in data.descendants(root).into_iter().skip(1) {
            let path = data.path(node);
            let found = data.find(root, &path).unwrap();
            prop_assert!(found.contains(&node), "{} did not find {:?}", path, node);
        }
    }

    #[test]
    fn test_create_is_idempotent(
        name in "[a-zA-Z0-9._-]{1,16}",
        value in "[a-zA-Z0-9 ._-]{0,20}",
    ) {
        let mut data = DataTree::new(full_schema());
        let root = data.root();
        let path = interface_path(&name, "interfaces-ext:speed");
        let first = data.create(root, &path, &value).unwrap();
        let len = data.len();
        let second = data.create(root, &path, &value).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(data.len(), len);
        prop_assert_eq!(data.get(first), value.as_str());
    }
}
