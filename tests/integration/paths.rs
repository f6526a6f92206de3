//! Path creation and lookup on interface data.

use crate::assert_path_error;
use crate::common::fixtures::{
    base_schema, data_with_interfaces, full_schema, interface, interface_path,
};
use crate::common::init_logging;
use yang_path::{DataTree, PathErrorCode};

#[test]
fn test_create_list_instance_with_key() {
    init_logging();
    let mut data = DataTree::new(full_schema());
    let root = data.root();
    let mtu = data
        .create(root, &interface_path("eth0", "mtu"), "1500")
        .unwrap();

    let instance = interface(&data, "eth0");
    assert_eq!(data.parent(mtu), Some(instance));
    assert_eq!(data.path(instance), "/interfaces:interfaces/interface[name='eth0']");
    assert_eq!(data.path(mtu), "/interfaces:interfaces/interface[name='eth0']/mtu");

    let name = data.find(instance, "name").unwrap();
    assert_eq!(name.len(), 1);
    assert_eq!(data.get(name[0]), "eth0");
    assert!(data.schema(name[0]).is_key());
}

#[test]
fn test_find_across_instances() {
    let data = data_with_interfaces(&full_schema(), &["eth0", "eth1", "lo"]);
    let root = data.root();

    assert_eq!(data.find(root, "/interfaces:interfaces/interface").unwrap().len(), 3);
    let names: Vec<_> = data
        .find(root, "/interfaces:interfaces/interface/name")
        .unwrap()
        .into_iter()
        .map(|n| data.get(n).to_string())
        .collect();
    assert_eq!(names, vec!["eth0", "eth1", "lo"]);

    let all = data.find(root, &interface_path("eth1", "*")).unwrap();
    let leaves: Vec<_> = all.iter().map(|n| data.schema(*n).name()).collect();
    assert_eq!(leaves, vec!["name", "type", "enabled"]);

    assert!(data.find(root, &interface_path("eth9", "type")).unwrap().is_empty());
}

#[test]
fn test_augmented_leaf_uses_own_prefix() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let root = data.root();
    let speed = data
        .create(root, &interface_path("eth0", "interfaces-ext:speed"), "auto")
        .unwrap();
    assert_eq!(
        data.path(speed),
        "/interfaces:interfaces/interface[name='eth0']/interfaces-ext:speed"
    );
    assert_eq!(data.find(root, &data.path(speed)).unwrap(), vec![speed]);

    // the wildcard stays within the list's module
    let all = data.find(root, &interface_path("eth0", "*")).unwrap();
    assert!(!all.contains(&speed));
}

#[test]
fn test_leaf_list_entries() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let root = data.root();
    let first = data
        .create(root, &interface_path("eth0", "address[.='10.0.0.1/24']"), "")
        .unwrap();
    let again = data
        .create(root, &interface_path("eth0", "address[.='10.0.0.1/24']"), "")
        .unwrap();
    let second = data
        .create(root, &interface_path("eth0", "address[.='10.0.1.1/24']"), "")
        .unwrap();

    assert_eq!(first, again);
    assert_ne!(first, second);
    assert_eq!(data.get(second), "10.0.1.1/24");
    assert_eq!(
        data.path(first),
        "/interfaces:interfaces/interface[name='eth0']/address[.='10.0.0.1/24']"
    );
    assert_eq!(
        data.find(root, &interface_path("eth0", "address")).unwrap(),
        vec![first, second]
    );
}

#[test]
fn test_overwrite_and_filter() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let root = data.root();
    let path = interface_path("eth0", "mtu");
    let mtu = data.create(root, &path, "1500").unwrap();

    assert_eq!(data.create_filter(root, &path, "").unwrap(), mtu);
    assert_eq!(data.get(mtu), "1500");

    data.create_filter(root, &path, "1400").unwrap();
    assert_eq!(data.get(mtu), "1400");

    data.create(root, &path, "").unwrap();
    assert_eq!(data.get(mtu), "");
}

#[test]
fn test_relative_paths_from_instance() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let instance = interface(&data, "eth0");
    let mtu = data.create(instance, "mtu", "1400").unwrap();
    assert_eq!(data.find(instance, "mtu").unwrap(), vec![mtu]);

    let octets = data.create(instance, "statistics/in-octets", "42").unwrap();
    assert_eq!(
        data.path(octets),
        "/interfaces:interfaces/interface[name='eth0']/statistics/in-octets"
    );
}

#[test]
fn test_key_values_needing_quotes() {
    let mut data = DataTree::new(full_schema());
    let root = data.root();
    let created = data
        .create(root, &interface_path("it's", "mtu"), "1500")
        .unwrap();
    let path = data.path(created);
    assert_eq!(path, "/interfaces:interfaces/interface[name=\"it's\"]/mtu");
    assert_eq!(data.find(root, &path).unwrap(), vec![created]);

    let both = data
        .create(root, &interface_path("say \"it's\"", "mtu"), "1500")
        .unwrap();
    let path = data.path(both);
    assert_eq!(
        path,
        "/interfaces:interfaces/interface[name=concat('say \"it', \"'\", 's\"')]/mtu"
    );
    assert_eq!(data.find(root, &path).unwrap(), vec![both]);
}

#[test]
fn test_module_errors() {
    let mut data = DataTree::new(full_schema());
    let root = data.root();
    assert_path_error!(
        data.create(root, "/interfaces/interface[name='eth0']", ""),
        PathErrorCode::MissingModule
    );
    assert_path_error!(
        data.find(root, "/vendor:interfaces"),
        PathErrorCode::InvalidModule
    );
    assert_path_error!(
        data.create(root, "interfaces/interface[name='eth0']", ""),
        PathErrorCode::MissingModule
    );
}

#[test]
fn test_node_errors() {
    let mut data = DataTree::new(full_schema());
    let root = data.root();
    assert_path_error!(
        data.create(root, "/interfaces:interfaces/bogus", ""),
        PathErrorCode::InvalidNode
    );
    // removed by a deviation
    assert_path_error!(
        data.create(root, &interface_path("eth0", "description"), "uplink"),
        PathErrorCode::InvalidNode
    );
    assert_path_error!(
        data.create(root, "/interfaces:interfaces/interface/mtu", "1500"),
        PathErrorCode::MissingKey
    );
    assert_path_error!(
        data.create(root, "/interfaces:interfaces/interface[mtu='1500']/type", "ethernet"),
        PathErrorCode::InvalidKey
    );

    let mut base = DataTree::new(base_schema());
    let root = base.root();
    // feature disabled
    assert_path_error!(
        base.create(root, &interface_path("eth0", "vlan-id"), "10"),
        PathErrorCode::InvalidNode
    );
}

#[test]
fn test_syntax_errors() {
    let data = DataTree::new(full_schema());
    let root = data.root();
    assert_path_error!(
        data.find(root, "/interfaces:interfaces/interface[name='eth0"),
        PathErrorCode::UnexpectedEof
    );
    assert_path_error!(
        data.find(root, "/interfaces:interfaces/interface[name=eth0]"),
        PathErrorCode::InvalidOperand
    );
    assert_path_error!(data.find(root, ""), PathErrorCode::UnexpectedEof);
}

#[test]
fn test_failed_create_changes_nothing() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let root = data.root();
    let before = data.len();
    assert_path_error!(
        data.create(root, &interface_path("eth1", "bogus"), "x"),
        PathErrorCode::InvalidNode
    );
    assert_eq!(data.len(), before);
    assert!(data.find(root, &interface_path("eth1", "")).unwrap().is_empty());
}

#[test]
fn test_value_on_container_ignored() {
    let mut data = DataTree::new(full_schema());
    let root = data.root();
    let container = data.create(root, "/interfaces:interfaces", "ignored").unwrap();
    assert_eq!(data.value(container), None);
    assert_eq!(data.create_path(root, "/interfaces:interfaces").unwrap(), container);
}
