//! Validation of interface data against the loaded model.

use crate::assert_reported;
use crate::common::fixtures::{
    base_schema, data_with_interfaces, full_schema, interface, interface_path,
};
use crate::common::init_logging;
use yang_path::config::ValidationConfig;
use yang_path::{DataTree, ValidationError, ValidationOption, ValidationService};

#[test]
fn test_valid_datastore() {
    init_logging();
    let mut data = data_with_interfaces(&full_schema(), &["eth0", "eth1"]);
    let root = data.root();
    data.create(root, &interface_path("eth0", "mtu"), "1500").unwrap();
    data.create(root, &interface_path("eth0", "vlan-id"), "100").unwrap();
    data.create(root, &interface_path("eth0", "address[.='10.0.0.1/24']"), "")
        .unwrap();
    data.create(root, &interface_path("eth1", "interfaces-ext:speed"), "10000")
        .unwrap();
    data.create(root, &interface_path("eth1", "type"), "fast-ethernet").unwrap();

    let service = ValidationService::new();
    assert!(service.validate_tree(&data).is_ok());
    assert!(!service.diagnose(&data, root, ValidationOption::Datastore).has_errors());
}

#[test]
fn test_value_errors_reported_per_node() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let root = data.root();
    // deviated range is 68..1500
    let mtu = data.create(root, &interface_path("eth0", "mtu"), "9000").unwrap();
    let enabled = data.create(root, &interface_path("eth0", "enabled"), "yes").unwrap();
    let kind = data.create(root, &interface_path("eth0", "type"), "token-ring").unwrap();
    let speed = data
        .create(root, &interface_path("eth0", "interfaces-ext:speed"), "fast")
        .unwrap();
    let address = data
        .create(root, &interface_path("eth0", "address[.='10.0.0.1']"), "")
        .unwrap();

    let result = ValidationService::new().validate_tree(&data);
    let error = result.as_ref().unwrap_err();
    assert_eq!(error.errors.len(), 5);
    assert_reported!(&result, mtu, ValidationError::RangeViolation);
    assert_reported!(&result, enabled, ValidationError::InvalidBoolVal);
    assert_reported!(&result, kind, ValidationError::InvalidIdentity);
    assert_reported!(&result, speed, ValidationError::Inval);
    assert_reported!(&result, address, ValidationError::InvalidPattern);
}

#[test]
fn test_deviation_changes_accepted_values() {
    let mut full = data_with_interfaces(&full_schema(), &["eth0"]);
    let mut base = data_with_interfaces(&base_schema(), &["eth0"]);
    for data in [&mut full, &mut base] {
        let root = data.root();
        data.create(root, &interface_path("eth0", "mtu"), "9000").unwrap();
    }
    let service = ValidationService::new();
    assert!(service.validate_tree(&full).is_err());
    assert!(service.validate_tree(&base).is_ok());
}

#[test]
fn test_missing_mandatory_leaf() {
    let mut data = DataTree::new(full_schema());
    let root = data.root();
    data.create(root, &interface_path("eth0", "mtu"), "1500").unwrap();
    let instance = interface(&data, "eth0");

    let service = ValidationService::new();
    let result = service.validate(&data, root, ValidationOption::Datastore);
    assert_reported!(&result, instance, ValidationError::MissElem);

    // partial content is fine for an edit
    assert!(service.validate(&data, root, ValidationOption::EditConfig).is_ok());
}

#[test]
fn test_state_data_option() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let root = data.root();
    data.create(root, &interface_path("eth0", "statistics/in-octets"), "1024")
        .unwrap();
    let statistics = data
        .find(root, &interface_path("eth0", "statistics"))
        .unwrap()[0];

    let service = ValidationService::new();
    assert!(service.validate(&data, root, ValidationOption::Get).is_ok());
    assert!(service.validate(&data, root, ValidationOption::Datastore).is_ok());
    let result = service.validate(&data, root, ValidationOption::GetConfig);
    assert_reported!(&result, statistics, ValidationError::InElem);
    assert_eq!(result.unwrap_err().errors.len(), 1);
}

#[test]
fn test_max_elements() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let root = data.root();
    for i in 1..=5 {
        data.create(
            root,
            &interface_path("eth0", &format!("address[.='10.0.{i}.1/24']")),
            "",
        )
        .unwrap();
    }
    let instance = interface(&data, "eth0");
    let result = ValidationService::new().validate_tree(&data);
    assert_reported!(&result, instance, ValidationError::NoMax);
}

#[test]
fn test_diagnostics_chain() {
    let mut data = data_with_interfaces(&full_schema(), &["eth0"]);
    let root = data.root();
    let mtu = data.create(root, &interface_path("eth0", "mtu"), "1").unwrap();
    let instance = interface(&data, "eth0");

    let diagnostics = ValidationService::new().diagnose(&data, root, ValidationOption::Datastore);
    assert_eq!(diagnostics.error_count(), 1);
    let flat = diagnostics.flatten();
    let (chain, error) = &flat[0];
    assert_eq!(**error, ValidationError::RangeViolation);
    let chain: Vec<_> = chain.iter().map(|id| **id).collect();
    assert_eq!(chain.first(), Some(&root));
    assert_eq!(chain.last(), Some(&mtu));
    assert!(chain.contains(&instance));
}

#[test]
fn test_structure_checks_disabled() {
    let mut data = DataTree::new(full_schema());
    let root = data.root();
    let mtu = data.create(root, &interface_path("eth0", "mtu"), "1").unwrap();

    let config = ValidationConfig {
        option: ValidationOption::Datastore,
        check_structure: false,
    };
    let result = ValidationService::with_config(&config).validate_tree(&data);
    let errors = result.as_ref().unwrap_err();
    assert_eq!(errors.errors.len(), 1);
    assert_reported!(&result, mtu, ValidationError::RangeViolation);
}
