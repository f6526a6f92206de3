//! Operation binding and invocation through an executor.

use crate::assert_reported;
use crate::common::fixtures::{full_schema, interface_path};
use crate::common::init_logging;
use crate::common::providers::LoopbackExecutor;
use yang_path::{Rpc, ValidationError, ValidationOption, ValidationService, YangError};

#[test]
fn test_invoke_with_output() {
    init_logging();
    let schema = full_schema();
    let executor = LoopbackExecutor::new(schema.clone());

    let mut rpc = Rpc::new(schema, "/interfaces:reset").unwrap();
    rpc.create_input("name", "eth0").unwrap();
    let output = rpc.invoke(&executor).unwrap().expect("reset has output");

    let status = output
        .find(output.root(), "/interfaces:reset/output/status")
        .unwrap();
    assert_eq!(output.get(status[0]), "ok");
    assert_eq!(*executor.invoked.borrow(), vec!["/interfaces:reset".to_string()]);
}

#[test]
fn test_executor_sees_input() {
    let schema = full_schema();
    let executor = LoopbackExecutor::new(schema.clone());
    let mut rpc = Rpc::new(schema, "/interfaces:reset").unwrap();
    rpc.create_input("name", "fail").unwrap();

    let output = rpc.invoke(&executor).unwrap().unwrap();
    let status = output
        .find(output.root(), "/interfaces:reset/output/status")
        .unwrap();
    assert_eq!(output.get(status[0]), "failed");
}

#[test]
fn test_executor_error_passed_through() {
    let schema = full_schema();
    let executor = LoopbackExecutor::new(schema.clone());
    let mut rpc = Rpc::new(schema, "/interfaces:reset").unwrap();
    rpc.create_input("name", "offline").unwrap();

    match rpc.invoke(&executor) {
        Err(YangError::Provider(source)) => assert_eq!(source.to_string(), "device offline"),
        other => panic!("Expected Provider error, got {other:?}"),
    }
}

#[test]
fn test_invoke_without_output() {
    let schema = full_schema();
    let executor = LoopbackExecutor::new(schema.clone());
    let mut rpc = Rpc::new(schema, "/interfaces:clear-counters").unwrap();
    rpc.create_input("all", "").unwrap();

    assert!(!rpc.has_output());
    assert!(rpc.invoke(&executor).unwrap().is_none());
    assert_eq!(executor.invoked.borrow().len(), 1);
}

#[test]
fn test_executor_for_other_schema() {
    let executor = LoopbackExecutor::new(full_schema());
    let rpc = Rpc::new(full_schema(), "/interfaces:reset").unwrap();
    match rpc.invoke(&executor) {
        Err(YangError::IllegalState { .. }) => {}
        other => panic!("Expected IllegalState, got {other:?}"),
    }
    assert!(executor.invoked.borrow().is_empty());
}

#[test]
fn test_bind_requires_rpc() {
    let schema = full_schema();
    match Rpc::new(schema.clone(), "/interfaces:interfaces") {
        Err(YangError::InvalidArgument { .. }) => {}
        other => panic!("Expected InvalidArgument, got {other:?}"),
    }
    match Rpc::new(schema, "/interfaces:reboot") {
        Err(YangError::InvalidArgument { .. }) => {}
        other => panic!("Expected InvalidArgument, got {other:?}"),
    }
}

#[test]
fn test_input_validation() {
    let schema = full_schema();
    let service = ValidationService::new();

    let mut rpc = Rpc::new(schema.clone(), "/interfaces:reset").unwrap();
    let delay = rpc.create_input("delay", "1.505").unwrap();
    let input = rpc.input().unwrap();
    let result = service.validate(rpc.data(), input, ValidationOption::Datastore);
    assert_reported!(&result, input, ValidationError::MissElem);
    assert_reported!(&result, delay, ValidationError::InvalAttr);

    // the referenced interface must exist in the same tree
    let mut rpc = Rpc::new(schema, "/interfaces:reset").unwrap();
    let name = rpc.create_input("name", "eth0").unwrap();
    let input = rpc.input().unwrap();
    let result = service.validate(rpc.data(), input, ValidationOption::Datastore);
    assert_reported!(&result, name, ValidationError::NoLeafref);

    let root = rpc.data().root();
    rpc.data_mut()
        .create(root, &interface_path("eth0", "type"), "ethernet")
        .unwrap();
    assert!(service.validate(rpc.data(), input, ValidationOption::Datastore).is_ok());
}
