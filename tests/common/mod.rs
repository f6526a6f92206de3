//! Common test utilities for schema and data tree testing.
//!
//! This module provides logging setup, assertion macros, model fixtures and
//! test doubles for the executor, model and codec boundaries.

pub mod fixtures;
pub mod providers;

/// Route `log` output through the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assert that a result failed with a path error of the given code
#[macro_export]
macro_rules! assert_path_error {
    ($result:expr, $code:expr) => {
        match $result {
            Err(yang_path::YangError::Path(e)) => assert_eq!(
                e.code, $code,
                "Expected path error {:?}, got {:?} ({})",
                $code, e.code, e.detail
            ),
            Ok(_) => panic!("Expected path error {:?}, but the call succeeded", $code),
            Err(other) => panic!("Expected path error {:?}, got {:?}", $code, other),
        }
    };
}

/// Assert that a result failed with a model error matching a pattern
#[macro_export]
macro_rules! assert_model_error {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err(yang_path::YangError::Model($pattern)) => {}
            Ok(_) => panic!("Expected model error, but the call succeeded"),
            Err(other) => panic!("Expected model error, got {:?}", other),
        }
    };
}

/// Assert that a data validation failed with `error` reported at `node`
#[macro_export]
macro_rules! assert_reported {
    ($result:expr, $node:expr, $error:expr) => {
        match $result {
            Err(e) => assert!(
                e.contains($node, $error),
                "Expected {:?} at {:?}, got {:?}",
                $error,
                $node,
                e.errors
            ),
            Ok(_) => panic!("Expected {:?}, but validation passed", $error),
        }
    };
}
