//! Integration tests against the embedded interface model.

pub mod codec;
pub mod operations;
pub mod paths;
pub mod properties;
pub mod repository;
pub mod validation;
