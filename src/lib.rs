//! Schema-typed YANG data trees for Rust.
//!
//! Provides an immutable schema tree built from module definitions, data
//! trees bound to it, a path language for finding and creating nodes, and
//! value and structure validation with accumulated diagnostics.
//!
//! # Core Components
//!
//! - [`RootSchemaNode`] - Frozen schema tree, shared by every data tree built on it
//! - [`DataTree`] - Instance data, navigated and extended with path expressions
//! - [`Repository`] - Loads module definitions and builds schema trees from capabilities
//! - [`ValidationService`] - Checks data trees against their schema
//! - [`Rpc`] - Binds operation input to a schema `rpc` node for a [`ServiceProvider`]
//!
//! # Quick Start
//!
//! ```rust
//! use yang_path::{DataTree, Repository, ValidationService};
//! use yang_path::schema::Capability;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Repository::with_embedded_modules()?
//!     .create_root_schema(&[Capability::new("interfaces", "2024-01-01")])?;
//!
//! let mut data = DataTree::new(schema);
//! let root = data.root();
//! data.create(root, "/interfaces:interfaces/interface[name='eth0']/type", "ethernet")?;
//! let mtu = data.create(root, "/interfaces:interfaces/interface[name='eth0']/mtu", "1500")?;
//! assert_eq!(data.path(mtu), "/interfaces:interfaces/interface[name='eth0']/mtu");
//!
//! ValidationService::new().validate_tree(&data)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod path;
pub mod providers;
pub mod rpc;
pub mod schema;
pub mod validation;
pub mod value_type;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use data::{DataNode, DataNodeId, DataTree};
pub use diagnostics::DiagnosticNode;
pub use error::{PathError, PathErrorCode, ValidationError, YangError, YangResult};
pub use path::CreateMode;
pub use providers::{
    CodecService, EncodingFormat, ModelFormat, ModelProvider, Repository, ServiceProvider,
};
pub use rpc::Rpc;
pub use schema::{Capability, RootSchemaNode, SchemaNode, SchemaNodeId};
pub use validation::{ValidationOption, ValidationService};
pub use value_type::ValueType;
