//! Schema trees for YANG-style data models.
//!
//! A schema tree describes the shape of the data: node kinds, list keys,
//! value types and config/mandatory flags. It is built once (by hand through
//! [`SchemaTreeBuilder`], or from JSON module definitions through
//! [`Repository`](crate::providers::Repository)) and shared read-only by
//! every data tree created against it.
//!
//! # Key Types
//!
//! - [`RootSchemaNode`] - Arena owning every node of one schema tree
//! - [`SchemaNode`] - Borrowed handle used for navigation and introspection
//! - [`SchemaTreeBuilder`] - Checked, incremental construction
//! - [`ModuleDefinition`] - Serde description of one module
//!
//! # Examples
//!
//! ```rust
//! use yang_path::schema::{ModuleInfo, NodeSpec, SchemaNodeId, SchemaTreeBuilder};
//! use yang_path::value_type::ValueType;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = SchemaTreeBuilder::new();
//! builder.add_module(ModuleInfo::new("m", "2024-01-01"))?;
//! let list = builder.add(SchemaNodeId::ROOT, NodeSpec::list("l", ["id"]).in_module("m"))?;
//! builder.add(list, NodeSpec::leaf("id", ValueType::string()))?;
//! let schema = builder.build()?;
//!
//! // key predicates only assert that the key exists in schema mode
//! let found = schema.find("/m:l[id]")?;
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].keys()[0].arg, "id");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod definition;
pub mod embedded;
pub mod tree;
pub mod types;


pub use builder::{NodeSpec, SchemaTreeBuilder};
pub use definition::{ModuleDefinition, NodeDefinition, TypeDefinition};
pub use tree::{RootSchemaNode, SchemaNode, SchemaNodeId};
pub use types::{Capability, ModelContext, ModuleInfo, NodeKind, Statement};
