//! Operation invocation.
//!
//! An [`Rpc`] owns a data tree holding one `rpc` node and its `input`
//! subtree. The caller fills in the input with paths relative to the
//! input node and hands the operation to a [`ServiceProvider`], which
//! returns the output as a separate data tree.
//!
//! ```rust
//! use yang_path::providers::Repository;
//! use yang_path::rpc::Rpc;
//! use yang_path::schema::Capability;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Repository::with_embedded_modules()?
//!     .create_root_schema(&[Capability::new("interfaces", "")])?;
//! let mut rpc = Rpc::new(schema, "/interfaces:reset")?;
//! rpc.create_input("name", "eth0")?;
//! rpc.create_input("delay", "1.5")?;
//! assert!(rpc.has_output());
//! # Ok(())
//! # }
//! ```

use crate::data::{DataNodeId, DataTree};
use crate::error::{YangError, YangResult};
use crate::providers::ServiceProvider;
use crate::schema::{NodeKind, RootSchemaNode};
use log::debug;
use std::sync::Arc;

/// An operation bound to a schema `rpc` node.
#[derive(Debug, Clone)]
pub struct Rpc {
    data: DataTree,
    node: DataNodeId,
    input: Option<DataNodeId>,
    has_output: bool,
}

impl Rpc {
    /// Bind to the `rpc` schema node at `path`.
    ///
    /// # Errors
    /// [`YangError::InvalidArgument`] when the path does not name exactly
    /// one `rpc` node.
    pub fn new(schema: Arc<RootSchemaNode>, path: &str) -> YangResult<Self> {
        let (input_declared, has_output) = {
            let matches = schema.find(path)?;
            let [rpc] = matches.as_slice() else {
                return Err(YangError::invalid_argument(format!(
                    "'{path}' matches {} schema nodes, expected one rpc",
                    matches.len()
                )));
            };
            if rpc.kind() != NodeKind::Rpc {
                return Err(YangError::invalid_argument(format!(
                    "'{path}' is a {}, not an rpc",
                    rpc.kind().keyword()
                )));
            }
            (
                rpc.children().any(|c| c.kind() == NodeKind::Input),
                rpc.children().any(|c| c.kind() == NodeKind::Output),
            )
        };

        let mut data = DataTree::new(schema);
        let root = data.root();
        let node = data.create_path(root, path)?;
        let input = if input_declared {
            Some(data.create_path(node, "input")?)
        } else {
            None
        };
        debug!("Bound operation {}", data.path(node));
        Ok(Self {
            data,
            node,
            input,
            has_output,
        })
    }

    /// The `rpc` data node.
    pub fn node(&self) -> DataNodeId {
        self.node
    }

    /// The `input` data node, if the operation declares input.
    pub fn input(&self) -> Option<DataNodeId> {
        self.input
    }

    pub fn has_output(&self) -> bool {
        self.has_output
    }

    pub fn data(&self) -> &DataTree {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataTree {
        &mut self.data
    }

    pub fn schema(&self) -> &Arc<RootSchemaNode> {
        self.data.schema_tree()
    }

    /// Create an input node relative to the `input` node.
    pub fn create_input(&mut self, path: &str, value: &str) -> YangResult<DataNodeId> {
        let input = self.input.ok_or_else(|| {
            YangError::invalid_argument(format!(
                "operation {} declares no input",
                self.data.path(self.node)
            ))
        })?;
        self.data.create(input, path, value)
    }

    /// Execute through `provider`.
    ///
    /// The provider must serve the very schema tree this operation was bound
    /// to. Operations without output return `None` whatever the provider
    /// answers.
    pub fn invoke(&self, provider: &dyn ServiceProvider) -> YangResult<Option<DataTree>> {
        if !Arc::ptr_eq(&provider.root_schema(), self.schema()) {
            return Err(YangError::illegal_state(
                "operation was bound to a different schema tree than the provider's",
            ));
        }
        debug!("Invoking {}", self.data.path(self.node));
        let output = provider.invoke(self)?;
        Ok(output.filter(|_| self.has_output))
    }
}
