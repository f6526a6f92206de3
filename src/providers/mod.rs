//! Boundaries to the collaborators of the core.
//!
//! The core does no network I/O and fixes no serialization format. The
//! services that do are described here as traits:
//!
//! * [`ServiceProvider`] - executes operations, for example over a NETCONF session
//! * [`ModelProvider`] - supplies module definitions not found locally
//! * [`CodecService`] - encodes and decodes data trees
//!
//! [`Repository`] is the model loader: it turns module definitions and a
//! capability list into a schema tree.

pub mod repository;

pub use repository::Repository;

use crate::data::{DataNodeId, DataTree};
use crate::error::{CodecError, YangResult};
use crate::rpc::Rpc;
use crate::schema::RootSchemaNode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Executor of operations.
///
/// Implementations own the transport and the protocol session. The core
/// only hands them an [`Rpc`] and receives its output.
pub trait ServiceProvider {
    /// The schema the executor's peer supports.
    fn root_schema(&self) -> Arc<RootSchemaNode>;

    /// Execute an operation.
    ///
    /// # Arguments
    /// * `rpc` - The operation with its input filled in
    ///
    /// # Returns
    /// The output data tree, or `None` when the operation returns nothing
    fn invoke(&self, rpc: &Rpc) -> YangResult<Option<DataTree>>;
}

/// Source of module definitions for modules the repository does not have.
pub trait ModelProvider {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// The definition of a module in the requested format.
    ///
    /// # Arguments
    /// * `module` - Module name
    /// * `revision` - Requested revision, empty for any
    /// * `format` - Textual form of the definition
    ///
    /// # Returns
    /// The definition text, or `None` if this provider does not know the
    /// module or cannot produce it in `format`
    fn get_model(
        &self,
        module: &str,
        revision: &str,
        format: ModelFormat,
    ) -> YangResult<Option<String>>;
}

/// Textual forms of a module definition.
///
/// [`Repository`] only reads [`ModelFormat::Json`] definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Yang,
    Yin,
    Json,
}

/// Textual formats a codec can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    Xml,
    Json,
}

/// Serialization of data trees.
///
/// A decoded tree must bind its nodes to schema nodes by the same name
/// resolution as [`DataTree::find`].
pub trait CodecService {
    /// Encode the subtree at `node`.
    fn encode(
        &self,
        tree: &DataTree,
        node: DataNodeId,
        format: EncodingFormat,
        pretty: bool,
    ) -> Result<String, CodecError>;

    /// Decode `payload` into a new data tree bound to `schema`.
    fn decode(
        &self,
        schema: Arc<RootSchemaNode>,
        payload: &str,
        format: EncodingFormat,
    ) -> Result<DataTree, CodecError>;
}
