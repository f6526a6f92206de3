//! Validation of whole data trees.
//!
//! A validation pass never stops at the first problem. Every node of the
//! tree gets a diagnostics node carrying the errors found for it: value errors
//! for leaves and leaf-lists, structural errors (instance counts, duplicates,
//! missing keys or mandatory leaves) for the nodes that own the offending
//! children. [`ValidationService::validate`] turns a failing diagnostics tree
//! into a single [`DataValidationError`].
//!
//! # Examples
//!
//! ```rust
//! use yang_path::data::DataTree;
//! use yang_path::error::ValidationError;
//! use yang_path::schema::{ModuleInfo, NodeSpec, SchemaNodeId, SchemaTreeBuilder};
//! use yang_path::validation::{ValidationOption, ValidationService};
//! use yang_path::value_type::{NumberType, ValueType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = SchemaTreeBuilder::new();
//! builder.add_module(ModuleInfo::new("m", "2024-01-01"))?;
//! let c = builder.add(SchemaNodeId::ROOT, NodeSpec::container("c").in_module("m"))?;
//! builder.add(c, NodeSpec::leaf("x", ValueType::Int32(NumberType::new(0, 10))))?;
//! let mut data = DataTree::new(builder.build()?);
//!
//! // creation does not validate
//! let x = data.create(data.root(), "/m:c/x", "20")?;
//!
//! let service = ValidationService::new();
//! let diagnostics = service.diagnose(&data, data.root(), ValidationOption::Datastore);
//! assert!(diagnostics.has_errors());
//!
//! let error = service.validate(&data, data.root(), ValidationOption::Datastore).unwrap_err();
//! assert!(error.contains(x, ValidationError::RangeViolation));
//! # Ok(())
//! # }
//! ```

use crate::config::ValidationConfig;
use crate::data::{DataNodeId, DataTree};
use crate::diagnostics::DiagnosticNode;
use crate::error::{DataValidationError, NodeValidationError, ValidationError};
use crate::path;
use crate::schema::{NodeKind, SchemaNode};
use crate::value_type::ValueType;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Diagnostics of a data tree; sources are the validated nodes.
pub type DataDiagnostics = DiagnosticNode<DataNodeId, ValidationError>;

/// What the validated tree represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationOption {
    /// A complete datastore: every check, including cross references
    #[default]
    Datastore,
    /// Reply to a get-config request: configuration only
    GetConfig,
    /// Reply to a get request: configuration and state
    Get,
    /// Content of an edit-config request: configuration only, may be partial
    EditConfig,
}

impl ValidationOption {
    fn config_only(&self) -> bool {
        matches!(self, Self::GetConfig | Self::EditConfig)
    }

    /// Whether the tree is expected to be complete, so that missing nodes
    /// are errors.
    fn complete(&self) -> bool {
        matches!(self, Self::Datastore)
    }
}

/// Validates data trees against their schema.
#[derive(Debug, Clone)]
pub struct ValidationService {
    option: ValidationOption,
    check_structure: bool,
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::with_config(&ValidationConfig::default())
    }
}

impl ValidationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ValidationConfig) -> Self {
        Self {
            option: config.option,
            check_structure: config.check_structure,
        }
    }

    /// Validate a whole tree with the configured option.
    pub fn validate_tree(&self, tree: &DataTree) -> Result<(), DataValidationError> {
        self.validate(tree, tree.root(), self.option)
    }

    /// Check the subtree at `node` and return its diagnostics.
    pub fn diagnose(
        &self,
        tree: &DataTree,
        node: DataNodeId,
        option: ValidationOption,
    ) -> DataDiagnostics {
        let diagnostics = self.diagnose_node(tree, node, option);
        debug!(
            "Validated {} as {:?}: {} error(s)",
            tree.path(node),
            option,
            diagnostics.error_count()
        );
        diagnostics
    }

    /// Check the subtree at `node`, failing with every error found.
    pub fn validate(
        &self,
        tree: &DataTree,
        node: DataNodeId,
        option: ValidationOption,
    ) -> Result<(), DataValidationError> {
        let diagnostics = self.diagnose(tree, node, option);
        if !diagnostics.has_errors() {
            return Ok(());
        }
        let errors = diagnostics
            .flatten()
            .into_iter()
            .filter_map(|(chain, error)| {
                chain.last().map(|node| NodeValidationError {
                    node: **node,
                    path: tree.path(**node),
                    error: *error,
                })
            })
            .collect();
        Err(DataValidationError { errors })
    }

    fn diagnose_node(
        &self,
        tree: &DataTree,
        node: DataNodeId,
        option: ValidationOption,
    ) -> DataDiagnostics {
        let mut diag = DataDiagnostics::new(node);
        let schema = tree.schema(node);
        trace!("Checking {}", tree.path(node));

        if option.config_only() && is_data_node(schema.kind()) && !schema.is_config() {
            diag.add_error(ValidationError::InElem);
            return diag;
        }

        if let Some(value_type) = schema.value_type() {
            let value = tree.get(node);
            let value_diag = value_type.validate(value);
            diag.errors.extend(value_diag.errors);
            if diag.errors.is_empty() && option == ValidationOption::Datastore {
                if let Some(error) = check_reference(tree, value_type, value) {
                    diag.add_error(error);
                }
            }
        }

        if self.check_structure && !schema.kind().holds_value() {
            self.check_children(tree, node, schema, option, &mut diag);
        }

        for child in tree.children(node) {
            diag.add_child(self.diagnose_node(tree, *child, option));
        }
        diag
    }

    fn check_children(
        &self,
        tree: &DataTree,
        node: DataNodeId,
        schema: SchemaNode<'_>,
        option: ValidationOption,
        diag: &mut DataDiagnostics,
    ) {
        for child_schema in schema.children() {
            let instances: Vec<DataNodeId> = tree
                .children(node)
                .iter()
                .copied()
                .filter(|c| tree.schema(*c).id() == child_schema.id())
                .collect();

            match child_schema.kind() {
                NodeKind::List | NodeKind::LeafList => {
                    let count = instances.len() as u32;
                    if child_schema.max_elements().is_some_and(|max| count > max) {
                        diag.add_error(ValidationError::NoMax);
                    }
                    if option.complete() && count < child_schema.min_elements() {
                        diag.add_error(ValidationError::NoMin);
                    }
                    if child_schema.kind() == NodeKind::List {
                        if has_duplicate_keys(tree, &instances, child_schema) {
                            diag.add_error(ValidationError::DupList);
                        }
                    } else if child_schema.is_config() && has_duplicate_values(tree, &instances) {
                        diag.add_error(ValidationError::DupLeafList);
                    }
                }
                _ => {
                    if instances.len() > 1 {
                        diag.add_error(ValidationError::TooMany);
                    }
                    if option.complete()
                        && child_schema.is_mandatory()
                        && instances.is_empty()
                    {
                        diag.add_error(ValidationError::MissElem);
                    }
                }
            }
        }

        if schema.kind() == NodeKind::List {
            let missing_key = schema.key_nodes().any(|key| {
                !tree
                    .children(node)
                    .iter()
                    .any(|c| tree.schema(*c).id() == key.id())
            });
            if missing_key {
                diag.add_error(ValidationError::MissElem);
            }
        }
    }
}

fn is_data_node(kind: NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Root | NodeKind::Rpc | NodeKind::Input | NodeKind::Output
    )
}

/// Existence checks of leafrefs and required instance identifiers.
fn check_reference(tree: &DataTree, value_type: &ValueType, value: &str) -> Option<ValidationError> {
    match value_type {
        ValueType::Leafref(leafref) if leafref.require_instance => {
            let found = path::parse(&leafref.path)
                .and_then(|expr| path::find_data(tree, tree.root(), &expr))
                .unwrap_or_default();
            if found.iter().any(|target| tree.value(*target) == Some(value)) {
                None
            } else {
                Some(ValidationError::NoLeafref)
            }
        }
        ValueType::InstanceId(instance_id) if instance_id.require_instance => {
            let found = path::parse(value)
                .and_then(|expr| path::find_data(tree, tree.root(), &expr))
                .unwrap_or_default();
            if found.is_empty() {
                Some(ValidationError::NoReqIns)
            } else {
                None
            }
        }
        // the member that accepted the value decides
        ValueType::Union(union) => union
            .types
            .iter()
            .find(|member| !member.validate(value).has_errors())
            .and_then(|member| check_reference(tree, member, value)),
        _ => None,
    }
}

fn has_duplicate_keys(tree: &DataTree, instances: &[DataNodeId], list: SchemaNode<'_>) -> bool {
    if list.key_nodes().next().is_none() {
        return false;
    }
    let mut seen = HashSet::new();
    instances.iter().any(|instance| {
        let key: Vec<Option<&str>> = list
            .key_nodes()
            .map(|k| {
                tree.children(*instance)
                    .iter()
                    .find(|c| tree.schema(**c).id() == k.id())
                    .and_then(|c| tree.value(*c))
            })
            .collect();
        !seen.insert(key)
    })
}

fn has_duplicate_values(tree: &DataTree, instances: &[DataNodeId]) -> bool {
    let mut seen = HashSet::new();
    instances.iter().any(|entry| !seen.insert(tree.get(*entry)))
}
