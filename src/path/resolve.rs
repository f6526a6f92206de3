//! Resolution of parsed expressions against schema and data trees.
//!
//! Both trees are walked by the same segment matcher; they differ in how a
//! predicate filters a candidate. In a schema tree `[k='v']` and `[k]` only
//! require `k` to be a key of the list, and `[.='v']` only requires a leaf or
//! leaf-list. In a data tree every predicate compares actual values.

use super::parser::{PathExpr, Predicate, Segment};
use crate::data::{DataNodeId, DataTree};
use crate::error::{PathError, PathErrorCode, PathResult};
use crate::schema::{ModelContext, NodeKind, RootSchemaNode, SchemaNodeId};
use log::trace;

/// A tree the segment matcher can walk.
pub(crate) trait PathTarget {
    type Id: Copy + Eq + std::fmt::Debug;

    fn root_id(&self) -> Self::Id;
    fn model_context(&self) -> &ModelContext;
    fn module_of(&self, id: Self::Id) -> &str;
    fn name_of(&self, id: Self::Id) -> &str;
    fn children_of(&self, id: Self::Id) -> &[Self::Id];
    fn accepts(&self, id: Self::Id, predicate: &Predicate) -> bool;
}

impl PathTarget for RootSchemaNode {
    type Id = SchemaNodeId;

    fn root_id(&self) -> SchemaNodeId {
        SchemaNodeId::ROOT
    }

    fn model_context(&self) -> &ModelContext {
        &self.context
    }

    fn module_of(&self, id: SchemaNodeId) -> &str {
        &self.record(id).module
    }

    fn name_of(&self, id: SchemaNodeId) -> &str {
        &self.record(id).statement.arg
    }

    fn children_of(&self, id: SchemaNodeId) -> &[SchemaNodeId] {
        &self.record(id).children
    }

    fn accepts(&self, id: SchemaNodeId, predicate: &Predicate) -> bool {
        let record = self.record(id);
        match predicate {
            Predicate::Key { name, .. } | Predicate::KeyPresent(name) => {
                record.kind == NodeKind::List && record.key_names.contains(name)
            }
            Predicate::SelfValue(_) => matches!(record.kind, NodeKind::Leaf | NodeKind::LeafList),
        }
    }
}

impl PathTarget for DataTree {
    type Id = DataNodeId;

    fn root_id(&self) -> DataNodeId {
        DataNodeId::ROOT
    }

    fn model_context(&self) -> &ModelContext {
        self.schema_tree().context()
    }

    fn module_of(&self, id: DataNodeId) -> &str {
        &self.schema_tree().record(self.record(id).schema).module
    }

    fn name_of(&self, id: DataNodeId) -> &str {
        &self.schema_tree().record(self.record(id).schema).statement.arg
    }

    fn children_of(&self, id: DataNodeId) -> &[DataNodeId] {
        self.children(id)
    }

    fn accepts(&self, id: DataNodeId, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Key { name, value } => self
                .children(id)
                .iter()
                .any(|c| self.name_of(*c) == name && self.value(*c) == Some(value.as_str())),
            Predicate::KeyPresent(name) => {
                self.children(id).iter().any(|c| self.name_of(*c) == name)
            }
            Predicate::SelfValue(value) => self.value(id) == Some(value.as_str()),
        }
    }
}

/// Module of the first segment of `expr` when issued at `start`.
///
/// Absolute paths always carry it. A relative path from a non-root node
/// inherits the module of that node.
pub(crate) fn initial_module<T: PathTarget>(
    tree: &T,
    start: T::Id,
    expr: &PathExpr,
) -> PathResult<String> {
    let first = &expr.segments[0];
    match &first.module {
        Some(module) => Ok(module.clone()),
        None if start != tree.root_id() => Ok(tree.module_of(start).to_string()),
        None => Err(PathError::new(
            PathErrorCode::MissingModule,
            &expr.text,
            format!("first segment '{}' has no module prefix", first.name),
        )),
    }
}

/// Module a segment refers to: its own prefix, else the inherited one.
/// An explicit prefix must name a loaded module.
pub(crate) fn segment_module<T: PathTarget>(
    tree: &T,
    segment: &Segment,
    inherited: &str,
    expr: &PathExpr,
) -> PathResult<String> {
    match &segment.module {
        Some(module) if !tree.model_context().has_module(module) => Err(PathError::new(
            PathErrorCode::InvalidModule,
            &expr.text,
            format!("module '{module}' is not loaded"),
        )),
        Some(module) => Ok(module.clone()),
        None => Ok(inherited.to_string()),
    }
}

fn resolve<T: PathTarget>(tree: &T, context: T::Id, expr: &PathExpr) -> PathResult<Vec<T::Id>> {
    let start = if expr.absolute { tree.root_id() } else { context };
    let mut module = initial_module(tree, start, expr)?;
    let mut current = vec![start];

    for segment in &expr.segments {
        module = segment_module(tree, segment, &module, expr)?;
        let mut next = Vec::new();
        for node in &current {
            for child in tree.children_of(*node) {
                if tree.module_of(*child) == module
                    && (segment.is_wildcard() || tree.name_of(*child) == segment.name)
                    && segment.predicates.iter().all(|p| tree.accepts(*child, p))
                {
                    next.push(*child);
                }
            }
        }
        trace!("Segment '{}' matched {} node(s)", segment, next.len());
        if next.is_empty() {
            return Ok(next);
        }
        current = next;
    }
    Ok(current)
}

/// Every schema node `expr` matches from `context`.
pub fn find_schema(
    tree: &RootSchemaNode,
    context: SchemaNodeId,
    expr: &PathExpr,
) -> PathResult<Vec<SchemaNodeId>> {
    resolve(tree, context, expr)
}

/// Every data node `expr` matches from `context`.
pub fn find_data(tree: &DataTree, context: DataNodeId, expr: &PathExpr) -> PathResult<Vec<DataNodeId>> {
    resolve(tree, context, expr)
}
