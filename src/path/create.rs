//! Get-or-create application of a path expression to a data tree.
//!
//! Creation runs in two phases. Planning walks the expression against the
//! schema and the existing data and decides, per segment, whether an existing
//! node is reused or a new one is needed. Only when the whole expression has
//! been planned without error are new nodes appended, so a failing call
//! leaves the tree untouched.

use super::parser::{PathExpr, Predicate, Segment};
use super::resolve::{initial_module, segment_module};
use crate::data::{DataNodeId, DataTree};
use crate::error::{PathError, PathErrorCode, PathResult};
use crate::schema::{NodeKind, SchemaNodeId};
use log::{debug, trace, warn};

/// How the terminal value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// The supplied value always replaces the current one
    Overwrite,
    /// An empty supplied value keeps the current one
    Filter,
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Existing(DataNodeId),
    Planned(usize),
}

#[derive(Debug)]
struct PlannedNode {
    parent: Anchor,
    schema: SchemaNodeId,
    /// Key leaves of a new list instance, in key order
    keys: Vec<(SchemaNodeId, String)>,
    /// Value of a new leaf-list entry
    value: Option<String>,
}

struct Planner<'t> {
    tree: &'t DataTree,
    expr: &'t PathExpr,
    plan: Vec<PlannedNode>,
}

impl<'t> Planner<'t> {
    fn error(&self, code: PathErrorCode, detail: impl Into<String>) -> PathError {
        PathError::new(code, &self.expr.text, detail)
    }

    fn schema_of(&self, anchor: Anchor) -> SchemaNodeId {
        match anchor {
            Anchor::Existing(id) => self.tree.record(id).schema,
            Anchor::Planned(index) => self.plan[index].schema,
        }
    }

    fn walk(&mut self, start: DataNodeId, value: Option<&str>) -> PathResult<Anchor> {
        let tree = self.tree;
        let schema = tree.schema_tree();
        let mut module = initial_module(self.tree, start, self.expr)?;
        let mut anchor = Anchor::Existing(start);
        let last = self.expr.segments.len() - 1;

        for (index, segment) in self.expr.segments.iter().enumerate() {
            module = segment_module(self.tree, segment, &module, self.expr)?;
            if segment.is_wildcard() {
                return Err(self.error(
                    PathErrorCode::InvalidNode,
                    "wildcards cannot be created",
                ));
            }

            let parent_schema = self.schema_of(anchor);
            let parent_kind = schema.record(parent_schema).kind;
            if parent_kind.holds_value() {
                return Err(self.error(
                    PathErrorCode::InvalidContext,
                    format!(
                        "'{}' cannot have children",
                        schema.record(parent_schema).statement.arg
                    ),
                ));
            }
            let child_schema = schema
                .child_named(parent_schema, &module, &segment.name)
                .ok_or_else(|| {
                    self.error(
                        PathErrorCode::InvalidNode,
                        format!("no schema node '{module}:{}'", segment.name),
                    )
                })?;

            let terminal_value = if index == last { value } else { None };
            anchor = match schema.record(child_schema).kind {
                NodeKind::List => self.list_step(anchor, child_schema, segment)?,
                NodeKind::LeafList => {
                    self.leaf_list_step(anchor, child_schema, segment, terminal_value)?
                }
                _ => self.single_step(anchor, child_schema, segment)?,
            };
        }
        Ok(anchor)
    }

    fn existing(&self, anchor: Anchor, schema: SchemaNodeId) -> Vec<DataNodeId> {
        match anchor {
            Anchor::Existing(parent) => self
                .tree
                .children(parent)
                .iter()
                .copied()
                .filter(|c| self.tree.record(*c).schema == schema)
                .collect(),
            Anchor::Planned(_) => Vec::new(),
        }
    }

    fn push(&mut self, node: PlannedNode) -> Anchor {
        self.plan.push(node);
        Anchor::Planned(self.plan.len() - 1)
    }

    fn list_step(
        &mut self,
        anchor: Anchor,
        list: SchemaNodeId,
        segment: &Segment,
    ) -> PathResult<Anchor> {
        let tree = self.tree;
        let schema = tree.schema_tree();
        let key_nodes = &schema.record(list).keys;
        let mut supplied: Vec<(SchemaNodeId, &str)> = Vec::new();

        for predicate in &segment.predicates {
            match predicate {
                Predicate::Key { name, value } => {
                    let key = key_nodes
                        .iter()
                        .copied()
                        .find(|k| schema.record(*k).statement.arg == *name)
                        .ok_or_else(|| {
                            self.error(
                                PathErrorCode::InvalidKey,
                                format!("'{name}' is not a key of '{}'", segment.name),
                            )
                        })?;
                    if supplied.iter().any(|(k, _)| *k == key) {
                        return Err(self.error(
                            PathErrorCode::InvalidKey,
                            format!("key '{name}' given twice"),
                        ));
                    }
                    supplied.push((key, value.as_str()));
                }
                Predicate::KeyPresent(name) => {
                    return Err(self.error(
                        PathErrorCode::MissingKey,
                        format!("key '{name}' needs a value"),
                    ));
                }
                Predicate::SelfValue(_) => {
                    return Err(self.error(
                        PathErrorCode::InvalidOperand,
                        format!("'{}' is a list, '.' predicates do not apply", segment.name),
                    ));
                }
            }
        }

        let matches: Vec<DataNodeId> = self
            .existing(anchor, list)
            .into_iter()
            .filter(|instance| {
                supplied.iter().all(|(key, value)| {
                    self.tree
                        .children(*instance)
                        .iter()
                        .any(|c| self.tree.record(*c).schema == *key && self.tree.value(*c) == Some(*value))
                })
            })
            .collect();

        if matches.len() > 1 {
            return Err(self.error(
                PathErrorCode::Ambiguous,
                format!("'{}' matches {} list instances", segment, matches.len()),
            ));
        }
        if supplied.len() < key_nodes.len() {
            let missing: Vec<&str> = key_nodes
                .iter()
                .filter(|k| !supplied.iter().any(|(s, _)| s == *k))
                .map(|k| schema.record(*k).statement.arg.as_str())
                .collect();
            return Err(self.error(
                PathErrorCode::MissingKey,
                format!("missing key(s) {} of '{}'", missing.join(", "), segment.name),
            ));
        }

        if let Some(one) = matches.first() {
            trace!("Reusing list instance {:?} for '{}'", one, segment);
            return Ok(Anchor::Existing(*one));
        }
        let keys = key_nodes
            .iter()
            .filter_map(|k| {
                supplied
                    .iter()
                    .find(|(s, _)| s == k)
                    .map(|(s, v)| (*s, v.to_string()))
            })
            .collect();
        Ok(self.push(PlannedNode {
            parent: anchor,
            schema: list,
            keys,
            value: None,
        }))
    }

    fn leaf_list_step(
        &mut self,
        anchor: Anchor,
        leaf_list: SchemaNodeId,
        segment: &Segment,
        terminal_value: Option<&str>,
    ) -> PathResult<Anchor> {
        let mut entry_value = None;
        for predicate in &segment.predicates {
            match predicate {
                Predicate::SelfValue(v) if entry_value.is_none() => entry_value = Some(v.as_str()),
                _ => {
                    return Err(self.error(
                        PathErrorCode::InvalidOperand,
                        format!("leaf-list '{}' takes a single [.='value'] predicate", segment.name),
                    ));
                }
            }
        }
        if let (Some(selected), Some(value)) = (entry_value, terminal_value) {
            if !value.is_empty() && value != selected {
                return Err(self.error(
                    PathErrorCode::InvalidOperand,
                    format!(
                        "value '{value}' conflicts with the entry '{selected}' selected by '{}'",
                        segment
                    ),
                ));
            }
        }
        let entry_value = entry_value.or(terminal_value);

        // without a value the entry is matched on having none
        if let Some(existing) = self
            .existing(anchor, leaf_list)
            .into_iter()
            .find(|e| self.tree.value(*e) == entry_value)
        {
            return Ok(Anchor::Existing(existing));
        }
        Ok(self.push(PlannedNode {
            parent: anchor,
            schema: leaf_list,
            keys: Vec::new(),
            value: entry_value.map(str::to_string),
        }))
    }

    fn single_step(
        &mut self,
        anchor: Anchor,
        node: SchemaNodeId,
        segment: &Segment,
    ) -> PathResult<Anchor> {
        if !segment.predicates.is_empty() {
            return Err(self.error(
                PathErrorCode::InvalidOperand,
                format!("'{}' takes no predicates", segment.name),
            ));
        }
        match self.existing(anchor, node).as_slice() {
            [] => Ok(self.push(PlannedNode {
                parent: anchor,
                schema: node,
                keys: Vec::new(),
                value: None,
            })),
            [one] => Ok(Anchor::Existing(*one)),
            many => Err(self.error(
                PathErrorCode::Ambiguous,
                format!("'{}' matches {} nodes", segment, many.len()),
            )),
        }
    }
}

/// Get or create every node of `expr` below `context` and return the
/// terminal node.
pub fn create(
    tree: &mut DataTree,
    context: DataNodeId,
    expr: &PathExpr,
    value: Option<&str>,
    mode: CreateMode,
) -> PathResult<DataNodeId> {
    let start = if expr.absolute { tree.root() } else { context };
    let mut planner = Planner {
        tree: &*tree,
        expr,
        plan: Vec::new(),
    };
    let terminal = planner.walk(start, value)?;
    let plan = planner.plan;

    let mut created = Vec::with_capacity(plan.len());
    for planned in plan {
        let parent = match planned.parent {
            Anchor::Existing(id) => id,
            Anchor::Planned(index) => created[index],
        };
        let id = commit(tree, parent, planned);
        created.push(id);
    }
    let terminal = match terminal {
        Anchor::Existing(id) => id,
        Anchor::Planned(index) => created[index],
    };

    if let Some(value) = value {
        apply_value(tree, terminal, value, mode);
    }
    Ok(terminal)
}

fn commit(tree: &mut DataTree, parent: DataNodeId, planned: PlannedNode) -> DataNodeId {
    let kind = tree.schema_tree().record(planned.schema).kind;
    // key leaves come into existence together with their list instance
    if kind == NodeKind::Leaf {
        if let Some(existing) = tree
            .children(parent)
            .iter()
            .copied()
            .find(|c| tree.record(*c).schema == planned.schema)
        {
            return existing;
        }
    }

    let id = tree.push(parent, planned.schema, planned.value);
    for (key, value) in planned.keys {
        tree.push(id, key, Some(value));
    }
    debug!("Created {} {}", kind.keyword(), tree.path(id));
    id
}

fn apply_value(tree: &mut DataTree, id: DataNodeId, value: &str, mode: CreateMode) {
    let schema = tree.schema(id);
    match schema.kind() {
        NodeKind::Leaf if schema.is_key() => {
            if tree.value(id) != Some(value) {
                warn!("Ignoring value '{}' for list key {}", value, tree.path(id));
            }
        }
        NodeKind::Leaf | NodeKind::AnyXml => {
            if mode == CreateMode::Filter && value.is_empty() && tree.value(id).is_some() {
                return;
            }
            tree.record_mut(id).value = Some(value.to_string());
        }
        // the entry was selected or created by this value
        NodeKind::LeafList => {}
        kind => {
            if !value.is_empty() {
                warn!(
                    "Ignoring value '{}' for {} {}",
                    value,
                    kind.keyword(),
                    tree.path(id)
                );
            }
        }
    }
}
