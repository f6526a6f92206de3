//! The data tree.

use crate::error::{YangError, YangResult};
use crate::path::{self, create::CreateMode, quote};
use crate::schema::{NodeKind, RootSchemaNode, SchemaNode, SchemaNodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable index of a node inside its [`DataTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DataNodeId(pub(crate) usize);

impl DataNodeId {
    /// The root of every data tree.
    pub const ROOT: DataNodeId = DataNodeId(0);
}

/// Metadata attached to a data node that the schema does not define.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub ns: String,
    pub name: String,
    pub value: String,
}

impl Annotation {
    pub fn new(ns: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ns: ns.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DataNodeRecord {
    pub(crate) schema: SchemaNodeId,
    pub(crate) parent: Option<DataNodeId>,
    pub(crate) children: Vec<DataNodeId>,
    pub(crate) value: Option<String>,
    pub(crate) annotations: Vec<Annotation>,
}

impl DataNodeRecord {
    pub(crate) fn new(schema: SchemaNodeId, parent: Option<DataNodeId>, value: Option<String>) -> Self {
        Self {
            schema,
            parent,
            children: Vec::new(),
            value,
            annotations: Vec::new(),
        }
    }
}

/// A tree of data nodes bound to a shared schema tree.
///
/// Nodes are appended to an arena and addressed by [`DataNodeId`]. Nodes are
/// never removed one by one; dropping the tree drops all of them. Every
/// accessor taking an id panics if the id comes from another tree.
#[derive(Debug, Clone)]
pub struct DataTree {
    schema: Arc<RootSchemaNode>,
    pub(crate) nodes: Vec<DataNodeRecord>,
}

impl DataTree {
    /// An empty tree: just the root, bound to the schema root.
    pub fn new(schema: Arc<RootSchemaNode>) -> Self {
        Self {
            schema,
            nodes: vec![DataNodeRecord::new(SchemaNodeId::ROOT, None, None)],
        }
    }

    pub fn root(&self) -> DataNodeId {
        DataNodeId::ROOT
    }

    pub fn schema_tree(&self) -> &Arc<RootSchemaNode> {
        &self.schema
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Get or create every node along `path` and set the value of the
    /// terminal leaf, leaf-list entry or anyxml node.
    ///
    /// No value validation happens here. On error the tree is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yang_path::data::DataTree;
    /// use yang_path::schema::{ModuleInfo, NodeSpec, SchemaNodeId, SchemaTreeBuilder};
    /// use yang_path::value_type::{NumberType, ValueType};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut builder = SchemaTreeBuilder::new();
    /// builder.add_module(ModuleInfo::new("m", "2024-01-01"))?;
    /// let c = builder.add(SchemaNodeId::ROOT, NodeSpec::container("c").in_module("m"))?;
    /// builder.add(c, NodeSpec::leaf("x", ValueType::Int32(NumberType::new(0, 10))))?;
    ///
    /// let mut data = DataTree::new(builder.build()?);
    /// let x = data.create(data.root(), "/m:c/x", "5")?;
    /// assert_eq!(data.get(x), "5");
    /// assert_eq!(data.find(data.root(), "/m:c/x")?, vec![x]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn create(&mut self, context: DataNodeId, path: &str, value: &str) -> YangResult<DataNodeId> {
        self.create_with(context, path, Some(value), CreateMode::Overwrite)
    }

    /// Like [`DataTree::create`] without touching the terminal value.
    pub fn create_path(&mut self, context: DataNodeId, path: &str) -> YangResult<DataNodeId> {
        self.create_with(context, path, None, CreateMode::Overwrite)
    }

    /// Like [`DataTree::create`], except that an empty `value` keeps the
    /// value of an existing terminal node.
    pub fn create_filter(
        &mut self,
        context: DataNodeId,
        path: &str,
        value: &str,
    ) -> YangResult<DataNodeId> {
        self.create_with(context, path, Some(value), CreateMode::Filter)
    }

    fn create_with(
        &mut self,
        context: DataNodeId,
        path: &str,
        value: Option<&str>,
        mode: CreateMode,
    ) -> YangResult<DataNodeId> {
        self.check(context);
        let expr = path::parse(path)?;
        Ok(path::create::create(self, context, &expr, value, mode)?)
    }

    /// Every node matching `path`; predicates filter by exact value.
    pub fn find(&self, context: DataNodeId, path: &str) -> YangResult<Vec<DataNodeId>> {
        self.check(context);
        let expr = path::parse(path)?;
        Ok(path::find_data(self, context, &expr)?)
    }

    /// The value of a node, empty if it has none.
    pub fn get(&self, id: DataNodeId) -> &str {
        self.value(id).unwrap_or_default()
    }

    pub fn value(&self, id: DataNodeId) -> Option<&str> {
        self.record(id).value.as_deref()
    }

    /// Replace the value of a leaf, leaf-list entry or anyxml node.
    ///
    /// Fails with [`YangError::InvalidArgument`] on nodes without values.
    pub fn set(&mut self, id: DataNodeId, value: impl Into<String>) -> YangResult<()> {
        let kind = self.schema(id).kind();
        if !kind.holds_value() {
            return Err(YangError::invalid_argument(format!(
                "{} '{}' cannot hold a value",
                kind.keyword(),
                self.path(id)
            )));
        }
        self.record_mut(id).value = Some(value.into());
        Ok(())
    }

    pub fn parent(&self, id: DataNodeId) -> Option<DataNodeId> {
        self.record(id).parent
    }

    pub fn children(&self, id: DataNodeId) -> &[DataNodeId] {
        &self.record(id).children
    }

    /// The schema node `id` instantiates.
    pub fn schema(&self, id: DataNodeId) -> SchemaNode<'_> {
        self.schema.node(self.record(id).schema)
    }

    /// Absolute path of a node that [`DataTree::find`] resolves back to it.
    ///
    /// List instances carry all key predicates, leaf-list entries a
    /// `[.='value']` predicate. The module prefix is written on the first
    /// segment and wherever the module changes.
    pub fn path(&self, id: DataNodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.record(current).parent {
            segments.push(self.segment_of(current, parent));
            current = parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    fn segment_of(&self, id: DataNodeId, parent: DataNodeId) -> String {
        let schema = self.schema(id);
        let parent_schema = self.schema(parent);
        let mut segment = if parent_schema.kind() == NodeKind::Root
            || parent_schema.module() != schema.module()
        {
            format!("{}:{}", schema.module(), schema.name())
        } else {
            schema.name().to_string()
        };
        match schema.kind() {
            NodeKind::List => {
                for key in schema.key_nodes() {
                    let value = self
                        .children(id)
                        .iter()
                        .find(|c| self.record(**c).schema == key.id())
                        .and_then(|c| self.value(*c));
                    if let Some(value) = value {
                        segment.push_str(&format!("[{}={}]", key.name(), quote(value)));
                    }
                }
            }
            NodeKind::LeafList => {
                if let Some(value) = self.value(id) {
                    segment.push_str(&format!("[.={}]", quote(value)));
                }
            }
            _ => {}
        }
        segment
    }

    /// Attach an annotation, replacing one with the same namespace and name.
    pub fn add_annotation(&mut self, id: DataNodeId, annotation: Annotation) {
        let annotations = &mut self.record_mut(id).annotations;
        match annotations
            .iter_mut()
            .find(|a| a.ns == annotation.ns && a.name == annotation.name)
        {
            Some(existing) => existing.value = annotation.value,
            None => annotations.push(annotation),
        }
    }

    /// Remove an annotation by namespace and name. Returns whether one was
    /// removed.
    pub fn remove_annotation(&mut self, id: DataNodeId, annotation: &Annotation) -> bool {
        let annotations = &mut self.record_mut(id).annotations;
        let before = annotations.len();
        annotations.retain(|a| !(a.ns == annotation.ns && a.name == annotation.name));
        annotations.len() != before
    }

    pub fn annotations(&self, id: DataNodeId) -> &[Annotation] {
        &self.record(id).annotations
    }

    /// Read handle to a node.
    pub fn node(&self, id: DataNodeId) -> DataNode<'_> {
        self.check(id);
        DataNode { tree: self, id }
    }

    /// Every node below `id` in depth-first pre-order, `id` first.
    pub fn descendants(&self, id: DataNodeId) -> Vec<DataNodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    fn check(&self, id: DataNodeId) {
        assert!(id.0 < self.nodes.len(), "data node id out of range");
    }

    pub(crate) fn record(&self, id: DataNodeId) -> &DataNodeRecord {
        &self.nodes[id.0]
    }

    pub(crate) fn record_mut(&mut self, id: DataNodeId) -> &mut DataNodeRecord {
        &mut self.nodes[id.0]
    }

    /// Append a node under `parent`.
    pub(crate) fn push(
        &mut self,
        parent: DataNodeId,
        schema: SchemaNodeId,
        value: Option<String>,
    ) -> DataNodeId {
        let id = DataNodeId(self.nodes.len());
        self.nodes.push(DataNodeRecord::new(schema, Some(parent), value));
        self.record_mut(parent).children.push(id);
        id
    }
}

/// Borrowed read handle to one node of a [`DataTree`].
#[derive(Clone, Copy)]
pub struct DataNode<'a> {
    tree: &'a DataTree,
    id: DataNodeId,
}

impl<'a> DataNode<'a> {
    pub fn id(&self) -> DataNodeId {
        self.id
    }

    pub fn get(&self) -> &'a str {
        self.tree.get(self.id)
    }

    pub fn parent(&self) -> Option<DataNode<'a>> {
        self.tree.parent(self.id).map(|p| self.tree.node(p))
    }

    pub fn children(&self) -> impl Iterator<Item = DataNode<'a>> + use<'a> {
        let tree = self.tree;
        tree.children(self.id).iter().map(move |c| tree.node(*c))
    }

    pub fn root(&self) -> DataNode<'a> {
        self.tree.node(DataNodeId::ROOT)
    }

    pub fn schema(&self) -> SchemaNode<'a> {
        self.tree.schema(self.id)
    }

    pub fn path(&self) -> String {
        self.tree.path(self.id)
    }

    pub fn annotations(&self) -> &'a [Annotation] {
        self.tree.annotations(self.id)
    }

    /// Resolve a path relative to this node (or absolute).
    pub fn find(&self, path: &str) -> YangResult<Vec<DataNode<'a>>> {
        let tree = self.tree;
        Ok(tree
            .find(self.id, path)?
            .into_iter()
            .map(|id| tree.node(id))
            .collect())
    }
}

impl fmt::Debug for DataNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataNode")
            .field("id", &self.id)
            .field("path", &self.path())
            .field("value", &self.tree.value(self.id))
            .finish()
    }
}
