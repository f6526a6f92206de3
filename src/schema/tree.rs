//! The schema tree.
//!
//! A [`RootSchemaNode`] owns every schema node of a model in an arena and is
//! immutable once built. Nodes refer to each other by [`SchemaNodeId`]; the
//! owning relation is the `children` list, the `parent` index is a plain back
//! reference. Data trees hold the root through an `Arc`, so the schema lives
//! at least as long as every data tree built against it.

use super::types::{ModelContext, NodeKind, Statement};
use crate::error::PathResult;
use crate::path;
use crate::value_type::ValueType;
use std::fmt;

/// Stable index of a node inside its [`RootSchemaNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaNodeId(pub(crate) usize);

impl SchemaNodeId {
    /// The root of every schema tree.
    pub const ROOT: SchemaNodeId = SchemaNodeId(0);
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaNodeRecord {
    pub(crate) statement: Statement,
    pub(crate) kind: NodeKind,
    pub(crate) module: String,
    pub(crate) parent: Option<SchemaNodeId>,
    pub(crate) children: Vec<SchemaNodeId>,
    pub(crate) key_names: Vec<String>,
    pub(crate) keys: Vec<SchemaNodeId>,
    pub(crate) value_type: Option<ValueType>,
    pub(crate) config: bool,
    pub(crate) mandatory: bool,
    pub(crate) min_elements: u32,
    pub(crate) max_elements: Option<u32>,
}

impl SchemaNodeRecord {
    pub(crate) fn root() -> Self {
        Self {
            statement: Statement::new("", ""),
            kind: NodeKind::Root,
            module: String::new(),
            parent: None,
            children: Vec::new(),
            key_names: Vec::new(),
            keys: Vec::new(),
            value_type: None,
            config: true,
            mandatory: false,
            min_elements: 0,
            max_elements: None,
        }
    }
}

/// Root of a schema tree: owns the top-level schema nodes and the model
/// context of the modules they come from.
#[derive(Debug, Clone)]
pub struct RootSchemaNode {
    pub(crate) nodes: Vec<SchemaNodeRecord>,
    pub(crate) context: ModelContext,
}

impl Default for RootSchemaNode {
    fn default() -> Self {
        Self {
            nodes: vec![SchemaNodeRecord::root()],
            context: ModelContext::default(),
        }
    }
}

impl RootSchemaNode {
    /// Handle to the root node itself.
    pub fn root(&self) -> SchemaNode<'_> {
        self.node(SchemaNodeId::ROOT)
    }

    /// Handle to a node of this tree.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: SchemaNodeId) -> SchemaNode<'_> {
        assert!(id.0 < self.nodes.len(), "schema node id out of range");
        SchemaNode { tree: self, id }
    }

    /// Top-level schema nodes.
    pub fn children(&self) -> impl Iterator<Item = SchemaNode<'_>> {
        self.root().children()
    }

    /// Resolve a schema path. Key predicates only assert that the key
    /// exists; their values are ignored.
    pub fn find(&self, path: &str) -> PathResult<Vec<SchemaNode<'_>>> {
        self.root().find(path)
    }

    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    /// Number of schema nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub(crate) fn record(&self, id: SchemaNodeId) -> &SchemaNodeRecord {
        &self.nodes[id.0]
    }

    pub(crate) fn record_mut(&mut self, id: SchemaNodeId) -> &mut SchemaNodeRecord {
        &mut self.nodes[id.0]
    }

    /// Textual path of a node: `/module:name/...`, the module prefix repeated
    /// only where it changes.
    pub(crate) fn path_of(&self, id: SchemaNodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.record(current).parent {
            let record = self.record(current);
            let parent_record = self.record(parent);
            if parent_record.kind == NodeKind::Root || parent_record.module != record.module {
                segments.push(format!("{}:{}", record.module, record.statement.arg));
            } else {
                segments.push(record.statement.arg.clone());
            }
            current = parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// The child of `parent` with this module and name.
    pub(crate) fn child_named(
        &self,
        parent: SchemaNodeId,
        module: &str,
        name: &str,
    ) -> Option<SchemaNodeId> {
        self.record(parent).children.iter().copied().find(|c| {
            let r = self.record(*c);
            r.module == module && r.statement.arg == name
        })
    }
}

/// Borrowed handle to one node of a schema tree.
#[derive(Clone, Copy)]
pub struct SchemaNode<'a> {
    tree: &'a RootSchemaNode,
    id: SchemaNodeId,
}

impl<'a> SchemaNode<'a> {
    fn record(&self) -> &'a SchemaNodeRecord {
        self.tree.record(self.id)
    }

    pub fn id(&self) -> SchemaNodeId {
        self.id
    }

    pub fn statement(&self) -> &'a Statement {
        &self.record().statement
    }

    pub fn name(&self) -> &'a str {
        &self.record().statement.arg
    }

    pub fn kind(&self) -> NodeKind {
        self.record().kind
    }

    /// Name of the module that defines this node.
    pub fn module(&self) -> &'a str {
        &self.record().module
    }

    pub fn parent(&self) -> Option<SchemaNode<'a>> {
        self.record().parent.map(|p| self.tree.node(p))
    }

    pub fn children(&self) -> impl Iterator<Item = SchemaNode<'a>> + use<'a> {
        let tree = self.tree;
        self.record().children.iter().map(move |c| tree.node(*c))
    }

    /// The schema tree this node belongs to.
    pub fn root(&self) -> &'a RootSchemaNode {
        self.tree
    }

    pub fn path(&self) -> String {
        self.tree.path_of(self.id)
    }

    /// Statements of the key leaves, in declaration order. Empty unless this
    /// is a list.
    pub fn keys(&self) -> Vec<Statement> {
        self.key_nodes()
            .map(|k| k.statement().clone())
            .collect()
    }

    pub fn key_nodes(&self) -> impl Iterator<Item = SchemaNode<'a>> + use<'a> {
        let tree = self.tree;
        self.record().keys.iter().map(move |k| tree.node(*k))
    }

    /// Whether this leaf is a key of its parent list.
    pub fn is_key(&self) -> bool {
        self.record()
            .parent
            .is_some_and(|p| self.tree.record(p).keys.contains(&self.id))
    }

    /// Value type of a leaf or leaf-list.
    pub fn value_type(&self) -> Option<&'a ValueType> {
        self.record().value_type.as_ref()
    }

    pub fn is_config(&self) -> bool {
        self.record().config
    }

    pub fn is_mandatory(&self) -> bool {
        self.record().mandatory
    }

    pub fn min_elements(&self) -> u32 {
        self.record().min_elements
    }

    pub fn max_elements(&self) -> Option<u32> {
        self.record().max_elements
    }

    /// Child with the given name, in this node's module or any module.
    pub fn child(&self, name: &str) -> Option<SchemaNode<'a>> {
        self.children()
            .find(|c| c.name() == name && c.module() == self.module())
            .or_else(|| self.children().find(|c| c.name() == name))
    }

    /// Resolve a path relative to this node (or absolute).
    pub fn find(&self, expression: &str) -> PathResult<Vec<SchemaNode<'a>>> {
        let expr = path::parse(expression)?;
        let tree = self.tree;
        Ok(path::find_schema(tree, self.id, &expr)?
            .into_iter()
            .map(|id| tree.node(id))
            .collect())
    }
}

impl fmt::Debug for SchemaNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaNode")
            .field("id", &self.id)
            .field("path", &self.path())
            .field("kind", &self.kind())
            .finish()
    }
}

impl PartialEq for SchemaNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SchemaNode<'_> {}
