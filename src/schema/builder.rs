//! Incremental construction of schema trees.
//!
//! The builder is what a model loader drives: it registers modules, adds
//! nodes under existing ones and finally freezes the arena into a shared
//! [`RootSchemaNode`]. Per-node problems are reported by [`SchemaTreeBuilder::add`]
//! right away; cross-node problems (list keys, leafref targets) are collected
//! by [`SchemaTreeBuilder::build`].

use super::tree::{RootSchemaNode, SchemaNodeId, SchemaNodeRecord};
use super::types::{ModuleInfo, NodeKind, Statement};
use crate::error::{SchemaIssue, SchemaResult, SchemaValidationCode, SchemaValidationError};
use crate::path;
use crate::value_type::{LeafrefType, ValueType};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Description of one node to add to a schema tree.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub keyword: String,
    pub name: String,
    /// Defining module; inherited from the parent when absent
    pub module: Option<String>,
    pub keys: Vec<String>,
    pub value_type: Option<ValueType>,
    /// Inherited from the parent when absent
    pub config: Option<bool>,
    pub mandatory: bool,
    pub min_elements: u32,
    pub max_elements: Option<u32>,
}

impl NodeSpec {
    pub fn new(keyword: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            name: name.into(),
            module: None,
            keys: Vec::new(),
            value_type: None,
            config: None,
            mandatory: false,
            min_elements: 0,
            max_elements: None,
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::new("container", name)
    }

    pub fn list<I, S>(name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Self::new("list", name)
        }
    }

    pub fn leaf(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
            ..Self::new("leaf", name)
        }
    }

    pub fn leaf_list(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
            ..Self::new("leaf-list", name)
        }
    }

    pub fn anyxml(name: impl Into<String>) -> Self {
        Self::new("anyxml", name)
    }

    pub fn rpc(name: impl Into<String>) -> Self {
        Self::new("rpc", name)
    }

    pub fn input() -> Self {
        Self::new("input", "input")
    }

    pub fn output() -> Self {
        Self::new("output", "output")
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn config(mut self, config: bool) -> Self {
        self.config = Some(config);
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn min_elements(mut self, min: u32) -> Self {
        self.min_elements = min;
        self
    }

    pub fn max_elements(mut self, max: u32) -> Self {
        self.max_elements = Some(max);
        self
    }
}

/// Builds a [`RootSchemaNode`].
#[derive(Debug, Default)]
pub struct SchemaTreeBuilder {
    tree: RootSchemaNode,
}

impl SchemaTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Nodes can only be added for registered modules.
    pub fn add_module(&mut self, module: ModuleInfo) -> SchemaResult<()> {
        if self.tree.context.has_module(&module.name) {
            return Err(SchemaValidationError::single(
                format!("/{}", module.name),
                SchemaValidationCode::DupId,
                "module registered twice",
            ));
        }
        debug!("Registering module {}@{}", module.name, module.revision);
        self.tree.context.modules.push(module);
        Ok(())
    }

    /// Read access to the tree under construction.
    pub fn tree(&self) -> &RootSchemaNode {
        &self.tree
    }

    /// Resolve a schema path against the nodes added so far.
    pub fn find(&self, expression: &str) -> Vec<SchemaNodeId> {
        path::parse(expression)
            .and_then(|expr| path::find_schema(&self.tree, SchemaNodeId::ROOT, &expr))
            .unwrap_or_default()
    }

    /// Add a node under `parent` and return its id.
    pub fn add(&mut self, parent: SchemaNodeId, spec: NodeSpec) -> SchemaResult<SchemaNodeId> {
        let parent_path = self.tree.path_of(parent);
        let issue = |code, detail: String| {
            SchemaValidationError::single(
                format!("{}/{}", parent_path.trim_end_matches('/'), spec.name),
                code,
                detail,
            )
        };

        let kind = NodeKind::from_keyword(&spec.keyword).ok_or_else(|| {
            issue(
                SchemaValidationCode::InStmt,
                format!("unsupported statement '{}'", spec.keyword),
            )
        })?;
        let parent_record = self.tree.record(parent);

        let module = match (&spec.module, parent_record.kind) {
            (Some(m), _) => m.clone(),
            (None, NodeKind::Root) => {
                return Err(issue(
                    SchemaValidationCode::InMod,
                    "top-level node without module".to_string(),
                ));
            }
            (None, _) => parent_record.module.clone(),
        };
        if !self.tree.context.has_module(&module) {
            return Err(issue(
                SchemaValidationCode::InMod,
                format!("module '{module}' is not registered"),
            ));
        }

        let parent_accepts = match kind {
            NodeKind::Input | NodeKind::Output => parent_record.kind == NodeKind::Rpc,
            NodeKind::Rpc => matches!(
                parent_record.kind,
                NodeKind::Root | NodeKind::Container | NodeKind::List
            ),
            _ => !parent_record.kind.holds_value() && parent_record.kind != NodeKind::Rpc,
        };
        if !parent_accepts {
            return Err(issue(
                SchemaValidationCode::InStmt,
                format!(
                    "'{}' not allowed under '{}'",
                    kind.keyword(),
                    parent_record.kind.keyword()
                ),
            ));
        }

        if self.tree.child_named(parent, &module, &spec.name).is_some() {
            return Err(issue(
                SchemaValidationCode::DupId,
                format!("duplicate identifier '{}'", spec.name),
            ));
        }

        if kind.is_typed() {
            let Some(value_type) = &spec.value_type else {
                return Err(issue(
                    SchemaValidationCode::MissStmt,
                    "missing 'type'".to_string(),
                ));
            };
            check_value_type(value_type).map_err(|(code, detail)| issue(code, detail))?;
        }

        if kind == NodeKind::List && spec.keys.is_empty() && spec.config.unwrap_or(parent_record.config) {
            return Err(issue(
                SchemaValidationCode::MissStmt,
                "configuration list without 'key'".to_string(),
            ));
        }

        let config = match kind {
            NodeKind::Rpc | NodeKind::Input | NodeKind::Output => false,
            _ => spec.config.unwrap_or(parent_record.config),
        };

        let id = SchemaNodeId(self.tree.nodes.len());
        trace!("Adding {} {}:{} as {:?}", kind.keyword(), module, spec.name, id);
        self.tree.nodes.push(SchemaNodeRecord {
            statement: Statement::new(spec.keyword, spec.name),
            kind,
            module,
            parent: Some(parent),
            children: Vec::new(),
            key_names: spec.keys,
            keys: Vec::new(),
            value_type: if kind.is_typed() { spec.value_type } else { None },
            config,
            mandatory: spec.mandatory,
            min_elements: spec.min_elements,
            max_elements: spec.max_elements,
        });
        self.tree.record_mut(parent).children.push(id);
        Ok(id)
    }

    /// Detach a node (and so its subtree) from the tree.
    pub fn remove(&mut self, id: SchemaNodeId) {
        if let Some(parent) = self.tree.record(id).parent {
            self.tree.record_mut(parent).children.retain(|c| *c != id);
        }
    }

    /// Replace the value type of a leaf or leaf-list.
    pub fn replace_type(&mut self, id: SchemaNodeId, value_type: ValueType) -> SchemaResult<()> {
        let path = self.tree.path_of(id);
        if !self.tree.record(id).kind.is_typed() {
            return Err(SchemaValidationError::single(
                path,
                SchemaValidationCode::InArg,
                "only leaf and leaf-list nodes have a type",
            ));
        }
        check_value_type(&value_type)
            .map_err(|(code, detail)| SchemaValidationError::single(path, code, detail))?;
        self.tree.record_mut(id).value_type = Some(value_type);
        Ok(())
    }

    /// Resolve list keys and leafref targets and freeze the tree.
    pub fn build(mut self) -> SchemaResult<Arc<RootSchemaNode>> {
        let mut issues = Vec::new();
        self.resolve_keys(&mut issues);
        self.resolve_leafrefs(&mut issues);
        if !issues.is_empty() {
            return Err(SchemaValidationError { issues });
        }
        debug!(
            "Schema tree built with {} node(s) from {} module(s)",
            self.tree.len() - 1,
            self.tree.context.modules.len()
        );
        Ok(Arc::new(self.tree))
    }

    fn reachable(&self) -> Vec<SchemaNodeId> {
        let mut out = Vec::new();
        let mut stack = vec![SchemaNodeId::ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.tree.record(id).children.iter().rev().copied());
        }
        out
    }

    fn resolve_keys(&mut self, issues: &mut Vec<SchemaIssue>) {
        for id in self.reachable() {
            if self.tree.record(id).kind != NodeKind::List {
                continue;
            }
            let path = self.tree.path_of(id);
            let module = self.tree.record(id).module.clone();
            let mut seen = HashSet::new();
            let mut keys = Vec::new();
            for key in self.tree.record(id).key_names.clone() {
                if !seen.insert(key.clone()) {
                    issues.push(SchemaIssue {
                        path: path.clone(),
                        code: SchemaValidationCode::KeyDup,
                        detail: format!("key '{key}' listed twice"),
                    });
                    continue;
                }
                match self.tree.child_named(id, &module, &key) {
                    Some(child) if self.tree.record(child).kind == NodeKind::Leaf => {
                        keys.push(child)
                    }
                    Some(_) => issues.push(SchemaIssue {
                        path: path.clone(),
                        code: SchemaValidationCode::KeyNLeaf,
                        detail: format!("key '{key}' is not a leaf"),
                    }),
                    None => issues.push(SchemaIssue {
                        path: path.clone(),
                        code: SchemaValidationCode::KeyMiss,
                        detail: format!("key '{key}' not found"),
                    }),
                }
            }
            self.tree.record_mut(id).keys = keys;
        }
    }

    fn resolve_leafrefs(&mut self, issues: &mut Vec<SchemaIssue>) {
        let leafrefs: Vec<(SchemaNodeId, Vec<String>)> = self
            .reachable()
            .into_iter()
            .filter_map(|id| {
                let paths: Vec<String> = self
                    .tree
                    .record(id)
                    .value_type
                    .as_ref()?
                    .leafrefs()
                    .into_iter()
                    .filter(|l| l.target.is_none())
                    .map(|l| l.path.clone())
                    .collect();
                (!paths.is_empty()).then_some((id, paths))
            })
            .collect();

        for (id, paths) in leafrefs {
            let mut resolved = HashMap::new();
            for target_path in paths {
                match self.leafref_target_type(id, &target_path) {
                    Ok(target) => {
                        resolved.insert(target_path, target);
                    }
                    Err((code, detail)) => issues.push(SchemaIssue {
                        path: self.tree.path_of(id),
                        code,
                        detail,
                    }),
                }
            }
            if let Some(value_type) = &mut self.tree.record_mut(id).value_type {
                value_type.visit_leafrefs_mut(&mut |l| {
                    if l.target.is_none() {
                        if let Some(target) = resolved.get(&l.path) {
                            l.target = Some(Box::new(target.clone()));
                        }
                    }
                });
            }
        }
    }

    /// Follow a chain of leafrefs to the first non-leafref type.
    fn leafref_target_type(
        &self,
        start: SchemaNodeId,
        target_path: &str,
    ) -> Result<ValueType, (SchemaValidationCode, String)> {
        let mut visited = HashSet::from([start]);
        let mut target_path = target_path.to_string();
        loop {
            let targets = self.find(&target_path);
            let [target] = targets.as_slice() else {
                return Err((
                    SchemaValidationCode::InResolv,
                    format!("leafref target '{target_path}' not found"),
                ));
            };
            if !visited.insert(*target) {
                return Err((
                    SchemaValidationCode::CircLeafrefs,
                    format!("leafref chain through '{target_path}' is circular"),
                ));
            }
            match &self.tree.record(*target).value_type {
                Some(ValueType::Leafref(LeafrefType {
                    target: Some(resolved),
                    ..
                })) => return Ok((**resolved).clone()),
                Some(ValueType::Leafref(next)) => target_path = next.path.clone(),
                Some(other) => return Ok(other.clone()),
                None => {
                    return Err((
                        SchemaValidationCode::InResolv,
                        format!("leafref target '{target_path}' is not a leaf"),
                    ));
                }
            }
        }
    }
}

/// Per-type consistency checks: duplicate enum and bit names or values,
/// enum names with surrounding whitespace. Union members are checked
/// recursively.
fn check_value_type(value_type: &ValueType) -> Result<(), (SchemaValidationCode, String)> {
    match value_type {
        ValueType::Enumeration(e) => {
            let mut names = HashSet::new();
            let mut values = HashSet::new();
            for item in &e.enums {
                if item.name.trim() != item.name || item.name.is_empty() {
                    return Err((
                        SchemaValidationCode::EnumWs,
                        format!("enum name '{}' has surrounding whitespace", item.name),
                    ));
                }
                if !names.insert(item.name.as_str()) {
                    return Err((
                        SchemaValidationCode::EnumDupName,
                        format!("enum '{}' declared twice", item.name),
                    ));
                }
                if !values.insert(item.value) {
                    return Err((
                        SchemaValidationCode::EnumDupVal,
                        format!("enum value {} declared twice", item.value),
                    ));
                }
            }
            Ok(())
        }
        ValueType::Bits(b) => {
            let mut names = HashSet::new();
            let mut positions = HashSet::new();
            for bit in &b.bits {
                if !names.insert(bit.name.as_str()) {
                    return Err((
                        SchemaValidationCode::BitsDupName,
                        format!("bit '{}' declared twice", bit.name),
                    ));
                }
                if !positions.insert(bit.position) {
                    return Err((
                        SchemaValidationCode::BitsDupVal,
                        format!("bit position {} declared twice", bit.position),
                    ));
                }
            }
            Ok(())
        }
        ValueType::Union(u) => u.types.iter().try_for_each(check_value_type),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_type::{EnumValue, EnumerationType, NumberType, UnionType};

    fn builder() -> SchemaTreeBuilder {
        let mut b = SchemaTreeBuilder::new();
        b.add_module(ModuleInfo::new("m", "2024-01-01")).unwrap();
        b
    }

    #[test]
    fn test_top_level_node_requires_module() {
        let mut b = builder();
        let err = b
            .add(SchemaNodeId::ROOT, NodeSpec::container("c"))
            .unwrap_err();
        assert!(err.has_code(SchemaValidationCode::InMod));

        let err = b
            .add(SchemaNodeId::ROOT, NodeSpec::container("c").in_module("other"))
            .unwrap_err();
        assert!(err.has_code(SchemaValidationCode::InMod));
    }

    #[test]
    fn test_duplicate_sibling_rejected() {
        let mut b = builder();
        b.add(SchemaNodeId::ROOT, NodeSpec::container("c").in_module("m"))
            .unwrap();
        let err = b
            .add(SchemaNodeId::ROOT, NodeSpec::container("c").in_module("m"))
            .unwrap_err();
        assert!(err.has_code(SchemaValidationCode::DupId));
    }

    #[test]
    fn test_leaf_cannot_have_children() {
        let mut b = builder();
        let leaf = b
            .add(
                SchemaNodeId::ROOT,
                NodeSpec::leaf("x", ValueType::string()).in_module("m"),
            )
            .unwrap();
        let err = b.add(leaf, NodeSpec::container("c")).unwrap_err();
        assert!(err.has_code(SchemaValidationCode::InStmt));
    }

    #[test]
    fn test_missing_and_non_leaf_keys_collected_at_build() {
        let mut b = builder();
        let l = b
            .add(
                SchemaNodeId::ROOT,
                NodeSpec::list("l", ["id", "sub", "gone"]).in_module("m"),
            )
            .unwrap();
        b.add(l, NodeSpec::leaf("id", ValueType::string())).unwrap();
        b.add(l, NodeSpec::container("sub")).unwrap();

        let err = b.build().unwrap_err();
        assert!(err.has_code(SchemaValidationCode::KeyNLeaf));
        assert!(err.has_code(SchemaValidationCode::KeyMiss));
        assert_eq!(err.issues.len(), 2);
    }

    #[test]
    fn test_keys_resolved_in_declared_order() {
        let mut b = builder();
        let l = b
            .add(SchemaNodeId::ROOT, NodeSpec::list("l", ["b", "a"]).in_module("m"))
            .unwrap();
        b.add(l, NodeSpec::leaf("a", ValueType::string())).unwrap();
        b.add(l, NodeSpec::leaf("b", ValueType::string())).unwrap();
        let tree = b.build().unwrap();

        let keys: Vec<String> = tree.node(l).keys().into_iter().map(|s| s.arg).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_enum_value_rejected() {
        let mut b = builder();
        let ty = ValueType::Enumeration(EnumerationType::new(vec![
            EnumValue::new("up", 1),
            EnumValue::new("down", 1),
        ]));
        let err = b
            .add(SchemaNodeId::ROOT, NodeSpec::leaf("s", ty).in_module("m"))
            .unwrap_err();
        assert!(err.has_code(SchemaValidationCode::EnumDupVal));
    }

    #[test]
    fn test_leafref_target_type_resolved() {
        let mut b = builder();
        let c = b
            .add(SchemaNodeId::ROOT, NodeSpec::container("c").in_module("m"))
            .unwrap();
        b.add(c, NodeSpec::leaf("x", ValueType::Uint8(NumberType::new(0, 10))))
            .unwrap();
        let r = b
            .add(
                c,
                NodeSpec::leaf("r", ValueType::Leafref(LeafrefType::new("/m:c/x"))),
            )
            .unwrap();
        let tree = b.build().unwrap();

        let ty = tree.node(r).value_type().unwrap();
        assert!(!ty.validate("4").has_errors());
        assert!(ty.validate("40").has_errors());
    }

    #[test]
    fn test_leafref_in_union_resolved() {
        let mut b = builder();
        let c = b
            .add(SchemaNodeId::ROOT, NodeSpec::container("c").in_module("m"))
            .unwrap();
        b.add(c, NodeSpec::leaf("x", ValueType::Uint8(NumberType::new(0, 10))))
            .unwrap();
        let either = ValueType::Union(UnionType::new(vec![
            ValueType::Leafref(LeafrefType::new("/m:c/x")),
            ValueType::Enumeration(EnumerationType::from_names(["none"])),
        ]));
        let u = b.add(c, NodeSpec::leaf("u", either)).unwrap();
        let tree = b.build().unwrap();

        let ty = tree.node(u).value_type().unwrap();
        assert!(ty.leafrefs().iter().all(|l| l.target.is_some()));
        assert!(!ty.validate("4").has_errors());
        assert!(!ty.validate("none").has_errors());
        assert!(ty.validate("40").has_errors());
        assert!(ty.validate("not-a-number-at-all").has_errors());
    }

    #[test]
    fn test_unresolved_leafref_in_union() {
        let mut b = builder();
        let either = ValueType::Union(UnionType::new(vec![
            ValueType::Bool,
            ValueType::Leafref(LeafrefType::new("/m:missing")),
        ]));
        b.add(SchemaNodeId::ROOT, NodeSpec::leaf("u", either).in_module("m"))
            .unwrap();
        let err = b.build().unwrap_err();
        assert!(err.has_code(SchemaValidationCode::InResolv));
    }

    #[test]
    fn test_unresolved_and_circular_leafrefs() {
        let mut b = builder();
        let c = b
            .add(SchemaNodeId::ROOT, NodeSpec::container("c").in_module("m"))
            .unwrap();
        b.add(c, NodeSpec::leaf("a", ValueType::Leafref(LeafrefType::new("/m:c/b"))))
            .unwrap();
        b.add(c, NodeSpec::leaf("b", ValueType::Leafref(LeafrefType::new("/m:c/a"))))
            .unwrap();
        b.add(c, NodeSpec::leaf("z", ValueType::Leafref(LeafrefType::new("/m:c/none"))))
            .unwrap();

        let err = b.build().unwrap_err();
        assert!(err.has_code(SchemaValidationCode::CircLeafrefs));
        assert!(err.has_code(SchemaValidationCode::InResolv));
    }

    #[test]
    fn test_config_list_requires_key() {
        let mut b = builder();
        let err = b
            .add(SchemaNodeId::ROOT, NodeSpec::list("l", Vec::<String>::new()).in_module("m"))
            .unwrap_err();
        assert!(err.has_code(SchemaValidationCode::MissStmt));

        b.add(
            SchemaNodeId::ROOT,
            NodeSpec::list("stats", Vec::<String>::new())
                .in_module("m")
                .config(false),
        )
        .unwrap();
    }
}
