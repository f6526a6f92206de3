//! Core schema type definitions.
//!
//! This module contains the small value types shared by the schema tree, the
//! model loader and the executor boundary: statements, node kinds, module
//! descriptions and capabilities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The schema-language statement a schema node originates from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    /// Keyword, e.g. `container`, `list`, `leaf`
    pub keyword: String,
    /// Argument, usually the node name
    pub arg: String,
}

impl Statement {
    pub fn new(keyword: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            arg: arg.into(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword, self.arg)
    }
}

/// Kind of a schema node, derived from its statement keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Container,
    List,
    Leaf,
    LeafList,
    AnyXml,
    Rpc,
    Input,
    Output,
}

impl NodeKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "container" => Some(Self::Container),
            "list" => Some(Self::List),
            "leaf" => Some(Self::Leaf),
            "leaf-list" => Some(Self::LeafList),
            "anyxml" | "anydata" => Some(Self::AnyXml),
            "rpc" | "action" => Some(Self::Rpc),
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Root => "",
            Self::Container => "container",
            Self::List => "list",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::AnyXml => "anyxml",
            Self::Rpc => "rpc",
            Self::Input => "input",
            Self::Output => "output",
        }
    }

    /// Leaf, leaf-list and anyxml nodes hold a value and no children.
    pub fn holds_value(&self) -> bool {
        matches!(self, Self::Leaf | Self::LeafList | Self::AnyXml)
    }

    /// Leaf and leaf-list nodes carry a value type.
    pub fn is_typed(&self) -> bool {
        matches!(self, Self::Leaf | Self::LeafList)
    }
}

/// A module loaded into a schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub prefix: String,
    /// Features enabled for this instance of the module
    #[serde(default)]
    pub features: BTreeSet<String>,
}

impl ModuleInfo {
    pub fn new(name: impl Into<String>, revision: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            prefix: name.clone(),
            namespace: format!("urn:{name}"),
            name,
            revision: revision.into(),
            features: BTreeSet::new(),
        }
    }
}

/// The shared model context held by a schema tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelContext {
    pub modules: Vec<ModuleInfo>,
}

impl ModelContext {
    pub fn module(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.module(name).is_some()
    }
}

/// One schema module instance a loader must supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub module: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub deviations: BTreeSet<String>,
}

impl Capability {
    pub fn new(module: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            revision: revision.into(),
            features: BTreeSet::new(),
            deviations: BTreeSet::new(),
        }
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    pub fn with_deviation(mut self, module: impl Into<String>) -> Self {
        self.deviations.insert(module.into());
        self
    }
}
