//! Serde descriptions of schema modules.
//!
//! Models are not described in YANG text here but in a JSON rendition of the
//! statements the schema tree understands. A module definition lists its
//! features, identities, top-level nodes, augments of other modules' nodes
//! and deviations. [`Repository`](crate::providers::Repository) turns a set
//! of definitions into a [`RootSchemaNode`](super::RootSchemaNode).
//!
//! ```json
//! {
//!   "name": "interfaces",
//!   "revision": "2024-01-01",
//!   "features": ["vlan"],
//!   "nodes": [
//!     { "keyword": "list", "name": "interface", "keys": ["name"], "children": [
//!       { "keyword": "leaf", "name": "name", "type": { "base": "string", "length": "1..16" } },
//!       { "keyword": "leaf", "name": "mtu", "type": { "base": "uint16", "range": "68..9216" } },
//!       { "keyword": "leaf", "name": "vlan", "if_feature": "vlan",
//!         "type": { "base": "uint16", "range": "1..4094" } }
//!     ]}
//!   ]
//! }
//! ```

use super::builder::NodeSpec;
use super::types::ModuleInfo;
use crate::error::SchemaValidationCode;
use crate::value_type::{
    BinaryType, Bit, BitsType, Decimal64Type, EnumValue, EnumerationType, Identity, IdentityType,
    InstanceIdType, IntegerValue, LeafrefType, NumberType, Pattern, StringType, UnionType,
    ValueType,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

/// Failure to turn a definition into schema nodes: the code and a message.
pub type DefinitionIssue = (SchemaValidationCode, String);

/// One module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    pub name: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    /// Features the module declares
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub identities: Vec<IdentityDefinition>,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub augments: Vec<AugmentDefinition>,
    #[serde(default)]
    pub deviations: Vec<DeviationDefinition>,
}

impl ModuleDefinition {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Module information with the given features enabled.
    pub fn module_info(&self, enabled: &BTreeSet<String>) -> ModuleInfo {
        let mut info = ModuleInfo::new(&self.name, &self.revision);
        if let Some(namespace) = &self.namespace {
            info.namespace = namespace.clone();
        }
        if let Some(prefix) = &self.prefix {
            info.prefix = prefix.clone();
        }
        info.features = enabled.clone();
        info
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDefinition {
    pub name: String,
    /// `name` or `module:name` of the base identity
    #[serde(default)]
    pub base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentDefinition {
    /// Absolute schema path of the augmented node
    pub target: String,
    pub nodes: Vec<NodeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationDefinition {
    /// Absolute schema path of the deviated node
    pub target: String,
    #[serde(flatten)]
    pub deviate: Deviate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "deviate", rename_all = "kebab-case")]
pub enum Deviate {
    /// The node does not exist on this server
    NotSupported,
    /// The node has another type on this server
    ReplaceType {
        #[serde(rename = "type")]
        value_type: TypeDefinition,
    },
}

/// One schema node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub children: Vec<NodeDefinition>,
    #[serde(default, rename = "type")]
    pub value_type: Option<TypeDefinition>,
    #[serde(default)]
    pub config: Option<bool>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub min_elements: u32,
    #[serde(default)]
    pub max_elements: Option<u32>,
    /// `feature` or `module:feature` the node depends on
    #[serde(default)]
    pub if_feature: Option<String>,
}

impl NodeDefinition {
    /// Whether the node survives with the given features of `module`
    /// enabled. `enabled` answers for `(module, feature)`.
    pub fn is_enabled(&self, module: &str, enabled: impl Fn(&str, &str) -> bool) -> bool {
        match &self.if_feature {
            None => true,
            Some(feature) => match feature.split_once(':') {
                Some((m, f)) => enabled(m, f),
                None => enabled(module, feature),
            },
        }
    }

    /// Node description for the builder, without children.
    pub fn to_spec(&self, module: &str, identities: &IdentityTable) -> Result<NodeSpec, DefinitionIssue> {
        let mut spec = NodeSpec::new(&self.keyword, &self.name);
        spec.keys = self.keys.clone();
        spec.value_type = self
            .value_type
            .as_ref()
            .map(|t| t.to_value_type(module, identities))
            .transpose()?;
        spec.config = self.config;
        spec.mandatory = self.mandatory;
        spec.min_elements = self.min_elements;
        spec.max_elements = self.max_elements;
        Ok(spec)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    pub name: String,
    /// Assigned automatically when absent: one more than the highest so far
    #[serde(default)]
    pub value: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitDefinition {
    pub name: String,
    #[serde(default)]
    pub position: Option<u32>,
}

/// A type with its restrictions. Ranges and lengths use the YANG syntax
/// (`"1..10 | 20..max"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "base", rename_all = "kebab-case")]
pub enum TypeDefinition {
    Binary {
        #[serde(default)]
        length: Option<String>,
    },
    Bits {
        bits: Vec<BitDefinition>,
    },
    Boolean,
    Decimal64 {
        fraction_digits: u8,
        #[serde(default)]
        range: Option<String>,
    },
    Empty,
    Enumeration {
        enums: Vec<EnumDefinition>,
    },
    Identityref {
        /// `name` or `module:name` of the base identity
        identity: String,
    },
    InstanceIdentifier {
        #[serde(default = "default_true")]
        require_instance: bool,
    },
    Leafref {
        path: String,
        #[serde(default = "default_true")]
        require_instance: bool,
    },
    String {
        #[serde(default)]
        length: Option<String>,
        #[serde(default)]
        patterns: Vec<String>,
        /// Patterns the value must not match
        #[serde(default)]
        invert_patterns: Vec<String>,
    },
    Int8 {
        #[serde(default)]
        range: Option<String>,
    },
    Int16 {
        #[serde(default)]
        range: Option<String>,
    },
    Int32 {
        #[serde(default)]
        range: Option<String>,
    },
    Int64 {
        #[serde(default)]
        range: Option<String>,
    },
    Uint8 {
        #[serde(default)]
        range: Option<String>,
    },
    Uint16 {
        #[serde(default)]
        range: Option<String>,
    },
    Uint32 {
        #[serde(default)]
        range: Option<String>,
    },
    Uint64 {
        #[serde(default)]
        range: Option<String>,
    },
    Union {
        types: Vec<TypeDefinition>,
    },
}

fn default_true() -> bool {
    true
}

impl TypeDefinition {
    /// The value type this definition describes. Identity bases are
    /// resolved against `identities`; an unprefixed base refers to `module`.
    pub fn to_value_type(
        &self,
        module: &str,
        identities: &IdentityTable,
    ) -> Result<ValueType, DefinitionIssue> {
        let value_type = match self {
            Self::Binary { length } => {
                let mut binary = BinaryType::new();
                for (min, max) in intervals(length.as_deref(), 0u64, u64::MAX)? {
                    binary.length.push(min, max);
                }
                ValueType::Binary(binary)
            }
            Self::Bits { bits } => {
                let mut next = 0;
                let bits = bits
                    .iter()
                    .map(|b| {
                        let position = b.position.unwrap_or(next);
                        next = position.saturating_add(1);
                        Bit::new(&b.name, position)
                    })
                    .collect();
                ValueType::Bits(BitsType::new(bits))
            }
            Self::Boolean => ValueType::Bool,
            Self::Decimal64 {
                fraction_digits,
                range,
            } => {
                let mut decimal = Decimal64Type::new(*fraction_digits);
                for (min, max) in intervals(range.as_deref(), f64::MIN, f64::MAX)? {
                    decimal = decimal.with_interval(min, max);
                }
                ValueType::Decimal64(decimal)
            }
            Self::Empty => ValueType::Empty,
            Self::Enumeration { enums } => {
                let mut next = 0;
                let enums = enums
                    .iter()
                    .map(|e| {
                        let value = e.value.unwrap_or(next);
                        next = value.saturating_add(1);
                        EnumValue::new(&e.name, value)
                    })
                    .collect();
                ValueType::Enumeration(EnumerationType::new(enums))
            }
            Self::Identityref { identity } => {
                let (base_module, base_name) =
                    identity.split_once(':').unwrap_or((module, identity.as_str()));
                let base = identities.identity(base_module, base_name).ok_or_else(|| {
                    (
                        SchemaValidationCode::InResolv,
                        format!("identity '{identity}' not found"),
                    )
                })?;
                ValueType::Identity(IdentityType::new(base))
            }
            Self::InstanceIdentifier { require_instance } => {
                ValueType::InstanceId(InstanceIdType::new(*require_instance))
            }
            Self::Leafref {
                path,
                require_instance,
            } => {
                let mut leafref = LeafrefType::new(path);
                leafref.require_instance = *require_instance;
                ValueType::Leafref(leafref)
            }
            Self::String {
                length,
                patterns,
                invert_patterns,
            } => {
                let mut string = StringType::new();
                for (min, max) in intervals(length.as_deref(), 0u64, u64::MAX)? {
                    string.length.push(min, max);
                }
                for source in patterns {
                    string = string.with_pattern(Pattern::new(source).map_err(regex_issue)?);
                }
                for source in invert_patterns {
                    string = string.with_pattern(Pattern::inverted(source).map_err(regex_issue)?);
                }
                ValueType::String(string)
            }
            Self::Int8 { range } => ValueType::Int8(number(range)?),
            Self::Int16 { range } => ValueType::Int16(number(range)?),
            Self::Int32 { range } => ValueType::Int32(number(range)?),
            Self::Int64 { range } => ValueType::Int64(number(range)?),
            Self::Uint8 { range } => ValueType::Uint8(number(range)?),
            Self::Uint16 { range } => ValueType::Uint16(number(range)?),
            Self::Uint32 { range } => ValueType::Uint32(number(range)?),
            Self::Uint64 { range } => ValueType::Uint64(number(range)?),
            Self::Union { types } => ValueType::Union(UnionType::new(
                types
                    .iter()
                    .map(|t| t.to_value_type(module, identities))
                    .collect::<Result<_, _>>()?,
            )),
        };
        Ok(value_type)
    }
}

fn regex_issue(error: regex::Error) -> DefinitionIssue {
    (SchemaValidationCode::InRegex, error.to_string())
}

fn number<T>(range: &Option<String>) -> Result<NumberType<T>, DefinitionIssue>
where
    T: IntegerValue,
{
    let mut number = NumberType::full();
    for (min, max) in intervals(range.as_deref(), T::MIN, T::MAX)? {
        number = number.with_interval(min, max);
    }
    Ok(number)
}

/// Parse `"a..b | c | d..max"` into intervals; `min` and `max` stand for the
/// bounds of the type.
fn intervals<T>(text: Option<&str>, lowest: T, highest: T) -> Result<Vec<(T, T)>, DefinitionIssue>
where
    T: FromStr + PartialOrd + Copy,
{
    let Some(text) = text else {
        return Ok(Vec::new());
    };
    let bound = |s: &str| -> Result<T, DefinitionIssue> {
        match s.trim() {
            "min" => Ok(lowest),
            "max" => Ok(highest),
            other => other.parse().map_err(|_| {
                (
                    SchemaValidationCode::InArg,
                    format!("invalid bound '{other}' in '{text}'"),
                )
            }),
        }
    };
    text.split('|')
        .map(|part| {
            let (min, max) = match part.split_once("..") {
                Some((a, b)) => (bound(a)?, bound(b)?),
                None => {
                    let v = bound(part)?;
                    (v, v)
                }
            };
            if min > max {
                return Err((
                    SchemaValidationCode::InArg,
                    format!("empty interval '{}' in '{text}'", part.trim()),
                ));
            }
            Ok((min, max))
        })
        .collect()
}

/// Identities of every loaded module, with their derivations.
#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    /// `(module, name, base)` where base is `(module, name)`
    entries: Vec<(String, String, Option<(String, String)>)>,
}

impl IdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the identities a module declares.
    pub fn add_module(&mut self, module: &ModuleDefinition) {
        for identity in &module.identities {
            let base = identity.base.as_ref().map(|b| match b.split_once(':') {
                Some((m, n)) => (m.to_string(), n.to_string()),
                None => (module.name.clone(), b.clone()),
            });
            self.entries
                .push((module.name.clone(), identity.name.clone(), base));
        }
    }

    /// The identity with all identities transitively derived from it.
    pub fn identity(&self, module: &str, name: &str) -> Option<Identity> {
        self.entries
            .iter()
            .any(|(m, n, _)| m == module && n == name)
            .then(|| self.derive(module, name, &mut HashSet::new()))
    }

    fn derive(&self, module: &str, name: &str, visited: &mut HashSet<(String, String)>) -> Identity {
        let mut identity = Identity::new(module, name);
        if !visited.insert((module.to_string(), name.to_string())) {
            return identity;
        }
        for (m, n, base) in &self.entries {
            if base
                .as_ref()
                .is_some_and(|(bm, bn)| bm == module && bn == name)
            {
                identity = identity.with_derived(self.derive(m, n, visited));
            }
        }
        identity
    }
}
