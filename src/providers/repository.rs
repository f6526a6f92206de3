//! Model repository: module lookup and schema tree construction.
//!
//! A [`Repository`] holds module definitions and knows where to find more
//! of them: a search directory of `<module>.json` files and a list of
//! [`ModelProvider`]s. [`Repository::create_root_schema`] turns a list of
//! [`Capability`] announcements into a frozen schema tree, applying
//! features, augments and deviations on the way.
//!
//! ```rust
//! use yang_path::providers::Repository;
//! use yang_path::schema::Capability;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut repository = Repository::with_embedded_modules()?;
//! let schema = repository.create_root_schema(&[
//!     Capability::new("interfaces", "2024-01-01").with_feature("vlan"),
//! ])?;
//! assert_eq!(schema.find("/interfaces:interfaces/interface/vlan-id")?.len(), 1);
//! # Ok(())
//! # }
//! ```

use super::{ModelFormat, ModelProvider};
use crate::config::RepositoryConfig;
use crate::error::{ModelError, SchemaValidationError, YangError, YangResult};
use crate::schema::definition::{Deviate, IdentityTable, ModuleDefinition, NodeDefinition};
use crate::schema::{embedded, Capability, RootSchemaNode, SchemaNodeId, SchemaTreeBuilder};
use log::{debug, trace, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Module definitions and the places to look for more.
pub struct Repository {
    definitions: BTreeMap<String, ModuleDefinition>,
    search_dir: Option<PathBuf>,
    model_providers: Vec<Box<dyn ModelProvider>>,
    use_model_providers: bool,
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("modules", &self.definitions.keys().collect::<Vec<_>>())
            .field("search_dir", &self.search_dir)
            .field(
                "model_providers",
                &self.model_providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("use_model_providers", &self.use_model_providers)
            .finish()
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::with_config(&RepositoryConfig::default())
    }
}

impl Repository {
    /// An empty repository without a search directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &RepositoryConfig) -> Self {
        Self {
            definitions: BTreeMap::new(),
            search_dir: config.search_dir.clone(),
            model_providers: Vec::new(),
            use_model_providers: config.use_model_providers,
        }
    }

    /// A repository holding the embedded sample modules.
    pub fn with_embedded_modules() -> YangResult<Self> {
        let mut repository = Self::new();
        for json in embedded::sample_modules() {
            repository.add_definition_json(json)?;
        }
        Ok(repository)
    }

    /// Load every `*.json` definition in a directory.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> YangResult<Self> {
        let mut repository = Self::new();
        for path in json_files(dir.as_ref())? {
            let content = fs::read_to_string(&path)?;
            repository.add_definition(parse_definition(&path, &content)?);
        }
        debug!(
            "Loaded {} module definition(s) from {}",
            repository.definitions.len(),
            dir.as_ref().display()
        );
        Ok(repository)
    }

    /// Add a definition, replacing any earlier one of the same name.
    pub fn add_definition(&mut self, definition: ModuleDefinition) {
        if self.definitions.contains_key(&definition.name) {
            warn!("Replacing definition of module {}", definition.name);
        }
        self.definitions.insert(definition.name.clone(), definition);
    }

    pub fn add_definition_json(&mut self, json: &str) -> YangResult<()> {
        self.add_definition(ModuleDefinition::from_json_str(json)?);
        Ok(())
    }

    /// Register a provider consulted for modules not found locally.
    pub fn add_model_provider(&mut self, provider: Box<dyn ModelProvider>) {
        self.model_providers.push(provider);
    }

    pub fn definition(&self, module: &str) -> Option<&ModuleDefinition> {
        self.definitions.get(module)
    }

    /// Names of the modules currently held.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// One capability per held module, with every declared feature enabled.
    pub fn available_capabilities(&self) -> Vec<Capability> {
        self.definitions
            .values()
            .map(|d| {
                let mut capability = Capability::new(&d.name, &d.revision);
                capability.features = d.features.clone();
                capability
            })
            .collect()
    }

    /// Locate a module definition.
    ///
    /// Held definitions are checked first, then the search directory, then
    /// the model providers. Definitions found outside the repository are
    /// kept for later lookups.
    ///
    /// # Arguments
    /// * `module` - Module name
    /// * `revision` - Requested revision, empty for any
    pub fn lookup(&mut self, module: &str, revision: &str) -> YangResult<&ModuleDefinition> {
        let held = self.definitions.get(module).map(|d| d.revision.clone());
        let satisfied = held
            .as_ref()
            .is_some_and(|r| revision.is_empty() || r == revision);
        if !satisfied {
            match self.fetch(module, revision)? {
                Some(fetched) if revision.is_empty() || fetched.revision == revision => {
                    self.add_definition(fetched)
                }
                fetched => {
                    let available = held.or(fetched.map(|f| f.revision));
                    return Err(match available {
                        Some(available) => ModelError::IncompatibleRevision {
                            module: module.to_string(),
                            requested: revision.to_string(),
                            available,
                        },
                        None => ModelError::UnknownModule {
                            module: module.to_string(),
                        },
                    }
                    .into());
                }
            }
        }
        self.definitions.get(module).ok_or_else(|| {
            ModelError::UnknownModule {
                module: module.to_string(),
            }
            .into()
        })
    }

    fn fetch(&self, module: &str, revision: &str) -> YangResult<Option<ModuleDefinition>> {
        if let Some(dir) = &self.search_dir {
            let mut candidates = Vec::new();
            if !revision.is_empty() {
                candidates.push(dir.join(format!("{module}@{revision}.json")));
            }
            candidates.push(dir.join(format!("{module}.json")));
            for path in candidates {
                if !path.is_file() {
                    continue;
                }
                trace!("Reading {} for module {}", path.display(), module);
                let content = fs::read_to_string(&path)?;
                let definition = parse_definition(&path, &content)?;
                check_name(module, &definition)?;
                return Ok(Some(definition));
            }
        }

        if !self.use_model_providers {
            return Ok(None);
        }
        for provider in &self.model_providers {
            if let Some(content) = provider.get_model(module, revision, ModelFormat::Json)? {
                debug!("Model provider {} supplied module {}", provider.name(), module);
                let definition = ModuleDefinition::from_json_str(&content).map_err(|e| {
                    ModelError::InvalidDefinition {
                        module: module.to_string(),
                        message: e.to_string(),
                    }
                })?;
                check_name(module, &definition)?;
                return Ok(Some(definition));
            }
        }
        Ok(None)
    }

    /// Build the schema tree for a set of capabilities.
    ///
    /// Every capability's module is looked up in the requested revision.
    /// Only the announced features are enabled and nodes depending on other
    /// features are left out. The modules named as deviations are loaded as
    /// well. Augments are applied before deviations, so a deviation may
    /// target augmented nodes.
    ///
    /// # Errors
    /// * [`ModelError`] when a module, revision, feature, deviation module
    ///   or augment/deviation target cannot be found
    /// * [`SchemaValidationError`] when the definitions do not form a valid tree
    pub fn create_root_schema(&mut self, capabilities: &[Capability]) -> YangResult<Arc<RootSchemaNode>> {
        let mut selected: Vec<(ModuleDefinition, BTreeSet<String>)> = Vec::new();
        let mut deviation_modules = BTreeSet::new();

        for capability in capabilities {
            let definition = self.lookup(&capability.module, &capability.revision)?.clone();
            for feature in &capability.features {
                if !definition.features.contains(feature) {
                    return Err(ModelError::UnknownFeature {
                        module: definition.name.clone(),
                        feature: feature.clone(),
                    }
                    .into());
                }
            }
            deviation_modules.extend(capability.deviations.iter().cloned());
            if selected.iter().any(|(d, _)| d.name == definition.name) {
                warn!("Module {} announced twice", definition.name);
                continue;
            }
            selected.push((definition, capability.features.clone()));
        }

        for module in deviation_modules {
            if selected.iter().any(|(d, _)| d.name == module) {
                continue;
            }
            let definition = match self.lookup(&module, "") {
                Ok(definition) => definition.clone(),
                Err(YangError::Model(ModelError::UnknownModule { module })) => {
                    return Err(ModelError::MissingDeviation { module }.into());
                }
                Err(other) => return Err(other),
            };
            selected.push((definition, BTreeSet::new()));
        }

        let mut builder = SchemaTreeBuilder::new();
        let mut identities = IdentityTable::new();
        for (definition, enabled) in &selected {
            builder.add_module(definition.module_info(enabled))?;
            identities.add_module(definition);
        }

        let enabled = |module: &str, feature: &str| {
            selected
                .iter()
                .any(|(d, features)| d.name == module && features.contains(feature))
        };
        let loader = NodeLoader {
            identities: &identities,
            enabled: &enabled,
        };

        for (definition, _) in &selected {
            loader.add_nodes(&mut builder, SchemaNodeId::ROOT, &definition.name, &definition.nodes)?;
        }

        for (definition, _) in &selected {
            for augment in &definition.augments {
                let targets = builder.find(&augment.target);
                let [target] = targets[..] else {
                    return Err(ModelError::AugmentTarget {
                        module: definition.name.clone(),
                        target: augment.target.clone(),
                    }
                    .into());
                };
                debug!("Module {} augments {}", definition.name, augment.target);
                loader.add_nodes(&mut builder, target, &definition.name, &augment.nodes)?;
            }
        }

        for (definition, _) in &selected {
            for deviation in &definition.deviations {
                let targets = builder.find(&deviation.target);
                let [target] = targets[..] else {
                    return Err(ModelError::DeviationTarget {
                        module: definition.name.clone(),
                        target: deviation.target.clone(),
                    }
                    .into());
                };
                debug!("Module {} deviates {}", definition.name, deviation.target);
                match &deviation.deviate {
                    Deviate::NotSupported => builder.remove(target),
                    Deviate::ReplaceType { value_type } => {
                        let value_type = value_type
                            .to_value_type(&definition.name, &identities)
                            .map_err(|(code, detail)| {
                                SchemaValidationError::single(&deviation.target, code, detail)
                            })?;
                        builder.replace_type(target, value_type)?;
                    }
                }
            }
        }

        Ok(builder.build()?)
    }
}

/// Adds definition subtrees to a builder.
struct NodeLoader<'a> {
    identities: &'a IdentityTable,
    enabled: &'a dyn Fn(&str, &str) -> bool,
}

impl NodeLoader<'_> {
    fn add_nodes(
        &self,
        builder: &mut SchemaTreeBuilder,
        parent: SchemaNodeId,
        module: &str,
        nodes: &[NodeDefinition],
    ) -> YangResult<()> {
        for node in nodes {
            if !node.is_enabled(module, self.enabled) {
                trace!("Skipping {}:{}, feature disabled", module, node.name);
                continue;
            }
            let spec = node
                .to_spec(module, self.identities)
                .map_err(|(code, detail)| {
                    SchemaValidationError::single(format!("{module}:{}", node.name), code, detail)
                })?
                .in_module(module);
            let id = builder.add(parent, spec)?;
            self.add_nodes(builder, id, module, &node.children)?;
        }
        Ok(())
    }
}

fn json_files(dir: &Path) -> YangResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn parse_definition(path: &Path, content: &str) -> YangResult<ModuleDefinition> {
    ModuleDefinition::from_json_str(content).map_err(|e| {
        ModelError::InvalidDefinition {
            module: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn check_name(module: &str, definition: &ModuleDefinition) -> YangResult<()> {
    if definition.name != module {
        return Err(ModelError::InvalidDefinition {
            module: module.to_string(),
            message: format!("definition declares module '{}'", definition.name),
        }
        .into());
    }
    Ok(())
}
