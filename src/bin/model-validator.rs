//! # Model Validator
//!
//! A command-line utility for validating JSON module definitions and checking
//! that they build into a schema tree.
//!
//! ## Usage
//!
//! ### Validate a Single Module Definition
//!
//! ```bash
//! cargo run --bin model-validator models/interfaces.json
//! ```
//!
//! The other `*.json` files in the same directory are loaded along with it,
//! so augments and deviations between them are applied.
//!
//! ### Validate All Modules in a Directory
//!
//! ```bash
//! cargo run --bin model-validator ./models/
//! ```
//!
//! ### Validate the Embedded Sample Modules
//!
//! ```bash
//! cargo run --bin model-validator --embedded
//! ```
//!
//! ## Output Examples
//!
//! ```text
//! Validating module file: models/interfaces.json
//! ✓ Module definition is valid!
//!
//! Module Summary:
//!   Name: interfaces
//!   Revision: 2024-01-01
//!   Features: vlan
//!   Schema nodes: 21
//!     - container: 2
//!     - input: 2
//!     - leaf: 12
//!     - leaf-list: 1
//!     - list: 1
//!     - output: 1
//!     - rpc: 2
//! ```
//!
//! ```text
//! Validating module file: broken.json
//! ❌ Schema tree could not be built: Schema validation error: broken:id: InRegex ...
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: All definitions are valid
//! - `1`: One or more definitions are invalid or validation error occurred

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;
use yang_path::providers::Repository;
use yang_path::schema::{Capability, ModuleDefinition, RootSchemaNode, SchemaNodeId};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <module-file-or-directory> | --embedded", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} models/interfaces.json", args[0]);
        eprintln!("  {} ./models/", args[0]);
        eprintln!("  {} --embedded", args[0]);
        process::exit(1);
    }

    if args[1] == "--embedded" {
        validate_embedded();
        return;
    }

    let path = Path::new(&args[1]);

    if path.is_file() {
        validate_single_file(path);
    } else if path.is_dir() {
        validate_directory(path);
    } else {
        eprintln!(
            "Error: '{}' is not a valid file or directory",
            path.display()
        );
        process::exit(1);
    }
}

fn validate_single_file(file_path: &Path) {
    println!("Validating module file: {}", file_path.display());

    let definition = match load_definition(file_path) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("❌ Module definition is invalid: {}", e);
            process::exit(1);
        }
    };

    let mut repository = match file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => Repository::from_dir(dir).unwrap_or_default(),
        None => Repository::new(),
    };
    repository.add_definition(definition.clone());

    let capabilities = repository.available_capabilities();
    match build(&mut repository, &capabilities) {
        Ok(schema) => {
            println!("✓ Module definition is valid!");
            print_module_summary(&definition, &schema);
        }
        Err(e) => {
            eprintln!("❌ Schema tree could not be built: {}", e);
            process::exit(1);
        }
    }
}

fn validate_directory(dir_path: &Path) {
    println!("Validating modules in directory: {}", dir_path.display());

    let mut valid_count = 0;
    let mut error_count = 0;

    match fs::read_dir(dir_path) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }
                println!("\nValidating: {}", entry.file_name().to_string_lossy());

                match load_definition(&path) {
                    Ok(definition) => {
                        println!("  ✓ Valid - {}@{}", definition.name, definition.revision);
                        valid_count += 1;
                    }
                    Err(e) => {
                        eprintln!("  ❌ Invalid - {}", e);
                        error_count += 1;
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error reading directory: {}", e);
            process::exit(1);
        }
    }

    println!("\nValidation Summary:");
    println!("  Valid modules: {}", valid_count);
    println!("  Invalid modules: {}", error_count);

    if error_count > 0 {
        process::exit(1);
    }

    println!("\nBuilding schema tree from all modules...");
    match Repository::from_dir(dir_path) {
        Ok(mut repository) => check_repository(&mut repository),
        Err(e) => {
            eprintln!("❌ Failed to load modules: {}", e);
            process::exit(1);
        }
    }
}

fn validate_embedded() {
    println!("Validating embedded sample modules");
    match Repository::with_embedded_modules() {
        Ok(mut repository) => check_repository(&mut repository),
        Err(e) => {
            eprintln!("❌ Failed to load embedded modules: {}", e);
            process::exit(1);
        }
    }
}

/// Build one schema tree from every module of the repository, with every
/// feature enabled.
fn check_repository(repository: &mut Repository) {
    let capabilities = repository.available_capabilities();
    match build(repository, &capabilities) {
        Ok(schema) => {
            println!("✓ Schema tree built successfully");
            println!("  Modules loaded: {}", schema.context().modules.len());
            for module in &schema.context().modules {
                println!("    - {}@{}", module.name, module.revision);
            }
            println!("  Schema nodes: {}", count_nodes(&schema, None).values().sum::<usize>());
        }
        Err(e) => {
            eprintln!("❌ Failed to build schema tree: {}", e);
            process::exit(1);
        }
    }
}

fn build(
    repository: &mut Repository,
    capabilities: &[Capability],
) -> Result<Arc<RootSchemaNode>, Box<dyn std::error::Error>> {
    Ok(repository.create_root_schema(capabilities)?)
}

fn load_definition(file_path: &Path) -> Result<ModuleDefinition, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path)?;

    // Check the shape before deserializing for a clearer message
    let json_value: serde_json::Value = serde_json::from_str(&content)?;
    let obj = json_value
        .as_object()
        .ok_or("Module definition must be a JSON object")?;
    if !obj.contains_key("name") {
        return Err("Module definition missing required 'name' field".into());
    }

    let definition = ModuleDefinition::from_json_str(&content)?;
    if definition.name.is_empty() {
        return Err("Module name cannot be empty".into());
    }
    Ok(definition)
}

/// Reachable schema nodes per keyword, optionally only those of one module.
fn count_nodes(schema: &RootSchemaNode, module: Option<&str>) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    let mut stack = vec![schema.node(SchemaNodeId::ROOT)];
    while let Some(node) = stack.pop() {
        for child in node.children() {
            if module.is_none_or(|m| child.module() == m) {
                *counts.entry(child.kind().keyword()).or_insert(0) += 1;
            }
            stack.push(child);
        }
    }
    counts
}

fn print_module_summary(definition: &ModuleDefinition, schema: &RootSchemaNode) {
    println!();
    println!("Module Summary:");
    println!("  Name: {}", definition.name);
    println!("  Revision: {}", definition.revision);
    if !definition.features.is_empty() {
        let features: Vec<&str> = definition.features.iter().map(String::as_str).collect();
        println!("  Features: {}", features.join(", "));
    }
    if !definition.augments.is_empty() {
        println!("  Augments: {}", definition.augments.len());
    }
    if !definition.deviations.is_empty() {
        println!("  Deviations: {}", definition.deviations.len());
    }

    let counts = count_nodes(schema, Some(definition.name.as_str()));
    println!("  Schema nodes: {}", counts.values().sum::<usize>());
    for (keyword, count) in counts {
        println!("    - {}: {}", keyword, count);
    }
}
