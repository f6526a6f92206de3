//! Model lookup through search directories and model providers.

use crate::assert_model_error;
use crate::common::init_logging;
use crate::common::providers::StaticModelProvider;
use std::fs;
use std::path::PathBuf;
use yang_path::EngineConfig;
use yang_path::error::ModelError;
use yang_path::providers::Repository;
use yang_path::schema::{Capability, embedded};

const VENDOR_MODULE: &str = r#"{
    "name": "vendor",
    "revision": "2024-05-01",
    "nodes": [
        { "keyword": "container", "name": "system", "children": [
            { "keyword": "leaf", "name": "hostname", "type": { "base": "string" } }
        ]}
    ]
}"#;

/// A fresh directory under the system temp dir, unique per test.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("yang-path-{}-{test}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir
}

#[test]
fn test_model_provider_supplies_missing_module() {
    init_logging();
    let mut repository = Repository::with_embedded_modules().unwrap();
    repository.add_model_provider(Box::new(
        StaticModelProvider::new().with_model("vendor", VENDOR_MODULE),
    ));

    let schema = repository
        .create_root_schema(&[
            Capability::new("interfaces", ""),
            Capability::new("vendor", "2024-05-01"),
        ])
        .unwrap();
    assert_eq!(schema.find("/vendor:system/hostname").unwrap().len(), 1);

    // kept after the first lookup
    assert!(repository.definition("vendor").is_some());
    repository
        .create_root_schema(&[Capability::new("vendor", "")])
        .unwrap();
}

#[test]
fn test_model_provider_without_module() {
    let mut repository = Repository::new();
    repository.add_model_provider(Box::new(StaticModelProvider::new()));
    assert_model_error!(
        repository.create_root_schema(&[Capability::new("vendor", "")]),
        ModelError::UnknownModule { .. }
    );
}

#[test]
fn test_search_dir_from_config() {
    let dir = scratch_dir("search");
    fs::write(dir.join("vendor.json"), VENDOR_MODULE).unwrap();
    fs::write(
        dir.join("vendor@2023-01-01.json"),
        r#"{ "name": "vendor", "revision": "2023-01-01" }"#,
    )
    .unwrap();

    let config = EngineConfig::from_json_str(&format!(
        r#"{{ "repository": {{ "search_dir": {} }} }}"#,
        serde_json::to_string(&dir).unwrap()
    ))
    .unwrap();
    let mut repository = Repository::with_config(&config.repository);

    assert_eq!(repository.lookup("vendor", "").unwrap().revision, "2024-05-01");
    assert_eq!(
        repository.lookup("vendor", "2023-01-01").unwrap().revision,
        "2023-01-01"
    );
    assert_model_error!(
        repository.lookup("vendor", "2022-01-01"),
        ModelError::IncompatibleRevision { .. }
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_from_dir() {
    let dir = scratch_dir("from-dir");
    for (name, json) in [
        ("interfaces.json", embedded::interfaces_module()),
        ("interfaces-ext.json", embedded::interfaces_ext_module()),
        ("notes.txt", "not a module"),
    ] {
        fs::write(dir.join(name), json).unwrap();
    }

    let mut repository = Repository::from_dir(&dir).unwrap();
    assert_eq!(
        repository.modules().collect::<Vec<_>>(),
        vec!["interfaces", "interfaces-ext"]
    );
    let capabilities = repository.available_capabilities();
    let schema = repository.create_root_schema(&capabilities).unwrap();
    assert_eq!(
        schema
            .find("/interfaces:interfaces/interface/interfaces-ext:speed")
            .unwrap()
            .len(),
        1
    );

    fs::write(dir.join("broken.json"), "{ \"name\": ").unwrap();
    assert_model_error!(Repository::from_dir(&dir), ModelError::InvalidDefinition { .. });

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_capabilities_from_json() {
    let capabilities: Vec<Capability> = serde_json::from_str(
        r#"[
            { "module": "interfaces", "revision": "2024-01-01", "features": ["vlan"] },
            { "module": "interfaces-ext" }
        ]"#,
    )
    .unwrap();
    let schema = Repository::with_embedded_modules()
        .unwrap()
        .create_root_schema(&capabilities)
        .unwrap();
    let vlan = schema.find("/interfaces:interfaces/interface/vlan-id").unwrap();
    assert_eq!(vlan.len(), 1);
    assert!(vlan[0].value_type().unwrap().validate("5000").has_errors());
}
