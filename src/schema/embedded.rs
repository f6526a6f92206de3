//! Embedded sample module definitions.
//!
//! A small interface-management model, embedded as static JSON strings so
//! that examples, the `model-validator` binary and tests have a model to load
//! without any files on disk.

/// The `interfaces` module: a list of interfaces, their statistics and two
/// operations.
pub fn interfaces_module() -> &'static str {
    r#"{
  "name": "interfaces",
  "revision": "2024-01-01",
  "namespace": "urn:example:interfaces",
  "prefix": "if",
  "features": ["vlan"],
  "identities": [
    { "name": "interface-type" },
    { "name": "ethernet", "base": "interface-type" },
    { "name": "fast-ethernet", "base": "ethernet" },
    { "name": "loopback", "base": "interface-type" }
  ],
  "nodes": [
    {
      "keyword": "container",
      "name": "interfaces",
      "children": [
        {
          "keyword": "list",
          "name": "interface",
          "keys": ["name"],
          "children": [
            { "keyword": "leaf", "name": "name", "type": { "base": "string", "length": "1..16" } },
            {
              "keyword": "leaf",
              "name": "type",
              "mandatory": true,
              "type": { "base": "identityref", "identity": "interface-type" }
            },
            { "keyword": "leaf", "name": "enabled", "type": { "base": "boolean" } },
            { "keyword": "leaf", "name": "mtu", "type": { "base": "uint16", "range": "68..9216" } },
            { "keyword": "leaf", "name": "description", "type": { "base": "string" } },
            {
              "keyword": "leaf-list",
              "name": "address",
              "max_elements": 4,
              "type": {
                "base": "string",
                "patterns": ["[0-9]{1,3}(\\.[0-9]{1,3}){3}/[0-9]{1,2}"]
              }
            },
            {
              "keyword": "leaf",
              "name": "vlan-id",
              "if_feature": "vlan",
              "type": { "base": "uint16", "range": "1..4094" }
            },
            {
              "keyword": "container",
              "name": "statistics",
              "config": false,
              "children": [
                { "keyword": "leaf", "name": "in-octets", "type": { "base": "uint64" } },
                { "keyword": "leaf", "name": "out-octets", "type": { "base": "uint64" } }
              ]
            }
          ]
        }
      ]
    },
    {
      "keyword": "rpc",
      "name": "reset",
      "children": [
        {
          "keyword": "input",
          "name": "input",
          "children": [
            {
              "keyword": "leaf",
              "name": "name",
              "mandatory": true,
              "type": { "base": "leafref", "path": "/interfaces:interfaces/interface/name" }
            },
            { "keyword": "leaf", "name": "delay", "type": { "base": "decimal64", "fraction_digits": 2, "range": "0..60" } }
          ]
        },
        {
          "keyword": "output",
          "name": "output",
          "children": [
            {
              "keyword": "leaf",
              "name": "status",
              "type": { "base": "enumeration", "enums": [{ "name": "ok" }, { "name": "failed" }] }
            }
          ]
        }
      ]
    },
    {
      "keyword": "rpc",
      "name": "clear-counters",
      "children": [
        {
          "keyword": "input",
          "name": "input",
          "children": [
            { "keyword": "leaf", "name": "all", "type": { "base": "empty" } }
          ]
        }
      ]
    }
  ]
}"#
}

/// The `interfaces-ext` module: augments interfaces with a speed setting.
pub fn interfaces_ext_module() -> &'static str {
    r#"{
  "name": "interfaces-ext",
  "revision": "2024-02-01",
  "augments": [
    {
      "target": "/interfaces:interfaces/interface",
      "nodes": [
        {
          "keyword": "leaf",
          "name": "speed",
          "type": {
            "base": "union",
            "types": [
              { "base": "enumeration", "enums": [{ "name": "auto" }] },
              { "base": "uint32", "range": "10..100000" }
            ]
          }
        }
      ]
    }
  ]
}"#
}

/// The `interfaces-deviations` module: what a small device does not support.
pub fn interfaces_deviations_module() -> &'static str {
    r#"{
  "name": "interfaces-deviations",
  "revision": "2024-03-01",
  "deviations": [
    { "target": "/interfaces:interfaces/interface/description", "deviate": "not-supported" },
    {
      "target": "/interfaces:interfaces/interface/mtu",
      "deviate": "replace-type",
      "type": { "base": "uint16", "range": "68..1500" }
    }
  ]
}"#
}

/// Every embedded module definition.
pub fn sample_modules() -> [&'static str; 3] {
    [
        interfaces_module(),
        interfaces_ext_module(),
        interfaces_deviations_module(),
    ]
}
