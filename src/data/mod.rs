//! Data trees.
//!
//! A [`DataTree`] holds concrete values for a schema tree it shares through an
//! `Arc`. Client code reads and mutates it with path expressions
//! ([`DataTree::find`], [`DataTree::create`]) rather than by walking nodes.

pub mod tree;


pub use tree::{Annotation, DataNode, DataNodeId, DataTree};
