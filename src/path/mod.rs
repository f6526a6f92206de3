//! Path expressions: parsing, resolution and creation.
//!
//! Paths are a restricted XPath dialect. An absolute path starts with `/`;
//! a relative one is resolved from the node the call is made on. Segments are
//! `[module:]name[predicate]*`; the module of a segment without a prefix is
//! inherited from the segment before it.
//!
//! The same expression means slightly different things depending on the tree
//! it is applied to:
//!
//! - against a schema tree, key predicates only assert that the key exists
//!   ([`find_schema`]);
//! - against a data tree, predicates compare actual values ([`find_data`]);
//! - [`create::create`] resolves like [`find_data`] but creates what is
//!   missing, requiring all keys for new list instances.

pub mod create;
pub mod parser;
pub mod resolve;


pub use create::CreateMode;
pub use parser::{parse, quote, PathExpr, Predicate, Segment};
pub use resolve::{find_data, find_schema};
