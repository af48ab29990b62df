//! regraft-core: tree data model for declarative tree rewriting
//!
//! This crate provides:
//! - `Value` / `ValueKind` / `Property`: typed node properties
//! - `TreeStore`: the storage capability the rewrite engine runs against
//! - `Tree`: an in-memory reference implementation of `TreeStore`
//! - `preorder()`: depth-first traversal over any store

mod path;
mod traverse;
mod tree;
mod value;

pub use traverse::preorder;
pub use tree::{NodeId, Tree, TreeStore, DEFAULT_NODE_TYPE};
pub use value::{Property, Value, ValueKind};
