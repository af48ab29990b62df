//! regraft-rules: declarative tree rewriting
//!
//! A rewrite rule pairs a set of named pattern subtrees with a replacement
//! template. A subject subtree that structurally matches any pattern is
//! substituted by a copy of the template, with template properties able to
//! inherit values from the subject through mapped-property expressions
//! (`${./path}`, `!${./flag}`, `${./path:default}`), children remapping,
//! common-attribute mapping, render-condition carry-over, finalization
//! marking, and regex-based string rewrites.
//!
//! The engine performs a single match/apply step; walking a document tree
//! and iterating rules to a fixed point is the host's job, as is the
//! backing store (any [`regraft_core::TreeStore`]).

pub mod def;
pub mod expr;
pub mod loader;
pub mod markers;
pub mod rewrite;
pub mod rule;

mod attrs;
mod matcher;

pub use def::DefNode;
pub use expr::{map_property, parse_reference, Reference};
pub use loader::{
    load_rules_from_dir, load_rules_from_file, load_rules_from_string, node_from_yaml, LoadError,
    NodeSpec, PropertySpec, ReplacementSpec, RuleSpec,
};
pub use rewrite::rewrite_property;
pub use rule::{RewriteError, RewriteOutcome, RewriteRule};
