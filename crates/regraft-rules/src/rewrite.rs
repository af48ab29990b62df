//! Post-substitution string rewriting
//!
//! A rewrite directive is a two-element string pair `[pattern, replacement]`
//! applied to a resolved property value. The pattern is a regular
//! expression; all matches are replaced, and the replacement may reference
//! capture groups with the regex crate's `$1` / `${1}` syntax.

use regex::Regex;
use regraft_core::{NodeId, Property, TreeStore, Value};
use tracing::debug;

/// Apply `directive` to the string property `name` on `node`. No-op when
/// the property is not a single string, or the directive is malformed.
pub fn rewrite_property<S: TreeStore>(
    store: &mut S,
    node: NodeId,
    name: &str,
    directive: &Property,
) {
    let Some(current) = store.property(node, name).and_then(|p| p.as_str()) else {
        return;
    };
    let current = current.to_string();
    let Some((pattern, replacement)) = directive_pair(directive) else {
        return;
    };
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => {
            debug!(%err, pattern, "skipping rewrite directive with invalid pattern");
            return;
        }
    };
    let rewritten = regex.replace_all(&current, replacement).into_owned();
    store.set_property(node, name, Property::string(rewritten));
}

/// Exactly two string elements of a multi-valued directive property.
fn directive_pair(directive: &Property) -> Option<(&str, &str)> {
    if !directive.is_multiple() {
        return None;
    }
    match directive.values() {
        [Value::String(pattern), Value::String(replacement)] => {
            Some((pattern.as_str(), replacement.as_str()))
        }
        _ => None,
    }
}
