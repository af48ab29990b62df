//! Reserved property and node names recognized by the rewrite engine
//!
//! Marker properties are out-of-band control signals mixed into ordinary
//! tree data. The engine recognizes exactly this closed set, consumes the
//! markers during substitution, and never lets them survive into results.

/// Rule ordering rank, on the rule root.
pub const PROP_RANKING: &str = "cq:rewriteRanking";

/// Marks a pattern node as optional for matching.
pub const PROP_OPTIONAL: &str = "cq:rewriteOptional";

/// Copies the children of the referenced subject node onto the node
/// carrying this property.
pub const PROP_MAP_CHILDREN: &str = "cq:rewriteMapChildren";

/// Excludes a node (or, on the replacement container, the whole produced
/// tree) from further rule processing.
pub const PROP_FINAL: &str = "cq:rewriteFinal";

/// On the replacement container: map common UI attributes of the subject
/// root onto the copy root.
pub const PROP_COMMON_ATTRS: &str = "cq:rewriteCommonAttrs";

/// On the replacement container: carry over a render-condition child of
/// the subject root.
pub const PROP_RENDER_CONDITION: &str = "cq:rewriteRenderCondition";

/// Child node holding `[pattern, replacement]` string-rewrite directives,
/// one property per rewritten property name.
pub const NN_REWRITE_PROPERTIES: &str = "cq:rewriteProperties";

/// Pattern-alternatives container on a rule root.
pub const NN_PATTERNS: &str = "patterns";

/// Replacement container on a rule root.
pub const NN_REPLACEMENT: &str = "replacement";

/// Legacy render-condition child name on subjects.
pub const NN_RENDER_CONDITION: &str = "rendercondition";

/// Canonical render-condition child name.
pub const NN_GRANITE_RENDER_CONDITION: &str = "granite:rendercondition";

/// Data-holder child carrying `data-*` attribute values.
pub const NN_GRANITE_DATA: &str = "granite:data";

/// Resource-type-identifying property rewritten inside copied
/// render-condition subtrees.
pub const PROP_RESOURCE_TYPE: &str = "sling:resourceType";

pub const RENDER_CONDITION_CORAL2_PREFIX: &str =
    "granite/ui/components/foundation/renderconditions";
pub const RENDER_CONDITION_CORAL3_PREFIX: &str =
    "granite/ui/components/coral/foundation/renderconditions";

/// Common UI attributes mapped by [`PROP_COMMON_ATTRS`].
pub const COMMON_ATTRIBUTES: [&str; 8] = [
    "id",
    "rel",
    "class",
    "title",
    "hidden",
    "itemscope",
    "itemtype",
    "itemprop",
];

/// Subject properties with this prefix land on the data-holder child,
/// prefix stripped.
pub const DATA_PREFIX: &str = "data-";
