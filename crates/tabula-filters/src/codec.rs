//! URL-safe filter encoding
//!
//! Revision 2 (current): `f2.` followed by unpadded base64url of the
//! normalized tree's JSON. The empty tree encodes to the empty string.
//!
//! Revision 1 (decode only): unprefixed base64 of a JSON array of items,
//! either `{column, condition, value, verb}` or
//! `{isGroup: true, verb, filters: [...]}`. A list is joined by the `verb`
//! of its second item.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;

use crate::{
    Conjunction, Filter, FilterError, FilterGroup, FilterNode, FilterOperator, FilterValue, Result,
    normalize,
};

/// Prefix of revision-2 encodings
pub const ENCODING_PREFIX: &str = "f2.";

/// Longest encoded string produced by [`encode`] and accepted by [`decode`]
pub const DEFAULT_MAX_ENCODED_LEN: usize = 8192;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Encode a tree for a URL query parameter
///
/// The tree is normalized first, so equivalent trees encode identically.
pub fn encode(tree: &FilterGroup) -> Result<String> {
    encode_with_limit(tree, DEFAULT_MAX_ENCODED_LEN)
}

/// Encode with an explicit length limit
///
/// Anything this returns is accepted by [`decode_with_limit`] with the same
/// limit.
pub fn encode_with_limit(tree: &FilterGroup, max_len: usize) -> Result<String> {
    let canonical = normalize(tree);
    if canonical.is_empty() {
        return Ok(String::new());
    }
    let json = serde_json::to_vec(&canonical).map_err(|e| FilterError::Encode(e.to_string()))?;
    let encoded = format!("{ENCODING_PREFIX}{}", URL_SAFE_NO_PAD.encode(json));
    if encoded.len() > max_len {
        return Err(FilterError::Encode(format!(
            "encoded filter is {} bytes, limit is {max_len}",
            encoded.len()
        )));
    }
    Ok(encoded)
}

/// Decode an encoded filter, accepting the current and the previous revision
pub fn decode(encoded: &str) -> Result<FilterGroup> {
    decode_with_limit(encoded, DEFAULT_MAX_ENCODED_LEN)
}

/// Decode with an explicit length limit
pub fn decode_with_limit(encoded: &str, max_len: usize) -> Result<FilterGroup> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Ok(FilterGroup::empty());
    }
    if encoded.len() > max_len {
        return Err(FilterError::Malformed(format!(
            "encoded filter is {} bytes, limit is {max_len}",
            encoded.len()
        )));
    }

    let tree = match encoded.strip_prefix(ENCODING_PREFIX) {
        Some(body) => decode_current(body)?,
        None => decode_legacy(encoded)?,
    };
    Ok(normalize(&tree))
}

/// Decode, logging and discarding malformed input
///
/// Filters usually arrive from shareable links, so bad input means "no
/// filters" rather than an error.
pub fn decode_or_empty(encoded: &str) -> FilterGroup {
    match decode(encoded) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::warn!(error = %err, "discarding malformed filter");
            FilterGroup::empty()
        }
    }
}

fn decode_current(body: &str) -> Result<FilterGroup> {
    let bytes = URL_SAFE_LENIENT
        .decode(body)
        .map_err(|e| FilterError::Malformed(format!("invalid base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| FilterError::Malformed(format!("invalid filter structure: {e}")))
}

fn decode_legacy(encoded: &str) -> Result<FilterGroup> {
    let bytes = URL_SAFE_LENIENT
        .decode(encoded)
        .or_else(|_| STANDARD_LENIENT.decode(encoded))
        .map_err(|e| FilterError::Malformed(format!("invalid base64: {e}")))?;
    let items: Vec<LegacyItem> = serde_json::from_slice(&bytes)
        .map_err(|e| FilterError::Malformed(format!("invalid filter structure: {e}")))?;
    tracing::debug!(items = items.len(), "decoding revision 1 filter");
    legacy_group(items)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyItem {
    Group {
        #[serde(rename = "isGroup")]
        is_group: bool,
        #[serde(default)]
        verb: Option<String>,
        #[serde(default)]
        filters: Vec<LegacyItem>,
    },
    Leaf {
        column: String,
        condition: String,
        #[serde(default)]
        value: serde_json::Value,
        #[serde(default)]
        verb: Option<String>,
    },
}

impl LegacyItem {
    fn verb(&self) -> Option<&str> {
        match self {
            Self::Group { verb, .. } | Self::Leaf { verb, .. } => verb.as_deref(),
        }
    }
}

fn legacy_conjunction(items: &[LegacyItem]) -> Result<Conjunction> {
    match items.get(1).and_then(LegacyItem::verb) {
        None | Some("and") => Ok(Conjunction::And),
        Some("or") => Ok(Conjunction::Or),
        Some(other) => Err(FilterError::Malformed(format!("unknown verb '{other}'"))),
    }
}

fn legacy_group(items: Vec<LegacyItem>) -> Result<FilterGroup> {
    let conjunction = legacy_conjunction(&items)?;
    let nodes = items
        .into_iter()
        .map(legacy_node)
        .collect::<Result<Vec<_>>>()?;
    Ok(FilterGroup::new(conjunction, nodes))
}

fn legacy_node(item: LegacyItem) -> Result<FilterNode> {
    match item {
        LegacyItem::Group {
            is_group: true,
            filters,
            ..
        } => Ok(FilterNode::Group(legacy_group(filters)?)),
        LegacyItem::Group { .. } => Err(FilterError::Malformed(
            "item is neither a filter nor a group".to_string(),
        )),
        LegacyItem::Leaf {
            column,
            condition,
            value,
            ..
        } => {
            let operator = legacy_operator(&condition)?;
            let value = if operator.requires_value() && !value.is_null() {
                Some(
                    serde_json::from_value::<FilterValue>(value)
                        .map_err(|e| FilterError::Malformed(format!("invalid value: {e}")))?,
                )
            } else {
                None
            };
            Ok(FilterNode::Leaf(Filter {
                column,
                operator,
                value,
            }))
        }
    }
}

fn legacy_operator(condition: &str) -> Result<FilterOperator> {
    let operator = match condition {
        "is" | "=" => FilterOperator::Eq,
        "is_not" | "!=" => FilterOperator::Neq,
        ">" => FilterOperator::Gt,
        ">=" => FilterOperator::Gte,
        "<" => FilterOperator::Lt,
        "<=" => FilterOperator::Lte,
        "is_empty" => FilterOperator::IsNull,
        "is_not_empty" => FilterOperator::IsNotNull,
        other => FilterOperator::parse(other)
            .ok_or_else(|| FilterError::Malformed(format!("unknown condition '{other}'")))?,
    };
    Ok(operator)
}
