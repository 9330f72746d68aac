//! Filter operators and conjunctions

use serde::{Deserialize, Serialize};
use tabula_core::PrimitiveType;

/// Comparison applied by a leaf filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    // Equality
    #[default]
    Eq,
    Neq,

    // String
    Contains,
    NotContains,
    StartsWith,
    EndsWith,

    // Comparison
    Gt,
    Gte,
    Lt,
    Lte,

    // NULL
    IsNull,
    IsNotNull,

    // List and range
    In,
    NotIn,
    Between,
}

impl FilterOperator {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Between => "between",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Eq => "is",
            Self::Neq => "is not",
            Self::Contains => "contains",
            Self::NotContains => "does not contain",
            Self::StartsWith => "starts with",
            Self::EndsWith => "ends with",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::IsNull => "is empty",
            Self::IsNotNull => "is not empty",
            Self::In => "is one of",
            Self::NotIn => "is not one of",
            Self::Between => "is between",
        }
    }

    /// Parse a wire name
    pub fn parse(raw: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.as_str() == raw)
    }

    /// Returns true if this operator requires a value
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Returns true if the value is a list (`in`, `not_in`, `between`)
    pub fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::Between)
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::Contains | Self::NotContains | Self::StartsWith | Self::EndsWith
        )
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Self::Gt | Self::Gte | Self::Lt | Self::Lte | Self::Between
        )
    }

    /// Whether the operator is meaningful on a column of this primitive type
    ///
    /// Types we don't model accept every operator; the collaborator has the
    /// final word.
    pub fn applicable_to(&self, primitive: &PrimitiveType) -> bool {
        if matches!(primitive, PrimitiveType::Other(_)) || !self.requires_value() {
            return true;
        }
        if matches!(primitive, PrimitiveType::Binary) {
            return false;
        }
        if self.is_textual() {
            return primitive.is_textual() || matches!(primitive, PrimitiveType::Json);
        }
        if self.is_ordering() {
            return primitive.is_numeric() || primitive.is_temporal() || primitive.is_textual();
        }
        match self {
            Self::In | Self::NotIn => !matches!(primitive, PrimitiveType::Json),
            _ => true,
        }
    }

    /// Get all operators in display order
    pub fn all() -> &'static [FilterOperator] {
        &[
            Self::Eq,
            Self::Neq,
            Self::Contains,
            Self::NotContains,
            Self::StartsWith,
            Self::EndsWith,
            Self::Gt,
            Self::Gte,
            Self::Lt,
            Self::Lte,
            Self::IsNull,
            Self::IsNotNull,
            Self::In,
            Self::NotIn,
            Self::Between,
        ]
    }

    /// Operators offered for a column type
    pub fn for_primitive(primitive: &PrimitiveType) -> Vec<FilterOperator> {
        Self::all()
            .iter()
            .copied()
            .filter(|op| op.applicable_to(primitive))
            .collect()
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a group joins its items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl std::fmt::Display for Conjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
