//! Filter values
//!
//! Values serialize as plain JSON scalars or arrays so encoded filters stay
//! readable once decoded.

use serde::{Deserialize, Serialize};
use tabula_core::{PrimitiveType, Value};

/// A single comparison operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Whether the operand can be compared against a column of this type
    pub fn fits(&self, primitive: &PrimitiveType) -> bool {
        match primitive {
            PrimitiveType::Integer => match self {
                Self::Int(_) => true,
                Self::Text(raw) => raw.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            PrimitiveType::Float | PrimitiveType::Decimal => match self {
                Self::Int(_) | Self::Float(_) => true,
                Self::Text(raw) => raw.trim().parse::<f64>().is_ok(),
                Self::Bool(_) => false,
            },
            PrimitiveType::Boolean => match self {
                Self::Bool(_) => true,
                Self::Int(v) => *v == 0 || *v == 1,
                Self::Text(raw) => matches!(raw.as_str(), "true" | "false"),
                Self::Float(_) => false,
            },
            _ => true,
        }
    }

    /// Float operands must be finite to survive JSON encoding
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(v) => v.is_finite(),
            _ => true,
        }
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(v) => Value::Bool(v),
            Scalar::Int(v) => Value::Int(v),
            Scalar::Float(v) => Value::Float(v),
            Scalar::Text(v) => Value::String(v),
        }
    }
}

/// Operand of a leaf filter: one scalar or a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    List(Vec<Scalar>),
    Scalar(Scalar),
}

impl FilterValue {
    pub fn list(items: impl IntoIterator<Item = impl Into<Scalar>>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn scalars(&self) -> Vec<&Scalar> {
        match self {
            Self::List(items) => items.iter().collect(),
            Self::Scalar(scalar) => vec![scalar],
        }
    }
}

macro_rules! scalar_filter_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(v: $ty) -> Self {
                    Self::Scalar(v.into())
                }
            }
        )*
    };
}

scalar_filter_value!(&str, String, i32, i64, f64, bool);

impl From<Scalar> for FilterValue {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json_shape() {
        assert_eq!(serde_json::to_value(FilterValue::from(18)).unwrap(), json!(18));
        assert_eq!(
            serde_json::to_value(FilterValue::list(["a", "b"])).unwrap(),
            json!(["a", "b"])
        );
        let parsed: FilterValue = serde_json::from_value(json!("active")).unwrap();
        assert_eq!(parsed, FilterValue::from("active"));
        let parsed: FilterValue = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(parsed, FilterValue::from(1.5));
    }

    #[test]
    fn test_fits_primitive() {
        assert!(Scalar::from("42").fits(&PrimitiveType::Integer));
        assert!(!Scalar::from("forty").fits(&PrimitiveType::Integer));
        assert!(Scalar::from(true).fits(&PrimitiveType::Boolean));
        assert!(Scalar::from(3).fits(&PrimitiveType::String));
    }
}
