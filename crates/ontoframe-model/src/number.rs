//! Typed numeric values and ranges.
//!
//! A numeric feature carries either a definite value or an indefinite range;
//! both remember their frame-model numeric kind so the renderer can pick the
//! matching XSD datatype and the extraction side can reproduce the value
//! exactly.

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    Integer,
    Long,
    Float,
    Double,
}

/// A definite numeric value tagged with its frame-model kind.
///
/// Values of different kinds never compare equal; ordering is only defined
/// within one kind (cross-kind comparison answers `None`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TypedNumber {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl TypedNumber {
    pub fn kind(&self) -> NumericKind {
        match self {
            TypedNumber::Integer(_) => NumericKind::Integer,
            TypedNumber::Long(_) => NumericKind::Long,
            TypedNumber::Float(_) => NumericKind::Float,
            TypedNumber::Double(_) => NumericKind::Double,
        }
    }

    /// Canonical lexical form, round-trippable through [`TypedNumber::parse`].
    pub fn lexical(&self) -> String {
        match self {
            TypedNumber::Integer(v) => v.to_string(),
            TypedNumber::Long(v) => v.to_string(),
            TypedNumber::Float(v) => v.to_string(),
            TypedNumber::Double(v) => v.to_string(),
        }
    }

    pub fn parse(kind: NumericKind, lexical: &str) -> Result<Self, ModelError> {
        let err = || ModelError::NumberParse {
            lexical: lexical.to_string(),
            kind,
        };
        Ok(match kind {
            NumericKind::Integer => TypedNumber::Integer(lexical.parse().map_err(|_| err())?),
            NumericKind::Long => TypedNumber::Long(lexical.parse().map_err(|_| err())?),
            NumericKind::Float => TypedNumber::Float(lexical.parse().map_err(|_| err())?),
            NumericKind::Double => TypedNumber::Double(lexical.parse().map_err(|_| err())?),
        })
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            TypedNumber::Integer(v) => f64::from(*v),
            TypedNumber::Long(v) => *v as f64,
            TypedNumber::Float(v) => f64::from(*v),
            TypedNumber::Double(v) => *v,
        }
    }
}

impl PartialOrd for TypedNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.kind() != other.kind() {
            return None;
        }
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

/// A possibly-unbounded inclusive range over one numeric kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberRange {
    kind: NumericKind,
    min: Option<TypedNumber>,
    max: Option<TypedNumber>,
}

impl NumberRange {
    pub fn new(
        kind: NumericKind,
        min: Option<TypedNumber>,
        max: Option<TypedNumber>,
    ) -> Result<Self, ModelError> {
        for bound in [&min, &max].into_iter().flatten() {
            if bound.kind() != kind {
                return Err(ModelError::RangeKindMismatch);
            }
        }
        if let (Some(lo), Some(hi)) = (&min, &max) {
            if lo.as_f64() > hi.as_f64() {
                return Err(ModelError::InvalidRange);
            }
        }
        Ok(Self { kind, min, max })
    }

    pub fn unbounded(kind: NumericKind) -> Self {
        Self {
            kind,
            min: None,
            max: None,
        }
    }

    /// Degenerate range containing exactly one value.
    pub fn exactly(value: TypedNumber) -> Self {
        Self {
            kind: value.kind(),
            min: Some(value),
            max: Some(value),
        }
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    pub fn min(&self) -> Option<&TypedNumber> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&TypedNumber> {
        self.max.as_ref()
    }

    pub fn contains(&self, value: &TypedNumber) -> bool {
        if value.kind() != self.kind {
            return false;
        }
        let v = value.as_f64();
        self.min.map_or(true, |lo| lo.as_f64() <= v)
            && self.max.map_or(true, |hi| v <= hi.as_f64())
    }
}

/// The value slot of a numeric feature: definite, or an indefinite range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumberValue {
    Exact(TypedNumber),
    Range(NumberRange),
}

impl NumberValue {
    pub fn kind(&self) -> NumericKind {
        match self {
            NumberValue::Exact(v) => v.kind(),
            NumberValue::Range(r) => r.kind(),
        }
    }

    /// The covering range: exact values widen to their degenerate range.
    pub fn as_range(&self) -> NumberRange {
        match self {
            NumberValue::Exact(v) => NumberRange::exactly(*v),
            NumberValue::Range(r) => *r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_round_trips_every_kind() {
        let values = [
            TypedNumber::Integer(-3),
            TypedNumber::Long(1_000_000_000_000),
            TypedNumber::Float(2.5),
            TypedNumber::Double(0.125),
        ];
        for value in values {
            let parsed = TypedNumber::parse(value.kind(), &value.lexical()).unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn cross_kind_values_never_compare() {
        let int = TypedNumber::Integer(1);
        let long = TypedNumber::Long(1);
        assert_ne!(int, long);
        assert!(int.partial_cmp(&long).is_none());
    }

    #[test]
    fn range_construction_rejects_mixed_kinds_and_inverted_bounds() {
        assert!(matches!(
            NumberRange::new(
                NumericKind::Integer,
                Some(TypedNumber::Long(1)),
                None
            ),
            Err(ModelError::RangeKindMismatch)
        ));
        assert!(matches!(
            NumberRange::new(
                NumericKind::Integer,
                Some(TypedNumber::Integer(10)),
                Some(TypedNumber::Integer(1))
            ),
            Err(ModelError::InvalidRange)
        ));
    }

    #[test]
    fn containment_respects_open_bounds() {
        let at_least_two = NumberRange::new(
            NumericKind::Integer,
            Some(TypedNumber::Integer(2)),
            None,
        )
        .unwrap();
        assert!(at_least_two.contains(&TypedNumber::Integer(2)));
        assert!(at_least_two.contains(&TypedNumber::Integer(100)));
        assert!(!at_least_two.contains(&TypedNumber::Integer(1)));
        assert!(!at_least_two.contains(&TypedNumber::Long(5)));
    }
}
