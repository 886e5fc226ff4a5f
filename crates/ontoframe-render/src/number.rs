//! Numeric rendering: frame-model numbers ↔ OWL data constructs.
//!
//! A definite value renders as a has-value construct (expression context) or
//! a direct literal (assertion context); an indefinite range renders as an
//! existential or universal restriction over a facet-restricted data range,
//! omitting a facet when that bound is absent. Each frame-model numeric kind
//! maps to its *own* XSD datatype, and extraction inverts rendering exactly:
//! the datatype recovers the kind, the facets recover the bounds.

use crate::RenderError;
use ontoframe_model::{NumberRange, NumberValue, NumericKind, TypedNumber};
use ontoframe_owl::iri::vocab::xsd;
use ontoframe_owl::{ClassExpression, DataRange, Facet, FacetRestriction, Iri, Literal};

/// The XSD datatype for one numeric kind.
pub fn xsd_datatype(kind: NumericKind) -> Iri {
    Iri::new(match kind {
        NumericKind::Integer => xsd::INTEGER,
        NumericKind::Long => xsd::LONG,
        NumericKind::Float => xsd::FLOAT,
        NumericKind::Double => xsd::DOUBLE,
    })
}

pub fn kind_for_datatype(datatype: &Iri) -> Option<NumericKind> {
    match datatype.as_str() {
        xsd::INTEGER => Some(NumericKind::Integer),
        xsd::LONG => Some(NumericKind::Long),
        xsd::FLOAT => Some(NumericKind::Float),
        xsd::DOUBLE => Some(NumericKind::Double),
        _ => None,
    }
}

pub fn literal(value: &TypedNumber) -> Literal {
    Literal::typed(value.lexical(), xsd_datatype(value.kind()))
}

pub fn parse_literal(literal: &Literal) -> Result<TypedNumber, RenderError> {
    let kind = kind_for_datatype(&literal.datatype)
        .ok_or_else(|| RenderError::UnknownDatatype(literal.datatype.clone()))?;
    Ok(TypedNumber::parse(kind, &literal.lexical)?)
}

/// Render a range as a data range, dropping absent bounds.
///
/// A fully unbounded range is the bare datatype — no restriction wrapper.
pub fn data_range(range: &NumberRange) -> DataRange {
    let datatype = xsd_datatype(range.kind());
    let mut facets = Vec::new();
    if let Some(min) = range.min() {
        facets.push(FacetRestriction {
            facet: Facet::MinInclusive,
            value: literal(min),
        });
    }
    if let Some(max) = range.max() {
        facets.push(FacetRestriction {
            facet: Facet::MaxInclusive,
            value: literal(max),
        });
    }
    if facets.is_empty() {
        DataRange::Datatype(datatype)
    } else {
        DataRange::Restriction { datatype, facets }
    }
}

/// Recover the range a [`data_range`] rendering encoded.
pub fn extract_range(range: &DataRange) -> Result<NumberRange, RenderError> {
    let kind = kind_for_datatype(range.datatype())
        .ok_or_else(|| RenderError::UnknownDatatype(range.datatype().clone()))?;
    let min = range
        .facet(Facet::MinInclusive)
        .map(|lit| TypedNumber::parse(kind, &lit.lexical))
        .transpose()?;
    let max = range
        .facet(Facet::MaxInclusive)
        .map(|lit| TypedNumber::parse(kind, &lit.lexical))
        .transpose()?;
    Ok(NumberRange::new(kind, min, max)?)
}

/// Existential rendering of a feature value: definite values become
/// has-value constructs, indefinite ones an existential range restriction.
pub fn render_some(property: &Iri, value: &NumberValue) -> ClassExpression {
    match value {
        NumberValue::Exact(v) => ClassExpression::DataHasValue {
            property: property.clone(),
            literal: literal(v),
        },
        NumberValue::Range(r) => ClassExpression::DataSomeValuesFrom {
            property: property.clone(),
            range: data_range(r),
        },
    }
}

/// Universal rendering for closed-world features: the covering range
/// (degenerate for definite values) under an all-values restriction.
pub fn render_all(property: &Iri, value: &NumberValue) -> ClassExpression {
    ClassExpression::DataAllValuesFrom {
        property: property.clone(),
        range: data_range(&value.as_range()),
    }
}

/// Recover the feature value a [`render_some`]/[`render_all`] rendering
/// encoded.
pub fn extract_value(expression: &ClassExpression) -> Result<NumberValue, RenderError> {
    match expression {
        ClassExpression::DataHasValue { literal, .. } => {
            Ok(NumberValue::Exact(parse_literal(literal)?))
        }
        ClassExpression::DataSomeValuesFrom { range, .. }
        | ClassExpression::DataAllValuesFrom { range, .. } => {
            Ok(NumberValue::Range(extract_range(range)?))
        }
        _ => Err(RenderError::NotNumeric),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each numeric kind keeps its own datatype; none collapse to integer.
    #[test]
    fn datatype_mapping_is_one_to_one() {
        let kinds = [
            NumericKind::Integer,
            NumericKind::Long,
            NumericKind::Float,
            NumericKind::Double,
        ];
        for kind in kinds {
            assert_eq!(kind_for_datatype(&xsd_datatype(kind)), Some(kind));
        }
        assert_eq!(xsd_datatype(NumericKind::Long).as_str(), xsd::LONG);
        assert_eq!(xsd_datatype(NumericKind::Float).as_str(), xsd::FLOAT);
        assert_eq!(xsd_datatype(NumericKind::Double).as_str(), xsd::DOUBLE);
    }

    #[test]
    fn bounded_range_round_trips() {
        let range = NumberRange::new(
            NumericKind::Integer,
            Some(TypedNumber::Integer(1)),
            Some(TypedNumber::Integer(10)),
        )
        .unwrap();
        let rendered = data_range(&range);
        assert_eq!(extract_range(&rendered).unwrap(), range);
    }

    #[test]
    fn half_open_ranges_omit_the_absent_facet() {
        let lower_only = NumberRange::new(
            NumericKind::Long,
            Some(TypedNumber::Long(5)),
            None,
        )
        .unwrap();
        let rendered = data_range(&lower_only);
        assert!(rendered.facet(Facet::MinInclusive).is_some());
        assert!(rendered.facet(Facet::MaxInclusive).is_none());
        assert_eq!(extract_range(&rendered).unwrap(), lower_only);
    }

    #[test]
    fn unbounded_range_is_the_bare_datatype() {
        let unbounded = NumberRange::unbounded(NumericKind::Double);
        let rendered = data_range(&unbounded);
        assert_eq!(rendered, DataRange::Datatype(Iri::new(xsd::DOUBLE)));
        assert_eq!(extract_range(&rendered).unwrap(), unbounded);
    }

    #[test]
    fn exact_value_round_trips_through_has_value() {
        let property = Iri::new("http://ex.org#age");
        let value = NumberValue::Exact(TypedNumber::Float(2.5));
        let rendered = render_some(&property, &value);
        assert_eq!(extract_value(&rendered).unwrap(), value);
    }

    #[test]
    fn universal_rendering_covers_exact_values_as_degenerate_ranges() {
        let property = Iri::new("http://ex.org#age");
        let rendered = render_all(&property, &NumberValue::Exact(TypedNumber::Integer(5)));
        let NumberValue::Range(range) = extract_value(&rendered).unwrap() else {
            panic!("universal rendering must extract as a range");
        };
        assert_eq!(range.min(), Some(&TypedNumber::Integer(5)));
        assert_eq!(range.max(), Some(&TypedNumber::Integer(5)));
    }
}
