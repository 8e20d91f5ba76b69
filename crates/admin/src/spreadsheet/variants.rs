//! The `variants` upload column.
//!
//! Format: groups separated by `|`, each group `label::price::stock`.
//! Whitespace around a group is ignored. Segments that are missing or do
//! not coerce to a number count as zero.

use serde::Serialize;

use crate::coerce::number_from_str;

const GROUP_SEPARATOR: char = '|';
const FIELD_SEPARATOR: &str = "::";

/// One parsed variant group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantGroup {
    pub label: String,
    pub price: Option<f64>,
    pub stock: Option<f64>,
}

/// Parse every group of a `variants` cell. Blank input yields no groups.
#[must_use]
pub fn parse_variants(raw: &str) -> Vec<VariantGroup> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(GROUP_SEPARATOR)
        .map(|group| {
            let mut parts = group.trim().split(FIELD_SEPARATOR);
            let label = parts.next().unwrap_or_default().to_string();
            let price = parts.next().and_then(number_from_str);
            let stock = parts.next().and_then(number_from_str);
            VariantGroup {
                label,
                price,
                stock,
            }
        })
        .collect()
}

/// Sum of the stock segment of every group.
#[must_use]
pub fn total_variant_stock(raw: &str) -> f64 {
    parse_variants(raw)
        .iter()
        .filter_map(|group| group.stock)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_variant_stock() {
        assert!((total_variant_stock("A::100::3|B::200::2") - 5.0).abs() < f64::EPSILON);
        assert!(total_variant_stock("A::100::x").abs() < f64::EPSILON);
    }

    #[test]
    fn test_groups_are_trimmed() {
        let total = total_variant_stock("Variant A::10000::3| Variant B::12000::2 ");
        assert!((total - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_segments_count_as_zero() {
        assert!(total_variant_stock("A::100|B").abs() < f64::EPSILON);
        assert!(total_variant_stock("").abs() < f64::EPSILON);
        assert!(total_variant_stock("   ").abs() < f64::EPSILON);
    }

    #[test]
    fn test_stock_segment_is_lenient() {
        // Empty segment is zero, surrounding space is ignored, inf is rejected
        assert!((total_variant_stock("A::1:: 4 |B::2::|C::3::inf") - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_variants_fields() {
        let groups = parse_variants("Red::199.5::7|Blue");
        assert_eq!(
            groups,
            vec![
                VariantGroup {
                    label: "Red".to_string(),
                    price: Some(199.5),
                    stock: Some(7.0),
                },
                VariantGroup {
                    label: "Blue".to_string(),
                    price: None,
                    stock: None,
                },
            ]
        );
    }
}
