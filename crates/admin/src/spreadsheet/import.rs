//! Reading the product upload workbook.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, instrument};

use super::SpreadsheetError;
use super::variants::total_variant_stock;
use crate::coerce::number_from_value;

/// Columns the upload endpoint understands, in template order.
pub const UPLOAD_COLUMNS: [&str; 14] = [
    "name",
    "brand_code",
    "category",
    "price",
    "cuttedPrice",
    "stock",
    "warranty",
    "description",
    "images",
    "tags",
    "youtube",
    "morelink",
    "specifications",
    "variants",
];

const TOTAL_VARIANT_STOCK: &str = "totalVariantStock";

/// One spreadsheet row as sent to the upload endpoint.
///
/// Serializes as the row's own fields plus `totalVariantStock`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductUploadRow {
    #[serde(flatten)]
    fields: Map<String, Value>,
    #[serde(rename = "totalVariantStock")]
    total_variant_stock: f64,
}

impl ProductUploadRow {
    /// Wrap raw row fields, deriving the variant stock total.
    ///
    /// Only a text `variants` cell is parsed; anything else contributes zero.
    #[must_use]
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove(TOTAL_VARIANT_STOCK);
        let total_variant_stock = match fields.get("variants") {
            Some(Value::String(raw)) => total_variant_stock(raw),
            _ => 0.0,
        };
        Self {
            fields,
            total_variant_stock,
        }
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `name` cell, when it is text.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub const fn total_variant_stock(&self) -> f64 {
        self.total_variant_stock
    }

    /// The `stock` cell coerced to a number; `None` when absent or not numeric.
    #[must_use]
    pub fn declared_stock(&self) -> Option<f64> {
        self.fields.get("stock").and_then(number_from_value)
    }

    /// Variants declare more units than the base stock.
    #[must_use]
    pub fn is_anomalous(&self) -> bool {
        self.declared_stock()
            .is_some_and(|stock| self.total_variant_stock > stock)
    }
}

/// Header row compared against [`UPLOAD_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderReport {
    /// Documented columns absent from the sheet.
    pub missing: Vec<&'static str>,
    /// Sheet columns the endpoint does not document.
    pub unknown: Vec<String>,
}

impl HeaderReport {
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty()
    }
}

/// Parsed contents of an upload workbook.
#[derive(Debug, Clone, Default)]
pub struct ProductSheet {
    pub headers: Vec<String>,
    pub rows: Vec<ProductUploadRow>,
}

impl ProductSheet {
    #[must_use]
    pub fn header_report(&self) -> HeaderReport {
        let missing = UPLOAD_COLUMNS
            .iter()
            .copied()
            .filter(|column| !self.headers.iter().any(|h| h == column))
            .collect();
        let unknown = self
            .headers
            .iter()
            .filter(|h| !UPLOAD_COLUMNS.contains(&h.as_str()))
            .cloned()
            .collect();
        HeaderReport { missing, unknown }
    }

    /// Rows whose variants declare more stock than the row itself.
    pub fn anomalies(&self) -> impl Iterator<Item = (usize, &ProductUploadRow)> {
        self.rows.iter().enumerate().filter(|(_, row)| row.is_anomalous())
    }
}

/// Read the first worksheet of an `.xlsx`/`.xls` workbook.
///
/// The first row is the header. Every following row with at least one
/// non-empty cell becomes a [`ProductUploadRow`]; empty cells and cells
/// under a blank header are left out.
///
/// # Errors
///
/// Returns `SpreadsheetError::Read` if the bytes are not a readable workbook
/// and `SpreadsheetError::NoWorksheet` if it has no sheets.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn read_product_sheet(bytes: &[u8]) -> Result<ProductSheet, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(ProductSheet::default());
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let rows: Vec<ProductUploadRow> = rows
        .filter_map(|cells| {
            let fields: Map<String, Value> = headers
                .iter()
                .zip(cells)
                .filter(|(header, _)| !header.is_empty())
                .filter_map(|(header, cell)| cell_value(cell).map(|v| (header.clone(), v)))
                .collect();
            (!fields.is_empty()).then(|| ProductUploadRow::new(fields))
        })
        .collect();

    debug!(rows = rows.len(), columns = headers.len(), "Parsed product sheet");

    Ok(ProductSheet {
        headers: headers.into_iter().filter(|h| !h.is_empty()).collect(),
        rows,
    })
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Int(n) => Some(Value::from(*n)),
        Data::Float(n) => float_value(*n),
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => float_value(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
        Data::Error(_) | Data::Empty => None,
    }
}

/// Whole floats become integers so `20000` is not sent as `20000.0`.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)] // guarded by the range check
fn float_value(n: f64) -> Option<Value> {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    if n.fract() == 0.0 && n.abs() < LIMIT {
        return Some(Value::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> ProductUploadRow {
        let Value::Object(fields) = value else {
            panic!("expected object");
        };
        ProductUploadRow::new(fields)
    }

    #[test]
    fn test_row_serializes_with_total() {
        let r = row(json!({"name": "Phone", "stock": 5, "variants": "A::1::3|B::1::1"}));
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["name"], "Phone");
        assert_eq!(value["totalVariantStock"], json!(4.0));
    }

    #[test]
    fn test_non_text_variants_count_as_zero() {
        let r = row(json!({"variants": 12}));
        assert!(r.total_variant_stock().abs() < f64::EPSILON);
    }

    #[test]
    fn test_anomaly_flag() {
        assert!(row(json!({"stock": 4, "variants": "A::1::3|B::1::2"})).is_anomalous());
        assert!(!row(json!({"stock": "5", "variants": "A::1::3|B::1::2"})).is_anomalous());
        assert!(!row(json!({"stock": "many", "variants": "A::1::30"})).is_anomalous());
        assert!(!row(json!({"variants": "A::1::30"})).is_anomalous());
    }

    #[test]
    fn test_header_report() {
        let sheet = ProductSheet {
            headers: vec!["name".to_string(), "price".to_string(), "colour".to_string()],
            rows: Vec::new(),
        };
        let report = sheet.header_report();
        assert_eq!(report.unknown, vec!["colour".to_string()]);
        assert!(report.missing.contains(&"variants"));
        assert!(!report.missing.contains(&"name"));
        assert_eq!(report.missing.len(), UPLOAD_COLUMNS.len() - 2);
        assert!(!report.is_exact());
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Float(20000.0)), Some(json!(20000)));
        assert_eq!(cell_value(&Data::Float(1.5)), Some(json!(1.5)));
        assert_eq!(cell_value(&Data::Empty), None);
        assert_eq!(cell_value(&Data::Bool(true)), Some(json!(true)));
    }

    #[test]
    fn test_rejects_non_workbook_bytes() {
        let err = read_product_sheet(b"not a workbook").unwrap_err();
        assert!(matches!(err, SpreadsheetError::Read(_)));
    }
}
