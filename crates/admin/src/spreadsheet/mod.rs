//! Excel import and export.
//!
//! - Import reads the first worksheet of a workbook into JSON rows keyed by
//!   the header row, enriched with the total stock declared by variants
//! - Export writes report rows one worksheet per report, header row first
//! - The sample template documents the upload columns with a note per header
//!
//! Reading uses `calamine`, writing uses `rust_xlsxwriter`. Both operate on
//! in-memory buffers; callers decide where the bytes go.

mod export;
mod import;
mod template;
mod variants;

pub use export::{
    CellValue, SheetRow, WorkbookBuilder, combined_report_filename, invoice_report_filename,
    read_header_row, revenue_report_filename, SALES_REPORT_FILENAME,
};
pub use import::{HeaderReport, ProductSheet, ProductUploadRow, UPLOAD_COLUMNS, read_product_sheet};
pub use template::{SAMPLE_FILENAME, SAMPLE_SHEET, sample_workbook};
pub use variants::{VariantGroup, parse_variants, total_variant_stock};

use thiserror::Error;

/// Errors that can occur while reading or writing workbooks.
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    /// The workbook could not be opened or a sheet could not be read.
    #[error("Failed to read workbook: {0}")]
    Read(#[from] calamine::Error),

    /// The workbook could not be written.
    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// The workbook has no worksheet at all.
    #[error("Workbook has no worksheets")]
    NoWorksheet,

    /// A named worksheet is missing.
    #[error("Worksheet '{0}' not found")]
    MissingSheet(String),
}
