//! Writing report workbooks.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{DateTime, NaiveDate, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::instrument;

use super::SpreadsheetError;
use crate::reports::{InvoiceRow, NOT_AVAILABLE, OrderStatusRow, RevenueRow, SalesRow};

pub const SALES_REPORT_FILENAME: &str = "ProductSalesReport.xlsx";

const MONEY_FORMAT: &str = "0.00";

/// `Revenue_Report_<yyyyMMdd>.xlsx`
#[must_use]
pub fn revenue_report_filename(day: NaiveDate) -> String {
    format!("Revenue_Report_{}.xlsx", day.format("%Y%m%d"))
}

/// `InvoiceReport_<unix millis>.xlsx`
#[must_use]
pub fn invoice_report_filename(now: DateTime<Utc>) -> String {
    format!("InvoiceReport_{}.xlsx", now.timestamp_millis())
}

/// `Reports_<yyyyMMdd>.xlsx`, the workbook holding every report sheet.
#[must_use]
pub fn combined_report_filename(day: NaiveDate) -> String {
    format!("Reports_{}.xlsx", day.format("%Y%m%d"))
}

/// One cell of an exported row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    /// Written as a number with two decimals shown.
    Money(f64),
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Option<&str>> for CellValue {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Self::Empty, Self::from)
    }
}

/// A report row that can be exported to a worksheet.
pub trait SheetRow {
    /// Worksheet name.
    const SHEET: &'static str;

    /// Column headers, in order.
    fn headers() -> &'static [&'static str];

    /// Cell values, one per header.
    fn cells(&self) -> Vec<CellValue>;
}

impl SheetRow for SalesRow {
    const SHEET: &'static str = "ProductSalesReport";

    fn headers() -> &'static [&'static str] {
        &[
            "Product Name",
            "Total Units Sold",
            "Total Revenue (₹)",
            "Available Stock",
        ]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.name.as_str().into(),
            CellValue::Integer(self.total_quantity),
            CellValue::Money(self.total_revenue),
            self.stock
                .map_or_else(|| NOT_AVAILABLE.into(), CellValue::Integer),
        ]
    }
}

impl SheetRow for RevenueRow {
    const SHEET: &'static str = "Revenue Report";

    fn headers() -> &'static [&'static str] {
        &[
            "#",
            "Invoice No",
            "Date",
            "Customer",
            "Total (₹)",
            "Discount (₹)",
            "SGST (₹)",
            "CGST (₹)",
            "Status",
        ]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::Integer(serial(self.serial)),
            self.invoice_number.as_deref().into(),
            self.created_at.format("%d/%m/%Y").to_string().into(),
            self.customer.as_str().into(),
            CellValue::Money(self.total),
            CellValue::Money(self.discount),
            CellValue::Money(self.sgst),
            CellValue::Money(self.cgst),
            self.status.as_str().into(),
        ]
    }
}

impl SheetRow for InvoiceRow {
    const SHEET: &'static str = "InvoiceReport";

    fn headers() -> &'static [&'static str] {
        &[
            "Invoice No",
            "Invoice Date",
            "Customer Name",
            "Total Price (₹)",
            "Order Status",
        ]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.invoice_number.as_deref().into(),
            self.invoice_date
                .format("%m/%d/%Y %I:%M %p")
                .to_string()
                .into(),
            self.customer.as_str().into(),
            CellValue::Money(self.total),
            self.status.as_str().into(),
        ]
    }
}

impl SheetRow for OrderStatusRow {
    const SHEET: &'static str = "OrderStatus";

    fn headers() -> &'static [&'static str] {
        &[
            "Order ID",
            "Customer",
            "Email",
            "Phone",
            "Amount (₹)",
            "Status",
            "Ordered On",
        ]
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.order_id.as_str().into(),
            self.customer.as_str().into(),
            self.email.as_deref().into(),
            self.phone.as_deref().into(),
            CellValue::Money(self.amount),
            self.status.as_str().into(),
            self.ordered_on.format("%d/%m/%Y").to_string().into(),
        ]
    }
}

#[allow(clippy::cast_possible_wrap)] // serials are row counts
const fn serial(n: usize) -> i64 {
    n as i64
}

/// Builds a workbook one report sheet at a time.
pub struct WorkbookBuilder {
    workbook: Workbook,
    header: Format,
    money: Format,
}

impl Default for WorkbookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            header: Format::new().set_bold(),
            money: Format::new().set_num_format(MONEY_FORMAT),
        }
    }

    /// Append a worksheet named `R::SHEET` holding a header row and one
    /// row per element of `rows`.
    ///
    /// # Errors
    ///
    /// Returns `SpreadsheetError::Write` if a cell cannot be written.
    pub fn add_sheet<R: SheetRow>(&mut self, rows: &[R]) -> Result<&mut Self, SpreadsheetError> {
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(R::SHEET)?;

        for (col, header) in (0u16..).zip(R::headers()) {
            worksheet.write_string_with_format(0, col, *header, &self.header)?;
        }

        for (row, record) in (1u32..).zip(rows) {
            for (col, cell) in (0u16..).zip(record.cells()) {
                write_cell(worksheet, row, col, &cell, &self.money)?;
            }
        }

        worksheet.autofit();
        Ok(self)
    }

    /// Serialize the workbook to `.xlsx` bytes.
    ///
    /// # Errors
    ///
    /// Returns `SpreadsheetError::Write` if the workbook cannot be assembled.
    #[instrument(skip(self))]
    pub fn finish(mut self) -> Result<Vec<u8>, SpreadsheetError> {
        Ok(self.workbook.save_to_buffer()?)
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    money: &Format,
) -> Result<(), SpreadsheetError> {
    match cell {
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        #[allow(clippy::cast_precision_loss)]
        CellValue::Integer(n) => {
            worksheet.write_number(row, col, *n as f64)?;
        }
        CellValue::Money(n) => {
            worksheet.write_number_with_format(row, col, *n, money)?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}

/// Header row of a named worksheet in an exported workbook.
///
/// # Errors
///
/// Returns `SpreadsheetError::Read` if the bytes are not a workbook and
/// `SpreadsheetError::MissingSheet` if no worksheet has that name.
pub fn read_header_row(bytes: &[u8], sheet: &str) -> Result<Vec<String>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(SpreadsheetError::MissingSheet(sheet.to_string()));
    }
    let range = workbook.worksheet_range(sheet)?;

    Ok(range
        .rows()
        .next()
        .map(|cells| {
            cells
                .iter()
                .filter(|cell| !matches!(cell, Data::Empty))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default())
}
