//! Sample upload workbook handed to operators as a starting point.

use rust_xlsxwriter::{Format, Note, Workbook};

use super::SpreadsheetError;

pub const SAMPLE_FILENAME: &str = "sample_products_upload.xlsx";
pub const SAMPLE_SHEET: &str = "Sample";

enum SampleCell {
    Text(&'static str),
    Number(f64),
}

/// `(column, expected format, example value)`, in [`UPLOAD_COLUMNS`](super::UPLOAD_COLUMNS) order.
const SAMPLE: [(&str, &str, SampleCell); 14] = [
    ("name", "Product name", SampleCell::Text("Sample Product")),
    ("brand_code", "Brand ID (number, Apple - 1)", SampleCell::Number(1.0)),
    ("category", "Category like Mobiles, Laptops, etc.", SampleCell::Text("Mobiles")),
    ("price", "Selling price in number", SampleCell::Number(20000.0)),
    ("cuttedPrice", "Original cutted price", SampleCell::Number(22000.0)),
    ("stock", "Stock quantity", SampleCell::Number(5.0)),
    ("warranty", "Warranty period (in years)", SampleCell::Number(1.0)),
    ("description", "Short description", SampleCell::Text("This is a sample product")),
    (
        "images",
        "Image URLs comma-separated (Cloudinary/Drive links)",
        SampleCell::Text("https://image1.jpg, https://image2.jpg"),
    ),
    (
        "tags",
        "Comma-separated tags like New Arrival, Top Pick",
        SampleCell::Text("New Arrival, Best Seller"),
    ),
    (
        "youtube",
        "YouTube video link",
        SampleCell::Text("https://www.youtube.com/watch?v=xyz"),
    ),
    (
        "morelink",
        "More link (official or product page)",
        SampleCell::Text("https://example.com"),
    ),
    (
        "specifications",
        "Format: title:desc;title2:desc2 (semicolon-separated specs)",
        SampleCell::Text("In The Box:Charger, Cable;Model Number:XYZ123"),
    ),
    (
        "variants",
        "Format: variant::price::stock,comma-separated",
        SampleCell::Text("Variant A::10000::3| Variant B::12000::2"),
    ),
];

/// Build the sample upload workbook: one header row with a note on every
/// header cell, followed by one example product.
///
/// # Errors
///
/// Returns `SpreadsheetError::Write` if the workbook cannot be assembled.
pub fn sample_workbook() -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SAMPLE_SHEET)?;

    for (col, (column, hint, example)) in (0u16..).zip(&SAMPLE) {
        worksheet.write_string_with_format(0, col, *column, &bold)?;
        worksheet.insert_note(0, col, &Note::new(*hint))?;
        match example {
            SampleCell::Text(s) => worksheet.write_string(1, col, *s)?,
            SampleCell::Number(n) => worksheet.write_number(1, col, *n)?,
        };
    }

    worksheet.autofit();
    Ok(workbook.save_to_buffer()?)
}
