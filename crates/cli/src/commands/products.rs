//! Product commands: listing and bulk upload from Excel.
//!
//! # Usage
//!
//! ```bash
//! bz products list
//! bz products template --out-dir ./sheets
//! bz products preview ./products.xlsx
//! bz products upload ./products.xlsx
//! ```

use std::path::{Path, PathBuf};

use bazaar_admin::forms::UploadBatch;
use bazaar_admin::spreadsheet::{ProductSheet, SAMPLE_FILENAME, read_product_sheet, sample_workbook};
use bazaar_admin::store::{ProductUpload, Products, Slice};
use clap::Subcommand;

use super::{CliError, Session, read_input, settled, write_output};

#[derive(Subcommand)]
pub enum ProductAction {
    /// List all products
    List,
    /// Parse an upload workbook and show what would be sent
    Preview {
        /// Workbook (.xlsx or .xls)
        file: PathBuf,
    },
    /// Upload every row of a workbook
    Upload {
        /// Workbook (.xlsx or .xls)
        file: PathBuf,
    },
    /// Write the sample upload workbook
    Template {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

pub async fn run(session: &Session, action: ProductAction) -> Result<(), CliError> {
    let store = &session.store;

    match action {
        ProductAction::List => {
            let outcome = store.fetch_products().await?;
            settled(store, Products::NAME, outcome)?;

            let state = store.snapshot();
            for product in state.products.data().into_iter().flatten() {
                let stock = product
                    .stock
                    .map_or_else(|| "N/A".to_string(), |s| s.to_string());
                println!(
                    "{}  {}  price {:.2}  stock {stock}",
                    product.id, product.name, product.price
                );
            }
        }
        ProductAction::Preview { file } => {
            let sheet = load(&file)?;
            print_preview(&sheet);
        }
        ProductAction::Upload { file } => {
            let sheet = load(&file)?;
            print_preview(&sheet);

            let batch = UploadBatch::new(sheet.rows)?;
            println!("Uploading {} products... Please wait.", batch.len());

            let outcome = store.upload_products(&batch).await?;
            settled(store, ProductUpload::NAME, outcome)?;

            let state = store.snapshot();
            let receipt = state.product_upload.data();
            if state.product_upload.flag() {
                println!("Products uploaded successfully");
            }
            if let Some(message) = receipt.and_then(|r| r.message.as_deref()) {
                println!("{message}");
            }
            store.reset::<ProductUpload>();
        }
        ProductAction::Template { out_dir } => {
            let bytes = sample_workbook()?;
            let path = write_output(&out_dir, SAMPLE_FILENAME, &bytes)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<ProductSheet, CliError> {
    let bytes = read_input(path)?;
    Ok(read_product_sheet(&bytes)?)
}

fn print_preview(sheet: &ProductSheet) {
    let report = sheet.header_report();
    if !report.missing.is_empty() {
        println!("Missing columns: {}", report.missing.join(", "));
    }
    if !report.unknown.is_empty() {
        println!("Unrecognised columns: {}", report.unknown.join(", "));
    }

    for (i, row) in sheet.rows.iter().enumerate() {
        let marker = if row.is_anomalous() { "!" } else { " " };
        let stock = row
            .declared_stock()
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!(
            "{marker} {:>3}  {}  stock {stock}  variant stock {}",
            i + 1,
            row.name().unwrap_or("-"),
            row.total_variant_stock()
        );
    }

    let anomalies = sheet.anomalies().count();
    println!("{} rows parsed", sheet.rows.len());
    if anomalies > 0 {
        println!("{anomalies} rows declare more variant stock than base stock (marked !)");
    }
}
