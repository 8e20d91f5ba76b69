//! Reporting commands.
//!
//! # Usage
//!
//! ```bash
//! # Units and revenue per product
//! bz reports sales --export
//!
//! # Revenue between two days (inclusive), in BAZAAR_REPORT_UTC_OFFSET
//! bz reports revenue --from 2024-01-01 --to 2024-01-31
//!
//! # Orders invoiced in a range
//! bz reports invoices --from 2024-03-01 --to 2024-03-31 --export
//!
//! # Status of every order
//! bz reports orders
//!
//! # Every report in one workbook
//! bz reports export --from 2024-01-01 --to 2024-01-31
//! ```

use std::path::PathBuf;

use bazaar_admin::api::{Order, Product};
use bazaar_admin::reports::{
    InvoiceRow, OrderStatusRow, RevenueReport, SalesRow, format_amount, invoice_report,
    order_status_report, revenue_report, sales_report,
};
use bazaar_admin::spreadsheet::{
    SALES_REPORT_FILENAME, SheetRow, WorkbookBuilder, combined_report_filename, invoice_report_filename,
    revenue_report_filename,
};
use bazaar_admin::store::{Orders, Products, Slice};
use bazaar_core::DateRange;
use chrono::Utc;
use clap::{Args, Subcommand};

use super::{CliError, Session, settled, write_output};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Units sold and revenue per product
    Sales {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Revenue, discount and taxes per order
    Revenue {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Orders invoiced in a date range
    Invoices {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Status of every order
    Orders {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Write every report to a single workbook
    Export {
        #[command(flatten)]
        range: RangeArgs,

        /// Directory to write into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

/// Inclusive day bounds; both must be given for the range to apply.
#[derive(Args)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Last day (YYYY-MM-DD), included up to 23:59:59.999
    #[arg(long)]
    to: Option<String>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Also write the report to an Excel workbook
    #[arg(long)]
    export: bool,

    /// Directory to write into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

pub async fn run(session: &Session, action: ReportAction) -> Result<(), CliError> {
    let offset = session.config.report_offset;

    match action {
        ReportAction::Sales { output } => {
            let (orders, products) = fetch_orders_and_products(session).await?;
            let rows = sales_report(&orders, &products);
            print_sales(&rows);
            if output.export {
                export_one(&output, SALES_REPORT_FILENAME, &rows)?;
            }
        }
        ReportAction::Revenue { range, output } => {
            let range = resolve(session, &range)?;
            let orders = fetch_orders(session).await?;
            let report = revenue_report(&orders, range.as_ref(), offset);
            print_revenue(&report);
            if output.export {
                let name = revenue_report_filename(Utc::now().with_timezone(&offset).date_naive());
                export_one(&output, &name, &report.rows)?;
            }
        }
        ReportAction::Invoices { range, output } => {
            let range = resolve(session, &range)?;
            if range.is_none() {
                println!("Choose both --from and --to to list invoices");
            }
            let orders = fetch_orders(session).await?;
            let rows = invoice_report(&orders, range.as_ref(), offset);
            print_invoices(&rows);
            if output.export {
                export_one(&output, &invoice_report_filename(Utc::now()), &rows)?;
            }
        }
        ReportAction::Orders { output } => {
            let orders = fetch_orders(session).await?;
            let rows = order_status_report(&orders, offset);
            print_statuses(&rows);
            if output.export {
                let name = format!(
                    "OrderStatus_{}.xlsx",
                    Utc::now().with_timezone(&offset).format("%Y%m%d")
                );
                export_one(&output, &name, &rows)?;
            }
        }
        ReportAction::Export { range, out_dir } => {
            let range = resolve(session, &range)?;
            let (orders, products) = fetch_orders_and_products(session).await?;

            let mut builder = WorkbookBuilder::new();
            builder
                .add_sheet(&sales_report(&orders, &products))?
                .add_sheet(&revenue_report(&orders, range.as_ref(), offset).rows)?
                .add_sheet(&invoice_report(&orders, range.as_ref(), offset))?
                .add_sheet(&order_status_report(&orders, offset))?;
            let bytes = builder.finish()?;

            let name = combined_report_filename(Utc::now().with_timezone(&offset).date_naive());
            let path = write_output(&out_dir, &name, &bytes)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn resolve(session: &Session, args: &RangeArgs) -> Result<Option<DateRange>, CliError> {
    let range = DateRange::parse(args.from.as_deref(), args.to.as_deref())?;
    Ok(range.map(|r| r.with_offset(session.config.report_offset)))
}

async fn fetch_orders(session: &Session) -> Result<Vec<Order>, CliError> {
    let store = &session.store;
    let outcome = store.fetch_orders().await?;
    settled(store, Orders::NAME, outcome)?;
    Ok(store.snapshot().orders.data().cloned().unwrap_or_default())
}

async fn fetch_orders_and_products(
    session: &Session,
) -> Result<(Vec<Order>, Vec<Product>), CliError> {
    let store = &session.store;
    let (orders, products) = tokio::join!(store.fetch_orders(), store.fetch_products());
    settled(store, Orders::NAME, orders?)?;
    settled(store, Products::NAME, products?)?;

    let state = store.snapshot();
    Ok((
        state.orders.data().cloned().unwrap_or_default(),
        state.products.data().cloned().unwrap_or_default(),
    ))
}

fn export_one<R: SheetRow>(
    output: &OutputArgs,
    filename: &str,
    rows: &[R],
) -> Result<(), CliError> {
    let mut builder = WorkbookBuilder::new();
    builder.add_sheet(rows)?;
    let bytes = builder.finish()?;
    let path = write_output(&output.out_dir, filename, &bytes)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn print_sales(rows: &[SalesRow]) {
    if rows.is_empty() {
        println!("No sales");
        return;
    }
    for row in rows {
        let stock = row
            .stock
            .map_or_else(|| "N/A".to_string(), |s| s.to_string());
        println!(
            "{:>3}  {}  units {}  revenue ₹{}  stock {stock}",
            row.serial,
            row.name,
            row.total_quantity,
            format_amount(row.total_revenue)
        );
    }
}

fn print_revenue(report: &RevenueReport) {
    for row in &report.rows {
        println!(
            "{:>3}  {}  {}  {}  total ₹{}  discount ₹{}  SGST ₹{}  CGST ₹{}  {}",
            row.serial,
            row.invoice_number.as_deref().unwrap_or("-"),
            row.created_at.format("%d/%m/%Y"),
            row.customer,
            format_amount(row.total),
            format_amount(row.discount),
            format_amount(row.sgst),
            format_amount(row.cgst),
            row.status
        );
    }

    let t = &report.totals;
    println!("Orders:         {}", report.order_count());
    println!("Total revenue:  ₹{}", format_amount(t.total_revenue));
    println!("Total discount: ₹{}", format_amount(t.total_discount));
    println!("Total SGST:     ₹{}", format_amount(t.total_sgst));
    println!("Total CGST:     ₹{}", format_amount(t.total_cgst));
    println!("Total tax:      ₹{}", format_amount(t.total_tax()));
    println!("Net revenue:    ₹{}", format_amount(t.net_revenue));
}

fn print_invoices(rows: &[InvoiceRow]) {
    for row in rows {
        println!(
            "{:>3}  {}  {}  {}  ₹{}  {}",
            row.serial,
            row.invoice_number.as_deref().unwrap_or("-"),
            row.invoice_date.format("%m/%d/%Y %I:%M %p"),
            row.customer,
            format_amount(row.total),
            row.status
        );
    }
    println!("{} invoices", rows.len());
}

fn print_statuses(rows: &[OrderStatusRow]) {
    for row in rows {
        println!(
            "{}  {}  {}  {}  ₹{}  {} ({})  {}",
            row.order_id,
            row.customer,
            row.email.as_deref().unwrap_or("-"),
            row.phone.as_deref().unwrap_or("-"),
            format_amount(row.amount),
            row.status,
            row.tone,
            row.ordered_on.format("%d/%m/%Y")
        );
    }
}
