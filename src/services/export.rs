use chrono::NaiveDate;

use crate::models::Invoice;
use crate::services::status::{calculate_days, calculate_status};
use crate::utils::format_us_date;

pub const CSV_HEADERS: [&str; 9] = [
    "Invoice Number",
    "Customer Name",
    "Invoice Date",
    "Due Date",
    "Amount",
    "Status",
    "Days",
    "Payment Terms",
    "Payment Date",
];

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(invoice: &Invoice, today: NaiveDate) -> [String; 9] {
    [
        invoice.invoice_number.clone(),
        invoice.customer_name.clone(),
        format_us_date(invoice.invoice_date),
        format_us_date(invoice.due_date),
        invoice.amount.to_string(),
        calculate_status(invoice, today).to_string(),
        calculate_days(invoice, today).to_string(),
        format!("{} days", invoice.payment_terms),
        invoice.payment_date.map(format_us_date).unwrap_or_default(),
    ]
}

/// Renders the invoice collection as CSV, one row per invoice in
/// collection order, lines separated by `\n`.
pub fn export_csv(invoices: &[Invoice], today: NaiveDate) -> String {
    let mut lines = Vec::with_capacity(invoices.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for invoice in invoices {
        let fields: Vec<String> = csv_row(invoice, today).iter().map(|field| csv_escape(field)).collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("invoices_{}.csv", today.format("%Y-%m-%d"))
}
