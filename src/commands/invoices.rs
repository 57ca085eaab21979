use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::models::{InvoicePage, InvoiceQuery, InvoiceView, Settings};
use crate::services::listing::paginate;
use crate::services::state::AppState;
use crate::services::status::view;
use crate::services::validation::InvoiceForm;
use crate::utils::{format_long_date, format_money, format_us_date, parse_date, parse_decimal, today};

#[derive(Debug, Deserialize)]
pub struct MarkPaidPayload {
    pub invoice_id: String,
    pub payment_date: Option<String>,
    pub payment_amount: Option<String>,
}

pub fn get_invoices(state: &AppState, query: &InvoiceQuery) -> InvoicePage {
    paginate(state.store.invoices(), query, state.settings.page_size, today())
}

pub fn get_invoice_detail(state: &AppState, invoice_id: &str) -> Result<InvoiceView> {
    let invoice = state
        .store
        .get(invoice_id)
        .ok_or_else(|| anyhow!("Invoice not found: {}", invoice_id))?;
    Ok(view(invoice, today()))
}

pub fn add_invoice(state: &mut AppState, form: &InvoiceForm) -> Result<InvoiceView> {
    let new_invoice = form.validate()?;
    let invoice = state.store.add_invoice(new_invoice)?;
    Ok(view(&invoice, today()))
}

/// Returns `None` when the id is unknown; the store treats that as a no-op.
pub fn mark_invoice_paid(state: &mut AppState, payload: &MarkPaidPayload) -> Result<Option<InvoiceView>> {
    let payment_date = payload
        .payment_date
        .as_deref()
        .map(|raw| parse_date(raw).ok_or_else(|| anyhow!("Invalid payment date: {}", raw)))
        .transpose()?;
    let payment_amount = payload
        .payment_amount
        .as_deref()
        .map(parse_decimal)
        .transpose()?;
    if payment_amount.is_some_and(|amount| amount < 0.0) {
        return Err(anyhow!("Payment amount cannot be negative"));
    }

    let updated = state
        .store
        .mark_as_paid(&payload.invoice_id, payment_date, payment_amount)?;
    Ok(updated.map(|invoice| view(&invoice, today())))
}

pub fn render_page(page: &InvoicePage, settings: &Settings) -> String {
    if page.items.is_empty() {
        return "No invoices found matching your criteria.".to_string();
    }

    let mut lines = vec![format!(
        "{:<16} {:<22} {:>10} {:>10} {:>14} {:>14} {:<8} {}",
        "Invoice", "Customer", "Date", "Due", "Amount", "Due amount", "Status", "Days"
    )];
    for item in &page.items {
        let inv = &item.invoice;
        lines.push(format!(
            "{:<16} {:<22} {:>10} {:>10} {:>14} {:>14} {:<8} {}",
            inv.invoice_number,
            truncate(&inv.customer_name, 22),
            format_us_date(inv.invoice_date),
            format_us_date(inv.due_date),
            format_money(&settings.currency_symbol, inv.amount),
            format_money(&settings.currency_symbol, item.outstanding),
            item.status,
            item.days
        ));
    }
    if page.total_pages > 1 {
        lines.push(format!(
            "Showing {} to {} of {} results (page {} of {})",
            page.start, page.end, page.total, page.page, page.total_pages
        ));
    }
    lines.join("\n")
}

pub fn render_detail(item: &InvoiceView, settings: &Settings) -> String {
    let inv = &item.invoice;
    let symbol = &settings.currency_symbol;
    let mut lines = vec![
        format!("{}  [{}]", inv.invoice_number, item.status),
        format!("Customer Name:  {}", inv.customer_name),
        format!("Amount:         {}", format_money(symbol, inv.amount)),
        format!("Amount Paid:    {}", format_money(symbol, inv.amount_paid)),
        format!("Amount Due:     {}", format_money(symbol, item.outstanding)),
        format!("Invoice Date:   {}", format_long_date(inv.invoice_date)),
        format!("Due Date:       {}", format_long_date(inv.due_date)),
    ];
    if let Some(payment_date) = inv.payment_date {
        lines.push(format!("Payment Date:   {}", format_long_date(payment_date)));
    }
    lines.push(format!("Payment Terms:  {} days", inv.payment_terms));
    lines.push(format!("Status:         {}", item.days));
    lines.join("\n")
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::services::validation::ValidationErrors;

    fn state() -> AppState {
        AppState::new(Database::open_in_memory().unwrap()).unwrap()
    }

    fn form(name: &str, amount: &str) -> InvoiceForm {
        InvoiceForm {
            customer_name: name.to_string(),
            amount: Some(amount.to_string()),
            invoice_date: Some("2024-01-01".to_string()),
            payment_terms: Some("30".to_string()),
        }
    }

    #[test]
    fn add_then_pay_through_commands() {
        let mut state = state();
        let added = add_invoice(&mut state, &form("Acme Corp", "1200")).unwrap();
        assert_eq!(added.invoice.due_date.to_string(), "2024-01-31");

        let payload = MarkPaidPayload {
            invoice_id: added.invoice.id.clone(),
            payment_date: Some("2024-02-05".to_string()),
            payment_amount: None,
        };
        let paid = mark_invoice_paid(&mut state, &payload).unwrap().unwrap();
        assert_eq!(paid.invoice.amount_paid, 1200.0);
        assert_eq!(paid.days.to_string(), "Paid 5 days late");

        let detail = get_invoice_detail(&state, &added.invoice.id).unwrap();
        assert!(render_detail(&detail, &state.settings).contains("Payment Date:   February 5, 2024"));
    }

    #[test]
    fn invalid_form_surfaces_validation_errors() {
        let mut state = state();
        let err = add_invoice(&mut state, &form(" ", "abc")).unwrap_err();
        let errors = err.downcast_ref::<ValidationErrors>().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(state.store.len(), 10);
    }

    #[test]
    fn paying_unknown_invoice_returns_none() {
        let mut state = state();
        let payload = MarkPaidPayload {
            invoice_id: "INV-4242".to_string(),
            payment_date: None,
            payment_amount: None,
        };
        assert!(mark_invoice_paid(&mut state, &payload).unwrap().is_none());
    }

    #[test]
    fn bad_payment_input_is_rejected() {
        let mut state = state();
        let payload = MarkPaidPayload {
            invoice_id: "INV-0001".to_string(),
            payment_date: Some("someday".to_string()),
            payment_amount: None,
        };
        assert!(mark_invoice_paid(&mut state, &payload).is_err());
    }

    #[test]
    fn list_uses_page_size_from_settings() {
        let state = state();
        let page = get_invoices(&state, &InvoiceQuery::default());
        assert_eq!(page.items.len(), 4);
        assert_eq!(page.total_pages, 3);
        assert!(render_page(&page, &state.settings).contains("Showing 1 to 4 of 10 results"));
    }
}
