use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::models::{Invoice, InvoicePage, InvoiceQuery, SortBy, SortOrder};
use crate::services::status::{calculate_status, view};

fn matches_search(invoice: &Invoice, needle: &str) -> bool {
    needle.is_empty()
        || invoice.invoice_number.to_lowercase().contains(needle)
        || invoice.customer_name.to_lowercase().contains(needle)
}

fn compare(a: &Invoice, b: &Invoice, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Date => a.invoice_date.cmp(&b.invoice_date),
        SortBy::Amount => a.amount.total_cmp(&b.amount),
        SortBy::DueDate => a.due_date.cmp(&b.due_date),
    }
}

/// Filters and sorts invoices for the list view. Sorting is stable, so
/// ties keep collection order in both directions.
pub fn filter_and_sort<'a>(invoices: &'a [Invoice], query: &InvoiceQuery, today: NaiveDate) -> Vec<&'a Invoice> {
    let needle = query.search.trim().to_lowercase();
    let mut matched: Vec<&Invoice> = invoices
        .iter()
        .filter(|inv| matches_search(inv, &needle))
        .filter(|inv| match query.status {
            Some(status) => calculate_status(inv, today) == status,
            None => true,
        })
        .collect();

    matched.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_by);
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    matched
}

pub fn paginate(invoices: &[Invoice], query: &InvoiceQuery, page_size: usize, today: NaiveDate) -> InvoicePage {
    let page_size = page_size.max(1);
    let matched = filter_and_sort(invoices, query, today);
    let total = matched.len();
    let total_pages = total.div_ceil(page_size);
    let page = query.page.clamp(1, total_pages.max(1));

    let start_index = (page - 1) * page_size;
    let end_index = (start_index + page_size).min(total);
    let items: Vec<_> = matched
        .get(start_index..end_index)
        .unwrap_or_default()
        .iter()
        .map(|inv| view(inv, today))
        .collect();

    InvoicePage {
        start: if items.is_empty() { 0 } else { start_index + 1 },
        end: end_index,
        items,
        total,
        page,
        total_pages,
    }
}
