use chrono::NaiveDate;

use crate::models::{DaysInfo, DaysKind, Invoice, InvoiceStatus, InvoiceView};
use crate::utils::days_between;

pub fn calculate_status(invoice: &Invoice, today: NaiveDate) -> InvoiceStatus {
    if invoice.is_paid() {
        return InvoiceStatus::Paid;
    }
    if invoice.due_date < today {
        return InvoiceStatus::Overdue;
    }
    InvoiceStatus::Pending
}

pub fn calculate_days(invoice: &Invoice, today: NaiveDate) -> DaysInfo {
    if let Some(payment_date) = invoice.payment_date {
        return DaysInfo {
            kind: DaysKind::Paid,
            days: days_between(invoice.due_date, payment_date),
        };
    }

    let remaining = days_between(today, invoice.due_date);
    if remaining < 0 {
        DaysInfo {
            kind: DaysKind::Overdue,
            days: remaining.abs(),
        }
    } else {
        DaysInfo {
            kind: DaysKind::Pending,
            days: remaining,
        }
    }
}

pub fn view(invoice: &Invoice, today: NaiveDate) -> InvoiceView {
    InvoiceView {
        invoice: invoice.clone(),
        status: calculate_status(invoice, today),
        days: calculate_days(invoice, today),
        outstanding: invoice.outstanding(),
    }
}
