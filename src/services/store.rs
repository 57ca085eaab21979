use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::db::{Database, INVOICES_SLOT};
use crate::models::{Invoice, InvoiceStatus, NewInvoice, StatusCount, SummaryStats};
use crate::services::sample::generate_sample_invoices;
use crate::services::status::calculate_status;
use crate::utils::{add_days, days_between, round_cents, round_one_decimal, today};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No invoice ids left after {0}")]
    IdsExhausted(String),

    #[error("Invalid payment amount: {0}")]
    InvalidPaymentAmount(f64),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted record as it may appear in older snapshots: amounts and terms
/// can be strings and `amountPaid` may be missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredInvoice {
    id: String,
    invoice_number: Option<String>,
    customer_name: String,
    invoice_date: NaiveDate,
    due_date: NaiveDate,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    amount_paid: Value,
    #[serde(default)]
    payment_terms: Value,
    payment_date: Option<NaiveDate>,
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

impl StoredInvoice {
    fn normalize(self) -> Invoice {
        let amount = round_cents(coerce_number(&self.amount).unwrap_or(0.0));
        let amount_paid = match coerce_number(&self.amount_paid) {
            Some(paid) => round_cents(paid),
            None if self.payment_date.is_some() => amount,
            None => 0.0,
        };
        let payment_terms = coerce_number(&self.payment_terms)
            .filter(|terms| *terms >= 0.0)
            .map(|terms| terms as u32)
            .unwrap_or(0);

        Invoice {
            invoice_number: self.invoice_number.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            customer_name: self.customer_name,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            amount,
            amount_paid,
            payment_terms,
            payment_date: self.payment_date,
        }
    }
}

fn parse_snapshot(raw: &str) -> serde_json::Result<Vec<Invoice>> {
    let stored: Vec<StoredInvoice> = serde_json::from_str(raw)?;
    Ok(stored.into_iter().map(StoredInvoice::normalize).collect())
}

fn id_sequence(id: &str) -> Option<u64> {
    id.strip_prefix("INV-")
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u64>().ok())
}

/// Ordered invoice collection backed by a single storage slot.
pub struct InvoiceStore {
    db: Database,
    invoices: Vec<Invoice>,
}

impl InvoiceStore {
    pub fn open(db: Database) -> StoreResult<Self> {
        Self::open_with(db, &mut rand::thread_rng(), today())
    }

    /// Loads the persisted snapshot, seeding sample data when there is none.
    pub fn open_with<R: Rng + ?Sized>(db: Database, rng: &mut R, today: NaiveDate) -> StoreResult<Self> {
        let loaded = match db.get_slot(INVOICES_SLOT)? {
            Some(raw) => match parse_snapshot(&raw) {
                Ok(invoices) => invoices,
                Err(err) => {
                    tracing::warn!(error = %err, "discarding malformed invoice snapshot");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if !loaded.is_empty() {
            tracing::debug!(count = loaded.len(), "loaded invoice snapshot");
            return Ok(InvoiceStore { db, invoices: loaded });
        }

        let invoices = generate_sample_invoices(rng, today);
        tracing::info!(count = invoices.len(), "seeded sample invoices");
        let store = InvoiceStore { db, invoices };
        store.persist()?;
        Ok(store)
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn get(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|inv| inv.id == id)
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    fn persist(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.invoices)?;
        self.db.set_slot(INVOICES_SLOT, &raw)?;
        Ok(())
    }

    /// Next counter id. Every candidate above the current maximum is free.
    fn next_id(&self) -> StoreResult<String> {
        let max = self
            .invoices
            .iter()
            .filter_map(|inv| id_sequence(&inv.id))
            .max()
            .unwrap_or(0);
        let next = max
            .checked_add(1)
            .ok_or_else(|| StoreError::IdsExhausted(format!("INV-{:04}", max)))?;
        Ok(format!("INV-{:04}", next))
    }

    /// Appends a new unpaid invoice. Input is expected to be validated.
    pub fn add_invoice(&mut self, new_invoice: NewInvoice) -> StoreResult<Invoice> {
        let id = self.next_id()?;
        let invoice = Invoice {
            invoice_number: id.clone(),
            id,
            customer_name: new_invoice.customer_name,
            invoice_date: new_invoice.invoice_date,
            due_date: add_days(new_invoice.invoice_date, i64::from(new_invoice.payment_terms)),
            amount: round_cents(new_invoice.amount),
            amount_paid: 0.0,
            payment_terms: new_invoice.payment_terms,
            payment_date: None,
        };

        self.invoices.push(invoice.clone());
        tracing::info!(id = %invoice.id, customer = %invoice.customer_name, amount = invoice.amount, "invoice added");
        self.persist()?;
        Ok(invoice)
    }

    /// Records a payment, overwriting any earlier one. Returns `None` when
    /// no invoice has the given id.
    pub fn mark_as_paid(
        &mut self,
        invoice_id: &str,
        payment_date: Option<NaiveDate>,
        payment_amount: Option<f64>,
    ) -> StoreResult<Option<Invoice>> {
        if let Some(amount) = payment_amount.filter(|amount| !amount.is_finite() || *amount < 0.0) {
            return Err(StoreError::InvalidPaymentAmount(amount));
        }

        let Some(invoice) = self.invoices.iter_mut().find(|inv| inv.id == invoice_id) else {
            tracing::debug!(id = invoice_id, "mark as paid ignored, invoice not found");
            return Ok(None);
        };

        if let Some(previous) = invoice.payment_date {
            tracing::info!(
                id = invoice_id,
                previous_date = %previous,
                previous_amount = invoice.amount_paid,
                "overwriting recorded payment"
            );
        }

        invoice.payment_date = Some(payment_date.unwrap_or_else(today));
        invoice.amount_paid = payment_amount.map(round_cents).unwrap_or(invoice.amount);
        let updated = invoice.clone();

        tracing::info!(id = invoice_id, amount_paid = updated.amount_paid, "invoice marked as paid");
        self.persist()?;
        Ok(Some(updated))
    }

    pub fn summary_stats(&self, today: NaiveDate) -> SummaryStats {
        let mut total_outstanding = 0.0;
        let mut total_overdue = 0.0;
        let mut total_paid_this_month = 0.0;
        let mut delays = Vec::new();

        for invoice in &self.invoices {
            let status = calculate_status(invoice, today);
            let outstanding = invoice.outstanding();

            if matches!(status, InvoiceStatus::Pending | InvoiceStatus::Overdue) {
                total_outstanding += outstanding;
            }
            if status == InvoiceStatus::Overdue {
                total_overdue += outstanding;
            }

            if let Some(payment_date) = invoice.payment_date {
                if payment_date.year() == today.year() && payment_date.month() == today.month() {
                    total_paid_this_month += invoice.amount_paid;
                }
                delays.push(days_between(invoice.due_date, payment_date));
            }
        }

        let avg_payment_delay = if delays.is_empty() {
            0.0
        } else {
            round_one_decimal(delays.iter().sum::<i64>() as f64 / delays.len() as f64)
        };

        SummaryStats {
            total_outstanding: round_cents(total_outstanding),
            total_overdue: round_cents(total_overdue),
            total_paid_this_month: round_cents(total_paid_this_month),
            avg_payment_delay,
            paid_invoice_count: delays.len(),
        }
    }

    pub fn status_distribution(&self, today: NaiveDate) -> Vec<StatusCount> {
        InvoiceStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: self
                    .invoices
                    .iter()
                    .filter(|inv| calculate_status(inv, today) == *status)
                    .count(),
            })
            .collect()
    }
}
