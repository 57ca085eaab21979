//! Invoice store persistence and lifecycle tests against an on-disk database.

use chrono::NaiveDate;
use invoice_desk::db::INVOICES_SLOT;
use invoice_desk::services::status::{calculate_days, calculate_status};
use invoice_desk::{Database, InvoiceStatus, InvoiceStore, NewInvoice};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_store(dir: &TempDir) -> InvoiceStore {
    let db = Database::new(dir.path().join("desk.sqlite")).expect("open database");
    InvoiceStore::open_with(db, &mut StdRng::seed_from_u64(42), date(2024, 6, 15)).expect("open store")
}

fn new_invoice(name: &str, amount: f64, invoice_date: NaiveDate, terms: u32) -> NewInvoice {
    NewInvoice {
        customer_name: name.to_string(),
        amount,
        invoice_date,
        payment_terms: terms,
    }
}

#[test]
fn collection_survives_reopen_unchanged() {
    let dir = tempfile::tempdir().unwrap();

    let before = {
        let mut store = open_store(&dir);
        let added = store
            .add_invoice(new_invoice("Innovation Labs", 4200.75, date(2024, 1, 1), 30))
            .unwrap();
        store
            .mark_as_paid(&added.id, Some(date(2024, 2, 2)), Some(1000.0))
            .unwrap();
        store
            .add_invoice(new_invoice("Future Systems, Ltd", 99.99, date(2024, 3, 1), 7))
            .unwrap();
        store.invoices().to_vec()
    };

    let reopened = open_store(&dir);
    assert_eq!(reopened.invoices(), before.as_slice());
    assert_eq!(reopened.len(), 12);
}

#[test]
fn seeded_store_is_not_reseeded_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let first = open_store(&dir).invoices().to_vec();

    let db = Database::new(dir.path().join("desk.sqlite")).unwrap();
    let second = InvoiceStore::open_with(db, &mut StdRng::seed_from_u64(999), date(2030, 1, 1)).unwrap();
    assert_eq!(second.invoices(), first.as_slice());
}

#[test]
fn thirty_day_terms_from_new_year() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&dir);

    let invoice = store
        .add_invoice(new_invoice("Acme Corp", 1500.0, date(2024, 1, 1), 30))
        .unwrap();
    assert_eq!(invoice.due_date, date(2024, 1, 31));
    assert_eq!(calculate_status(&invoice, date(2024, 1, 31)), InvoiceStatus::Pending);
    assert_eq!(calculate_status(&invoice, date(2024, 2, 3)), InvoiceStatus::Overdue);
    assert_eq!(calculate_days(&invoice, date(2024, 2, 3)).to_string(), "Overdue by 3 days");
}

#[test]
fn partial_payment_still_counts_as_paid() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&dir);

    let invoice = store
        .add_invoice(new_invoice("Cloud Services", 1000.0, date(2024, 6, 1), 7))
        .unwrap();
    let paid = store
        .mark_as_paid(&invoice.id, Some(date(2024, 6, 5)), Some(250.0))
        .unwrap()
        .unwrap();

    assert_eq!(calculate_status(&paid, date(2024, 6, 15)), InvoiceStatus::Paid);
    assert_eq!(paid.outstanding(), 750.0);
    assert_eq!(calculate_days(&paid, date(2024, 6, 15)).to_string(), "Paid 3 days early");
}

#[test]
fn snapshot_is_a_single_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    let raw = store.db().get_slot(INVOICES_SLOT).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let records = value.as_array().expect("array snapshot");
    assert_eq!(records.len(), store.len());
    assert!(records[0].get("customerName").is_some());
    assert!(records[0].get("amountPaid").is_some());
}
