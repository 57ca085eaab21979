use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::models::{NewInvoice, PAYMENT_TERMS};
use crate::utils::{parse_date, parse_decimal, round_cents};

/// Raw invoice form input, one text field per form control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceForm {
    pub customer_name: String,
    pub amount: Option<String>,
    pub invoice_date: Option<String>,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    CustomerName,
    Amount,
    InvoiceDate,
    PaymentTerms,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::CustomerName => "customer_name",
            FormField::Amount => "amount",
            FormField::InvoiceDate => "invoice_date",
            FormField::PaymentTerms => "payment_terms",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, &'static str>,
}

impl ValidationErrors {
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    fn add(&mut self, field: FormField, message: &'static str) {
        self.errors.insert(field, message);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field.as_str(), message))
            .collect();
        write!(f, "Invalid invoice: {}", parts.join("; "))
    }
}

impl InvoiceForm {
    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<NewInvoice, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            errors.add(FormField::CustomerName, "Please enter a customer name");
        }

        let amount = self
            .amount
            .as_deref()
            .and_then(|raw| parse_decimal(raw).ok())
            .filter(|value| *value > 0.0);
        if amount.is_none() {
            errors.add(FormField::Amount, "Please enter a valid amount");
        }

        let invoice_date: Option<NaiveDate> = self.invoice_date.as_deref().and_then(parse_date);
        if invoice_date.is_none() {
            errors.add(FormField::InvoiceDate, "Please select an invoice date");
        }

        let payment_terms = self
            .payment_terms
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|terms| PAYMENT_TERMS.contains(terms));
        if payment_terms.is_none() {
            errors.add(FormField::PaymentTerms, "Please select payment terms");
        }

        match (amount, invoice_date, payment_terms) {
            (Some(amount), Some(invoice_date), Some(payment_terms)) if errors.is_empty() => Ok(NewInvoice {
                customer_name: customer_name.to_string(),
                amount: round_cents(amount),
                invoice_date,
                payment_terms,
            }),
            _ => Err(errors),
        }
    }
}
