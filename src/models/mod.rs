use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PAYMENT_TERMS: [u32; 5] = [7, 15, 30, 45, 60];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub amount_paid: f64,
    pub payment_terms: u32,
    pub payment_date: Option<NaiveDate>,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.payment_date.is_some()
    }

    /// `amount - amount_paid`, floored at zero.
    pub fn outstanding(&self) -> f64 {
        crate::utils::round_cents(self.amount - self.amount_paid).max(0.0)
    }
}

/// Validated payload accepted by the store when creating an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub customer_name: String,
    pub amount: f64,
    pub invoice_date: NaiveDate,
    pub payment_terms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 3] = [
        InvoiceStatus::Paid,
        InvoiceStatus::Pending,
        InvoiceStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Ok(InvoiceStatus::Paid),
            "pending" => Ok(InvoiceStatus::Pending),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaysKind {
    Paid,
    Overdue,
    Pending,
}

/// Day count relative to the due date.
///
/// For `Paid` the value is signed (negative means early). For `Overdue` it is
/// the number of days past due, for `Pending` the days remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysInfo {
    #[serde(rename = "type")]
    pub kind: DaysKind,
    pub days: i64,
}

impl fmt::Display for DaysInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DaysKind::Paid if self.days < 0 => write!(f, "Paid {} days early", self.days.abs()),
            DaysKind::Paid if self.days > 0 => write!(f, "Paid {} days late", self.days),
            DaysKind::Paid => f.write_str("Paid on time"),
            DaysKind::Overdue => write!(f, "Overdue by {} days", self.days),
            DaysKind::Pending => write!(f, "Due in {} days", self.days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_outstanding: f64,
    pub total_overdue: f64,
    pub total_paid_this_month: f64,
    pub avg_payment_delay: f64,
    pub paid_invoice_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: InvoiceStatus,
    pub count: usize,
}

/// Invoice joined with its derived values, as shown in list and detail views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceView {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub status: InvoiceStatus,
    pub days: DaysInfo,
    pub outstanding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Date,
    Amount,
    DueDate,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "amount" => Ok(SortBy::Amount),
            "due-date" | "duedate" | "due_date" => Ok(SortBy::DueDate),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceQuery {
    pub search: String,
    pub status: Option<InvoiceStatus>,
    pub sort_by: SortBy,
    pub order: SortOrder,
    pub page: usize,
}

impl Default for InvoiceQuery {
    fn default() -> Self {
        InvoiceQuery {
            search: String::new(),
            status: None,
            sort_by: SortBy::default(),
            order: SortOrder::default(),
            page: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePage {
    pub items: Vec<InvoiceView>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    /// 1-based position of the first item; 0 when the page is empty.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub currency_symbol: String,
    pub page_size: usize,
    pub default_payment_terms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency_symbol: "Rs".to_string(),
            page_size: 4,
            default_payment_terms: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub summary: SummaryStats,
    pub distribution: Vec<StatusCount>,
    pub invoice_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_info_renders_four_phrasings() {
        let early = DaysInfo { kind: DaysKind::Paid, days: -3 };
        let late = DaysInfo { kind: DaysKind::Paid, days: 5 };
        let on_time = DaysInfo { kind: DaysKind::Paid, days: 0 };
        let overdue = DaysInfo { kind: DaysKind::Overdue, days: 2 };
        let pending = DaysInfo { kind: DaysKind::Pending, days: 0 };

        assert_eq!(early.to_string(), "Paid 3 days early");
        assert_eq!(late.to_string(), "Paid 5 days late");
        assert_eq!(on_time.to_string(), "Paid on time");
        assert_eq!(overdue.to_string(), "Overdue by 2 days");
        assert_eq!(pending.to_string(), "Due in 0 days");
    }

    #[test]
    fn invoice_serializes_with_camel_case_fields() {
        let invoice = Invoice {
            id: "INV-0001".to_string(),
            invoice_number: "INV-0001".to_string(),
            customer_name: "Acme Corp".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            amount: 1500.0,
            amount_paid: 0.0,
            payment_terms: 30,
            payment_date: None,
        };

        let value = serde_json::to_value(&invoice).unwrap();
        assert_eq!(value["invoiceNumber"], "INV-0001");
        assert_eq!(value["customerName"], "Acme Corp");
        assert_eq!(value["dueDate"], "2024-01-31");
        assert_eq!(value["amountPaid"], 0.0);
        assert!(value["paymentDate"].is_null());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("OVERDUE".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Overdue));
        assert!("unpaid".parse::<InvoiceStatus>().is_err());
    }
}
