use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Invoice, PAYMENT_TERMS};
use crate::utils::add_days;

pub const SAMPLE_SIZE: usize = 10;

const CUSTOMERS: [&str; 10] = [
    "Acme Corp",
    "Tech Solutions",
    "Global Industries",
    "Digital Services",
    "Innovation Labs",
    "Future Systems",
    "Smart Solutions",
    "NextGen Inc",
    "Cloud Services",
    "Data Analytics",
];

/// Seed data for a first run: invoices dated within the past 60 days,
/// roughly 60% of them already paid around their due date.
pub fn generate_sample_invoices<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Vec<Invoice> {
    (1..=SAMPLE_SIZE)
        .map(|i| {
            let invoice_date = add_days(today, -rng.gen_range(0i64..60));
            let payment_terms = *PAYMENT_TERMS.choose(rng).unwrap_or(&30);
            let due_date = add_days(invoice_date, i64::from(payment_terms));
            let amount = f64::from(rng.gen_range(500u32..10_500));

            let payment_date = if rng.gen_bool(0.6) {
                Some(add_days(due_date, rng.gen_range(-5i64..5)))
            } else {
                None
            };

            let id = format!("INV-{:04}", i);
            Invoice {
                id: id.clone(),
                invoice_number: id,
                customer_name: CUSTOMERS.choose(rng).unwrap_or(&CUSTOMERS[0]).to_string(),
                invoice_date,
                due_date,
                amount,
                amount_paid: if payment_date.is_some() { amount } else { 0.0 },
                payment_terms,
                payment_date,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::days_between;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_respect_ranges() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let invoices = generate_sample_invoices(&mut rng, today);
            assert_eq!(invoices.len(), SAMPLE_SIZE);

            for (i, inv) in invoices.iter().enumerate() {
                assert_eq!(inv.id, format!("INV-{:04}", i + 1));
                assert_eq!(inv.id, inv.invoice_number);
                assert!(CUSTOMERS.contains(&inv.customer_name.as_str()));
                assert!(PAYMENT_TERMS.contains(&inv.payment_terms));

                let age = days_between(inv.invoice_date, today);
                assert!((0..60).contains(&age), "age {}", age);
                assert_eq!(
                    inv.due_date,
                    add_days(inv.invoice_date, i64::from(inv.payment_terms))
                );

                assert!(inv.amount >= 500.0 && inv.amount < 10_500.0);
                assert_eq!(inv.amount.fract(), 0.0);

                match inv.payment_date {
                    Some(paid) => {
                        let delay = days_between(inv.due_date, paid);
                        assert!((-5..5).contains(&delay), "delay {}", delay);
                        assert_eq!(inv.amount_paid, inv.amount);
                    }
                    None => assert_eq!(inv.amount_paid, 0.0),
                }
            }
        }
    }
}
