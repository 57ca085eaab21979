use crate::models::{DashboardStats, Settings};
use crate::services::state::AppState;
use crate::utils::{format_money, today};

const BAR_WIDTH: usize = 30;

pub fn get_dashboard_stats(state: &AppState) -> DashboardStats {
    let today = today();
    DashboardStats {
        summary: state.store.summary_stats(today),
        distribution: state.store.status_distribution(today),
        invoice_count: state.store.len(),
    }
}

pub fn render_dashboard(stats: &DashboardStats, settings: &Settings) -> String {
    let symbol = &settings.currency_symbol;
    let summary = &stats.summary;
    let mut lines = vec![
        "Invoice Summary".to_string(),
        format!(
            "  Total Outstanding        {:>14}   Pending + Overdue invoices",
            format_money(symbol, summary.total_outstanding)
        ),
        format!(
            "  Total Overdue            {:>14}   Overdue invoices only",
            format_money(symbol, summary.total_overdue)
        ),
        format!(
            "  Total Paid (This Month)  {:>14}   Paid in current month",
            format_money(symbol, summary.total_paid_this_month)
        ),
    ];
    if summary.paid_invoice_count == 0 {
        lines.push("  Avg Payment Delay        no paid invoices yet".to_string());
    } else {
        lines.push(format!(
            "  Avg Payment Delay        {:>9} days   over {} paid invoices",
            summary.avg_payment_delay, summary.paid_invoice_count
        ));
    }

    lines.push(String::new());
    lines.push("Invoice Status Distribution".to_string());
    let max = stats.distribution.iter().map(|row| row.count).max().unwrap_or(0);
    for row in &stats.distribution {
        let width = if max == 0 { 0 } else { row.count * BAR_WIDTH / max };
        lines.push(format!("  {:<8} {:>4} {}", row.status, row.count, "#".repeat(width)));
    }
    lines.join("\n")
}
