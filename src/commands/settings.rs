use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::models::{Settings, PAYMENT_TERMS};
use crate::services::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SettingsPayload {
    pub currency_symbol: Option<String>,
    pub page_size: Option<usize>,
    pub default_payment_terms: Option<u32>,
}

pub fn get_settings(state: &AppState) -> Settings {
    state.settings.clone()
}

pub fn save_settings(state: &mut AppState, payload: SettingsPayload) -> Result<Settings> {
    let mut settings = state.settings.clone();

    if let Some(symbol) = payload.currency_symbol {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(anyhow!("Currency symbol cannot be empty"));
        }
        settings.currency_symbol = symbol.to_string();
    }
    if let Some(page_size) = payload.page_size {
        if page_size == 0 {
            return Err(anyhow!("Page size must be at least 1"));
        }
        settings.page_size = page_size;
    }
    if let Some(terms) = payload.default_payment_terms {
        if !PAYMENT_TERMS.contains(&terms) {
            return Err(anyhow!("Payment terms must be one of {:?}", PAYMENT_TERMS));
        }
        settings.default_payment_terms = terms;
    }

    state.update_settings(settings)?;
    Ok(get_settings(state))
}

pub fn render_settings(settings: &Settings) -> String {
    [
        format!("currency_symbol        {}", settings.currency_symbol),
        format!("page_size              {}", settings.page_size),
        format!("default_payment_terms  {} days", settings.default_payment_terms),
    ]
    .join("\n")
}
