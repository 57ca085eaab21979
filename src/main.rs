use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use invoice_desk::commands::{dashboard, export, invoices, settings};
use invoice_desk::models::{InvoiceQuery, InvoiceStatus, SortBy, SortOrder};
use invoice_desk::services::validation::{InvoiceForm, ValidationErrors};
use invoice_desk::AppState;

#[derive(Parser)]
#[command(name = "invoice-desk", version, about = "Track invoices, payments and what is still outstanding")]
struct Cli {
    /// SQLite file holding invoices and settings
    #[arg(long, env = "INVOICE_DESK_DB", global = true)]
    db: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List invoices (filtered, sorted, paginated)
    List(ListArgs),
    /// Show one invoice
    Show { id: String },
    /// Create a new invoice
    Add(AddArgs),
    /// Mark an invoice as paid
    Pay {
        id: String,
        /// Payment date, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Amount received, defaults to the full invoice amount
        #[arg(long)]
        amount: Option<String>,
    },
    /// Summary cards and status distribution
    Summary,
    /// Export all invoices to CSV
    Export {
        /// Output file, `-` for stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    status: Option<InvoiceStatus>,
    #[arg(long, default_value = "date")]
    sort: SortBy,
    #[arg(long, default_value = "desc")]
    order: SortOrder,
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    customer: String,
    #[arg(long)]
    amount: String,
    /// Invoice date, defaults to today
    #[arg(long)]
    date: Option<String>,
    /// Payment terms in days (7, 15, 30, 45 or 60)
    #[arg(long)]
    terms: Option<String>,
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        currency_symbol: Option<String>,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        default_terms: Option<u32>,
    },
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;
    if let Err(err) = run(cli) {
        match err.downcast_ref::<ValidationErrors>() {
            Some(errors) if json => match serde_json::to_string_pretty(errors) {
                Ok(body) => println!("{}", body),
                Err(_) => eprintln!("Error: {:#}", err),
            },
            _ => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("invoice_desk=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_db_path() -> PathBuf {
    ProjectDirs::from("", "", "invoice-desk")
        .map(|dirs| dirs.data_dir().join("invoice-desk.sqlite"))
        .unwrap_or_else(|| PathBuf::from("invoice-desk.sqlite"))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db.unwrap_or_else(default_db_path);
    tracing::debug!(path = %db_path.display(), "opening invoice database");
    let mut state = AppState::open(&db_path)?;
    let json = cli.json;

    match cli.command {
        Commands::List(args) => {
            let query = InvoiceQuery {
                search: args.search,
                status: args.status,
                sort_by: args.sort,
                order: args.order,
                page: args.page,
            };
            let page = invoices::get_invoices(&state, &query);
            emit(json, &page, |page| invoices::render_page(page, &state.settings))
        }
        Commands::Show { id } => {
            let item = invoices::get_invoice_detail(&state, &id)?;
            emit(json, &item, |item| invoices::render_detail(item, &state.settings))
        }
        Commands::Add(args) => {
            let form = InvoiceForm {
                customer_name: args.customer,
                amount: Some(args.amount),
                invoice_date: Some(args.date.unwrap_or_else(|| invoice_desk::utils::today().to_string())),
                payment_terms: Some(
                    args.terms
                        .unwrap_or_else(|| state.settings.default_payment_terms.to_string()),
                ),
            };
            let item = invoices::add_invoice(&mut state, &form)?;
            emit(json, &item, |item| {
                format!("Created invoice\n{}", invoices::render_detail(item, &state.settings))
            })
        }
        Commands::Pay { id, date, amount } => {
            let payload = invoices::MarkPaidPayload {
                invoice_id: id,
                payment_date: date,
                payment_amount: amount,
            };
            match invoices::mark_invoice_paid(&mut state, &payload)? {
                Some(item) => emit(json, &item, |item| invoices::render_detail(item, &state.settings)),
                None => emit(json, &serde_json::Value::Null, |_| {
                    format!("No invoice with id {}", payload.invoice_id)
                }),
            }
        }
        Commands::Summary => {
            let stats = dashboard::get_dashboard_stats(&state);
            emit(json, &stats, |stats| dashboard::render_dashboard(stats, &state.settings))
        }
        Commands::Export { output } => {
            let target = export::ExportTarget::from_arg(output.as_deref());
            let text = export::export_invoices(&state, &target)?;
            println!("{}", text);
            Ok(())
        }
        Commands::Settings(SettingsCommand::Show) => {
            let current = settings::get_settings(&state);
            emit(json, &current, settings::render_settings)
        }
        Commands::Settings(SettingsCommand::Set {
            currency_symbol,
            page_size,
            default_terms,
        }) => {
            let saved = settings::save_settings(
                &mut state,
                settings::SettingsPayload {
                    currency_symbol,
                    page_size,
                    default_payment_terms: default_terms,
                },
            )?;
            emit(json, &saved, settings::render_settings)
        }
    }
}
