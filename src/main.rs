use analytics::{CategoryTotal, FinancialSummaryReport, PropertyTotal};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use configuration::{load_config, LogFormat, Settings};
use core_types::{NewLedgerEntry, NewProperty, Period};
use database::{DbRepository, PortfolioStore};
use reporter::{Reporter, SummaryRequest};
use rust_decimal::Decimal;
use std::net::IpAddr;
use uuid::Uuid;

/// The main entry point for the Rentfolio application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = load_config().context("Failed to load configuration")?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::Summary(args) => handle_summary(args, &connect_store(&settings).await?).await,
        Commands::AddProperty(args) => {
            handle_add_property(args, &connect_store(&settings).await?).await
        }
        Commands::AddIncome(args) => {
            let entry = args.into_entry();
            entry.validate()?;
            let store = connect_store(&settings).await?;
            let row = store.create_income(entry).await?;
            println!("Recorded income {} ({} {})", row.id, row.amount, row.category);
            Ok(())
        }
        Commands::AddExpense(args) => {
            let entry = args.into_entry();
            entry.validate()?;
            let store = connect_store(&settings).await?;
            let row = store.create_expense(entry).await?;
            println!("Recorded expense {} ({} {})", row.id, row.amount, row.category);
            Ok(())
        }
    }
}

/// Connects to PostgreSQL and brings the schema up to date.
async fn connect_store(settings: &Settings) -> anyhow::Result<DbRepository> {
    let pool = database::connect(&settings.database).await?;
    database::run_migrations(&pool).await?;
    Ok(DbRepository::new(pool))
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Portfolio finance for landlords: record properties, income and expenses,
/// and report on cash flow and returns.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Overrides `logging.format` from the configuration.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API.
    Serve(ServeArgs),
    /// Print the portfolio financial summary for a date range.
    Summary(SummaryArgs),
    /// Add a property to the portfolio.
    AddProperty(AddPropertyArgs),
    /// Record an income row against a property.
    AddIncome(LedgerArgs),
    /// Record an expense row against a property.
    AddExpense(LedgerArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<IpAddr>,
    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct SummaryArgs {
    /// First day of the range (format: YYYY-MM-DD). Defaults to the start of this month.
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the range (format: YYYY-MM-DD). Defaults to the end of this month.
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Bucket size for the time series: monthly, quarterly or yearly.
    #[arg(long, default_value = "monthly")]
    period: Period,
    /// Print the raw JSON report instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AddPropertyArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    purchase_price: Decimal,
    #[arg(long)]
    current_value: Option<Decimal>,
}

#[derive(Parser)]
struct LedgerArgs {
    #[arg(long)]
    property: Uuid,
    #[arg(long)]
    amount: Decimal,
    #[arg(long)]
    category: String,
    /// Booking date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
}

impl LedgerArgs {
    fn into_entry(self) -> NewLedgerEntry {
        NewLedgerEntry {
            property_id: self.property,
            amount: self.amount,
            category: self.category,
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            description: self.description,
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    web_server::run_server(&settings).await
}

async fn handle_add_property(args: AddPropertyArgs, store: &dyn PortfolioStore) -> anyhow::Result<()> {
    let payload = NewProperty {
        name: args.name,
        address: args.address,
        purchase_price: args.purchase_price,
        current_value: args.current_value,
    };
    payload.validate()?;
    let property = store.create_property(payload).await?;
    println!("Created property {} ({})", property.id, property.name);
    Ok(())
}

async fn handle_summary(args: SummaryArgs, store: &dyn PortfolioStore) -> anyhow::Result<()> {
    let request = SummaryRequest {
        start_date: args.from,
        end_date: args.to,
        period: args.period,
    };
    let report = Reporter::new()
        .financial_summary(store, &request, Utc::now().date_naive())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &FinancialSummaryReport) {
    let s = &report.summary;
    let mut headline = new_table(&["Metric", "Value", "Change %"]);
    headline.add_row(money_row("Total income", s.total_income, Some(s.income_change_percent)));
    headline.add_row(money_row("Total expenses", s.total_expenses, Some(s.expenses_change_percent)));
    headline.add_row(money_row("Net cash flow", s.net_cash_flow, Some(s.cash_flow_change_percent)));
    headline.add_row(money_row("Portfolio value", s.portfolio_value, None));
    headline.add_row(money_row("Portfolio ROI %", s.portfolio_roi, None));
    println!("{headline}");

    print_categories("Income by category", &report.income_by_category);
    print_categories("Expenses by category", &report.expenses_by_category);
    print_properties("Income by property", &report.income_by_property);
    print_properties("Expenses by property", &report.expenses_by_property);

    let mut roi = new_table(&["Property", "Income", "Expenses", "Net", "Value", "ROI %"]);
    for line in &report.property_roi {
        roi.add_row(vec![
            Cell::new(&line.property_name),
            amount_cell(line.income),
            amount_cell(line.expenses),
            amount_cell(line.net_cash_flow),
            amount_cell(line.property_value),
            amount_cell(line.roi),
        ]);
    }
    println!("\nProperty ROI\n{roi}");

    let mut series = new_table(&["Period", "Income", "Expenses", "Cash flow"]);
    for point in &report.time_series_data {
        series.add_row(vec![
            Cell::new(&point.label),
            amount_cell(point.income),
            amount_cell(point.expenses),
            amount_cell(point.cash_flow),
        ]);
    }
    println!("\nTime series\n{series}");
}

fn print_categories(title: &str, totals: &[CategoryTotal]) {
    let mut table = new_table(&["Category", "Amount", "Share %"]);
    for total in totals {
        table.add_row(vec![
            Cell::new(&total.category),
            amount_cell(total.amount),
            amount_cell(total.percentage),
        ]);
    }
    println!("\n{title}\n{table}");
}

fn print_properties(title: &str, totals: &[PropertyTotal]) {
    let mut table = new_table(&["Property", "Amount"]);
    for total in totals {
        table.add_row(vec![Cell::new(&total.property_name), amount_cell(total.amount)]);
    }
    println!("\n{title}\n{table}");
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    table
}

fn amount_cell(value: Decimal) -> Cell {
    Cell::new(value.round_dp(2)).set_alignment(CellAlignment::Right)
}

fn money_row(label: &str, value: Decimal, change: Option<Decimal>) -> Vec<Cell> {
    vec![
        Cell::new(label),
        amount_cell(value),
        change.map(amount_cell).unwrap_or_else(|| Cell::new("")),
    ]
}
