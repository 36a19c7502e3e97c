use axum::{extract::DefaultBodyLimit, routing::get, Router};
use configuration::Settings;
use database::{DbRepository, PortfolioStore};
use reporter::Reporter;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};
// Note: Tracing is initialised by the binary, not here.

pub mod error;
pub mod extract;
pub mod handlers;


/// The shared application state that all handlers can access.
#[derive(Debug)]
pub struct AppState {
    pub store: Arc<dyn PortfolioStore>,
    pub reporter: Reporter,
}

impl AppState {
    pub fn new(store: Arc<dyn PortfolioStore>) -> Self {
        Self { store, reporter: Reporter::new() }
    }
}

/// Builds the application router with all routes and middleware attached.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/portfolio/financial-summary", get(handlers::get_financial_summary))
        .route("/api/portfolio/cash-flow", get(handlers::get_cash_flow))
        .route("/api/portfolio/expense-breakdown", get(handlers::get_expense_breakdown))
        .route("/api/properties", get(handlers::list_properties).post(handlers::create_property))
        .route("/api/properties/:id", get(handlers::get_property))
        .route("/api/income", get(handlers::list_income).post(handlers::create_income))
        .route("/api/expenses", get(handlers::list_expenses).post(handlers::create_expense))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB is plenty for JSON rows
}

/// Connects to the database, applies migrations and serves the API until
/// the process is stopped.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let store: Arc<dyn PortfolioStore> = Arc::new(DbRepository::new(db_pool));

    let router = app(Arc::new(AppState::new(store)));

    let addr = settings.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
