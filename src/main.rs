use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use lost_found_desk::config::AppConfig;
use lost_found_desk::desk::{
    desk_router, parse_estimated_value, Category, FileAuditLog, Item, ItemDetails,
    LostFoundDesk, LostItemQuery, QualificationCriteria, RuleCheck, StoreStatistics,
    SubmissionOutcome,
};
use lost_found_desk::error::AppError;
use lost_found_desk::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "lost-found-desk",
    about = "Run the lost-and-found desk service or operate on its item store",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Qualify a found-item report and store it when accepted
    Submit(SubmitArgs),
    /// Rank active items against a lost-item description
    Search(SearchArgs),
    /// List stored items
    List(ListArgs),
    /// Mark an item as removed by id or id prefix
    Remove(RemoveArgs),
    /// Show item counts
    Stats,
    /// Show the qualification criteria
    Criteria,
    /// Write items to a CSV file
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    /// One of Wallet, Bag, Electronics, Documents, Clothing, Keys, Others
    #[arg(long, default_value = "Others")]
    category: String,
    /// Date the item was found (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    date_found: Option<NaiveDate>,
    #[arg(long)]
    location: String,
    /// Phone number or e-mail of the finder
    #[arg(long)]
    contact: String,
    /// Estimated value; unparseable input counts as 0
    #[arg(long, default_value = "0")]
    value: String,
    #[arg(long)]
    perishable: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    location: String,
    /// Similarity threshold for this run (0.0 to 1.0)
    #[arg(long)]
    threshold: Option<f64>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Include removed items
    #[arg(long)]
    include_removed: bool,
}

#[derive(Args, Debug)]
struct RemoveArgs {
    /// Full id or a unique prefix such as the 8-character short id
    id: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Destination CSV file
    #[arg(long)]
    output: PathBuf,
    /// Include removed items
    #[arg(long)]
    include_removed: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Submit(args) => run_submit(&mut open_desk()?, args),
        Command::Search(args) => run_search(&mut open_desk()?, args),
        Command::List(args) => {
            render_items(&open_desk()?.items(args.include_removed));
            Ok(())
        }
        Command::Remove(args) => run_remove(&mut open_desk()?, &args.id),
        Command::Stats => {
            let desk = open_desk()?;
            render_statistics(&desk.statistics(Local::now().date_naive()), desk.threshold());
            Ok(())
        }
        Command::Criteria => {
            render_criteria(&open_desk()?.criteria());
            Ok(())
        }
        Command::Export(args) => run_export(&open_desk()?, args),
    }
}

/// Load configuration and the item store for a one-shot command.
fn open_desk() -> Result<LostFoundDesk<FileAuditLog>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let audit = Arc::new(FileAuditLog::new(config.desk.audit_path.clone()));
    Ok(LostFoundDesk::open(&config.desk, audit)?)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let audit = Arc::new(FileAuditLog::new(config.desk.audit_path.clone()));
    let desk = Arc::new(Mutex::new(LostFoundDesk::open(&config.desk, audit)?));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(desk_router(desk))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);
    info!(
        ?config.environment,
        %addr,
        store = %config.desk.store_path.display(),
        "lost and found desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_submit(desk: &mut LostFoundDesk<FileAuditLog>, args: SubmitArgs) -> Result<(), AppError> {
    let details = ItemDetails {
        name: args.name,
        description: args.description,
        category: Category::parse_or_default(&args.category),
        date_found: args
            .date_found
            .unwrap_or_else(|| Local::now().date_naive()),
        location: args.location,
        contact: args.contact,
        estimated_value: parse_estimated_value(&args.value),
        perishable: args.perishable,
    };

    render_checklist(&desk.evaluate_all(&details));
    match desk.submit(details)? {
        SubmissionOutcome::Accepted { item, persisted } => {
            println!("\nAccepted: {} ({})", item.name(), item.id());
            if !persisted {
                println!("Warning: the item is held in memory only; saving to disk failed");
            }
        }
        SubmissionOutcome::Rejected { reason } => {
            println!("\nRejected: {reason}");
            println!("  {}", reason.detail());
        }
    }
    Ok(())
}

fn run_search(desk: &mut LostFoundDesk<FileAuditLog>, args: SearchArgs) -> Result<(), AppError> {
    if let Some(threshold) = args.threshold {
        if !desk.set_threshold(threshold) {
            println!(
                "Threshold {threshold} ignored; keeping {:.2}",
                desk.threshold()
            );
        }
    }

    let query = LostItemQuery {
        name: args.name,
        description: args.description,
        location: args.location,
    };
    let matches = desk.search(&query)?;

    println!(
        "Search: \"{}\" (threshold {:.2})",
        query.combined_text(),
        desk.threshold()
    );
    if matches.is_empty() {
        println!("No matching items found");
        return Ok(());
    }
    for (rank, found) in matches.iter().enumerate() {
        let details = found.item.details();
        let terms: Vec<&str> = found.matched_terms.iter().map(String::as_str).collect();
        println!(
            "{:>2}. [{:.2}] {} {} ({}) at {} - matched: {}",
            rank + 1,
            found.score,
            found.item.id().short(),
            details.name,
            details.category,
            details.location,
            terms.join(", ")
        );
    }
    Ok(())
}

fn run_remove(desk: &mut LostFoundDesk<FileAuditLog>, id: &str) -> Result<(), AppError> {
    let receipt = desk.remove(id)?;
    if receipt.outcome.changed() {
        println!("Removed item {}", receipt.outcome.id());
        if !receipt.persisted {
            println!("Warning: removal is held in memory only; saving to disk failed");
        }
    } else {
        println!("Item {} was already removed", receipt.outcome.id());
    }
    Ok(())
}

fn run_export(desk: &LostFoundDesk<FileAuditLog>, args: ExportArgs) -> Result<(), AppError> {
    let file = File::create(&args.output)?;
    let items = desk.items(args.include_removed);
    let rows =
        lost_found_desk::desk::export::write_csv(BufWriter::new(file), items.iter().copied())?;
    println!("Exported {rows} items to {}", args.output.display());
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn render_checklist(checks: &[RuleCheck]) {
    println!("Qualification checklist");
    for check in checks {
        let mark = if check.outcome.is_pass() {
            "PASS"
        } else {
            "FAIL"
        };
        println!("- [{mark}] {}", check.label);
    }
}

fn render_items(items: &[&Item]) {
    if items.is_empty() {
        println!("No items stored");
        return;
    }
    println!("{} item(s)", items.len());
    for item in items {
        let details = item.details();
        println!(
            "- {} {} [{}] found {} at {}, value {:.2}{}, {}",
            item.id().short(),
            details.name,
            details.category,
            details.date_found,
            details.location,
            details.estimated_value,
            if details.perishable {
                " (perishable)"
            } else {
                ""
            },
            item.status().label()
        );
    }
}

fn render_statistics(stats: &StoreStatistics, threshold: f64) {
    println!("Lost and found statistics");
    println!("- Total items: {}", stats.total);
    println!("- Active: {}", stats.active);
    println!("- Removed: {}", stats.removed);
    println!("- Found today: {}", stats.found_today);
    println!("- Similarity threshold: {threshold:.2}");
}

fn render_criteria(criteria: &QualificationCriteria) {
    println!("Qualification rules (checked in order)");
    for (idx, rule) in criteria.rules.iter().enumerate() {
        println!("{}. {}", idx + 1, rule);
    }
    println!(
        "\nItems need an estimated value of at least {:.2} or a valuable keyword.",
        criteria.minimum_value
    );
    println!(
        "Perishable items need an estimated value of at least {:.2}.",
        criteria.perishable_minimum_value
    );
    println!("\nAccepted objects: {}", criteria.acceptable_keywords.join(", "));
    println!("Always kept: {}", criteria.high_value_keywords.join(", "));
    println!("Not accepted: {}", criteria.excluded_keywords.join(", "));
    println!("Disposables: {}", criteria.disposable_keywords.join(", "));
    println!("Not tangible: {}", criteria.non_tangible_keywords.join(", "));
}
