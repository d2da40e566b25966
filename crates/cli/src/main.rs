use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use matcher::QuoteOutcome;
use quote::{GvwRange, PayoutQuery, VehicleAge};
use rate_store::{BusinessType, VehicleCategory};
use server::{InMemoryRowStore, QuoteOrchestrator, RowStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// POSP Payout Checker - insurer commission lookup
#[derive(Parser)]
#[command(name = "posp-payout")]
#[command(about = "Check which insurer payout offers apply and in what order", long_about = None)]
struct Cli {
    /// Path to the published rate sheet
    #[arg(short, long, default_value = "data/rates.tsv")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one resolved query and show the ranked offers
    Quote {
        /// State code or display name (TN, "Tamil Nadu", Others)
        #[arg(long)]
        state: String,

        /// RTO code, only for RTO-enabled states (e.g. TN-01 or 01)
        #[arg(long)]
        rto: Option<String>,

        /// Vehicle category (Two Wheeler, Private Car, GCV, PCV, Misc)
        #[arg(long)]
        category: String,

        /// Vehicle type within the category (Bike, Sedan, 4 Wheeler Goods, ...)
        #[arg(long)]
        vehicle_type: String,

        #[arg(long)]
        make: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        fuel: Option<String>,

        #[arg(long)]
        cc_slab: Option<String>,

        #[arg(long)]
        watt_slab: Option<String>,

        /// GVW in tons (lower bound, or the single value)
        #[arg(long)]
        gvw: Option<f64>,

        /// Upper GVW bound when querying an interval
        #[arg(long)]
        gvw_max: Option<f64>,

        /// Vehicle age: New or 1..50
        #[arg(long, default_value = "New")]
        age: String,

        /// Business type: New, Old, Renewal, Rollover
        #[arg(long, default_value = "New")]
        business: String,

        /// Policy type (Package, SATP, SAOD, Bundle(1+3), ...)
        #[arg(long)]
        policy: String,

        /// Evaluation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Number of ranked groups to return
        #[arg(long, default_value = "5")]
        top: usize,

        /// Show why each rejected candidate dropped out
        #[arg(long)]
        explain: bool,
    },

    /// List selectable option values derived from the snapshot
    Options {
        /// Restrict vehicle types to one category
        #[arg(long)]
        category: Option<String>,
    },

    /// List insurers present in the snapshot
    Companies,

    /// Run a quote throughput benchmark
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent workers
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Load the rate sheet (this may take a moment for big sheets)
    println!("Loading rate sheet from {}...", cli.data.display());
    let start = Instant::now();
    let store = Arc::new(
        InMemoryRowStore::load(&cli.data).context("Failed to load rate sheet")?,
    );
    println!("{} Loaded in {:?}", "✓".green(), start.elapsed());

    match cli.command {
        Commands::Quote {
            state,
            rto,
            category,
            vehicle_type,
            make,
            model,
            fuel,
            cc_slab,
            watt_slab,
            gvw,
            gvw_max,
            age,
            business,
            policy,
            date,
            top,
            explain,
        } => {
            let query = build_query(
                state, rto, category, vehicle_type, make, model, fuel, cc_slab, watt_slab,
                gvw, gvw_max, age, business, policy, date,
            )?;
            handle_quote(store, query, top, explain)?
        }
        Commands::Options { category } => handle_options(store, category)?,
        Commands::Companies => handle_companies(store)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(store, requests, concurrent).await?,
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_query(
    state: String,
    rto: Option<String>,
    category: String,
    vehicle_type: String,
    make: Option<String>,
    model: Option<String>,
    fuel: Option<String>,
    cc_slab: Option<String>,
    watt_slab: Option<String>,
    gvw: Option<f64>,
    gvw_max: Option<f64>,
    age: String,
    business: String,
    policy: String,
    date: Option<String>,
) -> Result<PayoutQuery> {
    let category: VehicleCategory = category.parse().map_err(|e: String| anyhow!(e))?;
    let business: BusinessType = business.parse().map_err(|e: String| anyhow!(e))?;

    let mut query = PayoutQuery::new(state, category, vehicle_type, business, policy);
    query.rto_code = rto;
    query.make = make;
    query.model = model;
    query.fuel_type = fuel;
    query.cc_slab = cc_slab;
    query.watt_slab = watt_slab;
    query.age = age.parse::<VehicleAge>().map_err(|e| anyhow!(e))?;
    query.gvw = gvw.map(|min| GvwRange::new(min, gvw_max.unwrap_or(min)));
    if let Some(date) = date {
        query.evaluation_date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .context("--date must be YYYY-MM-DD")?;
    }
    Ok(query)
}

/// Handle the 'quote' command
fn handle_quote(
    store: Arc<InMemoryRowStore>,
    query: PayoutQuery,
    top: usize,
    explain: bool,
) -> Result<()> {
    let orchestrator = QuoteOrchestrator::new(store).with_top_k(top);

    let start = Instant::now();
    let outcome = orchestrator.get_quotes(&query)?;
    let elapsed = start.elapsed();

    println!();
    println!(
        "{}",
        format!(
            "Payouts for {} / {} / {}",
            query.state_code(),
            query.category,
            query.vehicle_type
        )
        .bold()
    );

    match &outcome {
        QuoteOutcome::NoMatch { message } => {
            println!("{} {}", "∅".yellow(), message.yellow());
        }
        QuoteOutcome::Matches { entries } => {
            for entry in entries {
                println!(
                    "{} {}",
                    format!("#{}", entry.rank).bold(),
                    entry.company.blue().bold()
                );
                for line in &entry.lines {
                    let condition = if line.condition.is_empty() {
                        "General"
                    } else {
                        line.condition.as_str()
                    };
                    println!(
                        "    {}  {}",
                        format!("{:>6.2}%", line.payout).green(),
                        condition
                    );
                }
            }
        }
    }
    println!("\nEvaluated in {:?}", elapsed);

    if explain {
        let rejections = orchestrator.explain_rejections(&query)?;
        if rejections.is_empty() {
            println!("{}", "Every candidate row matched.".dimmed());
        } else {
            println!("{}", "Rejected candidates:".bold());
            for rejection in rejections {
                println!(
                    "  row #{:<4} {:<24} failed on {}",
                    rejection.row_id,
                    rejection.company,
                    rejection.dimension.red()
                );
            }
        }
    }

    Ok(())
}

/// Handle the 'options' command
fn handle_options(store: Arc<InMemoryRowStore>, category: Option<String>) -> Result<()> {
    let snapshot = store.snapshot()?;
    let projections = snapshot.projections();

    let section = |title: &str, values: &[String]| {
        println!("{}", title.bold());
        if values.is_empty() {
            println!("  {}", "(none)".dimmed());
        } else {
            println!("  {}", values.join(", "));
        }
    };

    section("States", &projections.states);
    section("Vehicle categories", &projections.vehicle_categories);

    match category {
        Some(name) => {
            let category: VehicleCategory = name.parse().map_err(|e: String| anyhow!(e))?;
            let types = projections
                .vehicle_types
                .get(&category)
                .cloned()
                .unwrap_or_default();
            section(&format!("Vehicle types ({category})"), &types);
        }
        None => {
            for (category, types) in &projections.vehicle_types {
                section(&format!("Vehicle types ({category})"), types);
            }
        }
    }

    section("Fuel types", &projections.fuel_types);
    section("Policy types", &projections.policy_types);
    section("Business types", &projections.business_types);
    section("Makes", &projections.makes);
    section("Models", &projections.models);

    Ok(())
}

/// Handle the 'companies' command
fn handle_companies(store: Arc<InMemoryRowStore>) -> Result<()> {
    let snapshot = store.snapshot()?;
    let diagnostics = snapshot.diagnostics();

    println!(
        "{}",
        format!(
            "{} insurers across {} rows ({} skipped at load)",
            snapshot.projections().companies.len(),
            diagnostics.total_rows,
            diagnostics.skipped_rows
        )
        .bold()
    );
    for company in &snapshot.projections().companies {
        let rows = snapshot
            .rows()
            .iter()
            .filter(|r| r.company.eq_ignore_ascii_case(company))
            .count();
        println!("  {} {} ({} rows)", "•".cyan(), company, rows);
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    store: Arc<InMemoryRowStore>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    use rand::prelude::*;

    let snapshot = store.snapshot()?;
    let states: Vec<String> = snapshot.projections().states.clone();
    if states.is_empty() {
        return Err(anyhow!("snapshot is empty, nothing to benchmark"));
    }

    let orchestrator = Arc::new(QuoteOrchestrator::new(store));
    let categories = [
        (VehicleCategory::TwoWheeler, "Bike"),
        (VehicleCategory::PrivateCar, "Sedan"),
        (VehicleCategory::Gcv, "4 Wheeler Goods"),
        (VehicleCategory::Pcv, "Taxi"),
    ];

    println!(
        "Running {} requests with {} concurrent workers...",
        requests, concurrent
    );
    let start = Instant::now();

    let per_worker = requests.div_ceil(concurrent);
    let mut handles = Vec::new();
    for _ in 0..concurrent {
        let orchestrator = orchestrator.clone();
        let states = states.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let mut rng = rand::rng();
            let mut served = 0usize;
            for _ in 0..per_worker {
                let state = &states[rng.random_range(0..states.len())];
                let (category, vehicle_type) = categories[rng.random_range(0..categories.len())];
                let mut query = PayoutQuery::new(
                    state.clone(),
                    category,
                    vehicle_type,
                    BusinessType::Old,
                    "Package",
                );
                query.age = VehicleAge::Years(rng.random_range(1..=10));
                if orchestrator.get_quotes(&query).is_ok() {
                    served += 1;
                }
            }
            served
        }));
    }

    let mut served = 0usize;
    for handle in handles {
        served += handle.await?;
    }
    let elapsed = start.elapsed();

    let total = per_worker * concurrent;
    println!(
        "{} {} requests in {:?} ({:.0} quotes/sec, {} served without error)",
        "✓".green(),
        total,
        elapsed,
        total as f64 / elapsed.as_secs_f64(),
        served
    );
    Ok(())
}
