use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use quantity_takeoff::calc::{CalculationRequest, CalculationType};
use quantity_takeoff::services::{BackendClient, HandoffStore};
use quantity_takeoff::{app, config, logging};

#[derive(Parser, Debug)]
#[command(
    name = "quantity-takeoff",
    about = "Concrete and reinforcement quantity calculators with a report gateway",
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
    /// Run one calculator on a JSON input and print the result
    Calc(CalcArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override SERVER_ADDR
    #[arg(long)]
    addr: Option<String>,
}

#[derive(Args, Debug)]
struct CalcArgs {
    /// Calculation type, e.g. footing-concrete or beam-quantities
    #[arg(value_parser = parse_calculation_type)]
    calculation_type: CalculationType,
    /// Input JSON file ("-" reads stdin)
    #[arg(long, default_value = "-")]
    input: PathBuf,
    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

fn parse_calculation_type(value: &str) -> Result<CalculationType, String> {
    value.parse().map_err(|e: quantity_takeoff::calc::CalcError| {
        let known: Vec<_> = CalculationType::ALL.iter().map(|t| t.as_str()).collect();
        format!("{e}; expected one of: {}", known.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Calc(args)) => run_calc(args),
        Some(Command::Serve(args)) => serve(args).await,
        None => serve(ServeArgs::default()).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    // Load configuration
    let mut settings = config::Settings::from_env()?;
    if let Some(addr) = args.addr {
        settings.server_addr = addr;
    }

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        backend_api_url = %settings.backend_api_url,
        "Starting quantity take-off gateway"
    );

    let backend = BackendClient::new(
        &settings.backend_api_url,
        settings.backend_api_timeout_seconds,
    )?;

    // Optionally check backend health (non-blocking)
    tokio::spawn({
        let backend = backend.clone();
        async move {
            match backend.health_check().await {
                Ok(()) => tracing::info!("Backend API is healthy"),
                Err(e) => {
                    tracing::warn!(error = %e, "Backend API health check failed - saving reports may fail")
                }
            }
        }
    });

    let handoff =
        HandoffStore::connect(settings.redis_url.as_deref(), settings.handoff_ttl_seconds).await?;
    tracing::info!(store = handoff.backend_name(), "Hand-off store initialized");

    // Create application state
    let state = app::AppState::new(settings.clone(), backend, handoff);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn run_calc(args: CalcArgs) -> Result<()> {
    logging::init_cli_logging();

    let raw = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read input from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("Failed to read {}", args.input.display()))?
    };

    let input: serde_json::Value = serde_json::from_str(&raw).context("Input is not valid JSON")?;
    let request: CalculationRequest = serde_json::from_value(serde_json::json!({
        "type": args.calculation_type.as_str(),
        "input": input,
    }))
    .with_context(|| format!("Input does not match the {} calculator", args.calculation_type))?;

    let outcome = request.compute()?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{rendered}");

    Ok(())
}
