use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use circuit_test_service::api;
use circuit_test_service::classification::{MeasurementKind, ThresholdTable};
use circuit_test_service::config::{CheckArgs, Cli, Mode, ScheduleArgs, ServeArgs};
use circuit_test_service::presentation::Treatment;
use circuit_test_service::schedule::Schedule;
use circuit_test_service::service::state::create_shared_state_with;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with colors and stderr output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "circuit_test_service=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Require a mode
    let Some(mode) = cli.mode.clone() else {
        eprintln!("Error: Please specify a mode (serve, check or schedule)");
        eprintln!("Use --help for usage information");
        std::process::exit(1);
    };

    let thresholds = cli.load_thresholds()?;

    match mode {
        Mode::Serve(args) => serve(args, thresholds).await?,
        Mode::Check(args) => check(args, &thresholds),
        Mode::Schedule(args) => schedule(args, &thresholds)?,
    }

    Ok(())
}

/// Run the HTTP service until Ctrl+C
async fn serve(
    args: ServeArgs,
    thresholds: ThresholdTable,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting circuit test service on {}:{}",
        args.host,
        args.listen
    );

    let state = create_shared_state_with(thresholds);

    let router = api::create_router(state);
    let addr: SocketAddr = format!("{}:{}", args.host, args.listen).parse()?;

    tracing::info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");

    Ok(())
}

/// Classify one reading and print the verdict
fn check(args: CheckArgs, thresholds: &ThresholdTable) {
    let kind = MeasurementKind::from(args.kind);
    let result = thresholds.classify(kind, &args.value, args.max_zs.as_deref());
    let treatment = Treatment::for_result(result);

    let unit = kind.unit().unwrap_or("");
    println!(
        "{} {}{}: {} [{}]",
        kind.label(),
        args.value,
        unit,
        result,
        treatment.border_style
    );
}

/// Classify a schedule file and print the report
fn schedule(
    args: ScheduleArgs,
    thresholds: &ThresholdTable,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut schedule = Schedule::load(&args.file)?;
    let report = schedule.classify(thresholds);

    if let Some(out) = &args.fill_max_zs {
        schedule.resolve_max_zs();
        std::fs::write(out, serde_json::to_string_pretty(&schedule)?)?;
        tracing::info!("Wrote filled schedule to {}", out.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
        if let Some(rate) = report.pass_rate() {
            println!("Pass rate: {:.1}%", rate * 100.0);
        }
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C)
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
