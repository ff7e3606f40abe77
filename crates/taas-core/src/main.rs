//! TaaS CLI
//!
//! Command-line interface for the TaaS Command Center core.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use tracing::{debug, info, warn};

use taas::alerting::{self, AlertFilter, SeverityCounts, SimulationDriver};
use taas::feed::SimulatedSeries;
use taas::models::{Alert, Severity};
use taas::settings::{Settings, SettingsStore};
use taas::time::{format_time_ago, now_millis};
use taas::Config;

/// TaaS - Command Center for industrial machines
#[derive(Parser)]
#[command(name = "taas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TAAS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and act on the alert feed
    Alerts {
        #[command(subcommand)]
        command: AlertsCommands,
    },

    /// Run the alert simulation and print alerts as they arrive
    Watch {
        /// Period between simulated alerts in milliseconds
        #[arg(long, env = "TAAS_WATCH_INTERVAL_MS")]
        interval_ms: Option<u64>,

        /// Stop after this many alerts
        #[arg(long)]
        ticks: Option<usize>,
    },

    /// Read or change dashboard settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Stream a simulated telemetry signal
    Telemetry {
        /// Signal to simulate
        #[arg(long, value_enum, default_value = "temperature")]
        signal: Signal,

        /// Number of samples to print
        #[arg(long, default_value = "10")]
        samples: usize,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum AlertsCommands {
    /// List alerts, newest first
    List {
        /// Only this severity (critical, warning, info)
        #[arg(long)]
        severity: Option<Severity>,

        /// Case-insensitive search over title, machine and description
        #[arg(long, default_value = "")]
        query: String,

        /// Hide acknowledged alerts
        #[arg(long)]
        hide_acknowledged: bool,
    },

    /// Acknowledge an alert
    Ack {
        /// Alert ID
        id: String,
    },

    /// Clear an alert
    Clear {
        /// Alert ID
        id: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show all settings
    Show,

    /// Change a setting
    Set {
        /// Setting key (e.g. realTimeSync)
        key: String,

        /// New value
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Signal {
    Temperature,
    Vibration,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config, cli.verbose);
    debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Alerts { command } => run_alerts(command, cli.format),
        Commands::Watch { interval_ms, ticks } => {
            run_watch(&config, interval_ms, ticks, cli.format).await
        }
        Commands::Settings { command } => run_settings(&config, command, cli.format),
        Commands::Telemetry { signal, samples } => {
            run_telemetry(&config, signal, samples, cli.format).await
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run_alerts(command: AlertsCommands, format: OutputFormat) -> anyhow::Result<()> {
    let store = alerting::global();
    store.initialize();

    let filter = match command {
        AlertsCommands::List {
            severity,
            query,
            hide_acknowledged,
        } => AlertFilter {
            severity,
            show_acknowledged: !hide_acknowledged,
            query,
        },
        AlertsCommands::Ack { id } => {
            if !store.acknowledge_alert(&id) {
                anyhow::bail!(taas::Error::not_found("Alert", id));
            }
            AlertFilter::default()
        }
        AlertsCommands::Clear { id } => {
            if !store.clear_alert(&id) {
                anyhow::bail!(taas::Error::not_found("Alert", id));
            }
            AlertFilter::default()
        }
    };

    let snapshot = store.snapshot();
    let shown = filter.apply(&snapshot);
    let counts = SeverityCounts::from_alerts(&snapshot);

    match format {
        OutputFormat::Json => {
            let alerts: Vec<&Alert> = shown.iter().map(|a| &**a).collect();
            let body = serde_json::json!({ "counts": counts, "alerts": alerts });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!(
                "{} unacknowledged of {} ({} critical, {} warning, {} info)",
                counts.unacknowledged, counts.total, counts.critical, counts.warning, counts.info
            );
            let now = now_millis();
            for alert in &shown {
                print_alert(alert, now);
            }
        }
    }

    Ok(())
}

fn print_alert(alert: &Alert, now_ms: i64) {
    let marker = if alert.acknowledged { "ack" } else { "new" };
    println!(
        "[{:<8}] {:<3} {:<40} {} ({}) {}",
        alert.severity.as_str().to_uppercase(),
        marker,
        alert.id,
        alert.title,
        alert.machine,
        format_time_ago(alert.timestamp, now_ms)
    );
    if let Some(m) = &alert.measurement {
        println!(
            "           {}: {} / {} ({:.0}%)",
            m.metric,
            m.value,
            m.threshold,
            m.fill_ratio() * 100.0
        );
    }
}

async fn run_watch(
    config: &Config,
    interval_ms: Option<u64>,
    ticks: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let period = interval_ms
        .map(Duration::from_millis)
        .unwrap_or(config.simulation.interval);
    if period.is_zero() {
        anyhow::bail!(taas::Error::validation("simulation interval must be positive"));
    }

    let store = alerting::global().clone();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    let subscription = store.subscribe(Arc::new(move || {
        let _ = tx.send(());
    }));

    let mut head = store.snapshot().first().map(|a| a.id.clone());
    info!(
        alerts = store.snapshot().len(),
        unacknowledged = store.unacknowledged_count(),
        "Watching alert feed"
    );

    let driver = SimulationDriver::with_default_templates(store.clone(), period);
    let handle = if config.simulation.enabled || interval_ms.is_some() {
        Some(driver.start())
    } else {
        warn!("Alert simulation disabled in configuration, waiting for changes");
        None
    };
    let mut received = 0usize;

    loop {
        tokio::select! {
            Some(()) = rx.recv() => {
                let snapshot = store.snapshot();
                let fresh: Vec<_> = snapshot
                    .iter()
                    .take_while(|a| Some(&a.id) != head.as_ref())
                    .cloned()
                    .collect();
                head = snapshot.first().map(|a| a.id.clone());

                let now = now_millis();
                for alert in fresh.iter().rev() {
                    match format {
                        OutputFormat::Json => println!("{}", serde_json::to_string(&**alert)?),
                        OutputFormat::Text => print_alert(alert, now),
                    }
                    received += 1;
                }

                if ticks.is_some_and(|limit| received >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, stopping simulation");
                break;
            }
        }
    }

    if let Some(handle) = handle {
        handle.stop();
    }
    subscription.unsubscribe();
    info!(received, unacknowledged = store.unacknowledged_count(), "Watch finished");
    Ok(())
}

fn run_settings(config: &Config, command: SettingsCommands, format: OutputFormat) -> anyhow::Result<()> {
    let mut store = SettingsStore::open(&config.settings);

    if let SettingsCommands::Set { key, value } = command {
        store.set(&key, value)?;
        info!(key = %key, value, path = %store.path().display(), "Setting saved");
    }

    let settings = store.settings();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
        OutputFormat::Text => {
            for (key, value) in settings.entries() {
                println!("{key:<24} {value}");
            }
            let extras = store.extra_keys();
            if !extras.is_empty() {
                println!("(ignored keys: {})", extras.join(", "));
            }
        }
    }

    debug!(known = Settings::KEYS.len(), "Settings shown");
    Ok(())
}

async fn run_telemetry(
    config: &Config,
    signal: Signal,
    samples: usize,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (mut series, period, unit) = match signal {
        Signal::Temperature => (
            SimulatedSeries::temperature(),
            config.telemetry.temperature_interval,
            "°C",
        ),
        Signal::Vibration => (
            SimulatedSeries::vibration(),
            config.telemetry.vibration_interval,
            "mm/s",
        ),
    };

    if period.is_zero() {
        anyhow::bail!(taas::Error::validation("telemetry interval must be positive"));
    }

    info!(?signal, period = %humantime::format_duration(period), samples, "Streaming simulated telemetry");

    let mut ticker = tokio::time::interval(period);
    let mut rng = rand::rngs::StdRng::from_entropy();

    for _ in 0..samples {
        ticker.tick().await;
        let sample = series.push_sample(now_millis(), &mut rng);

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&sample)?),
            OutputFormat::Text => {
                let state = if series.is_elevated() { "ELEVATED" } else { "STABLE" };
                println!(
                    "{} {:>8.2} {unit:<5} limit {:.1} {state}",
                    chrono::Utc::now().format("%H:%M:%S"),
                    sample.value,
                    series.limit()
                );
            }
        }
    }

    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "taas", &mut io::stdout());
}
