use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qms_client::api::{check_connection, log_probe_outcome, spawn_probe, ProbeStatus};
use qms_client::models::{Acknowledgement, DashboardKpis};
use qms_client::{ApiClient, ClientConfig, Filters};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Command-line client for the QMS REST API
#[derive(Parser, Debug)]
#[command(name = "qmsc", version, about, long_about = None)]
struct Args {
    /// API root (overrides QMS_API_BASE_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Extra default header, NAME=VALUE (repeatable)
    #[arg(long = "header", value_parser = parse_key_val, global = true)]
    headers: Vec<(String, String)>,

    /// Whole-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Maximum number of requests in flight
    #[arg(long, global = true)]
    max_concurrent: Option<usize>,

    /// Skip the background connectivity check
    #[arg(long, global = true)]
    no_probe: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the backend answers at its root
    Probe,
    /// List every endpoint this client knows
    Endpoints,
    /// Show or persist the effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(subcommand)]
    Users(UsersCmd),
    #[command(subcommand)]
    Deviations(DeviationsCmd),
    #[command(subcommand)]
    Capa(CapaCmd),
    #[command(subcommand)]
    Monitoring(MonitoringCmd),
    #[command(subcommand)]
    Dashboard(DashboardCmd),
    #[command(subcommand)]
    Reports(ReportsCmd),
    #[command(subcommand)]
    Batches(BatchesCmd),
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    Save,
}

#[derive(Subcommand, Debug)]
enum UsersCmd {
    List,
    Get { id: String },
}

#[derive(Subcommand, Debug)]
enum DeviationsCmd {
    List {
        /// Filter, KEY=VALUE (repeatable), e.g. status=Open
        #[arg(long = "filter", value_parser = parse_key_val)]
        filters: Vec<(String, String)>,
    },
    Get { id: String },
    /// Create from inline JSON or @file
    Create { body: String },
    Update { id: String, body: String },
    Delete { id: String },
    Stats,
}

#[derive(Subcommand, Debug)]
enum CapaCmd {
    List,
    Get { id: String },
    Create { body: String },
    Update { id: String, body: String },
    ByDeviation { deviation_id: String },
    Stats,
}

#[derive(Subcommand, Debug)]
enum MonitoringCmd {
    Environmental {
        #[arg(long)]
        location: Option<String>,
    },
    Process,
    Record { body: String },
}

#[derive(Subcommand, Debug)]
enum DashboardCmd {
    Kpis,
    Trends,
    Activity,
    /// KPIs, trends and recent activity fetched concurrently
    Summary,
}

#[derive(Subcommand, Debug)]
enum ReportsCmd {
    List,
    Generate { body: String },
}

#[derive(Subcommand, Debug)]
enum BatchesCmd {
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("qmsc started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("qms-client").join("qmsc.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".qms-client").join("qmsc.log");
    }
    PathBuf::from("qmsc.log")
}

/// Effective configuration: CLI > env > config file > defaults
fn build_config(args: &Args) -> ClientConfig {
    let mut config = ClientConfig::load().with_env_overrides();

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    for (name, value) in &args.headers {
        config = config.with_header(name.clone(), value.clone());
    }
    if let Some(ms) = args.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    if let Some(limit) = args.max_concurrent {
        config = config.with_max_concurrent_requests(limit);
    }

    config
}

/// Parse a JSON body given inline or as `@path`
fn read_body(arg: &str) -> Result<Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read body file {}", path))?
        }
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("Body is not valid JSON")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a write acknowledgement, falling back to raw JSON
fn print_ack(value: &Value) -> Result<()> {
    match serde_json::from_value::<Acknowledgement>(value.clone()) {
        Ok(Acknowledgement {
            id: Some(id),
            message: Some(message),
            ..
        }) => {
            println!("{} (id {})", message, id);
            Ok(())
        }
        _ => print_json(value),
    }
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Probe => {
            let outcome = check_connection(client).await;
            log_probe_outcome(&outcome);
            match outcome.status {
                ProbeStatus::Connected { version } => {
                    println!(
                        "API server connected at {} (version {})",
                        outcome.url,
                        version.as_deref().unwrap_or("unknown")
                    );
                }
                ProbeStatus::Unreachable { reason } => {
                    anyhow::bail!(
                        "API server not running at {}: {}. Please start the backend server.",
                        outcome.url,
                        reason
                    );
                }
            }
        }
        Command::Endpoints => {
            for (resource, endpoints) in qms_client::resource::all_endpoints() {
                for endpoint in endpoints {
                    println!("{:<11} {:<7} {}", resource, endpoint.method, endpoint.path);
                }
            }
        }
        Command::Config { action } => match action {
            ConfigAction::Show => println!("{}", serde_json::to_string_pretty(client.config())?),
            ConfigAction::Save => {
                client.config().save().context("Failed to save config")?;
                if let Some(path) = ClientConfig::config_path() {
                    println!("Saved {:?}", path);
                }
            }
        },
        Command::Users(cmd) => {
            let users = client.users();
            match cmd {
                UsersCmd::List => print_json(&Value::Array(users.get_all().await?))?,
                UsersCmd::Get { id } => print_json(&users.get_by_id(&id).await?)?,
            }
        }
        Command::Deviations(cmd) => {
            let deviations = client.deviations();
            match cmd {
                DeviationsCmd::List { filters } => {
                    let filters: Filters = filters.into_iter().collect();
                    print_json(&Value::Array(deviations.get_all(&filters).await?))?
                }
                DeviationsCmd::Get { id } => print_json(&deviations.get_by_id(&id).await?)?,
                DeviationsCmd::Create { body } => print_ack(&deviations.create(&read_body(&body)?).await?)?,
                DeviationsCmd::Update { id, body } => {
                    print_ack(&deviations.update(&id, &read_body(&body)?).await?)?
                }
                DeviationsCmd::Delete { id } => print_ack(&deviations.delete(&id).await?)?,
                DeviationsCmd::Stats => print_json(&deviations.get_stats::<Value>().await?)?,
            }
        }
        Command::Capa(cmd) => {
            let capa = client.capa();
            match cmd {
                CapaCmd::List => print_json(&Value::Array(capa.get_all().await?))?,
                CapaCmd::Get { id } => print_json(&capa.get_by_id(&id).await?)?,
                CapaCmd::Create { body } => print_ack(&capa.create(&read_body(&body)?).await?)?,
                CapaCmd::Update { id, body } => print_ack(&capa.update(&id, &read_body(&body)?).await?)?,
                CapaCmd::ByDeviation { deviation_id } => {
                    print_json(&Value::Array(capa.get_by_deviation(&deviation_id).await?))?
                }
                CapaCmd::Stats => print_json(&capa.get_stats::<Value>().await?)?,
            }
        }
        Command::Monitoring(cmd) => {
            let monitoring = client.monitoring();
            match cmd {
                MonitoringCmd::Environmental { location } => print_json(&Value::Array(
                    monitoring.get_environmental(location.as_deref()).await?,
                ))?,
                MonitoringCmd::Process => print_json(&Value::Array(monitoring.get_process().await?))?,
                MonitoringCmd::Record { body } => print_json(&monitoring.record(&read_body(&body)?).await?)?,
            }
        }
        Command::Dashboard(cmd) => {
            let dashboard = client.dashboard();
            match cmd {
                DashboardCmd::Kpis => print_json(&dashboard.get_kpis::<Value>().await?)?,
                DashboardCmd::Trends => print_json(&dashboard.get_trends::<Value>().await?)?,
                DashboardCmd::Activity => print_json(&dashboard.get_recent_activity::<Value>().await?)?,
                DashboardCmd::Summary => {
                    let (kpis, trends, activity) = futures::try_join!(
                        dashboard.get_kpis::<DashboardKpis>(),
                        dashboard.get_trends::<Value>(),
                        dashboard.get_recent_activity::<Value>(),
                    )?;
                    print_json(&json!({
                        "kpis": kpis,
                        "trends": trends,
                        "recent_activity": activity,
                    }))?
                }
            }
        }
        Command::Reports(cmd) => {
            let reports = client.reports();
            match cmd {
                ReportsCmd::List => print_json(&Value::Array(reports.get_all().await?))?,
                ReportsCmd::Generate { body } => print_ack(&reports.generate(&read_body(&body)?).await?)?,
            }
        }
        Command::Batches(BatchesCmd::List) => {
            print_json(&Value::Array(client.batches().get_all().await?))?
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = build_config(&args);
    tracing::info!("Using API base URL: {}", config.base_url);

    let client = ApiClient::new(config).context("Failed to initialize API client")?;

    let probe = (!args.no_probe && !matches!(args.command, Command::Probe))
        .then(|| spawn_probe(client.clone(), log_probe_outcome));

    let result = run(&client, args.command).await;

    if let Some(handle) = probe {
        settle_probe(handle, PROBE_GRACE).await;
    }

    result
}

/// How long exit waits for a still-running background probe
const PROBE_GRACE: Duration = Duration::from_millis(500);

/// Give the probe up to `grace` to report, then abort it.
/// Returns whether it finished in time.
async fn settle_probe(mut handle: JoinHandle<()>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(_) => true,
        Err(_) => {
            tracing::debug!("Connectivity check still pending at exit; abandoning it");
            handle.abort();
            false
        }
    }
}
