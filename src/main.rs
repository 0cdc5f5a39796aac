use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cybert::annotation::ViewProfile;
use cybert::config::{ClientConfig, DEFAULT_API_URL};
use cybert::domain::AnalysisMode;
use cybert::health::{probe_once, ConnectionStatus, HealthMonitor};
use cybert::orchestrator::AnalysisOrchestrator;
use cybert::present::{render_html, render_text};
use cybert::samples::{sample, samples};
use cybert::service::HttpInferenceClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cybert", version, about = "Mini-CyBERT NER/MLM client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, env = "CYBERT_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
    #[arg(long, env = "CYBERT_USER_AGENT", global = true)]
    user_agent: Option<String>,
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(clap::Args)]
struct InputArgs {
    #[arg(long, conflicts_with_all = ["file", "sample"])]
    text: Option<String>,
    #[arg(long, conflicts_with = "sample")]
    file: Option<PathBuf>,
    /// Use one of the built-in sample texts (1-based, see `samples`)
    #[arg(long)]
    sample: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entities and highlight them in the text
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        #[arg(long, default_value = "dashboard")]
        profile: String,
    },
    /// Rank replacement candidates for the [MASK] token
    Predict {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Probe the service once
    Health,
    /// Keep probing the service and report connectivity
    Watch {
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
        /// Stop after this many seconds
        #[arg(long, default_value_t = 120)]
        duration_secs: u64,
    },
    /// List the built-in sample texts
    Samples {
        /// Only list samples for this mode (ner or mlm)
        #[arg(long)]
        mode: Option<String>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_input(mode: AnalysisMode, input: InputArgs) -> Result<String> {
    if let Some(text) = input.text {
        return Ok(text);
    }
    if let Some(path) = input.file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("could not read input file {:?}", path));
    }
    if let Some(number) = input.sample {
        return sample(mode, number)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("no {} sample number {}", mode, number));
    }
    bail!("provide --text, --file or --sample")
}

fn run_analysis(
    config: ClientConfig,
    mode: AnalysisMode,
    text: &str,
    format: OutputFormat,
    profile: ViewProfile,
) -> Result<()> {
    let client = HttpInferenceClient::new(config)?;
    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client));

    let record = match orchestrator.submit(mode, text) {
        Ok(record) => record,
        Err(err) => {
            if let Some(cause) = err.cause() {
                error!(%cause, "analysis request failed");
            }
            bail!("{}", err);
        }
    };

    let view = record.view(profile);
    let rendered = match format {
        OutputFormat::Text => render_text(&view),
        OutputFormat::Html => render_html(&view),
        OutputFormat::Json => serde_json::to_string_pretty(&view)?,
    };
    println!("{}", rendered);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let mut config = ClientConfig::new(&cli.api_url)?;
    if let Some(user_agent) = &cli.user_agent {
        config = config.with_user_agent(user_agent.as_str())?;
    }

    match cli.command {
        Commands::Analyze {
            input,
            format,
            profile,
        } => {
            let profile: ViewProfile = profile.parse()?;
            let text = resolve_input(AnalysisMode::Ner, input)?;
            run_analysis(config, AnalysisMode::Ner, &text, format, profile)?;
        }
        Commands::Predict { input, format } => {
            let text = resolve_input(AnalysisMode::Mlm, input)?;
            run_analysis(config, AnalysisMode::Mlm, &text, format, ViewProfile::Dashboard)?;
        }
        Commands::Health => {
            let client = HttpInferenceClient::new(config)?;
            let (status, report) = probe_once(&client);
            println!("{}", status);
            if let Some(report) = report {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            if status != ConnectionStatus::Connected {
                bail!("inference service at {} is {}", cli.api_url, status);
            }
        }
        Commands::Watch {
            interval_secs,
            duration_secs,
        } => {
            let interval = Duration::from_secs(interval_secs.max(1));
            let config = config.with_health_interval(interval);
            let client = Arc::new(HttpInferenceClient::new(config.clone())?);
            let monitor = HealthMonitor::start(client, config.health_interval)?;

            let mut last = ConnectionStatus::Checking;
            for _ in 0..duration_secs {
                thread::sleep(Duration::from_secs(1));
                let status = monitor.status();
                if status != last {
                    println!("{} {}", chrono::Utc::now().to_rfc3339(), status);
                    last = status;
                }
            }
            let snapshot = monitor.stop();
            info!(probes = snapshot.probes, status = %snapshot.status, "watch finished");
        }
        Commands::Samples { mode } => {
            let modes = match mode {
                Some(mode) => vec![mode.parse::<AnalysisMode>()?],
                None => AnalysisMode::all().to_vec(),
            };
            for mode in modes {
                println!("{}: {}", mode, mode.metadata().description);
                for (idx, text) in samples(mode).iter().enumerate() {
                    println!("  {}. {}", idx + 1, text);
                }
            }
        }
    }

    Ok(())
}
