use anyhow::{anyhow, bail, Context};
use clap::Parser;
use partner_samples_core::{
    build_scenario_tree, validate_config, ConsoleHelper, Diagnostic, ExecutionReport, Executor,
    HttpPartnerClient, SamplesConfig, ScenarioContext,
};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Partner management API samples")]
struct SamplesCli {
    /// YAML configuration file (defaults to partner-samples.yaml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Print the scenario tree and exit
    #[arg(long)]
    list: bool,
    /// Run only the scenario or group at this path, e.g. "Customer samples/Get customer details"
    #[arg(long, value_name = "PATH")]
    only: Option<String>,
    /// Output the execution report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = SamplesCli::parse();

    let tree = build_scenario_tree();
    let selected = match cli.only.as_deref() {
        Some(path) => tree
            .find(path)
            .ok_or_else(|| anyhow!("no scenario at '{path}'; use --list to see available paths"))?,
        None => &tree,
    };

    if cli.list {
        print!("{}", selected.outline());
        return Ok(());
    }

    let config = SamplesConfig::discover(cli.config.as_deref())?;
    let diagnostics = validate_config(&config);
    print_diagnostics(&diagnostics);
    if diagnostics.iter().any(Diagnostic::is_error) {
        bail!("configuration validation failed");
    }

    let token = config.access_token()?;
    let client = HttpPartnerClient::new(&config.partner_service, token)
        .context("failed to initialise the partner API client")?;
    info!(
        endpoint = %config.partner_service.endpoint,
        scenarios = selected.leaf_count(),
        "starting sample run"
    );
    let context = ScenarioContext::new(config, Box::new(client), ConsoleHelper::stdio());

    let outcome = Executor::new().execute(selected, &context);
    output_report(&outcome.report, cli.json)?;

    if let Some(err) = outcome.error {
        return Err(anyhow::Error::new(err).context("scenario run failed"));
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,partner_samples_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn output_report(report: &ExecutionReport, json: bool) -> anyhow::Result<()> {
    if json {
        let payload = json!({
            "report": report,
            "failed": report.has_failures(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!();
        print!("{report}");
        if report.has_failures() {
            println!("\n[warn] some scenarios failed");
        }
    }
    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    eprintln!("Configuration diagnostics:");
    for diagnostic in diagnostics {
        eprintln!("  - {diagnostic}");
    }
    eprintln!();
}
