//! sandprobe: command-line front end
//!
//! Inspects targets, renders probe contexts and runs probe suites against the
//! scripted reference host. Nothing here drives a real browser: `simulate`
//! and `scenarios` play recorded replies through the real harness pipeline
//! (policy extraction, context building, schema verdict parsing, sequential
//! suite execution).
//!
//! Usage:
//!   cargo run -p sandprobe-demo -- list
//!   cargo run -p sandprobe-demo -- inspect --config demo/targets/hardened.toml
//!   cargo run -p sandprobe-demo -- render --config demo/targets/hardened.toml --probe 7
//!   cargo run -p sandprobe-demo -- simulate --config demo/targets/hardened.toml \
//!       --responses demo/targets/leaky-responses.toml
//!   cargo run -p sandprobe-demo -- scenarios

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sandprobe_catalog::{ProbeCatalog, RunConfig};
use sandprobe_context::ContextBuilder;
use sandprobe_contracts::{
    config::SuiteConfig,
    error::{SandprobeError, SandprobeResult},
    outcome::{Resolution, SuiteResult},
};
use sandprobe_policy::extract_policy;
use sandprobe_ref_host::{
    scenarios::{bundled_battery, declared_policy, isolation_only, run_scripted, ScenarioRun},
    ResponseScript,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// sandprobe: verify that an isolated execution context really blocks what
/// it claims to block.
#[derive(Parser)]
#[command(
    name = "sandprobe",
    about = "Security probe harness for isolated execution contexts",
    long_about = "Runs a battery of probes against an isolated execution context and reports,\n\
                  per probe, whether the probed capability was blocked. Silence counts as blocked."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the probes of a catalog.
    List {
        /// Catalog TOML file. Defaults to the bundled battery.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Show the directive extracted from a target and whether hardening applies.
    Inspect {
        /// Run configuration TOML file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the full content of one probe's context.
    Render {
        #[arg(long)]
        config: PathBuf,
        /// Zero-based catalog index of the probe.
        #[arg(long)]
        probe: usize,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Run a suite against the scripted host.
    Simulate {
        #[arg(long)]
        config: PathBuf,
        /// Response script TOML file. Without one every probe stays silent.
        #[arg(long)]
        responses: Option<PathBuf>,
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Print the suite result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run the three reference scenarios.
    Scenarios {
        /// Per-probe verdict window for the scenarios.
        #[arg(long, default_value_t = 100)]
        timeout_millis: u64,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::List { catalog } => run_list(catalog.as_deref()),
        Command::Inspect { config } => run_inspect(&config),
        Command::Render {
            config,
            probe,
            catalog,
        } => run_render(&config, probe, catalog.as_deref()),
        Command::Simulate {
            config,
            responses,
            catalog,
            json,
        } => run_simulate(&config, responses.as_deref(), catalog.as_deref(), json).await,
        Command::Scenarios { timeout_millis } => run_scenarios(timeout_millis).await,
    };

    if let Err(e) = result {
        eprintln!("sandprobe error: {}", e);
        std::process::exit(1);
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn load_catalog(path: Option<&Path>) -> SandprobeResult<ProbeCatalog> {
    match path {
        Some(path) => ProbeCatalog::from_file(path),
        None => ProbeCatalog::bundled(),
    }
}

fn run_list(catalog: Option<&Path>) -> SandprobeResult<()> {
    let catalog = load_catalog(catalog)?;
    println!("{} probe(s):", catalog.len());
    for (index, probe) in catalog.probes.iter().enumerate() {
        println!("  [{:>2}] {}", index, probe.name);
        println!("       {}", probe.description);
    }
    Ok(())
}

fn run_inspect(config: &Path) -> SandprobeResult<()> {
    let config = RunConfig::from_file(config)?;
    let policy = extract_policy(config.target.restriction_policy_text.as_deref());

    println!("Isolation attributes:   {}", display_or_none(&config.target.isolation_attributes));
    println!("Capability allowances:  {}", display_or_none(&config.target.capability_allowances));
    println!("Verdict window:         {} ms", config.timeout_millis);
    match &policy.directive {
        Some(directive) => println!("Declared directive:     {}", directive),
        None => println!("Declared directive:     (none found)"),
    }
    println!(
        "Harness hardening:      {}",
        if policy.hardening_enabled() { "ON" } else { "OFF" }
    );
    Ok(())
}

fn run_render(config: &Path, probe: usize, catalog: Option<&Path>) -> SandprobeResult<()> {
    let config = RunConfig::from_file(config)?;
    let catalog = load_catalog(catalog)?;
    let definition = catalog.probes.get(probe).ok_or_else(|| SandprobeError::CatalogError {
        reason: format!(
            "probe index {} out of range (catalog has {} probes)",
            probe,
            catalog.len()
        ),
    })?;

    let policy = extract_policy(config.target.restriction_policy_text.as_deref());
    let builder = ContextBuilder::new(&config.target, &policy);
    let context = builder.build(definition);

    println!("<!-- probe [{}] {} -->", probe, context.probe);
    println!("<!-- isolation: {} -->", display_or_none(&context.isolation_attributes));
    println!("<!-- allow: {} -->", display_or_none(&context.capability_allowances));
    println!("{}", context.content);
    Ok(())
}

async fn run_simulate(
    config: &Path,
    responses: Option<&Path>,
    catalog: Option<&Path>,
    json: bool,
) -> SandprobeResult<()> {
    let config = RunConfig::from_file(config)?;
    let catalog = load_catalog(catalog)?;
    let script = match responses {
        Some(path) => ResponseScript::from_file(path)?,
        None => ResponseScript::silent(),
    };
    info!(
        probes = catalog.len(),
        scripted = script.responses.len(),
        "simulating suite against scripted host"
    );

    let run = run_scripted(&config.target, &catalog.probes, script, config.suite_config()).await?;

    if json {
        let body = serde_json::to_string_pretty(&run.result).map_err(|e| {
            SandprobeError::ConfigError {
                reason: format!("failed to serialize suite result: {}", e),
            }
        })?;
        println!("{}", body);
    } else {
        print_result(&run.result);
    }
    Ok(())
}

async fn run_scenarios(timeout_millis: u64) -> SandprobeResult<()> {
    let config = SuiteConfig::with_timeout_millis(timeout_millis);

    print_scenario(
        "Scenario A: isolation attributes only",
        &isolation_only::run_scenario(config).await?,
    );
    print_scenario(
        "Scenario B: declared restriction policy",
        &declared_policy::run_scenario(config).await?,
    );
    print_scenario(
        "Scenario C: bundled battery, hardened target",
        &bundled_battery::run_scenario(config).await?,
    );
    Ok(())
}

// ── Output ────────────────────────────────────────────────────────────────────

fn display_or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

fn print_scenario(title: &str, run: &ScenarioRun) {
    println!("=== {} ===", title);
    println!();
    print_result(&run.result);
    println!("  Contexts attached:      {}", run.contents().len());
    println!();
}

fn print_result(result: &SuiteResult) {
    for outcome in &result.outcomes {
        let mark = if outcome.passed { "BLOCKED" } else { "ALLOWED" };
        let how = match outcome.resolution {
            Resolution::Verdict => "",
            Resolution::Timeout => " (timeout)",
        };
        println!("  [{:>2}] {:<7} {}{}", outcome.index, mark, outcome.name, how);
        println!("         {}", outcome.detail);
    }
    println!();
    println!(
        "  Passed: {}  Failed: {}  ({} ms)",
        result.passed_count,
        result.failed_count,
        (result.finished_at - result.started_at).num_milliseconds()
    );
    if !result.all_passed() {
        println!("  Capabilities left open:");
        for outcome in result.failures() {
            println!("    - {}: {}", outcome.name, outcome.detail);
        }
    }
}
