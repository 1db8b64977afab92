//! CLI entrypoint for atrium
//!
//! Wires the layers together with dependency injection: scenario in,
//! coordination round through the agent roster, ranked plans out, and
//! optional execution of the best plan against the simulated device layer.

use anyhow::{Context, Result};
use atrium_application::{summarize, DecisionAgent, ExecutionEngine, MultiAgentCoordinator};
use atrium_domain::{
    DecisionPlan, ExecutionMode, ExecutionPlan, ExecutionRecommendation, ExecutionStatus,
    ResolutionStrategy, Slo,
};
use atrium_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditLogger, Scenario, SimulatedDeviceController,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "atrium", version, about = "Multi-agent smart-building decision coordination")]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore config files and run with built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Append audit events to this JSONL file
    #[arg(long, global = true)]
    audit_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one coordination round over a scenario
    Coordinate {
        /// Scenario file (JSON); the built-in demo when omitted
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Strategy to compare (repeatable); defaults from config
        #[arg(long = "strategy")]
        strategies: Vec<ResolutionStrategyArg>,

        /// Execute the best plan after ranking
        #[arg(long)]
        execute: bool,

        /// Approve gated plans as this identity
        #[arg(long)]
        approver: Option<String>,
    },

    /// Re-run coordination on a fixed interval until interrupted
    Watch {
        /// Scenario file (JSON); the built-in demo when omitted
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Seconds between rounds; defaults from config
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Print the built-in SLO catalogue
    Slos,
}

/// clap-friendly wrapper so `--strategy safety_first` parses with a helpful error
#[derive(Clone)]
struct ResolutionStrategyArg(ResolutionStrategy);

impl std::str::FromStr for ResolutionStrategyArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(ResolutionStrategyArg)
            .map_err(|_| format!("unknown strategy '{s}' (expected one of: priority_weighted, majority_vote, safety_first, energy_balance)"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("config error: {e}"))?
    };

    match cli.command {
        Command::Coordinate {
            scenario,
            strategies,
            execute,
            approver,
        } => {
            let scenario = load_scenario(scenario.as_ref())?;
            let strategies: Vec<ResolutionStrategy> = if strategies.is_empty() {
                config.coordinator.strategies.clone()
            } else {
                strategies.into_iter().map(|s| s.0).collect()
            };

            run_round(
                &config,
                &scenario,
                &strategies,
                execute,
                approver.as_deref(),
                cli.audit_log.as_ref(),
            )
            .await
        }
        Command::Watch { scenario, interval } => {
            let scenario = load_scenario(scenario.as_ref())?;
            let interval = interval.unwrap_or(config.coordinator.interval_secs);
            watch(&config, &scenario, interval, cli.audit_log.as_ref()).await
        }
        Command::Slos => {
            print_slo_catalogue();
            Ok(())
        }
    }
}

fn load_scenario(path: Option<&PathBuf>) -> Result<Scenario> {
    match path {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display())),
        None => Ok(Scenario::demo()),
    }
}

fn build_coordinator(config: &FileConfig, audit_log: Option<&PathBuf>) -> MultiAgentCoordinator {
    let agents = build_agents(config);
    let mut coordinator = MultiAgentCoordinator::new(agents);

    if let Some(path) = audit_log {
        match JsonlAuditLogger::new(path) {
            Some(logger) => coordinator = coordinator.with_audit(Arc::new(logger)),
            None => warn!("Audit log disabled: could not open {}", path.display()),
        }
    }

    coordinator
}

#[cfg(feature = "remote-llm")]
fn build_agents(config: &FileConfig) -> Vec<Arc<dyn DecisionAgent>> {
    use atrium_application::{
        ComfortAgent, EmergencyAgent, EnergyAgent, EnvironmentalAgent, OccupancyAgent,
        SecurityAgent,
    };
    use atrium_application::ports::decision_source::DecisionSource;
    use atrium_application::RateLimiter;
    use atrium_infrastructure::HttpDecisionSource;

    let source: Option<Arc<dyn DecisionSource>> = if config.llm.enabled {
        match &config.llm.endpoint {
            Some(endpoint) => match HttpDecisionSource::new(endpoint) {
                Ok(source) => Some(Arc::new(source)),
                Err(e) => {
                    warn!("Remote decision source unavailable ({e}), agents run on rules");
                    None
                }
            },
            None => {
                warn!("llm.enabled is set without llm.endpoint, agents run on rules");
                None
            }
        }
    } else {
        None
    };

    let Some(source) = source else {
        return atrium_application::default_agents();
    };

    let limiter = Arc::new(RateLimiter::per_minute(config.llm.max_requests_per_minute));
    vec![
        Arc::new(SecurityAgent::new().with_source(Arc::clone(&source), Some(Arc::clone(&limiter)))),
        Arc::new(ComfortAgent::new().with_source(Arc::clone(&source), Some(Arc::clone(&limiter)))),
        Arc::new(EnergyAgent::new().with_source(Arc::clone(&source), Some(Arc::clone(&limiter)))),
        Arc::new(
            EmergencyAgent::new().with_source(Arc::clone(&source), Some(Arc::clone(&limiter))),
        ),
        Arc::new(
            EnvironmentalAgent::new().with_source(Arc::clone(&source), Some(Arc::clone(&limiter))),
        ),
        Arc::new(
            OccupancyAgent::new().with_source(Arc::clone(&source), Some(Arc::clone(&limiter))),
        ),
    ]
}

#[cfg(not(feature = "remote-llm"))]
fn build_agents(config: &FileConfig) -> Vec<Arc<dyn DecisionAgent>> {
    if config.llm.enabled {
        warn!("Built without remote-llm support, agents run on rules");
    }
    atrium_application::default_agents()
}

async fn run_round(
    config: &FileConfig,
    scenario: &Scenario,
    strategies: &[ResolutionStrategy],
    execute: bool,
    approver: Option<&str>,
    audit_log: Option<&PathBuf>,
) -> Result<()> {
    let snapshot = scenario.snapshot();
    let slos = scenario.slos();

    println!(
        "\n{} {} (room {})",
        "Coordinating".bold(),
        snapshot.room.name,
        snapshot.room.id
    );
    println!(
        "  sensors: {:.1}°C, {:.0}% RH, {:.0} ppm CO2, {} occupants",
        snapshot.sensors.temperature(),
        snapshot.sensors.humidity(),
        snapshot.sensors.co2(),
        snapshot.sensors.occupancy()
    );

    let coordinator = build_coordinator(config, audit_log);
    let plans = coordinator.coordinate(&snapshot, &slos, strategies).await;

    print_ranked_plans(&plans);

    let summary = summarize(&plans);
    if summary.auto_executable {
        println!("{}", "Best plan clears AUTO thresholds.".green());
    } else if summary.requires_review {
        println!("{}", "A top plan is flagged for review.".yellow());
    }

    if !execute {
        return Ok(());
    }

    let Some(best) = plans.into_iter().next() else {
        println!("No plan to execute.");
        return Ok(());
    };

    let controller = SimulatedDeviceController::new()
        .with_inventory(&scenario.devices)
        .with_failure_rate(config.execution.failure_rate)
        .with_latency_cap(Duration::from_secs_f64(config.execution.latency_cap_secs.max(0.0)));
    let engine = ExecutionEngine::new(Arc::new(controller))
        .with_max_parallel_actions(config.execution.max_parallel_actions);

    execute_best_plan(&engine, best, approver).await;
    Ok(())
}

async fn execute_best_plan(engine: &ExecutionEngine, plan: DecisionPlan, approver: Option<&str>) {
    let mode = match plan.recommendation() {
        ExecutionRecommendation::Auto => ExecutionMode::Auto,
        ExecutionRecommendation::Review => ExecutionMode::Review,
        ExecutionRecommendation::Manual => ExecutionMode::Manual,
    };

    println!(
        "\n{} plan {} in {} mode",
        "Executing".bold(),
        plan.plan_id,
        mode
    );

    let submitted = engine.submit(plan, mode, approver).await;

    let finished = if submitted.awaiting_approval() {
        match approver {
            Some(approver) => {
                info!("Approving plan {} as {}", submitted.plan_id, approver);
                engine.approve_and_execute(&submitted.plan_id, approver).await
            }
            None => {
                println!(
                    "{}",
                    format!(
                        "Plan {} is pending approval (pass --approver to approve and run).",
                        submitted.plan_id
                    )
                    .yellow()
                );
                return;
            }
        }
    } else {
        Some(submitted)
    };

    match finished {
        Some(finished) => print_execution_report(&finished),
        None => println!("{}", "Plan left the registry before execution.".red()),
    }
}

async fn watch(
    config: &FileConfig,
    scenario: &Scenario,
    interval_secs: u64,
    audit_log: Option<&PathBuf>,
) -> Result<()> {
    let coordinator = build_coordinator(config, audit_log);
    let slos = scenario.slos();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

    println!(
        "Watching {} every {}s, Ctrl-C to stop.",
        scenario.room.name, interval_secs
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = scenario.snapshot();
                let plans = coordinator
                    .coordinate(&snapshot, &slos, &config.coordinator.strategies)
                    .await;

                match summarize(&plans).best_plan {
                    Some(best) => info!(
                        "Round complete: best plan {} scored {:.3} ({})",
                        best.plan_id, best.score, best.recommendation
                    ),
                    None => warn!("Round produced no plans"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopping watch.");
                return Ok(());
            }
        }
    }
}

fn print_ranked_plans(plans: &[DecisionPlan]) {
    println!("\n{}", "Ranked plans".bold());

    for plan in plans {
        let recommendation = plan.recommendation();
        let tag = match recommendation {
            ExecutionRecommendation::Auto => recommendation.as_str().green(),
            ExecutionRecommendation::Review => recommendation.as_str().yellow(),
            ExecutionRecommendation::Manual => recommendation.as_str().red(),
        };

        println!(
            "  #{} {} score {:.3} confidence {:.3} [{}]",
            plan.metadata.rank.unwrap_or(0),
            plan.plan_id,
            plan.score,
            plan.confidence,
            tag
        );

        if let Some(compliance) = &plan.slo_compliance {
            println!(
                "     projected compliance {:.3}, {} violation(s)",
                compliance.overall_compliance,
                compliance.violation_count()
            );
        }
        for action in &plan.actions {
            println!("     - {} {}", action.verb, action.device_id.dimmed());
        }
    }
}

fn print_execution_report(execution: &ExecutionPlan) {
    let status = match execution.status {
        ExecutionStatus::Completed => execution.status.as_str().green(),
        ExecutionStatus::Failed => execution.status.as_str().red(),
        _ => execution.status.as_str().yellow(),
    };

    println!(
        "\nPlan {} finished: {} ({}/{} actions, {:.0}% progress)",
        execution.plan_id,
        status,
        execution.completed_actions(),
        execution.action_results.len(),
        execution.progress_percentage()
    );

    for result in &execution.action_results {
        let mark = match result.status {
            ExecutionStatus::Completed => "ok".green(),
            ExecutionStatus::Failed => "failed".red(),
            _ => result.status.as_str().yellow(),
        };
        print!(
            "  {} {} on {}",
            mark, result.action.verb, result.action.device_id
        );
        if let Some(duration) = result.duration_ms() {
            print!(" ({duration} ms)");
        }
        if let Some(error) = &result.error {
            print!(" - {}", error.red());
        }
        println!();
    }
}

fn print_slo_catalogue() {
    println!("{}", "Built-in SLO catalogue".bold());
    for slo in Slo::system_defaults() {
        println!(
            "  {:<24} metric {:<24} weight {:.2}",
            slo.name,
            slo.metric.to_string(),
            slo.weight
        );
        if !slo.config.is_empty() {
            let mut thresholds: Vec<String> = slo
                .config
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            thresholds.sort();
            println!("    {}", thresholds.join(", ").dimmed());
        }
    }
}
