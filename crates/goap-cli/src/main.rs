//! GOAP CLI - inspect and simulate agent definitions.
//!
//! - `goap check <FILE>` - validate a definition
//! - `goap plan <FILE>` - plan every goal from the initial states
//! - `goap run <FILE>` - tick the agent and print each outcome

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use goap_config::AgentDefinition;
use goap_core::TickContext;
use goap_planner::{Agent, Executor, GoalId, TickOutcome};

mod dry_run;

use dry_run::DryRun;

#[derive(Parser)]
#[command(name = "goap")]
#[command(about = "Goal-oriented action planning toolkit", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate an agent definition
    Check {
        /// Agent definition (YAML)
        file: PathBuf,
    },

    /// Plan from the initial states
    Plan {
        /// Agent definition (YAML)
        file: PathBuf,

        /// Plan only this goal
        #[arg(long)]
        goal: Option<String>,
    },

    /// Tick the agent and print each outcome
    Run {
        /// Agent definition (YAML)
        file: PathBuf,

        /// Number of ticks
        #[arg(long, default_value_t = 10)]
        ticks: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Plan { file, goal } => plan(&file, goal.as_deref()),
        Commands::Run { file, ticks } => run(&file, ticks),
    }
}

fn load(path: &Path) -> Result<(AgentDefinition, Agent)> {
    tracing::info!(file = %path.display(), "Loading agent definition");
    let def = AgentDefinition::load(path)?;
    let agent = def.build(&DryRun)?;
    tracing::debug!(
        agent = def.display_name(),
        states = def.states.len(),
        actions = def.actions.len(),
        goals = def.goals.len(),
        "Agent ready"
    );
    Ok((def, agent))
}

fn check(path: &Path) -> Result<()> {
    let (def, agent) = load(path)?;

    println!("{}: ok", def.display_name());
    println!();
    println!("States ({}):", agent.world().len());
    for state in agent.world().iter() {
        println!("  {:<24} {} = {}", state.name(), state.kind(), state.value());
    }
    println!("Actions ({}):", agent.executor().actions().len());
    for action in agent.executor().actions() {
        let costs: Vec<String> = action
            .preconditions()
            .iter()
            .map(|p| p.cost.to_string())
            .collect();
        println!("  {:<24} cost {}", action.name(), costs.join(" | "));
    }
    println!("Goals ({}):", agent.executor().goals().len());
    for goal in agent.executor().goals() {
        println!("  {:<24} {} constraint(s)", goal.name(), goal.constraints().len());
    }
    Ok(())
}

fn plan(path: &Path, only: Option<&str>) -> Result<()> {
    let (_, agent) = load(path)?;
    let executor = agent.executor();

    let goals: Vec<GoalId> = match only {
        Some(name) => match executor.goals().iter().position(|g| g.name() == name) {
            Some(index) => vec![GoalId(index)],
            None => bail!("no goal named `{name}`"),
        },
        None => (0..executor.goals().len()).map(GoalId).collect(),
    };
    tracing::debug!(goals = goals.len(), "Planning from initial states");

    for id in goals {
        let Some(goal) = executor.goal(id) else {
            continue;
        };
        println!("{}:", goal.name());
        if goal.is_satisfied_by(agent.world()) {
            println!("  already satisfied");
            continue;
        }

        let result = executor
            .planner()
            .search(agent.world(), goal.constraints(), executor.actions());
        let stats = result.stats;
        match result.plan() {
            Some(plan) => {
                println!("  {}", plan.action_names(executor.actions()).join(" -> "));
                println!("  cost {}", plan.cost);
            }
            None => println!("  no plan"),
        }
        println!(
            "  expanded {}, pruned {}{}",
            stats.expanded,
            stats.pruned,
            if stats.budget_exhausted { ", budget exhausted" } else { "" }
        );
    }
    Ok(())
}

fn run(path: &Path, ticks: u64) -> Result<()> {
    let (def, mut agent) = load(path)?;

    let mut ctx = TickContext::default();
    let mut failures = 0u32;
    for _ in 0..ticks {
        let outcome = agent.tick(&ctx);
        if outcome.is_failure() {
            failures += 1;
        }
        println!("[{:>4}] {}", ctx.tick, describe(outcome, agent.executor()));
        ctx = ctx.next();
    }

    tracing::info!(
        agent = def.display_name(),
        ticks,
        plans = agent.executor().plan_calls(),
        failures,
        "Simulation finished"
    );

    println!();
    for state in agent.world().iter() {
        println!("  {:<24} = {}", state.name(), state.value());
    }
    Ok(())
}

fn describe(outcome: TickOutcome, executor: &Executor) -> String {
    let goal = outcome
        .goal()
        .and_then(|id| executor.goal(id))
        .map(|g| g.name())
        .unwrap_or("-");
    let action = outcome
        .action()
        .and_then(|id| executor.action(id))
        .map(|a| a.name())
        .unwrap_or("-");

    match outcome {
        TickOutcome::NoGoal => "no goal".to_string(),
        TickOutcome::GoalSatisfied { .. } => format!("{goal}: satisfied"),
        TickOutcome::NoPlan { .. } => format!("{goal}: no plan"),
        TickOutcome::Running { .. } => format!("{goal}: {action} running"),
        TickOutcome::ActionFinished { .. } => format!("{goal}: {action} finished"),
        TickOutcome::PlanCompleted { .. } => format!("{goal}: {action} finished, plan complete"),
        TickOutcome::ActionRejected { .. } => format!("{goal}: {action} rejected, plan dropped"),
        TickOutcome::ActionFailed { .. } => format!("{goal}: {action} failed, plan dropped"),
    }
}
