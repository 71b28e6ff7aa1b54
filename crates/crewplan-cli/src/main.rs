//! crewplan - weekly crew rostering from the command line
//!
//! `solve` runs the optimizer on an instance directory and writes
//! solution and report files; `check` inspects an instance without
//! solving; `generate` fabricates a small synthetic instance to try the
//! tool on.

mod generate;
mod report;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use crewplan_core::conflicts::conflict_pairs;
use crewplan_core::coverage::check_coverage;
use crewplan_core::eligibility::Eligibility;
use crewplan_core::error::Result;
use crewplan_core::instance::load_dir;
use crewplan_core::validate::validate_instance;
use crewplan_solver::{solve_instance_with_kind, ModelKind, SolveOptions, SolveStatus};

#[derive(Parser)]
#[command(name = "crewplan", version, about = "Weekly crew rostering solver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve an instance and write solution and report files
    Solve {
        /// Instance directory with scenario/crew/duties/preferences JSON
        #[arg(long)]
        instance: PathBuf,
        /// Wall-clock solve budget in seconds
        #[arg(long, default_value_t = 10)]
        time_limit: u64,
        /// Output directory for solution and report files
        #[arg(long, default_value = "outputs")]
        out: PathBuf,
        /// Drop the objective and only ask whether a legal roster exists
        #[arg(long)]
        feasibility_only: bool,
    },
    /// Validate an instance and report coverage gaps without solving
    Check {
        #[arg(long)]
        instance: PathBuf,
    },
    /// Write a small synthetic instance directory
    Generate {
        #[arg(long)]
        out: PathBuf,
        /// Captains to generate; first officers match, attendants double
        #[arg(long, default_value_t = 3)]
        crew: usize,
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long, default_value_t = 2)]
        duties_per_day: usize,
        /// Seed for reproducible instances
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let exit = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err}", "error:".bright_red().bold());
            1
        }
    };
    std::process::exit(exit);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Solve {
            instance,
            time_limit,
            out,
            feasibility_only,
        } => run_solve(&instance, time_limit, &out, feasibility_only),
        Command::Check { instance } => run_check(&instance),
        Command::Generate {
            out,
            crew,
            days,
            duties_per_day,
            seed,
        } => {
            generate::write_instance(&out, crew, days, duties_per_day, seed)?;
            println!(
                "{} wrote instance to {}",
                "▸".bright_green(),
                out.display().to_string().bright_cyan()
            );
            Ok(0)
        }
    }
}

fn run_solve(dir: &Path, time_limit: u64, out: &Path, feasibility_only: bool) -> Result<i32> {
    let instance = load_dir(dir)?;
    println!(
        "{} loaded {} crew, {} duties, {} off-requests over {} days",
        "▸".bright_green(),
        instance.crew.len(),
        instance.duties.len(),
        instance.off_requests.len(),
        instance.scenario.horizon_days
    );

    let options = SolveOptions::new().with_time_limit(Duration::from_secs(time_limit));
    let kind = if feasibility_only {
        ModelKind::FeasibilityOnly
    } else {
        ModelKind::Full
    };
    let outcome = solve_instance_with_kind(&instance, &options, kind)?;

    match outcome.status {
        SolveStatus::Optimal => println!("{} status {}", "▸".bright_green(), "OPTIMAL".bright_green().bold()),
        SolveStatus::Feasible => println!("{} status {}", "▸".bright_green(), "FEASIBLE".yellow().bold()),
        SolveStatus::Infeasible => println!("{} status {}", "▸".bright_red(), "INFEASIBLE".bright_red().bold()),
        SolveStatus::Unknown => println!("{} status {}", "▸".bright_red(), "UNKNOWN".bright_red().bold()),
    }

    let Some(result) = &outcome.result else {
        return Ok(match outcome.status {
            SolveStatus::Infeasible => 2,
            _ => 3,
        });
    };

    println!(
        "{} objective {}",
        "▸".bright_green(),
        result.objective_value.to_string().bright_cyan()
    );
    for term in &result.breakdown.terms {
        println!(
            "  {} {:<22} weight {:>4}  value {:>6}  contribution {:>8}",
            "·".bright_black(),
            term.category.key(),
            term.weight,
            term.value,
            term.contribution
        );
    }
    for kpi in &result.kpis {
        println!(
            "  {} {:<8} {}  {:>5} min  {:>2} days worked",
            "·".bright_black(),
            kpi.crew_id,
            kpi.role,
            kpi.total_minutes,
            kpi.worked_days
        );
    }

    let written = report::write_reports(out, &instance, &outcome)?;
    for path in written {
        println!("{} wrote {}", "▸".bright_green(), path.display());
    }
    Ok(0)
}

fn run_check(dir: &Path) -> Result<i32> {
    let instance = load_dir(dir)?;
    validate_instance(&instance)?;

    let eligibility = Eligibility::compute(&instance);
    let conflicts = conflict_pairs(&instance.duties, instance.scenario.min_rest_minutes);
    println!(
        "{} {} crew, {} duties, {} eligible pairs, {} conflicting duty pairs",
        "▸".bright_green(),
        instance.crew.len(),
        instance.duties.len(),
        eligibility.len(),
        conflicts.len()
    );

    let issues = check_coverage(&instance, &eligibility);
    if issues.is_empty() {
        println!("{} coverage is feasible in principle", "▸".bright_green());
        return Ok(0);
    }

    println!(
        "{} {} coverage gap(s):",
        "▸".bright_red(),
        issues.len().to_string().bright_red().bold()
    );
    for issue in &issues {
        println!(
            "  {} duty {} day {} role {}: requires {}, eligible {} ({})",
            "·".bright_black(),
            issue.duty_id,
            issue.day,
            issue.role,
            issue.required,
            issue.eligible_count,
            issue.eligible_crew_ids.join(", ")
        );
    }
    Ok(1)
}
