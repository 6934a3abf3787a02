//! Cycle Analytics - Goal tracking for a personal cycling journal
//!
//! Command line entry point: prints the goal overview and changes goal state.

use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cycle_analytics::goals::{format_goals_concise, GoalManager, GoalOverview, ManualChange};
use cycle_analytics::storage::config::{get_config_path, load_config, save_config};
use cycle_analytics::storage::Database;

#[derive(Parser)]
#[command(name = "cycle-analytics", about = "Track and evaluate cycling goals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the goals of a year and one of its months
    Overview {
        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month to show (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Include inactive goals
        #[arg(long)]
        inactive: bool,
    },
    /// List the goals of a year in compact form
    List {
        /// Year to list (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Add one to a manual goal
    Increase { id: i64 },
    /// Subtract one from a manual goal
    Decrease { id: i64 },
    /// Set the value of a manual goal
    Set { id: i64, value: f64 },
    /// Activate a goal
    Activate { id: i64 },
    /// Deactivate a goal
    Deactivate { id: i64 },
    /// Write the effective configuration to the config file
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = load_config().context("Failed to load configuration")?;

    if let Commands::Config = cli.command {
        save_config(&config).context("Failed to save configuration")?;
        println!("Configuration written to {}", get_config_path().display());
        return Ok(());
    }

    let db_path = config.database_path();
    tracing::debug!("Using database {}", db_path.display());
    let db = Database::open(&db_path).context("Failed to open database")?;
    let manager = GoalManager::new(db.connection());

    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Overview {
            year,
            month,
            inactive,
        } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            let goals = manager.load_goals(
                year,
                config.goals.show_active,
                inactive || config.goals.show_inactive,
            )?;
            let rides = db.get_rides_in_year(year)?;

            let overview = GoalOverview::build(&goals, month, &rides);

            if config.goals.update_reached {
                for (id, reached) in &overview.reached_changes {
                    manager.set_reached(*id, *reached)?;
                }
            }

            println!("Goals {year}");
            for display in &overview.year_goals {
                print_display(display);
            }
            println!("Goals {year}-{month:02}");
            for display in &overview.month_goals {
                print_display(display);
            }
        }
        Commands::List { year } => {
            let year = year.unwrap_or_else(|| today.year());
            let goals = manager.load_goals(year, true, true)?;
            for goal in format_goals_concise(&goals) {
                println!(
                    "{:<30} {:<20} {:<20} {}",
                    goal.name, goal.type_label, goal.condition_text, goal.reached
                );
            }
        }
        Commands::Increase { id } => change_value(&manager, id, ManualChange::Increase)?,
        Commands::Decrease { id } => change_value(&manager, id, ManualChange::Decrease)?,
        Commands::Set { id, value } => change_value(&manager, id, ManualChange::Set(value))?,
        Commands::Activate { id } => change_state(&manager, id, true)?,
        Commands::Deactivate { id } => change_state(&manager, id, false)?,
        Commands::Config => {}
    }

    Ok(())
}

fn print_display(display: &cycle_analytics::goals::GoalDisplayData) {
    let info = &display.info;
    let progress = if display.progress_bar {
        format!("{}%", info.progress)
    } else {
        format!("{} left", info.progress)
    };
    let marker = if info.reached == 1 { "x" } else { " " };
    println!(
        "  [{marker}] #{:<4} {:<30} {:>12} / {:<16} {}",
        display.goal_id,
        info.name,
        display.value_text(),
        info.goal,
        progress
    );
}

fn change_value(manager: &GoalManager, id: i64, change: ManualChange) -> anyhow::Result<()> {
    let value = manager
        .change_manual_value(id, change)
        .with_context(|| format!("Could not change value of goal {id}"))?;
    println!("Goal {id} value is now {}", cycle_analytics::goals::format_float(value));
    Ok(())
}

fn change_state(manager: &GoalManager, id: i64, active: bool) -> anyhow::Result<()> {
    if !manager.set_active(id, active)? {
        anyhow::bail!("Goal {id} does not exist");
    }
    let state = if active { "activated" } else { "deactivated" };
    println!("Goal {id} has been {state}");
    Ok(())
}
