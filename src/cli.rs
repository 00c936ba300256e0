use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::MealSlot;

/// MacroPlanner: solve food servings against each person's daily macro targets.
#[derive(Parser, Debug)]
#[command(name = "macro_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the household JSON file.
    #[arg(short, long, default_value = "household.json", global = true)]
    pub file: String,

    /// Log solver diagnostics.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan a whole day, balancing breakfast, lunch and dinner.
    Plan {
        /// Person to plan for (prompted when omitted).
        #[arg(short, long)]
        person: Option<String>,

        /// Breakfast food id or name (repeatable).
        #[arg(long)]
        breakfast: Vec<String>,

        /// Lunch food id or name (repeatable).
        #[arg(long)]
        lunch: Vec<String>,

        /// Dinner food id or name (repeatable).
        #[arg(long)]
        dinner: Vec<String>,

        /// Day to store the plan under (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,

        /// Store the plan in the person's daily log.
        #[arg(long, requires = "date")]
        save: bool,

        /// Also write the plan to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Solve the last meal of a day against what is left of the budget.
    Finish {
        #[arg(short, long)]
        person: String,

        /// Day whose logged meals are kept fixed (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        /// Slot to solve.
        #[arg(long, default_value = "dinner")]
        slot: MealSlot,

        /// Food id or name for the solved slot (repeatable).
        #[arg(long)]
        food: Vec<String>,

        /// Store the solved slot in the daily log.
        #[arg(long)]
        save: bool,

        /// Also write the plan to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Record a fixed portion in a daily log.
    Log {
        #[arg(short, long)]
        person: String,

        #[arg(long)]
        date: String,

        #[arg(long)]
        slot: MealSlot,

        /// Food id or name.
        #[arg(long)]
        food: String,

        /// Servings eaten (prompted when omitted).
        #[arg(long)]
        servings: Option<f64>,
    },

    /// List the food catalog.
    Foods {
        /// Include inactive foods and supplements.
        #[arg(long)]
        all: bool,
    },

    /// List people and their daily targets.
    People,
}
