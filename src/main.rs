use std::path::{Path, PathBuf};
use std::slice;

use clap::Parser;
use tracing::info;

use macro_planner_rs::cli::{Cli, Command};
use macro_planner_rs::error::{MealError, Result};
use macro_planner_rs::interface::{
    display_food_list, display_meal_plan, display_people, prompt_person, prompt_servings,
    prompt_slot_foods, write_plan_csv,
};
use macro_planner_rs::models::{Food, MealSlot, ObjectiveMode};
use macro_planner_rs::planner::{
    format_balanced, format_remaining, log_remaining, solve, SlotSelection,
};
use macro_planner_rs::state::{load_household, save_household, Household};

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Plan {
            person,
            breakfast,
            lunch,
            dinner,
            date,
            save,
            csv,
        } => cmd_plan(
            &cli.file,
            person,
            [breakfast, lunch, dinner],
            date,
            save,
            csv,
        ),
        Command::Finish {
            person,
            date,
            slot,
            food,
            save,
            csv,
        } => cmd_finish(&cli.file, &person, &date, slot, &food, save, csv),
        Command::Log {
            person,
            date,
            slot,
            food,
            servings,
        } => cmd_log(&cli.file, &person, &date, slot, &food, servings),
        Command::Foods { all } => cmd_foods(&cli.file, all),
        Command::People => cmd_people(&cli.file),
    }
}

/// Load the household file, or explain how to get one.
fn open_household(file_path: &str) -> Result<Option<Household>> {
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Household file not found: {}", file_path);
        eprintln!("Please ensure household.json exists in the current directory or pass --file.");
        return Ok(None);
    }

    let household = load_household(path)?;
    info!(
        foods = household.food_count(),
        solver = %household.settings().display(),
        "household loaded"
    );
    Ok(Some(household))
}

/// Foods for a slot: from the command line when given, otherwise picked interactively.
fn slot_foods(household: &Household, slot: MealSlot, names: &[String]) -> Result<Vec<Food>> {
    if names.is_empty() {
        let selectable = household.selectable_foods();
        prompt_slot_foods(slot, &selectable)
    } else {
        household.resolve_foods(names)
    }
}

/// Plan a full day in balance mode.
fn cmd_plan(
    file_path: &str,
    person: Option<String>,
    slot_names: [Vec<String>; 3],
    date: Option<String>,
    save: bool,
    csv: Option<PathBuf>,
) -> Result<()> {
    let Some(mut household) = open_household(file_path)? else {
        return Ok(());
    };

    let name = match person {
        Some(name) => household.get_person(&name)?.name.clone(),
        None => prompt_person(&household.active_people())?,
    };

    let budget = household.person_budget(&name)?;
    let target = budget.require()?;
    let supplements = household.supplement_pair()?;

    let mut slots = Vec::with_capacity(MealSlot::BALANCED.len());
    for (slot, names) in MealSlot::BALANCED.into_iter().zip(slot_names.iter()) {
        let foods = slot_foods(&household, slot, names)?;
        slots.push(SlotSelection::new(slot, foods));
    }

    println!();
    println!(
        "Planning {} for P:{:.1} C:<={:.1} F:{:.1}...",
        name, target.protein, target.carbs, target.fats
    );

    let settings = household.settings().clone();
    let allocation = solve(
        ObjectiveMode::Balance,
        &slots,
        &supplements,
        &budget,
        &settings,
    )?;
    let plan = format_balanced(&slots, &supplements, &allocation, &target, &settings);

    display_meal_plan(&plan);

    if let Some(path) = csv {
        write_plan_csv(&plan, &path)?;
        println!("Plan written to {}", path.display());
    }

    if save {
        let date = date.ok_or_else(|| MealError::InvalidInput("--save needs --date".to_string()))?;
        household.record_plan(&name, &date, &plan)?;
        save_household(file_path, &household)?;
        println!("Plan saved to {}'s log for {}.", name, date);
    }

    Ok(())
}

/// Solve one remaining slot against what the logged meals left over.
fn cmd_finish(
    file_path: &str,
    person: &str,
    date: &str,
    slot: MealSlot,
    food_names: &[String],
    save: bool,
    csv: Option<PathBuf>,
) -> Result<()> {
    let Some(mut household) = open_household(file_path)? else {
        return Ok(());
    };

    let name = household.get_person(person)?.name.clone();
    let log = household
        .find_log(&name, date)
        .ok_or_else(|| MealError::LogNotFound {
            person: name.clone(),
            date: date.to_string(),
        })?;
    let remaining = log_remaining(&household, log, slot)?;
    let fixed = household.fixed_slots(log, slot)?;
    let target = remaining.require()?;
    let supplements = household.supplement_pair()?;

    println!();
    println!(
        "Remaining for {}: P:{:.1} C:<={:.1} F:{:.1}",
        slot.title(),
        target.protein,
        target.carbs,
        target.fats
    );

    let foods = slot_foods(&household, slot, food_names)?;
    let solved = SlotSelection::new(slot, foods);

    let settings = household.settings().clone();
    let allocation = solve(
        ObjectiveMode::MinimizeSupplement,
        slice::from_ref(&solved),
        &supplements,
        &remaining,
        &settings,
    )?;
    let plan = format_remaining(
        &fixed,
        &solved,
        &supplements,
        &allocation,
        &target,
        &settings,
    );

    display_meal_plan(&plan);

    if let Some(path) = csv {
        write_plan_csv(&plan, &path)?;
        println!("Plan written to {}", path.display());
    }

    if save {
        household.record_plan(&name, date, &plan)?;
        save_household(file_path, &household)?;
        println!("{} saved to {}'s log for {}.", slot.title(), name, date);
    }

    Ok(())
}

/// Record a fixed portion.
fn cmd_log(
    file_path: &str,
    person: &str,
    date: &str,
    slot: MealSlot,
    food: &str,
    servings: Option<f64>,
) -> Result<()> {
    let Some(mut household) = open_household(file_path)? else {
        return Ok(());
    };

    let food_name = household.resolve_food(food)?.name;
    let servings = match servings {
        Some(s) => s,
        None => prompt_servings(&food_name)?,
    };

    let entry = household.add_entry(person, date, slot, food, servings)?;
    save_household(file_path, &household)?;

    println!(
        "Logged {:.2} x {} for {} on {}.",
        entry.servings, food_name, slot, date
    );
    Ok(())
}

/// List the catalog.
fn cmd_foods(file_path: &str, all: bool) -> Result<()> {
    let Some(household) = open_household(file_path)? else {
        return Ok(());
    };

    if all {
        display_food_list(&household.all_foods(), "All Foods");
    } else {
        display_food_list(&household.selectable_foods(), "Foods");
        if let Ok(pair) = household.supplement_pair() {
            display_food_list(&[&pair.protein, &pair.fat], "Supplements");
        }
    }
    Ok(())
}

/// List people.
fn cmd_people(file_path: &str) -> Result<()> {
    let Some(household) = open_household(file_path)? else {
        return Ok(());
    };

    display_people(household.people());
    Ok(())
}
