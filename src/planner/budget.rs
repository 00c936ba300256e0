use crate::error::{MealError, Result};
use crate::models::{DailyLog, Food, MacroBudget, Macros, MealEntry, MealSlot};
use crate::state::Household;

/// Macros eaten across `(food, servings)` pairs.
pub fn consumed<'a, I>(portions: I) -> Macros
where
    I: IntoIterator<Item = (&'a Food, f64)>,
{
    portions
        .into_iter()
        .map(|(food, servings)| food.macros_for(servings))
        .sum()
}

/// What is left of `targets` after `consumed`.
pub fn remaining_budget(targets: &MacroBudget, consumed: &Macros) -> MacroBudget {
    targets.remaining_after(consumed)
}

/// Macros of one logged entry, preferring the cached values.
pub fn entry_macros(household: &Household, entry: &MealEntry) -> Result<Macros> {
    if let Some(cached) = entry.macros {
        return Ok(cached);
    }
    let food = household
        .get_food(&entry.food)
        .ok_or_else(|| MealError::FoodNotFound(entry.food.clone()))?;
    Ok(food.macros_for(entry.servings))
}

/// Macros logged in every slot except `exclude`.
pub fn logged_totals(household: &Household, log: &DailyLog, exclude: MealSlot) -> Result<Macros> {
    let mut total = Macros::default();
    for entry in log.entries.iter().filter(|e| e.slot != exclude) {
        total += entry_macros(household, entry)?;
    }
    Ok(total)
}

/// Budget left for `slot` once everything else in the log is counted.
pub fn log_remaining(household: &Household, log: &DailyLog, slot: MealSlot) -> Result<MacroBudget> {
    let eaten = logged_totals(household, log, slot)?;
    Ok(remaining_budget(&log.required, &eaten))
}
