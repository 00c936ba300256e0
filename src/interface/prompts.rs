use dialoguer::{Input, MultiSelect, Select};

use crate::error::{MealError, Result};
use crate::models::{Food, MealSlot, Person};

/// Prompt for which person to plan for.
pub fn prompt_person(people: &[&Person]) -> Result<String> {
    if people.is_empty() {
        return Err(MealError::InvalidInput(
            "no active people in the household file".to_string(),
        ));
    }

    let options: Vec<String> = people.iter().map(|p| p.name.clone()).collect();
    let selection = Select::new()
        .with_prompt("Who are you planning for?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(options[selection].clone())
}

/// Prompt for the foods of one meal slot.
pub fn prompt_slot_foods(slot: MealSlot, foods: &[&Food]) -> Result<Vec<Food>> {
    let options: Vec<String> = foods.iter().map(|f| f.display_label()).collect();
    let picked = MultiSelect::new()
        .with_prompt(format!("Pick foods for {} (space to toggle)", slot.title()))
        .items(&options)
        .interact()?;

    Ok(picked.into_iter().map(|i| foods[i].clone()).collect())
}

/// Prompt for a serving count.
pub fn prompt_servings(food_name: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(format!("How many servings of {}?", food_name))
        .default("1".to_string())
        .interact_text()?;

    let servings: f64 = input
        .trim()
        .parse()
        .map_err(|_| MealError::InvalidInput("Invalid number".to_string()))?;

    if servings <= 0.0 {
        return Err(MealError::InvalidInput(
            "Servings must be positive".to_string(),
        ));
    }

    Ok(servings)
}
