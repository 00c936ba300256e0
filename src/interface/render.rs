use crate::models::{Food, FoodLine, MealPlan, Macros, ObjectiveMode, Person};

fn macro_cells(m: &Macros) -> String {
    format!("P:{:>6.1} C:{:>6.1} F:{:>6.1}", m.protein, m.carbs, m.fats)
}

fn servings_label(line: &FoodLine) -> String {
    if line.serving_name.is_empty() {
        format!("{:.2}", line.servings)
    } else {
        format!("{:.2} x {}", line.servings, line.serving_name)
    }
}

/// Display a meal plan as one table per slot plus a daily summary.
pub fn display_meal_plan(plan: &MealPlan) {
    let title = match plan.mode {
        ObjectiveMode::Balance => "Balanced Day",
        ObjectiveMode::MinimizeSupplement => "Remaining Meal",
    };

    println!();
    println!("=== {} ===", title);

    // Find max food name length for alignment
    let width = plan
        .slots
        .iter()
        .flat_map(|s| s.lines.iter().chain(&s.supplement_lines))
        .map(|l| l.name.len())
        .max()
        .unwrap_or(10);

    for slot in &plan.slots {
        println!();
        let tag = if slot.fixed { " (logged)" } else { "" };
        println!("--- {}{} ---", slot.slot.title(), tag);

        if slot.lines.is_empty() && slot.supplement_lines.is_empty() {
            println!("  (nothing)");
        }
        for line in &slot.lines {
            println!(
                "  {:<width$}  {:>16}  {}",
                line.name,
                servings_label(line),
                macro_cells(&line.macros),
                width = width
            );
        }
        for line in &slot.supplement_lines {
            println!(
                "  {:<width$}  {:>16}  {}  [supplement]",
                line.name,
                servings_label(line),
                macro_cells(&line.macros),
                width = width
            );
        }
        println!("  Total: {}", macro_cells(&slot.totals));
        println!("  Goal:  {}", macro_cells(&slot.goal));
    }

    println!();
    println!("--- Summary ---");
    println!("Daily total:  {}", macro_cells(&plan.daily_total));
    println!("Daily budget: {}  (carbs are a ceiling)", macro_cells(&plan.budget));
    let (protein, fat) = plan.supplement_servings;
    if plan.uses_supplements() {
        println!(
            "Supplements:  {:.2} protein, {:.2} fat servings",
            protein, fat
        );
    } else {
        println!("Supplements:  none needed");
    }
    println!();
}

/// Display a simple list of foods with their macros.
pub fn display_food_list(foods: &[&Food], title: &str) {
    if foods.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, foods.len());
    println!();

    for food in foods {
        let inactive = if food.is_active { "" } else { "  [inactive]" };
        let recipe = if food.is_recipe { "  [recipe]" } else { "" };
        println!(
            "  {} [{}] - per {}: {}{}{}",
            food.name,
            food.id,
            if food.serving_name.is_empty() {
                "serving"
            } else {
                food.serving_name.as_str()
            },
            macro_cells(&food.macros()),
            recipe,
            inactive
        );
    }

    println!();
}

fn target_cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "unset".to_string())
}

/// Display people with their daily targets.
pub fn display_people(people: &[Person]) {
    if people.is_empty() {
        println!("People: (none)");
        return;
    }

    println!();
    println!("=== People ({}) ===", people.len());
    println!();

    for person in people {
        let inactive = if person.is_active { "" } else { "  [inactive]" };
        println!(
            "  {} - protein {} g, carbs {} g, fat {} g{}",
            person.name,
            target_cell(person.protein_grams),
            target_cell(person.carbs_grams),
            target_cell(person.fats_grams),
            inactive
        );
    }

    println!();
}
