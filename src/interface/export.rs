use std::path::Path;

use crate::error::Result;
use crate::models::MealPlan;

/// Write every planned line of `plan` to a CSV file.
///
/// Near-zero servings are already filtered out of the plan; slot totals are
/// written as their own rows so the file is readable on its own.
pub fn write_plan_csv(plan: &MealPlan, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "slot", "kind", "food_id", "food", "servings", "protein", "carbs", "fats",
    ])?;

    for slot in &plan.slots {
        let kind = if slot.fixed { "logged" } else { "planned" };
        for (line, kind) in slot
            .lines
            .iter()
            .map(|l| (l, kind))
            .chain(slot.supplement_lines.iter().map(|l| (l, "supplement")))
        {
            wtr.write_record([
                slot.slot.to_string(),
                kind.to_string(),
                line.food_id.clone(),
                line.name.clone(),
                format!("{:.2}", line.servings),
                format!("{:.1}", line.macros.protein),
                format!("{:.1}", line.macros.carbs),
                format!("{:.1}", line.macros.fats),
            ])?;
        }
        wtr.write_record([
            slot.slot.to_string(),
            "total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.1}", slot.totals.protein),
            format!("{:.1}", slot.totals.carbs),
            format!("{:.1}", slot.totals.fats),
        ])?;
    }

    wtr.write_record([
        "day".to_string(),
        "total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        format!("{:.1}", plan.daily_total.protein),
        format!("{:.1}", plan.daily_total.carbs),
        format!("{:.1}", plan.daily_total.fats),
    ])?;

    wtr.flush()?;
    Ok(())
}
