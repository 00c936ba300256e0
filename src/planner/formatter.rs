use std::slice;

use crate::models::{Food, FoodLine, MealPlan, MealSlot, Macros, ObjectiveMode, SlotPlan};
use crate::planner::settings::SolverSettings;
use crate::planner::solver::{Allocation, SlotSelection, SupplementPair};

/// A slot whose portions were logged before solving.
///
/// Line macros come from the log, not the current catalog.
#[derive(Debug, Clone)]
pub struct FixedSlot {
    pub slot: MealSlot,
    pub lines: Vec<FoodLine>,
}

impl FixedSlot {
    pub fn totals(&self) -> Macros {
        self.lines.iter().map(|l| l.macros).sum()
    }
}

fn food_line(food: &Food, servings: f64) -> FoodLine {
    FoodLine {
        food_id: food.id.clone(),
        name: food.name.clone(),
        serving_name: food.serving_name.clone(),
        servings,
        macros: food.macros_for(servings),
    }
}

/// Lines for servings above the threshold; near-zero servings are dropped.
fn visible_lines<'a, I>(portions: I, threshold: f64) -> Vec<FoodLine>
where
    I: IntoIterator<Item = (&'a Food, f64)>,
{
    portions
        .into_iter()
        .filter(|(_, servings)| *servings > threshold)
        .map(|(food, servings)| food_line(food, servings))
        .collect()
}

fn supplement_lines(
    supplements: &SupplementPair,
    protein: f64,
    fat: f64,
    threshold: f64,
) -> Vec<FoodLine> {
    visible_lines(
        [(&supplements.protein, protein), (&supplements.fat, fat)],
        threshold,
    )
}

/// Break a balance-mode allocation down by slot.
///
/// Each slot gets an equal share of both supplements and aims for an equal
/// share of the budget.
pub fn format_balanced(
    slots: &[SlotSelection],
    supplements: &SupplementPair,
    allocation: &Allocation,
    budget: &Macros,
    settings: &SolverSettings,
) -> MealPlan {
    let k = slots.len().max(1) as f64;
    let protein_share = allocation.supplements.protein / k;
    let fat_share = allocation.supplements.fat / k;
    let supplement_share = allocation.supplement_totals(supplements) / k;

    let plans = slots
        .iter()
        .enumerate()
        .map(|(i, selection)| {
            let portions = selection
                .foods
                .iter()
                .zip(allocation.servings[i].iter().copied());
            SlotPlan {
                slot: selection.slot,
                lines: visible_lines(portions, settings.zero_threshold),
                supplement_lines: supplement_lines(
                    supplements,
                    protein_share,
                    fat_share,
                    settings.zero_threshold,
                ),
                totals: allocation.slot_food_totals(slots, i) + supplement_share,
                goal: *budget / k,
                fixed: false,
            }
        })
        .collect();

    MealPlan {
        mode: ObjectiveMode::Balance,
        slots: plans,
        daily_total: allocation.totals(slots, supplements),
        budget: *budget,
        supplement_servings: (allocation.supplements.protein, allocation.supplements.fat),
    }
}

/// Break a remaining-slot allocation down alongside the fixed slots.
///
/// Fixed slots aim for what they already contain; the solved slot aims for
/// the remaining budget and carries every supplement serving.
pub fn format_remaining(
    fixed: &[FixedSlot],
    solved: &SlotSelection,
    supplements: &SupplementPair,
    allocation: &Allocation,
    remaining: &Macros,
    settings: &SolverSettings,
) -> MealPlan {
    let mut plans: Vec<SlotPlan> = fixed
        .iter()
        .map(|f| {
            let totals = f.totals();
            SlotPlan {
                slot: f.slot,
                lines: f
                    .lines
                    .iter()
                    .filter(|l| l.servings > settings.zero_threshold)
                    .cloned()
                    .collect(),
                supplement_lines: Vec::new(),
                totals,
                goal: totals,
                fixed: true,
            }
        })
        .collect();

    let solved_slots = slice::from_ref(solved);
    let portions = solved
        .foods
        .iter()
        .zip(allocation.servings[0].iter().copied());
    plans.push(SlotPlan {
        slot: solved.slot,
        lines: visible_lines(portions, settings.zero_threshold),
        supplement_lines: supplement_lines(
            supplements,
            allocation.supplements.protein,
            allocation.supplements.fat,
            settings.zero_threshold,
        ),
        totals: allocation.totals(solved_slots, supplements),
        goal: *remaining,
        fixed: false,
    });
    plans.sort_by_key(|p| p.slot);

    let fixed_total: Macros = plans.iter().filter(|p| p.fixed).map(|p| p.totals).sum();
    let daily_total = plans.iter().map(|p| p.totals).sum();

    MealPlan {
        mode: ObjectiveMode::MinimizeSupplement,
        slots: plans,
        daily_total,
        budget: fixed_total + *remaining,
        supplement_servings: (allocation.supplements.protein, allocation.supplements.fat),
    }
}
