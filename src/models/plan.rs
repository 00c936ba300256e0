use serde::{Deserialize, Serialize};

use crate::models::{MealSlot, Macros};

/// Which objective the solver minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    /// All slots are free: even out slot sizes, then avoid supplements.
    Balance,
    /// Earlier slots are fixed: fill the remaining budget with as little
    /// supplement as possible.
    MinimizeSupplement,
}

/// One food (or supplement share) in a planned meal.
#[derive(Debug, Clone)]
pub struct FoodLine {
    pub food_id: String,
    pub name: String,
    pub serving_name: String,
    pub servings: f64,
    pub macros: Macros,
}

/// A meal slot with its planned foods and how it compares to its goal.
#[derive(Debug, Clone)]
pub struct SlotPlan {
    pub slot: MealSlot,

    /// Foods with non-negligible servings.
    pub lines: Vec<FoodLine>,

    /// Supplement servings attributed to this slot.
    pub supplement_lines: Vec<FoodLine>,

    /// Totals at full precision, including omitted near-zero servings.
    pub totals: Macros,

    /// What this slot was aiming for.
    pub goal: Macros,

    /// True when the slot was logged beforehand rather than solved.
    pub fixed: bool,
}

/// Solver output mapped back onto meals for display and storage.
#[derive(Debug, Clone)]
pub struct MealPlan {
    pub mode: ObjectiveMode,
    pub slots: Vec<SlotPlan>,
    pub daily_total: Macros,

    /// Daily budget the plan is measured against.
    pub budget: Macros,

    /// Total servings of the protein and fat supplements.
    pub supplement_servings: (f64, f64),
}

impl MealPlan {
    pub fn slot(&self, slot: MealSlot) -> Option<&SlotPlan> {
        self.slots.iter().find(|s| s.slot == slot)
    }

    /// Whether any supplement made it into the plan.
    pub fn uses_supplements(&self) -> bool {
        self.slots.iter().any(|s| !s.supplement_lines.is_empty())
    }
}
