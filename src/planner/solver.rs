use clarabel::algebra::CscMatrix;
use clarabel::solver::{DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT};
use tracing::{debug, warn};

use crate::error::{MealError, Result};
use crate::models::{Food, MacroBudget, Macros, MealSlot, ObjectiveMode};
use crate::planner::budget::consumed;
use crate::planner::settings::SolverSettings;

/// The two filler foods the solver may use to close a gap.
#[derive(Debug, Clone)]
pub struct SupplementPair {
    /// High-protein filler.
    pub protein: Food,
    /// High-fat filler.
    pub fat: Food,
}

impl SupplementPair {
    pub fn new(protein: Food, fat: Food) -> Self {
        Self { protein, fat }
    }

    /// Whether `food` is one of the two supplements.
    pub fn contains(&self, food: &Food) -> bool {
        *food == self.protein || *food == self.fat
    }
}

/// Foods chosen for one meal slot.
#[derive(Debug, Clone)]
pub struct SlotSelection {
    pub slot: MealSlot,
    pub foods: Vec<Food>,
}

impl SlotSelection {
    pub fn new(slot: MealSlot, foods: Vec<Food>) -> Self {
        Self { slot, foods }
    }
}

/// Total servings of each supplement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SupplementServings {
    pub protein: f64,
    pub fat: f64,
}

impl SupplementServings {
    pub fn total(&self) -> f64 {
        self.protein + self.fat
    }
}

/// A successful solve: one non-negative serving count per selected food.
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Servings indexed like the input, `servings[slot][food]`.
    pub servings: Vec<Vec<f64>>,
    pub supplements: SupplementServings,
    /// Objective value at the returned point.
    pub objective: f64,
    /// Solver iterations used (0 when no solve was needed).
    pub iterations: u32,
}

impl Allocation {
    fn zeros(slots: &[SlotSelection]) -> Self {
        Self {
            servings: slots.iter().map(|s| vec![0.0; s.foods.len()]).collect(),
            supplements: SupplementServings::default(),
            objective: 0.0,
            iterations: 0,
        }
    }

    /// Macros from the regular foods of one slot, at full precision.
    pub fn slot_food_totals(&self, slots: &[SlotSelection], index: usize) -> Macros {
        consumed(
            slots[index]
                .foods
                .iter()
                .zip(self.servings[index].iter().copied()),
        )
    }

    /// Macros from supplements alone.
    pub fn supplement_totals(&self, supplements: &SupplementPair) -> Macros {
        supplements.protein.macros_for(self.supplements.protein)
            + supplements.fat.macros_for(self.supplements.fat)
    }

    /// Macros of the whole allocation, supplements included.
    pub fn totals(&self, slots: &[SlotSelection], supplements: &SupplementPair) -> Macros {
        let foods: Macros = (0..slots.len())
            .map(|i| self.slot_food_totals(slots, i))
            .sum();
        foods + self.supplement_totals(supplements)
    }
}

/// Variables of the problem: every selected food in slot order, then the
/// protein supplement, then the fat supplement.
struct Formulation {
    columns: Vec<Macros>,
    /// Slot index of each regular column.
    slot_of: Vec<usize>,
    slot_count: usize,
}

impl Formulation {
    fn new(slots: &[SlotSelection], supplements: &SupplementPair) -> Self {
        let mut columns = Vec::new();
        let mut slot_of = Vec::new();
        for (i, selection) in slots.iter().enumerate() {
            for food in &selection.foods {
                columns.push(food.macros());
                slot_of.push(i);
            }
        }
        columns.push(supplements.protein.macros());
        columns.push(supplements.fat.macros());
        Self {
            columns,
            slot_of,
            slot_count: slots.len(),
        }
    }

    fn len(&self) -> usize {
        self.columns.len()
    }

    fn regular_len(&self) -> usize {
        self.slot_of.len()
    }

    /// Quadratic term, upper triangle only.
    ///
    /// With `T_s` the gram total of slot `s` over `k` slots, the population
    /// variance is `(1/k) * |D x|^2` where `D` holds each column's slot
    /// contribution minus its mean over slots. Supplements contribute the
    /// same share to every slot, so their columns of `D` vanish.
    fn quadratic(&self, mode: ObjectiveMode) -> CscMatrix<f64> {
        let n = self.len();
        let k = self.slot_count;
        if mode != ObjectiveMode::Balance || k < 2 {
            return CscMatrix::new(n, n, vec![0; n + 1], Vec::new(), Vec::new());
        }

        let kf = k as f64;
        let mut d = vec![vec![0.0; n]; k];
        for (j, &slot) in self.slot_of.iter().enumerate() {
            let grams = self.columns[j].grams();
            for (s, row) in d.iter_mut().enumerate() {
                let share = if s == slot { grams } else { 0.0 };
                row[j] = share - grams / kf;
            }
        }

        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        colptr.push(0);
        for j in 0..n {
            for i in 0..=j {
                let dot: f64 = d.iter().map(|row| row[i] * row[j]).sum();
                let value = 2.0 / kf * dot;
                if value != 0.0 {
                    rowval.push(i);
                    nzval.push(value);
                }
            }
            colptr.push(rowval.len());
        }
        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// Linear term: the supplement penalty.
    fn linear(&self, penalty: f64) -> Vec<f64> {
        let mut q = vec![0.0; self.len()];
        let n = self.len();
        q[n - 2] = penalty;
        q[n - 1] = penalty;
        q
    }

    /// Constraint rows `A x + s = b`:
    /// 0 protein and 1 fat in the zero cone, 2 carbs then `-x` in the
    /// non-negative cone.
    fn constraints(&self, target: &Macros) -> (CscMatrix<f64>, Vec<f64>, Vec<SupportedConeT<f64>>) {
        let n = self.len();
        let m = 3 + n;

        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        colptr.push(0);
        for (j, col) in self.columns.iter().enumerate() {
            for (row, value) in [(0, col.protein), (1, col.fats), (2, col.carbs)] {
                if value != 0.0 {
                    rowval.push(row);
                    nzval.push(value);
                }
            }
            rowval.push(3 + j);
            nzval.push(-1.0);
            colptr.push(rowval.len());
        }

        let mut b = vec![0.0; m];
        b[0] = target.protein;
        b[1] = target.fats;
        b[2] = target.carbs;

        let cones = vec![
            SupportedConeT::ZeroConeT(2),
            SupportedConeT::NonnegativeConeT(1 + n),
        ];
        (CscMatrix::new(m, n, colptr, rowval, nzval), b, cones)
    }
}

fn check_selection(slots: &[SlotSelection], supplements: &SupplementPair) -> Result<()> {
    let regular = slots
        .iter()
        .flat_map(|s| s.foods.iter())
        .filter(|f| !supplements.contains(f))
        .count();
    if regular == 0 {
        return Err(MealError::InsufficientSelection);
    }

    for selection in slots {
        for food in &selection.foods {
            if supplements.contains(food) {
                return Err(MealError::InvalidInput(format!(
                    "{} is a supplement and cannot be selected for {}",
                    food.name, selection.slot
                )));
            }
            if !food.is_valid() {
                return Err(MealError::InvalidInput(format!(
                    "{} has negative or non-finite macros",
                    food.name
                )));
            }
        }
    }

    for food in [&supplements.protein, &supplements.fat] {
        if !food.is_valid() {
            return Err(MealError::InvalidInput(format!(
                "supplement {} has negative or non-finite macros",
                food.name
            )));
        }
    }
    Ok(())
}

/// Reject unusable targets and clamp float residue around zero.
///
/// A remaining budget built by subtraction can land a hair below zero when
/// the day is exactly used up; anything within tolerance counts as zero.
fn check_targets(target: &Macros, settings: &SolverSettings) -> Result<Macros> {
    let mut checked = *target;
    for (name, value) in [
        ("protein", &mut checked.protein),
        ("carbohydrate", &mut checked.carbs),
        ("fat", &mut checked.fats),
    ] {
        if !value.is_finite() {
            return Err(MealError::InvalidInput(format!(
                "{} target is not a number",
                name
            )));
        }
        if *value < -settings.tolerance_for(*value) {
            return Err(MealError::OptimizationFailed(format!(
                "{} target is negative ({:.3} g); the day is already over budget",
                name, value
            )));
        }
        *value = value.max(0.0);
    }
    Ok(checked)
}

/// Nothing left to meet: zero servings satisfy both equalities and any
/// non-negative carb ceiling, and no objective can do better.
fn is_exhausted(target: &Macros, settings: &SolverSettings) -> bool {
    target.protein <= settings.tolerance_for(0.0) && target.fats <= settings.tolerance_for(0.0)
}

/// Compute servings per selected food that meet `budget`.
///
/// Protein and fat are matched exactly, carbohydrate is a ceiling, and
/// every serving is non-negative. `Balance` minimizes the variance of the
/// slot totals plus the supplement penalty; `MinimizeSupplement` minimizes
/// the supplement penalty alone.
///
/// Degenerate problems can have several optimal allocations; callers should
/// rely on constraint satisfaction and the objective value, not on the exact
/// serving vector.
pub fn solve(
    mode: ObjectiveMode,
    slots: &[SlotSelection],
    supplements: &SupplementPair,
    budget: &MacroBudget,
    settings: &SolverSettings,
) -> Result<Allocation> {
    let target = budget.require()?;
    check_selection(slots, supplements)?;
    let target = check_targets(&target, settings)?;

    if is_exhausted(&target, settings) {
        debug!("budget is exhausted, nothing to allocate");
        return Ok(Allocation::zeros(slots));
    }

    let problem = Formulation::new(slots, supplements);
    let n = problem.len();
    debug!(
        ?mode,
        variables = n,
        slots = slots.len(),
        protein = target.protein,
        carbs = target.carbs,
        fats = target.fats,
        "solving serving allocation"
    );

    let p = problem.quadratic(mode);
    let q = problem.linear(settings.supplement_penalty);
    let (a, b, cones) = problem.constraints(&target);

    let solver_settings = DefaultSettings::<f64> {
        max_iter: settings.max_iterations,
        verbose: false,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, solver_settings);
    solver.solve();

    let solution = &solver.solution;
    match &solution.status {
        SolverStatus::Solved | SolverStatus::AlmostSolved => {}
        status => {
            warn!(?status, iterations = solution.iterations, "serving allocation failed");
            return Err(MealError::OptimizationFailed(format!(
                "solver stopped with status {:?} after {} iterations",
                status, solution.iterations
            )));
        }
    }

    let x: Vec<f64> = solution.x.iter().map(|v| v.max(0.0)).collect();

    let mut allocation = Allocation {
        servings: Vec::with_capacity(slots.len()),
        supplements: SupplementServings {
            protein: x[n - 2],
            fat: x[n - 1],
        },
        objective: solution.obj_val,
        iterations: solution.iterations,
    };
    let mut offset = 0;
    for selection in slots {
        let len = selection.foods.len();
        allocation.servings.push(x[offset..offset + len].to_vec());
        offset += len;
    }
    debug_assert_eq!(offset, problem.regular_len());

    let totals = allocation.totals(slots, supplements);
    let protein_gap = (totals.protein - target.protein).abs();
    let fat_gap = (totals.fats - target.fats).abs();
    let carb_excess = totals.carbs - target.carbs;
    if protein_gap > settings.tolerance_for(target.protein)
        || fat_gap > settings.tolerance_for(target.fats)
        || carb_excess > settings.tolerance_for(target.carbs)
    {
        warn!(protein_gap, fat_gap, carb_excess, "solution misses the budget");
        return Err(MealError::OptimizationFailed(format!(
            "solution misses the budget (protein off by {:.3} g, fat off by {:.3} g, carbs over by {:.3} g)",
            protein_gap,
            fat_gap,
            carb_excess.max(0.0)
        )));
    }

    debug!(
        objective = allocation.objective,
        iterations = allocation.iterations,
        supplements = allocation.supplements.total(),
        "serving allocation solved"
    );
    Ok(allocation)
}
