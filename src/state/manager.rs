use std::collections::{BTreeMap, HashMap};

use strsim::jaro_winkler;
use tracing::debug;

use crate::error::{MealError, Result};
use crate::models::{
    validate_date, DailyLog, Food, FoodLine, MacroBudget, Macros, MealEntry, MealPlan, MealSlot,
    Person,
};
use crate::planner::constants::{round_servings, FUZZY_MATCH_THRESHOLD, MAX_SUGGESTIONS};
use crate::planner::budget::entry_macros;
use crate::planner::{FixedSlot, SolverSettings, SupplementPair};
use crate::state::persistence::{HouseholdFile, SupplementIds};

/// Foods, people and daily logs of one household.
pub struct Household {
    /// All foods keyed by lowercase id.
    foods: HashMap<String, Food>,
    people: Vec<Person>,
    supplements: Option<SupplementIds>,
    logs: Vec<DailyLog>,
    settings: SolverSettings,
}

impl Household {
    /// Build a household from its file form, validating solver settings.
    pub fn new(file: HouseholdFile) -> Result<Self> {
        file.solver.validate()?;
        let mut foods = HashMap::new();
        for food in file.foods {
            foods.insert(food.key(), food);
        }
        Ok(Self {
            foods,
            people: file.people,
            supplements: file.supplements,
            logs: file.logs,
            settings: file.solver,
        })
    }

    /// Get a food by id or name (case-insensitive).
    pub fn get_food(&self, query: &str) -> Option<&Food> {
        let key = query.trim().to_lowercase();
        self.foods
            .get(&key)
            .or_else(|| self.foods.values().find(|f| f.name.to_lowercase() == key))
    }

    /// Food names that look like `query`, best match first.
    pub fn suggest_foods(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();
        let mut candidates: Vec<(&Food, f64)> = self
            .foods
            .values()
            .map(|f| (f, jaro_winkler(&f.name.to_lowercase(), &query)))
            .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        candidates
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(f, _)| f.name.clone())
            .collect()
    }

    /// Look up a food, turning a miss into an error with suggestions.
    pub fn resolve_food(&self, query: &str) -> Result<Food> {
        if let Some(food) = self.get_food(query) {
            return Ok(food.clone());
        }
        let suggestions = self.suggest_foods(query);
        if suggestions.is_empty() {
            Err(MealError::FoodNotFound(query.to_string()))
        } else {
            Err(MealError::FoodNotFound(format!(
                "{} (did you mean: {}?)",
                query,
                suggestions.join(", ")
            )))
        }
    }

    /// Resolve several foods, failing on the first unknown one.
    pub fn resolve_foods(&self, queries: &[String]) -> Result<Vec<Food>> {
        queries.iter().map(|q| self.resolve_food(q)).collect()
    }

    /// Active foods that may be picked for a meal, sorted by name.
    ///
    /// Supplements are excluded; the solver adds them on its own.
    pub fn selectable_foods(&self) -> Vec<&Food> {
        let supplement_keys: Vec<String> = self
            .supplements
            .iter()
            .flat_map(|s| [s.protein.to_lowercase(), s.fat.to_lowercase()])
            .collect();
        let mut foods: Vec<&Food> = self
            .foods
            .values()
            .filter(|f| f.is_active && !supplement_keys.contains(&f.key()))
            .collect();
        foods.sort_by(|a, b| a.name.cmp(&b.name));
        foods
    }

    /// All foods, sorted by name.
    pub fn all_foods(&self) -> Vec<&Food> {
        let mut foods: Vec<&Food> = self.foods.values().collect();
        foods.sort_by(|a, b| a.name.cmp(&b.name));
        foods
    }

    /// The configured supplement foods.
    pub fn supplement_pair(&self) -> Result<SupplementPair> {
        let ids = self.supplements.as_ref().ok_or_else(|| {
            MealError::InvalidInput("no supplements configured in the household file".to_string())
        })?;
        let protein = self
            .get_food(&ids.protein)
            .ok_or_else(|| MealError::FoodNotFound(ids.protein.clone()))?;
        let fat = self
            .get_food(&ids.fat)
            .ok_or_else(|| MealError::FoodNotFound(ids.fat.clone()))?;
        Ok(SupplementPair::new(protein.clone(), fat.clone()))
    }

    pub fn get_person(&self, name: &str) -> Result<&Person> {
        self.people
            .iter()
            .find(|p| p.matches(name))
            .ok_or_else(|| MealError::PersonNotFound(name.to_string()))
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// People still being tracked.
    pub fn active_people(&self) -> Vec<&Person> {
        self.people.iter().filter(|p| p.is_active).collect()
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    pub fn find_log(&self, person: &str, date: &str) -> Option<&DailyLog> {
        self.logs.iter().find(|l| l.is_for(person, date))
    }

    /// Get the log for (person, date), creating it from the person's
    /// current targets if it doesn't exist yet.
    pub fn open_log(&mut self, person: &str, date: &str) -> Result<&mut DailyLog> {
        if !validate_date(date) {
            return Err(MealError::InvalidInput(format!(
                "date must be YYYY-MM-DD, got '{}'",
                date
            )));
        }
        let person = self.get_person(person)?;
        let name = person.name.clone();
        let required = person.budget();

        let index = match self.logs.iter().position(|l| l.is_for(&name, date)) {
            Some(i) => i,
            None => {
                debug!(person = %name, date, "opening daily log");
                self.logs.push(DailyLog::new(&name, date, required));
                self.logs.len() - 1
            }
        };
        Ok(&mut self.logs[index])
    }

    /// Record a fixed portion in a daily log.
    pub fn add_entry(
        &mut self,
        person: &str,
        date: &str,
        slot: MealSlot,
        food: &str,
        servings: f64,
    ) -> Result<MealEntry> {
        if !servings.is_finite() || servings <= 0.0 {
            return Err(MealError::InvalidInput(format!(
                "servings must be positive, got {}",
                servings
            )));
        }
        let food = self.resolve_food(food)?;
        let entry = MealEntry {
            slot,
            food: food.id.clone(),
            servings,
            macros: Some(food.macros_for(servings)),
            notes: String::new(),
        };
        let log = self.open_log(person, date)?;
        log.entries.push(entry.clone());
        log.actual = Some(Self::entry_totals(log));
        Ok(entry)
    }

    /// Store the solved slots of `plan` in the log for (person, date).
    ///
    /// Servings are rounded to log precision; anything that rounds to zero is
    /// left out. Fixed slots are not touched.
    pub fn record_plan(&mut self, person: &str, date: &str, plan: &MealPlan) -> Result<()> {
        let mut replacements = Vec::new();
        for slot_plan in plan.slots.iter().filter(|s| !s.fixed) {
            let mut entries = Vec::new();
            for line in slot_plan.lines.iter().chain(&slot_plan.supplement_lines) {
                let servings = round_servings(line.servings);
                if servings <= 0.0 {
                    continue;
                }
                let food = self
                    .get_food(&line.food_id)
                    .ok_or_else(|| MealError::FoodNotFound(line.food_id.clone()))?;
                entries.push(MealEntry {
                    slot: slot_plan.slot,
                    food: food.id.clone(),
                    servings,
                    macros: Some(food.macros_for(servings)),
                    notes: String::new(),
                });
            }
            replacements.push((slot_plan.slot, entries));
        }

        let log = self.open_log(person, date)?;
        for (slot, entries) in replacements {
            log.replace_slot(slot, entries);
        }
        log.actual = Some(Self::entry_totals(log));
        Ok(())
    }

    /// Logged portions grouped by slot, skipping `exclude`.
    ///
    /// Macros are the ones cached on each entry, so the slots agree with
    /// `log_remaining` even after the catalog changes. Foods removed from the
    /// catalog are shown by id.
    pub fn fixed_slots(&self, log: &DailyLog, exclude: MealSlot) -> Result<Vec<FixedSlot>> {
        let mut grouped: BTreeMap<MealSlot, Vec<FoodLine>> = BTreeMap::new();
        for entry in log.entries.iter().filter(|e| e.slot != exclude) {
            let macros = entry_macros(self, entry)?;
            let (name, serving_name) = match self.get_food(&entry.food) {
                Some(food) => (food.name.clone(), food.serving_name.clone()),
                None => (entry.food.clone(), String::new()),
            };
            grouped.entry(entry.slot).or_default().push(FoodLine {
                food_id: entry.food.clone(),
                name,
                serving_name,
                servings: entry.servings,
                macros,
            });
        }
        Ok(grouped
            .into_iter()
            .map(|(slot, lines)| FixedSlot { slot, lines })
            .collect())
    }

    /// Totals of the cached entry macros of a log.
    fn entry_totals(log: &DailyLog) -> Macros {
        log.entries.iter().filter_map(|e| e.macros).sum()
    }

    /// Daily targets for a person, as a budget.
    pub fn person_budget(&self, name: &str) -> Result<MacroBudget> {
        Ok(self.get_person(name)?.budget())
    }

    /// Convert state back to its file form for serialization.
    pub fn to_file(&self) -> HouseholdFile {
        let mut foods: Vec<Food> = self.foods.values().cloned().collect();
        foods.sort_by(|a, b| a.id.cmp(&b.id));
        HouseholdFile {
            foods,
            people: self.people.clone(),
            supplements: self.supplements.clone(),
            logs: self.logs.clone(),
            solver: self.settings.clone(),
        }
    }

    /// Count of foods in the catalog.
    pub fn food_count(&self) -> usize {
        self.foods.len()
    }
}
