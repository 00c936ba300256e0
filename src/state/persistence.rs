use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{DailyLog, Food, Person};
use crate::planner::SolverSettings;
use crate::state::Household;

/// Catalog ids of the two supplement foods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementIds {
    pub protein: String,
    pub fat: String,
}

/// On-disk shape of the household file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HouseholdFile {
    #[serde(default)]
    pub foods: Vec<Food>,

    #[serde(default)]
    pub people: Vec<Person>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplements: Option<SupplementIds>,

    #[serde(default)]
    pub logs: Vec<DailyLog>,

    #[serde(default)]
    pub solver: SolverSettings,
}

/// Load a household from a JSON file.
///
/// Foods are deduplicated by lowercase id (last occurrence wins) and solver
/// settings are validated here, before any plan is attempted.
pub fn load_household<P: AsRef<Path>>(path: P) -> Result<Household> {
    let content = fs::read_to_string(path.as_ref())?;
    let file: HouseholdFile = serde_json::from_str(&content)?;
    debug!(
        foods = file.foods.len(),
        people = file.people.len(),
        logs = file.logs.len(),
        path = %path.as_ref().display(),
        "loaded household"
    );
    Household::new(file)
}

/// Save a household to a JSON file.
pub fn save_household<P: AsRef<Path>>(path: P, household: &Household) -> Result<()> {
    let file = household.to_file();
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path.as_ref(), json)?;
    debug!(
        foods = file.foods.len(),
        logs = file.logs.len(),
        path = %path.as_ref().display(),
        "saved household"
    );
    Ok(())
}
