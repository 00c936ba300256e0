use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{MacroBudget, Macros};

/// A named meal of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other,
}

impl MealSlot {
    /// Slots solved together in balance mode.
    pub const BALANCED: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
            MealSlot::Other => "other",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snack => "Snack",
            MealSlot::Other => "Other",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" => Ok(MealSlot::Snack),
            "other" => Ok(MealSlot::Other),
            other => Err(format!(
                "unknown meal slot '{}' (expected breakfast, lunch, dinner, snack or other)",
                other
            )),
        }
    }
}

/// One food portion within a meal slot of a daily log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub slot: MealSlot,

    /// Food id in the catalog.
    pub food: String,

    pub servings: f64,

    /// Macros at the time of planning, so later catalog edits don't rewrite history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macros: Option<Macros>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// One person's plan and portions for a single day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub person: String,

    /// ISO date, `YYYY-MM-DD`.
    pub date: String,

    /// Targets copied from the person when the day was opened.
    #[serde(default)]
    pub required: MacroBudget,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Macros>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(default)]
    pub entries: Vec<MealEntry>,
}

impl DailyLog {
    pub fn new(person: &str, date: &str, required: MacroBudget) -> Self {
        Self {
            person: person.to_string(),
            date: date.to_string(),
            required,
            actual: None,
            notes: String::new(),
            entries: Vec::new(),
        }
    }

    pub fn is_for(&self, person: &str, date: &str) -> bool {
        self.person.eq_ignore_ascii_case(person.trim()) && self.date == date.trim()
    }

    pub fn entries_in(&self, slot: MealSlot) -> impl Iterator<Item = &MealEntry> {
        self.entries.iter().filter(move |e| e.slot == slot)
    }

    /// Replace every entry of `slot` with `entries`.
    pub fn replace_slot(&mut self, slot: MealSlot, entries: Vec<MealEntry>) {
        self.entries.retain(|e| e.slot != slot);
        self.entries.extend(entries);
    }
}

/// Check a zero-padded `YYYY-MM-DD` date that exists on the calendar.
pub fn validate_date(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}
