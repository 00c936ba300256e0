use serde::{Deserialize, Serialize};

use crate::models::MacroBudget;

fn default_true() -> bool {
    true
}

/// A household member with baseline daily macro targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub name: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub protein_grams: Option<f64>,

    #[serde(default)]
    pub carbs_grams: Option<f64>,

    #[serde(default)]
    pub fats_grams: Option<f64>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Person {
    pub fn new(name: &str, protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            name: name.to_string(),
            notes: String::new(),
            protein_grams: Some(protein),
            carbs_grams: Some(carbs),
            fats_grams: Some(fats),
            is_active: true,
        }
    }

    /// Daily targets as a budget; unset fields stay unset.
    pub fn budget(&self) -> MacroBudget {
        MacroBudget {
            protein: self.protein_grams,
            carbs: self.carbs_grams,
            fats: self.fats_grams,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}
