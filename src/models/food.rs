use serde::{Deserialize, Serialize};

use crate::models::Macros;

fn default_true() -> bool {
    true
}

/// A food item or labeled recipe with known macros per serving.
///
/// A serving is whatever unit makes sense for the food: 100 g, one slice,
/// one scoop. Fractional servings are allowed everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub category: String,

    /// Multi-ingredient recipe rather than a single ingredient.
    #[serde(default)]
    pub is_recipe: bool,

    /// Protein (g) per serving.
    pub protein: f64,

    /// Carbohydrates (g) per serving.
    pub carbs: f64,

    /// Fat (g) per serving.
    pub fats: f64,

    /// e.g. "1 slice", "100 g".
    #[serde(default)]
    pub serving_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Inactive foods stay in history but are hidden from planning.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Food {
    pub fn new(id: &str, name: &str, protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            brand: String::new(),
            category: String::new(),
            is_recipe: false,
            protein,
            carbs,
            fats,
            serving_name: String::new(),
            notes: String::new(),
            is_active: true,
        }
    }

    /// Builder-style serving label.
    pub fn with_serving(mut self, serving_name: &str) -> Self {
        self.serving_name = serving_name.to_string();
        self
    }

    /// Macros in one serving.
    #[inline]
    pub fn macros(&self) -> Macros {
        Macros::new(self.protein, self.carbs, self.fats)
    }

    /// Macros in `servings` servings.
    #[inline]
    pub fn macros_for(&self, servings: f64) -> Macros {
        self.macros().scaled(servings)
    }

    /// Coefficients must be finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.protein, self.carbs, self.fats]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Canonical key for lookups (lowercase id).
    pub fn key(&self) -> String {
        self.id.to_lowercase()
    }

    /// Label used in tables, falling back to the name alone.
    pub fn display_label(&self) -> String {
        if self.serving_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.serving_name)
        }
    }
}

impl PartialEq for Food {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Food {}

impl std::hash::Hash for Food {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken() -> Food {
        Food::new("chicken-breast", "Chicken Breast", 31.0, 0.0, 3.6).with_serving("100 g")
    }

    #[test]
    fn test_macros_for_servings() {
        let m = chicken().macros_for(1.5);
        assert!((m.protein - 46.5).abs() < 1e-9);
        assert!((m.fats - 5.4).abs() < 1e-9);
        assert_eq!(m.carbs, 0.0);
    }

    #[test]
    fn test_is_valid() {
        assert!(chicken().is_valid());

        let mut negative = chicken();
        negative.fats = -1.0;
        assert!(!negative.is_valid());

        let mut nan = chicken();
        nan.protein = f64::NAN;
        assert!(!nan.is_valid());
    }

    #[test]
    fn test_equality_case_insensitive() {
        let a = chicken();
        let mut b = chicken();
        b.id = "CHICKEN-BREAST".to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{"id": "rice", "name": "Rice", "protein": 2.7, "carbs": 28, "fats": 0.3}"#;
        let food: Food = serde_json::from_str(json).unwrap();
        assert!(food.is_active);
        assert!(!food.is_recipe);
        assert!(food.notes.is_empty());
        assert!(food.serving_name.is_empty());
        assert_eq!(food.display_label(), "Rice");
    }

    #[test]
    fn test_recipe_fields_round_trip() {
        let json = r#"{"id": "chili", "name": "Turkey Chili", "protein": 28, "carbs": 20, "fats": 9,
                       "is_recipe": true, "notes": "batch of 6"}"#;
        let food: Food = serde_json::from_str(json).unwrap();
        assert!(food.is_recipe);
        assert_eq!(food.notes, "batch of 6");

        let back = serde_json::to_string(&food).unwrap();
        assert!(back.contains("\"is_recipe\":true"));
        assert!(!serde_json::to_string(&Food::new("rice", "Rice", 2.7, 28.0, 0.3))
            .unwrap()
            .contains("notes"));
    }
}
