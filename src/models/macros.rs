use std::ops::{Add, AddAssign, Div, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{MealError, Result};

/// Grams of protein, carbohydrate and fat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Macros {
    pub fn new(protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            protein,
            carbs,
            fats,
        }
    }

    /// Combined grams of all three macros.
    #[inline]
    pub fn grams(&self) -> f64 {
        self.protein + self.carbs + self.fats
    }

    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fats: self.fats * factor,
        }
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fats: self.fats + rhs.fats,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        self.protein += rhs.protein;
        self.carbs += rhs.carbs;
        self.fats += rhs.fats;
    }
}

impl Sub for Macros {
    type Output = Macros;

    fn sub(self, rhs: Macros) -> Macros {
        Macros {
            protein: self.protein - rhs.protein,
            carbs: self.carbs - rhs.carbs,
            fats: self.fats - rhs.fats,
        }
    }
}

impl Div<f64> for Macros {
    type Output = Macros;

    fn div(self, rhs: f64) -> Macros {
        self.scaled(1.0 / rhs)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Macros {
        iter.fold(Macros::default(), |acc, m| acc + m)
    }
}

/// Macro targets as stored on a person or a daily log.
///
/// Carbohydrate is a ceiling; protein and fat are exact targets. Any of the
/// three may be unset until someone fills it in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroBudget {
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
}

impl MacroBudget {
    pub fn new(protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            protein: Some(protein),
            carbs: Some(carbs),
            fats: Some(fats),
        }
    }

    /// Resolve to concrete grams, failing on the first unset target.
    pub fn require(&self) -> Result<Macros> {
        let protein = self.protein.ok_or(MealError::MissingTargets("protein"))?;
        let carbs = self.carbs.ok_or(MealError::MissingTargets("carbohydrate"))?;
        let fats = self.fats.ok_or(MealError::MissingTargets("fat"))?;
        Ok(Macros::new(protein, carbs, fats))
    }

    /// Subtract consumed grams from each set target.
    pub fn remaining_after(&self, consumed: &Macros) -> MacroBudget {
        MacroBudget {
            protein: self.protein.map(|p| p - consumed.protein),
            carbs: self.carbs.map(|c| c - consumed.carbs),
            fats: self.fats.map(|f| f - consumed.fats),
        }
    }
}

impl From<Macros> for MacroBudget {
    fn from(m: Macros) -> Self {
        MacroBudget::new(m.protein, m.carbs, m.fats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grams_and_scaling() {
        let m = Macros::new(31.0, 0.0, 3.6);
        assert!((m.grams() - 34.6).abs() < 1e-9);
        let doubled = m.scaled(2.0);
        assert!((doubled.protein - 62.0).abs() < 1e-9);
        assert!((doubled.fats - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_require_reports_missing_field() {
        let budget = MacroBudget {
            protein: Some(120.0),
            carbs: None,
            fats: Some(60.0),
        };
        match budget.require() {
            Err(MealError::MissingTargets(field)) => assert_eq!(field, "carbohydrate"),
            other => panic!("expected MissingTargets, got {:?}", other),
        }
    }

    #[test]
    fn test_remaining_keeps_unset_fields() {
        let budget = MacroBudget {
            protein: Some(150.0),
            carbs: Some(30.0),
            fats: None,
        };
        let left = budget.remaining_after(&Macros::new(50.0, 10.0, 20.0));
        assert_eq!(left.protein, Some(100.0));
        assert_eq!(left.carbs, Some(20.0));
        assert_eq!(left.fats, None);
    }
}
