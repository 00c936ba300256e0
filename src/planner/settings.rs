use serde::{Deserialize, Serialize};

use crate::error::{MealError, Result};
use crate::planner::constants::{
    CONSTRAINT_TOLERANCE, MAX_SOLVER_ITERATIONS, SUPPLEMENT_PENALTY, ZERO_THRESHOLD,
};

/// Runtime-configurable solver parameters.
///
/// Every field falls back to its constant when missing from the household
/// file, so `"solver": {}` and no `"solver"` key at all mean the same thing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub supplement_penalty: f64,
    pub zero_threshold: f64,
    pub max_iterations: u32,
    pub constraint_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            supplement_penalty: SUPPLEMENT_PENALTY,
            zero_threshold: ZERO_THRESHOLD,
            max_iterations: MAX_SOLVER_ITERATIONS,
            constraint_tolerance: CONSTRAINT_TOLERANCE,
        }
    }
}

impl SolverSettings {
    /// Reject parameters the solver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.supplement_penalty.is_finite() || self.supplement_penalty <= 0.0 {
            return Err(MealError::InvalidSettings(format!(
                "supplement_penalty must be positive, got {}",
                self.supplement_penalty
            )));
        }
        if !self.zero_threshold.is_finite() || self.zero_threshold < 0.0 {
            return Err(MealError::InvalidSettings(format!(
                "zero_threshold must be non-negative, got {}",
                self.zero_threshold
            )));
        }
        if self.max_iterations == 0 {
            return Err(MealError::InvalidSettings(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.constraint_tolerance.is_finite() || self.constraint_tolerance <= 0.0 {
            return Err(MealError::InvalidSettings(format!(
                "constraint_tolerance must be positive, got {}",
                self.constraint_tolerance
            )));
        }
        Ok(())
    }

    /// Absolute tolerance for a constraint with the given target.
    pub fn tolerance_for(&self, target: f64) -> f64 {
        self.constraint_tolerance * target.abs().max(1.0)
    }

    /// Format settings as a compact string for logging.
    pub fn display(&self) -> String {
        format!(
            "penalty={:.1} zero={:.4} iters={} tol={:.1e}",
            self.supplement_penalty,
            self.zero_threshold,
            self.max_iterations,
            self.constraint_tolerance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_constants() {
        let settings = SolverSettings::default();
        assert_eq!(settings.supplement_penalty, SUPPLEMENT_PENALTY);
        assert_eq!(settings.zero_threshold, ZERO_THRESHOLD);
        assert_eq!(settings.max_iterations, MAX_SOLVER_ITERATIONS);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings: SolverSettings =
            serde_json::from_str(r#"{"supplement_penalty": 250}"#).unwrap();
        assert_eq!(settings.supplement_penalty, 250.0);
        assert_eq!(settings.zero_threshold, ZERO_THRESHOLD);
        assert_eq!(settings.max_iterations, MAX_SOLVER_ITERATIONS);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_penalty = SolverSettings {
            supplement_penalty: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_penalty.validate(),
            Err(MealError::InvalidSettings(_))
        ));

        let no_iterations = SolverSettings {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(no_iterations.validate().is_err());

        let negative_threshold = SolverSettings {
            zero_threshold: -0.5,
            ..Default::default()
        };
        assert!(negative_threshold.validate().is_err());
    }

    #[test]
    fn test_tolerance_scales_with_target() {
        let settings = SolverSettings::default();
        assert!((settings.tolerance_for(0.0) - CONSTRAINT_TOLERANCE).abs() < 1e-12);
        assert!((settings.tolerance_for(200.0) - 200.0 * CONSTRAINT_TOLERANCE).abs() < 1e-12);
    }
}
