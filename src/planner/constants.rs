/// Objective weight per serving of either supplement.
///
/// Empirically tuned; large enough that regular foods always win when they
/// can close the gap on their own.
pub const SUPPLEMENT_PENALTY: f64 = 1000.0;

/// Servings at or below this are treated as zero in breakdowns.
pub const ZERO_THRESHOLD: f64 = 0.001;

/// Iteration cap handed to the numerical solver.
pub const MAX_SOLVER_ITERATIONS: u32 = 1000;

/// Allowed constraint residual, relative to max(1, |target|).
pub const CONSTRAINT_TOLERANCE: f64 = 1e-3;

/// Decimal places kept when servings are written to a daily log.
pub const LOGGED_SERVING_DECIMALS: i32 = 2;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// Maximum suggestions offered for an unknown food.
pub const MAX_SUGGESTIONS: usize = 5;

/// Round a serving count the way it is stored in a log.
pub fn round_servings(servings: f64) -> f64 {
    let factor = 10_f64.powi(LOGGED_SERVING_DECIMALS);
    (servings * factor).round() / factor
}
