pub mod budget;
pub mod constants;
pub mod formatter;
pub mod settings;
pub mod solver;

pub use budget::{consumed, log_remaining, logged_totals, remaining_budget};
pub use constants::*;
pub use formatter::{format_balanced, format_remaining, FixedSlot};
pub use settings::SolverSettings;
pub use solver::{solve, Allocation, SlotSelection, SupplementPair, SupplementServings};
