pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{MealError, Result};
pub use models::{Food, MacroBudget, Macros, MealPlan, MealSlot, ObjectiveMode};
pub use planner::{solve, Allocation, SlotSelection, SolverSettings, SupplementPair};
