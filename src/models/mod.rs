mod food;
mod log;
mod macros;
mod person;
mod plan;

pub use food::Food;
pub use log::{validate_date, DailyLog, MealEntry, MealSlot};
pub use macros::{MacroBudget, Macros};
pub use person::Person;
pub use plan::{FoodLine, MealPlan, ObjectiveMode, SlotPlan};
