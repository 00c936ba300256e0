pub mod export;
pub mod prompts;
pub mod render;

pub use export::write_plan_csv;
pub use prompts::{prompt_person, prompt_servings, prompt_slot_foods};
pub use render::{display_food_list, display_meal_plan, display_people};
