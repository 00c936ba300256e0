mod manager;
mod persistence;

pub use manager::Household;
pub use persistence::{load_household, save_household, HouseholdFile, SupplementIds};
