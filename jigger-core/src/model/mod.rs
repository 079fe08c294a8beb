//! Recipe and pump calibration data types
//!
//! The client-side mirror of what the pump controller knows: cocktail
//! recipes keyed by name, and per-channel pump calibration.

pub mod calibration;
pub mod recipe;

pub use calibration::{PumpCalibration, DEFAULT_PUMP_PWM, DEFAULT_PUMP_TIME_MS};
pub use recipe::{Icon, Ingredient, Recipe, MAX_INGREDIENTS, MAX_LIQUID_NAME_LEN, MAX_RECIPE_NAME_LEN};
