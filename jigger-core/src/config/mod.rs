//! Application defaults
//!
//! The pump liquid table, the persisted-settings key names, and the
//! built-in mock recipe set used while no controller has ever synced.

use heapless::Vec;

use jigger_protocol::PUMP_CHANNELS;

use crate::cache::MAX_RECIPES;
use crate::model::Recipe;

/// One entry of the pump liquid table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpSlot {
    /// Liquid loaded into this pump, as named in recipes
    pub liquid: &'static str,
    /// Keyword matched against ingredient names when packing a recipe
    /// back into wire slots
    pub keyword: &'static str,
}

/// The single shared pump-to-liquid mapping, slot 0 = pump 1.
///
/// Both directions go through this table: inbound recipe parts name
/// their ingredients from it, and outbound recipe updates resolve
/// ingredients back to slots with it, so the two can never drift apart.
pub const PUMP_TABLE: [PumpSlot; PUMP_CHANNELS] = [
    PumpSlot {
        liquid: "Cocacola",
        keyword: "Coca",
    },
    PumpSlot {
        liquid: "Orange Juice",
        keyword: "Orange",
    },
    PumpSlot {
        liquid: "Vodka",
        keyword: "Vodka",
    },
    PumpSlot {
        liquid: "Grenadine",
        keyword: "Grenadine",
    },
];

/// Slot index for an ingredient name, by keyword containment
pub fn pump_slot_for(name: &str) -> Option<usize> {
    PUMP_TABLE
        .iter()
        .position(|slot| name.contains(slot.keyword))
}

/// Settings-store keys for per-pump PWM duty
pub const PUMP_PWM_KEYS: [&str; PUMP_CHANNELS] = ["p1_pwm", "p2_pwm", "p3_pwm", "p4_pwm"];

/// Settings-store keys for per-pump dispense duration
pub const PUMP_TIME_KEYS: [&str; PUMP_CHANNELS] = ["p1_time", "p2_time", "p3_time", "p4_time"];

/// The built-in fallback recipe set shown while the controller has
/// never synced. Icon and accent color are derived from the names like
/// any other recipe.
pub fn mock_recipes() -> Vec<Recipe, MAX_RECIPES> {
    let mut recipes = Vec::new();
    let mocks = [
        Recipe::named("Cocacola").with_ingredient("Cocacola", 1, 200),
        Recipe::named("Orange Juice").with_ingredient("Orange", 2, 200),
        Recipe::named("Vodka shot").with_ingredient("Vodka", 3, 50),
        Recipe::named("Vodka Coke")
            .with_ingredient("Vodka", 3, 50)
            .with_ingredient("Cocacola", 1, 150),
        Recipe::named("Screwdriver")
            .with_ingredient("Vodka", 3, 50)
            .with_ingredient("Orange", 2, 150),
        Recipe::named("Sex on Beach")
            .with_ingredient("Vodka", 3, 40)
            .with_ingredient("Orange", 2, 100)
            .with_ingredient("Grenadine", 4, 10),
        Recipe::named("Tequila Sun")
            .with_ingredient("Tequila", 3, 50)
            .with_ingredient("Orange", 2, 120)
            .with_ingredient("Grenadine", 4, 10),
        Recipe::named("Shirley T.")
            .with_ingredient("Orange", 2, 100)
            .with_ingredient("Grenadine", 4, 20)
            .with_ingredient("Cocacola", 1, 50),
    ];
    for recipe in mocks {
        let _ = recipes.push(recipe);
    }
    recipes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Icon;

    #[test]
    fn test_pump_slot_lookup() {
        assert_eq!(pump_slot_for("Cocacola"), Some(0));
        assert_eq!(pump_slot_for("Orange"), Some(1));
        assert_eq!(pump_slot_for("Orange Juice"), Some(1));
        assert_eq!(pump_slot_for("Vodka"), Some(2));
        assert_eq!(pump_slot_for("Grenadine"), Some(3));
        assert_eq!(pump_slot_for("Absinthe"), None);
    }

    #[test]
    fn test_mock_set() {
        let mocks = mock_recipes();
        assert_eq!(mocks.len(), 8);
        assert_eq!(mocks[0].name.as_str(), "Cocacola");
        assert_eq!(mocks[7].name.as_str(), "Shirley T.");
        // Metadata is derived, not hand-assigned: Screwdriver has no
        // keyword and falls back to the default styling
        let screwdriver = mocks.iter().find(|r| r.name.as_str() == "Screwdriver").unwrap();
        assert_eq!(screwdriver.icon, Icon::Vodka);
        assert_eq!(screwdriver.color, 0x888888);
    }

    #[test]
    fn test_mock_pump_numbers_are_valid_channels() {
        for recipe in mock_recipes() {
            assert!(!recipe.ingredients.is_empty(), "{}", recipe.name);
            for ingredient in &recipe.ingredients {
                assert!((1..=4).contains(&ingredient.pump), "{}", ingredient.name);
            }
        }
    }
}
