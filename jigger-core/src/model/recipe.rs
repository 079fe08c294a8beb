//! Cocktail recipes and their derived display metadata
//!
//! A recipe's identity is its name (case-sensitive exact match); no
//! numeric id crosses the wire apart from the part-sequencing index of
//! a sync session. Icon and accent color are cosmetic metadata derived
//! deterministically from the name, so both mock and controller-sourced
//! recipes render the same way.

use heapless::{String, Vec};

use jigger_protocol::{RecipePart, NAME_SLOT, PUMP_CHANNELS};

use crate::config::{pump_slot_for, PUMP_TABLE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum recipe name length (bounded by the wire name slot)
pub const MAX_RECIPE_NAME_LEN: usize = NAME_SLOT;

/// Maximum liquid name length
pub const MAX_LIQUID_NAME_LEN: usize = 16;

/// Maximum ingredients per recipe (one per pump channel)
pub const MAX_INGREDIENTS: usize = PUMP_CHANNELS;

/// Built-in cocktail icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Icon {
    CocaCola,
    GinTonic,
    Vodka,
    SexOnBeach,
    PornStar,
}

/// Keyword table for icon/color assignment, checked in order against
/// the recipe name; first match wins
const METADATA_TABLE: [(&str, Icon, u32); 6] = [
    ("Coca", Icon::CocaCola, 0xFF0000),
    ("Orange", Icon::GinTonic, 0xFFA500),
    ("Vodka", Icon::Vodka, 0x00FFFF),
    ("Sex", Icon::SexOnBeach, 0xFF1493),
    ("Tequila", Icon::PornStar, 0xFF4500),
    ("Gin", Icon::GinTonic, 0xADD8E6),
];

/// Fallback icon and accent color when no keyword matches
const METADATA_DEFAULT: (Icon, u32) = (Icon::Vodka, 0x888888);

/// One ingredient of a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ingredient {
    pub name: String<MAX_LIQUID_NAME_LEN>,
    /// Pump channel, 1..=4
    pub pump: u8,
    pub quantity_ml: u16,
}

/// A cocktail recipe
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recipe {
    /// Unique key within the cache
    pub name: String<MAX_RECIPE_NAME_LEN>,
    /// Representative 24-bit RGB accent color, derived from the name
    pub color: u32,
    /// Built-in icon, derived from the name
    pub icon: Icon,
    pub ingredients: Vec<Ingredient, MAX_INGREDIENTS>,
}

impl Recipe {
    /// Create an empty recipe with metadata derived from `name`
    pub fn named(name: &str) -> Self {
        let (icon, color) = metadata_for(name);
        Self {
            name: clip(name),
            color,
            icon,
            ingredients: Vec::new(),
        }
    }

    /// Builder-style ingredient append, for defaults and tests.
    /// Extra ingredients beyond the pump count are dropped.
    pub fn with_ingredient(mut self, name: &str, pump: u8, quantity_ml: u16) -> Self {
        let _ = self.ingredients.push(Ingredient {
            name: clip(name),
            pump,
            quantity_ml,
        });
        self
    }

    /// Re-derive icon and accent color from the current name
    pub fn apply_metadata(&mut self) {
        let (icon, color) = metadata_for(&self.name);
        self.icon = icon;
        self.color = color;
    }

    /// Build a recipe from one part of a controller recipe stream.
    ///
    /// The four millilitre slots map positionally onto the pump liquid
    /// table; zero-quantity slots carry no ingredient.
    pub fn from_part(part: &RecipePart) -> Self {
        let mut recipe = Recipe::named(&part.name);
        for (slot, &ml) in part.ml_per_pump.iter().enumerate() {
            if ml > 0 {
                recipe = recipe.with_ingredient(PUMP_TABLE[slot].liquid, slot as u8 + 1, ml);
            }
        }
        recipe
    }

    /// Pack this recipe into wire slots for a recipe update push.
    ///
    /// Ingredients map back onto slots through the shared pump table;
    /// an ingredient whose name matches no pump liquid is dropped.
    /// Index and total are not used for update lookups on the
    /// controller, which resolves the recipe by name.
    pub fn to_part(&self) -> RecipePart {
        let mut ml_per_pump = [0u16; PUMP_CHANNELS];
        for ingredient in &self.ingredients {
            if let Some(slot) = pump_slot_for(&ingredient.name) {
                ml_per_pump[slot] = ingredient.quantity_ml;
            }
        }
        RecipePart {
            index: 0,
            total: 0,
            name: clip(&self.name),
            ml_per_pump,
        }
    }
}

/// Icon and accent color for a recipe name
pub fn metadata_for(name: &str) -> (Icon, u32) {
    for &(keyword, icon, color) in METADATA_TABLE.iter() {
        if name.contains(keyword) {
            return (icon, color);
        }
    }
    METADATA_DEFAULT
}

/// Copy `s` into a bounded string, truncating at a character boundary
pub(crate) fn clip<const N: usize>(s: &str) -> String<N> {
    let mut end = s.len().min(N);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::new();
    let _ = out.push_str(&s[..end]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str, index: u8, total: u8, ml: [u16; 4]) -> RecipePart {
        RecipePart {
            index,
            total,
            name: String::try_from(name).unwrap(),
            ml_per_pump: ml,
        }
    }

    #[test]
    fn test_metadata_table_order() {
        assert_eq!(metadata_for("Cocacola"), (Icon::CocaCola, 0xFF0000));
        assert_eq!(metadata_for("Orange Juice"), (Icon::GinTonic, 0xFFA500));
        assert_eq!(metadata_for("Sex on Beach"), (Icon::SexOnBeach, 0xFF1493));
        assert_eq!(metadata_for("Tequila Sun"), (Icon::PornStar, 0xFF4500));
        assert_eq!(metadata_for("Gin Tonic"), (Icon::GinTonic, 0xADD8E6));
        // "Vodka Coke" has no "Coca"; "Vodka" is the first keyword that hits
        assert_eq!(metadata_for("Vodka Coke"), (Icon::Vodka, 0x00FFFF));
    }

    #[test]
    fn test_metadata_fallback() {
        assert_eq!(metadata_for("Screwdriver"), (Icon::Vodka, 0x888888));
        assert_eq!(metadata_for(""), (Icon::Vodka, 0x888888));
    }

    #[test]
    fn test_from_part_skips_empty_slots() {
        let recipe = Recipe::from_part(&part("Vodka Coke", 0, 1, [150, 0, 50, 0]));
        assert_eq!(recipe.name.as_str(), "Vodka Coke");
        assert_eq!(recipe.ingredients.len(), 2);
        // Slot order follows the pump table
        assert_eq!(recipe.ingredients[0].name.as_str(), "Cocacola");
        assert_eq!(recipe.ingredients[0].pump, 1);
        assert_eq!(recipe.ingredients[0].quantity_ml, 150);
        assert_eq!(recipe.ingredients[1].name.as_str(), "Vodka");
        assert_eq!(recipe.ingredients[1].pump, 3);
        assert_eq!(recipe.ingredients[1].quantity_ml, 50);
    }

    #[test]
    fn test_to_part_maps_by_keyword() {
        let recipe = Recipe::named("Sex on Beach")
            .with_ingredient("Vodka", 3, 40)
            .with_ingredient("Orange", 2, 100)
            .with_ingredient("Grenadine", 4, 10);
        let part = recipe.to_part();
        assert_eq!(part.name.as_str(), "Sex on Beach");
        assert_eq!(part.ml_per_pump, [0, 100, 40, 10]);
        assert_eq!(part.index, 0);
        assert_eq!(part.total, 0);
    }

    #[test]
    fn test_to_part_drops_unknown_liquid() {
        let recipe = Recipe::named("Mystery").with_ingredient("Absinthe", 1, 30);
        assert_eq!(recipe.to_part().ml_per_pump, [0, 0, 0, 0]);
    }

    #[test]
    fn test_part_roundtrip_through_recipe() {
        let original = part("Screwdriver", 0, 1, [0, 150, 50, 0]);
        let rebuilt = Recipe::from_part(&original).to_part();
        assert_eq!(rebuilt.name, original.name);
        assert_eq!(rebuilt.ml_per_pump, original.ml_per_pump);
    }

    #[test]
    fn test_clip_respects_char_boundary() {
        let clipped: String<4> = clip("ab\u{00e9}z");
        // The accented character straddles the limit and is dropped whole
        assert_eq!(clipped.as_str(), "ab\u{00e9}");
        let clipped: String<3> = clip("ab\u{00e9}z");
        assert_eq!(clipped.as_str(), "ab");
    }
}
