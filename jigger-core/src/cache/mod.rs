//! Reconciliation cache
//!
//! The single client-side source of truth for recipes and pump
//! calibration. Three kinds of data meet here and must not trample each
//! other: authoritative parts streamed by the controller, optimistic
//! local edits applied before the controller confirms them, and the
//! built-in mock fallback shown while no controller has ever answered.
//!
//! The cache has one writer (the sync dispatch and UI intents on the
//! same cooperative loop) and any number of polling readers. Readers
//! detect changes through [`RecipeCache::last_update_ms`]; there is no
//! push notification.

use heapless::Vec;

use jigger_protocol::{PumpSync, RecipePart};

use crate::config::mock_recipes;
use crate::model::{PumpCalibration, Recipe};

/// Maximum recipes held at once
pub const MAX_RECIPES: usize = 16;

/// Client-side mirror of the controller's recipes and calibration
#[derive(Debug, Clone, Default)]
pub struct RecipeCache {
    recipes: Vec<Recipe, MAX_RECIPES>,
    pumps: PumpCalibration,
    recipes_synced: bool,
    using_mocks: bool,
    last_update_ms: u64,
}

impl RecipeCache {
    /// Create an empty cache: no recipes, default calibration, nothing
    /// synced
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sync session has started or completed
    pub fn is_recipes_synced(&self) -> bool {
        self.recipes_synced
    }

    /// Whether the current recipe set is the built-in fallback
    pub fn is_using_mocks(&self) -> bool {
        self.using_mocks
    }

    /// All cached recipes, in arrival order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Look up a recipe by exact name
    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name.as_str() == name)
    }

    /// Current pump calibration
    pub fn pumps(&self) -> &PumpCalibration {
        &self.pumps
    }

    /// Timestamp of the last mutation, for UI change detection
    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    /// Load the built-in mock recipe set.
    ///
    /// A no-op when the cache already holds real, non-empty, synced
    /// data - mocks never overwrite live data.
    pub fn load_mocks(&mut self, now_ms: u64) {
        if self.recipes_synced && !self.recipes.is_empty() && !self.using_mocks {
            return;
        }
        info!("loading mock recipes");
        self.recipes = mock_recipes();
        self.recipes_synced = true;
        self.using_mocks = true;
        self.last_update_ms = now_ms;
    }

    /// Ingest one part of a controller recipe stream.
    ///
    /// Part index 0 signals a new sync session; it and any part that
    /// arrives while mocks are showing clear the collection before
    /// ingesting. This is the only path by which controller-authoritative
    /// recipe data enters the cache.
    pub fn apply_recipe_part(&mut self, part: &RecipePart, now_ms: u64) {
        if part.index == 0 || self.using_mocks {
            if self.using_mocks {
                info!("real recipe data received, clearing mocks");
            } else {
                info!("new sync session, clearing stale recipes");
            }
            self.recipes.clear();
            self.recipes_synced = false;
            self.using_mocks = false;
        }

        self.recipes_synced = true;

        let recipe = Recipe::from_part(part);
        if self.recipes.push(recipe).is_err() {
            warn!("recipe list full, dropping part {}", part.index);
        }
        self.last_update_ms = now_ms;
    }

    /// Insert a locally restored recipe (e.g. from saved config).
    ///
    /// Clears mock or pre-sync leftovers the way a stream part would,
    /// but carries no part-sequencing contract.
    pub fn add_recipe_from_config(&mut self, mut recipe: Recipe, now_ms: u64) {
        if self.using_mocks {
            self.recipes.clear();
            self.using_mocks = false;
        }
        if !self.recipes_synced {
            self.recipes.clear();
            self.recipes_synced = true;
        }
        recipe.apply_metadata();
        if self.recipes.push(recipe).is_err() {
            warn!("recipe list full, dropping config recipe");
        }
        self.last_update_ms = now_ms;
    }

    /// Optimistically overwrite the ingredient list of the recipe whose
    /// name matches exactly, ahead of any controller confirmation.
    ///
    /// An unknown name is a warning no-op: the UI only edits recipes it
    /// read from this cache, so a miss means a stale screen, not a
    /// fault.
    pub fn update_recipe(&mut self, edited: &Recipe, now_ms: u64) {
        for recipe in self.recipes.iter_mut() {
            if recipe.name == edited.name {
                recipe.ingredients = edited.ingredients.clone();
                self.last_update_ms = now_ms;
                debug!("optimistic update for {}", edited.name.as_str());
                return;
            }
        }
        warn!("recipe not found for update: {}", edited.name.as_str());
    }

    /// Replace pump calibration wholesale from a controller sync.
    ///
    /// Calibration has no optimistic path - the controller is always
    /// authoritative for it.
    pub fn apply_pump_sync(&mut self, sync: &PumpSync, now_ms: u64) {
        self.pumps.apply_sync(sync);
        self.last_update_ms = now_ms;
    }

    /// Drop all recipes and reset the sync flags
    pub fn clear_recipes(&mut self) {
        self.recipes.clear();
        self.recipes_synced = false;
        self.using_mocks = false;
    }
}
