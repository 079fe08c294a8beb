//! Non-volatile settings store trait
//!
//! A trivial key/value collaborator for scalar settings (per-pump PWM
//! and dispense durations). Reads happen at initialization; writes only
//! on user-confirmed edits, never on every slider tick.

/// Trait for integer settings persistence
pub trait SettingsStore {
    /// Load the value stored under `key`, or `default` if never written
    fn load_i32(&mut self, key: &str, default: i32) -> i32;

    /// Persist `value` under `key`
    fn save_i32(&mut self, key: &str, value: i32);
}
