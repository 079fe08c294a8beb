//! Pump calibration data
//!
//! One PWM duty and dispense duration per physical pump channel. The
//! controller is the source of truth; values it broadcasts replace the
//! local ones wholesale. Durations are kept in milliseconds here - the
//! wire carries seconds, and the conversion happens at the boundary.

use jigger_protocol::{PumpSync, PUMP_CHANNELS};

use crate::config::{PUMP_PWM_KEYS, PUMP_TIME_KEYS};
use crate::traits::SettingsStore;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default PWM duty per pump
pub const DEFAULT_PUMP_PWM: u8 = 255;

/// Default dispense duration per pump in milliseconds
pub const DEFAULT_PUMP_TIME_MS: u32 = 1600;

/// Calibration for all pump channels
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PumpCalibration {
    /// PWM duty per channel, 0..=255
    pub pwm: [u8; PUMP_CHANNELS],
    /// Dispense duration per channel in milliseconds
    pub time_ms: [u32; PUMP_CHANNELS],
    /// Whether a controller sync has replaced the defaults
    pub synced: bool,
}

impl Default for PumpCalibration {
    fn default() -> Self {
        Self {
            pwm: [DEFAULT_PUMP_PWM; PUMP_CHANNELS],
            time_ms: [DEFAULT_PUMP_TIME_MS; PUMP_CHANNELS],
            synced: false,
        }
    }
}

impl PumpCalibration {
    /// Replace all channels from a controller sync payload.
    ///
    /// PWM values are clamped into duty range; seconds are rounded to
    /// whole milliseconds.
    pub fn apply_sync(&mut self, sync: &PumpSync) {
        for i in 0..PUMP_CHANNELS {
            self.pwm[i] = sync.pwm[i].clamp(0, 255) as u8;
            self.time_ms[i] = seconds_to_ms(sync.seconds[i]);
        }
        self.synced = true;
    }

    /// Hydrate from the settings store, falling back to the built-in
    /// defaults for keys never written
    pub fn load_from<S: SettingsStore>(store: &mut S) -> Self {
        let mut cal = Self::default();
        for i in 0..PUMP_CHANNELS {
            cal.pwm[i] = store
                .load_i32(PUMP_PWM_KEYS[i], DEFAULT_PUMP_PWM as i32)
                .clamp(0, 255) as u8;
            cal.time_ms[i] = store
                .load_i32(PUMP_TIME_KEYS[i], DEFAULT_PUMP_TIME_MS as i32)
                .max(0) as u32;
        }
        cal
    }

    /// Persist all channels to the settings store
    pub fn store_to<S: SettingsStore>(&self, store: &mut S) {
        for i in 0..PUMP_CHANNELS {
            store.save_i32(PUMP_PWM_KEYS[i], self.pwm[i] as i32);
            store.save_i32(PUMP_TIME_KEYS[i], self.time_ms[i].min(i32::MAX as u32) as i32);
        }
    }
}

/// Round wire seconds to whole milliseconds
pub(crate) fn seconds_to_ms(seconds: f32) -> u32 {
    if seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0 + 0.5) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeStore {
        writes: heapless::Vec<(heapless::String<16>, i32), 16>,
    }

    impl SettingsStore for FakeStore {
        fn load_i32(&mut self, key: &str, default: i32) -> i32 {
            self.writes
                .iter()
                .rev()
                .find(|(k, _)| k.as_str() == key)
                .map(|(_, v)| *v)
                .unwrap_or(default)
        }

        fn save_i32(&mut self, key: &str, value: i32) {
            let _ = self
                .writes
                .push((heapless::String::try_from(key).unwrap(), value));
        }
    }

    #[test]
    fn test_defaults() {
        let cal = PumpCalibration::default();
        assert_eq!(cal.pwm, [255; 4]);
        assert_eq!(cal.time_ms, [1600; 4]);
        assert!(!cal.synced);
    }

    #[test]
    fn test_apply_sync_converts_and_marks() {
        let mut cal = PumpCalibration::default();
        cal.apply_sync(&PumpSync {
            pwm: [200, 300, -5, 0],
            seconds: [1.6, 2.25, 0.733, 0.0],
        });
        assert_eq!(cal.pwm, [200, 255, 0, 0]);
        assert_eq!(cal.time_ms, [1600, 2250, 733, 0]);
        assert!(cal.synced);
    }

    #[test]
    fn test_seconds_to_ms_rounds() {
        assert_eq!(seconds_to_ms(1.6), 1600);
        assert_eq!(seconds_to_ms(0.0), 0);
        assert_eq!(seconds_to_ms(-1.0), 0);
        assert_eq!(seconds_to_ms(0.0005), 1);
    }

    #[test]
    fn test_store_roundtrip() {
        let mut store = FakeStore::default();
        let mut cal = PumpCalibration::default();
        cal.pwm = [10, 20, 30, 40];
        cal.time_ms = [100, 200, 300, 400];
        cal.store_to(&mut store);

        let loaded = PumpCalibration::load_from(&mut store);
        assert_eq!(loaded.pwm, cal.pwm);
        assert_eq!(loaded.time_ms, cal.time_ms);
        // A settings hydrate never counts as a controller sync
        assert!(!loaded.synced);
    }

    #[test]
    fn test_load_from_empty_store_yields_defaults() {
        let mut store = FakeStore::default();
        assert_eq!(PumpCalibration::load_from(&mut store), PumpCalibration::default());
    }
}
