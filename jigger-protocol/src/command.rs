//! Pump calibration text command
//!
//! Calibration pushes ride in the record's text slot as
//! `pump:<id>:<pwm>:<seconds>`, e.g. `pump:2:255:1.60`. The display node
//! keeps durations in milliseconds internally; the wire carries seconds
//! with two decimal places, so the conversion lives here next to the
//! format itself.

use core::fmt::Write;

use heapless::String;

use crate::message::MAX_TEXT_LEN;

/// Number of pump channels addressable by a command
const PUMP_ID_MAX: u8 = 4;

/// Errors produced while parsing a calibration command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Not of the form `pump:<id>:<pwm>:<seconds>`
    Malformed,
    /// Pump id outside 1..=4
    PumpOutOfRange,
}

/// A single pump's calibration push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpCommand {
    /// Pump channel, 1..=4
    pub pump: u8,
    /// PWM duty, 0..=255
    pub pwm: u8,
    /// Dispense duration in milliseconds
    pub duration_ms: u32,
}

impl PumpCommand {
    /// Render as wire text, duration converted to seconds with two
    /// decimal places
    pub fn to_text(&self) -> String<MAX_TEXT_LEN> {
        let mut out = String::new();
        // Worst case "pump:4:255:4294967.30" is 21 bytes, well inside the slot
        let _ = write!(
            out,
            "pump:{}:{}:{:.2}",
            self.pump,
            self.pwm,
            self.duration_ms as f32 / 1000.0
        );
        out
    }

    /// Parse wire text back into a command, seconds rounded to whole
    /// milliseconds
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        let mut fields = text.split(':');
        if fields.next() != Some("pump") {
            return Err(CommandError::Malformed);
        }
        let pump: u8 = parse_field(fields.next())?;
        let pwm: u8 = parse_field(fields.next())?;
        let seconds: f32 = parse_field(fields.next())?;
        if fields.next().is_some() {
            return Err(CommandError::Malformed);
        }
        if pump < 1 || pump > PUMP_ID_MAX {
            return Err(CommandError::PumpOutOfRange);
        }
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(CommandError::Malformed);
        }
        Ok(Self {
            pump,
            pwm,
            duration_ms: (seconds * 1000.0 + 0.5) as u32,
        })
    }
}

fn parse_field<T: core::str::FromStr>(field: Option<&str>) -> Result<T, CommandError> {
    field
        .ok_or(CommandError::Malformed)?
        .parse()
        .map_err(|_| CommandError::Malformed)
}
