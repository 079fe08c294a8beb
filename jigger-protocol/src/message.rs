//! The shared wire record: command tags, payload layout, encode/decode.
//!
//! Record format (little-endian, packed, 244 bytes total):
//! - `id` (i32): command tag selecting the payload interpretation
//! - `temp` (f32), `idReading` (i32): controller telemetry, pass-through
//! - payload (192 bytes), one of:
//!   - text command, `char[96]` NUL-terminated, plus a second unused
//!     `char[96]` text slot
//!   - pump sync: `i32[4]` pwm, `f32[4]` calibration seconds
//!   - recipe part: `u8` index, `u8` total, `char[32]` name,
//!     `u16[4]` millilitres per pump slot
//! - legacy gyroscope (`f32` x, `f32` y) and joystick (`char[16]` button
//!   state, `char[16]` direction) telemetry, pass-through
//!
//! Decoding validates the buffer length before reading any field and
//! otherwise trusts the tag to select the valid payload variant; string
//! fields are bounded by their slot capacity and can never overrun.

use heapless::String;

/// Total size of one wire record in bytes. Contract with the controller.
pub const RECORD_SIZE: usize = 244;

/// Raw size of one text slot (95 characters plus the terminating NUL).
pub const TEXT_SLOT: usize = 96;

/// Maximum number of characters carried by a text command.
pub const MAX_TEXT_LEN: usize = 95;

/// Raw size of the recipe name slot.
pub const NAME_SLOT: usize = 32;

/// Number of physical pump channels on the controller.
pub const PUMP_CHANNELS: usize = 4;

// Command tags: client -> controller
pub const CMD_DRINK_ORDER: i32 = 99;
pub const CMD_SYNC_REQUEST: i32 = 100;
pub const CMD_RECIPE_SYNC_REQUEST: i32 = 102;
pub const CMD_RECIPE_UPDATE: i32 = 104;
pub const CMD_PUMP_UPDATE: i32 = 105;

// Command tags: controller -> client
pub const CMD_SYNC_RESPONSE: i32 = 101;
pub const CMD_RECIPE_DATA: i32 = 103;

// Legacy remote-control inputs, recognized but unused by this node
pub const CMD_JOYSTICK: i32 = 1;
pub const CMD_GYRO: i32 = 2;

// Field offsets within the record
const OFF_ID: usize = 0;
const OFF_PAYLOAD: usize = 12;
const OFF_PUMP_PWM: usize = 12;
const OFF_PUMP_SECONDS: usize = 28;
const OFF_PART_INDEX: usize = 12;
const OFF_PART_TOTAL: usize = 13;
const OFF_PART_NAME: usize = 14;
const OFF_PART_ML: usize = 46;

/// Errors produced while decoding an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    /// Buffer length does not match [`RECORD_SIZE`]
    Length { len: usize },
    /// The `id` field carries a tag neither node defines
    UnknownTag { tag: i32 },
}

/// Pump calibration payload (tag [`CMD_SYNC_RESPONSE`])
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpSync {
    /// PWM duty per channel, as sent by the controller
    pub pwm: [i32; PUMP_CHANNELS],
    /// Dispense duration per channel in seconds
    pub seconds: [f32; PUMP_CHANNELS],
}

/// One part of a multi-part recipe stream (tags [`CMD_RECIPE_DATA`] and
/// [`CMD_RECIPE_UPDATE`])
///
/// A sync session is the sequence of parts beginning at `index == 0`;
/// `total` announces how many parts the session will carry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecipePart {
    pub index: u8,
    pub total: u8,
    pub name: String<NAME_SLOT>,
    /// Millilitres to dispense per pump slot; slot 0 is pump 1
    pub ml_per_pump: [u16; PUMP_CHANNELS],
}

/// A decoded wire record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// User ordered a drink by name
    DrinkOrder { name: String<MAX_TEXT_LEN> },
    /// Ask the controller for its current pump calibration
    PumpSyncRequest,
    /// Controller's authoritative pump calibration
    PumpSync(PumpSync),
    /// Ask the controller to (re)stream the full recipe set
    RecipeSyncRequest,
    /// One recipe streamed by the controller
    RecipePart(RecipePart),
    /// An edited recipe pushed back to the controller
    RecipeUpdate(RecipePart),
    /// Pump calibration text command pushed to the controller
    PumpCommand { text: String<MAX_TEXT_LEN> },
    /// Legacy joystick telemetry, ignored by this node
    Joystick,
    /// Legacy gyroscope telemetry, ignored by this node
    Gyro,
}

impl Message {
    /// The command tag this message encodes as
    pub fn tag(&self) -> i32 {
        match self {
            Message::DrinkOrder { .. } => CMD_DRINK_ORDER,
            Message::PumpSyncRequest => CMD_SYNC_REQUEST,
            Message::PumpSync(_) => CMD_SYNC_RESPONSE,
            Message::RecipeSyncRequest => CMD_RECIPE_SYNC_REQUEST,
            Message::RecipePart(_) => CMD_RECIPE_DATA,
            Message::RecipeUpdate(_) => CMD_RECIPE_UPDATE,
            Message::PumpCommand { .. } => CMD_PUMP_UPDATE,
            Message::Joystick => CMD_JOYSTICK,
            Message::Gyro => CMD_GYRO,
        }
    }

    /// Encode into a full wire record, unused regions zero-filled
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        put_i32(&mut buf, OFF_ID, self.tag());

        match self {
            Message::DrinkOrder { name } => put_text(&mut buf, OFF_PAYLOAD, TEXT_SLOT, name),
            Message::PumpCommand { text } => put_text(&mut buf, OFF_PAYLOAD, TEXT_SLOT, text),
            Message::PumpSync(sync) => {
                for (i, pwm) in sync.pwm.iter().enumerate() {
                    put_i32(&mut buf, OFF_PUMP_PWM + i * 4, *pwm);
                }
                for (i, secs) in sync.seconds.iter().enumerate() {
                    put_f32(&mut buf, OFF_PUMP_SECONDS + i * 4, *secs);
                }
            }
            Message::RecipePart(part) | Message::RecipeUpdate(part) => {
                buf[OFF_PART_INDEX] = part.index;
                buf[OFF_PART_TOTAL] = part.total;
                put_text(&mut buf, OFF_PART_NAME, NAME_SLOT, &part.name);
                for (i, ml) in part.ml_per_pump.iter().enumerate() {
                    put_u16(&mut buf, OFF_PART_ML + i * 2, *ml);
                }
            }
            Message::PumpSyncRequest
            | Message::RecipeSyncRequest
            | Message::Joystick
            | Message::Gyro => {}
        }

        buf
    }

    /// Decode an inbound frame
    ///
    /// Fails when the buffer is not exactly [`RECORD_SIZE`] bytes or the
    /// tag is unknown; the caller discards such frames without side
    /// effects.
    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() != RECORD_SIZE {
            return Err(WireError::Length { len: buf.len() });
        }

        match get_i32(buf, OFF_ID) {
            CMD_DRINK_ORDER => Ok(Message::DrinkOrder {
                name: get_text(buf, OFF_PAYLOAD, TEXT_SLOT),
            }),
            CMD_PUMP_UPDATE => Ok(Message::PumpCommand {
                text: get_text(buf, OFF_PAYLOAD, TEXT_SLOT),
            }),
            CMD_SYNC_REQUEST => Ok(Message::PumpSyncRequest),
            CMD_RECIPE_SYNC_REQUEST => Ok(Message::RecipeSyncRequest),
            CMD_SYNC_RESPONSE => {
                let mut pwm = [0i32; PUMP_CHANNELS];
                let mut seconds = [0f32; PUMP_CHANNELS];
                for (i, slot) in pwm.iter_mut().enumerate() {
                    *slot = get_i32(buf, OFF_PUMP_PWM + i * 4);
                }
                for (i, slot) in seconds.iter_mut().enumerate() {
                    *slot = get_f32(buf, OFF_PUMP_SECONDS + i * 4);
                }
                Ok(Message::PumpSync(PumpSync { pwm, seconds }))
            }
            CMD_RECIPE_DATA => Ok(Message::RecipePart(decode_part(buf))),
            CMD_RECIPE_UPDATE => Ok(Message::RecipeUpdate(decode_part(buf))),
            CMD_JOYSTICK => Ok(Message::Joystick),
            CMD_GYRO => Ok(Message::Gyro),
            tag => Err(WireError::UnknownTag { tag }),
        }
    }
}

fn decode_part(buf: &[u8]) -> RecipePart {
    let mut ml_per_pump = [0u16; PUMP_CHANNELS];
    for (i, slot) in ml_per_pump.iter_mut().enumerate() {
        *slot = get_u16(buf, OFF_PART_ML + i * 2);
    }
    RecipePart {
        index: buf[OFF_PART_INDEX],
        total: buf[OFF_PART_TOTAL],
        name: get_text(buf, OFF_PART_NAME, NAME_SLOT),
        ml_per_pump,
    }
}

fn put_i32(buf: &mut [u8; RECORD_SIZE], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_f32(buf: &mut [u8; RECORD_SIZE], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u16(buf: &mut [u8; RECORD_SIZE], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Copy `text` into a fixed slot, truncated to leave room for the NUL
/// terminator. The buffer is pre-zeroed, so the terminator and any tail
/// bytes are already in place.
fn put_text(buf: &mut [u8; RECORD_SIZE], offset: usize, capacity: usize, text: &str) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(capacity - 1);
    buf[offset..offset + len].copy_from_slice(&bytes[..len]);
}

fn get_i32(buf: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[offset..offset + 4]);
    i32::from_le_bytes(raw)
}

fn get_f32(buf: &[u8], offset: usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[offset..offset + 4]);
    f32::from_le_bytes(raw)
}

fn get_u16(buf: &[u8], offset: usize) -> u16 {
    let mut raw = [0u8; 2];
    raw.copy_from_slice(&buf[offset..offset + 2]);
    u16::from_le_bytes(raw)
}

/// Read a NUL-terminated string out of a fixed slot.
///
/// Bytes past the first NUL are ignored; an invalid UTF-8 tail is
/// dropped at the last valid boundary rather than rejecting the frame.
fn get_text<const N: usize>(buf: &[u8], offset: usize, capacity: usize) -> String<N> {
    let slot = &buf[offset..offset + capacity];
    let len = slot
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(capacity)
        .min(N);
    let text = match core::str::from_utf8(&slot[..len]) {
        Ok(text) => text,
        Err(err) => core::str::from_utf8(&slot[..err.valid_up_to()]).unwrap_or(""),
    };
    let mut out = String::new();
    let _ = out.push_str(text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text<const N: usize>(s: &str) -> String<N> {
        String::try_from(s).unwrap()
    }

    #[test]
    fn test_encode_is_full_size_and_tagged() {
        let msg = Message::PumpSyncRequest;
        let buf = msg.encode();
        assert_eq!(buf.len(), RECORD_SIZE);
        assert_eq!(get_i32(&buf, 0), CMD_SYNC_REQUEST);
        // No payload: everything past the tag stays zero-filled
        assert!(buf[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_drink_order_layout() {
        let buf = Message::DrinkOrder {
            name: text("Vodka Coke"),
        }
        .encode();
        assert_eq!(get_i32(&buf, 0), CMD_DRINK_ORDER);
        // Text command starts at the payload offset, NUL terminated
        assert_eq!(&buf[12..22], b"Vodka Coke");
        assert_eq!(buf[22], 0);
        // Legacy telemetry regions zero-filled
        assert!(buf[204..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pump_sync_layout() {
        let buf = Message::PumpSync(PumpSync {
            pwm: [255, 200, 150, 100],
            seconds: [1.6, 2.0, 0.5, 4.25],
        })
        .encode();
        assert_eq!(get_i32(&buf, 0), CMD_SYNC_RESPONSE);
        assert_eq!(get_i32(&buf, 12), 255);
        assert_eq!(get_i32(&buf, 24), 100);
        assert_eq!(get_f32(&buf, 28), 1.6);
        assert_eq!(get_f32(&buf, 40), 4.25);
    }

    #[test]
    fn test_recipe_part_layout() {
        let buf = Message::RecipePart(RecipePart {
            index: 2,
            total: 5,
            name: text("Screwdriver"),
            ml_per_pump: [0, 150, 50, 0],
        })
        .encode();
        assert_eq!(buf[12], 2);
        assert_eq!(buf[13], 5);
        assert_eq!(&buf[14..25], b"Screwdriver");
        assert_eq!(buf[25], 0);
        assert_eq!(get_u16(&buf, 46), 0);
        assert_eq!(get_u16(&buf, 48), 150);
        assert_eq!(get_u16(&buf, 50), 50);
    }

    #[test]
    fn test_roundtrip_all_variants() {
        let messages = [
            Message::DrinkOrder {
                name: text("Sex on Beach"),
            },
            Message::PumpSyncRequest,
            Message::PumpSync(PumpSync {
                pwm: [1, 2, 3, 4],
                seconds: [0.1, 0.2, 0.3, 0.4],
            }),
            Message::RecipeSyncRequest,
            Message::RecipePart(RecipePart {
                index: 0,
                total: 1,
                name: text("Cocacola"),
                ml_per_pump: [200, 0, 0, 0],
            }),
            Message::RecipeUpdate(RecipePart {
                index: 0,
                total: 0,
                name: text("Vodka shot"),
                ml_per_pump: [0, 0, 50, 0],
            }),
            Message::PumpCommand {
                text: text("pump:1:255:1.60"),
            },
            Message::Joystick,
            Message::Gyro,
        ];

        for msg in messages {
            let decoded = Message::decode(&msg.encode()).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let buf = Message::PumpSyncRequest.encode();
        assert_eq!(
            Message::decode(&buf[..RECORD_SIZE - 1]),
            Err(WireError::Length {
                len: RECORD_SIZE - 1
            })
        );

        let mut long = [0u8; RECORD_SIZE + 1];
        long[..RECORD_SIZE].copy_from_slice(&buf);
        assert_eq!(
            Message::decode(&long),
            Err(WireError::Length {
                len: RECORD_SIZE + 1
            })
        );

        assert_eq!(Message::decode(&[]), Err(WireError::Length { len: 0 }));
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let mut buf = [0u8; RECORD_SIZE];
        put_i32(&mut buf, 0, 42);
        assert_eq!(
            Message::decode(&buf),
            Err(WireError::UnknownTag { tag: 42 })
        );
    }

    #[test]
    fn test_text_truncated_to_slot() {
        let mut long = String::<MAX_TEXT_LEN>::new();
        for _ in 0..MAX_TEXT_LEN {
            long.push('x').unwrap();
        }
        let buf = Message::DrinkOrder { name: long.clone() }.encode();
        // 95 characters fit exactly, byte 96 of the slot is the NUL
        assert_eq!(buf[12 + MAX_TEXT_LEN - 1], b'x');
        assert_eq!(buf[12 + MAX_TEXT_LEN], 0);

        let decoded = Message::decode(&buf).unwrap();
        assert_eq!(decoded, Message::DrinkOrder { name: long });
    }

    #[test]
    fn test_name_without_nul_reads_full_slot() {
        let mut buf = Message::RecipePart(RecipePart {
            index: 0,
            total: 1,
            name: text(""),
            ml_per_pump: [0; PUMP_CHANNELS],
        })
        .encode();
        // Fill the whole name slot with no terminator
        for b in buf[14..46].iter_mut() {
            *b = b'a';
        }
        match Message::decode(&buf).unwrap() {
            Message::RecipePart(part) => {
                assert_eq!(part.name.len(), NAME_SLOT);
                assert!(part.name.chars().all(|c| c == 'a'));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_tail_dropped() {
        let mut buf = Message::DrinkOrder { name: text("ok") }.encode();
        // Orphan continuation byte right after the valid prefix
        buf[14] = 0xFF;
        buf[15] = 0;
        match Message::decode(&buf).unwrap() {
            Message::DrinkOrder { name } => assert_eq!(name.as_str(), "ok"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_legacy_tags_decode() {
        let mut buf = [0u8; RECORD_SIZE];
        put_i32(&mut buf, 0, CMD_JOYSTICK);
        assert_eq!(Message::decode(&buf), Ok(Message::Joystick));
        put_i32(&mut buf, 0, CMD_GYRO);
        assert_eq!(Message::decode(&buf), Ok(Message::Gyro));
    }
}
