//! Broadcast wire protocol between the Jigger display and the pump controller
//!
//! Both nodes exchange a single fixed-size binary record per broadcast
//! frame. The record layout is a contract: field offsets and the total
//! size must match the controller byte for byte, and a frame whose
//! length differs from [`RECORD_SIZE`](message::RECORD_SIZE) is noise.
//!
//! # Record overview
//!
//! ```text
//! ┌────────┬──────┬───────────┬──────────────────┬────────────────┐
//! │ id     │ temp │ idReading │ payload (by id)  │ legacy fields  │
//! │ 4B     │ 4B   │ 4B        │ 192B             │ 40B            │
//! └────────┴──────┴───────────┴──────────────────┴────────────────┘
//! ```
//!
//! The payload region is a union selected by the `id` command tag: a
//! NUL-terminated text command, a pump calibration block, or one part of
//! a multi-part recipe stream. Unused regions are zero-filled on send
//! and ignored on receive.
//!
//! The link itself is connectionless and unacknowledged - every send is
//! fire-and-forget, and "request/response" pairs are only a convention
//! between the two nodes.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod message;

pub use command::{CommandError, PumpCommand};
pub use message::{
    Message, PumpSync, RecipePart, WireError, MAX_TEXT_LEN, NAME_SLOT, PUMP_CHANNELS, RECORD_SIZE,
};
