//! Broadcast transport trait
//!
//! Abstracts the connectionless radio link to the pump controller.
//! Sends are fire-and-forget: the medium has no delivery guarantee and
//! no connection concept, so a successful return only means the frame
//! left this node. Radio bring-up and channel synchronization with the
//! controller's network happen before anything here is called.

use jigger_protocol::RECORD_SIZE;

/// Errors that can occur when broadcasting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The radio reported the frame was not delivered
    SendFailed,
    /// The radio is not initialized or mid-reconfiguration
    NotReady,
}

/// Trait for the broadcast link to the pump controller
///
/// Inbound traffic does not come through this trait: the receive path
/// is a callback registered with the radio at startup, which hands raw
/// frames to [`SyncClient::handle_frame`](crate::sync::SyncClient::handle_frame).
pub trait Transport {
    /// Broadcast one wire record
    fn send(&mut self, frame: &[u8; RECORD_SIZE]) -> Result<(), TransportError>;
}
