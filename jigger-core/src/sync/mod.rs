//! Sync client
//!
//! Turns UI intents into broadcast wire records and inbound records
//! into cache mutations and liveness updates. Every send is
//! fire-and-forget: a failure is logged and never retried here. The
//! only recovery mechanism is the level-triggered retry in
//! [`SyncClient::poll`], and it only covers sync requests - one-shot
//! user commands like drink orders are never replayed.
//!
//! The receive path is inverted: the radio driver registers a callback
//! at startup and feeds raw frames to [`SyncClient::handle_frame`]
//! together with the cache it owns, so inbound dispatch and UI intents
//! run on one cooperative loop and the cache keeps a single writer.

use jigger_protocol::{Message, PumpCommand, RecipePart, WireError};

use crate::cache::RecipeCache;
use crate::link::{LinkMonitor, RetryTimer};
use crate::model::recipe::clip;
use crate::model::Recipe;
use crate::traits::Transport;

/// Client half of the display/controller sync protocol
pub struct SyncClient<T: Transport> {
    transport: T,
    link: LinkMonitor,
    retry: RetryTimer,
}

impl<T: Transport> SyncClient<T> {
    /// Create a client over a ready transport. The retry timer arms
    /// immediately, first due one interval after `now_ms`.
    pub fn new(transport: T, now_ms: u64) -> Self {
        Self {
            transport,
            link: LinkMonitor::new(),
            retry: RetryTimer::new(now_ms),
        }
    }

    /// Create a client with a custom retry cadence
    pub fn with_retry_interval(transport: T, now_ms: u64, interval_ms: u64) -> Self {
        Self {
            transport,
            link: LinkMonitor::new(),
            retry: RetryTimer::with_interval(now_ms, interval_ms),
        }
    }

    /// Whether the controller counts as reachable at `now_ms`
    pub fn is_connected(&self, now_ms: u64) -> bool {
        self.link.is_connected(now_ms)
    }

    /// Access the underlying transport adapter
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask the controller for its current pump calibration
    pub fn request_pump_sync(&mut self) {
        self.broadcast(&Message::PumpSyncRequest);
    }

    /// Ask the controller to (re)stream the full recipe set
    pub fn request_recipe_sync(&mut self) {
        self.broadcast(&Message::RecipeSyncRequest);
    }

    /// Kick off a full sync: recipes and pump calibration
    pub fn request_full_sync(&mut self) {
        self.request_recipe_sync();
        self.request_pump_sync();
    }

    /// Fire the user's drink selection
    pub fn order_drink(&mut self, name: &str) {
        debug!("ordering drink {}", name);
        self.broadcast(&Message::DrinkOrder { name: clip(name) });
    }

    /// Push one pump's calibration to the controller. The duration is
    /// converted to seconds with two decimal places on the wire.
    pub fn send_pump_calibration(&mut self, pump: u8, pwm: u8, duration_ms: u32) {
        let command = PumpCommand {
            pump,
            pwm,
            duration_ms,
        };
        self.broadcast(&Message::PumpCommand {
            text: command.to_text(),
        });
    }

    /// Push an edited recipe to the controller (full replace for that
    /// name). The caller applies the matching optimistic cache update.
    pub fn send_recipe_update(&mut self, recipe: &Recipe) {
        self.broadcast(&Message::RecipeUpdate(recipe.to_part()));
    }

    /// Periodic tick: re-issue sync requests while the cache still
    /// shows mock data. Safe to call on every UI tick; the embedded
    /// timer limits the actual cadence and cancels itself for good on
    /// the first tick that sees real data.
    pub fn poll(&mut self, now_ms: u64, cache: &RecipeCache) {
        if self.retry.poll(now_ms, cache.is_using_mocks()) {
            debug!("sync retry fired");
            self.request_recipe_sync();
            self.request_pump_sync();
        }
    }

    /// Dispatch one raw inbound frame.
    ///
    /// Malformed frames (wrong length, unknown tag) are dropped without
    /// side effects. Valid controller messages mutate the cache and
    /// refresh liveness; legacy telemetry is recognized and ignored.
    pub fn handle_frame(&mut self, frame: &[u8], now_ms: u64, cache: &mut RecipeCache) {
        let message = match Message::decode(frame) {
            Ok(message) => message,
            Err(WireError::Length { len }) => {
                debug!("dropping malformed frame, length {}", len);
                return;
            }
            Err(WireError::UnknownTag { tag }) => {
                debug!("dropping frame with unknown tag {}", tag);
                return;
            }
        };

        match message {
            Message::PumpSync(sync) => {
                debug!("pump calibration received");
                cache.apply_pump_sync(&sync, now_ms);
                self.link.mark_rx(now_ms);
            }
            Message::RecipePart(part) => {
                self.apply_part(&part, now_ms, cache);
            }
            other => {
                trace!("ignoring frame tag {}", other.tag());
            }
        }
    }

    fn apply_part(&mut self, part: &RecipePart, now_ms: u64, cache: &mut RecipeCache) {
        debug!(
            "recipe part {}/{} received: {}",
            part.index,
            part.total,
            part.name.as_str()
        );
        cache.apply_recipe_part(part, now_ms);
        self.link.mark_rx(now_ms);
    }

    fn broadcast(&mut self, message: &Message) {
        let frame = message.encode();
        if self.transport.send(&frame).is_err() {
            warn!("broadcast failed for tag {}", message.tag());
        }
    }
}
