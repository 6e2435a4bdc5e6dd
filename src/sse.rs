//! Server-sent events.
//!
//! - [`Event`]: one message and its `text/event-stream` encoding
//! - [`EventHub`]: fan-out of events to connected subscribers
//!
//! # Wire format
//!
//! ```text
//! data: {"hash":"da39a3ee..."}
//! event: render
//! id: 7
//!
//! ```

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A single server-sent event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub data: String,
    pub event: Option<String>,
    pub id: Option<String>,
}

impl Event {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Event whose data is the JSON encoding of `value`.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::to_string(value)?))
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Encode for the wire. An event without data encodes to nothing.
    ///
    /// Every line of `data` gets its own `data:` field, a trailing empty
    /// line included, so clients rebuild the payload exactly.
    pub fn encode(&self) -> String {
        if self.data.is_empty() {
            return String::new();
        }

        let mut lines: Vec<String> = self
            .data
            .split('\n')
            .map(|l| format!("data: {}", l.strip_suffix('\r').unwrap_or(l)))
            .collect();
        for (key, value) in [("event", &self.event), ("id", &self.id)] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                lines.push(format!("{key}: {value}"));
            }
        }

        format!("{}\n\n", lines.join("\n"))
    }
}

/// Comment line that keeps idle connections open.
pub const KEEPALIVE: &str = ":\n\n";

/// Interval between keepalive comments on an idle stream.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Events queued per subscriber before it counts as stalled.
pub const SUBSCRIBER_BUFFER: usize = 256;

// ============================================================================
// EventHub
// ============================================================================

/// Broadcasts events to every live subscriber.
///
/// Subscribers that hang up, or fall [`SUBSCRIBER_BUFFER`] events behind,
/// are dropped on the next publish. Their stream ends once it drains.
#[derive(Default)]
pub struct EventHub {
    subscribers: Mutex<Vec<Sender<Event>>>,
    next_id: AtomicU64,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = channel::bounded(SUBSCRIBER_BUFFER);
        self.subscribers.lock().push(tx);
        Subscription { rx }
    }

    /// Send to all subscribers without blocking, stamping a sequential id.
    /// Returns the number of subscribers reached.
    pub fn publish(&self, event: Event) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let event = event.with_id(id);

        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.try_send(event.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Disconnect everyone. Streams end after draining what they have.
    pub fn close(&self) {
        self.subscribers.lock().clear();
    }
}

/// Receiving end of a hub subscription.
pub struct Subscription {
    rx: Receiver<Event>,
}

impl Subscription {
    /// Next event. `Disconnected` once the hub has closed and the queue is drained.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Write events to `out` until the hub closes or the peer goes away.
    pub fn pump(&self, out: &mut dyn Write) -> io::Result<()> {
        loop {
            match self.rx.recv_timeout(KEEPALIVE_INTERVAL) {
                Ok(event) => out.write_all(event.encode().as_bytes())?,
                Err(RecvTimeoutError::Timeout) => out.write_all(KEEPALIVE.as_bytes())?,
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
            out.flush()?;
        }
    }
}
