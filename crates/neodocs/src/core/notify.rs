//! A user-facing message log.
//!
//! Messages are added directly, or copied from `tracing` events by installing
//! a [`NotifyLayer`] in the subscriber stack.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{Layer, layer::Context};

/// Severity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    /// Diagnostic detail.
    Debug,
    /// Routine information.
    Info,
    /// Something unexpected that didn't stop the operation.
    Warn,
    /// A failed operation.
    Error,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

impl From<&Level> for NotifyLevel {
    fn from(l: &Level) -> Self {
        match *l {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// A logged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sequential id, starting at 0.
    pub id: usize,
    /// Milliseconds since the Unix epoch when the message was added.
    pub timestamp: u64,
    /// Severity.
    pub level: NotifyLevel,
    /// Message text.
    pub message: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// An append-only message list. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct NotifyLog {
    /// Messages in insertion order.
    messages: Arc<Mutex<Vec<Message>>>,
}

impl NotifyLog {
    /// Construct an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the message list. A panic while the lock was held leaves the list
    /// intact, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a message and return a copy of it.
    pub fn add(&self, message: impl Into<String>, level: NotifyLevel) -> Message {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        let mut messages = self.lock();
        let m = Message {
            id: messages.len(),
            timestamp,
            level,
            message: message.into(),
        };
        messages.push(m.clone());
        m
    }

    /// Append a debug message.
    pub fn debug(&self, message: impl Into<String>) {
        self.add(message, NotifyLevel::Debug);
    }

    /// Append an info message.
    pub fn info(&self, message: impl Into<String>) {
        self.add(message, NotifyLevel::Info);
    }

    /// Append a warning.
    pub fn warn(&self, message: impl Into<String>) {
        self.add(message, NotifyLevel::Warn);
    }

    /// Append an error.
    pub fn error(&self, message: impl Into<String>) {
        self.add(message, NotifyLevel::Error);
    }

    /// A snapshot of every message, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().clone()
    }

    /// Messages at or above a level.
    pub fn at_least(&self, level: NotifyLevel) -> Vec<Message> {
        self.lock()
            .iter()
            .filter(|m| m.level >= level)
            .cloned()
            .collect()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Is the log empty?
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A subscriber layer that feeds this log.
    pub fn layer(&self) -> NotifyLayer {
        NotifyLayer { log: self.clone() }
    }
}

/// Collects an event's `message` field, followed by any other fields as
/// `name=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    /// The message field.
    message: String,
    /// Other fields.
    fields: Vec<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}

impl MessageVisitor {
    /// The collected text.
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.join(" ")
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

/// A `tracing_subscriber` layer that copies every event into a [`NotifyLog`].
#[derive(Debug, Clone)]
pub struct NotifyLayer {
    /// Destination log.
    log: NotifyLog,
}

impl<S: Subscriber> Layer<S> for NotifyLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.log
            .add(visitor.finish(), event.metadata().level().into());
    }
}
