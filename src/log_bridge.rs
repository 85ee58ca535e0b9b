//! Routes `tracing` events from the engine into the console feed.
//!
//! [`ConsoleLayer`] can run on any thread; it only formats the event and sends a
//! [`LogRecord`] down a channel. The owning [`crate::Console`] drains the
//! receiver on the main thread via `pump_logs`.

use crate::entry::EntryKind;
use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub detail: String,
    pub build_time: bool,
}

impl LogRecord {
    pub fn kind(&self) -> EntryKind {
        EntryKind::from(self.level)
    }
}

/// Set by the host while it is compiling scripts or importing assets.
#[derive(Debug, Clone, Default)]
pub struct BuildPhase(Arc<AtomicBool>);

impl BuildPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, building: bool) {
        self.0.store(building, Ordering::Relaxed);
    }

    pub fn is_building(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct ConsoleLayer {
    sender: Sender<LogRecord>,
    build_phase: BuildPhase,
}

/// Receiving end handed to [`crate::Console::attach_log_source`].
#[derive(Debug)]
pub struct LogReceiver {
    receiver: Receiver<LogRecord>,
}

impl LogReceiver {
    /// Everything queued so far, plus whether the layer side has gone away.
    pub fn drain(&self) -> (Vec<LogRecord>, bool) {
        let mut records = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(record) => records.push(record),
                Err(TryRecvError::Empty) => return (records, false),
                Err(TryRecvError::Disconnected) => return (records, true),
            }
        }
    }
}

pub fn console_layer(build_phase: BuildPhase) -> (ConsoleLayer, LogReceiver) {
    let (sender, receiver) = mpsc::channel();
    (ConsoleLayer { sender, build_phase }, LogReceiver { receiver })
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let mut detail = String::from(metadata.target());
        if !visitor.fields.is_empty() {
            let _ = write!(detail, " {}", visitor.fields.join(" "));
        }
        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            let _ = write!(detail, "\n(at {file}:{line})");
        }
        detail.push('\n');

        let record = LogRecord {
            level: *metadata.level(),
            message: visitor.message,
            detail,
            build_time: self.build_phase.is_building(),
        };
        // The console may already be torn down; dropped records are fine then.
        let _ = self.sender.send(record);
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: Vec<String>,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={value}", field.name()));
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

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn events_arrive_with_kind_and_location() {
        let (layer, receiver) = console_layer(BuildPhase::new());
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(entity = 7, "sprite atlas missing");
            tracing::error!("shader compile failed");
            tracing::debug!("frame ok");
        });

        let (records, _) = receiver.drain();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].kind(), EntryKind::Warning);
        assert_eq!(records[0].message, "sprite atlas missing");
        assert!(records[0].detail.contains("entity=7"));
        assert!(records[0].detail.contains("(at "));
        assert_eq!(records[1].kind(), EntryKind::Error);
        assert_eq!(records[2].kind(), EntryKind::Info);
    }

    #[test]
    fn build_phase_marks_records() {
        let phase = BuildPhase::new();
        let (layer, receiver) = console_layer(phase.clone());
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("before");
            phase.set(true);
            tracing::error!("during build");
            phase.set(false);
        });
        let (records, _) = receiver.drain();
        let flags: Vec<bool> = records.iter().map(|record| record.build_time).collect();
        assert_eq!(flags, vec![false, true]);
    }
}
