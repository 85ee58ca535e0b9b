pub mod builtin;
pub mod cli;
pub mod command;
pub mod config;
pub mod console;
pub mod display;
pub mod entry;
pub mod error;
pub mod feed;
pub mod filter;
pub mod history;
pub mod log_bridge;
#[cfg(feature = "editor")]
pub mod panel;
pub mod prefs;
pub mod source_link;

pub use command::{CommandCandidate, CommandContext, CommandDescriptor, CommandMarker, CommandRegistry, Resolution};
pub use config::{ConsoleConfig, FaultPolicy};
pub use console::{Console, SubmitOutcome};
pub use entry::{EntryKind, LogEntry};
pub use error::CommandError;
pub use feed::{EntryFeed, FeedEvent};
pub use filter::{EntryCategories, FilterState, TextSize, TimestampMode};
