use crate::command::{CommandCandidate, CommandContext, CommandRegistry};
use crate::config::{ConsoleConfig, FaultPolicy};
use crate::entry::{EntryKind, LogEntry};
use crate::error::CommandError;
use crate::feed::EntryFeed;
use crate::filter::FilterState;
use crate::history::InputHistory;
use crate::log_bridge::LogReceiver;

/// Appended to the echo of an input line that matched no command.
pub const NOT_FOUND_MARKER: &str = "<Command not found>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was logged.
    Ignored,
    NotFound,
    Invoked { command: String, output_lines: usize },
    /// The handler failed and the failure was written to the console.
    Reported { command: String },
}

/// Owns the command registry and the entry feed for one console window.
///
/// Construct it once the command table is known, attach the log receiver
/// produced by [`crate::log_bridge::console_layer`], and call
/// [`Console::pump_logs`] once per frame.
#[derive(Debug)]
pub struct Console {
    registry: CommandRegistry,
    feed: EntryFeed,
    history: InputHistory,
    fault_policy: FaultPolicy,
    frame: u64,
    log_source: Option<LogReceiver>,
}

impl Console {
    pub fn new(config: &ConsoleConfig, filter: FilterState, table: &[CommandCandidate]) -> Result<Self, CommandError> {
        let registry = CommandRegistry::from_candidates(table)?;
        tracing::debug!("[console] registered {} commands", registry.len());
        Ok(Self::with_registry(registry, filter)
            .with_fault_policy(config.fault_policy)
            .with_history_capacity(config.history_capacity))
    }

    pub fn with_registry(registry: CommandRegistry, filter: FilterState) -> Self {
        Self {
            registry,
            feed: EntryFeed::new(filter),
            history: InputHistory::default(),
            fault_policy: FaultPolicy::default(),
            frame: 0,
            log_source: None,
        }
    }

    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = InputHistory::new(capacity);
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn feed(&self) -> &EntryFeed {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut EntryFeed {
        &mut self.feed
    }

    pub fn history_mut(&mut self) -> &mut InputHistory {
        &mut self.history
    }

    pub fn history(&self) -> &InputHistory {
        &self.history
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frame number stamped on entries appended from now on.
    pub fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.feed.set_filter(filter);
    }

    pub fn clear(&mut self, preserve_build_time: bool) {
        self.feed.clear(preserve_build_time);
    }

    pub fn log(&mut self, kind: EntryKind, message: impl Into<String>, detail: impl Into<String>) {
        self.feed.append(LogEntry::new(kind, message, detail, self.frame));
    }

    pub fn emit_command_input(&mut self, message: impl Into<String>, detail: impl Into<String>) {
        self.log(EntryKind::CommandEcho, message, detail);
    }

    pub fn emit_command_log(&mut self, message: impl Into<String>, detail: impl Into<String>) {
        self.log(EntryKind::CommandOutput, message, detail);
    }

    pub fn submit(&mut self, input: &str) -> Result<SubmitOutcome, CommandError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        self.history.push(trimmed);

        let resolution = match self.registry.resolve(trimmed) {
            Ok(resolution) => resolution,
            Err(err) if err.is_not_found() => {
                self.emit_command_input(format!("{trimmed} {NOT_FOUND_MARKER}"), "");
                return Ok(SubmitOutcome::NotFound);
            }
            Err(err) => return Err(err),
        };
        let description = self.registry.descriptor(&resolution.key).map(|d| d.describe()).unwrap_or_default();
        self.emit_command_input(trimmed, description);

        let mut ctx = CommandContext::new(&self.registry);
        let result = self.registry.invoke(&resolution, &mut ctx);
        let output = ctx.into_output();
        let output_lines = output.len();
        for (message, detail) in output {
            self.feed.append(LogEntry::new(EntryKind::CommandOutput, message, detail, self.frame));
        }

        let command = resolution.display_name();
        match result {
            Ok(()) => Ok(SubmitOutcome::Invoked { command, output_lines }),
            Err(CommandError::HandlerFault { command, source }) if self.fault_policy == FaultPolicy::Report => {
                tracing::debug!("[console] '{command}' failed: {source:#}");
                self.emit_command_log(format!("Error: {source}"), format!("{source:?}"));
                Ok(SubmitOutcome::Reported { command })
            }
            Err(err) => Err(err),
        }
    }

    pub fn attach_log_source(&mut self, receiver: LogReceiver) {
        self.log_source = Some(receiver);
    }

    pub fn detach_log_source(&mut self) -> Option<LogReceiver> {
        self.log_source.take()
    }

    pub fn has_log_source(&self) -> bool {
        self.log_source.is_some()
    }

    /// Moves queued engine log records into the feed. Returns how many were appended.
    pub fn pump_logs(&mut self) -> usize {
        let Some(source) = self.log_source.as_ref() else {
            return 0;
        };
        let (records, disconnected) = source.drain();
        let count = records.len();
        for record in records {
            let kind = record.kind();
            let entry = LogEntry::new(kind, record.message, record.detail, self.frame).with_build_time(record.build_time);
            self.feed.append(entry);
        }
        if disconnected {
            self.log_source = None;
        }
        count
    }
}
