use crate::entry::EntryKind;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Entry categories the console list currently shows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct EntryCategories: u8 {
        const INFO = 0b0001;
        const WARNING = 0b0010;
        const ERROR = 0b0100;
        const COMMANDS = 0b1000;
    }
}

impl EntryCategories {
    pub fn for_kind(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Info => EntryCategories::INFO,
            EntryKind::Warning => EntryCategories::WARNING,
            EntryKind::Error => EntryCategories::ERROR,
            EntryKind::CommandEcho | EntryKind::CommandOutput => EntryCategories::COMMANDS,
        }
    }

    pub fn label(self) -> &'static str {
        if self == EntryCategories::INFO {
            "Show Logs"
        } else if self == EntryCategories::WARNING {
            "Show Warnings"
        } else if self == EntryCategories::ERROR {
            "Show Errors"
        } else if self == EntryCategories::COMMANDS {
            "Show Commands"
        } else {
            "Mixed"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampMode {
    None,
    #[default]
    Time,
    Frame,
}

impl TimestampMode {
    pub const ALL: [TimestampMode; 3] = [TimestampMode::None, TimestampMode::Time, TimestampMode::Frame];

    pub fn label(self) -> &'static str {
        match self {
            TimestampMode::None => "None",
            TimestampMode::Time => "Time",
            TimestampMode::Frame => "Frame",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSize {
    #[default]
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl TextSize {
    pub const ALL: [TextSize; 4] = [TextSize::Small, TextSize::Medium, TextSize::Large, TextSize::ExtraLarge];

    pub fn label(self) -> &'static str {
        match self {
            TextSize::Small => "Small",
            TextSize::Medium => "Medium",
            TextSize::Large => "Large",
            TextSize::ExtraLarge => "Extra Large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default = "FilterState::default_shown")]
    pub shown: EntryCategories,
    #[serde(default)]
    pub timestamp_mode: TimestampMode,
    #[serde(default)]
    pub text_size: TextSize,
}

impl FilterState {
    fn default_shown() -> EntryCategories {
        EntryCategories::all()
    }

    pub fn passes(&self, kind: EntryKind) -> bool {
        self.shown.contains(EntryCategories::for_kind(kind))
    }

    pub fn shows(&self, category: EntryCategories) -> bool {
        self.shown.contains(category)
    }

    pub fn set_shown(&mut self, category: EntryCategories, shown: bool) {
        self.shown.set(category, shown);
    }

    pub fn with_shown(mut self, category: EntryCategories, shown: bool) -> Self {
        self.set_shown(category, shown);
        self
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self { shown: Self::default_shown(), timestamp_mode: TimestampMode::default(), text_size: TextSize::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_toggle_covers_echo_and_output() {
        let filter = FilterState::default().with_shown(EntryCategories::COMMANDS, false);
        assert!(!filter.passes(EntryKind::CommandEcho));
        assert!(!filter.passes(EntryKind::CommandOutput));
        assert!(filter.passes(EntryKind::Info));
        assert!(filter.passes(EntryKind::Warning));
        assert!(filter.passes(EntryKind::Error));
    }

    #[test]
    fn defaults_show_everything_with_time_stamps() {
        let filter = FilterState::default();
        assert_eq!(filter.shown, EntryCategories::all());
        assert_eq!(filter.timestamp_mode, TimestampMode::Time);
        assert_eq!(filter.text_size, TextSize::Small);
    }
}
