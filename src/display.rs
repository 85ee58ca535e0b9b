use crate::entry::LogEntry;
use crate::filter::{TextSize, TimestampMode};

/// Timestamp column text, split so the sub-second part can be emphasised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampLabel {
    pub prefix: String,
    pub emphasis: String,
}

impl TimestampLabel {
    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.emphasis)
    }
}

pub fn timestamp_label(entry: &LogEntry, mode: TimestampMode) -> Option<TimestampLabel> {
    match mode {
        TimestampMode::None => None,
        TimestampMode::Time => {
            let time = entry.timestamp();
            Some(TimestampLabel {
                prefix: time.format("%H:%M:%S").to_string(),
                emphasis: time.format("%.3f").to_string(),
            })
        }
        TimestampMode::Frame => Some(TimestampLabel { prefix: entry.frame().to_string(), emphasis: String::new() }),
    }
}

pub fn font_size(size: TextSize) -> f32 {
    match size {
        TextSize::Small => 10.0,
        TextSize::Medium => 10.5,
        TextSize::Large => 11.0,
        TextSize::ExtraLarge => 12.0,
    }
}

pub fn line_height(size: TextSize) -> f32 {
    match size {
        TextSize::Small => 16.0,
        TextSize::Medium => 17.0,
        TextSize::Large => 18.0,
        TextSize::ExtraLarge => 20.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use chrono::{Local, TimeZone};

    #[test]
    fn time_mode_splits_milliseconds() {
        let stamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).single().expect("unambiguous local time")
            + chrono::Duration::milliseconds(42);
        let entry = LogEntry::at(EntryKind::Info, "hi", "", 12, stamp);
        let label = timestamp_label(&entry, TimestampMode::Time).expect("time label");
        assert_eq!(label.prefix, "14:05:07");
        assert_eq!(label.emphasis, ".042");
        assert_eq!(label.text(), "14:05:07.042");
    }

    #[test]
    fn frame_and_none_modes() {
        let entry = LogEntry::new(EntryKind::Info, "hi", "", 981);
        assert_eq!(timestamp_label(&entry, TimestampMode::Frame).expect("frame label").text(), "981");
        assert!(timestamp_label(&entry, TimestampMode::None).is_none());
    }

    #[test]
    fn larger_text_never_shrinks_lines() {
        let mut last = 0.0;
        for size in TextSize::ALL {
            assert!(font_size(size) < line_height(size));
            assert!(line_height(size) > last);
            last = line_height(size);
        }
    }
}
