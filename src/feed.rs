use crate::entry::LogEntry;
use crate::filter::FilterState;
use std::sync::Arc;

/// Change notifications for whoever draws the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// A new entry landed at this position of the filtered view.
    Appended { index: usize },
    /// The filtered view was recomputed from scratch.
    Rebuilt,
}

#[derive(Debug, Default)]
pub struct EntryFeed {
    entries: Vec<LogEntry>,
    // Positions into `entries`, strictly increasing.
    filtered: Vec<usize>,
    filter: FilterState,
    events: Vec<FeedEvent>,
    snapshot: Option<Arc<[LogEntry]>>,
}

impl EntryFeed {
    pub fn new(filter: FilterState) -> Self {
        Self { filter, ..Self::default() }
    }

    pub fn append(&mut self, entry: LogEntry) {
        let passes = self.filter.passes(entry.kind());
        self.entries.push(entry);
        if passes {
            self.filtered.push(self.entries.len() - 1);
            self.snapshot = None;
            self.events.push(FeedEvent::Appended { index: self.filtered.len() - 1 });
        }
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.rebuild();
    }

    pub fn clear(&mut self, preserve_build_time: bool) {
        if preserve_build_time {
            self.entries.retain(LogEntry::is_build_time);
        } else {
            self.entries.clear();
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let filter = self.filter;
        self.filtered = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| filter.passes(entry.kind()))
            .map(|(index, _)| index)
            .collect();
        self.snapshot = None;
        // A rebuild supersedes any queued appends.
        self.events.clear();
        self.events.push(FeedEvent::Rebuilt);
    }

    pub fn filter(&self) -> FilterState {
        self.filter
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn filtered(&self) -> impl ExactSizeIterator<Item = &LogEntry> + '_ {
        self.filtered.iter().map(move |&index| &self.entries[index])
    }

    pub fn filtered_get(&self, index: usize) -> Option<&LogEntry> {
        self.filtered.get(index).map(|&position| &self.entries[position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn drain_events(&mut self) -> Vec<FeedEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&mut self) -> Arc<[LogEntry]> {
        if let Some(cache) = &self.snapshot {
            return Arc::clone(cache);
        }
        let data = self.filtered().cloned().collect::<Vec<_>>();
        let arc: Arc<[LogEntry]> = Arc::from(data.into_boxed_slice());
        self.snapshot = Some(Arc::clone(&arc));
        arc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use crate::filter::EntryCategories;

    fn entry(kind: EntryKind, message: &str) -> LogEntry {
        LogEntry::new(kind, message, "", 0)
    }

    #[test]
    fn filtered_out_entry_only_grows_full_view() {
        let mut feed = EntryFeed::new(FilterState::default().with_shown(EntryCategories::WARNING, false));
        feed.append(entry(EntryKind::Info, "a"));
        let filtered_before = feed.filtered_len();
        feed.append(entry(EntryKind::Warning, "b"));
        assert_eq!(feed.filtered_len(), filtered_before);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn append_reports_position_in_filtered_view() {
        let mut feed = EntryFeed::new(FilterState::default().with_shown(EntryCategories::INFO, false));
        feed.append(entry(EntryKind::Info, "hidden"));
        feed.append(entry(EntryKind::Error, "shown"));
        assert_eq!(feed.drain_events(), vec![FeedEvent::Appended { index: 0 }]);
        assert!(feed.drain_events().is_empty());
    }

    #[test]
    fn snapshot_is_cached_until_the_view_changes() {
        let mut feed = EntryFeed::default();
        feed.append(entry(EntryKind::Info, "a"));
        let first = feed.snapshot();
        let second = feed.snapshot();
        assert!(Arc::ptr_eq(&first, &second));
        feed.append(entry(EntryKind::Info, "b"));
        let third = feed.snapshot();
        assert_eq!(third.len(), 2);
        assert!(!Arc::ptr_eq(&first, &third));
    }
}
