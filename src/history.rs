use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Submitted input lines for up/down recall. Lives only as long as the console.
#[derive(Debug, Clone)]
pub struct InputHistory {
    lines: VecDeque<String>,
    capacity: usize,
    cursor: Option<usize>,
}

impl InputHistory {
    pub fn new(capacity: usize) -> Self {
        Self { lines: VecDeque::with_capacity(capacity.min(256)), capacity: capacity.max(1), cursor: None }
    }

    pub fn push(&mut self, line: &str) {
        let line = line.trim();
        self.cursor = None;
        if line.is_empty() || self.lines.back().is_some_and(|last| last == line) {
            return;
        }
        self.lines.push_back(line.to_string());
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    /// Steps towards older lines; stays on the oldest once reached.
    pub fn previous(&mut self) -> Option<&str> {
        if self.lines.is_empty() {
            return None;
        }
        let index = match self.cursor {
            None => self.lines.len() - 1,
            Some(index) => index.saturating_sub(1),
        };
        self.cursor = Some(index);
        self.lines.get(index).map(String::as_str)
    }

    /// Steps towards newer lines. `None` once past the newest, meaning an empty prompt.
    pub fn next(&mut self) -> Option<&str> {
        let index = self.cursor? + 1;
        if index >= self.lines.len() {
            self.cursor = None;
            return None;
        }
        self.cursor = Some(index);
        self.lines.get(index).map(String::as_str)
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for InputHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recalls_newest_first_and_walks_back_down() {
        let mut history = InputHistory::default();
        for line in ["help", "show logs", "commands"] {
            history.push(line);
        }
        assert_eq!(history.previous(), Some("commands"));
        assert_eq!(history.previous(), Some("show logs"));
        assert_eq!(history.previous(), Some("help"));
        assert_eq!(history.previous(), Some("help"));
        assert_eq!(history.next(), Some("show logs"));
        assert_eq!(history.next(), Some("commands"));
        assert_eq!(history.next(), None);
        assert_eq!(history.next(), None);
    }

    #[test]
    fn drops_oldest_and_collapses_repeats() {
        let mut history = InputHistory::new(2);
        for line in ["a", "b", "b", "  ", "c"] {
            history.push(line);
        }
        assert_eq!(history.lines().collect::<Vec<_>>(), vec!["b", "c"]);
    }
}
