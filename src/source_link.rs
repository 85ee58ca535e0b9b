use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLink {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for SourceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One line of a stack trace, with its `(at file:line)` location pulled out when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub text: String,
    pub link: Option<SourceLink>,
}

pub fn parse_stack_trace(detail: &str) -> Vec<TraceLine> {
    let mut lines: Vec<TraceLine> = detail.split('\n').map(parse_trace_line).collect();
    if lines.last().is_some_and(|line| line.text.is_empty() && line.link.is_none()) {
        lines.pop();
    }
    lines
}

fn parse_trace_line(line: &str) -> TraceLine {
    let plain = || TraceLine { text: line.to_string(), link: None };
    let Some(start) = line.find("(at ") else {
        return plain();
    };
    let Some(len) = line[start..].find(')') else {
        return plain();
    };
    let location = &line[start + 4..start + len];
    let mut parts = location.split(':');
    let (Some(file), Some(line_no), None) = (parts.next(), parts.next(), parts.next()) else {
        return plain();
    };
    let Ok(line_no) = line_no.trim().parse::<u32>() else {
        return plain();
    };
    if file.is_empty() {
        return plain();
    }
    TraceLine {
        text: line[..start].trim_end().to_string(),
        link: Some(SourceLink { file: file.to_string(), line: line_no }),
    }
}

/// Build diagnostics look like `path/to/file.rs(12,5): message`.
pub fn parse_build_message(message: &str) -> Option<SourceLink> {
    let (file, rest) = message.split_once('(')?;
    let (line, _) = rest.split_once(',')?;
    let file = file.trim();
    if file.is_empty() {
        return None;
    }
    Some(SourceLink { file: file.to_string(), line: line.trim().parse().ok()? })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_locations_from_trace_lines() {
        let trace = "Player::update ()\n(at src/player.rs:42)\nWorld::tick () (at src/world.rs:7)\n";
        let lines = parse_stack_trace(trace);
        assert_eq!(lines.len(), 3, "trailing blank line is dropped");
        assert_eq!(lines[0], TraceLine { text: "Player::update ()".into(), link: None });
        assert_eq!(lines[1].link, Some(SourceLink { file: "src/player.rs".into(), line: 42 }));
        assert_eq!(lines[2].text, "World::tick ()");
        assert_eq!(lines[2].link.as_ref().map(|link| link.to_string()), Some("src/world.rs:7".to_string()));
    }

    #[test]
    fn malformed_locations_stay_plain_text() {
        for line in ["(at src/a.rs)", "(at :3)", "(at a.rs:x)", "(at c:/a.rs:3)", "(at a.rs:3"] {
            let parsed = parse_stack_trace(line);
            assert_eq!(parsed[0].link, None, "{line}");
            assert_eq!(parsed[0].text, line);
        }
    }

    #[test]
    fn build_messages_point_at_file_and_line() {
        assert_eq!(
            parse_build_message("scripts/spawner.rhai(18,4): unexpected token"),
            Some(SourceLink { file: "scripts/spawner.rhai".into(), line: 18 })
        );
        assert_eq!(parse_build_message("no location here"), None);
        assert_eq!(parse_build_message("(3,1): missing file"), None);
    }
}
