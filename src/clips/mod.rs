//! Clip interval list parsing
//!
//! Interval files hold one `START,END` pair per line, e.g.
//!
//! ```text
//! 00:00:10,00:00:20
//!  00:01:00 , 00:01:30
//! ```
//!
//! Blank lines are skipped. Every other line must split into exactly two
//! valid timestamps with `start < end`; the first offending line aborts the
//! parse with [`VidprepError::MalformedInterval`].

use tracing::debug;

use crate::domain::model::{ClipInterval, Timestamp};
use crate::error::{VidprepError, VidprepResult};

/// Parse interval lines in input order
pub fn parse<I, S>(raw_lines: I) -> VidprepResult<Vec<ClipInterval>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut intervals = Vec::new();
    for raw in raw_lines {
        let line = raw.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        intervals.push(parse_line(line)?);
    }
    debug!(count = intervals.len(), "Parsed clip intervals");
    Ok(intervals)
}

/// Parse the full text of an interval file
pub fn parse_str(content: &str) -> VidprepResult<Vec<ClipInterval>> {
    parse(content.lines())
}

fn parse_line(line: &str) -> VidprepResult<ClipInterval> {
    let malformed = |reason: String| VidprepError::MalformedInterval {
        line: line.to_string(),
        reason,
    };

    let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
    let [start, end] = tokens.as_slice() else {
        return Err(malformed(format!(
            "expected START,END but found {} field(s)",
            tokens.len()
        )));
    };

    let start = Timestamp::parse(start).map_err(|e| malformed(e.to_string()))?;
    let end = Timestamp::parse(end).map_err(|e| malformed(e.to_string()))?;
    if start.seconds() >= end.seconds() {
        return Err(malformed(format!("start {} is not before end {}", start, end)));
    }

    Ok(ClipInterval { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_and_strips_whitespace() {
        let intervals = parse(["00:00:10,00:00:20", " 00:01:00 , 00:01:30 "]).unwrap();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].start.as_str(), "00:00:10");
        assert_eq!(intervals[0].end.as_str(), "00:00:20");
        assert_eq!(intervals[1].start.as_str(), "00:01:00");
        assert_eq!(intervals[1].end.as_str(), "00:01:30");
    }

    #[test]
    fn test_skips_blank_lines_and_keeps_order() {
        let intervals = parse_str("00:02:00,00:02:10\n\n   \n00:00:05,00:00:06\n").unwrap();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].start.seconds(), 120.0);
        assert_eq!(intervals[1].start.seconds(), 5.0);
        assert_eq!(intervals[1].duration_seconds(), 1.0);
    }

    #[test]
    fn test_wrong_field_count() {
        for line in ["00:00:10", "00:00:10,00:00:20,00:00:30"] {
            assert!(matches!(
                parse([line]),
                Err(VidprepError::MalformedInterval { .. })
            ));
        }
    }

    #[test]
    fn test_bad_timestamp() {
        let err = parse(["00:00:xx,00:00:20"]).unwrap_err();
        match err {
            VidprepError::MalformedInterval { line, .. } => assert_eq!(line, "00:00:xx,00:00:20"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_start_must_precede_end() {
        assert!(parse(["00:00:20,00:00:10"]).is_err());
        assert!(parse(["00:00:20,00:00:20"]).is_err());
    }
}
