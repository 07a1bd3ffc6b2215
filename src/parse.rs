use anyhow::{Context, Result};
use std::io::BufRead;

use crate::error::ParseError;
use crate::types::{AttributeRecord, EventKind, SecondAccess, StreamId};

fn parse_hex(token: &str) -> Result<u64, ParseError> {
    u64::from_str_radix(token, 16).map_err(|_| ParseError::Address(token.to_string()))
}

/// Reads one canonical trace line back into a record.
///
/// Format: `<pc> [event] [R <addr>] [R|W <addr>]`. A lone `R` is the primary
/// operand, a second `R` or any `W` is the second access.
pub fn parse_trace_line(line: &str) -> Result<AttributeRecord, ParseError> {
    let mut tokens = line.split_whitespace().peekable();
    let pc = parse_hex(tokens.next().ok_or(ParseError::Empty)?)?;
    let mut record = AttributeRecord::plain(pc);

    if let Some(event) = tokens
        .peek()
        .and_then(|t| single_char(t))
        .and_then(EventKind::from_code)
    {
        record.event = event;
        tokens.next();
    }

    let mut seen_first = false;
    while let Some(token) = tokens.next() {
        let kind = match single_char(token) {
            Some(c @ ('R' | 'W')) => c,
            _ => return Err(ParseError::Token(token.to_string())),
        };
        let addr = parse_hex(tokens.next().ok_or(ParseError::MissingAddress(kind))?)?;
        match kind {
            'R' if !seen_first && record.second_access == SecondAccess::None => {
                record.first_address = addr;
                seen_first = true;
            }
            _ if record.second_access != SecondAccess::None => {
                return Err(ParseError::Token(token.to_string()));
            }
            'W' => record = record.with_second(SecondAccess::Write, addr),
            _ => record = record.with_second(SecondAccess::Read, addr),
        }
    }
    Ok(record)
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Replay input line: `<stream-id> <trace line>`.
pub fn parse_replay_line(line: &str) -> Result<(StreamId, AttributeRecord), ParseError> {
    let line = line.trim();
    let (stream, rest) = line.split_once(char::is_whitespace).ok_or(ParseError::Empty)?;
    let stream = stream
        .parse::<StreamId>()
        .map_err(|_| ParseError::Stream(stream.to_string()))?;
    Ok((stream, parse_trace_line(rest)?))
}

/// Lazily reads replay records, skipping blank lines and `#` comments.
pub fn replay_lines<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<(StreamId, AttributeRecord)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    return Some(
                        Err(err).with_context(|| format!("Failed to read input line {}", index + 1)),
                    )
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            Some(
                parse_replay_line(trimmed)
                    .with_context(|| format!("Malformed input on line {}: {:?}", index + 1, trimmed)),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line() {
        assert_eq!(parse_trace_line("7fa133ea0b15"), Ok(AttributeRecord::plain(0x7fa133ea0b15)));
    }

    #[test]
    fn test_full_line() {
        let rec = parse_trace_line("2000 R 3000 W 4000").unwrap();
        assert_eq!(rec.first_address, 0x3000);
        assert_eq!(rec.second_access, SecondAccess::Write);
        assert_eq!(rec.second_address, 0x4000);
    }

    #[test]
    fn test_double_read() {
        let rec = parse_trace_line("10 T R 20 R 30").unwrap();
        assert_eq!(rec.event, EventKind::BranchTaken);
        assert_eq!(rec.first_address, 0x20);
        assert_eq!(rec.second_access, SecondAccess::Read);
        assert_eq!(rec.second_address, 0x30);
    }

    #[test]
    fn test_write_only() {
        let rec = parse_trace_line("7fa133ea0b0b W fa626264").unwrap();
        assert!(!rec.has_first_operand());
        assert_eq!(rec.second_access, SecondAccess::Write);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_trace_line(""), Err(ParseError::Empty));
        assert_eq!(parse_trace_line("xyz"), Err(ParseError::Address("xyz".into())));
        assert_eq!(parse_trace_line("10 R"), Err(ParseError::MissingAddress('R')));
        assert_eq!(parse_trace_line("10 Q 5"), Err(ParseError::Token("Q".into())));
        assert!(parse_trace_line("10 R 1 R 2 R 3").is_err());
    }

    #[test]
    fn test_replay_skips_comments() {
        let input = "# header\n\n1 1000 A\n2 2000 R 3000\n";
        let records: Vec<_> = replay_lines(input.as_bytes()).map(Result::unwrap).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, 1);
        assert_eq!(records[1].1.first_address, 0x3000);
    }

    #[test]
    fn test_replay_reports_line() {
        let mut lines = replay_lines("1 10\nbad 10\n".as_bytes());
        assert!(lines.next().unwrap().is_ok());
        let err = lines.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
