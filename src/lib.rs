#![allow(clippy::module_inception)]

use std::{fmt::Write, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A byte offset into a named source.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Finds the line containing a byte offset.
///
/// Returns the 1-based line number, the line's text and the column of the
/// offset within that line (in characters). Offsets past the end of the source
/// point just after the last character of the last line.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;
    let mut last_line = "";

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), column_of(line, pos - start));
        }

        start = end;
        last_line = line;
        line_number += 1;
    }

    if last_line.ends_with('\n') || source.is_empty() {
        // The offset sits on the empty line after a trailing newline
        return (line_number, String::new(), 0);
    }

    let trimmed = last_line.trim_end_matches('\n');
    (line_number - 1, last_line.to_string(), trimmed.chars().count())
}

fn column_of(line: &str, byte_offset: usize) -> usize {
    line.get(..byte_offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(byte_offset)
}

/// Renders an error against the source it was produced from.
///
/// ```text
/// Error: UnexpectedToken (expected IDENTIFIER, found ASSIGN `=`)
/// -> script.do
///   |
/// 1 | let = 5;
///   | ----^
/// ```
pub fn format_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    let mut output = String::new();

    // Writing into a String cannot fail
    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(output, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(output, "Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    let _ = writeln!(output, "-> {}", position.1);
    let _ = writeln!(output, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(output, "{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    let _ = write!(output, "{:>padding$} {:->arrows$}", "|", "^");
    output
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}
