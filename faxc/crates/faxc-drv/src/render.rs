//! Diagnostic rendering: `filename:line:col: error: <message>` followed by
//! the source line and a caret/tilde underline.
//!
//! Spans in this compiler carry line/column but not a byte range (every
//! `Span` the lexer, parser, and code generator build is a point span), so
//! the underline's width is recovered here by scanning the offending
//! token's characters forward from the reported column rather than by
//! reading it off the span.

use faxc_util::diagnostic::{Diagnostic, Level};
use faxc_util::span::SourceFile;

const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31;1m";
const YELLOW: &str = "\x1b[33;1m";
const CYAN: &str = "\x1b[36;1m";
const RESET: &str = "\x1b[0m";

fn level_word(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warning => "warning",
        Level::Note => "note",
        Level::Help => "help",
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => RED,
        Level::Warning => YELLOW,
        Level::Note | Level::Help => CYAN,
    }
}

/// Renders one diagnostic against the file it points into.
pub fn render(diagnostic: &Diagnostic, file: &SourceFile, use_color: bool) -> String {
    let word = level_word(diagnostic.level);
    let mut out = String::new();

    if use_color {
        out.push_str(&format!(
            "{BOLD}{}:{}:{}: {}{word}{RESET}{BOLD}: {}{RESET}\n",
            file.name(),
            diagnostic.span.line,
            diagnostic.span.column,
            level_color(diagnostic.level),
            diagnostic.message,
        ));
    } else {
        out.push_str(&format!(
            "{}:{}:{}: {word}: {}\n",
            file.name(),
            diagnostic.span.line,
            diagnostic.span.column,
            diagnostic.message,
        ));
    }

    if let Some(line) = file.line_at(diagnostic.span.line as usize) {
        out.push_str(line);
        out.push('\n');

        let column = diagnostic.span.column.max(1) as usize;
        let width = token_width(line, column);

        out.push_str(&" ".repeat(column - 1));
        if use_color {
            out.push_str(level_color(diagnostic.level));
        }
        out.push('^');
        for _ in 1..width {
            out.push('~');
        }
        if use_color {
            out.push_str(RESET);
        }
        out.push('\n');
    }

    for note in &diagnostic.notes {
        out.push_str(&format!("  note: {note}\n"));
    }
    for help in &diagnostic.helps {
        out.push_str(&format!("  help: {help}\n"));
    }

    out
}

/// Width (in bytes) of the identifier/number/punctuation run starting at
/// `column` (1-based) in `line`, used to extend the underline under the
/// whole offending token instead of just its first character.
fn token_width(line: &str, column: usize) -> usize {
    let bytes = line.as_bytes();
    let start = column - 1;
    if start >= bytes.len() {
        return 1;
    }
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let mut len = 1;
    if is_word(bytes[start]) {
        while start + len < bytes.len() && is_word(bytes[start + len]) {
            len += 1;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_util::Span;

    #[test]
    fn underline_spans_whole_identifier() {
        let file = SourceFile::new(0, "test.c", "int a = b;\n");
        let diag = Diagnostic::error("undeclared variable 'b' used", Span::point(1, 9));
        let rendered = render(&diag, &file, false);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "test.c:1:9: error: undeclared variable 'b' used");
        assert_eq!(lines[1], "int a = b;");
        assert_eq!(lines[2], "        ^");
    }

    #[test]
    fn colorized_output_carries_ansi_escapes() {
        let file = SourceFile::new(0, "test.c", "return x;\n");
        let diag = Diagnostic::error("oops", Span::point(1, 1));
        let rendered = render(&diag, &file, true);
        assert!(rendered.contains("\x1b["));
    }
}
