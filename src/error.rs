use crate::parser::ParseError;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("no C compiler found (tried {0})")]
    NotFound(String),
    #[error("failed to launch {compiler}: {source}")]
    Launch {
        compiler: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("C compiler exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("input file must have the .{expected} extension: {path}")]
    InvalidExtension { path: PathBuf, expected: &'static str },
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
}

/// Character offset of a 1-based line/column position within `source`.
fn char_offset(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut current_column = 1;
    for (i, ch) in source.chars().enumerate() {
        if current_line == line && current_column == column {
            return i;
        }
        if ch == '\n' {
            current_line += 1;
            current_column = 1;
        } else {
            current_column += 1;
        }
    }
    source.chars().count()
}

fn parse_error_report<'a>(
    source: &str,
    filename: &'a str,
    error: &ParseError,
    color: bool,
) -> Report<'a, (&'a str, std::ops::Range<usize>)> {
    // Errors at end of input point at the last character.
    let len = source.chars().count();
    let offset = char_offset(source, error.line, error.column).min(len.saturating_sub(1));
    let end_offset = std::cmp::min(offset + 1, len);

    Report::build(ReportKind::Error, filename, offset)
        .with_config(Config::default().with_color(color))
        .with_message(format!("Parse error: {}", error.message))
        .with_label(
            Label::new((filename, offset..end_offset))
                .with_message(format!("{}:{}: {}", error.line, error.column, error.message))
                .with_color(Color::Red),
        )
        .finish()
}

/// Display a parse error with ariadne formatting
pub fn display_parse_error(source: &str, filename: &str, error: &ParseError) -> io::Result<()> {
    parse_error_report(source, filename, error, true).eprint((filename, Source::from(source)))
}

/// Write a parse error report without colors, for logs and tests.
pub fn write_parse_error<W: io::Write>(
    source: &str,
    filename: &str,
    error: &ParseError,
    out: W,
) -> io::Result<()> {
    parse_error_report(source, filename, error, false).write((filename, Source::from(source)), out)
}
