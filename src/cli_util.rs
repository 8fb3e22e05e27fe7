use std::io::{self, Write};

use crate::diagnostics::Diagnostics;
use crate::error::EngineError;
use crate::theme::Palette;

/// Show a short window around the position for context.
const WINDOW_BYTES: usize = 32;

/// Pretty-print a failed run: diagnostic message, a caret under the failing
/// instruction, and the underlying error. Goes to stderr.
/// If `program` is `Some("bf")`, messages are prefixed with "bf: ...".
pub fn print_engine_error(
    program: Option<&str>,
    code: &[u8],
    diagnostics: &Diagnostics,
    err: &EngineError,
) {
    let palette = Palette::for_stderr();
    let mut stderr = io::stderr().lock();
    let _ = write_engine_error(&mut stderr, &palette, program, code, diagnostics, err);
    let _ = stderr.flush();
}

pub fn write_engine_error<W: Write>(
    out: &mut W,
    palette: &Palette,
    program: Option<&str>,
    code: &[u8],
    diagnostics: &Diagnostics,
    err: &EngineError,
) -> io::Result<()> {
    // Diagnostics are only empty if the caller skipped them; fall back to the error itself.
    let (message, pos) = match diagnostics.index() {
        Some(index) => (diagnostics.message().to_string(), index),
        None => (err.diagnostic(), err.ip()),
    };
    let headline = match program {
        Some(p) => format!("{p}: {message} at instruction {pos}"),
        None => format!("{message} at instruction {pos}"),
    };
    writeln!(out, "{}", palette.headline.paint(headline))?;
    write_context(out, palette, code, pos)?;
    writeln!(out, "  {}", palette.cause.paint(format!("({err})")))
}

/// Write a context window of `code` with a caret under byte `pos`.
///
/// Bytes that are not printable ASCII are shown as '.' so every byte takes
/// exactly one column.
fn write_context<W: Write>(out: &mut W, palette: &Palette, code: &[u8], pos: usize) -> io::Result<()> {
    if code.is_empty() {
        return Ok(());
    }
    let start = pos.saturating_sub(WINDOW_BYTES);
    let end = (pos + WINDOW_BYTES + 1).min(code.len());
    if start >= end {
        return Ok(());
    }
    let slice: String = code[start..end]
        .iter()
        .map(|&b| if b == b' ' || b.is_ascii_graphic() { b as char } else { '.' })
        .collect();
    writeln!(out, "  {}", palette.source.paint(slice))?;

    // Caret under the exact position
    let underline = format!("{}^", " ".repeat(pos - start));
    writeln!(out, "  {}", palette.caret.paint(underline))
}

/// Print an abort notice such as a wall-clock timeout.
pub fn print_notice(message: &str) {
    let palette = Palette::for_stderr();
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", palette.notice.paint(message));
    let _ = stderr.flush();
}
