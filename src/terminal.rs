//! # Terminal
//!
//! Helpers for writing to the terminal, and a fallback for obtaining the
//! window size when the system call is unavailable.

use std::io::{self, Read, Write};

use crate::ansi_escape::{DEVICE_STATUS_REPORT, REPOSITION_CURSOR_END};
use crate::{sys, Error};

/// Write the given bytes to stdout and flush, so that they reach the
/// terminal immediately.
pub fn print_and_flush(bytes: &[u8]) -> Result<(), Error> {
    let mut stdout = io::stdout();
    stdout.write_all(bytes)?;
    Ok(stdout.flush()?)
}

/// Obtain the window size by moving the cursor to the bottom-right corner of
/// the screen and asking the terminal for the cursor position.
///
/// This is used when the window size ioctl fails or reports a zero width.
pub fn get_window_size_using_cursor() -> Result<(usize, usize), Error> {
    print_and_flush(format!("{}{}", REPOSITION_CURSOR_END, DEVICE_STATUS_REPORT).as_bytes())?;

    // The terminal replies with a Cursor Position Report: <ESC>[<rows>;<cols>R
    let mut response = Vec::new();
    for byte in sys::stdin()?.bytes() {
        match byte? {
            b'R' => break,
            byte => response.push(byte),
        }
    }
    parse_cursor_position(&response).ok_or(Error::CursorPosition)
}

/// Parse the payload of a Cursor Position Report (without the final 'R'),
/// returning (rows, columns).
fn parse_cursor_position(response: &[u8]) -> Option<(usize, usize)> {
    let payload = response.strip_prefix(b"\x1b[")?;
    let mut parts = payload
        .split(|&byte| byte == b';')
        .map(|part| std::str::from_utf8(part).ok().and_then(|s| s.parse::<usize>().ok()));
    match (parts.next().flatten(), parts.next().flatten(), parts.next()) {
        (Some(rows), Some(cols), None) => Some((rows, cols)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_cursor_position;

    #[test]
    fn cursor_position_report_is_parsed() {
        assert_eq!(parse_cursor_position(b"\x1b[24;80"), Some((24, 80)));
        assert_eq!(parse_cursor_position(b"\x1b[1;1"), Some((1, 1)));
    }

    #[test]
    fn malformed_reports_are_rejected() {
        assert_eq!(parse_cursor_position(b""), None);
        assert_eq!(parse_cursor_position(b"24;80"), None);
        assert_eq!(parse_cursor_position(b"\x1b[24"), None);
        assert_eq!(parse_cursor_position(b"\x1b[24;80;1"), None);
        assert_eq!(parse_cursor_position(b"\x1b[a;b"), None);
    }
}
