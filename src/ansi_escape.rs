//! # ANSI escape sequences
//!
//! Named constants for the escape sequences the editor writes to the
//! terminal.

/// Clear the whole screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Move the cursor to the top-left corner.
pub const MOVE_CURSOR_TO_START: &str = "\x1b[H";

/// Clear the line, from the cursor to the end of the line.
pub const CLEAR_LINE_RIGHT_OF_CURSOR: &str = "\x1b[K";

/// Hide the cursor while the frame is being drawn.
pub const HIDE_CURSOR: &str = "\x1b[?25l";

/// Show the cursor again.
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Switch to reverse video.
pub const REVERSE_VIDEO: &str = "\x1b[7m";

/// Reset the text formatting.
pub const RESET_FMT: &str = "\x1b[m";

/// Reset the foreground color to the default.
pub const DEFAULT_FOREGROUND: &str = "\x1b[39m";

/// Ask the terminal to report the cursor position ("Device Status Report").
pub const DEVICE_STATUS_REPORT: &str = "\x1b[6n";

/// Move the cursor as far right and down as the terminal allows. The cursor
/// stops at the bottom-right corner, so this is usable as a window size
/// probe together with `DEVICE_STATUS_REPORT`.
pub const REPOSITION_CURSOR_END: &str = "\x1b[999C\x1b[999B";
