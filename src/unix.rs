//! # sys (UNIX)
//!
//! UNIX-specific structs and functions. Will be imported as `sys`.

use std::fs::File;
use std::io;

// On UNIX systems, termios represents the terminal mode.
pub use libc::termios as TermMode;
use libc::{c_int, ioctl, tcgetattr, tcsetattr, winsize};
use libc::{
    BRKINT, CS8, ECHO, ICANON, ICRNL, IEXTEN, INPCK, ISIG, ISTRIP, IXON, OPOST, STDIN_FILENO,
    STDOUT_FILENO, TCSADRAIN, TIOCGWINSZ, VMIN, VTIME,
};

use crate::Error;

fn cerr(err: c_int) -> Result<(), Error> {
    match err {
        0..=c_int::MAX => Ok(()),
        _ => Err(std::io::Error::last_os_error().into()),
    }
}

/// Return the window size as (rows, columns), by calling the TIOCGWINSZ ioctl.
///
/// A reported width of zero is treated as invalid, so that the caller can fall back to another
/// method of obtaining the window size.
pub fn get_window_size() -> Result<(usize, usize), Error> {
    let mut ws: winsize = unsafe { std::mem::zeroed() };
    cerr(unsafe { ioctl(STDOUT_FILENO, TIOCGWINSZ, &mut ws) })?;
    match (ws.ws_row, ws.ws_col) {
        (_, 0) => Err(Error::InvalidWindowSize),
        (rows, cols) => Ok((rows as usize, cols as usize)),
    }
}

/// Switch the terminal into raw mode and return the original terminal mode, to be restored when
/// the editor exits.
///
/// Raw mode turns off byte transformations on input (ICRNL, IXON and the legacy BRKINT, INPCK,
/// ISTRIP), output post-processing (OPOST) and local echo, canonical line buffering, signal
/// generation and extended input processing (ECHO, ICANON, ISIG, IEXTEN). VMIN = 0 and VTIME = 1
/// make reads return after at most 100ms, possibly with no bytes.
pub fn enable_raw_mode() -> Result<TermMode, Error> {
    let mut orig_term_mode: TermMode = unsafe { std::mem::zeroed() };
    cerr(unsafe { tcgetattr(STDIN_FILENO, &mut orig_term_mode) })?;
    let mut term_mode = orig_term_mode;
    term_mode.c_iflag &= !(BRKINT | ICRNL | INPCK | ISTRIP | IXON);
    term_mode.c_oflag &= !OPOST;
    term_mode.c_cflag |= CS8;
    term_mode.c_lflag &= !(ECHO | ICANON | IEXTEN | ISIG);
    term_mode.c_cc[VMIN] = 0;
    term_mode.c_cc[VTIME] = 1;
    set_term_mode(&term_mode)?;
    Ok(orig_term_mode)
}

/// Set the terminal mode.
pub fn set_term_mode(term_mode: &TermMode) -> Result<(), Error> {
    cerr(unsafe { tcsetattr(STDIN_FILENO, TCSADRAIN, term_mode) })
}

/// Return the file to read keyboard input from: the controlling terminal.
pub fn stdin() -> io::Result<File> { File::open("/dev/tty") }
