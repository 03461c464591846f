//! # Errors

use std::fmt;

/// Error type.
#[derive(Debug)]
pub enum Error {
    /// Wrapper around `std::io::Error`.
    Io(std::io::Error),
    /// Error returned when the window size obtained through a system call is invalid.
    InvalidWindowSize,
    /// Error setting or retrieving the cursor position.
    CursorPosition,
    /// Too many arguments given on the command line. The attribute corresponds to the total number
    /// of command line arguments.
    TooManyArguments(usize),
    /// Unrecognized option given as a command line argument.
    UnrecognizedOption(String),
}

impl From<std::io::Error> for Error {
    /// Convert an IO Error into an editor Error.
    fn from(err: std::io::Error) -> Self { Self::Io(err) }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {}", err),
            Self::InvalidWindowSize => write!(f, "Invalid window size"),
            Self::CursorPosition => write!(f, "Could not obtain the cursor position"),
            Self::TooManyArguments(n) => write!(f, "Expected at most 1 argument, got {}", n),
            Self::UnrecognizedOption(opt) => write!(f, "Unrecognized option: {}", opt),
        }
    }
}
