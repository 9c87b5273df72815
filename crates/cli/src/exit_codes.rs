//! CLI exit code registry
//!
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Description                              |
//! |------|------------------------------------------|
//! | 0    | Success                                  |
//! | 1    | General error (engine/io failure)        |
//! | 2    | Usage error (bad args, missing file)     |
//!
//! Bad command-line syntax exits with 2 via clap; a missing or unreadable
//! input file also maps to 2 so scripts can tell "you called it wrong"
//! from "the data is bad".

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - engine refusal or malformed data.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing input file.
pub const EXIT_USAGE: u8 = 2;

/// An error carrying its exit code.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: message.into() }
    }
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        Self { code: EXIT_ERROR, message }
    }
}
