//! CLI command implementations
//!
//! Exit codes shared by every command:
//! `0` success, `1` partial success, `2` configuration error, `3` source error,
//! `4` connection error, `5` fatal error, `130` interrupted.

pub mod clear;
pub mod import;
pub mod sessions;
pub mod validate;

use crate::domain::BulkloadError;

/// Map an error that ended a command to its process exit code
pub fn exit_code_for(error: &BulkloadError) -> i32 {
    match error {
        BulkloadError::Configuration(_) => 2,
        BulkloadError::Source(_) => 3,
        BulkloadError::Connection(_) | BulkloadError::CosmosDb(_) | BulkloadError::Database(_) => {
            4
        }
        _ => 5,
    }
}

/// Ask for a yes/no confirmation on stdin
pub(crate) fn confirm(prompt: &str) -> std::io::Result<bool> {
    use std::io::{self, Write};

    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
