//! Process exit codes. Part of the public contract.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Walk reached a terminal state |
//! | 1 | An action failed or has no implementation |
//! | 2 | Bad arguments, model resolution, report output |
//! | 3 | Engine unreachable, bad reply, model rejected |
//! | 4 | Walk file unreadable, unwritable or already present |
//!
//! Codes 1, 3 and 4 come from [`WalkError::exit_code`].

use pathwalk_core::WalkError;

pub const SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 2;

/// Exit code for an error that ended a command.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<WalkError>()
        .map(WalkError::exit_code)
        .unwrap_or(CONFIG_ERROR)
}
