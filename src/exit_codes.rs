//! Exit code constants for the assistant CLI.
//!
//! - 0: Success (also used when the command definition could not be loaded)
//! - 1: User error (I/O, configuration, missing interactive input)
//! - 2: Invalid arguments forwarded to a command
//! - 3: The external assistant failed

/// Successful execution, or a run aborted because its command definition failed to load.
pub const SUCCESS: i32 = 0;

/// User error: unreadable files, invalid configuration, closed input.
pub const USER_ERROR: i32 = 1;

/// Forwarded flags do not match the command's declared arguments.
pub const INVALID_ARGUMENTS: i32 = 2;

/// The assistant command could not be started, timed out, or exited non-zero.
pub const ASSISTANT_FAILURE: i32 = 3;
