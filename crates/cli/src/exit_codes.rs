//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Domain        | Description                                            |
//! |------|---------------|--------------------------------------------------------|
//! | 0    | Universal     | Success                                                |
//! | 1    | Universal     | General error (unspecified)                            |
//! | 2    | Universal     | CLI usage error (bad args)                             |
//! | 3    | Input         | Table file unreadable or unparsable                    |
//! | 4    | Input         | Table invalid: identifier problems, empty, no overlap  |
//! | 5    | Configuration | Bad config file, bad schema, nothing to compare        |
//! | 6    | Output        | Combined table could not be written                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError` construction in `main.rs`

use concord_recon::ConcordError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - comparison ran and the output table was written.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this code on its own.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-4)
// =============================================================================

/// A table file could not be read or parsed.
pub const EXIT_INPUT_READ: u8 = 3;

/// A table parsed but is unusable: missing identifier column, duplicate
/// column, zero rows, empty or duplicate identifier, or no identifier shared
/// between the two tables.
pub const EXIT_INPUT_INVALID: u8 = 4;

// =============================================================================
// Configuration (5)
// =============================================================================

/// Config file or form schema could not be loaded, options are invalid,
/// or no columns are left to compare.
pub const EXIT_CONFIG: u8 = 5;

// =============================================================================
// Output (6)
// =============================================================================

/// The combined table could not be serialized or written.
pub const EXIT_WRITE: u8 = 6;

/// Map an engine error to its exit code.
pub fn concord_exit_code(err: &ConcordError) -> u8 {
    if err.is_input_error() {
        EXIT_INPUT_INVALID
    } else {
        EXIT_CONFIG
    }
}
