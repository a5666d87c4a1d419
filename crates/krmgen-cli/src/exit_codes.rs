//! Exit codes of the krmgen binary
//!
//! Unix conventions and sysexits.h where applicable.

/// Every resource converted and the Go file written
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// At least one resource failed to convert; the Go file holds the rest
pub const CONVERSION_ERROR: i32 = 2;

/// Configuration or mapping table could not be loaded
pub const CONFIG_ERROR: i32 = 3;

/// Input path missing or unreadable, output not writable
pub const IO_ERROR: i32 = 5;

/// Invalid arguments or options (sysexits.h)
pub const USAGE_ERROR: i32 = 64;
