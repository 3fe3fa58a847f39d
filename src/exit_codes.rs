//! Process exit codes used by the `docreflow` binary
//!
//! - 0: every input was processed
//! - 1: at least one input could not be read, decoded or formatted
//! - 2: invalid arguments, configuration or another tool-level failure

pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const PROCESSING_FAILED: i32 = 1;
    pub const TOOL_ERROR: i32 = 2;

    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    pub fn processing_failed() -> ! {
        std::process::exit(PROCESSING_FAILED);
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
