//! Canonical schema constants for structured logging and events
//!
//! Field names appear as identifiers in the logging macros; these
//! constants are what consumers of the events (the capture layer, log
//! queries, tests) match on.

// Field keys
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_VERSION: &str = "version";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
