//! Prelude module for common re-exports.
//!
//! ```rust
//! use cia402_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── Protocol ───────────────────────────────────────────────────────
pub use crate::command::{Command, CommandPattern, CommandSet};
pub use crate::consts::{AL_STATUS_OP, is_link_operational};
pub use crate::flags::{DriveFlags, FlagChanges};
pub use crate::state::{AxisState, Transition, UnknownStatePattern};
