//! CiA 402 Common Library
//!
//! Shared protocol types and configuration loading for the CiA 402 axis
//! device crates.
//!
//! # Module Structure
//!
//! - [`state`] - Device state and transition enums
//! - [`command`] - Control-word command table
//! - [`flags`] - Hardware-enable flags and edge sets
//! - [`consts`] - Link-status and status-word constants
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use cia402_common::prelude::*;
//!
//! assert!(CommandSet::CIA402.matches(0x0006, Command::Shutdown));
//! assert_eq!(AxisState::from_status_word(0x0237), Some(AxisState::OperationEnabled));
//! ```

pub mod command;
pub mod config;
pub mod consts;
pub mod flags;
pub mod prelude;
pub mod state;
