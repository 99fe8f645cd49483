//! # CiA 402 Axis Device
//!
//! Device-side CiA 402 (IEC 61800-7) state machine for a single axis.
//! Each control cycle the caller hands in the control word received from the
//! master; the axis reads the EtherCAT AL status, selects at most one
//! transition, writes the status word and derives the hardware-enable flags
//! (config allowed, axis function enabled, HV power applied, brake applied).
//!
//! ## Layout
//!
//! 1. [`state::machine`]: transition evaluator (pure)
//! 2. [`state::flags`]: flag projector (pure)
//! 3. [`state::axis`]: axis record, initializer and per-cycle `step`
//! 4. [`config`] / [`scenario`]: device config and scripted replay used by
//!    the `cia402_sim` binary
//!
//! ## Zero-Allocation Step
//!
//! `Axis::step` is constant time: one table dispatch and one flag lookup,
//! no loops, no heap allocation, no I/O.
//!
//! ```rust
//! use std::cell::Cell;
//! use cia402_common::prelude::*;
//! use cia402_device::state::axis::Axis;
//!
//! let status_word = Cell::new(0);
//! let al_status = Cell::new(AL_STATUS_OP);
//! let mut axis = Axis::new(&status_word, &al_status);
//!
//! axis.step(0x0000);
//! assert_eq!(axis.state(), Some(AxisState::SwitchOnDisabled));
//! assert_eq!(status_word.get(), 0x0040);
//! ```

pub mod config;
pub mod scenario;
pub mod state;
