//! State machine module root.
//!
//! The axis record drives the transition evaluator and the flag projector
//! once per cycle.

pub mod axis;
pub mod flags;
pub mod machine;
