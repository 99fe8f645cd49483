//! Axis record: state, flags and the bindings to caller-owned slots.
//!
//! The status word and the AL status live in caller memory (typically the
//! process-data image of the fieldbus stack). The record borrows both as
//! `Cell<u16>` for its whole lifetime: it writes the status word and reads
//! the AL status once per `step`, and never owns either.

use std::cell::Cell;

use cia402_common::command::CommandSet;
use cia402_common::consts::is_link_operational;
use cia402_common::flags::{DriveFlags, FlagChanges};
use cia402_common::state::{AxisState, Transition};
use tracing::{debug, trace, warn};

use super::flags::project_flags;
use super::machine::{StepInput, evaluate};

/// One CiA 402 axis, driven once per control cycle.
#[derive(Debug)]
pub struct Axis<'a> {
    /// Raw state pattern. Always a valid `AxisState` unless overwritten.
    state: u16,
    transition: Transition,
    flags: DriveFlags,
    prev_flags: DriveFlags,
    pending_fault: bool,
    commands: CommandSet,
    status_word: &'a Cell<u16>,
    link_status: &'a Cell<u16>,
}

impl<'a> Axis<'a> {
    /// Bind the status-word output and AL-status input and start in
    /// `NotReadyToSwitchOn` with all flags cleared.
    ///
    /// The status word is left untouched until the first [`Axis::step`].
    pub fn new(status_word: &'a Cell<u16>, link_status: &'a Cell<u16>) -> Self {
        Self::with_commands(status_word, link_status, CommandSet::CIA402)
    }

    /// Like [`Axis::new`] with a vendor-specific command table.
    pub fn with_commands(
        status_word: &'a Cell<u16>,
        link_status: &'a Cell<u16>,
        commands: CommandSet,
    ) -> Self {
        let flags = DriveFlags::NONE;
        Self {
            state: AxisState::NotReadyToSwitchOn as u16,
            transition: Transition::None,
            flags,
            prev_flags: flags,
            pending_fault: false,
            commands,
            status_word,
            link_status,
        }
    }

    /// Run one cycle of the device state machine.
    ///
    /// Snapshots the flags, clears the status word and the transition slot,
    /// evaluates the transition table, writes the resulting state pattern
    /// and re-projects the flags. Returns the recorded transition.
    pub fn step(&mut self, controlword: u16) -> Transition {
        self.prev_flags = self.flags;
        self.status_word.set(0);
        self.transition = Transition::None;

        if self.pending_fault {
            // Transition 13: generic fault entry, resolved below in this cycle.
            self.pending_fault = false;
            self.state = AxisState::FaultReactionActive as u16;
            debug!("fault reported, entering fault reaction");
        }

        let outcome = evaluate(
            &StepInput {
                raw_state: self.state,
                controlword,
                link_operational: self.is_link_operational(),
            },
            &self.commands,
        );

        if outcome.recovered {
            warn!(
                raw_state = format_args!("{:#06x}", self.state),
                "unrecognized axis state, resetting to NotReadyToSwitchOn"
            );
            self.flags = DriveFlags::NONE;
        }

        self.state = outcome.state as u16;
        self.transition = outcome.transition;
        self.status_word
            .set(self.status_word.get() | outcome.state.status_pattern());

        if let Some(flags) = project_flags(outcome.state) {
            self.flags = flags;
        }

        if outcome.transition.is_some() {
            debug!(
                controlword = format_args!("{controlword:#06x}"),
                transition = ?outcome.transition,
                number = outcome.transition.number(),
                "{}",
                outcome.state
            );
        } else {
            trace!(state = ?outcome.state, "hold");
        }

        self.transition
    }

    /// Latch a generic fault. The next [`Axis::step`] passes through
    /// `FaultReactionActive` and ends in `Fault`.
    pub fn report_fault(&mut self) {
        self.pending_fault = true;
    }

    /// Overwrite the stored state with an arbitrary pattern, bypassing
    /// validation. Unknown patterns are recovered on the next step.
    pub fn overwrite_raw_state(&mut self, raw: u16) {
        self.state = raw;
    }

    /// Current state, `None` only after an unknown raw pattern was written.
    #[inline]
    pub const fn state(&self) -> Option<AxisState> {
        AxisState::from_u16(self.state)
    }

    /// Raw stored state pattern.
    #[inline]
    pub const fn raw_state(&self) -> u16 {
        self.state
    }

    /// Transition recorded by the last step.
    #[inline]
    pub const fn transition(&self) -> Transition {
        self.transition
    }

    /// Flags after the last step.
    #[inline]
    pub const fn flags(&self) -> DriveFlags {
        self.flags
    }

    /// Flags as they were at the start of the last step.
    #[inline]
    pub const fn prev_flags(&self) -> DriveFlags {
        self.prev_flags
    }

    /// Flags that changed during the last step.
    #[inline]
    pub const fn flag_changes(&self) -> FlagChanges {
        FlagChanges::toggled(self.prev_flags, self.flags)
    }

    /// Whether a fault is latched for the next step.
    #[inline]
    pub const fn fault_pending(&self) -> bool {
        self.pending_fault
    }

    /// Current value of the bound status word.
    #[inline]
    pub fn status_word(&self) -> u16 {
        self.status_word.get()
    }

    /// Whether the bound AL status currently reads `OP`.
    #[inline]
    pub fn is_link_operational(&self) -> bool {
        is_link_operational(self.link_status.get())
    }

    /// Command table in use.
    #[inline]
    pub const fn commands(&self) -> &CommandSet {
        &self.commands
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
