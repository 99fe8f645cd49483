//! Integration test: guard ordering, quick-stop lock, faults and recovery.

use std::cell::Cell;

use cia402_common::command::{Command, CommandPattern, CommandSet};
use cia402_common::consts::{AL_STATUS_OP, AL_STATUS_PREOP, AL_STATUS_SAFEOP};
use cia402_common::flags::DriveFlags;
use cia402_common::state::{AxisState, Transition};
use cia402_device::state::axis::Axis;

const SHUTDOWN: u16 = 0x0006;
const SWITCH_ON: u16 = 0x0007;
const ENABLE_OPERATION: u16 = 0x000F;
const DISABLE_VOLTAGE: u16 = 0x0000;
const QUICK_STOP: u16 = 0x0002;
const FAULT_RESET: u16 = 0x0080;

// ── Helpers ─────────────────────────────────────────────────────────

fn enabled<'a>(sw: &'a Cell<u16>, al: &'a Cell<u16>, commands: CommandSet) -> Axis<'a> {
    let mut axis = Axis::with_commands(sw, al, commands);
    for cw in [SHUTDOWN, SHUTDOWN, ENABLE_OPERATION] {
        axis.step(cw);
    }
    assert_eq!(axis.state(), Some(AxisState::OperationEnabled));
    axis
}

/// Quick stop on "bit 2 clear", overlapping disable voltage at 0x0000.
fn overlapping_quick_stop() -> CommandSet {
    CommandSet::CIA402.with_pattern(Command::QuickStop, CommandPattern::new(0x0004, 0x0000))
}

// ── Guard ordering ──────────────────────────────────────────────────

#[test]
fn link_loss_beats_quick_stop() {
    let sw = Cell::new(0);
    let al = Cell::new(AL_STATUS_OP);
    let mut axis = enabled(&sw, &al, CommandSet::CIA402);

    al.set(AL_STATUS_SAFEOP);
    assert_eq!(axis.step(QUICK_STOP), Transition::OperationEnabledToSwitchOnDisabled);
    assert_eq!(sw.get(), 0x0040);
}

#[test]
fn disable_voltage_beats_overlapping_quick_stop() {
    let sw = Cell::new(0);
    let al = Cell::new(AL_STATUS_OP);
    let commands = overlapping_quick_stop();
    assert!(commands.matches(DISABLE_VOLTAGE, Command::DisableVoltage));
    assert!(commands.matches(DISABLE_VOLTAGE, Command::QuickStop));

    let mut axis = enabled(&sw, &al, commands);
    assert_eq!(axis.step(DISABLE_VOLTAGE), Transition::OperationEnabledToSwitchOnDisabled);

    // Quick stop alone still works with the vendor table.
    let mut axis = enabled(&sw, &al, commands);
    assert_eq!(axis.step(QUICK_STOP), Transition::OperationEnabledToQuickStopActive);
}

#[test]
fn disable_operation_checked_before_link() {
    let sw = Cell::new(0);
    let al = Cell::new(AL_STATUS_OP);
    let mut axis = enabled(&sw, &al, CommandSet::CIA402);

    al.set(AL_STATUS_PREOP);
    assert_eq!(axis.step(SWITCH_ON), Transition::OperationEnabledToSwitchedOn);
}

// ── Quick stop ──────────────────────────────────────────────────────

#[test]
fn quick_stop_only_left_by_disable_voltage() {
    let sw = Cell::new(0);
    let al = Cell::new(AL_STATUS_OP);
    let mut axis = enabled(&sw, &al, CommandSet::CIA402);
    axis.step(QUICK_STOP);

    for cw in [ENABLE_OPERATION, SWITCH_ON, SHUTDOWN, QUICK_STOP, FAULT_RESET] {
        assert_eq!(axis.step(cw), Transition::None, "cw={cw:#06x}");
        assert_eq!(axis.state(), Some(AxisState::QuickStopActive));
        assert_eq!(sw.get(), 0x0007);
    }

    al.set(AL_STATUS_SAFEOP);
    assert_eq!(axis.step(ENABLE_OPERATION), Transition::None);

    assert_eq!(axis.step(DISABLE_VOLTAGE), Transition::QuickStopActiveToSwitchOnDisabled);
}

// ── Faults ──────────────────────────────────────────────────────────

#[test]
fn reported_fault_ends_in_fault_from_any_state() {
    let sw = Cell::new(0);
    let al = Cell::new(AL_STATUS_OP);

    for start in AxisState::ALL {
        let mut axis = Axis::new(&sw, &al);
        axis.overwrite_raw_state(start as u16);
        axis.report_fault();
        assert!(axis.fault_pending());

        assert_eq!(axis.step(ENABLE_OPERATION), Transition::FaultReactionActiveToFault);
        assert!(!axis.fault_pending());
        assert_eq!(axis.state(), Some(AxisState::Fault));
        assert_eq!(sw.get(), 0x0008);
        assert_eq!(axis.flags(), DriveFlags::new(true, false, false, false));
    }
}

#[test]
fn fault_reset_ignores_link() {
    let sw = Cell::new(0);
    let al = Cell::new(AL_STATUS_OP);
    let mut axis = enabled(&sw, &al, CommandSet::CIA402);
    axis.report_fault();
    axis.step(ENABLE_OPERATION);

    al.set(AL_STATUS_PREOP);
    for cw in [DISABLE_VOLTAGE, SHUTDOWN, ENABLE_OPERATION] {
        assert_eq!(axis.step(cw), Transition::None);
        assert_eq!(axis.state(), Some(AxisState::Fault));
    }
    assert_eq!(axis.step(FAULT_RESET), Transition::FaultToSwitchOnDisabled);
    assert_eq!(sw.get(), 0x0040);
}

// ── Recovery ────────────────────────────────────────────────────────

#[test]
fn corrupted_state_recovers_to_not_ready() {
    let sw = Cell::new(0);
    let al = Cell::new(AL_STATUS_OP);
    let mut axis = enabled(&sw, &al, CommandSet::CIA402);

    axis.overwrite_raw_state(0x1234);
    assert_eq!(axis.state(), None);
    assert_eq!(axis.raw_state(), 0x1234);

    assert_eq!(axis.step(ENABLE_OPERATION), Transition::None);
    assert_eq!(axis.state(), Some(AxisState::NotReadyToSwitchOn));
    assert_eq!(axis.flags(), DriveFlags::NONE);
    assert_eq!(sw.get(), 0x0000);

    // Normal operation resumes on the next cycle.
    assert_eq!(axis.step(SHUTDOWN), Transition::NotReadyToSwitchOnToSwitchOnDisabled);
}

#[test]
fn overwritten_fault_reaction_resolves_to_fault() {
    let sw = Cell::new(0);
    let al = Cell::new(AL_STATUS_OP);
    let mut axis = Axis::new(&sw, &al);

    axis.overwrite_raw_state(AxisState::FaultReactionActive as u16);
    assert_eq!(axis.step(SHUTDOWN), Transition::FaultReactionActiveToFault);
    assert_eq!(axis.state(), Some(AxisState::Fault));
}
