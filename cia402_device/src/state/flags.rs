//! Flag projector: resulting state → hardware-enable flags.
//!
//! Keyed only on the state the evaluator produced, never on the transition,
//! so the same state always yields the same flags.

use cia402_common::flags::DriveFlags;
use cia402_common::state::AxisState;

/// Flags for the power-down states (voltage off, brake on, config allowed).
const DISABLED: DriveFlags = DriveFlags::new(true, false, false, true);
/// High voltage present, brake still holding.
const POWERED: DriveFlags = DriveFlags::new(true, false, true, true);
/// Drive function active, brake released.
const RUNNING: DriveFlags = DriveFlags::new(false, true, true, false);
/// Fault: config allowed, everything else off.
const FAULTED: DriveFlags = DriveFlags::new(true, false, false, false);

/// Project the resulting state onto the four drive flags.
///
/// Returns `None` for `FaultReactionActive`, meaning "leave flags as they
/// were". The evaluator never produces that state as a result.
pub const fn project_flags(state: AxisState) -> Option<DriveFlags> {
    match state {
        AxisState::SwitchOnDisabled | AxisState::ReadyToSwitchOn => Some(DISABLED),
        AxisState::SwitchedOn => Some(POWERED),
        AxisState::OperationEnabled | AxisState::QuickStopActive => Some(RUNNING),
        AxisState::Fault => Some(FAULTED),
        AxisState::NotReadyToSwitchOn => Some(DriveFlags::NONE),
        AxisState::FaultReactionActive => None,
    }
}
