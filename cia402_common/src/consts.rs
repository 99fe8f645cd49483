//! Protocol constants shared by all CiA 402 crates.
//!
//! Single source of truth for link-status sentinels and status-word masks.

/// EtherCAT AL status value for the `OP` (operational) state.
///
/// The link is classified as operational only when the AL status equals
/// this value exactly; every other value is "not operational".
pub const AL_STATUS_OP: u16 = 0x0008;

/// EtherCAT AL status value for the `INIT` state.
pub const AL_STATUS_INIT: u16 = 0x0001;

/// EtherCAT AL status value for the `PRE-OP` state.
pub const AL_STATUS_PREOP: u16 = 0x0002;

/// EtherCAT AL status value for the `SAFE-OP` state.
pub const AL_STATUS_SAFEOP: u16 = 0x0004;

/// Status-word mask for states identified by bits 0..3 and 6.
///
/// Covers NotReadyToSwitchOn, SwitchOnDisabled, FaultReactionActive and Fault.
pub const STATUSWORD_STATE_MASK_SHORT: u16 = 0x004F;

/// Status-word mask for states that also need bit 5 (quick stop).
///
/// Covers ReadyToSwitchOn, SwitchedOn, OperationEnabled and QuickStopActive.
pub const STATUSWORD_STATE_MASK_LONG: u16 = 0x006F;

/// Returns true if the raw AL status means the link is operational.
#[inline]
pub const fn is_link_operational(al_status: u16) -> bool {
    al_status == AL_STATUS_OP
}
