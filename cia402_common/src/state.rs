//! CiA 402 device state and transition enums.
//!
//! `AxisState` uses `#[repr(u16)]` with the status-word indicator pattern as
//! discriminant, so `state as u16` is exactly what gets OR'ed into the status
//! word. `Transition` tags every edge of the device state machine.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use thiserror::Error;

use crate::consts::{STATUSWORD_STATE_MASK_LONG, STATUSWORD_STATE_MASK_SHORT};

// ─── Device State ───────────────────────────────────────────────────

/// Canonical CiA 402 operating state of one axis.
///
/// Only one `AxisState` is active at any time. `FaultReactionActive` is
/// transient and is always advanced to `Fault` in the same cycle it is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum AxisState {
    /// Low-level power applied, drive initializing. Link not yet up.
    NotReadyToSwitchOn = 0x0000,
    /// Initialization complete, high voltage may not be applied.
    SwitchOnDisabled = 0x0040,
    /// High voltage may be applied, drive function disabled.
    ReadyToSwitchOn = 0x0021,
    /// High voltage applied, power amplifier ready.
    SwitchedOn = 0x0023,
    /// Drive function enabled, power applied to the motor.
    OperationEnabled = 0x0027,
    /// Quick stop function being executed.
    QuickStopActive = 0x0007,
    /// Fault detected, fault reaction executing.
    FaultReactionActive = 0x000F,
    /// Fault reaction complete, drive disabled.
    Fault = 0x0008,
}

const_assert_eq!(core::mem::size_of::<AxisState>(), 2);

/// Raw state pattern that matches none of the eight defined states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown CiA 402 state pattern {0:#06x}")]
pub struct UnknownStatePattern(pub u16);

impl AxisState {
    /// All states in CiA 402 diagram order.
    pub const ALL: [Self; 8] = [
        Self::NotReadyToSwitchOn,
        Self::SwitchOnDisabled,
        Self::ReadyToSwitchOn,
        Self::SwitchedOn,
        Self::OperationEnabled,
        Self::QuickStopActive,
        Self::FaultReactionActive,
        Self::Fault,
    ];

    /// Convert from the exact raw indicator pattern. Returns `None` for
    /// anything else (no auxiliary bits tolerated).
    #[inline]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0000 => Some(Self::NotReadyToSwitchOn),
            0x0040 => Some(Self::SwitchOnDisabled),
            0x0021 => Some(Self::ReadyToSwitchOn),
            0x0023 => Some(Self::SwitchedOn),
            0x0027 => Some(Self::OperationEnabled),
            0x0007 => Some(Self::QuickStopActive),
            0x000F => Some(Self::FaultReactionActive),
            0x0008 => Some(Self::Fault),
            _ => None,
        }
    }

    /// Decode the state from a full status word.
    ///
    /// Auxiliary bits (voltage enabled, warning, remote, target reached,
    /// manufacturer bits) are masked off first.
    pub const fn from_status_word(status_word: u16) -> Option<Self> {
        match status_word & STATUSWORD_STATE_MASK_SHORT {
            0x0000 => return Some(Self::NotReadyToSwitchOn),
            0x0040 => return Some(Self::SwitchOnDisabled),
            0x000F => return Some(Self::FaultReactionActive),
            0x0008 => return Some(Self::Fault),
            _ => {}
        }
        match status_word & STATUSWORD_STATE_MASK_LONG {
            0x0021 => Some(Self::ReadyToSwitchOn),
            0x0023 => Some(Self::SwitchedOn),
            0x0027 => Some(Self::OperationEnabled),
            0x0007 => Some(Self::QuickStopActive),
            _ => None,
        }
    }

    /// Indicator bit pattern written into the status word for this state.
    #[inline]
    pub const fn status_pattern(self) -> u16 {
        self as u16
    }

    /// Returns true if high voltage may be present on the power stage.
    #[inline]
    pub const fn is_powered(&self) -> bool {
        matches!(
            self,
            Self::SwitchedOn | Self::OperationEnabled | Self::QuickStopActive
        )
    }

    /// Returns true for the two fault states.
    #[inline]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::FaultReactionActive | Self::Fault)
    }
}

impl Default for AxisState {
    fn default() -> Self {
        Self::NotReadyToSwitchOn
    }
}

impl TryFrom<u16> for AxisState {
    type Error = UnknownStatePattern;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_u16(value).ok_or(UnknownStatePattern(value))
    }
}

impl core::fmt::Display for AxisState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::NotReadyToSwitchOn => "Not ready to switch on",
            Self::SwitchOnDisabled => "Switch on disabled",
            Self::ReadyToSwitchOn => "Ready to switch on",
            Self::SwitchedOn => "Switched on",
            Self::OperationEnabled => "Operation enabled",
            Self::QuickStopActive => "Quick stop active",
            Self::FaultReactionActive => "Fault reaction active",
            Self::Fault => "Fault",
        };
        f.write_str(name)
    }
}

// ─── Transition ─────────────────────────────────────────────────────

/// Edge of the device state machine recorded by one evaluation cycle.
///
/// At most one non-`None` transition is recorded per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Transition {
    /// No state change this cycle.
    None = 0,
    /// 1: link came up.
    NotReadyToSwitchOnToSwitchOnDisabled = 1,
    /// 2: shutdown command (or link operational).
    SwitchOnDisabledToReadyToSwitchOn = 2,
    /// 3: switch on command.
    ReadyToSwitchOnToSwitchedOn = 3,
    /// 4: enable operation command.
    SwitchedOnToOperationEnabled = 4,
    /// 5: disable operation command.
    OperationEnabledToSwitchedOn = 5,
    /// 6: shutdown command.
    SwitchedOnToReadyToSwitchOn = 6,
    /// 7: disable voltage command.
    ReadyToSwitchOnToSwitchOnDisabled = 7,
    /// 8: shutdown command.
    OperationEnabledToReadyToSwitchOn = 8,
    /// 9: disable voltage command or link lost.
    OperationEnabledToSwitchOnDisabled = 9,
    /// 10: disable voltage command.
    SwitchedOnToSwitchOnDisabled = 10,
    /// 11: quick stop command.
    OperationEnabledToQuickStopActive = 11,
    /// 12: disable voltage command.
    QuickStopActiveToSwitchOnDisabled = 12,
    /// 14: fault reaction finished.
    FaultReactionActiveToFault = 14,
    /// 15: fault reset command.
    FaultToSwitchOnDisabled = 15,
    /// 16: enable operation from quick stop. Never produced by the evaluator.
    QuickStopActiveToOperationEnabled = 16,
    /// 3 + 4 in a single cycle: switch on with enable operation set.
    ReadyToSwitchOnToOperationEnabled = 34,
}

impl Transition {
    /// CiA 402 transition number, if the edge has a single one.
    ///
    /// `None` and the combined 3+4 edge have no number.
    pub const fn number(&self) -> Option<u8> {
        match self {
            Self::None | Self::ReadyToSwitchOnToOperationEnabled => None,
            other => Some(*other as u8),
        }
    }

    /// State the edge leaves.
    pub const fn from_state(&self) -> Option<AxisState> {
        use AxisState::*;
        match self {
            Self::None => None,
            Self::NotReadyToSwitchOnToSwitchOnDisabled => Some(NotReadyToSwitchOn),
            Self::SwitchOnDisabledToReadyToSwitchOn => Some(SwitchOnDisabled),
            Self::ReadyToSwitchOnToSwitchedOn
            | Self::ReadyToSwitchOnToSwitchOnDisabled
            | Self::ReadyToSwitchOnToOperationEnabled => Some(ReadyToSwitchOn),
            Self::SwitchedOnToOperationEnabled
            | Self::SwitchedOnToReadyToSwitchOn
            | Self::SwitchedOnToSwitchOnDisabled => Some(SwitchedOn),
            Self::OperationEnabledToSwitchedOn
            | Self::OperationEnabledToReadyToSwitchOn
            | Self::OperationEnabledToSwitchOnDisabled
            | Self::OperationEnabledToQuickStopActive => Some(OperationEnabled),
            Self::QuickStopActiveToSwitchOnDisabled | Self::QuickStopActiveToOperationEnabled => {
                Some(QuickStopActive)
            }
            Self::FaultReactionActiveToFault => Some(FaultReactionActive),
            Self::FaultToSwitchOnDisabled => Some(Fault),
        }
    }

    /// State the edge enters.
    pub const fn to_state(&self) -> Option<AxisState> {
        use AxisState::*;
        match self {
            Self::None => None,
            Self::NotReadyToSwitchOnToSwitchOnDisabled
            | Self::ReadyToSwitchOnToSwitchOnDisabled
            | Self::OperationEnabledToSwitchOnDisabled
            | Self::SwitchedOnToSwitchOnDisabled
            | Self::QuickStopActiveToSwitchOnDisabled
            | Self::FaultToSwitchOnDisabled => Some(SwitchOnDisabled),
            Self::SwitchOnDisabledToReadyToSwitchOn
            | Self::SwitchedOnToReadyToSwitchOn
            | Self::OperationEnabledToReadyToSwitchOn => Some(ReadyToSwitchOn),
            Self::ReadyToSwitchOnToSwitchedOn | Self::OperationEnabledToSwitchedOn => {
                Some(SwitchedOn)
            }
            Self::SwitchedOnToOperationEnabled
            | Self::QuickStopActiveToOperationEnabled
            | Self::ReadyToSwitchOnToOperationEnabled => Some(OperationEnabled),
            Self::OperationEnabledToQuickStopActive => Some(QuickStopActive),
            Self::FaultReactionActiveToFault => Some(Fault),
        }
    }

    /// Returns true if a state change was recorded.
    #[inline]
    pub const fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::None
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
