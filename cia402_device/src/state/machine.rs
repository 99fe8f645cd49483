//! Transition evaluator for the CiA 402 device state machine.
//!
//! Pure decision logic: given the raw stored state, the control word and the
//! link classification, selects at most one transition and the next state.
//! Guards within one state are tested top to bottom and the first match wins.
//!
//! ```text
//! NotReadyToSwitchOn --(1)--> SwitchOnDisabled --(2)--> ReadyToSwitchOn
//! ReadyToSwitchOn  --(3)--> SwitchedOn  --(4)--> OperationEnabled
//! ReadyToSwitchOn  --(3+4)--> OperationEnabled
//! OperationEnabled --(5)--> SwitchedOn  --(6)--> ReadyToSwitchOn
//! ReadyToSwitchOn  --(7)--> SwitchOnDisabled
//! OperationEnabled --(8)--> ReadyToSwitchOn
//! OperationEnabled --(9)--> SwitchOnDisabled <--(10)-- SwitchedOn
//! OperationEnabled --(11)--> QuickStopActive --(12)--> SwitchOnDisabled
//! FaultReactionActive --(14)--> Fault --(15)--> SwitchOnDisabled
//! ```

use cia402_common::command::{Command, CommandSet};
use cia402_common::state::{AxisState, Transition};

/// Inputs of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInput {
    /// Raw stored state pattern (may be corrupted).
    pub raw_state: u16,
    /// Control word received from the master this cycle.
    pub controlword: u16,
    /// Whether the AL status equals `OP`.
    pub link_operational: bool,
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Resulting state.
    pub state: AxisState,
    /// Recorded transition (`None` when the state holds).
    pub transition: Transition,
    /// The raw state was unrecognized and the machine was reset.
    pub recovered: bool,
}

impl StepOutcome {
    #[inline]
    const fn go(state: AxisState, transition: Transition) -> Self {
        Self {
            state,
            transition,
            recovered: false,
        }
    }

    #[inline]
    const fn hold(state: AxisState) -> Self {
        Self::go(state, Transition::None)
    }
}

/// Evaluate the transition table for one cycle.
pub fn evaluate(input: &StepInput, commands: &CommandSet) -> StepOutcome {
    use AxisState::*;
    use Command::*;

    let cw = input.controlword;
    let cmd = |c: Command| commands.matches(cw, c);
    let link_op = input.link_operational;

    let Some(state) = AxisState::from_u16(input.raw_state) else {
        // Unrecognized pattern: only reachable through record corruption.
        return StepOutcome {
            state: NotReadyToSwitchOn,
            transition: Transition::None,
            recovered: true,
        };
    };

    match state {
        NotReadyToSwitchOn => {
            if link_op {
                StepOutcome::go(SwitchOnDisabled, Transition::NotReadyToSwitchOnToSwitchOnDisabled)
            } else {
                StepOutcome::hold(NotReadyToSwitchOn)
            }
        }

        SwitchOnDisabled => {
            if cmd(Shutdown) || link_op {
                StepOutcome::go(ReadyToSwitchOn, Transition::SwitchOnDisabledToReadyToSwitchOn)
            } else {
                StepOutcome::hold(SwitchOnDisabled)
            }
        }

        ReadyToSwitchOn => {
            if cmd(DisableVoltage) {
                StepOutcome::go(SwitchOnDisabled, Transition::ReadyToSwitchOnToSwitchOnDisabled)
            } else if cmd(SwitchOn) {
                // 3 + 4 in one cycle when enable operation is already set.
                if cmd(SwitchOnEnable) {
                    StepOutcome::go(OperationEnabled, Transition::ReadyToSwitchOnToOperationEnabled)
                } else {
                    StepOutcome::go(SwitchedOn, Transition::ReadyToSwitchOnToSwitchedOn)
                }
            } else {
                StepOutcome::hold(ReadyToSwitchOn)
            }
        }

        SwitchedOn => {
            if cmd(Shutdown) {
                StepOutcome::go(ReadyToSwitchOn, Transition::SwitchedOnToReadyToSwitchOn)
            } else if cmd(EnableOperation) {
                StepOutcome::go(OperationEnabled, Transition::SwitchedOnToOperationEnabled)
            } else if cmd(DisableVoltage) {
                StepOutcome::go(SwitchOnDisabled, Transition::SwitchedOnToSwitchOnDisabled)
            } else {
                StepOutcome::hold(SwitchedOn)
            }
        }

        OperationEnabled => {
            if cmd(DisableOperation) {
                StepOutcome::go(SwitchedOn, Transition::OperationEnabledToSwitchedOn)
            } else if cmd(Shutdown) {
                StepOutcome::go(ReadyToSwitchOn, Transition::OperationEnabledToReadyToSwitchOn)
            } else if cmd(DisableVoltage) || !link_op {
                StepOutcome::go(SwitchOnDisabled, Transition::OperationEnabledToSwitchOnDisabled)
            } else if cmd(QuickStop) {
                StepOutcome::go(QuickStopActive, Transition::OperationEnabledToQuickStopActive)
            } else {
                StepOutcome::hold(OperationEnabled)
            }
        }

        QuickStopActive => {
            if cmd(DisableVoltage) {
                StepOutcome::go(SwitchOnDisabled, Transition::QuickStopActiveToSwitchOnDisabled)
            } else {
                // Transition 16 (EnableOperation → OperationEnabled) is not
                // offered: the axis stays in quick stop until voltage is
                // disabled.
                StepOutcome::hold(QuickStopActive)
            }
        }

        FaultReactionActive => StepOutcome::go(Fault, Transition::FaultReactionActiveToFault),

        Fault => {
            if cmd(FaultReset) {
                StepOutcome::go(SwitchOnDisabled, Transition::FaultToSwitchOnDisabled)
            } else {
                StepOutcome::hold(Fault)
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
