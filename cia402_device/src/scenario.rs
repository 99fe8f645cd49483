//! Scenario replay: feed a scripted control-word sequence through an axis.
//!
//! A scenario is a TOML list of cycles. Each cycle sets the AL status
//! (sticky until changed), optionally reports a fault, steps the axis with
//! the given control word and may assert the resulting state.
//!
//! ```toml
//! [[cycle]]
//! al_status = 0x08
//! controlword = 0x0000
//! expect_state = "SwitchOnDisabled"
//!
//! [[cycle]]
//! controlword = 0x000F
//! repeat = 3
//! ```

use std::cell::Cell;
use std::path::Path;

use cia402_common::command::CommandSet;
use cia402_common::config::{ConfigError, ConfigLoader};
use cia402_common::consts::AL_STATUS_INIT;
use cia402_common::flags::{DriveFlags, FlagChanges};
use cia402_common::state::{AxisState, Transition};
use serde::Deserialize;
use thiserror::Error;

use crate::state::axis::Axis;

/// Scenario loading or replay failure.
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("scenario config: {0}")]
    Config(#[from] ConfigError),
    #[error("scenario contains no cycles")]
    EmptyScenario,
    #[error("cycle {cycle}: repeat must be at least 1")]
    ZeroRepeat { cycle: usize },
    #[error("scenario needs {steps} steps, limit is {max}")]
    TooManySteps { steps: usize, max: usize },
    #[error("cycle {cycle}: expected {expected:?}, axis is in {actual:?}")]
    UnexpectedState {
        cycle: usize,
        expected: AxisState,
        actual: Option<AxisState>,
    },
}

/// Upper bound on the steps one replay may record.
pub const MAX_STEPS: usize = 1_000_000;

fn default_repeat() -> u32 {
    1
}

/// One scripted cycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CycleSpec {
    /// Control word sent by the master.
    pub controlword: u16,
    /// New AL status; keeps the previous value when absent.
    #[serde(default)]
    pub al_status: Option<u16>,
    /// Report a generic fault before stepping.
    #[serde(default)]
    pub fault: bool,
    /// Number of consecutive steps with the same inputs.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// State required after the last repetition.
    #[serde(default)]
    pub expect_state: Option<AxisState>,
}

/// A full replay script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(rename = "cycle", default)]
    pub cycles: Vec<CycleSpec>,
}

/// Observable output of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleRecord {
    /// Zero-based index of the script entry.
    pub cycle: usize,
    pub controlword: u16,
    pub al_status: u16,
    pub state: AxisState,
    pub status_word: u16,
    pub transition: Transition,
    pub flags: DriveFlags,
    pub changes: FlagChanges,
}

impl Scenario {
    /// Load a scenario from a TOML file.
    pub fn load_file(path: &Path) -> Result<Self, ScenarioError> {
        Ok(Self::load(path)?)
    }

    /// Parse a scenario from TOML text.
    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        Ok(Self::from_toml(content)?)
    }

    /// Total number of steps the replay performs. Saturates at `usize::MAX`.
    pub fn step_count(&self) -> usize {
        self.cycles
            .iter()
            .fold(0usize, |n, c| n.saturating_add(c.repeat as usize))
    }

    /// Check every cycle before anything is stepped.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.cycles.is_empty() {
            return Err(ScenarioError::EmptyScenario);
        }
        if let Some(cycle) = self.cycles.iter().position(|c| c.repeat == 0) {
            return Err(ScenarioError::ZeroRepeat { cycle });
        }
        let steps = self.step_count();
        if steps > MAX_STEPS {
            return Err(ScenarioError::TooManySteps {
                steps,
                max: MAX_STEPS,
            });
        }
        Ok(())
    }

    /// Replay on a fresh axis, starting with the link in `INIT`.
    ///
    /// Rejects the whole script up front if [`Scenario::validate`] fails,
    /// then stops at the first failed expectation.
    pub fn run(&self, commands: CommandSet) -> Result<Vec<CycleRecord>, ScenarioError> {
        self.validate()?;

        let status_word = Cell::new(0u16);
        let link_status = Cell::new(AL_STATUS_INIT);
        let mut axis = Axis::with_commands(&status_word, &link_status, commands);
        let mut records = Vec::with_capacity(self.step_count());

        for (i, spec) in self.cycles.iter().enumerate() {
            if let Some(al) = spec.al_status {
                link_status.set(al);
            }
            if spec.fault {
                axis.report_fault();
            }

            for _ in 0..spec.repeat {
                let transition = axis.step(spec.controlword);
                records.push(CycleRecord {
                    cycle: i,
                    controlword: spec.controlword,
                    al_status: link_status.get(),
                    // Always valid right after a step.
                    state: axis.state().unwrap_or_default(),
                    status_word: axis.status_word(),
                    transition,
                    flags: axis.flags(),
                    changes: axis.flag_changes(),
                });
            }

            if let Some(expected) = spec.expect_state {
                let actual = axis.state();
                if actual != Some(expected) {
                    return Err(ScenarioError::UnexpectedState {
                        cycle: i,
                        expected,
                        actual,
                    });
                }
            }
        }

        Ok(records)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
