//! Control-word command table.
//!
//! Every CiA 402 device-control command is a `(mask, pattern)` pair and a
//! control word carries the command when `(controlword & mask) == pattern`.
//! The table is plain data so vendor variants can replace single entries
//! without touching the evaluator.

use serde::{Deserialize, Serialize};

/// Device-control commands recognised in the control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Command {
    /// Transitions 2, 6, 8.
    Shutdown = 0,
    /// Transition 3.
    SwitchOn = 1,
    /// Switch on with enable operation already set (3 + 4).
    SwitchOnEnable = 2,
    /// Transitions 7, 9, 10, 12.
    DisableVoltage = 3,
    /// Transition 11.
    QuickStop = 4,
    /// Transition 5.
    DisableOperation = 5,
    /// Transitions 4, 16.
    EnableOperation = 6,
    /// Transition 15.
    FaultReset = 7,
}

/// Number of entries in a [`CommandSet`].
pub const COMMAND_COUNT: usize = 8;

impl Command {
    /// All commands in table order.
    pub const ALL: [Self; COMMAND_COUNT] = [
        Self::Shutdown,
        Self::SwitchOn,
        Self::SwitchOnEnable,
        Self::DisableVoltage,
        Self::QuickStop,
        Self::DisableOperation,
        Self::EnableOperation,
        Self::FaultReset,
    ];
}

/// One `(mask, pattern)` entry of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandPattern {
    /// Control-word bits that take part in the comparison.
    pub mask: u16,
    /// Required value of the masked bits.
    pub pattern: u16,
}

impl CommandPattern {
    pub const fn new(mask: u16, pattern: u16) -> Self {
        Self { mask, pattern }
    }

    /// Bitwise command test.
    #[inline]
    pub const fn matches(&self, controlword: u16) -> bool {
        controlword & self.mask == self.pattern
    }

    /// A pattern with bits outside its mask can never match.
    #[inline]
    pub const fn is_well_formed(&self) -> bool {
        self.pattern & !self.mask == 0
    }
}

/// Complete command table, indexed by [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSet {
    table: [CommandPattern; COMMAND_COUNT],
}

impl CommandSet {
    /// Standard CiA 402 device-control commands.
    pub const CIA402: Self = Self {
        table: [
            // Shutdown: 0xxx x110
            CommandPattern::new(0x0087, 0x0006),
            // Switch on: 0xxx x111 (enable operation bit ignored)
            CommandPattern::new(0x0087, 0x0007),
            // Switch on + enable operation: 0xxx 1111
            CommandPattern::new(0x008F, 0x000F),
            // Disable voltage: 0xxx xx0x
            CommandPattern::new(0x0082, 0x0000),
            // Quick stop: 0xxx x01x
            CommandPattern::new(0x0086, 0x0002),
            // Disable operation: 0xxx 0111
            CommandPattern::new(0x008F, 0x0007),
            // Enable operation: 0xxx 1111
            CommandPattern::new(0x008F, 0x000F),
            // Fault reset: 1xxx xxxx
            CommandPattern::new(0x0080, 0x0080),
        ],
    };

    /// Table entry for `command`.
    #[inline]
    pub const fn pattern(&self, command: Command) -> CommandPattern {
        self.table[command as usize]
    }

    /// Returns true if `controlword` carries `command`.
    #[inline]
    pub const fn matches(&self, controlword: u16, command: Command) -> bool {
        self.pattern(command).matches(controlword)
    }

    /// Replace one entry, returning the updated table.
    #[must_use]
    pub const fn with_pattern(mut self, command: Command, pattern: CommandPattern) -> Self {
        self.table[command as usize] = pattern;
        self
    }

    /// First command whose pattern is not well formed, if any.
    pub fn first_malformed(&self) -> Option<Command> {
        Command::ALL
            .into_iter()
            .find(|&cmd| !self.pattern(cmd).is_well_formed())
    }

    /// Every command carried by `controlword`, in table order.
    pub fn decode(&self, controlword: u16) -> impl Iterator<Item = Command> + '_ {
        Command::ALL
            .into_iter()
            .filter(move |&cmd| self.matches(controlword, cmd))
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::CIA402
    }
}
