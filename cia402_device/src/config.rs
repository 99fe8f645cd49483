//! Device configuration loader with validation.
//!
//! ```toml
//! [shared]
//! service_name = "axis-x"
//! log_level = "debug"
//!
//! # Optional vendor overrides, one table per command.
//! [commands.quick_stop]
//! mask = 0x0086
//! pattern = 0x0002
//! ```

use std::path::Path;

use cia402_common::command::{Command, CommandPattern, CommandSet};
use cia402_common::config::{ConfigError, ConfigLoader, SharedConfig};
use serde::Deserialize;

/// Per-command replacements for the standard table. Absent entries keep
/// the CiA 402 default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandOverrides {
    pub shutdown: Option<CommandPattern>,
    pub switch_on: Option<CommandPattern>,
    pub switch_on_enable: Option<CommandPattern>,
    pub disable_voltage: Option<CommandPattern>,
    pub quick_stop: Option<CommandPattern>,
    pub disable_operation: Option<CommandPattern>,
    pub enable_operation: Option<CommandPattern>,
    pub fault_reset: Option<CommandPattern>,
}

impl CommandOverrides {
    fn entries(&self) -> [(Command, Option<CommandPattern>); 8] {
        [
            (Command::Shutdown, self.shutdown),
            (Command::SwitchOn, self.switch_on),
            (Command::SwitchOnEnable, self.switch_on_enable),
            (Command::DisableVoltage, self.disable_voltage),
            (Command::QuickStop, self.quick_stop),
            (Command::DisableOperation, self.disable_operation),
            (Command::EnableOperation, self.enable_operation),
            (Command::FaultReset, self.fault_reset),
        ]
    }

    /// Apply the overrides on top of `base`.
    pub fn apply(&self, base: CommandSet) -> CommandSet {
        self.entries()
            .into_iter()
            .fold(base, |set, (cmd, pattern)| match pattern {
                Some(p) => set.with_pattern(cmd, p),
                None => set,
            })
    }

    /// Number of overridden commands.
    pub fn len(&self) -> usize {
        self.entries().iter().filter(|(_, p)| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Complete device configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub commands: CommandOverrides,
}

impl DeviceConfig {
    /// Configuration used when no file is given.
    pub fn with_service_name(name: &str) -> Self {
        Self {
            shared: SharedConfig {
                log_level: Default::default(),
                service_name: name.to_string(),
            },
            commands: CommandOverrides::default(),
        }
    }

    /// Command table after overrides.
    pub fn command_set(&self) -> CommandSet {
        self.commands.apply(CommandSet::CIA402)
    }

    /// Validate shared fields and the resulting command table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if let Some(cmd) = self.command_set().first_malformed() {
            let p = self.command_set().pattern(cmd);
            return Err(ConfigError::ValidationError(format!(
                "command {cmd:?}: pattern {:#06x} has bits outside mask {:#06x}",
                p.pattern, p.mask
            )));
        }
        Ok(())
    }
}

/// Load and validate the device configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DeviceConfig, ConfigError> {
    let config = DeviceConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate the device configuration from TOML text.
pub fn load_config_from_str(content: &str) -> Result<DeviceConfig, ConfigError> {
    let config = DeviceConfig::from_toml(content)?;
    config.validate()?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────
