//! Hardware-enable flags derived from the device state.
//!
//! `DriveFlags` carries four booleans the power stage acts on. `FlagChanges`
//! is the bitflag view used to report edges between two cycles.

use bitflags::bitflags;

/// Per-axis hardware-enable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DriveFlags {
    /// Configuration (parameter writes) is permitted.
    pub config_allowed: bool,
    /// Axis motion function is enabled.
    pub axis_func_enabled: bool,
    /// High-voltage power is applied to the power stage.
    pub hv_power_applied: bool,
    /// Holding brake is applied.
    pub brake_applied: bool,
}

impl DriveFlags {
    /// All four flags cleared.
    pub const NONE: Self = Self {
        config_allowed: false,
        axis_func_enabled: false,
        hv_power_applied: false,
        brake_applied: false,
    };

    pub const fn new(
        config_allowed: bool,
        axis_func_enabled: bool,
        hv_power_applied: bool,
        brake_applied: bool,
    ) -> Self {
        Self {
            config_allowed,
            axis_func_enabled,
            hv_power_applied,
            brake_applied,
        }
    }

    /// Pack into the low nibble of a `u8` for transport.
    #[inline]
    pub const fn pack(&self) -> u8 {
        (self.config_allowed as u8)
            | ((self.axis_func_enabled as u8) << 1)
            | ((self.hv_power_applied as u8) << 2)
            | ((self.brake_applied as u8) << 3)
    }

    /// Unpack from a single `u8`. High nibble is ignored.
    #[inline]
    pub const fn unpack(v: u8) -> Self {
        Self {
            config_allowed: (v & 0x01) != 0,
            axis_func_enabled: (v & 0x02) != 0,
            hv_power_applied: (v & 0x04) != 0,
            brake_applied: (v & 0x08) != 0,
        }
    }

    /// Bitflag view of the set flags.
    #[inline]
    pub const fn as_changes(&self) -> FlagChanges {
        FlagChanges::from_bits_truncate(self.pack())
    }
}

bitflags! {
    /// Set of drive flags, used for edge reporting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FlagChanges: u8 {
        const CONFIG_ALLOWED    = 0x01;
        const AXIS_FUNC_ENABLED = 0x02;
        const HV_POWER_APPLIED  = 0x04;
        const BRAKE_APPLIED     = 0x08;
    }
}

impl FlagChanges {
    /// Flags that went `false → true` between `prev` and `current`.
    #[inline]
    pub const fn rising(prev: DriveFlags, current: DriveFlags) -> Self {
        current.as_changes().difference(prev.as_changes())
    }

    /// Flags that went `true → false` between `prev` and `current`.
    #[inline]
    pub const fn falling(prev: DriveFlags, current: DriveFlags) -> Self {
        prev.as_changes().difference(current.as_changes())
    }

    /// Flags that changed in either direction.
    #[inline]
    pub const fn toggled(prev: DriveFlags, current: DriveFlags) -> Self {
        prev.as_changes().symmetric_difference(current.as_changes())
    }
}

impl Default for FlagChanges {
    fn default() -> Self {
        Self::empty()
    }
}
