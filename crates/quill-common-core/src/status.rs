//! Common status types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account lifecycle state of a user.
///
/// Stored as a small integer (`0`, `1`, `2`) by persistence layers; the serde
/// form is the snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Registered but not yet confirmed.
    #[default]
    Pending,
    /// Confirmed and in good standing.
    Active,
    /// Locked out by an administrator.
    Disabled,
}

impl UserStatus {
    /// Storage code for this status.
    pub const fn code(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Disabled => 2,
        }
    }

    /// Decode a storage code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Active),
            2 => Some(Self::Disabled),
            _ => None,
        }
    }

    /// Is the account locked out?
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Disabled => "disabled",
        };
        f.write_str(name)
    }
}
