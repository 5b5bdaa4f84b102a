//! Actions a caller can attempt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actions that can be performed on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Read a single resource.
    View,
    /// Read the collection.
    ViewList,
    Edit,
    Delete,
    Create,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 5] = [
        Action::View,
        Action::ViewList,
        Action::Edit,
        Action::Delete,
        Action::Create,
    ];

    /// Attribute name as used by callers (`VIEW`, `VIEW_LIST`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::ViewList => "VIEW_LIST",
            Self::Edit => "EDIT",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
        }
    }
}

/// Error parsing an action attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action attribute: {0:?}")]
pub struct ActionParseError(pub String);

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ActionParseError(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
