//! Configuration types.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    /// Authorization settings.
    pub security: SecurityConfig,
    /// Content settings.
    pub content: ContentConfig,
}

/// Authorization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Emit an audit event for every authorization decision.
    pub audit_decisions: bool,
    /// Also audit granted decisions (denials are always audited when enabled).
    pub log_granted: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            audit_decisions: true,
            log_granted: false,
        }
    }
}

/// Content settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Character count after which an article summary is cut off.
    pub summary_length: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self { summary_length: 40 }
    }
}
