//! Configuration model for a wiregen run.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WiregenError};

/// Settings for one generator run.
///
/// The tag is threaded explicitly into parsing so the core stays a pure
/// function of its inputs; there is no global default lookup at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WiringConfig {
    /// Comment tag that introduces a wiring command, e.g. `wiring:`.
    pub tag: String,
}

impl WiringConfig {
    /// Checks the configuration for values the parser cannot work with.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is empty or contains whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.tag.is_empty() {
            return Err(WiregenError::Config {
                message: "wiring tag must not be empty".into(),
            });
        }
        if self.tag.chars().any(char::is_whitespace) {
            return Err(WiregenError::Config {
                message: format!("wiring tag must not contain whitespace: \"{}\"", self.tag),
            });
        }
        Ok(())
    }
}

impl Default for WiringConfig {
    fn default() -> Self {
        Self {
            tag: crate::constants::DEFAULT_TAG.into(),
        }
    }
}
