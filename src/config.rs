use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::academy::AcademyError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademyConfig {
    /// Stop after this many ticks. `None` runs until the trainer disconnects.
    pub max_steps: Option<u64>,
    /// Register the float properties side channel.
    pub float_properties: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            float_properties: true,
            log_filter: "info".to_string(),
        }
    }
}

impl AcademyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AcademyError> {
        serde_json::from_str(json).map_err(|e| AcademyError::Configuration(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AcademyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AcademyError::Configuration(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}
