use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DriverError;

/// Looked up next to the input module when no `--config` is given.
pub const SETTINGS_FILE_NAME: &str = "yulopt.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    FullInliner,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::FullInliner => "full-inliner",
        }
    }
}

/// Contents of `yulopt.toml`:
///
/// ```toml
/// steps = ["full-inliner"]
/// reserved_names = ["memoryguard"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimiserSettings {
    /// Steps in execution order.
    pub steps: Vec<Step>,
    /// Names the optimiser must not introduce, in addition to every name
    /// already in the module.
    pub reserved_names: Vec<String>,
}

impl Default for OptimiserSettings {
    fn default() -> Self {
        Self {
            steps: vec![Step::FullInliner],
            reserved_names: Vec::new(),
        }
    }
}

impl OptimiserSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, DriverError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, DriverError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Settings from `yulopt.toml` in `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, DriverError> {
        let candidate = dir.join(SETTINGS_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
