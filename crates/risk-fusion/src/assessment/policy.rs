use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::fusion::FusionPolicy;
use super::scoring::ScoringPolicy;

/// Every tunable threshold of an assessment, loadable as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub scoring: ScoringPolicy,
    pub fusion: FusionPolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read risk policy: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse risk policy: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RiskPolicy {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, PolicyError> {
        let mut policy: RiskPolicy = serde_json::from_str(raw)?;
        policy.fusion = policy.fusion.sanitized();
        Ok(policy)
    }

    pub fn to_json_pretty(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
