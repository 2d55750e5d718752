// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph configuration: capacities and the violation policy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What happens when a topology, lifetime or lookup violation is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// Log the violation, leave state untouched and return the error.
    #[default]
    Report,
    /// Log the violation, then panic. Intended for diagnostic builds.
    Halt,
}

/// Capacities and policies shared by every node built from one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Fixed input capacity of every node.
    pub max_inputs: usize,
    /// Number of classes the node manager can register.
    pub max_registered_classes: usize,
    /// Shortest accepted class name, in bytes.
    pub min_class_name_len: usize,
    /// Longest accepted class name, in bytes.
    pub max_class_name_len: usize,
    /// Reaction to violations.
    pub violation_policy: ViolationPolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_inputs: 8,
            max_registered_classes: 256,
            min_class_name_len: 4,
            max_class_name_len: 63,
            violation_policy: ViolationPolicy::Report,
        }
    }
}

/// Error type for config parsing and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The parsed values are inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl GraphConfig {
    /// Parses a JSON document and validates it. Missing fields take their
    /// default value.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the invariants between fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_inputs == 0 {
            return Err(ConfigError::Invalid("max_inputs must be at least 1".into()));
        }
        if self.max_registered_classes == 0 {
            return Err(ConfigError::Invalid(
                "max_registered_classes must be at least 1".into(),
            ));
        }
        if self.min_class_name_len > self.max_class_name_len {
            return Err(ConfigError::Invalid(format!(
                "min_class_name_len ({}) exceeds max_class_name_len ({})",
                self.min_class_name_len, self.max_class_name_len
            )));
        }
        Ok(())
    }

    /// Returns a copy using `policy` for violations.
    pub fn with_policy(mut self, policy: ViolationPolicy) -> Self {
        self.violation_policy = policy;
        self
    }
}
