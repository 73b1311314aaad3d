use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::tree::histogram::KnowledgeMode;

const DEFAULT_PLANNER_CONFIG_YAML: &str = include_str!("../../config/planner.default.yaml");

/// Configuration of the particle-belief planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Particles drawn when a root is built from a probability belief.
    /// Beliefs grown inside the tree are not bounded by this.
    pub particles: u32,
    /// Simulations run for every planning call.
    pub iterations: u32,
    /// UCB exploration constant.
    pub exploration: f64,
    /// Visits after which a belief node reports the max over its actions instead of the mean.
    pub max_switch_visits: u32,
    pub knowledge: KnowledgeMode,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            particles: 1000,
            iterations: 1000,
            exploration: 5.0,
            max_switch_visits: 500,
            knowledge: KnowledgeMode::MaxFrequency,
        }
    }
}

impl PlannerConfig {
    /// Build a config from the four planner parameters, using the default knowledge mode.
    pub fn new(particles: u32, iterations: u32, exploration: f64, max_switch_visits: u32) -> Self {
        PlannerConfig {
            particles,
            iterations,
            exploration,
            max_switch_visits,
            knowledge: KnowledgeMode::default(),
        }
    }

    /// Return the same config with another knowledge mode.
    pub fn with_knowledge(mut self, knowledge: KnowledgeMode) -> Self {
        self.knowledge = knowledge;
        self
    }

    /// Parse a planner config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a planner config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_PLANNER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_particles(self.particles)?;
        check_iterations(self.iterations)?;
        check_exploration(self.exploration)?;
        if self.max_switch_visits == 0 {
            return Err(ConfigError::Invalid(
                "max_switch_visits must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn check_particles(particles: u32) -> Result<(), ConfigError> {
    if particles == 0 {
        return Err(ConfigError::Invalid(
            "particles must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_iterations(iterations: u32) -> Result<(), ConfigError> {
    if iterations == 0 {
        return Err(ConfigError::Invalid(
            "iterations must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_exploration(exploration: f64) -> Result<(), ConfigError> {
    if !exploration.is_finite() || exploration < 0.0 {
        return Err(ConfigError::Invalid(
            "exploration must be finite and >= 0".to_string(),
        ));
    }
    Ok(())
}

/// Error type for loading and validating `PlannerConfig`, and for models a planner cannot run on.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            ConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            ConfigError::Invalid(err) => write!(f, "invalid planner config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}
