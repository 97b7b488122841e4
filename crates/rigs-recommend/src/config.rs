//! `rigs.toml` engine configuration.
//!
//! ```toml
//! [engine]
//! combination-limit = 1000
//! psu-headroom = 0.2
//! expansion = "top-k"
//!
//! [[template]]
//! name = "office"
//! target-price = 25000
//! [[template.category]]
//! category = "CPU"
//! budget-share = 0.3
//! min-score = 30
//! ```

use std::fs;
use std::path::Path;

use rigs_spec::compat::{CompatibilityRules, DEFAULT_PSU_HEADROOM};
use rigs_spec::stock::DEFAULT_LOW_STOCK_THRESHOLD;
use serde::{Deserialize, Serialize};

use crate::feedback::DEFAULT_HISTORY_CAPACITY;
use crate::generate::{DEFAULT_COMBINATION_LIMIT, ExpansionStrategy};
use crate::template::{BuildTemplate, builtin_templates};
use crate::{ConfigError, RecommendError};

/// File looked up in the working directory when no config path is given.
pub const CONFIG_FILE_NAME: &str = "rigs.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    pub combination_limit: usize,
    pub psu_headroom: f64,
    pub history_capacity: usize,
    pub low_stock_threshold: u32,
    pub expansion: ExpansionStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            combination_limit: DEFAULT_COMBINATION_LIMIT,
            psu_headroom: DEFAULT_PSU_HEADROOM,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            expansion: ExpansionStrategy::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.combination_limit == 0 {
            return Err(ConfigError::Invalid(
                "combination-limit must be at least 1".to_string(),
            ));
        }
        if !self.psu_headroom.is_finite() || self.psu_headroom < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "psu-headroom must be a non-negative number, got {}",
                self.psu_headroom
            )));
        }
        Ok(())
    }

    pub fn rules(&self) -> CompatibilityRules {
        CompatibilityRules::with_psu_headroom(self.psu_headroom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigsToml {
    #[serde(default)]
    pub engine: EngineConfig,

    /// User templates; same-named ones replace built-ins
    #[serde(default, rename = "template", skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<BuildTemplate>,
}

impl RigsToml {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: RigsToml = toml::from_str(content)?;
        config.engine.validate()?;
        for template in &config.templates {
            template.validate()?;
        }
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load `explicit` if given, else `rigs.toml` in `dir` if present, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Using config {}", candidate.display());
            Self::from_path(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Built-in templates with user templates merged over them by name.
    pub fn templates(&self) -> Vec<BuildTemplate> {
        let mut templates = builtin_templates();
        for user in &self.templates {
            match templates.iter_mut().find(|t| t.name == user.name) {
                Some(existing) => *existing = user.clone(),
                None => templates.push(user.clone()),
            }
        }
        templates
    }

    pub fn template(&self, name: &str) -> Result<BuildTemplate, RecommendError> {
        self.templates()
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RecommendError::UnknownTemplate(name.to_string()))
    }
}
