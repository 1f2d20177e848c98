//! Proxy configuration (conform.toml)
//!
//! ```toml
//! [proxy]
//! package = "com.redi.j2"
//! lookup = ["declared", "inherited-public"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One way of finding the member a behavioral call targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupStrategy {
    /// Members declared on the instance's runtime type, any visibility,
    /// called with accessibility checks bypassed
    Declared,
    /// Public members inherited from supertypes, nearest first
    InheritedPublic,
}

fn default_lookup() -> Vec<LookupStrategy> {
    vec![LookupStrategy::Declared, LookupStrategy::InheritedPublic]
}

/// Settings shared by every proxy created from one resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Package used to qualify bare type names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Invocation lookup order; the first strategy that finds a member wins
    #[serde(default = "default_lookup")]
    pub lookup: Vec<LookupStrategy>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            package: None,
            lookup: default_lookup(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    proxy: Option<ProxyConfig>,
}

impl ProxyConfig {
    /// Parse from TOML text
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let config = file.proxy.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Write as a `[proxy]` section to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let file = ConfigFile {
            proxy: Some(self.clone()),
        };
        let content = toml::to_string_pretty(&file)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the lookup list and package name
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup.is_empty() {
            return Err(ConfigError::Invalid(
                "lookup must name at least one strategy".to_string(),
            ));
        }
        for (i, strategy) in self.lookup.iter().enumerate() {
            if self.lookup[..i].contains(strategy) {
                return Err(ConfigError::Invalid(format!(
                    "lookup strategy {:?} listed twice",
                    strategy
                )));
            }
        }
        if let Some(package) = &self.package {
            if package.is_empty() || package.starts_with('.') || package.ends_with('.') {
                return Err(ConfigError::Invalid(format!(
                    "invalid package name: '{}'",
                    package
                )));
            }
        }
        Ok(())
    }

    /// Qualify a bare name with the configured package
    pub fn qualify(&self, name: &str) -> String {
        match &self.package {
            Some(package) if !name.contains('.') => format!("{}.{}", package, name),
            _ => name.to_string(),
        }
    }
}
