//! Front-end configuration, read from `distill.toml`

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILE: &str = "distill.toml";

/// How method qualified names encode their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureStyle {
    /// `pkg.A.put(Map,String[],int)`: overloads get distinct names.
    #[default]
    ErasedParameters,
    /// `pkg.A.put()`: overloads share one name and one history.
    NameOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelperConfig {
    pub signature_style: SignatureStyle,
    /// Emit comment nodes inside method body trees.
    pub include_comments: bool,
    /// Extend declaration ranges over a directly preceding Javadoc comment.
    pub javadoc_in_range: bool,
    /// Parser pool size; defaults to the available parallelism.
    pub parser_workers: Option<usize>,
}

impl Default for HelperConfig {
    fn default() -> Self {
        HelperConfig {
            signature_style: SignatureStyle::default(),
            include_comments: true,
            javadoc_in_range: true,
            parser_workers: None,
        }
    }
}

impl HelperConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else `distill.toml` under `dir` if present, else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = dir.join(CONFIG_FILE);
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
