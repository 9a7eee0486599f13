//! Configuration file loading and parsing.
//!
//! md2xwiki reads optional settings from `md2xwiki.toml` in the current
//! directory, or from the file passed with `--config`. If no config file
//! exists, the system falls back to defaults. Command-line flags always take
//! priority over the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::converter::ConversionOptions;
use crate::document::MarkdownAdapter;
use crate::errors::ConvertError;

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "md2xwiki.toml";

/// Default input directory
pub const DEFAULT_INPUT_DIR: &str = "docs";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Root configuration structure loaded from `md2xwiki.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Md2XwikiConfig {
    /// Conversion settings (optional).
    pub conversion: Option<ConversionConfig>,
}

/// `[conversion]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversionConfig {
    /// XWiki space that converted pages live under.
    pub space: Option<String>,
    /// Directory containing the Markdown sources (default: "docs").
    pub input: Option<PathBuf>,
    /// Directory converted files are written to (default: "output").
    pub output: Option<PathBuf>,
    /// File extensions treated as documents (default: ["md", "markdown"]).
    pub extensions: Option<Vec<String>>,
}

impl Md2XwikiConfig {
    /// Load configuration from an explicit path.
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration from `path` if it exists.
    ///
    /// Returns an empty config (all fields None) if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConvertError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load from `--config` when given, else from `md2xwiki.toml` in `current_dir`.
    pub fn discover(explicit: Option<&Path>, current_dir: &Path) -> Result<Self, ConvertError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_or_default(&current_dir.join(DEFAULT_CONFIG_FILE)),
        }
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub space: Option<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Md2XwikiConfig {
    /// Build the effective conversion options.
    ///
    /// Priority: command line > config file > defaults. A space must come
    /// from one of the first two.
    pub fn resolve(self, overrides: CliOverrides) -> Result<ConversionOptions, ConvertError> {
        let conversion = self.conversion.unwrap_or_default();

        let space = overrides
            .space
            .or(conversion.space)
            .ok_or(ConvertError::MissingSpace)?;

        // lowercase, without dots, never empty
        let configured = conversion.extensions.as_deref().unwrap_or_default();
        let extensions = MarkdownAdapter::with_extensions(configured)
            .extensions()
            .to_vec();

        Ok(ConversionOptions {
            input_dir: overrides
                .input
                .or(conversion.input)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR)),
            output_dir: overrides
                .output
                .or(conversion.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            space,
            extensions,
        })
    }
}
