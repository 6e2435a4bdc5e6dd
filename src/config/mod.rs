//! Configuration management for `hashicon.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── identicon  # [identicon]
//! │   ├── render     # [render]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! The config file is optional. Without one every section takes its
//! defaults, and CLI flags still apply on top.

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, resolve_path};

pub use section::{IdenticonConfig, OutputFormat, RenderConfig, ServeConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands, StyleArgs},
    debug, log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config filename
pub const CONFIG_FILE: &str = "hashicon.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hashicon.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file, which may not exist (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory holding the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Generator settings
    #[serde(default)]
    pub identicon: IdenticonConfig,

    /// Batch rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl AppConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file unless `--config` names
    /// one explicitly. `init` never reads an existing file.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let name = cli.config.as_deref().unwrap_or(Path::new(CONFIG_FILE));

        let mut config = if cli.is_init() {
            Self {
                config_path: cwd.join(name),
                ..Self::default()
            }
        } else if let Some(path) = find_config_file(&cwd, name) {
            let mut config = Self::from_path(&path)?;
            config.config_path = path;
            config
        } else if cli.config.is_some() {
            bail!(ConfigError::Io(
                cwd.join(name),
                std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            ));
        } else {
            debug!("config"; "no {} found, using defaults", name.display());
            Self {
                config_path: cwd.join(name),
                ..Self::default()
            }
        };

        config.root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());
        config.cli = Some(cli);
        config.render.output = resolve_path(&config.render.output, &config.root);
        config.apply_command_options(cli, &cwd);

        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        match &cli.command {
            Commands::Init { .. } => {}
            Commands::Render { args } => {
                self.apply_style_args(&args.style);
                // CLI paths are relative to where the command runs
                if let Some(output) = &args.output {
                    self.render.output = resolve_path(output, cwd);
                }
            }
            Commands::Inspect { args } => {
                self.apply_style_args(&args.style);
            }
            Commands::Serve {
                style,
                interface,
                port,
                cache,
            } => {
                self.apply_style_args(style);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.cache, cache.as_ref());
            }
        }
    }

    /// Apply generator overrides from CLI.
    fn apply_style_args(&mut self, args: &StyleArgs) {
        let identicon = &mut self.identicon;
        Self::update_option(&mut identicon.size, args.size.as_ref());
        Self::update_option(&mut identicon.pixels, args.pixels.as_ref());
        Self::update_option(&mut identicon.margin, args.margin.as_ref());
        Self::update_option(&mut identicon.saturation, args.saturation.as_ref());
        Self::update_option(&mut identicon.lightness, args.lightness.as_ref());
        Self::update_option(&mut identicon.inverted, args.inverted.as_ref());
        Self::update_option(&mut identicon.background, args.background.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.identicon.validate(&mut diag);
        self.serve.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = AppConfig::from_str("[identicon\nsize = 64");
        assert!(result.is_err());
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert!(config.cli.is_none());
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.get_root(), Path::new(""));
        assert_eq!(config.identicon.size, 64);
        assert_eq!(config.serve.port, 7465);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[identicon]\nsize = 32\ncolour = \"red\"\n[unknown_section]\nfield = 1";
        let (config, ignored) = AppConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.identicon.size, 32);
        assert!(ignored.iter().any(|f| f.contains("colour")));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[identicon]\nsize = 32\n[render]\noutput = \"out\"\n[serve]\nport = 1";
        let (_, ignored) = AppConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validate_collects_all_sections() {
        let mut config = test_parse_config("[identicon]\nsize = 0\n[serve]\ncache_capacity = 0");
        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err:?}");
        };
        assert_eq!(diag.len(), 2);

        config.identicon.size = 64;
        config.serve.cache = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_update_option() {
        let mut value = 5u32;
        AppConfig::update_option(&mut value, None);
        assert_eq!(value, 5);
        AppConfig::update_option(&mut value, Some(&9));
        assert_eq!(value, 9);
    }
}
