//! `[render]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [render]
//! output = "icons"     # Directory for rendered files (relative to config)
//! parallel = true      # Render batches on all cores
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Batch rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output directory. `~` is expanded, relative paths resolve against the
    /// directory holding the config file.
    pub output: PathBuf,

    /// Render multiple hashes in parallel.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("."),
            parallel: true,
        }
    }
}
