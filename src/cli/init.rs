//! Config file generation.
//!
//! Writes `hashicon.toml` with every field at its default, commented.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::config::{AppConfig, IdenticonConfig, RenderConfig, ServeConfig};
use crate::log;

/// Write the default config to `config.config_path`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_config(config: &AppConfig, force: bool) -> Result<()> {
    let path = &config.config_path;
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }

    write_template(path)?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}

fn write_template(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, generate_config_template())
        .with_context(|| format!("Failed to write config file '{}'", path.display()))
}

/// Generate hashicon.toml content with comments
pub fn generate_config_template() -> String {
    let identicon = IdenticonConfig::default();
    let render = RenderConfig::default();
    let serve = ServeConfig::default();

    let mut out = String::new();

    out.push_str(&format!(
        "# hashicon configuration file (v{})\n\n",
        env!("CARGO_PKG_VERSION")
    ));

    out.push_str("[identicon]\n");
    out.push_str(&format!("# Canvas side length in px\nsize = {}\n", identicon.size));
    out.push_str(&format!(
        "# Margin around the grid as a fraction of size, in [0, 0.5)\nmargin = {:?}\n",
        identicon.margin
    ));
    out.push_str(&format!("# Grid cells per side\npixels = {}\n", identicon.pixels));
    out.push_str(&format!(
        "# Saturation and lightness of the hash color, in [0, 1]\nsaturation = {:?}\nlightness = {:?}\n",
        identicon.saturation, identicon.lightness
    ));
    out.push_str(&format!(
        "# Use the hash color as the page fill and `background` for the cells\ninverted = {}\n",
        identicon.inverted
    ));
    out.push_str(&format!(
        "# Fixed color: #rrggbb, #rrggbbaa, rgb(r, g, b) or rgba(r, g, b, a)\nbackground = \"{}\"\n",
        identicon.background
    ));
    out.push_str(&format!(
        "format = \"{}\"\n\n",
        identicon.format.extension()
    ));

    out.push_str("[render]\n");
    out.push_str(&format!(
        "# Output directory, relative to this file\noutput = \"{}\"\n",
        render.output.display()
    ));
    out.push_str(&format!(
        "# Render batches on all cores\nparallel = {}\n\n",
        render.parallel
    ));

    out.push_str("[serve]\n");
    out.push_str(&format!("interface = \"{}\"\nport = {}\n", serve.interface, serve.port));
    out.push_str(&format!(
        "# Memoize rendered documents, flushed after `cache_capacity` entries\ncache = {}\ncache_capacity = {}\n",
        serve.cache, serve.cache_capacity
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed = test_parse_config(&generate_config_template());

        assert_eq!(parsed.identicon, IdenticonConfig::default());
        assert_eq!(parsed.render.output, RenderConfig::default().output);
        assert_eq!(parsed.render.parallel, RenderConfig::default().parallel);
        assert_eq!(parsed.serve.port, ServeConfig::default().port);
        assert_eq!(parsed.serve.cache_capacity, ServeConfig::default().cache_capacity);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_write_config_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            config_path: dir.path().join("hashicon.toml"),
            ..AppConfig::default()
        };

        write_config(&config, false).unwrap();
        assert!(config.config_path.is_file());

        fs::write(&config.config_path, "# edited").unwrap();
        assert!(write_config(&config, false).is_err());
        assert_eq!(fs::read_to_string(&config.config_path).unwrap(), "# edited");

        write_config(&config, true).unwrap();
        assert!(
            fs::read_to_string(&config.config_path)
                .unwrap()
                .contains("[identicon]")
        );
    }

    #[test]
    fn test_write_config_creates_parent() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            config_path: dir.path().join("nested/hashicon.toml"),
            ..AppConfig::default()
        };
        write_config(&config, false).unwrap();
        assert!(config.config_path.is_file());
    }
}
