//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use std::path::PathBuf;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./atrium.toml` or `./.atrium.toml`
    /// 3. XDG config: `$XDG_CONFIG_HOME/atrium/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Global config file path under the platform config directory
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("atrium").join("config.toml"))
    }

    /// Project-level config file path, if one exists
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["atrium.toml", ".atrium.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_files_yields_defaults() {
        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(config.coordinator.interval_secs, 300);
    }

    #[test]
    fn test_explicit_path_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[execution]\nmax_parallel_actions = 2\n").unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.execution.max_parallel_actions, 2);
        assert_eq!(config.coordinator.interval_secs, 300);
    }
}
