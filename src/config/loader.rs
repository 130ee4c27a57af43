//! Configuration File Loading
//!
//! Handles loading and saving configuration files from various locations
//! with support for multiple formats and fallback to defaults.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "CMIFLOPPY_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// Directories searched for `config.toml` / `config.json`
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats, in preference order
    supported_formats: Vec<ConfigFormat>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    /// Detect the format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if none exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<Config> {
        Self::new().load_with_options(LoadOptions::default())
    }

    /// Load from an explicit file, or search the default locations when `None`
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        let mut loader = Self::new();
        if let Some(path) = path {
            let config = loader.load_file(path)?;
            loader.current_path = Some(path.to_path_buf());
            validate_config(&config)?;
            info!("Configuration loaded from {}", path.display());
            return Ok(config);
        }
        loader.load_with_options(LoadOptions::default())
    }

    /// Load configuration with custom options
    pub fn load_with_options(&mut self, options: LoadOptions) -> Result<Config> {
        if let Ok(explicit) = env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(explicit);
            let config = self.load_file(&path)?;
            if options.validate {
                validate_config(&config)?;
            }
            info!("Configuration loaded from ${} ({})", CONFIG_ENV_VAR, path.display());
            self.current_path = Some(path);
            return Ok(config);
        }

        if let Some((path, config)) = self.find_and_load_config() {
            if options.validate {
                validate_config(&config)?;
            }
            info!("Configuration loaded from {}", path.display());
            self.current_path = Some(path);
            return Ok(config);
        }

        if options.create_default {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Load a single file, choosing the parser from its extension
    pub fn load_file(&self, path: &Path) -> Result<Config> {
        self.load_config_file(path, ConfigFormat::from_path(path))
    }

    /// Save configuration to the current path or default location
    pub fn save(&self, config: &Config) -> Result<PathBuf> {
        let path = self
            .current_path
            .clone()
            .unwrap_or_else(Self::get_default_config_path);
        self.save_to_path(config, &path)?;
        Ok(path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::ConfigSaveFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content).map_err(|e| Error::ConfigSaveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Option<(PathBuf, Config)> {
        for dir in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = dir.join("config").with_extension(format.extension());
                if !config_path.exists() {
                    continue;
                }

                match self.load_config_file(&config_path, *format) {
                    Ok(config) => return Some((config_path, config)),
                    Err(e) => {
                        warn!("Skipping config at {}: {}", config_path.display(), e);
                    }
                }
            }
        }

        None
    }

    /// Load a specific configuration file
    fn load_config_file(&self, path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get default search directories for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        use crate::platform::Platform;

        let mut paths = Vec::new();

        if let Ok(config_dir) = Platform::paths().config_dir() {
            paths.push(config_dir.join("cmifloppy"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cmifloppy"));
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(".cmifloppy"));
        }

        paths
    }

    /// Get the default configuration path
    fn get_default_config_path() -> PathBuf {
        use crate::platform::Platform;

        Platform::paths()
            .config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("cmifloppy")
            .join("config.toml")
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Clear all search paths and add a single path
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.search_paths = vec![path];
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.emulator.executable.as_os_str().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "emulator.executable".to_string(),
            reason: "Emulator path cannot be empty".to_string(),
        });
    }

    if config.emulator.compatibility_runner.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "emulator.compatibility_runner".to_string(),
            reason: "Compatibility runner cannot be empty".to_string(),
        });
    }

    if config.tools.bin2imd.as_os_str().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "tools.bin2imd".to_string(),
            reason: "Converter path cannot be empty".to_string(),
        });
    }

    if config.tools.floptool.as_os_str().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "tools.floptool".to_string(),
            reason: "Converter path cannot be empty".to_string(),
        });
    }

    if config.timing.warm_up_ms == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "timing.warm_up_ms".to_string(),
            reason: "Warm-up must be greater than 0".to_string(),
        });
    }

    if config.timing.settle_delay_ms == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "timing.settle_delay_ms".to_string(),
            reason: "Settle delay must be greater than 0".to_string(),
        });
    }

    if config.timing.quiet_window_ms == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "timing.quiet_window_ms".to_string(),
            reason: "Quiet window must be greater than 0".to_string(),
        });
    }

    if config.timing.quiet_window_ms >= config.timing.settle_timeout_ms {
        return Err(Error::ConfigValidationFailed {
            field: "timing.settle_timeout_ms".to_string(),
            reason: "Settle timeout must exceed the quiet window".to_string(),
        });
    }

    Ok(())
}
