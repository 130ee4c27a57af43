//! Unit tests for configuration loading

use std::path::Path;
use std::time::Duration;

use cmifloppy::config::{LaunchMode, SettleMode};
use cmifloppy::platform::LaunchStrategy;
use cmifloppy::{Config, ConfigLoader, Error, SettlePolicy};
use tempfile::TempDir;

#[cfg(test)]
mod config_loading_tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[emulator]
executable = "/opt/cmi/cmios9.exe"
launch_mode = "compatibility"
compatibility_runner = "wine64"

[timing]
settle_mode = "quiescence"
quiet_window_ms = 200
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from(Some(&path)).unwrap();
        assert_eq!(config.emulator.executable, Path::new("/opt/cmi/cmios9.exe"));
        assert_eq!(config.emulator.launch_mode, LaunchMode::Compatibility);
        assert_eq!(config.emulator.guest_drive_prefix, "Z:");
        assert_eq!(config.timing.settle_mode, SettleMode::Quiescence);
        assert_eq!(config.timing.warm_up_ms, 1000);
        assert_eq!(config.tools.bin2imd, Path::new("./Files/bin2imd.exe"));

        assert_eq!(
            config.launch_strategy(),
            LaunchStrategy::Compatibility {
                runner: "wine64".to_string()
            }
        );
        assert_eq!(
            config.timing.command_settle(),
            SettlePolicy::Quiescence {
                window: Duration::from_millis(200),
                timeout: Duration::from_millis(5000),
            }
        );
    }

    #[test]
    fn test_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "emulator": { "launch_mode": "direct" }, "timing": { "settle_delay_ms": 750 } }"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from(Some(&path)).unwrap();
        assert_eq!(config.launch_strategy(), LaunchStrategy::Direct);
        assert_eq!(
            config.timing.command_settle(),
            SettlePolicy::Fixed(Duration::from_millis(750))
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timing]\nwarm_up_ms = 0\n").unwrap();

        let err = ConfigLoader::load_from(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            Error::ConfigValidationFailed { ref field, .. } if field == "timing.warm_up_ms"
        ));
    }

    #[test]
    fn test_unparsable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timing\n").unwrap();

        assert!(matches!(
            ConfigLoader::load_from(Some(&path)),
            Err(Error::ConfigParseFailed { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ConfigLoader::load_from(Some(&dir.path().join("nope.toml"))),
            Err(Error::ConfigLoadFailed { .. })
        ));
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.emulator.launch_mode = LaunchMode::Direct;
        config.tools.intermediate_dir = Some(dir.path().to_path_buf());

        ConfigLoader::new().save_to_path(&config, &path).unwrap();
        assert_eq!(ConfigLoader::load_from(Some(&path)).unwrap(), config);
    }
}
