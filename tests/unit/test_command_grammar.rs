//! Unit tests for the console command grammar

use std::path::Path;
use std::time::Duration;

use cmifloppy::commands::{validate_sample_name, CommandBuilder};
use cmifloppy::config::LaunchMode;
use cmifloppy::platform::PathTranslator;
use cmifloppy::{Config, SettlePolicy};

fn builder(mode: LaunchMode) -> CommandBuilder {
    let mut config = Config::default();
    config.emulator.launch_mode = mode;
    CommandBuilder::from_config(&config)
}

#[cfg(test)]
mod command_grammar_tests {
    use super::*;

    #[test]
    fn test_compatibility_mode_translates_paths() {
        let builder = builder(LaunchMode::Compatibility);
        assert_eq!(
            builder.translator(),
            &PathTranslator::DrivePrefix {
                prefix: "Z:".to_string()
            }
        );
        assert_eq!(
            builder
                .import(Path::new("/home/cmi/samples/bass.wav"), "BASS")
                .unwrap()
                .line(),
            "wav2vc2 Z:\\home\\cmi\\samples\\bass.wav BASS.VC"
        );
        assert_eq!(
            builder
                .export_wav("BASS.VC", Path::new("/tmp/bass.wav"))
                .unwrap()
                .line(),
            "vc2wav BASS.VC Z:\\tmp\\bass.wav"
        );
    }

    #[test]
    fn test_direct_mode_keeps_paths() {
        let builder = builder(LaunchMode::Direct);
        assert_eq!(builder.translator(), &PathTranslator::Identity);
        assert_eq!(
            builder
                .import(Path::new("C:\\samples\\bass.wav"), "BASS")
                .unwrap()
                .line(),
            "wav2vc2 C:\\samples\\bass.wav BASS.VC"
        );
    }

    #[test]
    fn test_default_settle_is_fixed_half_second() {
        let command = builder(LaunchMode::Direct).dir();
        assert_eq!(command.line(), "dir");
        assert_eq!(command.settle(), SettlePolicy::Fixed(Duration::from_millis(500)));
    }

    #[test]
    fn test_literal_commands() {
        let builder = builder(LaunchMode::Direct);
        assert_eq!(builder.export_vc("BASS.VC").unwrap().to_string(), "export BASS.VC");
        assert_eq!(builder.delete("BASS.VC").unwrap().to_string(), "rm BASS.VC");
        assert_eq!(
            builder.rename("BASS.VC", "SUB").unwrap().to_string(),
            "move BASS.VC SUB.VC"
        );
    }

    #[test]
    fn test_sample_name_validation() {
        assert!(validate_sample_name("PIANO.VC").is_ok());
        assert!(validate_sample_name("").is_err());
        assert!(validate_sample_name("TWO WORDS").is_err());
        assert!(validate_sample_name("LINE\r\nrm X").is_err());
    }
}
