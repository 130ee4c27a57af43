//! Fixture scripts and files

use std::path::{Path, PathBuf};

use cmifloppy::config::{LaunchMode, SettleMode};
use cmifloppy::Config;
use tempfile::TempDir;

/// Console emulator: answers `dir` with a listing table and keeps the sample
/// list in memory; `export` writes the sample into its own working directory
const EMULATOR_SCRIPT: &str = r#"
echo "CMI OS9 ready"
samples="PIANO.VC KICK.VC"
while IFS= read -r line; do
  set -- $line
  case "$1" in
    dir)
      echo "fnr  name        blocks"
      echo "----------------------"
      n=1
      for s in $samples; do
        printf '%3d  %-8s.VC\n' "$n" "${s%.VC}"
        n=$((n+1))
      done
      echo "----------------------" ;;
    wav2vc2) samples="$samples $3" ;;
    vc2wav) echo "converted $2" ;;
    export)
      case " $samples " in
        *" $2 "*) : > "$2" ;;
        *) echo "file not found $2" >&2 ;;
      esac ;;
    pwd) pwd ;;
    rm) samples=$(echo " $samples " | sed "s/ $2 / /") ;;
    move) samples=$(echo " $samples " | sed "s/ $2 / $3 /") ;;
    *) echo "unknown command $1" >&2 ;;
  esac
done
"#;

/// Raw to IMD converter: copies the source to the target
const RAW_TO_IMD_SCRIPT: &str = r#"
[ "$3" = "/2" ] || { echo "bad geometry" >&2; exit 2; }
cp "$1" "$2"
"#;

/// Format tool: copies the IMD to the target, or fails when told to
const FORMAT_TOOL_SCRIPT: &str = r#"
[ -n "$FAIL" ] && { echo "unsupported image" >&2; exit 1; }
[ "$1" = "flopconvert" ] || exit 2
cp "$4" "$5"
"#;

/// A scratch directory holding the fake binaries, a workdir and images
pub struct FakeToolkit {
    pub dir: TempDir,
}

impl FakeToolkit {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("work")).unwrap();
        std::fs::create_dir(dir.path().join("scratch")).unwrap();

        std::fs::write(dir.path().join("cmios9.sh"), EMULATOR_SCRIPT).unwrap();
        std::fs::write(dir.path().join("bin2imd.sh"), RAW_TO_IMD_SCRIPT).unwrap();
        std::fs::write(dir.path().join("floptool.sh"), FORMAT_TOOL_SCRIPT).unwrap();
        std::fs::write(
            dir.path().join("floptool-broken.sh"),
            format!("FAIL=1\n{}", FORMAT_TOOL_SCRIPT),
        )
        .unwrap();

        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn workdir(&self) -> PathBuf {
        self.path("work")
    }

    pub fn scratch(&self) -> PathBuf {
        self.path("scratch")
    }

    /// Write a fake disk image and return its path
    pub fn image(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, vec![0xE5u8; 1024]).unwrap();
        path
    }

    /// Configuration running every script through `sh`
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.emulator.executable = self.path("cmios9.sh");
        config.emulator.launch_mode = LaunchMode::Compatibility;
        config.emulator.compatibility_runner = "sh".to_string();
        config.emulator.guest_drive_prefix = "Z:".to_string();
        config.emulator.working_directory = Some(self.workdir());
        config.timing.warm_up_ms = 200;
        config.timing.settle_delay_ms = 200;
        config.tools.bin2imd = self.path("bin2imd.sh");
        config.tools.floptool = self.path("floptool.sh");
        config.tools.intermediate_dir = Some(self.scratch());
        config.image.template = self.image("empty.img");
        config
    }

    /// Same as [`config`](Self::config) with quiescence-based settling
    pub fn quiescence_config(&self) -> Config {
        let mut config = self.config();
        config.timing.settle_mode = SettleMode::Quiescence;
        config.timing.quiet_window_ms = 100;
        config.timing.settle_timeout_ms = 2000;
        config
    }

    /// Whether the scratch directory still holds any file
    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch()).unwrap().next().is_none()
    }
}

/// Write a mono 8-bit PCM WAV with a few samples
pub fn mono_8bit_wav(path: &Path) {
    let data = [128u8, 140, 120, 128];
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&16000u32.to_le_bytes());
    out.extend_from_slice(&16000u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&data);
    std::fs::write(path, out).unwrap();
}
