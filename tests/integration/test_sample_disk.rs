//! Integration tests for sample operations on an open disk
//!
//! A shell script plays the sampler OS console: it answers `dir` with a
//! listing table and tracks imports, renames and deletions.

#![cfg(unix)]

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::sync::Arc;

use cmifloppy::{DirectoryEntry, DiskLabel, Error, ExportKind, SampleDisk, Workbench};
use test_utils::{mono_8bit_wav, FakeToolkit};

fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

async fn open_disk(kit: &FakeToolkit) -> SampleDisk {
    let disk = SampleDisk::open(kit.image("voices.img"), &kit.config()).unwrap();
    disk.start().await.unwrap();
    disk
}

#[tokio::test]
async fn test_list_directory() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;

    let entries = disk.list_directory().await.unwrap();
    assert_eq!(names(&entries), vec!["PIANO.VC", "KICK.VC"]);
    assert!(entries.iter().all(DirectoryEntry::is_voice_card));

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_list_directory_with_quiescence() {
    let kit = FakeToolkit::new();
    let disk = SampleDisk::open(kit.image("voices.img"), &kit.quiescence_config()).unwrap();
    disk.start().await.unwrap();

    let entries = disk.list_directory().await.unwrap();
    assert_eq!(names(&entries), vec!["PIANO.VC", "KICK.VC"]);
    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_import_rename_delete() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;
    let wav = kit.path("snare.wav");
    mono_8bit_wav(&wav);

    disk.import_sample(&wav, "SNARE").await.unwrap();
    assert_eq!(
        names(&disk.list_directory().await.unwrap()),
        vec!["PIANO.VC", "KICK.VC", "SNARE.VC"]
    );

    disk.rename_sample("PIANO.VC", "GRAND").await.unwrap();
    disk.delete_sample("KICK.VC").await.unwrap();
    assert_eq!(
        names(&disk.list_directory().await.unwrap()),
        vec!["GRAND.VC", "SNARE.VC"]
    );

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_import_rejects_invalid_wav() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;
    let not_wav = kit.path("notes.txt");
    std::fs::write(&not_wav, b"definitely not RIFF data, just some words").unwrap();

    let err = disk.import_sample(&not_wav, "NOTES").await.unwrap_err();
    assert!(matches!(err, Error::InvalidWav { .. }));

    let err = disk.import_sample(&not_wav, "TWO WORDS").await.unwrap_err();
    assert!(matches!(err, Error::InvalidSampleName { .. }));

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_export_voice_card_moves_file() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;
    let dest = kit.path("piano.vc");

    let kind = disk.export_sample("PIANO.VC", &dest).await.unwrap();
    assert_eq!(kind, ExportKind::VoiceCard);
    assert!(dest.exists());
    assert!(!kit.workdir().join("PIANO.VC").exists());
    assert!(!std::env::current_dir().unwrap().join("PIANO.VC").exists());

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_emulator_runs_in_configured_working_directory() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;

    let output = disk.send_raw("pwd").await.unwrap();
    assert_eq!(
        std::fs::canonicalize(output.trim_end()).unwrap(),
        std::fs::canonicalize(kit.workdir()).unwrap()
    );

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_export_voice_card_not_written() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;
    let dest = kit.path("ghost.vc");

    let err = disk.export_sample("GHOST.VC", &dest).await.unwrap_err();
    match err {
        Error::ExportNotWritten { path } => assert_eq!(path, kit.workdir().join("GHOST.VC")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dest.exists());

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_export_wav_and_non_voice_card() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;

    let kind = disk
        .export_sample("KICK.VC", &kit.path("kick.wav"))
        .await
        .unwrap();
    assert_eq!(kind, ExportKind::Wav);

    let err = disk
        .export_sample("SYSTEM.SY", &kit.path("system.wav"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSampleName { .. }));

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_stderr_is_tagged_in_raw_output() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;

    let output = disk.send_raw("format").await.unwrap();
    assert_eq!(output.trim_end(), "ERROR: unknown command format");

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_exchanges_do_not_interleave() {
    let kit = FakeToolkit::new();
    let disk = Arc::new(open_disk(&kit).await);

    let listing = {
        let disk = Arc::clone(&disk);
        tokio::spawn(async move { disk.list_directory().await })
    };
    let raw = {
        let disk = Arc::clone(&disk);
        tokio::spawn(async move { disk.send_raw("bogus").await })
    };

    let entries = listing.await.unwrap().unwrap();
    let output = raw.await.unwrap().unwrap();
    assert_eq!(names(&entries), vec!["PIANO.VC", "KICK.VC"]);
    assert_eq!(output.trim_end(), "ERROR: unknown command bogus");

    disk.stop().await.unwrap();
}

#[tokio::test]
async fn test_commands_after_stop_fail() {
    let kit = FakeToolkit::new();
    let disk = open_disk(&kit).await;
    disk.stop().await.unwrap();

    assert!(!disk.is_running().await);
    assert!(matches!(
        disk.list_directory().await,
        Err(Error::NotRunning)
    ));
}

#[tokio::test]
async fn test_workbench_create_and_reopen() {
    let kit = FakeToolkit::new();
    let mut workbench = Workbench::new(kit.config());
    let dest = kit.path("new.img");

    let entries = workbench
        .create(&dest, &DiskLabel::new("DRUMS", "STUDIO"), false)
        .await
        .unwrap();
    assert_eq!(names(&entries), vec!["PIANO.VC", "KICK.VC"]);
    assert_eq!(&std::fs::read(&dest).unwrap()[0..5], b"DRUMS");

    let other = kit.image("other.img");
    workbench.open(&other).await.unwrap();
    assert_eq!(workbench.active().unwrap().image_path(), other.as_path());

    workbench.close().await.unwrap();
    assert!(workbench.disk().is_none());
}
