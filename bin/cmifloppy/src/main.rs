//! cmifloppy - edit CMI sampler floppy images from the command line
//!
//! Each subcommand opens the image in a fresh emulator session, performs one
//! operation and shuts the emulator down again. `shell` keeps the session
//! open for an interactive prompt.

mod shell;

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};

use cmifloppy::{DirectoryEntry, DiskLabel, TargetFormat, Workbench};

#[derive(Parser)]
#[command(name = "cmifloppy", version)]
#[command(about = cmifloppy::DESCRIPTION)]
struct Cli {
    /// Path to a configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the samples on a disk
    Ls {
        /// Disk image
        image: PathBuf,
    },
    /// Import a mono 8-bit WAV file as a voice card sample
    Import {
        /// Disk image
        image: PathBuf,
        /// WAV file to import
        wav: PathBuf,
        /// Sample name on the disk, without the .VC suffix
        name: String,
    },
    /// Export a sample as WAV, or as a native voice card when DEST ends in .vc
    Export {
        /// Disk image
        image: PathBuf,
        /// Sample name as listed
        name: String,
        /// Destination file
        dest: PathBuf,
    },
    /// Delete a sample
    Rm {
        /// Disk image
        image: PathBuf,
        /// Sample name as listed
        name: String,
    },
    /// Rename a sample
    Mv {
        /// Disk image
        image: PathBuf,
        /// Current sample name as listed
        old: String,
        /// New name, without the .VC suffix
        new: String,
    },
    /// Create a blank disk image from the template
    New {
        /// Destination image
        dest: PathBuf,
        /// Disk name (up to 8 characters)
        #[arg(long)]
        name: String,
        /// Disk owner (up to 20 characters)
        #[arg(long, default_value = "")]
        owner: String,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Convert a disk image to IMD, MFI or MFM
    Convert {
        /// Source disk image
        image: PathBuf,
        /// Destination file
        dest: PathBuf,
        /// Target format; inferred from the destination extension when omitted
        #[arg(short, long)]
        format: Option<TargetFormat>,
    },
    /// Open an interactive prompt on a disk
    Shell {
        /// Disk image
        image: PathBuf,
    },
    /// Convert a tempo in BPM to the sequencer speed value
    Bpm {
        /// Beats per minute
        #[arg(allow_negative_numbers = true)]
        bpm: f64,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    info!("Starting {} v{}", cmifloppy::NAME, cmifloppy::VERSION);

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        match e.downcast_ref::<cmifloppy::Error>() {
            Some(err) => eprintln!("{}", cmifloppy::handle_startup_error(err)),
            None => eprintln!("Error: {:#}", e),
        }
        process::exit(1);
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over the debug switches
fn init_logging(debug: bool) {
    let debug_env = env::var("CMIFLOPPY_DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let log_level = if debug || debug_env { "debug" } else { "info" };
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Bpm { bpm } = cli.command {
        println!("{}", cmifloppy::bpm_to_speed(bpm)?);
        return Ok(());
    }

    let config = cmifloppy::init(cli.config.as_deref())?;

    if let Commands::Config = cli.command {
        let text = toml::to_string_pretty(&config).context("Failed to render configuration")?;
        print!("{}", text);
        return Ok(());
    }

    let mut workbench = Workbench::new(config);
    let result = dispatch(&mut workbench, cli.command).await;
    if let Err(e) = workbench.close().await {
        error!("Failed to stop emulator: {}", e);
    }
    result
}

async fn dispatch(workbench: &mut Workbench, command: Commands) -> Result<()> {
    match command {
        Commands::Ls { image } => {
            let entries = workbench.open(&image).await?;
            print_entries(&entries);
        }
        Commands::Import { image, wav, name } => {
            workbench.open(&image).await?;
            let disk = workbench.active()?;
            disk.import_sample(&wav, &name).await?;
            print_entries(&disk.list_directory().await?);
        }
        Commands::Export { image, name, dest } => {
            workbench.open(&image).await?;
            let kind = workbench.active()?.export_sample(&name, &dest).await?;
            println!("Exported {} to {} ({:?})", name, dest.display(), kind);
        }
        Commands::Rm { image, name } => {
            workbench.open(&image).await?;
            let disk = workbench.active()?;
            disk.delete_sample(&name).await?;
            print_entries(&disk.list_directory().await?);
        }
        Commands::Mv { image, old, new } => {
            workbench.open(&image).await?;
            let disk = workbench.active()?;
            disk.rename_sample(&old, &new).await?;
            print_entries(&disk.list_directory().await?);
        }
        Commands::New {
            dest,
            name,
            owner,
            force,
        } => {
            let entries = workbench
                .create(&dest, &DiskLabel::new(name, owner), force)
                .await?;
            println!("Created {}", dest.display());
            print_entries(&entries);
        }
        Commands::Convert {
            image,
            dest,
            format,
        } => {
            workbench.open(&image).await?;
            let entries = workbench.convert(&dest, format).await?;
            println!("Converted {} to {}", image.display(), dest.display());
            print_entries(&entries);
        }
        Commands::Shell { image } => {
            let entries = workbench.open(&image).await?;
            print_entries(&entries);
            shell::run(workbench).await?;
        }
        Commands::Bpm { .. } | Commands::Config => {}
    }

    debug!("Command finished");
    Ok(())
}

fn print_entries(entries: &[DirectoryEntry]) {
    for entry in entries {
        println!("{}", entry);
    }
}
