//! kvfs - Entry Point
//!
//! Command line access to a volume stored in a single database file.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use kvfs::commands;
use kvfs::error::handlers::{exit_code, handle_error};
use kvfs::ingest::IngestOptions;
use kvfs::utils::logging::setup_logging;
use kvfs::{FileMode, Volume, VolumeConfig};

#[derive(Parser)]
#[command(name = "kvfs")]
#[command(about = "Files stored in a single key-value database", long_about = None)]
struct Cli {
    /// Database file (overrides the configured db_path)
    #[arg(long, value_name = "DB")]
    db: Option<PathBuf>,

    /// Configuration file name, without extension
    #[arg(long, value_name = "NAME", default_value = "kvfs")]
    config: String,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Load every member of a tar archive into the volume")]
    Ingest {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
        /// Commit after every write
        #[arg(long)]
        sync: bool,
    },
    #[command(about = "Print the content of a file")]
    Cat {
        #[arg(value_name = "PATH")]
        path: String,
    },
    #[command(about = "Show the stored header of a file or directory")]
    Stat {
        #[arg(value_name = "PATH")]
        path: String,
    },
    #[command(about = "Store a local file (or stdin with -) under PATH")]
    Put {
        #[arg(value_name = "PATH")]
        path: String,
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        /// Octal permission bits, e.g. 644
        #[arg(long, value_parser = parse_octal)]
        mode: Option<u32>,
    },
    #[command(about = "Create a directory entry")]
    Mkdir {
        #[arg(value_name = "PATH")]
        path: String,
        #[arg(long, value_parser = parse_octal, default_value = "755")]
        mode: u32,
    },
    #[command(about = "Remove a stored entry")]
    Rm {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

fn parse_octal(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s.trim_start_matches("0o"), 8)
        .map_err(|e| format!("invalid octal mode {s:?}: {e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = match VolumeConfig::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::from(78);
        }
    };
    if let Some(db) = cli.db {
        config.db_path = db.to_string_lossy().into_owned();
    }

    let volume = match Volume::from_config(&config) {
        Ok(volume) => volume,
        Err(e) => {
            handle_error(&e);
            return ExitCode::from(exit_code(&e));
        }
    };

    let result = run(&volume, &config, cli.command);
    let closed = volume.close();

    match result.and(closed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(volume: &Volume, config: &VolumeConfig, command: Commands) -> kvfs::Result<()> {
    match command {
        Commands::Ingest { archive, sync } => {
            let options = IngestOptions {
                sync_on_write: sync || config.sync_on_write,
            };
            let report = commands::ingest(volume, &archive, &options)?;
            for name in &report.skipped {
                println!("skipped {name}");
            }
            println!(
                "{} files, {} directories, {} bytes",
                report.files, report.directories, report.bytes
            );
        }
        Commands::Cat { path } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            commands::cat(volume, &path, &mut out)?;
            out.flush()?;
        }
        Commands::Stat { path } => {
            let header = volume.stat(&path)?;
            println!("{}", commands::format_header(&header));
        }
        Commands::Put { path, source, mode } => {
            let mode = mode
                .map(FileMode::regular)
                .unwrap_or_else(|| config.default_file_mode());
            let copied = if source.as_os_str() == "-" {
                commands::put(volume, &path, &mut io::stdin().lock(), mode)?
            } else {
                commands::put(volume, &path, &mut std::fs::File::open(&source)?, mode)?
            };
            info!("Stored {} bytes under {}", copied, path);
        }
        Commands::Mkdir { path, mode } => commands::mkdir(volume, &path, mode)?,
        Commands::Rm { path } => commands::remove(volume, &path)?,
    }
    Ok(())
}
