//! # jpeg2webp - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Costruzione della configurazione (file opzionale + flag CLI)
//! - Avvio del `BatchConverter` e stampa del report finale
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (senza directory: help ed exit 0)
//! 2. Unisce eventuale file di configurazione e flag
//! 3. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 4. Valida la directory e avvia la conversione
//! 5. In modalità verbose stampa la tabella riassuntiva
//!
//! ## Codici di uscita:
//! - `0`: conversione completata (anche con file falliti) o help
//! - `1`: errore fatale
//!
//! ## Esempio di utilizzo:
//! ```bash
//! jpeg2webp -d /path/to/photos -q 85 --rotate --cleanup --verbose
//! ```

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use jpeg2webp::{config::validate_quality, BatchConverter, Config};

#[derive(Parser, Debug)]
#[command(name = "jpeg2webp", version)]
#[command(about = "Convert JPEG images to WebP, recursively, optionally keeping EXIF metadata")]
struct Args {
    /// Directory to convert (searched recursively)
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// WebP quality (0-100, default 90; out-of-range values are clamped)
    #[arg(short, long, value_parser = parse_quality, allow_negative_numbers = true)]
    quality: Option<u8>,

    /// Do not save EXIF metadata
    #[arg(short = 'x', long)]
    noexif: bool,

    /// Rotate images according to their EXIF orientation
    #[arg(short, long)]
    rotate: bool,

    /// Delete original JPEGs after a successful conversion
    #[arg(short, long)]
    cleanup: bool,

    /// Show progress and a final summary
    #[arg(short, long)]
    verbose: bool,

    /// Follow symbolic links while scanning
    #[arg(short, long)]
    follow_symlinks: bool,

    /// Load options from a JSON file (flags override it)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save the effective options to a JSON file
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,
}

fn parse_quality(value: &str) -> Result<u8, String> {
    value
        .trim()
        .parse::<f64>()
        .map(validate_quality)
        .map_err(|_| format!("invalid quality '{}': expected a number", value))
}

fn print_help() {
    let _ = Args::command().print_help();
    println!();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayVersion {
                let _ = e.print();
            } else {
                print_help();
            }
            return ExitCode::SUCCESS;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let Some(config) = build_config(&args)? else {
        print_help();
        return Ok(());
    };

    init_logging(config.verbose)?;

    if let Some(ref path) = args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
    }

    let verbose = config.verbose;
    let mut converter = BatchConverter::new(config)?;
    converter.run()?;

    if verbose {
        println!("{}", converter.stats().final_report(converter.elapsed()));
    }

    Ok(())
}

/// File options first, then CLI flags on top. `None` when no directory was given.
fn build_config(args: &Args) -> Result<Option<Config>> {
    let mut config = match args.config {
        Some(ref path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let directory = match args.directory {
        Some(ref dir) => dir.clone(),
        None if !config.root_directory.as_os_str().is_empty() => config.root_directory.clone(),
        None => return Ok(None),
    };
    config.root_directory = directory
        .canonicalize()
        .with_context(|| format!("Cannot open directory {}", directory.display()))?;

    if let Some(quality) = args.quality {
        config.quality = quality;
    }
    if args.noexif {
        config.preserve_exif = false;
    }
    config.rotate |= args.rotate;
    config.cleanup_originals |= args.cleanup;
    config.verbose |= args.verbose;
    config.follow_symlinks |= args.follow_symlinks;

    Ok(Some(config))
}

fn init_logging(verbose: bool) -> Result<()> {
    // errors go to stderr, everything else to stdout
    let writer = std::io::stderr
        .with_max_level(Level::ERROR)
        .or_else(std::io::stdout);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(writer)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
