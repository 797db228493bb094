use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use exif_remove_thumbnail::{config, exif, inspect, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "exif-remove-thumbnail",
    version,
    about = "Remove embedded EXIF thumbnails from JPEG files, keeping all other metadata"
)]
struct Cli {
    /// Image files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Report what would be removed without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Write processed files into this directory instead of in place
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Insert this suffix before the extension of output files (e.g. ".nothumb")
    #[arg(long, value_name = "SUFFIX")]
    suffix: Option<String>,

    /// Do not create .bak copies when overwriting files in place
    #[arg(long)]
    no_backup: bool,

    /// Only process files directly inside the given directories
    #[arg(long)]
    no_recursive: bool,

    /// Display EXIF metadata and thumbnail layout, then exit
    #[arg(long = "show-exif")]
    show_exif: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    // Load config, then let flags override it
    let mut config = config::Config::load(cli.config.as_deref())?;
    if cli.dry_run {
        config.output.dry_run = true;
    }
    if cli.output_dir.is_some() {
        config.output.output_dir = cli.output_dir.clone();
    }
    if cli.suffix.is_some() {
        config.output.suffix = cli.suffix.clone();
    }
    if cli.no_backup {
        config.output.backup_originals = false;
    }
    if cli.no_recursive {
        config.output.recursive = false;
    }

    let images = pipeline::collect_images(&cli.paths, config.output.recursive);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    // Handle --show-exif
    if cli.show_exif {
        for image_path in &images {
            print_full_exif(image_path)?;
        }
        return Ok(());
    }

    log::info!("Found {} image(s) to process", images.len());
    if config.output.dry_run {
        log::info!("DRY RUN: no files will be modified");
    }

    let mut results = Vec::new();
    let total = images.len();

    for (i, image_path) in images.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, image_path.display());

        let result = pipeline::process_image(image_path, &config);

        if let Some(ref err) = result.error {
            log::error!("  Error ({}): {err}", result.error_kind.unwrap_or("unknown"));
        } else if let Some(outcome) = result.outcome {
            if outcome.had_thumbnail {
                let action = if config.output.dry_run {
                    "Would remove"
                } else {
                    "Removed"
                };
                log::info!(
                    "  {action} thumbnail: {} bytes ({} -> {})",
                    outcome.thumbnail_size,
                    outcome.before_size,
                    outcome.after_size
                );
            } else {
                log::info!("  No thumbnail ({} bytes)", outcome.before_size);
            }

            if result.written && result.output_path != result.path {
                log::info!("  Output: {}", result.output_path.display());
            }
            if let Some(ref backup) = result.backup_path {
                log::debug!("  Backup: {}", backup.display());
            }
        }

        results.push(result);
    }

    // JSON output
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    // Summary
    let success = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    log::info!("Done: {success} succeeded, {failed} failed out of {total} images");

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Print EXIF metadata and the thumbnail directory layout for a file.
fn print_full_exif(path: &Path) -> Result<()> {
    let data = exif::read_exif(path)?;

    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(72));

    // --- Camera / Device ---
    let camera_fields: Vec<(&str, Option<&str>)> = vec![
        ("Make", data.make.as_deref()),
        ("Model", data.model.as_deref()),
        ("Orientation", data.orientation.as_deref()),
    ];
    if camera_fields.iter().any(|(_, v)| v.is_some()) {
        println!("  {BOLD}Camera / Device{RESET}");
        println!("  {DIM}{}{RESET}", "─".repeat(70));
        for (tag, val) in &camera_fields {
            if let Some(v) = val {
                print_row(tag, v);
            }
        }
        println!();
    }

    // --- GPS ---
    if data.has_gps {
        println!("  {BOLD}GPS{RESET}");
        println!("  {DIM}{}{RESET}", "─".repeat(70));
        if let Some(lat) = data.gps_latitude {
            print_row("GPSLatitude", &format!("{lat:.6}"));
        }
        if let Some(lon) = data.gps_longitude {
            print_row("GPSLongitude", &format!("{lon:.6}"));
        }
        println!();
    }

    // --- Thumbnail ---
    println!("  {BOLD}Thumbnail{RESET}");
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    let bytes = std::fs::read(path)?;
    match inspect(&bytes) {
        Ok(Some(info)) => {
            print_row("ByteOrder", &format!("{:?}", info.byte_order));
            print_row(
                "IFD0",
                &format!("offset {}, {} entries", info.ifd0_offset, info.ifd0_entries),
            );
            match info.ifd1_offset {
                Some(offset) => {
                    print_row("IFD1", &format!("offset {offset}"));
                    print_row("ThumbnailSize", &format!("{} bytes", info.thumbnail_size));
                }
                None => print_row("IFD1", "(none)"),
            }
        }
        Ok(None) => println!("  {DIM}(no EXIF segment){RESET}"),
        Err(e) => print_row("Error", &e.to_string()),
    }
    println!();

    Ok(())
}

/// Print a single row in the EXIF display table.
fn print_row(tag: &str, val: &str) {
    let tag_col = format!("{:<22}", tag);
    println!("  {tag_col} : {val}");
}
