use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{Config, OutputConfig};
use crate::error::{Error, Result};
use crate::jpeg::{RemoveThumbnailResult, remove_thumbnail};

/// Supported image extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// The result of processing a single image.
///
/// # Example
///
/// ```rust,no_run
/// use exif_remove_thumbnail::config::Config;
/// use exif_remove_thumbnail::pipeline::process_image;
///
/// let result = process_image("photo.jpg".as_ref(), &Config::default());
/// match (&result.outcome, &result.error) {
///     (Some(outcome), None) => println!("Removed {} bytes", outcome.thumbnail_size),
///     (_, Some(err)) => eprintln!("{}: {err}", result.error_kind.unwrap_or("error")),
///     _ => {}
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ProcessResult {
    pub path: PathBuf,
    /// Where the output was (or, in a dry run, would be) written.
    pub output_path: PathBuf,
    pub outcome: Option<RemoveThumbnailResult>,
    /// `true` if a file was written.
    pub written: bool,
    pub backup_path: Option<PathBuf>,
    pub error: Option<String>,
    /// `"format"` or `"system"` when `error` is set.
    pub error_kind: Option<&'static str>,
}

/// Remove the Exif thumbnail from the JPEG at `input` and write the result to `output`.
///
/// Nothing is written unless the input is a well-formed JPEG. I/O failures are
/// reported as [`Error::System`], malformed input as [`Error::Format`].
///
/// ```rust,no_run
/// use exif_remove_thumbnail::{Error, remove_thumbnail_file};
///
/// match remove_thumbnail_file("in.jpg".as_ref(), "out.jpg".as_ref()) {
///     Ok(r) => println!("{} -> {} bytes", r.before_size, r.after_size),
///     Err(Error::Format(e)) => eprintln!("not processable: {e}"),
///     Err(e) => eprintln!("I/O problem: {e}"),
/// }
/// ```
pub fn remove_thumbnail_file(input: &Path, output: &Path) -> Result<RemoveThumbnailResult> {
    let data = read_input(input)?;
    let (stripped, result) = remove_thumbnail(&data)?;
    write_output(output, &stripped)?;
    Ok(result)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| Error::system(format!("failed to read {}", path.display()), e))
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data)
        .map_err(|e| Error::system(format!("failed to write {}", path.display()), e))
}

/// Collect supported image files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// (following symlinks), recursively unless `recursive` is `false`. Only
/// `.jpg`/`.jpeg` files are included.
pub fn collect_images(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(path)
                .follow_links(true)
                .max_depth(max_depth)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_supported_image(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Where the processed copy of `input` goes.
///
/// In place by default; `output_dir` relocates the file and `suffix` is
/// inserted before the extension (`photo.jpg` → `photo.nothumb.jpg`).
pub fn output_path_for(input: &Path, output: &OutputConfig) -> PathBuf {
    let dir = match &output.output_dir {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let mut name = OsString::from(input.file_stem().unwrap_or_default());
    if let Some(suffix) = &output.suffix {
        name.push(suffix);
    }
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    dir.join(name)
}

/// Create a backup of the original file.
fn backup_file(path: &Path) -> Result<PathBuf> {
    let backup_path = path.with_extension(format!(
        "{}.bak",
        path.extension().unwrap_or_default().to_string_lossy()
    ));

    if !backup_path.exists() {
        std::fs::copy(path, &backup_path)
            .map_err(|e| Error::system(format!("failed to back up {}", path.display()), e))?;
        log::debug!("Backup created: {}", backup_path.display());
    }

    Ok(backup_path)
}

/// Process a single image according to `config`.
///
/// 1. **Read** the file
/// 2. **Strip** the Exif thumbnail in memory
/// 3. **Write** the result unless this is a dry run
///
/// In-place runs leave files without a thumbnail untouched and back up the
/// original first when `backup_originals` is set. Errors are recorded in the
/// returned [`ProcessResult`] rather than returned.
pub fn process_image(path: &Path, config: &Config) -> ProcessResult {
    let output_path = output_path_for(path, &config.output);
    let mut result = ProcessResult {
        path: path.to_path_buf(),
        output_path,
        outcome: None,
        written: false,
        backup_path: None,
        error: None,
        error_kind: None,
    };

    if let Err(e) = run(&mut result, &config.output) {
        result.error = Some(e.to_string());
        result.error_kind = Some(e.kind());
    }

    result
}

fn run(result: &mut ProcessResult, output: &OutputConfig) -> Result<()> {
    let data = read_input(&result.path)?;
    let (stripped, outcome) = remove_thumbnail(&data)?;
    result.outcome = Some(outcome);

    if output.dry_run {
        return Ok(());
    }

    // Any config that resolves back to the input path overwrites it.
    let in_place = result.output_path == result.path;
    if in_place && !outcome.had_thumbnail {
        log::debug!("No thumbnail in {}, leaving it unchanged", result.path.display());
        return Ok(());
    }

    if in_place && output.backup_originals {
        result.backup_path = Some(backup_file(&result.path)?);
    }

    if let Some(parent) = result.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::system(format!("failed to create {}", parent.display()), e)
            })?;
        }
    }

    write_output(&result.output_path, &stripped)?;
    result.written = true;
    Ok(())
}
