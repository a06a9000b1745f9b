//! Spotlight harvesting.
//!
//! Copies new images out of the Windows Spotlight asset cache into the dated
//! archive (see [`layout`](crate::layout)), split into landscape (`Desktop`)
//! and portrait (`Mobile`) folders.
//!
//! ## Pass
//!
//! ```text
//! asset cache ──size filter──▶ dedup vs archive ──copy + .jpg──▶ CopyAssets/
//!                                                                  │
//!                                          decode, classify ◀──────┘
//!                                                  │
//!                               Desktop/ ◀─────────┴─────────▶ Mobile/
//! ```
//!
//! 1. Create today's folders and empty any staging left by an interrupted run.
//! 2. Collect the names of every file already archived, on any day.
//! 3. Stage each cache file that is at least `threshold_kb` KiB and whose
//!    name is not a prefix of an archived name. Staged copies get a literal
//!    `.jpg` suffix whatever their real format.
//! 4. With nothing staged, remove today's folder and stop.
//! 5. Otherwise decode each staged file, classify it, copy it into its
//!    orientation folder (unless filtered out), and delete the staging folder.
//!
//! A file that cannot be read, staged, decoded or archived is logged, listed
//! in [`HarvestReport::failed`] and dropped; the rest of the pass continues.
//! Directory failures abort the pass.

use crate::config::Roots;
use crate::imaging::ImageBackend;
use crate::layout::{self, ArchiveLayout, ListOptions, Orientation};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix appended to staged assets, which are stored extensionless.
pub const STAGED_SUFFIX: &str = ".jpg";

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    #[error("Spotlight asset cache not found: {0}")]
    SourceMissing(PathBuf),
}

/// Options for a harvest pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Minimum asset size in KiB.
    pub threshold_kb: u64,
    /// Keep landscape images only (`--no-mobile`).
    pub only_desktop: bool,
    /// Keep portrait images only (`--no-desktop`).
    pub only_mobile: bool,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            threshold_kb: 100,
            only_desktop: false,
            only_mobile: false,
        }
    }
}

impl HarvestOptions {
    pub fn threshold_bytes(&self) -> u64 {
        self.threshold_kb.saturating_mul(1024)
    }
}

/// What a harvest pass did, file by file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HarvestReport {
    /// Today's folder.
    pub dated_dir: PathBuf,
    /// Assets copied into staging.
    pub new_files: usize,
    /// Assets below the size threshold.
    pub too_small: Vec<String>,
    /// Assets whose name is already in the archive.
    pub already_archived: Vec<String>,
    pub landscape: Vec<PathBuf>,
    pub portrait: Vec<PathBuf>,
    /// Staged files classified into an orientation that was filtered out.
    pub excluded: Vec<PathBuf>,
    /// Files that could not be read, copied or decoded.
    pub failed: Vec<String>,
    /// False when nothing new was found and today's folder was removed.
    pub kept: bool,
}

impl HarvestReport {
    pub fn archived(&self) -> usize {
        self.landscape.len() + self.portrait.len()
    }
}

/// Harvest into `save_path`, or the configured picture folder when unset.
pub fn save_to(
    roots: &Roots,
    save_path: Option<&Path>,
    today: NaiveDate,
    options: &HarvestOptions,
    backend: &impl ImageBackend,
) -> Result<HarvestReport, HarvestError> {
    let save_root = save_path.unwrap_or(&roots.picture_dir);
    save(&roots.asset_cache, save_root, today, options, backend)
}

/// Run one harvest pass from `asset_cache` into `<save_root>/Spotlight/<today>`.
pub fn save(
    asset_cache: &Path,
    save_root: &Path,
    today: NaiveDate,
    options: &HarvestOptions,
    backend: &impl ImageBackend,
) -> Result<HarvestReport, HarvestError> {
    if !asset_cache.is_dir() {
        return Err(HarvestError::SourceMissing(asset_cache.to_path_buf()));
    }

    let layout = ArchiveLayout::compute(save_root, today);
    layout.create(options.only_desktop, options.only_mobile)?;
    clear_dir(&layout.staging)?;

    let existing = layout::list_archived(
        &layout.base,
        ListOptions {
            names_only: true,
            landscape_only: false,
        },
    )?;
    log::debug!("{} files already archived", existing.len());

    let mut report = HarvestReport {
        dated_dir: layout.dated.clone(),
        ..HarvestReport::default()
    };

    for asset in sorted_files(asset_cache)? {
        let name = file_name(&asset);
        let size = match fs::metadata(&asset) {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::warn!("Skipping {name}: {e}");
                report.failed.push(name);
                continue;
            }
        };
        if size < options.threshold_bytes() {
            log::debug!(
                "{name}: {} KB < {} KB, skipped",
                size / 1024,
                options.threshold_kb
            );
            report.too_small.push(name);
            continue;
        }
        if existing.iter().any(|saved| saved.starts_with(&name)) {
            log::debug!("{name}: already archived, skipped");
            report.already_archived.push(name);
            continue;
        }
        if let Err(e) = fs::copy(&asset, layout.staging.join(format!("{name}{STAGED_SUFFIX}"))) {
            log::warn!("Could not stage {name}: {e}");
            report.failed.push(name);
            continue;
        }
        report.new_files += 1;
    }

    if report.new_files == 0 {
        log::info!("No new Spotlight images");
        remove_if_unused(&layout)?;
        return Ok(report);
    }
    log::info!("{} new files staged", report.new_files);

    for staged in sorted_files(&layout.staging)? {
        let orientation = match backend.decode(&staged) {
            Ok(image) => Orientation::classify(image.dimensions()),
            Err(e) => {
                log::warn!("Dropping {}: {e}", staged.display());
                report.failed.push(file_name(&staged));
                continue;
            }
        };
        if !ArchiveLayout::accepts(orientation, options.only_desktop, options.only_mobile) {
            report.excluded.push(staged);
            continue;
        }
        let target = layout.orientation_dir(orientation).join(file_name(&staged));
        if let Err(e) = fs::copy(&staged, &target) {
            log::warn!("Could not archive {}: {e}", target.display());
            report.failed.push(file_name(&staged));
            continue;
        }
        match orientation {
            Orientation::Landscape => report.landscape.push(target),
            Orientation::Portrait => report.portrait.push(target),
        }
    }

    fs::remove_dir_all(&layout.staging)?;
    report.kept = true;
    Ok(report)
}

/// Delete staging, then today's folder if no archived file is left in it.
///
/// A second pass on the same day must not wipe what the first one archived.
fn remove_if_unused(layout: &ArchiveLayout) -> std::io::Result<()> {
    if layout.staging.exists() {
        fs::remove_dir_all(&layout.staging)?;
    }
    let has_files = [&layout.landscape, &layout.portrait]
        .into_iter()
        .filter(|dir| dir.is_dir())
        .map(fs::read_dir)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .any(|mut entries| entries.next().is_some());
    if !has_files {
        fs::remove_dir_all(&layout.dated)?;
    }
    Ok(())
}

/// Remove every entry inside `dir`, keeping `dir` itself.
fn clear_dir(dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

fn sorted_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
