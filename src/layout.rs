//! On-disk layout of the Spotlight archive.
//!
//! Every harvest writes into one folder per calendar day, split by
//! orientation:
//!
//! ```text
//! <save_root>/
//! └── Spotlight/                   # archive base
//!     ├── 16-10-2026/              # one folder per day (DD-MM-YYYY)
//!     │   ├── Desktop/             # landscape images
//!     │   │   └── 2f6c…e1.jpg
//!     │   └── Mobile/              # portrait images
//!     │       └── 90ab…77.jpg
//!     └── 17-10-2026/
//!         ├── CopyAssets/          # staging, only present during a harvest
//!         ├── Desktop/
//!         └── Mobile/
//! ```
//!
//! The layout is a pure function of the save root and the date; nothing here
//! reads the clock. Existing archives written by other tools use the same
//! folder names, so they must not change.

use crate::imaging::Dimensions;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SPOTLIGHT_DIR: &str = "Spotlight";
pub const STAGING_DIR: &str = "CopyAssets";
pub const LANDSCAPE_DIR: &str = "Desktop";
pub const PORTRAIT_DIR: &str = "Mobile";

/// `chrono` format string for the dated folder name.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Orientation bucket of an archived image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Square images count as portrait.
    pub fn classify(dims: Dimensions) -> Self {
        if dims.width <= dims.height {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Orientation::Landscape => LANDSCAPE_DIR,
            Orientation::Portrait => PORTRAIT_DIR,
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            LANDSCAPE_DIR => Some(Orientation::Landscape),
            PORTRAIT_DIR => Some(Orientation::Portrait),
            _ => None,
        }
    }
}

/// Paths making up one day's harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    /// `<save_root>/Spotlight`
    pub base: PathBuf,
    /// `<base>/<DD-MM-YYYY>`
    pub dated: PathBuf,
    pub staging: PathBuf,
    pub landscape: PathBuf,
    pub portrait: PathBuf,
}

impl ArchiveLayout {
    pub fn compute(save_root: &Path, today: NaiveDate) -> Self {
        let base = archive_base(save_root);
        let dated = base.join(today.format(DATE_FORMAT).to_string());
        Self {
            staging: dated.join(STAGING_DIR),
            landscape: dated.join(LANDSCAPE_DIR),
            portrait: dated.join(PORTRAIT_DIR),
            base,
            dated,
        }
    }

    pub fn orientation_dir(&self, orientation: Orientation) -> &Path {
        match orientation {
            Orientation::Landscape => &self.landscape,
            Orientation::Portrait => &self.portrait,
        }
    }

    /// Whether images of this orientation are kept under the given filters.
    pub fn accepts(orientation: Orientation, only_desktop: bool, only_mobile: bool) -> bool {
        match orientation {
            Orientation::Landscape => !only_mobile,
            Orientation::Portrait => !only_desktop,
        }
    }

    /// Create the dated and staging folders, plus whichever orientation
    /// folders the filters keep.
    pub fn create(&self, only_desktop: bool, only_mobile: bool) -> io::Result<()> {
        fs::create_dir_all(&self.dated)?;
        fs::create_dir_all(&self.staging)?;
        for orientation in [Orientation::Landscape, Orientation::Portrait] {
            if Self::accepts(orientation, only_desktop, only_mobile) {
                fs::create_dir_all(self.orientation_dir(orientation))?;
            }
        }
        Ok(())
    }
}

/// `<save_root>/Spotlight`
pub fn archive_base(save_root: &Path) -> PathBuf {
    save_root.join(SPOTLIGHT_DIR)
}

/// Traversal options for [`list_archived`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Return bare file names instead of full paths.
    pub names_only: bool,
    /// Only walk `Desktop` folders.
    pub landscape_only: bool,
}

/// Every archived file under `base`, in traversal order.
///
/// Walks `base/<day>/<orientation>/<file>`; anything at other depths and
/// folders other than `Desktop`/`Mobile` (such as a leftover staging folder)
/// are ignored. Entries are sorted by name at each level. A missing `base`
/// yields an empty list.
pub fn archived_paths(base: &Path, landscape_only: bool) -> io::Result<Vec<PathBuf>> {
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(base)
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let orientation = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .and_then(Orientation::from_dir_name);
        match orientation {
            Some(Orientation::Landscape) => files.push(entry.into_path()),
            Some(Orientation::Portrait) if !landscape_only => files.push(entry.into_path()),
            _ => {}
        }
    }
    Ok(files)
}

/// Archived files under `base` as strings, deduplicated.
///
/// With `names_only`, the same file name archived on several days (or in
/// both orientation folders) appears once. First occurrence wins the
/// position.
pub fn list_archived(base: &Path, options: ListOptions) -> io::Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut listed = Vec::new();
    for path in archived_paths(base, options.landscape_only)? {
        let item = if options.names_only {
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        } else {
            path.to_string_lossy().to_string()
        };
        if seen.insert(item.clone()) {
            listed.push(item);
        }
    }
    Ok(listed)
}
