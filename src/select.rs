//! Wallpaper selection from the archive.
//!
//! ```text
//! search path ──▶ landscape candidates ──▶ drop pixel-equal to active ──▶ policy ──▶ path
//! ```
//!
//! The search path is the caller's path when given, otherwise the persistent
//! archive under the picture folder. When that archive does not exist yet,
//! the asset cache is harvested first: into `<temp>/SpotlightTemp` when the
//! selection is temporary (deleted again once the wallpaper is applied), or
//! straight into the archive when it is not.
//!
//! Filtering uses header-only `identify` first, so only candidates with the
//! same dimensions as the active wallpaper are fully decoded.

use crate::config::Roots;
use crate::desktop::{self, DesktopError, Style, WallpaperHost};
use crate::harvest::{self, HarvestError, HarvestOptions};
use crate::imaging::{DecodeError, Image, ImageBackend, images_equal};
use crate::layout;
use chrono::NaiveDate;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Folder created under the temp root for temporary harvests.
pub const TEMP_DIR_NAME: &str = "SpotlightTemp";

#[derive(Error, Debug)]
pub enum SelectError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Harvest failed: {0}")]
    Harvest(#[from] HarvestError),
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    #[error(transparent)]
    Desktop(#[from] DesktopError),
    #[error("No wallpaper candidates left in {0}")]
    OutOfCandidates(PathBuf),
}

/// How a wallpaper is chosen among the remaining candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Uniformly at random.
    Random,
    /// Most recent modification time; the last enumerated wins ties.
    Latest,
}

/// Inputs of one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOptions {
    pub policy: Policy,
    /// Folder laid out like the archive base. `None` uses the archive.
    pub load_path: Option<PathBuf>,
    /// Harvest into temp space when no archive exists.
    pub temporary: bool,
    /// Size threshold for any harvest the selection has to run.
    pub threshold_kb: u64,
}

impl SelectOptions {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            load_path: None,
            temporary: true,
            threshold_kb: HarvestOptions::default().threshold_kb,
        }
    }
}

/// Where candidates are read from, and whether it must be removed afterwards.
#[derive(Debug)]
pub struct SearchPath {
    pub path: PathBuf,
    temp: Option<PathBuf>,
}

impl SearchPath {
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Best-effort removal of a temporary harvest.
    ///
    /// Failure is expected when the OS still holds the chosen file, and is
    /// only logged.
    pub fn cleanup(self) {
        if let Some(temp) = self.temp
            && let Err(e) = fs::remove_dir_all(&temp)
        {
            log::debug!("Leaving {}: {e}", temp.display());
        }
    }
}

/// A chosen wallpaper, still backed by its search path.
#[derive(Debug)]
pub struct Selection {
    pub path: PathBuf,
    /// Candidates left after filtering.
    pub candidates: usize,
    pub search: SearchPath,
}

/// Summary of a completed selection, for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picked {
    pub policy: Policy,
    pub path: PathBuf,
    pub candidates: usize,
    pub temporary: bool,
    /// Copy handed to the OS; `None` with [`Style::NoChange`].
    pub applied: Option<PathBuf>,
}

/// Decide which folder to search, harvesting first if needed.
pub fn resolve_search_path(
    roots: &Roots,
    options: &SelectOptions,
    today: NaiveDate,
    backend: &impl ImageBackend,
) -> Result<SearchPath, SelectError> {
    if let Some(path) = &options.load_path {
        return Ok(SearchPath {
            path: path.clone(),
            temp: None,
        });
    }

    let archive = layout::archive_base(&roots.picture_dir);
    if !layout::archived_paths(&archive, true)?.is_empty() {
        return Ok(SearchPath {
            path: archive,
            temp: None,
        });
    }

    let harvest_options = HarvestOptions {
        threshold_kb: options.threshold_kb,
        ..HarvestOptions::default()
    };
    if !options.temporary {
        log::info!("No archive yet, harvesting into {}", archive.display());
        harvest::save(
            &roots.asset_cache,
            &roots.picture_dir,
            today,
            &harvest_options,
            backend,
        )?;
        return Ok(SearchPath {
            path: archive,
            temp: None,
        });
    }

    let temp = roots.temp_dir.join(TEMP_DIR_NAME);
    if temp.exists() {
        fs::remove_dir_all(&temp)?;
    }
    log::info!("No archive yet, harvesting into {}", temp.display());
    let harvested = harvest::save(&roots.asset_cache, &temp, today, &harvest_options, backend);
    let search = SearchPath {
        path: layout::archive_base(&temp),
        temp: Some(temp),
    };
    match harvested {
        Ok(_) => Ok(search),
        Err(e) => {
            search.cleanup();
            Err(e.into())
        }
    }
}

/// Landscape files under an archive-shaped `search` folder.
pub fn candidates(search: &Path) -> Result<Vec<PathBuf>, SelectError> {
    Ok(layout::archived_paths(search, true)?)
}

/// Drop every candidate pixel-equal to `active`.
///
/// Candidates that cannot be read are dropped with a warning.
pub fn filter_active(
    candidates: Vec<PathBuf>,
    active: &Image,
    backend: &impl ImageBackend,
) -> Vec<PathBuf> {
    let active_dims = active.dimensions();
    candidates
        .into_iter()
        .filter(|path| {
            let same = backend.identify(path).and_then(|dims| {
                if dims != active_dims {
                    return Ok(false);
                }
                backend.decode(path).map(|image| images_equal(&image, active))
            });
            match same {
                Ok(true) => {
                    log::debug!("{} is the current wallpaper", path.display());
                    false
                }
                Ok(false) => true,
                Err(e) => {
                    log::warn!("Skipping candidate: {e}");
                    false
                }
            }
        })
        .collect()
}

/// The most recently modified candidate. Later entries win ties.
pub fn pick_latest(candidates: &[PathBuf]) -> Result<Option<&PathBuf>, SelectError> {
    let mut latest = None;
    for path in candidates {
        let modified = fs::metadata(path)?.modified()?;
        match latest {
            Some((newest, _)) if modified < newest => {}
            _ => latest = Some((modified, path)),
        }
    }
    Ok(latest.map(|(_, path)| path))
}

pub fn pick_random<'a, R: Rng + ?Sized>(
    candidates: &'a [PathBuf],
    rng: &mut R,
) -> Option<&'a PathBuf> {
    candidates.choose(rng)
}

/// Decode the current desktop wallpaper.
pub fn active_wallpaper(
    host: &impl WallpaperHost,
    backend: &impl ImageBackend,
) -> Result<Image, SelectError> {
    let path = host.desktop_wallpaper()?;
    Ok(backend.decode(&path)?)
}

/// Choose a wallpaper without applying it.
///
/// A temporary search path is cleaned up on failure; on success it travels
/// with the returned [`Selection`].
pub fn select<R: Rng + ?Sized>(
    host: &impl WallpaperHost,
    roots: &Roots,
    options: &SelectOptions,
    today: NaiveDate,
    backend: &impl ImageBackend,
    rng: &mut R,
) -> Result<Selection, SelectError> {
    let active = active_wallpaper(host, backend)?;
    let search = resolve_search_path(roots, options, today, backend)?;
    match choose(&search.path, &active, options.policy, backend, rng) {
        Ok((path, candidates)) => Ok(Selection {
            path,
            candidates,
            search,
        }),
        Err(e) => {
            search.cleanup();
            Err(e)
        }
    }
}

fn choose<R: Rng + ?Sized>(
    search: &Path,
    active: &Image,
    policy: Policy,
    backend: &impl ImageBackend,
    rng: &mut R,
) -> Result<(PathBuf, usize), SelectError> {
    let found = candidates(search)?;
    log::debug!("{} candidates in {}", found.len(), search.display());
    let found = filter_active(found, active, backend);
    let picked = match policy {
        Policy::Random => pick_random(&found, rng),
        Policy::Latest => pick_latest(&found)?,
    };
    picked
        .cloned()
        .map(|path| (path, found.len()))
        .ok_or_else(|| SelectError::OutOfCandidates(search.to_path_buf()))
}

/// Select a wallpaper, apply it with `style`, then drop any temporary harvest.
pub fn set_spotlight_wallpaper<R: Rng + ?Sized>(
    host: &impl WallpaperHost,
    roots: &Roots,
    options: &SelectOptions,
    style: Style,
    today: NaiveDate,
    backend: &impl ImageBackend,
    rng: &mut R,
) -> Result<Picked, SelectError> {
    let selection = select(host, roots, options, today, backend, rng)?;
    let applied = desktop::apply_wallpaper(host, &roots.state_dir, &selection.path, style);
    let picked = Picked {
        policy: options.policy,
        temporary: selection.search.is_temporary(),
        path: selection.path,
        candidates: selection.candidates,
        applied: None,
    };
    selection.search.cleanup();
    Ok(Picked {
        applied: applied?,
        ..picked
    })
}
