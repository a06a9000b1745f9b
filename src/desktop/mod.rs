//! The operating system's wallpaper, behind a narrow trait.
//!
//! Everything platform-specific (registry reads, `SystemParametersInfoW`) sits
//! behind [`WallpaperHost`]. The rest of the crate only asks three things:
//! where the current desktop wallpaper is, where the lock-screen image is, and
//! to apply a file with a [`Style`].
//!
//! | Host | Platform |
//! |---|---|
//! | `WindowsHost` | Windows: `Control Panel\Desktop` + `SPI_SETDESKWALLPAPER` |
//! | [`UnsupportedHost`] | everything else; every call fails with [`DesktopError::Unsupported`] |
//!
//! The helpers in this module ([`apply_wallpaper`], [`save_wallpaper`]) are
//! host-agnostic file handling and are what the CLI calls.

#[cfg(windows)]
mod win32;

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(windows)]
pub use self::win32::WindowsHost;

#[derive(Error, Debug)]
pub enum DesktopError {
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    #[error("Wallpaper control is only supported on Windows")]
    Unsupported,
    #[error("Operating system call failed: {0}")]
    Os(String),
    #[error("No lock screen image is registered")]
    LockScreenUnavailable,
}

/// How the desktop wallpaper is fitted to the screen.
///
/// Ids follow declaration order and are what the CLI's `styleID:<n>` and the
/// config's `selection.style` use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Stretched,
    Fill,
    Fit,
    Span,
    Tile,
    Center,
    /// Leave the wallpaper untouched.
    NoChange,
}

impl Style {
    pub const ALL: [Style; 7] = [
        Style::Stretched,
        Style::Fill,
        Style::Fit,
        Style::Span,
        Style::Tile,
        Style::Center,
        Style::NoChange,
    ];

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn id(self) -> u32 {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0) as u32
    }

    /// `(WallpaperStyle, TileWallpaper)` registry values, `None` for `NoChange`.
    pub fn registry_values(self) -> Option<(u32, bool)> {
        match self {
            Style::Stretched => Some((2, false)),
            Style::Fill => Some((10, false)),
            Style::Fit => Some((6, false)),
            Style::Span => Some((22, false)),
            Style::Tile => Some((0, true)),
            Style::Center => Some((1, false)),
            Style::NoChange => None,
        }
    }
}

/// Access to the platform wallpaper settings.
pub trait WallpaperHost {
    /// File currently shown as the desktop wallpaper.
    fn desktop_wallpaper(&self) -> Result<PathBuf, DesktopError>;

    /// File currently shown on the lock screen.
    fn lock_screen_wallpaper(&self) -> Result<PathBuf, DesktopError>;

    /// Apply `path` as the desktop wallpaper. Never called with `NoChange`.
    fn set_desktop_wallpaper(&self, path: &Path, style: Style) -> Result<(), DesktopError>;
}

/// Host for platforms without wallpaper support.
#[derive(Debug, Default)]
pub struct UnsupportedHost;

impl WallpaperHost for UnsupportedHost {
    fn desktop_wallpaper(&self) -> Result<PathBuf, DesktopError> {
        Err(DesktopError::Unsupported)
    }

    fn lock_screen_wallpaper(&self) -> Result<PathBuf, DesktopError> {
        Err(DesktopError::Unsupported)
    }

    fn set_desktop_wallpaper(&self, _path: &Path, _style: Style) -> Result<(), DesktopError> {
        Err(DesktopError::Unsupported)
    }
}

#[cfg(windows)]
pub fn system_host() -> WindowsHost {
    WindowsHost
}

#[cfg(not(windows))]
pub fn system_host() -> UnsupportedHost {
    UnsupportedHost
}

/// Copy `source` into `state_dir` as `wallpaper.<ext>` and apply the copy.
///
/// The OS holds the applied file open, so archive files are never handed to
/// it directly. Returns the applied copy, or `None` for [`Style::NoChange`].
pub fn apply_wallpaper(
    host: &impl WallpaperHost,
    state_dir: &Path,
    source: &Path,
    style: Style,
) -> Result<Option<PathBuf>, DesktopError> {
    if style == Style::NoChange {
        return Ok(None);
    }
    fs::create_dir_all(state_dir)?;
    let name = match source.extension() {
        Some(ext) => format!("wallpaper.{}", ext.to_string_lossy()),
        None => "wallpaper".to_string(),
    };
    let applied = state_dir.join(name);
    if !is_same_file(source, &applied) {
        fs::copy(source, &applied)?;
    }
    host.set_desktop_wallpaper(&applied, style)?;
    log::info!("Wallpaper set to {}", source.display());
    Ok(Some(applied))
}

/// Apply the current lock-screen image as the desktop wallpaper.
///
/// Returns the lock-screen file and the applied copy.
pub fn apply_lock_screen_as_desktop(
    host: &impl WallpaperHost,
    state_dir: &Path,
    style: Style,
) -> Result<(PathBuf, Option<PathBuf>), DesktopError> {
    let lock_screen = host.lock_screen_wallpaper()?;
    let applied = apply_wallpaper(host, state_dir, &lock_screen, style)?;
    Ok((lock_screen, applied))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Where a saved wallpaper copy should land.
///
/// When `destination` is an existing directory the copy is named
/// `(<yyyy-mm-dd,HH.MM.SS>)_<source name>`, with `.jpg` appended if the
/// source has no extension. Any other `destination` is used as the file path.
pub fn copy_destination(source: &Path, destination: &Path, now: NaiveDateTime) -> PathBuf {
    if !destination.is_dir() {
        return destination.to_path_buf();
    }
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "wallpaper".to_string());
    let suffix = if source.extension().is_none() { ".jpg" } else { "" };
    destination.join(format!(
        "({})_{}{}",
        now.format("%Y-%m-%d,%H.%M.%S"),
        file_name,
        suffix
    ))
}

/// Copy `source` to `destination` (see [`copy_destination`] for naming).
///
/// Parent folders of a file destination are created. Returns the written path.
pub fn save_wallpaper(
    source: &Path,
    destination: &Path,
    now: NaiveDateTime,
) -> Result<PathBuf, DesktopError> {
    let target = copy_destination(source, destination, now);
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, &target)?;
    log::info!("{} copied to {}", source.display(), target.display());
    Ok(target)
}
