//! Windows wallpaper host: registry for reads, `SystemParametersInfoW` for writes.

use super::{DesktopError, Style, WallpaperHost};
use std::ffi::{OsStr, c_void};
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
use windows::Win32::System::Registry::{
    HKEY_CURRENT_USER, REG_SZ, RRF_RT_REG_SZ, RegGetValueW, RegSetKeyValueW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    SPI_SETDESKWALLPAPER, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SystemParametersInfoW,
};
use windows::core::{PCWSTR, w};

const DESKTOP_KEY: PCWSTR = w!("Control Panel\\Desktop");
const LOCK_SCREEN_KEY: PCWSTR =
    w!("SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Lock Screen\\Creative");

/// Host backed by the current user's Windows settings.
#[derive(Debug, Default)]
pub struct WindowsHost;

fn wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

fn os_error(e: windows::core::Error) -> DesktopError {
    DesktopError::Os(e.to_string())
}

/// Read a `REG_SZ` value under `HKEY_CURRENT_USER`. `None` if absent or empty.
fn read_user_string(subkey: PCWSTR, value: PCWSTR) -> Result<Option<String>, DesktopError> {
    let mut len: u32 = 0;
    let status = unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            subkey,
            value,
            RRF_RT_REG_SZ,
            None,
            None,
            Some(&mut len as *mut u32),
        )
    };
    if status == ERROR_FILE_NOT_FOUND {
        return Ok(None);
    }
    status.ok().map_err(os_error)?;

    let mut buf = vec![0u16; (len as usize).div_ceil(2)];
    let status = unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            subkey,
            value,
            RRF_RT_REG_SZ,
            None,
            Some(buf.as_mut_ptr().cast::<c_void>()),
            Some(&mut len as *mut u32),
        )
    };
    status.ok().map_err(os_error)?;

    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    let text = String::from_utf16_lossy(&buf[..end]);
    Ok((!text.trim().is_empty()).then_some(text))
}

fn write_user_string(subkey: PCWSTR, value: PCWSTR, data: &str) -> Result<(), DesktopError> {
    let data = wide(OsStr::new(data));
    let status = unsafe {
        RegSetKeyValueW(
            HKEY_CURRENT_USER,
            subkey,
            value,
            REG_SZ.0,
            Some(data.as_ptr().cast::<c_void>()),
            (data.len() * std::mem::size_of::<u16>()) as u32,
        )
    };
    status.ok().map_err(os_error)
}

impl WallpaperHost for WindowsHost {
    fn desktop_wallpaper(&self) -> Result<PathBuf, DesktopError> {
        read_user_string(DESKTOP_KEY, w!("WallPaper"))?
            .map(PathBuf::from)
            .ok_or_else(|| DesktopError::Os("no desktop wallpaper is set".into()))
    }

    fn lock_screen_wallpaper(&self) -> Result<PathBuf, DesktopError> {
        read_user_string(LOCK_SCREEN_KEY, w!("LandscapeAssetPath"))?
            .map(PathBuf::from)
            .ok_or(DesktopError::LockScreenUnavailable)
    }

    fn set_desktop_wallpaper(&self, path: &Path, style: Style) -> Result<(), DesktopError> {
        let Some((wallpaper_style, tile)) = style.registry_values() else {
            return Ok(());
        };
        write_user_string(
            DESKTOP_KEY,
            w!("WallpaperStyle"),
            &wallpaper_style.to_string(),
        )?;
        write_user_string(DESKTOP_KEY, w!("TileWallpaper"), if tile { "1" } else { "0" })?;

        let mut path = wide(path.as_os_str());
        unsafe {
            SystemParametersInfoW(
                SPI_SETDESKWALLPAPER,
                0,
                Some(path.as_mut_ptr().cast::<c_void>()),
                SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
            )
        }
        .map_err(os_error)
    }
}
