//! Free-form arguments that clap does not model.
//!
//! The selection commands take inline modifiers alongside an optional path:
//!
//! ```text
//! spotwall set-random-wallpaper [PATH] [styleID:<0-6>] [temp:<true|false>]
//! ```
//!
//! Modifier keys are case-insensitive and may appear in any order. Without a
//! modifier the configured defaults apply.

use crate::desktop::Style;
use std::path::PathBuf;
use thiserror::Error;

const STYLE_PREFIX: &str = "styleid:";
const TEMP_PREFIX: &str = "temp:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgsError {
    #[error("Unrecognized option {0}")]
    UnrecognizedOption(String),
    #[error("No source specified, expected `desktop` or `lockscreen`")]
    SourceNotSpecified,
    #[error("Invalid modifier {0}")]
    InvalidModifier(String),
}

/// Parsed arguments of `set-random-wallpaper` / `set-latest-wallpaper`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionArgs {
    pub path: Option<PathBuf>,
    pub style: Style,
    pub temporary: bool,
}

/// Parse selection arguments on top of the configured `style` and `temporary`.
pub fn parse_selection_args(
    args: &[String],
    style: Style,
    temporary: bool,
) -> Result<SelectionArgs, ArgsError> {
    let mut parsed = SelectionArgs {
        path: None,
        style,
        temporary,
    };
    for arg in args {
        let arg = arg.trim();
        if let Some(value) = strip_prefix_ignore_case(arg, STYLE_PREFIX) {
            parsed.style = value
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(Style::from_id)
                .ok_or_else(|| ArgsError::InvalidModifier(arg.to_string()))?;
        } else if let Some(value) = strip_prefix_ignore_case(arg, TEMP_PREFIX) {
            parsed.temporary = match value.trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => return Err(ArgsError::InvalidModifier(arg.to_string())),
            };
        } else if arg.starts_with('-') || parsed.path.is_some() {
            return Err(ArgsError::UnrecognizedOption(arg.to_string()));
        } else if !arg.is_empty() {
            parsed.path = Some(PathBuf::from(arg));
        }
    }
    Ok(parsed)
}

fn strip_prefix_ignore_case<'a>(arg: &'a str, prefix: &str) -> Option<&'a str> {
    let head = arg.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &arg[prefix.len()..])
}

/// Which wallpaper `save-wallpaper` copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveSource {
    Desktop,
    LockScreen,
}

impl SaveSource {
    pub fn parse(source: Option<&str>) -> Result<Self, ArgsError> {
        let source = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ArgsError::SourceNotSpecified)?;
        match source.to_ascii_lowercase().as_str() {
            "desktop" | "d" | "-d" | "--desktop" => Ok(SaveSource::Desktop),
            "lockscreen" | "l" | "-l" | "--lockscreen" => Ok(SaveSource::LockScreen),
            _ => Err(ArgsError::UnrecognizedOption(source.to_string())),
        }
    }
}
