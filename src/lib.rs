//! # spotwall
//!
//! Harvests the Windows Spotlight wallpaper-of-the-day cache into a dated,
//! orientation-split archive and picks wallpapers out of it.
//!
//! # Architecture: Harvest, Then Select
//!
//! ```text
//! asset cache ──harvest──▶ Spotlight/<DD-MM-YYYY>/{Desktop,Mobile} ──select──▶ desktop
//! ```
//!
//! - **Harvest** copies every cache file above a size threshold that is not
//!   archived yet, classifies it by orientation and files it under today's
//!   folder. A pass that finds nothing new leaves no trace.
//! - **Select** walks the landscape side of the archive, drops anything
//!   pixel-identical to the current wallpaper, and picks one at random or
//!   the most recently written.
//!
//! The filesystem is the only store. Running a harvest every day (a
//! scheduled task is enough) grows the archive; nothing else keeps state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decode images, read dimensions, exact pixel comparison |
//! | [`layout`] | Archive folder names and traversal |
//! | [`harvest`] | Asset cache → archive pass, producing a [`harvest::HarvestReport`] |
//! | [`select`] | Random / latest wallpaper selection, temporary harvests |
//! | [`desktop`] | OS wallpaper access behind [`desktop::WallpaperHost`], apply and save helpers |
//! | [`config`] | `config.toml` loading, merging, validation; resolves [`config::Roots`] |
//! | [`args`] | Inline `styleID:` / `temp:` modifiers and save sources |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Roots and Dates
//!
//! No core function looks up a platform folder or reads the clock. The CLI
//! resolves a [`config::Roots`] and today's date once and passes both down,
//! so every pass can run against temp directories in tests.
//!
//! ## Content-Sniffed Decoding
//!
//! Spotlight assets have no extension and are archived with a `.jpg` suffix
//! whatever they really are. Decoding goes by file content, never by name.
//!
//! ## Applied Copies
//!
//! Windows keeps the applied wallpaper file open. Wallpapers are copied into
//! a private state folder before being applied, so archive files and
//! temporary harvests can always be moved or deleted.

pub mod args;
pub mod config;
pub mod desktop;
pub mod harvest;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod select;

#[cfg(test)]
pub(crate) mod test_helpers;
