//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Harvest
//!
//! ```text
//! Harvest 17-10-2026
//!     Source: C:\Users\me\Pictures\Spotlight\17-10-2026
//! Desktop (2 images)
//!     001 2f6c9e.jpg
//!     002 90ab77.jpg
//! Mobile (1 image)
//!     001 c0ffee.jpg
//! Skipped
//!     4 below threshold
//!     12 already archived
//!     1 unreadable: 0bad.jpg
//!
//! Archived 3 images (2 desktop, 1 mobile)
//! ```
//!
//! A harvest that found nothing prints `No new Spotlight images`.
//!
//! ## Selection
//!
//! ```text
//! Latest wallpaper → C:\Users\me\Pictures\Spotlight\17-10-2026\Desktop\2f6c9e.jpg
//!     Candidates: 41
//!     Applied: C:\Users\me\AppData\Local\spotwall\wallpaper.jpg
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::harvest::HarvestReport;
use crate::select::{Picked, Policy};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Orientation section: header with count, then indexed file names.
fn orientation_section(title: &str, files: &[PathBuf]) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", title, plural(files.len(), "image"))];
    for (i, path) in files.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), file_name(path)));
    }
    lines
}

// ============================================================================
// Harvest
// ============================================================================

/// Format a harvest report as display lines.
pub fn format_harvest_report(report: &HarvestReport) -> Vec<String> {
    if !report.kept {
        let mut lines = vec!["No new Spotlight images".to_string()];
        if !report.already_archived.is_empty() {
            lines.push(format!(
                "{}{} already archived",
                indent(1),
                report.already_archived.len()
            ));
        }
        return lines;
    }

    let day = file_name(&report.dated_dir);
    let mut lines = vec![
        format!("Harvest {}", day),
        format!("{}Source: {}", indent(1), report.dated_dir.display()),
    ];
    if !report.landscape.is_empty() {
        lines.extend(orientation_section("Desktop", &report.landscape));
    }
    if !report.portrait.is_empty() {
        lines.extend(orientation_section("Mobile", &report.portrait));
    }

    let mut skipped = Vec::new();
    if !report.too_small.is_empty() {
        skipped.push(format!("{}{} below threshold", indent(1), report.too_small.len()));
    }
    if !report.already_archived.is_empty() {
        skipped.push(format!(
            "{}{} already archived",
            indent(1),
            report.already_archived.len()
        ));
    }
    if !report.excluded.is_empty() {
        skipped.push(format!("{}{} filtered out", indent(1), report.excluded.len()));
    }
    if !report.failed.is_empty() {
        skipped.push(format!(
            "{}{} unreadable: {}",
            indent(1),
            report.failed.len(),
            report.failed.join(", ")
        ));
    }
    if !skipped.is_empty() {
        lines.push("Skipped".to_string());
        lines.extend(skipped);
    }

    lines.push(String::new());
    lines.push(format!(
        "Archived {} ({} desktop, {} mobile)",
        plural(report.archived(), "image"),
        report.landscape.len(),
        report.portrait.len()
    ));
    lines
}

pub fn print_harvest_report(report: &HarvestReport) {
    for line in format_harvest_report(report) {
        println!("{}", line);
    }
}

/// Print a harvest report as pretty JSON.
pub fn print_harvest_json(report: &HarvestReport) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

// ============================================================================
// Wallpaper commands
// ============================================================================

/// Format the outcome of a random/latest selection.
pub fn format_picked(picked: &Picked) -> Vec<String> {
    let policy = match picked.policy {
        Policy::Random => "Random",
        Policy::Latest => "Latest",
    };
    let mut lines = vec![
        format!("{} wallpaper → {}", policy, picked.path.display()),
        format!("{}Candidates: {}", indent(1), picked.candidates),
    ];
    match &picked.applied {
        Some(applied) => lines.push(format!("{}Applied: {}", indent(1), applied.display())),
        None => lines.push(format!("{}Style: no change", indent(1))),
    }
    if picked.temporary {
        lines.push(format!("{}Harvested into temporary folder", indent(1)));
    }
    lines
}

pub fn print_picked(picked: &Picked) {
    for line in format_picked(picked) {
        println!("{}", line);
    }
}

/// Format the outcome of `change-wallpaper`.
pub fn format_changed(source: &Path, applied: Option<&Path>) -> Vec<String> {
    match applied {
        Some(applied) => vec![
            format!("Wallpaper changed → {}", source.display()),
            format!("{}Applied: {}", indent(1), applied.display()),
        ],
        None => vec![format!("Wallpaper unchanged ({})", source.display())],
    }
}

pub fn print_changed(source: &Path, applied: Option<&Path>) {
    for line in format_changed(source, applied) {
        println!("{}", line);
    }
}

/// Format the outcome of `save-wallpaper`.
pub fn format_saved(what: &str, target: &Path) -> Vec<String> {
    vec![format!("Saved {} wallpaper → {}", what, target.display())]
}

pub fn print_saved(what: &str, target: &Path) {
    for line in format_saved(what, target) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> HarvestReport {
        HarvestReport {
            dated_dir: PathBuf::from("/p/Spotlight/17-10-2026"),
            new_files: 4,
            too_small: vec!["tiny".into(), "icon".into()],
            already_archived: vec!["old".into()],
            landscape: vec![
                PathBuf::from("/p/Spotlight/17-10-2026/Desktop/a.jpg"),
                PathBuf::from("/p/Spotlight/17-10-2026/Desktop/b.jpg"),
            ],
            portrait: vec![PathBuf::from("/p/Spotlight/17-10-2026/Mobile/c.jpg")],
            excluded: vec![],
            failed: vec!["bad.jpg".into()],
            kept: true,
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_handles_one() {
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(0, "image"), "0 images");
        assert_eq!(plural(3, "image"), "3 images");
    }

    #[test]
    fn harvest_report_lines() {
        let lines = format_harvest_report(&report());
        assert_eq!(
            lines,
            vec![
                "Harvest 17-10-2026",
                "    Source: /p/Spotlight/17-10-2026",
                "Desktop (2 images)",
                "    001 a.jpg",
                "    002 b.jpg",
                "Mobile (1 image)",
                "    001 c.jpg",
                "Skipped",
                "    2 below threshold",
                "    1 already archived",
                "    1 unreadable: bad.jpg",
                "",
                "Archived 3 images (2 desktop, 1 mobile)",
            ]
        );
    }

    #[test]
    fn harvest_without_skips_has_no_skipped_section() {
        let report = HarvestReport {
            too_small: vec![],
            already_archived: vec![],
            failed: vec![],
            ..report()
        };
        let lines = format_harvest_report(&report);
        assert!(!lines.iter().any(|l| l == "Skipped"));
    }

    #[test]
    fn empty_harvest_is_one_line() {
        let report = HarvestReport::default();
        assert_eq!(format_harvest_report(&report), vec!["No new Spotlight images"]);
    }

    #[test]
    fn empty_harvest_mentions_archived_count() {
        let report = HarvestReport {
            already_archived: vec!["a".into(), "b".into()],
            ..HarvestReport::default()
        };
        let lines = format_harvest_report(&report);
        assert_eq!(lines[1], "    2 already archived");
    }

    #[test]
    fn harvest_report_serializes_orientation_lists() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["landscape"].as_array().unwrap().len(), 2);
        assert_eq!(json["kept"], true);
        assert_eq!(json["failed"][0], "bad.jpg");
    }

    #[test]
    fn picked_lines() {
        let picked = Picked {
            policy: Policy::Latest,
            path: PathBuf::from("/p/a.jpg"),
            candidates: 7,
            temporary: true,
            applied: Some(PathBuf::from("/s/wallpaper.jpg")),
        };
        assert_eq!(
            format_picked(&picked),
            vec![
                "Latest wallpaper → /p/a.jpg",
                "    Candidates: 7",
                "    Applied: /s/wallpaper.jpg",
                "    Harvested into temporary folder",
            ]
        );
    }

    #[test]
    fn picked_without_apply_says_no_change() {
        let picked = Picked {
            policy: Policy::Random,
            path: PathBuf::from("/p/a.jpg"),
            candidates: 1,
            temporary: false,
            applied: None,
        };
        let lines = format_picked(&picked);
        assert_eq!(lines[0], "Random wallpaper → /p/a.jpg");
        assert_eq!(lines[2], "    Style: no change");
    }

    #[test]
    fn changed_and_saved_lines() {
        assert_eq!(
            format_changed(Path::new("/x.jpg"), Some(Path::new("/s/wallpaper.jpg"))),
            vec!["Wallpaper changed → /x.jpg", "    Applied: /s/wallpaper.jpg"]
        );
        assert_eq!(
            format_changed(Path::new("/x.jpg"), None),
            vec!["Wallpaper unchanged (/x.jpg)"]
        );
        assert_eq!(
            format_saved("desktop", Path::new("/d/copy.jpg")),
            vec!["Saved desktop wallpaper → /d/copy.jpg"]
        );
    }
}
