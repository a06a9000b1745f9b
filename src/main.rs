use clap::{Parser, Subcommand};
use spotwall::args::{self, ArgsError, SaveSource};
use spotwall::config::{self, Config};
use spotwall::desktop::{self, Style, WallpaperHost};
use spotwall::harvest::{self, HarvestOptions};
use spotwall::imaging::RustBackend;
use spotwall::output;
use spotwall::select::{self, Policy, SelectOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "spotwall")]
#[command(about = "Harvest, curate and apply Windows Spotlight wallpapers")]
#[command(long_about = "\
Harvest, curate and apply Windows Spotlight wallpapers

Spotlight images are archived by day and orientation:

  <Pictures>/Spotlight/
  └── 17-10-2026/
      ├── Desktop/        # landscape images
      └── Mobile/         # portrait images (square counts as portrait)

Run 'spotwall save-spotlight-images' regularly to grow the archive, and
'spotwall set-random-wallpaper' or 'set-latest-wallpaper' to pick from it.

Wallpaper styles (styleID:<n>, --style <n>):
  0 Stretched, 1 Fill, 2 Fit, 3 Span, 4 Tile, 5 Center, 6 NoChange

Logging goes to stderr; set RUST_LOG=debug for per-file detail.
Run 'spotwall gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/spotwall/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply an image as the desktop wallpaper (lock screen image if no path)
    #[command(visible_alias = "cw")]
    ChangeWallpaper {
        path: Option<PathBuf>,
        /// Wallpaper style id (default: selection.style from config)
        #[arg(long)]
        style: Option<u32>,
    },
    /// Copy the current desktop or lock screen wallpaper
    #[command(visible_alias = "sw")]
    SaveWallpaper {
        /// `desktop` or `lockscreen`
        #[arg(allow_hyphen_values = true)]
        source: Option<String>,
        /// Target file or folder (default: Pictures folder)
        destination: Option<PathBuf>,
    },
    /// Archive new Spotlight images
    #[command(visible_aliases = ["si", "save", "save-images"])]
    SaveSpotlightImages {
        /// Archive root (default: save_root from config, else Pictures folder)
        path: Option<PathBuf>,
        /// Minimum asset size in KiB
        #[arg(long)]
        threshold: Option<u64>,
        /// Keep landscape images only
        #[arg(long, conflicts_with = "no_desktop")]
        no_mobile: bool,
        /// Keep portrait images only
        #[arg(long)]
        no_desktop: bool,
        /// Print the harvest report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply a random archived wallpaper: [PATH] [styleID:<n>] [temp:<bool>]
    #[command(visible_alias = "srw")]
    SetRandomWallpaper {
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// Apply the newest archived wallpaper: [PATH] [styleID:<n>] [temp:<bool>]
    #[command(visible_alias = "slw")]
    SetLatestWallpaper {
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        _ => config::load_config(cli.config.as_deref())?,
    };
    let roots = config.roots();
    let backend = RustBackend::new();
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::ChangeWallpaper { path, style } => {
            let style = match style {
                Some(id) => Style::from_id(id)
                    .ok_or_else(|| ArgsError::InvalidModifier(format!("--style {id}")))?,
                None => config.style(),
            };
            let host = desktop::system_host();
            let (source, applied) = match path {
                Some(path) => {
                    let applied = desktop::apply_wallpaper(&host, &roots.state_dir, &path, style)?;
                    (path, applied)
                }
                None => desktop::apply_lock_screen_as_desktop(&host, &roots.state_dir, style)?,
            };
            output::print_changed(&source, applied.as_deref());
        }
        Command::SaveWallpaper {
            source,
            destination,
        } => {
            let source = SaveSource::parse(source.as_deref())?;
            let destination = destination.unwrap_or_else(|| roots.picture_dir.clone());
            save_current(source, &destination)?;
        }
        Command::SaveSpotlightImages {
            path,
            threshold,
            no_mobile,
            no_desktop,
            json,
        } => {
            let options = HarvestOptions {
                threshold_kb: threshold.unwrap_or(config.threshold_kb),
                only_desktop: no_mobile,
                only_mobile: no_desktop,
            };
            let report = harvest::save_to(&roots, path.as_deref(), today, &options, &backend)?;
            if json {
                output::print_harvest_json(&report)?;
            } else {
                output::print_harvest_report(&report);
            }
        }
        Command::SetRandomWallpaper { args } => {
            set_from_archive(Policy::Random, &args, &config, today, &backend)?;
        }
        Command::SetLatestWallpaper { args } => {
            set_from_archive(Policy::Latest, &args, &config, today, &backend)?;
        }
        // printed before config loading
        Command::GenConfig => {}
    }

    Ok(())
}

fn save_current(source: SaveSource, destination: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let host = desktop::system_host();
    let (what, current) = match source {
        SaveSource::Desktop => ("desktop", host.desktop_wallpaper()?),
        SaveSource::LockScreen => ("lock screen", host.lock_screen_wallpaper()?),
    };
    let now = chrono::Local::now().naive_local();
    let target = desktop::save_wallpaper(&current, destination, now)?;
    output::print_saved(what, &target);
    Ok(())
}

fn set_from_archive(
    policy: Policy,
    raw: &[String],
    config: &Config,
    today: chrono::NaiveDate,
    backend: &RustBackend,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = args::parse_selection_args(raw, config.style(), config.selection.temporary)?;
    let options = SelectOptions {
        load_path: parsed.path,
        temporary: parsed.temporary,
        threshold_kb: config.threshold_kb,
        ..SelectOptions::new(policy)
    };
    let host = desktop::system_host();
    let picked = select::set_spotlight_wallpaper(
        &host,
        &config.roots(),
        &options,
        parsed.style,
        today,
        backend,
        &mut rand::rng(),
    )?;
    output::print_picked(&picked);
    Ok(())
}
