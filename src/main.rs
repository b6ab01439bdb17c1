//! kiloview - a minimal raw-mode terminal text viewer
//!
//! Puts the terminal into raw mode, loads a file into memory and shows a
//! scrollable view of it.
//!
//! # Quick Start
//!
//! ```text
//! kiloview               # Empty buffer with the version banner
//! kiloview notes.txt     # View a file
//! ```
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Arrow keys | Move the cursor |
//! | PageUp/PageDown | Move a screen up/down |
//! | Home/End | Left edge / right edge of the screen |
//! | Ctrl+Q | Quit |

mod config;
mod core;
mod editor;
mod error;
mod ui;

use std::env;
use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    /// File to view
    path: Option<PathBuf>,
}

/// What the command line asks for
#[derive(Debug, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

fn print_help() {
    eprintln!("kiloview {} - A minimal terminal text viewer", VERSION);
    eprintln!();
    eprintln!("Usage: kiloview [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Arrows                Move the cursor");
    eprintln!("  PageUp/PageDown       Move one screen");
    eprintln!("  Home/End              Screen left/right edge");
    eprintln!("  Ctrl+Q                Quit");
    eprintln!();
    eprintln!("Configuration: ~/.kiloview/config.toml");
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut options = Options::default();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--version" => return Ok(Command::Version),
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("Unknown argument: {}. Use -h for help.", flag));
            }
            path => {
                if options.path.is_some() {
                    return Err(format!(
                        "Unexpected argument: {}. Only one file can be viewed.",
                        path
                    ));
                }
                options.path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Command::Run(options))
}

/// Log to `~/.kiloview/kiloview.log`; the terminal belongs to the renderer.
fn init_logging(config: &Config) {
    let log_path = config::data_dir()
        .map(|dir| dir.join("kiloview.log"))
        .unwrap_or_else(|| PathBuf::from("kiloview.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() {
    let command = match parse_args(env::args().skip(1)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(2);
        }
    };

    let options = match command {
        Command::Help => {
            print_help();
            return;
        }
        Command::Version => {
            eprintln!("kiloview {}", VERSION);
            return;
        }
        Command::Run(options) => options,
    };

    let (config, config_error) = Config::load();
    init_logging(&config);
    if let Some(e) = config_error {
        warn!("Using default configuration: {}", e);
    }

    info!("kiloview {} starting", VERSION);

    // `run` restores the terminal and clears the screen before returning,
    // so the diagnostic lands on a cooked terminal.
    if let Err(e) = run(options, config) {
        error!("Fatal: {:#}", e);
        eprintln!("kiloview: {:#}", e);
        std::process::exit(1);
    }

    info!("kiloview exited cleanly");
}

#[cfg(unix)]
fn run(options: Options, config: Config) -> anyhow::Result<()> {
    use anyhow::Context;

    use crate::core::terminal::{StdinSource, TerminalSession};
    use crate::core::Document;
    use crate::editor::{self, EditorState};
    use crate::ui::{KeyDecoder, Renderer};

    let mut session = TerminalSession::acquire().context("Failed to enter raw mode")?;
    let mut stdout = std::io::stdout();

    let result = (|| -> anyhow::Result<()> {
        let extent = session.query_extent()?;
        info!("Viewport: {}x{}", extent.cols, extent.rows);

        let document = match &options.path {
            Some(path) => {
                let lines = crate::core::document::read_lines(path)?;
                info!("Opened {} ({} lines)", path.display(), lines.len());
                Document::load(lines)
            }
            None => Document::default(),
        };

        let renderer = Renderer::new(config.view.row_marker.clone());
        let mut editor = EditorState::new(document, extent, renderer);
        let mut decoder = KeyDecoder::new(StdinSource::new());
        editor.run(&mut decoder, &mut stdout, &mut session)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = editor::abort(&mut session, &mut stdout);
    }
    drop(session);
    result
}

#[cfg(not(unix))]
fn run(_options: Options, _config: Config) -> anyhow::Result<()> {
    anyhow::bail!("raw terminal mode is only supported on Unix terminals")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse_args(args(&[])), Ok(Command::Run(Options::default())));
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_args(args(&["notes.txt"])),
            Ok(Command::Run(Options {
                path: Some(PathBuf::from("notes.txt")),
            }))
        );
    }

    #[test]
    fn test_parse_flags() {
        assert_eq!(parse_args(args(&["-h"])), Ok(Command::Help));
        assert_eq!(parse_args(args(&["file", "--version"])), Ok(Command::Version));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["a.txt", "b.txt"])).is_err());
    }
}
