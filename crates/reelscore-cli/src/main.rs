//! reelscore CLI - The `reelscore` command.
//!
//! Composes a film score for a project file by matching every scene to a
//! library piece, cutting the piece at its rehearsal marks to the scene's
//! length, and writing the assembled MusicXML document.
//!
//! # Architecture
//!
//! The CLI binary orchestrates the following crates:
//!
//! - **reelscore-notation**: MusicXML document model and codec
//! - **reelscore-compose**: matching, scheduling and assembly
//! - **reelscore-std**: standard library of pieces

mod config;
mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use reelscore_compose::{compose_project, library, matcher, repeats, tempo, Project};
use reelscore_notation::{codec, DirectionType, Measure};
use std::path::{Path, PathBuf};

/// reelscore - Film score composition from photoplay music
#[derive(Parser, Debug)]
#[command(name = "reelscore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compose film scores from a library of photoplay pieces", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Library selection shared by the commands that search pieces
#[derive(clap::Args, Debug)]
struct LibraryArgs {
    /// Path to config file (default: platform config dir)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Additional library directories, searched after the configured ones
    #[arg(short = 'L', long = "library", value_name = "DIR")]
    library_dirs: Vec<PathBuf>,

    /// Do not search the built-in standard library
    #[arg(long)]
    no_standard: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose the score for a project file
    Compose {
        /// Path to the project .toml file
        #[arg(value_name = "PROJECT")]
        project: PathBuf,

        /// Output MusicXML file (default: derived from the project name)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        library: LibraryArgs,
    },

    /// Rank library pieces against a scene description
    Match {
        /// Scene keywords
        #[arg(value_name = "DESCRIPTION", required = true)]
        description: Vec<String>,

        /// Number of pieces listed per source
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,

        #[command(flatten)]
        library: LibraryArgs,
    },

    /// Show how a piece is cut into sections
    Sections {
        /// Path to a .musicxml, .xml or .mxl file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Create a default configuration file
    Init {
        /// Also write an example project to this path
        #[arg(value_name = "PROJECT")]
        project: Option<PathBuf>,
    },

    /// Show the configuration file path
    ConfigPath,

    /// Write the built-in standard library to a directory
    ExportLibrary {
        /// Target directory (default: platform data dir)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    match args.command {
        Commands::Compose {
            project,
            output,
            library,
        } => compose(&project, output, &library),
        Commands::Match {
            description,
            limit,
            library,
        } => rank_pieces(&description.join(" "), limit, &library),
        Commands::Sections { file } => show_sections(&file),
        Commands::Init { project } => init(project),
        Commands::ConfigPath => {
            let path = Config::config_path()?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::ExportLibrary { dir } => export_library(dir),
        Commands::Version => {
            println!("reelscore {}", env!("CARGO_PKG_VERSION"));
            println!("Film score composition from photoplay music");
            println!();
            println!("Standard library: {} piece(s)", reelscore_std::piece_names().len());
            Ok(())
        }
    }
}

/// Load the configuration and apply command line overrides.
fn load_config(args: &LibraryArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(),
    };

    if args.no_standard {
        config.library.standard = false;
    }
    config
        .library
        .directories
        .extend(args.library_dirs.iter().cloned());
    Ok(config)
}

fn compose(project_path: &Path, output: Option<PathBuf>, args: &LibraryArgs) -> Result<()> {
    let config = load_config(args)?;
    let project = Project::load(project_path)
        .with_context(|| format!("Failed to load project {}", project_path.display()))?;

    let library = config.build_library();
    if library.is_empty() {
        anyhow::bail!(
            "No library configured\n\
            Enable the standard library or add a directory with --library <DIR>"
        );
    }

    log::info!("reelscore compose");
    log::info!("=================");
    log::info!("Project: {} ({} scene(s))", project.name, project.scenes.len());
    log::info!("Length:  {}s", project.duration().as_secs());

    let composition = compose_project(&library, &project);
    for (i, piece) in composition.pieces.iter().enumerate() {
        log::info!("  {}. {} - {}", i + 1, piece.title, piece.composer);
    }

    let score = composition.into_score();
    let output = output.unwrap_or_else(|| config.output_path(&score));
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    codec::write_score(&output, &score)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!(
        "Wrote {} measure(s) to {}",
        score.measures().len(),
        output.display()
    );
    Ok(())
}

fn rank_pieces(description: &str, limit: usize, args: &LibraryArgs) -> Result<()> {
    let config = load_config(args)?;
    let sources = config.sources();
    if sources.is_empty() {
        anyhow::bail!("No library configured");
    }

    for source in sources {
        let pieces = source.pieces();
        let texts: Vec<String> = pieces.iter().map(library::match_text).collect();

        println!("{}:", source.label());
        if pieces.is_empty() {
            println!("  (no pieces)");
            continue;
        }
        for ranked in matcher::rank(description, &texts).into_iter().take(limit) {
            let piece = &pieces[ranked.index];
            println!(
                "  {:>4}  {} - {}",
                ranked.score,
                piece.title(),
                piece.composer()
            );
        }
    }
    Ok(())
}

fn show_sections(file: &Path) -> Result<()> {
    let score =
        codec::read_score(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let measures = repeats::linearize(score.measures());

    let time = tempo::first_time_signature(&measures);
    let metronome = tempo::scene_metronome(&measures, 0);
    let beats = tempo::beats_per_measure(time, &metronome);

    println!("{} - {}", score.title(), score.composer());
    println!(
        "{} measure(s) played straight through, {} at {} = {}, {} beat(s) per measure",
        measures.len(),
        time,
        metronome.beat_unit,
        metronome.per_minute,
        beats
    );

    for (i, section) in reelscore_compose::extract_sections(&measures).iter().enumerate() {
        let first = &measures[section.start];
        let last = &measures[section.end - 1];
        let mark = rehearsal_mark(first).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>2}. [{}] measures {}..{} ({} measure(s))",
            i + 1,
            mark,
            first.number,
            last.number,
            section.len()
        );
    }
    Ok(())
}

/// Text of the first rehearsal mark in `measure`.
fn rehearsal_mark(measure: &Measure) -> Option<String> {
    measure
        .directions()
        .flat_map(|d| d.types.iter())
        .find_map(|t| match t {
            DirectionType::Rehearsal(runs) => Some(runs.iter().map(|r| r.value.as_str()).collect()),
            _ => None,
        })
}

fn init(project: Option<PathBuf>) -> Result<()> {
    let path = Config::create_default_config_file()?;
    println!("Created default config at: {}", path.display());

    if let Some(project_path) = project {
        if project_path.exists() {
            anyhow::bail!("Refusing to overwrite {}", project_path.display());
        }
        Project::example()
            .save(&project_path)
            .with_context(|| format!("Failed to write {}", project_path.display()))?;
        println!("Created example project at: {}", project_path.display());
    }
    Ok(())
}

fn export_library(dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => Config::default_library_dir()?,
    };
    let written = reelscore_std::extract_library(&dir)
        .with_context(|| format!("Failed to export library to {}", dir.display()))?;
    println!("Exported {} piece(s) to {}", written, dir.display());
    println!("Add it to [library] directories in the config to edit the pieces");
    Ok(())
}
