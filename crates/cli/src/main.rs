//! git-mediate command-line tool.
//!
//! Walks the files git reports as conflicted (or the files given on the
//! command line), resolves every diff3 conflict where one side is unchanged
//! or both sides agree, writes the result back, and stages files that end up
//! fully resolved.

mod editor;
mod mediate;
mod style;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use gitmediate_core::config::{ColorMode, MediateConfig};
use gitmediate_core::git::{writes_base_section, ConflictKind, GitRepo};

use mediate::{Options, Target};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Resolve trivial diff3 merge conflicts.
#[derive(Parser, Debug)]
#[command(
    name = "git-mediate",
    version,
    about = "Resolve merge conflicts where one side is unchanged or both sides agree"
)]
struct Cli {
    /// Open the editor on each file that still has conflicts.
    #[arg(short, long)]
    editor: bool,

    /// Print a diff of each side of every unresolved conflict.
    #[arg(short, long)]
    diff: bool,

    /// Force colored output.
    #[arg(long, overrides_with = "no_color")]
    color: bool,

    /// Disable colored output.
    #[arg(long, overrides_with = "color")]
    no_color: bool,

    /// Set merge.conflictStyle to diff3 in this repository and exit.
    #[arg(short, long)]
    set_conflict_style: bool,

    /// Do not add fully resolved files to the index.
    #[arg(long)]
    no_stage: bool,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Files to mediate instead of those git reports as conflicted.
    files: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run left nothing to do.
fn run(cli: Cli) -> Result<bool> {
    let repo = match GitRepo::discover(".") {
        Ok(repo) => Some(repo),
        Err(e) if !cli.files.is_empty() => {
            // Explicit files can be mediated outside a repository.
            eprintln!("{}", style::warn(&format!("{e}; files will not be staged")));
            None
        }
        Err(e) => return Err(e).context("git-mediate must run inside a git repository"),
    };

    let config = load_config(cli.config.as_deref(), repo.as_ref())?;
    init_logging(cli.verbose, &config.mediate.log_level);
    apply_color(&cli, config.mediate.color);

    if cli.set_conflict_style {
        let repo = repo.context("--set-conflict-style needs a git repository")?;
        repo.set_conflict_style_diff3()?;
        println!("{}", style::success("merge.conflictStyle set to diff3"));
        return Ok(true);
    }

    let targets = match &repo {
        Some(repo) if cli.files.is_empty() => {
            check_conflict_style(repo);
            conflicted_targets(repo)?
        }
        _ => explicit_targets(&cli.files, repo.as_ref()),
    };

    let options = Options {
        dump_diffs: cli.diff || config.mediate.dump_diffs,
        stage: !cli.no_stage && config.mediate.stage_resolved,
        editor: cli
            .editor
            .then(|| editor::editor_command(config.mediate.editor.as_deref())),
    };

    let summary = mediate::mediate_all(&targets, repo.as_ref(), &options);
    Ok(summary.is_clean())
}

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>, repo: Option<&GitRepo>) -> Result<MediateConfig> {
    let config = match path {
        Some(path) => {
            MediateConfig::load_from_file(path).context("failed to load configuration file")?
        }
        None => MediateConfig::discover(repo.map(GitRepo::workdir))
            .context("failed to load configuration file")?,
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_logging(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn apply_color(cli: &Cli, configured: ColorMode) {
    let mode = if cli.color {
        ColorMode::Always
    } else if cli.no_color {
        ColorMode::Never
    } else {
        configured
    };
    match mode {
        // console already follows terminal detection.
        ColorMode::Auto => {}
        ColorMode::Always => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        }
        ColorMode::Never => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
    }
}

fn check_conflict_style(repo: &GitRepo) {
    match repo.conflict_style() {
        Ok(current) if writes_base_section(current.as_deref()) => {}
        Ok(current) => eprintln!(
            "{}",
            style::warn(&format!(
                "merge.conflictStyle is {}, not diff3; run `git mediate --set-conflict-style`",
                current.as_deref().unwrap_or("unset")
            ))
        ),
        Err(e) => warn!(error = %e, "could not read merge.conflictStyle"),
    }
}

// ---------------------------------------------------------------------------
// Target selection
// ---------------------------------------------------------------------------

fn conflicted_targets(repo: &GitRepo) -> Result<Vec<Target>> {
    let files = repo
        .conflicted_files()
        .context("failed to read conflicts from the git index")?;

    let mut targets = Vec::with_capacity(files.len());
    for file in files {
        let display = file.path.display().to_string();
        if file.kind == ConflictKind::DeleteModify {
            eprintln!(
                "{}",
                style::warn(&format!("{display}: deleted on one side, skipping"))
            );
            continue;
        }
        targets.push(Target {
            display,
            path: repo.workdir().join(&file.path),
            stage_path: Some(file.path),
        });
    }
    Ok(targets)
}

/// Only files the index lists as conflicted get a stage path; anything else
/// is mediated in place and never added.
fn explicit_targets(files: &[PathBuf], repo: Option<&GitRepo>) -> Vec<Target> {
    let conflicted: HashSet<PathBuf> = match repo.map(GitRepo::conflicted_files) {
        Some(Ok(listed)) => listed.into_iter().map(|f| f.path).collect(),
        Some(Err(e)) => {
            warn!(error = %e, "could not read index conflicts; files will not be staged");
            HashSet::new()
        }
        None => HashSet::new(),
    };

    files
        .iter()
        .map(|path| Target {
            display: path.display().to_string(),
            path: path.clone(),
            stage_path: repo
                .and_then(|r| r.relative_path(path))
                .filter(|rel| conflicted.contains(rel)),
        })
        .collect()
}
