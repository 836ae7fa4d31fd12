//! heatweave command-line entry point.
//!
//! # Responsibility
//! - Wire configuration, git collaborators, the editor and the paint
//!   service into the user-facing flow.
//! - Own all process exit codes; core never terminates the process.

mod wizard;

use chrono::{Local, NaiveDate, Utc};
use clap::{value_parser, Arg, ArgMatches, Command};
use heatweave_core::artifacts;
use heatweave_core::git;
use heatweave_core::heatmap::{fetch, render};
use heatweave_core::logging::{default_log_level, init_logging};
use heatweave_core::service::paint::{GitLogCountSource, LogNotifier, PaintService};
use heatweave_core::{
    compute_start_date, core_version, run_editor, Config, EditorError, EditorOutcome,
    ExecutionOutcome, FsPatternStore, Mode, PatternDocument,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logs();

    let matches = cli().get_matches();
    let result = match matches.subcommand() {
        Some(("paint", sub)) => cmd_paint(sub),
        Some(("preview", sub)) => cmd_preview(sub, &matches),
        Some(("init", _)) => cmd_init(&matches),
        _ => cmd_run(&matches),
    };

    match result {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn cli() -> Command {
    Command::new("heatweave")
        .version(core_version())
        .about("Design a 7xN commit pattern and schedule it onto a contribution heatmap")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .default_value("config.json")
                .help("Path to the tool configuration file"),
        )
        .subcommand(
            Command::new("paint")
                .about("Run one scheduler tick inside a target repository")
                .arg(
                    Arg::new("repo")
                        .long("repo")
                        .default_value(".")
                        .help("Target repository root"),
                )
                .arg(
                    Arg::new("data-dir")
                        .long("data-dir")
                        .default_value("heatmap")
                        .help("Per-day artifact directory, relative to the repo root"),
                )
                .arg(
                    Arg::new("identity")
                        .long("identity")
                        .help("Author identity for the commits-today query"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_parser(value_parser!(NaiveDate))
                        .help("Override today's date (for reruns and testing)"),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Fetch and render the remote contribution heatmap")
                .arg(Arg::new("user").long("user").help("Account to preview"))
                .arg(
                    Arg::new("weeks")
                        .long("weeks")
                        .default_value("30")
                        .value_parser(value_parser!(usize))
                        .help("Number of trailing weeks to render"),
                ),
        )
        .subcommand(Command::new("init").about("Re-run the configuration wizard"))
}

/// Default flow: configure, preview, edit, generate, push.
fn cmd_run(matches: &ArgMatches) -> Result<ExitCode, String> {
    let config_path = config_path(matches);
    let mut config = load_or_bootstrap(&config_path)?;

    let remote = git::parse_ssh_url(&config.repo_ssh_url).map_err(stringify)?;
    git::verify_ssh_access(&remote).map_err(stringify)?;
    let repo_root =
        git::ensure_repo(&config.repo_ssh_url, Path::new(&config.repo_path)).map_err(stringify)?;
    if Path::new(&config.repo_path) != repo_root.as_path() {
        config.repo_path = repo_root.display().to_string();
        if let Err(err) = config.save(&config_path) {
            warn!("could not persist resolved repo path: {err}");
        }
    }

    println!("repo: {}", repo_root.display());
    println!("{}", git::repo_summary(&repo_root));

    show_preview(&config.github_username, config.weeks.min(30));

    let today = Local::now().date_naive();
    let doc = match config.mode {
        Mode::Daily => {
            // Daily mode ignores the grid entirely; no editing session.
            let start = compute_start_date(today, Mode::Daily, false);
            PatternDocument::daily(config.daily_commit_count, config.weeks, start)
                .map_err(stringify)?
        }
        Mode::Pattern => {
            let store = FsPatternStore::new(&repo_root);
            let grid = store.load_grid_for_edit(config.weeks);
            let start = compute_start_date(today, Mode::Pattern, config.start_from_next_sunday);
            match run_editor(grid.clone()) {
                Ok(EditorOutcome::Saved(edited)) => {
                    PatternDocument::from_grid(edited, start).map_err(stringify)?
                }
                Ok(EditorOutcome::Abandoned) => {
                    println!("no changes saved");
                    return Ok(ExitCode::SUCCESS);
                }
                Err(EditorError::Surface(detail)) => {
                    // No usable terminal. Fall back to a non-interactive
                    // default document when none exists yet; otherwise
                    // leave the persisted schedule untouched.
                    warn!("editor unavailable: {detail}");
                    if store.path().exists() {
                        println!("editor unavailable ({detail}); keeping the existing schedule");
                        return Ok(ExitCode::SUCCESS);
                    }
                    println!("editor unavailable ({detail}); writing a blank default schedule");
                    PatternDocument::from_grid(grid, start).map_err(stringify)?
                }
                Err(err) => return Err(err.to_string()),
            }
        }
    };

    artifacts::write_all(&config, &doc, &repo_root).map_err(stringify)?;
    println!("generated pattern.json, workflow and agreement");

    match artifacts::auto_commit_and_push(&config, &repo_root) {
        Ok(true) => println!("pushed generated artifacts"),
        Ok(false) => println!("nothing new to commit"),
        Err(artifacts::ArtifactError::Git(err)) => {
            eprintln!("push failed: {err}");
            if let Some(hint) = git::push_failure_hint(&err) {
                eprintln!("hint: {hint}");
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.to_string()),
    }

    Ok(ExitCode::SUCCESS)
}

/// One scheduler tick: resolve today, observe, decide, apply.
fn cmd_paint(matches: &ArgMatches) -> Result<ExitCode, String> {
    let repo = PathBuf::from(arg_str(matches, "repo"));
    let data_dir = arg_str(matches, "data-dir");
    let identity = matches
        .get_one::<String>("identity")
        .cloned()
        .or_else(|| std::env::var("GITHUB_ACTOR").ok());
    // The scheduler runs in UTC; keep date resolution consistent with it.
    let today = matches
        .get_one::<NaiveDate>("date")
        .copied()
        .unwrap_or_else(|| Utc::now().date_naive());

    let source = GitLogCountSource::new(&repo, identity.clone());
    let service = PaintService::new(
        &repo,
        data_dir,
        identity.unwrap_or_default(),
        source,
        LogNotifier,
    );

    let report = service.tick(today).map_err(stringify)?;
    match report.outcome {
        ExecutionOutcome::NoOp => println!("{today}: nothing to paint"),
        ExecutionOutcome::Overrun { observed, target } => {
            // A designed terminal outcome for the day, not a failure.
            println!(
                "{today}: observed {observed} commits, target {target}; halting without writing"
            );
        }
        ExecutionOutcome::Write { units } => {
            let relative = report
                .artifact
                .as_deref()
                .unwrap_or_else(|| Path::new(""));
            git::stage(&repo, &relative.to_string_lossy()).map_err(stringify)?;
            println!(
                "{today}: appended {units} lines to {} and staged it",
                relative.display()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_preview(matches: &ArgMatches, root: &ArgMatches) -> Result<ExitCode, String> {
    let weeks = *matches
        .get_one::<usize>("weeks")
        .unwrap_or(&30);
    let user = match matches.get_one::<String>("user") {
        Some(user) => user.clone(),
        None => {
            let config = Config::load(&config_path(root))
                .map_err(stringify)?
                .ok_or("no --user given and no config file found")?;
            config.github_username
        }
    };
    show_preview(&user, weeks);
    Ok(ExitCode::SUCCESS)
}

fn cmd_init(matches: &ArgMatches) -> Result<ExitCode, String> {
    let config_path = config_path(matches);
    let config = wizard::bootstrap();
    config.save(&config_path).map_err(stringify)?;
    println!("wrote {}", config_path.display());
    Ok(ExitCode::SUCCESS)
}

/// Renders the remote heatmap; failures are warnings, never fatal.
fn show_preview(username: &str, weeks: usize) {
    if username.is_empty() {
        println!("github_username not configured; skipping heatmap preview");
        return;
    }
    match fetch::fetch_matrix(username, weeks) {
        Ok(matrix) => {
            println!("\n{username}, last {weeks} weeks:");
            for line in render::render_matrix(&matrix, render::stdout_is_tty()) {
                println!("{line}");
            }
            println!();
        }
        Err(err) => {
            warn!("heatmap preview failed: {err}");
            eprintln!("warning: {err}; continuing without a preview");
        }
    }
}

fn load_or_bootstrap(config_path: &Path) -> Result<Config, String> {
    let mut config = match Config::load(config_path).map_err(stringify)? {
        Some(config) => config,
        None => wizard::bootstrap(),
    };
    while let Err(err) = config.validate() {
        println!("{err}; re-entering setup");
        config = wizard::bootstrap();
    }
    config.save(config_path).map_err(stringify)?;
    Ok(config)
}

fn config_path(matches: &ArgMatches) -> PathBuf {
    PathBuf::from(arg_str(matches, "config"))
}

fn arg_str(matches: &ArgMatches, name: &str) -> String {
    matches
        .get_one::<String>(name)
        .cloned()
        .unwrap_or_default()
}

fn init_logs() {
    let log_dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".heatweave")
        .join("logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }
}

fn stringify(err: impl std::fmt::Display) -> String {
    err.to_string()
}
