//! First-run configuration wizard.
//!
//! # Responsibility
//! - Collect a complete `Config` interactively, one prompt per field,
//!   re-asking until each answer parses.
//!
//! # Invariants
//! - Every prompt offers a default; empty input accepts it.
//! - The SSH URL is parsed before being accepted, and its owner seeds the
//!   username default.

use heatweave_core::git::parse_ssh_url;
use heatweave_core::model::pattern::{Mode, MAX_WEEKS, MIN_WEEKS};
use heatweave_core::Config;
use std::io::{self, Write};

const INTRO: &str = "\
first-run setup
  1. Create the target repository on your git host and register an SSH key
     (verify with `ssh -T git@<host>`).
  2. Copy the repository's SSH URL (git@host:owner/repo.git).
  3. Pick a local directory for the working copy; if it does not exist the
     tool clones into it automatically.";

/// Runs the interactive wizard and returns a normalized config.
pub fn bootstrap() -> Config {
    println!("{INTRO}");

    let (repo_ssh_url, suggested_owner) = prompt_ssh_url();
    let repo_path = prompt("local repository path (cloned if missing)", "./heatmap-repo");
    let github_username = prompt("github username", &suggested_owner);
    let committer_name = prompt("committer name (git)", "Heatmap Bot");
    let committer_email = prompt("committer email (git)", "bot@example.com");
    let data_dir = prompt("data directory (relative to repo root)", "heatmap");
    let mode = prompt_mode();
    let daily_commit_count = if mode == Mode::Daily {
        prompt_int("commits per day", 3, 1, 100)
    } else {
        0
    };
    let start_from_next_sunday = mode == Mode::Pattern
        && prompt_bool("start from the next Sunday? (Y/n)", true);
    let weeks = prompt_int(
        "grid width in weeks (1-104)",
        52,
        MIN_WEEKS as i64,
        MAX_WEEKS as i64,
    ) as usize;

    let mut config = Config {
        repo_ssh_url,
        repo_path,
        github_username,
        committer_name,
        committer_email,
        data_dir,
        weeks,
        start_from_next_sunday,
        mode,
        daily_commit_count: daily_commit_count as u32,
    };
    config.normalize();
    config
}

fn prompt(message: &str, default: &str) -> String {
    print!("{message} [{default}]: ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return default.to_string();
    }
    let answer = answer.trim();
    if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    }
}

fn prompt_bool(message: &str, default: bool) -> bool {
    loop {
        let raw = prompt(message, if default { "Y" } else { "N" }).to_lowercase();
        match raw.as_str() {
            "y" | "yes" | "true" | "1" => return true,
            "n" | "no" | "false" | "0" => return false,
            _ => println!("please answer Y or N"),
        }
    }
}

fn prompt_int(message: &str, default: i64, min: i64, max: i64) -> i64 {
    loop {
        let raw = prompt(message, &default.to_string());
        match raw.parse::<i64>() {
            Ok(value) if (min..=max).contains(&value) => return value,
            Ok(_) => println!("please enter a number between {min} and {max}"),
            Err(_) => println!("please enter a whole number"),
        }
    }
}

fn prompt_mode() -> Mode {
    loop {
        let raw = prompt("mode: pattern grid or fixed daily count? (pattern/daily)", "pattern");
        match raw.to_lowercase().as_str() {
            "pattern" | "p" => return Mode::Pattern,
            "daily" | "d" => return Mode::Daily,
            _ => println!("please answer pattern or daily"),
        }
    }
}

fn prompt_ssh_url() -> (String, String) {
    loop {
        let url = prompt("repository SSH URL", "git@github.com:username/heatmap.git");
        match parse_ssh_url(&url) {
            Ok(remote) => return (url, remote.owner),
            Err(err) => println!("{err}"),
        }
    }
}
