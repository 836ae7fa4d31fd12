//! Git and SSH command-line collaborators.
//!
//! # Responsibility
//! - Wrap the `git` binary for clone, staging, commit, push and the
//!   commits-per-day observation query.
//! - Parse SSH remote URLs and verify SSH access before any clone.
//!
//! # Invariants
//! - Wrappers never hold state; every call shells out fresh.
//! - A missing `git`/`ssh` binary is a distinct, actionable error rather
//!   than a generic I/O failure.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub type GitResult<T> = Result<T, GitError>;

#[derive(Debug)]
pub enum GitError {
    /// `git` or `ssh` is not installed or not on PATH.
    MissingBinary(&'static str),
    /// Spawning the child process failed for a non-PATH reason.
    Io(io::Error),
    /// The command ran but exited unsuccessfully.
    Command {
        command: String,
        code: Option<i32>,
        output: String,
    },
    /// The configured remote URL is not a recognized SSH form.
    InvalidSshUrl(String),
    /// `ssh -T` did not authenticate; carries human guidance.
    SshAccess(String),
    /// The target path exists, is non-empty and is not a git repository.
    WorkdirNotEmpty(PathBuf),
}

impl Display for GitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBinary(name) => {
                write!(f, "`{name}` not found; install it and ensure it is on PATH")
            }
            Self::Io(err) => write!(f, "failed to run command: {err}"),
            Self::Command {
                command,
                code,
                output,
            } => {
                write!(f, "`{command}` failed")?;
                if let Some(code) = code {
                    write!(f, " (exit code {code})")?;
                }
                if !output.trim().is_empty() {
                    write!(f, ": {}", output.trim())?;
                }
                Ok(())
            }
            Self::InvalidSshUrl(detail) => write!(f, "invalid SSH URL: {detail}"),
            Self::SshAccess(detail) => write!(f, "SSH access check failed: {detail}"),
            Self::WorkdirNotEmpty(path) => write!(
                f,
                "{} exists but is not a git repository; pick another path or empty it",
                path.display()
            ),
        }
    }
}

impl Error for GitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Parsed SSH remote coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshRemote {
    pub user: String,
    pub host: String,
    pub owner: String,
    pub repo: String,
}

/// Parses `git@host:owner/repo.git` or `ssh://user@host/owner/repo` forms.
pub fn parse_ssh_url(url: &str) -> GitResult<SshRemote> {
    let url = url.trim();
    if url.is_empty() {
        return Err(GitError::InvalidSshUrl(String::from("URL is empty")));
    }

    let (user, host, path) = if let Some(rest) = url.strip_prefix("ssh://") {
        let (authority, path) = rest.split_once('/').ok_or_else(|| {
            GitError::InvalidSshUrl(String::from("ssh:// URL needs a host and a path"))
        })?;
        let (user, host) = match authority.split_once('@') {
            Some((user, host)) => (user.to_string(), host.to_string()),
            None => (String::from("git"), authority.to_string()),
        };
        (user, host, path.to_string())
    } else if url.contains('@') && url.contains(':') {
        let (user_host, path) = url
            .split_once(':')
            .ok_or_else(|| GitError::InvalidSshUrl(String::from("expected user@host:path")))?;
        let (user, host) = user_host
            .split_once('@')
            .ok_or_else(|| GitError::InvalidSshUrl(String::from("expected user@host:path")))?;
        (user.to_string(), host.to_string(), path.to_string())
    } else {
        return Err(GitError::InvalidSshUrl(String::from(
            "only git@host:path or ssh://host/path forms are supported",
        )));
    };

    if host.is_empty() {
        return Err(GitError::InvalidSshUrl(String::from("missing host name")));
    }

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path
        .split_once('/')
        .ok_or_else(|| GitError::InvalidSshUrl(String::from("path must be owner/repo")))?;
    if owner.is_empty() {
        return Err(GitError::InvalidSshUrl(String::from("missing owner")));
    }

    Ok(SshRemote {
        user: if user.is_empty() {
            String::from("git")
        } else {
            user
        },
        host,
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// Verifies that SSH authentication to the remote host works.
///
/// Runs `ssh -T` in batch mode; the remote is expected to answer with a
/// "successfully authenticated" banner even though it refuses a shell.
pub fn verify_ssh_access(remote: &SshRemote) -> GitResult<()> {
    let target = format!("{}@{}", remote.user, remote.host);
    let result = Command::new("ssh")
        .args([
            "-T",
            &target,
            "-o",
            "BatchMode=yes",
            "-o",
            "StrictHostKeyChecking=accept-new",
        ])
        .output();
    let output = match result {
        Ok(output) => output,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(GitError::MissingBinary("ssh"));
        }
        Err(err) => return Err(GitError::Io(err)),
    };

    let combined = combined_output(&output);
    let lower = combined.to_lowercase();
    if lower.contains("successfully authenticated") {
        return Ok(());
    }

    let guidance = if lower.contains("permission denied") {
        format!(
            "{} rejected the public key; add or update your key, then verify with `ssh -T {target}`",
            remote.host
        )
    } else if lower.contains("could not resolve hostname") {
        format!("cannot resolve host {}; check network or proxy settings", remote.host)
    } else if lower.contains("host key verification failed") {
        format!("host key not trusted; run `ssh -T {target}` once to accept the fingerprint")
    } else {
        format!("run `ssh -T {target}` manually for details: {}", combined.trim())
    };
    Err(GitError::SshAccess(guidance))
}

/// Runs a git subcommand inside `repo`, capturing output.
pub fn run_git(repo: &Path, args: &[&str]) -> GitResult<Output> {
    match Command::new("git").args(args).current_dir(repo).output() {
        Ok(output) => Ok(output),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(GitError::MissingBinary("git")),
        Err(err) => Err(GitError::Io(err)),
    }
}

/// Runs a git subcommand and requires success, returning stdout.
pub fn git_expect(repo: &Path, args: &[&str]) -> GitResult<String> {
    let output = run_git(repo, args)?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(command_error("git", args, &output))
    }
}

/// Ensures a local clone of the remote exists at `path`.
///
/// An existing `.git` directory wins; a non-empty non-repo directory is
/// refused; otherwise the remote is cloned over SSH.
pub fn ensure_repo(ssh_url: &str, path: &Path) -> GitResult<PathBuf> {
    if path.join(".git").exists() {
        return canonical(path);
    }

    if path.exists() {
        let non_empty = path
            .read_dir()
            .map_err(GitError::Io)?
            .next()
            .is_some();
        if non_empty {
            return Err(GitError::WorkdirNotEmpty(path.to_path_buf()));
        }
    } else if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(GitError::Io)?;
        }
    }

    let path_str = path.to_string_lossy();
    let args = ["clone", ssh_url, path_str.as_ref()];
    let output = match Command::new("git").args(args).output() {
        Ok(output) => output,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(GitError::MissingBinary("git"));
        }
        Err(err) => return Err(GitError::Io(err)),
    };
    if !output.status.success() {
        return Err(command_error("git", &args, &output));
    }
    canonical(path)
}

/// Short human summary of the repo state: branch status plus last commit.
/// Lenient by design; summary failures must not block the flow.
pub fn repo_summary(repo: &Path) -> String {
    let mut lines = Vec::new();
    match run_git(repo, &["status", "-sb"]) {
        Ok(output) if output.status.success() => {
            let status = String::from_utf8_lossy(&output.stdout);
            let status = status.trim();
            lines.push(if status.is_empty() {
                String::from("status: clean")
            } else {
                format!("status: {status}")
            });
        }
        _ => lines.push(String::from("status: unavailable")),
    }
    match run_git(repo, &["log", "-1", "--oneline", "--decorate"]) {
        Ok(output) if output.status.success() && !output.stdout.is_empty() => {
            lines.push(format!(
                "last commit: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            ));
        }
        _ => lines.push(String::from("last commit: none yet")),
    }
    lines.join("\n")
}

/// Stages one path relative to the repo root.
pub fn stage(repo: &Path, relative: &str) -> GitResult<()> {
    git_expect(repo, &["add", relative]).map(|_| ())
}

/// Returns whether the index holds staged changes.
pub fn has_staged_changes(repo: &Path) -> GitResult<bool> {
    let listed = git_expect(repo, &["diff", "--cached", "--name-only"])?;
    Ok(!listed.trim().is_empty())
}

/// Sets the repo-local committer identity.
pub fn set_committer(repo: &Path, name: &str, email: &str) -> GitResult<()> {
    git_expect(repo, &["config", "user.name", name])?;
    git_expect(repo, &["config", "user.email", email])?;
    Ok(())
}

/// Commits staged changes. Returns `false` when there was nothing to
/// commit, which is not an error for this flow.
pub fn commit(repo: &Path, message: &str) -> GitResult<bool> {
    let output = run_git(repo, &["commit", "-m", message])?;
    if output.status.success() {
        return Ok(true);
    }
    let combined = combined_output(&output);
    if combined.to_lowercase().contains("nothing to commit") {
        return Ok(false);
    }
    Err(command_error("git", &["commit", "-m", message], &output))
}

/// Pushes the current branch to its upstream.
pub fn push(repo: &Path) -> GitResult<()> {
    let output = run_git(repo, &["push"])?;
    if output.status.success() {
        Ok(())
    } else {
        Err(command_error("git", &["push"], &output))
    }
}

/// Maps common push failure output to a one-line remediation hint.
pub fn push_failure_hint(failure: &GitError) -> Option<&'static str> {
    let GitError::Command { output, .. } = failure else {
        return None;
    };
    let lower = output.to_lowercase();
    if lower.contains("permission denied") && lower.contains("publickey") {
        Some("the remote rejected your SSH key; verify with `ssh -T git@<host>` and update your key settings")
    } else if lower.contains("repository not found") {
        Some("the remote repository was not found; check the SSH URL spelling and case")
    } else if lower.contains("updates were rejected") {
        Some("the remote has commits you do not have locally; run `git pull --rebase` in the repo and retry")
    } else {
        None
    }
}

/// Counts commits authored on `date` (from local midnight onward),
/// optionally filtered by author identity.
///
/// This is the observed-count query the execution guard depends on; any
/// failure here must abort the tick rather than be read as zero. The one
/// exception is a repo with no commits at all, which legitimately counts
/// as zero.
pub fn count_commits_on(repo: &Path, date: NaiveDate, author: Option<&str>) -> GitResult<u32> {
    let since = format!("--since={date}T00:00:00");
    let mut args = vec!["log", since.as_str(), "--pretty=%H"];
    let author_arg;
    if let Some(identity) = author {
        author_arg = format!("--author={identity}");
        args.push(author_arg.as_str());
    }

    let output = run_git(repo, &args)?;
    if !output.status.success() {
        let combined = combined_output(&output);
        if combined.to_lowercase().contains("does not have any commits") {
            return Ok(0);
        }
        return Err(command_error("git", &args, &output));
    }

    let count = String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count();
    Ok(count as u32)
}

fn canonical(path: &Path) -> GitResult<PathBuf> {
    path.canonicalize().map_err(GitError::Io)
}

fn combined_output(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn command_error(program: &str, args: &[&str], output: &Output) -> GitError {
    GitError::Command {
        command: format!("{program} {}", args.join(" ")),
        code: output.status.code(),
        output: combined_output(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scp_style_url() {
        let remote = parse_ssh_url("git@github.com:octo/heatmap.git").unwrap();
        assert_eq!(remote.user, "git");
        assert_eq!(remote.host, "github.com");
        assert_eq!(remote.owner, "octo");
        assert_eq!(remote.repo, "heatmap");
    }

    #[test]
    fn parses_ssh_scheme_url() {
        let remote = parse_ssh_url("ssh://alice@code.example.com/team/repo").unwrap();
        assert_eq!(remote.user, "alice");
        assert_eq!(remote.host, "code.example.com");
        assert_eq!(remote.owner, "team");
        assert_eq!(remote.repo, "repo");
    }

    #[test]
    fn rejects_urls_without_owner_and_repo() {
        assert!(parse_ssh_url("git@github.com:justone").is_err());
        assert!(parse_ssh_url("https://github.com/a/b").is_err());
        assert!(parse_ssh_url("").is_err());
    }
}
