//! Persisted high scores, keyed by repository.
//!
//! Stored as JSON in the gh state directory. Each repository's list is
//! append-only and kept in the order scores were recorded.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const XDG_STATE_HOME: &str = "XDG_STATE_HOME";
const LOCAL_APP_DATA: &str = "LocalAppData";
const STATE_FILENAME: &str = "mergeconflict.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub name: String,
    pub score: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    pub high_scores: BTreeMap<String, Vec<HighScore>>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file is an empty board; an unreadable or
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(Error::StateRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| Error::StateFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source| Error::StateWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::StateFormat {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(write_err)?;
        log::info!("high scores saved to {:?}", path);
        Ok(())
    }

    /// Scores for `repo` in the order they were recorded.
    pub fn entries(&self, repo: &str) -> &[HighScore] {
        self.high_scores
            .get(repo)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn best(&self, repo: &str) -> Option<u64> {
        self.entries(repo).iter().map(|e| e.score).max()
    }

    /// A positive score that ties or beats everything recorded for `repo`.
    pub fn is_new_best(&self, repo: &str, score: u64) -> bool {
        score > 0 && score >= self.best(repo).unwrap_or(0)
    }

    pub fn record(&mut self, repo: &str, name: &str, score: u64) {
        self.high_scores
            .entry(repo.to_string())
            .or_default()
            .push(HighScore {
                name: name.to_string(),
                score,
            });
    }
}

// ── Confirmation ──────────────────────────────────────────────────────────────

/// Ask for a name on `input`. A blank answer declines.
pub fn prompt_name<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    score: u64,
) -> Result<Option<String>> {
    write!(
        out,
        "new high score: {}! enter a name to record it (blank to skip): ",
        score
    )?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let name = line.trim();
    Ok((!name.is_empty()).then(|| name.to_string()))
}

/// Offer to record `score` for `repo` when it is a new best. The board is
/// saved to `path` only if the player gives a name. Returns whether it was.
pub fn confirm_and_record<R: BufRead, W: Write>(
    scores: &mut HighScores,
    repo: &str,
    score: u64,
    path: &Path,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    if !scores.is_new_best(repo, score) {
        return Ok(false);
    }
    let Some(name) = prompt_name(input, out, score)? else {
        log::info!("high score {} for {} declined", score, repo);
        return Ok(false);
    };
    scores.record(repo, &name, score);
    scores.save(path)?;
    Ok(true)
}

// ── State location ────────────────────────────────────────────────────────────

/// Directory for persisted state:
/// 1. `$XDG_STATE_HOME/gh`
/// 2. `%LocalAppData%/GitHub CLI` (Windows only)
/// 3. `~/.local/state/gh`
pub fn state_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(XDG_STATE_HOME).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir).join("gh");
    }
    if cfg!(windows) {
        if let Some(dir) = std::env::var_os(LOCAL_APP_DATA).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir).join("GitHub CLI");
        }
    }
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".local").join("state").join("gh")
}

pub fn state_path() -> PathBuf {
    state_dir().join(STATE_FILENAME)
}
