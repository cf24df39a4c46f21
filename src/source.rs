//! Where issues and commits come from.
//!
//! The game only needs two ordered lists of strings. [`GhCli`] gets them by
//! shelling out to the GitHub CLI; the parsing helpers are public so the
//! output formats can be tested without `gh` installed.

use std::io::ErrorKind;
use std::process::Command;

use serde::Deserialize;

use crate::error::{Error, Result};

const ISSUES_QUERY: &str = r#"
query GetIssuesForMC($owner: String!, $repo: String!, $endCursor: String) {
  repository(owner: $owner, name: $repo) {
    hasIssuesEnabled
    issues(first: 100, after: $endCursor, states: [OPEN]) {
      nodes {
        number
        title
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}"#;

pub trait RepoSource {
    /// Open issues formatted as `"#<number> <title>"`.
    fn issues(&self, repo: &str) -> Result<Vec<String>>;

    /// Commit SHAs, newest first.
    fn commits(&self, repo: &str) -> Result<Vec<String>>;
}

/// Talks to GitHub through the `gh` binary on `PATH`.
#[derive(Debug, Clone)]
pub struct GhCli {
    bin: String,
}

impl Default for GhCli {
    fn default() -> Self {
        Self {
            bin: "gh".to_string(),
        }
    }
}

impl GhCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// The repository associated with the current directory.
    pub fn resolve_repository(&self) -> Result<String> {
        match self.run(&["repo", "view"]) {
            Ok(out) => parse_repo_view(&out),
            Err(Error::GhFailed { stderr }) if stderr.contains("not a git repository") => {
                Err(Error::NotARepository)
            }
            Err(e) => Err(e),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        log::debug!("running {} {:?}", self.bin, args);
        let output = Command::new(&self.bin).args(args).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::GhMissing(e)
            } else {
                Error::Io(e)
            }
        })?;
        if !output.status.success() {
            return Err(Error::GhFailed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RepoSource for GhCli {
    fn issues(&self, repo: &str) -> Result<Vec<String>> {
        let (owner, name) = split_repo(repo)?;
        let query = format!("query={}", ISSUES_QUERY);
        let owner = format!("owner={}", owner);
        let name = format!("repo={}", name);
        let out = self.run(&[
            "api", "graphql", "--paginate", "--cache", "24h", "-f", query.as_str(), "-f",
            owner.as_str(), "-f", name.as_str(), "--jq", ".[]",
        ])?;
        parse_issue_pages(&out)
    }

    fn commits(&self, repo: &str) -> Result<Vec<String>> {
        split_repo(repo)?;
        let endpoint = format!("repos/{}/commits", repo);
        let out = self.run(&[
            "api", endpoint.as_str(), "--paginate", "--cache", "24h", "--jq", ".[]|.sha",
        ])?;
        Ok(parse_shas(&out))
    }
}

// ── Output parsing ────────────────────────────────────────────────────────────

/// Split `OWNER/NAME`.
pub fn split_repo(repo: &str) -> Result<(&str, &str)> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(Error::InvalidRepository(repo.to_string())),
    }
}

/// First line of `gh repo view` reads `name:\tOWNER/NAME`.
pub fn parse_repo_view(stdout: &str) -> Result<String> {
    let first = stdout.lines().next().unwrap_or_default();
    match first.split_once(':') {
        Some((_, repo)) if !repo.trim().is_empty() => Ok(repo.trim().to_string()),
        _ => Err(Error::InvalidRepository(first.to_string())),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuePage {
    repository: RepositoryNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    has_issues_enabled: bool,
    #[serde(default)]
    issues: IssueConnection,
}

#[derive(Deserialize, Default)]
struct IssueConnection {
    #[serde(default)]
    nodes: Vec<IssueNode>,
}

#[derive(Deserialize)]
struct IssueNode {
    number: u64,
    title: String,
}

/// `gh api graphql --paginate --jq '.[]'` prints one JSON document per page.
pub fn parse_issue_pages(stdout: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for page in serde_json::Deserializer::from_str(stdout).into_iter::<IssuePage>() {
        let page = page.map_err(Error::Decode)?;
        if !page.repository.has_issues_enabled {
            return Err(Error::IssuesDisabled);
        }
        out.extend(
            page.repository
                .issues
                .nodes
                .into_iter()
                .map(|issue| format!("#{} {}", issue.number, issue.title)),
        );
    }
    Ok(out)
}

/// One SHA per line; blank lines are skipped.
pub fn parse_shas(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
