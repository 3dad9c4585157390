use std::{fmt, str::FromStr};

use crate::app_error::AppError;

/// A GitHub repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse a repository reference.
    ///
    /// Supports:
    /// - owner/repo
    /// - https://github.com/owner/repo (optionally ending in `.git` or `/`)
    /// - git@github.com:owner/repo.git
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let trimmed = input.trim().trim_end_matches('/');

        let path = if let Some(rest) = trimmed.strip_prefix("git@github.com:") {
            rest.to_string()
        } else if trimmed.contains("://") {
            let url = url::Url::parse(trimmed)
                .map_err(|e| AppError::InvalidInput(format!("Invalid repository URL: {e}")))?;
            if url.host_str() != Some("github.com") && url.host_str() != Some("www.github.com") {
                return Err(AppError::InvalidInput(format!(
                    "Not a GitHub repository URL: {trimmed}"
                )));
            }
            url.path().trim_matches('/').to_string()
        } else {
            trimmed.to_string()
        };

        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AppError::InvalidInput(format!(
                "Expected a repository in the form owner/repo, got: {trimmed}"
            )));
        };

        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() {
            return Err(AppError::InvalidInput("Repository name is empty".into()));
        }
        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(AppError::InvalidInput(format!(
                "Repository owner or name contains invalid characters: {trimmed}"
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

// GitHub owners and repositories only use ASCII alphanumerics, '-', '_' and '.'.
fn is_valid_segment(segment: &str) -> bool {
    segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl FromStr for RepoRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
