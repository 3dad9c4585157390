mod oauth;
mod pulls;

pub use oauth::GithubOAuthClient;
pub use pulls::GithubPullRequestClient;

use url::Url;

pub(crate) const SERVICE: &str = "github";
pub(crate) const API_VERSION: &str = "2022-11-28";

/// Appends `path` to `base`, keeping any path prefix on `base` (GitHub Enterprise uses `/api/v3`).
pub(crate) fn endpoint(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
