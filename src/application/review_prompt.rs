use crate::{
    application::use_cases::review::PullRequestFile, domain::entities::repository::RepoRef,
};

pub const REVIEW_SYSTEM_PROMPT: &str = r#"You are a helpful code reviewer. Given GitHub pull request file diffs, generate a brief and clear code review comment in this exact format:

## Code Review for PR #[PR_NUMBER]
Repository: https://github.com/[OWNER]/[REPO]

Great work on this pull request! Here are my observations:

### Strengths:
- [List 1-3 specific positive aspects from the code changes]

### Suggestions:
- [List 1-2 specific, constructive suggestions for improvement]

Overall, this is a solid contribution. Thanks!

Keep the tone professional and supportive. If there are no obvious suggestions, still include the sections and say "No major suggestions at the moment." Do not repeat code. Avoid long explanations. Ensure the output is short and formatted in Markdown.
"#;

/// Renders the user turn sent to the model: PR coordinates followed by the file list.
pub fn render_changes(repo: &RepoRef, number: u64, files: &[PullRequestFile]) -> String {
    let listing = serde_json::to_string_pretty(files).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Pull request #{number} in https://github.com/{}/{}\n\nChanged files:\n{listing}",
        repo.owner, repo.name
    )
}
