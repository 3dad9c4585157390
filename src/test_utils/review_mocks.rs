use async_trait::async_trait;
use std::sync::Mutex;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::review::{PullRequestFile, PullRequestHost, ReviewGenerator},
    domain::entities::repository::RepoRef,
};

pub fn sample_files() -> Vec<PullRequestFile> {
    vec![
        PullRequestFile {
            filename: "src/main.rs".into(),
            status: "modified".into(),
            additions: 4,
            deletions: 1,
            changes: 5,
            patch: Some("@@ -1,3 +1,6 @@\n fn main() {\n-    run();\n+    init();\n+    run();\n }".into()),
        },
        PullRequestFile {
            filename: "assets/logo.png".into(),
            status: "added".into(),
            additions: 0,
            deletions: 0,
            changes: 0,
            patch: None,
        },
    ]
}

fn stub_failure(status: u16) -> AppError {
    AppError::Upstream {
        service: "github",
        status,
        message: "stub failure".into(),
    }
}

/// Pull request host returning fixed files and recording every call.
#[derive(Default)]
pub struct StubPullRequestHost {
    files: Vec<PullRequestFile>,
    fail_status: Option<u16>,
    listed: Mutex<Vec<(String, u64)>>,
    posted: Mutex<Vec<(String, u64, String)>>,
}

impl StubPullRequestHost {
    pub fn with_files(files: Vec<PullRequestFile>) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Default::default()
        }
    }

    pub fn listed(&self) -> Vec<(String, u64)> {
        self.listed.lock().unwrap().clone()
    }

    pub fn posted(&self) -> Vec<(String, u64, String)> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestHost for StubPullRequestHost {
    async fn list_files(&self, repo: &RepoRef, number: u64) -> AppResult<Vec<PullRequestFile>> {
        self.listed.lock().unwrap().push((repo.to_string(), number));
        match self.fail_status {
            Some(status) => Err(stub_failure(status)),
            None => Ok(self.files.clone()),
        }
    }

    async fn post_comment(&self, repo: &RepoRef, number: u64, body: &str) -> AppResult<()> {
        if let Some(status) = self.fail_status {
            return Err(stub_failure(status));
        }
        self.posted
            .lock()
            .unwrap()
            .push((repo.to_string(), number, body.to_string()));
        Ok(())
    }
}

/// Review generator with a canned reply; captures `(system_prompt, changes)`.
pub struct StubReviewGenerator {
    reply: Option<String>,
    captured: Mutex<Vec<(String, String)>>,
}

impl StubReviewGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            captured: Mutex::new(Vec::new()),
        }
    }

    /// Fails like an unreachable model endpoint.
    pub fn unavailable() -> Self {
        Self {
            reply: None,
            captured: Mutex::new(Vec::new()),
        }
    }

    pub fn captured(&self) -> Vec<(String, String)> {
        self.captured.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewGenerator for StubReviewGenerator {
    async fn generate(&self, system_prompt: &str, changes: &str) -> AppResult<String> {
        self.captured
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), changes.to_string()));
        self.reply.clone().ok_or_else(|| AppError::Upstream {
            service: "gemini",
            status: 503,
            message: "model overloaded".into(),
        })
    }
}
