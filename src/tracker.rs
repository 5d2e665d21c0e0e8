//! Issue tracker client
//!
//! Creates tickets and uploads attachments through the tracker's REST
//! API with basic auth. Field semantics are owned by the tracker; this
//! module only shapes the requests.

use crate::error::{Error, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

/// Trackers reject summaries longer than this
const MAX_SUMMARY_LEN: usize = 255;

/// Authenticated tracker client bound to one project
pub struct TrackerClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    project_key: String,
}

#[derive(Deserialize)]
struct CreatedIssue {
    key: String,
}

impl TrackerClient {
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        project_key: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            project_key: project_key.into(),
        }
    }

    /// Create a Task ticket and return its issue key
    pub fn create_ticket(&self, summary: &str, description: &str) -> Result<String> {
        let summary: String = summary.chars().take(MAX_SUMMARY_LEN).collect();
        let payload = json!({
            "fields": {
                "project": { "key": self.project_key },
                "summary": summary,
                "description": description,
                "issuetype": { "name": "Task" },
            }
        });

        let response = self
            .http
            .post(format!("{}/rest/api/2/issue", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .json(&payload)
            .send()?;
        let issue: CreatedIssue = check_status(response, "create ticket")?.json()?;
        info!("created ticket {}", issue.key);
        Ok(issue.key)
    }

    /// Upload one file to a ticket; failure is logged per file, not
    /// propagated, so remaining attachments still go up
    pub fn attach_file(&self, issue_key: &str, filename: &str, content: Vec<u8>) {
        match self.try_attach(issue_key, filename, content) {
            Ok(()) => info!("added attachment {filename} to {issue_key}"),
            Err(e) => warn!("failed to attach {filename} to {issue_key}: {e}"),
        }
    }

    fn try_attach(&self, issue_key: &str, filename: &str, content: Vec<u8>) -> Result<()> {
        let form = Form::new().part("file", Part::bytes(content).file_name(filename.to_string()));
        let response = self
            .http
            .post(format!(
                "{}/rest/api/2/issue/{issue_key}/attachments",
                self.base_url
            ))
            .basic_auth(&self.username, Some(&self.password))
            .header("X-Atlassian-Token", "no-check")
            .multipart(form)
            .send()?;
        check_status(response, "attach file").map(|_| ())
    }

    /// Browse URL shown to the requester in the confirmation email
    #[must_use]
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{issue_key}", self.base_url)
    }
}

fn check_status(response: Response, operation: &str) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(Error::Tracker {
            operation: operation.to_string(),
            status: response.status().as_u16(),
        })
    }
}
