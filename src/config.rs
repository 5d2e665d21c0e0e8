//! Runtime settings
//!
//! Every value can be given as a flag or an environment variable, so the
//! binary works both interactively and from a scheduler. Secrets are
//! hidden from `--help` output.

use clap::Parser;
use std::path::PathBuf;

/// Poll a mailbox folder and convert each email into a tracker ticket
#[derive(Debug, Parser)]
#[command(name = "mail2ticket", version, about)]
pub struct Settings {
    /// Directory tenant id
    #[arg(long, env = "TENANT_ID")]
    pub tenant_id: String,

    /// Registered application (client) id
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: String,

    /// Application client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Mailbox user principal name
    #[arg(long, env = "MAILBOX_USER")]
    pub mailbox_user: String,

    /// Mailbox password for the password grant
    #[arg(long, env = "MAILBOX_PASSWORD", hide_env_values = true)]
    pub mailbox_password: String,

    /// Issue tracker base URL
    #[arg(long, env = "JIRA_URL")]
    pub tracker_url: String,

    /// Issue tracker user
    #[arg(long, env = "JIRA_USER")]
    pub tracker_user: String,

    /// Issue tracker password or API token
    #[arg(long, env = "JIRA_PASSWORD", hide_env_values = true)]
    pub tracker_password: String,

    /// Project key for created tickets
    #[arg(long, env = "JIRA_PROJECT_KEY", default_value = "IAM")]
    pub project_key: String,

    /// Mailbox folder to poll
    #[arg(long, env = "FOLDER_NAME", default_value = "#As_JIRA_Ticket")]
    pub folder_name: String,

    /// Folder to move processed messages into instead of deleting them
    #[arg(long, env = "DONE_FOLDER")]
    pub done_folder: Option<String>,

    /// Maximum emails processed per run
    #[arg(long, env = "BATCH_SIZE", default_value_t = 10)]
    pub batch_size: usize,

    /// Directory for the rolling log file; stderr only when unset
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Settings {
    /// Log level implied by the verbosity flags
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
