//! Microsoft Graph mail client
//!
//! Thin sequential wrappers over the Graph REST endpoints the pipeline
//! needs: folder lookup, message listing, attachment retrieval, sending
//! the confirmation and cleaning up processed messages. One blocking
//! request per call, no retries.

use crate::error::{Error, Result};
use crate::types::{FileAttachment, MailMessage};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

const GRAPH_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";
const LOGIN_ENDPOINT: &str = "https://login.microsoftonline.com";
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Credentials for the mailbox user and the registered application
#[derive(Debug, Clone)]
pub struct GraphCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

/// Authenticated Graph client, holding the bearer token for the run
pub struct GraphClient {
    http: Client,
    credentials: GraphCredentials,
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ValueList<T> {
    #[serde(default)]
    value: Vec<T>,
}

#[derive(Deserialize)]
struct MailFolder {
    id: String,
    #[serde(rename = "displayName")]
    display_name: String,
}

impl GraphClient {
    #[must_use]
    pub fn new(credentials: GraphCredentials) -> Self {
        Self {
            http: Client::new(),
            credentials,
            access_token: None,
        }
    }

    /// Bearer token for the run, acquired on first use
    fn token(&mut self) -> Result<String> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }
        let token = self.acquire_token()?;
        self.access_token = Some(token.clone());
        Ok(token)
    }

    /// Token via the password grant, falling back to client credentials
    /// when the mailbox user cannot sign in directly
    fn acquire_token(&self) -> Result<String> {
        let url = format!(
            "{LOGIN_ENDPOINT}/{}/oauth2/v2.0/token",
            self.credentials.tenant_id
        );

        let password_grant = [
            ("grant_type", "password"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("scope", GRAPH_SCOPE),
        ];
        match self.request_token(&url, &password_grant)? {
            Ok(token) => {
                info!("obtained access token via password grant");
                return Ok(token);
            }
            Err(description) => {
                warn!("password grant failed: {description}");
            }
        }

        info!("attempting client credentials grant as fallback");
        let client_grant = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
        ];
        match self.request_token(&url, &client_grant)? {
            Ok(token) => {
                info!("obtained access token via client credentials");
                Ok(token)
            }
            Err(description) => Err(Error::Auth(description)),
        }
    }

    /// One token request; the outer Result is transport failure, the
    /// inner one the token service's verdict
    fn request_token(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<std::result::Result<String, String>> {
        let response: TokenResponse = self.http.post(url).form(form).send()?.json()?;
        Ok(match response.access_token {
            Some(token) => Ok(token),
            None => Err(format!(
                "{}: {}",
                response.error.unwrap_or_else(|| "unknown_error".into()),
                response.error_description.unwrap_or_default()
            )),
        })
    }

    fn get(&mut self, url: &str, operation: &str) -> Result<Response> {
        let token = self.token()?;
        let response = self.http.get(url).bearer_auth(token).send()?;
        check_status(response, operation)
    }

    /// Folder id for a display name, searching top-level folders and
    /// their direct children
    pub fn find_folder(&mut self, name: &str) -> Result<Option<String>> {
        let folders: ValueList<MailFolder> = self
            .get(&format!("{GRAPH_ENDPOINT}/me/mailFolders"), "folder listing")?
            .json()?;

        for folder in &folders.value {
            if folder.display_name == name {
                debug!("found folder '{name}' with id {}", folder.id);
                return Ok(Some(folder.id.clone()));
            }
        }

        for folder in &folders.value {
            let url = format!("{GRAPH_ENDPOINT}/me/mailFolders/{}/childFolders", folder.id);
            let children: ValueList<MailFolder> = match self.get(&url, "child folder listing") {
                Ok(response) => response.json()?,
                Err(e) => {
                    debug!("skipping children of '{}': {e}", folder.display_name);
                    continue;
                }
            };
            if let Some(child) = children.value.iter().find(|c| c.display_name == name) {
                debug!("found folder '{name}' with id {}", child.id);
                return Ok(Some(child.id.clone()));
            }
        }

        Ok(None)
    }

    /// Newest messages in a folder, at most `limit`
    pub fn list_messages(&mut self, folder_id: &str, limit: usize) -> Result<Vec<MailMessage>> {
        let url = format!("{GRAPH_ENDPOINT}/me/mailFolders/{folder_id}/messages");
        let top = limit.to_string();
        let token = self.token()?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("$top", top.as_str()),
                ("$orderby", "receivedDateTime desc"),
                ("$select", "id,subject,from,body,receivedDateTime,hasAttachments"),
            ])
            .send()?;
        let messages: ValueList<MailMessage> =
            check_status(response, "message listing")?.json()?;
        info!("retrieved {} messages from folder", messages.value.len());
        Ok(messages.value)
    }

    /// All attachments of a message; failures degrade to an empty list
    /// so the ticket still gets created
    pub fn attachments(&mut self, message_id: &str) -> Vec<FileAttachment> {
        let url = format!("{GRAPH_ENDPOINT}/me/messages/{message_id}/attachments");
        let attachments: Result<ValueList<FileAttachment>> = self
            .get(&url, "attachment listing")
            .and_then(|response| response.json().map_err(Error::from));
        match attachments {
            Ok(list) => {
                debug!(
                    "retrieved {} attachments for message {message_id}",
                    list.value.len()
                );
                list.value
            }
            Err(e) => {
                warn!("could not list attachments for message {message_id}: {e}");
                Vec::new()
            }
        }
    }

    /// Send an HTML email on behalf of the mailbox user
    pub fn send_mail(&mut self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let payload = json!({
            "message": {
                "subject": subject,
                "body": {
                    "contentType": "HTML",
                    "content": html_body,
                },
                "toRecipients": [
                    { "emailAddress": { "address": to } }
                ],
            },
            "saveToSentItems": true,
        });

        let token = self.token()?;
        let response = self
            .http
            .post(format!("{GRAPH_ENDPOINT}/me/sendMail"))
            .bearer_auth(token)
            .json(&payload)
            .send()?;
        check_status(response, "send mail")?;
        info!("confirmation sent to {to}");
        Ok(())
    }

    /// Delete a processed message; failure is logged, not propagated
    pub fn delete_message(&mut self, message_id: &str) {
        if let Err(e) = self.try_delete(message_id) {
            error!("failed to delete message {message_id}: {e}");
        } else {
            debug!("deleted message {message_id}");
        }
    }

    fn try_delete(&mut self, message_id: &str) -> Result<()> {
        let token = self.token()?;
        let response = self
            .http
            .delete(format!("{GRAPH_ENDPOINT}/me/messages/{message_id}"))
            .bearer_auth(token)
            .send()?;
        check_status(response, "delete message").map(|_| ())
    }

    /// Move a processed message to another folder; failure is logged,
    /// not propagated
    pub fn move_message(&mut self, message_id: &str, destination_folder_id: &str) {
        if let Err(e) = self.try_move(message_id, destination_folder_id) {
            error!("failed to move message {message_id}: {e}");
        } else {
            debug!("moved message {message_id}");
        }
    }

    fn try_move(&mut self, message_id: &str, destination_folder_id: &str) -> Result<()> {
        let token = self.token()?;
        let response = self
            .http
            .post(format!("{GRAPH_ENDPOINT}/me/messages/{message_id}/move"))
            .bearer_auth(token)
            .json(&json!({ "destinationId": destination_folder_id }))
            .send()?;
        check_status(response, "move message").map(|_| ())
    }
}

fn check_status(response: Response, operation: &str) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(Error::Provider {
            operation: operation.to_string(),
            status: response.status().as_u16(),
        })
    }
}
