//! Core types for messages, bodies and extracted objects

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content type of an email body as reported by the mail provider
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// HTML body, eligible for extraction and markup translation
    Html,

    /// Plain text or anything else the provider reports
    #[default]
    #[serde(other)]
    Text,
}

/// Body of a retrieved email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailBody {
    /// Raw body content
    pub content: String,

    /// Declared content type
    #[serde(rename = "contentType", default)]
    pub content_type: ContentKind,
}

impl EmailBody {
    /// Create an HTML body
    #[must_use]
    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: ContentKind::Html,
        }
    }

    /// Create a plain text body
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: ContentKind::Text,
        }
    }

    /// Whether the body carries HTML content
    #[must_use]
    pub const fn is_html(&self) -> bool {
        matches!(self.content_type, ContentKind::Html)
    }
}

/// Binary object lifted out of an HTML body during extraction
///
/// Ownership transfers to the caller, which persists it as a ticket
/// attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedObject {
    /// Assigned filename, unique within one extraction run
    pub filename: String,

    /// Decoded binary content
    pub content: Vec<u8>,

    /// MIME type, e.g. `image/png`
    pub content_type: String,
}

/// Sender or recipient address as the mail provider reports it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name, if the provider supplied one
    #[serde(default)]
    pub name: Option<String>,

    /// Email address
    pub address: String,
}

impl Mailbox {
    /// Name to address a person by: display name when present, address otherwise
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Wrapper the provider puts around addresses in message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(rename = "emailAddress")]
    pub email_address: Mailbox,
}

/// A message retrieved from the watched mailbox folder
#[derive(Debug, Clone, Deserialize)]
pub struct MailMessage {
    /// Provider message id
    pub id: String,

    /// Subject line, absent for some drafts
    #[serde(default)]
    pub subject: Option<String>,

    /// Sender
    #[serde(default)]
    pub from: Option<Recipient>,

    /// Message body
    pub body: EmailBody,

    /// Time the message arrived in the mailbox
    #[serde(rename = "receivedDateTime", default)]
    pub received: Option<DateTime<Utc>>,

    /// Whether the message carries real attachments
    #[serde(rename = "hasAttachments", default)]
    pub has_attachments: bool,
}

impl MailMessage {
    /// Subject line, with the provider's placeholder for subjectless mail
    #[must_use]
    pub fn subject_or_default(&self) -> &str {
        self.subject.as_deref().unwrap_or("No Subject")
    }

    /// Sender mailbox, if the message has one
    #[must_use]
    pub fn sender(&self) -> Option<&Mailbox> {
        self.from.as_ref().map(|r| &r.email_address)
    }
}

/// An attachment record listed for a message
#[derive(Debug, Clone, Deserialize)]
pub struct FileAttachment {
    /// Provider type discriminator
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,

    /// Attachment filename
    pub name: String,

    /// Base64 payload, present for file attachments
    #[serde(rename = "contentBytes", default)]
    pub content_bytes: Option<String>,
}

impl FileAttachment {
    /// Whether this is a plain file attachment (as opposed to an item or
    /// reference attachment, which carry no inline payload)
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.odata_type == "#microsoft.graph.fileAttachment"
    }

    /// Decode the base64 payload into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let payload = self.content_bytes.as_deref().unwrap_or_default();
        BASE64.decode(payload)
    }
}
