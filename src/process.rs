//! Batch pipeline from mailbox folder to tracker tickets
//!
//! One run: resolve the watched folder, list a bounded batch of
//! messages, process each strictly in sequence. A failure while
//! processing one email is logged and never aborts the batch.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::extract::extract_embedded_objects;
use crate::graph::{GraphClient, GraphCredentials};
use crate::markup::html_to_markup;
use crate::template::{ConfirmationContext, confirmation_subject, render_confirmation};
use crate::tracker::TrackerClient;
use crate::types::{ContentKind, MailMessage, Mailbox};
use chrono::Local;
use tracing::{error, info, warn};

/// Outcome of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages successfully turned into tickets
    pub processed: usize,
    /// Messages in the batch
    pub total: usize,
}

/// Process one batch of emails from the watched folder
pub fn run(settings: &Settings) -> Result<RunSummary> {
    let mut graph = GraphClient::new(GraphCredentials {
        tenant_id: settings.tenant_id.clone(),
        client_id: settings.client_id.clone(),
        client_secret: settings.client_secret.clone(),
        username: settings.mailbox_user.clone(),
        password: settings.mailbox_password.clone(),
    });
    let tracker = TrackerClient::new(
        &settings.tracker_url,
        &settings.tracker_user,
        &settings.tracker_password,
        &settings.project_key,
    );

    let folder_id = graph
        .find_folder(&settings.folder_name)?
        .ok_or_else(|| Error::FolderNotFound(settings.folder_name.clone()))?;

    let done_folder_id = match &settings.done_folder {
        Some(name) => Some(
            graph
                .find_folder(name)?
                .ok_or_else(|| Error::FolderNotFound(name.clone()))?,
        ),
        None => None,
    };

    let messages = graph.list_messages(&folder_id, settings.batch_size)?;
    if messages.is_empty() {
        info!("no messages to process");
        return Ok(RunSummary {
            processed: 0,
            total: 0,
        });
    }

    let total = messages.len();
    let mut processed = 0;
    for message in &messages {
        match process_message(&mut graph, &tracker, message, done_folder_id.as_deref()) {
            Ok(ticket_key) => {
                processed += 1;
                info!("created ticket {ticket_key} for message {}", message.id);
            }
            Err(e) => error!("failed to process message {}: {e}", message.id),
        }
    }
    info!("processed {processed}/{total} emails");

    Ok(RunSummary { processed, total })
}

/// Turn one email into a ticket with attachments and confirm to the
/// sender
fn process_message(
    graph: &mut GraphClient,
    tracker: &TrackerClient,
    message: &MailMessage,
    done_folder_id: Option<&str>,
) -> Result<String> {
    let subject = message.subject_or_default();
    let sender = message
        .sender()
        .ok_or_else(|| Error::Response(format!("message {} has no sender", message.id)))?;

    info!("processing email from {}: {subject}", sender.address);

    let (cleaned, embedded) = extract_embedded_objects(&message.body);
    let body = match message.body.content_type {
        ContentKind::Html => html_to_markup(&cleaned),
        ContentKind::Text => cleaned.trim().to_string(),
    };

    let description = compose_description(message, sender, subject, &body);
    let ticket_key = tracker.create_ticket(subject, &description)?;

    for object in embedded {
        tracker.attach_file(&ticket_key, &object.filename, object.content);
    }

    if message.has_attachments {
        for attachment in graph.attachments(&message.id) {
            if !attachment.is_file() {
                continue;
            }
            match attachment.decode() {
                Ok(content) => tracker.attach_file(&ticket_key, &attachment.name, content),
                Err(e) => warn!("skipping attachment {} with bad payload: {e}", attachment.name),
            }
        }
    }

    let confirmation = render_confirmation(&ConfirmationContext {
        sender_name: sender.display_name().to_string(),
        ticket_key: ticket_key.clone(),
        ticket_summary: subject.to_string(),
        ticket_url: tracker.browse_url(&ticket_key),
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })?;
    graph.send_mail(
        &sender.address,
        &confirmation_subject(&ticket_key),
        &confirmation,
    )?;

    match done_folder_id {
        Some(folder_id) => graph.move_message(&message.id, folder_id),
        None => graph.delete_message(&message.id),
    }

    Ok(ticket_key)
}

/// Ticket description: a metadata header followed by the normalized body
fn compose_description(
    message: &MailMessage,
    sender: &Mailbox,
    subject: &str,
    body: &str,
) -> String {
    let received = message
        .received
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default();

    format!(
        "*Original Email from:* {sender}\n\
         *Received:* {received}\n\
         *Subject:* {subject}\n\
         \n\
         ----\n\
         \n\
         {body}\n"
    )
}
