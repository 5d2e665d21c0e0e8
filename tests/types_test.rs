use mail2ticket::*;

// --- ContentKind ---

#[test]
fn test_content_kind_html() {
    let kind: ContentKind = serde_json::from_str("\"html\"").unwrap();
    assert_eq!(kind, ContentKind::Html);
}

#[test]
fn test_content_kind_text() {
    let kind: ContentKind = serde_json::from_str("\"text\"").unwrap();
    assert_eq!(kind, ContentKind::Text);
}

#[test]
fn test_content_kind_unknown_is_text() {
    let kind: ContentKind = serde_json::from_str("\"multipart\"").unwrap();
    assert_eq!(kind, ContentKind::Text);
}

#[test]
fn test_content_kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ContentKind::Html).unwrap(), "\"html\"");
    assert_eq!(serde_json::to_string(&ContentKind::Text).unwrap(), "\"text\"");
}

// --- EmailBody ---

#[test]
fn test_email_body_constructors() {
    assert!(EmailBody::html("<p>x</p>").is_html());
    assert!(!EmailBody::text("x").is_html());
}

#[test]
fn test_email_body_deserialize() {
    let body: EmailBody =
        serde_json::from_str(r#"{"content": "<p>hi</p>", "contentType": "html"}"#).unwrap();
    assert!(body.is_html());
    assert_eq!(body.content, "<p>hi</p>");
}

#[test]
fn test_email_body_missing_content_type_defaults_to_text() {
    let body: EmailBody = serde_json::from_str(r#"{"content": "plain"}"#).unwrap();
    assert!(!body.is_html());
}

// --- Mailbox ---

#[test]
fn test_mailbox_display_name() {
    let with_name = Mailbox {
        name: Some("Jane Doe".into()),
        address: "jane@example.com".into(),
    };
    assert_eq!(with_name.display_name(), "Jane Doe");

    let without_name = Mailbox {
        name: None,
        address: "jane@example.com".into(),
    };
    assert_eq!(without_name.display_name(), "jane@example.com");
}

#[test]
fn test_mailbox_display_format() {
    let mailbox = Mailbox {
        name: Some("Jane Doe".into()),
        address: "jane@example.com".into(),
    };
    assert_eq!(mailbox.to_string(), "Jane Doe <jane@example.com>");
}

// --- MailMessage ---

#[test]
fn test_mail_message_deserialize() {
    let raw = r#"{
        "id": "AAMkAGI2",
        "subject": "Access request",
        "from": {"emailAddress": {"name": "Jane Doe", "address": "jane@example.com"}},
        "body": {"contentType": "html", "content": "<p>please</p>"},
        "receivedDateTime": "2025-06-01T08:30:00Z",
        "hasAttachments": true
    }"#;

    let message: MailMessage = serde_json::from_str(raw).unwrap();

    assert_eq!(message.id, "AAMkAGI2");
    assert_eq!(message.subject_or_default(), "Access request");
    assert_eq!(message.sender().unwrap().address, "jane@example.com");
    assert!(message.body.is_html());
    assert!(message.has_attachments);
    assert!(message.received.is_some());
}

#[test]
fn test_mail_message_minimal() {
    let raw = r#"{"id": "x", "body": {"content": "hi"}}"#;
    let message: MailMessage = serde_json::from_str(raw).unwrap();

    assert_eq!(message.subject_or_default(), "No Subject");
    assert!(message.sender().is_none());
    assert!(!message.has_attachments);
    assert!(message.received.is_none());
}

// --- FileAttachment ---

#[test]
fn test_file_attachment_detection() {
    let file: FileAttachment = serde_json::from_str(
        r##"{"@odata.type": "#microsoft.graph.fileAttachment", "name": "report.pdf", "contentBytes": "aGVsbG8="}"##,
    )
    .unwrap();
    assert!(file.is_file());
    assert_eq!(file.decode().unwrap(), b"hello");

    let item: FileAttachment = serde_json::from_str(
        r##"{"@odata.type": "#microsoft.graph.itemAttachment", "name": "forwarded"}"##,
    )
    .unwrap();
    assert!(!item.is_file());
}

#[test]
fn test_file_attachment_missing_payload_decodes_empty() {
    let attachment: FileAttachment = serde_json::from_str(r#"{"name": "empty.bin"}"#).unwrap();
    assert_eq!(attachment.decode().unwrap(), Vec::<u8>::new());
}

#[test]
fn test_file_attachment_bad_payload_errors() {
    let attachment: FileAttachment =
        serde_json::from_str(r#"{"name": "bad.bin", "contentBytes": "%%%"}"#).unwrap();
    assert!(attachment.decode().is_err());
}
