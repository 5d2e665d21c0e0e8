use mail2ticket::{ConfirmationContext, confirmation_subject, render_confirmation};

fn context() -> ConfirmationContext {
    ConfirmationContext {
        sender_name: "Jane Doe".into(),
        ticket_key: "IAM-42".into(),
        ticket_summary: "Access request".into(),
        ticket_url: "https://tracker.example.com/browse/IAM-42".into(),
        timestamp: "2025-06-01 08:30:00".into(),
    }
}

#[test]
fn test_render_confirmation_contains_ticket_details() {
    let html = render_confirmation(&context()).unwrap();

    assert!(html.contains("Dear Jane Doe"));
    assert!(html.contains("IAM-42"));
    assert!(html.contains("Access request"));
    assert!(html.contains("https://tracker.example.com/browse/IAM-42"));
    assert!(html.contains("2025-06-01 08:30:00"));
}

#[test]
fn test_render_confirmation_escapes_values() {
    let mut ctx = context();
    ctx.sender_name = "Ann & Bob".into();
    let html = render_confirmation(&ctx).unwrap();

    assert!(html.contains("Ann &amp; Bob"));
    assert!(!html.contains("Dear Ann & Bob,"));
}

#[test]
fn test_confirmation_subject() {
    assert_eq!(
        confirmation_subject("IAM-42"),
        "Your request has been converted to ticket IAM-42"
    );
}
