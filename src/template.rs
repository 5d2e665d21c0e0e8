//! Confirmation email rendering
//!
//! The requester gets a styled HTML reply naming the created ticket and
//! linking to it. Values are HTML-escaped by the engine.

use crate::error::Result;
use serde::Serialize;
use tera::{Context, Tera};

const CONFIRMATION_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 600px;
            margin: 0 auto;
            background-color: #f4f4f4;
        }
        .container {
            background-color: white;
            padding: 30px;
            margin: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .header {
            background: linear-gradient(135deg, #0052CC 0%, #0747A6 100%);
            color: white;
            padding: 20px;
            border-radius: 8px 8px 0 0;
            margin: -30px -30px 20px -30px;
        }
        .ticket-box {
            background-color: #f8f9fa;
            border-left: 4px solid #0052CC;
            padding: 15px;
            margin: 20px 0;
            border-radius: 4px;
        }
        .ticket-id {
            font-size: 24px;
            font-weight: bold;
            color: #0052CC;
            margin: 10px 0;
        }
        .info-box {
            background-color: #E3FCEF;
            border: 1px solid #00875A;
            padding: 15px;
            border-radius: 4px;
            margin: 20px 0;
        }
        .footer {
            margin-top: 30px;
            padding-top: 20px;
            border-top: 1px solid #ddd;
            font-size: 12px;
            color: #666;
        }
        a { color: #0052CC; text-decoration: none; }
        a:hover { text-decoration: underline; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1 style="margin: 0;">&#10003; Request Confirmed</h1>
        </div>

        <p>Dear {{ sender_name }},</p>

        <p>Thank you for your request. Your email has been successfully
        converted into a ticket for tracking and processing.</p>

        <div class="ticket-box">
            <div>Your Ticket ID:</div>
            <div class="ticket-id">{{ ticket_key }}</div>
            <div style="margin-top: 10px;">
                <strong>Summary:</strong> {{ ticket_summary }}
            </div>
        </div>

        <div class="info-box">
            <strong>Important:</strong> Please use the ticket for all further
            communication regarding this request. Do not reply to this email.
        </div>

        <p>You can view and update your ticket here:<br>
        <a href="{{ ticket_url | safe }}" style="font-weight: bold;">{{ ticket_url | safe }}</a></p>

        <p>Our team will review your request and provide updates in the ticket.</p>

        <div class="footer">
            <p>This is an automated message.<br>
            Generated on {{ timestamp }}</p>
        </div>
    </div>
</body>
</html>
"#;

/// Values substituted into the confirmation template
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationContext {
    pub sender_name: String,
    pub ticket_key: String,
    pub ticket_summary: String,
    pub ticket_url: String,
    pub timestamp: String,
}

/// Render the confirmation email body
pub fn render_confirmation(context: &ConfirmationContext) -> Result<String> {
    let context = Context::from_serialize(context)?;
    Tera::one_off(CONFIRMATION_TEMPLATE, &context, true).map_err(Into::into)
}

/// Subject line for the confirmation email
#[must_use]
pub fn confirmation_subject(ticket_key: &str) -> String {
    format!("Your request has been converted to ticket {ticket_key}")
}
