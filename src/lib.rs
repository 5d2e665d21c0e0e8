// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Mailbox-to-Ticket Bridge
//!
//! Polls a mailbox folder, converts each qualifying email into an issue
//! tracker ticket and replies with a confirmation. The heart of the
//! crate is the HTML email normalizer: embedded images are extracted
//! into attachable objects, then the remaining HTML is translated into
//! the tracker's wiki markup.
//!
//! # Features
//!
//! - Embedded base64 image extraction with stable filenames
//! - Content-ID image placeholders resolved against real attachments
//! - HTML to wiki markup translation for ticket descriptions
//! - Sequential batch processing: one token, one folder, one run
//!
//! # Example
//!
//! ```rust
//! use mail2ticket::{EmailBody, extract_embedded_objects, html_to_markup};
//!
//! let body = EmailBody::html("<p>Hello <b>World</b></p>");
//! let (cleaned, images) = extract_embedded_objects(&body);
//!
//! assert!(images.is_empty());
//! assert_eq!(html_to_markup(&cleaned), "Hello *World*");
//! ```

mod config;
mod error;
mod extract;
mod graph;
mod markup;
mod process;
mod template;
mod tracker;
mod types;

pub use config::Settings;
pub use error::{Error, Result};
pub use extract::extract_embedded_objects;
pub use graph::{GraphClient, GraphCredentials};
pub use markup::html_to_markup;
pub use process::{RunSummary, run};
pub use template::{ConfirmationContext, confirmation_subject, render_confirmation};
pub use tracker::TrackerClient;
pub use types::*;
