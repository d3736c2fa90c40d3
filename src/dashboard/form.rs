//! Contact form
//!
//! Field validation, the scripted "encryption" narration and the result
//! banner. The default uplink never fails; the failure branch exists for
//! uplinks that do.

use super::scheduler::TimerId;
use super::{Dashboard, Task};
use crate::data::templates::ENCRYPTION_STEPS;
use crate::data::{sources, Severity};
use std::time::Duration;
use tracing::{info, warn};

const STEP_DELAY: Duration = Duration::from_millis(500);
const TRANSMIT_DELAY: Duration = Duration::from_millis(2000);
const RESTORE_DELAY: Duration = Duration::from_millis(1000);
const BANNER_TIMEOUT: Duration = Duration::from_millis(5000);

pub const SUBMIT_LABEL: &str = "TRANSMIT SECURE MESSAGE";
pub const TRANSMITTING_LABEL: &str = "TRANSMITTING...";
pub const SUCCESS_MESSAGE: &str = "Message transmitted successfully. Encrypted with AES-256.";
pub const FAILURE_MESSAGE: &str = "Transmission failed. Check secure connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Email,
    Subject,
    Message,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Name,
        FieldKind::Email,
        FieldKind::Subject,
        FieldKind::Message,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Name => "Callsign",
            FieldKind::Email => "Email",
            FieldKind::Subject => "Subject",
            FieldKind::Message => "Message",
        }
    }

    pub fn required(&self) -> bool {
        !matches!(self, FieldKind::Subject)
    }
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub kind: FieldKind,
    pub value: String,
    pub invalid: bool,
}

impl FormField {
    fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            value: String::new(),
            invalid: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        let value = self.value.trim();
        if self.kind.required() && value.is_empty() {
            return false;
        }
        if self.kind == FieldKind::Email && !value.is_empty() {
            return looks_like_email(value);
        }
        true
    }

    fn validate(&mut self) -> bool {
        self.invalid = !self.is_valid();
        !self.invalid
    }
}

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$`
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // some dot must have text on both sides
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

/// A snapshot of the form handed to the uplink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

/// Where submitted messages go
pub trait Uplink {
    fn transmit(&mut self, message: &ContactMessage) -> Result<(), String>;
}

/// Accepts everything and sends nothing
#[derive(Debug, Default)]
pub struct SimulatedUplink;

impl Uplink for SimulatedUplink {
    fn transmit(&mut self, _message: &ContactMessage) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub fields: Vec<FormField>,
    transmitting: bool,
    pending: Option<ContactMessage>,
    banner: Option<Banner>,
    banner_timer: Option<TimerId>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            fields: FieldKind::ALL.into_iter().map(FormField::new).collect(),
            transmitting: false,
            pending: None,
            banner: None,
            banner_timer: None,
        }
    }

    pub fn field(&self, kind: FieldKind) -> &FormField {
        &self.fields[kind as usize]
    }

    pub fn is_transmitting(&self) -> bool {
        self.transmitting
    }

    pub fn submit_enabled(&self) -> bool {
        !self.transmitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.transmitting {
            TRANSMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Replace a field's value and re-validate it
    pub fn set_value(&mut self, kind: FieldKind, value: impl Into<String>) {
        let field = &mut self.fields[kind as usize];
        field.value = value.into();
        field.validate();
    }

    pub fn push_char(&mut self, kind: FieldKind, c: char) {
        let field = &mut self.fields[kind as usize];
        field.value.push(c);
        field.validate();
    }

    pub fn backspace(&mut self, kind: FieldKind) {
        let field = &mut self.fields[kind as usize];
        field.value.pop();
        field.validate();
    }

    fn validate_all(&mut self) -> bool {
        self.fields
            .iter_mut()
            .map(FormField::validate)
            .fold(true, |ok, valid| ok && valid)
    }

    fn snapshot(&self) -> ContactMessage {
        ContactMessage {
            name: self.field(FieldKind::Name).value.trim().to_string(),
            email: self.field(FieldKind::Email).value.trim().to_string(),
            subject: self.field(FieldKind::Subject).value.trim().to_string(),
            body: self.field(FieldKind::Message).value.trim().to_string(),
        }
    }

    fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
            field.invalid = false;
        }
    }

    pub(super) fn restore_submit(&mut self) {
        self.transmitting = false;
    }

    pub(super) fn dismiss_banner(&mut self) {
        self.banner = None;
        self.banner_timer = None;
    }
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a submission did not start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    InFlight,
    Invalid(Vec<FieldKind>),
}

impl Dashboard {
    /// Submit the contact form. Starts the scripted transmission when every
    /// field validates.
    pub fn submit_form(&mut self) -> Result<(), SubmitRejection> {
        if self.form.transmitting {
            return Err(SubmitRejection::InFlight);
        }
        if !self.form.validate_all() {
            let invalid = self
                .form
                .fields
                .iter()
                .filter(|f| f.invalid)
                .map(|f| f.kind)
                .collect();
            return Err(SubmitRejection::Invalid(invalid));
        }

        info!("contact form submitted");
        self.form.transmitting = true;
        self.form.pending = Some(self.form.snapshot());
        self.scheduler.after(Duration::ZERO, Task::EncryptionStep(0));
        Ok(())
    }

    pub(super) fn run_encryption_step(&mut self, step: usize) {
        let Some(text) = ENCRYPTION_STEPS.get(step) else {
            return;
        };
        info!(target: "encryption", "{text}");
        let next = if step + 1 < ENCRYPTION_STEPS.len() {
            Task::EncryptionStep(step + 1)
        } else {
            Task::TransmissionComplete
        };
        let delay = if step + 1 < ENCRYPTION_STEPS.len() {
            STEP_DELAY
        } else {
            STEP_DELAY + TRANSMIT_DELAY
        };
        self.scheduler.after(delay, next);
    }

    pub(super) fn complete_transmission(&mut self) {
        let Some(message) = self.form.pending.take() else {
            return;
        };
        match self.uplink.transmit(&message) {
            Ok(()) => {
                self.show_banner(BannerKind::Success, SUCCESS_MESSAGE);
                self.form.reset();
                self.log_feed(
                    sources::COMM_SEC,
                    "Secure message transmitted via encrypted channel",
                    Severity::Info,
                );
            }
            Err(err) => {
                warn!(error = %err, "transmission failed");
                self.show_banner(BannerKind::Error, FAILURE_MESSAGE);
            }
        }
        self.scheduler.after(RESTORE_DELAY, Task::SubmitRestore);
    }

    /// Show a banner, replacing any that is up
    pub fn show_banner(&mut self, kind: BannerKind, message: &str) {
        if let Some(timer) = self.form.banner_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.form.banner = Some(Banner {
            kind,
            message: message.to_string(),
        });
        self.form.banner_timer = Some(self.scheduler.after(BANNER_TIMEOUT, Task::BannerDismiss));
    }
}
