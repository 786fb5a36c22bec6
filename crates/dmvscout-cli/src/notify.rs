//! SMTP notification for the `--target-date` mode.

use anyhow::Context;
use chrono::NaiveDate;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use dmvscout_core::{AppConfig, OfficeRecord};

/// Whether either of the two closest offices has an appointment strictly
/// before `target_date`. Offices with no visible availability never
/// qualify.
pub(crate) fn any_qualifies(offices: &[OfficeRecord], target_date: NaiveDate) -> bool {
    offices
        .iter()
        .take(2)
        .any(|office| office.earliest_date().is_some_and(|d| d < target_date))
}

/// Emails `body` (the rendered report table) to the configured recipient,
/// from their own address.
///
/// # Errors
///
/// Returns an error when `mail_options` is absent from the config, the
/// mailbox header does not parse, or SMTP delivery fails.
pub(crate) fn send_report(config: &AppConfig, body: String) -> anyhow::Result<()> {
    let mail = config
        .mail_options
        .as_ref()
        .context("mail_options must be set in the config to send notifications")?;

    let person = config.email_person_name.as_deref().unwrap_or_default();
    let mailbox: Mailbox = format!("{person} <{}>", mail.user_name)
        .parse()
        .context("email_person_name/user_name do not form a valid mailbox")?;

    let message = Message::builder()
        .to(mailbox.clone())
        .from(mailbox)
        .subject("Closer appointment location/date - DMV Scraper")
        .body(body)?;

    let transport = SmtpTransport::starttls_relay(&mail.address)?
        .port(mail.port)
        .credentials(Credentials::new(
            mail.user_name.clone(),
            mail.password.clone(),
        ))
        .build();
    transport.send(&message)?;
    Ok(())
}
