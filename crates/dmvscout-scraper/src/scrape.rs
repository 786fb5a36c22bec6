//! Top-level scrape orchestration: session lifecycle plus the one-time
//! booking-flow setup before pagination takes over.

use dmvscout_core::OfficeRecord;
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::navigator::{Navigator, ScrapePolicy};
use crate::pagination;
use crate::selectors;
use crate::session::BookingSession;

/// Identity fields typed into the booking form before the office listing
/// becomes reachable.
#[derive(Clone)]
pub struct Applicant {
    pub license_number: String,
    pub date_of_birth: String,
}

impl std::fmt::Debug for Applicant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Applicant")
            .field("license_number", &"[redacted]")
            .field("date_of_birth", &"[redacted]")
            .finish()
    }
}

/// Runs the full scrape against `session`: opens the booking flow, submits
/// the applicant identity, crawls every listing page, and tears the session
/// down.
///
/// The session is closed on both success and failure paths; a close failure
/// after a successful scrape is logged rather than clobbering the result.
///
/// # Errors
///
/// Any failure of a pre-pagination step is fatal — those are one-time,
/// unambiguous form fills with no recovery defined. Pagination failures
/// propagate from [`pagination::scrape_all_pages`].
pub async fn scrape_offices<S: BookingSession>(
    session: S,
    policy: ScrapePolicy,
    applicant: &Applicant,
    max_pages: Option<usize>,
) -> Result<Vec<OfficeRecord>, ScrapeError> {
    let mut nav = Navigator::new(session, policy);
    let outcome = drive_booking_flow(&mut nav, applicant, max_pages).await;
    if let Err(e) = nav.close().await {
        warn!(error = %e, "failed to close browser session");
    }
    outcome
}

async fn drive_booking_flow<S: BookingSession>(
    nav: &mut Navigator<S>,
    applicant: &Applicant,
    max_pages: Option<usize>,
) -> Result<Vec<OfficeRecord>, ScrapeError> {
    info!("opening appointment booking flow");
    nav.goto(selectors::APPOINTMENT_TYPE_URL).await?;
    nav.click(selectors::AUTOMOBILE_REASON).await?;
    nav.fill(selectors::LICENSE_NUMBER_FIELD, &applicant.license_number)
        .await?;
    nav.fill(selectors::DATE_OF_BIRTH_FIELD, &applicant.date_of_birth)
        .await?;
    nav.click(selectors::CONTINUE_BUTTON).await?;

    pagination::scrape_all_pages(nav, max_pages).await
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
