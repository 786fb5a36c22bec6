//! Retry-safe operations over a live booking session.
//!
//! The portal loses navigation state constantly: opening any office detail
//! view resets the listing to page 1, and the listing itself sometimes
//! disappears entirely ("bounced" to a different screen). The navigator
//! detects the bounce by the pagination controls vanishing and recovers by
//! clicking the "edit location" link until they come back.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dmvscout_core::ScrapeConfig;
use tracing::{debug, warn};

use crate::error::ScrapeError;
use crate::normalize::parse_calendar_dates;
use crate::selectors;
use crate::session::{BookingSession, Target};

/// Retry and wait tuning for one scrape run.
///
/// `listing_recovery_attempts` and `stale_retry_attempts` are `None` by
/// default: the site's flakiness is transient in practice and an unattended
/// run prefers to wait it out. Bounding them turns a hang into a typed
/// error ([`ScrapeError::RecoveryExhausted`] /
/// [`ScrapeError::StaleRetriesExhausted`]).
#[derive(Debug, Clone)]
pub struct ScrapePolicy {
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub date_poll_attempts: u32,
    pub listing_recovery_attempts: Option<u32>,
    pub stale_retry_attempts: Option<u32>,
}

impl Default for ScrapePolicy {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
            date_poll_attempts: 1000,
            listing_recovery_attempts: None,
            stale_retry_attempts: None,
        }
    }
}

impl From<&ScrapeConfig> for ScrapePolicy {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            wait_timeout: config.wait_timeout(),
            poll_interval: config.date_poll_interval(),
            date_poll_attempts: config.date_poll_attempts,
            listing_recovery_attempts: config.listing_recovery_attempts,
            stale_retry_attempts: config.stale_retry_attempts,
        }
    }
}

/// Owns the browser session for the duration of a scrape and exposes the
/// operations the extractor and pagination driver are written against.
pub struct Navigator<S> {
    session: S,
    policy: ScrapePolicy,
}

impl<S: BookingSession> Navigator<S> {
    pub fn new(session: S, policy: ScrapePolicy) -> Self {
        Self { session, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &ScrapePolicy {
        &self.policy
    }

    /// # Errors
    ///
    /// Propagates session-level failures.
    pub async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.session.goto(url).await
    }

    /// Visible texts of all elements matching `target` (empty when none).
    ///
    /// # Errors
    ///
    /// Propagates session-level failures, including [`ScrapeError::Stale`].
    pub async fn texts(&mut self, target: Target) -> Result<Vec<String>, ScrapeError> {
        self.session.element_texts(target).await
    }

    /// Clicks the first element matching `target`.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::MissingElement`] when nothing matches.
    pub async fn click(&mut self, target: Target) -> Result<(), ScrapeError> {
        self.session.click_nth(target, 0).await
    }

    /// Clicks the `index`-th (0-based) element matching `target`, looked up
    /// fresh.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::MissingElement`] when fewer than `index + 1` elements
    /// match; [`ScrapeError::Stale`] when the element re-rendered between
    /// lookup and click.
    pub async fn click_nth(&mut self, target: Target, index: usize) -> Result<(), ScrapeError> {
        self.session.click_nth(target, index).await
    }

    /// # Errors
    ///
    /// [`ScrapeError::MissingElement`] when nothing matches.
    pub async fn fill(&mut self, target: Target, text: &str) -> Result<(), ScrapeError> {
        self.session.fill(target, text).await
    }

    /// # Errors
    ///
    /// Propagates session-level failures.
    pub async fn close(&mut self) -> Result<(), ScrapeError> {
        self.session.close().await
    }

    /// Labels of the numeric pagination buttons, in order. An empty result
    /// means the listing is not currently displayed — the detection signal
    /// for a bounced session.
    ///
    /// # Errors
    ///
    /// Propagates session-level failures.
    pub async fn page_button_labels(&mut self) -> Result<Vec<String>, ScrapeError> {
        let texts = self.session.element_texts(selectors::PAGE_BUTTONS).await?;
        Ok(texts.into_iter().filter(|t| is_numeric_label(t)).collect())
    }

    /// Forces the browser back onto the office listing, clicking the "edit
    /// location" link until the pagination controls reappear. Returns the
    /// numeric page-button labels once they do.
    ///
    /// Note the listing comes back on page 1; callers that were on a deeper
    /// page must re-click their page button afterwards.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::MissingElement`] if the "edit location" link itself
    ///   cannot be found — there is no further fallback.
    /// - [`ScrapeError::RecoveryExhausted`] when a recovery ceiling is
    ///   configured and reached.
    pub async fn ensure_listing_page(&mut self) -> Result<Vec<String>, ScrapeError> {
        let mut attempts = 0u32;
        loop {
            let labels = self.page_button_labels().await?;
            if !labels.is_empty() {
                return Ok(labels);
            }

            if let Some(cap) = self.policy.listing_recovery_attempts {
                if attempts >= cap {
                    return Err(ScrapeError::RecoveryExhausted { attempts });
                }
            }
            attempts += 1;

            debug!(attempts, "pagination controls missing, heading back to location selection");
            self.click(selectors::EDIT_LOCATION).await?;
        }
    }

    /// Clicks the `page`-th (1-indexed) numeric pagination button. The raw
    /// button list can contain prev/next arrows, so the numeric index is
    /// mapped back to a position in the freshly queried list.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::MissingElement`] if fewer than `page` numeric buttons
    /// exist right now.
    pub async fn click_page_button(&mut self, page: usize) -> Result<(), ScrapeError> {
        let texts = self.session.element_texts(selectors::PAGE_BUTTONS).await?;
        let raw_index = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| is_numeric_label(t))
            .nth(page - 1)
            .map(|(i, _)| i)
            .ok_or_else(|| ScrapeError::MissingElement {
                selector: format!("{} [page {page}]", selectors::PAGE_BUTTONS),
            })?;
        self.session
            .click_nth(selectors::PAGE_BUTTONS, raw_index)
            .await
    }

    /// Suspends until at least one element matches `target`.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::WaitTimeout`] when the policy's wait ceiling elapses
    /// first.
    pub async fn wait_for(&mut self, target: Target) -> Result<(), ScrapeError> {
        let deadline = Instant::now() + self.policy.wait_timeout;
        loop {
            if !self.session.element_texts(target).await?.is_empty() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::WaitTimeout {
                    selector: target.to_string(),
                    waited_ms: u64::try_from(self.policy.wait_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                });
            }
            tokio::time::sleep(self.policy.poll_interval).await;
        }
    }

    /// Polls for calendar-day elements after an office has been selected.
    /// The calendar renders asynchronously, so empty reads are expected at
    /// first; after `date_poll_attempts` empty reads the office is treated
    /// as having no visible availability.
    ///
    /// # Errors
    ///
    /// Propagates session-level failures; a stale read here is the caller's
    /// cue to reselect the office and try again.
    pub async fn read_dates_for_selected_office(
        &mut self,
        office: &str,
    ) -> Result<Vec<NaiveDate>, ScrapeError> {
        for attempt in 1..=self.policy.date_poll_attempts {
            let texts = self.session.element_texts(selectors::CALENDAR_DAYS).await?;
            if !texts.is_empty() {
                return Ok(parse_calendar_dates(office, &texts));
            }
            if attempt < self.policy.date_poll_attempts {
                tokio::time::sleep(self.policy.poll_interval).await;
            }
        }

        warn!(
            office,
            attempts = self.policy.date_poll_attempts,
            "no calendar dates found; may be a bug or a legitimately empty calendar"
        );
        Ok(Vec::new())
    }
}

fn is_numeric_label(label: &str) -> bool {
    label.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "navigator_test.rs"]
mod tests;
