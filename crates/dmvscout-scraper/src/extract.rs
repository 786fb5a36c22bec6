//! Per-page office extraction: names from the listing cards, then dates
//! from each office's calendar.
//!
//! Offices are addressed by card index throughout, never by name — names
//! are not guaranteed unique, and the index is what keeps the later
//! by-position address assignment aligned. The site returns to listing
//! page 1 after every detail view, so each office visit ends with an
//! explicit re-navigation to the page being scraped.

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::error::ScrapeError;
use crate::navigator::Navigator;
use crate::selectors;
use crate::session::BookingSession;

/// Reads the office names off the currently displayed listing page.
///
/// Card headings are labeled "N. Office Name"; the name is the text after
/// the first `.`, trimmed. A heading without the delimiter is taken whole.
///
/// # Errors
///
/// [`ScrapeError::WaitTimeout`] if the card titles never render.
pub async fn office_names<S: BookingSession>(
    nav: &mut Navigator<S>,
) -> Result<Vec<String>, ScrapeError> {
    nav.wait_for(selectors::CARD_TITLES).await?;
    let titles = nav.texts(selectors::CARD_TITLES).await?;
    Ok(titles.iter().map(|t| name_from_card_title(t)).collect())
}

pub(crate) fn name_from_card_title(title: &str) -> String {
    match title.split_once('.') {
        Some((_, rest)) => rest.trim().to_owned(),
        None => title.trim().to_owned(),
    }
}

/// Selects the office at `index` on listing page `page`, reads its calendar
/// dates, and navigates back to `page`.
///
/// A stale element during the select-and-read step means the detail view
/// re-rendered under us; the whole step is restarted from a fresh element
/// lookup. By default this retries until it sticks, since staleness is
/// transient; a configured ceiling turns exhaustion into
/// [`ScrapeError::StaleRetriesExhausted`].
///
/// # Errors
///
/// Structural failures (missing recovery control, wait timeouts, recovery
/// exhaustion) abort the page.
pub async fn dates_for_office<S: BookingSession>(
    nav: &mut Navigator<S>,
    index: usize,
    page: usize,
    name: &str,
) -> Result<Vec<NaiveDate>, ScrapeError> {
    let mut stale_retries = 0u32;
    let dates = loop {
        match select_and_read(nav, index, page, name).await {
            Ok(dates) => break dates,
            Err(ScrapeError::Stale { selector }) => {
                if let Some(cap) = nav.policy().stale_retry_attempts {
                    if stale_retries >= cap {
                        return Err(ScrapeError::StaleRetriesExhausted {
                            office: name.to_owned(),
                            attempts: stale_retries,
                        });
                    }
                }
                stale_retries += 1;
                trace!(
                    office = name,
                    selector,
                    stale_retries,
                    "stale element, restarting office read"
                );
            }
            Err(other) => return Err(other),
        }
    };

    debug!(office = name, index, dates = dates.len(), "office calendar read");

    // The detail view bounced us off the listing; head back and restore the
    // page we were working through before the next office is visited.
    nav.wait_for(selectors::EDIT_LOCATION).await?;
    nav.click(selectors::EDIT_LOCATION).await?;
    nav.ensure_listing_page().await?;
    nav.click_page_button(page).await?;

    Ok(dates)
}

/// One attempt at the select-and-read step, from fresh element lookups.
async fn select_and_read<S: BookingSession>(
    nav: &mut Navigator<S>,
    index: usize,
    page: usize,
    name: &str,
) -> Result<Vec<NaiveDate>, ScrapeError> {
    if nav.texts(selectors::SELECT_OFFICE_BUTTONS).await?.is_empty() {
        // Bounced off the listing mid-loop (or a previous attempt left us on
        // a detail view). Recover, restore the page, and wait for the cards.
        nav.ensure_listing_page().await?;
        nav.click_page_button(page).await?;
        nav.wait_for(selectors::SELECT_OFFICE_BUTTONS).await?;
    }

    nav.click_nth(selectors::SELECT_OFFICE_BUTTONS, index).await?;
    nav.read_dates_for_selected_office(name).await
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
