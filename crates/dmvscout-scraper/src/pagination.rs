//! Drives the extractor across every listing page and stitches the
//! per-page results into one ordered collection.

use dmvscout_core::OfficeRecord;
use tracing::info;

use crate::error::ScrapeError;
use crate::extract;
use crate::navigator::Navigator;
use crate::normalize::normalize_address;
use crate::selectors;
use crate::session::BookingSession;

/// Scrapes pages `1..=min(page_count, max_pages)` and concatenates their
/// offices in page order.
///
/// The page count is determined once, from the pagination buttons present
/// before any navigation; the button count is assumed stable across
/// recovery cycles.
///
/// # Errors
///
/// Any structural failure on any page aborts the run; offices from pages
/// that already completed are lost (the caller has not seen them yet), but
/// nothing partial from the failing page leaks out.
pub async fn scrape_all_pages<S: BookingSession>(
    nav: &mut Navigator<S>,
    max_pages: Option<usize>,
) -> Result<Vec<OfficeRecord>, ScrapeError> {
    let labels = nav.ensure_listing_page().await?;
    let page_count = labels.len();
    let last_page = max_pages.map_or(page_count, |cap| cap.min(page_count));
    info!(page_count, last_page, "starting office listing crawl");

    let mut offices = Vec::new();
    for page in 1..=last_page {
        let page_offices = scrape_page(nav, page).await?;
        info!(page, offices = page_offices.len(), "listing page complete");
        offices.extend(page_offices);
    }
    Ok(offices)
}

/// Scrapes one listing page: names, per-office dates, then addresses.
///
/// Addresses are matched to offices strictly by position — the i-th address
/// block belongs to the i-th card. The extractor restores the current page
/// after every office visit precisely so this alignment survives the
/// recovery churn. A count mismatch means the listing changed under us and
/// is surfaced as [`ScrapeError::AddressCountMismatch`] rather than
/// silently misassigning.
///
/// # Errors
///
/// Propagates extractor and navigator failures.
pub async fn scrape_page<S: BookingSession>(
    nav: &mut Navigator<S>,
    page: usize,
) -> Result<Vec<OfficeRecord>, ScrapeError> {
    nav.ensure_listing_page().await?;
    nav.click_page_button(page).await?;

    let names = extract::office_names(nav).await?;
    let mut records = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let dates = extract::dates_for_office(nav, index, page, name).await?;
        records.push(OfficeRecord::new(name.clone(), dates));
    }

    let addresses = read_page_addresses(nav, page).await?;
    if addresses.len() != records.len() {
        return Err(ScrapeError::AddressCountMismatch {
            page,
            offices: records.len(),
            addresses: addresses.len(),
        });
    }
    for (record, address) in records.iter_mut().zip(&addresses) {
        record.address = Some(normalize_address(address));
    }

    Ok(records)
}

/// Reads the raw address blocks for the given page, recovering (and
/// restoring the page) once if the session got bounced after the last
/// office visit.
async fn read_page_addresses<S: BookingSession>(
    nav: &mut Navigator<S>,
    page: usize,
) -> Result<Vec<String>, ScrapeError> {
    let texts = nav.texts(selectors::ADDRESS_FIELDS).await?;
    if !texts.is_empty() {
        return Ok(texts);
    }

    nav.ensure_listing_page().await?;
    nav.click_page_button(page).await?;
    nav.wait_for(selectors::ADDRESS_FIELDS).await?;
    nav.texts(selectors::ADDRESS_FIELDS).await
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
