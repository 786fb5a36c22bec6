//! Scripted in-memory stand-in for the booking site, used by the core
//! tests in place of a live browser.
//!
//! The sim reproduces the site behaviors the core is built around:
//! pagination controls that vanish when the session gets bounced, a
//! calendar that renders asynchronously after an office is selected, the
//! reset to listing page 1 after any detail view, and injectable staleness
//! faults on calendar reads.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ScrapeError;
use crate::selectors;
use crate::session::{BookingSession, Target};

pub(crate) struct SimOffice {
    pub title: String,
    pub address: String,
    pub dates: Vec<String>,
    /// Empty calendar reads before the widget "renders".
    pub calendar_delay_polls: u32,
    /// Stale errors injected on the first N calendar reads.
    pub stale_calendar_reads: u32,
}

impl SimOffice {
    pub fn new(title: &str, address: &str, dates: &[&str]) -> Self {
        Self {
            title: title.to_owned(),
            address: address.to_owned(),
            dates: dates.iter().map(|d| (*d).to_owned()).collect(),
            calendar_delay_polls: 0,
            stale_calendar_reads: 0,
        }
    }

    pub fn with_calendar_delay(mut self, polls: u32) -> Self {
        self.calendar_delay_polls = polls;
        self
    }

    pub fn with_stale_reads(mut self, reads: u32) -> Self {
        self.stale_calendar_reads = reads;
        self
    }
}

pub(crate) struct SimPage {
    pub offices: Vec<SimOffice>,
}

impl SimPage {
    pub fn new(offices: Vec<SimOffice>) -> Self {
        Self { offices }
    }
}

/// Observation point that outlives the session, for tests where the
/// orchestrator consumes it.
#[derive(Default)]
pub(crate) struct SimProbe {
    pub filled: Mutex<Vec<(Target, String)>>,
    pub visited_urls: Mutex<Vec<String>>,
    pub closed: AtomicBool,
    pub edit_clicks: AtomicU32,
    pub select_clicks: AtomicU32,
}

impl SimProbe {
    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn edit_clicks(&self) -> u32 {
        self.edit_clicks.load(Ordering::SeqCst)
    }

    pub fn select_clicks(&self) -> u32 {
        self.select_clicks.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    SelectType,
    IdentityForm,
    Listing,
    Detail { page: usize, office: usize },
    Bounced,
}

pub(crate) struct SimSession {
    pages: Vec<SimPage>,
    screen: Screen,
    /// 1-based; meaningful while on the listing.
    current_page: usize,
    calendar_polls_left: u32,
    /// Edit-location clicks that land on the wrong screen before one
    /// finally restores the listing.
    bounces_on_edit: u32,
    missing_edit_location: bool,
    /// Drops the address blocks from the next address query and bounces the
    /// session, as the site sometimes does right after a detail view.
    hide_addresses_once: bool,
    /// Stray address block appended after the real ones, to model a listing
    /// that changed shape between the name pass and the address pass.
    extra_address: Option<String>,
    probe: Arc<SimProbe>,
}

impl SimSession {
    fn new(pages: Vec<SimPage>, screen: Screen) -> Self {
        Self {
            pages,
            screen,
            current_page: 1,
            calendar_polls_left: 0,
            bounces_on_edit: 0,
            missing_edit_location: false,
            hide_addresses_once: false,
            extra_address: None,
            probe: Arc::new(SimProbe::default()),
        }
    }

    /// Handle for asserting on session activity after the session has been
    /// handed off.
    pub fn probe(&self) -> Arc<SimProbe> {
        Arc::clone(&self.probe)
    }

    /// Session already positioned on listing page 1.
    pub fn at_listing(pages: Vec<SimPage>) -> Self {
        Self::new(pages, Screen::Listing)
    }

    /// Session at the start of the booking flow (appointment-type screen).
    pub fn at_booking_start(pages: Vec<SimPage>) -> Self {
        Self::new(pages, Screen::SelectType)
    }

    /// Session bounced off the listing onto an unrelated screen.
    pub fn bounced(pages: Vec<SimPage>) -> Self {
        Self::new(pages, Screen::Bounced)
    }

    pub fn with_bounces_on_edit(mut self, bounces: u32) -> Self {
        self.bounces_on_edit = bounces;
        self
    }

    pub fn without_edit_location(mut self) -> Self {
        self.missing_edit_location = true;
        self
    }

    pub fn with_addresses_hidden_once(mut self) -> Self {
        self.hide_addresses_once = true;
        self
    }

    pub fn with_extra_address(mut self, address: &str) -> Self {
        self.extra_address = Some(address.to_owned());
        self
    }

    fn listing_offices(&self) -> &[SimOffice] {
        &self.pages[self.current_page - 1].offices
    }

    fn missing(target: Target) -> ScrapeError {
        ScrapeError::MissingElement {
            selector: target.to_string(),
        }
    }
}

#[async_trait]
impl BookingSession for SimSession {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.probe
            .visited_urls
            .lock()
            .expect("probe lock")
            .push(url.to_owned());
        Ok(())
    }

    async fn element_texts(&mut self, target: Target) -> Result<Vec<String>, ScrapeError> {
        if target == selectors::PAGE_BUTTONS {
            return Ok(match self.screen {
                Screen::Listing => {
                    let mut labels: Vec<String> =
                        (1..=self.pages.len()).map(|n| n.to_string()).collect();
                    // Next-page arrow; non-numeric, must be filtered out.
                    labels.push("\u{203a}".to_owned());
                    labels
                }
                _ => Vec::new(),
            });
        }

        if target == selectors::CARD_TITLES {
            return Ok(match self.screen {
                Screen::Listing => self
                    .listing_offices()
                    .iter()
                    .map(|o| o.title.clone())
                    .collect(),
                _ => Vec::new(),
            });
        }

        if target == selectors::SELECT_OFFICE_BUTTONS {
            return Ok(match self.screen {
                Screen::Listing => vec!["Select".to_owned(); self.listing_offices().len()],
                _ => Vec::new(),
            });
        }

        if target == selectors::EDIT_LOCATION {
            let present = !self.missing_edit_location
                && matches!(
                    self.screen,
                    Screen::Listing | Screen::Detail { .. } | Screen::Bounced
                );
            return Ok(if present {
                vec!["Edit location".to_owned()]
            } else {
                Vec::new()
            });
        }

        if target == selectors::CALENDAR_DAYS {
            if let Screen::Detail { page, office } = self.screen {
                let entry = &mut self.pages[page - 1].offices[office];
                if entry.stale_calendar_reads > 0 {
                    entry.stale_calendar_reads -= 1;
                    return Err(ScrapeError::Stale {
                        selector: target.to_string(),
                    });
                }
                if self.calendar_polls_left > 0 {
                    self.calendar_polls_left -= 1;
                    return Ok(Vec::new());
                }
                return Ok(entry.dates.clone());
            }
            return Ok(Vec::new());
        }

        if target == selectors::ADDRESS_FIELDS {
            if self.screen != Screen::Listing {
                return Ok(Vec::new());
            }
            if self.hide_addresses_once {
                self.hide_addresses_once = false;
                self.screen = Screen::Bounced;
                return Ok(Vec::new());
            }
            let mut addresses: Vec<String> = self
                .listing_offices()
                .iter()
                .map(|o| o.address.clone())
                .collect();
            if let Some(extra) = &self.extra_address {
                addresses.push(extra.clone());
            }
            return Ok(addresses);
        }

        Ok(Vec::new())
    }

    async fn click_nth(&mut self, target: Target, index: usize) -> Result<(), ScrapeError> {
        if target == selectors::PAGE_BUTTONS {
            if self.screen != Screen::Listing {
                return Err(Self::missing(target));
            }
            if index < self.pages.len() {
                self.current_page = index + 1;
                return Ok(());
            }
            if index == self.pages.len() {
                // Next arrow.
                self.current_page = (self.current_page + 1).min(self.pages.len());
                return Ok(());
            }
            return Err(Self::missing(target));
        }

        if target == selectors::EDIT_LOCATION {
            if self.missing_edit_location {
                return Err(Self::missing(target));
            }
            self.probe.edit_clicks.fetch_add(1, Ordering::SeqCst);
            if self.bounces_on_edit > 0 {
                self.bounces_on_edit -= 1;
                self.screen = Screen::Bounced;
            } else {
                // The site always lands back on listing page 1.
                self.screen = Screen::Listing;
                self.current_page = 1;
            }
            return Ok(());
        }

        if target == selectors::SELECT_OFFICE_BUTTONS {
            if self.screen != Screen::Listing || index >= self.listing_offices().len() {
                return Err(Self::missing(target));
            }
            self.probe.select_clicks.fetch_add(1, Ordering::SeqCst);
            self.calendar_polls_left = self.listing_offices()[index].calendar_delay_polls;
            self.screen = Screen::Detail {
                page: self.current_page,
                office: index,
            };
            return Ok(());
        }

        if target == selectors::AUTOMOBILE_REASON {
            if self.screen != Screen::SelectType {
                return Err(Self::missing(target));
            }
            self.screen = Screen::IdentityForm;
            return Ok(());
        }

        if target == selectors::CONTINUE_BUTTON {
            if self.screen != Screen::IdentityForm {
                return Err(Self::missing(target));
            }
            self.screen = Screen::Listing;
            self.current_page = 1;
            return Ok(());
        }

        Err(Self::missing(target))
    }

    async fn fill(&mut self, target: Target, text: &str) -> Result<(), ScrapeError> {
        let is_identity_field = target == selectors::LICENSE_NUMBER_FIELD
            || target == selectors::DATE_OF_BIRTH_FIELD;
        if !is_identity_field || self.screen != Screen::IdentityForm {
            return Err(Self::missing(target));
        }
        self.probe
            .filled
            .lock()
            .expect("probe lock")
            .push((target, text.to_owned()));
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        self.probe.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A fast policy for tests: tiny waits, few date polls.
pub(crate) fn test_policy() -> crate::navigator::ScrapePolicy {
    crate::navigator::ScrapePolicy {
        wait_timeout: std::time::Duration::from_millis(50),
        poll_interval: std::time::Duration::from_millis(1),
        date_poll_attempts: 3,
        listing_recovery_attempts: None,
        stale_retry_attempts: None,
    }
}
