//! Element queries for the CA DMV appointment portal.
//!
//! These mirror the live site's markup and break when the portal is
//! redesigned. The card-title format ("N. Office Name") is load-bearing:
//! name extraction splits on the first `.`.

use crate::session::Target;

pub const APPOINTMENT_TYPE_URL: &str =
    "https://www.dmv.ca.gov/portal/appointments/select-appointment-type";

/// "Automobile" appointment-reason tile on the type-selection screen.
pub const AUTOMOBILE_REASON: Target =
    Target::Css("#appointment-type-selector .appointment-reason__selection [for=\"DT\"] .btn");

pub const LICENSE_NUMBER_FIELD: Target = Target::Css("#dlNumber");

pub const DATE_OF_BIRTH_FIELD: Target = Target::Css("#dob");

/// Submit button on the identity form. No class or id to hook onto.
pub const CONTINUE_BUTTON: Target = Target::XPath(
    "/html/body/main/div[2]/div/div[1]/div[1]/section/div[4]/div/div[2]/div/div[2]/button",
);

/// Pagination controls under the office listing. Includes prev/next arrows,
/// which is why callers filter for labels containing a digit.
pub const PAGE_BUTTONS: Target =
    Target::Css("#location-pagination .pagination__list button.page-numbers");

/// "Edit location" link shown on detail views; clicking it is the recovery
/// maneuver that forces the UI back to the listing (always page 1).
pub const EDIT_LOCATION: Target =
    Target::Css("div.appointment__panel [href=\"/portal/appointments/select-location\"]");

/// Office card headings, labeled "N. Office Name".
pub const CARD_TITLES: Target =
    Target::Css("li.location-results__list-item .search-card__title");

/// Per-card "select this office" buttons, in card order.
pub const SELECT_OFFICE_BUTTONS: Target =
    Target::Css("li.location-results__list-item button.btn--select-loc");

/// Calendar-day markers inside the month widget; rendered asynchronously
/// after an office is selected.
pub const CALENDAR_DAYS: Target =
    Target::Css("div.rbc-month-row div.rbc-event-allday span.rbc-event-day-num--mobile");

/// Address blocks on the office cards, in card order.
pub const ADDRESS_FIELDS: Target =
    Target::Css("li.location-results__list-item [itemprop=address]");
