pub mod error;
pub mod extract;
pub mod navigator;
pub mod normalize;
pub mod pagination;
pub mod scrape;
pub mod selectors;
pub mod session;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod sim;

pub use error::ScrapeError;
pub use navigator::{Navigator, ScrapePolicy};
pub use normalize::normalize_address;
pub use scrape::{scrape_offices, Applicant};
pub use session::{BookingSession, Target};
pub use webdriver::WebDriverSession;
