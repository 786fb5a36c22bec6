//! The low-level browser primitives the scrape core is written against.
//!
//! Everything above this trait re-queries the DOM on every call instead of
//! holding element references, which is what makes the retry and recovery
//! loops safe: a stale reference can only surface inside a single trait
//! call, never across two of them.

use async_trait::async_trait;

use crate::error::ScrapeError;

/// An element query, CSS or XPath. The booking portal is addressed almost
/// entirely by CSS selector; the one exception is the identity-form submit
/// button, which has no usable class or id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Css(&'static str),
    XPath(&'static str),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Css(selector) => write!(f, "css:{selector}"),
            Target::XPath(path) => write!(f, "xpath:{path}"),
        }
    }
}

/// One live browser session on the booking site.
///
/// Implementations look elements up fresh on every call. `element_texts`
/// returns an empty list (not an error) when nothing matches, because "zero
/// matches" is the signal the recovery logic keys off. `click_nth` and
/// `fill` return [`ScrapeError::MissingElement`] when the target is absent
/// and [`ScrapeError::Stale`] when the element re-rendered between lookup
/// and use.
#[async_trait]
pub trait BookingSession: Send {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Visible text of every element matching `target`, in document order.
    async fn element_texts(&mut self, target: Target) -> Result<Vec<String>, ScrapeError>;

    /// Clicks the `index`-th (0-based) element matching `target`.
    async fn click_nth(&mut self, target: Target, index: usize) -> Result<(), ScrapeError>;

    /// Types `text` into the first element matching `target`.
    async fn fill(&mut self, target: Target, text: &str) -> Result<(), ScrapeError>;

    /// Tears the session down. The browser process must not outlive this.
    async fn close(&mut self) -> Result<(), ScrapeError>;
}
