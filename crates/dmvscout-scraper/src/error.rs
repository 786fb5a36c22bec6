use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("browser session already closed")]
    SessionClosed,

    #[error("stale element reference for {selector}")]
    Stale { selector: String },

    #[error("element not found: {selector}")]
    MissingElement { selector: String },

    #[error("timed out after {waited_ms}ms waiting for {selector}")]
    WaitTimeout { selector: String, waited_ms: u64 },

    #[error("listing page could not be recovered after {attempts} attempts")]
    RecoveryExhausted { attempts: u32 },

    #[error("gave up on office \"{office}\" after {attempts} stale-element retries")]
    StaleRetriesExhausted { office: String, attempts: u32 },

    #[error("page {page} produced {offices} offices but {addresses} address fields")]
    AddressCountMismatch {
        page: usize,
        offices: usize,
        addresses: usize,
    },
}
