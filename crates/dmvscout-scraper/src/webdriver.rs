//! [`BookingSession`] backed by a real browser over the WebDriver protocol.

use async_trait::async_trait;
use thirtyfour::error::WebDriverError;
use thirtyfour::{By, DesiredCapabilities, WebDriver};

use crate::error::ScrapeError;
use crate::session::{BookingSession, Target};

/// A live Firefox session driven through geckodriver.
///
/// Every operation re-queries its elements, so staleness is confined to the
/// window between `find_all` and the click/read on the returned handle —
/// exactly the window [`ScrapeError::Stale`] reports.
pub struct WebDriverSession {
    driver: Option<WebDriver>,
}

impl WebDriverSession {
    /// Connects to a running WebDriver endpoint and starts a Firefox
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::WebDriver`] if the endpoint is unreachable or
    /// the session cannot be created.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, ScrapeError> {
        let mut caps = DesiredCapabilities::firefox();
        if headless {
            caps.set_headless()?;
        }
        let driver = WebDriver::new(webdriver_url, caps).await?;
        Ok(Self {
            driver: Some(driver),
        })
    }

    fn driver(&self) -> Result<&WebDriver, ScrapeError> {
        self.driver.as_ref().ok_or(ScrapeError::SessionClosed)
    }
}

fn by(target: Target) -> By {
    match target {
        Target::Css(selector) => By::Css(selector),
        Target::XPath(path) => By::XPath(path),
    }
}

/// Maps protocol errors onto the scrape taxonomy, tagging them with the
/// query that produced them.
fn map_err(target: Target, err: WebDriverError) -> ScrapeError {
    match err {
        WebDriverError::StaleElementReference(_) => ScrapeError::Stale {
            selector: target.to_string(),
        },
        WebDriverError::NoSuchElement(_) => ScrapeError::MissingElement {
            selector: target.to_string(),
        },
        other => ScrapeError::WebDriver(other),
    }
}

#[async_trait]
impl BookingSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.driver()?.goto(url).await?;
        Ok(())
    }

    async fn element_texts(&mut self, target: Target) -> Result<Vec<String>, ScrapeError> {
        let elements = self
            .driver()?
            .find_all(by(target))
            .await
            .map_err(|e| map_err(target, e))?;

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element.text().await.map_err(|e| map_err(target, e))?;
            texts.push(text);
        }
        Ok(texts)
    }

    async fn click_nth(&mut self, target: Target, index: usize) -> Result<(), ScrapeError> {
        let elements = self
            .driver()?
            .find_all(by(target))
            .await
            .map_err(|e| map_err(target, e))?;

        let element = elements.get(index).ok_or_else(|| ScrapeError::MissingElement {
            selector: format!("{target} [index {index}]"),
        })?;
        element.click().await.map_err(|e| map_err(target, e))
    }

    async fn fill(&mut self, target: Target, text: &str) -> Result<(), ScrapeError> {
        let element = self
            .driver()?
            .find(by(target))
            .await
            .map_err(|e| map_err(target, e))?;
        element.send_keys(text).await.map_err(|e| map_err(target, e))
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        match self.driver.take() {
            Some(driver) => {
                driver.quit().await?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}
