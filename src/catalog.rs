//! Browser-side steps of a scrape run

use crate::browser::BrowserSession;
use crate::config::{Credentials, SiteConfig, Timeouts};
use crate::error::{Result, ScrapeError};
use crate::extract::{selectors::live, ListingCard, ListingSnapshot, LISTING_CARDS_JS};
use headless_chrome::Tab;
use std::sync::Arc;

/// Rendered product detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    /// URL after any redirects
    pub url: String,
    pub html: String,
}

/// The catalog site as seen by the scrape loop
pub trait CatalogSite {
    /// Sign in; the run cannot continue without it
    fn login(&mut self, credentials: &Credentials) -> Result<()>;

    /// Load the first listing page
    fn open_listing(&mut self, url: &str) -> Result<()>;

    /// Product cards on the current listing page, in page order
    fn listing_cards(&mut self) -> Result<Vec<ListingCard>>;

    /// Open a product in a secondary tab, snapshot it, and close the tab
    fn product_page(&mut self, href: &str) -> Result<ProductPage>;

    /// Move the listing to the following page
    fn next_page(&mut self) -> Result<()>;
}

/// [`CatalogSite`] backed by a Chrome session
pub struct ChromeCatalog {
    session: BrowserSession,
    site: SiteConfig,
    timeouts: Timeouts,
}

impl ChromeCatalog {
    pub fn new(session: BrowserSession, site: SiteConfig, timeouts: Timeouts) -> Self {
        Self { session, site, timeouts }
    }

    pub fn session(&self) -> &BrowserSession {
        &self.session
    }

    /// Close the browser
    pub fn close(&self) -> Result<()> {
        self.session.close()
    }

    fn snapshot_product(&self, tab: &Arc<Tab>) -> Result<ProductPage> {
        self.session.wait_for_element(tab, live::PRODUCT_READY, self.timeouts.page)?;

        // Breadcrumbs render after the product box; a page without them is still usable
        if let Err(e) = self.session.wait_for_element(tab, live::BREADCRUMBS, self.timeouts.element) {
            log::debug!("No breadcrumbs on {}: {}", tab.get_url(), e);
        }

        if self.session.click_xpath_if_present(tab, live::SHOW_MORE) {
            log::debug!("Expanded raw materials list");
        }

        let html = self.session.page_html(tab)?;
        Ok(ProductPage { url: tab.get_url(), html })
    }
}

impl CatalogSite for ChromeCatalog {
    fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let login_failed = |e: ScrapeError| ScrapeError::LoginFailed(e.to_string());
        let tab = self.session.main_tab();

        self.session.navigate(&self.site.base_url).map_err(login_failed)?;
        self.session
            .type_into(tab, live::LOGIN_EMAIL, &credentials.email, self.timeouts.element)
            .map_err(login_failed)?;
        self.session
            .type_into(tab, live::LOGIN_PASSWORD, &credentials.password, self.timeouts.element)
            .map_err(login_failed)?;
        self.session.click_xpath(tab, live::LOGIN_BUTTON, self.timeouts.element).map_err(login_failed)?;
        self.session.wait_for_element(tab, live::LOGGED_IN, self.timeouts.page).map_err(login_failed)?;

        log::info!("Logged in as {}", credentials.email);
        Ok(())
    }

    fn open_listing(&mut self, url: &str) -> Result<()> {
        log::info!("Opening listing {}", url);
        self.session.navigate(url)
    }

    fn listing_cards(&mut self) -> Result<Vec<ListingCard>> {
        let tab = self.session.main_tab();
        self.session
            .wait_for_element(tab, live::LISTING, self.timeouts.element)
            .map_err(|e| ScrapeError::ListingFailed(e.to_string()))?;

        let snapshot: ListingSnapshot = self.session.evaluate_json(tab, LISTING_CARDS_JS)?;
        snapshot.into_cards()
    }

    fn product_page(&mut self, href: &str) -> Result<ProductPage> {
        let tab = self.session.open_tab(href)?;
        let page = self.snapshot_product(&tab);
        self.session.close_tab(&tab);
        page
    }

    fn next_page(&mut self) -> Result<()> {
        self.session.click_enabled(self.session.main_tab(), live::NEXT_PAGE, self.timeouts.element)?;
        std::thread::sleep(self.timeouts.settle);
        Ok(())
    }
}
