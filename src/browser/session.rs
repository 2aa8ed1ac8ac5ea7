use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            error::{Result, ScrapeError}};
use headless_chrome::{Browser, Element, Tab};
use serde::de::DeserializeOwned;
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that owns a Chrome/Chromium instance and its main tab
///
/// The main tab holds the listing pages for the whole run. Product pages are
/// opened in secondary tabs with [`BrowserSession::open_tab`] and closed again
/// with [`BrowserSession::close_tab`].
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Tab used for login and listing pages
    main_tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Hide the automation banner and navigator.webdriver flag
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));
        launch_opts.args.push(OsStr::new("--disable-gpu"));

        // A full category run outlives the default 30 second idle timeout
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| ScrapeError::LaunchFailed(e.to_string()))?;

        let main_tab =
            browser.new_tab().map_err(|e| ScrapeError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, main_tab })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url).map_err(|e| ScrapeError::ConnectionFailed(e.to_string()))?;

        let main_tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::ConnectionFailed(format!("Failed to create tab: {}", e)))?;
        main_tab.set_default_timeout(Duration::from_millis(options.timeout));

        Ok(Self { browser, main_tab })
    }

    /// Tab that holds login and listing pages
    pub fn main_tab(&self) -> &Arc<Tab> {
        &self.main_tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate the main tab to a URL and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.main_tab
            .navigate_to(url)
            .map_err(|e| ScrapeError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        self.wait_for_navigation()
    }

    /// Wait for the main tab's navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.main_tab
            .wait_until_navigated()
            .map_err(|e| ScrapeError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Poll for an element matching a CSS selector until `timeout` elapses
    pub fn wait_for_element<'a>(
        &self,
        tab: &'a Arc<Tab>,
        css_selector: &str,
        timeout: Duration,
    ) -> Result<Element<'a>> {
        tab.wait_for_element_with_custom_timeout(css_selector, timeout).map_err(|e| {
            ScrapeError::ElementNotFound(format!("Element '{}' not found within {:?}: {}", css_selector, timeout, e))
        })
    }

    /// Poll for an element matching an XPath query until `timeout` elapses
    pub fn wait_for_xpath<'a>(&self, tab: &'a Arc<Tab>, xpath: &str, timeout: Duration) -> Result<Element<'a>> {
        tab.wait_for_xpath_with_custom_timeout(xpath, timeout).map_err(|e| {
            ScrapeError::ElementNotFound(format!("Element '{}' not found within {:?}: {}", xpath, timeout, e))
        })
    }

    /// Wait for an input field, then type text into it
    pub fn type_into(&self, tab: &Arc<Tab>, css_selector: &str, text: &str, timeout: Duration) -> Result<()> {
        self.wait_for_element(tab, css_selector, timeout)?
            .type_into(text)
            .map_err(|e| ScrapeError::TabOperationFailed(format!("Failed to type into '{}': {}", css_selector, e)))?;

        Ok(())
    }

    /// Wait for an element by CSS selector and click it, failing if it is disabled
    pub fn click_enabled(&self, tab: &Arc<Tab>, css_selector: &str, timeout: Duration) -> Result<()> {
        let element = self.wait_for_element(tab, css_selector, timeout)?;

        let attribute = |name: &str| {
            element.get_attribute_value(name).map_err(|e| {
                ScrapeError::TabOperationFailed(format!("Failed to read '{}' of '{}': {}", name, css_selector, e))
            })
        };
        if is_disabled(attribute("disabled")?.as_deref(), attribute("aria-disabled")?.as_deref()) {
            return Err(ScrapeError::TabOperationFailed(format!("'{}' is disabled", css_selector)));
        }

        element
            .click()
            .map_err(|e| ScrapeError::TabOperationFailed(format!("Failed to click '{}': {}", css_selector, e)))?;

        Ok(())
    }

    /// Wait for an element by XPath, then click it
    pub fn click_xpath(&self, tab: &Arc<Tab>, xpath: &str, timeout: Duration) -> Result<()> {
        self.wait_for_xpath(tab, xpath, timeout)?
            .click()
            .map_err(|e| ScrapeError::TabOperationFailed(format!("Failed to click '{}': {}", xpath, e)))?;

        Ok(())
    }

    /// Click an element by XPath if it is present right now; returns whether a click happened
    pub fn click_xpath_if_present(&self, tab: &Arc<Tab>, xpath: &str) -> bool {
        match tab.find_element_by_xpath(xpath) {
            Ok(element) => match element.click() {
                Ok(_) => true,
                Err(e) => {
                    log::debug!("Found '{}' but could not click it: {}", xpath, e);
                    false
                }
            },
            Err(_) => false,
        }
    }

    /// Open a URL in a new tab and wait for it to load
    pub fn open_tab(&self, url: &str) -> Result<Arc<Tab>> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| ScrapeError::TabOperationFailed(format!("Failed to create tab: {}", e)))?;

        let loaded = tab
            .navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| ScrapeError::NavigationFailed(format!("Failed to open {}: {}", url, e)));

        if let Err(e) = loaded {
            self.close_tab(&tab);
            return Err(e);
        }

        Ok(tab)
    }

    /// Close a secondary tab; errors are logged and otherwise ignored
    pub fn close_tab(&self, tab: &Arc<Tab>) {
        if let Err(e) = tab.close(true) {
            log::warn!("Failed to close tab {}: {}", tab.get_url(), e);
        }
    }

    /// Serialized HTML of the tab's current document
    pub fn page_html(&self, tab: &Arc<Tab>) -> Result<String> {
        tab.get_content()
            .map_err(|e| ScrapeError::EvaluationFailed(format!("Failed to read page content: {}", e)))
    }

    /// Evaluate a script that returns a JSON string and deserialize the result
    pub fn evaluate_json<T: DeserializeOwned>(&self, tab: &Arc<Tab>, js_code: &str) -> Result<T> {
        let result = tab
            .evaluate(js_code, false)
            .map_err(|e| ScrapeError::EvaluationFailed(format!("Failed to execute script: {}", e)))?;

        let json_value =
            result.value.ok_or_else(|| ScrapeError::EvaluationFailed("No value returned from script".to_string()))?;

        // The script returns a JSON string, so decode the string first
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| ScrapeError::EvaluationFailed(format!("Failed to get JSON string: {}", e)))?;

        serde_json::from_str(&json_str)
            .map_err(|e| ScrapeError::EvaluationFailed(format!("Failed to parse script result: {}", e)))
    }

    /// Close the browser
    pub fn close(&self) -> Result<()> {
        // headless_chrome closes the process when Browser is dropped; closing the tabs
        // here flushes page unload handlers first
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| ScrapeError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        for tab in tabs {
            let _ = tab.close(false);
        }
        Ok(())
    }
}

/// `disabled` counts when present at all; `aria-disabled` only when "true"
fn is_disabled(disabled: Option<&str>, aria_disabled: Option<&str>) -> bool {
    disabled.is_some() || aria_disabled.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
