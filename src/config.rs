//! Run configuration: which site, which listing, where output goes, how long to wait

use crate::error::{Result, ScrapeError};
use std::{path::{Path, PathBuf},
          time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://app.provi.com";

/// Catalog site location
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string() }
    }
}

impl SiteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Listing URL for the first page of a run, sorted by best sellers
    pub fn listing_url(&self, params: &RunParams) -> Result<Url> {
        let bad_base =
            |e: url::ParseError| ScrapeError::InvalidConfig(format!("Bad base URL '{}': {}", self.base_url, e));
        let mut base = Url::parse(&self.base_url).map_err(bad_base)?;

        // Treat the last path segment as a directory so it is kept by join
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base.join("product_listing").map_err(bad_base)?;

        url.query_pairs_mut()
            .append_pair("type", &params.category_type.to_string())
            .append_pair("product_sort", "best-seller")
            .append_pair("c", &params.category_id.to_string())
            .append_pair("fired_filter", "subcategory_id")
            .append_pair("s", &params.subcategory_id.to_string())
            .append_pair("page", &params.start_page.to_string());

        Ok(url)
    }
}

/// Login credentials
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("email", &self.email).field("password", &"***").finish()
    }
}

/// Category/subcategory and page range to scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub category_type: u32,
    pub category_id: u32,
    pub subcategory_id: u32,
    /// First page, 1-based
    pub start_page: u32,
    /// Last page, inclusive
    pub end_page: u32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self { category_type: 2, category_id: 156, subcategory_id: 1749, start_page: 2, end_page: 3 }
    }
}

impl RunParams {
    pub fn new(category_type: u32, category_id: u32, subcategory_id: u32) -> Self {
        Self { category_type, category_id, subcategory_id, start_page: 1, end_page: 1 }
    }

    pub fn pages(mut self, start_page: u32, end_page: u32) -> Self {
        self.start_page = start_page;
        self.end_page = end_page;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_page == 0 {
            return Err(ScrapeError::InvalidConfig("start page must be at least 1".to_string()));
        }
        if self.end_page < self.start_page {
            return Err(ScrapeError::InvalidConfig(format!(
                "end page {} is before start page {}",
                self.end_page, self.start_page
            )));
        }
        Ok(())
    }

    /// `{type}-{category}-{subcategory}-{start:04}-{end:04}`, shared by both workbook names
    pub fn file_stem(&self) -> String {
        format!(
            "{}-{}-{}-{:04}-{:04}",
            self.category_type, self.category_id, self.subcategory_id, self.start_page, self.end_page
        )
    }
}

/// Where workbooks and images are written
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    /// Image folder; relative paths resolve against `output_dir`
    pub image_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            image_dir: PathBuf::from("product_images"),
            file_prefix: "Site1ScreenScrape".to_string(),
        }
    }
}

impl OutputOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into(), ..Default::default() }
    }

    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn products_path(&self, params: &RunParams) -> PathBuf {
        self.output_dir.join(format!("{}-{}.xlsx", self.file_prefix, params.file_stem()))
    }

    pub fn failed_path(&self, params: &RunParams) -> PathBuf {
        self.output_dir.join(format!("Err-{}-{}.xlsx", self.file_prefix, params.file_stem()))
    }

    pub fn image_path(&self) -> PathBuf {
        resolve(&self.output_dir, &self.image_dir)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { base.join(path) }
}

/// Fixed waits applied to markup queries
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// Login fields, listing container, next-page button
    pub element: Duration,
    /// Post-login landing and product detail pages
    pub page: Duration,
    /// Pause after clicking to the next listing page
    pub settle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { element: Duration::from_secs(10), page: Duration::from_secs(30), settle: Duration::from_secs(1) }
    }
}
