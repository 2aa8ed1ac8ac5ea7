//! # catalog-scraper
//!
//! Scrapes a vendor product catalog through a headless Chrome session
//! (Chrome DevTools Protocol) into `.xlsx` workbooks.
//!
//! A run logs in once, pages through one category/subcategory listing, opens
//! every product card in a secondary tab, reads a fixed set of fields off the
//! detail page, downloads the product image, and appends one row per product.
//! Products that fail are written to a separate "failed" workbook and the run
//! moves on.
//!
//! ## Command line
//!
//! ```bash
//! CATALOG_EMAIL=buyer@example.com CATALOG_PASSWORD=... \
//!     cargo run -- --category-type 2 --category-id 156 --subcategory-id 1749 --start-page 2 --end-page 3
//!
//! # Watch the browser while it works
//! cargo run -- --headed ...
//! ```
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use catalog_scraper::{BrowserSession, CatalogScraper, ChromeCatalog, Credentials, HttpImageSource,
//!                       LaunchOptions, OutputOptions, RunParams, SiteConfig, Timeouts};
//!
//! # fn main() -> catalog_scraper::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::new().headless(true))?;
//! let site = SiteConfig::default();
//! let catalog = ChromeCatalog::new(session, site.clone(), Timeouts::default());
//!
//! let params = RunParams::new(2, 156, 1749).pages(1, 3);
//! let mut scraper = CatalogScraper::new(catalog, HttpImageSource::new()?, site, params, &OutputOptions::default())?;
//!
//! let summary = scraper.run(&Credentials::new("buyer@example.com", "secret"))?;
//! println!("{} products saved, {} failed", summary.products_saved, summary.products_failed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Chrome session management and launch options
//! - [`catalog`]: the browser-side steps of a run behind the [`CatalogSite`] trait
//! - [`extract`]: field extraction from product page snapshots
//! - [`runner`]: the page/product loop and failure accounting
//! - [`record`], [`workbook`], [`images`]: output rows, xlsx files, product images
//! - [`config`]: run parameters, output locations, timeouts
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod images;
pub mod record;
pub mod runner;
pub mod workbook;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use catalog::{CatalogSite, ChromeCatalog, ProductPage};
pub use config::{Credentials, OutputOptions, RunParams, SiteConfig, Timeouts};
pub use error::{Result, ScrapeError};
pub use images::{HttpImageSource, ImageSource, ImageStore};
pub use record::{FailedRecord, ProductDetails, ProductRecord, SeqNum};
pub use runner::{CatalogScraper, RunSummary};
pub use workbook::Sheet;
