use crate::catalog::CatalogSite;
use crate::config::{Credentials, OutputOptions, RunParams, SiteConfig};
use crate::error::{Result, ScrapeError};
use crate::extract::{extract_details, extract_image_url, product_number, ListingCard};
use crate::images::{ImageSource, ImageStore};
use crate::record::{FailedRecord, ProductRecord, SeqNum, FAILED_HEADERS, PRODUCT_HEADERS};
use crate::workbook::Sheet;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_visited: u32,
    pub products_saved: usize,
    pub products_failed: usize,
    /// Pages whose product list could not be read
    pub listing_failures: u32,
    /// False when the run stopped before reaching the end page
    pub reached_end_page: bool,
}

/// Drives a scrape run: pages, product cards, rows, and failures
pub struct CatalogScraper<S, I> {
    site: S,
    images: I,
    image_store: ImageStore,
    site_config: SiteConfig,
    params: RunParams,
    products: Sheet,
    failed: Sheet,
}

impl<S: CatalogSite, I: ImageSource> CatalogScraper<S, I> {
    /// Prepare output locations; creates the image folder
    pub fn new(site: S, images: I, site_config: SiteConfig, params: RunParams, output: &OutputOptions) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            site,
            images,
            image_store: ImageStore::create(output.image_path())?,
            site_config,
            params,
            products: Sheet::new(output.products_path(&params), &PRODUCT_HEADERS),
            failed: Sheet::new(output.failed_path(&params), &FAILED_HEADERS),
        })
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    pub fn products(&self) -> &Sheet {
        &self.products
    }

    pub fn failed(&self) -> &Sheet {
        &self.failed
    }

    /// Log in, then scrape every page from `start_page` through `end_page`
    pub fn run(&mut self, credentials: &Credentials) -> Result<RunSummary> {
        self.site.login(credentials)?;

        let url = self.site_config.listing_url(&self.params)?;
        self.site.open_listing(url.as_str())?;

        let mut summary = RunSummary::default();
        let mut page = self.params.start_page;

        loop {
            self.scrape_page(page, &mut summary);
            summary.pages_visited += 1;

            self.save()?;

            if page >= self.params.end_page {
                log::info!("Reached the end page");
                summary.reached_end_page = true;
                break;
            }

            if let Err(e) = self.site.next_page() {
                log::error!("An error occurred while navigating to page {}: {}", page + 1, e);
                break;
            }
            page += 1;
        }

        log::info!(
            "Run finished: {} pages, {} products saved, {} failed",
            summary.pages_visited,
            summary.products_saved,
            summary.products_failed
        );
        Ok(summary)
    }

    fn save(&self) -> Result<()> {
        self.products.save()?;
        self.failed.save()?;
        Ok(())
    }

    fn scrape_page(&mut self, page: u32, summary: &mut RunSummary) {
        let cards = match self.site.listing_cards() {
            Ok(cards) => cards,
            Err(e) => {
                log::error!("An error occurred while processing the product list on page {}: {}", page, e);
                summary.listing_failures += 1;
                return;
            }
        };

        if cards.is_empty() {
            log::info!("No products found on page {}", page);
            return;
        }

        for (index, card) in cards.iter().enumerate() {
            let seq_num = SeqNum::new(&self.params, page, index);

            match self.scrape_product(index, card, seq_num) {
                Ok(record) => {
                    self.products.append(record.to_row());
                    summary.products_saved += 1;
                }
                Err(e) => {
                    let product_name = card.name.clone().unwrap_or_default();
                    log::warn!("An error occurred while processing product {}: {} : {}", index + 1, product_name, e);
                    self.failed.append(FailedRecord { product_name, seq_num }.to_row());
                    summary.products_failed += 1;
                }
            }
        }

        log::info!("All products have been processed on page {}", page);
    }

    fn scrape_product(&mut self, index: usize, card: &ListingCard, seq_num: SeqNum) -> Result<ProductRecord> {
        let missing_link = || ScrapeError::ElementNotFound("product card has no name link".to_string());
        let name = card.name.as_deref().ok_or_else(missing_link)?;
        let href = card.href.as_deref().ok_or_else(missing_link)?;

        log::info!("Processing product {}: {}", index + 1, name);

        let page = self.site.product_page(href)?;
        let number = product_number(&page.url)?;
        let details = extract_details(&page.html);

        let image_url =
            extract_image_url(&page.html, &page.url).ok_or_else(|| ScrapeError::ImageMissing(page.url.clone()))?;
        log::debug!("image Url: {}", image_url);

        let bytes = self.images.fetch(&image_url)?;
        let image_path = self.image_store.save(name, &number, &bytes)?;
        log::debug!("Saved image to {}", image_path.display());

        let record = ProductRecord::new(details, number, seq_num);
        log::debug!("All fields: {:?}", record);
        Ok(record)
    }
}
