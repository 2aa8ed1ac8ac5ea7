//! catalog-scraper command line
//!
//! Logs into the catalog, scrapes one category/subcategory page range, and
//! writes the products and failed-products workbooks plus product images.

use anyhow::{Context, Result};
use catalog_scraper::browser::config::parse_window_size;
use catalog_scraper::{BrowserSession, CatalogScraper, ChromeCatalog, ConnectionOptions, Credentials, HttpImageSource,
                      LaunchOptions, OutputOptions, RunParams, SiteConfig, Timeouts, config::DEFAULT_BASE_URL};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-scraper", version, about = "Scrape a vendor product catalog into xlsx workbooks")]
struct Args {
    /// Launch browser in headed mode (default: headless)
    #[arg(long)]
    headed: bool,

    /// Browser window size as WIDTHxHEIGHT
    #[arg(long, default_value = "1920x1080", value_parser = window_size)]
    window_size: (u32, u32),

    /// Path to the Chrome/Chromium binary
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// Attach to a running browser's DevTools WebSocket instead of launching one
    #[arg(long)]
    ws_url: Option<String>,

    /// Catalog site root
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Login email
    #[arg(long, env = "CATALOG_EMAIL")]
    email: String,

    /// Login password
    #[arg(long, env = "CATALOG_PASSWORD", hide_env_values = true)]
    password: String,

    /// Listing `type` parameter
    #[arg(long, default_value_t = 2)]
    category_type: u32,

    #[arg(long, default_value_t = 156)]
    category_id: u32,

    #[arg(long, default_value_t = 1749)]
    subcategory_id: u32,

    /// First listing page to scrape
    #[arg(long, default_value_t = 2)]
    start_page: u32,

    /// Last listing page to scrape (inclusive)
    #[arg(long, default_value_t = 3)]
    end_page: u32,

    /// Directory for the workbooks
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Image folder, relative to the output directory unless absolute
    #[arg(long, default_value = "product_images")]
    image_dir: PathBuf,

    /// Workbook file name prefix
    #[arg(long, default_value = "Site1ScreenScrape")]
    file_prefix: String,
}

fn window_size(value: &str) -> std::result::Result<(u32, u32), String> {
    parse_window_size(value).ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let params = RunParams::new(args.category_type, args.category_id, args.subcategory_id)
        .pages(args.start_page, args.end_page);
    params.validate()?;

    let output = OutputOptions::new(&args.output_dir).image_dir(&args.image_dir).file_prefix(&args.file_prefix);
    let site = SiteConfig::new(&args.base_url);
    let credentials = Credentials::new(args.email, args.password);

    let session = match &args.ws_url {
        Some(ws_url) => BrowserSession::connect(ConnectionOptions::new(ws_url.as_str()))?,
        None => {
            let (width, height) = args.window_size;
            let mut options = LaunchOptions::new().headless(!args.headed).window_size(width, height);
            if let Some(path) = &args.chrome_path {
                options = options.chrome_path(path);
            }
            BrowserSession::launch(options)?
        }
    };

    log::info!("Browser mode: {}", if args.headed { "headed" } else { "headless" });

    let catalog = ChromeCatalog::new(session, site.clone(), Timeouts::default());
    let images = HttpImageSource::new()?;
    let mut scraper = CatalogScraper::new(catalog, images, site, params, &output)?;

    let result = scraper.run(&credentials);

    if let Err(e) = scraper.site().close() {
        log::warn!("Failed to close browser: {}", e);
    }

    let summary = result.context("Scrape run failed")?;
    log::info!(
        "Saved {} products ({} failed) to {}",
        summary.products_saved,
        summary.products_failed,
        scraper.products().path().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_default_run_parameters() {
        let args = Args::try_parse_from(["catalog-scraper", "--email", "a@b.c", "--password", "pw"]).unwrap();

        assert!(!args.headed);
        assert_eq!(args.window_size, (1920, 1080));
        assert_eq!((args.category_type, args.category_id, args.subcategory_id), (2, 156, 1749));
        assert_eq!((args.start_page, args.end_page), (2, 3));
        assert_eq!(args.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_bad_window_size_is_rejected() {
        let result = Args::try_parse_from([
            "catalog-scraper",
            "--email",
            "a@b.c",
            "--password",
            "pw",
            "--window-size",
            "huge",
        ]);
        assert!(result.is_err());
    }
}
