//! Markup queries for the catalog site.
//!
//! Every page-structure assumption lives here. When a field starts coming
//! back empty, save the product page HTML, update the query, and add the
//! page as a fixture.

use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// Queries the browser runs against the live page.
pub mod live {
    pub const LOGIN_EMAIL: &str = "input#user_email";
    pub const LOGIN_PASSWORD: &str = "input#user_password";
    pub const LOGIN_BUTTON: &str = "//button[text()='Log in']";
    /// Present once the retailer landing page has rendered
    pub const LOGGED_IN: &str = "input#retailer_header_product_search_input";

    pub const LISTING: &str = "div.product-line-list[data-testid='product-line-list']";
    pub const NEXT_PAGE: &str = "button#next-page";

    pub const PRODUCT_READY: &str = "div[data-testid='product-line-box']";
    pub const BREADCRUMBS: &str = "div[data-testid='breadcrumb-navigation']";
    pub const SHOW_MORE: &str = "//a[contains(text(), 'show more...')]";
}

fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid selector {selector:?}: {e}"))
}

pub static PRODUCT_TYPE: LazyLock<Selector> = LazyLock::new(|| {
    css("div[data-testid='breadcrumb-navigation'] ol li[data-testid='product-type-breadcrumb']")
});

pub static CATEGORY: LazyLock<Selector> =
    LazyLock::new(|| css("div[data-testid='breadcrumb-navigation'] ol li[data-testid='category-breadcrumb']"));

pub static SUBCATEGORY: LazyLock<Selector> =
    LazyLock::new(|| css("div[data-testid='breadcrumb-navigation'] ol li[data-testid='subcategory-breadcrumb']"));

pub static PRODUCT_NAME: LazyLock<Selector> = LazyLock::new(|| css("h1.fizz-heading-1.notranslate.fizz-stack-8"));

pub static BRAND_FAMILY: LazyLock<Selector> =
    LazyLock::new(|| css("section[data-testid='brand_family_best_sellers-carousel'] header div h3"));

/// Only the first matching list holds the product's own containers
pub static CONTAINER_CHOICES: LazyLock<Selector> = LazyLock::new(|| css("div ul[data-testid='container-choices']"));

/// Vintage picker, relative to its card
pub static BUTTON_GROUP: LazyLock<Selector> = LazyLock::new(|| css("div[class*='button-group']"));

pub static PRODUCT_IMAGE: LazyLock<Selector> = LazyLock::new(|| css("#product-image img.product-image-class"));

pub static DIV: LazyLock<Selector> = LazyLock::new(|| css("div"));
pub static SPAN: LazyLock<Selector> = LazyLock::new(|| css("span"));
pub static H2: LazyLock<Selector> = LazyLock::new(|| css("h2"));
pub static P: LazyLock<Selector> = LazyLock::new(|| css("p"));
pub static LI: LazyLock<Selector> = LazyLock::new(|| css("li"));
pub static BUTTON: LazyLock<Selector> = LazyLock::new(|| css("button"));

/// Product number segment of a detail page path
pub static PRODUCT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/products/(\d+)").unwrap_or_else(|e| panic!("invalid product number pattern: {e}")));

pub const REGION_LABEL: &str = "Region:";
pub const COUNTRY_LABEL: &str = "Country:";
pub const ABV_LABEL: &str = "ABV:";
pub const APPELLATION_LABEL: &str = "Appellation";
pub const DESCRIPTION_LABEL: &str = "Product information";
pub const ABOUT_PRODUCER_LABEL: &str = "About the producer";
pub const FEATURE_LABEL: &str = "Feature";
pub const RAW_MATERIALS_LABEL: &str = "Raw Materials";
pub const PRODUCER_LABEL: &str = "Producer:";
pub const VINTAGE_LABEL: &str = "Vintage";
pub const BRAND_FAMILY_PREFIX: &str = "More from ";
/// Collapse toggle rendered among the raw-material links once expanded
pub const SHOW_LESS: &str = "show less";
/// Class fragment of the card wrapping the vintage picker
pub const CARD_CLASS: &str = "fizz-card";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selectors_parse() {
        for selector in [
            &PRODUCT_TYPE,
            &CATEGORY,
            &SUBCATEGORY,
            &PRODUCT_NAME,
            &BRAND_FAMILY,
            &CONTAINER_CHOICES,
            &BUTTON_GROUP,
            &PRODUCT_IMAGE,
            &DIV,
            &SPAN,
            &H2,
            &P,
            &LI,
            &BUTTON,
        ] {
            LazyLock::force(selector);
        }
    }

    #[test]
    fn test_product_number_pattern() {
        let captures = PRODUCT_NUMBER.captures("/products/products/42").unwrap();
        assert_eq!(&captures[1], "42");
        assert!(PRODUCT_NUMBER.captures("/products/abc").is_none());
    }

    #[test]
    fn test_live_css_selectors_parse() {
        for selector in [live::LOGIN_EMAIL, live::LOGIN_PASSWORD, live::LOGGED_IN, live::LISTING, live::NEXT_PAGE,
                         live::PRODUCT_READY, live::BREADCRUMBS]
        {
            assert!(Selector::parse(selector).is_ok(), "{}", selector);
        }
    }
}
