//! Field extraction from product detail and listing pages
//!
//! The browser hands over a snapshot of the rendered product page; every
//! field is then read from that snapshot independently. A missing element or
//! an unexpected shape yields `None` for that field only.

pub mod selectors;

use crate::error::{Result, ScrapeError};
use crate::record::{sanitize_field, ProductDetails};
use scraper::{ElementRef, Html, Node, Selector};
use serde::Deserialize;
use url::Url;

/// Script run in the listing tab; returns a JSON string of [`ListingSnapshot`]
pub const LISTING_CARDS_JS: &str = include_str!("listing_cards.js");

/// One product card on a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingCard {
    /// Link text of the card's product name
    #[serde(default)]
    pub name: Option<String>,

    /// Absolute URL of the product detail page
    #[serde(default)]
    pub href: Option<String>,
}

/// Product cards found in the listing container
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingSnapshot {
    /// Whether the listing container exists at all
    pub found: bool,

    #[serde(default)]
    pub cards: Vec<ListingCard>,
}

impl ListingSnapshot {
    pub fn into_cards(self) -> Result<Vec<ListingCard>> {
        if !self.found {
            return Err(ScrapeError::ListingFailed("product list container not found".to_string()));
        }
        Ok(self.cards)
    }
}

/// Tags rendered on their own line by a browser
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table",
    "tr", "ul",
];

/// Rendered text of an element: block elements break lines, whitespace collapses, blank lines drop
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            // Source newlines are plain whitespace; only block boundaries break lines
            Node::Text(text) => out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c })),
            Node::Element(el) => {
                let name = el.name();
                if matches!(name, "script" | "style" | "noscript") {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Text directly inside an element, ignoring descendants
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect()
}

/// Elements matching `tag` whose own text contains `label`
fn labelled<'a>(doc: &'a Html, tag: &'a Selector, label: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.select(tag).filter(move |el| own_text(*el).contains(label))
}

/// Element siblings after `element` with the given tag name
fn following_siblings<'a>(element: ElementRef<'a>, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.next_siblings().filter_map(ElementRef::wrap).filter(move |sib| sib.value().name() == tag)
}

/// Direct children with the given tag name
fn children_named<'a>(element: ElementRef<'a>, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap).filter(move |child| child.value().name() == tag)
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().map(inner_text)
}

/// `<label_tag>label</label_tag><sibling_tag>value</sibling_tag>`
fn sibling_value(doc: &Html, label_tag: &Selector, label: &str, sibling_tag: &str) -> Option<String> {
    labelled(doc, label_tag, label)
        .flat_map(|el| following_siblings(el, sibling_tag))
        .next()
        .map(inner_text)
}

/// `<div>label</div><div><a>value</a></div>`
fn sibling_link_value(doc: &Html, label: &str) -> Option<String> {
    labelled(doc, &selectors::DIV, label)
        .flat_map(|el| following_siblings(el, "div"))
        .flat_map(|sib| children_named(sib, "a"))
        .next()
        .map(inner_text)
}

fn joined<'a>(texts: impl Iterator<Item = ElementRef<'a>>) -> String {
    texts.map(|el| inner_text(el).trim().to_string()).collect::<Vec<_>>().join("|")
}

fn raw_materials(doc: &Html) -> Option<String> {
    let label = labelled(doc, &selectors::SPAN, selectors::RAW_MATERIALS_LABEL).next()?;
    let names: Vec<String> = following_siblings(label, "a")
        .map(|a| inner_text(a).trim().to_string())
        .filter(|text| !text.contains(selectors::SHOW_LESS))
        .collect();
    Some(names.join("|"))
}

fn producer(doc: &Html) -> Option<String> {
    let label = labelled(doc, &selectors::SPAN, selectors::PRODUCER_LABEL).next()?;
    let paragraph = label.ancestors().filter_map(ElementRef::wrap).find(|el| el.value().name() == "p")?;
    let text = inner_text(paragraph);
    let (_, rest) = text.split_once(selectors::PRODUCER_LABEL)?;
    Some(rest.trim().to_string())
}

fn brand_family(doc: &Html) -> Option<String> {
    let heading = first_text(doc, &selectors::BRAND_FAMILY)?;
    let (_, family) = heading.split_once(selectors::BRAND_FAMILY_PREFIX)?;
    Some(sanitize_field(family.trim()))
}

fn vintage(doc: &Html) -> Option<String> {
    let label = doc.select(&selectors::P).find(|p| own_text(*p).trim() == selectors::VINTAGE_LABEL)?;
    let card = label.ancestors().filter_map(ElementRef::wrap).find(|el| {
        el.value().name() == "div" && el.value().attr("class").is_some_and(|c| c.contains(selectors::CARD_CLASS))
    })?;
    let group = card.select(&selectors::BUTTON_GROUP).next()?;
    Some(joined(group.select(&selectors::BUTTON)))
}

fn container_type(doc: &Html) -> Option<String> {
    let list = doc.select(&selectors::CONTAINER_CHOICES).next()?;
    Some(joined(list.select(&selectors::LI)))
}

/// Read every product field from a detail page snapshot
pub fn extract_details(html: &str) -> ProductDetails {
    let doc = Html::parse_document(html);

    ProductDetails {
        product_name: first_text(&doc, &selectors::PRODUCT_NAME).map(|s| sanitize_field(&s)),
        region: sibling_link_value(&doc, selectors::REGION_LABEL),
        product_type: first_text(&doc, &selectors::PRODUCT_TYPE),
        category: first_text(&doc, &selectors::CATEGORY),
        subcategory: first_text(&doc, &selectors::SUBCATEGORY),
        container_type: container_type(&doc),
        product_description: sibling_value(&doc, &selectors::H2, selectors::DESCRIPTION_LABEL, "div")
            .map(|s| sanitize_field(&s)),
        probable_brand_family: brand_family(&doc),
        country: sibling_link_value(&doc, selectors::COUNTRY_LABEL).map(|s| sanitize_field(&s)),
        abv: sibling_value(&doc, &selectors::DIV, selectors::ABV_LABEL, "div"),
        vintage: vintage(&doc),
        raw_materials: raw_materials(&doc),
        appellation: sibling_link_value(&doc, selectors::APPELLATION_LABEL),
        producer: producer(&doc),
        feature: sibling_value(&doc, &selectors::SPAN, selectors::FEATURE_LABEL, "a").map(|s| sanitize_field(&s)),
        about_producer: sibling_value(&doc, &selectors::H2, selectors::ABOUT_PRODUCER_LABEL, "p")
            .map(|s| sanitize_field(&s)),
    }
}

/// Absolute URL of the primary product image
///
/// Protocol-relative sources are pinned to `http:`; relative ones resolve
/// against the product page URL.
pub fn extract_image_url(html: &str, page_url: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let src = doc.select(&selectors::PRODUCT_IMAGE).next()?.value().attr("src")?.trim();
    if src.is_empty() {
        return None;
    }

    let src = normalize_image_url(src);
    match Url::parse(page_url).and_then(|base| base.join(&src)) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            log::debug!("Could not resolve image src '{}' against {}: {}", src, page_url, e);
            Some(src)
        }
    }
}

pub fn normalize_image_url(src: &str) -> String {
    if src.starts_with("//") { format!("http:{}", src) } else { src.to_string() }
}

/// Site product number from a detail page URL (`.../products/<digits>...`)
pub fn product_number(page_url: &str) -> Result<String> {
    let missing = || ScrapeError::ProductNumberMissing(page_url.to_string());
    let url = Url::parse(page_url).map_err(|_| missing())?;

    let captures = selectors::PRODUCT_NUMBER.captures(url.path()).ok_or_else(missing)?;
    Ok(captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_PAGE: &str = r##"
        <html><body>
        <div data-testid="breadcrumb-navigation">
          <ol>
            <li data-testid="product-type-breadcrumb">Wine</li>
            <li data-testid="category-breadcrumb">Red Wine</li>
            <li data-testid="subcategory-breadcrumb">Cabernet Sauvignon</li>
          </ol>
        </div>
        <div data-testid="product-line-box">
          <h1 class="fizz-heading-1 notranslate fizz-stack-8">Estate Cabernet, Reserve</h1>
          <div id="product-image"><img class="product-image-class fizz-full-width s-aj8RbU3kIi4D" src="//cdn.example.com/img/4242.jpg"></div>
          <div class="row"><div>Region:</div><div><a href="/r/1">Napa Valley</a></div></div>
          <div class="row"><div>Country:</div><div><a href="/c/1">United States, of America</a></div></div>
          <div class="row"><div>ABV:</div><div>14.5%</div></div>
          <div class="row"><div>Appellation</div><div><a href="/a/1">Oakville</a></div></div>
          <p><span>Producer:</span> Example Estate Winery </p>
          <p><span>Feature</span><a href="/f/1">Organic, Vegan</a></p>
          <p>
            <span>Raw Materials</span>
            <a href="/m/1"> Cabernet Sauvignon </a>
            <a href="/m/2">Merlot</a>
            <a href="#">show less</a>
          </p>
          <ul data-testid="container-choices">
            <li> 750ml Bottle </li>
            <li>1.5L Magnum</li>
          </ul>
          <div class="fizz-card pad">
            <div><p>Vintage</p></div>
            <div class="fizz-button-group">
              <button> 2019 </button><button>2020</button>
            </div>
          </div>
        </div>
        <h2>Product information</h2>
        <div><p>Deep, dark fruit.</p><p>Long finish.</p></div>
        <h2>About the producer</h2>
        <p>Family owned, since 1970.</p>
        <section data-testid="brand_family_best_sellers-carousel">
          <header><div><h3>More from Example, Estate</h3></div></header>
        </section>
        </body></html>
    "##;

    #[test]
    fn test_extract_all_fields() {
        let details = extract_details(PRODUCT_PAGE);

        assert_eq!(details.product_name.as_deref(), Some("Estate Cabernet| Reserve"));
        assert_eq!(details.product_type.as_deref(), Some("Wine"));
        assert_eq!(details.category.as_deref(), Some("Red Wine"));
        assert_eq!(details.subcategory.as_deref(), Some("Cabernet Sauvignon"));
        assert_eq!(details.region.as_deref(), Some("Napa Valley"));
        assert_eq!(details.country.as_deref(), Some("United States| of America"));
        assert_eq!(details.abv.as_deref(), Some("14.5%"));
        assert_eq!(details.appellation.as_deref(), Some("Oakville"));
        assert_eq!(details.producer.as_deref(), Some("Example Estate Winery"));
        assert_eq!(details.feature.as_deref(), Some("Organic| Vegan"));
        assert_eq!(details.raw_materials.as_deref(), Some("Cabernet Sauvignon|Merlot"));
        assert_eq!(details.container_type.as_deref(), Some("750ml Bottle|1.5L Magnum"));
        assert_eq!(details.vintage.as_deref(), Some("2019|2020"));
        assert_eq!(details.product_description.as_deref(), Some("Deep| dark fruit.\nLong finish."));
        assert_eq!(details.about_producer.as_deref(), Some("Family owned| since 1970."));
        assert_eq!(details.probable_brand_family.as_deref(), Some("Example| Estate"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let details = extract_details("<html><body><h1>Just a heading</h1></body></html>");
        assert_eq!(details, ProductDetails::default());
    }

    #[test]
    fn test_label_without_value_does_not_borrow_neighbour() {
        let html = r#"
            <div class="row"><div>Region:</div></div>
            <div class="row"><div>Country:</div><div><a>France</a></div></div>
        "#;
        let details = extract_details(html);

        assert_eq!(details.region, None);
        assert_eq!(details.country.as_deref(), Some("France"));
    }

    #[test]
    fn test_raw_materials_label_without_links_is_empty() {
        let details = extract_details("<p><span>Raw Materials</span></p>");
        assert_eq!(details.raw_materials.as_deref(), Some(""));
    }

    #[test]
    fn test_producer_requires_label_text() {
        let details = extract_details("<p><span>Producer:</span></p>");
        assert_eq!(details.producer.as_deref(), Some(""));

        let details = extract_details("<p><span>Made by</span> Someone</p>");
        assert_eq!(details.producer, None);
    }

    #[test]
    fn test_brand_family_without_prefix_is_none() {
        let html = r#"<section data-testid="brand_family_best_sellers-carousel"><header><div><h3>Best sellers</h3></div></header></section>"#;
        assert_eq!(extract_details(html).probable_brand_family, None);
    }

    #[test]
    fn test_vintage_outside_card_is_none() {
        let html = r#"<div><p>Vintage</p><div class="button-group"><button>2018</button></div></div>"#;
        assert_eq!(extract_details(html).vintage, None);
    }

    #[test]
    fn test_vintage_uses_first_button_group() {
        let html = r#"
            <div class="fizz-card">
              <p>Vintage</p>
              <div class="button-group"><button>2019</button><button>2020</button></div>
              <div class="button-group"><button>Add to cart</button></div>
            </div>
        "#;
        assert_eq!(extract_details(html).vintage.as_deref(), Some("2019|2020"));
    }

    #[test]
    fn test_container_type_uses_first_list() {
        let html = r#"
            <div><ul data-testid="container-choices"><li>750ml</li></ul></div>
            <div><ul data-testid="container-choices"><li>Related 1L</li></ul></div>
        "#;
        assert_eq!(extract_details(html).container_type.as_deref(), Some("750ml"));
    }

    #[test]
    fn test_empty_abv_is_empty_string() {
        let html = r#"
            <div class="row"><div>ABV:</div><div></div></div>
            <div class="row"><div>Region:</div><div><a></a></div></div>
        "#;
        let details = extract_details(html);

        assert_eq!(details.abv.as_deref(), Some(""));
        assert_eq!(details.region.as_deref(), Some(""));
    }

    #[test]
    fn test_inner_text_skips_scripts_and_collapses_whitespace() {
        let doc = Html::parse_fragment("<div>  Hello <b>big</b>\n\n world<script>var x = 1;</script><br>next</div>");
        let div = doc.select(&selectors::DIV).next().unwrap();
        assert_eq!(inner_text(div), "Hello big world\nnext");
    }

    #[test]
    fn test_extract_image_url() {
        let page_url = "https://app.provi.com/products/4242";
        assert_eq!(extract_image_url(PRODUCT_PAGE, page_url).as_deref(), Some("http://cdn.example.com/img/4242.jpg"));
        assert_eq!(extract_image_url("<div id='product-image'><img src='x.jpg'></div>", page_url), None);
    }

    #[test]
    fn test_relative_image_src_resolves_against_page() {
        let html = r#"<div id="product-image"><img class="product-image-class" src="/media/4242.jpg"></div>"#;
        assert_eq!(
            extract_image_url(html, "https://app.provi.com/products/4242").as_deref(),
            Some("https://app.provi.com/media/4242.jpg")
        );
    }

    #[test]
    fn test_normalize_image_url() {
        assert_eq!(normalize_image_url("//cdn.example.com/a.jpg"), "http://cdn.example.com/a.jpg");
        assert_eq!(normalize_image_url("https://cdn.example.com/a.jpg"), "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn test_product_number() {
        assert_eq!(product_number("https://app.provi.com/products/12345").unwrap(), "12345");
        assert_eq!(product_number("https://app.provi.com/products/678?tab=details").unwrap(), "678");
        assert_eq!(product_number("https://app.provi.com/en/products/99/reviews").unwrap(), "99");
        assert_eq!(product_number("https://app.provi.com/products/products/42").unwrap(), "42");
    }

    #[test]
    fn test_product_number_missing() {
        assert!(matches!(
            product_number("https://app.provi.com/products/abc"),
            Err(ScrapeError::ProductNumberMissing(_))
        ));
        assert!(product_number("https://app.provi.com/product_listing?page=2").is_err());
        assert!(product_number("not a url").is_err());
    }

    #[test]
    fn test_listing_snapshot_deserialization() {
        let json = r#"{"found": true, "cards": [
            {"name": "Estate Cabernet", "href": "https://app.provi.com/products/1"},
            {"name": null, "href": null}
        ]}"#;
        let cards = serde_json::from_str::<ListingSnapshot>(json).unwrap().into_cards().unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name.as_deref(), Some("Estate Cabernet"));
        assert_eq!(cards[1], ListingCard::default());
    }

    #[test]
    fn test_listing_snapshot_not_found() {
        let snapshot: ListingSnapshot = serde_json::from_str(r#"{"found": false}"#).unwrap();
        assert!(matches!(snapshot.into_cards(), Err(ScrapeError::ListingFailed(_))));
    }
}
