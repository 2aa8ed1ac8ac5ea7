use crate::config::RunParams;
use serde::Serialize;
use std::fmt;

/// Column headers of the products workbook, in row order
pub const PRODUCT_HEADERS: [&str; 18] = [
    "productName",
    "region",
    "productType",
    "category",
    "subcategory",
    "containerType",
    "productDescription",
    "probableBrandFamily",
    "country",
    "abv",
    "siteProductId",
    "seqNum",
    "vintage",
    "rawMaterials",
    "appellation",
    "producer",
    "feature",
    "aboutProducer",
];

/// Column headers of the failed-products workbook
pub const FAILED_HEADERS: [&str; 2] = ["productName", "seqNum"];

/// Run-local product sequence number
///
/// Formatted as `{category}-{subcategory}-{type}{page:04}{position:02}` where
/// `position` is the 1-based card position on the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeqNum {
    pub category_id: u32,
    pub subcategory_id: u32,
    pub category_type: u32,
    pub page: u32,
    pub position: u32,
}

impl SeqNum {
    /// Build from the run parameters, the page number and the 0-based card index
    pub fn new(params: &RunParams, page: u32, index: usize) -> Self {
        Self {
            category_id: params.category_id,
            subcategory_id: params.subcategory_id,
            category_type: params.category_type,
            page,
            position: index as u32 + 1,
        }
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}{:04}{:02}",
            self.category_id, self.subcategory_id, self.category_type, self.page, self.position
        )
    }
}

impl Serialize for SeqNum {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Text fields read off a product detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub product_name: Option<String>,
    pub region: Option<String>,
    pub product_type: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub container_type: Option<String>,
    pub product_description: Option<String>,
    pub probable_brand_family: Option<String>,
    pub country: Option<String>,
    pub abv: Option<String>,
    pub vintage: Option<String>,
    pub raw_materials: Option<String>,
    pub appellation: Option<String>,
    pub producer: Option<String>,
    pub feature: Option<String>,
    pub about_producer: Option<String>,
}

/// One row of the products workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(flatten)]
    pub details: ProductDetails,
    pub site_product_id: String,
    pub seq_num: SeqNum,
}

impl ProductRecord {
    pub fn new(details: ProductDetails, site_product_id: impl Into<String>, seq_num: SeqNum) -> Self {
        Self { details, site_product_id: site_product_id.into(), seq_num }
    }

    /// Cells in [`PRODUCT_HEADERS`] order
    pub fn to_row(&self) -> Vec<Option<String>> {
        let d = &self.details;
        vec![
            d.product_name.clone(),
            d.region.clone(),
            d.product_type.clone(),
            d.category.clone(),
            d.subcategory.clone(),
            d.container_type.clone(),
            d.product_description.clone(),
            d.probable_brand_family.clone(),
            d.country.clone(),
            d.abv.clone(),
            Some(self.site_product_id.clone()),
            Some(self.seq_num.to_string()),
            d.vintage.clone(),
            d.raw_materials.clone(),
            d.appellation.clone(),
            d.producer.clone(),
            d.feature.clone(),
            d.about_producer.clone(),
        ]
    }
}

/// One row of the failed-products workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedRecord {
    /// Name from the listing card; empty when the card itself could not be read
    pub product_name: String,
    pub seq_num: SeqNum,
}

impl FailedRecord {
    pub fn to_row(&self) -> Vec<Option<String>> {
        vec![Some(self.product_name.clone()), Some(self.seq_num.to_string())]
    }
}

/// Replace commas so values survive a later CSV export of the workbook
pub fn sanitize_field(value: &str) -> String {
    value.replace(',', "|")
}
