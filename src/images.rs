use crate::error::{Result, ScrapeError};
use image::{ImageFormat, ImageOutputFormat};
use std::{io::Cursor,
          path::{Path, PathBuf},
          time::Duration};

/// Source of product image bytes
pub trait ImageSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Downloads images over HTTP
pub struct HttpImageSource {
    client: reqwest::blocking::Client,
}

impl HttpImageSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ScrapeError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl ImageSource for HttpImageSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let download_failed = |e: reqwest::Error| ScrapeError::DownloadFailed { url: url.to_string(), reason: e.to_string() };

        let response = self.client.get(url).send().map_err(download_failed)?;
        let response = response.error_for_status().map_err(download_failed)?;
        let bytes = response.bytes().map_err(download_failed)?;

        Ok(bytes.to_vec())
    }
}

/// Replace characters that are not allowed in Windows file names
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect()
}

/// `{sanitized name}_{product number}.jpg`
pub fn image_file_name(product_name: &str, product_number: &str) -> String {
    format!("{}_{}.jpg", sanitize_file_name(product_name), product_number)
}

/// Folder that product images are written to
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create the folder if needed
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write image bytes as a JPEG file named after the product
    pub fn save(&self, product_name: &str, product_number: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(image_file_name(product_name, product_number));
        std::fs::write(&path, to_jpeg(bytes).as_deref().unwrap_or(bytes))?;
        Ok(path)
    }
}

/// Transcode non-JPEG images; `None` means the bytes should be written unchanged
fn to_jpeg(bytes: &[u8]) -> Option<Vec<u8>> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => None,
        Ok(format) => match image::load_from_memory_with_format(bytes, format) {
            Ok(decoded) => {
                let mut out = Cursor::new(Vec::new());
                let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
                match rgb.write_to(&mut out, ImageOutputFormat::Jpeg(90)) {
                    Ok(()) => Some(out.into_inner()),
                    Err(e) => {
                        log::warn!("Failed to re-encode {:?} image as JPEG: {}", format, e);
                        None
                    }
                }
            }
            Err(e) => {
                log::warn!("Failed to decode {:?} image, saving as downloaded: {}", format, e);
                None
            }
        },
        Err(_) => {
            log::warn!("Unrecognized image format, saving as downloaded");
            None
        }
    }
}
