use crate::error::Result;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// A single-sheet workbook kept in memory and rewritten on every flush
///
/// Rows are appended as the run progresses; [`Sheet::save`] writes the header
/// plus every row collected so far.
#[derive(Debug, Clone)]
pub struct Sheet {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    pub fn new(path: impl Into<PathBuf>, headers: &[&str]) -> Self {
        Self { path: path.into(), headers: headers.iter().map(|h| h.to_string()).collect(), rows: Vec::new() }
    }

    /// Append a row; `None` cells are left blank
    pub fn append(&mut self, row: Vec<Option<String>>) {
        debug_assert_eq!(row.len(), self.headers.len(), "row width must match headers");
        self.rows.push(row);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the header and all rows to the sheet's path
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header.as_str(), &header_format)?;
        }

        for (i, row) in self.rows.iter().enumerate() {
            let row_num = i as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                if let Some(value) = cell {
                    worksheet.write_string(row_num, col as u16, value.as_str())?;
                }
            }
        }

        workbook.save(&self.path)?;
        log::debug!("Saved {} rows to {}", self.rows.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_append_and_len() {
        let mut sheet = Sheet::new("out.xlsx", &["a", "b"]);
        assert!(sheet.is_empty());

        sheet.append(vec![Some("1".to_string()), None]);
        sheet.append(vec![None, Some("2".to_string())]);

        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.headers(), &["a".to_string(), "b".to_string()]);
        assert_eq!(sheet.rows()[1][1].as_deref(), Some("2"));
    }

    #[test]
    fn test_save_writes_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("products.xlsx");

        let mut sheet = Sheet::new(&path, &["productName", "seqNum"]);
        sheet.append(vec![Some("Estate Cabernet".to_string()), Some("156-1749-2000201".to_string())]);
        sheet.save().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"), "xlsx files are zip archives");
    }

    /// Worksheet XML and shared strings of a saved workbook
    fn read_back(path: &Path) -> (String, String) {
        let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        let mut part = |name: &str| {
            let mut xml = String::new();
            archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
            xml
        };
        (part("xl/worksheets/sheet1.xml"), part("xl/sharedStrings.xml"))
    }

    #[test]
    fn test_save_twice_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.xlsx");

        let mut sheet = Sheet::new(&path, &["productName", "seqNum"]);
        sheet.append(vec![Some("First row".to_string()), Some("156-1749-2000201".to_string())]);
        sheet.save().unwrap();
        sheet.append(vec![Some("Later row".to_string()), None]);
        sheet.save().unwrap();

        let (sheet_xml, strings) = read_back(&path);
        assert_eq!(sheet_xml.matches("<row ").count(), 3);
        assert!(sheet_xml.contains(r#"r="A1""#) && sheet_xml.contains(r#"r="B1""#));
        assert!(sheet_xml.contains(r#"r="B2""#));
        assert!(sheet_xml.contains(r#"r="A3""#) && !sheet_xml.contains(r#"r="B3""#));
        for text in ["productName", "seqNum", "First row", "156-1749-2000201", "Later row"] {
            assert!(strings.contains(text), "missing {}", text);
        }
    }

    #[test]
    fn test_save_empty_sheet_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.xlsx");

        Sheet::new(&path, &["productName", "seqNum"]).save().unwrap();

        let (sheet_xml, strings) = read_back(&path);
        assert_eq!(sheet_xml.matches("<row ").count(), 1);
        assert!(strings.contains("productName") && strings.contains("seqNum"));
    }
}
