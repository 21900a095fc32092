//! PDF page copy and geometry using lopdf.

use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace};

use super::Result;
use crate::error::PdfError;
use crate::models::PageRange;

/// An opened source PDF.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    document: Document,
}

impl PdfDocument {
    /// Open a PDF from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Scanners commonly emit PDFs encrypted with an empty user password
        if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { document })
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Width and height in points of a page (1-based), as displayed.
    ///
    /// A page with `/Rotate` 90 or 270 reports its MediaBox with width and
    /// height swapped, matching how rasterizers render it.
    pub fn page_size(&self, page: u32) -> Result<(f32, f32)> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let media_box = self
            .inherited_entry(page_id, b"MediaBox", &|object: &Object| {
                object.as_array().ok().cloned()
            })
            .ok_or(PdfError::MissingMediaBox(page))?;
        let values: Vec<f32> = media_box.iter().filter_map(number).collect();
        if values.len() != 4 {
            return Err(PdfError::MissingMediaBox(page));
        }

        let width = (values[2] - values[0]).abs();
        let height = (values[3] - values[1]).abs();
        let rotate = self
            .inherited_entry(page_id, b"Rotate", &|object: &Object| object.as_i64().ok())
            .unwrap_or(0);
        trace!("Page {} MediaBox: {}x{}, rotate {}", page, width, height, rotate);

        if rotate.rem_euclid(180) == 90 {
            Ok((height, width))
        } else {
            Ok((width, height))
        }
    }

    /// Copy the pages of `range` into a new document.
    ///
    /// Pages past the end of the source are ignored; `None` is returned when
    /// no page would be copied.
    pub fn extract_range(&self, range: PageRange) -> Result<Option<Vec<u8>>> {
        let total = self.page_count();
        let keep: Vec<u32> = range.page_numbers().filter(|n| *n <= total).collect();
        if keep.is_empty() {
            debug!("Range {} is outside a {}-page document", range, total);
            return Ok(None);
        }

        let remove: Vec<u32> = (1..=total).filter(|n| !keep.contains(n)).collect();

        let mut document = self.document.clone();
        document.delete_pages(&remove);
        document.prune_objects();
        document.renumber_objects();
        document.compress();

        let mut data = Vec::new();
        document
            .save_to(&mut data)
            .map_err(|e| PdfError::Save(e.to_string()))?;

        debug!(
            "Copied pages {} ({} pages, {} bytes)",
            range,
            keep.len(),
            data.len()
        );
        Ok(Some(data))
    }

    /// Text layer of the first page, empty for scanned pages.
    pub fn first_page_text(&self) -> Result<String> {
        let first = PageRange { start: 0, end: 0 };
        let Some(data) = self.extract_range(first)? else {
            return Ok(String::new());
        };
        let text = pdf_extract::extract_text_from_mem(&data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        Ok(text.trim().to_string())
    }

    /// Look up an entry on a page, walking up the page tree for inheritable
    /// attributes. `read` rejects entries of the wrong type.
    fn inherited_entry<T>(
        &self,
        node_id: ObjectId,
        key: &[u8],
        read: &dyn Fn(&Object) -> Option<T>,
    ) -> Option<T> {
        let dict = self.document.get_object(node_id).ok()?.as_dict().ok()?;
        let own = dict
            .get(key)
            .ok()
            .and_then(|entry| self.document.dereference(entry).ok())
            .and_then(|(_, object)| read(object));
        if own.is_some() {
            return own;
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => self.inherited_entry(*parent_id, key, read),
            _ => None,
        }
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}
