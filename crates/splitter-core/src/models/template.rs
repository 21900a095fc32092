//! The compiled template table.
//!
//! Each document type is detected by one [`Strategy`]. The table is evaluated
//! in order and the first satisfied template wins; there is no scoring across
//! templates.

/// Axis-aligned box in PDF points (72 per inch), origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Region {
    pub const fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Map the box onto an image of `width` x `height` pixels rendered from a
    /// page of `page_size` points, clipping to the image bounds.
    ///
    /// Returns `(x, y, w, h)` in pixels, or `None` when nothing of the box
    /// lies inside the image.
    pub fn to_pixels(
        &self,
        page_size: (f32, f32),
        width: u32,
        height: u32,
    ) -> Option<(u32, u32, u32, u32)> {
        let (page_w, page_h) = page_size;
        if page_w <= 0.0 || page_h <= 0.0 {
            return None;
        }
        let sx = width as f32 / page_w;
        let sy = height as f32 / page_h;

        let x0 = ((self.x0 as f32 * sx).round() as u32).min(width);
        let y0 = ((self.y0 as f32 * sy).round() as u32).min(height);
        let x1 = ((self.x1 as f32 * sx).round() as u32).min(width);
        let y1 = ((self.y1 as f32 * sy).round() as u32).min(height);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0, y0, x1 - x0, y1 - y0))
    }
}

/// A region that votes for a structural template.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRegion {
    pub region: Region,
    pub keywords: &'static [&'static str],
    /// Keywords that must be present for this region to vote.
    pub min_matches: usize,
}

/// Detection rule of a template.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// Logo correlation plus keyword count in a text box.
    LogoAndText {
        logo: Region,
        text: Region,
        keywords: &'static [&'static str],
        min_text_matches: usize,
        logo_threshold: f32,
    },
    /// Every keyword must appear in one text box.
    Text {
        region: Region,
        keywords: &'static [&'static str],
    },
    /// Independent regions vote; enough votes match the template.
    Structural {
        regions: &'static [KeywordRegion],
        min_votes: usize,
    },
}

/// A named document type.
#[derive(Debug, Clone, Copy)]
pub struct TemplateDefinition {
    pub name: &'static str,
    pub strategy: Strategy,
}

impl TemplateDefinition {
    /// Whether this template needs candidate images.
    pub fn uses_logo(&self) -> bool {
        matches!(self.strategy, Strategy::LogoAndText { .. })
    }
}

const CHEQUE_KEYWORDS: &[&str] = &["CHEQUE", "Date"];

const BANK_ADVICE_KEYWORDS: &[&str] = &[
    "INTERNAL BANK ADVICE",
    "DATE",
    "BANK NAME",
    "BRANCH NUMBER",
    "ACCOUNT NUMBER",
];

const STAFF_FORM_REGIONS: &[KeywordRegion] = &[
    KeywordRegion {
        region: Region::new(0, 100, 595, 230),
        keywords: &["Voucher No", "Date", "Subject"],
        min_matches: 2,
    },
    KeywordRegion {
        region: Region::new(0, 180, 595, 350),
        keywords: &[
            "Gentlemen:",
            "BENEFICIARY NAME",
            "ACCOUNT NO.",
            "BRANCH NO.",
            "AMOUNT SR",
        ],
        min_matches: 3,
    },
];

/// Known document types in evaluation order.
pub static TEMPLATES: &[TemplateDefinition] = &[
    TemplateDefinition {
        name: "Cheque",
        strategy: Strategy::LogoAndText {
            logo: Region::new(430, 0, 595, 100),
            text: Region::new(0, 50, 595, 200),
            keywords: CHEQUE_KEYWORDS,
            min_text_matches: 2,
            logo_threshold: 0.4,
        },
    },
    TemplateDefinition {
        name: "Internal Bank Advice",
        strategy: Strategy::Text {
            region: Region::new(0, 100, 595, 350),
            keywords: BANK_ADVICE_KEYWORDS,
        },
    },
    TemplateDefinition {
        name: "Staff Form",
        strategy: Strategy::Structural {
            regions: STAFF_FORM_REGIONS,
            min_votes: 2,
        },
    },
];
