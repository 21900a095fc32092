//! Evaluates the compiled template table against one page.

use std::sync::Arc;

use image::DynamicImage;
use tracing::{debug, trace};

use super::cache::TemplateImages;
use crate::matching::ImageMatcher;
use crate::models::{KeywordRegion, Region, Strategy, TemplateDefinition, TEMPLATES};
use crate::ocr::{count_keywords, crop_region, RegionReader, Result};
use crate::raster::PageImage;

/// Matches pages against a fixed template table.
pub struct TemplateClassifier {
    table: &'static [TemplateDefinition],
    reader: RegionReader,
    matcher: Arc<dyn ImageMatcher>,
}

impl TemplateClassifier {
    /// Classifier over the built-in table.
    pub fn new(reader: RegionReader, matcher: Arc<dyn ImageMatcher>) -> Self {
        Self::with_table(TEMPLATES, reader, matcher)
    }

    /// Classifier over a custom table.
    pub fn with_table(
        table: &'static [TemplateDefinition],
        reader: RegionReader,
        matcher: Arc<dyn ImageMatcher>,
    ) -> Self {
        Self {
            table,
            reader,
            matcher,
        }
    }

    /// Name of the first template the page satisfies.
    pub fn classify(
        &self,
        page: &PageImage,
        templates: &TemplateImages,
    ) -> Result<Option<&'static str>> {
        for definition in self.table {
            if self.matches(definition, page, templates)? {
                debug!("Page {} matched template {}", page.index, definition.name);
                return Ok(Some(definition.name));
            }
        }
        trace!("Page {} matched no template", page.index);
        Ok(None)
    }

    fn matches(
        &self,
        definition: &TemplateDefinition,
        page: &PageImage,
        templates: &TemplateImages,
    ) -> Result<bool> {
        match definition.strategy {
            Strategy::LogoAndText {
                logo,
                text,
                keywords,
                min_text_matches,
                logo_threshold,
            } => {
                let score = self.logo_score(page, &logo, templates.candidates(definition.name));
                trace!(
                    "Page {}: {} logo score {:.3} (threshold {:.2})",
                    page.index,
                    definition.name,
                    score,
                    logo_threshold
                );
                if score < logo_threshold {
                    return Ok(false);
                }
                let found = count_keywords(&self.reader.read(page, &text)?, keywords);
                Ok(found >= min_text_matches)
            }
            Strategy::Text { region, keywords } => {
                let found = count_keywords(&self.reader.read(page, &region)?, keywords);
                Ok(found == keywords.len())
            }
            Strategy::Structural { regions, min_votes } => {
                let mut votes = 0;
                for region in regions {
                    if self.region_votes(page, region)? {
                        votes += 1;
                    }
                }
                trace!(
                    "Page {}: {} has {}/{} votes",
                    page.index,
                    definition.name,
                    votes,
                    min_votes
                );
                Ok(votes >= min_votes)
            }
        }
    }

    fn region_votes(&self, page: &PageImage, region: &KeywordRegion) -> Result<bool> {
        let text = self.reader.read(page, &region.region)?;
        Ok(count_keywords(&text, region.keywords) >= region.min_matches)
    }

    /// Best correlation of the logo box against the same box of every candidate.
    fn logo_score(&self, page: &PageImage, logo: &Region, candidates: &[DynamicImage]) -> f32 {
        let Some(crop) = crop_region(page, logo) else {
            return 0.0;
        };

        let candidate_crops: Vec<DynamicImage> = candidates
            .iter()
            .filter_map(|candidate| {
                let view = PageImage::new(page.index, candidate.clone(), page.page_size);
                crop_region(&view, logo)
            })
            .collect();

        self.matcher.best_of(&crop, &candidate_crops)
    }
}
