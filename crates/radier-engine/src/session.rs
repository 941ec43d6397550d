// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page and per-document editing sessions.
//
// A `PageEditor` owns one page's current raster together with its undo
// history; a `DocumentEditor` owns the ordered pages of one document. Pages
// are independent of each other, so document-wide detection fans out across
// a rayon pool while mutation stays strictly per page.

use image::RgbImage;
use radier_core::{EngineConfig, EraseRequest, RadierError, Result, TextRegion};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::engine::EraseEngine;
use crate::history::{HistoryStack, HistoryStatus};

/// One page's raster plus its bounded undo history.
///
/// The history is seeded with the loaded page, so the very first erase can
/// be undone back to the original.
#[derive(Debug, Clone)]
pub struct PageEditor {
    image: RgbImage,
    history: HistoryStack,
}

impl PageEditor {
    pub fn new(image: RgbImage, history_capacity: usize) -> Self {
        let mut history = HistoryStack::new(history_capacity);
        history.push(image.clone(), "page loaded");
        Self { image, history }
    }

    /// The page as it currently stands.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Apply an erase request to this page.
    ///
    /// A request that erased something commits exactly one history entry;
    /// one that selected nothing (or listed no boxes) leaves both the page
    /// and the history untouched. Returns the regions erased, which is
    /// empty for coordinate-driven requests.
    pub fn apply(&mut self, engine: &EraseEngine, request: &EraseRequest) -> Vec<TextRegion> {
        match request {
            EraseRequest::Command(command) => {
                let (result, selected) = engine.erase_by_command(&self.image, command);
                if selected.is_empty() {
                    debug!(command, "nothing erased; history untouched");
                    return selected;
                }
                self.commit(result, request.action_label());
                selected
            }
            EraseRequest::Regions(boxes) => {
                if boxes.is_empty() {
                    return Vec::new();
                }
                let result = engine.erase_regions(&self.image, boxes);
                self.commit(result, request.action_label());
                Vec::new()
            }
        }
    }

    fn commit(&mut self, image: RgbImage, action: String) {
        self.history.push(image.clone(), action);
        self.image = image;
    }

    /// Step the page back one snapshot; `None` at the origin.
    pub fn undo(&mut self) -> Option<&RgbImage> {
        let snapshot = self.history.undo()?;
        self.image = snapshot;
        Some(&self.image)
    }

    /// Step the page forward one snapshot; `None` at the tail.
    pub fn redo(&mut self) -> Option<&RgbImage> {
        let snapshot = self.history.redo()?;
        self.image = snapshot;
        Some(&self.image)
    }

    pub fn status(&self) -> HistoryStatus {
        self.history.status()
    }
}

/// The ordered pages of one document, each independently editable.
#[derive(Debug, Clone)]
pub struct DocumentEditor {
    pages: Vec<PageEditor>,
}

impl DocumentEditor {
    /// Wrap decoded page rasters in per-page editors.
    pub fn new(pages: Vec<RgbImage>, config: &EngineConfig) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| PageEditor::new(page, config.history_capacity))
            .collect::<Vec<_>>();
        info!(pages = pages.len(), "document session opened");
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Borrow one page editor; zero-based index.
    pub fn page(&self, index: usize) -> Result<&PageEditor> {
        self.pages.get(index).ok_or(RadierError::PageOutOfRange {
            page: index,
            total: self.pages.len(),
        })
    }

    pub fn page_mut(&mut self, index: usize) -> Result<&mut PageEditor> {
        let total = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(RadierError::PageOutOfRange { page: index, total })
    }

    /// Apply an erase request to one page.
    #[instrument(skip(self, engine, request), fields(page = index))]
    pub fn apply(
        &mut self,
        engine: &EraseEngine,
        index: usize,
        request: &EraseRequest,
    ) -> Result<Vec<TextRegion>> {
        Ok(self.page_mut(index)?.apply(engine, request))
    }

    /// Detect text regions on every page, in parallel.
    pub fn detect_all(&self, engine: &EraseEngine) -> Vec<Vec<TextRegion>> {
        self.pages
            .par_iter()
            .map(|page| engine.detect_regions(page.image()))
            .collect()
    }

    /// Borrow the current rasters in page order.
    pub fn page_images(&self) -> impl Iterator<Item = &RgbImage> {
        self.pages.iter().map(|page| page.image())
    }

    /// Take the current rasters in page order, ready for re-encoding.
    pub fn into_pages(self) -> Vec<RgbImage> {
        self.pages.into_iter().map(|page| page.image).collect()
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::Recognition;
    use image::{GrayImage, Rgb};
    use radier_core::BoundingBox;
    use std::sync::Arc;

    fn inked_page() -> RgbImage {
        let mut page = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));
        for y in 10..18 {
            for x in 5..35 {
                page.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        page
    }

    fn engine() -> EraseEngine {
        let recognizer = Arc::new(|_crop: &GrayImage| -> radier_core::Result<Recognition> {
            Ok(Recognition::new("Invoice 77", 0.8))
        });
        EraseEngine::new(recognizer, EngineConfig::default()).unwrap()
    }

    /// The first erase can be undone back to the loaded page.
    #[test]
    fn first_erase_undoes_to_original() {
        let page = inked_page();
        let mut editor = PageEditor::new(page.clone(), 10);
        let erased = editor.apply(&engine(), &EraseRequest::Command("remove invoice".into()));
        assert_eq!(erased.len(), 1);
        assert_ne!(editor.image(), &page);

        let restored = editor.undo().unwrap().clone();
        assert_eq!(restored, page);
    }

    /// A request that matches nothing leaves history untouched.
    #[test]
    fn no_match_commits_nothing() {
        let mut editor = PageEditor::new(inked_page(), 10);
        let erased = editor.apply(&engine(), &EraseRequest::Command("erase the logo".into()));
        assert!(erased.is_empty());

        let status = editor.status();
        assert_eq!(status.total, 1);
        assert!(!status.can_undo);
    }

    /// Coordinate-driven erases commit and can be redone after an undo.
    #[test]
    fn coordinate_erase_commits_and_redoes() {
        let mut editor = PageEditor::new(inked_page(), 10);
        let request = EraseRequest::Regions(vec![BoundingBox::new(5, 10, 35, 18)]);
        editor.apply(&engine(), &request);

        let erased_image = editor.image().clone();
        editor.undo().unwrap();
        let redone = editor.redo().unwrap().clone();
        assert_eq!(redone, erased_image);
    }

    /// An erase after an undo discards the redo branch.
    #[test]
    fn erase_after_undo_discards_redo() {
        let mut editor = PageEditor::new(inked_page(), 10);
        let first = EraseRequest::Regions(vec![BoundingBox::new(5, 10, 20, 18)]);
        let second = EraseRequest::Regions(vec![BoundingBox::new(20, 10, 35, 18)]);

        editor.apply(&engine(), &first);
        editor.undo();
        editor.apply(&engine(), &second);
        assert!(editor.redo().is_none());
    }

    /// Page indices outside the document are typed errors.
    #[test]
    fn out_of_range_page_is_an_error() {
        let mut doc = DocumentEditor::new(vec![inked_page()], &EngineConfig::default());
        let request = EraseRequest::Command("remove invoice".into());
        let err = doc.apply(&engine(), 5, &request).unwrap_err();
        assert!(matches!(
            err,
            RadierError::PageOutOfRange { page: 5, total: 1 }
        ));
    }

    /// Pages are independent: erasing one leaves the others untouched.
    #[test]
    fn pages_are_independent() {
        let mut doc = DocumentEditor::new(
            vec![inked_page(), inked_page()],
            &EngineConfig::default(),
        );
        let request = EraseRequest::Regions(vec![BoundingBox::new(5, 10, 35, 18)]);
        doc.apply(&engine(), 0, &request).unwrap();

        assert_ne!(doc.page(0).unwrap().image(), &inked_page());
        assert_eq!(doc.page(1).unwrap().image(), &inked_page());
    }

    /// Parallel detection sees every page.
    #[test]
    fn detect_all_covers_every_page() {
        let doc = DocumentEditor::new(
            vec![inked_page(), RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]))],
            &EngineConfig::default(),
        );
        let regions = doc.detect_all(&engine());
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].len(), 1);
        assert!(regions[1].is_empty());
    }
}
