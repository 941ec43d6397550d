// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and validate existing PDF documents using the `lopdf`
// crate. Parsing stays structural: pages are rasterised elsewhere, so the
// reader's job is deciding whether a file is workable at all.

use std::path::Path;

use lopdf::Document;
use radier_core::error::RadierError;
use tracing::{debug, info, instrument, warn};

/// Reads and validates existing PDF files.
///
/// Wraps `lopdf::Document` and answers the structural questions — does the
/// file parse, how many pages does it declare, is it encrypted — before any
/// rasterisation work begins.
#[derive(Debug)]
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RadierError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            RadierError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, RadierError> {
        if data.is_empty() {
            return Err(RadierError::InvalidInput("empty PDF data".into()));
        }

        let document = Document::load_mem(data).map_err(|err| {
            RadierError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    /// Wrap an already-parsed `lopdf` document.
    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            source_path: None,
        }
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document's page tree.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Whether the document declares an encryption dictionary.
    ///
    /// Decryption is out of scope; encrypted documents fail
    /// [`PdfReader::validate`] before any page work starts.
    pub fn is_encrypted(&self) -> bool {
        self.document.trailer.get(b"Encrypt").is_ok()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    // -- Validation -----------------------------------------------------------

    /// Confirm the document is workable: unencrypted and non-empty.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), RadierError> {
        if self.is_encrypted() {
            warn!("document carries an /Encrypt dictionary");
            return Err(RadierError::EncryptedDocument);
        }
        if self.page_count() == 0 {
            return Err(RadierError::PdfError("document has no pages".into()));
        }
        debug!(pages = self.page_count(), "document validated");
        Ok(())
    }
}

// -- Tests --------------------------------------------------------------------
