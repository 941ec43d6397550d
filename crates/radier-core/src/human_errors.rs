// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the caller layer.
//
// Every technical error is mapped to plain English with a clear suggestion,
// so shells and UIs never surface a raw error chain to the person holding
// the document.

use crate::error::RadierError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth retrying, possibly with no change at all.
    Transient,
    /// User must do something first (pick another file, decrypt, fix a path).
    ActionRequired,
    /// Cannot be fixed by retrying — damaged file, unsupported content.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying without changes might help.
    pub retriable: bool,
    /// Severity level (drives icon/colour in a UI, exit wording in a CLI).
    pub severity: Severity,
}

/// Convert a `RadierError` into a `HumanError` anyone can act on.
pub fn humanize_error(err: &RadierError) -> HumanError {
    match err {
        // -- Document errors --
        RadierError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try opening it in a PDF viewer first to check it works, or try a different file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RadierError::EncryptedDocument => HumanError {
            message: "This PDF is password protected.".into(),
            suggestion: "Remove the password with your PDF tool of choice, save an unprotected copy, then try again with the copy.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RadierError::InvalidInput(detail) => HumanError {
            message: "The input doesn't look like a document we can read.".into(),
            suggestion: format!("Check that the file is a real PDF or image and isn't empty. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RadierError::PageOutOfRange { page, total } => HumanError {
            message: format!("Page {page} doesn't exist in this document."),
            suggestion: format!("The document has {total} page(s). Pick a page between 1 and {total}."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Pixel errors --
        RadierError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RadierError::MaskMismatch { .. } => HumanError {
            message: "The erase area doesn't fit this page.".into(),
            suggestion: "The selected area belongs to a different page size. Re-select the area on the current page and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RadierError::InpaintError(_) => HumanError {
            message: "Filling the erased area didn't work.".into(),
            suggestion: "The page was left unchanged. Try a smaller area, or switch to direct fill mode.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RadierError::OcrError(_) => HumanError {
            message: "Text recognition didn't work on this page.".into(),
            suggestion: "You can still erase by drawing the area yourself. For text commands, check the OCR models are installed.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Configuration --
        RadierError::InvalidConfig(detail) => HumanError {
            message: "A setting has an impossible value.".into(),
            suggestion: format!("Fix the setting and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- I/O --
        RadierError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to read or write that file.".into(),
                    suggestion: "Check the file permissions, or try copying the file somewhere else first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        RadierError::Serialization(_) => HumanError {
            message: "An internal data problem occurred.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// The message shown when an erase command matched nothing.
///
/// An empty match is a successful outcome, not an error, so it never flows
/// through `RadierError`; callers fetch the wording here instead.
pub fn nothing_matched(command: &str) -> HumanError {
    HumanError {
        message: format!("Nothing on this page matched \"{command}\"."),
        suggestion: "Try different wording, or erase the area directly by giving its coordinates.".into(),
        retriable: true,
        severity: Severity::Transient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypted_document_requires_action() {
        let human = humanize_error(&RadierError::EncryptedDocument);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn inpaint_failure_is_transient() {
        let human = humanize_error(&RadierError::InpaintError("band collapsed".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn missing_file_requires_action() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let human = humanize_error(&RadierError::Io(io));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn page_out_of_range_names_the_bounds() {
        let err = RadierError::PageOutOfRange { page: 9, total: 3 };
        let human = humanize_error(&err);
        assert!(human.suggestion.contains('3'));
    }

    #[test]
    fn nothing_matched_is_a_warning_not_an_error() {
        let human = nothing_matched("remove the dragon");
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.message.contains("remove the dragon"));
    }
}
