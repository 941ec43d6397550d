// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition seam for the region detector.
//
// The detector never talks to an OCR backend directly; it calls a
// [`TextRecognizer`], injected at engine construction. The default backend
// is the `ocrs` crate (pure-Rust neural OCR executed via `rten`), available
// behind the `ocr` feature gate:
//
// ```toml
// radier-engine = { path = "crates/radier-engine", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The `ocrs` backend requires two model files:
//
// - **Detection model** (`text-detection.rten`) — locates text regions.
// - **Recognition model** (`text-recognition.rten`) — decodes characters.
//
// Models can be downloaded from the ocrs-models repository:
//   <https://github.com/nickknight/ocrs-models/releases>
//
// Or obtained automatically by running the `ocrs-cli` tool once:
//   ```sh
//   cargo install ocrs-cli
//   ocrs some-image.png  # downloads models to ~/.cache/ocrs/
//   ```

use image::GrayImage;
use radier_core::error::Result;

/// Text recognised from one region crop.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Raw recognised text; the detector trims it before filtering.
    pub text: String,
    /// Backend confidence in `[0, 1]`; advisory only.
    pub confidence: f32,
}

impl Recognition {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// A text recognition backend, injected into the detector.
///
/// Implementations receive one grayscale region crop per call and return
/// whatever text they can read from it. Errors are treated as "this region
/// is unreadable" by the detector; they never abort a page.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, crop: &GrayImage) -> Result<Recognition>;
}

/// Closures work as recognizers, which keeps tests and one-off backends cheap.
impl<F> TextRecognizer for F
where
    F: Fn(&GrayImage) -> Result<Recognition> + Send + Sync,
{
    fn recognize(&self, crop: &GrayImage) -> Result<Recognition> {
        self(crop)
    }
}

/// Recognizer that reads nothing.
///
/// Used when no OCR backend is configured: detection yields no regions, so
/// command-driven erasure matches nothing, while coordinate-driven erasure
/// keeps working untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecognizer;

impl TextRecognizer for NullRecognizer {
    fn recognize(&self, _crop: &GrayImage) -> Result<Recognition> {
        Ok(Recognition::new("", 0.0))
    }
}

#[cfg(feature = "ocr")]
pub use backend::{OcrConfig, OcrsRecognizer, models_available};

#[cfg(feature = "ocr")]
mod backend {
    use std::path::{Path, PathBuf};

    use image::{DynamicImage, GrayImage};
    use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
    use radier_core::error::{RadierError, Result};
    use rten::Model;
    use tracing::{debug, info, instrument};

    use super::{Recognition, TextRecognizer};

    /// Default directory for cached OCR model files.
    ///
    /// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`,
    /// falling back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
    fn default_model_dir() -> PathBuf {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            PathBuf::from(xdg).join("ocrs")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".cache").join("ocrs")
        } else {
            // Last resort — current directory.
            PathBuf::from("ocrs-models")
        }
    }

    /// Well-known filenames for the detection and recognition models.
    const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
    const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

    /// `ocrs` exposes no per-call confidence through its text API, so the
    /// backend reports this fixed advisory value for successful reads.
    const ADVISORY_CONFIDENCE: f32 = 0.8;

    /// Configuration for constructing an [`OcrsRecognizer`].
    #[derive(Debug, Clone)]
    pub struct OcrConfig {
        /// Path to the text-detection model file (`.rten`).
        pub detection_model_path: PathBuf,
        /// Path to the text-recognition model file (`.rten`).
        pub recognition_model_path: PathBuf,
    }

    impl Default for OcrConfig {
        /// Returns a config pointing at the default model cache directory.
        fn default() -> Self {
            let dir = default_model_dir();
            Self {
                detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
                recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
            }
        }
    }

    impl OcrConfig {
        /// Create a config with an explicit model directory.
        ///
        /// Expects the directory to contain `text-detection.rten` and
        /// `text-recognition.rten`.
        pub fn from_dir(dir: impl AsRef<Path>) -> Self {
            let dir = dir.as_ref();
            Self {
                detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
                recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
            }
        }

        /// Verify that both model files exist.
        pub fn validate(&self) -> Result<()> {
            if !self.detection_model_path.exists() {
                return Err(RadierError::OcrError(format!(
                    "detection model not found at {}; run `ocrs-cli` once to download models, \
                     or see <https://github.com/nickknight/ocrs-models/releases>",
                    self.detection_model_path.display()
                )));
            }
            if !self.recognition_model_path.exists() {
                return Err(RadierError::OcrError(format!(
                    "recognition model not found at {}; run `ocrs-cli` once to download models, \
                     or see <https://github.com/nickknight/ocrs-models/releases>",
                    self.recognition_model_path.display()
                )));
            }
            Ok(())
        }
    }

    /// `ocrs`-backed recognizer.
    ///
    /// Model loading is the expensive step — build one recognizer and share
    /// it across pages. Recognition itself takes `&self`, so a single
    /// instance behind an `Arc` serves parallel page work.
    ///
    /// **Important:** the `ocrs` and `rten` crates must be compiled in
    /// release mode; debug builds are 10-100x slower.
    pub struct OcrsRecognizer {
        engine: OcrsEngine,
    }

    impl OcrsRecognizer {
        /// Load models from the paths given in `config`.
        ///
        /// # Errors
        ///
        /// Returns [`RadierError::OcrError`] if model files are missing or corrupt.
        #[instrument(skip_all, fields(
            detection = %config.detection_model_path.display(),
            recognition = %config.recognition_model_path.display(),
        ))]
        pub fn new(config: OcrConfig) -> Result<Self> {
            config.validate()?;

            info!("Loading OCR detection model");
            let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
                RadierError::OcrError(format!(
                    "failed to load detection model from {}: {}",
                    config.detection_model_path.display(),
                    err
                ))
            })?;

            info!("Loading OCR recognition model");
            let recognition_model =
                Model::load_file(&config.recognition_model_path).map_err(|err| {
                    RadierError::OcrError(format!(
                        "failed to load recognition model from {}: {}",
                        config.recognition_model_path.display(),
                        err
                    ))
                })?;

            let engine = OcrsEngine::new(OcrEngineParams {
                detection_model: Some(detection_model),
                recognition_model: Some(recognition_model),
                ..Default::default()
            })
            .map_err(|err| {
                RadierError::OcrError(format!("failed to initialise OCR engine: {}", err))
            })?;

            info!("OCR engine initialised successfully");
            Ok(Self { engine })
        }

        /// Load models from the default cache directory.
        pub fn with_defaults() -> Result<Self> {
            Self::new(OcrConfig::default())
        }
    }

    impl TextRecognizer for OcrsRecognizer {
        fn recognize(&self, crop: &GrayImage) -> Result<Recognition> {
            // ocrs expects RGB8 input.
            let rgb = DynamicImage::ImageLuma8(crop.clone()).to_rgb8();
            let (width, height) = rgb.dimensions();

            let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
                RadierError::OcrError(format!(
                    "failed to create image source ({}x{}): {}",
                    width, height, err
                ))
            })?;

            let input = self
                .engine
                .prepare_input(source)
                .map_err(|err| RadierError::OcrError(format!("OCR preprocessing failed: {}", err)))?;

            let text = self
                .engine
                .get_text(&input)
                .map_err(|err| RadierError::OcrError(format!("OCR recognition failed: {}", err)))?;

            debug!(chars = text.len(), "region crop recognised");
            Ok(Recognition::new(text, ADVISORY_CONFIDENCE))
        }
    }

    /// Check whether OCR model files exist in the default cache location.
    pub fn models_available() -> bool {
        let config = OcrConfig::default();
        config.detection_model_path.exists() && config.recognition_model_path.exists()
    }

}
