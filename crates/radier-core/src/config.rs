// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine and rendering configuration.

use serde::{Deserialize, Serialize};

use crate::error::{RadierError, Result};
use crate::types::FillMode;

/// Tunables for detection, masking, inpainting, and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pixels added on every side of a region's bounding box when building
    /// its erase mask.
    pub mask_margin: u32,
    /// Neighbourhood radius, in pixels, sampled by the fast-marching fill.
    pub inpaint_radius: u32,
    /// Weight of the inpainted result in the enhanced-mode blend; the
    /// original image contributes the remainder.
    pub blend_weight: f32,
    /// Minimum enclosed contour area, in square pixels, for a candidate
    /// text region.
    pub min_region_area: f64,
    /// Minimum trimmed character count for recognised text to count as a
    /// region.
    pub min_text_len: usize,
    /// Maximum number of snapshots the undo history retains per page.
    pub history_capacity: usize,
    /// Fill strategy tried first; see [`FillMode`].
    pub fill_mode: FillMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mask_margin: 5,
            inpaint_radius: 3,
            blend_weight: 0.8,
            min_region_area: 100.0,
            min_text_len: 2,
            history_capacity: 10,
            fill_mode: FillMode::Enhanced,
        }
    }
}

impl EngineConfig {
    /// Reject out-of-range values before they reach the pixel pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.inpaint_radius == 0 {
            return Err(RadierError::InvalidConfig(
                "inpaint_radius must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.blend_weight) {
            return Err(RadierError::InvalidConfig(format!(
                "blend_weight {} outside [0, 1]",
                self.blend_weight
            )));
        }
        if self.history_capacity == 0 {
            return Err(RadierError::InvalidConfig(
                "history_capacity must be at least 1".into(),
            ));
        }
        if self.min_region_area < 0.0 {
            return Err(RadierError::InvalidConfig(format!(
                "min_region_area {} is negative",
                self.min_region_area
            )));
        }
        Ok(())
    }
}

/// Page rasterisation settings for the PDF codec.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Dots per inch at which PDF pages are rasterised and re-assembled.
    pub dpi: f32,
}

impl RenderConfig {
    /// Full-quality rendering for erasure work.
    pub const DEFAULT_DPI: f32 = 300.0;
    /// Lighter rendering for thumbnails and previews.
    pub const PREVIEW_DPI: f32 = 150.0;

    pub fn preview() -> Self {
        Self {
            dpi: Self::PREVIEW_DPI,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: Self::DEFAULT_DPI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The defaults must pass their own validation.
    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    /// A zero radius is rejected before the fill ever runs.
    #[test]
    fn zero_radius_rejected() {
        let config = EngineConfig {
            inpaint_radius: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    /// Blend weights outside the unit interval are rejected.
    #[test]
    fn out_of_range_blend_weight_rejected() {
        let config = EngineConfig {
            blend_weight: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
