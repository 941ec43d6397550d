// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-aware fill of masked page regions.
//
// The fill is fast-marching inpainting in the manner of Telea: the known
// pixels ringing the mask form the initial front, distances into the mask
// satisfy an eikonal update, and each masked pixel is reconstructed from a
// weighted average of the known pixels in its neighbourhood as the front
// sweeps inward. Weights combine direction (alignment with the front
// normal), geometric distance, and level-set proximity.
//
// Distances outside the mask are taken as zero rather than computed by an
// outward marching pass; at the small radii used here the level-set weight
// degenerates gracefully and the direction and distance terms carry the
// result.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use image::{GrayImage, Rgb, RgbImage};
use radier_core::{EngineConfig, FillMode, RadierError, Result};
use tracing::{debug, instrument, warn};

/// Distance assigned to unreached masked pixels.
const FAR: f32 = 1.0e6;

/// Pixel states during the march.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Value is trusted: untouched original, or already filled.
    Known,
    /// On the advancing front.
    Band,
    /// Masked and not yet reached.
    Inside,
}

/// Heap entry: a front pixel ordered by distance, smallest first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrontPixel {
    dist: f32,
    x: u32,
    y: u32,
}

impl Eq for FrontPixel {}

impl Ord for FrontPixel {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the nearest pixel first.
        other.dist.total_cmp(&self.dist)
    }
}

impl PartialOrd for FrontPixel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One attempt in the fill fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillStrategy {
    /// Neutralise, inpaint, blend back over the original.
    Enhanced,
    /// Inpaint the masked pixels and nothing else.
    Direct,
}

/// Strategies tried in order for the given mode. The identity fallback is
/// not listed; it is what remains when the chain is exhausted.
fn strategy_chain(mode: FillMode) -> Vec<FillStrategy> {
    match mode {
        FillMode::Enhanced => vec![FillStrategy::Enhanced, FillStrategy::Direct],
        FillMode::Direct => vec![FillStrategy::Direct],
    }
}

/// Fills masked regions of a page from their surroundings.
#[derive(Debug, Clone, Copy)]
pub struct InpaintEngine {
    radius: u32,
    blend_weight: f32,
    mode: FillMode,
}

impl InpaintEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            radius: config.inpaint_radius.max(1),
            blend_weight: config.blend_weight,
            mode: config.fill_mode,
        }
    }

    /// Fill the masked pixels of `image` from the surrounding content.
    ///
    /// Never fails: strategies are tried in order and the last resort is
    /// the input returned unchanged. An all-zero mask short-circuits to an
    /// exact copy of the input, so repeated calls stay identity.
    #[instrument(skip_all, fields(mode = %self.mode, radius = self.radius))]
    pub fn fill(&self, image: &RgbImage, mask: &GrayImage) -> RgbImage {
        if !mask.pixels().any(|p| p.0[0] != 0) {
            debug!("mask is empty; nothing to fill");
            return image.clone();
        }

        for strategy in strategy_chain(self.mode) {
            match self.try_strategy(strategy, image, mask) {
                Ok(filled) => return filled,
                Err(err) => {
                    warn!(?strategy, error = %err, "fill strategy failed; falling back");
                }
            }
        }

        warn!("all fill strategies failed; returning page unchanged");
        image.clone()
    }

    fn try_strategy(
        &self,
        strategy: FillStrategy,
        image: &RgbImage,
        mask: &GrayImage,
    ) -> Result<RgbImage> {
        check_dimensions(image, mask)?;
        match strategy {
            FillStrategy::Direct => telea_fill(image, mask, self.radius),
            FillStrategy::Enhanced => {
                // Flatten the masked content to white first so heavy ink
                // cannot bias the fill, then soften the seam by blending
                // the result back over the original.
                let neutral = neutralize_masked(image, mask);
                let filled = telea_fill(&neutral, mask, self.radius)?;
                Ok(blend(&filled, image, self.blend_weight))
            }
        }
    }
}

impl Default for InpaintEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

fn check_dimensions(image: &RgbImage, mask: &GrayImage) -> Result<()> {
    if mask.dimensions() != image.dimensions() {
        return Err(RadierError::MaskMismatch {
            mask_w: mask.width(),
            mask_h: mask.height(),
            image_w: image.width(),
            image_h: image.height(),
        });
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(RadierError::InpaintError("zero-sized image".into()));
    }
    Ok(())
}

/// Replace masked pixels with flat white, leaving the rest untouched.
fn neutralize_masked(image: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut out = image.clone();
    for (x, y, p) in mask.enumerate_pixels() {
        if p.0[0] != 0 {
            out.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    out
}

/// Per-pixel convex blend: `weight` of `filled` plus the remainder of
/// `original`.
fn blend(filled: &RgbImage, original: &RgbImage, weight: f32) -> RgbImage {
    let mut out = RgbImage::new(filled.width(), filled.height());
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let f = filled.get_pixel(x, y).0;
        let o = original.get_pixel(x, y).0;
        for c in 0..3 {
            let v = weight * f[c] as f32 + (1.0 - weight) * o[c] as f32;
            pixel.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Fast-marching fill of every masked pixel.
fn telea_fill(image: &RgbImage, mask: &GrayImage, radius: u32) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    let idx = |x: u32, y: u32| (y * width + x) as usize;

    let mut states = vec![State::Known; (width * height) as usize];
    let mut dists = vec![0.0f32; (width * height) as usize];
    let mut output = image.clone();

    for (x, y, p) in mask.enumerate_pixels() {
        if p.0[0] != 0 {
            states[idx(x, y)] = State::Inside;
            dists[idx(x, y)] = FAR;
        }
    }

    // The initial front: every known pixel with a masked 4-neighbour.
    let mut front = BinaryHeap::new();
    for y in 0..height {
        for x in 0..width {
            if states[idx(x, y)] != State::Inside {
                continue;
            }
            for (nx, ny) in neighbours4(x, y, width, height) {
                let n = idx(nx, ny);
                if states[n] == State::Known {
                    states[n] = State::Band;
                    front.push(FrontPixel {
                        dist: 0.0,
                        x: nx,
                        y: ny,
                    });
                }
            }
        }
    }

    if front.is_empty() {
        return Err(RadierError::InpaintError(
            "mask leaves no known pixels to fill from".into(),
        ));
    }

    // March inward. Each popped front pixel freezes; unreached neighbours
    // get an eikonal distance, are filled, and join the front.
    while let Some(FrontPixel { x, y, .. }) = front.pop() {
        let p = idx(x, y);
        if states[p] == State::Known {
            // Stale duplicate left behind by a distance improvement.
            continue;
        }
        states[p] = State::Known;

        for (nx, ny) in neighbours4(x, y, width, height) {
            let n = idx(nx, ny);
            if states[n] == State::Known {
                continue;
            }

            let solved = [
                eikonal_solve(nx as i64 - 1, ny as i64, nx as i64, ny as i64 - 1, width, height, &states, &dists),
                eikonal_solve(nx as i64 + 1, ny as i64, nx as i64, ny as i64 - 1, width, height, &states, &dists),
                eikonal_solve(nx as i64 - 1, ny as i64, nx as i64, ny as i64 + 1, width, height, &states, &dists),
                eikonal_solve(nx as i64 + 1, ny as i64, nx as i64, ny as i64 + 1, width, height, &states, &dists),
            ]
            .into_iter()
            .fold(FAR, f32::min);
            if solved < dists[n] {
                dists[n] = solved;
            }

            if states[n] == State::Inside {
                states[n] = State::Band;
                fill_pixel(&mut output, nx, ny, &states, &dists, radius);
            }
            front.push(FrontPixel {
                dist: dists[n],
                x: nx,
                y: ny,
            });
        }
    }

    Ok(output)
}

/// In-bounds 4-neighbourhood of a pixel.
fn neighbours4(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let (x, y) = (x as i64, y as i64);
    [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
        .into_iter()
        .filter(move |&(nx, ny)| nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64)
        .map(|(nx, ny)| (nx as u32, ny as u32))
}

/// Solve the discretised eikonal equation `|∇T| = 1` for a pixel given one
/// horizontal and one vertical neighbour.
fn eikonal_solve(
    ax: i64,
    ay: i64,
    bx: i64,
    by: i64,
    width: u32,
    height: u32,
    states: &[State],
    dists: &[f32],
) -> f32 {
    let known_dist = |x: i64, y: i64| -> Option<f32> {
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return None;
        }
        let i = (y as u32 * width + x as u32) as usize;
        (states[i] == State::Known).then_some(dists[i])
    };

    match (known_dist(ax, ay), known_dist(bx, by)) {
        (Some(ta), Some(tb)) => {
            let diff = 2.0 - (ta - tb) * (ta - tb);
            if diff > 0.0 {
                let r = diff.sqrt();
                let mut s = (ta + tb - r) / 2.0;
                if s >= ta && s >= tb {
                    return s;
                }
                s += r;
                if s >= ta && s >= tb {
                    return s;
                }
                FAR
            } else {
                FAR
            }
        }
        (Some(ta), None) => 1.0 + ta,
        (None, Some(tb)) => 1.0 + tb,
        (None, None) => FAR,
    }
}

/// Reconstruct one masked pixel from the known pixels within `radius`.
fn fill_pixel(output: &mut RgbImage, x: u32, y: u32, states: &[State], dists: &[f32], radius: u32) {
    let (width, height) = output.dimensions();
    let idx = |x: u32, y: u32| (y * width + x) as usize;
    let dist = dists[idx(x, y)];
    let (grad_x, grad_y) = dist_gradient(x, y, width, height, states, dists);

    let r = radius as i64;
    let mut sum = [0.0f32; 3];
    let mut weight_sum = 0.0f32;

    for dy in -r..=r {
        for dx in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let n = idx(nx as u32, ny as u32);
            if states[n] == State::Inside {
                continue;
            }

            // Vector from the neighbour to the pixel being filled.
            let vx = -dx as f32;
            let vy = -dy as f32;
            let len_sq = vx * vx + vy * vy;
            let len = len_sq.sqrt();
            if len > radius as f32 {
                continue;
            }

            let mut direction = (vx * grad_x + vy * grad_y).abs();
            if direction < 1.0e-6 {
                direction = 1.0e-6;
            }
            let geometry = 1.0 / len_sq;
            let level = 1.0 / (1.0 + (dists[n] - dist).abs());
            let weight = direction * geometry * level;

            let value = output.get_pixel(nx as u32, ny as u32).0;
            for c in 0..3 {
                sum[c] += weight * value[c] as f32;
            }
            weight_sum += weight;
        }
    }

    // The pixel that promoted us to the band is always in range, so the
    // weight sum is positive.
    if weight_sum > 0.0 {
        let mut pixel = [0u8; 3];
        for c in 0..3 {
            pixel[c] = (sum[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
        }
        output.put_pixel(x, y, Rgb(pixel));
    }
}

/// Central-difference gradient of the distance field, falling back to
/// one-sided differences beside unreached pixels.
fn dist_gradient(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    states: &[State],
    dists: &[f32],
) -> (f32, f32) {
    let value = |x: i64, y: i64| -> Option<f32> {
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return None;
        }
        let i = (y as u32 * width + x as u32) as usize;
        (states[i] != State::Inside).then_some(dists[i])
    };

    let here = dists[(y * width + x) as usize];
    let axis = |prev: Option<f32>, next: Option<f32>| -> f32 {
        match (prev, next) {
            (Some(p), Some(n)) => (n - p) / 2.0,
            (Some(p), None) => here - p,
            (None, Some(n)) => n - here,
            (None, None) => 0.0,
        }
    };

    let gx = axis(
        value(x as i64 - 1, y as i64),
        value(x as i64 + 1, y as i64),
    );
    let gy = axis(
        value(x as i64, y as i64 - 1),
        value(x as i64, y as i64 + 1),
    );
    (gx, gy)
}

// -- Tests --------------------------------------------------------------------
