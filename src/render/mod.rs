mod filters;

use image::{imageops, RgbaImage};

use crate::geometry::{PixelBounds, Rect};
use crate::mapping::rect_for_bounds;
use crate::region::{Region, RegionKind};

pub const DEFAULT_FILTER_STRENGTH: f64 = 0.01;
const MAX_FILTER_STRENGTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositingPipeline {
    strength: f64,
}

impl Default for CompositingPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_STRENGTH)
    }
}

impl CompositingPipeline {
    /// Strengths outside `(0, 1]` fall back to the default.
    pub fn new(strength: f64) -> Self {
        let strength = if strength > 0.0 && strength <= MAX_FILTER_STRENGTH {
            strength
        } else {
            tracing::warn!(strength, "invalid filter strength; using default");
            DEFAULT_FILTER_STRENGTH
        };
        Self { strength }
    }

    pub const fn strength(&self) -> f64 {
        self.strength
    }

    fn filter_amount(&self, source: &RgbaImage) -> f64 {
        f64::from(source.width().max(source.height())) * self.strength
    }

    /// Pixel window a unit rect covers. Unit space is bottom-up while raster
    /// rows run top-down, hence the flip.
    pub fn pixel_bounds(source: &RgbaImage, unit_rect: Rect) -> Option<PixelBounds> {
        let extent = Rect::new(
            0.0,
            0.0,
            f64::from(source.width()),
            f64::from(source.height()),
        );
        let pixel_rect = rect_for_bounds(unit_rect, extent).flipped_in(extent);
        PixelBounds::covering(pixel_rect, source.width(), source.height())
    }

    fn patch(&self, source: &RgbaImage, kind: RegionKind, bounds: PixelBounds) -> RgbaImage {
        let amount = self.filter_amount(source);
        match kind {
            RegionKind::Pixelate => {
                let cell = amount.round().max(1.0) as u32;
                let center = (source.width() / 2, source.height() / 2);
                filters::pixelate_patch(source, bounds, cell, center)
            }
            RegionKind::Blur => filters::blur_patch(source, bounds, amount as f32),
            RegionKind::BlackBar => filters::solid_patch(bounds, filters::OPAQUE_BLACK),
        }
    }

    pub fn render(&self, source: &RgbaImage, regions: &[Region]) -> RgbaImage {
        let mut output = source.clone();
        for region in regions {
            let Some(bounds) = Self::pixel_bounds(source, region.rect) else {
                continue;
            };
            let patch = self.patch(source, region.kind(), bounds);
            imageops::overlay(
                &mut output,
                &patch,
                i64::from(bounds.x),
                i64::from(bounds.y),
            );
        }
        tracing::trace!(
            regions = regions.len(),
            width = source.width(),
            height = source.height(),
            "rendered redactions"
        );
        output
    }
}
