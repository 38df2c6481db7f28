use image::{imageops, Rgba, RgbaImage};

use crate::geometry::PixelBounds;

pub(super) const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

pub(super) fn solid_patch(bounds: PixelBounds, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(bounds.width, bounds.height, color)
}

/// Mosaic of `cell`-sized blocks. Grid lines pass through `grid_origin`, so
/// the mosaic lines up across regions. Each block takes the mean color of
/// the whole block in `source`, even where `bounds` only covers part of it.
pub(super) fn pixelate_patch(
    source: &RgbaImage,
    bounds: PixelBounds,
    cell: u32,
    grid_origin: (u32, u32),
) -> RgbaImage {
    let cell = cell.max(1);
    let mut patch = RgbaImage::new(bounds.width, bounds.height);
    let (cols, col_offset) = cell_span(bounds.x, bounds.width, cell, grid_origin.0);
    let (rows, row_offset) = cell_span(bounds.y, bounds.height, cell, grid_origin.1);

    for row in 0..rows {
        let cell_top = row_offset + i64::from(row) * i64::from(cell);
        for col in 0..cols {
            let cell_left = col_offset + i64::from(col) * i64::from(cell);
            let Some(cell_bounds) = clip_cell(cell_left, cell_top, cell, source) else {
                continue;
            };
            let color = mean_color(source, cell_bounds);
            fill_intersection(&mut patch, bounds, cell_bounds, color);
        }
    }
    patch
}

fn cell_span(start: u32, len: u32, cell: u32, origin: u32) -> (u32, i64) {
    let cell = i64::from(cell);
    let origin = i64::from(origin);
    let first = (i64::from(start) - origin).div_euclid(cell);
    let last = (i64::from(start) + i64::from(len) - 1 - origin).div_euclid(cell);
    let count = u32::try_from(last - first + 1).unwrap_or(0);
    (count, origin + first * cell)
}

fn clip_cell(left: i64, top: i64, cell: u32, source: &RgbaImage) -> Option<PixelBounds> {
    let right = (left + i64::from(cell)).min(i64::from(source.width()));
    let bottom = (top + i64::from(cell)).min(i64::from(source.height()));
    let left = left.max(0);
    let top = top.max(0);
    if right <= left || bottom <= top {
        return None;
    }
    Some(PixelBounds::new(
        u32::try_from(left).ok()?,
        u32::try_from(top).ok()?,
        u32::try_from(right - left).ok()?,
        u32::try_from(bottom - top).ok()?,
    ))
}

fn mean_color(source: &RgbaImage, cell: PixelBounds) -> Rgba<u8> {
    let mut totals = [0_u64; 4];
    for y in cell.y..cell.y + cell.height {
        for x in cell.x..cell.x + cell.width {
            let pixel = source.get_pixel(x, y);
            for (total, channel) in totals.iter_mut().zip(pixel.0) {
                *total += u64::from(channel);
            }
        }
    }
    let count = u64::from(cell.width) * u64::from(cell.height);
    let average = |total: u64| u8::try_from((total + count / 2) / count).unwrap_or(u8::MAX);
    Rgba([
        average(totals[0]),
        average(totals[1]),
        average(totals[2]),
        average(totals[3]),
    ])
}

fn fill_intersection(
    patch: &mut RgbaImage,
    bounds: PixelBounds,
    cell: PixelBounds,
    color: Rgba<u8>,
) {
    let left = cell.x.max(bounds.x);
    let top = cell.y.max(bounds.y);
    let right = (cell.x + cell.width).min(bounds.x + bounds.width);
    let bottom = (cell.y + cell.height).min(bounds.y + bounds.height);
    for y in top..bottom {
        for x in left..right {
            patch.put_pixel(x - bounds.x, y - bounds.y, color);
        }
    }
}

/// Gaussian blur of the `bounds` window. The window is cut with a margin of
/// three sigmas, sampling past the image edge from the nearest edge pixel,
/// so the result has no dark or transparent fringe at the crop border.
pub(super) fn blur_patch(source: &RgbaImage, bounds: PixelBounds, sigma: f32) -> RgbaImage {
    let sigma = sigma.max(0.5);
    // Samples beyond one image extent only repeat edge pixels.
    let extent = source.width().max(source.height());
    let margin = ((sigma * 3.0).ceil() as u32).min(extent);
    let padded = clamped_window(source, bounds, margin);
    let blurred = imageops::blur(&padded, sigma);
    imageops::crop_imm(&blurred, margin, margin, bounds.width, bounds.height).to_image()
}

fn clamped_window(source: &RgbaImage, bounds: PixelBounds, margin: u32) -> RgbaImage {
    let max_x = i64::from(source.width()) - 1;
    let max_y = i64::from(source.height()) - 1;
    let origin_x = i64::from(bounds.x) - i64::from(margin);
    let origin_y = i64::from(bounds.y) - i64::from(margin);
    RgbaImage::from_fn(
        bounds.width + 2 * margin,
        bounds.height + 2 * margin,
        |x, y| {
            let sample_x = (origin_x + i64::from(x)).clamp(0, max_x);
            let sample_y = (origin_y + i64::from(y)).clamp(0, max_y);
            // Both coordinates are clamped into the source extent.
            *source.get_pixel(sample_x as u32, sample_y as u32)
        },
    )
}
