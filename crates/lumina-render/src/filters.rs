//! Pixel implementations of the image filters.
//!
//! Filters run in list order over straight RGBA pixels. Each one leaves
//! alpha untouched; blur is the only filter that reads neighbours.

use image::{Rgba, RgbaImage, imageops};
use lumina_core::ImageFilter;

/// Apply each filter in order.
pub fn apply_filters(image: &mut RgbaImage, filters: &[ImageFilter]) {
    for filter in filters {
        apply_filter(image, *filter);
    }
}

pub fn apply_filter(image: &mut RgbaImage, filter: ImageFilter) {
    match filter {
        ImageFilter::Grayscale => map_rgb(image, grayscale),
        ImageFilter::Sepia => map_rgb(image, sepia),
        ImageFilter::Invert => map_rgb(image, |[r, g, b]| [255 - r, 255 - g, 255 - b]),
        ImageFilter::Blur { amount } => blur(image, amount),
        ImageFilter::Noise { amount } => noise(image, amount),
        ImageFilter::Pixelate { block_size } => pixelate(image, block_size),
    }
}

fn map_rgb(image: &mut RgbaImage, f: impl Fn([u8; 3]) -> [u8; 3]) {
    for Rgba([r, g, b, _]) in image.pixels_mut() {
        [*r, *g, *b] = f([*r, *g, *b]);
    }
}

/// Average of the three channels.
fn grayscale([r, g, b]: [u8; 3]) -> [u8; 3] {
    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    [avg, avg, avg]
}

fn sepia([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    [
        channel(0.393 * r + 0.769 * g + 0.189 * b),
        channel(0.349 * r + 0.686 * g + 0.168 * b),
        channel(0.272 * r + 0.534 * g + 0.131 * b),
    ]
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Gaussian blur. `amount` is in [0, 1] and scales with the image size.
fn blur(image: &mut RgbaImage, amount: f64) {
    let longest = image.width().max(image.height()) as f64;
    let sigma = (amount.clamp(0.0, 1.0) * longest * 0.05) as f32;
    if sigma < 0.1 {
        return;
    }
    *image = imageops::blur(image, sigma);
}

/// Add per-pixel brightness noise in [-amount/2, amount/2].
///
/// The noise is a hash of the pixel position, so rendering the same image
/// twice gives the same result.
fn noise(image: &mut RgbaImage, amount: f64) {
    if amount <= 0.0 {
        return;
    }
    let seed = (image.width() as u64) << 32 | image.height() as u64;
    for (x, y, Rgba([r, g, b, _])) in image.enumerate_pixels_mut() {
        let unit = hash_unit(seed ^ ((y as u64) << 32 | x as u64));
        let offset = ((unit - 0.5) * amount) as f32;
        *r = channel(*r as f32 + offset);
        *g = channel(*g as f32 + offset);
        *b = channel(*b as f32 + offset);
    }
}

/// SplitMix64 finalizer mapped to [0, 1).
fn hash_unit(value: u64) -> f64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}

/// Replace each block with its average color.
fn pixelate(image: &mut RgbaImage, block_size: u32) {
    if block_size <= 1 {
        return;
    }
    let (width, height) = image.dimensions();
    for by in (0..height).step_by(block_size as usize) {
        for bx in (0..width).step_by(block_size as usize) {
            let x_end = (bx + block_size).min(width);
            let y_end = (by + block_size).min(height);
            let mut sum = [0u64; 4];
            for y in by..y_end {
                for x in bx..x_end {
                    let px = image.get_pixel(x, y).0;
                    for (acc, v) in sum.iter_mut().zip(px) {
                        *acc += v as u64;
                    }
                }
            }
            let count = ((x_end - bx) * (y_end - by)) as u64;
            let avg = sum.map(|v| (v / count) as u8);
            for y in by..y_end {
                for x in bx..x_end {
                    image.put_pixel(x, y, Rgba(avg));
                }
            }
        }
    }
}
