use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;

use crate::color::Color;

/// A color extracted from the image with the pixels it represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedColor {
    pub color: Color,
    /// Pixels whose nearest final centroid is this one.
    pub count: usize,
    /// `count` as a share of all pixels.
    pub weight: f32,
}

/// Images larger than this in either dimension are downsampled before clustering.
pub const MAX_DIM: u32 = 200;
const MAX_ITER: usize = 10;

/// Load an image, downsample to fit within 200x200 (preserving aspect ratio),
/// and flatten it to opaque pixels in scan order.
pub fn load_and_prepare(path: &Path) -> Result<Vec<Color>> {
    let img = image::open(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        }
    })?;
    Ok(prepare_image(&img))
}

/// Same as [`load_and_prepare`] for an encoded image already in memory.
pub fn load_from_memory(bytes: &[u8]) -> Result<Vec<Color>> {
    let img = image::load_from_memory(bytes).context("unsupported or corrupt image data")?;
    Ok(prepare_image(&img))
}

/// Downsample (nearest-neighbour) and flatten a decoded image.
pub fn prepare_image(img: &DynamicImage) -> Vec<Color> {
    let rgb_img = if img.width() > MAX_DIM || img.height() > MAX_DIM {
        img.resize(MAX_DIM, MAX_DIM, FilterType::Nearest).to_rgb8()
    } else {
        img.to_rgb8()
    };
    tracing::debug!(
        width = rgb_img.width(),
        height = rgb_img.height(),
        "prepared image for extraction"
    );
    rgb_img.pixels().map(|p| Color::from(p.0)).collect()
}

/// Index of the centroid nearest to `pixel`. On equal distance the lowest index wins.
fn nearest(pixel: Color, centroids: &[Color]) -> usize {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = pixel.distance_sq(*centroid);
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

/// Seed centroids with every `N / k`-th pixel in scan order.
fn seed_centroids(pixels: &[Color], k: usize) -> Vec<Color> {
    let step = (pixels.len() / k).max(1);
    pixels
        .iter()
        .step_by(step)
        .take(k)
        .map(|p| p.with_alpha(255))
        .collect()
}

/// Run K-means in RGB space and return the final centroids.
///
/// Deterministic: seeding is positional, and each round assigns every pixel
/// before recomputing integer-truncated cluster means. Empty clusters keep
/// their previous centroid. Stops after 10 rounds or once nothing moves.
pub fn cluster(pixels: &[Color], k: usize) -> Vec<Color> {
    if pixels.is_empty() || k == 0 {
        return Vec::new();
    }
    let mut centroids = seed_centroids(pixels, k);

    for round in 0..MAX_ITER {
        let mut sums = vec![[0u64; 3]; centroids.len()];
        let mut counts = vec![0u64; centroids.len()];
        for &pixel in pixels {
            let i = nearest(pixel, &centroids);
            sums[i][0] += u64::from(pixel.r);
            sums[i][1] += u64::from(pixel.g);
            sums[i][2] += u64::from(pixel.b);
            counts[i] += 1;
        }

        let mut changed = false;
        for (i, centroid) in centroids.iter_mut().enumerate() {
            let n = counts[i];
            if n == 0 {
                continue;
            }
            let mean = Color::new(
                (sums[i][0] / n) as u8,
                (sums[i][1] / n) as u8,
                (sums[i][2] / n) as u8,
            );
            if mean != *centroid {
                *centroid = mean;
                changed = true;
            }
        }

        tracing::debug!(round, changed, "k-means round");
        if !changed {
            break;
        }
    }
    centroids
}

/// Extract up to `k` representative colors, most prevalent first.
///
/// Each pixel is credited to its nearest final centroid (lowest index on a
/// tie). Centroids credited with no pixels are dropped; equal counts keep
/// centroid order.
pub fn extract_colors(pixels: &[Color], k: usize) -> Vec<ExtractedColor> {
    let centroids = cluster(pixels, k);
    if centroids.is_empty() {
        return Vec::new();
    }

    let mut counts = vec![0usize; centroids.len()];
    for &pixel in pixels {
        counts[nearest(pixel, &centroids)] += 1;
    }

    let total = pixels.len() as f32;
    let mut colors: Vec<ExtractedColor> = centroids
        .into_iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(color, count)| ExtractedColor {
            color,
            count,
            weight: count as f32 / total,
        })
        .collect();

    // stable: ties keep centroid order
    colors.sort_by(|a, b| b.count.cmp(&a.count));
    colors
}

/// The ranked colors alone.
pub fn dominant_colors(pixels: &[Color], k: usize) -> Vec<Color> {
    extract_colors(pixels, k)
        .into_iter()
        .map(|extracted| extracted.color)
        .collect()
}
