use image::{GrayImage, Luma, Rgb};
use imageproc::{
    contours::find_contours,
    contrast::{threshold, ThresholdType},
    map::map_colors2,
    morphology::{grayscale_dilate, grayscale_erode, Mask},
    point::Point,
};

use crate::types::Size;

pub const WHITE: Luma<u8> = Luma([u8::MAX]);
pub const BLACK: Luma<u8> = Luma([u8::MIN]);

pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const ORANGE: Rgb<u8> = Rgb([255, 165, 0]);

/// Which contours to keep when tracing a binary image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContourRetrieval {
    /// Only the outermost border of each top-level region.
    External,
    /// Every border, outer and hole alike, in tracing order.
    Tree,
}

/// Generates an image where each pixel is the absolute luminosity difference
/// between corresponding pixels of `base` and `compare`. Ink added to a
/// light-background form shows up bright; everything the two have in common
/// goes dark.
///
/// Note that the sizes of the images must be equal.
///
/// ```text
///         BASE                  COMPARE                 DIFF
/// ┌───────────────────┐  ┌───────────────────┐  ┌───────────────────┐
/// │                   │  │        █ █ ███    │  │        █ █ ███    │
/// │ █ █               │  │ █ █    ███  █     │  │        ███  █     │
/// │  █                │  │  █     █ █ ███    │  │        █ █ ███    │
/// │ █ █ █████████████ │  │ █ █ █████████████ │  │                   │
/// └───────────────────┘  └───────────────────┘  └───────────────────┘
/// ```
pub fn abs_diff(base: &GrayImage, compare: &GrayImage) -> GrayImage {
    assert_eq!(base.dimensions(), compare.dimensions());
    map_colors2(base, compare, |b: Luma<u8>, c: Luma<u8>| {
        Luma([b.0[0].abs_diff(c.0[0])])
    })
}

/// Pixels brighter than `cutoff` become white, the rest black.
pub fn binarize(img: &GrayImage, cutoff: u8) -> GrayImage {
    threshold(img, cutoff, ThresholdType::Binary)
}

/// Rasterizes an elliptical structuring element inscribed in a `size` box.
/// Rows are filled symmetrically around the center column, so a 3×3 element
/// is a cross and a 5×5 element is a cross widened on its inner rows.
pub fn ellipse_kernel_image(size: Size<u8>) -> GrayImage {
    let width = size.width as i32;
    let height = size.height as i32;
    let r = height / 2;
    let c = width / 2;
    let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

    let mut kernel = GrayImage::from_pixel(width as u32, height as u32, BLACK);
    for y in 0..height {
        let dy = y - r;
        if dy.abs() > r {
            continue;
        }
        let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i32;
        let start = (c - dx).max(0);
        let end = (c + dx + 1).min(width);
        for x in start..end {
            kernel.put_pixel(x as u32, y as u32, WHITE);
        }
    }
    kernel
}

/// Builds a morphology mask from an elliptical structuring element anchored
/// at its center.
pub fn ellipse_mask(size: Size<u8>) -> Mask {
    Mask::from_image(&ellipse_kernel_image(size), size.width / 2, size.height / 2)
}

/// Shrinks white regions: a pixel stays white only if every pixel under the
/// mask is white.
pub fn erode(img: &GrayImage, mask: &Mask) -> GrayImage {
    grayscale_erode(img, mask)
}

/// Grows white regions by the mask.
pub fn dilate(img: &GrayImage, mask: &Mask) -> GrayImage {
    grayscale_dilate(img, mask)
}

/// Traces the borders of the white regions of a binary image.
pub fn find_contour_points(img: &GrayImage, retrieval: ContourRetrieval) -> Vec<Vec<Point<i32>>> {
    find_contours::<i32>(img)
        .into_iter()
        .filter(|contour| match retrieval {
            ContourRetrieval::External => contour.parent.is_none(),
            ContourRetrieval::Tree => true,
        })
        .filter(|contour| !contour.points.is_empty())
        .map(|contour| contour.points)
        .collect()
}
