use image::GrayImage;
use imageproc::{geometry::approximate_polygon_dp, point::Point};
use log::debug;
use logging_timer::time;

use crate::{
    debug::{draw_vote_marks_debug_image_mut, ImageDebugWriter},
    geometry::{contour_bounding_rect, polygon_area},
    image_utils::{abs_diff, binarize, dilate, ellipse_mask, erode, find_contour_points, ContourRetrieval},
    layout::VoteMarkParams,
    types::{ContourShape, VoteMark},
};

/// Finds the ink a voter added to `filled` relative to the blank `reference`.
/// Both images must have the same dimensions.
#[time]
pub fn find_vote_marks(
    reference: &GrayImage,
    filled: &GrayImage,
    params: &VoteMarkParams,
    debug: &ImageDebugWriter,
) -> Vec<VoteMark> {
    let diff = abs_diff(reference, filled);
    debug.write_gray("absdiff", &diff);

    let binary = binarize(&diff, params.diff_threshold);
    debug.write_gray("absdiff_threshold", &binary);

    let mask = ellipse_mask(params.opening_kernel);
    let opened = dilate(&erode(&binary, &mask), &mask);
    debug.write_gray("absdiff_opened", &opened);

    let shapes = find_contour_points(&opened, ContourRetrieval::External)
        .iter()
        .filter_map(|points| {
            let area = polygon_area(&simplify_outline(points, params.polygon_epsilon));
            contour_bounding_rect(points).map(|bounds| ContourShape::new(bounds, area))
        })
        .collect::<Vec<ContourShape>>();

    let marks = select_vote_marks(&shapes, params);
    debug!("found {} vote marks: {:?}", marks.len(), marks);

    debug.write("vote_marks", |canvas| {
        draw_vote_marks_debug_image_mut(canvas, &marks)
    });

    marks
}

/// Keeps the shapes big enough to be deliberate ink rather than scan noise.
pub fn select_vote_marks(shapes: &[ContourShape], params: &VoteMarkParams) -> Vec<VoteMark> {
    shapes
        .iter()
        .filter(|shape| shape.area > params.min_area)
        .map(|shape| VoteMark {
            bounds: shape.bounds,
        })
        .collect()
}

fn simplify_outline(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }
    approximate_polygon_dp(points, epsilon, false)
}
