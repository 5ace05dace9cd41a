use image::GrayImage;
use imageproc::rect::Rect;
use log::debug;
use logging_timer::time;

use crate::{
    debug::{draw_votable_areas_debug_image_mut, ImageDebugWriter},
    geometry::{contour_bounding_rect, polygon_area, reading_order, rect_is_inside},
    image_utils::{binarize, ellipse_mask, erode, find_contour_points, ContourRetrieval},
    layout::VotableAreaParams,
    types::{ContourShape, VotableArea},
};

/// Finds the printed selection boxes on a blank ballot.
#[time]
pub fn find_votable_areas(
    reference: &GrayImage,
    params: &VotableAreaParams,
    debug: &ImageDebugWriter,
) -> Vec<VotableArea> {
    let binary = binarize(reference, params.threshold);
    debug.write_gray("votable_threshold", &binary);

    let eroded = erode(&binary, &ellipse_mask(params.erosion_kernel));
    debug.write_gray("votable_eroded", &eroded);

    let shapes = find_contour_points(&eroded, ContourRetrieval::Tree)
        .iter()
        .filter_map(|points| {
            contour_bounding_rect(points).map(|bounds| ContourShape::new(bounds, polygon_area(points)))
        })
        .collect::<Vec<ContourShape>>();

    let areas = select_votable_areas(&shapes, params);
    debug!("found {} votable areas: {:?}", areas.len(), areas);

    debug.write("votable_areas", |canvas| {
        draw_votable_areas_debug_image_mut(canvas, &areas)
    });

    areas
}

/// Picks the shapes that look like selection boxes and numbers them in
/// reading order. A shape nested inside one already picked is the other edge
/// of the same printed box and is skipped, so tracing order matters.
pub fn select_votable_areas(shapes: &[ContourShape], params: &VotableAreaParams) -> Vec<VotableArea> {
    let mut found: Vec<Rect> = Vec::new();

    for shape in shapes {
        if shape.area <= params.min_contour_area || !shape_could_be_votable_area(params, shape) {
            continue;
        }

        if found
            .iter()
            .any(|seen| rect_is_inside(&shape.bounds, seen))
        {
            continue;
        }

        found.push(shape.bounds);
    }

    found.sort_by(reading_order);
    found
        .into_iter()
        .enumerate()
        .map(|(index, bounds)| VotableArea { index, bounds })
        .collect()
}

/// Determines whether a shape could be a selection box based on its size.
pub fn shape_could_be_votable_area(params: &VotableAreaParams, shape: &ContourShape) -> bool {
    params.width.contains(&shape.bounds.width()) && params.height.contains(&shape.bounds.height())
}

#[cfg(test)]
mod test {
    use image::Luma;
    use imageproc::drawing::draw_hollow_rect_mut;
    use proptest::prelude::*;

    use super::*;

    fn rect(left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        Rect::at(left, top).of_size((right - left) as u32, (bottom - top) as u32)
    }

    fn shape(bounds: Rect) -> ContourShape {
        ContourShape::new(bounds, (bounds.width() * bounds.height()) as f64)
    }

    #[test]
    fn test_nested_contours_collapse_to_one_area() {
        let shapes = vec![
            shape(rect(100, 100, 400, 190)),
            shape(rect(105, 105, 395, 185)),
        ];
        let areas = select_votable_areas(&shapes, &VotableAreaParams::default());
        assert_eq!(
            areas,
            vec![VotableArea {
                index: 0,
                bounds: rect(100, 100, 400, 190)
            }]
        );
    }

    #[test]
    fn test_inner_edge_of_box_is_skipped_even_when_sized_like_a_box() {
        let outer = rect(100, 100, 440, 200);
        let inner = rect(105, 105, 435, 195);
        let params = VotableAreaParams::default();
        assert!(shape_could_be_votable_area(&params, &shape(inner)));

        let areas = select_votable_areas(&[shape(outer), shape(inner)], &params);
        assert_eq!(areas, vec![VotableArea { index: 0, bounds: outer }]);

        // Only shapes accepted earlier can swallow later ones.
        let areas = select_votable_areas(&[shape(inner), shape(outer)], &params);
        assert_eq!(areas.len(), 2);
    }

    #[test]
    fn test_rejects_shapes_outside_size_band() {
        let params = VotableAreaParams::default();
        let shapes = vec![
            shape(Rect::at(0, 0).of_size(299, 90)),
            shape(Rect::at(0, 200).of_size(350, 90)),
            shape(Rect::at(0, 400).of_size(320, 79)),
            shape(Rect::at(0, 600).of_size(320, 110)),
            shape(Rect::at(0, 800).of_size(300, 80)),
            shape(Rect::at(0, 1000).of_size(349, 109)),
        ];
        let areas = select_votable_areas(&shapes, &params);
        let tops = areas.iter().map(|a| a.bounds.top()).collect::<Vec<i32>>();
        assert_eq!(tops, vec![800, 1000]);
    }

    #[test]
    fn test_rejects_small_contour_area() {
        let bounds = Rect::at(0, 0).of_size(320, 90);
        let shapes = vec![ContourShape::new(bounds, 500.0)];
        assert!(select_votable_areas(&shapes, &VotableAreaParams::default()).is_empty());

        let shapes = vec![ContourShape::new(bounds, 500.5)];
        assert_eq!(select_votable_areas(&shapes, &VotableAreaParams::default()).len(), 1);
    }

    #[test]
    fn test_orders_by_top_then_left() {
        let shapes = vec![
            shape(Rect::at(600, 50).of_size(320, 90)),
            shape(Rect::at(10, 50).of_size(320, 90)),
            shape(Rect::at(900, 10).of_size(320, 90)),
        ];
        let areas = select_votable_areas(&shapes, &VotableAreaParams::default());
        let positions = areas
            .iter()
            .map(|a| (a.index, a.bounds.left(), a.bounds.top()))
            .collect::<Vec<_>>();
        assert_eq!(positions, vec![(0, 900, 10), (1, 10, 50), (2, 600, 50)]);
    }

    #[test]
    fn test_no_shapes_is_not_an_error() {
        assert!(select_votable_areas(&[], &VotableAreaParams::default()).is_empty());
    }

    proptest! {
        #[test]
        fn test_reading_order_ignores_input_order(
            lefts in proptest::collection::vec(0i32..2000, 1..8),
            rotate in 0usize..8,
        ) {
            // One box per row, 200px apart, with arbitrary horizontal offsets.
            let mut shapes = lefts
                .iter()
                .enumerate()
                .map(|(row, left)| shape(Rect::at(*left, row as i32 * 200).of_size(320, 90)))
                .collect::<Vec<ContourShape>>();
            let rotate = rotate % shapes.len();
            shapes.rotate_left(rotate);

            let areas = select_votable_areas(&shapes, &VotableAreaParams::default());
            prop_assert_eq!(areas.len(), lefts.len());
            for area in &areas {
                prop_assert_eq!(area.bounds.top(), area.index as i32 * 200);
                prop_assert_eq!(area.bounds.left(), lefts[area.index]);
            }
        }
    }

    #[test]
    fn test_find_votable_areas_in_rendered_ballot() {
        let mut reference = GrayImage::from_pixel(800, 600, Luma([255]));
        for top in [400, 100, 250] {
            for inset in 0..4 {
                draw_hollow_rect_mut(
                    &mut reference,
                    Rect::at(100 + inset, top + inset).of_size(320 - 2 * inset as u32, 90 - 2 * inset as u32),
                    Luma([0]),
                );
            }
        }

        let areas = find_votable_areas(
            &reference,
            &VotableAreaParams::default(),
            &ImageDebugWriter::disabled(),
        );

        assert_eq!(areas.len(), 3);
        for (area, top) in areas.iter().zip([100, 250, 400]) {
            assert!(area.bounds.top() <= top && area.bounds.top() >= top - 5);
            assert!(area.bounds.left() <= 100 && area.bounds.left() >= 95);
        }
    }
}
