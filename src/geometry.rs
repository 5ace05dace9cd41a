use std::cmp::Ordering;

use imageproc::point::Point;
use imageproc::rect::Rect;

/// Number of pixels covered by the rect.
pub fn rect_area(rect: &Rect) -> u64 {
    rect.width() as u64 * rect.height() as u64
}

/// Determines whether `inner` lies entirely within `outer`. Touching edges
/// still count as inside.
pub fn rect_is_inside(inner: &Rect, outer: &Rect) -> bool {
    inner.left() >= outer.left()
        && inner.top() >= outer.top()
        && inner.right() <= outer.right()
        && inner.bottom() <= outer.bottom()
}

/// Determines whether two rects share at least one pixel.
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.intersect(*b).is_some()
}

/// Number of pixels shared by two rects, zero when they are disjoint.
pub fn overlap_area(a: &Rect, b: &Rect) -> u64 {
    a.intersect(*b).map_or(0, |overlap| rect_area(&overlap))
}

/// Orders rects the way a ballot is read: top to bottom, then left to right.
pub fn reading_order(a: &Rect, b: &Rect) -> Ordering {
    a.top().cmp(&b.top()).then(a.left().cmp(&b.left()))
}

/// Gets the smallest rect containing every point of a contour, or `None` for
/// an empty contour.
pub fn contour_bounding_rect(points: &[Point<i32>]) -> Option<Rect> {
    let first = points.first()?;
    let (min_x, min_y, max_x, max_y) = points.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        },
    );
    Some(Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32))
}

/// Area enclosed by a polygon, computed with the shoelace formula. The
/// polygon is treated as closed whether or not the last point repeats the
/// first.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64)
        .sum();

    (twice_area as f64 / 2.0).abs()
}
