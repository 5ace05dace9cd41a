use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

/// A printed selection box on the reference ballot. `index` is its position
/// in reading order and is what gets reported as the selected candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VotableArea {
    pub index: usize,
    pub bounds: Rect,
}

/// A region of ink present on the filled ballot but not on the reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VoteMark {
    pub bounds: Rect,
}

/// What remains of a traced contour once it has been measured.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContourShape {
    pub bounds: Rect,
    pub area: f64,
}

impl ContourShape {
    pub fn new(bounds: Rect, area: f64) -> Self {
        Self { bounds, area }
    }
}
