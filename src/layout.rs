use std::fmt::Display;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::Size;

/// Calibration constants for one ballot design scanned at one resolution.
/// The defaults match a layout of roughly 320×90 pixel selection boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BallotLayout {
    pub votable_area: VotableAreaParams,
    pub vote_mark: VoteMarkParams,
    pub max_selections: usize,
    pub attribution: MarkAttribution,
}

/// How the printed selection boxes are picked out of the reference ballot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VotableAreaParams {
    /// Pixels brighter than this are paper, the rest is print.
    pub threshold: u8,
    pub erosion_kernel: Size<u8>,
    /// Contours enclosing this many pixels or fewer are ignored.
    pub min_contour_area: f64,
    pub width: Range<u32>,
    pub height: Range<u32>,
}

/// How voter ink is separated from scanner noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoteMarkParams {
    pub diff_threshold: u8,
    pub opening_kernel: Size<u8>,
    pub polygon_epsilon: f64,
    /// Marks whose simplified outline encloses this many pixels or fewer are
    /// dropped.
    pub min_area: f64,
}

/// Picks the votable area credited with a mark that touches more than one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkAttribution {
    /// The intersecting area with the lowest index.
    #[default]
    FirstMatch,
    /// The area sharing the most pixels with the mark, lowest index on ties.
    LargestOverlap,
}

impl Default for BallotLayout {
    fn default() -> Self {
        Self {
            votable_area: VotableAreaParams::default(),
            vote_mark: VoteMarkParams::default(),
            max_selections: 3,
            attribution: MarkAttribution::FirstMatch,
        }
    }
}

impl Default for VotableAreaParams {
    fn default() -> Self {
        Self {
            threshold: 80,
            erosion_kernel: Size {
                width: 5,
                height: 5,
            },
            min_contour_area: 500.0,
            width: 300..350,
            height: 80..110,
        }
    }
}

impl Default for VoteMarkParams {
    fn default() -> Self {
        Self {
            diff_threshold: 7,
            opening_kernel: Size {
                width: 3,
                height: 3,
            },
            polygon_epsilon: 6.0,
            min_area: 20.0,
        }
    }
}

#[derive(Debug)]
pub enum LayoutError {
    Read(PathBuf, io::Error),
    Parse(PathBuf, serde_json::Error),
    Invalid(String),
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::Read(path, e) => {
                write!(f, "unable to read layout {}: {}", path.display(), e)
            }
            LayoutError::Parse(path, e) => {
                write!(f, "unable to parse layout {}: {}", path.display(), e)
            }
            LayoutError::Invalid(reason) => write!(f, "invalid layout: {}", reason),
        }
    }
}

impl BallotLayout {
    /// Reads a layout from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| LayoutError::Read(path.to_path_buf(), e))?;
        let layout: BallotLayout =
            serde_json::from_str(&json).map_err(|e| LayoutError::Parse(path.to_path_buf(), e))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        check_kernel("votableArea.erosionKernel", &self.votable_area.erosion_kernel)?;
        check_kernel("voteMark.openingKernel", &self.vote_mark.opening_kernel)?;

        if self.votable_area.width.is_empty() {
            return Err(LayoutError::Invalid(format!(
                "votableArea.width range {:?} is empty",
                self.votable_area.width
            )));
        }
        if self.votable_area.height.is_empty() {
            return Err(LayoutError::Invalid(format!(
                "votableArea.height range {:?} is empty",
                self.votable_area.height
            )));
        }
        if !(self.vote_mark.polygon_epsilon > 0.0) {
            return Err(LayoutError::Invalid(format!(
                "voteMark.polygonEpsilon must be positive, got {}",
                self.vote_mark.polygon_epsilon
            )));
        }

        Ok(())
    }
}

fn check_kernel(name: &str, size: &Size<u8>) -> Result<(), LayoutError> {
    if size.width == 0 || size.height == 0 {
        return Err(LayoutError::Invalid(format!(
            "{} must be at least 1×1, got {}×{}",
            name, size.width, size.height
        )));
    }
    Ok(())
}
