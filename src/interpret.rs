use std::fmt::Display;
use std::path::{Path, PathBuf};

use image::GrayImage;
use log::debug;
use logging_timer::time;

use crate::debug::{draw_decision_debug_image_mut, ImageDebugWriter};
use crate::layout::BallotLayout;
use crate::votable_areas::find_votable_areas;
use crate::vote_marks::find_vote_marks;
use crate::votes::{resolve_votes, Decision, InvalidBallot};

#[derive(Debug, Clone)]
pub struct InterpretOptions {
    pub debug: bool,
    pub debug_dir: Option<PathBuf>,
    pub layout: BallotLayout,
}

pub type LoadedBallotImages = (GrayImage, GrayImage);
pub type InterpretBallotResult = Result<Decision, InterpretBallotError>;

#[derive(Debug)]
pub enum InterpretBallotError {
    ImageOpenError(PathBuf, image::ImageError),
    MismatchedDimensions((PathBuf, (u32, u32)), (PathBuf, (u32, u32))),
    InvalidBallot(InvalidBallot),
}

impl Display for InterpretBallotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpretBallotError::ImageOpenError(path, e) => {
                write!(f, "unable to open {}: {}", path.display(), e)
            }
            InterpretBallotError::MismatchedDimensions((a_path, a_size), (b_path, b_size)) => {
                write!(
                    f,
                    "{} is {}x{} but {} is {}x{}",
                    a_path.display(),
                    a_size.0,
                    a_size.1,
                    b_path.display(),
                    b_size.0,
                    b_size.1
                )
            }
            InterpretBallotError::InvalidBallot(invalid) => invalid.fmt(f),
        }
    }
}

impl From<InvalidBallot> for InterpretBallotError {
    fn from(invalid: InvalidBallot) -> Self {
        InterpretBallotError::InvalidBallot(invalid)
    }
}

#[time]
pub fn load_ballot_image(image_path: &Path) -> Result<GrayImage, InterpretBallotError> {
    match image::open(image_path) {
        Ok(img) => Ok(img.into_luma8()),
        Err(e) => Err(InterpretBallotError::ImageOpenError(
            image_path.to_path_buf(),
            e,
        )),
    }
}

#[time]
/// Load the blank and filled ballot images, which must be the same size.
pub fn load_ballot_images(
    reference_path: &Path,
    filled_path: &Path,
) -> Result<LoadedBallotImages, InterpretBallotError> {
    let (reference_result, filled_result) = rayon::join(
        || load_ballot_image(reference_path),
        || load_ballot_image(filled_path),
    );

    let reference = reference_result?;
    let filled = filled_result?;

    if reference.dimensions() != filled.dimensions() {
        return Err(InterpretBallotError::MismatchedDimensions(
            (reference_path.to_path_buf(), reference.dimensions()),
            (filled_path.to_path_buf(), filled.dimensions()),
        ));
    }

    Ok((reference, filled))
}

/// Reads the votes on `filled_path` by comparing it with the blank ballot at
/// `reference_path`.
#[time]
pub fn interpret_ballot(
    reference_path: &Path,
    filled_path: &Path,
    options: &InterpretOptions,
) -> InterpretBallotResult {
    let (reference, filled) = load_ballot_images(reference_path, filled_path)?;
    interpret_ballot_images(&reference, &filled, filled_path, options)
}

/// Runs the pipeline on already loaded images. `filled_path` only names the
/// debug images.
pub fn interpret_ballot_images(
    reference: &GrayImage,
    filled: &GrayImage,
    filled_path: &Path,
    options: &InterpretOptions,
) -> InterpretBallotResult {
    let debug = if options.debug {
        ImageDebugWriter::new(
            filled_path.to_path_buf(),
            options.debug_dir.clone(),
            reference.clone(),
        )
    } else {
        ImageDebugWriter::disabled()
    };

    let layout = &options.layout;
    let areas = find_votable_areas(reference, &layout.votable_area, &debug);
    let marks = find_vote_marks(reference, filled, &layout.vote_mark, &debug);
    let decision = resolve_votes(&areas, &marks, layout.attribution, layout.max_selections)?;

    if debug.is_enabled() {
        debug.write("decision", |canvas| {
            draw_decision_debug_image_mut(canvas, &areas, &decision)
        });
    }
    debug!("decision: {:?}", decision);

    Ok(decision)
}
