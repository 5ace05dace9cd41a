use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use log::{debug, warn};

use crate::{
    image_utils::{GREEN, ORANGE, RED},
    types::{VotableArea, VoteMark},
    votes::Decision,
};

/// Writes intermediate images next to the ballot being read, or into a
/// chosen directory. A disabled writer does nothing, so callers can write
/// unconditionally.
pub struct ImageDebugWriter {
    target: Option<DebugTarget>,
}

struct DebugTarget {
    base_path: PathBuf,
    output_dir: Option<PathBuf>,
    background: GrayImage,
}

impl ImageDebugWriter {
    /// `background` is what overlays are drawn on top of.
    pub fn new(base_path: PathBuf, output_dir: Option<PathBuf>, background: GrayImage) -> Self {
        Self {
            target: Some(DebugTarget {
                base_path,
                output_dir,
                background,
            }),
        }
    }

    pub fn disabled() -> Self {
        Self { target: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    pub fn write_gray(&self, label: &str, image: &GrayImage) {
        if let Some(target) = &self.target {
            let path = target.path_for(label);
            save(&path, image.save(&path));
        }
    }

    /// Draws on a color copy of the background and saves the result. `draw`
    /// only runs when the writer is enabled.
    pub fn write(&self, label: &str, draw: impl FnOnce(&mut RgbImage)) {
        if let Some(target) = &self.target {
            let mut canvas = DynamicImage::ImageLuma8(target.background.clone()).into_rgb8();
            draw(&mut canvas);
            let path = target.path_for(label);
            save(&path, canvas.save(&path));
        }
    }
}

impl DebugTarget {
    fn path_for(&self, label: &str) -> PathBuf {
        let path = debug_image_path(&self.base_path, label);
        match (&self.output_dir, path.file_name()) {
            (Some(dir), Some(file_name)) => dir.join(file_name),
            _ => path,
        }
    }
}

fn save(path: &Path, result: image::ImageResult<()>) {
    match result {
        Ok(()) => debug!("saved debug image: {}", path.display()),
        Err(e) => warn!("unable to save debug image {}: {}", path.display(), e),
    }
}

/// Creates a path for a debug image.
pub fn debug_image_path(base: &Path, label: &str) -> PathBuf {
    let mut result = PathBuf::from(base);
    result.set_file_name(format!(
        "{}_debug_{}.png",
        base.file_stem().unwrap_or_default().to_string_lossy(),
        label
    ));
    result
}

/// Draws an outline `thickness` pixels wide growing inward from `rect`.
fn draw_thick_hollow_rect_mut(canvas: &mut RgbImage, rect: Rect, thickness: u32, color: Rgb<u8>) {
    for inset in 0..thickness {
        if rect.width() <= 2 * inset || rect.height() <= 2 * inset {
            break;
        }
        draw_hollow_rect_mut(
            canvas,
            Rect::at(rect.left() + inset as i32, rect.top() + inset as i32)
                .of_size(rect.width() - 2 * inset, rect.height() - 2 * inset),
            color,
        );
    }
}

/// Draws the located selection boxes.
pub fn draw_votable_areas_debug_image_mut(canvas: &mut RgbImage, areas: &[VotableArea]) {
    for area in areas {
        draw_thick_hollow_rect_mut(canvas, area.bounds, 2, GREEN);
    }
}

/// Draws the detected ink regions.
pub fn draw_vote_marks_debug_image_mut(canvas: &mut RgbImage, marks: &[VoteMark]) {
    for mark in marks {
        draw_thick_hollow_rect_mut(canvas, mark.bounds, 5, RED);
    }
}

/// Highlights the selected boxes and any marks that missed every box.
pub fn draw_decision_debug_image_mut(
    canvas: &mut RgbImage,
    areas: &[VotableArea],
    decision: &Decision,
) {
    for area in areas {
        let thickness = if decision.selections.contains(&area.index) { 6 } else { 1 };
        draw_thick_hollow_rect_mut(canvas, area.bounds, thickness, GREEN);
    }
    for mark in &decision.unmatched {
        draw_thick_hollow_rect_mut(canvas, mark.bounds, 3, ORANGE);
    }
}
