use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{GrayImage, Luma};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut},
    rect::Rect,
};

pub const BOX_TOPS: [i32; 3] = [100, 250, 400];

/// A white page with three 320×90 selection boxes stacked vertically.
pub fn blank_ballot() -> GrayImage {
    let mut ballot = GrayImage::from_pixel(800, 600, Luma([255]));
    for top in BOX_TOPS {
        for inset in 0..4 {
            draw_hollow_rect_mut(
                &mut ballot,
                Rect::at(100 + inset, top + inset)
                    .of_size(320 - 2 * inset as u32, 90 - 2 * inset as u32),
                Luma([0]),
            );
        }
    }
    ballot
}

/// Inks a blob well inside the box whose top edge is at `top`.
pub fn fill_box(ballot: &mut GrayImage, top: i32) {
    fill_box_at(ballot, 150, top);
}

/// Inks a blob starting at `left` inside the box whose top edge is at `top`.
pub fn fill_box_at(ballot: &mut GrayImage, left: i32, top: i32) {
    draw_filled_rect_mut(ballot, Rect::at(left, top + 20).of_size(100, 40), Luma([0]));
}

/// Saves the blank ballot and a copy with the boxes at `filled_tops` inked.
pub fn write_ballots(dir: &Path, filled_tops: &[i32]) -> (PathBuf, PathBuf) {
    let reference = blank_ballot();
    let mut filled = reference.clone();
    for top in filled_tops {
        fill_box(&mut filled, *top);
    }

    let reference_path = dir.join("reference.png");
    let filled_path = dir.join("filled.png");
    reference.save(&reference_path).unwrap();
    filled.save(&filled_path).unwrap();
    (reference_path, filled_path)
}

pub fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ballot-diff"))
        .args(args)
        .output()
        .unwrap()
}
