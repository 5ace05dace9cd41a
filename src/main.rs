extern crate log;
extern crate pretty_env_logger;

use std::path::PathBuf;
use std::process::exit;

use clap::{arg, command, value_parser, Command};

use crate::interpret::{interpret_ballot, InterpretBallotError, InterpretOptions};
use crate::layout::BallotLayout;

mod debug;
mod geometry;
mod image_utils;
mod interpret;
mod layout;
mod types;
mod votable_areas;
mod vote_marks;
mod votes;

/// Exit status for a ballot with too many votes, distinct from the status
/// used for unreadable input.
const INVALID_BALLOT_EXIT_CODE: i32 = 255;

fn main() {
    pretty_env_logger::init_custom_env("LOG");

    let matches = cli().get_matches();
    let debug = matches.get_flag("debug");
    let debug_dir = matches.get_one::<PathBuf>("debug-dir").cloned();
    let reference_path = matches
        .get_one::<PathBuf>("reference")
        .expect("reference ballot path is required");
    let filled_path = matches
        .get_one::<PathBuf>("input")
        .expect("filled ballot path is required");

    let layout = match matches.get_one::<PathBuf>("layout") {
        Some(layout_path) => match BallotLayout::load(layout_path) {
            Ok(layout) => layout,
            Err(e) => {
                eprintln!("Error loading ballot layout: {}", e);
                exit(1);
            }
        },
        None => BallotLayout::default(),
    };

    let options = InterpretOptions {
        debug,
        debug_dir,
        layout,
    };

    match interpret_ballot(reference_path, filled_path, &options) {
        Ok(decision) => {
            println!("{}", decision);
        }
        Err(InterpretBallotError::InvalidBallot(invalid)) => {
            eprintln!("{}", invalid);
            exit(INVALID_BALLOT_EXIT_CODE);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

#[allow(clippy::cognitive_complexity)]
fn cli() -> Command {
    command!()
        .arg(
            arg!(-r --reference <PATH> "Path to the blank ballot image")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-i --input <PATH> "Path to the filled ballot image")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-l --layout <PATH> "Path to a ballot layout JSON file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(-d --debug "Write intermediate images"))
        .arg(
            arg!(--"debug-dir" <DIR> "Directory for debug images, defaults to next to the input")
                .value_parser(value_parser!(PathBuf)),
        )
}
