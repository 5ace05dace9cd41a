use std::fmt::Display;

use log::{info, warn};

use crate::{
    geometry::{overlap_area, rects_intersect},
    layout::MarkAttribution,
    types::{VotableArea, VoteMark},
};

/// The outcome of reading one ballot: the selected area indices in ascending
/// order and any marks that landed outside every votable area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    pub selections: Vec<usize>,
    pub unmatched: Vec<VoteMark>,
}

/// Formats as the comma-separated selection list, e.g. `0,2`. No selections
/// formats as an empty string.
impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, selection) in self.selections.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", selection)?;
        }
        Ok(())
    }
}

/// A ballot with more votes than the contest allows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidBallot {
    pub vote_count: usize,
    pub max_selections: usize,
}

impl Display for InvalidBallot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid ballot: {} votes marked, at most {} allowed",
            self.vote_count, self.max_selections
        )
    }
}

/// Finds the votable area a mark votes for, if any.
pub fn attribute_mark(
    mark: &VoteMark,
    areas: &[VotableArea],
    attribution: MarkAttribution,
) -> Option<usize> {
    let candidates = areas
        .iter()
        .filter(|area| rects_intersect(&area.bounds, &mark.bounds));

    let chosen = match attribution {
        MarkAttribution::FirstMatch => candidates.min_by_key(|area| area.index),
        MarkAttribution::LargestOverlap => candidates
            .map(|area| (overlap_area(&area.bounds, &mark.bounds), area))
            .max_by(|(a_overlap, a), (b_overlap, b)| {
                a_overlap.cmp(b_overlap).then(b.index.cmp(&a.index))
            })
            .map(|(_, area)| area),
    };
    chosen.map(|area| area.index)
}

/// Turns detected marks into a decision. Every mark counts as at most one
/// vote; a slot marked twice counts twice.
pub fn resolve_votes(
    areas: &[VotableArea],
    marks: &[VoteMark],
    attribution: MarkAttribution,
    max_selections: usize,
) -> Result<Decision, InvalidBallot> {
    let mut decision = Decision::default();

    for mark in marks {
        match attribute_mark(mark, areas, attribution) {
            Some(index) => {
                info!("mark at {:?} votes for {}", mark.bounds, index);
                decision.selections.push(index);
            }
            None => {
                warn!("mark at {:?} is not inside any votable area", mark.bounds);
                decision.unmatched.push(*mark);
            }
        }
    }

    if decision.selections.len() > max_selections {
        return Err(InvalidBallot {
            vote_count: decision.selections.len(),
            max_selections,
        });
    }

    decision.selections.sort_unstable();
    Ok(decision)
}
