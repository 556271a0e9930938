use crate::consts::{HARMONIC_NEIGHBOUR, HARMONIC_PARALLEL, HARMONIC_SAME, HARMONIC_UNRELATED};
use crate::track::{CamelotKey, KeyLetter};

/// Camelot wheel transition distance. Output is always one of {0, 1, 2, 10}.
///
/// Unknown keys and every transition the wheel does not document fall into the
/// same bucket regardless of how far apart they sit on the wheel.
pub fn distance(a: Option<CamelotKey>, b: Option<CamelotKey>) -> u8 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return HARMONIC_UNRELATED,
    };

    if a == b {
        return HARMONIC_SAME;
    }

    if a.letter == b.letter {
        if is_adjacent(a.number, b.number) {
            return HARMONIC_NEIGHBOUR;
        }
        return HARMONIC_UNRELATED;
    }

    // Relative major/minor.
    if a.number == b.number {
        return HARMONIC_NEIGHBOUR;
    }

    let (minor, major) = if a.letter == KeyLetter::A {
        (a, b)
    } else {
        (b, a)
    };
    if major.number == parallel_major(minor.number) {
        return HARMONIC_PARALLEL;
    }

    HARMONIC_UNRELATED
}

#[inline(always)]
fn is_adjacent(n1: u8, n2: u8) -> bool {
    let diff = n1.abs_diff(n2);
    diff == 1 || diff == 11
}

/// Wheel number of the major key sharing a root with the given minor key.
#[inline(always)]
fn parallel_major(minor_number: u8) -> u8 {
    (minor_number + 2) % 12 + 1
}
