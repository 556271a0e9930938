use crate::consts::{IMMIGRANT_SWAPS, MUTATION_SWAPS_MAX, MUTATION_SWAPS_MIN};
use crate::track::Track;
use fastrand::Rng;

/// Structured starting orderings: input order, then ascending energy, tempo
/// and Camelot key. Tracks without a key go last.
pub fn structured_seeds(tracks: &[Track]) -> Vec<Vec<usize>> {
    let identity: Vec<usize> = tracks.iter().map(|t| t.index).collect();

    let mut by_energy = identity.clone();
    by_energy.sort_by_key(|&i| tracks[i].energy);

    let mut by_tempo = identity.clone();
    by_tempo.sort_by(|&a, &b| tracks[a].bpm.total_cmp(&tracks[b].bpm));

    let mut by_key = identity.clone();
    by_key.sort_by_key(|&i| (tracks[i].key.is_none(), tracks[i].key));

    vec![identity, by_energy, by_tempo, by_key]
}

/// Overwrites `genes` with a uniformly random permutation of `0..len`.
pub fn random_ordering(genes: &mut [usize], rng: &mut Rng) {
    for (i, g) in genes.iter_mut().enumerate() {
        *g = i;
    }
    rng.shuffle(genes);
}

/// One mutation event: either a few random swaps or one segment reversal.
pub fn mutate(genes: &mut [usize], rng: &mut Rng) {
    if genes.len() < 2 {
        return;
    }
    if rng.bool() {
        let swaps = rng.usize(MUTATION_SWAPS_MIN..=MUTATION_SWAPS_MAX);
        random_swaps(genes, swaps, rng);
    } else {
        reverse_segment(genes, rng);
    }
}

pub fn random_swaps(genes: &mut [usize], swaps: usize, rng: &mut Rng) {
    let n = genes.len();
    if n < 2 {
        return;
    }
    for _ in 0..swaps {
        genes.swap(rng.usize(0..n), rng.usize(0..n));
    }
}

pub fn reverse_segment(genes: &mut [usize], rng: &mut Rng) {
    let n = genes.len();
    if n < 2 {
        return;
    }
    let (mut i, mut j) = (rng.usize(0..n), rng.usize(0..n));
    if i > j {
        std::mem::swap(&mut i, &mut j);
    }
    genes[i..=j].reverse();
}

/// Copy of `best` with a handful of swaps, written into `dst`.
pub fn immigrant(dst: &mut [usize], best: &[usize], rng: &mut Rng) {
    dst.copy_from_slice(best);
    random_swaps(dst, IMMIGRANT_SWAPS, rng);
}
