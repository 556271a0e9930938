use super::{genre, harmonic, tempo};
use crate::consts::HARMONIC_NORMALIZER_CEILING;
use crate::error::MfResult;
use crate::track::{check_indices, Track};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Unweighted cost of placing track `j` directly after track `i`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PairCost {
    pub harmonic: u8,
    pub same_artist: bool,
    pub same_album: bool,
    pub energy_delta: u8,
    pub tempo_delta: f64,
    /// 0.0 identical .. 1.0 unrelated
    pub genre: f64,
}

/// Per-component maxima over the current track set. Rescales every component
/// into [0, 1] so equal weights mean equal influence.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Normalizer {
    pub max_harmonic: f64,
    pub max_same_artist: f64,
    pub max_same_album: f64,
    pub max_energy: f64,
    pub max_tempo: f64,
    pub max_genre: f64,
    pub max_position_bias: f64,
}

impl Normalizer {
    /// Division that maps an empty range to zero instead of NaN/inf.
    #[inline(always)]
    pub fn scale(weight: f64, max: f64) -> f64 {
        if max > 0.0 {
            weight / max
        } else {
            0.0
        }
    }
}

/// Flat `n * n` table of [`PairCost`], indexed by `Track::index`.
/// Written once before the search starts, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PairCache {
    n: usize,
    // FLATTENED MATRIX (size = n * n), diagonal unused
    pairs: Vec<PairCost>,
    // DYNAMIC ARRAYS (size = n)
    energies: Vec<u8>,
}

impl PairCache {
    pub fn build(tracks: &[Track]) -> MfResult<(PairCache, Normalizer)> {
        check_indices(tracks)?;
        let n = tracks.len();

        let chains: Vec<Vec<String>> = tracks
            .iter()
            .map(|t| genre::ancestor_chain(&t.genre))
            .collect();

        let mut pairs = vec![PairCost::default(); n * n];
        if n > 0 {
            pairs.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
                let a = &tracks[i];
                for (j, cell) in row.iter_mut().enumerate() {
                    if i == j {
                        continue;
                    }
                    let b = &tracks[j];
                    *cell = PairCost {
                        harmonic: harmonic::distance(a.key, b.key),
                        same_artist: !a.artist.is_empty() && a.artist == b.artist,
                        same_album: !a.album.is_empty() && a.album == b.album,
                        energy_delta: energy_delta(a, b),
                        tempo_delta: tempo::distance(a.bpm, b.bpm),
                        genre: genre::chain_similarity(&chains[i], &chains[j]),
                    };
                }
            });
        }

        let cache = PairCache {
            n,
            pairs,
            energies: tracks.iter().map(|t| t.energy).collect(),
        };
        let normalizer = cache.normalizer(tracks);

        let missing_keys = tracks.iter().filter(|t| t.key.is_none()).count();
        if missing_keys > 0 {
            warn!(
                "{} of {} tracks have no usable key; their transitions score as unrelated",
                missing_keys, n
            );
        }
        debug!("Pair cache built: {} tracks, {} pairs", n, n * n.saturating_sub(1));

        Ok((cache, normalizer))
    }

    fn normalizer(&self, tracks: &[Track]) -> Normalizer {
        let transitions = self.n.saturating_sub(1) as f64;

        let known: Vec<u8> = tracks
            .iter()
            .filter(|t| t.has_energy())
            .map(|t| t.energy)
            .collect();
        let energy_span = match (known.iter().min(), known.iter().max()) {
            (Some(&lo), Some(&hi)) => (hi - lo) as f64,
            _ => 0.0,
        };

        let worst_tempo = self
            .pairs
            .iter()
            .map(|p| p.tempo_delta)
            .fold(0.0, f64::max);

        Normalizer {
            max_harmonic: HARMONIC_NORMALIZER_CEILING * transitions,
            max_same_artist: transitions,
            max_same_album: transitions,
            max_energy: energy_span * transitions,
            max_tempo: worst_tempo * transitions,
            max_genre: transitions,
            max_position_bias: tracks.iter().map(|t| t.energy).max().unwrap_or(0) as f64,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline(always)]
    pub fn get(&self, from: usize, to: usize) -> &PairCost {
        &self.pairs[from * self.n + to]
    }

    #[inline(always)]
    pub fn energy(&self, index: usize) -> u8 {
        self.energies[index]
    }
}

/// Unknown energy on either side is neutral.
fn energy_delta(a: &Track, b: &Track) -> u8 {
    if a.has_energy() && b.has_energy() {
        a.energy.abs_diff(b.energy)
    } else {
        0
    }
}

/// Builds the pair cache and normalizer for a track list with dense indices.
pub fn build_cache(tracks: &[Track]) -> MfResult<(PairCache, Normalizer)> {
    PairCache::build(tracks)
}
