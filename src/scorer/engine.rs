use super::cache::{Normalizer, PairCache, PairCost};
use super::types::ScoreBreakdown;
use crate::config::Weights;

/// Weight-over-maximum factors, resolved once per configuration snapshot so the
/// per-pair loop is multiply-add only.
#[derive(Debug, Clone, Copy, Default)]
struct Scales {
    harmonic: f64,
    same_artist: f64,
    same_album: f64,
    energy: f64,
    tempo: f64,
    genre: f64,
    // Negative genre weight rewards change instead of sameness.
    genre_spread: bool,
    position_bias: f64,
}

impl Scales {
    fn new(weights: &Weights, norm: &Normalizer) -> Self {
        Self {
            harmonic: Normalizer::scale(weights.harmonic, norm.max_harmonic),
            same_artist: Normalizer::scale(weights.same_artist, norm.max_same_artist),
            same_album: Normalizer::scale(weights.same_album, norm.max_same_album),
            energy: Normalizer::scale(weights.energy, norm.max_energy),
            tempo: Normalizer::scale(weights.tempo, norm.max_tempo),
            genre: Normalizer::scale(weights.genre.abs(), norm.max_genre),
            genre_spread: weights.genre < 0.0,
            position_bias: Normalizer::scale(weights.position_bias, norm.max_position_bias),
        }
    }

    #[inline(always)]
    fn genre_term(&self, pair: &PairCost) -> f64 {
        if self.genre_spread {
            self.genre * (1.0 - pair.genre)
        } else {
            self.genre * pair.genre
        }
    }
}

/// Scores orderings of track indices against one cache and one weight snapshot.
///
/// A range `[start, end]` covers every transition that *lands* on a position in
/// `max(start, 1)..=end` plus the opening bias of positions inside the range.
/// Reversing `[i, j]` only changes transitions landing in `i..=j+1`, so
/// `score_range(i, min(j + 1, n - 1))` captures the entire difference.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    cache: &'a PairCache,
    scales: Scales,
    // Positions below this index receive the opening bias.
    bias_cutoff: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(cache: &'a PairCache, norm: &Normalizer, weights: &Weights) -> Self {
        let n = cache.len();
        Self {
            cache,
            scales: Scales::new(weights, norm),
            bias_cutoff: (weights.position_bias_portion * n as f64) as usize,
        }
    }

    /// Fast Path: total only. Used by evaluation batches and 2-opt.
    pub fn cost_range(&self, genes: &[usize], start: usize, end: usize) -> f64 {
        let Some(end) = clamp_end(genes, end) else {
            return 0.0;
        };
        let s = &self.scales;
        let mut total = 0.0;

        for p in start.max(1)..=end {
            let pair = self.cache.get(genes[p - 1], genes[p]);
            total += s.harmonic * pair.harmonic as f64
                + s.same_artist * flag(pair.same_artist)
                + s.same_album * flag(pair.same_album)
                + s.energy * pair.energy_delta as f64
                + s.tempo * pair.tempo_delta
                + s.genre_term(pair);
        }

        for p in start..=end.min(self.bias_cutoff.saturating_sub(1)) {
            total += self.position_term(genes[p], p);
        }
        total
    }

    pub fn cost_full(&self, genes: &[usize]) -> f64 {
        self.cost_range(genes, 0, genes.len().saturating_sub(1))
    }

    /// Detailed Path: per-component breakdown. Sums the same terms as
    /// [`Evaluator::cost_range`].
    pub fn score_range(&self, genes: &[usize], start: usize, end: usize) -> ScoreBreakdown {
        let mut d = ScoreBreakdown::default();
        let Some(end) = clamp_end(genes, end) else {
            return d;
        };
        let s = &self.scales;

        for p in start.max(1)..=end {
            let pair = self.cache.get(genes[p - 1], genes[p]);
            d.harmonic += s.harmonic * pair.harmonic as f64;
            d.same_artist += s.same_artist * flag(pair.same_artist);
            d.same_album += s.same_album * flag(pair.same_album);
            d.energy += s.energy * pair.energy_delta as f64;
            d.tempo += s.tempo * pair.tempo_delta;
            d.genre += s.genre_term(pair);
        }

        for p in start..=end.min(self.bias_cutoff.saturating_sub(1)) {
            d.position_bias += self.position_term(genes[p], p);
        }

        d.total = d.component_sum();
        d
    }

    pub fn score_full(&self, genes: &[usize]) -> ScoreBreakdown {
        self.score_range(genes, 0, genes.len().saturating_sub(1))
    }

    /// Low-energy-first: full weight at position 0, fading to zero at the cutoff.
    #[inline(always)]
    fn position_term(&self, track: usize, position: usize) -> f64 {
        if self.bias_cutoff == 0 {
            return 0.0;
        }
        let fade = 1.0 - position as f64 / self.bias_cutoff as f64;
        self.scales.position_bias * self.cache.energy(track) as f64 * fade
    }
}

#[inline(always)]
fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[inline(always)]
fn clamp_end(genes: &[usize], end: usize) -> Option<usize> {
    if genes.is_empty() {
        None
    } else {
        Some(end.min(genes.len() - 1))
    }
}
