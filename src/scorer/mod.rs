pub mod cache;
pub mod engine;
pub mod genre;
pub mod harmonic;
pub mod tempo;
pub mod types;

pub use self::cache::{build_cache, Normalizer, PairCache, PairCost};
pub use self::engine::Evaluator;
pub use self::types::{Component, ScoreBreakdown};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Weights;
    use crate::track::{assign_indices, CamelotKey, Track};

    fn tracks() -> Vec<Track> {
        let mut tracks: Vec<Track> = [
            ("a", "8A", "x", "house", 2, 122.0),
            ("b", "9A", "y", "deep house", 6, 124.0),
            ("c", "3B", "x", "techno", 9, 130.0),
            ("d", "8B", "z", "", 4, 0.0),
            ("e", "", "y", "jazz", 0, 90.0),
        ]
        .into_iter()
        .map(|(path, key, artist, genre, energy, bpm)| Track {
            path: path.into(),
            key: CamelotKey::parse(key),
            artist: artist.into(),
            album: "lp".into(),
            genre: genre.into(),
            energy,
            bpm,
            index: 0,
        })
        .collect();
        assign_indices(&mut tracks);
        tracks
    }

    #[test]
    fn test_breakdown_total_matches_fast_path() {
        let tracks = tracks();
        let (cache, norm) = build_cache(&tracks).unwrap();
        let mut weights = Weights::default();
        weights.position_bias_portion = 0.6;
        let eval = Evaluator::new(&cache, &norm, &weights);

        let genes = vec![3, 0, 4, 2, 1];
        let detail = eval.score_full(&genes);
        assert!((detail.total - eval.cost_full(&genes)).abs() < 1e-12);
        assert!((detail.total - detail.component_sum()).abs() < 1e-12);
        assert!(detail.position_bias > 0.0);
    }

    #[test]
    fn test_harmonic_only_scale() {
        let tracks = tracks();
        let (cache, norm) = build_cache(&tracks).unwrap();
        let eval = Evaluator::new(&cache, &norm, &Weights::harmonic_only());

        // 8A -> 9A (1), 9A -> 3B (10): (1 + 10) / (12 * 4)
        let cost = eval.cost_range(&[0, 1, 2, 3, 4], 0, 2);
        assert!((cost - 11.0 / 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_genre_weight_rewards_change() {
        let tracks = tracks();
        let (cache, norm) = build_cache(&tracks).unwrap();
        let mut weights = Weights::harmonic_only();
        weights.harmonic = 0.0;

        weights.genre = 1.0;
        let cluster = Evaluator::new(&cache, &norm, &weights);
        weights.genre = -1.0;
        let spread = Evaluator::new(&cache, &norm, &weights);

        // house -> deep house is 0.15 apart, house -> jazz is 1.0 apart
        let close = [0, 1];
        let far = [0, 4];
        assert!(cluster.cost_full(&close) < cluster.cost_full(&far));
        assert!(spread.cost_full(&close) > spread.cost_full(&far));
        assert!((spread.cost_full(&far)).abs() < 1e-12);
    }

    #[test]
    fn test_range_is_clamped_and_empty_is_zero() {
        let tracks = tracks();
        let (cache, norm) = build_cache(&tracks).unwrap();
        let eval = Evaluator::new(&cache, &norm, &Weights::default());
        let genes = vec![0, 1, 2, 3, 4];
        assert_eq!(eval.cost_range(&genes, 0, 99), eval.cost_full(&genes));
        assert_eq!(eval.cost_full(&[]), 0.0);
        assert_eq!(eval.score_full(&[]), ScoreBreakdown::default());
    }
}
