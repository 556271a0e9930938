use mixforge::config::Weights;
use mixforge::optimizer::crossover::order_crossover;
use mixforge::optimizer::local_search::refine;
use mixforge::optimizer::{mutation, Candidate};
use mixforge::scorer::{build_cache, genre, harmonic, Evaluator};
use mixforge::track::{CamelotKey, KeyLetter, Track};
use proptest::prelude::*;

mod common;
use common::indexed;

const GENRES: &[&str] = &[
    "",
    "house",
    "Deep House",
    "tech house",
    "techno",
    "melodic techno",
    "nu disco",
    "neo soul",
    "funk",
    "jazz",
    "acid jazz",
    "rock",
    "death metal",
    "polka",
];

const ARTISTS: &[&str] = &["", "a", "b", "c"];

// --- STRATEGIES ---

prop_compose! {
    // 0 and 13 produce `None`, covering unknown keys.
    fn arb_key()(number in 0u8..=13, minor in any::<bool>()) -> Option<CamelotKey> {
        CamelotKey::new(number, if minor { KeyLetter::A } else { KeyLetter::B })
    }
}

prop_compose! {
    fn arb_track()(
        key in arb_key(),
        energy in 0u8..=10,
        bpm in prop_oneof![Just(0.0), 60.0..180.0f64],
        genre in proptest::sample::select(GENRES),
        artist in proptest::sample::select(ARTISTS)
    ) -> Track {
        Track {
            key,
            energy,
            bpm,
            genre: genre.to_string(),
            artist: artist.to_string(),
            album: artist.to_string(),
            ..Track::new("prop")
        }
    }
}

prop_compose! {
    fn arb_crate()(tracks in proptest::collection::vec(arb_track(), 2..30)) -> Vec<Track> {
        indexed(tracks)
    }
}

prop_compose! {
    fn arb_weights()(
        harmonic in 0.0..2.0f64,
        same_artist in 0.0..2.0f64,
        same_album in 0.0..2.0f64,
        energy in 0.0..2.0f64,
        tempo in 0.0..2.0f64,
        genre in -1.0..1.0f64,
        position_bias_portion in 0.0..1.0f64,
        position_bias in 0.0..1.0f64
    ) -> Weights {
        Weights {
            harmonic,
            same_artist,
            same_album,
            energy,
            tempo,
            genre,
            position_bias_portion,
            position_bias,
        }
    }
}

fn shuffled(n: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut genes = vec![0; n];
    mutation::random_ordering(&mut genes, rng);
    genes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_crossover_and_mutation_preserve_permutation(n in 1usize..60, seed in any::<u64>()) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut a = Candidate { genes: shuffled(n, &mut rng), score: 0.0 };
        let mut b = Candidate { genes: shuffled(n, &mut rng), score: 0.0 };
        let mut child = Candidate::new(n);
        let mut placed = vec![false; n];

        for round in 0..1000 {
            order_crossover(&mut child.genes, &a.genes, &b.genes, &mut rng, &mut placed);
            prop_assert!(child.is_permutation(), "crossover broke round {}", round);

            mutation::mutate(&mut child.genes, &mut rng);
            prop_assert!(child.is_permutation(), "mutation broke round {}", round);

            if round % 2 == 0 {
                std::mem::swap(&mut a, &mut child);
            } else {
                std::mem::swap(&mut b, &mut child);
            }
        }

        mutation::immigrant(&mut child.genes, &a.genes, &mut rng);
        prop_assert!(child.is_permutation());
    }

    #[test]
    fn test_delta_matches_full_rescore(
        tracks in arb_crate(),
        weights in arb_weights(),
        seed in any::<u64>()
    ) {
        let (cache, norm) = build_cache(&tracks).unwrap();
        let eval = Evaluator::new(&cache, &norm, &weights);
        let n = tracks.len();
        let mut rng = fastrand::Rng::with_seed(seed);

        let before = shuffled(n, &mut rng);
        let i = rng.usize(0..n);
        let j = rng.usize(i..n);
        let end = (j + 1).min(n - 1);

        let mut after = before.clone();
        after[i..=j].reverse();

        let full_delta = eval.cost_full(&after) - eval.cost_full(&before);
        let range_delta = eval.cost_range(&after, i, end) - eval.cost_range(&before, i, end);
        prop_assert!(
            (full_delta - range_delta).abs() < 1e-9,
            "full {} vs range {} for [{}, {}]", full_delta, range_delta, i, j
        );

        let detail = eval.score_full(&after);
        prop_assert!((detail.total - eval.cost_full(&after)).abs() < 1e-9);
    }

    #[test]
    fn test_two_opt_never_worsens(
        tracks in arb_crate(),
        weights in arb_weights(),
        seed in any::<u64>()
    ) {
        let (cache, norm) = build_cache(&tracks).unwrap();
        let eval = Evaluator::new(&cache, &norm, &weights);
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut genes = shuffled(tracks.len(), &mut rng);
        let mut scratch = vec![false; tracks.len()];

        let before = eval.cost_full(&genes);
        let first = refine(&mut genes, &eval, &mut scratch);
        prop_assert!(first <= before + 1e-9, "{} -> {}", before, first);
        let refined = Candidate { genes: genes.clone(), score: first };
        prop_assert!(refined.is_permutation());

        let second = refine(&mut genes, &eval, &mut scratch);
        prop_assert!((second - first).abs() < 1e-9, "not converged: {} -> {}", first, second);
    }

    #[test]
    fn test_harmonic_symmetric_and_bucketed(a in arb_key(), b in arb_key()) {
        let d = harmonic::distance(a, b);
        prop_assert_eq!(d, harmonic::distance(b, a));
        prop_assert!([0u8, 1, 2, 10].contains(&d));
        if a.is_some() && a == b {
            prop_assert_eq!(d, 0);
        }
    }

    #[test]
    fn test_genre_symmetric_and_bounded(
        a in proptest::sample::select(GENRES),
        b in proptest::sample::select(GENRES)
    ) {
        let s = genre::similarity(a, b);
        prop_assert_eq!(s, genre::similarity(b, a));
        prop_assert!((0.0..=1.0).contains(&s));
        prop_assert_eq!(genre::similarity(a, a), 0.0);
        if a.is_empty() != b.is_empty() {
            prop_assert_eq!(s, 1.0);
        }
    }
}
